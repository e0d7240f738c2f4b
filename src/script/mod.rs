//! Replay of transaction transcripts: one JSON record per line, an `init`
//! record first, then any number of `invoke` records.

use std::io::BufRead;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::handler::{AssetHandler, Response};
use crate::store::LedgerStore;

/// One line of a transaction transcript.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionRecord {
    Init {
        args: Vec<String>,
    },
    Invoke {
        function: String,
        args: Vec<String>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}: {source}")]
    Malformed {
        line: usize,
        source: serde_json::Error,
    },
    #[error("transcript must start with an init record")]
    MissingInit,
    #[error("line {line}: init allowed only as the first record")]
    DuplicateInit { line: usize },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Replays every record in `reader` against `handler` and `store`, in order,
/// and returns one [`Response`] per record. Blank lines are skipped. The
/// lifecycle is enforced here, not in the handler: exactly one `init`, and it
/// must come before any `invoke`.
pub fn run_script<R: BufRead>(
    reader: R,
    handler: &AssetHandler,
    store: &mut dyn LedgerStore,
) -> Result<Vec<Response>, ScriptError> {
    let mut responses = Vec::new();
    let mut initialized = false;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let record: TransactionRecord = serde_json::from_str(trimmed)
            .map_err(|source| ScriptError::Malformed { line: idx + 1, source })?;

        let response = match record {
            TransactionRecord::Init { args } => {
                if initialized {
                    return Err(ScriptError::DuplicateInit { line: idx + 1 });
                }
                initialized = true;
                debug!("replaying init");
                handler.initialize(store, &args)
            }
            TransactionRecord::Invoke { function, args } => {
                if !initialized {
                    return Err(ScriptError::MissingInit);
                }
                debug!(%function, "replaying transaction");
                handler.invoke(store, &function, &args)
            }
        };
        responses.push(response);
    }

    if !initialized {
        return Err(ScriptError::MissingInit);
    }
    Ok(responses)
}
