use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::store::{LedgerStore, StoreError};

/// Errors produced while handling a single transaction proposal. Every
/// variant names the asset it concerns; none is retried here.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("incorrect arguments, expecting a key and a value")]
    IncorrectArguments,
    #[error("failed to create asset {key}")]
    CreateFailed { key: String },
    #[error("failed to set asset {key}")]
    SetFailed { key: String },
    #[error("failed to get asset {key}: {source}")]
    GetFailed { key: String, source: StoreError },
    #[error("asset not found: {key}")]
    NotFound { key: String },
}

/// Outcome of one transaction proposal: a success payload or a failure
/// message, never both.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Success {
        #[serde(with = "payload_base64")]
        payload: Vec<u8>,
    },
    Failure {
        message: String,
    },
}

impl Response {
    pub fn success(payload: impl Into<Vec<u8>>) -> Self {
        Response::Success {
            payload: payload.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Response::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }
}

/// Stateless handler for single key/value assets. All asset state lives in
/// the [`LedgerStore`] supplied with each call; the handler keeps nothing
/// across invocations.
#[derive(Clone, Copy, Debug, Default)]
pub struct AssetHandler;

impl AssetHandler {
    pub fn new() -> Self {
        AssetHandler
    }

    /// Called exactly once, before any [`invoke`](Self::invoke), to seed the
    /// ledger with the initial key/value pair.
    pub fn initialize(&self, store: &mut dyn LedgerStore, args: &[String]) -> Response {
        let (key, value) = match two_args(args) {
            Ok(pair) => pair,
            Err(err) => return Response::failure(err.to_string()),
        };
        if let Err(err) = store.put(key, value.as_bytes()) {
            warn!(key, %err, "asset create failed");
            let failed = HandlerError::CreateFailed { key: key.to_owned() };
            return Response::failure(failed.to_string());
        }
        debug!(key, "asset created");
        Response::success(Vec::new())
    }

    /// Called once per transaction after initialization. `"set"` routes to
    /// the write path; every other function name, `"get"` included, falls
    /// through to the read path.
    pub fn invoke(&self, store: &mut dyn LedgerStore, function: &str, args: &[String]) -> Response {
        let result = if function == "set" {
            do_set(store, args)
        } else {
            do_get(store, args)
        };
        match result {
            Ok(value) => Response::success(value.into_bytes()),
            Err(err) => {
                warn!(function, %err, "transaction failed");
                Response::failure(err.to_string())
            }
        }
    }
}

fn two_args(args: &[String]) -> Result<(&str, &str), HandlerError> {
    match args {
        [key, value] => Ok((key.as_str(), value.as_str())),
        _ => Err(HandlerError::IncorrectArguments),
    }
}

/// Stores the asset, creating it if the key is new, and echoes the stored
/// value back as the result.
fn do_set(store: &mut dyn LedgerStore, args: &[String]) -> Result<String, HandlerError> {
    let (key, value) = two_args(args)?;
    store
        .put(key, value.as_bytes())
        .map_err(|_| HandlerError::SetFailed { key: key.to_owned() })?;
    debug!(key, "asset set");
    Ok(value.to_owned())
}

/// Reads the asset named by the first argument. The read uses only the key,
/// but the two-argument shape is part of the call contract and is enforced
/// before the store is touched.
fn do_get(store: &mut dyn LedgerStore, args: &[String]) -> Result<String, HandlerError> {
    let (key, _) = two_args(args)?;
    let value = store.get(key).map_err(|err| HandlerError::GetFailed {
        key: key.to_owned(),
        source: err,
    })?;
    match value {
        Some(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        None => Err(HandlerError::NotFound { key: key.to_owned() }),
    }
}


pub(crate) mod payload_base64 {
    use base64::{engine::general_purpose, Engine as _};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&general_purpose::STANDARD.encode(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        general_purpose::STANDARD
            .decode(&encoded)
            .map_err(D::Error::custom)
    }
}
