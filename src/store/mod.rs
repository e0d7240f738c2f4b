use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub type AssetKey = String;

/// Failure reported by a ledger backend, distinct from "key has no value".
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("ledger backend unavailable: {0}")]
    Unavailable(String),
}

/// Boundary to the platform-owned ledger state.
///
/// Implementations are expected to be linearizable and durable; the handler
/// performs at most one read and at most one write per invocation and never
/// retries. `get` returning `Ok(None)` means the key currently has no value.
pub trait LedgerStore {
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

/// In-memory ledger state, used by the replay CLI and the tests.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemStore {
    entries: BTreeMap<AssetKey, Vec<u8>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deterministic digest of the current state. Entries are folded into a
    /// single SHA-256 in key order with length prefixes, so the digest covers
    /// every key and value and is independent of write order.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"asset-state-v1");
        for (key, value) in &self.entries {
            hasher.update((key.len() as u64).to_le_bytes());
            hasher.update(key.as_bytes());
            hasher.update((value.len() as u64).to_le_bytes());
            hasher.update(value);
        }
        hasher.finalize().into()
    }
}

impl LedgerStore for MemStore {
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;

    /// Wrapper around [`MemStore`] that counts calls and can be told to fail
    /// reads or writes, for exercising the handler's failure paths.
    pub(crate) struct FlakyStore {
        pub inner: MemStore,
        pub fail_get: bool,
        pub fail_put: bool,
        pub gets: usize,
        pub puts: usize,
    }

    impl FlakyStore {
        pub fn new() -> Self {
            FlakyStore {
                inner: MemStore::new(),
                fail_get: false,
                fail_put: false,
                gets: 0,
                puts: 0,
            }
        }
    }

    impl LedgerStore for FlakyStore {
        fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            self.gets += 1;
            if self.fail_get {
                return Err(StoreError::Unavailable("backend offline".into()));
            }
            self.inner.get(key)
        }

        fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
            self.puts += 1;
            if self.fail_put {
                return Err(StoreError::Unavailable("backend offline".into()));
            }
            self.inner.put(key, value)
        }
    }
}
