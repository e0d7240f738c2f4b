//! Transaction handler for single key/value ledger assets.
//!
//! The crate is split into three small modules:
//!
//! * [`handler`] — the dispatch and validation core: routes each proposal to
//!   the write or read path and translates store outcomes into responses.
//! * [`store`] — the ledger state boundary ([`LedgerStore`]) and the
//!   in-memory implementation backing the CLI and the tests.
//! * [`script`] — transcript replay: feeds a sequence of recorded proposals
//!   through a handler and collects the responses.
//!
//! Durability, transaction ordering and transport are the surrounding
//! platform's concern; nothing here retries, locks or persists.

pub mod handler;
pub mod script;
pub mod store;

pub use handler::{AssetHandler, HandlerError, Response};
pub use script::{run_script, ScriptError, TransactionRecord};
pub use store::{LedgerStore, MemStore, StoreError};
