//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `QuestionBankSource` - Supplies the immutable question bank
//! - `SessionStore` - Persists session snapshots

mod question_bank_source;
mod session_store;

pub use question_bank_source::{QuestionBankSource, QuestionSourceError};
pub use session_store::{SessionStore, SessionStoreError};
