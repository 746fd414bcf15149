//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `question_bank` - YAML question bank source (file or embedded)
//! - `storage` - Session snapshot stores (in-memory, YAML files)
//! - `http` - axum REST API

pub mod http;
pub mod question_bank;
pub mod storage;

pub use http::{api_router, AssessmentHandlers};
pub use question_bank::YamlQuestionSource;
pub use storage::{FileSessionStore, InMemorySessionStore};
