//! Question bank adapters - Implementations of QuestionBankSource.
//!
//! - `YamlQuestionSource` - Reads authored YAML from disk or the bundled bank

mod yaml_source;

pub use yaml_source::YamlQuestionSource;
