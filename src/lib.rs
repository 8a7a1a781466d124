pub mod cli;
pub mod errors;
pub mod implementations;
pub mod models;
pub mod parser;
pub mod session;
pub mod store;
pub mod traits;
#[cfg(test)]
pub mod tests;

// Re-export core components
pub use errors::{LtlGenError, LtlGenResult};
pub use implementations::config::{ApiConfig, ConfigError, ProcessorConfig};
pub use implementations::llm_processor::LlmPropertyProcessor;
pub use models::{
    common::{PropertyCategory, PropositionKind},
    document::{RfcDocument, Section},
    formula::LtlFormula,
    property::Property,
    proposition::Proposition,
    record::CompleteRecord,
};
pub use parser::RfcParser;
pub use session::{WorkflowSession, WorkflowStage};
pub use store::{DataStore, StoreError, Table};
pub use traits::PropertyProcessor;
