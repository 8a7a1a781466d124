pub mod common;
pub mod document;
pub mod formula;
pub mod property;
pub mod proposition;
pub mod record;

// Re-export common model types
pub use common::{PropertyCategory, PropositionKind};
pub use document::{RfcDocument, Section};
pub use formula::LtlFormula;
pub use property::Property;
pub use proposition::Proposition;
pub use record::CompleteRecord;
