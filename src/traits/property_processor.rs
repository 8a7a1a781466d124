use async_trait::async_trait;

use crate::errors::LtlGenResult;
use crate::models::document::Section;
use crate::models::{LtlFormula, Property, Proposition};

/// The three pipeline stages that delegate to an external language
/// model. Each operation is a single batched request covering all of
/// its inputs, never one call per item.
#[async_trait]
pub trait PropertyProcessor {
    /// Extract natural-language requirement statements from ranked
    /// property-rich sections. Implementations cap the input to the
    /// top sections and truncate each section's content before
    /// embedding it in the request.
    async fn extract_properties(
        &self,
        sections: &[Section],
        rfc_number: &str,
    ) -> LtlGenResult<Vec<Property>>;

    /// Decompose every property into its atomic propositions.
    async fn extract_propositions(
        &self,
        properties: &[Property],
    ) -> LtlGenResult<Vec<Proposition>>;

    /// Synthesize one LTL formula per property from its propositions.
    /// Input is restricted to properties that have at least one
    /// proposition.
    async fn generate_formulas(
        &self,
        items: &[(&Property, Vec<&Proposition>)],
    ) -> LtlGenResult<Vec<LtlFormula>>;
}
