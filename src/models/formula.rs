use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An LTL formula synthesized for one property over its atomic
/// propositions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LtlFormula {
    pub id: String,
    pub property_id: String,
    /// Formula text, e.g. `G (client_sends_data -> handshake_complete)`
    pub formula: String,
    pub explanation: String,
    /// Temporal operators appearing in the formula (G, F, X, U, ...)
    pub operators_used: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub approved: bool,
    #[serde(default)]
    pub approved_by: String,
}

impl LtlFormula {
    /// Comma-joined operator list for tabular display and export
    pub fn operators_joined(&self) -> String {
        self.operators_used.join(",")
    }
}
