use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::PropertyCategory;

/// Derived join of a property with its aggregated propositions and its
/// first matching formula. Materialized on demand from the durable
/// store; never independently authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteRecord {
    pub property_id: String,
    pub rfc_number: String,
    pub section: String,
    pub property_category: PropertyCategory,
    pub natural_language: String,
    /// Comma-joined proposition names, empty when none exist
    pub atomic_propositions: String,
    pub ltl_formula: String,
    pub ltl_explanation: String,
    pub ltl_operators: String,
    pub approved: bool,
    pub timestamp: DateTime<Utc>,
}
