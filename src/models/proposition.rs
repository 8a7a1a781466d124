use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::PropositionKind;

/// An atomic boolean-valued statement used as a building block of an
/// LTL formula. Many propositions per property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposition {
    pub id: String,
    pub property_id: String,
    /// snake_case identifier usable inside a formula
    pub name: String,
    pub kind: PropositionKind,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub approved: bool,
    /// Empty until a reviewer approves the proposition
    #[serde(default)]
    pub approved_by: String,
}
