use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::PropertyCategory;

/// A natural-language protocol requirement extracted from an RFC section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    /// RFC number of the source document
    pub rfc: String,
    /// Section number the requirement was found in
    pub section: String,
    /// Complete requirement statement
    pub text: String,
    pub category: PropertyCategory,
    pub timestamp: DateTime<Utc>,
}
