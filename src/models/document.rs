use serde::{Deserialize, Serialize};

/// A numbered section of an RFC that survived the keyword-density filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Dotted section identifier, trailing dot stripped (e.g. "4.1.2")
    pub number: String,
    pub title: String,
    /// Newline-joined body text between this header and the next
    pub content: String,
    /// Total requirement-keyword occurrences in the content
    pub keyword_count: usize,
}

/// Parsed RFC metadata plus its property-rich sections, ranked by
/// keyword density descending
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfcDocument {
    /// RFC number as digits, or "Unknown" when no `RFC nnnn` marker exists
    pub rfc_number: String,
    pub title: String,
    pub total_chars: usize,
    pub sections: Vec<Section>,
}

impl RfcDocument {
    /// The top-ranked sections fed to property extraction
    pub fn top_sections(&self, limit: usize) -> &[Section] {
        &self.sections[..self.sections.len().min(limit)]
    }
}
