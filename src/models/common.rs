use serde::{Deserialize, Serialize};
use std::fmt;

/// Requirement-intent categories assigned to extracted properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum PropertyCategory {
    Safety,
    Liveness,
    Ordering,
    Timing,
    Unknown,
}

impl PropertyCategory {
    /// Parse a category name as returned by the model; anything
    /// unrecognized degrades to Unknown rather than erroring.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "safety" => PropertyCategory::Safety,
            "liveness" => PropertyCategory::Liveness,
            "ordering" => PropertyCategory::Ordering,
            "timing" => PropertyCategory::Timing,
            _ => PropertyCategory::Unknown,
        }
    }
}

impl fmt::Display for PropertyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyCategory::Safety => "Safety",
            PropertyCategory::Liveness => "Liveness",
            PropertyCategory::Ordering => "Ordering",
            PropertyCategory::Timing => "Timing",
            PropertyCategory::Unknown => "Unknown",
        };
        write!(f, "{}", name)
    }
}

impl From<String> for PropertyCategory {
    fn from(s: String) -> Self {
        PropertyCategory::parse(&s)
    }
}

impl From<PropertyCategory> for String {
    fn from(c: PropertyCategory) -> Self {
        c.to_string()
    }
}

/// Kinds of atomic propositions extracted from a property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum PropositionKind {
    Action,
    State,
    Event,
    Condition,
    Custom(String),
}

impl PropositionKind {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "action" => PropositionKind::Action,
            "state" => PropositionKind::State,
            "event" => PropositionKind::Event,
            "condition" => PropositionKind::Condition,
            other => PropositionKind::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for PropositionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropositionKind::Action => write!(f, "action"),
            PropositionKind::State => write!(f, "state"),
            PropositionKind::Event => write!(f, "event"),
            PropositionKind::Condition => write!(f, "condition"),
            PropositionKind::Custom(s) => write!(f, "{}", s),
        }
    }
}

impl From<String> for PropositionKind {
    fn from(s: String) -> Self {
        PropositionKind::parse(&s)
    }
}

impl From<PropositionKind> for String {
    fn from(k: PropositionKind) -> Self {
        k.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!(PropertyCategory::parse("safety"), PropertyCategory::Safety);
        assert_eq!(PropertyCategory::parse("LIVENESS"), PropertyCategory::Liveness);
        assert_eq!(PropertyCategory::parse("Ordering"), PropertyCategory::Ordering);
    }

    #[test]
    fn unknown_category_degrades() {
        assert_eq!(PropertyCategory::parse("Fairness"), PropertyCategory::Unknown);
        assert_eq!(PropertyCategory::parse(""), PropertyCategory::Unknown);
    }

    #[test]
    fn proposition_kind_keeps_unrecognized_strings() {
        assert_eq!(PropositionKind::parse("event"), PropositionKind::Event);
        assert_eq!(
            PropositionKind::parse("predicate"),
            PropositionKind::Custom("predicate".to_string())
        );
    }
}
