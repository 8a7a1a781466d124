use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{LtlFormula, Property, Proposition, RfcDocument};

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Cannot advance past {stage}: {missing} is empty")]
    EmptyStageOutput { stage: String, missing: String },

    #[error("Workflow is already at its final stage")]
    AtFinalStage,
}

/// The five workflow stages, in order. The only cycle is an explicit
/// reset back to Upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowStage {
    Upload,
    ReviewProperties,
    ApprovePropositions,
    ApproveLtl,
    View,
}

impl WorkflowStage {
    fn next(&self) -> Option<WorkflowStage> {
        match self {
            WorkflowStage::Upload => Some(WorkflowStage::ReviewProperties),
            WorkflowStage::ReviewProperties => Some(WorkflowStage::ApprovePropositions),
            WorkflowStage::ApprovePropositions => Some(WorkflowStage::ApproveLtl),
            WorkflowStage::ApproveLtl => Some(WorkflowStage::View),
            WorkflowStage::View => None,
        }
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowStage::Upload => "upload",
            WorkflowStage::ReviewProperties => "review-properties",
            WorkflowStage::ApprovePropositions => "approve-propositions",
            WorkflowStage::ApproveLtl => "approve-ltl",
            WorkflowStage::View => "view",
        };
        write!(f, "{}", name)
    }
}

/// Explicit workflow context carried through the pipeline stages: the
/// parsed document plus the in-flight record lists. Each forward
/// transition requires the previous stage's output to be non-empty.
/// The View stage intentionally reads from the durable store instead
/// of this context, so it reflects cumulative history.
#[derive(Debug, Default)]
pub struct WorkflowSession {
    stage: WorkflowStage,
    pub document: Option<RfcDocument>,
    pub properties: Vec<Property>,
    pub propositions: Vec<Proposition>,
    pub formulas: Vec<LtlFormula>,
}

impl Default for WorkflowStage {
    fn default() -> Self {
        WorkflowStage::Upload
    }
}

impl WorkflowSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> WorkflowStage {
        self.stage
    }

    /// Move to the next stage, enforcing that the data the next stage
    /// consumes actually exists.
    pub fn advance(&mut self) -> Result<WorkflowStage, WorkflowError> {
        let next = self.stage.next().ok_or(WorkflowError::AtFinalStage)?;

        let missing = match next {
            WorkflowStage::ReviewProperties if self.properties.is_empty() => Some("properties"),
            WorkflowStage::ApprovePropositions if self.propositions.is_empty() => {
                Some("propositions")
            }
            WorkflowStage::ApproveLtl if self.formulas.is_empty() => Some("formulas"),
            _ => None,
        };

        if let Some(missing) = missing {
            return Err(WorkflowError::EmptyStageOutput {
                stage: self.stage.to_string(),
                missing: missing.to_string(),
            });
        }

        self.stage = next;
        Ok(next)
    }

    /// Back to Upload with all in-flight state cleared. Persisted
    /// tables are untouched.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Properties paired with their propositions, restricted to
    /// properties that have at least one. This is the input set for
    /// formula generation.
    pub fn properties_with_propositions(&self) -> Vec<(&Property, Vec<&Proposition>)> {
        self.properties
            .iter()
            .filter_map(|property| {
                let props: Vec<&Proposition> = self
                    .propositions
                    .iter()
                    .filter(|p| p.property_id == property.id)
                    .collect();
                if props.is_empty() {
                    None
                } else {
                    Some((property, props))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::{PropertyCategory, PropositionKind};
    use chrono::Utc;

    fn property(id: &str) -> Property {
        Property {
            id: id.to_string(),
            rfc: "8446".to_string(),
            section: "4".to_string(),
            text: "text".to_string(),
            category: PropertyCategory::Unknown,
            timestamp: Utc::now(),
        }
    }

    fn proposition(id: &str, property_id: &str) -> Proposition {
        Proposition {
            id: id.to_string(),
            property_id: property_id.to_string(),
            name: "n".to_string(),
            kind: PropositionKind::State,
            description: String::new(),
            timestamp: Utc::now(),
            approved: false,
            approved_by: String::new(),
        }
    }

    #[test]
    fn advance_requires_nonempty_output() {
        let mut session = WorkflowSession::new();
        assert!(matches!(
            session.advance(),
            Err(WorkflowError::EmptyStageOutput { .. })
        ));
        assert_eq!(session.stage(), WorkflowStage::Upload);

        session.properties.push(property("a"));
        assert_eq!(session.advance().unwrap(), WorkflowStage::ReviewProperties);
    }

    #[test]
    fn view_is_terminal_until_reset() {
        let mut session = WorkflowSession::new();
        session.properties.push(property("a"));
        session.propositions.push(proposition("p", "a"));
        session.formulas.push(crate::models::LtlFormula {
            id: "f".to_string(),
            property_id: "a".to_string(),
            formula: "G a".to_string(),
            explanation: String::new(),
            operators_used: vec!["G".to_string()],
            timestamp: Utc::now(),
            approved: false,
            approved_by: String::new(),
        });

        session.advance().unwrap();
        session.advance().unwrap();
        session.advance().unwrap();
        assert_eq!(session.advance().unwrap(), WorkflowStage::View);
        assert!(matches!(session.advance(), Err(WorkflowError::AtFinalStage)));

        session.reset();
        assert_eq!(session.stage(), WorkflowStage::Upload);
        assert!(session.properties.is_empty());
    }

    #[test]
    fn formula_input_excludes_propertyless_propositions() {
        let mut session = WorkflowSession::new();
        session.properties.push(property("a"));
        session.properties.push(property("b"));
        session.propositions.push(proposition("p1", "a"));

        let items = session.properties_with_propositions();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].0.id, "a");
        assert_eq!(items[0].1.len(), 1);
    }
}
