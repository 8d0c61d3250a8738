//! Structured stage reports.
//!
//! Expected domain failures never raise; they land in these reports and are
//! surfaced through [`crate::DesignStatus`]. The orchestrator's fail-fast
//! check is the sole enforcement point.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Result of one constraint-validation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintReport {
    /// True iff `issues` is empty.
    pub passed: bool,
    /// Hard failure reasons, in check order.
    pub issues: Vec<String>,
    /// Soft flags; the sizing is accepted but marked risky.
    pub warnings: Vec<String>,
    pub checked_topology: String,
    /// Exact fraction of required constraints present, in [0, 1].
    pub completeness_score: f64,
    /// Requirement schema used for this check.
    pub required_constraints: Vec<String>,
    pub required_sizing: Vec<String>,
}

impl Default for ConstraintReport {
    fn default() -> Self {
        Self {
            passed: false,
            issues: Vec::new(),
            warnings: Vec::new(),
            checked_topology: "unknown".to_string(),
            completeness_score: 0.0,
            required_constraints: Vec::new(),
            required_sizing: Vec::new(),
        }
    }
}

/// One bounded multiplicative adjustment applied to a sizing parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingChange {
    pub old: f64,
    pub new: f64,
    pub factor: f64,
}

/// What the orchestrator should do after a refinement pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    RerunSimulation,
    Stop,
}

/// Result of one refinement pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinementReport {
    pub changed: bool,
    pub changes: BTreeMap<String, SizingChange>,
    /// Human-readable rationale for each decision taken.
    pub notes: Vec<String>,
    pub next_action: NextAction,
}

impl RefinementReport {
    /// A report that applies no change and halts the loop.
    pub fn stop(note: impl Into<String>) -> Self {
        Self {
            changed: false,
            changes: BTreeMap::new(),
            notes: vec![note.into()],
            next_action: NextAction::Stop,
        }
    }
}

/// Result of the initial sizing stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingReport {
    pub success: bool,
    pub notes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constraint_report_is_failed_unknown() {
        let report = ConstraintReport::default();
        assert!(!report.passed);
        assert_eq!(report.checked_topology, "unknown");
        assert_eq!(report.completeness_score, 0.0);
    }

    #[test]
    fn test_next_action_wire_names() {
        assert_eq!(
            serde_json::to_string(&NextAction::RerunSimulation).unwrap(),
            "\"rerun_simulation\""
        );
        assert_eq!(serde_json::to_string(&NextAction::Stop).unwrap(), "\"stop\"");
    }

    #[test]
    fn test_stop_report() {
        let report = RefinementReport::stop("no topology resolved");
        assert!(!report.changed);
        assert!(report.changes.is_empty());
        assert_eq!(report.next_action, NextAction::Stop);
        assert_eq!(report.notes, vec!["no topology resolved".to_string()]);
    }
}
