use serde::{Deserialize, Serialize};

/// Outcome of the last pipeline stage that ran.
///
/// Every stage ends by writing exactly one of these; the orchestrator's
/// fail-fast checks compare against the expected success value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignStatus {
    Initialized,
    NoSpecification,
    TopologySelected,
    SizingComplete,
    SizingFailed,
    ConstraintsOk,
    ConstraintsFailed,
    SimulationComplete,
    SimulationFailed,
    Refined,
    RefinementNoChange,
    RefinementSkipped,
    RefinementFailed,
    DesignValidated,
    DesignInvalidAfterRetries,
    OrchestrationFailed,
}

impl DesignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DesignStatus::Initialized => "initialized",
            DesignStatus::NoSpecification => "no_specification",
            DesignStatus::TopologySelected => "topology_selected",
            DesignStatus::SizingComplete => "sizing_complete",
            DesignStatus::SizingFailed => "sizing_failed",
            DesignStatus::ConstraintsOk => "constraints_ok",
            DesignStatus::ConstraintsFailed => "constraints_failed",
            DesignStatus::SimulationComplete => "simulation_complete",
            DesignStatus::SimulationFailed => "simulation_failed",
            DesignStatus::Refined => "refined",
            DesignStatus::RefinementNoChange => "refinement_no_change",
            DesignStatus::RefinementSkipped => "refinement_skipped",
            DesignStatus::RefinementFailed => "refinement_failed",
            DesignStatus::DesignValidated => "design_validated",
            DesignStatus::DesignInvalidAfterRetries => "design_invalid_after_retries",
            DesignStatus::OrchestrationFailed => "orchestration_failed",
        }
    }

    /// True for the statuses that end a design run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DesignStatus::DesignValidated
                | DesignStatus::DesignInvalidAfterRetries
                | DesignStatus::OrchestrationFailed
        )
    }
}

impl Default for DesignStatus {
    fn default() -> Self {
        DesignStatus::Initialized
    }
}

impl std::fmt::Display for DesignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
