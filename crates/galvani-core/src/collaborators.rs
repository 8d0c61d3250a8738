//! Capability interfaces for the swappable pipeline collaborators.
//!
//! The engine depends only on these contracts; the bundled stubs can be
//! replaced by a real selector or solver without touching the core.

use galvani_state::{ConstraintMap, MetricsMap, SizingMap};

/// A topology choice with the selector's confidence in it.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyChoice {
    pub topology: String,
    pub confidence: f64,
}

/// Maps a free-text specification to a topology.
pub trait TopologySelector {
    fn select(&self, specification: &str) -> TopologyChoice;
}

#[derive(Debug, thiserror::Error)]
pub enum SizingError {
    #[error("no sizing strategy for topology '{topology}'")]
    UnsupportedTopology { topology: String },
}

/// Computes initial component sizing for a topology.
///
/// Output keys must satisfy the topology's required-sizing schema; values
/// must be well-formed finite numbers.
pub trait Sizer {
    fn size(&self, topology: &str, constraints: &ConstraintMap) -> Result<SizingMap, SizingError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("no simulation model for topology '{topology}'")]
    UnsupportedTopology { topology: String },

    #[error("simulation of '{topology}' needs sizing parameter '{parameter}'")]
    MissingParameter {
        topology: String,
        parameter: &'static str,
    },
}

/// Estimates performance metrics for a sized topology.
pub trait Simulator {
    fn simulate(&self, topology: &str, sizing: &SizingMap) -> Result<MetricsMap, SimulationError>;
}
