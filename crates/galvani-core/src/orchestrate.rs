//! The design-convergence control loop.
//!
//! Bounded fixed-point iteration over select -> size -> validate ->
//! simulate -> refine. Any stage outcome other than its expected success
//! status aborts the whole run; only a `refined` outcome repeats the loop.
//! Convergence is not guaranteed, termination is.

use galvani_refine::{Refiner, RefinerConfig};
use galvani_state::{DesignStatus, DesignStore, StateUpdate};
use galvani_validate::{check_constraints_with, ValidatorConfig};

use crate::collaborators::{Simulator, Sizer, TopologySelector};
use crate::stages;

const DEFAULT_MAX_ITERATIONS: usize = 3;

/// Drives the full pipeline against a design store.
pub struct DesignLoop {
    selector: Box<dyn TopologySelector>,
    sizer: Box<dyn Sizer>,
    simulator: Box<dyn Simulator>,
    refiner: Refiner,
    validator: ValidatorConfig,
    max_iterations: usize,
}

impl DesignLoop {
    pub fn new(
        selector: Box<dyn TopologySelector>,
        sizer: Box<dyn Sizer>,
        simulator: Box<dyn Simulator>,
    ) -> Self {
        Self {
            selector,
            sizer,
            simulator,
            refiner: Refiner::default(),
            validator: ValidatorConfig::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_refiner(mut self, config: RefinerConfig) -> Self {
        self.refiner = Refiner::new(config);
        self
    }

    pub fn with_validator(mut self, config: ValidatorConfig) -> Self {
        self.validator = config;
        self
    }

    /// Run the loop to a terminal status.
    pub fn run(&self, store: &mut DesignStore) -> DesignStatus {
        for round in 1..=self.max_iterations {
            tracing::info!(round, "starting design round");

            stages::select_topology(store, self.selector.as_ref());
            if store.status() != DesignStatus::TopologySelected {
                return self.fail(store);
            }

            stages::compute_sizing(store, self.sizer.as_ref());
            if store.status() != DesignStatus::SizingComplete {
                return self.fail(store);
            }

            // Constraint violations are not retried inside this loop; only
            // refinement drives repetition.
            let report = check_constraints_with(store, &self.validator);
            if !report.passed {
                tracing::warn!(issues = report.issues.len(), "constraint validation failed");
                return self.fail(store);
            }

            stages::run_simulation(store, self.simulator.as_ref());
            if store.status() != DesignStatus::SimulationComplete {
                return self.fail(store);
            }

            self.refiner.refine(store);
            if store.status() == DesignStatus::Refined {
                tracing::info!(round, "sizing refined; re-running simulation");
                continue;
            }

            store.apply(StateUpdate::Status(DesignStatus::DesignValidated));
            tracing::info!(round, "design validated");
            return DesignStatus::DesignValidated;
        }

        store.apply(StateUpdate::Status(DesignStatus::DesignInvalidAfterRetries));
        tracing::warn!(
            max_iterations = self.max_iterations,
            "iteration cap reached without validation"
        );
        DesignStatus::DesignInvalidAfterRetries
    }

    fn fail(&self, store: &mut DesignStore) -> DesignStatus {
        store.apply(StateUpdate::Status(DesignStatus::OrchestrationFailed));
        DesignStatus::OrchestrationFailed
    }
}
