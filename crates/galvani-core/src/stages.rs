//! Stage adapters between the collaborators and the design store.
//!
//! Each stage reads the latest committed state, invokes its collaborator,
//! and writes results plus an outcome status back through the store. The
//! orchestrator only ever looks at the status.

use galvani_state::{DesignStatus, DesignStore, SizingReport, StateUpdate};

use crate::collaborators::{Simulator, Sizer, TopologySelector};

/// Select a topology from the recorded specification.
pub fn select_topology(store: &mut DesignStore, selector: &dyn TopologySelector) {
    let Some(specification) = store.state().specification.clone() else {
        store.apply(StateUpdate::Status(DesignStatus::NoSpecification));
        return;
    };

    let choice = selector.select(&specification);
    tracing::debug!(
        topology = %choice.topology,
        confidence = choice.confidence,
        "topology selected"
    );

    store.apply(StateUpdate::SelectedTopology(choice.topology.clone()));
    store.apply(StateUpdate::TopologyConfidence(choice.confidence));
    store.apply(StateUpdate::Status(DesignStatus::TopologySelected));
    store.record_event(
        "topology_selected",
        serde_json::json!({
            "topology": choice.topology,
            "confidence": choice.confidence,
        }),
    );
}

/// Compute initial sizing for the selected topology.
pub fn compute_sizing(store: &mut DesignStore, sizer: &dyn Sizer) {
    let Some(topology) = store.state().selected_topology.clone() else {
        store.apply(StateUpdate::SizingReport(SizingReport {
            success: false,
            notes: vec!["no topology selected".to_string()],
        }));
        store.apply(StateUpdate::Status(DesignStatus::SizingFailed));
        return;
    };
    let constraints = store.state().constraints.clone().unwrap_or_default();

    match sizer.size(&topology, &constraints) {
        Ok(sizing) => {
            tracing::debug!(topology = %topology, parameters = sizing.len(), "sizing computed");
            store.apply(StateUpdate::Sizing(sizing));
            store.apply(StateUpdate::SizingReport(SizingReport {
                success: true,
                notes: vec![format!("initial sizing computed for '{topology}'")],
            }));
            store.apply(StateUpdate::Status(DesignStatus::SizingComplete));
        }
        Err(err) => {
            tracing::warn!(topology = %topology, error = %err, "sizing failed");
            store.apply(StateUpdate::SizingReport(SizingReport {
                success: false,
                notes: vec![err.to_string()],
            }));
            store.apply(StateUpdate::Status(DesignStatus::SizingFailed));
        }
    }
}

/// Estimate performance metrics for the current sizing.
pub fn run_simulation(store: &mut DesignStore, simulator: &dyn Simulator) {
    let topology = store.state().selected_topology.clone().unwrap_or_default();
    let sizing = store.state().sizing.clone().unwrap_or_default();

    match simulator.simulate(&topology, &sizing) {
        Ok(metrics) => {
            tracing::debug!(topology = %topology, metrics = metrics.len(), "simulation complete");
            store.apply(StateUpdate::SimulationMetrics(metrics));
            store.apply(StateUpdate::Status(DesignStatus::SimulationComplete));
        }
        Err(err) => {
            tracing::warn!(topology = %topology, error = %err, "simulation failed");
            store.record_event("simulation_error", serde_json::json!(err.to_string()));
            store.apply(StateUpdate::Status(DesignStatus::SimulationFailed));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnalyticSimulator, FirstOrderSizer, KeywordSelector};
    use galvani_state::{ConstraintMap, Value};

    #[test]
    fn test_missing_specification_stops_the_topology_stage() {
        let mut store = DesignStore::new();
        select_topology(&mut store, &KeywordSelector);
        assert_eq!(store.status(), DesignStatus::NoSpecification);
        assert!(store.state().selected_topology.is_none());
    }

    #[test]
    fn test_topology_stage_records_choice_and_event() {
        let mut store = DesignStore::new();
        store.apply(StateUpdate::Specification("1kHz lowpass filter".into()));
        select_topology(&mut store, &KeywordSelector);

        assert_eq!(store.status(), DesignStatus::TopologySelected);
        assert_eq!(store.state().selected_topology.as_deref(), Some("rc_lowpass"));
        assert_eq!(store.state().topology_confidence, Some(0.92));
        assert!(store
            .state()
            .history
            .iter()
            .any(|entry| entry.event == "topology_selected"));
    }

    #[test]
    fn test_sizing_stage_success() {
        let mut store = DesignStore::new();
        let mut constraints = ConstraintMap::new();
        constraints.insert("target_fc_hz".into(), Value::Num(1000.0));
        store.apply(StateUpdate::Constraints(constraints));
        store.apply(StateUpdate::SelectedTopology("rc_lowpass".into()));

        compute_sizing(&mut store, &FirstOrderSizer);
        assert_eq!(store.status(), DesignStatus::SizingComplete);
        assert!(store.state().sizing_report.as_ref().unwrap().success);
        assert!(store.state().sizing.as_ref().unwrap().contains_key("R_ohm"));
    }

    #[test]
    fn test_sizing_stage_unsupported_topology() {
        let mut store = DesignStore::new();
        store.apply(StateUpdate::SelectedTopology("bandgap_reference".into()));

        compute_sizing(&mut store, &FirstOrderSizer);
        assert_eq!(store.status(), DesignStatus::SizingFailed);
        let report = store.state().sizing_report.as_ref().unwrap();
        assert!(!report.success);
        assert!(report.notes[0].contains("bandgap_reference"));
    }

    #[test]
    fn test_simulation_stage_success_and_failure() {
        let mut store = DesignStore::new();
        store.apply(StateUpdate::SelectedTopology("rc_lowpass".into()));
        let mut sizing = galvani_state::SizingMap::new();
        sizing.insert("R_ohm".into(), 10_000.0);
        sizing.insert("C_f".into(), 10e-9);
        store.apply(StateUpdate::Sizing(sizing));

        run_simulation(&mut store, &AnalyticSimulator);
        assert_eq!(store.status(), DesignStatus::SimulationComplete);
        assert!(store
            .state()
            .simulation_metrics
            .as_ref()
            .unwrap()
            .contains_key("fc_hz"));

        let mut store = DesignStore::new();
        store.apply(StateUpdate::SelectedTopology("lc_oscillator".into()));
        run_simulation(&mut store, &AnalyticSimulator);
        assert_eq!(store.status(), DesignStatus::SimulationFailed);
    }
}
