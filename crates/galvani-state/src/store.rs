//! The shared design record and its audit ledger.
//!
//! Every stage reads the latest committed state through [`DesignStore::state`]
//! and writes back through [`DesignStore::apply`], so the history ledger stays
//! a total, replayable account of the run. The store itself validates nothing.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::report::{ConstraintReport, RefinementReport, SizingReport};
use crate::status::DesignStatus;
use crate::value::{ConstraintMap, MetricsMap, SizingMap};

/// One entry in the append-only history ledger.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub timestamp_ms: u64,
    pub event: String,
    pub data: serde_json::Value,
}

/// The single mutable record threaded through the pipeline.
///
/// Created once per design run and discarded when the run terminates.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DesignState {
    pub specification: Option<String>,
    pub selected_topology: Option<String>,
    pub topology_confidence: Option<f64>,
    pub constraints: Option<ConstraintMap>,
    pub sizing: Option<SizingMap>,
    pub simulation_metrics: Option<MetricsMap>,
    pub sizing_report: Option<SizingReport>,
    pub constraint_report: Option<ConstraintReport>,
    pub refinement_report: Option<RefinementReport>,
    pub status: DesignStatus,
    pub history: Vec<HistoryEntry>,
}

/// A single-field write against the design record.
///
/// The externally-tagged serde shape doubles as the `{key: value}` payload
/// recorded in the history ledger for each write.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateUpdate {
    Specification(String),
    SelectedTopology(String),
    TopologyConfidence(f64),
    Constraints(ConstraintMap),
    Sizing(SizingMap),
    SimulationMetrics(MetricsMap),
    SizingReport(SizingReport),
    ConstraintReport(ConstraintReport),
    RefinementReport(RefinementReport),
    Status(DesignStatus),
}

/// Pure ledger over [`DesignState`]: applies writes and appends history.
#[derive(Debug, Default)]
pub struct DesignStore {
    state: DesignState,
}

impl DesignStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one field write and append exactly one `write` history entry.
    pub fn apply(&mut self, update: StateUpdate) {
        let data = serde_json::to_value(&update).unwrap_or_default();
        match update {
            StateUpdate::Specification(v) => self.state.specification = Some(v),
            StateUpdate::SelectedTopology(v) => self.state.selected_topology = Some(v),
            StateUpdate::TopologyConfidence(v) => self.state.topology_confidence = Some(v),
            StateUpdate::Constraints(v) => self.state.constraints = Some(v),
            StateUpdate::Sizing(v) => self.state.sizing = Some(v),
            StateUpdate::SimulationMetrics(v) => self.state.simulation_metrics = Some(v),
            StateUpdate::SizingReport(v) => self.state.sizing_report = Some(v),
            StateUpdate::ConstraintReport(v) => self.state.constraint_report = Some(v),
            StateUpdate::RefinementReport(v) => self.state.refinement_report = Some(v),
            StateUpdate::Status(v) => self.state.status = v,
        }
        self.append("write", data);
    }

    /// Append a non-write event to the ledger without touching any field.
    pub fn record_event(&mut self, event: &str, data: serde_json::Value) {
        self.append(event, data);
    }

    /// The live record. Callers share it; nothing executes concurrently.
    pub fn state(&self) -> &DesignState {
        &self.state
    }

    pub fn status(&self) -> DesignStatus {
        self.state.status
    }

    fn append(&mut self, event: &str, data: serde_json::Value) {
        self.state.history.push(HistoryEntry {
            timestamp_ms: now_ms(),
            event: event.to_string(),
            data,
        });
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_sets_field_and_appends_one_entry() {
        let mut store = DesignStore::new();
        assert!(store.state().history.is_empty());

        store.apply(StateUpdate::Specification("1kHz lowpass".into()));
        assert_eq!(store.state().specification.as_deref(), Some("1kHz lowpass"));
        assert_eq!(store.state().history.len(), 1);

        store.apply(StateUpdate::Status(DesignStatus::TopologySelected));
        assert_eq!(store.status(), DesignStatus::TopologySelected);
        assert_eq!(store.state().history.len(), 2);
    }

    #[test]
    fn test_history_grows_one_to_one_with_writes() {
        let mut store = DesignStore::new();
        for i in 0..10 {
            store.apply(StateUpdate::TopologyConfidence(i as f64 / 10.0));
            assert_eq!(store.state().history.len(), i + 1);
        }
    }

    #[test]
    fn test_write_entry_carries_key_value_payload() {
        let mut store = DesignStore::new();
        store.apply(StateUpdate::SelectedTopology("rc_lowpass".into()));

        let entry = &store.state().history[0];
        assert_eq!(entry.event, "write");
        assert_eq!(
            entry.data,
            serde_json::json!({ "selected_topology": "rc_lowpass" })
        );
    }

    #[test]
    fn test_record_event_does_not_touch_fields() {
        let mut store = DesignStore::new();
        store.record_event(
            "topology_selected",
            serde_json::json!({ "topology": "diff_pair", "confidence": 0.88 }),
        );

        assert!(store.state().selected_topology.is_none());
        assert_eq!(store.state().history.len(), 1);
        assert_eq!(store.state().history[0].event, "topology_selected");
    }

    #[test]
    fn test_sizing_write_replaces_whole_map() {
        let mut store = DesignStore::new();
        let mut sizing = SizingMap::new();
        sizing.insert("R_ohm".into(), 10_000.0);
        sizing.insert("C_f".into(), 10e-9);
        store.apply(StateUpdate::Sizing(sizing.clone()));

        sizing.insert("R_ohm".into(), 15_000.0);
        store.apply(StateUpdate::Sizing(sizing));

        let current = store.state().sizing.as_ref().unwrap();
        assert_eq!(current["R_ohm"], 15_000.0);
        assert_eq!(store.state().history.len(), 2);
    }
}
