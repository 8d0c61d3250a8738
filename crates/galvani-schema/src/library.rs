//! Catalog of known analog topologies.
//!
//! Only a subset of the catalog has a registered requirement schema
//! ([`crate::template::CircuitTemplate`]); the rest exists so selection
//! results and summaries can name topologies the engine does not yet size.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Amplifier,
    Filter,
    Buffer,
    Bias,
    Opamp,
    Oscillator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

/// Static metadata for one topology.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TopologyInfo {
    pub key: &'static str,
    pub display_name: &'static str,
    pub category: Category,
    pub complexity: Complexity,
}

const CATALOG: &[TopologyInfo] = &[
    TopologyInfo {
        key: "rc_lowpass",
        display_name: "Single-Stage RC Low-Pass Filter",
        category: Category::Filter,
        complexity: Complexity::Low,
    },
    TopologyInfo {
        key: "common_source_res_load",
        display_name: "Common-Source Amplifier w/ Resistive Load",
        category: Category::Amplifier,
        complexity: Complexity::Low,
    },
    TopologyInfo {
        key: "diff_pair",
        display_name: "1-Stage Differential Amplifier",
        category: Category::Amplifier,
        complexity: Complexity::Medium,
    },
    TopologyInfo {
        key: "current_mirror",
        display_name: "Current Mirror",
        category: Category::Bias,
        complexity: Complexity::Low,
    },
    TopologyInfo {
        key: "common_drain",
        display_name: "Common-Drain Amplifier",
        category: Category::Buffer,
        complexity: Complexity::Low,
    },
    TopologyInfo {
        key: "common_gate",
        display_name: "Common-Gate Amplifier",
        category: Category::Amplifier,
        complexity: Complexity::Low,
    },
    TopologyInfo {
        key: "cascode_res_load",
        display_name: "Cascode w/ Resistive Load",
        category: Category::Amplifier,
        complexity: Complexity::Medium,
    },
    TopologyInfo {
        key: "two_stage_miller",
        display_name: "2-Stage Op-Amp w/ Miller Compensation",
        category: Category::Opamp,
        complexity: Complexity::High,
    },
    TopologyInfo {
        key: "lc_oscillator",
        display_name: "Cross-Coupled LC Oscillator",
        category: Category::Oscillator,
        complexity: Complexity::High,
    },
];

/// The full topology catalog.
pub fn catalog() -> &'static [TopologyInfo] {
    CATALOG
}

/// Look up catalog metadata by topology key.
pub fn lookup(key: &str) -> Option<&'static TopologyInfo> {
    CATALOG.iter().find(|info| info.key == key)
}
