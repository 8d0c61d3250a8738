//! Analytic performance estimation.
//!
//! First-order approximations stand in for a real circuit simulator: RC
//! cutoff from the time constant, square-law transconductance, resistive
//! load gain, a single dominant pole from a fixed load capacitance, and
//! static power at a nominal supply.

use std::f64::consts::PI;

use galvani_schema::CircuitTemplate;
use galvani_state::{MetricsMap, SizingMap};

use crate::collaborators::{SimulationError, Simulator};

/// Supply assumed when estimating static power.
const NOMINAL_SUPPLY_V: f64 = 1.8;
/// Lumped load capacitance at the output node.
const LOAD_CAP_F: f64 = 100e-15;
/// Process transconductance parameter k' (A/V^2), matching the sizer.
const KPRIME: f64 = 1e-3;

#[derive(Debug, Default)]
pub struct AnalyticSimulator;

impl Simulator for AnalyticSimulator {
    fn simulate(&self, topology: &str, sizing: &SizingMap) -> Result<MetricsMap, SimulationError> {
        let template = CircuitTemplate::from_key(topology).ok_or_else(|| {
            SimulationError::UnsupportedTopology {
                topology: topology.to_string(),
            }
        })?;

        let param = |key: &'static str| {
            sizing
                .get(key)
                .copied()
                .ok_or_else(|| SimulationError::MissingParameter {
                    topology: topology.to_string(),
                    parameter: key,
                })
        };

        let mut metrics = MetricsMap::new();
        match template {
            CircuitTemplate::RcLowpass => {
                let r = param("R_ohm")?;
                let c = param("C_f")?;
                metrics.insert("fc_hz".into(), 1.0 / (2.0 * PI * r * c));
                metrics.insert("gain_db".into(), 0.0);
                metrics.insert("power_mw".into(), 0.0);
            }
            CircuitTemplate::CommonSourceResLoad => {
                let w = param("W_m")?;
                let l = param("L_m")?;
                let i_bias = param("I_bias")?;
                let r_d = param("R_D")?;

                let gm = square_law_gm(w / l, i_bias);
                metrics.insert("gain_db".into(), gain_db(gm * r_d));
                metrics.insert("bandwidth_hz".into(), dominant_pole_hz(r_d));
                metrics.insert("power_mw".into(), 1000.0 * NOMINAL_SUPPLY_V * i_bias);
            }
            CircuitTemplate::DiffPair => {
                let w = param("W_in")?;
                let l = param("L_in")?;
                let i_tail = param("I_tail")?;
                let r_load = param("R_load")?;

                let gm = square_law_gm(w / l, i_tail / 2.0);
                metrics.insert("gain_db".into(), gain_db(gm * r_load));
                metrics.insert("bandwidth_hz".into(), dominant_pole_hz(r_load));
                metrics.insert("power_mw".into(), 1000.0 * NOMINAL_SUPPLY_V * i_tail);
            }
            CircuitTemplate::CurrentMirror => {
                let w_ref = param("W_ref")?;
                let w_out = param("W_out")?;
                let i_ref = param("I_ref")?;

                let ratio = if w_ref > 0.0 { w_out / w_ref } else { 0.0 };
                metrics.insert("iout_a".into(), i_ref * ratio);
                metrics.insert("accuracy_pct".into(), (100.0 - 100.0 * (1.0 - ratio).abs()).max(0.0));
                metrics.insert(
                    "power_mw".into(),
                    1000.0 * NOMINAL_SUPPLY_V * i_ref * (1.0 + ratio),
                );
            }
        }
        Ok(metrics)
    }
}

/// Square-law transconductance: gm = sqrt(2 k' (W/L) I_D).
fn square_law_gm(w_over_l: f64, drain_current: f64) -> f64 {
    (2.0 * KPRIME * w_over_l * drain_current).max(0.0).sqrt()
}

fn gain_db(linear: f64) -> f64 {
    if linear > 0.0 {
        20.0 * linear.log10()
    } else {
        f64::NEG_INFINITY
    }
}

fn dominant_pole_hz(load_res: f64) -> f64 {
    1.0 / (2.0 * PI * load_res * LOAD_CAP_F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rc_cutoff_estimate() {
        let mut sizing = SizingMap::new();
        sizing.insert("R_ohm".into(), 10_000.0);
        sizing.insert("C_f".into(), 10e-9);

        let metrics = AnalyticSimulator.simulate("rc_lowpass", &sizing).unwrap();
        assert!((metrics["fc_hz"] - 1591.5494).abs() < 1e-3);
        assert_eq!(metrics["gain_db"], 0.0);
    }

    #[test]
    fn test_common_source_gain_and_power() {
        // W/L = 55.55, I = 1.111 mA (the sizer's 2 mW / 1.8 V point):
        // gm = sqrt(2e-3 * 55.55 * 1.111e-3) ~ 11.11 mS, gm*RD ~ 55.6.
        let mut sizing = SizingMap::new();
        let i_bias = 2.0 / 1000.0 / 1.8;
        let w_over_l = 2.0 * i_bias / (1e-3 * 0.04);
        sizing.insert("W_m".into(), w_over_l * 180e-9);
        sizing.insert("L_m".into(), 180e-9);
        sizing.insert("R_D".into(), 5000.0);
        sizing.insert("I_bias".into(), i_bias);

        let metrics = AnalyticSimulator
            .simulate("common_source_res_load", &sizing)
            .unwrap();
        assert!((metrics["gain_db"] - 34.9).abs() < 0.1);
        assert!((metrics["power_mw"] - 2.0).abs() < 1e-9);
        assert!(metrics["bandwidth_hz"] > 1e8);
    }

    #[test]
    fn test_matched_mirror_is_fully_accurate() {
        let mut sizing = SizingMap::new();
        for key in ["W_ref", "W_out"] {
            sizing.insert(key.into(), 10e-6);
        }
        sizing.insert("I_ref".into(), 100e-6);

        let metrics = AnalyticSimulator.simulate("current_mirror", &sizing).unwrap();
        assert_eq!(metrics["accuracy_pct"], 100.0);
        assert!((metrics["iout_a"] - 100e-6).abs() < 1e-12);
    }

    #[test]
    fn test_missing_parameter_is_reported_by_name() {
        let err = AnalyticSimulator
            .simulate("rc_lowpass", &SizingMap::new())
            .unwrap_err();
        assert!(err.to_string().contains("R_ohm"));
    }

    #[test]
    fn test_unsupported_topology_is_an_error() {
        let err = AnalyticSimulator
            .simulate("lc_oscillator", &SizingMap::new())
            .unwrap_err();
        assert!(matches!(
            err,
            SimulationError::UnsupportedTopology { .. }
        ));
    }
}
