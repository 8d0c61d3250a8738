//! Closed-form first-order sizing.
//!
//! Deterministic textbook formulas per topology: square-law MOS with a
//! fixed overdrive, bias currents derived from the power budget, nominal
//! passive values. Refinement is what moves these toward the targets.

use std::f64::consts::PI;

use galvani_schema::CircuitTemplate;
use galvani_state::{ConstraintMap, SizingMap, Value};

use crate::collaborators::{Sizer, SizingError};

/// Nominal filter capacitance picked before R is derived.
const NOMINAL_C_F: f64 = 10e-9;
/// Square-law overdrive voltage assumed for all transistors.
const VOV_V: f64 = 0.2;
/// Process transconductance parameter k' (A/V^2).
const KPRIME: f64 = 1e-3;
/// Minimum channel length for the assumed 180 nm process.
const L_M: f64 = 180e-9;
/// Baseline resistive load.
const RD_BASELINE_OHM: f64 = 5000.0;

#[derive(Debug, Default)]
pub struct FirstOrderSizer;

impl Sizer for FirstOrderSizer {
    fn size(&self, topology: &str, constraints: &ConstraintMap) -> Result<SizingMap, SizingError> {
        let template = CircuitTemplate::from_key(topology).ok_or_else(|| {
            SizingError::UnsupportedTopology {
                topology: topology.to_string(),
            }
        })?;

        let num = |key: &str, default: f64| {
            constraints.get(key).and_then(Value::as_num).unwrap_or(default)
        };

        let mut sizing = SizingMap::new();
        match template {
            CircuitTemplate::RcLowpass => {
                let fc = num("target_fc_hz", 1e3);
                sizing.insert("C_f".into(), NOMINAL_C_F);
                sizing.insert("R_ohm".into(), 1.0 / (2.0 * PI * fc * NOMINAL_C_F));
            }
            CircuitTemplate::CommonSourceResLoad => {
                let vdd = num("supply_v", 1.8);
                let power_limit_mw = num("power_limit_mw", 2.0);

                // Spend the whole power budget on the bias current, then
                // size W/L for the assumed overdrive.
                let i_bias = (power_limit_mw / 1000.0) / vdd;
                let w_over_l = 2.0 * i_bias / (KPRIME * VOV_V * VOV_V);

                sizing.insert("W_m".into(), w_over_l * L_M);
                sizing.insert("L_m".into(), L_M);
                sizing.insert("R_D".into(), RD_BASELINE_OHM);
                sizing.insert("I_bias".into(), i_bias);
            }
            CircuitTemplate::DiffPair => {
                let vdd = num("supply_v", 1.8);
                let power_limit_mw = num("power_limit_mw", 2.0);

                let i_tail = (power_limit_mw / 1000.0) / vdd;
                // Each input device carries half the tail current.
                let w_over_l = 2.0 * (i_tail / 2.0) / (KPRIME * VOV_V * VOV_V);

                sizing.insert("W_in".into(), w_over_l * L_M);
                sizing.insert("L_in".into(), L_M);
                sizing.insert("W_tail".into(), w_over_l * L_M);
                sizing.insert("L_tail".into(), L_M);
                sizing.insert("I_tail".into(), i_tail);
                sizing.insert("R_load".into(), RD_BASELINE_OHM);
            }
            CircuitTemplate::CurrentMirror => {
                let i_out = num("target_iout_a", 100e-6);
                let w_over_l = 2.0 * i_out / (KPRIME * VOV_V * VOV_V);

                sizing.insert("W_ref".into(), w_over_l * L_M);
                sizing.insert("L_ref".into(), L_M);
                sizing.insert("W_out".into(), w_over_l * L_M);
                sizing.insert("L_out".into(), L_M);
                sizing.insert("I_ref".into(), i_out);
            }
        }
        Ok(sizing)
    }
}
