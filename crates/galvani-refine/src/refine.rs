//! Feedback-directed sizing refinement.
//!
//! Nudges sizing toward constraint targets using the latest simulated
//! metrics, one strategy per template. Every correction ratio passes through
//! `clamp_abs` and then `clamp_step`, so no single iteration can move a
//! parameter by more than the configured step bounds.

use std::collections::BTreeMap;

use galvani_schema::CircuitTemplate;
use galvani_state::{
    ConstraintMap, DesignStatus, DesignStore, MetricsMap, NextAction, RefinementReport,
    SizingChange, SizingMap, StateUpdate, Value,
};

/// Step bounds shared by all refinement strategies.
#[derive(Debug, Clone)]
pub struct RefinerConfig {
    /// Largest allowed per-iteration multiplicative increase.
    pub max_step_up: f64,
    /// Smallest allowed per-iteration multiplicative decrease.
    pub max_step_down: f64,
    /// Absolute floor on any computed correction ratio.
    pub min_factor: f64,
    /// Absolute ceiling on any computed correction ratio.
    pub max_factor: f64,
}

impl Default for RefinerConfig {
    fn default() -> Self {
        Self {
            max_step_up: 1.5,
            max_step_down: 0.7,
            min_factor: 0.2,
            max_factor: 5.0,
        }
    }
}

/// Proposes bounded, topology-specific sizing adjustments.
#[derive(Debug, Default)]
pub struct Refiner {
    config: RefinerConfig,
}

impl Refiner {
    pub fn new(config: RefinerConfig) -> Self {
        Self { config }
    }

    /// Run one refinement pass against the current state.
    ///
    /// Writes the mutated sizing (if any), the report, and the resulting
    /// status back to the store before returning.
    pub fn refine(&self, store: &mut DesignStore) -> RefinementReport {
        let state = store.state();
        let constraints = state.constraints.clone().unwrap_or_default();
        let sizing = state.sizing.clone().unwrap_or_default();
        let metrics = state.simulation_metrics.clone().unwrap_or_default();

        let topology = state
            .selected_topology
            .clone()
            .or_else(|| {
                constraints
                    .get("circuit_type")
                    .and_then(Value::as_text)
                    .map(str::to_string)
            });
        let Some(topology) = topology else {
            return self.finish(
                store,
                RefinementReport::stop("no topology resolved"),
                DesignStatus::RefinementSkipped,
            );
        };

        match CircuitTemplate::from_key(&topology) {
            Some(CircuitTemplate::RcLowpass) => {
                self.refine_rc_lowpass(store, &constraints, sizing, &metrics)
            }
            Some(CircuitTemplate::CommonSourceResLoad) => {
                self.refine_common_source(store, &constraints, sizing, &metrics)
            }
            _ => self.finish(
                store,
                RefinementReport::stop(format!(
                    "no refinement strategy for topology '{topology}'"
                )),
                DesignStatus::RefinementSkipped,
            ),
        }
    }

    /// Cap a factor's per-iteration step relative to 1.0.
    fn clamp_step(&self, factor: f64) -> f64 {
        if factor > 1.0 {
            factor.min(self.config.max_step_up)
        } else {
            factor.max(self.config.max_step_down)
        }
    }

    /// Clip a factor's absolute magnitude before step-clamping.
    fn clamp_abs(&self, factor: f64) -> f64 {
        factor.clamp(self.config.min_factor, self.config.max_factor)
    }

    /// RC lowpass: scale R by the clamped fc_sim/fc_target ratio.
    ///
    /// fc is proportional to 1/(R*C), so scaling R by the ratio moves the
    /// next simulated cutoff toward the target. One step deliberately does
    /// not have to land on target; under-correcting prevents oscillation.
    fn refine_rc_lowpass(
        &self,
        store: &mut DesignStore,
        constraints: &ConstraintMap,
        mut sizing: SizingMap,
        metrics: &MetricsMap,
    ) -> RefinementReport {
        let Some(fc_target) = constraints.get("target_fc_hz").and_then(Value::as_num) else {
            return self.finish(
                store,
                RefinementReport::stop("missing target_fc_hz constraint"),
                DesignStatus::RefinementFailed,
            );
        };
        let Some(fc_sim) = metrics.get("fc_hz").copied() else {
            return self.finish(
                store,
                RefinementReport::stop("missing simulated fc_hz (run simulation first)"),
                DesignStatus::RefinementFailed,
            );
        };

        let r = sizing.get("R_ohm").copied().unwrap_or(0.0);
        let c = sizing.get("C_f").copied().unwrap_or(0.0);
        if r <= 0.0 || c <= 0.0 {
            return self.finish(
                store,
                RefinementReport::stop("invalid R_ohm or C_f in sizing"),
                DesignStatus::RefinementFailed,
            );
        }

        let ratio = fc_sim / fc_target;
        if !ratio.is_finite() || ratio <= 0.0 {
            return self.finish(
                store,
                RefinementReport::stop("non-positive cutoff ratio"),
                DesignStatus::RefinementFailed,
            );
        }

        let factor = self.clamp_step(self.clamp_abs(ratio));
        let new_r = r * factor;
        sizing.insert("R_ohm".to_string(), new_r);
        store.apply(StateUpdate::Sizing(sizing));

        let mut changes = BTreeMap::new();
        changes.insert(
            "R_ohm".to_string(),
            SizingChange {
                old: r,
                new: new_r,
                factor,
            },
        );
        let report = RefinementReport {
            changed: true,
            changes,
            notes: vec![format!(
                "adjusted R to move cutoff toward target: fc_sim={fc_sim:.3e} Hz, target={fc_target:.3e} Hz"
            )],
            next_action: NextAction::RerunSimulation,
        };
        self.finish(store, report, DesignStatus::Refined)
    }

    /// Common source with resistive load: three ordered, independent
    /// corrections. Power first (the budget is a hard ceiling), then gain
    /// within a +-1 dB dead-band, then bandwidth as a secondary trade-off.
    fn refine_common_source(
        &self,
        store: &mut DesignStore,
        constraints: &ConstraintMap,
        mut sizing: SizingMap,
        metrics: &MetricsMap,
    ) -> RefinementReport {
        let num = |key: &str| constraints.get(key).and_then(Value::as_num);

        let (Some(w), Some(i_bias), Some(r_d)) = (
            sizing.get("W_m").copied(),
            sizing.get("I_bias").copied(),
            sizing.get("R_D").copied(),
        ) else {
            return self.finish(
                store,
                RefinementReport::stop("missing sizing keys (W_m, I_bias, R_D)"),
                DesignStatus::RefinementFailed,
            );
        };

        let mut changes = BTreeMap::new();
        let mut notes = Vec::new();
        let apply = |sizing: &mut SizingMap,
                     changes: &mut BTreeMap<String, SizingChange>,
                     notes: &mut Vec<String>,
                     key: &str,
                     old: f64,
                     new: f64,
                     why: String| {
            sizing.insert(key.to_string(), new);
            changes.insert(
                key.to_string(),
                SizingChange {
                    old,
                    new,
                    factor: if old != 0.0 { new / old } else { 0.0 },
                },
            );
            notes.push(why);
        };

        // 1) Power ceiling. Reduce bias current before touching anything
        // else; a breached budget invalidates the whole design.
        if let (Some(limit), Some(power)) = (num("power_limit_mw"), metrics.get("power_mw")) {
            // Rounding headroom: budget-derived bias simulates exactly at
            // the limit.
            if *power > limit * (1.0 + 1e-9) {
                let factor = self.clamp_step(self.clamp_abs(limit / power));
                let new_i = (i_bias * factor).max(1e-12);
                apply(
                    &mut sizing,
                    &mut changes,
                    &mut notes,
                    "I_bias",
                    i_bias,
                    new_i,
                    format!(
                        "power too high: {power:.3} mW > {limit:.3} mW limit; reduced I_bias"
                    ),
                );
            }
        }

        // 2) Gain. Width moves transconductance roughly linearly in this
        // first-order model; step size scales with the dB error, capped.
        if let (Some(target_gain), Some(gain)) = (num("target_gain_db"), metrics.get("gain_db")) {
            let gain_err_db = target_gain - gain;
            if gain_err_db > 1.0 {
                let step = self.clamp_step(1.0 + (gain_err_db / 20.0).min(0.5));
                let new_w = w * step;
                apply(
                    &mut sizing,
                    &mut changes,
                    &mut notes,
                    "W_m",
                    w,
                    new_w,
                    format!(
                        "gain low: {gain:.2} dB vs target {target_gain:.2} dB; increased W_m"
                    ),
                );
            } else if gain_err_db < -1.0 {
                let step = self.clamp_step(1.0 - ((-gain_err_db) / 30.0).min(0.3));
                let new_w = (w * step).max(1e-9);
                apply(
                    &mut sizing,
                    &mut changes,
                    &mut notes,
                    "W_m",
                    w,
                    new_w,
                    format!(
                        "gain high: {gain:.2} dB vs target {target_gain:.2} dB; decreased W_m"
                    ),
                );
            }
        }

        // 3) Bandwidth. Lowering the load resistance raises the dominant
        // pole at some gain cost; accepted after gain correction.
        if let (Some(target_bw), Some(bw)) = (num("target_bw_hz"), metrics.get("bandwidth_hz")) {
            if target_bw > 0.0 && bw / target_bw < 0.8 {
                let step = self.clamp_step(0.85);
                let new_rd = (r_d * step).max(1e-3);
                apply(
                    &mut sizing,
                    &mut changes,
                    &mut notes,
                    "R_D",
                    r_d,
                    new_rd,
                    format!(
                        "bandwidth low: {bw:.3e} Hz vs target {target_bw:.3e} Hz; reduced R_D"
                    ),
                );
            }
        }

        let changed = !changes.is_empty();
        if changed {
            store.apply(StateUpdate::Sizing(sizing));
        } else {
            notes.push("no refinement applied; metrics already within targets".to_string());
        }

        let report = RefinementReport {
            changed,
            changes,
            notes,
            next_action: if changed {
                NextAction::RerunSimulation
            } else {
                NextAction::Stop
            },
        };
        let status = if changed {
            DesignStatus::Refined
        } else {
            DesignStatus::RefinementNoChange
        };
        self.finish(store, report, status)
    }

    fn finish(
        &self,
        store: &mut DesignStore,
        report: RefinementReport,
        status: DesignStatus,
    ) -> RefinementReport {
        store.apply(StateUpdate::RefinementReport(report.clone()));
        store.apply(StateUpdate::Status(status));
        report
    }
}
