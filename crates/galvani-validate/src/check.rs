//! Constraint validation.
//!
//! Checks a (topology, constraints, sizing) triple against the resolved
//! template's requirement schema plus physical sanity checks. All applicable
//! checks run; nothing short-circuits. Failures accumulate into the report,
//! never into panics or errors.

use std::f64::consts::PI;

use galvani_schema::CircuitTemplate;
use galvani_state::{
    ConstraintMap, ConstraintReport, DesignStatus, DesignStore, SizingMap, StateUpdate, Value,
};

/// Tunable thresholds for the sanity checks.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Relative cutoff mismatch above which the RC sizing is flagged risky.
    pub cutoff_mismatch_tolerance: f64,
    /// Gain above which a single-stage topology is considered unrealistic.
    pub single_stage_gain_ceiling_db: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            cutoff_mismatch_tolerance: 0.35,
            single_stage_gain_ceiling_db: 45.0,
        }
    }
}

/// Validate the current design state with default thresholds.
pub fn check_constraints(store: &mut DesignStore) -> ConstraintReport {
    check_constraints_with(store, &ValidatorConfig::default())
}

/// Validate the current design state.
///
/// Writes the report and the resulting status (`constraints_ok` or
/// `constraints_failed`) back to the store before returning.
pub fn check_constraints_with(store: &mut DesignStore, config: &ValidatorConfig) -> ConstraintReport {
    let state = store.state();

    // Precondition sweep: a missing input is an immediate failure with a
    // report that names every absent field.
    let mut missing = Vec::new();
    if state.constraints.is_none() {
        missing.push("missing constraints".to_string());
    }
    if state.selected_topology.is_none() {
        missing.push("missing selected topology".to_string());
    }
    if state.sizing.is_none() {
        missing.push("missing sizing".to_string());
    }
    if !missing.is_empty() {
        let report = ConstraintReport {
            issues: missing,
            ..ConstraintReport::default()
        };
        return finish(store, report);
    }

    let constraints = state.constraints.clone().unwrap_or_default();
    let sizing = state.sizing.clone().unwrap_or_default();
    let topology = state.selected_topology.clone().unwrap_or_default();

    // Circuit type: prefer the explicit constraint, fall back to the
    // selected topology.
    let circuit_type = constraints
        .get("circuit_type")
        .and_then(Value::as_text)
        .map(str::to_string)
        .unwrap_or_else(|| topology.clone());

    let Some(template) = CircuitTemplate::from_key(&circuit_type) else {
        // No schema registered. The run may still proceed; refinement will
        // skip this topology on its own.
        let report = ConstraintReport {
            passed: true,
            warnings: vec![format!(
                "no requirement schema registered for circuit type '{circuit_type}'"
            )],
            checked_topology: circuit_type,
            completeness_score: 1.0,
            ..ConstraintReport::default()
        };
        return finish(store, report);
    };

    let mut issues = Vec::new();
    let mut warnings = Vec::new();

    let required_constraints = template.required_constraints();
    let required_sizing = template.required_sizing();

    for key in required_constraints {
        if !constraints.contains_key(*key) {
            issues.push(format!("missing required constraint '{key}'"));
        }
    }

    for key in required_sizing {
        if !sizing.contains_key(*key) {
            issues.push(format!("missing required sizing parameter '{key}'"));
        }
    }

    for key in template.positive_constraints() {
        if let Some(value) = constraints.get(*key).and_then(Value::as_num) {
            if value <= 0.0 {
                issues.push(format!("constraint '{key}' must be > 0"));
            }
        }
    }

    for key in template.positive_sizing() {
        if let Some(value) = sizing.get(*key) {
            if !value.is_finite() {
                issues.push(format!("sizing parameter '{key}' is not a finite number"));
            } else if *value <= 0.0 {
                issues.push(format!("sizing parameter '{key}' must be > 0"));
            }
        }
    }

    sanity_checks(template, &constraints, &sizing, config, &mut issues, &mut warnings);

    let present = required_constraints
        .iter()
        .filter(|key| constraints.contains_key(**key))
        .count();
    let completeness_score = if required_constraints.is_empty() {
        1.0
    } else {
        present as f64 / required_constraints.len() as f64
    };

    let report = ConstraintReport {
        passed: issues.is_empty(),
        issues,
        warnings,
        checked_topology: circuit_type,
        completeness_score,
        required_constraints: required_constraints.iter().map(|s| s.to_string()).collect(),
        required_sizing: required_sizing.iter().map(|s| s.to_string()).collect(),
    };
    finish(store, report)
}

/// Template-specific physical sanity checks, each independent of the others.
fn sanity_checks(
    template: CircuitTemplate,
    constraints: &ConstraintMap,
    sizing: &SizingMap,
    config: &ValidatorConfig,
    issues: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let num = |key: &str| constraints.get(key).and_then(Value::as_num);

    match template {
        CircuitTemplate::RcLowpass => {
            // First-order cutoff estimate against the target. A mismatch is
            // risky but recoverable through refinement, so it is a warning.
            if let (Some(fc), Some(r), Some(c)) =
                (num("target_fc_hz"), sizing.get("R_ohm"), sizing.get("C_f"))
            {
                if fc > 0.0 && *r > 0.0 && *c > 0.0 {
                    let fc_est = 1.0 / (2.0 * PI * r * c);
                    let rel_err = (fc_est - fc).abs() / fc;
                    if rel_err > config.cutoff_mismatch_tolerance {
                        warnings.push(format!(
                            "estimated cutoff {fc_est:.1} Hz deviates {:.0}% from target {fc:.1} Hz",
                            rel_err * 100.0
                        ));
                    }
                }
            }
        }
        CircuitTemplate::CommonSourceResLoad => {
            // A breached power budget is the most damaging failure mode; the
            // estimate going over the limit is a hard failure, unlike the RC
            // cutoff mismatch above.
            if let (Some(vdd), Some(limit), Some(i_bias)) =
                (num("supply_v"), num("power_limit_mw"), sizing.get("I_bias"))
            {
                let p_est_mw = 1000.0 * vdd * i_bias;
                // Budget-derived bias points land exactly on the limit, so
                // leave rounding headroom in the comparison.
                if p_est_mw > limit * (1.0 + 1e-9) {
                    issues.push(format!(
                        "estimated power {p_est_mw:.3} mW exceeds limit {limit:.3} mW"
                    ));
                }
            }
            if let Some(gain) = num("target_gain_db") {
                if gain > config.single_stage_gain_ceiling_db {
                    warnings.push(format!(
                        "target gain {gain:.1} dB is unrealistic for a single stage; consider a multi-stage topology"
                    ));
                }
            }
        }
        CircuitTemplate::DiffPair => {
            if let Some(i_tail) = sizing.get("I_tail") {
                if *i_tail <= 0.0 {
                    issues.push("tail current 'I_tail' must be > 0".to_string());
                }
            }
        }
        CircuitTemplate::CurrentMirror => {
            if let Some(accuracy) = num("accuracy_pct") {
                if accuracy <= 0.0 {
                    issues.push("constraint 'accuracy_pct' must be > 0".to_string());
                }
            }
        }
    }
}

fn finish(store: &mut DesignStore, report: ConstraintReport) -> ConstraintReport {
    let status = if report.passed {
        DesignStatus::ConstraintsOk
    } else {
        DesignStatus::ConstraintsFailed
    };
    store.apply(StateUpdate::ConstraintReport(report.clone()));
    store.apply(StateUpdate::Status(status));
    report
}
