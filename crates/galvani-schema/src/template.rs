use serde::{Deserialize, Serialize};

/// Closed set of circuit templates with a registered requirement schema.
///
/// Each template fixes which constraint keys the user must supply, which
/// sizing parameters a sizer must produce, and which of those are only
/// meaningful when strictly positive. Resolving by variant instead of by
/// free-form key strings removes the silent-typo failure mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitTemplate {
    RcLowpass,
    CommonSourceResLoad,
    DiffPair,
    CurrentMirror,
}

impl CircuitTemplate {
    /// The canonical key used in constraint maps and topology selection.
    pub fn key(&self) -> &'static str {
        match self {
            CircuitTemplate::RcLowpass => "rc_lowpass",
            CircuitTemplate::CommonSourceResLoad => "common_source_res_load",
            CircuitTemplate::DiffPair => "diff_pair",
            CircuitTemplate::CurrentMirror => "current_mirror",
        }
    }

    /// Look up a template by its canonical key.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "rc_lowpass" => Some(CircuitTemplate::RcLowpass),
            "common_source_res_load" => Some(CircuitTemplate::CommonSourceResLoad),
            "diff_pair" => Some(CircuitTemplate::DiffPair),
            "current_mirror" => Some(CircuitTemplate::CurrentMirror),
            _ => None,
        }
    }

    /// Constraint keys that must be present for validation to pass.
    pub fn required_constraints(&self) -> &'static [&'static str] {
        match self {
            CircuitTemplate::RcLowpass => &["target_fc_hz"],
            CircuitTemplate::CommonSourceResLoad => {
                &["supply_v", "target_gain_db", "target_bw_hz", "power_limit_mw"]
            }
            CircuitTemplate::DiffPair => {
                &["supply_v", "target_gain_db", "target_bw_hz", "power_limit_mw"]
            }
            CircuitTemplate::CurrentMirror => {
                &["supply_v", "target_iout_a", "accuracy_pct", "compliance_v"]
            }
        }
    }

    /// Sizing parameter keys that must be present for validation to pass.
    pub fn required_sizing(&self) -> &'static [&'static str] {
        match self {
            CircuitTemplate::RcLowpass => &["R_ohm", "C_f"],
            CircuitTemplate::CommonSourceResLoad => &["W_m", "L_m", "R_D", "I_bias"],
            CircuitTemplate::DiffPair => {
                &["W_in", "L_in", "W_tail", "L_tail", "I_tail", "R_load"]
            }
            CircuitTemplate::CurrentMirror => {
                &["W_ref", "L_ref", "W_out", "L_out", "I_ref"]
            }
        }
    }

    /// Constraint keys that must be strictly positive when present.
    pub fn positive_constraints(&self) -> &'static [&'static str] {
        match self {
            CircuitTemplate::RcLowpass => &["target_fc_hz"],
            CircuitTemplate::CommonSourceResLoad => {
                &["supply_v", "target_bw_hz", "power_limit_mw"]
            }
            CircuitTemplate::DiffPair => &["supply_v", "target_bw_hz", "power_limit_mw"],
            CircuitTemplate::CurrentMirror => &["supply_v", "target_iout_a", "compliance_v"],
        }
    }

    /// Sizing keys that describe physically-positive quantities.
    ///
    /// Tail current and mirror accuracy are deliberately left to the
    /// template-specific sanity checks instead of this generic set.
    pub fn positive_sizing(&self) -> &'static [&'static str] {
        match self {
            CircuitTemplate::RcLowpass => &["R_ohm", "C_f"],
            CircuitTemplate::CommonSourceResLoad => &["W_m", "R_D", "I_bias"],
            CircuitTemplate::DiffPair => &[],
            CircuitTemplate::CurrentMirror => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CircuitTemplate; 4] = [
        CircuitTemplate::RcLowpass,
        CircuitTemplate::CommonSourceResLoad,
        CircuitTemplate::DiffPair,
        CircuitTemplate::CurrentMirror,
    ];

    #[test]
    fn test_key_roundtrip() {
        for template in ALL {
            assert_eq!(CircuitTemplate::from_key(template.key()), Some(template));
        }
        assert_eq!(CircuitTemplate::from_key("two_stage_miller"), None);
        assert_eq!(CircuitTemplate::from_key(""), None);
    }

    #[test]
    fn test_every_template_has_a_schema() {
        for template in ALL {
            assert!(!template.required_constraints().is_empty());
            assert!(!template.required_sizing().is_empty());
        }
    }

    #[test]
    fn test_positivity_sets_are_subsets_of_requirements() {
        for template in ALL {
            for key in template.positive_constraints() {
                assert!(
                    template.required_constraints().contains(key),
                    "{key} not required by {template:?}"
                );
            }
            for key in template.positive_sizing() {
                assert!(
                    template.required_sizing().contains(key),
                    "{key} not required by {template:?}"
                );
            }
        }
    }
}
