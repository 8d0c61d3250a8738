use crate::collaborators::{TopologyChoice, TopologySelector};

/// Stand-in pattern matcher until a real model-backed selector lands.
///
/// Picks from the catalog by keyword, falling back to a common-source
/// stage as the generic amplifier answer.
#[derive(Debug, Default)]
pub struct KeywordSelector;

impl TopologySelector for KeywordSelector {
    fn select(&self, specification: &str) -> TopologyChoice {
        let spec = specification.to_lowercase();

        if spec.contains("lowpass") || spec.contains("low-pass") {
            return TopologyChoice {
                topology: "rc_lowpass".to_string(),
                confidence: 0.92,
            };
        }
        if spec.contains("differential") {
            return TopologyChoice {
                topology: "diff_pair".to_string(),
                confidence: 0.88,
            };
        }
        if spec.contains("current mirror") {
            return TopologyChoice {
                topology: "current_mirror".to_string(),
                confidence: 0.85,
            };
        }

        TopologyChoice {
            topology: "common_source_res_load".to_string(),
            confidence: 0.75,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_matches() {
        let selector = KeywordSelector;

        let choice = selector.select("Design a lowpass filter with 1kHz cutoff");
        assert_eq!(choice.topology, "rc_lowpass");
        assert_eq!(choice.confidence, 0.92);

        let choice = selector.select("A LOW-PASS antialiasing stage");
        assert_eq!(choice.topology, "rc_lowpass");

        let choice = selector.select("differential amplifier for sensor readout");
        assert_eq!(choice.topology, "diff_pair");

        let choice = selector.select("bias network with a current mirror");
        assert_eq!(choice.topology, "current_mirror");
    }

    #[test]
    fn test_fallback_is_common_source() {
        let choice = KeywordSelector.select("some 20 dB voltage amplifier");
        assert_eq!(choice.topology, "common_source_res_load");
        assert_eq!(choice.confidence, 0.75);
    }

    #[test]
    fn test_selected_keys_exist_in_catalog() {
        for spec in ["lowpass", "differential", "current mirror", "amplifier"] {
            let choice = KeywordSelector.select(spec);
            assert!(galvani_schema::library::lookup(&choice.topology).is_some());
        }
    }
}
