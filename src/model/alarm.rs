//! Alarm register: the candidate tags whose description names an alarm.

use crate::program::{Address, TagEntry};
use serde::Serialize;

/// Engineering fields left blank for manual completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Setpoints {
    pub p_and_id: String,
    pub range: String,
    pub eu: String,
    pub normal_conditions: String,
    pub hh: String,
    pub h: String,
    pub l: String,
    pub ll: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlarmEntry {
    pub address: Address,
    pub description: String,
    #[serde(flatten)]
    pub setpoints: Setpoints,
}

pub fn is_alarm_description(description: &str) -> bool {
    description.to_lowercase().contains("alarm")
}

/// Stable filter over the candidates; input order is kept.
pub fn build_alarm_register(candidates: &[TagEntry]) -> Vec<AlarmEntry> {
    candidates
        .iter()
        .filter(|c| is_alarm_description(&c.description))
        .map(|c| AlarmEntry {
            address: c.address.clone(),
            description: c.description.clone(),
            setpoints: Setpoints::default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(a: &str, d: &str) -> TagEntry {
        TagEntry::new(a.parse().expect("valid address"), d)
    }

    fn addresses(register: &[AlarmEntry]) -> Vec<String> {
        register.iter().map(|e| e.address.to_string()).collect()
    }

    #[test]
    fn keeps_alarm_descriptions_in_input_order() {
        let candidates = vec![
            entry("B3:3/9", "FE 2 Failure Alarm"),
            entry("B3:0/6", "Plant ESD"),
            entry("B3:0/0", "Fire Alarm Zone 1"),
            entry("B3:10/0", "ESD ALARM to Office PLC"),
            entry("B3:0/9", "Strobe Light On"),
        ];
        let register = build_alarm_register(&candidates);
        assert_eq!(addresses(&register), vec!["B3:3/9", "B3:0/0", "B3:10/0"]);
        assert!(register.iter().all(|e| e.setpoints == Setpoints::default()));
    }

    #[test]
    fn no_normalization_beyond_case() {
        let candidates = vec![
            entry("I:0/16", "Fire Eye 6 Failure Alaram"),
            entry("I:0/18", "alarmed"),
        ];
        assert_eq!(addresses(&build_alarm_register(&candidates)), vec!["I:0/18"]);
    }

    #[test]
    fn empty_and_alarm_free_lists_give_empty_register() {
        assert!(build_alarm_register(&[]).is_empty());
        let quiet = vec![entry("B3:0/9", "Strobe Light On"), entry("B3:0/6", "Plant ESD")];
        assert!(build_alarm_register(&quiet).is_empty());
    }

    #[test]
    fn output_is_a_subsequence_of_input() {
        let candidates = vec![
            entry("B3:4/6", "2 Detectors In Alarm Zone 1"),
            entry("B3:3/0", "Fire Eye 1 Fire Detected"),
            entry("B3:4/5", "2 Detectors In Alarm Zone 2"),
            entry("O:0/0", "Deluge Valve Zone 2 Open"),
            entry("B3:3/15", "FE 8 Failure Alarm"),
        ];
        let register = build_alarm_register(&candidates);
        assert!(register.len() <= candidates.len());

        let mut cursor = candidates.iter();
        for kept in &register {
            assert!(is_alarm_description(&kept.description));
            assert!(cursor.any(|c| c.address == kept.address));
        }
    }

    #[test]
    fn serializes_placeholder_fields_flat() {
        let register = build_alarm_register(&[entry("B3:0/0", "Fire Alarm Zone 1")]);
        let json = serde_json::to_value(&register[0]).expect("serialize");
        assert_eq!(json["address"], "B3:0/0");
        assert_eq!(json["hh"], "");
        assert_eq!(json["notes"], "");
    }
}
