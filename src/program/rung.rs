//! Ladder rungs as transcribed from the program listing.
//!
//! Addresses stay as text here. Classification happens during inference so a
//! bad address is reported against the rung that references it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rung {
    /// Listing number, possibly a range such as `0022-0023`.
    #[serde(rename = "rung")]
    pub id: String,

    #[serde(default)]
    pub inputs: Vec<String>,

    #[serde(default)]
    pub outputs: Vec<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter: Option<String>,

    /// Instruction form noted during transcription (`XIO`, `OR`, ...).
    /// Descriptive only; never evaluated.
    #[serde(default, rename = "logic_type", skip_serializing_if = "Option::is_none")]
    pub logic_kind: Option<String>,
}

/// Fixture builders.
#[cfg(test)]
impl Rung {
    pub fn new<I, O>(id: &str, inputs: I, outputs: O, description: &str) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            id: id.to_string(),
            inputs: inputs.into_iter().map(Into::into).collect(),
            outputs: outputs.into_iter().map(Into::into).collect(),
            description: description.to_string(),
            timer: None,
            counter: None,
            logic_kind: None,
        }
    }

    pub fn with_timer(mut self, timer: &str) -> Self {
        self.timer = Some(timer.to_string());
        self
    }

    pub fn with_counter(mut self, counter: &str) -> Self {
        self.counter = Some(counter.to_string());
        self
    }

    pub fn with_logic(mut self, kind: &str) -> Self {
        self.logic_kind = Some(kind.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_listing_record() {
        let rung: Rung = serde_json::from_str(
            r#"{
                "rung": "0022-0023",
                "inputs": ["I:0/6"],
                "outputs": ["B3:3/0"],
                "description": "Fire Eye 1 Fire Detected",
                "timer": "T4:1",
                "counter": "C5:0"
            }"#,
        )
        .expect("parse rung");
        assert_eq!(
            rung,
            Rung::new("0022-0023", ["I:0/6"], ["B3:3/0"], "Fire Eye 1 Fire Detected")
                .with_timer("T4:1")
                .with_counter("C5:0")
        );
    }

    #[test]
    fn optional_fields_default() {
        let rung: Rung = serde_json::from_str(r#"{"rung": "0099"}"#).expect("parse rung");
        assert!(rung.inputs.is_empty());
        assert!(rung.outputs.is_empty());
        assert_eq!(rung.logic_kind, None);
    }
}
