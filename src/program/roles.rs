//! Namespace roles used by interlock inference.
//!
//! Which files count as field inputs, which words broadcast a shutdown and
//! which single bits are plant-wide alarms depends on the program. The
//! defaults describe the fire-system PLC; a program file may override any of
//! the four lists under `"roles"`.

use crate::program::addr::{Address, Area, Namespace};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceRoles {
    /// Inputs wired to field devices or written by peer controllers.
    pub field_inputs: BTreeSet<Namespace>,
    /// Physical outputs (valves, strobes, ...).
    pub field_outputs: BTreeSet<Namespace>,
    /// Words whose bits broadcast ESD/shutdown.
    pub shutdown_areas: BTreeSet<Area>,
    /// Single bits treated as shutdown-equivalent outside the shutdown words.
    pub shutdown_bits: BTreeSet<Address>,
}

impl NamespaceRoles {
    /// Roles for the fire-system program: `I`, `B11` and `B14` are field
    /// inputs, `O` is the field output, words `B3:2` and `B3:10` carry ESD,
    /// and the zone fire alarms `B3:0/0` and `B3:0/11` count as shutdowns.
    pub fn fire_system() -> Self {
        Self {
            field_inputs: [Namespace::Input, Namespace::B11, Namespace::B14]
                .into_iter()
                .collect(),
            field_outputs: [Namespace::Output].into_iter().collect(),
            shutdown_areas: [
                Area {
                    namespace: Namespace::B3,
                    group: 2,
                },
                Area {
                    namespace: Namespace::B3,
                    group: 10,
                },
            ]
            .into_iter()
            .collect(),
            shutdown_bits: [
                Address::bit(Namespace::B3, 0, 0),
                Address::bit(Namespace::B3, 0, 11),
            ]
            .into_iter()
            .collect(),
        }
    }

    pub fn is_field_input(&self, address: &Address) -> bool {
        self.field_inputs.contains(&address.namespace)
    }

    pub fn is_field_output(&self, address: &Address) -> bool {
        self.field_outputs.contains(&address.namespace)
    }

    pub fn is_shutdown(&self, address: &Address) -> bool {
        self.shutdown_areas.contains(&address.area()) || self.shutdown_bits.contains(address)
    }
}

impl Default for NamespaceRoles {
    fn default() -> Self {
        Self::fire_system()
    }
}

/// Raw `"roles"` object in the program file. Absent lists keep the default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RolesSpec {
    #[serde(default)]
    pub field_inputs: Option<Vec<String>>,

    #[serde(default)]
    pub field_outputs: Option<Vec<String>>,

    #[serde(default)]
    pub shutdown_areas: Option<Vec<String>>,

    #[serde(default)]
    pub shutdown_bits: Option<Vec<String>>,
}

fn parse_all<T>(items: &[String], what: &str) -> Result<BTreeSet<T>>
where
    T: std::str::FromStr<Err = crate::error::AddressError> + Ord,
{
    items
        .iter()
        .map(|s| {
            s.parse::<T>()
                .with_context(|| format!("bad {} entry in roles: {}", what, s))
        })
        .collect()
}

impl RolesSpec {
    pub fn validate(&self) -> Result<NamespaceRoles> {
        let mut roles = NamespaceRoles::fire_system();
        if let Some(list) = &self.field_inputs {
            roles.field_inputs = parse_all(list, "field_inputs")?;
        }
        if let Some(list) = &self.field_outputs {
            roles.field_outputs = parse_all(list, "field_outputs")?;
        }
        if let Some(list) = &self.shutdown_areas {
            roles.shutdown_areas = parse_all(list, "shutdown_areas")?;
        }
        if let Some(list) = &self.shutdown_bits {
            roles.shutdown_bits = parse_all(list, "shutdown_bits")?;
        }
        Ok(roles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn addr(s: &str) -> Address {
        s.parse().expect("valid address")
    }

    #[test]
    fn fire_system_roles() {
        let roles = NamespaceRoles::fire_system();
        assert!(roles.is_field_input(&addr("I:0/1")));
        assert!(roles.is_field_input(&addr("B11:0/1")));
        assert!(roles.is_field_input(&addr("B14:0/0")));
        assert!(!roles.is_field_input(&addr("B3:4/6")));
        assert!(!roles.is_field_input(&addr("O:0/0")));

        assert!(roles.is_field_output(&addr("O:0/0")));
        assert!(!roles.is_field_output(&addr("B3:2/0")));

        assert!(roles.is_shutdown(&addr("B3:2/10")));
        assert!(roles.is_shutdown(&addr("B3:10/0")));
        assert!(roles.is_shutdown(&addr("B3:0/0")));
        assert!(roles.is_shutdown(&addr("B3:0/11")));
        assert!(!roles.is_shutdown(&addr("B3:0/1")));
        assert!(!roles.is_shutdown(&addr("B3:20/0")));
        assert!(!roles.is_shutdown(&addr("B11:2/0")));
    }

    #[test]
    fn spec_overrides_only_given_lists() {
        let spec: RolesSpec =
            serde_json::from_str(r#"{"field_inputs": ["I"], "shutdown_bits": []}"#)
                .expect("parse roles");
        let roles = spec.validate().expect("validate");
        assert_eq!(roles.field_inputs, [Namespace::Input].into_iter().collect());
        assert!(roles.shutdown_bits.is_empty());
        assert_eq!(
            roles.shutdown_areas,
            NamespaceRoles::fire_system().shutdown_areas
        );
    }

    #[test]
    fn bad_role_entry_is_reported() {
        let spec: RolesSpec =
            serde_json::from_str(r#"{"shutdown_areas": ["N7:2"]}"#).expect("parse roles");
        let err = spec.validate().expect_err("unknown namespace");
        assert!(format!("{:#}", err).contains("shutdown_areas"));
    }
}
