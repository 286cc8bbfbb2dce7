//! Program file (program.json): tag catalog, rung listing, alarm candidates.
//!
//! JSON shape:
//! {
//!   "plc_name": "Fire System PLC",           // optional, used in titles
//!   "tags": [
//!     { "address": "I:0/1", "description": "Pull Station 2 Zone 1" }
//!   ],
//!   "rungs": [
//!     {
//!       "rung": "0001",
//!       "inputs": ["I:0/1", "B3:4/6"],
//!       "outputs": ["B3:0/0", "B3:2/0"],
//!       "description": "Fire Alarm Zone 1",
//!       "timer": "T4:1",                    // optional
//!       "counter": "C5:0",                  // optional
//!       "logic_type": "XIO"                 // optional, descriptive
//!     }
//!   ],
//!   "alarm_candidates": [
//!     { "address": "B3:0/0", "description": "Fire Alarm Zone 1" }
//!   ],
//!   "roles": { ... }                        // optional, see roles.rs
//! }
//!
//! Tag and candidate addresses are parsed here; a bad or duplicate tag is a
//! configuration error. Rung addresses are left as text for inference.

use crate::Result;
use crate::program::addr::Address;
use crate::program::catalog::{TagCatalog, TagEntry};
use crate::program::roles::{NamespaceRoles, RolesSpec};
use crate::program::rung::Rung;
use anyhow::{Context, bail};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct ProgramSpec {
    #[serde(default)]
    pub plc_name: Option<String>,

    #[serde(default)]
    pub tags: Vec<RawTag>,

    #[serde(default)]
    pub rungs: Vec<Rung>,

    #[serde(default)]
    pub alarm_candidates: Vec<RawTag>,

    #[serde(default)]
    pub roles: Option<RolesSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTag {
    pub address: String,

    #[serde(default)]
    pub description: String,
}

/// Validated program ready for inference.
#[derive(Debug, Clone)]
pub struct Program {
    pub plc_name: Option<String>,
    pub catalog: TagCatalog,
    pub rungs: Vec<Rung>,
    pub alarm_candidates: Vec<TagEntry>,
    pub roles: NamespaceRoles,
}

impl ProgramSpec {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parse program json")
    }

    /// Parse tag addresses, reject duplicates, resolve roles.
    pub fn validate_and_build(self) -> Result<Program> {
        let mut catalog = TagCatalog::new();
        for tag in self.tags {
            let address: Address = tag
                .address
                .parse()
                .with_context(|| format!("bad tag address in program file: {}", tag.address))?;
            if let Err(dup) = catalog.insert(address, tag.description) {
                bail!("duplicate tag address in program file: {}", dup);
            }
        }

        let mut alarm_candidates = Vec::with_capacity(self.alarm_candidates.len());
        for tag in self.alarm_candidates {
            let address: Address = tag.address.parse().with_context(|| {
                format!("bad alarm candidate address in program file: {}", tag.address)
            })?;
            alarm_candidates.push(TagEntry::new(address, tag.description));
        }

        let mut seen = BTreeSet::new();
        for rung in &self.rungs {
            if rung.id.trim().is_empty() {
                bail!("rung with empty id in program file");
            }
            if !seen.insert(rung.id.as_str()) {
                warn!(rung = %rung.id, "rung id listed more than once");
            }
        }

        let roles = match &self.roles {
            Some(spec) => spec.validate()?,
            None => NamespaceRoles::default(),
        };

        Ok(Program {
            plc_name: self.plc_name,
            catalog,
            rungs: self.rungs,
            alarm_candidates,
            roles,
        })
    }
}

/// Read and validate a program file.
pub fn load_program(path: &Path) -> Result<Program> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read program file {}", path.display()))?;
    ProgramSpec::from_json(&text)
        .and_then(ProgramSpec::validate_and_build)
        .with_context(|| format!("load program file {}", path.display()))
}
