//! Per-rung interlock inference.
//!
//! A rung is an interlock when it reads at least one field input and drives
//! either a field output or a shutdown bit. Everything else is internal logic
//! and stays out of the matrix.

use crate::error::{AddressError, AddressRole, RungError};
use crate::program::{Address, Namespace, NamespaceRoles, Rung, TagCatalog};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// A rung with every referenced address classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRung<'a> {
    pub rung: &'a Rung,
    pub inputs: Vec<Address>,
    pub outputs: Vec<Address>,
    pub timer: Option<Address>,
    pub counter: Option<Address>,
}

/// Classify all addresses of a rung. Every bad address is reported, not just
/// the first.
pub fn classify_rung(rung: &Rung) -> Result<ClassifiedRung<'_>, Vec<RungError>> {
    let mut errors = Vec::new();

    let mut classify_list = |raw: &[String], role: AddressRole| -> Vec<Address> {
        raw.iter()
            .filter_map(|s| match s.parse::<Address>() {
                Ok(a) => Some(a),
                Err(e) => {
                    errors.push(RungError::new(&rung.id, role, e));
                    None
                }
            })
            .collect()
    };
    let inputs = classify_list(rung.inputs.as_slice(), AddressRole::Input);
    let outputs = classify_list(rung.outputs.as_slice(), AddressRole::Output);

    let mut classify_meta = |raw: Option<&String>,
                             role: AddressRole,
                             expected: Namespace|
     -> Option<Address> {
        let raw = raw?;
        let parsed = raw.parse::<Address>().and_then(|a| {
            if a.namespace == expected {
                Ok(a)
            } else {
                Err(AddressError::WrongNamespace {
                    address: raw.trim().to_string(),
                    expected: match role {
                        AddressRole::Counter => "counter",
                        _ => "timer",
                    },
                })
            }
        });
        match parsed {
            Ok(a) => Some(a),
            Err(e) => {
                errors.push(RungError::new(&rung.id, role, e));
                None
            }
        }
    };
    let timer = classify_meta(rung.timer.as_ref(), AddressRole::Timer, Namespace::Timer);
    let counter = classify_meta(rung.counter.as_ref(), AddressRole::Counter, Namespace::Counter);

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(ClassifiedRung {
        rung,
        inputs,
        outputs,
        timer,
        counter,
    })
}

/// The three facts the interlock predicate is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Candidacy {
    pub has_physical_input: bool,
    pub has_physical_output: bool,
    pub has_shutdown: bool,
}

impl Candidacy {
    pub fn of(rung: &ClassifiedRung<'_>, roles: &NamespaceRoles) -> Self {
        Self {
            has_physical_input: rung.inputs.iter().any(|a| roles.is_field_input(a)),
            has_physical_output: rung.outputs.iter().any(|a| roles.is_field_output(a)),
            has_shutdown: rung.outputs.iter().any(|a| roles.is_shutdown(a)),
        }
    }

    pub fn is_interlock(&self) -> bool {
        self.has_physical_input && (self.has_physical_output || self.has_shutdown)
    }
}

/// A qualifying rung before its positional id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterlockDraft {
    pub cause: Option<Address>,
    pub description: String,
    pub rung: String,
    pub logic_kind: Option<String>,
    pub inputs: Vec<Address>,
    pub outputs: Vec<Address>,
    pub effects: BTreeSet<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interlock {
    pub id: u32,
    pub cause: Option<Address>,
    pub description: String,
    pub rung: String,
    pub logic_kind: Option<String>,
    pub inputs: Vec<Address>,
    pub outputs: Vec<Address>,
    pub effects: BTreeSet<Address>,
}

impl Interlock {
    pub fn from_draft(id: u32, draft: InterlockDraft) -> Self {
        Self {
            id,
            cause: draft.cause,
            description: draft.description,
            rung: draft.rung,
            logic_kind: draft.logic_kind,
            inputs: draft.inputs,
            outputs: draft.outputs,
            effects: draft.effects,
        }
    }

    /// Cause address as rendered; "" when the rung had no inputs.
    pub fn cause_text(&self) -> String {
        self.cause.as_ref().map(|a| a.to_string()).unwrap_or_default()
    }

    /// Row label used in the rendered matrix.
    pub fn label(&self) -> String {
        format!("I-{}", self.id)
    }

    pub fn asserts(&self, effect: &Address) -> bool {
        self.effects.contains(effect)
    }
}

/// First field input in listing order, else the first input at all.
pub fn primary_cause(inputs: &[Address], roles: &NamespaceRoles) -> Option<Address> {
    inputs
        .iter()
        .find(|a| roles.is_field_input(a))
        .or_else(|| inputs.first())
        .cloned()
}

/// Catalog description of the cause (falling back to the rung text), with a
/// `(Timer: .., Counter: ..)` note when the rung carries either.
pub fn service_description(
    rung: &ClassifiedRung<'_>,
    cause: Option<&Address>,
    catalog: &TagCatalog,
) -> String {
    let mut text = match cause.and_then(|c| catalog.get(c)) {
        Some(d) => d.to_string(),
        None => {
            if let Some(c) = cause {
                debug!(rung = %rung.rung.id, cause = %c, "cause not in tag catalog; using rung description");
            }
            rung.rung.description.clone()
        }
    };

    let mut notes = Vec::new();
    if let Some(t) = &rung.timer {
        notes.push(format!("Timer: {}", t));
    }
    if let Some(c) = &rung.counter {
        notes.push(format!("Counter: {}", c));
    }
    if !notes.is_empty() {
        text.push_str(&format!(" ({})", notes.join(", ")));
    }
    text
}

/// Classify and test one rung. `Ok(None)` means the rung is internal logic.
pub fn evaluate_rung(
    rung: &Rung,
    catalog: &TagCatalog,
    roles: &NamespaceRoles,
) -> Result<Option<InterlockDraft>, Vec<RungError>> {
    let classified = classify_rung(rung)?;
    let candidacy = Candidacy::of(&classified, roles);
    if !candidacy.is_interlock() {
        debug!(rung = %rung.id, ?candidacy, "rung is not an interlock");
        return Ok(None);
    }

    let cause = primary_cause(&classified.inputs, roles);
    let description = service_description(&classified, cause.as_ref(), catalog);
    let effects = classified.outputs.iter().cloned().collect();

    Ok(Some(InterlockDraft {
        cause,
        description,
        rung: rung.id.clone(),
        logic_kind: rung.logic_kind.clone(),
        inputs: classified.inputs,
        outputs: classified.outputs,
        effects,
    }))
}
