//! Cause-and-effect matrix assembly.
//!
//! Rows are interlocks numbered by listing position; columns are the distinct
//! effect addresses in address order. The relation is stored sparsely (each
//! interlock keeps its effect set) and queried as a dense grid.

use crate::error::RungError;
use crate::model::interlock::{Interlock, evaluate_rung};
use crate::program::{Address, NamespaceRoles, Rung, TagCatalog};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectColumn {
    pub address: Address,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CauseEffectMatrix {
    pub interlocks: Vec<Interlock>,
    pub columns: Vec<EffectColumn>,
}

impl CauseEffectMatrix {
    pub fn is_empty(&self) -> bool {
        self.interlocks.is_empty()
    }

    /// Dense view: is column `col` asserted by row `row`?
    pub fn cell(&self, row: usize, col: usize) -> bool {
        match (self.interlocks.get(row), self.columns.get(col)) {
            (Some(interlock), Some(column)) => interlock.asserts(&column.address),
            _ => false,
        }
    }

    /// One bool per column for the given row, in column order.
    pub fn row_cells(&self, row: usize) -> Vec<bool> {
        (0..self.columns.len()).map(|col| self.cell(row, col)).collect()
    }
}

/// Interlocks from the rungs that classified, plus every rung that did not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inference {
    pub matrix: CauseEffectMatrix,
    pub failures: Vec<RungError>,
}

/// Evaluate every rung and number the interlocks in listing order.
///
/// Each rung is evaluated on its own. A rung with an address that cannot be
/// classified is left out of the numbering and its errors are collected; the
/// remaining rungs are still evaluated.
pub fn infer_interlocks(
    rungs: &[Rung],
    catalog: &TagCatalog,
    roles: &NamespaceRoles,
) -> (Vec<Interlock>, Vec<RungError>) {
    let mut failures: Vec<RungError> = Vec::new();
    let mut interlocks = Vec::new();

    for rung in rungs {
        match evaluate_rung(rung, catalog, roles) {
            Ok(Some(draft)) => {
                let id = interlocks.len() as u32 + 1;
                interlocks.push(Interlock::from_draft(id, draft));
            }
            Ok(None) => {}
            Err(errors) => failures.extend(errors),
        }
    }

    (interlocks, failures)
}

/// Union of all effect sets, sorted by address, described from the catalog.
pub fn effect_columns(interlocks: &[Interlock], catalog: &TagCatalog) -> Vec<EffectColumn> {
    let effects: BTreeSet<&Address> = interlocks.iter().flat_map(|i| i.effects.iter()).collect();
    effects
        .into_iter()
        .map(|address| EffectColumn {
            address: address.clone(),
            description: catalog.describe(address).to_string(),
        })
        .collect()
}

pub fn assemble_matrix(interlocks: Vec<Interlock>, catalog: &TagCatalog) -> CauseEffectMatrix {
    let columns = effect_columns(&interlocks, catalog);
    CauseEffectMatrix {
        interlocks,
        columns,
    }
}

pub fn build_cause_effect(rungs: &[Rung], catalog: &TagCatalog, roles: &NamespaceRoles) -> Inference {
    let (interlocks, failures) = infer_interlocks(rungs, catalog, roles);
    Inference {
        matrix: assemble_matrix(interlocks, catalog),
        failures,
    }
}
