//! Aggregation model: combine the program (catalog + rungs + candidates) into
//! the alarm register and the cause-and-effect matrix.

pub mod alarm;
pub mod interlock;
pub mod matrix;

pub use alarm::{AlarmEntry, build_alarm_register};
pub use matrix::{CauseEffectMatrix, build_cause_effect};

use crate::error::{InferenceFailures, RungError};
use crate::program::{Address, Program};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportData {
    pub alarms: Vec<AlarmEntry>,
    pub matrix: CauseEffectMatrix,
    /// Rungs left out of the matrix because an address did not classify.
    pub failures: Vec<RungError>,
    pub totals: TotalsView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TotalsView {
    pub tags: usize,
    pub rungs: usize,
    pub alarm_candidates: usize,
    pub alarms: usize,
    pub interlocks: usize,
    pub effects: usize,
    /// Distinct cause and effect addresses with no catalog description.
    pub uncatalogued: usize,
    pub failures: usize,
}

impl ReportData {
    /// All rung failures as one error, if there were any.
    pub fn failures(&self) -> Option<InferenceFailures> {
        if self.failures.is_empty() {
            None
        } else {
            Some(InferenceFailures(self.failures.clone()))
        }
    }
}

/// Build report data. Performs:
/// - alarm filtering over the candidate list
/// - interlock inference over every rung (failed rungs are reported, not fatal)
/// - debug log for each cause/effect missing from the catalog
pub fn build_report_data(program: &Program) -> ReportData {
    let alarms = build_alarm_register(&program.alarm_candidates);
    let matrix::Inference { matrix, failures } =
        build_cause_effect(&program.rungs, &program.catalog, &program.roles);

    let causes = matrix.interlocks.iter().filter_map(|i| i.cause.as_ref());
    let effects = matrix.columns.iter().map(|c| &c.address);
    let uncatalogued: BTreeSet<&Address> = causes
        .chain(effects)
        .filter(|a| program.catalog.get(a).is_none())
        .collect();
    for address in &uncatalogued {
        debug!(%address, "address not in tag catalog");
    }

    ReportData {
        totals: TotalsView {
            tags: program.catalog.len(),
            rungs: program.rungs.len(),
            alarm_candidates: program.alarm_candidates.len(),
            alarms: alarms.len(),
            interlocks: matrix.interlocks.len(),
            effects: matrix.columns.len(),
            uncatalogued: uncatalogued.len(),
            failures: failures.len(),
        },
        alarms,
        matrix,
        failures,
    }
}
