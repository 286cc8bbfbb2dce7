//! Documentation burndown planning.
//!
//! Every PLC needs an alarm summary and a cause-and-effect document. PLCs are
//! scheduled back to back, `days_per_plc` work days each, skipping weekends.
//!
//! plcs.json shape:
//! [
//!   { "id": 1, "name": "VRU PLC 1", "type": "" },
//!   { "id": 17, "name": "Main Terminal PLC", "type": "ControlLogix 1756-L72" }
//! ]

use crate::Result;
use anyhow::{Context, bail};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlcEntry {
    pub id: u32,
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurndownConfig {
    pub start: NaiveDate,
    pub days_per_plc: u32,
    pub out: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPlc {
    pub plc: PlcEntry,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BurndownDay {
    pub date: NaiveDate,
    /// 1-based work day number.
    pub day: u32,
    pub planned_remaining: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BurndownPlan {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days_per_plc: u32,
    pub plcs: Vec<PlannedPlc>,
    pub days: Vec<BurndownDay>,
}

impl BurndownPlan {
    pub fn total_plcs(&self) -> usize {
        self.plcs.len()
    }

    pub fn total_work_days(&self) -> usize {
        self.days.len()
    }
}

pub fn load_plc_list(path: &Path) -> Result<Vec<PlcEntry>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read PLC list {}", path.display()))?;
    let plcs: Vec<PlcEntry> = serde_json::from_str(&text)
        .with_context(|| format!("parse PLC list {}", path.display()))?;

    let mut ids = BTreeSet::new();
    for plc in &plcs {
        if !ids.insert(plc.id) {
            bail!("duplicate PLC id in {}: {}", path.display(), plc.id);
        }
    }
    Ok(plcs)
}

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The first `count` weekdays on or after `start`.
pub fn work_days(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    start
        .iter_days()
        .filter(|d| is_weekday(*d))
        .take(count)
        .collect()
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

pub fn plan_burndown(plcs: &[PlcEntry], start: NaiveDate, days_per_plc: u32) -> Result<BurndownPlan> {
    if plcs.is_empty() {
        bail!("PLC list is empty");
    }
    if days_per_plc == 0 {
        bail!("days per PLC must be at least 1");
    }

    let per = days_per_plc as usize;
    let calendar = work_days(start, plcs.len() * per);
    let Some(&end) = calendar.last() else {
        bail!("no work days available after {}", start);
    };

    let planned = plcs
        .iter()
        .enumerate()
        .map(|(i, plc)| PlannedPlc {
            plc: plc.clone(),
            start: calendar[i * per],
            end: calendar[(i + 1) * per - 1],
        })
        .collect();

    let total = plcs.len() as f64;
    let days = calendar
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let day = i as u32 + 1;
            let done = f64::from(day) / f64::from(days_per_plc);
            BurndownDay {
                date: *date,
                day,
                planned_remaining: round1((total - done).max(0.0)),
            }
        })
        .collect();

    Ok(BurndownPlan {
        start,
        end,
        days_per_plc,
        plcs: planned,
        days,
    })
}
