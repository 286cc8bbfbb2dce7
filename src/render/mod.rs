//! Output adapters: spreadsheets and the HTML report.
//!
//! Renderers take an explicit `RenderConfig`; nothing here reads globals.

pub mod burndown;
pub mod html;
pub mod xlsx;

pub use html::render_html_report;
pub use xlsx::{write_alarm_summary, write_cause_effect};

use std::path::PathBuf;

pub const DEFAULT_ALARM_FILE: &str = "Alarm_Summary_Output.xlsx";
pub const DEFAULT_MATRIX_FILE: &str = "Cause_Effect_Output.xlsx";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Shown in workbook properties and the HTML title.
    pub plc_name: String,
    pub out_dir: PathBuf,
    pub alarm_file: String,
    pub matrix_file: String,
    /// Write the HTML report too when set.
    pub html_file: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            plc_name: "PLC".to_string(),
            out_dir: PathBuf::from("."),
            alarm_file: DEFAULT_ALARM_FILE.to_string(),
            matrix_file: DEFAULT_MATRIX_FILE.to_string(),
            html_file: None,
        }
    }
}

impl RenderConfig {
    pub fn alarm_path(&self) -> PathBuf {
        self.out_dir.join(&self.alarm_file)
    }

    pub fn matrix_path(&self) -> PathBuf {
        self.out_dir.join(&self.matrix_file)
    }

    pub fn html_path(&self) -> Option<PathBuf> {
        self.html_file.as_ref().map(|f| self.out_dir.join(f))
    }
}
