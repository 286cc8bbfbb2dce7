//! XLSX export of the alarm summary and the cause-and-effect matrix.
//!
//! Alarm Summary sheet (11 columns):
//!   Tag No | P & ID | Service Description | Range | EU |
//!   Normal Operating Conditions | HH | H | L | LL | Engineering Notes
//!
//! Cause & Effect sheet:
//!   row 1  EFFECT banner over the effect columns
//!   row 2  "<address>\n<description>" per effect column
//!   row 3  cause headers (Interlock No .. Trip)
//!   row 4  CAUSE label, "P & ID" under each effect column
//!   row 5+ one row per interlock, "X" where the effect is asserted

use crate::model::{AlarmEntry, CauseEffectMatrix};
use crate::render::RenderConfig;
use rust_xlsxwriter::{
    Color, DocProperties, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError,
};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

pub const ALARM_SHEET_NAME: &str = "Alarm Summary";
pub const MATRIX_SHEET_NAME: &str = "Cause & Effect";

pub const HEADERS_ALARM: [&str; 11] = [
    "Tag No",
    "P & ID",
    "Service Description",
    "Range",
    "EU",
    "Normal Operating\nConditions",
    "HH",
    "H",
    "L",
    "LL",
    "Engineering Notes",
];

const WIDTHS_ALARM: [f64; 11] = [15.0, 12.0, 55.0, 10.0, 8.0, 20.0, 8.0, 8.0, 8.0, 8.0, 30.0];

pub const HEADERS_CAUSE: [&str; 6] = [
    "Interlock\nNo",
    "Tag No",
    "Service Description",
    "Range",
    "Pre-Trip\n(H or L)",
    "Trip\n(HH or LL)",
];

const WIDTHS_CAUSE: [f64; 6] = [12.0, 18.0, 60.0, 12.0, 12.0, 12.0];
const EFFECT_WIDTH: f64 = 18.0;

/// First effect column (G).
const EFFECT_COL0: u16 = HEADERS_CAUSE.len() as u16;
/// Worksheet column limit.
const MAX_COLUMNS: usize = 16_384;

const YELLOW: Color = Color::RGB(0xFFFF00);
const LIGHT_GREEN: Color = Color::RGB(0x90EE90);

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("xlsx error: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} effect columns do not fit in one worksheet")]
    TooManyColumns(usize),
}

fn bordered() -> Format {
    Format::new().set_border(FormatBorder::Thin)
}

fn centered(format: Format) -> Format {
    format
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
}

fn write_row(
    sheet: &mut Worksheet,
    row: u32,
    first_col: u16,
    cells: &[&str],
    format: &Format,
) -> Result<(), XlsxError> {
    for (i, text) in cells.iter().enumerate() {
        sheet.write_string_with_format(row, first_col + i as u16, *text, format)?;
    }
    Ok(())
}

fn titled_workbook(title: String) -> Workbook {
    let mut workbook = Workbook::new();
    let properties = DocProperties::new().set_title(&title);
    workbook.set_properties(&properties);
    workbook
}

pub fn alarm_summary_workbook(
    alarms: &[AlarmEntry],
    config: &RenderConfig,
) -> Result<Workbook, ExportError> {
    let mut workbook = titled_workbook(format!("{} Alarm Summary", config.plc_name));

    let header = centered(bordered().set_bold().set_font_size(10).set_background_color(YELLOW))
        .set_text_wrap();
    let cell = bordered();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(ALARM_SHEET_NAME)?;
        write_row(sheet, 0, 0, &HEADERS_ALARM, &header)?;
        sheet.set_row_height(0, 30)?;

        let mut row: u32 = 1;
        for alarm in alarms {
            let tag = alarm.address.to_string();
            let s = &alarm.setpoints;
            let values: [&str; 11] = [
                &tag,
                &s.p_and_id,
                &alarm.description,
                &s.range,
                &s.eu,
                &s.normal_conditions,
                &s.hh,
                &s.h,
                &s.l,
                &s.ll,
                &s.notes,
            ];
            write_row(sheet, row, 0, &values, &cell)?;
            row += 1;
        }

        for (col, width) in WIDTHS_ALARM.iter().enumerate() {
            sheet.set_column_width(col as u16, *width)?;
        }
    }

    Ok(workbook)
}

pub fn cause_effect_workbook(
    matrix: &CauseEffectMatrix,
    config: &RenderConfig,
) -> Result<Workbook, ExportError> {
    let n_effects = matrix.columns.len();
    if EFFECT_COL0 as usize + n_effects > MAX_COLUMNS {
        return Err(ExportError::TooManyColumns(n_effects));
    }
    let effect_col = |idx: usize| EFFECT_COL0 + idx as u16;

    let mut workbook = titled_workbook(format!("{} Cause & Effect", config.plc_name));

    let banner = centered(bordered().set_bold().set_background_color(LIGHT_GREEN));
    let effect_head = centered(bordered().set_font_size(9).set_background_color(LIGHT_GREEN))
        .set_text_wrap();
    let cause_head =
        centered(bordered().set_bold().set_background_color(YELLOW)).set_text_wrap();
    let pid_head = centered(bordered().set_font_size(9).set_background_color(YELLOW));
    let cell = bordered();
    let mark = centered(bordered().set_bold());
    let blank_mark = centered(bordered());

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(MATRIX_SHEET_NAME)?;

        // Row 1: EFFECT banner.
        if n_effects > 1 {
            sheet.merge_range(0, EFFECT_COL0, 0, effect_col(n_effects - 1), "EFFECT", &banner)?;
        } else {
            sheet.write_string_with_format(0, EFFECT_COL0, "EFFECT", &banner)?;
        }

        // Row 2: effect addresses with descriptions.
        for (idx, column) in matrix.columns.iter().enumerate() {
            let text = format!("{}\n{}", column.address, column.description);
            sheet.write_string_with_format(1, effect_col(idx), &text, &effect_head)?;
        }

        // Row 3: cause headers.
        write_row(sheet, 2, 0, &HEADERS_CAUSE, &cause_head)?;

        // Row 4: CAUSE label and P & ID per effect.
        sheet.write_string_with_format(3, 0, "CAUSE", &cause_head)?;
        for idx in 0..n_effects {
            sheet.write_string_with_format(3, effect_col(idx), "P & ID", &pid_head)?;
        }

        for (row, height) in [(0u32, 20), (1, 30), (2, 30), (3, 20)] {
            sheet.set_row_height(row, height)?;
        }

        let mut row: u32 = 4;
        for (i, interlock) in matrix.interlocks.iter().enumerate() {
            let label = interlock.label();
            let cause = interlock.cause_text();
            write_row(
                sheet,
                row,
                0,
                &[label.as_str(), cause.as_str(), interlock.description.as_str(), "", "", ""],
                &cell,
            )?;
            for (idx, asserted) in matrix.row_cells(i).into_iter().enumerate() {
                if asserted {
                    sheet.write_string_with_format(row, effect_col(idx), "X", &mark)?;
                } else {
                    sheet.write_blank(row, effect_col(idx), &blank_mark)?;
                }
            }
            row += 1;
        }

        for (col, width) in WIDTHS_CAUSE.iter().enumerate() {
            sheet.set_column_width(col as u16, *width)?;
        }
        for idx in 0..n_effects {
            sheet.set_column_width(effect_col(idx), EFFECT_WIDTH)?;
        }
        sheet.set_freeze_panes(4, EFFECT_COL0)?;
    }

    Ok(workbook)
}

/// Write the alarm summary to `config.alarm_path()`.
pub fn write_alarm_summary(
    alarms: &[AlarmEntry],
    config: &RenderConfig,
) -> Result<PathBuf, ExportError> {
    let mut workbook = alarm_summary_workbook(alarms, config)?;
    fs::create_dir_all(&config.out_dir)?;
    let path = config.alarm_path();
    workbook.save(&path)?;
    Ok(path)
}

/// Write the cause-and-effect matrix to `config.matrix_path()`.
pub fn write_cause_effect(
    matrix: &CauseEffectMatrix,
    config: &RenderConfig,
) -> Result<PathBuf, ExportError> {
    let mut workbook = cause_effect_workbook(matrix, config)?;
    fs::create_dir_all(&config.out_dir)?;
    let path = config.matrix_path();
    workbook.save(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::build_cause_effect;
    use crate::model::build_alarm_register;
    use crate::program::{NamespaceRoles, Rung, TagCatalog, TagEntry};

    fn is_zip(bytes: &[u8]) -> bool {
        bytes.len() > 4 && bytes[..2] == *b"PK"
    }

    fn temp_dir(label: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir().join(format!("ladder-interlock-{}-{}", label, nanos))
    }

    fn matrix(rungs: &[Rung]) -> CauseEffectMatrix {
        build_cause_effect(rungs, &TagCatalog::new(), &NamespaceRoles::fire_system()).matrix
    }

    #[test]
    fn alarm_summary_renders() {
        let alarms = build_alarm_register(&[TagEntry::new(
            "B3:0/0".parse().expect("addr"),
            "Fire Alarm Zone 1",
        )]);
        let mut workbook =
            alarm_summary_workbook(&alarms, &RenderConfig::default()).expect("workbook");
        assert!(is_zip(&workbook.save_to_buffer().expect("buffer")));
    }

    #[test]
    fn matrix_renders_with_zero_one_and_many_effects() {
        let cases = vec![
            vec![],
            vec![Rung::new("0001", ["I:0/1"], ["O:0/0"], "one")],
            vec![
                Rung::new("0001", ["I:0/1"], ["O:0/0", "B3:2/0"], "two"),
                Rung::new("0002", ["B14:0/3"], ["B3:2/4"], "three"),
            ],
        ];
        for rungs in cases {
            let mut workbook =
                cause_effect_workbook(&matrix(&rungs), &RenderConfig::default()).expect("workbook");
            assert!(is_zip(&workbook.save_to_buffer().expect("buffer")));
        }
    }

    #[test]
    fn writes_both_files_into_out_dir() {
        let dir = temp_dir("xlsx");
        let config = RenderConfig {
            out_dir: dir.clone(),
            ..RenderConfig::default()
        };
        let m = matrix(&[Rung::new("0001", ["I:0/1"], ["O:0/0"], "one")]);
        let alarm_path = write_alarm_summary(&[], &config).expect("alarm file");
        let matrix_path = write_cause_effect(&m, &config).expect("matrix file");
        assert!(alarm_path.exists());
        assert!(matrix_path.exists());
        let _ = fs::remove_dir_all(dir);
    }
}
