//! Burndown tracking workbook for the documentation schedule.
//!
//! Sheets:
//!   PLC Tracking   one row per PLC, completion marks entered by hand
//!   Burndown Data  planned vs actual remaining per work day, with a line chart
//!   Summary        totals and live progress formulas

use crate::render::xlsx::ExportError;
use crate::schedule::BurndownPlan;
use chrono::NaiveDate;
use rust_xlsxwriter::{
    Chart, ChartFormat, ChartLine, ChartType, Color, DocProperties, Format, FormatAlign,
    FormatBorder, Workbook, Worksheet, XlsxError,
};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BURNDOWN_FILE: &str = "PLC_Burndown_Chart.xlsx";

pub const TRACKING_SHEET_NAME: &str = "PLC Tracking";
pub const DATA_SHEET_NAME: &str = "Burndown Data";
pub const SUMMARY_SHEET_NAME: &str = "Summary";

pub const HEADERS_TRACKING: [&str; 11] = [
    "PLC #",
    "PLC Name",
    "PLC Type",
    "Planned Start",
    "Planned End",
    "Alarm Summary Complete",
    "Cause & Effect Complete",
    "Both Documents Complete",
    "Actual Complete Date",
    "Status",
    "Notes",
];

const WIDTHS_TRACKING: [f64; 11] = [8.0, 40.0, 25.0, 12.0, 12.0, 12.0, 12.0, 12.0, 15.0, 12.0, 30.0];

pub const HEADERS_DATA: [&str; 4] = ["Date", "Day #", "Planned Remaining", "Actual Remaining"];

const WIDTHS_DATA: [f64; 4] = [12.0, 8.0, 18.0, 18.0];

const HEADER_BLUE: Color = Color::RGB(0x366092);
const DATE_FORMAT: &str = "%m/%d/%Y";

enum SummaryValue {
    Blank,
    Text(String),
    Number(f64),
    Formula(String),
}

fn date_text(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_size(11)
        .set_font_color(Color::White)
        .set_background_color(HEADER_BLUE)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Thin)
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str], widths: &[f64]) -> Result<(), XlsxError> {
    let header = header_format();
    for (col, text) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *text, &header)?;
    }
    for (col, width) in widths.iter().enumerate() {
        sheet.set_column_width(col as u16, *width)?;
    }
    Ok(())
}

/// `'PLC Tracking'!$<col>$2:$<col>$<n+1>`
fn tracking_range(col: char, plcs: usize) -> String {
    format!("'{}'!${}$2:${}${}", TRACKING_SHEET_NAME, col, col, plcs + 1)
}

fn status_formula(excel_row: u32) -> String {
    format!(
        r#"=IF(H{r}="X","Complete",IF(OR(F{r}="X",G{r}="X"),"In Progress","Not Started"))"#,
        r = excel_row
    )
}

fn write_tracking(sheet: &mut Worksheet, plan: &BurndownPlan) -> Result<(), XlsxError> {
    sheet.set_name(TRACKING_SHEET_NAME)?;
    write_headers(sheet, &HEADERS_TRACKING, &WIDTHS_TRACKING)?;

    let cell = Format::new().set_border(FormatBorder::Thin);
    let center = cell.clone().set_align(FormatAlign::Center);

    for (i, planned) in plan.plcs.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_number_with_format(row, 0, planned.plc.id, &center)?;
        sheet.write_string_with_format(row, 1, &planned.plc.name, &cell)?;
        sheet.write_string_with_format(row, 2, &planned.plc.kind, &cell)?;
        sheet.write_string_with_format(row, 3, date_text(planned.start), &center)?;
        sheet.write_string_with_format(row, 4, date_text(planned.end), &center)?;
        // Completion marks and the actual date are entered by hand.
        for col in 5..=8 {
            sheet.write_blank(row, col, &center)?;
        }
        sheet.write_formula_with_format(row, 9, status_formula(row + 1).as_str(), &center)?;
        sheet.write_blank(row, 10, &cell)?;
    }
    Ok(())
}

fn burndown_chart(plan: &BurndownPlan) -> Chart {
    let last = plan.days.len() as u32;
    let mut chart = Chart::new(ChartType::Line);
    chart.title().set_name("PLC Control Narrative Burndown Chart");
    chart.x_axis().set_name("Work Days");
    chart.y_axis().set_name("PLCs Remaining");

    chart
        .add_series()
        .set_name((DATA_SHEET_NAME, 0, 2))
        .set_categories((DATA_SHEET_NAME, 1, 0, last, 0))
        .set_values((DATA_SHEET_NAME, 1, 2, last, 2))
        .set_format(ChartFormat::new().set_line(ChartLine::new().set_color(Color::Red).set_width(2.0)));
    chart
        .add_series()
        .set_name((DATA_SHEET_NAME, 0, 3))
        .set_categories((DATA_SHEET_NAME, 1, 0, last, 0))
        .set_values((DATA_SHEET_NAME, 1, 3, last, 3))
        .set_format(ChartFormat::new().set_line(ChartLine::new().set_color(Color::Blue).set_width(2.0)));

    chart.set_width(756).set_height(378);
    chart
}

fn write_data(sheet: &mut Worksheet, plan: &BurndownPlan) -> Result<(), XlsxError> {
    sheet.set_name(DATA_SHEET_NAME)?;
    write_headers(sheet, &HEADERS_DATA, &WIDTHS_DATA)?;

    let center = Format::new()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);
    let actual = format!(r#"=COUNTIF({},"<>X")"#, tracking_range('H', plan.total_plcs()));

    for (i, day) in plan.days.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string_with_format(row, 0, date_text(day.date), &center)?;
        sheet.write_number_with_format(row, 1, day.day, &center)?;
        sheet.write_number_with_format(row, 2, day.planned_remaining, &center)?;
        sheet.write_formula_with_format(row, 3, actual.as_str(), &center)?;
    }

    sheet.insert_chart(1, 5, &burndown_chart(plan))?;
    Ok(())
}

fn summary_rows(plan: &BurndownPlan) -> Vec<(&'static str, SummaryValue)> {
    use SummaryValue::*;
    let n = plan.total_plcs();
    let f = tracking_range('F', n);
    let g = tracking_range('G', n);
    let h = tracking_range('H', n);
    vec![
        ("Project Summary", Blank),
        ("", Blank),
        ("Total PLCs", Number(n as f64)),
        ("Days per PLC", Number(f64::from(plan.days_per_plc))),
        ("Total Work Days", Number(plan.total_work_days() as f64)),
        ("", Blank),
        ("Start Date", Text(date_text(plan.start))),
        ("End Date", Text(date_text(plan.end))),
        ("", Blank),
        ("Progress Tracking", Blank),
        ("PLCs Completed", Formula(format!(r#"=COUNTIF({h},"X")"#))),
        (
            "PLCs In Progress",
            Formula(format!(
                r#"=COUNTIFS({h},"<>X",{f},"X")+COUNTIFS({h},"<>X",{g},"X")"#
            )),
        ),
        (
            "PLCs Not Started",
            Formula(format!(r#"=COUNTIFS({f},"<>X",{g},"<>X")"#)),
        ),
        ("", Blank),
        // B11 is "PLCs Completed".
        ("% Complete", Formula(format!(r#"=ROUND((B11/{n})*100,1)&"%""#))),
    ]
}

fn write_summary(sheet: &mut Worksheet, plan: &BurndownPlan) -> Result<(), XlsxError> {
    sheet.set_name(SUMMARY_SHEET_NAME)?;
    sheet.set_column_width(0, 25)?;
    sheet.set_column_width(1, 20)?;

    let title = Format::new().set_bold().set_font_size(14);
    let label = Format::new().set_bold();
    let center = Format::new().set_align(FormatAlign::Center);

    for (row, (text, value)) in summary_rows(plan).into_iter().enumerate() {
        let row = row as u32;
        let is_title = matches!(text, "Project Summary" | "Progress Tracking");
        sheet.write_string_with_format(row, 0, text, if is_title { &title } else { &label })?;
        match value {
            SummaryValue::Blank => {}
            SummaryValue::Text(s) => {
                sheet.write_string_with_format(row, 1, &s, &center)?;
            }
            SummaryValue::Number(x) => {
                sheet.write_number_with_format(row, 1, x, &center)?;
            }
            SummaryValue::Formula(formula) => {
                sheet.write_formula_with_format(row, 1, formula.as_str(), &center)?;
            }
        }
    }
    Ok(())
}

pub fn burndown_workbook(plan: &BurndownPlan) -> Result<Workbook, ExportError> {
    let mut workbook = Workbook::new();
    let properties = DocProperties::new().set_title("PLC Control Narrative Burndown");
    workbook.set_properties(&properties);

    write_tracking(workbook.add_worksheet(), plan)?;
    write_data(workbook.add_worksheet(), plan)?;
    write_summary(workbook.add_worksheet(), plan)?;
    Ok(workbook)
}

pub fn write_burndown(plan: &BurndownPlan, out: &Path) -> Result<PathBuf, ExportError> {
    let mut workbook = burndown_workbook(plan)?;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    workbook.save(out)?;
    Ok(out.to_path_buf())
}
