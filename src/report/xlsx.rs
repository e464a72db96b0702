use anyhow::Result;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

use super::csv::{EXCESS_DAYS_HEADERS, EXCESS_HOURS_HEADERS, LOW_REST_HEADERS, WEEKLY_EXCESS_HEADERS};
use crate::models::{
    AnalysisResult, ExcessDaysEntry, ExcessHoursEntry, RestHoursEntry, Summary, WeeklyExcessEntry,
};

pub const EXCESS_HOURS_SHEET: &str = "Excess Daily Hours";
pub const LOW_REST_SHEET: &str = "Low Rest Hours";
pub const WEEKLY_EXCESS_SHEET: &str = "Weekly Excess (>=60)";
pub const EXCESS_DAYS_SHEET: &str = "Excess Days (>6)";
pub const SUMMARY_SHEET: &str = "Summary";

enum Cell {
    Text(String),
    Number(f64),
}

/// One flagged entry as a worksheet row
trait SheetRow {
    fn cells(&self) -> Vec<Cell>;
}

fn person(code: &str, first_name: &str, last_name: &str) -> Vec<Cell> {
    vec![
        Cell::Text(code.to_string()),
        Cell::Text(first_name.to_string()),
        Cell::Text(last_name.to_string()),
    ]
}

impl SheetRow for ExcessHoursEntry {
    fn cells(&self) -> Vec<Cell> {
        let mut cells = person(&self.employee_code, &self.first_name, &self.last_name);
        cells.push(Cell::Text(self.date.to_string()));
        cells.push(Cell::Number(self.hours_worked));
        cells
    }
}

impl SheetRow for RestHoursEntry {
    fn cells(&self) -> Vec<Cell> {
        let mut cells = person(&self.employee_code, &self.first_name, &self.last_name);
        cells.push(Cell::Text(self.date.to_string()));
        cells.push(Cell::Number(self.rest_hours));
        cells.push(Cell::Text(self.previous_last_out.clone()));
        cells.push(Cell::Text(self.current_first_in.clone()));
        cells
    }
}

impl SheetRow for WeeklyExcessEntry {
    fn cells(&self) -> Vec<Cell> {
        let mut cells = person(&self.employee_code, &self.first_name, &self.last_name);
        cells.push(Cell::Text(self.week_start.to_string()));
        cells.push(Cell::Text(self.week_end.to_string()));
        cells.push(Cell::Number(self.total_hours));
        cells
    }
}

impl SheetRow for ExcessDaysEntry {
    fn cells(&self) -> Vec<Cell> {
        let mut cells = person(&self.employee_code, &self.first_name, &self.last_name);
        cells.push(Cell::Text(self.week_start.to_string()));
        cells.push(Cell::Text(self.week_end.to_string()));
        cells.push(Cell::Number(self.days_worked as f64));
        cells
    }
}

fn add_sheet(
    workbook: &mut Workbook,
    name: &str,
    headers: &[&str],
    rows: impl Iterator<Item = Vec<Cell>>,
) -> Result<()> {
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(name)?;

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    for (i, cells) in rows.enumerate() {
        let row = i as u32 + 1;
        for (col, cell) in cells.into_iter().enumerate() {
            match cell {
                Cell::Text(text) => sheet.write_string(row, col as u16, text)?,
                Cell::Number(value) => sheet.write_number(row, col as u16, value)?,
            };
        }
    }

    sheet.autofit();
    Ok(())
}

fn summary_rows(summary: &Summary) -> impl Iterator<Item = Vec<Cell>> {
    summary
        .metrics()
        .into_iter()
        .map(|(metric, value)| vec![Cell::Text(metric.to_string()), Cell::Number(value as f64)])
}

/// Write the five-sheet workbook for one result. Every sheet gets its header row, even when empty.
pub fn write_workbook(result: &AnalysisResult, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    add_sheet(
        &mut workbook,
        EXCESS_HOURS_SHEET,
        &EXCESS_HOURS_HEADERS,
        result.flagged_excess_hours.iter().map(|e| e.cells()),
    )?;
    add_sheet(
        &mut workbook,
        LOW_REST_SHEET,
        &LOW_REST_HEADERS,
        result.flagged_low_rest_hours.iter().map(|e| e.cells()),
    )?;
    add_sheet(
        &mut workbook,
        WEEKLY_EXCESS_SHEET,
        &WEEKLY_EXCESS_HEADERS,
        result.flagged_weekly_excess.iter().map(|e| e.cells()),
    )?;
    add_sheet(
        &mut workbook,
        EXCESS_DAYS_SHEET,
        &EXCESS_DAYS_HEADERS,
        result.flagged_excess_days.iter().map(|e| e.cells()),
    )?;
    add_sheet(
        &mut workbook,
        SUMMARY_SHEET,
        &["metric", "value"],
        summary_rows(&result.summary),
    )?;

    workbook.save(path)?;
    Ok(())
}
