use anyhow::{bail, Context, Result};
use calamine::{open_workbook, Data, DataType, Reader, Xlsx};
use std::path::Path;

use crate::models::RawTable;

const CSV_EXTENSIONS: &[&str] = &["csv", "txt"];
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xltx", "xltm"];

/// Load a punch export from disk
pub fn load_table(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let is_workbook = WORKBOOK_EXTENSIONS.contains(&ext.as_str());
    if !is_workbook && !CSV_EXTENSIONS.contains(&ext.as_str()) {
        bail!("Unsupported file type. Please upload a .csv or .xlsx file.");
    }

    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    if bytes.is_empty() {
        bail!("Uploaded file is empty.");
    }

    if is_workbook {
        return load_workbook(path)
            .with_context(|| format!("Failed to read workbook: {}", path.display()));
    }

    parse_csv(&String::from_utf8_lossy(&bytes))
        .with_context(|| format!("Failed to parse CSV: {}", path.display()))
}

/// First worksheet of an Excel workbook
fn load_workbook(path: &Path) -> Result<RawTable> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .context("Workbook has no worksheets.")??;

    let records: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
        .filter(|cells| !cells.iter().all(|cell| cell.trim().is_empty()))
        .collect();

    table_from_records(records)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        // whole numbers come back as floats; employee codes should not grow a ".0"
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Parse CSV text into a table, recovering exports that wrap every line in quotes
pub fn parse_csv(content: &str) -> Result<RawTable> {
    let content = content.trim_start_matches('\u{feff}');
    let records = read_records(content.as_bytes())?;

    let row_wrapped = records
        .first()
        .map_or(false, |header| header.len() == 1 && header[0].contains(','));

    let records = if row_wrapped {
        unwrap_rows(content)?
    } else {
        records
    };

    table_from_records(records)
}

fn table_from_records(records: Vec<Vec<String>>) -> Result<RawTable> {
    let mut records = records.into_iter();
    let headers = match records.next() {
        Some(header) => clean_headers(&header),
        None => bail!("CSV appears empty or invalid."),
    };

    Ok(RawTable::new(headers, records.collect()))
}

/// All non-blank records, header included
fn read_records(input: &[u8]) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        records.push(record.iter().map(String::from).collect());
    }
    Ok(records)
}

/// Re-read an export whose lines look like `"0903,DOE,JOHN,2025-11-30 09:00,2025-11-30 18:00"`.
///
/// Each line is handled on its own: a line wrapped in a quote pair loses the pair and has its
/// doubled quotes unescaped, any other line is parsed as it stands.
fn unwrap_rows(content: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    for line in content.lines() {
        let line = match line.strip_prefix('"').and_then(|l| l.strip_suffix('"')) {
            Some(inner) => inner.replace("\"\"", "\""),
            None => line.to_string(),
        };
        records.extend(read_records(line.as_bytes())?);
    }

    if records.len() < 2 {
        bail!("CSV appears empty or invalid.");
    }
    Ok(records)
}

fn clean_headers(cells: &[String]) -> Vec<String> {
    cells
        .iter()
        .map(|h| h.replace('\u{feff}', "").trim().to_string())
        .collect()
}
