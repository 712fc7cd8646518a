//! Spreadsheet and CSV files → a grid of typed cells.
//!
//! Numbers stay numbers so the rate normalizer can apply its fraction rule
//! to Excel-stored `0.25`. Date cells are rendered as `m/d/yyyy` text.

use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use chrono::{Datelike, Duration, NaiveDate};
use tariffscope_recon::RawRate;

use crate::error::DocumentError;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) => false,
        }
    }

    /// Display text, with integral numbers printed without decimals.
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Self::Number(n) => format!("{n}"),
        }
    }

    pub fn to_raw_rate(&self) -> RawRate {
        match self {
            Self::Empty => RawRate::Missing,
            Self::Text(s) => RawRate::Text(s.clone()),
            Self::Number(n) => RawRate::Number(*n),
        }
    }
}

pub type Grid = Vec<Vec<CellValue>>;

/// Read the rows of `path`. `sheet` picks a worksheet by name (case-insensitive);
/// `None` takes the first. Ignored for CSV.
pub fn read_grid(path: &Path, sheet: Option<&str>) -> Result<Grid, DocumentError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" | "tsv" | "txt" => read_csv(path),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path, sheet),
        _ => Err(DocumentError::UnsupportedFormat(ext)),
    }
}

// ---------------------------------------------------------------------------
// Workbooks
// ---------------------------------------------------------------------------

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<Grid, DocumentError> {
    if !path.exists() {
        return Err(DocumentError::Io(format!("{}: file not found", path.display())));
    }

    let mut workbook: Sheets<_> =
        open_workbook_auto(path).map_err(|e| DocumentError::Workbook(e.to_string()))?;
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();

    let sheet_name = match sheet {
        Some(wanted) => sheet_names
            .iter()
            .find(|name| name.trim().eq_ignore_ascii_case(wanted.trim()))
            .cloned()
            .ok_or_else(|| DocumentError::SheetNotFound {
                sheet: wanted.to_string(),
                available: sheet_names.clone(),
            })?,
        None => sheet_names.first().cloned().ok_or(DocumentError::Empty)?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| DocumentError::Workbook(format!("sheet '{sheet_name}': {e}")))?;

    // Range offsets are ignored; columns are found by header text.
    Ok(range.rows().map(|row| row.iter().map(convert_cell).collect()).collect())
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => CellValue::Text(format!("#{e:?}")),
        Data::DateTime(dt) => CellValue::Text(serial_to_date(dt.as_f64())),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Excel 1900-system serial → `m/d/yyyy`. Serials before March 1900 fall
/// into Excel's phantom leap day and are printed as numbers.
pub fn serial_to_date(serial: f64) -> String {
    let days = serial.floor() as i64;
    let date = NaiveDate::from_ymd_opt(1899, 12, 30).and_then(|epoch| epoch.checked_add_signed(Duration::days(days)));
    match date {
        Some(d) if days > 60 => format!("{}/{}/{}", d.month(), d.day(), d.year()),
        _ => format!("{serial}"),
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<Grid, DocumentError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut grid = Grid::new();
    for record in reader.records() {
        let record = record.map_err(|e| DocumentError::Csv(e.to_string()))?;
        grid.push(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(grid)
}

/// Read file and convert to UTF-8 if needed (Excel-exported CSVs are often Windows-1252).
fn read_file_as_utf8(path: &Path) -> Result<String, DocumentError> {
    let mut file = std::fs::File::open(path).map_err(|e| DocumentError::Io(format!("{}: {e}", path.display())))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| DocumentError::Io(format!("{}: {e}", path.display())))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Pick the delimiter that splits the first lines most consistently into
/// more than one field. Tab, semicolon, comma and pipe are tried.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        let Some(&target) = counts.first() else {
            continue;
        };
        if target <= 1 {
            continue;
        }

        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serials_render_as_us_dates() {
        assert_eq!(serial_to_date(45876.0), "8/7/2025");
        assert_eq!(serial_to_date(45292.0), "1/1/2024");
        assert_eq!(serial_to_date(45351.75), "2/29/2024");
        assert_eq!(serial_to_date(12.0), "12");
    }

    #[test]
    fn sniff_prefers_semicolon_when_commas_live_in_values() {
        let content = "Country;Sector;HTS\nChina;Steel;7206, 7601\nJapan;Autos;8703, 8708\n";
        assert_eq!(sniff_delimiter(content), b';');
        assert_eq!(sniff_delimiter("Country,Addon\nChina,25%\n"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn integral_numbers_print_without_decimals() {
        assert_eq!(CellValue::Number(2025.0).as_text(), "2025");
        assert_eq!(CellValue::Number(2.5).as_text(), "2.5");
        assert!(CellValue::Text("   ".into()).is_empty());
    }

    #[test]
    fn csv_keeps_cells_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annex.csv");
        std::fs::write(&path, "Country,Addon\nChina,0.25\nJapan,\n").unwrap();

        let grid = read_grid(&path, None).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[1][1], CellValue::Text("0.25".into()));
        assert_eq!(grid[2][1], CellValue::Empty);
    }

    #[test]
    fn windows_1252_csv_is_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annex.csv");
        // "Côte d'Ivoire" with 0xF4 for ô
        let mut bytes = b"Country,Addon\nC".to_vec();
        bytes.push(0xF4);
        bytes.extend_from_slice(b"te d'Ivoire,15%\n");
        std::fs::write(&path, bytes).unwrap();

        let grid = read_grid(&path, None).unwrap();
        assert_eq!(grid[1][0].as_text(), "Côte d'Ivoire");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = read_grid(Path::new("annex.pdf"), None).unwrap_err();
        assert_eq!(err, DocumentError::UnsupportedFormat("pdf".into()));
    }
}
