// Spreadsheet pre-check: per-sheet row counts, nothing else.

use std::fmt;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Reader, SheetType, Sheets};

use transcheck_engine::RowViolation;

#[derive(Debug)]
pub enum InspectError {
    /// The file could not be read from disk.
    Io(String),
    /// Not a well-formed spreadsheet container.
    Parse(String),
}

impl fmt::Display for InspectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InspectError::Io(msg) => write!(f, "I/O error: {}", msg),
            InspectError::Parse(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for InspectError {}

/// Row count of one sheet, in workbook order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRows {
    pub name: String,
    /// Last declared or occupied row index + 1.
    pub rows: u32,
}

/// Everything a pre-check found.
#[derive(Debug, Clone, Default)]
pub struct InspectReport {
    pub sheets: Vec<SheetRows>,
    pub violations: Vec<RowViolation>,
}

impl InspectReport {
    pub fn summary(&self) -> String {
        let largest = self.sheets.iter().max_by_key(|s| s.rows);
        match largest {
            Some(s) => format!(
                "{} sheet(s), largest '{}' with {} rows, {} over the limit",
                self.sheets.len(),
                s.name,
                s.rows,
                self.violations.len()
            ),
            None => "no sheets".to_string(),
        }
    }

    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Last row of the `<dimension>` range an xlsx/xlsm sheet declares.
///
/// Formatted rows without values sit inside that range even though no cell
/// reports them. Other formats have no declared range to read.
fn declared_last_row(workbook: &mut Sheets<Cursor<&[u8]>>, name: &str) -> Result<Option<u32>, InspectError> {
    match workbook {
        Sheets::Xlsx(xlsx) => {
            let cells = xlsx
                .worksheet_cells_reader(name)
                .map_err(|e| InspectError::Parse(format!("Failed to read sheet '{}': {}", name, e)))?;
            Ok(Some(cells.dimensions().end.0))
        }
        _ => Ok(None),
    }
}

/// Row counts for every sheet in `bytes` (xlsx, xlsm, xlsb, xls, ods).
///
/// The count is the larger of the declared range's last row and the last
/// occupied row, plus one. A sheet that declares `A1:A1` or nothing at all
/// counts as one row. Chart and dialog sheets have no cell grid and also
/// count as one row.
pub fn sheet_rows(bytes: &[u8]) -> Result<Vec<SheetRows>, InspectError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| InspectError::Parse(format!("Failed to open spreadsheet: {}", e)))?;

    let sheets: Vec<(String, bool)> = workbook
        .sheets_metadata()
        .iter()
        .map(|s| (s.name.clone(), matches!(s.typ, SheetType::WorkSheet)))
        .collect();

    let mut counts = Vec::with_capacity(sheets.len());
    for (name, has_cells) in sheets {
        let rows = if has_cells {
            let declared = declared_last_row(&mut workbook, &name)?;
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| InspectError::Parse(format!("Failed to read sheet '{}': {}", name, e)))?;
            let occupied = range.end().map(|(last_row, _)| last_row);
            declared.max(occupied).map_or(1, |last_row| last_row + 1)
        } else {
            1
        };
        log::debug!("sheet '{}': {} rows", name, rows);
        counts.push(SheetRows { name, rows });
    }

    Ok(counts)
}

/// Pre-check `bytes` against `limit` rows per sheet.
pub fn inspect_report(bytes: &[u8], limit: u32) -> Result<InspectReport, InspectError> {
    let sheets = sheet_rows(bytes)?;
    let violations: Vec<RowViolation> = sheets
        .iter()
        .filter(|s| s.rows > limit)
        .map(|s| RowViolation {
            sheet_name: s.name.clone(),
            observed_rows: s.rows,
            limit,
        })
        .collect();

    if !violations.is_empty() {
        log::warn!("{} sheet(s) over {} rows", violations.len(), limit);
    }

    Ok(InspectReport { sheets, violations })
}

/// Every sheet of `bytes` with more than `limit` rows.
pub fn inspect(bytes: &[u8], limit: u32) -> Result<Vec<RowViolation>, InspectError> {
    inspect_report(bytes, limit).map(|r| r.violations)
}

/// Read `path` fully, then [`inspect`] it.
pub fn inspect_path(path: &Path, limit: u32) -> Result<Vec<RowViolation>, InspectError> {
    let bytes = std::fs::read(path)
        .map_err(|e| InspectError::Io(format!("{}: {}", path.display(), e)))?;
    inspect(&bytes, limit)
}
