use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};

use crate::foundation::error::{YardError, YardResult};

/// One non-empty cell from a column, with its 1-based spreadsheet row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetRow {
    pub row: u32,
    pub value: String,
}

/// First worksheet of `path` as a cell range.
pub(crate) fn first_sheet(path: &Path) -> YardResult<Range<Data>> {
    let mut wb = open_workbook_auto(path)
        .map_err(|e| YardError::sheet(format!("cannot open workbook '{}': {e}", path.display())))?;
    let name = wb
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| YardError::sheet(format!("workbook '{}' has no sheets", path.display())))?;
    wb.worksheet_range(&name)
        .map_err(|e| YardError::sheet(format!("cannot read sheet '{name}': {e}")))
}

/// Text of a cell, `None` for empty cells.
pub(crate) fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_owned())
        }
        other => Some(other.to_string()),
    }
}

/// Values of the column headed `column` in the first worksheet of `path`.
///
/// The first used row is the header. Empty cells are skipped, but row numbers still match the
/// spreadsheet so files named after them line up with what a user sees in a sheet editor.
#[tracing::instrument]
pub fn read_column(path: &Path, column: &str) -> YardResult<Vec<SheetRow>> {
    let range = first_sheet(path)?;
    column_values(&range, column)
}

pub(crate) fn column_values(range: &Range<Data>, column: &str) -> YardResult<Vec<SheetRow>> {
    let (start_row, _) = range.start().unwrap_or((0, 0));
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|h| h.iter().map(|c| cell_text(c).unwrap_or_default()).collect())
        .unwrap_or_default();

    let Some(col) = headers.iter().position(|h| h == column) else {
        return Err(YardError::sheet(format!(
            "column '{column}' not found; available columns: {}",
            headers
                .iter()
                .filter(|h| !h.is_empty())
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        )));
    };

    let mut out = Vec::new();
    for (i, row) in rows.enumerate() {
        if let Some(value) = row.get(col).and_then(cell_text) {
            // +1 for the header, +1 for 1-based numbering.
            out.push(SheetRow {
                row: start_row + i as u32 + 2,
                value,
            });
        }
    }
    Ok(out)
}
