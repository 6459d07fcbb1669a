use crate::error::{SantaError, SantaResult};
use crate::parser::{read_table, ParsedTable, UploadedFile};
use crate::records::{EMPLOYEE_HEADERS, PREVIOUS_HEADERS};

pub const EMPLOYEE_LABEL: &str = "Employee file";
pub const PREVIOUS_LABEL: &str = "Previous assignments file";

/// Structural check of a parsed table against a list of required columns.
///
/// Reports every missing column at once, and every row with a blank required
/// cell at once. Row numbers are spreadsheet row numbers: the header is row 1,
/// so the first data row is row 2. The table is never modified.
pub fn validate_table(table: &ParsedTable, required: &[&str], label: &str) -> SantaResult<()> {
    ensure_headers(table, required, label)?;
    ensure_rows(table, required, label)
}

fn ensure_headers(table: &ParsedTable, required: &[&str], label: &str) -> SantaResult<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|header| !table.has_header(header))
        .map(|header| header.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SantaError::MissingColumns {
            label: label.to_string(),
            missing,
        })
    }
}

fn ensure_rows(table: &ParsedTable, required: &[&str], label: &str) -> SantaResult<()> {
    if table.rows.is_empty() {
        return Err(SantaError::NoDataRows {
            label: label.to_string(),
        });
    }

    let invalid: Vec<usize> = (0..table.rows.len())
        .filter(|&index| {
            required
                .iter()
                .any(|column| table.cell(index, column).trim().is_empty())
        })
        .map(|index| index + 2)
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(SantaError::InvalidRows {
            label: label.to_string(),
            rows: invalid,
        })
    }
}

/// Reads and validates the participant list.
pub fn validate_employee_file(file: &UploadedFile) -> SantaResult<ParsedTable> {
    let table = read_table(file, EMPLOYEE_LABEL)?;
    validate_table(&table, EMPLOYEE_HEADERS, EMPLOYEE_LABEL)?;
    Ok(table)
}

/// Reads and validates last round's assignment file.
pub fn validate_previous_file(file: &UploadedFile) -> SantaResult<ParsedTable> {
    let table = read_table(file, PREVIOUS_LABEL)?;
    validate_table(&table, PREVIOUS_HEADERS, PREVIOUS_LABEL)?;
    Ok(table)
}
