use calamine::{open_workbook_auto_from_rs, Data, Reader as _};
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use crate::error::{SantaError, SantaResult};

pub const SUPPORTED_EXTENSIONS: &[&str] = &[".csv", ".xlsx", ".xls"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One data row, keyed by (trimmed) column header.
pub type TableRow = HashMap<String, String>;

/// Header list plus data rows of the first sheet of an uploaded file.
///
/// Fully blank rows never make it in here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl ParsedTable {
    pub fn has_header(&self, header: &str) -> bool {
        self.headers.iter().any(|h| h == header)
    }

    /// Value of `column` in data row `index`, empty when the row is shorter
    /// than the header line.
    pub fn cell(&self, index: usize, column: &str) -> &str {
        self.rows
            .get(index)
            .and_then(|row| row.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// A named file as received from the command line or an HTTP upload.
///
/// The name is only used to pick a decoder.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> SantaResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, content })
    }

    pub fn is_csv(&self) -> bool {
        self.name.to_lowercase().ends_with(".csv")
    }
}

/// Rejects anything that is not a CSV or Excel file, judged by name alone.
pub fn ensure_supported_file(file: &UploadedFile, label: &str) -> SantaResult<()> {
    let name = file.name.to_lowercase();
    if SUPPORTED_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
        Ok(())
    } else {
        Err(SantaError::UnsupportedExtension {
            label: label.to_string(),
        })
    }
}

/// Reads an uploaded file into a [`ParsedTable`].
///
/// CSV files are decoded as UTF-8 text; everything else goes through the
/// spreadsheet decoder and only the first sheet is read. The first non-blank
/// row becomes the header line.
pub fn read_table(file: &UploadedFile, label: &str) -> SantaResult<ParsedTable> {
    ensure_supported_file(file, label)?;
    let matrix = read_matrix(file, label)?;
    table_from_matrix(matrix, label)
}

/// Loads and parses a table straight from disk.
pub fn load_table<P: AsRef<Path>>(path: P, label: &str) -> SantaResult<ParsedTable> {
    let file = UploadedFile::from_path(path)?;
    read_table(&file, label)
}

/// Converts a spreadsheet upload to CSV bytes. CSV uploads pass through as-is.
pub fn normalize_to_csv(file: &UploadedFile) -> SantaResult<Vec<u8>> {
    const LABEL: &str = "Uploaded file";

    ensure_supported_file(file, LABEL)?;
    if file.is_csv() {
        return Ok(file.content.clone());
    }

    let matrix = read_sheet_matrix(&file.content, LABEL)?;
    let mut wtr = WriterBuilder::new().flexible(true).from_writer(Vec::new());
    let mut written = 0usize;
    for row in matrix.iter().filter(|row| !is_blank(row)) {
        wtr.write_record(row)?;
        written += 1;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| SantaError::Io(e.into_error()))?;

    if written == 0 {
        return Err(SantaError::EmptyFile {
            label: LABEL.to_string(),
        });
    }
    Ok(bytes)
}

fn read_matrix(file: &UploadedFile, label: &str) -> SantaResult<Vec<Vec<String>>> {
    if file.is_csv() {
        read_csv_matrix(&file.content, label)
    } else {
        read_sheet_matrix(&file.content, label)
    }
}

fn read_csv_matrix(bytes: &[u8], label: &str) -> SantaResult<Vec<Vec<String>>> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut matrix = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| {
            log::warn!("{} could not be decoded as CSV: {}", label, e);
            SantaError::unreadable(label)
        })?;
        matrix.push(record.iter().map(str::to_string).collect());
    }
    Ok(matrix)
}

fn read_sheet_matrix(bytes: &[u8], label: &str) -> SantaResult<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(|e| {
        log::warn!("{} could not be opened as a workbook: {}", label, e);
        SantaError::unreadable(label)
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SantaError::unreadable(label))?
        .map_err(|e| {
            log::warn!("{} first sheet could not be read: {}", label, e);
            SantaError::unreadable(label)
        })?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|value| value.trim().is_empty())
}

fn table_from_matrix(matrix: Vec<Vec<String>>, label: &str) -> SantaResult<ParsedTable> {
    let mut non_blank = matrix.into_iter().filter(|row| !is_blank(row));

    let headers: Vec<String> = match non_blank.next() {
        Some(row) => row.iter().map(|h| h.trim().to_string()).collect(),
        None => {
            return Err(SantaError::EmptyFile {
                label: label.to_string(),
            })
        }
    };

    let rows = non_blank
        .map(|cells| {
            let mut row = TableRow::new();
            for (index, header) in headers.iter().enumerate() {
                let value = cells.get(index).cloned().unwrap_or_default();
                // Repeated headers keep their first column.
                row.entry(header.clone()).or_insert(value);
            }
            row
        })
        .collect();

    Ok(ParsedTable { headers, rows })
}
