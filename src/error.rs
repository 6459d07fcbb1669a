use thiserror::Error;

pub type SantaResult<T> = Result<T, SantaError>;

/// Every way a Secret Santa run can fail.
///
/// Each variant renders the exact message shown to the person who uploaded
/// the files. The `label` fields name which upload the failure refers to
/// ("Employee file", "Previous assignments file", ...).
#[derive(Error, Debug)]
pub enum SantaError {
    #[error("{label} must be a CSV or Excel file (.csv, .xlsx, .xls).")]
    UnsupportedExtension { label: String },

    #[error("{label} is unreadable.")]
    UnreadableFile { label: String },

    #[error("{label} has no rows.")]
    EmptyFile { label: String },

    #[error("{label} has no data rows.")]
    NoDataRows { label: String },

    #[error("{label} is missing required columns: {}", .missing.join(", "))]
    MissingColumns { label: String, missing: Vec<String> },

    #[error("{label} has empty required values in row(s): {}", join_rows(.rows))]
    InvalidRows { label: String, rows: Vec<usize> },

    #[error("At least 2 employees are required for Secret Santa.")]
    TooFewParticipants { found: usize },

    #[error("Employee_EmailID values must be unique.")]
    DuplicateEmail,

    #[error("Previous assignments contain duplicate Employee_EmailID rows.")]
    DuplicatePreviousGiver,

    #[error("Unable to generate valid Secret Santa assignments.")]
    DerangementUnsatisfiable { attempts: u32 },

    #[error("Please upload the employee list file.")]
    MissingEmployeeFile,

    #[error("Assignment covers {assignment} participant(s) but {employees} were given.")]
    AssignmentSizeMismatch { employees: usize, assignment: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SantaError {
    /// Short taxonomy label, stable across message wording changes.
    pub fn kind(&self) -> &'static str {
        match self {
            SantaError::UnsupportedExtension { .. } => "UnsupportedExtension",
            SantaError::UnreadableFile { .. } => "UnreadableFile",
            SantaError::EmptyFile { .. } => "EmptyFile",
            SantaError::NoDataRows { .. } => "NoDataRows",
            SantaError::MissingColumns { .. } => "MissingColumns",
            SantaError::InvalidRows { .. } => "InvalidRows",
            SantaError::TooFewParticipants { .. } => "TooFewParticipants",
            SantaError::DuplicateEmail => "DuplicateEmail",
            SantaError::DuplicatePreviousGiver => "DuplicatePreviousGiver",
            SantaError::DerangementUnsatisfiable { .. } => "DerangementUnsatisfiable",
            SantaError::MissingEmployeeFile => "MissingEmployeeFile",
            SantaError::AssignmentSizeMismatch { .. } => "AssignmentSizeMismatch",
            SantaError::Io(_) => "Io",
            SantaError::Csv(_) => "Csv",
        }
    }

    pub(crate) fn unreadable(label: &str) -> Self {
        SantaError::UnreadableFile {
            label: label.to_string(),
        }
    }
}

fn join_rows(rows: &[usize]) -> String {
    rows.iter()
        .map(|row| row.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
