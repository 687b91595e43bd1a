use std::fmt;

use crate::model::RowViolation;

/// Form field a configuration error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnField {
    Input,
    Output1,
    Output2,
}

impl fmt::Display for ColumnField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("check column"),
            Self::Output1 => f.write_str("first output column"),
            Self::Output2 => f.write_str("second output column"),
        }
    }
}

/// The form cannot be submitted as is. Corrected by editing the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No file is currently selected.
    NoFile,
    /// Not exactly one letter in `A..=Z`.
    MalformedColumn { field: ColumnField },
    /// Same letter as an earlier column.
    DuplicateColumn { field: ColumnField },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFile => f.write_str("Please select a file first"),
            Self::MalformedColumn { field } => {
                write!(f, "Please enter a valid {field} (a single letter A~Z)")
            }
            Self::DuplicateColumn { field } => {
                write!(f, "The {field} must not repeat another column")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Why a chosen file was dropped. The user has to pick another file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRejection {
    TooLarge { size_mb: String, limit_mb: u64 },
    TooManyRows { violations: Vec<RowViolation>, limit: u32 },
    Unreadable(String),
}

impl fmt::Display for FileRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge { size_mb, limit_mb } => {
                write!(f, "File too large ({size_mb}MB), must be under {limit_mb}MB")
            }
            Self::TooManyRows { violations, limit } => {
                writeln!(f, "Too many rows! Each sheet may contain at most {limit} rows")?;
                for v in violations {
                    writeln!(f, "• Sheet \"{}\": {} rows", v.sheet_name, v.observed_rows)?;
                }
                f.write_str("Please keep only the rows with data and upload the file again.")
            }
            Self::Unreadable(msg) => write!(f, "File error: {msg}"),
        }
    }
}

/// Any failure the workflow can end an attempt with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    Configuration(ConfigError),
    FileRejected(FileRejection),
    /// The request never completed; carries the transport's own text.
    Transport(String),
    /// The server answered with a failure status.
    Server(String),
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(e) => write!(f, "{e}"),
            Self::FileRejected(e) => write!(f, "{e}"),
            Self::Transport(msg) => write!(f, "Request failed: {msg}"),
            Self::Server(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for WorkflowError {}

impl From<ConfigError> for WorkflowError {
    fn from(e: ConfigError) -> Self {
        Self::Configuration(e)
    }
}

impl From<FileRejection> for WorkflowError {
    fn from(e: FileRejection) -> Self {
        Self::FileRejected(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_many_rows_lists_every_sheet() {
        let err = FileRejection::TooManyRows {
            violations: vec![
                RowViolation { sheet_name: "Main".into(), observed_rows: 80_000, limit: 70_000 },
                RowViolation { sheet_name: "Extra".into(), observed_rows: 70_001, limit: 70_000 },
            ],
            limit: 70_000,
        };
        let text = err.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("70000"));
        assert_eq!(lines[1], "• Sheet \"Main\": 80000 rows");
        assert_eq!(lines[2], "• Sheet \"Extra\": 70001 rows");
    }

    #[test]
    fn test_server_message_kept_verbatim() {
        let err = WorkflowError::Server("dictionary unavailable".into());
        assert_eq!(err.to_string(), "dictionary unavailable");
    }
}
