//! Core data types for a check submission.
//!
//! Everything here is plain data: the form as the user left it, the typed
//! configuration sent to the checking service, the file handle held by a
//! session and the project the page was opened for.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize, Serializer};

/// Largest file accepted for upload (10 MiB).
pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Largest row count accepted on any single sheet.
pub const MAX_ROWS_PER_SHEET: u32 = 70_000;

/// Client-enforced limits. The server is not asked to confirm them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_file_bytes: u64,
    pub max_rows_per_sheet: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_file_bytes: MAX_FILE_BYTES,
            max_rows_per_sheet: MAX_ROWS_PER_SHEET,
        }
    }
}

impl Limits {
    /// The file size limit in whole megabytes, for messages.
    pub fn max_file_mb(&self) -> u64 {
        self.max_file_bytes / (1024 * 1024)
    }
}

// ============================================================================
// Column letters
// ============================================================================

/// A single spreadsheet column in `A..=Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnLetter(u8);

impl ColumnLetter {
    /// Parse a column field. Surrounding whitespace is ignored; anything other
    /// than exactly one character in `A..=Z` is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut chars = raw.trim().chars();
        let c = chars.next()?;
        if chars.next().is_some() || !c.is_ascii_uppercase() {
            return None;
        }
        Some(Self(c as u8))
    }

    pub fn as_char(self) -> char {
        self.0 as char
    }
}

impl fmt::Display for ColumnLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl Serialize for ColumnLetter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.as_char())
    }
}

// ============================================================================
// Form and configuration
// ============================================================================

/// Which server-side check runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CheckMode {
    /// Flag commonly mistaken words in a translated column.
    #[default]
    #[serde(rename = "common")]
    CommonErrorCheck,
    /// Annotate source text with the project's unified terminology.
    #[serde(rename = "spec")]
    TerminologyAnnotation,
}

impl CheckMode {
    /// Second output column is only part of the common-error form.
    pub fn needs_second_output(self) -> bool {
        matches!(self, CheckMode::CommonErrorCheck)
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            CheckMode::CommonErrorCheck => "common",
            CheckMode::TerminologyAnnotation => "spec",
        }
    }

    /// Label shown next to the input column field.
    pub fn input_label(self) -> &'static str {
        match self {
            CheckMode::CommonErrorCheck => "Translation column to check (A~Z)",
            CheckMode::TerminologyAnnotation => "Source text column (A~Z)",
        }
    }
}

impl fmt::Display for CheckMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// The submission form exactly as the user left it.
///
/// Column fields are raw text; [`FormState::normalized`] applies the
/// upper-casing a text field does as the user types.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    pub mode: CheckMode,
    pub input_column: String,
    pub output_column_1: String,
    pub output_column_2: String,
    pub check_all_sheets: bool,
    pub include_translation_hint: bool,
}

impl FormState {
    pub fn normalized(mut self) -> Self {
        self.input_column = self.input_column.trim().to_uppercase();
        self.output_column_1 = self.output_column_1.trim().to_uppercase();
        self.output_column_2 = self.output_column_2.trim().to_uppercase();
        self
    }
}

/// Typed configuration sent alongside the file as the `config` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckConfiguration {
    #[serde(rename = "project")]
    pub project_id: String,
    pub mode: CheckMode,
    #[serde(rename = "inputCol")]
    pub input_column: ColumnLetter,
    #[serde(rename = "outputCol1")]
    pub output_column_1: ColumnLetter,
    #[serde(rename = "checkAllSheets")]
    pub check_all_sheets: bool,
    /// Present iff mode is [`CheckMode::CommonErrorCheck`].
    #[serde(rename = "outputCol2", skip_serializing_if = "Option::is_none")]
    pub output_column_2: Option<ColumnLetter>,
    /// Present iff mode is [`CheckMode::TerminologyAnnotation`].
    #[serde(rename = "includeTransHint", skip_serializing_if = "Option::is_none")]
    pub include_translation_hint: Option<bool>,
}

impl CheckConfiguration {
    pub fn to_json(&self) -> String {
        // Only strings, chars and bools: serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

// ============================================================================
// Files and pre-check results
// ============================================================================

/// A file chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name without directories; the download is named after it.
    pub name: String,
    pub size_bytes: u64,
    /// Where the bytes live. Read by the inspector and the uploader.
    pub path: PathBuf,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, size_bytes: u64, path: impl Into<PathBuf>) -> Self {
        Self { name: name.into(), size_bytes, path: path.into() }
    }

    /// Build from a path on disk, reading only its metadata.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, meta.len(), path))
    }

    /// Size in megabytes with one decimal, as shown to the user.
    pub fn size_mb_display(&self) -> String {
        format!("{:.1}", self.size_bytes as f64 / 1024.0 / 1024.0)
    }
}

/// A sheet with more rows than the limit allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowViolation {
    pub sheet_name: String,
    pub observed_rows: u32,
    pub limit: u32,
}

/// How a submission attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Result saved under this file name.
    Success(String),
    Failure(String),
}

// ============================================================================
// Project
// ============================================================================

/// Display metadata for the project a page was opened for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectMetadata {
    pub id: String,
    pub name: String,
    pub description: String,
    pub term_dict_version: String,
    pub err_dict_version: String,
}

impl ProjectMetadata {
    /// Header shown above the form: title, description, dictionary versions.
    pub fn header_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Translation check: {}", self.name)];
        if !self.description.is_empty() {
            lines.push(self.description.clone());
        }
        lines.push(format!(
            "Term dictionary updated: {} | Error dictionary updated: {}",
            self.term_dict_version, self.err_dict_version
        ));
        lines
    }
}

/// Result of resolving the page's project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectResolution {
    Found(ProjectMetadata),
    NotFound,
}
