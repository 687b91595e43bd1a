//! `transcheck inspect`: the pre-check on its own, no service involved.

use std::path::Path;

use serde::Serialize;

use transcheck_config::Settings;
use transcheck_engine::{FileRejection, SelectedFile, WorkflowError};
use transcheck_io::{inspect_report, InspectError, SheetRows};

use crate::exit_codes::EXIT_FILE_REJECTED;
use crate::CliError;

#[derive(Serialize)]
struct SheetJson<'a> {
    name: &'a str,
    rows: u32,
    over_limit: bool,
}

#[derive(Serialize)]
struct InspectJson<'a> {
    file: &'a str,
    size_bytes: u64,
    max_file_bytes: u64,
    max_rows_per_sheet: u32,
    sheets: Vec<SheetJson<'a>>,
    passed: bool,
}

fn rejected(rejection: FileRejection) -> CliError {
    CliError {
        code: EXIT_FILE_REJECTED,
        message: WorkflowError::from(rejection).to_string(),
        hint: None,
    }
}

pub fn cmd_inspect(settings: &Settings, path: &Path, json: bool) -> Result<(), CliError> {
    let limits = settings.limits();
    let file = SelectedFile::from_path(path)
        .map_err(|e| CliError::args(format!("cannot read {}: {}", path.display(), e)))?;

    if file.size_bytes > limits.max_file_bytes {
        return Err(rejected(FileRejection::TooLarge {
            size_mb: file.size_mb_display(),
            limit_mb: limits.max_file_mb(),
        }));
    }

    let bytes = std::fs::read(path).map_err(|e| CliError::io(format!("{}: {}", path.display(), e)))?;
    let report = inspect_report(&bytes, limits.max_rows_per_sheet).map_err(|e| match e {
        InspectError::Io(msg) => CliError::io(msg),
        InspectError::Parse(msg) => rejected(FileRejection::Unreadable(msg))
            .with_hint("only xlsx, xlsm, xlsb, xls and ods workbooks can be checked"),
    })?;

    let over = |s: &SheetRows| s.rows > limits.max_rows_per_sheet;

    if json {
        let out = InspectJson {
            file: &file.name,
            size_bytes: file.size_bytes,
            max_file_bytes: limits.max_file_bytes,
            max_rows_per_sheet: limits.max_rows_per_sheet,
            sheets: report
                .sheets
                .iter()
                .map(|s| SheetJson { name: &s.name, rows: s.rows, over_limit: over(s) })
                .collect(),
            passed: report.passed(),
        };
        let text = serde_json::to_string_pretty(&out).map_err(|e| CliError::io(e.to_string()))?;
        println!("{}", text);
    } else {
        println!("{} ({}MB)", file.name, file.size_mb_display());
        for sheet in &report.sheets {
            let marker = if over(sheet) { "  over limit" } else { "" };
            println!("  {:<32} {:>8} rows{}", sheet.name, sheet.rows, marker);
        }
        println!("{}", report.summary());
    }

    if report.passed() {
        Ok(())
    } else {
        let rejection = FileRejection::TooManyRows {
            violations: report.violations,
            limit: limits.max_rows_per_sheet,
        };
        // JSON output already carries the verdict.
        let mut err = rejected(rejection);
        if json {
            err.message.clear();
        }
        Err(err)
    }
}
