//! Form validation run before anything is sent.
//!
//! Purely syntactic: single letters, pairwise distinct. Whether a column
//! actually holds the expected text is left to the server.

use crate::error::{ColumnField, ConfigError};
use crate::model::{CheckConfiguration, ColumnLetter, FormState};

/// Validate the form. Rules run in order and the first failure wins.
pub fn validate(form: &FormState, file_selected: bool) -> Option<ConfigError> {
    columns(form, file_selected).err()
}

fn columns(
    form: &FormState,
    file_selected: bool,
) -> Result<(ColumnLetter, ColumnLetter, Option<ColumnLetter>), ConfigError> {
    if !file_selected {
        return Err(ConfigError::NoFile);
    }

    let input = column(&form.input_column, ColumnField::Input, &[])?;
    let output1 = column(&form.output_column_1, ColumnField::Output1, &[input])?;

    let output2 = if form.mode.needs_second_output() {
        Some(column(&form.output_column_2, ColumnField::Output2, &[input, output1])?)
    } else {
        None
    };

    Ok((input, output1, output2))
}

fn column(raw: &str, field: ColumnField, taken: &[ColumnLetter]) -> Result<ColumnLetter, ConfigError> {
    let letter = ColumnLetter::parse(raw).ok_or(ConfigError::MalformedColumn { field })?;
    if taken.contains(&letter) {
        return Err(ConfigError::DuplicateColumn { field });
    }
    Ok(letter)
}

impl CheckConfiguration {
    /// Validate `form` and build the configuration to submit.
    ///
    /// File presence is the caller's concern; only the column rules apply.
    pub fn from_form(project_id: &str, form: &FormState) -> Result<Self, ConfigError> {
        let (input_column, output_column_1, output_column_2) = columns(form, true)?;
        let include_translation_hint = if form.mode.needs_second_output() {
            None
        } else {
            Some(form.include_translation_hint)
        };

        Ok(Self {
            project_id: project_id.to_string(),
            mode: form.mode,
            input_column,
            output_column_1,
            check_all_sheets: form.check_all_sheets,
            output_column_2,
            include_translation_hint,
        })
    }
}
