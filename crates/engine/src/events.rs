//! Event types crossing the workflow boundary.
//!
//! A front end feeds [`Input`] events into a session and renders or executes
//! the [`Output`] events it gets back. Outputs that ask for I/O (inspect,
//! upload, fetch, download) are answered later with the matching completion
//! input. The machine itself never blocks.

use crate::model::{CheckConfiguration, CheckMode, FormState, RowViolation, SelectedFile};

/// Discrete events a front end delivers to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// The user picked a file (`None` = selection cleared).
    FileChosen(Option<SelectedFile>),
    /// Completion of [`Output::Inspect`]. `Err` carries the reader's message.
    PreCheckFinished(Result<Vec<RowViolation>, String>),
    ModeChanged(CheckMode),
    SubmitClicked(FormState),
    /// Completion of [`Output::Upload`]: the request went out and a status
    /// came back. `Err` is the transport failure text.
    UploadFinished(Result<(), String>),
    /// Completion of [`Output::FetchResult`].
    ResultReceived(ResultReply),
    /// Completion of [`Output::TriggerDownload`]: the saved file name, or why
    /// saving failed.
    DownloadFinished(Result<String, String>),
}

/// What reading the check response produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultReply {
    /// 2xx: the annotated spreadsheet.
    Body(Vec<u8>),
    /// Non-2xx status with whatever body the server sent.
    Rejected { status: u16, body: Vec<u8> },
    /// The body could not be read.
    Transport(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

/// Discrete events a session asks its front end to render or execute.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Replace the status message. May span several lines.
    ShowMessage { kind: MessageKind, text: String },
    HideMessage,
    ShowProgress { percent: u8, label: String },
    HideProgress,
    SubmitEnabled(bool),
    /// Name shown next to the file picker (`None` = nothing selected).
    FileLabel(Option<String>),
    /// Which mode-specific fields are visible.
    ModeFields {
        input_label: &'static str,
        output_column_2: bool,
        translation_hint: bool,
    },

    /// Read the file and report row violations via [`Input::PreCheckFinished`].
    Inspect(SelectedFile),
    /// POST the file with its configuration; answer with [`Input::UploadFinished`].
    Upload { file: SelectedFile, config: CheckConfiguration },
    /// Read the response; answer with [`Input::ResultReceived`].
    FetchResult,
    /// Hand the bytes to the user as `filename`; answer with [`Input::DownloadFinished`].
    TriggerDownload { filename: String, bytes: Vec<u8> },
}

impl Output {
    /// True for outputs that request work from the front end.
    pub fn is_effect(&self) -> bool {
        matches!(
            self,
            Output::Inspect(_) | Output::Upload { .. } | Output::FetchResult | Output::TriggerDownload { .. }
        )
    }
}

/// Simple output collector for testing and headless front ends.
#[derive(Debug, Default)]
pub struct OutputLog {
    outputs: Vec<Output>,
}

impl OutputLog {
    pub fn new() -> Self {
        Self { outputs: Vec::new() }
    }

    pub fn extend(&mut self, outputs: impl IntoIterator<Item = Output>) {
        self.outputs.extend(outputs);
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn clear(&mut self) {
        self.outputs.clear();
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Messages in order, with their kind.
    pub fn messages(&self) -> Vec<(MessageKind, &str)> {
        self.outputs
            .iter()
            .filter_map(|o| match o {
                Output::ShowMessage { kind, text } => Some((*kind, text.as_str())),
                _ => None,
            })
            .collect()
    }

    /// The most recent message, if any.
    pub fn last_message(&self) -> Option<(MessageKind, &str)> {
        self.messages().pop()
    }

    /// Progress percentages in order.
    pub fn progress(&self) -> Vec<u8> {
        self.outputs
            .iter()
            .filter_map(|o| match o {
                Output::ShowProgress { percent, .. } => Some(*percent),
                _ => None,
            })
            .collect()
    }

    /// Effect requests only.
    pub fn effects(&self) -> Vec<&Output> {
        self.outputs.iter().filter(|o| o.is_effect()).collect()
    }

    /// Last submit-enabled state reported, if any.
    pub fn submit_enabled(&self) -> Option<bool> {
        self.outputs.iter().rev().find_map(|o| match o {
            Output::SubmitEnabled(enabled) => Some(*enabled),
            _ => None,
        })
    }
}
