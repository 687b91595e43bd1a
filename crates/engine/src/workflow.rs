//! The submission state machine.
//!
//! `Idle → Validating → Uploading → AwaitingResult → Downloading → Idle`,
//! with `Error` reachable from every step and a separate `PreChecking` step
//! entered whenever a file is chosen. One `WorkflowSession` exists per page
//! load and owns the selected file.
//!
//! INVARIANT: while a submission or pre-check is in flight, submit and file
//! selection are disabled. Inputs arriving in that window are dropped, so at
//! most one request is outstanding per session.

use serde::Deserialize;

use crate::error::{ConfigError, FileRejection, WorkflowError};
use crate::events::{Input, MessageKind, Output, ResultReply};
use crate::model::{
    CheckConfiguration, CheckMode, FormState, Limits, ProjectMetadata, RowViolation, SelectedFile,
    SubmissionOutcome,
};
use crate::validate::validate;

/// Fallback when a failed response carries no readable `error` field.
pub const GENERIC_FAILURE: &str = "Processing failed";

/// Where a session currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    PreChecking,
    Uploading,
    AwaitingResult,
    Downloading,
    Error(WorkflowError),
}

impl Phase {
    /// A submission is in flight.
    pub fn is_submitting(&self) -> bool {
        matches!(
            self,
            Phase::Validating | Phase::Uploading | Phase::AwaitingResult | Phase::Downloading
        )
    }

    /// Controls are disabled.
    pub fn is_busy(&self) -> bool {
        self.is_submitting() || matches!(self, Phase::PreChecking)
    }
}

/// Per-page submission state.
#[derive(Debug)]
pub struct WorkflowSession {
    project: ProjectMetadata,
    limits: Limits,
    phase: Phase,
    mode: CheckMode,
    selected: Option<SelectedFile>,
    download_name: Option<String>,
    last_error: Option<WorkflowError>,
    outcome: Option<SubmissionOutcome>,
}

impl WorkflowSession {
    pub fn new(project: ProjectMetadata, limits: Limits) -> Self {
        Self {
            project,
            limits,
            phase: Phase::Idle,
            mode: CheckMode::default(),
            selected: None,
            download_name: None,
            last_error: None,
            outcome: None,
        }
    }

    pub fn project(&self) -> &ProjectMetadata {
        &self.project
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn mode(&self) -> CheckMode {
        self.mode
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn submit_enabled(&self) -> bool {
        !self.phase.is_busy()
    }

    /// The most recent failure, including file rejections that left the
    /// session `Idle`.
    pub fn last_error(&self) -> Option<&WorkflowError> {
        self.last_error.as_ref()
    }

    /// How the most recent submission ended.
    pub fn last_outcome(&self) -> Option<&SubmissionOutcome> {
        self.outcome.as_ref()
    }

    /// Apply one input event and return what the front end should do.
    pub fn handle(&mut self, input: Input) -> Vec<Output> {
        match input {
            Input::FileChosen(file) => self.on_file_chosen(file),
            Input::PreCheckFinished(result) => self.on_pre_check(result),
            Input::ModeChanged(mode) => self.on_mode_changed(mode),
            Input::SubmitClicked(form) => self.on_submit(form),
            Input::UploadFinished(result) => self.on_uploaded(result),
            Input::ResultReceived(reply) => self.on_result(reply),
            Input::DownloadFinished(result) => self.on_downloaded(result),
        }
    }

    // ── File selection and pre-check ────────────────────────────────

    fn on_file_chosen(&mut self, file: Option<SelectedFile>) -> Vec<Output> {
        if self.phase.is_busy() {
            log::debug!("file selection ignored while {:?}", self.phase);
            return Vec::new();
        }

        let Some(file) = file else {
            self.selected = None;
            return vec![Output::FileLabel(None)];
        };

        if file.size_bytes > self.limits.max_file_bytes {
            log::warn!("rejecting '{}': {} bytes", file.name, file.size_bytes);
            return self.reject_file(FileRejection::TooLarge {
                size_mb: file.size_mb_display(),
                limit_mb: self.limits.max_file_mb(),
            });
        }

        log::debug!("pre-checking '{}' ({} bytes)", file.name, file.size_bytes);
        self.selected = Some(file.clone());
        self.phase = Phase::PreChecking;
        vec![
            Output::FileLabel(Some(file.name.clone())),
            Output::SubmitEnabled(false),
            Output::ShowMessage {
                kind: MessageKind::Info,
                text: "Checking file row counts...".into(),
            },
            Output::Inspect(file),
        ]
    }

    fn on_pre_check(&mut self, result: Result<Vec<RowViolation>, String>) -> Vec<Output> {
        if self.phase != Phase::PreChecking {
            log::debug!("stale pre-check result ignored in {:?}", self.phase);
            return Vec::new();
        }

        match result {
            Ok(violations) if violations.is_empty() => {
                self.phase = Phase::Idle;
                vec![
                    Output::ShowMessage {
                        kind: MessageKind::Success,
                        text: "File ready to upload".into(),
                    },
                    Output::SubmitEnabled(true),
                ]
            }
            Ok(violations) => self.reject_file(FileRejection::TooManyRows {
                violations,
                limit: self.limits.max_rows_per_sheet,
            }),
            Err(msg) => self.reject_file(FileRejection::Unreadable(msg)),
        }
    }

    /// Revoke the selection. The session stays usable: the user picks again.
    fn reject_file(&mut self, rejection: FileRejection) -> Vec<Output> {
        let err = WorkflowError::FileRejected(rejection);
        let text = err.to_string();
        self.selected = None;
        self.phase = Phase::Idle;
        self.last_error = Some(err);
        vec![
            Output::FileLabel(None),
            Output::ShowMessage { kind: MessageKind::Error, text },
            Output::SubmitEnabled(true),
        ]
    }

    fn on_mode_changed(&mut self, mode: CheckMode) -> Vec<Output> {
        self.mode = mode;
        vec![Output::ModeFields {
            input_label: mode.input_label(),
            output_column_2: mode.needs_second_output(),
            translation_hint: !mode.needs_second_output(),
        }]
    }

    // ── Submission ──────────────────────────────────────────────────

    fn on_submit(&mut self, form: FormState) -> Vec<Output> {
        if self.phase.is_busy() {
            log::debug!("submit ignored while {:?}", self.phase);
            return Vec::new();
        }

        self.phase = Phase::Validating;
        self.last_error = None;
        self.outcome = None;

        if let Some(err) = validate(&form, self.selected.is_some()) {
            log::info!("submission rejected: {err}");
            return self.fail(err.into());
        }

        let config = match CheckConfiguration::from_form(&self.project.id, &form) {
            Ok(config) => config,
            Err(err) => return self.fail(err.into()),
        };
        let Some(file) = self.selected.clone() else {
            return self.fail(ConfigError::NoFile.into());
        };

        log::info!(
            "submitting '{}' to project '{}' (mode {})",
            file.name, config.project_id, config.mode
        );
        self.download_name = Some(format!("checked_{}", file.name));
        self.phase = Phase::Uploading;
        vec![
            Output::SubmitEnabled(false),
            Output::HideMessage,
            Output::ShowProgress { percent: 20, label: "Uploading file...".into() },
            Output::Upload { file, config },
        ]
    }

    fn on_uploaded(&mut self, result: Result<(), String>) -> Vec<Output> {
        if self.phase != Phase::Uploading {
            log::debug!("upload completion ignored in {:?}", self.phase);
            return Vec::new();
        }

        match result {
            Ok(()) => {
                self.phase = Phase::AwaitingResult;
                vec![
                    Output::ShowProgress { percent: 50, label: "Checking...".into() },
                    Output::FetchResult,
                ]
            }
            Err(msg) => self.fail(WorkflowError::Transport(msg)),
        }
    }

    fn on_result(&mut self, reply: ResultReply) -> Vec<Output> {
        if self.phase != Phase::AwaitingResult {
            log::debug!("result ignored in {:?}", self.phase);
            return Vec::new();
        }

        match reply {
            ResultReply::Body(bytes) => {
                let filename = self.download_name.clone().unwrap_or_else(|| "checked_result.xlsx".into());
                log::debug!("received {} bytes, saving as '{}'", bytes.len(), filename);
                self.phase = Phase::Downloading;
                vec![
                    Output::ShowProgress { percent: 80, label: "Downloading...".into() },
                    Output::TriggerDownload { filename, bytes },
                ]
            }
            ResultReply::Rejected { status, body } => {
                log::warn!("check failed with HTTP {status}");
                self.fail(WorkflowError::Server(server_message(status, &body)))
            }
            ResultReply::Transport(msg) => self.fail(WorkflowError::Transport(msg)),
        }
    }

    fn on_downloaded(&mut self, result: Result<String, String>) -> Vec<Output> {
        if self.phase != Phase::Downloading {
            log::debug!("download completion ignored in {:?}", self.phase);
            return Vec::new();
        }

        match result {
            Ok(name) => {
                log::info!("check complete: {name}");
                self.phase = Phase::Idle;
                self.outcome = Some(SubmissionOutcome::Success(name.clone()));
                vec![
                    Output::HideProgress,
                    Output::ShowMessage {
                        kind: MessageKind::Success,
                        text: format!("Check complete! File downloaded: {name}"),
                    },
                    Output::SubmitEnabled(true),
                ]
            }
            Err(msg) => self.fail(WorkflowError::Transport(format!("could not save result: {msg}"))),
        }
    }

    /// Every error path: clear progress, show the message, re-enable submit.
    fn fail(&mut self, err: WorkflowError) -> Vec<Output> {
        let text = err.to_string();
        self.outcome = Some(SubmissionOutcome::Failure(text.clone()));
        self.last_error = Some(err.clone());
        self.phase = Phase::Error(err);
        vec![
            Output::HideProgress,
            Output::ShowMessage { kind: MessageKind::Error, text },
            Output::SubmitEnabled(true),
        ]
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Extract the server's `error` message from a failed response body.
pub fn server_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|msg| !msg.trim().is_empty())
        .unwrap_or_else(|| format!("{GENERIC_FAILURE} (HTTP {status})"))
}
