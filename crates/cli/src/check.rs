//! `transcheck check` and `transcheck project`.
//!
//! The check command opens a page for the project, then drives its session
//! exactly as the form would: mode, file selection, submit.

use std::path::PathBuf;

use transcheck_client::{CheckClient, PendingCheck, ProjectContext};
use transcheck_config::Settings;
use transcheck_engine::{
    dispatch, validate, CheckConfiguration, CheckMode, Collaborators, FormState, Input, MessageKind,
    Output, Page, ProjectMetadata, ResultReply, RowViolation, SelectedFile, SubmissionOutcome,
    WorkflowError, WorkflowSession,
};

use crate::exit_codes::{workflow_exit_code, EXIT_ERROR, EXIT_PROJECT_NOT_FOUND};
use crate::{make_client, CliError};

pub struct CheckRequest {
    pub file: PathBuf,
    pub mode: CheckMode,
    pub input: String,
    pub output1: String,
    pub output2: String,
    pub all_sheets: bool,
    pub hint: bool,
    pub out_dir: PathBuf,
    pub quiet: bool,
}

impl CheckRequest {
    fn form(&self) -> FormState {
        FormState {
            mode: self.mode,
            input_column: self.input.clone(),
            output_column_1: self.output1.clone(),
            output_column_2: self.output2.clone(),
            check_all_sheets: self.all_sheets,
            include_translation_hint: self.hint,
        }
        .normalized()
    }
}

/// Terminal stand-in for the page: inspects locally, talks to the service
/// and writes progress to stderr.
struct TerminalFront {
    client: CheckClient,
    pending: Option<PendingCheck>,
    out_dir: PathBuf,
    quiet: bool,
}

impl Collaborators for TerminalFront {
    fn inspect(&mut self, file: &SelectedFile, limit: u32) -> Result<Vec<RowViolation>, String> {
        transcheck_io::inspect_path(&file.path, limit).map_err(|e| e.to_string())
    }

    fn upload(&mut self, file: &SelectedFile, config: &CheckConfiguration) -> Result<(), String> {
        let pending = self.client.send_check(file, config).map_err(|e| e.to_string())?;
        self.pending = Some(pending);
        Ok(())
    }

    fn fetch_result(&mut self) -> ResultReply {
        match self.pending.take() {
            Some(pending) => pending.into_reply(),
            None => ResultReply::Transport("no request in flight".to_string()),
        }
    }

    fn download(&mut self, filename: &str, bytes: &[u8]) -> Result<String, String> {
        transcheck_io::save_download(&self.out_dir, filename, bytes).map(|p| p.display().to_string())
    }

    fn render(&mut self, output: &Output) {
        match output {
            // Errors surface through the exit path.
            Output::ShowMessage { kind: MessageKind::Error, .. } => {}
            Output::ShowMessage { text, .. } if !self.quiet => eprintln!("{}", text),
            Output::ShowProgress { percent, label } if !self.quiet => {
                eprintln!("[{:>3}%] {}", percent, label)
            }
            other => log::debug!("{:?}", other),
        }
    }
}

fn open_page(client: &CheckClient, ctx: &ProjectContext, settings: &Settings) -> Result<Page, CliError> {
    let page = Page::open(ctx.resolve(client), settings.limits());
    if !page.is_main_visible() {
        let message = match ctx.project_id() {
            Some(id) => format!("Project '{}' not found", id),
            None => "No project given".to_string(),
        };
        return Err(CliError {
            code: EXIT_PROJECT_NOT_FOUND,
            message,
            hint: Some("check the project id, or run `transcheck projects` to list them".into()),
        });
    }
    Ok(page)
}

fn session_failure(session: &WorkflowSession) -> CliError {
    match session.last_error() {
        Some(err) => CliError { code: workflow_exit_code(err), message: err.to_string(), hint: None },
        None => CliError { code: EXIT_ERROR, message: "check did not complete".into(), hint: None },
    }
}

pub fn cmd_check(
    settings: &Settings,
    api_base: &str,
    ctx: &ProjectContext,
    request: CheckRequest,
) -> Result<(), CliError> {
    let file = SelectedFile::from_path(&request.file)
        .map_err(|e| CliError::args(format!("cannot read {}: {}", request.file.display(), e)))?;

    let client = make_client(settings, api_base)?;
    let mut page = open_page(&client, ctx, settings)?;

    // Column mistakes are known up front; reject them before decoding the workbook.
    if let Some(err) = validate(&request.form(), true) {
        let err = WorkflowError::from(err);
        return Err(CliError { code: workflow_exit_code(&err), message: err.to_string(), hint: None });
    }

    let Some(session) = page.session_mut() else {
        return Err(CliError::io("project page has no session"));
    };

    if !request.quiet {
        for line in session.project().header_lines() {
            eprintln!("{}", line);
        }
    }

    let mut front = TerminalFront {
        client,
        pending: None,
        out_dir: request.out_dir.clone(),
        quiet: request.quiet,
    };

    dispatch(session, Input::ModeChanged(request.mode), &mut front);
    dispatch(session, Input::FileChosen(Some(file)), &mut front);
    if session.selected_file().is_none() {
        return Err(session_failure(session));
    }

    dispatch(session, Input::SubmitClicked(request.form()), &mut front);

    match session.last_outcome() {
        Some(SubmissionOutcome::Success(saved)) => {
            println!("{}", saved);
            Ok(())
        }
        _ => Err(session_failure(session)),
    }
}

pub fn cmd_project(settings: &Settings, api_base: &str, ctx: &ProjectContext, json: bool) -> Result<(), CliError> {
    let client = make_client(settings, api_base)?;
    let page = open_page(&client, ctx, settings)?;
    let Some(project) = page.session().map(|s| s.project()) else {
        return Err(CliError::io("project page has no session"));
    };

    if json {
        print_json(project)
    } else {
        for line in project.header_lines() {
            println!("{}", line);
        }
        Ok(())
    }
}

fn print_json(project: &ProjectMetadata) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(project).map_err(|e| CliError::io(e.to_string()))?;
    println!("{}", text);
    Ok(())
}
