//! Sequential driver: feeds a session, renders its outputs and runs the
//! effects it asks for, one after another.
//!
//! Each effect is a suspension point. Its completion is fed back as the next
//! input, so the order validate → upload → fetch → download cannot be
//! skipped or reordered by the front end.

use std::collections::VecDeque;

use crate::events::{Input, Output, ResultReply};
use crate::model::{CheckConfiguration, RowViolation, SelectedFile};
use crate::workflow::WorkflowSession;

/// The outside world a session needs: the spreadsheet inspector, the
/// checking service, somewhere to put downloads, and a display.
pub trait Collaborators {
    /// Read the file and return sheets over `limit` rows.
    fn inspect(&mut self, file: &SelectedFile, limit: u32) -> Result<Vec<RowViolation>, String>;

    /// Send the file and configuration. `Err` = the request never completed.
    fn upload(&mut self, file: &SelectedFile, config: &CheckConfiguration) -> Result<(), String>;

    /// Read the response of the last upload.
    fn fetch_result(&mut self) -> ResultReply;

    /// Save the result, returning the name it was saved under.
    fn download(&mut self, filename: &str, bytes: &[u8]) -> Result<String, String>;

    /// Show a non-effect output.
    fn render(&mut self, output: &Output);
}

/// Deliver `input` and keep going until the session stops asking for work.
pub fn dispatch<C: Collaborators>(session: &mut WorkflowSession, input: Input, env: &mut C) {
    let mut queue = VecDeque::from([input]);

    while let Some(input) = queue.pop_front() {
        for output in session.handle(input) {
            let next = match &output {
                Output::Inspect(file) => {
                    Input::PreCheckFinished(env.inspect(file, session.limits().max_rows_per_sheet))
                }
                Output::Upload { file, config } => Input::UploadFinished(env.upload(file, config)),
                Output::FetchResult => Input::ResultReceived(env.fetch_result()),
                Output::TriggerDownload { filename, bytes } => {
                    Input::DownloadFinished(env.download(filename, bytes))
                }
                _ => {
                    env.render(&output);
                    continue;
                }
            };
            queue.push_back(next);
        }
    }
}
