//! `transcheck-engine`: client-side submission pipeline.
//!
//! Pure state: no HTTP, no spreadsheet decoding, no terminal. Front ends
//! drive a [`WorkflowSession`] with [`Input`] events and act on the
//! [`Output`] events it returns.

pub mod driver;
pub mod error;
pub mod events;
pub mod model;
pub mod page;
pub mod validate;
pub mod workflow;

pub use driver::{dispatch, Collaborators};
pub use error::{ColumnField, ConfigError, FileRejection, WorkflowError};
pub use events::{Input, MessageKind, Output, OutputLog, ResultReply};
pub use model::{
    CheckConfiguration, CheckMode, ColumnLetter, FormState, Limits, ProjectMetadata,
    ProjectResolution, RowViolation, SelectedFile, SubmissionOutcome, MAX_FILE_BYTES,
    MAX_ROWS_PER_SHEET,
};
pub use page::Page;
pub use validate::validate;
pub use workflow::{server_message, Phase, WorkflowSession};
