//! CLI Exit Code Registry
//!
//! Single source of truth for `transcheck` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Success                                                   |
//! | 1    | General error (unspecified)                               |
//! | 2    | Usage error (bad args, missing input file)                |
//! | 3    | Project not found (no id, unknown id, unusable reply)     |
//! | 4    | Column configuration rejected                             |
//! | 5    | File rejected by the pre-check (size, rows, unreadable)   |
//! | 6    | Service unreachable or request did not complete           |
//! | 7    | Service answered with an error                            |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above

use transcheck_client::ClientError;
use transcheck_engine::WorkflowError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unreadable input path.
pub const EXIT_USAGE: u8 = 2;

/// The page has no project, or the service does not know it.
pub const EXIT_PROJECT_NOT_FOUND: u8 = 3;

/// Column letters missing, malformed or repeated.
pub const EXIT_CONFIGURATION: u8 = 4;

/// File over the size limit, a sheet over the row limit, or not a spreadsheet.
pub const EXIT_FILE_REJECTED: u8 = 5;

/// Connection failed or the request did not complete.
pub const EXIT_TRANSPORT: u8 = 6;

/// Non-2xx reply, or a 2xx reply that could not be understood.
pub const EXIT_SERVER: u8 = 7;

/// Exit code for a failed submission.
pub fn workflow_exit_code(err: &WorkflowError) -> u8 {
    match err {
        WorkflowError::Configuration(_) => EXIT_CONFIGURATION,
        WorkflowError::FileRejected(_) => EXIT_FILE_REJECTED,
        WorkflowError::Transport(_) => EXIT_TRANSPORT,
        WorkflowError::Server(_) => EXIT_SERVER,
    }
}

/// Exit code for a failed service call outside a submission.
pub fn client_exit_code(err: &ClientError) -> u8 {
    match err {
        ClientError::Network(_) => EXIT_TRANSPORT,
        ClientError::Http(_, _) | ClientError::Parse(_) => EXIT_SERVER,
        ClientError::Io(_) => EXIT_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transcheck_engine::{ConfigError, FileRejection};

    #[test]
    fn test_codes_unique() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_ERROR,
            EXIT_USAGE,
            EXIT_PROJECT_NOT_FOUND,
            EXIT_CONFIGURATION,
            EXIT_FILE_REJECTED,
            EXIT_TRANSPORT,
            EXIT_SERVER,
        ];
        let mut sorted = codes.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
    }

    #[test]
    fn test_workflow_mapping() {
        assert_eq!(workflow_exit_code(&ConfigError::NoFile.into()), EXIT_CONFIGURATION);
        assert_eq!(
            workflow_exit_code(&FileRejection::Unreadable("bad zip".into()).into()),
            EXIT_FILE_REJECTED
        );
        assert_eq!(workflow_exit_code(&WorkflowError::Transport("reset".into())), EXIT_TRANSPORT);
        assert_eq!(workflow_exit_code(&WorkflowError::Server("down".into())), EXIT_SERVER);
    }

    #[test]
    fn test_client_mapping() {
        assert_eq!(client_exit_code(&ClientError::Network("refused".into())), EXIT_TRANSPORT);
        assert_eq!(client_exit_code(&ClientError::Http(503, String::new())), EXIT_SERVER);
    }
}
