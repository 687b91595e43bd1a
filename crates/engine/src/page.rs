//! Page-level gate: a page either has a resolved project and a live
//! submission session, or shows the not-found surface for its whole life.

use crate::events::{Input, Output};
use crate::model::{Limits, ProjectResolution};
use crate::workflow::WorkflowSession;

#[derive(Debug)]
pub enum Page {
    Main(WorkflowSession),
    /// No project could be resolved. There is no retry within a page load.
    NotFound,
}

impl Page {
    pub fn open(resolution: ProjectResolution, limits: Limits) -> Self {
        match resolution {
            ProjectResolution::Found(project) => {
                log::info!("opened project '{}'", project.id);
                Page::Main(WorkflowSession::new(project, limits))
            }
            ProjectResolution::NotFound => {
                log::warn!("project not found, main surface stays hidden");
                Page::NotFound
            }
        }
    }

    pub fn is_main_visible(&self) -> bool {
        matches!(self, Page::Main(_))
    }

    pub fn session(&self) -> Option<&WorkflowSession> {
        match self {
            Page::Main(session) => Some(session),
            Page::NotFound => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut WorkflowSession> {
        match self {
            Page::Main(session) => Some(session),
            Page::NotFound => None,
        }
    }

    /// Forward to the session. The not-found surface has no controls, so
    /// every input is dropped there.
    pub fn handle(&mut self, input: Input) -> Vec<Output> {
        match self {
            Page::Main(session) => session.handle(input),
            Page::NotFound => Vec::new(),
        }
    }
}
