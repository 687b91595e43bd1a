//! Checking-service client: project lookup, listing and check submission.

pub mod client;
pub mod listing;
pub mod project;

pub use client::{CheckClient, ClientError, HealthStatus, PendingCheck, ProjectEntry};
pub use listing::{stats, summarize, ListingStats, ProjectSummary};
pub use project::{project_link, ProjectContext};
