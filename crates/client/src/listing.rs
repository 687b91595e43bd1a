//! Project listing: one summary per configured project plus totals.

use serde::Serialize;

use crate::client::ProjectEntry;
use crate::project::project_link;

pub const NO_DESCRIPTION: &str = "No description";

/// A listed project with every display default applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub term_dict: String,
    pub tags: Vec<String>,
    pub link: String,
}

impl ProjectSummary {
    pub fn new(id: &str, entry: &ProjectEntry, page_base: &str) -> Self {
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());

        Self {
            id: id.to_string(),
            name: non_empty(&entry.name).unwrap_or_else(|| id.to_string()),
            description: non_empty(&entry.description).unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            term_dict: non_empty(&entry.term_dict).unwrap_or_else(|| format!("termDict_{}.json", id)),
            tags: entry.tags.clone(),
            link: project_link(page_base, id),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ListingStats {
    pub total: usize,
    pub with_tags: usize,
}

impl std::fmt::Display for ListingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} project(s), {} with tags", self.total, self.with_tags)
    }
}

pub fn summarize(projects: &[(String, ProjectEntry)], page_base: &str) -> Vec<ProjectSummary> {
    projects
        .iter()
        .map(|(id, entry)| ProjectSummary::new(id, entry, page_base))
        .collect()
}

pub fn stats(summaries: &[ProjectSummary]) -> ListingStats {
    ListingStats {
        total: summaries.len(),
        with_tags: summaries.iter().filter(|s| !s.tags.is_empty()).count(),
    }
}
