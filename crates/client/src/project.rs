//! Project resolution from the page address.

use url::Url;

use transcheck_engine::ProjectResolution;

use crate::client::{CheckClient, ClientError};

/// Query parameter carrying the project id.
pub const PROJECT_PARAM: &str = "project";

/// Where the page was opened from, reduced to the project id it names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectContext {
    project_id: Option<String>,
}

impl ProjectContext {
    /// Read the `project` query parameter of a page address.
    pub fn from_page_url(page_url: &str) -> Result<Self, ClientError> {
        let url = Url::parse(page_url)
            .map_err(|e| ClientError::Parse(format!("invalid page address '{}': {}", page_url, e)))?;

        let project_id = url
            .query_pairs()
            .find(|(key, _)| key == PROJECT_PARAM)
            .map(|(_, value)| value.into_owned());

        Ok(Self::from_optional(project_id))
    }

    pub fn from_project_id(project_id: impl Into<String>) -> Self {
        Self::from_optional(Some(project_id.into()))
    }

    fn from_optional(project_id: Option<String>) -> Self {
        Self {
            project_id: project_id.filter(|id| !id.is_empty()),
        }
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Look the project up. No id means no request at all.
    pub fn resolve(&self, client: &CheckClient) -> ProjectResolution {
        let Some(id) = self.project_id() else {
            log::warn!("no '{}' parameter in page address", PROJECT_PARAM);
            return ProjectResolution::NotFound;
        };

        match client.get_project(id) {
            Ok(meta) => {
                log::info!("project '{}' resolved as '{}'", id, meta.name);
                ProjectResolution::Found(meta)
            }
            Err(e) => {
                log::warn!("project '{}' could not be loaded: {}", id, e);
                ProjectResolution::NotFound
            }
        }
    }
}

/// Page address that opens `project_id`: `<page_base>?project=<id>`.
pub fn project_link(page_base: &str, project_id: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(project_id.as_bytes()).collect();
    format!("{}?{}={}", page_base, PROJECT_PARAM, encoded)
}
