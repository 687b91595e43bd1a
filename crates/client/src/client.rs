//! Checking-service HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required). Covers project
//! lookup, the project listing, the health check and check submission.

use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use serde::Deserialize;
use url::Url;

use transcheck_engine::{CheckConfiguration, ProjectMetadata, ResultReply, SelectedFile};

/// Checking-service client (blocking).
#[derive(Clone)]
pub struct CheckClient {
    http: reqwest::blocking::Client,
    api_base: String,
}

/// Error type for service operations.
#[derive(Debug)]
pub enum ClientError {
    /// Connection, TLS or body transfer failure
    Network(String),
    /// Non-2xx status with the response body
    Http(u16, String),
    /// Unexpected response shape, or an unusable API base
    Parse(String),
    /// Local file could not be read
    Io(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Network(msg) => write!(f, "Network error: {}", msg),
            ClientError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            ClientError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ClientError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

/// Reply of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub projects: Vec<String>,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// One entry of `GET /api/projects`, as configured on the server.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProjectEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, rename = "termDict")]
    pub term_dict: Option<String>,
}

#[derive(Deserialize)]
struct ProjectsResponse {
    projects: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct ProjectResponse {
    project: ProjectInfo,
    #[serde(default, rename = "termDictVersion")]
    term_dict_version: String,
    #[serde(default, rename = "errDictVersion")]
    err_dict_version: String,
}

#[derive(Deserialize)]
struct ProjectInfo {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
}

/// A check request the server has answered; the body is not read yet.
pub struct PendingCheck {
    response: reqwest::blocking::Response,
}

impl PendingCheck {
    /// Read the reply: the result file on 2xx, the raw error body otherwise.
    pub fn into_reply(self) -> ResultReply {
        let status = self.response.status();
        match self.response.bytes() {
            Ok(body) if status.is_success() => {
                log::info!("check result received ({} bytes)", body.len());
                ResultReply::Body(body.to_vec())
            }
            Ok(body) => {
                log::warn!("check rejected with HTTP {}", status.as_u16());
                ResultReply::Rejected {
                    status: status.as_u16(),
                    body: body.to_vec(),
                }
            }
            Err(e) => ResultReply::Transport(e.to_string()),
        }
    }
}

impl CheckClient {
    /// Create a client for `api_base` (e.g. `http://localhost:5000`).
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(api_base: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("transcheck/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch metadata for one project.
    pub fn get_project(&self, project_id: &str) -> Result<ProjectMetadata, ClientError> {
        let url = self.endpoint(&["api", "project", project_id])?;
        let resp = self.get(url)?;
        let body: ProjectResponse = resp.json().map_err(|e| ClientError::Parse(e.to_string()))?;

        let name = if body.project.name.is_empty() {
            project_id.to_string()
        } else {
            body.project.name
        };

        Ok(ProjectMetadata {
            id: project_id.to_string(),
            name,
            description: body.project.description.unwrap_or_default(),
            term_dict_version: body.term_dict_version,
            err_dict_version: body.err_dict_version,
        })
    }

    /// Every configured project, keyed by id, in id order.
    pub fn list_projects(&self) -> Result<Vec<(String, ProjectEntry)>, ClientError> {
        let url = self.endpoint(&["api", "projects"])?;
        let resp = self.get(url)?;
        let body: ProjectsResponse = resp
            .json()
            .map_err(|e| ClientError::Parse(format!("unexpected project list: {}", e)))?;

        let mut projects: Vec<(String, ProjectEntry)> = body
            .projects
            .into_iter()
            .map(|(id, value)| {
                let entry = serde_json::from_value(value).unwrap_or_else(|e| {
                    log::warn!("project '{}' has unexpected fields: {}", id, e);
                    ProjectEntry::default()
                });
                (id, entry)
            })
            .collect();
        projects.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(projects)
    }

    /// Probe `GET /api/health`.
    pub fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.endpoint(&["api", "health"])?;
        let resp = self.get(url)?;
        resp.json::<HealthStatus>().map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// Send `file` and `config` to `POST /api/check`.
    ///
    /// Returns once the server has answered with any status; only a request
    /// that never completes is an error here.
    pub fn send_check(&self, file: &SelectedFile, config: &CheckConfiguration) -> Result<PendingCheck, ClientError> {
        let url = self.endpoint(&["api", "check"])?;
        let bytes = std::fs::read(&file.path)
            .map_err(|e| ClientError::Io(format!("{}: {}", file.path.display(), e)))?;

        let part = Part::bytes(bytes).file_name(file.name.clone());
        let form = Form::new().part("file", part).text("config", config.to_json());

        log::info!("submitting '{}' ({} bytes) to {}", file.name, file.size_bytes, url);
        let response = self.http.post(url)
            .multipart(form)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(PendingCheck { response })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| ClientError::Parse(format!("invalid API base '{}': {}", self.api_base, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Parse(format!("API base '{}' cannot take a path", self.api_base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get(&self, url: Url) -> Result<reqwest::blocking::Response, ClientError> {
        log::debug!("GET {}", url);
        let response = self.http.get(url)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClientError::Http(status, body));
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use transcheck_engine::{CheckMode, FormState};

    fn client(server: &MockServer) -> CheckClient {
        CheckClient::new(server.base_url(), None).unwrap()
    }

    fn config() -> CheckConfiguration {
        let form = FormState {
            mode: CheckMode::CommonErrorCheck,
            input_column: "B".into(),
            output_column_1: "C".into(),
            output_column_2: "D".into(),
            check_all_sheets: true,
            include_translation_hint: false,
        };
        CheckConfiguration::from_form("acme", &form).unwrap()
    }

    fn upload_file(dir: &tempfile::TempDir) -> SelectedFile {
        let path = dir.path().join("glossary.xlsx");
        std::fs::write(&path, b"PK fake workbook").unwrap();
        SelectedFile::from_path(&path).unwrap()
    }

    #[test]
    fn test_get_project() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/project/acme");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(serde_json::json!({
                    "project": { "name": "Acme Game", "description": "Chapter 3", "termDict": "t.json" },
                    "termDictVersion": "2026-10-01",
                    "errDictVersion": "2026-09-12"
                }));
        });

        let meta = client(&server).get_project("acme").unwrap();

        mock.assert();
        assert_eq!(meta.id, "acme");
        assert_eq!(meta.name, "Acme Game");
        assert_eq!(meta.description, "Chapter 3");
        assert_eq!(meta.term_dict_version, "2026-10-01");
        assert_eq!(meta.err_dict_version, "2026-09-12");
    }

    #[test]
    fn test_get_project_sparse_reply() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/project/beta");
            then.status(200).json_body(serde_json::json!({ "project": {} }));
        });

        let meta = client(&server).get_project("beta").unwrap();

        mock.assert();
        assert_eq!(meta.name, "beta");
        assert_eq!(meta.description, "");
        assert_eq!(meta.term_dict_version, "");
    }

    #[test]
    fn test_get_project_not_found_is_http_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/project/ghost");
            then.status(404).json_body(serde_json::json!({ "error": "invalid project" }));
        });

        let err = client(&server).get_project("ghost").unwrap_err();
        assert!(matches!(err, ClientError::Http(404, _)));
    }

    #[test]
    fn test_api_base_with_prefix_and_trailing_slash() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/transtool/api/health");
            then.status(200).json_body(serde_json::json!({
                "status": "ok",
                "timestamp": "2026-10-16T09:00:00",
                "projects": ["acme", "beta"]
            }));
        });

        let c = CheckClient::new(format!("{}/transtool/", server.base_url()), None).unwrap();
        let health = c.health().unwrap();

        mock.assert();
        assert!(health.is_ok());
        assert_eq!(health.projects, vec!["acme", "beta"]);
    }

    #[test]
    fn test_list_projects_sorted() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/projects");
            then.status(200).json_body(serde_json::json!({
                "projects": {
                    "zeta": { "name": "Zeta", "tags": ["mobile"] },
                    "alpha": { "description": "First", "termDict": "alpha_terms.json" }
                }
            }));
        });

        let projects = client(&server).list_projects().unwrap();
        let ids: Vec<&str> = projects.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
        assert_eq!(projects[0].1.term_dict.as_deref(), Some("alpha_terms.json"));
        assert_eq!(projects[1].1.tags, vec!["mobile"]);
    }

    #[test]
    fn test_list_projects_missing_key_is_parse_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/projects");
            then.status(200).json_body(serde_json::json!({ "items": [] }));
        });

        assert!(matches!(client(&server).list_projects(), Err(ClientError::Parse(_))));
    }

    #[test]
    fn test_send_check_returns_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/check")
                .body_includes("name=\"file\"; filename=\"glossary.xlsx\"")
                .body_includes("PK fake workbook")
                .body_includes("name=\"config\"")
                .body_includes("\"project\":\"acme\"")
                .body_includes("\"inputCol\":\"B\"")
                .body_includes("\"mode\":\"common\"");
            then.status(200)
                .header("content-type", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
                .body("annotated workbook");
        });

        let dir = tempfile::tempdir().unwrap();
        let pending = client(&server).send_check(&upload_file(&dir), &config()).unwrap();

        mock.assert();
        assert_eq!(pending.into_reply(), ResultReply::Body(b"annotated workbook".to_vec()));
    }

    #[test]
    fn test_send_check_server_error_keeps_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/check");
            then.status(500).json_body(serde_json::json!({ "error": "dictionary unavailable" }));
        });

        let dir = tempfile::tempdir().unwrap();
        let reply = client(&server).send_check(&upload_file(&dir), &config()).unwrap().into_reply();

        match reply {
            ResultReply::Rejected { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(transcheck_engine::server_message(status, &body), "dictionary unavailable");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_send_check_missing_file_never_hits_server() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/check");
            then.status(200);
        });

        let file = SelectedFile::new("gone.xlsx", 10, "/nonexistent/gone.xlsx");
        let err = client(&server).send_check(&file, &config()).err().unwrap();

        assert!(matches!(err, ClientError::Io(_)));
        assert_eq!(mock.hits(), 0);
    }

    #[test]
    fn test_unreachable_server_is_network_error() {
        // Port 9 (discard) is not expected to accept HTTP.
        let c = CheckClient::new("http://127.0.0.1:9", Some(Duration::from_secs(2))).unwrap();
        assert!(matches!(c.health(), Err(ClientError::Network(_))));
    }

    #[test]
    fn test_bad_api_base() {
        let c = CheckClient::new("not a url", None).unwrap();
        assert!(matches!(c.health(), Err(ClientError::Parse(_))));
    }
}
