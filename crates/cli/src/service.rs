//! Service-level commands: `transcheck projects` and `transcheck health`.

use serde::Serialize;

use transcheck_client::{stats, summarize, ListingStats, ProjectSummary};
use transcheck_config::Settings;

use crate::exit_codes::EXIT_SERVER;
use crate::{make_client, CliError};

#[derive(Serialize)]
struct ProjectsJson<'a> {
    projects: &'a [ProjectSummary],
    stats: ListingStats,
}

pub fn cmd_projects(settings: &Settings, api_base: &str, json: bool) -> Result<(), CliError> {
    let client = make_client(settings, api_base)?;
    let projects = client.list_projects().map_err(|e| CliError::client(e, api_base))?;
    let summaries = summarize(&projects, &settings.page_base_url);
    let totals = stats(&summaries);

    if json {
        let out = ProjectsJson { projects: &summaries, stats: totals };
        let text = serde_json::to_string_pretty(&out).map_err(|e| CliError::io(e.to_string()))?;
        println!("{}", text);
        return Ok(());
    }

    if summaries.is_empty() {
        println!("No projects configured");
        return Ok(());
    }

    for s in &summaries {
        println!("{} ({})", s.name, s.id);
        println!("  description: {}", s.description);
        println!("  term dictionary: {}", s.term_dict);
        if !s.tags.is_empty() {
            println!("  tags: {}", s.tags.join(", "));
        }
        println!("  link: {}", s.link);
    }
    println!();
    println!("{}", totals);
    Ok(())
}

pub fn cmd_health(settings: &Settings, api_base: &str, json: bool) -> Result<(), CliError> {
    let client = make_client(settings, api_base)?;
    let health = client.health().map_err(|e| CliError::client(e, api_base))?;

    if json {
        let out = serde_json::json!({
            "status": health.status,
            "timestamp": health.timestamp,
            "projects": health.projects,
        });
        println!("{}", out);
    } else {
        println!("status:    {}", health.status);
        println!("timestamp: {}", health.timestamp);
        println!("projects:  {}", health.projects.join(", "));
    }

    if health.is_ok() {
        Ok(())
    } else {
        Err(CliError {
            code: EXIT_SERVER,
            message: format!("service reports status '{}'", health.status),
            hint: None,
        })
    }
}
