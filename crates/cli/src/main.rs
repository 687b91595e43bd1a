// transcheck - submit spreadsheets to the translation check service

mod check;
mod exit_codes;
mod inspect;
mod service;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};

use transcheck_client::{CheckClient, ClientError, ProjectContext};
use transcheck_config::Settings;
use transcheck_engine::CheckMode;

use exit_codes::{client_exit_code, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "transcheck")]
#[command(about = "Check translated spreadsheets against a project's dictionaries")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Checking service base address (overrides api.base in settings.json)
    #[arg(long, global = true, env = "TRANSCHECK_API_BASE")]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a spreadsheet for checking and save the annotated result
    #[command(after_help = "\
Examples:
  transcheck check chapter3.xlsx --project acme --input B --output1 C --output2 D
  transcheck check terms.xlsx --page-url 'http://qa/index.html?project=acme' \\
      --mode spec --input A --output1 E --hint --out-dir results/")]
    Check {
        /// Spreadsheet to upload (xlsx, xls)
        file: PathBuf,

        #[command(flatten)]
        target: ProjectTarget,

        /// Check mode
        #[arg(long, value_enum, default_value = "common")]
        mode: ModeArg,

        /// Column holding the text to check (A-Z)
        #[arg(long)]
        input: String,

        /// First output column (A-Z)
        #[arg(long)]
        output1: String,

        /// Second output column (A-Z), required in common mode
        #[arg(long, default_value = "")]
        output2: String,

        /// Check every sheet instead of only the first
        #[arg(long)]
        all_sheets: bool,

        /// Add translation hints (spec mode)
        #[arg(long)]
        hint: bool,

        /// Where to save the result (defaults to download.directory, then .)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Suppress progress output
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Pre-check a spreadsheet locally without uploading it
    Inspect {
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the header for a project
    Project {
        #[command(flatten)]
        target: ProjectTarget,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every project the service knows
    Projects {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask the service whether it is up
    Health {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Settings file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the settings file location
    Path,
    /// Write a commented settings file if none exists
    Init,
}

/// Which project a command acts on: a page address or a bare id.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct ProjectTarget {
    /// Page address carrying a `project` query parameter
    #[arg(long)]
    page_url: Option<String>,

    /// Project id
    #[arg(long)]
    project: Option<String>,
}

impl ProjectTarget {
    fn context(&self) -> Result<ProjectContext, CliError> {
        match (&self.page_url, &self.project) {
            (Some(url), _) => ProjectContext::from_page_url(url).map_err(|e| CliError::args(e.to_string())),
            (None, Some(id)) => Ok(ProjectContext::from_project_id(id.clone())),
            (None, None) => Err(CliError::args("either --page-url or --project is required")),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Common-error check
    Common,
    /// Terminology annotation
    Spec,
}

impl From<ModeArg> for CheckMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Common => CheckMode::CommonErrorCheck,
            ModeArg::Spec => CheckMode::TerminologyAnnotation,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let settings = Settings::load();
    let api_base = cli.api_base.clone().unwrap_or_else(|| settings.api_base.clone());

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: transcheck <command> [options]");
            eprintln!("       transcheck --help for more information");
            Ok(())
        }
        Some(Commands::Check {
            file,
            target,
            mode,
            input,
            output1,
            output2,
            all_sheets,
            hint,
            out_dir,
            quiet,
        }) => {
            let request = check::CheckRequest {
                file,
                mode: mode.into(),
                input,
                output1,
                output2,
                all_sheets,
                hint,
                out_dir: out_dir.unwrap_or_else(|| settings.download_dir()),
                quiet,
            };
            target
                .context()
                .and_then(|ctx| check::cmd_check(&settings, &api_base, &ctx, request))
        }
        Some(Commands::Inspect { file, json }) => inspect::cmd_inspect(&settings, &file, json),
        Some(Commands::Project { target, json }) => target
            .context()
            .and_then(|ctx| check::cmd_project(&settings, &api_base, &ctx, json)),
        Some(Commands::Projects { json }) => service::cmd_projects(&settings, &api_base, json),
        Some(Commands::Health { json }) => service::cmd_health(&settings, &api_base, json),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Path => {
                println!("{}", Settings::config_path_display());
                Ok(())
            }
            ConfigCommands::Init => cmd_config_init(),
        },
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn cmd_config_init() -> Result<(), CliError> {
    let path = Settings::config_path();
    let written = Settings::create_default_file(&path).map_err(CliError::io)?;
    if written {
        println!("created {}", path.display());
    } else {
        println!("{} already exists", path.display());
    }
    Ok(())
}

/// Build the HTTP client from settings.
pub fn make_client(settings: &Settings, api_base: &str) -> Result<CheckClient, CliError> {
    let timeout = settings.timeout_secs.map(std::time::Duration::from_secs);
    CheckClient::new(api_base, timeout).map_err(|e| CliError::client(e, api_base))
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Create error from a service call with the matching exit code.
    pub fn client(err: ClientError, api_base: &str) -> Self {
        let code = client_exit_code(&err);
        let hint = match &err {
            ClientError::Network(_) => Some(format!(
                "is the checking service running at {}? (set --api-base or TRANSCHECK_API_BASE)",
                api_base
            )),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
