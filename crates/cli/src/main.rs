// leadmerge CLI - campaign lead merging from the command line

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use leadmerge_cli::campaign::{self, Operation, OperationStatus};
use leadmerge_cli::inspect::inspect;
use leadmerge_config::AliasConfig;

use exit_codes::{campaign_exit_code, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "leadmerge")]
#[command(about = "Merge, enrich and clean campaign lead exports")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Alias file overriding the built-in column header lists
    #[arg(long, global = true, env = "LEADMERGE_ALIASES", value_name = "PATH")]
    aliases: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Link EB leads to Clay profile URLs
    #[command(after_help = "\
Reads <CAMPAIGN_DIR>/Clay and <CAMPAIGN_DIR>/EB.

Examples:
  leadmerge enrich ./Q1-Outreach
  leadmerge enrich ./Q1-Outreach --json")]
    Enrich {
        /// Campaign folder containing Clay/ and EB/
        campaign_dir: PathBuf,

        /// Print the operation report as JSON instead of the status line
        #[arg(long)]
        json: bool,
    },

    /// Reformat Clay leads into the delivery layout
    #[command(after_help = "\
Reads <CAMPAIGN_DIR>/Clay.

Examples:
  leadmerge format ./Q1-Outreach")]
    Format {
        /// Campaign folder containing Clay/
        campaign_dir: PathBuf,

        /// Print the operation report as JSON instead of the status line
        #[arg(long)]
        json: bool,
    },

    /// Remove Clay leads listed in the do-not-contact folder
    #[command(after_help = "\
Reads <CAMPAIGN_DIR>/Clay and <CAMPAIGN_DIR>/DNC.

Examples:
  leadmerge suppress ./Q1-Outreach
  leadmerge -q suppress ./Q1-Outreach --json")]
    Suppress {
        /// Campaign folder containing Clay/ and DNC/
        campaign_dir: PathBuf,

        /// Print the operation report as JSON instead of the status line
        #[arg(long)]
        json: bool,
    },

    /// Show how a single export is read and which fields its headers map to
    #[command(after_help = "\
Examples:
  leadmerge inspect ./Q1-Outreach/Clay/leads.csv
  leadmerge inspect export.xlsx --json")]
    Inspect {
        /// File to read (.csv, .tsv, .xlsx, .xlsm, .xls)
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective column alias configuration as TOML
    Aliases,
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let result = load_aliases(cli.aliases.as_deref()).and_then(|aliases| match cli.command {
        Commands::Enrich { campaign_dir, json } => cmd_operation(Operation::Enrich, &campaign_dir, &aliases, json),
        Commands::Format { campaign_dir, json } => cmd_operation(Operation::Format, &campaign_dir, &aliases, json),
        Commands::Suppress { campaign_dir, json } => {
            cmd_operation(Operation::Suppress, &campaign_dir, &aliases, json)
        }
        Commands::Inspect { file, json } => cmd_inspect(&file, &aliases, json),
        Commands::Aliases => cmd_aliases(&aliases),
    });

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

fn init_logging(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Non-zero exit without an `error:` line, for failures already reported on stdout.
    pub fn silent(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn load_aliases(path: Option<&Path>) -> Result<AliasConfig, CliError> {
    AliasConfig::load(path).map_err(|e| {
        CliError::usage(e.to_string()).with_hint("run `leadmerge aliases` to see the expected layout")
    })
}

fn cmd_operation(operation: Operation, dir: &Path, aliases: &AliasConfig, json: bool) -> Result<(), CliError> {
    let result = campaign::execute(operation, dir, aliases, chrono::Local::now().date_naive());

    if json {
        match &result {
            Ok(report) => {
                let out = serde_json::to_string_pretty(report).map_err(|e| CliError::general(e.to_string()))?;
                println!("{}", out);
            }
            Err(e) => {
                let out = serde_json::json!({
                    "operation": operation,
                    "error": e.to_string(),
                    "exit_code": campaign_exit_code(e),
                });
                println!("{}", out);
            }
        }
    } else {
        println!("{}", OperationStatus::from(&result));
    }

    match result {
        Ok(_) => Ok(()),
        Err(e) => Err(CliError::silent(campaign_exit_code(&e))),
    }
}

fn cmd_inspect(file: &Path, aliases: &AliasConfig, json: bool) -> Result<(), CliError> {
    let summary = inspect(file, aliases).map_err(|e| CliError::general(e.to_string()))?;
    if json {
        let out = serde_json::to_string_pretty(&summary).map_err(|e| CliError::general(e.to_string()))?;
        println!("{}", out);
    } else {
        print!("{}", summary.render());
    }
    Ok(())
}

fn cmd_aliases(aliases: &AliasConfig) -> Result<(), CliError> {
    let text = aliases.to_toml().map_err(|e| CliError::general(e.to_string()))?;
    println!("# {}", AliasConfig::config_path().display());
    print!("{}", text);
    Ok(())
}
