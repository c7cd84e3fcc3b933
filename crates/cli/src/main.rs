// meddebt CLI - classify court-case plaintiffs as medical debt collectors

mod exit_codes;
mod session;
mod terms;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};
use meddebt_classify::MatchMethod;

#[derive(Parser)]
#[command(name = "meddebt")]
#[command(about = "Term-list classification of medical debt plaintiffs")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every collection in a session config and print overlap reports
    #[command(after_help = "\
Examples:
  meddebt run session.toml
  meddebt run session.toml --json
  meddebt run session.toml --output result.json --no-labeled
  meddebt -v run session.toml")]
    Run {
        /// Path to the session .toml config
        config: PathBuf,

        /// Output JSON to stdout instead of text reports
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Skip writing labeled tables
        #[arg(long)]
        no_labeled: bool,
    },

    /// Validate a session config and check its input files exist
    #[command(after_help = "\
Examples:
  meddebt validate session.toml")]
    Validate {
        /// Path to the session .toml config
        config: PathBuf,
    },

    /// Test one plaintiff name against a built-in term list
    #[command(after_help = "\
Examples:
  meddebt check 'YALE NEW HAVEN HOSPITAL' --terms georgetown
  meddebt check 'BRISTOL HOSPTAL INC' --terms georgetown --method fuzzy
  meddebt check 'ACME BANK HOSPITAL' --terms georgetown --no-exclude --json")]
    Check {
        /// Plaintiff name, matched case-sensitively
        text: String,

        /// Built-in term list (see `meddebt terms list`)
        #[arg(long)]
        terms: String,

        /// Matching method: exact | fuzzy
        #[arg(long, default_value = "exact")]
        method: MatchMethod,

        /// Ignore the list's exclusion terms
        #[arg(long)]
        no_exclude: bool,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect the built-in term lists
    #[command(subcommand)]
    Terms(terms::TermsCommands),
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  meddebt-classify ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run { config, json, output, no_labeled } => {
            session::cmd_run(config, json, output, no_labeled)
        }
        Commands::Validate { config } => session::cmd_validate(config),
        Commands::Check { text, terms, method, no_exclude, json } => {
            terms::cmd_check(&text, &terms, method, no_exclude, json)
        }
        Commands::Terms(cmd) => terms::cmd_terms(cmd),
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

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
