//! path-acl command line
//!
//! Validate policy files and answer one-off authorization questions.

use anyhow::Context;
use clap::{Parser, Subcommand};
use path_acl::{authorize, load_policy_from_file, EngineConfig, PolicySet};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "path-acl")]
#[command(about = "Check and query per-user path access control lists")]
struct Args {
    /// Engine configuration file (TOML)
    #[arg(short = 'c', long, env = "PATH_ACL_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Reject trailing commas (strict JSON after comment removal)
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a policy file
    Check {
        /// Policy document
        file: PathBuf,
    },
    /// Decide whether an identity may access a path (exit 0 = allow, 2 = deny)
    Authorize {
        /// Policy document
        file: PathBuf,
        /// Identity email
        email: String,
        /// Request path
        path: String,
    },
    /// Print every policy as one JSON object per line
    List {
        /// Policy document
        file: PathBuf,
    },
}

const EXIT_DENIED: u8 = 2;

fn load(args: &Args, file: &Path) -> anyhow::Result<PolicySet> {
    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let mut options = config.parse_options();
    if args.strict {
        options.allow_trailing_commas = false;
    }

    load_policy_from_file(file, &options)
        .with_context(|| format!("loading policy file {}", file.display()))
}

fn run(args: &Args) -> anyhow::Result<ExitCode> {
    match &args.command {
        Command::Check { file } => {
            let set = load(args, file)?;
            println!(
                "{}: ok ({} policies, {} identities)",
                file.display(),
                set.len(),
                set.identity_count()
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Authorize { file, email, path } => {
            let set = load(args, file)?;
            if authorize(&set, email, path) {
                println!("allow");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("deny");
                Ok(ExitCode::from(EXIT_DENIED))
            }
        }
        Command::List { file } => {
            let set = load(args, file)?;
            for policy in &set {
                println!("{}", serde_json::to_string(policy)?);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!(command = ?args.command, "starting path-acl");

    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
