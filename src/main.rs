#![forbid(unsafe_code)]
//! lath command line interface

use std::path::PathBuf;

use clap::Parser;
use console::style;

use lath::commands::{execute_create, CreateOptions};

#[derive(Parser)]
#[command(name = "lath")]
#[command(about = "Interview-driven project scaffolding for conditional file templates")]
#[command(version)]
struct Cli {
    /// Template directory, optionally suffixed with #branch to pick a
    /// non-default branch for the commit lookup
    template: String,

    /// Destination directory (omitted: generate into the current directory)
    dest: Option<PathBuf>,

    /// Skip the interview and accept every default
    #[arg(short = 'y', long)]
    yes: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = CreateOptions {
        template: cli.template,
        dest: cli.dest,
        yes: cli.yes,
    };

    if let Err(err) = execute_create(options) {
        eprintln!("{} {:#}", style("✗").red(), err);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
