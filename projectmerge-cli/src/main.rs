//! projectmerge command line.
//!
//! As a git merge driver (in `.git/config`):
//!
//!   [merge "projectmerge"]
//!       driver = projectmerge merge %O %A %B
//!
//! The merged project is written over `%A`; the exit status is 1 when the
//! result still carries conflicts so git marks the file as conflicted.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use projectmerge_cli::{run_diff, run_merge, Config};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "projectmerge")]
#[command(about = "Structural merge and diff for project documents")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Three-way merge of project snapshots
    Merge {
        /// Common ancestor
        base: PathBuf,
        /// Current branch; overwritten with the result unless --output is given
        ours: PathBuf,
        /// Branch being merged in
        theirs: PathBuf,

        /// Write the merged project here instead of over OURS
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON file with a merge policy and extra source-code parameters
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Categorize changes between two project snapshots
    Diff {
        from: PathBuf,
        to: PathBuf,

        /// Show node-level changes of one component (id or name)
        #[arg(long)]
        component: Option<String>,
    },
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match args.command {
        Command::Merge {
            base,
            ours,
            theirs,
            output,
            config,
        } => {
            let config = match config {
                Some(path) => Config::load(&path)?,
                None => Config::default(),
            };
            let output = output.unwrap_or_else(|| ours.clone());
            let summary = run_merge(&base, &ours, &theirs, &output, &config)?;

            for conflict in &summary.report.project_conflicts {
                warn!("Conflict on {} (resolved to policy default)", conflict.name);
            }
            if summary.has_conflicts {
                info!("Merge left conflicts for review");
                return Ok(ExitCode::from(1));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Diff { from, to, component } => {
            println!("{}", run_diff(&from, &to, component.as_deref())?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
