//! Deft - lightweight dependency fetcher
//!
//! Usage:
//!   deft install               # Download every dependency in the deftfile
//!   deft list                  # Show what would be downloaded
//!   deft resolve owner/repo 1.2.0

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deft_core::config::{Deftfile, Settings};
use deft_core::descriptor::{Dependency, Source};
use deft_core::fetch::Fetcher;
use deft_core::plan::plan_downloads;
use deft_core::source::DEFAULT_BRANCH;
use deft_core::util::{clip, negate, DISPLAY_NAME_WIDTH};
use deft_core::version::resolve_version;

#[derive(Parser)]
#[command(name = "deft")]
#[command(about = "Lightweight dependency fetcher", long_about = None)]
struct Cli {
    /// Path to the deftfile (defaults to deft.json or deft.toml in the current directory)
    #[arg(long, short, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download every dependency into the destination directory
    Install {
        /// Skip dependencies with this source (repeatable)
        #[arg(long, value_name = "SOURCE")]
        skip: Vec<String>,
    },

    /// List dependencies and their planned files without downloading
    List,

    /// Resolve a version against a GitHub repository's tags
    Resolve {
        /// Repository shorthand (owner/repo)
        repo: String,
        /// Requested version
        version: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deft=info,deft_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Install { skip } => run_install(cli.file.as_deref(), &skip).await,
        Commands::List => run_list(cli.file.as_deref()),
        Commands::Resolve { repo, version } => run_resolve(&repo, &version).await,
    }
}

fn load_deftfile(file: Option<&Path>) -> Result<(PathBuf, Deftfile)> {
    match file {
        Some(path) => Ok((path.to_path_buf(), Deftfile::load(path)?)),
        None => Deftfile::discover(&std::env::current_dir()?),
    }
}

async fn run_install(file: Option<&Path>, skip: &[String]) -> Result<()> {
    let (path, deftfile) = load_deftfile(file)?;
    let destination = deftfile.destination_dir(&path);
    let fetcher = Fetcher::new(&Settings::load()?)?;

    let is_skipped = |dep: &Dependency| skip.iter().any(|s| dep.has_source(s));
    let selected: Vec<Dependency> = deftfile
        .dependencies
        .into_iter()
        .filter(negate(is_skipped))
        .collect();

    tracing::info!(
        count = selected.len(),
        destination = %destination.display(),
        "Installing dependencies"
    );

    let mut installed = 0;
    for dep in selected {
        let name = dep.name();
        let downloads = fetcher.install(dep, &destination).await?;
        for download in &downloads {
            println!(
                "  {:<40}  {}",
                clip(&download.file_name(), DISPLAY_NAME_WIDTH),
                name
            );
        }
        installed += downloads.len();
    }

    println!("Installed {} file(s) into {}", installed, destination.display());
    Ok(())
}

fn run_list(file: Option<&Path>) -> Result<()> {
    let (path, deftfile) = load_deftfile(file)?;
    let destination = deftfile.destination_dir(&path);

    for dep in &deftfile.dependencies {
        let version = match (&dep.source, dep.requested_version()) {
            (Source::Absolute { .. }, _) => "-",
            (Source::Shorthand(_), Some(version)) => version,
            (Source::Shorthand(_), None) => DEFAULT_BRANCH,
        };
        println!("{} @ {}", dep.name(), version);

        for download in plan_downloads(dep, &destination)? {
            println!(
                "  {:<40}  <- {}",
                clip(&download.file_name(), DISPLAY_NAME_WIDTH),
                download.url
            );
        }
    }
    Ok(())
}

async fn run_resolve(repo: &str, version: &str) -> Result<()> {
    let Some(tags_url) = Source::parse(repo)?.tags_url() else {
        anyhow::bail!("'{}' is a URL; only owner/repo shorthands have tags", repo);
    };

    let fetcher = Fetcher::new(&Settings::load()?)?;
    let tags = fetcher.fetch_tags(&tags_url).await?;
    println!("{}", resolve_version(&tags, version));
    Ok(())
}
