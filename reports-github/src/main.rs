use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use reports_github::report::{activity_summary, print_table, push_summary};
use reports_github::{Config, GitHubClient};
use tracing_subscriber::EnvFilter;

/// Reports on GitHub users and repositories.
#[derive(Debug, Parser)]
#[command(name = "reports", version, about)]
struct Cli {
    /// YAML configuration file; defaults to the environment and `.env`.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log every HTTP request with its duration.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Get information for a user.
    UserInfo { username: String },
    /// List the public repositories of a user.
    Repositories { username: String },
    /// Summarize the recent public activity of a user.
    Activity { username: String },
    /// Create a private gist from a local file.
    Gist {
        description: String,
        file: PathBuf,
    },
    /// Star a repository (`owner/name`).
    Star { repo: String },
    /// Remove your star from a repository (`owner/name`).
    Unstar { repo: String },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,reports=debug,reports_github=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            let mut config = Config::from_file(path)?;
            if config.token.is_none() {
                let _ = dotenvy::dotenv();
                config.token = std::env::var("GITHUB_TOKEN").ok();
            }
            Ok(config)
        }
        None => Ok(Config::from_env()?),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_ref())?;
    let client = GitHubClient::new(&config)?;
    let mut out = io::stdout().lock();

    match cli.command {
        Command::UserInfo { username } => {
            writeln!(out, "Getting info for {username}")?;
            let user = client.user_info(&username).await?;
            writeln!(out, "name: {}", user.name.unwrap_or_default())?;
            writeln!(out, "location: {}", user.location.unwrap_or_default())?;
            writeln!(out, "public repos: {}", user.public_repos)?;
        }
        Command::Repositories { username } => {
            writeln!(out, "Fetching repository statistics for {username}...")?;
            let repos = client.repositories(&username).await?;
            writeln!(out, "{username} has {} public repos.\n", repos.len())?;
            for repo in repos {
                writeln!(out, "{} - {}", repo.full_name, repo.html_url)?;
            }
        }
        Command::Activity { username } => {
            writeln!(out, "Fetching activity summary for {username}")?;
            let events = client.activity(&username).await?;
            writeln!(out, "Fetched {} events.\n", events.len())?;
            print_table(&mut out, "Activity Summary", &activity_summary(&events), true)?;
            writeln!(out)?;
            print_table(&mut out, "Project Push Summary", &push_summary(&events), true)?;
        }
        Command::Gist { description, file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("cannot read {}", file.display()))?;
            let filename = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .context("gist file has no name")?;
            let gist = client
                .create_private_gist(&description, &filename, &content)
                .await?;
            writeln!(out, "{}", gist.html_url)?;
        }
        Command::Star { repo } => {
            if client.repo_starred(&repo).await? {
                writeln!(out, "You have already starred {repo}.")?;
            } else {
                client.star_repo(&repo).await?;
                writeln!(out, "You have starred {repo}.")?;
            }
        }
        Command::Unstar { repo } => {
            if client.repo_starred(&repo).await? {
                client.unstar_repo(&repo).await?;
                writeln!(out, "You have unstarred {repo}.")?;
            } else {
                writeln!(out, "You have not starred {repo}.")?;
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("ERROR {error:#}");
            ExitCode::FAILURE
        }
    }
}
