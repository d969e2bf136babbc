//! CLI entry point for the modindex tool.

use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use modindex_core::{IndexDocument, ModIndexClient, ShortHashMatches};
use serde::Serialize;
use tracing::{debug, warn};

mod app_config;
mod cli;

use cli::{Args, Command};

/// Exit code when the requested mod, file, or hash is not in the index.
const EXIT_NOT_FOUND: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // stdout carries the JSON results
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let file_config = match &args.config {
        Some(path) => Some(app_config::load_file_config(path)?),
        None => {
            let loaded = app_config::load_default_file_config()?;
            debug!(path = ?loaded.path, loaded = loaded.config.is_some(), "Resolved config file");
            loaded.config
        }
    };
    let config = app_config::resolve_client_config(
        args.base_url.as_deref(),
        args.timeout,
        app_config::env_base_url(),
        file_config.as_ref(),
    );
    let client = ModIndexClient::new(config).context("Failed to configure index client")?;

    run(&client, &args.command).await
}

async fn run(client: &ModIndexClient, command: &Command) -> Result<ExitCode> {
    match command {
        Command::Index { list } => {
            let index = client.index().await?;
            if *list {
                print_json(&index.identifiers)?;
            } else {
                print_json(&IndexSummary::from(index.as_ref()))?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Manifest {
            generic,
            with_overrides,
            effective,
        } => {
            let found = if *with_overrides {
                client
                    .resolve_generic_with_overrides(generic)
                    .await?
                    .map(serde_json::to_value)
                    .transpose()?
            } else if *effective {
                client
                    .resolve_effective(generic)
                    .await?
                    .map(serde_json::to_value)
                    .transpose()?
            } else {
                client
                    .resolve_generic(generic)
                    .await?
                    .map(serde_json::to_value)
                    .transpose()?
            };
            match found {
                Some(document) => {
                    print_json(&document)?;
                    Ok(ExitCode::SUCCESS)
                }
                None => Ok(not_found(&format!("mod '{generic}' is not in the index"))),
            }
        }
        Command::File { identifier } => match client.resolve_by_full_identifier(identifier).await? {
            Some(file) => {
                print_json(&file)?;
                Ok(ExitCode::SUCCESS)
            }
            None => Ok(not_found(&format!("file '{identifier}' is not in the index"))),
        },
        Command::Hash { short_hash, file } => {
            let matches = match (short_hash, file) {
                (_, Some(path)) => {
                    let content = tokio::fs::read(path)
                        .await
                        .with_context(|| format!("Failed to read '{}'", path.display()))?;
                    client.resolve_by_content(&content).await?
                }
                (Some(hash), None) => client.resolve_by_short_hash(hash).await?,
                (None, None) => anyhow::bail!("either a short hash or --file is required"),
            };
            report_hash_matches(&matches)
        }
    }
}

fn report_hash_matches(matches: &ShortHashMatches) -> Result<ExitCode> {
    if matches.is_empty() {
        return Ok(not_found(&format!(
            "no file with short hash '{}' is in the index",
            matches.short_hash
        )));
    }

    print_json(&HashReport::from(matches))?;
    for failure in &matches.failures {
        warn!(identifier = %failure.identifier, error = %failure.error, "Could not check manifest");
    }
    if matches.is_complete() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn not_found(message: &str) -> ExitCode {
    eprintln!("Not found: {message}");
    ExitCode::from(EXIT_NOT_FOUND)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render JSON output")?;
    println!("{rendered}");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexSummary<'a> {
    schema_version: &'a str,
    identifiers: usize,
    mods: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiry: Option<DateTime<Utc>>,
}

impl<'a> From<&'a IndexDocument> for IndexSummary<'a> {
    fn from(index: &'a IndexDocument) -> Self {
        Self {
            schema_version: &index.schema_version,
            identifiers: index.len(),
            mods: index.generic_identifiers().len(),
            expiry: index.expiry,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HashReport<'a> {
    short_hash: &'a str,
    files: &'a [modindex_core::FileVersion],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<FailureReport<'a>>,
}

#[derive(Serialize)]
struct FailureReport<'a> {
    identifier: &'a str,
    error: String,
}

impl<'a> From<&'a ShortHashMatches> for HashReport<'a> {
    fn from(matches: &'a ShortHashMatches) -> Self {
        Self {
            short_hash: &matches.short_hash,
            files: &matches.files,
            failures: matches
                .failures
                .iter()
                .map(|failure| FailureReport {
                    identifier: &failure.identifier,
                    error: failure.error.to_string(),
                })
                .collect(),
        }
    }
}
