//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Query a statically hosted mod index.
///
/// Resolves mods, files, and short hashes against the index repository and
/// prints the results as JSON.
#[derive(Parser, Debug)]
#[command(name = "modindex")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Root URL of the index repository (overrides config file and MODINDEX_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds (1-3600)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: Option<u64>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Index queries.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Summarize the index, or list every identifier with --list
    Index {
        /// Print every identifier instead of a summary
        #[arg(long)]
        list: bool,
    },

    /// Resolve a mod's manifest from `loader:name`
    Manifest {
        /// Generic (`loader:name`) or full (`loader:name:hash`) identifier
        generic: String,

        /// Include the manifest's embedded overrides document
        #[arg(long, conflicts_with = "effective")]
        with_overrides: bool,

        /// Apply the embedded overrides before printing
        #[arg(long)]
        effective: bool,
    },

    /// Resolve a file version from a full `loader:name:hash` identifier
    File {
        /// Full identifier
        identifier: String,
    },

    /// Find every file matching a short hash, or the hash of a local file
    Hash {
        /// Short (15 character) or full SHA-512 hash
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        short_hash: Option<String>,

        /// Hash this local file and look it up
        #[arg(long)]
        file: Option<PathBuf>,
    },
}
