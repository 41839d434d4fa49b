use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "s3sum",
    about = "s3sum: verify a local directory against an S3 bucket by SHA-256 checksum",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Debug logging and per-key listings in the summary
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML configuration file; command-line flags take precedence
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reconcile a bucket (or prefix) against a local directory
    Verify(VerifyArgs),
    /// Print the checksum of a local file
    Checksum(ChecksumArgs),
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Bucket name
    pub bucket: String,
    /// Local directory that mirrors the bucket root
    pub local_root: PathBuf,
    /// Only compare keys starting with this prefix
    #[arg(long)]
    pub prefix: Option<String>,
    /// Maximum concurrent fetches and comparisons
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,
    /// Also write the full result as JSON
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,
    /// Keep fetched checksums in memory instead of a temporary file
    #[arg(long)]
    pub memory_journal: bool,
    /// AWS profile name
    #[arg(long)]
    pub profile: Option<String>,
    /// AWS region
    #[arg(long)]
    pub region: Option<String>,
    /// Custom S3-compatible endpoint
    #[arg(long, value_name = "URL")]
    pub endpoint_url: Option<String>,
    /// Use path-style bucket addressing
    #[arg(long)]
    pub path_style: bool,
    /// Exit with status 2 unless every object matched
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct ChecksumArgs {
    /// File to hash
    pub file: PathBuf,
    /// Part size in bytes; repeat once per part, in upload order
    #[arg(long = "part-size", value_name = "BYTES")]
    pub part_sizes: Vec<u64>,
}
