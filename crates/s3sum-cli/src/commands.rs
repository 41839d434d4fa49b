use std::process::ExitCode;

use anyhow::Context;
use colored::Colorize;
use s3sum_hash::ChecksumCalculator;
use s3sum_inventory::{LocalTree, S3Bucket};
use s3sum_journal::{FileJournal, JournalConfig, MemoryJournal};
use s3sum_reconcile::{ReconcileConfig, Reconciler, RunReport};
use tracing::info;

use crate::cli::*;
use crate::config::{JournalMode, VerifyConfig};
use crate::report;

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::Verify(args) => {
            let config = VerifyConfig::load(cli.config.as_deref())?;
            cmd_verify(args, config, cli.verbose)
        }
        Command::Checksum(args) => cmd_checksum(args),
    }
}

fn cmd_verify(args: VerifyArgs, mut config: VerifyConfig, verbose: bool) -> anyhow::Result<ExitCode> {
    config.apply_args(&args);
    config.validate()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let report = runtime.block_on(verify(&args, &config))?;

    print!("{}", report::render_summary(&report, verbose));
    if let Some(path) = &args.json {
        let artifact = report::Artifact::new(
            &args.bucket,
            args.prefix.as_deref(),
            &args.local_root,
            &report.result,
        );
        report::write_json(path, &artifact)?;
        println!("{} Wrote {}", "✓".green(), path.display().to_string().bold());
    }

    Ok(ExitCode::from(report::exit_status(&report.result, args.strict)))
}

async fn verify(args: &VerifyArgs, config: &VerifyConfig) -> anyhow::Result<RunReport> {
    let tree = LocalTree::open(&args.local_root)
        .with_context(|| format!("cannot use {} as local root", args.local_root.display()))?;
    let bucket = S3Bucket::connect(&config.s3_options(&args.bucket))
        .await
        .with_context(|| format!("failed to connect to bucket {}", args.bucket))?;
    let reconciler = Reconciler::new(ReconcileConfig {
        prefix: args.prefix.clone(),
        concurrency_limit: config.concurrency_limit,
        ..ReconcileConfig::default()
    })?;

    info!(bucket = %args.bucket, root = %tree.root().display(), journal = ?config.journal, "starting verification");
    let report = match config.journal {
        JournalMode::Memory => {
            reconciler
                .run(&bucket, &bucket, &tree, MemoryJournal::new())
                .await?
        }
        JournalMode::TempFile => {
            let journal = FileJournal::temporary(JournalConfig::default())
                .context("failed to create checksum journal")?;
            reconciler.run(&bucket, &bucket, &tree, journal).await?
        }
    };
    Ok(report)
}

fn cmd_checksum(args: ChecksumArgs) -> anyhow::Result<ExitCode> {
    let parts = (!args.part_sizes.is_empty()).then_some(args.part_sizes.as_slice());
    let checksum = ChecksumCalculator::new()
        .checksum_file(&args.file, parts)
        .with_context(|| format!("failed to checksum {}", args.file.display()))?;

    println!("{}  {}", checksum.bold(), args.file.display());
    if let Some(parts) = parts {
        println!("  composite of {} parts", parts.len().to_string().cyan());
    }
    Ok(ExitCode::SUCCESS)
}
