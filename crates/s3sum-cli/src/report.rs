use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use s3sum_reconcile::RunReport;
use s3sum_types::ReconciliationResult;
use serde::Serialize;

/// Exit status when the run completed but found differences under `--strict`.
pub const EXIT_NOT_CLEAN: u8 = 2;

/// The JSON artifact written by `verify --json`.
#[derive(Serialize)]
pub struct Artifact<'a> {
    pub bucket: &'a str,
    pub prefix: Option<&'a str>,
    pub local_root: String,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: &'a ReconciliationResult,
}

impl<'a> Artifact<'a> {
    pub fn new(
        bucket: &'a str,
        prefix: Option<&'a str>,
        local_root: &Path,
        result: &'a ReconciliationResult,
    ) -> Self {
        Self {
            bucket,
            prefix,
            local_root: local_root.display().to_string(),
            generated_at: Utc::now(),
            result,
        }
    }
}

pub fn write_json(path: &Path, artifact: &Artifact<'_>) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, artifact)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Console summary: one line per category, plus members when `verbose`.
pub fn render_summary(report: &RunReport, verbose: bool) -> String {
    let result = &report.result;
    let mut out = String::new();

    let rows: [(ColoredString, &str, usize); 6] = [
        ("✓".green(), "matches", result.matches.len()),
        ("✗".red(), "mismatches", result.mismatches.len()),
        ("?".yellow(), "missing checksum", result.missing_checksum.len()),
        ("-".yellow(), "missing locally", result.missing_locally.len()),
        ("+".yellow(), "missing on S3", result.missing_on_s3.len()),
        ("!".red(), "unreadable", result.unreadable.len()),
    ];
    for (marker, label, count) in rows {
        let _ = writeln!(out, "{marker} {label:<17} {}", count.to_string().bold());
    }

    if verbose {
        for key in &result.mismatches {
            let _ = writeln!(out, "\n{} {}", "mismatch:".red().bold(), key);
            if let Some(detail) = result.mismatch_details.get(key) {
                let _ = writeln!(out, "  remote: {}", detail.remote_checksum.cyan());
                let _ = writeln!(out, "  local:  {}", detail.local_checksum.cyan());
            }
        }
        list_members(&mut out, "missing checksum", &result.missing_checksum);
        list_members(&mut out, "missing locally", &result.missing_locally);
        list_members(&mut out, "missing on S3", &result.missing_on_s3);
        if !result.read_failures.is_empty() {
            let _ = writeln!(out, "\n{}", "unreadable:".bold());
            for (key, reason) in &result.read_failures {
                let _ = writeln!(out, "  {key}: {}", reason.dimmed());
            }
        }
    }

    let stats = &report.stats;
    let _ = writeln!(
        out,
        "\n{} remote objects, {} local files in {:.1}s",
        stats.remote_objects,
        stats.local_files,
        stats.elapsed.as_secs_f64()
    );
    if result.is_clean() {
        let _ = writeln!(out, "{} Local tree matches the bucket", "✓".green().bold());
    }
    out
}

fn list_members<'a>(
    out: &mut String,
    label: &str,
    keys: impl IntoIterator<Item = &'a String>,
) {
    let mut keys = keys.into_iter().peekable();
    if keys.peek().is_none() {
        return;
    }
    let _ = writeln!(out, "\n{}", format!("{label}:").bold());
    for key in keys {
        let _ = writeln!(out, "  {key}");
    }
}

/// Process exit status for a completed run.
pub fn exit_status(result: &ReconciliationResult, strict: bool) -> u8 {
    if strict && !result.is_clean() {
        EXIT_NOT_CLEAN
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use s3sum_reconcile::RunStats;
    use s3sum_types::{MismatchDetail, Outcome};

    fn sample() -> RunReport {
        let mut result = ReconciliationResult::new();
        result.record("a.txt", Outcome::Match);
        result.record(
            "b.bin",
            Outcome::Mismatch(MismatchDetail {
                remote_checksum: "REMOTE=".into(),
                local_checksum: "LOCAL=".into(),
            }),
        );
        result.record("d.log", Outcome::MissingLocally);
        result.record_missing_on_s3("e.tmp");
        RunReport {
            result,
            stats: RunStats::default(),
        }
    }

    #[test]
    fn summary_lists_categories() {
        let out = render_summary(&sample(), false);
        for label in ["matches", "mismatches", "missing checksum", "missing locally", "missing on S3"] {
            assert!(out.contains(label), "missing {label}");
        }
        assert!(!out.contains("b.bin"));
    }

    #[test]
    fn verbose_summary_lists_members() {
        let out = render_summary(&sample(), true);
        assert!(out.contains("b.bin"));
        assert!(out.contains("REMOTE="));
        assert!(out.contains("LOCAL="));
        assert!(out.contains("d.log"));
        assert!(out.contains("e.tmp"));
        assert!(!out.contains("a.txt"));
    }

    #[test]
    fn strict_exit_status() {
        let report = sample();
        assert_eq!(exit_status(&report.result, false), 0);
        assert_eq!(exit_status(&report.result, true), EXIT_NOT_CLEAN);

        let mut clean = ReconciliationResult::new();
        clean.record("a.txt", Outcome::Match);
        assert_eq!(exit_status(&clean, true), 0);
    }

    #[test]
    fn json_artifact_fields() {
        let report = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        let artifact = Artifact::new("bucket", Some("data/"), dir.path(), &report.result);
        write_json(&path, &artifact).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["bucket"], "bucket");
        assert_eq!(json["prefix"], "data/");
        assert_eq!(json["matches"], serde_json::json!(["a.txt"]));
        assert_eq!(json["mismatches"], serde_json::json!(["b.bin"]));
        assert_eq!(json["missing_checksum"], serde_json::json!([]));
        assert_eq!(json["missing_locally"], serde_json::json!(["d.log"]));
        assert_eq!(json["missing_on_s3"], serde_json::json!(["e.tmp"]));
        assert_eq!(json["unreadable"], serde_json::json!([]));
        assert_eq!(json["mismatch_details"]["b.bin"]["local_checksum"], "LOCAL=");
        assert!(json["generated_at"].is_string());
    }
}
