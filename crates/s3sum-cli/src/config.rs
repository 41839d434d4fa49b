use std::path::Path;

use anyhow::{ensure, Context};
use s3sum_inventory::S3Options;
use s3sum_reconcile::DEFAULT_CONCURRENCY_LIMIT;
use serde::{Deserialize, Serialize};

use crate::cli::VerifyArgs;

/// Where fetched checksum records are held between the two phases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalMode {
    #[default]
    TempFile,
    Memory,
}

/// Object store connection settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    pub profile: Option<String>,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
}

/// Settings for `s3sum verify`, from the config file and then flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    pub concurrency_limit: usize,
    pub journal: JournalMode,
    pub aws: AwsConfig,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            journal: JournalMode::default(),
            aws: AwsConfig::default(),
        }
    }
}

impl VerifyConfig {
    /// Load from `path`, or defaults when no file is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Overlay command-line flags.
    pub fn apply_args(&mut self, args: &VerifyArgs) {
        if let Some(n) = args.concurrency {
            self.concurrency_limit = n;
        }
        if args.memory_journal {
            self.journal = JournalMode::Memory;
        }
        if args.profile.is_some() {
            self.aws.profile = args.profile.clone();
        }
        if args.region.is_some() {
            self.aws.region = args.region.clone();
        }
        if args.endpoint_url.is_some() {
            self.aws.endpoint_url = args.endpoint_url.clone();
        }
        if args.path_style {
            self.aws.force_path_style = true;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.concurrency_limit >= 1, "concurrency limit must be at least 1");
        Ok(())
    }

    pub fn s3_options(&self, bucket: &str) -> S3Options {
        S3Options {
            bucket: bucket.to_string(),
            profile: self.aws.profile.clone(),
            region: self.aws.region.clone(),
            endpoint_url: self.aws.endpoint_url.clone(),
            force_path_style: self.aws.force_path_style,
        }
    }
}
