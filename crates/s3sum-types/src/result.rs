//! Reconciliation outcomes.
//!
//! A run classifies every remote key into exactly one [`Outcome`] and every
//! local-only path into `missing_on_s3`. The sets are `BTreeSet`s so that the
//! result is deterministic no matter in which order the units of work
//! finished.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Remote vs locally computed checksum for a key classified as a mismatch.
///
/// For size or part-layout problems `local_checksum` holds an explanatory
/// sentinel instead of a digest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MismatchDetail {
    pub remote_checksum: String,
    pub local_checksum: String,
}

/// Classification of a single remote key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Local checksum equals the remote checksum.
    Match,
    /// Both sides present, checksums differ.
    Mismatch(MismatchDetail),
    /// The store returned no checksum for the key.
    MissingChecksum,
    /// No local file mirrors the key.
    MissingLocally,
    /// The local file exists but could not be read.
    Unreadable(String),
}

impl Outcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Match => OutcomeKind::Match,
            Self::Mismatch(_) => OutcomeKind::Mismatch,
            Self::MissingChecksum => OutcomeKind::MissingChecksum,
            Self::MissingLocally => OutcomeKind::MissingLocally,
            Self::Unreadable(_) => OutcomeKind::Unreadable,
        }
    }
}

/// Payload-free discriminant of [`Outcome`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Match,
    Mismatch,
    MissingChecksum,
    MissingLocally,
    Unreadable,
}

/// Complete result of one reconciliation run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub matches: BTreeSet<String>,
    pub mismatches: BTreeSet<String>,
    pub missing_checksum: BTreeSet<String>,
    pub missing_locally: BTreeSet<String>,
    pub missing_on_s3: BTreeSet<String>,
    /// Keys whose local file exists but could not be read.
    pub unreadable: BTreeSet<String>,
    pub mismatch_details: BTreeMap<String, MismatchDetail>,
    /// Error text for every key in `unreadable`.
    pub read_failures: BTreeMap<String, String>,
}

impl ReconciliationResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the classification of a remote key.
    pub fn record(&mut self, key: impl Into<String>, outcome: Outcome) {
        let key = key.into();
        match outcome {
            Outcome::Match => {
                self.matches.insert(key);
            }
            Outcome::Mismatch(detail) => {
                self.mismatch_details.insert(key.clone(), detail);
                self.mismatches.insert(key);
            }
            Outcome::MissingChecksum => {
                self.missing_checksum.insert(key);
            }
            Outcome::MissingLocally => {
                self.missing_locally.insert(key);
            }
            Outcome::Unreadable(reason) => {
                self.read_failures.insert(key.clone(), reason);
                self.unreadable.insert(key);
            }
        }
    }

    /// Record a local path that has no remote counterpart.
    pub fn record_missing_on_s3(&mut self, path: impl Into<String>) {
        self.missing_on_s3.insert(path.into());
    }

    /// Number of remote keys classified.
    pub fn remote_total(&self) -> usize {
        self.matches.len()
            + self.mismatches.len()
            + self.missing_checksum.len()
            + self.missing_locally.len()
            + self.unreadable.len()
    }

    /// Returns `true` if every classified key matched and nothing is missing
    /// on either side.
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
            && self.missing_checksum.is_empty()
            && self.missing_locally.is_empty()
            && self.missing_on_s3.is_empty()
            && self.unreadable.is_empty()
    }

    /// Which remote-key category holds `key`, if any.
    pub fn classification_of(&self, key: &str) -> Option<OutcomeKind> {
        if self.matches.contains(key) {
            Some(OutcomeKind::Match)
        } else if self.mismatches.contains(key) {
            Some(OutcomeKind::Mismatch)
        } else if self.missing_checksum.contains(key) {
            Some(OutcomeKind::MissingChecksum)
        } else if self.missing_locally.contains(key) {
            Some(OutcomeKind::MissingLocally)
        } else if self.unreadable.contains(key) {
            Some(OutcomeKind::Unreadable)
        } else {
            None
        }
    }
}
