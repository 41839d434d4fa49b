use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use s3sum_hash::ChecksumCalculator;
use s3sum_inventory::{list_inventory, AttributeFetcher, LocalEntry, LocalTree, ObjectLister};
use s3sum_journal::{ChecksumJournal, JournalResult};
use s3sum_types::{
    ChecksumRecord, LocalFileDescriptor, Outcome, ReconciliationResult, RemoteObjectDescriptor,
};
use tracing::{debug, info, warn};

use crate::classify::{classify_checksum, diff_key_space};
use crate::config::ReconcileConfig;
use crate::error::{ReconcileError, ReconcileResult};

/// Records handed to the journal per blocking write.
const APPEND_BATCH: usize = 256;

/// Counters describing one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Remote objects listed (markers excluded).
    pub remote_objects: usize,
    /// Local regular files found.
    pub local_files: usize,
    /// Records spilled to the journal.
    pub journal_records: u64,
    /// Keys whose attribute fetch failed outright.
    pub attribute_failures: u64,
    pub elapsed: Duration,
}

/// Result of a completed run.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub result: ReconciliationResult,
    pub stats: RunStats,
}

/// The reconciliation engine.
///
/// Read-only with respect to both the bucket and the local tree.
pub struct Reconciler {
    config: ReconcileConfig,
    calculator: ChecksumCalculator,
}

impl Reconciler {
    /// Create an engine. Fails if the concurrency limit is zero.
    pub fn new(config: ReconcileConfig) -> ReconcileResult<Self> {
        if config.concurrency_limit == 0 {
            return Err(ReconcileError::InvalidConfig(
                "concurrency limit must be at least 1".into(),
            ));
        }
        let calculator = ChecksumCalculator::with_buffer_size(config.hash_buffer_size);
        Ok(Self { config, calculator })
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Run a full reconciliation.
    ///
    /// 1. List the remote inventory completely, then the local inventory.
    /// 2. Record local paths with no remote key as missing on the remote.
    /// 3. Fetch checksum attributes for every remote key into `journal`.
    /// 4. Seal the journal and classify each record against the local tree.
    ///
    /// A listing failure aborts before any attribute is fetched.
    pub async fn run<L, F, J>(
        &self,
        lister: &L,
        fetcher: &F,
        local: &LocalTree,
        journal: J,
    ) -> ReconcileResult<RunReport>
    where
        L: ObjectLister + ?Sized,
        F: AttributeFetcher + ?Sized,
        J: ChecksumJournal + 'static,
    {
        let started = Instant::now();
        let prefix = self.config.prefix.as_deref();

        let remote = list_inventory(lister, prefix).await?;
        let local_files = self.list_local(local).await?;
        info!(
            remote = remote.len(),
            local = local_files.len(),
            prefix = prefix.unwrap_or(""),
            "inventories loaded"
        );

        let mut result = ReconciliationResult::new();
        for path in diff_key_space(&remote, &local_files) {
            result.record_missing_on_s3(path);
        }
        let local_count = local_files.len();
        drop(local_files);

        let journal = Arc::new(journal);
        let attribute_failures = self.fetch_into_journal(fetcher, &remote, &journal).await?;
        let journal = Arc::try_unwrap(journal)
            .map_err(|_| ReconcileError::Task("journal still shared after fetch phase".into()))?;
        let journal_records = journal.len();
        let remote_count = remote.len();
        drop(remote);
        info!(records = journal_records, failures = attribute_failures, "fetch phase complete");

        let reader = journal.seal()?;
        self.compare_journal(reader, local, &mut result).await?;

        let stats = RunStats {
            remote_objects: remote_count,
            local_files: local_count,
            journal_records,
            attribute_failures,
            elapsed: started.elapsed(),
        };
        info!(
            matches = result.matches.len(),
            mismatches = result.mismatches.len(),
            missing_checksum = result.missing_checksum.len(),
            missing_locally = result.missing_locally.len(),
            missing_on_s3 = result.missing_on_s3.len(),
            unreadable = result.unreadable.len(),
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "reconciliation complete"
        );
        Ok(RunReport { result, stats })
    }

    /// Fetch attributes for every remote key and append one record per key.
    ///
    /// A failed fetch still appends a record, without a checksum, and does
    /// not affect other keys. Records are appended in batches on the blocking
    /// pool, so journal I/O never runs on a runtime worker. Returns the
    /// number of failed fetches.
    pub async fn fetch_into_journal<F, J>(
        &self,
        fetcher: &F,
        remote: &[RemoteObjectDescriptor],
        journal: &Arc<J>,
    ) -> ReconcileResult<u64>
    where
        F: AttributeFetcher + ?Sized,
        J: ChecksumJournal + 'static,
    {
        let mut units = stream::iter(remote)
            .map(|object| async move {
                match fetcher.fetch_attributes(&object.key).await {
                    Ok(attributes) => (ChecksumRecord::from_attributes(&object.key, attributes), false),
                    Err(e) => {
                        warn!(key = %object.key, error = %e, "checksum attributes unavailable");
                        (ChecksumRecord::unavailable(&object.key, e.to_string()), true)
                    }
                }
            })
            .buffer_unordered(self.config.concurrency_limit);

        let mut failures = 0;
        let mut batch = Vec::with_capacity(APPEND_BATCH);
        while let Some((record, failed)) = units.next().await {
            if failed {
                failures += 1;
            }
            batch.push(record);
            if batch.len() == APPEND_BATCH {
                append_batch(journal, std::mem::take(&mut batch)).await?;
            }
        }
        if !batch.is_empty() {
            append_batch(journal, batch).await?;
        }
        Ok(failures)
    }

    /// Classify one journal record against the local tree.
    pub async fn classify_record(&self, local: &LocalTree, record: &ChecksumRecord) -> Outcome {
        let path = match local.locate(&record.key).await {
            LocalEntry::File(path) => path,
            LocalEntry::Absent => return Outcome::MissingLocally,
            LocalEntry::Inaccessible(e) => return Outcome::Unreadable(e.to_string()),
        };
        let Some(remote) = record.remote_checksum.as_deref() else {
            return Outcome::MissingChecksum;
        };

        let calculator = self.calculator.clone();
        let part_sizes = record.part_sizes.clone();
        let computed = tokio::task::spawn_blocking(move || {
            calculator.checksum_file(&path, part_sizes.as_deref())
        })
        .await;

        match computed {
            Ok(computed) => classify_checksum(remote, computed),
            Err(e) => Outcome::Unreadable(format!("hashing task failed: {e}")),
        }
    }

    async fn list_local(&self, local: &LocalTree) -> ReconcileResult<Vec<LocalFileDescriptor>> {
        let tree = local.clone();
        let prefix = self.config.prefix.clone();
        let files = tokio::task::spawn_blocking(move || tree.list_files(prefix.as_deref()))
            .await
            .map_err(|e| ReconcileError::Task(e.to_string()))??;
        Ok(files)
    }

    async fn compare_journal<R>(
        &self,
        reader: R,
        local: &LocalTree,
        result: &mut ReconciliationResult,
    ) -> ReconcileResult<()>
    where
        R: Iterator<Item = JournalResult<ChecksumRecord>>,
    {
        let mut units = stream::iter(reader)
            .map(|item| async move {
                let record = item?;
                let outcome = self.classify_record(local, &record).await;
                Ok::<_, ReconcileError>((record.key, outcome))
            })
            .buffer_unordered(self.config.concurrency_limit);

        while let Some(unit) = units.next().await {
            let (key, outcome) = unit?;
            debug!(key = %key, outcome = ?outcome.kind(), "classified");
            result.record(key, outcome);
        }
        Ok(())
    }
}

async fn append_batch<J>(journal: &Arc<J>, records: Vec<ChecksumRecord>) -> ReconcileResult<()>
where
    J: ChecksumJournal + 'static,
{
    let journal = Arc::clone(journal);
    tokio::task::spawn_blocking(move || records.iter().try_for_each(|r| journal.append(r)))
        .await
        .map_err(|e| ReconcileError::Task(e.to_string()))??;
    Ok(())
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use s3sum_inventory::InMemoryBucket;
    use s3sum_journal::{FileJournal, JournalConfig, MemoryJournal, MemoryJournalReader};
    use s3sum_types::{ObjectAttributes, OutcomeKind};
    use std::collections::{BTreeSet, HashSet};
    use std::fs;
    use std::sync::Mutex;
    use std::thread::ThreadId;

    struct Fixture {
        _dir: tempfile::TempDir,
        bucket: InMemoryBucket,
        tree: LocalTree,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_page_size(1000)
        }

        fn with_page_size(page_size: usize) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let tree = LocalTree::open(dir.path()).unwrap();
            Self {
                _dir: dir,
                bucket: InMemoryBucket::with_page_size(page_size),
                tree,
            }
        }

        fn write_local(&self, key: &str, data: &[u8]) {
            let path = self.tree.resolve(key);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, data).unwrap();
        }

        async fn run_with(&self, config: ReconcileConfig) -> ReconcileResult<RunReport> {
            Reconciler::new(config)?
                .run(&self.bucket, &self.bucket, &self.tree, MemoryJournal::new())
                .await
        }

        async fn run(&self) -> ReconciliationResult {
            self.run_with(ReconcileConfig::default()).await.unwrap().result
        }
    }

    fn set(keys: &[&str]) -> BTreeSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[tokio::test]
    async fn whole_object_match() {
        let fx = Fixture::new();
        fx.bucket.put_object("a.txt", b"0123456789");
        fx.write_local("a.txt", b"0123456789");

        let result = fx.run().await;
        assert_eq!(result.matches, set(&["a.txt"]));
        assert!(result.is_clean());
    }

    #[tokio::test]
    async fn multipart_match_and_mismatch() {
        let fx = Fixture::new();
        fx.bucket.put_multipart("b.bin", b"helloworld", &[5, 5]).unwrap();
        fx.write_local("b.bin", b"helloworld");
        assert_eq!(fx.run().await.matches, set(&["b.bin"]));

        fx.write_local("b.bin", b"helloWorld");
        let result = fx.run().await;
        assert!(result.matches.is_empty());
        assert_eq!(result.mismatches, set(&["b.bin"]));
        let detail = &result.mismatch_details["b.bin"];
        assert_ne!(detail.remote_checksum, detail.local_checksum);
    }

    #[tokio::test]
    async fn missing_checksum_excluded_from_comparison() {
        let fx = Fixture::new();
        fx.bucket.put_without_checksum("c.dat", 4);
        fx.write_local("c.dat", b"data");

        let result = fx.run().await;
        assert_eq!(result.missing_checksum, set(&["c.dat"]));
        assert!(result.matches.is_empty());
        assert!(result.mismatches.is_empty());
        assert!(result.missing_on_s3.is_empty());
    }

    #[tokio::test]
    async fn remote_only_key_is_missing_locally() {
        let fx = Fixture::new();
        fx.bucket.put_object("d.log", b"log line");

        let result = fx.run().await;
        assert_eq!(result.missing_locally, set(&["d.log"]));
        assert!(result.missing_on_s3.is_empty());
    }

    #[tokio::test]
    async fn local_only_path_is_missing_on_s3() {
        let fx = Fixture::new();
        fx.write_local("e.tmp", b"scratch");

        let result = fx.run().await;
        assert_eq!(result.missing_on_s3, set(&["e.tmp"]));
        assert_eq!(result.remote_total(), 0);
    }

    #[tokio::test]
    async fn failed_listing_page_aborts_run() {
        let fx = Fixture::with_page_size(2);
        for key in ["k1", "k2", "k3", "k4", "k5", "k6"] {
            fx.bucket.put_object(key, key.as_bytes());
            fx.write_local(key, key.as_bytes());
        }
        fx.bucket.fail_on_page(2);

        let err = fx.run_with(ReconcileConfig::default()).await.unwrap_err();
        assert!(err.is_incomplete_inventory());
    }

    #[tokio::test]
    async fn part_sizes_not_summing_to_file_length() {
        let fx = Fixture::new();
        fx.bucket.put_multipart("big.bin", b"helloworld", &[5, 5]).unwrap();
        fx.write_local("big.bin", b"helloworl");

        let result = fx.run().await;
        assert_eq!(result.mismatches, set(&["big.bin"]));
        assert_eq!(
            result.mismatch_details["big.bin"].local_checksum,
            "size-mismatch: parts sum to 10 bytes, file has 9 bytes"
        );
    }

    #[tokio::test]
    async fn empty_part_list_is_a_layout_mismatch() {
        let fx = Fixture::new();
        fx.bucket.put_raw(
            "odd.bin",
            3,
            ObjectAttributes {
                checksum: Some("Zm9v".into()),
                part_sizes: Some(vec![]),
            },
        );
        fx.write_local("odd.bin", b"foo");

        let result = fx.run().await;
        assert_eq!(result.classification_of("odd.bin"), Some(OutcomeKind::Mismatch));
        assert!(result.mismatch_details["odd.bin"]
            .local_checksum
            .starts_with("invalid-part-layout"));
    }

    #[tokio::test]
    async fn failed_attribute_fetch_is_missing_checksum() {
        let fx = Fixture::new();
        fx.bucket.put_object("ok.txt", b"ok");
        fx.bucket.put_object("flaky.txt", b"flaky");
        fx.write_local("ok.txt", b"ok");
        fx.write_local("flaky.txt", b"flaky");
        fx.bucket.fail_attributes_for("flaky.txt");

        let report = fx.run_with(ReconcileConfig::default()).await.unwrap();
        assert_eq!(report.result.matches, set(&["ok.txt"]));
        assert_eq!(report.result.missing_checksum, set(&["flaky.txt"]));
        assert_eq!(report.stats.attribute_failures, 1);
        assert_eq!(report.stats.journal_records, 2);
    }

    #[tokio::test]
    async fn missing_local_file_wins_over_missing_checksum() {
        let fx = Fixture::new();
        fx.bucket.put_without_checksum("gone.dat", 7);

        let result = fx.run().await;
        assert_eq!(result.missing_locally, set(&["gone.dat"]));
        assert!(result.missing_checksum.is_empty());
    }

    #[tokio::test]
    async fn directory_markers_are_ignored() {
        let fx = Fixture::new();
        fx.bucket.put_placeholder("photos/");
        fx.bucket.put_object("photos/cat.jpg", b"meow");
        fx.write_local("photos/cat.jpg", b"meow");

        let result = fx.run().await;
        assert_eq!(result.matches, set(&["photos/cat.jpg"]));
        assert_eq!(result.remote_total(), 1);
        assert!(result.missing_locally.is_empty());
    }

    #[tokio::test]
    async fn directory_at_key_path_is_missing_locally() {
        let fx = Fixture::new();
        fx.bucket.put_object("clash", b"file on remote");
        fs::create_dir_all(fx.tree.resolve("clash")).unwrap();

        let result = fx.run().await;
        assert_eq!(result.missing_locally, set(&["clash"]));
    }

    #[tokio::test]
    async fn prefix_scopes_both_sides() {
        let fx = Fixture::new();
        fx.bucket.put_object("data/a.txt", b"a");
        fx.bucket.put_object("logs/b.txt", b"b");
        fx.write_local("data/a.txt", b"a");
        fx.write_local("data/extra.txt", b"x");
        fx.write_local("logs/c.txt", b"c");

        let report = fx
            .run_with(ReconcileConfig::with_prefix("data/"))
            .await
            .unwrap();
        assert_eq!(report.result.matches, set(&["data/a.txt"]));
        assert_eq!(report.result.missing_on_s3, set(&["data/extra.txt"]));
        assert_eq!(report.result.remote_total(), 1);
        assert_eq!(report.stats.remote_objects, 1);
        assert_eq!(report.stats.local_files, 2);
    }

    fn populate_mixed(fx: &Fixture) -> (Vec<String>, Vec<String>) {
        let mut remote_keys = Vec::new();
        let mut local_only = Vec::new();
        for i in 0..40u32 {
            let key = format!("set/{}/obj-{i:02}.bin", i % 3);
            let data = format!("payload number {i} ").repeat(i as usize + 1);
            match i % 6 {
                0 => {
                    fx.bucket.put_object(&key, data.as_bytes());
                    fx.write_local(&key, data.as_bytes());
                }
                1 => {
                    let len = data.len() as u64;
                    fx.bucket
                        .put_multipart(&key, data.as_bytes(), &[len / 2, len - len / 2])
                        .unwrap();
                    fx.write_local(&key, data.as_bytes());
                }
                2 => {
                    fx.bucket.put_object(&key, data.as_bytes());
                    fx.write_local(&key, format!("{data}!").as_bytes());
                }
                3 => {
                    fx.bucket.put_without_checksum(&key, data.len() as u64);
                    fx.write_local(&key, data.as_bytes());
                }
                4 => {
                    fx.bucket.put_object(&key, data.as_bytes());
                }
                _ => {
                    fx.write_local(&key, data.as_bytes());
                    local_only.push(key);
                    continue;
                }
            }
            remote_keys.push(key);
        }
        (remote_keys, local_only)
    }

    #[tokio::test]
    async fn every_remote_key_lands_in_exactly_one_category() {
        let fx = Fixture::with_page_size(7);
        let (remote_keys, local_only) = populate_mixed(&fx);
        let result = fx.run().await;

        for key in &remote_keys {
            let hits = [
                result.matches.contains(key),
                result.mismatches.contains(key),
                result.missing_checksum.contains(key),
                result.missing_locally.contains(key),
                result.unreadable.contains(key),
            ]
            .iter()
            .filter(|hit| **hit)
            .count();
            assert_eq!(hits, 1, "{key} classified {hits} times");
            assert!(!result.missing_on_s3.contains(key));
        }
        assert_eq!(result.remote_total(), remote_keys.len());
        let expected_local_only: BTreeSet<String> = local_only.into_iter().collect();
        assert_eq!(result.missing_on_s3, expected_local_only);
        assert!(result.unreadable.is_empty());
        assert_eq!(result.matches.len(), 14);
        assert_eq!(result.mismatches.len(), 7);
        assert_eq!(result.missing_checksum.len(), 7);
        assert_eq!(result.missing_locally.len(), 6);
    }

    #[tokio::test]
    async fn rerun_is_idempotent() {
        let fx = Fixture::new();
        populate_mixed(&fx);
        let first = fx.run().await;
        let second = fx.run().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn outcome_independent_of_concurrency_and_journal() {
        let fx = Fixture::with_page_size(5);
        populate_mixed(&fx);

        let serial = fx
            .run_with(ReconcileConfig {
                concurrency_limit: 1,
                ..ReconcileConfig::default()
            })
            .await
            .unwrap()
            .result;

        let reconciler = Reconciler::new(ReconcileConfig {
            concurrency_limit: 16,
            hash_buffer_size: 7,
            ..ReconcileConfig::default()
        })
        .unwrap();
        let journal = FileJournal::temporary(JournalConfig::default()).unwrap();
        let parallel = reconciler
            .run(&fx.bucket, &fx.bucket, &fx.tree, journal)
            .await
            .unwrap()
            .result;

        assert_eq!(serial, parallel);
    }

    #[tokio::test]
    async fn zero_concurrency_is_rejected() {
        let err = Reconciler::new(ReconcileConfig {
            concurrency_limit: 0,
            ..ReconcileConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ReconcileError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn classify_single_record() {
        let fx = Fixture::new();
        fx.write_local("x.txt", b"abc");
        let reconciler = Reconciler::new(ReconcileConfig::default()).unwrap();

        let record = ChecksumRecord::from_attributes(
            "x.txt",
            ObjectAttributes {
                checksum: Some("ungWv48Bz+pBQUDeXa4iI7ADYaOWF3qctBD/YfIAFa0=".into()),
                part_sizes: None,
            },
        );
        assert_eq!(reconciler.classify_record(&fx.tree, &record).await, Outcome::Match);

        let absent = ChecksumRecord::unavailable("y.txt", "n/a");
        assert_eq!(
            reconciler.classify_record(&fx.tree, &absent).await,
            Outcome::MissingLocally
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn backslash_in_key_is_an_ordinary_character() {
        let fx = Fixture::new();
        fx.bucket.put_object(r"dir\a.txt", b"same");
        fx.write_local(r"dir\a.txt", b"same");
        fx.write_local("dir/a.txt", b"other");

        let result = fx.run().await;
        assert_eq!(result.matches, set(&[r"dir\a.txt"]));
        assert_eq!(result.missing_on_s3, set(&["dir/a.txt"]));
        assert!(result.mismatches.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinks_are_skipped_on_both_sides() {
        let fx = Fixture::new();
        fx.bucket.put_object("real.txt", b"content");
        fx.write_local("real.txt", b"content");
        std::os::unix::fs::symlink(fx.tree.resolve("real.txt"), fx.tree.resolve("link.txt"))
            .unwrap();

        let result = fx.run().await;
        assert_eq!(result.matches, set(&["real.txt"]));
        assert!(result.missing_on_s3.is_empty());

        fx.bucket.put_object("link.txt", b"content");
        let result = fx.run().await;
        assert_eq!(result.matches, set(&["real.txt"]));
        assert_eq!(result.missing_locally, set(&["link.txt"]));
        assert!(result.missing_on_s3.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unreadable_local_file_is_reported_as_unreadable() {
        use std::os::unix::fs::PermissionsExt;

        let fx = Fixture::new();
        fx.bucket.put_object("open.bin", b"public");
        fx.bucket.put_object("secret.bin", b"classified");
        fx.write_local("open.bin", b"public");
        fx.write_local("secret.bin", b"classified");
        let secret = fx.tree.resolve("secret.bin");
        fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::File::open(&secret).is_ok() {
            // Permission bits do not apply to root.
            return;
        }

        let result = fx.run().await;
        fs::set_permissions(&secret, fs::Permissions::from_mode(0o644)).unwrap();

        assert_eq!(result.unreadable, set(&["secret.bin"]));
        assert!(result.read_failures.contains_key("secret.bin"));
        assert_eq!(result.matches, set(&["open.bin"]));
        assert!(result.mismatches.is_empty());
        assert!(result.missing_on_s3.is_empty());
        assert_eq!(result.remote_total(), 2);
    }

    struct ThreadTrackingJournal {
        inner: MemoryJournal,
        threads: Arc<Mutex<HashSet<ThreadId>>>,
    }

    impl ChecksumJournal for ThreadTrackingJournal {
        type Reader = MemoryJournalReader;

        fn append(&self, record: &ChecksumRecord) -> JournalResult<()> {
            self.threads
                .lock()
                .unwrap()
                .insert(std::thread::current().id());
            self.inner.append(record)
        }

        fn len(&self) -> u64 {
            self.inner.len()
        }

        fn seal(self) -> JournalResult<MemoryJournalReader> {
            self.inner.seal()
        }
    }

    #[tokio::test]
    async fn journal_appends_run_off_the_runtime_thread() {
        let fx = Fixture::new();
        let count = APPEND_BATCH * 2 + 10;
        for i in 0..count {
            fx.bucket.put_object(&format!("k{i:04}"), b"x");
        }
        let threads = Arc::new(Mutex::new(HashSet::new()));
        let journal = ThreadTrackingJournal {
            inner: MemoryJournal::new(),
            threads: Arc::clone(&threads),
        };

        let report = Reconciler::new(ReconcileConfig::default())
            .unwrap()
            .run(&fx.bucket, &fx.bucket, &fx.tree, journal)
            .await
            .unwrap();

        assert_eq!(report.stats.journal_records, count as u64);
        assert_eq!(report.result.missing_locally.len(), count);
        let threads = threads.lock().unwrap();
        assert!(!threads.is_empty());
        assert!(!threads.contains(&std::thread::current().id()));
    }
}
