//! Synonym dictionary loading and polled hot reload.
//!
//! A [`SynonymLoader`] owns the current [`SynonymSnapshot`] and is shared by
//! every tokenizer a factory creates. Tokenizers call
//! [`SynonymLoader::check_reload`] between documents; the loader stats the
//! dictionary file at most once per `reload_interval`, rebuilds the map under
//! a lock when the modification time moved, and publishes the new snapshot
//! in one swap. Readers clone the current `Arc` and never see a half-built
//! map.
//!
//! ```text
//! LOADED ── check (interval elapsed, mtime changed) ──> RELOADING ──> LOADED
//!    ↑                                                      │
//!    └──────────────── parse error: keep old snapshot ──────┘
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime};

use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::analysis::synonym::map::SynonymMap;
use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::keyword::KeywordAnalyzer;
use crate::analysis::synonym::parser::{SynonymFormat, parse_rules_with};
use crate::error::{NgramSynonymError, Result};

/// `last_checked` value before the first check.
const NEVER_CHECKED: u64 = u64::MAX;

/// Where the synonym rules come from and how they are refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynonymLoaderConfig {
    /// Inline rule lines. Takes precedence over `synonyms_path`.
    pub synonyms: Option<Vec<String>>,

    /// Path of a rule file.
    pub synonyms_path: Option<PathBuf>,

    /// Base directory for a relative `synonyms_path`.
    pub config_dir: Option<PathBuf>,

    /// Grammar of the rules.
    pub format: SynonymFormat,

    /// Watch `synonyms_path` for changes.
    pub dynamic_reload: bool,

    /// Minimum time between two checks of the rule file.
    pub reload_interval: Duration,
}

impl Default for SynonymLoaderConfig {
    fn default() -> Self {
        SynonymLoaderConfig {
            synonyms: None,
            synonyms_path: None,
            config_dir: None,
            format: SynonymFormat::Solr,
            dynamic_reload: false,
            reload_interval: Duration::from_secs(60),
        }
    }
}

impl SynonymLoaderConfig {
    /// The rule file path, resolved against `config_dir` when relative.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        let path = self.synonyms_path.as_ref()?;
        match &self.config_dir {
            Some(dir) if path.is_relative() => Some(dir.join(path)),
            _ => Some(path.clone()),
        }
    }
}

/// An immutable dictionary version.
#[derive(Debug, Clone)]
pub struct SynonymSnapshot {
    map: Option<Arc<SynonymMap>>,
    last_modified: SystemTime,
}

impl SynonymSnapshot {
    pub fn new(map: Option<SynonymMap>, last_modified: SystemTime) -> Self {
        SynonymSnapshot {
            map: map.map(Arc::new),
            last_modified,
        }
    }

    /// The dictionary, or `None` when the source had no rules.
    pub fn synonym_map(&self) -> Option<&Arc<SynonymMap>> {
        self.map.as_ref()
    }

    /// Modification time of the source this snapshot was built from.
    pub fn last_modified(&self) -> SystemTime {
        self.last_modified
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_none()
    }
}

enum RuleSource {
    Inline(String),
    File(PathBuf),
    Empty,
}

/// Owns the current synonym snapshot and reloads it from disk on demand.
pub struct SynonymLoader {
    config: SynonymLoaderConfig,
    expand: bool,
    ignore_case: bool,
    analyzer: Arc<dyn Analyzer>,
    reloadable_path: Option<PathBuf>,
    current: RwLock<Arc<SynonymSnapshot>>,
    reload_lock: Mutex<()>,
    epoch: Instant,
    last_checked: AtomicU64,
    reload_count: AtomicU64,
    check_count: AtomicU64,
}

impl SynonymLoader {
    /// Build the initial snapshot.
    ///
    /// Unreadable or malformed configured sources are errors. A source
    /// without rules gives an empty snapshot.
    pub fn new(config: SynonymLoaderConfig, expand: bool, ignore_case: bool) -> Result<Self> {
        let analyzer = Arc::new(KeywordAnalyzer::with_ignore_case(ignore_case));
        Self::with_analyzer(config, expand, ignore_case, analyzer)
    }

    /// Build the initial snapshot, canonicalizing rule terms with `analyzer`.
    pub fn with_analyzer(
        config: SynonymLoaderConfig,
        expand: bool,
        ignore_case: bool,
        analyzer: Arc<dyn Analyzer>,
    ) -> Result<Self> {
        let source = match (&config.synonyms, config.resolved_path()) {
            (Some(lines), _) => {
                let mut rules = String::new();
                for line in lines {
                    rules.push_str(line);
                    rules.push('\n');
                }
                RuleSource::Inline(rules)
            }
            (None, Some(path)) => RuleSource::File(path),
            (None, None) => RuleSource::Empty,
        };

        let mut reloadable_path = None;
        let snapshot = match source {
            RuleSource::Inline(rules) => {
                let map = parse_rules_with(
                    &rules,
                    config.format,
                    expand,
                    ignore_case,
                    Arc::clone(&analyzer),
                )?;
                SynonymSnapshot::new(map, SystemTime::now())
            }
            RuleSource::File(path) => {
                let rules = read_rules(&path)?;
                let map = parse_rules_with(
                    &rules,
                    config.format,
                    expand,
                    ignore_case,
                    Arc::clone(&analyzer),
                )?;
                if config.dynamic_reload {
                    let modified = file_modified(&path)?;
                    reloadable_path = Some(path);
                    SynonymSnapshot::new(map, modified)
                } else {
                    SynonymSnapshot::new(map, SystemTime::now())
                }
            }
            RuleSource::Empty => SynonymSnapshot::new(None, SystemTime::now()),
        };

        debug!(
            "Loaded synonyms from {}: {} entries",
            describe(&config, reloadable_path.is_some()),
            snapshot.synonym_map().map_or(0, |map| map.len())
        );

        Ok(SynonymLoader {
            config,
            expand,
            ignore_case,
            analyzer,
            reloadable_path,
            current: RwLock::new(Arc::new(snapshot)),
            reload_lock: Mutex::new(()),
            epoch: Instant::now(),
            last_checked: AtomicU64::new(NEVER_CHECKED),
            reload_count: AtomicU64::new(0),
            check_count: AtomicU64::new(0),
        })
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<SynonymSnapshot> {
        self.current.read().clone()
    }

    /// The current dictionary, if any.
    pub fn synonym_map(&self) -> Option<Arc<SynonymMap>> {
        self.snapshot().synonym_map().cloned()
    }

    /// Modification time of the current snapshot's source.
    pub fn last_modified(&self) -> SystemTime {
        self.current.read().last_modified()
    }

    /// Whether the source is a file watched for changes.
    pub fn is_reloadable(&self) -> bool {
        self.reloadable_path.is_some()
    }

    pub fn config(&self) -> &SynonymLoaderConfig {
        &self.config
    }

    pub fn expand(&self) -> bool {
        self.expand
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// Number of successful rebuilds since construction.
    pub fn reload_count(&self) -> u64 {
        self.reload_count.load(Ordering::Relaxed)
    }

    /// Number of times the rule file was stat'ed by [`check_reload`](Self::check_reload).
    pub fn check_count(&self) -> u64 {
        self.check_count.load(Ordering::Relaxed)
    }

    /// Human readable description of the rule source.
    pub fn describe_source(&self) -> String {
        describe(&self.config, self.is_reloadable())
    }

    /// Reload the dictionary if its file changed and report whether a caller
    /// holding a snapshot from `known` is now stale.
    ///
    /// The file is stat'ed at most once per `reload_interval` across all
    /// callers. A failed rebuild is logged and the previous snapshot stays in
    /// place; the next due check retries.
    pub fn check_reload(&self, known: SystemTime) -> bool {
        if let Some(path) = &self.reloadable_path {
            if self.claim_check() {
                self.check_count.fetch_add(1, Ordering::Relaxed);
                match file_modified(path) {
                    Ok(modified) if modified != known => {
                        let _guard = self.reload_lock.lock();
                        if modified != self.last_modified() {
                            if let Err(e) = self.reload(path, modified) {
                                warn!("Failed to reload synonyms from {}: {}", path.display(), e);
                            }
                        }
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Failed to check synonyms file {}: {}", path.display(), e),
                }
            }
        }

        self.last_modified() != known
    }

    /// Claim the next file check. Only one caller wins per interval.
    fn claim_check(&self) -> bool {
        let now = nanos(self.epoch.elapsed());
        let interval = nanos(self.config.reload_interval);
        let last = self.last_checked.load(Ordering::Acquire);

        if last != NEVER_CHECKED && interval > 0 && now.saturating_sub(last) <= interval {
            return false;
        }

        self.last_checked
            .compare_exchange(last, now, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn reload(&self, path: &Path, modified: SystemTime) -> Result<()> {
        let rules = read_rules(path)?;
        let map = parse_rules_with(
            &rules,
            self.config.format,
            self.expand,
            self.ignore_case,
            Arc::clone(&self.analyzer),
        )?;
        let entries = map.as_ref().map_or(0, |map| map.len());

        *self.current.write() = Arc::new(SynonymSnapshot::new(map, modified));
        self.reload_count.fetch_add(1, Ordering::Relaxed);

        info!("Reloaded synonyms from {}: {} entries", path.display(), entries);
        Ok(())
    }
}

impl std::fmt::Debug for SynonymLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynonymLoader")
            .field("source", &self.describe_source())
            .field("format", &self.config.format)
            .field("expand", &self.expand)
            .field("ignore_case", &self.ignore_case)
            .field("analyzer", &self.analyzer.name())
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

fn describe(config: &SynonymLoaderConfig, reloadable: bool) -> String {
    match (&config.synonyms, config.resolved_path()) {
        (Some(lines), _) => format!("inline rules ({} lines)", lines.len()),
        (None, Some(path)) if reloadable => format!("{} (reloadable)", path.display()),
        (None, Some(path)) => path.display().to_string(),
        (None, None) => "no source".to_string(),
    }
}

fn read_rules(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        NgramSynonymError::dictionary(format!(
            "Failed to read synonyms file '{}': {}",
            path.display(),
            e
        ))
    })
}

fn file_modified(path: &Path) -> Result<SystemTime> {
    Ok(fs::metadata(path)?.modified()?)
}

fn nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX - 1)
}
