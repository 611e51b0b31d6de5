//! history.rs: bounded, most-recent-first list of analysis results.
//!
//! In memory by default; with a path it is loaded on start and saved after every change
//! (JSON array, ISO-8601 timestamps). Single-client assumption: no cross-process locking.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::verdict::AnalysisResult;

pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Debug)]
pub struct History {
    inner: Mutex<VecDeque<AnalysisResult>>,
    cap: usize,
    path: Option<PathBuf>,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl History {
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            inner: Mutex::new(VecDeque::with_capacity(cap)),
            cap,
            path: None,
        }
    }

    /// Load from `path`. A missing or corrupt file starts an empty history.
    pub fn load<P: AsRef<Path>>(path: P, cap: usize) -> Self {
        let path = path.as_ref().to_path_buf();
        let mut h = Self::with_capacity(cap);

        match read_entries(&path) {
            Ok(Some(entries)) => {
                let mut v = h.inner.lock().expect("history mutex poisoned");
                v.extend(entries.into_iter().take(h.cap));
                debug!(target: "history", path = %path.display(), entries = v.len(), "history loaded");
            }
            Ok(None) => {
                debug!(target: "history", path = %path.display(), "no history file; starting empty");
            }
            Err(e) => {
                warn!(target: "history", path = %path.display(), error = %format!("{e:#}"), "history unreadable; starting empty");
            }
        }

        h.path = Some(path);
        h
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Insert at the front; the oldest entry falls off once over capacity.
    /// The file is rewritten before the lock is released, so disk never lags memory.
    pub fn push(&self, result: AnalysisResult) {
        let mut v = self.inner.lock().expect("history mutex poisoned");
        v.push_front(result);
        v.truncate(self.cap);
        self.persist(&v);
    }

    /// Most recent first.
    pub fn snapshot(&self) -> Vec<AnalysisResult> {
        let v = self.inner.lock().expect("history mutex poisoned");
        v.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<AnalysisResult> {
        let v = self.inner.lock().expect("history mutex poisoned");
        v.front().cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("history mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut v = self.inner.lock().expect("history mutex poisoned");
        v.clear();
        self.persist(&v);
    }

    /// Write the current list to the configured path (temp file + rename).
    /// No-op without a path.
    pub fn save(&self) -> Result<()> {
        let v = self.inner.lock().expect("history mutex poisoned");
        self.write_locked(&v)
    }

    /// Callers hold `inner`; that lock also serializes use of the temp file.
    fn write_locked(&self, entries: &VecDeque<AnalysisResult>) -> Result<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(entries).context("serializing history")?;

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating history dir {}", dir.display()))?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }

    fn persist(&self, entries: &VecDeque<AnalysisResult>) {
        if let Err(e) = self.write_locked(entries) {
            warn!(target: "history", error = %format!("{e:#}"), "failed to persist history");
        }
    }
}

/// `Ok(None)` when the file does not exist.
fn read_entries(path: &Path) -> Result<Option<Vec<AnalysisResult>>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    if data.trim().is_empty() {
        return Ok(Some(Vec::new()));
    }
    let entries: Vec<AnalysisResult> =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(entries))
}
