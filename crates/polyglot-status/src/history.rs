// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;
use std::sync::Arc;

use polyglot_cli_git::{ChangeRecord, GitClient};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

use crate::error::{Result, StatusError};

/// Git history of a single tracked file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileHistory {
	/// Newest commit whose message mentions no ignored keyword, or the newest
	/// commit when every commit mentions one.
	pub latest_tracked_change: ChangeRecord,
	/// Every commit touching the file, newest first.
	pub all: Vec<ChangeRecord>,
}

impl FileHistory {
	/// Builds the history from a newest-first log. Returns `None` for an
	/// empty log.
	pub fn from_log(log: Vec<ChangeRecord>, ignored_keywords: &[String]) -> Option<Self> {
		let newest = log.first()?.clone();
		let latest_tracked_change = log
			.iter()
			.find(|record| !record.mentions_any(ignored_keywords))
			.cloned()
			.unwrap_or(newest);

		Some(Self {
			latest_tracked_change,
			all: log,
		})
	}
}

/// Per-run memoized access to file histories.
///
/// Seeded from the persisted cache; a path is asked of git at most once per
/// run, after which its history is served from memory.
pub struct HistoryProvider {
	git: Arc<dyn GitClient>,
	ignored_keywords: Vec<String>,
	/// Prepended to every path handed to git.
	path_prefix: String,
	entries: RwLock<BTreeMap<String, FileHistory>>,
}

impl HistoryProvider {
	pub fn new(
		git: Arc<dyn GitClient>,
		ignored_keywords: Vec<String>,
		seed: BTreeMap<String, FileHistory>,
	) -> Self {
		Self {
			git,
			ignored_keywords,
			path_prefix: String::new(),
			entries: RwLock::new(seed),
		}
	}

	/// Histories are looked up under `prefix/<path>` while still being keyed
	/// by the unprefixed path.
	pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.path_prefix = prefix.into();
		self
	}

	#[instrument(skip(self), level = "debug")]
	pub async fn get_history(&self, path: &str) -> Result<FileHistory> {
		if let Some(history) = self.entries.read().await.get(path) {
			trace!(path, "history cache hit");
			return Ok(history.clone());
		}
		trace!(path, "history cache miss");

		let git_path = if self.path_prefix.is_empty() {
			path.to_string()
		} else {
			format!("{}/{}", self.path_prefix, path)
		};

		let log = self.git.log(&git_path).await?;
		debug!(path = %git_path, commits = log.len(), "fetched history");

		let history = FileHistory::from_log(log, &self.ignored_keywords)
			.ok_or_else(|| StatusError::HistoryUnavailable(path.to_string()))?;

		// A concurrent lookup of the same path may have landed first; keep
		// whichever was stored.
		let mut entries = self.entries.write().await;
		Ok(entries.entry(path.to_string()).or_insert(history).clone())
	}

	/// Every history known so far, for persistence.
	pub async fn snapshot(&self) -> BTreeMap<String, FileHistory> {
		self.entries.read().await.clone()
	}
}
