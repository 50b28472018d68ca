// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! On-disk history cache.
//!
//! One JSON file per fingerprint. The header carries the fingerprint and the
//! `HEAD` revision the histories were computed at; a mismatch of either
//! discards the file as a whole.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use polyglot_common_config::TrackingConfig;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, trace, warn};

use crate::error::{Result, StatusError};
use crate::history::FileHistory;

const CACHE_VERSION: u32 = 1;

/// Hex digest of the tracking settings that influence computed histories.
pub fn fingerprint(tracking: &TrackingConfig) -> String {
	let input = format!(
		"ignoredKeywords::{}:localizableProperty::{}",
		tracking.ignored_keywords.join("|"),
		tracking.localizable_property.as_deref().unwrap_or_default()
	);
	hex::encode(Sha256::digest(input.as_bytes()))
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
	version: u32,
	fingerprint: String,
	revision: Option<String>,
	entries: BTreeMap<String, FileHistory>,
}

#[derive(Debug, Clone)]
pub struct HistoryCache {
	dir: PathBuf,
	fingerprint: String,
}

impl HistoryCache {
	pub fn new(dir: impl Into<PathBuf>, fingerprint: impl Into<String>) -> Self {
		Self {
			dir: dir.into(),
			fingerprint: fingerprint.into(),
		}
	}

	pub fn path(&self) -> PathBuf {
		self.dir.join(format!("history-{}.json", self.fingerprint))
	}

	pub fn fingerprint(&self) -> &str {
		&self.fingerprint
	}

	/// Cached histories valid for `revision`. Missing, unreadable or stale
	/// files yield an empty map.
	pub async fn read(&self, revision: Option<&str>) -> BTreeMap<String, FileHistory> {
		let path = self.path();
		let contents = match tokio::fs::read_to_string(&path).await {
			Ok(contents) => contents,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				trace!(path = %path.display(), "no history cache");
				return BTreeMap::new();
			}
			Err(e) => {
				warn!(path = %path.display(), error = %e, "failed to read history cache, ignoring");
				return BTreeMap::new();
			}
		};

		let file: CacheFile = match serde_json::from_str(&contents) {
			Ok(file) => file,
			Err(e) => {
				warn!(path = %path.display(), error = %e, "corrupt history cache, ignoring");
				return BTreeMap::new();
			}
		};

		if file.version != CACHE_VERSION || file.fingerprint != self.fingerprint {
			debug!(path = %path.display(), "history cache fingerprint mismatch, discarding");
			return BTreeMap::new();
		}
		if file.revision.as_deref() != revision {
			debug!(
					path = %path.display(),
					cached = ?file.revision,
					current = ?revision,
					"history cache is from another revision, discarding"
			);
			return BTreeMap::new();
		}

		trace!(path = %path.display(), entries = file.entries.len(), "loaded history cache");
		file.entries
	}

	/// Atomically replaces the cache contents.
	pub async fn write(
		&self,
		revision: Option<&str>,
		entries: &BTreeMap<String, FileHistory>,
	) -> Result<()> {
		tokio::fs::create_dir_all(&self.dir)
			.await
			.map_err(|e| StatusError::io(&self.dir, e))?;

		let path = self.path();
		let tmp_path = tmp_path(&path);

		let file = CacheFile {
			version: CACHE_VERSION,
			fingerprint: self.fingerprint.clone(),
			revision: revision.map(str::to_string),
			entries: entries.clone(),
		};
		let json = serde_json::to_string(&file)?;

		tokio::fs::write(&tmp_path, &json)
			.await
			.map_err(|e| StatusError::io(&tmp_path, e))?;
		tokio::fs::rename(&tmp_path, &path)
			.await
			.map_err(|e| StatusError::io(&path, e))?;

		debug!(path = %path.display(), entries = entries.len(), "wrote history cache");
		Ok(())
	}
}

fn tmp_path(path: &Path) -> PathBuf {
	let mut name = path.file_name().unwrap_or_default().to_os_string();
	name.push(".tmp");
	path.with_file_name(name)
}
