// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::GitError;
use crate::ChangeRecord;

/// Options for cloning a history-only copy of a repository.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CloneOptions {
	/// Clone without a working tree.
	pub bare: bool,
	/// Skip blob contents (`--filter=blob:none`); history stays complete.
	pub blobless: bool,
}

/// Trait abstracting the read-only git operations polyglot needs, for
/// testability.
#[async_trait]
pub trait GitClient: Send + Sync {
	/// Every commit touching `path`, newest first.
	///
	/// `path` is relative to the working directory. A repository without any
	/// commits yields an empty list.
	async fn log(&self, path: &str) -> Result<Vec<ChangeRecord>, GitError>;

	/// The commit `HEAD` points at, or `None` when there are no commits yet.
	async fn head_revision(&self) -> Result<Option<String>, GitError>;

	/// Whether the working repository is a shallow clone.
	async fn is_shallow_repository(&self) -> Result<bool, GitError>;

	/// Clone `url` into `dest`. The parent of `dest` is created if needed.
	async fn clone_repository(
		&self,
		url: &str,
		dest: &Path,
		options: CloneOptions,
	) -> Result<(), GitError>;

	/// Run all later commands against the repository at `path`.
	fn set_working_directory(&self, path: &Path);

	/// The directory commands currently run in.
	fn working_directory(&self) -> PathBuf;
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Test: default clone options request a plain clone.
	///
	/// Why this test is important: callers opt into bare and blobless clones
	/// explicitly; a default that silently dropped blobs would break external
	/// repositories, whose files must be readable from disk.
	#[test]
	fn test_default_clone_options() {
		let options = CloneOptions::default();
		assert!(!options.bare);
		assert!(!options.blobless);
	}
}
