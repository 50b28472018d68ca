// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::DateTime;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tracing::{debug, info, trace, warn};

use crate::client::{CloneOptions, GitClient};
use crate::error::GitError;
use crate::ChangeRecord;

const FIELD_SEPARATOR: char = '\x1f';
const RECORD_SEPARATOR: char = '\x1e';
const LOG_FORMAT: &str = "--format=%H%x1f%aI%x1f%an%x1f%ae%x1f%s%x1f%b%x1e";

/// Git client implementation using the git CLI.
///
/// At most `max_concurrency` git processes run at once; further calls wait
/// for a permit.
pub struct CommandGitClient {
	working_dir: RwLock<PathBuf>,
	permits: Semaphore,
}

impl CommandGitClient {
	pub fn new(working_dir: impl Into<PathBuf>) -> Self {
		Self::with_max_concurrency(working_dir, default_concurrency())
	}

	pub fn with_max_concurrency(working_dir: impl Into<PathBuf>, max_concurrency: usize) -> Self {
		Self {
			working_dir: RwLock::new(working_dir.into()),
			permits: Semaphore::new(max_concurrency.max(1)),
		}
	}

	async fn run(&self, args: &[&str]) -> Result<String, GitError> {
		let _permit = self
			.permits
			.acquire()
			.await
			.map_err(|e| GitError::Io(std::io::Error::other(e)))?;
		run_git(&self.working_directory(), args).await
	}
}

fn default_concurrency() -> usize {
	std::thread::available_parallelism()
		.map(|n| n.get())
		.unwrap_or(2)
		.clamp(2, 32)
}

#[async_trait]
impl GitClient for CommandGitClient {
	async fn log(&self, path: &str) -> Result<Vec<ChangeRecord>, GitError> {
		let output = match self.run(&["log", "--follow", LOG_FORMAT, "--", path]).await {
			Ok(output) => output,
			Err(GitError::CommandFailed { ref stderr, .. }) if is_empty_history_error(stderr) => {
				debug!(path = %path, "repository has no commits yet");
				return Ok(Vec::new());
			}
			Err(e) => return Err(e),
		};

		let records = parse_log(&output)?;

		trace!(path = %path, commits = records.len(), "read file history");

		Ok(records)
	}

	async fn head_revision(&self) -> Result<Option<String>, GitError> {
		match self.run(&["rev-parse", "--verify", "--quiet", "HEAD"]).await {
			Ok(sha) if !sha.is_empty() => Ok(Some(sha)),
			Ok(_) | Err(GitError::CommandFailed { .. }) => Ok(None),
			Err(e) => Err(e),
		}
	}

	async fn is_shallow_repository(&self) -> Result<bool, GitError> {
		let output = self.run(&["rev-parse", "--is-shallow-repository"]).await?;
		Ok(output == "true")
	}

	async fn clone_repository(
		&self,
		url: &str,
		dest: &Path,
		options: CloneOptions,
	) -> Result<(), GitError> {
		if let Some(parent) = dest.parent() {
			tokio::fs::create_dir_all(parent).await?;
		}

		let dest_str = dest.to_string_lossy().to_string();
		let mut args = vec!["clone"];
		if options.bare {
			args.push("--bare");
		}
		if options.blobless {
			args.push("--filter=blob:none");
		}
		args.push(url);
		args.push(&dest_str);

		info!(url = %url, dest = %dest.display(), bare = options.bare, "cloning repository");

		self.run(&args).await?;

		debug!(dest = %dest.display(), "clone completed");
		Ok(())
	}

	fn set_working_directory(&self, path: &Path) {
		debug!(path = %path.display(), "switching git working directory");
		match self.working_dir.write() {
			Ok(mut dir) => *dir = path.to_path_buf(),
			Err(poisoned) => *poisoned.into_inner() = path.to_path_buf(),
		}
	}

	fn working_directory(&self) -> PathBuf {
		match self.working_dir.read() {
			Ok(dir) => dir.clone(),
			Err(poisoned) => poisoned.into_inner().clone(),
		}
	}
}

fn is_empty_history_error(stderr: &str) -> bool {
	stderr.contains("does not have any commits yet") || stderr.contains("bad default revision")
}

/// Runs a git command and returns the stdout on success.
async fn run_git(path: &Path, args: &[&str]) -> Result<String, GitError> {
	let mut cmd = Command::new("git");
	cmd.arg("-C").arg(path).args(args);

	trace!(
			cmd = %format!("git -C {} {}", path.display(), args.join(" ")),
			"running git command"
	);

	let output = cmd.output().await.map_err(|e| {
		if e.kind() == std::io::ErrorKind::NotFound {
			warn!("git not found in PATH");
			GitError::GitNotInstalled
		} else {
			GitError::Io(e)
		}
	})?;

	if output.status.success() {
		Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
	} else {
		let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
		Err(GitError::CommandFailed {
			cmd: "git",
			args: args.iter().map(|s| s.to_string()).collect(),
			stderr,
		})
	}
}

/// Parses `git log` output produced with [`LOG_FORMAT`].
fn parse_log(output: &str) -> Result<Vec<ChangeRecord>, GitError> {
	let mut records = Vec::new();

	for raw in output.split(RECORD_SEPARATOR) {
		let raw = raw.trim_matches(|c| c == '\n' || c == '\r');
		if raw.is_empty() {
			continue;
		}

		let fields: Vec<&str> = raw.splitn(6, FIELD_SEPARATOR).collect();
		let [hash, date, author_name, author_email, message, body] = fields[..] else {
			return Err(GitError::Parse(format!(
				"expected 6 log fields, got {}",
				fields.len()
			)));
		};

		let date = DateTime::parse_from_rfc3339(date)
			.map_err(|e| GitError::Parse(format!("invalid commit date `{date}`: {e}")))?;

		records.push(ChangeRecord {
			hash: hash.to_string(),
			date,
			author_name: author_name.to_string(),
			author_email: author_email.to_string(),
			message: message.to_string(),
			body: body.trim().to_string(),
		});
	}

	Ok(records)
}
