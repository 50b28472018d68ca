// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::DateTime;

use crate::client::{CloneOptions, GitClient};
use crate::error::GitError;
use crate::ChangeRecord;

/// Recorded call to the mock git client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockCall {
	Log(String),
	HeadRevision,
	IsShallowRepository,
	Clone {
		url: String,
		dest: PathBuf,
		options: CloneOptions,
	},
	SetWorkingDirectory(PathBuf),
}

/// Mock git client for testing.
#[derive(Clone)]
pub struct MockGitClient {
	/// Scripted history per path, newest first.
	pub logs: HashMap<String, Vec<ChangeRecord>>,
	/// Revision returned from head_revision.
	pub head: Option<String>,
	/// Whether is_shallow_repository returns true.
	pub shallow: bool,
	/// If set, log returns this error.
	pub log_error: Option<String>,
	/// Track calls for verification.
	pub calls: Arc<Mutex<Vec<MockCall>>>,
	working_dir: Arc<Mutex<PathBuf>>,
}

impl Default for MockGitClient {
	fn default() -> Self {
		Self::new()
	}
}

impl MockGitClient {
	pub fn new() -> Self {
		Self {
			logs: HashMap::new(),
			head: Some("abc123def456789012345678901234567890abcd".to_string()),
			shallow: false,
			log_error: None,
			calls: Arc::new(Mutex::new(Vec::new())),
			working_dir: Arc::new(Mutex::new(PathBuf::from("."))),
		}
	}

	/// Adds a commit touching `path`. `date` is RFC 3339; the log is kept
	/// sorted newest first.
	pub fn with_commit(mut self, path: &str, date: &str, message: &str) -> Self {
		let history = self.logs.entry(path.to_string()).or_default();
		let record = ChangeRecord {
			hash: format!("{:040x}", history.len() + 1),
			date: DateTime::parse_from_rfc3339(date).expect("mock commit dates must be RFC 3339"),
			author_name: "Test".to_string(),
			author_email: "test@test.com".to_string(),
			message: message.to_string(),
			body: String::new(),
		};
		history.push(record);
		history.sort_by(|a, b| b.date.cmp(&a.date));
		self
	}

	pub fn with_head(mut self, head: Option<&str>) -> Self {
		self.head = head.map(|h| h.to_string());
		self
	}

	pub fn shallow(mut self) -> Self {
		self.shallow = true;
		self
	}

	pub fn with_log_error(mut self, error: impl Into<String>) -> Self {
		self.log_error = Some(error.into());
		self
	}

	/// Returns the recorded calls.
	pub fn get_calls(&self) -> Vec<MockCall> {
		self.calls.lock().unwrap().clone()
	}

	/// Number of `log` invocations so far.
	pub fn log_calls(&self) -> usize {
		self
			.get_calls()
			.iter()
			.filter(|c| matches!(c, MockCall::Log(_)))
			.count()
	}

	/// Clears recorded calls.
	pub fn clear_calls(&self) {
		self.calls.lock().unwrap().clear();
	}

	fn record(&self, call: MockCall) {
		self.calls.lock().unwrap().push(call);
	}
}

#[async_trait]
impl GitClient for MockGitClient {
	async fn log(&self, path: &str) -> Result<Vec<ChangeRecord>, GitError> {
		self.record(MockCall::Log(path.to_string()));
		if let Some(ref error) = self.log_error {
			return Err(GitError::CommandFailed {
				cmd: "git",
				args: vec!["log".to_string(), "--".to_string(), path.to_string()],
				stderr: error.clone(),
			});
		}
		Ok(self.logs.get(path).cloned().unwrap_or_default())
	}

	async fn head_revision(&self) -> Result<Option<String>, GitError> {
		self.record(MockCall::HeadRevision);
		Ok(self.head.clone())
	}

	async fn is_shallow_repository(&self) -> Result<bool, GitError> {
		self.record(MockCall::IsShallowRepository);
		Ok(self.shallow)
	}

	async fn clone_repository(
		&self,
		url: &str,
		dest: &Path,
		options: CloneOptions,
	) -> Result<(), GitError> {
		self.record(MockCall::Clone {
			url: url.to_string(),
			dest: dest.to_path_buf(),
			options,
		});
		Ok(())
	}

	fn set_working_directory(&self, path: &Path) {
		self.record(MockCall::SetWorkingDirectory(path.to_path_buf()));
		*self.working_dir.lock().unwrap() = path.to_path_buf();
	}

	fn working_directory(&self) -> PathBuf {
		self.working_dir.lock().unwrap().clone()
	}
}
