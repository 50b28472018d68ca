// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use polyglot_cli_git::GitError;
use polyglot_common_config::ConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatusError>;

#[derive(Error, Debug)]
pub enum StatusError {
	#[error("configuration error: {0}")]
	Configuration(#[from] ConfigError),

	#[error("source file `{source_path}` (resolved from `{path}`) does not exist")]
	PathNotFound { path: String, source_path: String },

	#[error("no commits found for `{0}`; have you made any commits in your branch yet?")]
	HistoryUnavailable(String),

	#[error("failed to parse {path}: {message}")]
	MetadataParse { path: PathBuf, message: String },

	#[error("git operation failed: {0}")]
	VersionControl(#[from] GitError),

	#[error("`{path}` does not match the pattern `{template}`")]
	PatternMismatch { path: String, template: String },

	#[error("invalid pattern: {0}")]
	InvalidPattern(String),

	#[error("no `files` entry matches `{0}`")]
	FilesEntryNotFound(String),

	#[error("I/O error at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("cache serialization error: {0}")]
	CacheSerialization(#[from] serde_json::Error),

	#[error("background task failed: {0}")]
	Task(String),
}

impl StatusError {
	pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io {
			path: path.into(),
			source,
		}
	}

	pub(crate) fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
		Self::MetadataParse {
			path: path.into(),
			message: message.to_string(),
		}
	}
}
