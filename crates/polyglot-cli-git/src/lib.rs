// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

mod client;
mod command_client;
mod error;
mod mock_client;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub use client::{CloneOptions, GitClient};
pub use command_client::CommandGitClient;
pub use error::GitError;
pub use mock_client::{MockCall, MockGitClient};

/// One commit touching a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
	/// Full 40-character SHA
	pub hash: String,
	/// Author date, with the author's UTC offset preserved
	pub date: DateTime<FixedOffset>,
	pub author_name: String,
	pub author_email: String,
	/// Subject line
	pub message: String,
	/// Everything after the subject line, possibly empty
	pub body: String,
}

impl ChangeRecord {
	/// Whether the subject line contains any of `keywords`, ignoring case.
	/// The body is not consulted.
	pub fn mentions_any(&self, keywords: &[String]) -> bool {
		let message = self.message.to_lowercase();
		keywords
			.iter()
			.filter(|k| !k.is_empty())
			.any(|k| message.contains(&k.to_lowercase()))
	}
}
