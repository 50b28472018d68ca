// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::BTreeSet;
use std::fmt;

use polyglot_common_config::FilesEntry;
use serde::{Deserialize, Serialize};

use crate::history::FileHistory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocalizationStatus {
	Missing,
	Outdated,
	UpToDate,
}

impl fmt::Display for LocalizationStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			LocalizationStatus::Missing => write!(f, "missing"),
			LocalizationStatus::Outdated => write!(f, "outdated"),
			LocalizationStatus::UpToDate => write!(f, "up-to-date"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
	pub lang: String,
	pub path: String,
	pub git: FileHistory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizationEntry {
	pub lang: String,
	pub path: String,
	pub status: LocalizationStatus,
	/// Absent when the localization is missing.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub git: Option<FileHistory>,
	/// Only computed for dictionary entries whose localization exists.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub missing_keys: Option<BTreeSet<String>>,
}

/// Status of one tracked source file across all target locales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
	pub entry: FilesEntry,
	pub source: SourceFile,
	/// One per configured target locale, in configuration order.
	pub localizations: Vec<LocalizationEntry>,
}

impl StatusEntry {
	pub fn localization(&self, lang: &str) -> Option<&LocalizationEntry> {
		self.localizations.iter().find(|l| l.lang == lang)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_serializes_kebab_case() {
		assert_eq!(
			serde_json::to_string(&LocalizationStatus::UpToDate).unwrap(),
			"\"up-to-date\""
		);
		assert_eq!(LocalizationStatus::Outdated.to_string(), "outdated");
	}

	#[test]
	fn test_missing_localization_omits_optional_fields() {
		let entry = LocalizationEntry {
			lang: "pt".to_string(),
			path: "docs/pt/a.md".to_string(),
			status: LocalizationStatus::Missing,
			git: None,
			missing_keys: None,
		};
		let json = serde_json::to_value(&entry).unwrap();
		assert_eq!(
			json,
			serde_json::json!({"lang": "pt", "path": "docs/pt/a.md", "status": "missing"})
		);
	}
}
