// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration types with resolved defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Placeholder replaced by a locale's language id in path templates.
pub const LANG_PLACEHOLDER: &str = "@lang";
/// Placeholder replaced by the locale-independent part of a path.
pub const PATH_PLACEHOLDER: &str = "@path";

/// Keywords that, when found in a commit message, keep the commit from
/// counting as a content change.
pub const DEFAULT_IGNORED_KEYWORDS: &[&str] = &[
	"polyglot-ignore",
	"typo",
	"en-only",
	"broken link",
	"i18nReady",
	"i18nIgnore",
];

/// The final, validated configuration for polyglot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolyglotConfig {
	pub repository: RepositoryConfig,
	pub source_locale: Locale,
	pub locales: Vec<Locale>,
	pub files: Vec<FilesEntry>,
	#[serde(default)]
	pub tracking: TrackingConfig,
	/// Directory holding the persisted history cache.
	#[serde(default = "default_cache_dir")]
	pub cache_dir: PathBuf,
	/// Directory used for history clones (shallow or external repositories).
	#[serde(default = "default_clone_dir")]
	pub clone_dir: PathBuf,
}

impl PolyglotConfig {
	/// Language ids of every configured target locale, in declaration order.
	pub fn locale_langs(&self) -> Vec<&str> {
		self.locales.iter().map(|l| l.lang.as_str()).collect()
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
	/// Repository slug on the hosting service, e.g. `owner/repo`.
	pub name: String,
	#[serde(default = "default_branch")]
	pub branch: String,
	/// Directory of the tracked content relative to the repository root.
	#[serde(default = "default_root_dir")]
	pub root_dir: String,
	#[serde(default)]
	pub hosting: Hosting,
	/// Content lives in a repository other than the working one.
	#[serde(default)]
	pub external: bool,
}

impl RepositoryConfig {
	pub fn clone_url(&self) -> String {
		self.hosting.clone_url(&self.name)
	}

	/// `root_dir` without `.` components or surrounding slashes; empty when
	/// the content sits at the repository root.
	pub fn normalized_root_dir(&self) -> String {
		self
			.root_dir
			.split('/')
			.filter(|part| !part.is_empty() && *part != ".")
			.collect::<Vec<_>>()
			.join("/")
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hosting {
	#[default]
	GitHub,
	GitLab,
}

impl Hosting {
	pub fn clone_url(&self, name: &str) -> String {
		match self {
			Hosting::GitHub => format!("https://github.com/{}.git", name),
			Hosting::GitLab => format!("https://gitlab.com/{}.git", name),
		}
	}
}

/// A language id plus its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LocaleSpec")]
pub struct Locale {
	pub label: String,
	pub lang: String,
}

impl Locale {
	pub fn new(label: impl Into<String>, lang: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			lang: lang.into(),
		}
	}
}

/// Locales may be written as a bare language id or as a table.
#[derive(Deserialize)]
#[serde(untagged)]
enum LocaleSpec {
	Lang(String),
	Full { label: Option<String>, lang: String },
}

impl From<LocaleSpec> for Locale {
	fn from(spec: LocaleSpec) -> Self {
		match spec {
			LocaleSpec::Lang(lang) => Locale::new(lang.clone(), lang),
			LocaleSpec::Full { label, lang } => Locale::new(label.unwrap_or_else(|| lang.clone()), lang),
		}
	}
}

/// A group of tracked files sharing one path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesEntry {
	pub include: Vec<String>,
	#[serde(default)]
	pub exclude: Vec<String>,
	pub pattern: Pattern,
	#[serde(default, rename = "type")]
	pub file_type: FileType,
	/// Dictionary keys exempt from completion checks.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub optional_keys: Vec<String>,
}

/// Source and locale path templates, each built from `@path` and `@lang`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PatternSpec")]
pub struct Pattern {
	pub source: String,
	pub locales: String,
}

impl Pattern {
	pub fn new(source: impl Into<String>, locales: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			locales: locales.into(),
		}
	}
}

/// A single template string is shared by the source and locale forms.
#[derive(Deserialize)]
#[serde(untagged)]
enum PatternSpec {
	Single(String),
	Split { source: String, locales: String },
}

impl From<PatternSpec> for Pattern {
	fn from(spec: PatternSpec) -> Self {
		match spec {
			PatternSpec::Single(template) => Pattern::new(template.clone(), template),
			PatternSpec::Split { source, locales } => Pattern::new(source, locales),
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
	#[default]
	Universal,
	Dictionary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingConfig {
	/// Front-matter property marking a file as ready for localization. When
	/// unset, every file is localizable.
	#[serde(default)]
	pub localizable_property: Option<String>,
	/// Outcome when the property is configured but absent from a file.
	#[serde(default)]
	pub localizable_by_default: bool,
	#[serde(default = "default_ignored_keywords")]
	pub ignored_keywords: Vec<String>,
}

impl Default for TrackingConfig {
	fn default() -> Self {
		Self {
			localizable_property: None,
			localizable_by_default: false,
			ignored_keywords: default_ignored_keywords(),
		}
	}
}

fn default_cache_dir() -> PathBuf {
	PathBuf::from(".polyglot/cache")
}

fn default_clone_dir() -> PathBuf {
	PathBuf::from(".polyglot/history")
}

fn default_branch() -> String {
	"main".to_string()
}

fn default_root_dir() -> String {
	".".to_string()
}

fn default_ignored_keywords() -> Vec<String> {
	DEFAULT_IGNORED_KEYWORDS.iter().map(|s| s.to_string()).collect()
}
