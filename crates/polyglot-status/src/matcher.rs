// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Ownership of paths by `files` entries.

use std::collections::BTreeSet;
use std::path::Path;

use glob::MatchOptions;
use polyglot_common_config::{expand_braces, FilesEntry};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, StatusError};
use crate::paths::PathResolver;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
	case_sensitive: true,
	require_literal_separator: true,
	require_literal_leading_dot: false,
};

/// A set of globs matched as one: a path matches when any glob does.
#[derive(Debug, Clone, Default)]
pub struct GlobSet {
	globs: Vec<glob::Pattern>,
}

impl GlobSet {
	pub fn new(globs: &[String]) -> Result<Self> {
		let mut compiled = Vec::new();
		for glob in globs {
			for expanded in expand_braces(glob) {
				let pattern = glob::Pattern::new(&expanded)
					.map_err(|e| StatusError::InvalidPattern(format!("{glob}: {e}")))?;
				compiled.push(pattern);
			}
		}
		Ok(Self { globs: compiled })
	}

	pub fn is_match(&self, path: &str) -> bool {
		self
			.globs
			.iter()
			.any(|g| g.matches_with(path, MATCH_OPTIONS))
	}

	/// Directories below which matches can occur, one per glob. A fully
	/// literal glob yields its parent directory.
	fn base_dirs(&self) -> BTreeSet<String> {
		self
			.globs
			.iter()
			.map(|glob| {
				let components: Vec<&str> = glob.as_str().split('/').collect();
				let literal: Vec<&str> = components
					.iter()
					.take_while(|c| !c.contains(['*', '?', '[']))
					.copied()
					.collect();
				let literal = if literal.len() == components.len() {
					&literal[..literal.len().saturating_sub(1)]
				} else {
					&literal[..]
				};
				literal.join("/")
			})
			.collect()
	}
}

/// A `files` entry with its resolver and globs compiled.
#[derive(Debug, Clone)]
pub struct CompiledEntry {
	pub entry: FilesEntry,
	pub resolver: PathResolver,
	include: GlobSet,
	exclude: GlobSet,
}

impl CompiledEntry {
	pub fn new(entry: &FilesEntry, source_lang: &str, locale_langs: &[&str]) -> Result<Self> {
		Ok(Self {
			entry: entry.clone(),
			resolver: PathResolver::new(&entry.pattern, source_lang, locale_langs)?,
			include: GlobSet::new(&entry.include)?,
			exclude: GlobSet::new(&entry.exclude)?,
		})
	}

	/// Whether a source-form path passes `include` and escapes `exclude`.
	pub fn accepts(&self, source_path: &str) -> bool {
		self.include.is_match(source_path) && !self.exclude.is_match(source_path)
	}

	/// The source form of `path` if this entry owns it.
	///
	/// A path fitting the locales template is converted first; `include` and
	/// `exclude` are only ever checked against the source form.
	pub fn claim(&self, path: &str) -> Option<String> {
		let mut candidates = Vec::with_capacity(2);
		if self.resolver.is_locales_path(path) {
			if let Ok(source) = self.resolver.to_source_path(path) {
				candidates.push(source);
			}
		}
		if self.resolver.is_source_path(path) {
			candidates.push(path.to_string());
		}
		candidates.into_iter().find(|candidate| self.accepts(candidate))
	}

	/// Every file under `cwd` matching `include` and not `exclude`, as sorted
	/// `/`-separated paths relative to `cwd`.
	pub fn enumerate(&self, cwd: &Path) -> Vec<String> {
		let mut found = BTreeSet::new();

		for base in self.include.base_dirs() {
			let root = if base.is_empty() {
				cwd.to_path_buf()
			} else {
				cwd.join(&base)
			};
			if !root.is_dir() {
				continue;
			}

			let walker = WalkDir::new(&root)
				.follow_links(true)
				.into_iter()
				.filter_entry(|e| e.file_name() != ".git");

			for entry in walker {
				let entry = match entry {
					Ok(entry) => entry,
					Err(e) => {
						debug!(error = %e, "skipping unreadable path");
						continue;
					}
				};
				if !entry.file_type().is_file() {
					continue;
				}
				let Ok(relative) = entry.path().strip_prefix(cwd) else {
					continue;
				};
				let path = relative
					.components()
					.map(|c| c.as_os_str().to_string_lossy())
					.collect::<Vec<_>>()
					.join("/");

				if self.accepts(&path) {
					found.insert(path);
				}
			}
		}

		found.into_iter().collect()
	}
}

/// Finds the first entry, in configuration order, owning `path`, together
/// with the path's source form.
pub fn find_entry<'a>(path: &str, entries: &'a [CompiledEntry]) -> Option<(&'a CompiledEntry, String)> {
	entries
		.iter()
		.find_map(|entry| entry.claim(path).map(|source| (entry, source)))
}
