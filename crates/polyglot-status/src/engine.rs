// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Status orchestration.
//!
//! Source files are processed by an outer pool of file pipelines, each of
//! which checks its locales through a smaller inner pool. Results are sorted
//! per `files` entry, so completion order never leaks into the report.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use polyglot_cli_git::{CloneOptions, GitClient};
use polyglot_common_config::{validate_config, FileType, FilesEntry, Locale, PolyglotConfig};
use tracing::{debug, error, info, instrument, warn};

use crate::cache::{fingerprint, HistoryCache};
use crate::completion::{is_localizable, missing_keys};
use crate::error::{Result, StatusError};
use crate::history::{FileHistory, HistoryProvider};
use crate::matcher::{find_entry, CompiledEntry};
use crate::types::{LocalizationEntry, LocalizationStatus, SourceFile, StatusEntry};

/// Source file pipelines in flight at once.
pub const FILE_CONCURRENCY: usize = 10;
/// Locale checks in flight per source file.
pub const LOCALE_CONCURRENCY: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct StatusOptions {
	/// Skip reading and writing the history cache.
	pub force: bool,
	/// Directory that configured paths are relative to.
	pub cwd: PathBuf,
}

/// The localization status engine for one configuration.
pub struct Polyglot {
	config: PolyglotConfig,
	entries: Vec<CompiledEntry>,
	history: HistoryProvider,
	cache: HistoryCache,
	revision: Option<String>,
	/// Where tracked files are read from disk.
	content_dir: PathBuf,
	force: bool,
}

impl Polyglot {
	/// Validates `config`, prepares the repository history and loads the
	/// cache.
	///
	/// External repositories and shallow clones are replaced by a blobless
	/// clone under `clone_dir`, and `git` is pointed at it.
	#[instrument(skip_all, fields(repository = %config.repository.name, force = options.force))]
	pub async fn new(
		config: PolyglotConfig,
		git: Arc<dyn GitClient>,
		options: StatusOptions,
	) -> Result<Self> {
		validate_config(&config)?;

		let locale_langs = config.locale_langs();
		let entries = config
			.files
			.iter()
			.map(|entry| CompiledEntry::new(entry, &config.source_locale.lang, &locale_langs))
			.collect::<Result<Vec<_>>>()?;

		let (content_dir, path_prefix) = prepare_repository(&config, git.as_ref(), &options.cwd).await?;
		let revision = git.head_revision().await?;

		let cache = HistoryCache::new(options.cwd.join(&config.cache_dir), fingerprint(&config.tracking));
		let seed = if options.force {
			Default::default()
		} else {
			cache.read(revision.as_deref()).await
		};
		debug!(cached = seed.len(), revision = ?revision, "history cache loaded");

		let history = HistoryProvider::new(git, config.tracking.ignored_keywords.clone(), seed)
			.with_path_prefix(path_prefix);

		Ok(Self {
			config,
			entries,
			history,
			cache,
			revision,
			content_dir,
			force: options.force,
		})
	}

	/// The validated configuration the engine was built from.
	pub fn config(&self) -> &PolyglotConfig {
		&self.config
	}

	/// The `files` entry owning `path`, if any.
	pub fn find_files_entry(&self, path: &str) -> Option<&FilesEntry> {
		find_entry(path, &self.entries).map(|(compiled, _)| &compiled.entry)
	}

	/// Status of every tracked source file, grouped by `files` entry in
	/// configuration order and sorted by source path within each group.
	#[instrument(skip(self))]
	pub async fn get_full_status(&self) -> Result<Vec<StatusEntry>> {
		let mut report = Vec::new();

		for compiled in &self.entries {
			let sources = self.source_paths(compiled).await?;
			debug!(include = ?compiled.entry.include, files = sources.len(), "processing files entry");

			let aborted = AtomicBool::new(false);
			let results: Vec<Result<Option<StatusEntry>>> = stream::iter(sources)
				.map(|source| {
					let aborted = &aborted;
					async move {
						if aborted.load(Ordering::SeqCst) {
							return Ok(None);
						}
						let result = self.file_status(compiled, source).await;
						if result.is_err() {
							aborted.store(true, Ordering::SeqCst);
						}
						result
					}
				})
				.buffer_unordered(FILE_CONCURRENCY)
				.collect()
				.await;

			let mut group = Vec::with_capacity(results.len());
			for result in results {
				if let Some(status) = result? {
					group.push(status);
				}
			}
			group.sort_by(|a, b| a.source.path.cmp(&b.source.path));
			report.extend(group);
		}

		self.persist().await?;
		info!(files = report.len(), "computed localization status");
		Ok(report)
	}

	/// Status of a single file, given as a source or locale path.
	///
	/// Returns `None` when no entry owns the path or the file is skipped.
	/// Fetched histories are persisted on each call unless forced.
	#[instrument(skip(self))]
	pub async fn get_file_status(&self, path: &str) -> Result<Option<StatusEntry>> {
		let Some((compiled, source)) = find_entry(path, &self.entries) else {
			error!(path, "{}", StatusError::FilesEntryNotFound(path.to_string()));
			return Ok(None);
		};

		let status = self.file_status(compiled, source).await?;
		self.persist().await?;
		Ok(status)
	}

	/// Enumerates `compiled`'s files and reduces them to canonical source
	/// paths, warning about any that fail resolution or that an earlier
	/// entry owns.
	async fn source_paths(&self, compiled: &CompiledEntry) -> Result<BTreeSet<String>> {
		let walker = compiled.clone();
		let root = self.content_dir.clone();
		let paths = tokio::task::spawn_blocking(move || walker.enumerate(&root))
			.await
			.map_err(|e| StatusError::Task(e.to_string()))?;

		let mut sources = BTreeSet::new();
		let mut mismatched = Vec::new();
		let mut claimed_earlier = Vec::new();
		for path in paths {
			if !compiled.resolver.is_source_path(&path) {
				mismatched.push(path);
				continue;
			}
			// A path belongs to the first entry owning it, in configuration order.
			match find_entry(&path, &self.entries) {
				Some((owner, source)) if std::ptr::eq(owner, compiled) => {
					sources.insert(source);
				}
				Some(_) => claimed_earlier.push(path),
				None => mismatched.push(path),
			}
		}

		if !mismatched.is_empty() {
			warn!(
					pattern = %compiled.entry.pattern.source,
					paths = ?mismatched,
					"files matched by include do not resolve to source paths and were skipped"
			);
		}
		if !claimed_earlier.is_empty() {
			warn!(
					pattern = %compiled.entry.pattern.source,
					paths = ?claimed_earlier,
					"files already owned by an earlier files entry were skipped"
			);
		}

		Ok(sources)
	}

	/// One source file pipeline. Per-file problems are logged and yield
	/// `Ok(None)`; errors are fatal to the run.
	async fn file_status(&self, compiled: &CompiledEntry, source_path: String) -> Result<Option<StatusEntry>> {
		let full_source = self.content_dir.join(&source_path);
		if !path_exists(&full_source).await {
			error!(
				"{}",
				StatusError::PathNotFound {
					path: source_path.clone(),
					source_path: full_source.display().to_string(),
				}
			);
			return Ok(None);
		}

		match self.localizable(&full_source).await {
			Ok(true) => {}
			Ok(false) => {
				debug!(path = %source_path, "not localizable, skipping");
				return Ok(None);
			}
			Err(e) => {
				error!(path = %source_path, error = %e, "failed to read localizable marker, skipping");
				return Ok(None);
			}
		}

		let source_history = self.history.get_history(&source_path).await?;
		let source_history = &source_history;

		let results: Vec<Result<LocalizationEntry>> = stream::iter(&self.config.locales)
			.map(|locale| self.localization_status(compiled, &source_path, source_history, locale))
			.buffered(LOCALE_CONCURRENCY)
			.collect()
			.await;
		let localizations = results.into_iter().collect::<Result<Vec<_>>>()?;

		Ok(Some(StatusEntry {
			entry: compiled.entry.clone(),
			source: SourceFile {
				lang: self.config.source_locale.lang.clone(),
				path: source_path,
				git: source_history.clone(),
			},
			localizations,
		}))
	}

	async fn localizable(&self, full_path: &Path) -> Result<bool> {
		let tracking = &self.config.tracking;
		let Some(property) = tracking.localizable_property.as_deref() else {
			return Ok(true);
		};
		let contents = tokio::fs::read_to_string(full_path)
			.await
			.map_err(|e| StatusError::io(full_path, e))?;
		is_localizable(full_path, &contents, Some(property), tracking.localizable_by_default)
	}

	async fn localization_status(
		&self,
		compiled: &CompiledEntry,
		source_path: &str,
		source_history: &FileHistory,
		locale: &Locale,
	) -> Result<LocalizationEntry> {
		let path = compiled.resolver.localize(source_path, &locale.lang)?;
		let full_path = self.content_dir.join(&path);

		if !path_exists(&full_path).await {
			return Ok(LocalizationEntry {
				lang: locale.lang.clone(),
				path,
				status: LocalizationStatus::Missing,
				git: None,
				missing_keys: None,
			});
		}

		let history = self.history.get_history(&path).await?;
		let status = if source_history.latest_tracked_change.date > history.latest_tracked_change.date {
			LocalizationStatus::Outdated
		} else {
			LocalizationStatus::UpToDate
		};

		let missing = if compiled.entry.file_type == FileType::Dictionary {
			let full_source = self.content_dir.join(source_path);
			let source = read(&full_source).await?;
			let localized = read(&full_path).await?;
			Some(missing_keys(
				&full_source,
				&source,
				&full_path,
				&localized,
				&compiled.entry.optional_keys,
			)?)
		} else {
			None
		};

		Ok(LocalizationEntry {
			lang: locale.lang.clone(),
			path,
			status,
			git: Some(history),
			missing_keys: missing,
		})
	}

	async fn persist(&self) -> Result<()> {
		if self.force {
			return Ok(());
		}
		let entries = self.history.snapshot().await;
		self.cache.write(self.revision.as_deref(), &entries).await
	}
}

/// Clones history where the working tree cannot provide it. Returns the
/// content directory and the prefix git paths need.
async fn prepare_repository(
	config: &PolyglotConfig,
	git: &dyn GitClient,
	cwd: &Path,
) -> Result<(PathBuf, String)> {
	let repository = &config.repository;
	let root_dir = repository.normalized_root_dir();
	let clone_dir = cwd.join(&config.clone_dir);

	if repository.external {
		info!(url = %repository.clone_url(), dest = %clone_dir.display(), "cloning external repository");
		reset_dir(&clone_dir).await?;
		git.clone_repository(
			&repository.clone_url(),
			&clone_dir,
			CloneOptions {
				bare: false,
				blobless: true,
			},
		)
		.await?;
		git.set_working_directory(&clone_dir);
		return Ok((clone_dir.join(&root_dir), root_dir));
	}

	if git.is_shallow_repository().await? {
		info!(url = %repository.clone_url(), dest = %clone_dir.display(), "shallow repository, cloning full history");
		reset_dir(&clone_dir).await?;
		git.clone_repository(
			&repository.clone_url(),
			&clone_dir,
			CloneOptions {
				bare: true,
				blobless: true,
			},
		)
		.await?;
		git.set_working_directory(&clone_dir);
		return Ok((cwd.to_path_buf(), root_dir));
	}

	Ok((cwd.to_path_buf(), String::new()))
}

async fn reset_dir(dir: &Path) -> Result<()> {
	match tokio::fs::remove_dir_all(dir).await {
		Ok(()) => Ok(()),
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
		Err(e) => Err(StatusError::io(dir, e)),
	}
}

async fn path_exists(path: &Path) -> bool {
	tokio::fs::metadata(path).await.is_ok()
}

async fn read(path: &Path) -> Result<String> {
	tokio::fs::read_to_string(path)
		.await
		.map_err(|e| StatusError::io(path, e))
}
