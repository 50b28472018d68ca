// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration validation rules.

use std::collections::HashSet;

use tracing::warn;

use crate::patterns::expand_braces;
use crate::types::{FileType, FilesEntry, Pattern, PolyglotConfig, LANG_PLACEHOLDER, PATH_PLACEHOLDER};
use crate::ConfigError;

/// Validate the configuration.
///
/// Returns Ok(()) if valid, or the first problem found. Nothing here touches
/// the filesystem or the repository.
pub fn validate_config(config: &PolyglotConfig) -> Result<(), ConfigError> {
	validate_repository(config)?;
	validate_locales(config)?;
	validate_files(config)?;

	Ok(())
}

fn validate_repository(config: &PolyglotConfig) -> Result<(), ConfigError> {
	if config.repository.name.trim().is_empty() {
		return Err(ConfigError::invalid_value(
			"repository.name",
			"repository name cannot be empty",
		));
	}
	Ok(())
}

fn validate_locales(config: &PolyglotConfig) -> Result<(), ConfigError> {
	if config.locales.is_empty() {
		return Err(ConfigError::invalid_value(
			"locales",
			"at least one target locale is required",
		));
	}

	let source = &config.source_locale.lang;
	validate_lang("source_locale.lang", source)?;

	let mut seen = HashSet::new();
	for (i, locale) in config.locales.iter().enumerate() {
		let field = format!("locales[{i}].lang");
		validate_lang(&field, &locale.lang)?;

		if &locale.lang == source {
			return Err(ConfigError::invalid_value(
				field,
				format!("`{}` is already the source locale", locale.lang),
			));
		}
		if !seen.insert(locale.lang.as_str()) {
			return Err(ConfigError::invalid_value(
				field,
				format!("duplicate locale `{}`", locale.lang),
			));
		}
	}

	Ok(())
}

fn validate_lang(field: &str, lang: &str) -> Result<(), ConfigError> {
	if lang.is_empty() || lang.contains('/') || lang.contains(char::is_whitespace) {
		return Err(ConfigError::invalid_value(
			field,
			format!("`{lang}` is not a valid language id"),
		));
	}
	Ok(())
}

fn validate_files(config: &PolyglotConfig) -> Result<(), ConfigError> {
	if config.files.is_empty() {
		warn!("no `files` entries configured, nothing will be tracked");
	}

	for (i, entry) in config.files.iter().enumerate() {
		validate_entry(i, entry)?;
	}

	Ok(())
}

fn validate_entry(index: usize, entry: &FilesEntry) -> Result<(), ConfigError> {
	if entry.include.is_empty() {
		return Err(ConfigError::invalid_value(
			format!("files[{index}].include"),
			"include cannot be empty",
		));
	}

	for (field, globs) in [("include", &entry.include), ("exclude", &entry.exclude)] {
		for glob in globs {
			validate_glob(&format!("files[{index}].{field}"), glob)?;
		}
	}

	validate_pattern(&format!("files[{index}].pattern"), &entry.pattern)?;

	if entry.file_type != FileType::Dictionary && !entry.optional_keys.is_empty() {
		warn!(
				entry = index,
				"optional_keys only apply to dictionary entries and will be ignored"
		);
	}

	Ok(())
}

fn validate_glob(field: &str, glob: &str) -> Result<(), ConfigError> {
	for expanded in expand_braces(glob) {
		glob::Pattern::new(&expanded)
			.map_err(|e| ConfigError::invalid_value(field, format!("invalid glob `{glob}`: {e}")))?;
	}
	Ok(())
}

/// Checks that both templates can be captured unambiguously.
pub fn validate_pattern(field: &str, pattern: &Pattern) -> Result<(), ConfigError> {
	for (name, template) in [("source", &pattern.source), ("locales", &pattern.locales)] {
		let field = format!("{field}.{name}");

		if template.is_empty() {
			return Err(ConfigError::invalid_value(field, "template cannot be empty"));
		}
		for placeholder in [LANG_PLACEHOLDER, PATH_PLACEHOLDER] {
			if template.matches(placeholder).count() > 1 {
				return Err(ConfigError::invalid_value(
					field,
					format!("`{placeholder}` may appear only once in `{template}`"),
				));
			}
		}
		if template.contains("@lang@path") || template.contains("@path@lang") {
			return Err(ConfigError::invalid_value(
				field,
				format!("`@lang` and `@path` must be separated in `{template}`"),
			));
		}
	}

	if !pattern.locales.contains(LANG_PLACEHOLDER) {
		return Err(ConfigError::invalid_value(
			format!("{field}.locales"),
			format!("`{}` must contain `{LANG_PLACEHOLDER}`", pattern.locales),
		));
	}

	if pattern.source.contains(PATH_PLACEHOLDER) != pattern.locales.contains(PATH_PLACEHOLDER) {
		return Err(ConfigError::invalid_value(
			field,
			format!("`{PATH_PLACEHOLDER}` must appear in both templates or in neither"),
		));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::{Locale, RepositoryConfig, TrackingConfig};

	fn test_config() -> PolyglotConfig {
		PolyglotConfig {
			repository: RepositoryConfig {
				name: "acme/docs".to_string(),
				branch: "main".to_string(),
				root_dir: ".".to_string(),
				hosting: Default::default(),
				external: false,
			},
			source_locale: Locale::new("English", "en"),
			locales: vec![Locale::new("Português", "pt")],
			files: vec![FilesEntry {
				include: vec!["docs/**/*.md".to_string()],
				exclude: vec!["docs/pt/**".to_string()],
				pattern: Pattern::new("docs/@path", "docs/@lang/@path"),
				file_type: FileType::Universal,
				optional_keys: vec![],
			}],
			tracking: TrackingConfig::default(),
			cache_dir: ".polyglot/cache".into(),
			clone_dir: ".polyglot/history".into(),
		}
	}

	#[test]
	fn test_valid_config_passes() {
		assert!(validate_config(&test_config()).is_ok());
	}

	#[test]
	fn test_empty_locales_rejected() {
		let mut config = test_config();
		config.locales.clear();
		assert!(matches!(
			validate_config(&config),
			Err(ConfigError::InvalidValue { field, .. }) if field == "locales"
		));
	}

	#[test]
	fn test_duplicate_locale_rejected() {
		let mut config = test_config();
		config.locales.push(Locale::new("Portuguese", "pt"));
		assert!(validate_config(&config).is_err());
	}

	#[test]
	fn test_source_locale_as_target_rejected() {
		let mut config = test_config();
		config.locales.push(Locale::new("English", "en"));
		assert!(validate_config(&config).is_err());
	}

	#[test]
	fn test_empty_include_rejected() {
		let mut config = test_config();
		config.files[0].include.clear();
		assert!(validate_config(&config).is_err());
	}

	#[test]
	fn test_malformed_glob_rejected() {
		let mut config = test_config();
		config.files[0].include = vec!["docs/[.md".to_string()];
		assert!(validate_config(&config).is_err());
	}

	/// Test: adjacent placeholders are rejected.
	///
	/// Why this test is important: `@lang@path` has no separator, so a path
	/// like `ptguide.md` could split in several ways. Capture must be unique
	/// or path conversion is not a function.
	#[test]
	fn test_adjacent_placeholders_rejected() {
		let pattern = Pattern::new("docs/@path", "docs/@lang@path");
		assert!(validate_pattern("pattern", &pattern).is_err());
	}

	#[test]
	fn test_repeated_placeholder_rejected() {
		let pattern = Pattern::new("docs/@path", "docs/@lang/@lang/@path");
		assert!(validate_pattern("pattern", &pattern).is_err());
	}

	#[test]
	fn test_locales_template_requires_lang() {
		let pattern = Pattern::new("docs/@path", "translated/@path");
		assert!(validate_pattern("pattern", &pattern).is_err());
	}

	#[test]
	fn test_path_placeholder_must_be_symmetric() {
		let pattern = Pattern::new("i18n/en.yml", "i18n/@lang/@path");
		assert!(validate_pattern("pattern", &pattern).is_err());
	}

	/// Test: single-file dictionary templates without `@path` are accepted.
	///
	/// Why this test is important: dictionaries such as `i18n/@lang.yml` have
	/// one file per locale and no path component to capture.
	#[test]
	fn test_dictionary_template_without_path_accepted() {
		let pattern = Pattern::new("i18n/@lang.yml", "i18n/@lang.yml");
		assert!(validate_pattern("pattern", &pattern).is_ok());
	}
}
