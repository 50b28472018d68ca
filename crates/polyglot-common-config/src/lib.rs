// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for polyglot.
//!
//! This crate provides:
//! - The configuration types consumed by the status engine
//! - TOML configuration file parsing with documented defaults
//! - Validation that fails before any repository I/O happens

pub mod error;
pub mod patterns;
pub mod types;
pub mod validation;

use std::path::Path;

pub use error::ConfigError;
pub use patterns::expand_braces;
pub use types::{
	FileType, FilesEntry, Hosting, Locale, Pattern, PolyglotConfig, RepositoryConfig,
	TrackingConfig, DEFAULT_IGNORED_KEYWORDS, LANG_PLACEHOLDER, PATH_PLACEHOLDER,
};
pub use validation::{validate_config, validate_pattern};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "polyglot.toml";

/// Load and validate the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<PolyglotConfig, ConfigError> {
	let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
		path: path.to_path_buf(),
		source,
	})?;

	let config = parse_config(&contents, path)?;

	tracing::debug!(
			path = %path.display(),
			files = config.files.len(),
			locales = config.locales.len(),
			"loaded configuration"
	);

	Ok(config)
}

/// Parse and validate configuration from TOML text. `path` is only used for
/// error messages.
pub fn parse_config(contents: &str, path: &Path) -> Result<PolyglotConfig, ConfigError> {
	let config: PolyglotConfig = toml::from_str(contents).map_err(|source| ConfigError::TomlParse {
		path: path.to_path_buf(),
		source,
	})?;

	validate_config(&config)?;

	Ok(config)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::PathBuf;
	use tempfile::TempDir;

	const FULL_CONFIG: &str = r#"
cache_dir = "build/cache"

[repository]
name = "acme/docs"
root_dir = "site"
hosting = "gitlab"

[source_locale]
label = "English"
lang = "en"

[[locales]]
label = "Português"
lang = "pt"

[[locales]]
label = "Español"
lang = "es"

[[files]]
include = ["src/content/docs/**/*.{md,mdx}"]
exclude = ["src/content/docs/pt/**", "src/content/docs/es/**"]
pattern = { source = "src/content/docs/@path", locales = "src/content/docs/@lang/@path" }

[[files]]
include = ["src/i18n/en.yml"]
pattern = "src/i18n/@lang.yml"
type = "dictionary"
optional_keys = ["nav.beta"]

[tracking]
localizable_property = "i18nReady"
ignored_keywords = ["typo", "en-only"]
"#;

	#[test]
	fn test_parse_full_config() {
		let config = parse_config(FULL_CONFIG, &PathBuf::from("polyglot.toml")).unwrap();

		assert_eq!(config.repository.hosting, Hosting::GitLab);
		assert_eq!(config.repository.branch, "main");
		assert_eq!(config.repository.normalized_root_dir(), "site");
		assert_eq!(config.cache_dir, PathBuf::from("build/cache"));
		assert_eq!(config.clone_dir, PathBuf::from(".polyglot/history"));
		assert_eq!(config.locale_langs(), vec!["pt", "es"]);
		assert_eq!(config.files.len(), 2);
		assert_eq!(config.files[0].file_type, FileType::Universal);
		assert_eq!(config.files[1].file_type, FileType::Dictionary);
		assert_eq!(
			config.files[1].pattern,
			Pattern::new("src/i18n/@lang.yml", "src/i18n/@lang.yml")
		);
		assert_eq!(config.files[1].optional_keys, vec!["nav.beta"]);
		assert_eq!(
			config.tracking.localizable_property.as_deref(),
			Some("i18nReady")
		);
		assert_eq!(config.tracking.ignored_keywords, vec!["typo", "en-only"]);
	}

	#[test]
	fn test_bare_locale_ids() {
		let contents = r#"
source_locale = "en"
locales = ["pt"]
files = []

[repository]
name = "acme/docs"
"#;
		let config = parse_config(contents, &PathBuf::from("polyglot.toml")).unwrap();
		assert_eq!(config.source_locale, Locale::new("en", "en"));
		assert_eq!(config.locales, vec![Locale::new("pt", "pt")]);
		assert_eq!(
			config.tracking.ignored_keywords.len(),
			DEFAULT_IGNORED_KEYWORDS.len()
		);
	}

	#[test]
	fn test_invalid_toml_reports_path() {
		let err = parse_config("repository = ", &PathBuf::from("broken.toml")).unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
		assert!(err.to_string().contains("broken.toml"));
	}

	#[test]
	fn test_load_config_from_disk() {
		let tmp = TempDir::new().unwrap();
		let path = tmp.path().join(DEFAULT_CONFIG_FILE);
		std::fs::write(&path, FULL_CONFIG).unwrap();

		let config = load_config(&path).unwrap();
		assert_eq!(config.repository.name, "acme/docs");
	}

	#[test]
	fn test_load_missing_file_is_io_error() {
		let tmp = TempDir::new().unwrap();
		let err = load_config(&tmp.path().join("nope.toml")).unwrap_err();
		assert!(matches!(err, ConfigError::Io { .. }));
	}
}
