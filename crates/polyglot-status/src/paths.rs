// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Conversion between source paths and their per-locale counterparts.
//!
//! A [`Pattern`] holds two templates built from literal text and the
//! `@lang`/`@path` placeholders. Each template is compiled once into an
//! anchored regular expression with named captures; conversion extracts the
//! `@path` capture from one form and re-emits it through the other.

use polyglot_common_config::{Pattern, LANG_PLACEHOLDER, PATH_PLACEHOLDER};
use regex::Regex;

use crate::error::{Result, StatusError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
	Literal(String),
	Lang,
	Path,
}

#[derive(Debug, Clone)]
struct Template {
	raw: String,
	segments: Vec<Segment>,
}

impl Template {
	fn parse(raw: &str) -> Self {
		let mut segments = Vec::new();
		let mut rest = raw;

		loop {
			let next = [LANG_PLACEHOLDER, PATH_PLACEHOLDER]
				.into_iter()
				.filter_map(|p| rest.find(p).map(|i| (i, p)))
				.min_by_key(|(i, _)| *i);

			let Some((index, placeholder)) = next else {
				if !rest.is_empty() {
					segments.push(Segment::Literal(rest.to_string()));
				}
				break;
			};

			if index > 0 {
				segments.push(Segment::Literal(rest[..index].to_string()));
			}
			segments.push(if placeholder == LANG_PLACEHOLDER {
				Segment::Lang
			} else {
				Segment::Path
			});
			rest = &rest[index + placeholder.len()..];
		}

		Self {
			raw: raw.to_string(),
			segments,
		}
	}

	/// Anchored regex accepting any of `langs` in place of `@lang`.
	fn compile(&self, langs: &[&str]) -> Result<Regex> {
		let mut langs: Vec<&str> = langs.to_vec();
		langs.sort_by_key(|l| std::cmp::Reverse(l.len()));
		let lang_group = langs
			.iter()
			.map(|l| regex::escape(l))
			.collect::<Vec<_>>()
			.join("|");

		let mut expr = String::from("^");
		for segment in &self.segments {
			match segment {
				Segment::Literal(text) => expr.push_str(&regex::escape(text)),
				Segment::Lang => expr.push_str(&format!("(?P<lang>{lang_group})")),
				Segment::Path => expr.push_str("(?P<path>.+)"),
			}
		}
		expr.push('$');

		Regex::new(&expr).map_err(|e| StatusError::InvalidPattern(format!("{}: {e}", self.raw)))
	}

	fn build(&self, lang: &str, path: Option<&str>) -> String {
		let mut out = String::new();
		for segment in &self.segments {
			match segment {
				Segment::Literal(text) => out.push_str(text),
				Segment::Lang => out.push_str(lang),
				Segment::Path => out.push_str(path.unwrap_or_default()),
			}
		}
		out
	}
}

/// Compiled source/locale templates for one `files` entry.
#[derive(Debug, Clone)]
pub struct PathResolver {
	source: Template,
	locales: Template,
	source_lang: String,
	source_regex: Regex,
	locales_regex: Regex,
}

impl PathResolver {
	pub fn new(pattern: &Pattern, source_lang: &str, locale_langs: &[&str]) -> Result<Self> {
		if locale_langs.is_empty() {
			return Err(StatusError::InvalidPattern(
				"at least one target locale is required".to_string(),
			));
		}

		let source = Template::parse(&pattern.source);
		let locales = Template::parse(&pattern.locales);

		let source_regex = source.compile(&[source_lang])?;
		let locales_regex = locales.compile(locale_langs)?;

		Ok(Self {
			source,
			locales,
			source_lang: source_lang.to_string(),
			source_regex,
			locales_regex,
		})
	}

	/// Whether `path` fits the source template.
	pub fn is_source_path(&self, path: &str) -> bool {
		self.source_regex.is_match(path)
	}

	/// Whether `path` fits the locales template for a configured target locale.
	pub fn is_locales_path(&self, path: &str) -> bool {
		self.locales_regex.is_match(path)
	}

	/// Re-expresses `path`, given in either form, as the path for `lang`.
	///
	/// The locale form is tried first, so a path that fits both templates is
	/// read as a locale path. Asking for the source language yields the
	/// source form.
	pub fn to_path(&self, path: &str, lang: &str) -> Result<String> {
		let captures = self
			.locales_regex
			.captures(path)
			.or_else(|| self.source_regex.captures(path))
			.ok_or_else(|| StatusError::PatternMismatch {
				path: path.to_string(),
				template: format!("{} | {}", self.source.raw, self.locales.raw),
			})?;

		Ok(self.emit(captures.name("path").map(|m| m.as_str()), lang))
	}

	/// The path for `lang` of a file known to be in source form.
	pub fn localize(&self, source_path: &str, lang: &str) -> Result<String> {
		let captures = self
			.source_regex
			.captures(source_path)
			.ok_or_else(|| StatusError::PatternMismatch {
				path: source_path.to_string(),
				template: self.source.raw.clone(),
			})?;

		Ok(self.emit(captures.name("path").map(|m| m.as_str()), lang))
	}

	/// The source form of `path`, reading it as a locale path when it fits
	/// the locales template.
	pub fn to_source_path(&self, path: &str) -> Result<String> {
		self.to_path(path, &self.source_lang)
	}

	fn emit(&self, captured: Option<&str>, lang: &str) -> String {
		if lang == self.source_lang {
			self.source.build(lang, captured)
		} else {
			self.locales.build(lang, captured)
		}
	}

	pub fn source_lang(&self) -> &str {
		&self.source_lang
	}
}
