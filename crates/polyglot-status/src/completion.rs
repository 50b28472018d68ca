// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Content checks: the localizable gate and dictionary completeness.

use std::collections::BTreeSet;
use std::path::Path;

use serde_json::Value;

use crate::error::{Result, StatusError};

/// Extensions whose files may carry a `---` front-matter block.
const FRONT_MATTER_EXTENSIONS: &[&str] = &["md", "mdx", "markdown", "mdoc"];

fn extension(path: &Path) -> Option<String> {
	path
		.extension()
		.and_then(|e| e.to_str())
		.map(|e| e.to_ascii_lowercase())
}

/// Whether the file at `path` with `contents` should be tracked.
///
/// With no `property` every file is localizable. Otherwise only front-matter
/// formats are gated: a value of `true` admits the file, any other value
/// excludes it, and an absent property or missing front matter yields
/// `default_when_absent`.
pub fn is_localizable(
	path: &Path,
	contents: &str,
	property: Option<&str>,
	default_when_absent: bool,
) -> Result<bool> {
	let Some(property) = property else {
		return Ok(true);
	};
	let gated = extension(path)
		.map(|ext| FRONT_MATTER_EXTENSIONS.contains(&ext.as_str()))
		.unwrap_or(false);
	if !gated {
		return Ok(true);
	}

	let Some(front_matter) = front_matter(contents) else {
		return Ok(default_when_absent);
	};

	let value: serde_yaml::Value =
		serde_yaml::from_str(front_matter).map_err(|e| StatusError::parse(path, e))?;
	let mapping = match value {
		serde_yaml::Value::Mapping(mapping) => mapping,
		serde_yaml::Value::Null => return Ok(default_when_absent),
		_ => return Err(StatusError::parse(path, "front matter is not a mapping")),
	};

	Ok(match mapping.get(property) {
		None => default_when_absent,
		Some(value) => matches!(value, serde_yaml::Value::Bool(true)),
	})
}

/// The text between an opening `---` line and the next `---` line.
fn front_matter(contents: &str) -> Option<&str> {
	let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);
	let mut lines = contents.split_inclusive('\n');
	let first = lines.next()?;
	if first.trim_end() != "---" {
		return None;
	}

	let start = first.len();
	let mut offset = start;
	for line in lines {
		if line.trim_end() == "---" {
			return Some(&contents[start..offset]);
		}
		offset += line.len();
	}
	None
}

/// Keys present in `source` but absent from `locale`, minus `optional_keys`.
///
/// Both files are parsed according to their extension and flattened to
/// dotted key paths. An optional key exempts itself and every key below it.
pub fn missing_keys(
	source_path: &Path,
	source: &str,
	locale_path: &Path,
	locale: &str,
	optional_keys: &[String],
) -> Result<BTreeSet<String>> {
	let source_keys = dictionary_keys(source_path, source)?;
	let locale_keys = dictionary_keys(locale_path, locale)?;

	Ok(source_keys
		.difference(&locale_keys)
		.filter(|key| !is_optional(key, optional_keys))
		.cloned()
		.collect())
}

fn is_optional(key: &str, optional_keys: &[String]) -> bool {
	optional_keys.iter().any(|optional| {
		key == optional
			|| key
				.strip_prefix(optional.as_str())
				.is_some_and(|rest| rest.starts_with('.'))
	})
}

/// Parses a dictionary file and returns its flattened keys.
pub fn dictionary_keys(path: &Path, contents: &str) -> Result<BTreeSet<String>> {
	let value = match extension(path).as_deref() {
		Some("yml") | Some("yaml") => {
			let yaml: serde_yaml::Value =
				serde_yaml::from_str(contents).map_err(|e| StatusError::parse(path, e))?;
			yaml_to_json(yaml)
		}
		Some("json") => serde_json::from_str(contents).map_err(|e| StatusError::parse(path, e))?,
		Some("toml") => toml::from_str(contents).map_err(|e| StatusError::parse(path, e))?,
		other => {
			return Err(StatusError::parse(
				path,
				format!("unsupported dictionary format: {}", other.unwrap_or("<none>")),
			))
		}
	};

	let Value::Object(map) = value else {
		return Err(StatusError::parse(path, "dictionary root must be a mapping"));
	};

	let mut keys = BTreeSet::new();
	for (key, value) in map {
		flatten(key, value, &mut keys);
	}
	Ok(keys)
}

fn flatten(prefix: String, value: Value, keys: &mut BTreeSet<String>) {
	match value {
		Value::Object(map) if !map.is_empty() => {
			for (key, value) in map {
				flatten(format!("{prefix}.{key}"), value, keys);
			}
		}
		_ => {
			keys.insert(prefix);
		}
	}
}

fn yaml_to_json(value: serde_yaml::Value) -> Value {
	match value {
		serde_yaml::Value::Null => Value::Null,
		serde_yaml::Value::Bool(b) => Value::Bool(b),
		serde_yaml::Value::Number(n) => {
			if let Some(i) = n.as_i64() {
				Value::from(i)
			} else if let Some(u) = n.as_u64() {
				Value::from(u)
			} else {
				n.as_f64().map(Value::from).unwrap_or(Value::Null)
			}
		}
		serde_yaml::Value::String(s) => Value::String(s),
		serde_yaml::Value::Sequence(seq) => Value::Array(seq.into_iter().map(yaml_to_json).collect()),
		serde_yaml::Value::Mapping(map) => Value::Object(
			map
				.into_iter()
				.filter_map(|(k, v)| {
					let key = match k {
						serde_yaml::Value::String(s) => s,
						serde_yaml::Value::Number(n) => n.to_string(),
						serde_yaml::Value::Bool(b) => b.to_string(),
						_ => return None,
					};
					Some((key, yaml_to_json(v)))
				})
				.collect(),
		),
		serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
	}
}
