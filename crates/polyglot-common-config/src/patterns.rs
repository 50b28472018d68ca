// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Glob helpers shared by validation and file matching.

/// Expands `{a,b}` alternations into every concrete glob they describe.
///
/// Nested groups are expanded recursively. An unterminated `{` is kept
/// literally.
pub fn expand_braces(pattern: &str) -> Vec<String> {
	let Some(open) = pattern.find('{') else {
		return vec![pattern.to_string()];
	};

	let mut depth = 0usize;
	let mut close = None;
	let mut commas = Vec::new();

	for (offset, c) in pattern[open..].char_indices() {
		let index = open + offset;
		match c {
			'{' => depth += 1,
			'}' => {
				depth -= 1;
				if depth == 0 {
					close = Some(index);
					break;
				}
			}
			',' if depth == 1 => commas.push(index),
			_ => {}
		}
	}

	let Some(close) = close else {
		return vec![pattern.to_string()];
	};

	let prefix = &pattern[..open];
	let suffix = &pattern[close + 1..];

	let mut alternatives = Vec::with_capacity(commas.len() + 1);
	let mut start = open + 1;
	for end in commas.into_iter().chain(std::iter::once(close)) {
		alternatives.push(&pattern[start..end]);
		start = end + 1;
	}

	alternatives
		.into_iter()
		.flat_map(|alt| expand_braces(&format!("{prefix}{alt}{suffix}")))
		.collect()
}
