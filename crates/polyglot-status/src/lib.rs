// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Localization status tracking driven by git history.
//!
//! [`Polyglot`] walks the configured `files` entries, pairs every source file
//! with its per-locale counterparts and compares their git histories. A
//! locale copy is outdated when the source has a newer tracked change, that
//! is a commit whose message mentions none of the ignored keywords.

pub mod cache;
pub mod completion;
pub mod engine;
pub mod error;
pub mod history;
pub mod matcher;
pub mod paths;
pub mod types;

pub use cache::{fingerprint, HistoryCache};
pub use completion::{dictionary_keys, is_localizable, missing_keys};
pub use engine::{Polyglot, StatusOptions, FILE_CONCURRENCY, LOCALE_CONCURRENCY};
pub use error::{Result, StatusError};
pub use history::{FileHistory, HistoryProvider};
pub use matcher::{find_entry, CompiledEntry, GlobSet};
pub use paths::PathResolver;
pub use types::{LocalizationEntry, LocalizationStatus, SourceFile, StatusEntry};
