// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Polyglot CLI - localization status for git-tracked content
//!
//! Reads `polyglot.toml`, computes which translations are missing or
//! outdated and prints the result as a table or as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use polyglot_cli_git::CommandGitClient;
use polyglot_common_config::{load_config, DEFAULT_CONFIG_FILE};
use polyglot_status::{LocalizationStatus, Polyglot, StatusEntry, StatusOptions};

#[derive(Parser, Debug)]
#[command(name = "polyglot", version, about, long_about = None)]
struct Args {
	/// Path to the configuration file
	#[arg(short, long, env = "POLYGLOT_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
	config: PathBuf,

	/// Ignore the history cache and do not write it
	#[arg(short, long)]
	force: bool,

	/// Log level
	#[arg(long, value_enum, env = "POLYGLOT_LOG_LEVEL", default_value_t = LogLevel::Info)]
	log_level: LogLevel,

	/// Emit logs as JSON
	#[arg(long)]
	json_logs: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Report the status of every tracked file
	Status {
		/// Print the report as JSON
		#[arg(long)]
		json: bool,
	},
	/// Report the status of a single source or locale file
	File {
		path: String,

		/// Print the report as JSON
		#[arg(long)]
		json: bool,
	},
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
	Trace,
	Debug,
	Info,
	Warn,
	Error,
}

impl LogLevel {
	fn as_filter(self) -> &'static str {
		match self {
			LogLevel::Trace => "trace",
			LogLevel::Debug => "debug",
			LogLevel::Info => "info",
			LogLevel::Warn => "warn",
			LogLevel::Error => "error",
		}
	}
}

fn init_tracing(level: LogLevel, json: bool) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(format!("polyglot={}", level.as_filter())));

	if json {
		tracing_subscriber::registry()
			.with(filter)
			.with(fmt::layer().json().with_writer(std::io::stderr))
			.init();
	} else {
		tracing_subscriber::registry()
			.with(filter)
			.with(fmt::layer().compact().with_writer(std::io::stderr))
			.init();
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();
	init_tracing(args.log_level, args.json_logs);

	let config = load_config(&args.config)
		.with_context(|| format!("failed to load configuration from {}", args.config.display()))?;
	let cwd = std::env::current_dir().context("failed to resolve working directory")?;
	debug!(cwd = %cwd.display(), "starting polyglot");

	let git = Arc::new(CommandGitClient::new(cwd.clone()));
	let polyglot = Polyglot::new(
		config,
		git,
		StatusOptions {
			force: args.force,
			cwd,
		},
	)
	.await
	.context("failed to prepare repository history")?;

	let config = polyglot.config();
	debug!(
			source = %config.source_locale.lang,
			locales = ?config.locale_langs(),
			files = config.files.len(),
			"engine ready"
	);

	match args.command {
		Command::Status { json } => {
			let report = polyglot
				.get_full_status()
				.await
				.context("failed to compute localization status")?;
			info!(files = report.len(), "status computed");
			print_report(&report, json)?;
		}
		Command::File { path, json } => {
			let status = polyglot
				.get_file_status(&path)
				.await
				.with_context(|| format!("failed to compute status of {path}"))?;
			match status {
				Some(entry) => print_report(std::slice::from_ref(&entry), json)?,
				None => anyhow::bail!("{path} is not tracked"),
			}
		}
	}

	Ok(())
}

fn print_report(report: &[StatusEntry], json: bool) -> Result<()> {
	if json {
		println!("{}", serde_json::to_string_pretty(report)?);
		return Ok(());
	}

	for entry in report {
		for localization in &entry.localizations {
			let mut line = format!(
				"{:<11} {:<6} {}",
				localization.status.to_string(),
				localization.lang,
				entry.source.path
			);
			if localization.status != LocalizationStatus::Missing {
				line.push_str(&format!(" -> {}", localization.path));
			}
			if let Some(missing) = localization.missing_keys.as_ref().filter(|k| !k.is_empty()) {
				let keys: Vec<&str> = missing.iter().map(String::as_str).collect();
				line.push_str(&format!(" (missing keys: {})", keys.join(", ")));
			}
			println!("{line}");
		}
	}
	Ok(())
}
