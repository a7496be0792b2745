//! Curator - near-duplicate aware image collection sync
//!
//! Loads the configuration, applies command-line overrides and dispatches
//! to the selected command.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use curator::cli::{Cli, Command};
use curator::config::Config;
use curator::ui::{self, Log, LogLevel};
use curator::{commands, runtime};

fn main() -> Result<()> {
	let cli = Cli::parse();

	if cli.verbose {
		Log::set_level(LogLevel::Debug);
	}
	runtime::set_provider(cli.provider);

	let (overrides, is_sync) = match &cli.command {
		Command::Sync(overrides) => (overrides, true),
		Command::Config(overrides) => (overrides, false),
	};

	let mut config = Config::load(&cli.config)?;
	overrides.apply(&mut config);
	config.validate()?;

	if !cli.verbose {
		Log::set_level(config.log_level);
	}

	if is_sync {
		print_header();
		ui::debug(&format!("Config: {}", cli.config.display()));
		commands::sync::run(&config)
	} else {
		commands::config::run(&config)
	}
}

fn print_header() {
	if Log::enabled(LogLevel::Info) {
		println!();
		println!(
			"{}",
			format!("─── Curator v{} ───", env!("CARGO_PKG_VERSION"))
				.bright_blue()
				.bold()
		);
	}
}
