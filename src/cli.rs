use clap::builder::styling::{AnsiColor, Styles};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{Config, TransferMode, DEFAULT_CONFIG};

/// Execution provider for ONNX Runtime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Provider {
	/// Auto-detect best available (TensorRT → CUDA → CoreML → XNNPACK → CPU)
	#[default]
	Auto,
	/// CPU only
	Cpu,
	/// NVIDIA CUDA GPU
	Cuda,
	/// NVIDIA TensorRT (optimized inference)
	Tensorrt,
	/// Apple CoreML (macOS only)
	#[value(name = "coreml")]
	CoreML,
	/// XNNPACK (optimized CPU kernels)
	Xnnpack,
}

fn parse_threshold(s: &str) -> Result<f32, String> {
	let val: f32 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
	if !(-1.0..=1.0).contains(&val) {
		Err(format!("threshold must be between -1.0 and 1.0, got {}", val))
	} else {
		Ok(val)
	}
}

fn parse_positive(s: &str) -> Result<usize, String> {
	match s.parse::<usize>() {
		Ok(0) => Err("must be at least 1".to_string()),
		Ok(v) => Ok(v),
		Err(_) => Err(format!("'{}' is not a valid count", s)),
	}
}

fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Blue.on_default().bold())
		.usage(AnsiColor::Blue.on_default().bold())
		.literal(AnsiColor::Blue.on_default())
		.placeholder(AnsiColor::Yellow.on_default())
		.valid(AnsiColor::Blue.on_default())
		.invalid(AnsiColor::Red.on_default())
}

#[derive(Parser, Debug)]
#[command(
	name = "curator",
	author,
	version,
	about = "Move new images into a curated collection, skipping near-duplicates",
	styles = styles(),
	after_help = format!(
		"{title}
  {curator} {sync}     {sync_args}   {sync_desc}
  {curator} {sync}     {copy_args}            {copy_desc}
  {curator} {config}   {config_args}     {config_desc}",
		title = "Examples:".bright_blue().bold(),
		curator = "curator".bright_blue(),
		sync = "sync".yellow(),
		sync_args = "-i ./inbox -o ./library",
		sync_desc = "Move new images into the library".dimmed(),
		copy_args = "--copy -t 0.98",
		copy_desc = "Copy instead, looser duplicate match".dimmed(),
		config = "config".yellow(),
		config_args = "-c curator.json",
		config_desc = "Show the effective configuration".dimmed(),
	),
)]
pub struct Cli {
	/// Enable verbose debug output
	#[arg(short = 'v', long = "verbose", global = true)]
	pub verbose: bool,

	/// Configuration file (JSON)
	#[arg(short = 'c', long = "config", global = true, default_value = DEFAULT_CONFIG)]
	pub config: PathBuf,

	/// Execution provider: auto, cpu, cuda, tensorrt, coreml, xnnpack
	#[arg(short = 'p', long = "provider", global = true, default_value = "auto")]
	pub provider: Provider,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Embed both collections and transfer non-duplicates from input to output
	Sync(Overrides),

	/// Print the effective configuration
	Config(Overrides),
}

/// Command-line values that take precedence over the config file
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
	/// Input (inbox) directory
	#[arg(short = 'i', long = "input", value_name = "DIR")]
	pub input: Option<PathBuf>,

	/// Output (curated) directory, created if missing
	#[arg(short = 'o', long = "output", value_name = "DIR")]
	pub output: Option<PathBuf>,

	/// ONNX image encoder
	#[arg(short = 'm', long = "model", value_name = "PATH")]
	pub model: Option<PathBuf>,

	/// Image loader threads
	#[arg(short = 'j', long = "threads", value_parser = parse_positive)]
	pub threads: Option<usize>,

	/// Maximum images per inference batch
	#[arg(short = 'b', long = "batch-size", value_parser = parse_positive)]
	pub batch_size: Option<usize>,

	/// Minimum cosine similarity to count as a duplicate
	#[arg(short = 't', long = "threshold", value_parser = parse_threshold)]
	pub threshold: Option<f32>,

	/// Copy files instead of moving them
	#[arg(long = "copy")]
	pub copy: bool,
}

impl Overrides {
	pub fn apply(&self, config: &mut Config) {
		if let Some(input) = &self.input {
			config.input_dir = input.clone();
		}
		if let Some(output) = &self.output {
			config.output_dir = output.clone();
		}
		if let Some(model) = &self.model {
			config.image.model_path = model.clone();
		}
		if let Some(threads) = self.threads {
			config.image.threads = threads;
		}
		if let Some(batch_size) = self.batch_size {
			config.image.batch_size_limit = batch_size;
		}
		if let Some(threshold) = self.threshold {
			config.similarity_threshold = threshold;
		}
		if self.copy {
			config.transfer = TransferMode::Copy;
		}
	}
}
