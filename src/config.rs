//! Application configuration and constants

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ui::{self, LogLevel};

// === Config File ===
pub const DEFAULT_CONFIG: &str = "curator.json";

// === Directories ===
pub const DEFAULT_INPUT_DIR: &str = "input";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

// === Model Parameters ===
pub const DEFAULT_MODEL: &str = "models/image_encoder.onnx";
pub const DEFAULT_INPUT_NAME: &str = "input";
pub const DEFAULT_OUTPUT_NAME: &str = "output";
pub const INPUT_SIZE: u32 = 224;
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

// === Pipeline ===
pub const DEFAULT_THREADS: usize = 4;
pub const DEFAULT_BATCH_SIZE: usize = 32;
pub const SESSION_INTRA_THREADS: usize = 4;

// === Reconciliation ===
pub const DEFAULT_THRESHOLD: f32 = 0.999;

// === File Extensions ===
pub const IMAGE_EXTENSIONS: &[&str] = &[
	"jpg", "jpeg", "jfif", "png", "gif", "bmp", "webp", "tiff", "tif", "ico", "avif", "pnm", "tga",
	"qoi", "exr", "hdr",
];

/// How a non-duplicate leaves the input collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
	/// Rename into the output, falling back to copy + delete across filesystems
	#[default]
	Move,
	/// Copy into the output and keep the original in place
	Copy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageSettings {
	pub enabled: bool,
	pub model_path: PathBuf,
	pub input_name: String,
	pub output_name: String,
	pub input_size: u32,
	pub threads: usize,
	pub batch_size_limit: usize,
}

impl Default for ImageSettings {
	fn default() -> Self {
		Self {
			enabled: true,
			model_path: PathBuf::from(DEFAULT_MODEL),
			input_name: DEFAULT_INPUT_NAME.to_string(),
			output_name: DEFAULT_OUTPUT_NAME.to_string(),
			input_size: INPUT_SIZE,
			threads: DEFAULT_THREADS,
			batch_size_limit: DEFAULT_BATCH_SIZE,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub input_dir: PathBuf,
	pub output_dir: PathBuf,
	pub log_level: LogLevel,
	pub transfer: TransferMode,
	pub similarity_threshold: f32,
	pub image: ImageSettings,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
			output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
			log_level: LogLevel::Info,
			transfer: TransferMode::Move,
			similarity_threshold: DEFAULT_THRESHOLD,
			image: ImageSettings::default(),
		}
	}
}

impl Config {
	/// Reads a JSON config file. A missing file yields the defaults.
	pub fn load(path: &Path) -> Result<Self> {
		if !path.exists() {
			ui::debug(&format!("No config at {}, using defaults", path.display()));
			return Ok(Self::default());
		}

		let text = fs::read_to_string(path)
			.with_context(|| format!("Failed to read config {}", path.display()))?;
		let config = Self::parse(&text)
			.with_context(|| format!("Invalid config {}", path.display()))?;

		ui::debug(&format!("Loaded config: {}", path.display()));
		Ok(config)
	}

	pub fn parse(text: &str) -> Result<Self> {
		let config: Self = serde_json::from_str(text).context("Malformed JSON")?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<()> {
		if self.image.threads == 0 {
			bail!("image.threads must be at least 1");
		}
		if self.image.batch_size_limit == 0 {
			bail!("image.batch_size_limit must be at least 1");
		}
		if self.image.input_size == 0 {
			bail!("image.input_size must be at least 1");
		}
		if !(-1.0..=1.0).contains(&self.similarity_threshold) {
			bail!(
				"similarity_threshold must be within [-1.0, 1.0], got {}",
				self.similarity_threshold
			);
		}
		if self.input_dir == self.output_dir {
			bail!("input_dir and output_dir must differ");
		}
		Ok(())
	}

	pub fn to_pretty_json(&self) -> Result<String> {
		serde_json::to_string_pretty(self).context("Failed to serialize config")
	}
}
