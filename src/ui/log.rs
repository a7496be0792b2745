//! Leveled, colored console logging

use chrono::Local;
use colored::*;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};

static LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
	Debug = 0,
	#[default]
	Info = 1,
	Warn = 2,
	Error = 3,
}

impl LogLevel {
	fn from_u8(value: u8) -> Self {
		match value {
			0 => Self::Debug,
			1 => Self::Info,
			2 => Self::Warn,
			_ => Self::Error,
		}
	}
}

pub struct Log;

impl Log {
	pub fn set_level(level: LogLevel) {
		LEVEL.store(level as u8, Ordering::Relaxed);
	}

	pub fn level() -> LogLevel {
		LogLevel::from_u8(LEVEL.load(Ordering::Relaxed))
	}

	pub fn enabled(level: LogLevel) -> bool {
		level >= Self::level()
	}
}

fn timestamp() -> ColoredString {
	Local::now().format("%H:%M:%S").to_string().dimmed()
}

fn emit(level: LogLevel, icon: ColoredString, msg: &str) {
	if Log::enabled(level) {
		println!("[{}] {} {}", timestamp(), icon, msg);
	}
}

pub fn info(msg: &str) {
	emit(LogLevel::Info, "ℹ".bright_blue().bold(), &msg.bright_white().to_string());
}

pub fn success(msg: &str) {
	emit(LogLevel::Info, "✓".bright_green().bold(), &msg.bright_white().to_string());
}

pub fn warn(msg: &str) {
	emit(LogLevel::Warn, "⚠".bright_yellow().bold(), &msg.bright_white().to_string());
}

pub fn error(msg: &str) {
	emit(LogLevel::Error, "✗".bright_red().bold(), &msg.bright_white().to_string());
}

pub fn debug(msg: &str) {
	emit(LogLevel::Debug, "⚙".bright_black().bold(), &msg.dimmed().to_string());
}

pub fn header(text: &str) {
	if Log::enabled(LogLevel::Info) {
		println!();
		println!("{}", format!("─── {} ───", text).bright_blue().bold());
	}
}

/// Rewrites the current terminal line. Finish with [`progress_done`].
pub fn progress(msg: &str) {
	if Log::enabled(LogLevel::Info) {
		print!("\r\x1b[2K{} {}", "»".bright_blue().bold(), msg.dimmed());
		let _ = std::io::stdout().flush();
	}
}

pub fn progress_done() {
	if Log::enabled(LogLevel::Info) {
		println!();
	}
}

/// Clickable file path (OSC 8 terminal hyperlink)
pub fn path_link(path: &Path, max_len: usize) -> String {
	let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

	let uri = if cfg!(windows) {
		let path_str = absolute.to_string_lossy();
		let cleaned = path_str.strip_prefix(r"\\?\").unwrap_or(&path_str);
		format!("file:///{}", cleaned.replace('\\', "/"))
	} else {
		format!("file://{}", absolute.display())
	};

	let filename = path
		.file_name()
		.map(|n| n.to_string_lossy().into_owned())
		.unwrap_or_else(|| path.display().to_string());

	format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", uri, shorten(&filename, max_len))
}

fn shorten(name: &str, max_len: usize) -> String {
	let chars: Vec<char> = name.chars().collect();
	if chars.len() <= max_len || max_len < 8 {
		return name.to_string();
	}
	let head = max_len / 2;
	let tail = max_len - head - 3;
	let start: String = chars[..head].iter().collect();
	let end: String = chars[chars.len() - tail..].iter().collect();
	format!("{}...{}", start, end)
}

/// Prints a labeled statistics block.
pub fn summary(rows: &[(&str, usize)], duration_secs: f32) {
	if !Log::enabled(LogLevel::Info) {
		return;
	}
	header("Summary");
	for (label, value) in rows {
		println!("  {} {}", format!("{}:", label).bright_blue(), value);
	}
	println!("  {} {:.2}s", "Duration:".bright_blue(), duration_secs);
	println!();
}
