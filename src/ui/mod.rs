//! # User Interface
//!
//! Colored terminal output, clickable file links and progress estimates.

pub mod log;
pub mod progress;

pub use log::{
	debug, error, header, info, path_link, progress, progress_done, success, summary, warn, Log,
	LogLevel,
};
pub use progress::EtaEstimator;
