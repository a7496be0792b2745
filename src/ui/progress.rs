//! Completion estimates for long-running passes

use std::time::{Duration, Instant};

/// Turns a completed-unit count into a "done X/Y, remaining H:MM:SS" line.
#[derive(Debug, Clone)]
pub struct EtaEstimator {
	total: usize,
	started: Instant,
}

impl EtaEstimator {
	/// Starts the clock now.
	pub fn start(total: usize) -> Self {
		Self { total, started: Instant::now() }
	}

	pub fn total(&self) -> usize {
		self.total
	}

	pub fn estimate(&self, done: usize) -> String {
		self.estimate_at(done, self.started.elapsed())
	}

	/// Same as [`estimate`](Self::estimate) with an explicit elapsed time.
	pub fn estimate_at(&self, done: usize, elapsed: Duration) -> String {
		let done = done.min(self.total);
		let remaining = if done == 0 {
			"--:--:--".to_string()
		} else {
			let per_unit = elapsed.as_secs_f64() / done as f64;
			let secs = (per_unit * (self.total - done) as f64).round() as u64;
			format_hms(secs)
		};
		format!("done {}/{}, remaining {}", done, self.total, remaining)
	}
}

fn format_hms(secs: u64) -> String {
	format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
