//! Reconciliation: carry non-duplicates from one collection into another

use crate::config::TransferMode;
use crate::error::{Error, Result};
use crate::storage::{transfer_object, ObjectDatabase};
use crate::ui::{self, EtaEstimator};

#[derive(Debug, Clone, Copy)]
pub struct Reconciler {
	threshold: f32,
	mode: TransferMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
	pub examined: usize,
	pub duplicates: usize,
	pub transferred: usize,
	pub failed: usize,
}

impl Reconciler {
	pub fn new(threshold: f32, mode: TransferMode) -> Self {
		Self { threshold, mode }
	}

	/// Transfers every object of `source` with no match in `dest`.
	///
	/// Iterates a snapshot of the source paths taken up front. Objects
	/// transferred earlier in the pass take part in later duplicate checks.
	/// A failed filesystem transfer is logged and counted; the pass goes on.
	/// Overlapping roots are rejected before anything is touched.
	pub fn reconcile(&self, source: &mut ObjectDatabase, dest: &mut ObjectDatabase) -> Result<ReconcileReport> {
		if source.overlaps(dest) {
			return Err(Error::OverlappingRoots {
				from: source.root().to_path_buf(),
				to: dest.root().to_path_buf(),
			});
		}

		let paths = source.paths();
		let eta = EtaEstimator::start(paths.len());
		let mut report = ReconcileReport::default();

		for path in &paths {
			report.examined += 1;
			let object = source.find(path)?;

			let duplicate_of = dest
				.find_similar(object, self.threshold)?
				.first()
				.map(|m| m.path().to_path_buf());

			match duplicate_of {
				Some(existing) => {
					report.duplicates += 1;
					ui::debug(&format!(
						"Duplicate: {} ~ {}",
						path.display(),
						existing.display()
					));
				}
				None => {
					if !object.has_embedding() {
						ui::debug(&format!("No embedding, transferring as unique: {}", path.display()));
					}
					match transfer_object(source, dest, path, self.mode) {
						Ok(target) => {
							report.transferred += 1;
							ui::debug(&format!("{} -> {}", path.display(), ui::path_link(&target, 60)));
						}
						Err(e @ Error::NotFound(_)) => return Err(e),
						Err(e) => {
							report.failed += 1;
							ui::progress_done();
							ui::error(&format!("Transfer failed: {}", e));
						}
					}
				}
			}

			ui::progress(&format!("Reconciling: {}", eta.estimate(report.examined)));
		}

		ui::progress_done();
		Ok(report)
	}
}
