//! # Embedding Pipeline
//!
//! Turns every pending object of a database into an embedding.
//!
//! A fixed pool of loader threads claims paths through a shared cursor,
//! decodes them and pushes samples into a bounded channel. A single executor
//! drains the channel into batches, runs the embedder and writes the vectors
//! back by path. The channel capacity equals the batch size limit, so memory
//! stays bounded and loaders block when the executor falls behind.

use anyhow::{anyhow, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crate::core::{Embedding, MediaType};
use crate::error::Error;
use crate::models::Embedder;
use crate::storage::ObjectDatabase;
use crate::ui::{self, EtaEstimator};

/// Loads one file into a model-ready sample. Called from many threads.
pub trait Loader: Sync {
	type Sample: Send;

	fn media_type(&self) -> MediaType;

	fn load(&self, path: &Path) -> Result<Self::Sample>;
}

#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
	pub threads: usize,
	pub batch_size: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineReport {
	pub pending: usize,
	pub embedded: usize,
	pub failed: usize,
	pub batches: usize,
}

/// Embeds every object of the loader's media type that lacks an embedding.
///
/// Files that fail to load are logged and skipped. An embedder error, a
/// result count that differs from the batch size, or a vector length that
/// changes mid-run aborts the pass.
pub fn run<L, E>(
	db: &mut ObjectDatabase,
	loader: &L,
	embedder: &mut E,
	options: PipelineOptions,
) -> Result<PipelineReport>
where
	L: Loader,
	E: Embedder<Sample = L::Sample> + Send,
{
	let pending = db.pending(loader.media_type());
	let mut report = PipelineReport { pending: pending.len(), ..Default::default() };
	if pending.is_empty() {
		return Ok(report);
	}

	let threads = options.threads.max(1).min(pending.len());
	let batch_size = options.batch_size.max(1);
	ui::debug(&format!(
		"Embedding {} {}s with {} loaders, batches of {}",
		pending.len(),
		loader.media_type().name(),
		threads,
		batch_size
	));

	let cursor = AtomicUsize::new(0);
	let failed = AtomicUsize::new(0);
	let (tx, rx) = bounded::<(PathBuf, L::Sample)>(batch_size);
	let total = pending.len();

	let executed: Result<(usize, usize)> = thread::scope(|s| {
		let failed_count = &failed;
		let executor = s.spawn(move || execute_batches(rx, db, embedder, batch_size, failed_count, total));

		let workers: Vec<_> = (0..threads)
			.map(|_| {
				let tx = tx.clone();
				let (pending, cursor, failed) = (&pending, &cursor, &failed);
				s.spawn(move || load_worker(loader, pending, cursor, failed, tx))
			})
			.collect();
		drop(tx);

		let mut panicked = false;
		for worker in workers {
			panicked |= worker.join().is_err();
		}
		// Every sender is gone now; the executor drains what is left and stops.
		let executed = executor.join().map_err(|_| anyhow!("Batch executor panicked"))?;
		if panicked {
			return Err(anyhow!("Loader worker panicked"));
		}
		executed
	});

	ui::progress_done();
	let (embedded, batches) = executed?;
	report.embedded = embedded;
	report.batches = batches;
	report.failed = failed.into_inner();
	Ok(report)
}

fn load_worker<L: Loader>(
	loader: &L,
	pending: &[PathBuf],
	cursor: &AtomicUsize,
	failed: &AtomicUsize,
	tx: Sender<(PathBuf, L::Sample)>,
) {
	loop {
		let index = cursor.fetch_add(1, Ordering::Relaxed);
		let Some(path) = pending.get(index) else { break };

		match loader.load(path) {
			Ok(sample) => {
				if tx.send((path.clone(), sample)).is_err() {
					// Executor aborted
					break;
				}
			}
			Err(e) => {
				failed.fetch_add(1, Ordering::Relaxed);
				ui::progress_done();
				ui::warn(&format!("Failed to load {}: {:#}", path.display(), e));
			}
		}
	}
}

/// Returns (objects embedded, batches run).
fn execute_batches<E: Embedder>(
	rx: Receiver<(PathBuf, E::Sample)>,
	db: &mut ObjectDatabase,
	embedder: &mut E,
	batch_size: usize,
	failed: &AtomicUsize,
	total: usize,
) -> Result<(usize, usize)> {
	let eta = EtaEstimator::start(total);
	let mut dimension: Option<usize> = None;
	let mut embedded = 0;
	let mut batches = 0;

	while let Ok(first) = rx.recv() {
		let mut paths = Vec::with_capacity(batch_size);
		let mut samples = Vec::with_capacity(batch_size);
		paths.push(first.0);
		samples.push(first.1);
		while paths.len() < batch_size {
			match rx.try_recv() {
				Ok((path, sample)) => {
					paths.push(path);
					samples.push(sample);
				}
				Err(_) => break,
			}
		}

		let vectors = embedder.embed(&samples)?;
		if vectors.len() != samples.len() {
			return Err(Error::BatchMismatch { expected: samples.len(), actual: vectors.len() }.into());
		}

		for (path, vector) in paths.iter().zip(vectors) {
			let expected = *dimension.get_or_insert(vector.len());
			if vector.len() != expected {
				return Err(Error::DimensionMismatch { left: expected, right: vector.len() }.into());
			}
			db.find_mut(path)?.set_embedding(Embedding::new(vector));
		}

		embedded += paths.len();
		batches += 1;
		ui::progress(&progress_line(&eta, embedded, failed));
	}

	Ok((embedded, batches))
}

/// Skipped loads count as done so the line reaches the total.
fn progress_line(eta: &EtaEstimator, embedded: usize, failed: &AtomicUsize) -> String {
	format!("Embedding: {}", eta.estimate(embedded + failed.load(Ordering::Relaxed)))
}
