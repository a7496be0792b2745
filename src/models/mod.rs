//! # Feature Extractors
//!
//! The [`Embedder`] seam between the pipeline and whatever model turns
//! preprocessed samples into vectors.

pub mod vision;

use anyhow::Result;

pub use vision::VisionModel;

/// Maps a batch of samples to one vector per sample, in order.
///
/// Called from a single thread; implementations need not be `Sync`.
pub trait Embedder {
	type Sample;

	fn embed(&mut self, batch: &[Self::Sample]) -> Result<Vec<Vec<f32>>>;
}
