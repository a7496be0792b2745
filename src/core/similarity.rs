//! Object-level similarity

use super::Object;
use crate::error::{Error, Result};

/// Cosine similarity between two objects.
///
/// Objects of different kinds, or without an embedding, score 0. Embeddings
/// of different length are an error: they come from different extractors.
pub fn similarity(a: &Object, b: &Object) -> Result<f32> {
	if a.media_type() != b.media_type() {
		return Ok(0.0);
	}

	let (Some(left), Some(right)) = (a.embedding(), b.embedding()) else {
		return Ok(0.0);
	};

	if left.len() != right.len() {
		return Err(Error::DimensionMismatch { left: left.len(), right: right.len() });
	}

	Ok(left.cosine(right))
}
