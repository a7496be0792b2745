//! Embedding vectors produced by the feature extractor

#[derive(Debug, Clone, PartialEq)]
pub struct Embedding(Vec<f32>);

impl Embedding {
	/// Wraps raw extractor output. No normalization is applied.
	pub fn new(data: Vec<f32>) -> Self {
		Self(data)
	}

	/// Get raw vector
	pub fn as_slice(&self) -> &[f32] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn norm(&self) -> f32 {
		self.0.iter().map(|x| x * x).sum::<f32>().sqrt()
	}

	/// Cosine similarity in [-1.0, 1.0]. Callers check lengths first.
	///
	/// A zero vector has no direction and is similar to nothing.
	pub fn cosine(&self, other: &Self) -> f32 {
		let denom = self.norm() * other.norm();
		if denom == 0.0 {
			return 0.0;
		}
		let dot: f32 = self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum();
		(dot / denom).clamp(-1.0, 1.0)
	}
}

impl From<Vec<f32>> for Embedding {
	fn from(data: Vec<f32>) -> Self {
		Self::new(data)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cosine_ignores_magnitude() {
		let a = Embedding::new(vec![1.0, 2.0, 3.0]);
		let b = Embedding::new(vec![2.0, 4.0, 6.0]);
		assert!((a.cosine(&b) - 1.0).abs() < 1e-6);
	}

	#[test]
	fn cosine_of_opposite_and_orthogonal_vectors() {
		let a = Embedding::new(vec![1.0, 0.0]);
		assert!((a.cosine(&Embedding::new(vec![-3.0, 0.0])) + 1.0).abs() < 1e-6);
		assert!(a.cosine(&Embedding::new(vec![0.0, 5.0])).abs() < 1e-6);
	}

	#[test]
	fn zero_vector_is_similar_to_nothing() {
		let zero = Embedding::new(vec![0.0, 0.0]);
		assert_eq!(zero.cosine(&Embedding::new(vec![1.0, 1.0])), 0.0);
		assert_eq!(zero.cosine(&zero), 0.0);
	}
}
