//! Error types for the object database, similarity and transfers

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("directory does not exist: {}", .0.display())]
	MissingDirectory(PathBuf),

	#[error("path is not a directory: {}", .0.display())]
	NotADirectory(PathBuf),

	#[error("object not found: {}", .0.display())]
	NotFound(PathBuf),

	#[error("object already tracked: {}", .0.display())]
	AlreadyExists(PathBuf),

	/// One collection root is the other or lies inside it.
	#[error("collections overlap: {} and {}", .from.display(), .to.display())]
	OverlappingRoots { from: PathBuf, to: PathBuf },

	/// Two embeddings of different length were compared.
	#[error("embedding length mismatch: {left} vs {right}")]
	DimensionMismatch { left: usize, right: usize },

	/// The embedder broke its one-vector-per-sample contract.
	#[error("embedder returned {actual} vectors for a batch of {expected}")]
	BatchMismatch { expected: usize, actual: usize },

	#[error("failed to {action} {}: {source}", .path.display())]
	Io {
		action: &'static str,
		path: PathBuf,
		#[source]
		source: io::Error,
	},
}

impl Error {
	pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
		Self::Io { action, path: path.into(), source }
	}
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
