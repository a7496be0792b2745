//! Tracked files and their kind-specific payloads

use std::path::{Path, PathBuf};

use super::{Embedding, MediaType};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageContent {
	embedding: Option<Embedding>,
}

/// Kind tag plus the data only that kind carries.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
	Image(ImageContent),
}

impl ObjectKind {
	fn empty(media_type: MediaType) -> Self {
		match media_type {
			MediaType::Image => ObjectKind::Image(ImageContent::default()),
		}
	}

	pub fn media_type(&self) -> MediaType {
		match self {
			ObjectKind::Image(_) => MediaType::Image,
		}
	}
}

/// One tracked file. The kind is fixed at creation; the path only changes
/// through a transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
	path: PathBuf,
	kind: ObjectKind,
}

impl Object {
	/// Classifies `path` by extension. `None` for unsupported files.
	pub fn create(path: impl Into<PathBuf>) -> Option<Self> {
		let path = path.into();
		let media_type = MediaType::detect(&path)?;
		Some(Self { path, kind: ObjectKind::empty(media_type) })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn file_name(&self) -> Option<&std::ffi::OsStr> {
		self.path.file_name()
	}

	pub fn kind(&self) -> &ObjectKind {
		&self.kind
	}

	pub fn media_type(&self) -> MediaType {
		self.kind.media_type()
	}

	pub fn embedding(&self) -> Option<&Embedding> {
		match &self.kind {
			ObjectKind::Image(image) => image.embedding.as_ref(),
		}
	}

	pub fn has_embedding(&self) -> bool {
		self.embedding().is_some()
	}

	pub fn set_embedding(&mut self, embedding: Embedding) {
		match &mut self.kind {
			ObjectKind::Image(image) => image.embedding = Some(embedding),
		}
	}

	pub(crate) fn relocate(&mut self, path: PathBuf) {
		self.path = path;
	}
}
