//! In-memory object index for one directory tree
//!
//! The database is rebuilt by rescanning on every run. Objects are kept
//! sorted by path so iteration and display are deterministic.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::{similarity, MediaType, Object};
use crate::error::{Error, Result};
use crate::ui;

#[derive(Debug)]
pub struct ObjectDatabase {
	root: PathBuf,
	objects: Vec<Object>,
}

impl ObjectDatabase {
	/// Opens an empty database rooted at an existing directory.
	pub fn open(root: impl AsRef<Path>) -> Result<Self> {
		let root = root.as_ref();
		if !root.exists() {
			return Err(Error::MissingDirectory(root.to_path_buf()));
		}
		if !root.is_dir() {
			return Err(Error::NotADirectory(root.to_path_buf()));
		}
		let root = root
			.canonicalize()
			.map_err(|e| Error::io("resolve", root, e))?;

		Ok(Self { root, objects: Vec::new() })
	}

	/// Adds objects for supported files not tracked yet.
	///
	/// Rescans are additive: objects whose file vanished stay tracked.
	/// Returns the number of objects added.
	pub fn update(&mut self) -> Result<usize> {
		let known: HashSet<PathBuf> = self.objects.iter().map(|o| o.path().to_path_buf()).collect();
		let mut added = 0;

		for entry in WalkDir::new(&self.root).follow_links(false) {
			let entry = match entry {
				Ok(entry) => entry,
				Err(e) => {
					ui::warn(&format!("Skipping unreadable entry: {}", e));
					continue;
				}
			};
			if !entry.file_type().is_file() || known.contains(entry.path()) {
				continue;
			}

			match Object::create(entry.path()) {
				Some(object) => {
					self.objects.push(object);
					added += 1;
				}
				None => ui::debug(&format!("Skipping file: {}", entry.path().display())),
			}
		}

		self.sort();
		Ok(added)
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// True when either root is the other or contains it.
	///
	/// Roots are canonical, so symlinked aliases of one directory overlap.
	pub fn overlaps(&self, other: &ObjectDatabase) -> bool {
		self.root.starts_with(&other.root) || other.root.starts_with(&self.root)
	}

	pub fn len(&self) -> usize {
		self.objects.len()
	}

	pub fn is_empty(&self) -> bool {
		self.objects.is_empty()
	}

	/// Objects in path order.
	pub fn objects(&self) -> &[Object] {
		&self.objects
	}

	/// Snapshot of all tracked paths in path order.
	pub fn paths(&self) -> Vec<PathBuf> {
		self.objects.iter().map(|o| o.path().to_path_buf()).collect()
	}

	/// Paths of objects of `media_type` still lacking an embedding.
	pub fn pending(&self, media_type: MediaType) -> Vec<PathBuf> {
		self.objects
			.iter()
			.filter(|o| o.media_type() == media_type && !o.has_embedding())
			.map(|o| o.path().to_path_buf())
			.collect()
	}

	pub fn contains(&self, path: &Path) -> bool {
		self.position(path).is_ok()
	}

	pub fn find(&self, path: &Path) -> Result<&Object> {
		self.position(path)
			.map(|i| &self.objects[i])
			.map_err(|_| Error::NotFound(path.to_path_buf()))
	}

	pub fn find_mut(&mut self, path: &Path) -> Result<&mut Object> {
		match self.position(path) {
			Ok(i) => Ok(&mut self.objects[i]),
			Err(_) => Err(Error::NotFound(path.to_path_buf())),
		}
	}

	/// Every other object scoring at least `threshold` against `object`.
	///
	/// `object` itself is excluded by identity, so querying with a record
	/// owned by another database never excludes a same-path entry here.
	/// Objects without an embedding never match, whatever the threshold.
	pub fn find_similar(&self, object: &Object, threshold: f32) -> Result<Vec<&Object>> {
		let mut matches = Vec::new();
		if !object.has_embedding() {
			return Ok(matches);
		}
		for candidate in &self.objects {
			if std::ptr::eq(candidate, object) || !candidate.has_embedding() {
				continue;
			}
			if similarity(object, candidate)? >= threshold {
				matches.push(candidate);
			}
		}
		Ok(matches)
	}

	pub fn add_object(&mut self, object: Object) -> Result<()> {
		match self.position(object.path()) {
			Ok(_) => Err(Error::AlreadyExists(object.path().to_path_buf())),
			Err(index) => {
				self.objects.insert(index, object);
				Ok(())
			}
		}
	}

	/// Untracks the object and deletes its file from disk.
	pub fn remove_object(&mut self, path: &Path) -> Result<Object> {
		let index = self.position(path).map_err(|_| Error::NotFound(path.to_path_buf()))?;

		match fs::remove_file(path) {
			Ok(()) => {}
			Err(e) if e.kind() == io::ErrorKind::NotFound => {
				ui::debug(&format!("Already gone from disk: {}", path.display()));
			}
			Err(e) => return Err(Error::io("delete", path, e)),
		}

		Ok(self.objects.remove(index))
	}

	/// Untracks the object without touching the disk.
	pub fn detach_object(&mut self, path: &Path) -> Result<Object> {
		let index = self.position(path).map_err(|_| Error::NotFound(path.to_path_buf()))?;
		Ok(self.objects.remove(index))
	}

	fn position(&self, path: &Path) -> std::result::Result<usize, usize> {
		self.objects
			.binary_search_by(|o| o.path().as_os_str().cmp(path.as_os_str()))
	}

	fn sort(&mut self) {
		self.objects.sort_by(|a, b| a.path().as_os_str().cmp(b.path().as_os_str()));
	}
}
