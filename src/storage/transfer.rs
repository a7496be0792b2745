//! Moving and copying objects between databases

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::TransferMode;
use crate::core::Object;
use crate::error::{Error, Result};
use crate::storage::ObjectDatabase;
use crate::ui;

/// First free `root/name`, then `root/stem (1).ext`, `root/stem (2).ext`, …
///
/// A name is free when nothing exists on disk and `taken` rejects it.
pub fn unique_destination(root: &Path, file_name: &Path, taken: impl Fn(&Path) -> bool) -> PathBuf {
	let candidate = root.join(file_name);
	if !candidate.exists() && !taken(&candidate) {
		return candidate;
	}

	let stem = file_name.file_stem().map(OsString::from).unwrap_or_default();
	let ext = file_name.extension();

	let mut k = 1u64;
	loop {
		let mut name = stem.clone();
		name.push(format!(" ({})", k));
		if let Some(ext) = ext {
			name.push(".");
			name.push(ext);
		}
		let candidate = root.join(name);
		if !candidate.exists() && !taken(&candidate) {
			return candidate;
		}
		k += 1;
	}
}

/// Transfers the object at `path` from `from` into the root of `to`.
///
/// Returns the new path. In [`TransferMode::Move`] the record leaves `from`;
/// in [`TransferMode::Copy`] both the original file and its record stay.
pub fn transfer_object(
	from: &mut ObjectDatabase,
	to: &mut ObjectDatabase,
	path: &Path,
	mode: TransferMode,
) -> Result<PathBuf> {
	let object = from.find(path)?;
	let file_name = object
		.file_name()
		.map(PathBuf::from)
		.ok_or_else(|| Error::NotFound(path.to_path_buf()))?;
	let target = unique_destination(to.root(), &file_name, |p| to.contains(p));

	let mut record = match mode {
		TransferMode::Copy => {
			fs::copy(path, &target).map_err(|e| Error::io("copy", path, e))?;
			object.clone()
		}
		TransferMode::Move => match fs::rename(path, &target) {
			Ok(()) => from.detach_object(path)?,
			Err(e) => {
				ui::debug(&format!("Rename failed ({}), copying instead: {}", e, path.display()));
				move_by_copy(from, path, &target)?
			}
		},
	};

	record.relocate(target.clone());
	to.add_object(record)?;
	Ok(target)
}

/// Copies `path` to `target`, then deletes the source and its record.
///
/// If the source cannot be deleted the copy is removed again, leaving
/// both directories as they were.
fn move_by_copy(from: &mut ObjectDatabase, path: &Path, target: &Path) -> Result<Object> {
	fs::copy(path, target).map_err(|e| Error::io("copy", path, e))?;

	match from.remove_object(path) {
		Ok(record) => Ok(record),
		Err(e) => {
			if let Err(undo) = fs::remove_file(target) {
				ui::warn(&format!("Failed to roll back copy {}: {}", target.display(), undo));
			}
			Err(e)
		}
	}
}
