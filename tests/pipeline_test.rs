// Integration tests for the embedding pipeline

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

use curator::core::MediaType;
use curator::models::Embedder;
use curator::processing::{pipeline, Loader, PipelineOptions};
use curator::storage::ObjectDatabase;
use curator::Error;

/// Reads the number stored in the file after a delay scrambled by file
/// name, so loaders finish out of order.
struct JitteryLoader;

impl Loader for JitteryLoader {
	type Sample = u32;

	fn media_type(&self) -> MediaType {
		MediaType::Image
	}

	fn load(&self, path: &Path) -> Result<u32> {
		let seed: u64 = path.to_string_lossy().bytes().map(u64::from).sum();
		thread::sleep(Duration::from_millis(seed.wrapping_mul(7919) % 15));
		let text = fs::read_to_string(path)?;
		text.trim().parse().with_context(|| format!("not a number: {:?}", text))
	}
}

/// Echoes each sample back as a one-element vector.
#[derive(Default)]
struct EchoEmbedder {
	calls: usize,
	largest_batch: usize,
}

impl Embedder for EchoEmbedder {
	type Sample = u32;

	fn embed(&mut self, batch: &[u32]) -> Result<Vec<Vec<f32>>> {
		self.calls += 1;
		self.largest_batch = self.largest_batch.max(batch.len());
		Ok(batch.iter().map(|&v| vec![v as f32]).collect())
	}
}

/// Drops the last vector of every batch.
struct ShortEmbedder;

impl Embedder for ShortEmbedder {
	type Sample = u32;

	fn embed(&mut self, batch: &[u32]) -> Result<Vec<Vec<f32>>> {
		Ok(batch.iter().skip(1).map(|&v| vec![v as f32]).collect())
	}
}

fn numbered_collection(count: u32) -> (TempDir, ObjectDatabase) {
	let dir = TempDir::new().unwrap();
	for i in 0..count {
		fs::write(dir.path().join(format!("img_{:03}.jpg", i)), i.to_string()).unwrap();
	}
	let mut db = ObjectDatabase::open(dir.path()).unwrap();
	db.update().unwrap();
	(dir, db)
}

fn stored_value(db: &ObjectDatabase, name: &str) -> Option<Vec<f32>> {
	db.find(&db.root().join(name))
		.unwrap()
		.embedding()
		.map(|e| e.as_slice().to_vec())
}

#[test]
fn every_pending_object_gets_its_own_result() {
	let (_dir, mut db) = numbered_collection(60);
	let mut embedder = EchoEmbedder::default();

	let report = pipeline::run(
		&mut db,
		&JitteryLoader,
		&mut embedder,
		PipelineOptions { threads: 6, batch_size: 7 },
	)
	.unwrap();

	assert_eq!(report.pending, 60);
	assert_eq!(report.embedded, 60);
	assert_eq!(report.failed, 0);
	assert_eq!(report.batches, embedder.calls);
	assert!(embedder.largest_batch <= 7);

	for i in 0..60u32 {
		assert_eq!(
			stored_value(&db, &format!("img_{:03}.jpg", i)),
			Some(vec![i as f32]),
			"wrong embedding for object {}",
			i
		);
	}
	assert!(db.pending(MediaType::Image).is_empty());
}

#[test]
fn single_thread_single_slot_still_completes() {
	let (_dir, mut db) = numbered_collection(5);
	let mut embedder = EchoEmbedder::default();

	let report = pipeline::run(
		&mut db,
		&JitteryLoader,
		&mut embedder,
		PipelineOptions { threads: 1, batch_size: 1 },
	)
	.unwrap();

	assert_eq!(report.embedded, 5);
	assert_eq!(embedder.calls, 5);
	assert_eq!(embedder.largest_batch, 1);
}

#[test]
fn unreadable_objects_are_skipped() {
	let (dir, mut db) = numbered_collection(4);
	fs::write(dir.path().join("img_001.jpg"), "corrupt").unwrap();

	let report = pipeline::run(
		&mut db,
		&JitteryLoader,
		&mut EchoEmbedder::default(),
		PipelineOptions { threads: 3, batch_size: 2 },
	)
	.unwrap();

	assert_eq!(report.embedded, 3);
	assert_eq!(report.failed, 1);
	assert_eq!(stored_value(&db, "img_001.jpg"), None);
	assert_eq!(stored_value(&db, "img_002.jpg"), Some(vec![2.0]));
	assert_eq!(db.pending(MediaType::Image), vec![db.root().join("img_001.jpg")]);
}

#[test]
fn second_pass_only_retries_missing_embeddings() {
	let (dir, mut db) = numbered_collection(3);
	fs::write(dir.path().join("img_000.jpg"), "corrupt").unwrap();
	let options = PipelineOptions { threads: 2, batch_size: 4 };

	let first = pipeline::run(&mut db, &JitteryLoader, &mut EchoEmbedder::default(), options).unwrap();
	assert_eq!(first.failed, 1);

	fs::write(dir.path().join("img_000.jpg"), "42").unwrap();
	let mut embedder = EchoEmbedder::default();
	let second = pipeline::run(&mut db, &JitteryLoader, &mut embedder, options).unwrap();

	assert_eq!(second.pending, 1);
	assert_eq!(second.embedded, 1);
	assert_eq!(stored_value(&db, "img_000.jpg"), Some(vec![42.0]));
}

#[test]
fn empty_database_is_a_no_op() {
	let dir = TempDir::new().unwrap();
	let mut db = ObjectDatabase::open(dir.path()).unwrap();
	let mut embedder = EchoEmbedder::default();

	let report = pipeline::run(
		&mut db,
		&JitteryLoader,
		&mut embedder,
		PipelineOptions { threads: 4, batch_size: 8 },
	)
	.unwrap();

	assert_eq!(report.pending, 0);
	assert_eq!(embedder.calls, 0);
}

#[test]
fn short_embedder_output_aborts_the_pass() {
	let (_dir, mut db) = numbered_collection(20);

	let err = pipeline::run(
		&mut db,
		&JitteryLoader,
		&mut ShortEmbedder,
		PipelineOptions { threads: 4, batch_size: 4 },
	)
	.unwrap_err();

	assert!(matches!(err.downcast_ref::<Error>(), Some(Error::BatchMismatch { .. })));
}
