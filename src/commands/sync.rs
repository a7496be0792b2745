//! Sync command - embed both collections, then move new images across

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::config::{Config, TransferMode};
use crate::models::VisionModel;
use crate::processing::{pipeline, ImageLoader, PipelineOptions, PipelineReport, Reconciler};
use crate::storage::ObjectDatabase;
use crate::ui;

pub fn run(config: &Config) -> Result<()> {
	let start = Instant::now();

	let mut input = load_database("input", &config.input_dir)?;

	if !config.output_dir.exists() {
		fs::create_dir_all(&config.output_dir).with_context(|| {
			format!("Failed to create output directory {}", config.output_dir.display())
		})?;
		ui::info(&format!("Created output directory {}", config.output_dir.display()));
	}
	let mut output = load_database("output", &config.output_dir)?;
	if input.overlaps(&output) {
		bail!(
			"Input {} and output {} overlap",
			input.root().display(),
			output.root().display()
		);
	}

	let mut embedded = PipelineReport::default();
	if config.image.enabled {
		ui::header("Embedding");
		ui::info(&format!("Using model: {}", config.image.model_path.display()));
		let load_start = Instant::now();
		let mut model = VisionModel::load(&config.image)?;
		ui::success(&format!("Model ready in {:.2}s", load_start.elapsed().as_secs_f32()));

		let loader = ImageLoader::new(config.image.input_size);
		let options = PipelineOptions {
			threads: config.image.threads,
			batch_size: config.image.batch_size_limit,
		};

		for (label, db) in [("input", &mut input), ("output", &mut output)] {
			let report = pipeline::run(db, &loader, &mut model, options)
				.with_context(|| format!("Embedding the {} collection failed", label))?;
			log_pipeline(label, &report);
			embedded.pending += report.pending;
			embedded.embedded += report.embedded;
			embedded.failed += report.failed;
		}
	} else {
		ui::warn("Image embedding disabled, every input image counts as new");
	}

	ui::header("Reconciling");
	ui::info(&format!(
		"{} {} -> {} (threshold {})",
		match config.transfer {
			TransferMode::Move => "Moving",
			TransferMode::Copy => "Copying",
		},
		ui::path_link(input.root(), 60),
		ui::path_link(output.root(), 60),
		config.similarity_threshold
	));

	let reconciler = Reconciler::new(config.similarity_threshold, config.transfer);
	let report = reconciler
		.reconcile(&mut input, &mut output)
		.context("Reconciliation aborted")?;

	ui::summary(
		&[
			("Examined", report.examined),
			("Duplicates", report.duplicates),
			("Transferred", report.transferred),
			("Embedded", embedded.embedded),
			("Unreadable", embedded.failed),
			("Transfer errors", report.failed),
			("Input size", input.len()),
			("Output size", output.len()),
		],
		start.elapsed().as_secs_f32(),
	);

	if report.failed > 0 {
		ui::warn(&format!("Completed with {} transfer errors", report.failed));
	} else {
		ui::success("Collections reconciled");
	}

	Ok(())
}

fn load_database(label: &str, dir: &Path) -> Result<ObjectDatabase> {
	ui::info(&format!("Loading {} database...", label));
	let mut db = ObjectDatabase::open(dir)
		.with_context(|| format!("Failed to load {} database", label))?;
	let added = db.update()?;
	ui::success(&format!("{} database loaded, {} objects", capitalize(label), added));
	Ok(db)
}

fn log_pipeline(label: &str, report: &PipelineReport) {
	if report.pending == 0 {
		ui::info(&format!("Nothing to embed in {}", label));
		return;
	}
	let msg = format!(
		"Embedded {}/{} {} images in {} batches",
		report.embedded, report.pending, label, report.batches
	);
	if report.failed > 0 {
		ui::warn(&format!("{} ({} unreadable)", msg, report.failed));
	} else {
		ui::success(&msg);
	}
}

fn capitalize(s: &str) -> String {
	let mut chars = s.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}
