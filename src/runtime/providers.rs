//! Execution provider selection
//!
//! `auto` walks the accelerators in [`AUTO_ORDER`] and keeps the first one
//! that registers. A forced provider that fails falls back to CPU.

use anyhow::{Context, Result};
use ort::ep::ExecutionProvider;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::Session;
use std::path::Path;
use std::sync::OnceLock;

use crate::config::SESSION_INTRA_THREADS;
use crate::ui;

pub use crate::cli::Provider;

/// Accelerators tried by `auto`, fastest first.
pub const AUTO_ORDER: [Provider; 4] = [Provider::Tensorrt, Provider::Cuda, Provider::CoreML, Provider::Xnnpack];

static SELECTED_PROVIDER: OnceLock<Provider> = OnceLock::new();

/// Only the first call wins; later calls are ignored.
pub fn set_provider(p: Provider) {
	let _ = SELECTED_PROVIDER.set(p);
}

pub fn create_session(model_path: &Path) -> Result<Session> {
	let mut builder = Session::builder().context("Failed to create session builder")?;
	let requested = SELECTED_PROVIDER.get().copied().unwrap_or_default();

	match requested {
		Provider::Cpu => ui::info("Using CPU execution provider (forced)"),
		Provider::Auto => {
			if !AUTO_ORDER.iter().any(|&p| register(&mut builder, p)) {
				ui::info("Using CPU execution provider");
			}
		}
		forced => {
			if !register(&mut builder, forced) {
				ui::error(&format!("{} requested but unavailable, falling back to CPU", label(forced)));
			}
		}
	}

	builder
		.with_optimization_level(GraphOptimizationLevel::Level3)?
		.with_intra_threads(SESSION_INTRA_THREADS)?
		.commit_from_file(model_path)
		.with_context(|| format!("Failed to load model {}", model_path.display()))
}

pub fn label(provider: Provider) -> &'static str {
	match provider {
		Provider::Auto => "auto",
		Provider::Cpu => "CPU",
		Provider::Cuda => "CUDA",
		Provider::Tensorrt => "TensorRT",
		Provider::CoreML => "CoreML",
		Provider::Xnnpack => "XNNPACK",
	}
}

/// Registers one accelerator; CPU and `auto` never register anything.
fn register(builder: &mut SessionBuilder, provider: Provider) -> bool {
	match provider {
		Provider::Tensorrt => attach(builder, ort::ep::TensorRT::default(), provider),
		Provider::Cuda => attach(builder, ort::ep::CUDA::default(), provider),
		#[cfg(target_os = "macos")]
		Provider::CoreML => attach(builder, ort::ep::CoreML::default(), provider),
		#[cfg(not(target_os = "macos"))]
		Provider::CoreML => {
			ui::debug("CoreML only available on macOS");
			false
		}
		Provider::Xnnpack => attach(builder, ort::ep::XNNPACK::default(), provider),
		Provider::Auto | Provider::Cpu => false,
	}
}

fn attach<E: ExecutionProvider>(builder: &mut SessionBuilder, ep: E, provider: Provider) -> bool {
	let name = label(provider);
	ui::debug(&format!("Trying provider: {}", name));

	if !ep.is_available().unwrap_or(false) {
		ui::debug(&format!("{} not available", name));
		return false;
	}
	match ep.register(builder) {
		Ok(_) => {
			ui::success(&format!("Using {} execution provider", name));
			true
		}
		Err(e) => {
			ui::debug(&format!("{} registration failed: {}", name, e));
			false
		}
	}
}
