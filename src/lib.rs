//! # Curator Library
//!
//! Keeps a curated image collection free of near-duplicates. Images in an
//! input directory are embedded with an ONNX model, compared against the
//! output collection by cosine similarity, and only new ones are moved (or
//! copied) across.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod processing;
pub mod runtime;
pub mod storage;
pub mod ui;

pub use error::{Error, Result};
