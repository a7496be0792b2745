//! # Command Implementations
//!
//! Each submodule handles one CLI command.

pub mod config;
pub mod sync;
