//! Config command - print the effective configuration

use anyhow::Result;

use crate::config::Config;

pub fn run(config: &Config) -> Result<()> {
	println!("{}", config.to_pretty_json()?);
	Ok(())
}
