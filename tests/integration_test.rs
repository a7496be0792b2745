// Integration tests for the curator binary

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn curator() -> Command {
	Command::new(env!("CARGO_BIN_EXE_curator"))
}

#[test]
fn test_version_display() {
	let output = curator()
		.arg("--version")
		.output()
		.expect("Failed to run curator --version");

	assert!(output.status.success(), "Version command failed");

	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("curator"), "Expected 'curator' in version output");
}

#[test]
fn test_help_display() {
	let output = curator()
		.arg("--help")
		.output()
		.expect("Failed to run curator --help");

	assert!(output.status.success(), "Help command failed");

	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("sync") && stdout.contains("config"),
			"Expected sync and config in help output");
}

#[test]
fn test_config_merges_file_and_flags() {
	let dir = TempDir::new().unwrap();
	let config_path = dir.path().join("curator.json");
	fs::write(
		&config_path,
		r#"{ "input_dir": "inbox", "image": { "batch_size_limit": 16 } }"#,
	)
	.unwrap();

	let output = curator()
		.args(["config", "-c"])
		.arg(&config_path)
		.args(["--threads", "3", "--copy"])
		.output()
		.expect("Failed to run curator config");

	assert!(output.status.success(), "Config command failed");

	let effective: serde_json::Value = serde_json::from_slice(&output.stdout)
		.expect("Config output is not JSON");
	assert_eq!(effective["input_dir"], "inbox");
	assert_eq!(effective["transfer"], "copy");
	assert_eq!(effective["image"]["threads"], 3);
	assert_eq!(effective["image"]["batch_size_limit"], 16);
}

#[test]
fn test_malformed_config_fails() {
	let dir = TempDir::new().unwrap();
	let config_path = dir.path().join("broken.json");
	fs::write(&config_path, "{ input_dir: ").unwrap();

	let output = curator()
		.args(["config", "-c"])
		.arg(&config_path)
		.output()
		.expect("Failed to run curator config");

	assert!(!output.status.success(), "Malformed config should fail");
}

#[test]
fn test_missing_input_directory_fails() {
	let dir = TempDir::new().unwrap();

	let output = curator()
		.args(["sync", "-c"])
		.arg(dir.path().join("absent.json"))
		.arg("-i")
		.arg(dir.path().join("no_such_inbox"))
		.arg("-o")
		.arg(dir.path().join("library"))
		.output()
		.expect("Failed to run curator sync");

	assert!(!output.status.success(), "Sync without input directory should fail");
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("input database"), "Expected diagnostic, got: {}", stderr);
}

#[test]
fn test_output_inside_input_fails() {
	let dir = TempDir::new().unwrap();
	let inbox = dir.path().join("inbox");
	fs::create_dir_all(&inbox).unwrap();
	fs::write(inbox.join("x.jpg"), "x").unwrap();

	let output = curator()
		.args(["sync", "-c"])
		.arg(dir.path().join("absent.json"))
		.arg("-i")
		.arg(&inbox)
		.arg("-o")
		.arg(inbox.join("library"))
		.output()
		.expect("Failed to run curator sync");

	assert!(!output.status.success(), "Overlapping collections should fail");
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("overlap"), "Expected diagnostic, got: {}", stderr);
	assert!(inbox.join("x.jpg").exists());
}
