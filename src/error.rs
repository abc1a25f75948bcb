use std::{path::PathBuf, time::Duration};

use thiserror::Error;

/// Everything that can go wrong in a command.
///
/// Command-level variants end the process with exit code 1. `LookupTimeout`, `Timeout` and `Driver` also show up per lesson / per word, where they are logged and skipped.
#[derive(Debug, Error)]
pub enum RecallError {
	#[error("{0}")]
	Config(String),

	#[error("'{}' not found. Please run 'duo-recall vocab-refresh' first.", path.display())]
	CacheMissing { path: PathBuf },

	#[error("Error reading '{}': {source}", path.display())]
	CacheCorrupt { path: PathBuf, source: serde_json::Error },

	#[error("I/O error on '{}': {source}", path.display())]
	Io { path: PathBuf, source: std::io::Error },

	#[error("No words to practice. The vocab file is empty.")]
	EmptyVocab,

	#[error("None of the words in '{}' have translations yet. Please run 'duo-recall translate' first.", vocab_path.display())]
	NoTranslations { vocab_path: PathBuf },

	#[error("Navigation failed: {0}")]
	Navigation(String),

	#[error("Scrape failed: {0}")]
	Scrape(String),

	#[error("Timed out after {after:?} waiting for '{selector}'")]
	Timeout { selector: String, after: Duration },

	#[error("Timed out looking up '{word}'")]
	LookupTimeout { word: String },

	#[error("Browser error: {0}")]
	Driver(String),
}

impl RecallError {
	pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		RecallError::Io { path: path.into(), source }
	}
}
