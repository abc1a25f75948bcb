use std::{
	path::{Path, PathBuf},
	time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::RecallError;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AppConfig {
	/// Scraped vocabulary, a JSON array of strings
	#[serde(default = "default_vocab_path")]
	pub vocab_path: PathBuf,
	/// Accumulated translations, a JSON object of word -> [translation]
	#[serde(default = "default_translations_path")]
	pub translations_path: PathBuf,
	/// Site hosting the profile pages; the username and course are appended to it
	#[serde(default = "default_profile_base_url")]
	pub profile_base_url: String,
	/// Dictionary page with the search box used for translations
	#[serde(default = "default_dictionary_url")]
	pub dictionary_url: String,
	/// How long to wait for page-level elements (ms) (default: 30000)
	#[serde(default = "default_wait_timeout_ms")]
	pub wait_timeout_ms: u64,
	/// How long to wait for a single dictionary lookup (ms) (default: 5000)
	#[serde(default = "default_lookup_timeout_ms")]
	pub lookup_timeout_ms: u64,
	/// Questions per batch before asking whether to continue (default: 10)
	#[serde(default = "default_batch_size")]
	pub batch_size: usize,
	/// Run without a browser window
	#[serde(default)]
	pub headless: bool,
	/// Look up translations for new words right after a scrape (default: true)
	#[serde(default = "default_translate_after_scrape")]
	pub translate_after_scrape: bool,
}

fn default_vocab_path() -> PathBuf {
	PathBuf::from("my-vocab.json")
}

fn default_translations_path() -> PathBuf {
	PathBuf::from("my-vocab-translated.json")
}

fn default_profile_base_url() -> String {
	"https://duome.eu".to_owned()
}

fn default_dictionary_url() -> String {
	"https://duome.eu/vocabulary/en/es".to_owned()
}

fn default_wait_timeout_ms() -> u64 {
	30_000
}

fn default_lookup_timeout_ms() -> u64 {
	5_000
}

fn default_batch_size() -> usize {
	10
}

fn default_translate_after_scrape() -> bool {
	true
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			vocab_path: default_vocab_path(),
			translations_path: default_translations_path(),
			profile_base_url: default_profile_base_url(),
			dictionary_url: default_dictionary_url(),
			wait_timeout_ms: default_wait_timeout_ms(),
			lookup_timeout_ms: default_lookup_timeout_ms(),
			batch_size: default_batch_size(),
			headless: false,
			translate_after_scrape: default_translate_after_scrape(),
		}
	}
}

impl AppConfig {
	/// Read a JSON config file; missing fields fall back to their defaults.
	pub fn load(path: &Path) -> Result<Self, RecallError> {
		let raw = std::fs::read_to_string(path).map_err(|e| RecallError::Config(format!("Could not read config '{}': {e}", path.display())))?;
		let config: Self = serde_json::from_str(&raw).map_err(|e| RecallError::Config(format!("Invalid config '{}': {e}", path.display())))?;
		if config.batch_size == 0 {
			return Err(RecallError::Config("batch_size must be at least 1".to_owned()));
		}
		Ok(config)
	}

	/// Profile page of `username` for the English -> Spanish course
	pub fn profile_url(&self, username: &str) -> String {
		format!("{}/{}/en/es", self.profile_base_url.trim_end_matches('/'), username)
	}

	pub fn wait_timeout(&self) -> Duration {
		Duration::from_millis(self.wait_timeout_ms)
	}

	pub fn lookup_timeout(&self) -> Duration {
		Duration::from_millis(self.lookup_timeout_ms)
	}
}
