//! JSON caches on disk: the scraped vocabulary list and the accumulated translations.
//!
//! Writes are plain overwrites. Callers only write once their data is complete, so a failed scrape never touches the previous file.

use std::{io::ErrorKind, path::Path};

use serde::{Serialize, de::DeserializeOwned};

use crate::{RecallError, TranslationMap, VocabList};

pub fn load_vocab(path: &Path) -> Result<VocabList, RecallError> {
	read_json(path)?.ok_or_else(|| RecallError::CacheMissing { path: path.to_owned() })
}

pub fn save_vocab(path: &Path, vocab: &VocabList) -> Result<(), RecallError> {
	write_json(path, vocab)
}

/// `None` when the file does not exist yet
pub fn load_translations(path: &Path) -> Result<Option<TranslationMap>, RecallError> {
	read_json(path)
}

pub fn save_translations(path: &Path, translations: &TranslationMap) -> Result<(), RecallError> {
	write_json(path, translations)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, RecallError> {
	let raw = match std::fs::read_to_string(path) {
		Ok(raw) => raw,
		Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
		Err(e) => return Err(RecallError::io(path, e)),
	};
	serde_json::from_str(&raw).map(Some).map_err(|source| RecallError::CacheCorrupt { path: path.to_owned(), source })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), RecallError> {
	let mut json = serde_json::to_string_pretty(value).map_err(|e| RecallError::io(path, e.into()))?;
	json.push('\n');
	std::fs::write(path, json).map_err(|e| RecallError::io(path, e))?;
	tracing::debug!(path = %path.display(), "cache written");
	Ok(())
}
