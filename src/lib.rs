use std::{
	collections::{BTreeMap, HashSet},
	fmt,
};

use serde::{Deserialize, Serialize};

pub mod commands;
pub mod config;
pub mod console;
pub mod driver;
pub mod error;
pub mod quiz;
pub mod scraper;
pub mod store;
pub mod translator;

pub use error::RecallError;

/// Spanish word -> candidate English translations, in the order the dictionary lists them.
///
/// Keys stay sorted so that the persisted file is deterministic across runs.
pub type TranslationMap = BTreeMap<String, Vec<String>>;

/// Ordered, duplicate-free list of vocabulary words
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct VocabList {
	words: Vec<String>,
	seen: HashSet<String>,
}

impl VocabList {
	/// Trims `word` and appends it unless it is empty or already present.
	/// Returns whether it was added.
	pub fn push(&mut self, word: &str) -> bool {
		let word = word.trim();
		if word.is_empty() || self.seen.contains(word) {
			return false;
		}
		self.seen.insert(word.to_owned());
		self.words.push(word.to_owned());
		true
	}

	/// Appends every new word, returning how many were added
	pub fn extend<I, S>(&mut self, words: I) -> usize
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		words.into_iter().filter(|w| self.push(w.as_ref())).count()
	}

	pub fn contains(&self, word: &str) -> bool {
		self.seen.contains(word)
	}

	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.words.iter().map(String::as_str)
	}

	pub fn as_slice(&self) -> &[String] {
		&self.words
	}
}

impl From<Vec<String>> for VocabList {
	fn from(words: Vec<String>) -> Self {
		let mut list = VocabList::default();
		list.extend(words);
		list
	}
}

impl From<VocabList> for Vec<String> {
	fn from(list: VocabList) -> Self {
		list.words
	}
}

impl<'a> FromIterator<&'a str> for VocabList {
	fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
		let mut list = VocabList::default();
		list.extend(iter);
		list
	}
}

impl fmt::Display for VocabList {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.words.join(", "))
	}
}
