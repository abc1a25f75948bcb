//! Fill the translation cache for words that have none yet, using the dictionary page's search box.

use std::{path::Path, sync::LazyLock, time::Duration};

use regex::Regex;
use v_utils::{elog, log};

use crate::{
	RecallError, TranslationMap, VocabList,
	config::AppConfig,
	driver::{Locator, PageDriver, poll},
	store,
};

pub const SEARCH_INPUT: &str = "input#search";
/// Words listed under the search box; the `title` holds the translations
pub const RESULT_ITEMS: &str = "#words li span.wA";
pub const TITLE_ATTRIBUTE: &str = "title";

/// `[noun]`, `(f)` and similar annotations inside a title
static ANNOTATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]|\([^)]*\)").expect("static regex"));

/// Parse a dictionary title such as `"house, home [noun]"` into its candidate translations
pub fn parse_title(title: &str) -> Vec<String> {
	ANNOTATION
		.replace_all(title, "")
		.split(',')
		.map(str::trim)
		.filter(|candidate| !candidate.is_empty())
		.map(str::to_owned)
		.collect()
}

/// What a translation run has to do
#[derive(Clone, Debug, Default)]
pub struct TranslationPlan {
	pub translations: TranslationMap,
	/// Vocab words with no entry yet, in vocab order
	pub missing: Vec<String>,
}

impl TranslationPlan {
	pub fn new(vocab: &VocabList, translations: TranslationMap) -> Self {
		let missing = vocab.iter().filter(|word| !translations.contains_key(*word)).map(str::to_owned).collect();
		Self { translations, missing }
	}

	/// Read both caches from disk. A missing translation cache starts empty.
	pub fn load(config: &AppConfig) -> Result<Self, RecallError> {
		let vocab = store::load_vocab(&config.vocab_path)?;
		Self::for_vocab(&vocab, &config.translations_path)
	}

	pub fn for_vocab(vocab: &VocabList, translations_path: &Path) -> Result<Self, RecallError> {
		let translations = store::load_translations(translations_path)?.unwrap_or_default();
		Ok(Self::new(vocab, translations))
	}

	pub fn is_complete(&self) -> bool {
		self.missing.is_empty()
	}
}

#[derive(Clone, Debug)]
pub struct TranslationReport {
	pub translations: TranslationMap,
	pub translated: Vec<String>,
	pub failed: Vec<String>,
}

/// Look up every missing word of `plan` on one dictionary page, then write the merged map once.
///
/// Existing entries are never replaced. Words whose lookup fails stay absent.
pub async fn run<D: PageDriver>(driver: &D, plan: TranslationPlan, config: &AppConfig) -> Result<TranslationReport, RecallError> {
	let TranslationPlan { mut translations, missing } = plan;
	let mut translated = Vec::new();
	let mut failed = Vec::new();

	if !missing.is_empty() {
		log!("Looking up {} new word(s)...", missing.len());
		driver.navigate(&config.dictionary_url).await?;
		driver
			.wait_for(&Locator::css(SEARCH_INPUT), config.wait_timeout())
			.await
			.map_err(|e| RecallError::Navigation(format!("dictionary search box never appeared: {e}")))?;

		for word in missing {
			match lookup(driver, &word, config.lookup_timeout()).await {
				Ok(candidates) => {
					tracing::debug!(%word, ?candidates, "translated");
					translations.entry(word.clone()).or_insert(candidates);
					translated.push(word);
				}
				Err(e) => {
					elog!("Could not translate '{word}'. Skipping... ({e})");
					failed.push(word);
				}
			}
		}

		store::save_translations(&config.translations_path, &translations)?;
		log!("Translated {} word(s), {} failed. Saved to '{}'", translated.len(), failed.len(), config.translations_path.display());
	}

	Ok(TranslationReport { translations, translated, failed })
}

/// Search for `word` and read the translations off the result whose text equals it exactly.
///
/// The result list re-renders while the search runs, so a failed read of it counts as "not there yet" until `timeout`.
pub async fn lookup<D: PageDriver>(driver: &D, word: &str, timeout: Duration) -> Result<Vec<String>, RecallError> {
	let search = Locator::css(SEARCH_INPUT);
	driver.fill(&search, word).await?;
	driver.submit(&search).await?;

	let results = Locator::css(RESULT_ITEMS);
	let title = poll(timeout, async || match driver.read_attribute(&results, word, TITLE_ATTRIBUTE).await {
		Err(RecallError::Driver(e)) => {
			tracing::debug!(%word, error = %e, "result list not readable yet");
			Ok(None)
		}
		other => other,
	})
	.await?
	.ok_or_else(|| RecallError::LookupTimeout { word: word.to_owned() })?;

	let candidates = parse_title(&title);
	if candidates.is_empty() {
		return Err(RecallError::Scrape(format!("no translations in title {title:?}")));
	}
	Ok(candidates)
}
