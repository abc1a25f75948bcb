//! One function per CLI command. Each reloads its state from disk and opens at most one browser session.

use rand::Rng;
use v_utils::log;

use crate::{
	RecallError, VocabList,
	config::AppConfig,
	console::Console,
	driver::{PageDriver, with_session},
	quiz, scraper, store,
	translator::{self, TranslationPlan},
};

/// Scrape the profile of `username`, overwrite the vocab cache, then fill in translations for new words.
pub async fn vocab_refresh<C: Console>(config: &AppConfig, username: Option<&str>, console: &mut C) -> Result<(), RecallError> {
	let username = require_username(username)?;

	#[cfg(feature = "xdg")]
	let session_id = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();

	with_session(config.headless, async |driver| {
		let refreshed = refresh_with(driver, config, Some(username), console).await;
		#[cfg(feature = "xdg")]
		if refreshed.is_err() {
			if let Err(snapshot_err) = driver.save_page_html(&session_id).await {
				v_utils::elog!("Failed to save page HTML: {snapshot_err}");
			}
		}
		refreshed
	})
	.await
}

/// [`vocab_refresh`] against an already open page.
///
/// The vocab cache is only written after a successful scrape, so a failed run leaves the previous one in place.
pub async fn refresh_with<D: PageDriver, C: Console>(driver: &D, config: &AppConfig, username: Option<&str>, console: &mut C) -> Result<(), RecallError> {
	let username = require_username(username)?;
	console.say(&format!("Starting vocabulary refresh for user: {username}..."));

	let outcome = scraper::scrape(driver, &config.profile_url(username), config.wait_timeout()).await?;
	log!("Scan stopped: {}", outcome.halt);
	tracing::debug!(words = %outcome.words, "scraped vocabulary");

	save_scraped(config, &outcome.words, console)?;
	console.say(&format!("Scraping complete. Total unique words saved: {}", outcome.words.len()));
	if !outcome.skipped.is_empty() {
		console.say(&format!("{} lesson(s) could not be read and were skipped.", outcome.skipped.len()));
	}

	if config.translate_after_scrape {
		let plan = TranslationPlan::for_vocab(&outcome.words, &config.translations_path)?;
		translate_plan(driver, plan, config, console).await?;
	}
	Ok(())
}

fn require_username(username: Option<&str>) -> Result<&str, RecallError> {
	username
		.map(str::trim)
		.filter(|u| !u.is_empty())
		.ok_or_else(|| RecallError::Config("Missing username. Pass it with --username <NAME>.".to_owned()))
}

fn save_scraped<C: Console>(config: &AppConfig, words: &VocabList, console: &mut C) -> Result<(), RecallError> {
	store::save_vocab(&config.vocab_path, words)?;
	console.say(&format!("Successfully saved vocabulary to '{}'", config.vocab_path.display()));
	Ok(())
}

/// Look up translations for cached words that have none. Opens no browser when nothing is missing.
pub async fn translate<C: Console>(config: &AppConfig, console: &mut C) -> Result<(), RecallError> {
	let plan = TranslationPlan::load(config)?;
	if plan.is_complete() {
		console.say("All words already have translations.");
		return Ok(());
	}
	with_session(config.headless, async |driver| translate_plan(driver, plan, config, console).await).await
}

/// Run `plan` against an already open page
pub async fn translate_plan<D: PageDriver, C: Console>(driver: &D, plan: TranslationPlan, config: &AppConfig, console: &mut C) -> Result<(), RecallError> {
	if plan.is_complete() {
		console.say("All words already have translations.");
		return Ok(());
	}
	let report = translator::run(driver, plan, config).await?;
	console.say(&format!(
		"Translated {} new word(s); {} could not be found. {} word(s) in '{}'.",
		report.translated.len(),
		report.failed.len(),
		report.translations.len(),
		config.translations_path.display()
	));
	Ok(())
}

/// Writing practice over the cached vocabulary
pub async fn write<C: Console, R: Rng + ?Sized>(config: &AppConfig, console: &mut C, rng: &mut R) -> Result<quiz::Score, RecallError> {
	console.say("Starting vocabulary writing practice...");

	let vocab = store::load_vocab(&config.vocab_path)?;
	if vocab.is_empty() {
		return Err(RecallError::EmptyVocab);
	}

	let translations = store::load_translations(&config.translations_path)?;
	if translations.is_none() {
		console.say(&format!("'{}' not found; answers will not be graded.", config.translations_path.display()));
	}
	let selection = quiz::select(&vocab, translations.as_ref());
	if selection.skipped > 0 {
		console.say(&format!("Skipping {} word(s) without a translation.", selection.skipped));
	}
	if selection.items.is_empty() {
		return Err(RecallError::NoTranslations {
			vocab_path: config.vocab_path.clone(),
		});
	}

	let score = quiz::run(selection.items, config.batch_size, console, rng).await;
	console.say("");
	console.say("Practice session ended.");
	console.say(&score.to_string());
	Ok(score)
}

pub fn speak<C: Console>(console: &mut C) {
	console.say("Starting vocabulary speaking practice... (FEATURE NOT YET IMPLEMENTED)");
	console.say("For now, try 'duo-recall write'.");
}
