//! Collect vocabulary from the "Skills" tab of a duome.eu profile.
//!
//! Lessons are listed in progression order. Every lesson before the first incomplete one is done, so the scan stops there.

use std::{fmt, time::Duration};

use v_utils::{elog, log};

use crate::{
	RecallError, VocabList,
	driver::{Locator, PageDriver},
};

pub const SKILLS_TAB: &str = r#"label[for="tabSkills"]"#;
pub const LESSON_LIST: &str = "ul.paddedSkills";
pub const LESSONS: &str = "ul.paddedSkills > li";

pub const NOTES_TOGGLE: &str = r#"span[title="Tips and notes"]"#;
pub const EMPTY_CROWN: &str = ".crown.empty";
pub const NOTES_BLOCK: &str = "blockquote";
pub const NOTES_TERMS: &str = "blockquote b";

/// The `index`-th (0-based) entry of every lesson list on the page, in document order
pub fn lesson(index: usize) -> Locator {
	Locator::nth(LESSONS, index)
}

/// Why the lesson scan stopped. Lesson indices are 0-based.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HaltReason {
	/// The lesson still shows an empty crown
	LessonNotCompleted { lesson: usize },
	/// The lesson expanded but has no visible notes
	NotesHidden { lesson: usize },
	/// Every lesson was read
	EndOfList,
}

impl fmt::Display for HaltReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			HaltReason::LessonNotCompleted { lesson } => write!(f, "lesson {} is not completed yet", lesson + 1),
			HaltReason::NotesHidden { lesson } => write!(f, "lesson {} has no visible notes", lesson + 1),
			HaltReason::EndOfList => write!(f, "reached the end of the lesson list"),
		}
	}
}

#[derive(Clone, Copy, Debug)]
enum ScanState {
	Scanning { next: usize },
	Halted(HaltReason),
}

enum LessonScan {
	Terms(Vec<String>),
	Halt(HaltReason),
}

#[derive(Clone, Debug)]
pub struct ScrapeOutcome {
	pub words: VocabList,
	pub halt: HaltReason,
	/// Lessons whose processing failed and were skipped
	pub skipped: Vec<usize>,
}

/// Open `profile_url`, switch to the skills tab and read words from completed lessons.
///
/// Page-level problems fail the whole scrape. A failure inside one lesson is logged and that lesson skipped.
pub async fn scrape<D: PageDriver>(driver: &D, profile_url: &str, timeout: Duration) -> Result<ScrapeOutcome, RecallError> {
	log!("Navigating to {profile_url}");
	driver.navigate(profile_url).await?;
	let skills_tab = Locator::css(SKILLS_TAB);
	driver
		.wait_for(&skills_tab, timeout)
		.await
		.map_err(|e| RecallError::Navigation(format!("{profile_url} does not look like a profile page: {e}")))?;

	log!("Clicking 'Skills' tab...");
	driver.click(&skills_tab).await.map_err(|e| RecallError::Scrape(e.to_string()))?;
	driver.wait_for(&Locator::css(LESSON_LIST), timeout).await.map_err(|e| RecallError::Scrape(format!("lesson list never appeared: {e}")))?;

	let total = driver.count(&Locator::css(LESSONS)).await.map_err(|e| RecallError::Scrape(e.to_string()))?;
	tracing::info!(total, "lessons listed");

	let mut words = VocabList::default();
	let mut skipped = Vec::new();
	let mut state = ScanState::Scanning { next: 0 };
	let halt = loop {
		state = match state {
			ScanState::Halted(reason) => break reason,
			ScanState::Scanning { next } if next >= total => ScanState::Halted(HaltReason::EndOfList),
			ScanState::Scanning { next } => match scan_lesson(driver, next).await {
				Ok(LessonScan::Terms(terms)) => {
					let added = words.extend(&terms);
					tracing::debug!(lesson = next, found = terms.len(), added, "lesson read");
					log!("Found {} words from a completed lesson.", words.len());
					ScanState::Scanning { next: next + 1 }
				}
				Ok(LessonScan::Halt(reason)) => ScanState::Halted(reason),
				Err(e) => {
					elog!("Could not process lesson {}. Skipping... ({e})", next + 1);
					skipped.push(next);
					ScanState::Scanning { next: next + 1 }
				}
			},
		};
	};
	tracing::info!(%halt, words = words.len(), skipped = skipped.len(), "scan halted");

	Ok(ScrapeOutcome { words, halt, skipped })
}

async fn scan_lesson<D: PageDriver>(driver: &D, index: usize) -> Result<LessonScan, RecallError> {
	let entry = lesson(index);

	driver.click(&entry.find(NOTES_TOGGLE)).await?;
	if driver.is_visible(&entry.find(EMPTY_CROWN)).await? {
		return Ok(LessonScan::Halt(HaltReason::LessonNotCompleted { lesson: index }));
	}

	driver.click(&entry).await?;
	if !driver.is_visible(&entry.find(NOTES_BLOCK)).await? {
		return Ok(LessonScan::Halt(HaltReason::NotesHidden { lesson: index }));
	}

	let terms = driver.read_text(&entry.find(NOTES_TERMS)).await?;
	Ok(LessonScan::Terms(terms))
}
