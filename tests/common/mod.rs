// tests/common/mod.rs
#![allow(dead_code)]

use std::{
	cell::{Cell, RefCell},
	collections::HashMap,
	path::Path,
};

use duo_recall::{
	RecallError,
	config::AppConfig,
	console::Console,
	driver::{Locator, PageDriver},
	scraper::{EMPTY_CROWN, LESSON_LIST, LESSONS, NOTES_BLOCK, NOTES_TERMS, NOTES_TOGGLE, SKILLS_TAB},
	translator::{RESULT_ITEMS, SEARCH_INPUT, TITLE_ATTRIBUTE},
};

#[derive(Clone, Debug, Default)]
pub struct FakeLesson {
	pub completed: bool,
	/// `None` when the notes block stays hidden
	pub notes: Option<Vec<&'static str>>,
	/// Clicking the lesson throws
	pub broken: bool,
}

impl FakeLesson {
	pub fn done(words: &[&'static str]) -> Self {
		Self {
			completed: true,
			notes: Some(words.to_vec()),
			broken: false,
		}
	}

	pub fn locked(words: &[&'static str]) -> Self {
		Self {
			completed: false,
			notes: Some(words.to_vec()),
			broken: false,
		}
	}
}

/// In-memory stand-in for the profile page and the dictionary page.
///
/// Lessons sit in one or more lesson lists, in document order. Locators are resolved the way a browser would resolve them: the nth match of the whole query, not the nth child of some parent.
#[derive(Default)]
pub struct FakeSite {
	pub has_skills_tab: bool,
	pub lists: Vec<Vec<FakeLesson>>,
	/// `navigate` fails
	pub offline: bool,
	/// word -> title attribute of its search result
	pub dictionary: HashMap<&'static str, &'static str>,
	/// How many more reads of the result list fail before it settles
	pub unsettled_reads: Cell<usize>,
	pub search: RefCell<String>,
	pub calls: RefCell<Vec<String>>,
}

impl FakeSite {
	pub fn profile(lessons: Vec<FakeLesson>) -> Self {
		Self::profile_lists(vec![lessons])
	}

	pub fn profile_lists(lists: Vec<Vec<FakeLesson>>) -> Self {
		Self {
			has_skills_tab: true,
			lists,
			..Self::default()
		}
	}

	pub fn dictionary(entries: &[(&'static str, &'static str)]) -> Self {
		Self {
			dictionary: entries.iter().copied().collect(),
			..Self::default()
		}
	}

	pub fn calls(&self) -> Vec<String> {
		self.calls.borrow().clone()
	}

	/// Words typed into the search box, in order
	pub fn searches(&self) -> Vec<String> {
		self.calls().iter().filter_map(|c| c.strip_prefix("fill ").map(str::to_owned)).collect()
	}

	fn record(&self, call: String) {
		self.calls.borrow_mut().push(call);
	}

	fn lessons(&self) -> impl Iterator<Item = &FakeLesson> {
		self.lists.iter().flatten()
	}

	/// The lesson a lesson-scoped locator points at, and the part of it addressed
	fn resolve_lesson(&self, target: &Locator) -> Option<(&FakeLesson, Option<&str>)> {
		if target.list != LESSONS {
			return None;
		}
		let index = target.nth.unwrap_or_else(|| panic!("lesson locator without an index: {target}"));
		let lesson = self.lessons().nth(index)?;
		Some((lesson, target.inner.as_deref()))
	}

	fn is(target: &Locator, selector: &str) -> bool {
		*target == Locator::css(selector)
	}
}

impl PageDriver for FakeSite {
	async fn navigate(&self, url: &str) -> Result<(), RecallError> {
		self.record(format!("navigate {url}"));
		match self.offline {
			true => Err(RecallError::Navigation(format!("Failed to open {url}: net::ERR_INTERNET_DISCONNECTED"))),
			false => Ok(()),
		}
	}

	async fn exists(&self, target: &Locator) -> Result<bool, RecallError> {
		if Self::is(target, SKILLS_TAB) || Self::is(target, LESSON_LIST) {
			return Ok(self.has_skills_tab);
		}
		if Self::is(target, SEARCH_INPUT) {
			return Ok(!self.dictionary.is_empty());
		}
		Ok(false)
	}

	async fn is_visible(&self, target: &Locator) -> Result<bool, RecallError> {
		Ok(match self.resolve_lesson(target) {
			Some((lesson, Some(EMPTY_CROWN))) => !lesson.completed,
			Some((lesson, Some(NOTES_BLOCK))) => lesson.notes.is_some(),
			Some((_, other)) => panic!("unexpected visibility check inside a lesson: {other:?}"),
			None => false,
		})
	}

	async fn count(&self, target: &Locator) -> Result<usize, RecallError> {
		assert!(Self::is(target, LESSONS), "counted {target}");
		Ok(self.lessons().count())
	}

	async fn click(&self, target: &Locator) -> Result<(), RecallError> {
		self.record(format!("click {target}"));
		match self.resolve_lesson(target) {
			Some((lesson, None)) if lesson.broken => Err(RecallError::Driver("element is detached".to_owned())),
			Some((_, None | Some(NOTES_TOGGLE))) => Ok(()),
			Some((_, other)) => panic!("unexpected click inside a lesson: {other:?}"),
			None if Self::is(target, SKILLS_TAB) => Ok(()),
			None => Err(RecallError::Driver(format!("Nothing to click at '{target}'"))),
		}
	}

	async fn read_text(&self, target: &Locator) -> Result<Vec<String>, RecallError> {
		let words = match self.resolve_lesson(target) {
			Some((lesson, Some(NOTES_TERMS))) => lesson.notes.clone().unwrap_or_default(),
			_ => Vec::new(),
		};
		Ok(words.into_iter().map(str::to_owned).collect())
	}

	async fn read_attribute(&self, target: &Locator, text: &str, name: &str) -> Result<Option<String>, RecallError> {
		assert!(Self::is(target, RESULT_ITEMS) && name == TITLE_ATTRIBUTE, "read {name} of {target}");
		let unsettled = self.unsettled_reads.get();
		if unsettled > 0 {
			self.unsettled_reads.set(unsettled - 1);
			return Err(RecallError::Driver("Failed to evaluate script: Execution context was destroyed".to_owned()));
		}
		if *self.search.borrow() != text {
			return Ok(None);
		}
		Ok(self.dictionary.get(text).map(|title| title.to_string()))
	}

	async fn fill(&self, target: &Locator, value: &str) -> Result<(), RecallError> {
		assert!(Self::is(target, SEARCH_INPUT), "filled {target}");
		self.record(format!("fill {value}"));
		*self.search.borrow_mut() = value.to_owned();
		Ok(())
	}

	async fn submit(&self, _target: &Locator) -> Result<(), RecallError> {
		Ok(())
	}
}

/// Collects everything said and answers prompts from queues
#[derive(Default)]
pub struct RecordingConsole {
	pub lines: Vec<String>,
	pub replies: Vec<String>,
	/// Answers to yes/no questions; an empty queue answers no
	pub confirms: Vec<bool>,
}

impl RecordingConsole {
	pub fn output(&self) -> String {
		self.lines.join("\n")
	}
}

impl Console for RecordingConsole {
	fn say(&mut self, line: &str) {
		self.lines.push(line.to_owned());
	}

	fn ask(&mut self, prompt: &str) -> String {
		self.lines.push(format!("{prompt}:"));
		if self.replies.is_empty() { String::new() } else { self.replies.remove(0) }
	}

	async fn confirm(&mut self, prompt: &str) -> bool {
		self.lines.push(format!("{prompt} [y/N]"));
		if self.confirms.is_empty() { false } else { self.confirms.remove(0) }
	}
}

/// Config whose caches live in `dir`, with short timeouts
pub fn config_in(dir: &Path) -> AppConfig {
	AppConfig {
		vocab_path: dir.join("my-vocab.json"),
		translations_path: dir.join("my-vocab-translated.json"),
		wait_timeout_ms: 50,
		lookup_timeout_ms: 50,
		..AppConfig::default()
	}
}
