//! Interactive writing practice: translate Spanish words into English.

use std::fmt;

use rand::{Rng, seq::SliceRandom};

use crate::{TranslationMap, VocabList, console::Console};

/// One question. With no known translations the answer can only be counted as attempted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QuizItem {
	pub word: String,
	pub answers: Option<Vec<String>>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Verdict {
	Correct,
	Incorrect { expected: Vec<String> },
	/// Nothing to grade against, but the user answered
	Attempted,
	/// Nothing to grade against and nothing answered
	Unverifiable,
}

impl Verdict {
	pub fn counts_as_correct(&self) -> bool {
		matches!(self, Verdict::Correct | Verdict::Attempted)
	}
}

/// Case-folded, trimmed comparison of `input` against the known translations
pub fn grade(input: &str, answers: Option<&[String]>) -> Verdict {
	let input = input.trim().to_lowercase();
	match answers {
		Some(answers) if answers.iter().any(|a| a.trim().to_lowercase() == input) && !input.is_empty() => Verdict::Correct,
		Some(answers) => Verdict::Incorrect { expected: answers.to_vec() },
		None if input.is_empty() => Verdict::Unverifiable,
		None => Verdict::Attempted,
	}
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Score {
	pub correct: usize,
	pub total: usize,
}

impl Score {
	pub fn percentage(&self) -> f64 {
		match self.total {
			0 => 0.0,
			total => self.correct as f64 * 100.0 / total as f64,
		}
	}
}

impl fmt::Display for Score {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "You answered {} out of {} words correctly ({:.0}%).", self.correct, self.total, self.percentage())
	}
}

/// Quizzable items and how many vocab words were left out for lack of a translation
#[derive(Clone, Debug, Default)]
pub struct Selection {
	pub items: Vec<QuizItem>,
	pub skipped: usize,
}

/// Words to ask, in vocab order.
///
/// With a translation cache only translated words are asked. Without one every word is asked ungraded.
pub fn select(vocab: &VocabList, translations: Option<&TranslationMap>) -> Selection {
	let Some(translations) = translations else {
		let items = vocab.iter().map(|word| QuizItem { word: word.to_owned(), answers: None }).collect();
		return Selection { items, skipped: 0 };
	};

	let mut selection = Selection::default();
	for word in vocab.iter() {
		match translations.get(word).filter(|answers| !answers.is_empty()) {
			Some(answers) => selection.items.push(QuizItem {
				word: word.to_owned(),
				answers: Some(answers.clone()),
			}),
			None => selection.skipped += 1,
		}
	}
	selection
}

#[derive(Clone, Copy, Debug)]
enum Phase {
	Asking(usize),
	ContinuePrompt(usize),
	Ended,
}

/// Ask every item in a once-shuffled order, `batch_size` at a time, offering to stop after each batch.
pub async fn run<C: Console, R: Rng + ?Sized>(mut items: Vec<QuizItem>, batch_size: usize, console: &mut C, rng: &mut R) -> Score {
	items.shuffle(rng);
	let batch_size = batch_size.max(1);
	let mut score = Score::default();
	let mut phase = if items.is_empty() { Phase::Ended } else { Phase::Asking(0) };

	loop {
		phase = match phase {
			Phase::Ended => break,
			Phase::Asking(i) => {
				let item = &items[i];
				let reply = console.ask(&format!("Translate '{}'", item.word));
				let verdict = grade(&reply, item.answers.as_deref());
				score.total += 1;
				if verdict.counts_as_correct() {
					score.correct += 1;
				}
				report(console, &verdict);

				let next = i + 1;
				if next == items.len() {
					Phase::Ended
				} else if next % batch_size == 0 {
					Phase::ContinuePrompt(next)
				} else {
					Phase::Asking(next)
				}
			}
			Phase::ContinuePrompt(next) => {
				console.say(&format!("{score}"));
				match console.confirm("Continue?").await {
					true => Phase::Asking(next),
					false => Phase::Ended,
				}
			}
		};
	}

	tracing::info!(correct = score.correct, total = score.total, "quiz finished");
	score
}

fn report<C: Console>(console: &mut C, verdict: &Verdict) {
	match verdict {
		Verdict::Correct => console.say("Correct!"),
		Verdict::Incorrect { expected } => console.say(&format!("Not quite. Accepted: {}", expected.join(", "))),
		Verdict::Attempted => console.say("Good attempt!"),
		Verdict::Unverifiable => console.say("Cannot verify. The correct translation is unknown."),
	}
}
