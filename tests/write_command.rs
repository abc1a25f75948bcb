// tests/write_command.rs
mod common;

use common::{RecordingConsole, config_in};
use duo_recall::{RecallError, TranslationMap, VocabList, commands, store};
use rand::{SeedableRng, rngs::StdRng};

#[tokio::test]
async fn missing_vocab_cache_fails_with_its_name() {
	let dir = tempfile::tempdir().unwrap();
	let config = config_in(dir.path());
	let mut console = RecordingConsole::default();

	let err = commands::write(&config, &mut console, &mut StdRng::seed_from_u64(0)).await.unwrap_err();

	assert!(matches!(err, RecallError::CacheMissing { .. }));
	let msg = err.to_string();
	assert!(msg.contains("my-vocab.json") && msg.contains("not found"), "{msg}");
}

#[tokio::test]
async fn empty_vocab_is_fatal() {
	let dir = tempfile::tempdir().unwrap();
	let config = config_in(dir.path());
	store::save_vocab(&config.vocab_path, &VocabList::default()).unwrap();

	let err = commands::write(&config, &mut RecordingConsole::default(), &mut StdRng::seed_from_u64(0)).await.unwrap_err();
	assert!(matches!(err, RecallError::EmptyVocab));
}

#[tokio::test]
async fn graded_session_skips_untranslated_words() {
	let dir = tempfile::tempdir().unwrap();
	let config = config_in(dir.path());
	store::save_vocab(&config.vocab_path, &["casa", "perro"].into_iter().collect()).unwrap();
	let mut map = TranslationMap::new();
	map.insert("casa".to_owned(), vec!["house".to_owned()]);
	store::save_translations(&config.translations_path, &map).unwrap();

	let mut console = RecordingConsole {
		replies: vec![" House ".to_owned()],
		..Default::default()
	};
	let score = commands::write(&config, &mut console, &mut StdRng::seed_from_u64(0)).await.unwrap();

	assert_eq!((score.correct, score.total), (1, 1));
	let out = console.output();
	assert!(out.contains("Skipping 1 word(s)"), "{out}");
	assert!(!out.contains("perro"), "{out}");
	assert!(out.contains("Practice session ended."));
}

#[tokio::test]
async fn no_translation_cache_runs_ungraded() {
	let dir = tempfile::tempdir().unwrap();
	let config = config_in(dir.path());
	store::save_vocab(&config.vocab_path, &["casa", "perro"].into_iter().collect()).unwrap();

	let mut console = RecordingConsole {
		replies: vec!["house".to_owned(), "".to_owned()],
		..Default::default()
	};
	let score = commands::write(&config, &mut console, &mut StdRng::seed_from_u64(0)).await.unwrap();

	assert_eq!((score.correct, score.total), (1, 2));
	let out = console.output();
	assert!(out.contains("Good attempt!"));
	assert!(out.contains("Cannot verify"));
}

#[tokio::test]
async fn nothing_translated_is_fatal() {
	let dir = tempfile::tempdir().unwrap();
	let config = config_in(dir.path());
	store::save_vocab(&config.vocab_path, &["casa"].into_iter().collect()).unwrap();
	store::save_translations(&config.translations_path, &TranslationMap::new()).unwrap();

	let err = commands::write(&config, &mut RecordingConsole::default(), &mut StdRng::seed_from_u64(0)).await.unwrap_err();
	assert!(matches!(err, RecallError::NoTranslations { .. }));
}

#[tokio::test]
async fn declining_to_continue_ends_after_one_batch() {
	let dir = tempfile::tempdir().unwrap();
	let config = duo_recall::config::AppConfig {
		batch_size: 2,
		..config_in(dir.path())
	};
	store::save_vocab(&config.vocab_path, &["uno", "dos", "tres"].into_iter().collect()).unwrap();

	let mut console = RecordingConsole {
		confirms: vec![false],
		..Default::default()
	};
	let score = commands::write(&config, &mut console, &mut StdRng::seed_from_u64(0)).await.unwrap();

	assert_eq!(score.total, 2);
	assert_eq!(console.lines.iter().filter(|l| l.as_str() == "Continue? [y/N]").count(), 1);
	assert!(console.output().ends_with("You answered 0 out of 2 words correctly (0%)."), "{}", console.output());
}

#[test]
fn speak_is_a_placeholder() {
	let mut console = RecordingConsole::default();
	commands::speak(&mut console);
	assert!(console.output().contains("NOT YET IMPLEMENTED"));
}
