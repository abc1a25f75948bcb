use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::Result;
use duo_recall::{
	RecallError, commands,
	config::AppConfig,
	console::{Console, Terminal},
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "duo-recall")]
#[command(about = "A command-line tool for Duolingo users to practice vocabulary.", long_about = None)]
struct Cli {
	/// JSON config file; flags given here take precedence over it
	#[arg(long, global = true)]
	config: Option<PathBuf>,

	/// Vocabulary cache [default: my-vocab.json]
	#[arg(long, global = true)]
	vocab_file: Option<PathBuf>,

	/// Translation cache [default: my-vocab-translated.json]
	#[arg(long, global = true)]
	translations_file: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Refreshes the local vocabulary list by scraping duome.eu.
	#[command(name = "vocab-refresh", disable_help_flag = true)]
	VocabRefresh {
		/// Your Duolingo username
		#[arg(short, long)]
		username: Option<String>,

		/// Run without a browser window
		#[arg(short = 'h', long)]
		headless: bool,

		/// Only scrape; skip looking up translations for new words
		#[arg(long)]
		no_translate: bool,

		/// Print help
		#[arg(long, action = ArgAction::Help)]
		help: Option<bool>,
	},
	/// Looks up translations for cached words that have none yet.
	Translate {
		/// Run without a browser window
		#[arg(long)]
		headless: bool,
	},
	/// Practice writing vocabulary by translating words.
	Write {
		/// Questions per batch before asking whether to continue
		#[arg(short, long)]
		batch_size: Option<usize>,
	},
	/// Practice speaking vocabulary by listening and responding.
	Speak,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.with_writer(std::io::stderr)
		.init();

	let cli = Cli::parse();
	let mut console = Terminal;

	match run(cli, &mut console).await {
		0 => Ok(()),
		code => std::process::exit(code),
	}
}

/// Run the parsed command and turn its outcome into an exit code. A failure is reported as exactly one line.
async fn run<C: Console>(cli: Cli, console: &mut C) -> i32 {
	match dispatch(cli, console).await {
		Ok(()) => 0,
		Err(e) => {
			tracing::debug!(error = ?e, "command failed");
			console.say(&e.to_string());
			1
		}
	}
}

async fn dispatch<C: Console>(cli: Cli, console: &mut C) -> Result<(), RecallError> {
	let mut config = match &cli.config {
		Some(path) => AppConfig::load(path)?,
		None => AppConfig::default(),
	};
	if let Some(path) = cli.vocab_file {
		config.vocab_path = path;
	}
	if let Some(path) = cli.translations_file {
		config.translations_path = path;
	}

	match cli.command {
		Command::VocabRefresh { username, headless, no_translate, .. } => {
			config.headless |= headless;
			config.translate_after_scrape &= !no_translate;
			commands::vocab_refresh(&config, username.as_deref(), console).await
		}
		Command::Translate { headless } => {
			config.headless |= headless;
			commands::translate(&config, console).await
		}
		Command::Write { batch_size } => {
			if let Some(batch_size) = batch_size {
				if batch_size == 0 {
					return Err(RecallError::Config("--batch-size must be at least 1".to_owned()));
				}
				config.batch_size = batch_size;
			}
			commands::write(&config, console, &mut rand::rng()).await.map(drop)
		}
		Command::Speak => {
			commands::speak(console);
			Ok(())
		}
	}
}
