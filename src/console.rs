use std::io::{BufRead, Write};

/// Where user-facing lines go and where answers come from.
#[allow(async_fn_in_trait)]
pub trait Console {
	fn say(&mut self, line: &str);
	/// Show `prompt` and read one line of input. End of input reads as an empty answer.
	fn ask(&mut self, prompt: &str) -> String;
	/// Yes/no question; anything but an explicit yes is a no.
	async fn confirm(&mut self, prompt: &str) -> bool;
}

/// stdout / stdin
#[derive(Debug, Default)]
pub struct Terminal;

impl Console for Terminal {
	fn say(&mut self, line: &str) {
		println!("{line}");
	}

	fn ask(&mut self, prompt: &str) -> String {
		print!("{prompt}: ");
		if let Err(e) = std::io::stdout().flush() {
			tracing::warn!("failed to flush prompt: {e}");
		}
		let mut answer = String::new();
		if let Err(e) = std::io::stdin().lock().read_line(&mut answer) {
			tracing::warn!("failed to read answer: {e}");
			answer.clear();
		}
		answer.trim_end_matches(['\r', '\n']).to_owned()
	}

	async fn confirm(&mut self, prompt: &str) -> bool {
		v_utils::io::confirm(prompt).await
	}
}
