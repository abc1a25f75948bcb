//! Browser capability used by the scraper and the translator.
//!
//! Both only talk to [`PageDriver`], so they can run against [`ChromeDriver`] or a scripted fake.

#[cfg(feature = "xdg")]
use std::path::PathBuf;
use std::{fmt, time::Duration};

use chromiumoxide::{
	Page,
	browser::{Browser, BrowserConfig},
};
use futures::StreamExt;
use serde::{Serialize, de::DeserializeOwned};
use tokio::{task::JoinHandle, time::Instant};
use v_utils::elog;
#[cfg(feature = "xdg")]
use v_utils::{log, xdg_state_dir};

use crate::RecallError;

pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Which elements an operation targets.
///
/// Resolution: every match of `list` in document order, or only the `nth` of them, then, if `inner` is set, every match of `inner` inside those.
/// Indexing goes through `querySelectorAll(list)`, so it is independent of how the matches are spread across parents.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Locator {
	pub list: String,
	pub nth: Option<usize>,
	pub inner: Option<String>,
}

impl Locator {
	pub fn css(selector: &str) -> Self {
		Self {
			list: selector.to_owned(),
			nth: None,
			inner: None,
		}
	}

	/// The `index`-th (0-based) match of `list`
	pub fn nth(list: &str, index: usize) -> Self {
		Self {
			nth: Some(index),
			..Self::css(list)
		}
	}

	/// Narrow to matches of `selector` inside the current target
	pub fn find(&self, selector: &str) -> Self {
		Self {
			inner: Some(selector.to_owned()),
			..self.clone()
		}
	}
}

impl fmt::Display for Locator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.list)?;
		if let Some(nth) = self.nth {
			write!(f, " #{nth}")?;
		}
		if let Some(inner) = &self.inner {
			write!(f, " >> {inner}")?;
		}
		Ok(())
	}
}

/// DOM operations on a single open page
#[allow(async_fn_in_trait)]
pub trait PageDriver {
	async fn navigate(&self, url: &str) -> Result<(), RecallError>;

	/// Whether anything matches right now
	async fn exists(&self, target: &Locator) -> Result<bool, RecallError>;

	/// Whether the first match is rendered (not `display: none`, not hidden, has a box)
	async fn is_visible(&self, target: &Locator) -> Result<bool, RecallError>;

	async fn count(&self, target: &Locator) -> Result<usize, RecallError>;

	/// Click the first match; errors if nothing matches
	async fn click(&self, target: &Locator) -> Result<(), RecallError>;

	/// Rendered text of every match, in document order
	async fn read_text(&self, target: &Locator) -> Result<Vec<String>, RecallError>;

	/// Attribute `name` of the first match whose trimmed text equals `text`
	async fn read_attribute(&self, target: &Locator, text: &str, name: &str) -> Result<Option<String>, RecallError>;

	/// Replace the value of an input field
	async fn fill(&self, target: &Locator, value: &str) -> Result<(), RecallError>;

	/// Submit the form the field belongs to, or press Enter in it
	async fn submit(&self, target: &Locator) -> Result<(), RecallError>;

	async fn wait_for(&self, target: &Locator, timeout: Duration) -> Result<(), RecallError> {
		poll(timeout, async || Ok(self.exists(target).await?.then_some(())))
			.await?
			.ok_or_else(|| RecallError::Timeout {
				selector: target.to_string(),
				after: timeout,
			})
	}
}

/// Run `check` every [`POLL_INTERVAL`] until it yields a value or `timeout` passes.
/// Checks at least once; an error from `check` ends the wait immediately.
pub async fn poll<T>(timeout: Duration, mut check: impl AsyncFnMut() -> Result<Option<T>, RecallError>) -> Result<Option<T>, RecallError> {
	let deadline = Instant::now() + timeout;
	loop {
		if let Some(found) = check().await? {
			return Ok(Some(found));
		}
		if Instant::now() >= deadline {
			return Ok(None);
		}
		tokio::time::sleep(POLL_INTERVAL).await;
	}
}

/// JS function resolving a serialized [`Locator`] into an array of elements
const RESOLVE_JS: &str = r#"
	function resolve(loc) {
		let roots = Array.from(document.querySelectorAll(loc.list));
		if (loc.nth !== null) roots = roots[loc.nth] ? [roots[loc.nth]] : [];
		if (loc.inner === null) return roots;
		return roots.flatMap(root => Array.from(root.querySelectorAll(loc.inner)));
	}
"#;

/// [`PageDriver`] over a live chromiumoxide page
pub struct ChromeDriver {
	page: Page,
}

impl ChromeDriver {
	pub fn new(page: Page) -> Self {
		Self { page }
	}

	async fn eval<T: DeserializeOwned>(&self, script: String) -> Result<T, RecallError> {
		let result = self.page.evaluate(script).await.map_err(|e| RecallError::Driver(format!("Failed to evaluate script: {e}")))?;
		let value = result.value().cloned().unwrap_or(serde_json::Value::Null);
		serde_json::from_value(value).map_err(|e| RecallError::Driver(format!("Unexpected script result: {e}")))
	}

	/// Evaluate `body` with `els` bound to the resolved elements of `target`
	async fn eval_on<T: DeserializeOwned>(&self, target: &Locator, body: &str) -> Result<T, RecallError> {
		self.eval(script_on(target, body)).await
	}

	/// Save the current page's HTML to disk for debugging
	#[cfg(feature = "xdg")]
	pub async fn save_page_html(&self, session_id: &str) -> Result<PathBuf, RecallError> {
		let html_dir = xdg_state_dir!("persist_htmls").join(session_id);
		std::fs::create_dir_all(&html_dir).map_err(|e| RecallError::io(&html_dir, e))?;

		let url = self.page.url().await.ok().flatten().unwrap_or_default();
		let label: String = url
			.replace("https://", "")
			.replace("http://", "")
			.chars()
			.map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
			.collect();
		let html: String = self.eval("document.documentElement.outerHTML".to_owned()).await?;

		let filepath = html_dir.join(format!("{}_{label}.html", chrono::Local::now().format("%H%M%S")));
		std::fs::write(&filepath, html).map_err(|e| RecallError::io(&filepath, e))?;

		log!("Saved page HTML to: {}", filepath.display());
		Ok(filepath)
	}
}

/// JS literal for any serializable value
fn js<T: Serialize + ?Sized>(value: &T) -> String {
	serde_json::to_value(value).unwrap_or(serde_json::Value::Null).to_string()
}

fn script_on(target: &Locator, body: &str) -> String {
	format!(
		r#"
		(function() {{
			{RESOLVE_JS}
			const els = resolve({});
			{body}
		}})()
		"#,
		js(target)
	)
}

impl PageDriver for ChromeDriver {
	async fn navigate(&self, url: &str) -> Result<(), RecallError> {
		self.page.goto(url).await.map_err(|e| RecallError::Navigation(format!("Failed to open {url}: {e}")))?;
		Ok(())
	}

	async fn exists(&self, target: &Locator) -> Result<bool, RecallError> {
		self.eval_on(target, "return els.length > 0;").await
	}

	async fn is_visible(&self, target: &Locator) -> Result<bool, RecallError> {
		self.eval_on(
			target,
			r#"
			const el = els[0];
			if (!el) return false;
			const style = window.getComputedStyle(el);
			return style.display !== 'none' && style.visibility !== 'hidden' && el.getClientRects().length > 0;
			"#,
		)
		.await
	}

	async fn count(&self, target: &Locator) -> Result<usize, RecallError> {
		self.eval_on(target, "return els.length;").await
	}

	async fn click(&self, target: &Locator) -> Result<(), RecallError> {
		match self.eval_on::<bool>(target, "if (!els[0]) return false; els[0].click(); return true;").await? {
			true => Ok(()),
			false => Err(RecallError::Driver(format!("Nothing to click at '{target}'"))),
		}
	}

	async fn read_text(&self, target: &Locator) -> Result<Vec<String>, RecallError> {
		self.eval_on(target, "return els.map(el => el.innerText || el.textContent || '');").await
	}

	async fn read_attribute(&self, target: &Locator, text: &str, name: &str) -> Result<Option<String>, RecallError> {
		let body = format!(
			r#"
			const wanted = {};
			const el = els.find(el => (el.innerText || el.textContent || '').trim() === wanted);
			return el ? el.getAttribute({}) : null;
			"#,
			js(text),
			js(name)
		);
		self.eval_on(target, &body).await
	}

	async fn fill(&self, target: &Locator, value: &str) -> Result<(), RecallError> {
		let body = format!(
			r#"
			const input = els[0];
			if (!input) return false;
			input.focus();
			input.value = {};
			input.dispatchEvent(new Event('input', {{ bubbles: true }}));
			input.dispatchEvent(new Event('change', {{ bubbles: true }}));
			return true;
			"#,
			js(value)
		);
		match self.eval_on::<bool>(target, &body).await? {
			true => Ok(()),
			false => Err(RecallError::Driver(format!("No input field at '{target}'"))),
		}
	}

	async fn submit(&self, target: &Locator) -> Result<(), RecallError> {
		let body = r#"
			const input = els[0];
			if (!input) return false;
			input.dispatchEvent(new KeyboardEvent('keydown', { key: 'Enter', keyCode: 13, bubbles: true }));
			input.dispatchEvent(new KeyboardEvent('keyup', { key: 'Enter', keyCode: 13, bubbles: true }));
			const form = input.closest('form');
			if (form) {
				if (form.requestSubmit) form.requestSubmit(); else form.submit();
			}
			return true;
		"#;
		match self.eval_on::<bool>(target, body).await? {
			true => Ok(()),
			false => Err(RecallError::Driver(format!("No input field at '{target}'"))),
		}
	}
}

/// A launched Chromium with one open page
pub struct BrowserSession {
	browser: Browser,
	handler: JoinHandle<()>,
	driver: ChromeDriver,
}

impl BrowserSession {
	pub async fn launch(headless: bool) -> Result<Self, RecallError> {
		let builder = BrowserConfig::builder();
		let builder = if headless { builder } else { builder.with_head() };
		let config = builder.build().map_err(|e| RecallError::Driver(format!("Failed to build browser config: {e}")))?;

		let (browser, mut handler) = Browser::launch(config).await.map_err(|e| RecallError::Driver(format!("Failed to launch browser: {e}")))?;

		// The CDP event stream has to be drained or the browser stalls
		let handler = tokio::spawn(async move { while let Some(_event) = handler.next().await {} });

		let page = browser.new_page("about:blank").await.map_err(|e| RecallError::Driver(format!("Failed to create new page: {e}")))?;
		tracing::debug!(headless, "browser launched");

		Ok(Self {
			browser,
			handler,
			driver: ChromeDriver::new(page),
		})
	}

	pub fn driver(&self) -> &ChromeDriver {
		&self.driver
	}

	pub async fn close(mut self) -> Result<(), RecallError> {
		let closed = self.browser.close().await.map(drop).map_err(|e| RecallError::Driver(format!("Failed to close browser: {e}")));
		self.handler.abort();
		closed
	}
}

/// Launch a browser, run `f` against its page, and close the browser whether or not `f` succeeded.
pub async fn with_session<T>(headless: bool, f: impl AsyncFnOnce(&ChromeDriver) -> Result<T, RecallError>) -> Result<T, RecallError> {
	let session = BrowserSession::launch(headless).await?;
	let result = f(session.driver()).await;
	if let Err(e) = session.close().await {
		elog!("{e}");
	}
	result
}
