//! Unified logging system
//!
//! Everything goes to stderr so `--export -` can stream JSON on stdout.

use colored::*;
use rand::RngExt;
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

const LOGO: &str = r#"
   ____           __     __         __
  / __/__ ___ ___/ /____/ /_ _____ / /____ ____
 / _// -_) -_) _  / __/ / // (_-</ __/ -_) __/
/_/  \__/\__/\_,_/\__/_/\_,_/___/\__/\__/_/    "#;

const SLOGANS: &[&str] = &[
	"Too many feeds, not enough coffee",
	"Headlines, sorted by vibes (and vectors)",
	"k-means, k-nots, k-whatever",
	"Your inbox wishes it looked this tidy",
	"Stop-words were harmed in the making of this report",
	"Tanimoto says hi",
	"Now with 100% fewer unread counters",
];

pub fn random_slogan() -> &'static str {
	let idx = rand::rng().random_range(0..SLOGANS.len());
	SLOGANS[idx]
}

pub fn print_logo() {
	eprintln!("{}", LOGO.bright_blue().bold());
	eprintln!("{}", random_slogan().dimmed().italic());
}

pub struct Log;

impl Log {
	pub fn set_verbose(enabled: bool) {
		VERBOSE.store(enabled, Ordering::Relaxed);
	}

	pub fn is_verbose() -> bool {
		VERBOSE.load(Ordering::Relaxed)
	}
}

pub fn info(msg: &str) {
	eprintln!("{} {}", "ℹ".bright_blue().bold(), msg.bright_white());
}

pub fn success(msg: &str) {
	eprintln!("{} {}", "✓".bright_green().bold(), msg.bright_white());
}

pub fn warn(msg: &str) {
	eprintln!("{} {}", "⚠".bright_yellow().bold(), msg.bright_white());
}

pub fn error(msg: &str) {
	eprintln!("{} {}", "✗".bright_red().bold(), msg.bright_white());
}

pub fn debug(msg: &str) {
	if Log::is_verbose() {
		eprintln!("{} {}", "⚙".bright_black().bold(), msg.dimmed());
	}
}

pub fn header(text: &str) {
	eprintln!("\n{}", text.bright_blue().bold());
}

/// Clickable file path (OSC 8 terminal hyperlink)
pub fn path_link(path: &std::path::Path, max_len: usize) -> String {
	let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

	let uri = if cfg!(windows) {
		let path_str = absolute.to_string_lossy();
		let cleaned = path_str.strip_prefix(r"\\?\").unwrap_or(&path_str);
		format!("file:///{}", cleaned.replace('\\', "/"))
	} else {
		format!("file://{}", absolute.display())
	};

	let filename = path
		.file_name()
		.and_then(|n| n.to_str())
		.unwrap_or("unknown");

	format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", uri, truncate_middle(filename, max_len))
}

/// Clickable URL, or the plain id when it is not a web link
pub fn url_link(id: &str, label: &str) -> String {
	if id.starts_with("http://") || id.starts_with("https://") {
		format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", id, label)
	} else {
		label.to_string()
	}
}

/// Shorten `text` to at most `max_len` characters by eliding its middle
pub fn truncate_middle(text: &str, max_len: usize) -> String {
	let len = text.chars().count();
	if len <= max_len || max_len < 8 {
		return text.to_string();
	}

	let head = max_len / 2;
	let tail = max_len - head - 3;
	let start: String = text.chars().take(head).collect();
	let end: String = text.chars().skip(len - tail).collect();
	format!("{}...{}", start, end)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn truncates_long_names_in_the_middle() {
		assert_eq!(truncate_middle("short", 40), "short");
		let cut = truncate_middle("a-very-long-feed-entry-title-that-goes-on", 20);
		assert_eq!(cut.chars().count(), 20);
		assert!(cut.starts_with("a-very-lon"));
		assert!(cut.contains("..."));
		assert!(cut.ends_with("es-on"));
	}

	#[test]
	fn only_web_ids_become_links() {
		assert_eq!(url_link("urn:uuid:1", "Title"), "Title");
		assert!(url_link("https://example.com", "Title").contains("https://example.com"));
	}

	#[test]
	fn slogan_comes_from_the_list() {
		assert!(SLOGANS.contains(&random_slogan()));
	}
}
