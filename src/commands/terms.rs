//! Terms command - show what the indexer keeps of a text

use std::io::{self, IsTerminal, Read};

use anyhow::{bail, Context, Result};
use colored::*;

use crate::processing::index;
use crate::ui;

pub fn run(text: Option<&str>, lowercase: bool, limit: usize) -> Result<()> {
	let text = match text {
		Some(text) => text.to_string(),
		None => read_stdin()?,
	};

	let text = if lowercase { text.to_lowercase() } else { text };
	let vector = index(&text);

	if vector.is_empty() {
		ui::warn("No terms left after filtering");
		return Ok(());
	}

	ui::debug(&format!(
		"{} distinct terms, {} occurrences",
		vector.len(),
		vector.iter().map(|(_, count)| count).sum::<f64>()
	));

	for (term, count) in vector.top_terms(limit) {
		println!("{}\t{}", count, term);
	}

	if vector.len() > limit {
		eprintln!(
			"{}",
			format!("... and {} more", vector.len() - limit).dimmed()
		);
	}

	Ok(())
}

fn read_stdin() -> Result<String> {
	let mut stdin = io::stdin();
	if stdin.is_terminal() {
		bail!("No text given (pass TEXT or pipe it on stdin)");
	}

	let mut text = String::new();
	stdin.read_to_string(&mut text).context("Failed to read stdin")?;
	Ok(text)
}
