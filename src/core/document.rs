//! Feed entries as plain text documents

use serde::Serialize;

/// A single feed entry, already stripped of markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
	/// Unique identifier (entry guid, Atom id or link)
	pub id: String,
	pub title: String,
	pub body: String,
}

impl Document {
	pub fn new(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			title: title.into(),
			body: body.into(),
		}
	}

	/// Text fed to the indexer: title and body joined by a space
	pub fn text(&self) -> String {
		format!("{} {}", self.title, self.body)
	}

	/// True when the identifier can be rendered as a hyperlink
	pub fn is_link(&self) -> bool {
		self.id.starts_with("http://") || self.id.starts_with("https://")
	}
}
