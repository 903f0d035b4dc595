//! Feed lists and locally saved RSS/Atom feeds

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use walkdir::WalkDir;

use crate::config::FEED_EXTENSIONS;
use crate::core::Document;
use crate::processing::tokenize::clean_markup;
use crate::ui;

/// Outcome of reading every feed named by a list
#[derive(Debug, Default)]
pub struct FeedLoad {
	pub documents: BTreeMap<String, Document>,
	pub feeds_parsed: usize,
	pub articles_parsed: usize,
	/// Entries that could not be read, with the reason
	pub skipped: Vec<(String, String)>,
}

/// Read a feed list: one entry per line, blank lines and `#` comments ignored
pub fn read_feed_list(path: &Path) -> Result<Vec<String>> {
	let content = fs::read_to_string(path)
		.with_context(|| format!("Failed to read feed list {}", path.display()))?;

	Ok(content
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty() && !line.starts_with('#'))
		.map(str::to_string)
		.collect())
}

/// Expand list entries into feed files; directories are walked recursively
pub fn collect_feed_files(entries: &[String], base: &Path) -> (Vec<PathBuf>, Vec<(String, String)>) {
	let mut files = Vec::new();
	let mut skipped = Vec::new();
	let mut seen = HashSet::new();

	for entry in entries {
		if entry.starts_with("http://") || entry.starts_with("https://") {
			skipped.push((entry.clone(), "remote feeds must be saved locally first".to_string()));
			continue;
		}

		let path = if Path::new(entry).is_absolute() { PathBuf::from(entry) } else { base.join(entry) };

		if path.is_file() {
			if seen.insert(path.clone()) {
				files.push(path);
			}
		} else if path.is_dir() {
			for found in WalkDir::new(&path)
				.sort_by_file_name()
				.into_iter()
				.filter_map(|e| e.ok())
				.filter(|e| e.file_type().is_file() && is_feed_file(e.path()))
			{
				let found = found.path().to_path_buf();
				if seen.insert(found.clone()) {
					files.push(found);
				}
			}
		} else {
			skipped.push((entry.clone(), "not found".to_string()));
		}
	}

	(files, skipped)
}

fn is_feed_file(path: &Path) -> bool {
	path.extension()
		.and_then(|e| e.to_str())
		.map(|ext| FEED_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)))
		.unwrap_or(false)
}

/// Load every feed named in the list at `list_path`.
///
/// Relative entries resolve against the list's directory. Unreadable feeds
/// are reported and skipped; a later entry with an existing id replaces it.
pub fn load_feeds(list_path: &Path) -> Result<FeedLoad> {
	let entries = read_feed_list(list_path)?;
	let base = list_path.parent().unwrap_or(Path::new(""));
	let (files, skipped) = collect_feed_files(&entries, base);

	let mut load = FeedLoad { skipped, ..FeedLoad::default() };

	for file in files {
		ui::debug(&format!("Parsing {}", file.display()));

		let xml = match fs::read_to_string(&file) {
			Ok(xml) => xml,
			Err(e) => {
				load.skipped.push((file.display().to_string(), e.to_string()));
				continue;
			}
		};

		let documents = match parse_feed(&xml) {
			Ok(documents) => documents,
			Err(e) => {
				load.skipped.push((file.display().to_string(), format!("{:#}", e)));
				continue;
			}
		};
		ui::debug(&format!("{} articles parsed from {}", documents.len(), file.display()));

		load.feeds_parsed += 1;
		load.articles_parsed += documents.len();
		for document in documents {
			load.documents.insert(document.id.clone(), document);
		}
	}

	Ok(load)
}

/// Load documents from a JSON map of `id → [title, body]`
pub fn load_documents_json(path: &Path) -> Result<BTreeMap<String, Document>> {
	let content = fs::read_to_string(path)
		.with_context(|| format!("Failed to read documents file {}", path.display()))?;
	let raw: BTreeMap<String, (String, String)> =
		serde_json::from_str(&content).context("Failed to parse documents file")?;

	Ok(raw
		.into_iter()
		.map(|(id, (title, body))| {
			let document = Document::new(id.clone(), clean_markup(&title).trim(), clean_markup(&body).trim());
			(id, document)
		})
		.collect())
}

/// Parsed feed document; the root element may be `<rss>`, `<rdf:RDF>` or `<feed>`
#[derive(Debug, Deserialize)]
struct FeedXml {
	#[serde(default)]
	channel: Option<Channel>,
	/// RSS 1.0 keeps its items next to the channel
	#[serde(rename = "item", default)]
	items: Vec<Entry>,
	#[serde(rename = "entry", default)]
	entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Channel {
	#[serde(rename = "item", default)]
	items: Vec<Entry>,
}

/// RSS `<item>` or Atom `<entry>`
#[derive(Debug, Deserialize)]
struct Entry {
	#[serde(rename = "guid", default)]
	guid: Vec<Text>,
	#[serde(rename = "id", default)]
	id: Vec<Text>,
	#[serde(rename = "link", default)]
	links: Vec<Link>,
	#[serde(rename = "title", default)]
	title: Vec<Text>,
	#[serde(rename = "description", default)]
	description: Vec<Text>,
	#[serde(rename = "summary", default)]
	summary: Vec<Text>,
	#[serde(rename = "content", default)]
	content: Vec<Text>,
	#[serde(rename = "content:encoded", default)]
	encoded: Vec<Text>,
}

#[derive(Debug, Deserialize)]
struct Text {
	#[serde(rename = "$text", default)]
	value: String,
}

/// RSS links carry the URL as text, Atom links in `href`
#[derive(Debug, Deserialize)]
struct Link {
	#[serde(rename = "@href", default)]
	href: Option<String>,
	#[serde(rename = "$text", default)]
	value: String,
}

impl Entry {
	fn id(&self) -> Option<String> {
		first_text(&self.guid)
			.or_else(|| first_text(&self.id))
			.or_else(|| self.links.iter().map(|l| l.value.trim()).find(|v| !v.is_empty()).map(str::to_string))
			.or_else(|| {
				self.links
					.iter()
					.filter_map(|l| l.href.as_deref())
					.map(str::trim)
					.find(|href| !href.is_empty())
					.map(str::to_string)
			})
	}

	fn body(&self) -> Option<String> {
		[&self.description, &self.summary, &self.content, &self.encoded]
			.into_iter()
			.find_map(|texts| first_text(texts))
	}
}

/// Markup-free text of the first element that has any
fn first_text(texts: &[Text]) -> Option<String> {
	texts.iter().find_map(|text| {
		let cleaned = clean_markup(&text.value).trim().to_string();
		(!cleaned.is_empty()).then_some(cleaned)
	})
}

/// Extract entries from an RSS `<item>` or Atom `<entry>` feed.
///
/// Parsing of a feed stops at the first entry without an id or link.
pub fn parse_feed(xml: &str) -> Result<Vec<Document>> {
	let feed: FeedXml = quick_xml::de::from_str(xml).context("Failed to parse feed XML")?;

	let channel_items = feed.channel.map(|c| c.items).unwrap_or_default();
	let mut documents = Vec::new();

	for entry in channel_items.iter().chain(&feed.items).chain(&feed.entries) {
		let Some(id) = entry.id() else {
			ui::debug("Entry without id, skipping rest of feed");
			break;
		};

		let title = first_text(&entry.title).unwrap_or_default();
		let body = entry.body().unwrap_or_default();
		documents.push(Document::new(id, title, body));
	}

	Ok(documents)
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use tempfile::tempdir;

	const RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Example</title>
  <item>
    <title>Rust &amp; WebAssembly</title>
    <link>http://example.com/wasm</link>
    <guid>http://example.com/wasm</guid>
    <description>&lt;p&gt;Compile &lt;b&gt;Rust&lt;/b&gt;   to the web&lt;/p&gt;</description>
  </item>
  <item>
    <title><![CDATA[Kernel <em>release</em>]]></title>
    <link>http://example.com/kernel</link>
    <description><![CDATA[<div>New scheduler</div>]]></description>
  </item>
</channel></rss>"#;

	const ATOM: &str = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <title type="html">Atom entry</title>
    <link href="https://example.org/a1"/>
    <summary>Short summary</summary>
  </entry>
  <entry>
    <id>urn:uuid:42</id>
    <title>Second</title>
    <content type="html">&lt;p&gt;Full content&lt;/p&gt;</content>
  </entry>
</feed>"#;

	#[test]
	fn parses_rss_items() {
		let docs = parse_feed(RSS).unwrap();
		assert_eq!(docs.len(), 2);
		assert_eq!(docs[0], Document::new("http://example.com/wasm", "Rust & WebAssembly", "Compile Rust to the web"));
		assert_eq!(docs[1].id, "http://example.com/kernel");
		assert_eq!(docs[1].title, "Kernel release");
		assert_eq!(docs[1].body, "New scheduler");
	}

	#[test]
	fn parses_atom_entries() {
		let docs = parse_feed(ATOM).unwrap();
		assert_eq!(docs.len(), 2);
		assert_eq!(docs[0].id, "https://example.org/a1");
		assert_eq!(docs[0].body, "Short summary");
		assert_eq!(docs[1].id, "urn:uuid:42");
		assert_eq!(docs[1].body, "Full content");
	}

	#[test]
	fn entry_without_id_stops_the_feed() {
		let xml = "<rss><item><title>one</title><guid>1</guid></item>\
			<item><title>orphan</title></item>\
			<item><title>three</title><guid>3</guid></item></rss>";
		let docs = parse_feed(xml).unwrap();
		assert_eq!(docs.len(), 1);
		assert_eq!(docs[0].id, "1");
	}

	#[test]
	fn cdata_text_is_taken_literally() {
		let xml = "<rss><channel><item><title>Tags</title><guid>g1</guid>\
			<description><![CDATA[Use </item> to close an RSS entry, then rocket orbit]]></description>\
			</item></channel></rss>";
		let docs = parse_feed(xml).unwrap();
		assert_eq!(docs, vec![Document::new("g1", "Tags", "Use to close an RSS entry, then rocket orbit")]);

		let xml = "<rss><item><guid>g</guid><title><![CDATA[AT&amp;T]]></title></item></rss>";
		assert_eq!(parse_feed(xml).unwrap()[0].title, "AT&amp;T");
	}

	#[test]
	fn escaped_text_is_decoded_once() {
		let xml = "<rss><item><guid>g</guid><title>AT&amp;amp;T &#x2014; &lt;b&gt;news&lt;/b&gt;</title></item></rss>";
		assert_eq!(parse_feed(xml).unwrap()[0].title, "AT&amp;T \u{2014} news");
	}

	#[test]
	fn rss_items_after_other_channel_elements() {
		let xml = "<rss><channel><title>Feed</title>\
			<item><guid>1</guid><title>first</title></item>\
			<language>en</language>\
			<item><guid>2</guid><title>second</title></item>\
			</channel></rss>";
		let ids: Vec<String> = parse_feed(xml).unwrap().into_iter().map(|d| d.id).collect();
		assert_eq!(ids, vec!["1", "2"]);
	}

	#[test]
	fn malformed_feed_is_an_error() {
		assert!(parse_feed("<rss><channel><item><title>unclosed</channel></rss>").is_err());
	}

	#[test]
	fn feed_list_skips_comments_remote_and_missing() {
		let dir = tempdir().unwrap();
		fs::write(dir.path().join("one.xml"), RSS).unwrap();
		fs::create_dir(dir.path().join("saved")).unwrap();
		fs::write(dir.path().join("saved").join("two.atom"), ATOM).unwrap();
		fs::write(dir.path().join("saved").join("notes.txt"), "ignored").unwrap();
		fs::write(dir.path().join("saved").join("broken.xml"), "<rss><item>").unwrap();

		let list = dir.path().join("test_feed_list.txt");
		fs::write(&list, "# saved feeds\none.xml\n\nsaved\nhttp://example.com/rss\nmissing.xml\n").unwrap();

		let load = load_feeds(&list).unwrap();
		assert_eq!(load.feeds_parsed, 2);
		assert_eq!(load.articles_parsed, 4);
		assert_eq!(load.documents.len(), 4);
		assert!(load.documents.contains_key("urn:uuid:42"));

		let skipped: Vec<&str> = load.skipped.iter().map(|(entry, _)| entry.as_str()).collect();
		assert_eq!(skipped.len(), 3);
		assert_eq!(&skipped[..2], &["http://example.com/rss", "missing.xml"]);
		assert!(skipped[2].ends_with("broken.xml"));
	}

	#[test]
	fn missing_feed_list_is_an_error() {
		let dir = tempdir().unwrap();
		assert!(load_feeds(&dir.path().join("absent.txt")).is_err());
	}

	#[test]
	fn loads_documents_json() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("docs.json");
		fs::write(&path, r#"{"d1": ["<b>Title</b>", "Body   text"], "d2": ["Other", ""]}"#).unwrap();

		let docs = load_documents_json(&path).unwrap();
		assert_eq!(docs.len(), 2);
		assert_eq!(docs["d1"], Document::new("d1", "Title", "Body text"));
		assert_eq!(docs["d2"].body, "");
	}
}
