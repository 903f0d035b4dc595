//! HTML report and JSON export of a clustering

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::{CENTROID_TERMS, REPORT_TITLE};
use crate::core::{Clustering, Document};
use crate::processing::Metric;
use crate::ui;

#[derive(Debug, Serialize)]
pub struct ClusterExport {
	pub timestamp: String,
	pub metric: Metric,
	pub k: usize,
	pub iterations: usize,
	pub converged: bool,
	pub total_documents: usize,
	pub clusters: Vec<ClusterInfo>,
}

#[derive(Debug, Serialize)]
pub struct ClusterInfo {
	pub id: usize,
	pub size: usize,
	/// Heaviest centroid terms
	pub terms: Vec<String>,
	pub members: Vec<MemberInfo>,
}

#[derive(Debug, Serialize)]
pub struct MemberInfo {
	pub id: String,
	pub title: String,
}

impl ClusterExport {
	pub fn new(
		clustering: &Clustering,
		documents: &BTreeMap<String, Document>,
		metric: Metric,
		timestamp: &str,
	) -> Self {
		let clusters = clustering
			.buckets
			.iter()
			.zip(&clustering.centroids)
			.enumerate()
			.map(|(index, (bucket, centroid))| ClusterInfo {
				id: index + 1,
				size: bucket.len(),
				terms: centroid
					.top_terms(CENTROID_TERMS)
					.into_iter()
					.map(|(term, _)| term.to_string())
					.collect(),
				members: bucket
					.iter()
					.map(|id| MemberInfo {
						id: id.clone(),
						title: documents.get(id).map(|d| d.title.clone()).unwrap_or_default(),
					})
					.collect(),
			})
			.collect();

		Self {
			timestamp: timestamp.to_string(),
			metric,
			k: clustering.k(),
			iterations: clustering.iterations,
			converged: clustering.converged,
			total_documents: clustering.total_documents(),
			clusters,
		}
	}
}

/// Write the export as pretty JSON to `path`, or stdout when `path` is `-`
pub fn export_json(export: &ClusterExport, path: &Path) -> Result<()> {
	let json = serde_json::to_string_pretty(export).context("Failed to serialize clusters")?;

	if path.to_str() == Some("-") || path.as_os_str().is_empty() {
		println!("{}", json);
	} else {
		fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
		ui::success(&format!("Exported to {}", path.display()));
	}

	Ok(())
}

/// HTML page listing every category with the titles of its entries
pub fn render_html(clustering: &Clustering, documents: &BTreeMap<String, Document>, timestamp: &str) -> String {
	let mut html = String::new();
	html.push_str("<html>\n");
	html.push_str(&format!("<h1>{}</h1>\n", REPORT_TITLE));
	html.push_str(&format!("<b>{}</b>\n", escape_html(timestamp)));

	for (index, bucket) in clustering.buckets.iter().enumerate() {
		html.push_str(&format!("<h2>Category {}</h2>\n", index + 1));
		html.push_str("<ul>\n");
		for id in bucket {
			let title = documents.get(id).map(|d| d.title.as_str()).unwrap_or(id.as_str());
			let is_link = documents.get(id).map(Document::is_link).unwrap_or(false);
			if is_link {
				html.push_str(&format!(
					"<li><a href=\"{}\">{}</a></li>\n",
					escape_html(id),
					escape_html(title)
				));
			} else {
				html.push_str(&format!("<li>{}</li>\n", escape_html(title)));
			}
		}
		html.push_str("</ul>\n");
	}

	html.push_str("</html>\n");
	html
}

pub fn write_html(
	path: &Path,
	clustering: &Clustering,
	documents: &BTreeMap<String, Document>,
	timestamp: &str,
) -> Result<()> {
	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		fs::create_dir_all(parent).context("Failed to create report directory")?;
	}

	let html = render_html(clustering, documents, timestamp);
	fs::write(path, html).with_context(|| format!("Failed to write report {}", path.display()))?;
	Ok(())
}

pub fn escape_html(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			_ => out.push(c),
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::SparseVector;
	use pretty_assertions::assert_eq;
	use tempfile::tempdir;

	fn fixture() -> (Clustering, BTreeMap<String, Document>) {
		let mut documents = BTreeMap::new();
		documents.insert(
			"http://example.com/a".to_string(),
			Document::new("http://example.com/a", "Rockets & <satellites>", ""),
		);
		documents.insert("local-b".to_string(), Document::new("local-b", "Bread baking", ""));

		let centroid: SparseVector = [("rocket", 2.0), ("orbit", 1.0)].into_iter().collect();
		let clustering = Clustering {
			centroids: vec![centroid, SparseVector::new()],
			buckets: vec![vec!["http://example.com/a".to_string()], vec!["local-b".to_string()]],
			iterations: 2,
			converged: true,
		};
		(clustering, documents)
	}

	#[test]
	fn renders_categories_with_links() {
		let (clustering, documents) = fixture();
		let html = render_html(&clustering, &documents, "2026-10-16T08:00:00");

		let expected = "<html>\n\
			<h1>FeedInformant</h1>\n\
			<b>2026-10-16T08:00:00</b>\n\
			<h2>Category 1</h2>\n<ul>\n\
			<li><a href=\"http://example.com/a\">Rockets &amp; &lt;satellites&gt;</a></li>\n\
			</ul>\n\
			<h2>Category 2</h2>\n<ul>\n\
			<li>Bread baking</li>\n\
			</ul>\n\
			</html>\n";
		assert_eq!(html, expected);
	}

	#[test]
	fn writes_report_file() {
		let (clustering, documents) = fixture();
		let dir = tempdir().unwrap();
		let path = dir.path().join("out").join("readnews.html");

		write_html(&path, &clustering, &documents, "now").unwrap();
		let html = fs::read_to_string(&path).unwrap();
		assert!(html.contains("<h2>Category 2</h2>"));
	}

	#[test]
	fn export_lists_terms_and_members() {
		let (clustering, documents) = fixture();
		let export = ClusterExport::new(&clustering, &documents, Metric::Cosine, "now");

		assert_eq!(export.k, 2);
		assert_eq!(export.total_documents, 2);
		assert_eq!(export.clusters[0].id, 1);
		assert_eq!(export.clusters[0].terms, vec!["rocket", "orbit"]);
		assert_eq!(export.clusters[0].members[0].title, "Rockets & <satellites>");
		assert!(export.clusters[1].terms.is_empty());

		let json = serde_json::to_value(&export).unwrap();
		assert_eq!(json["metric"], "cosine");
		assert_eq!(json["clusters"][1]["members"][0]["id"], "local-b");
	}

	#[test]
	fn escapes_markup_characters() {
		assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
	}
}
