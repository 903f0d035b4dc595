//! Cluster command - group feed entries into topics

use std::collections::BTreeMap;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::*;

use crate::config::{RunConfig, Source, CENTROID_TERMS};
use crate::core::{Clustering, Document};
use crate::processing::{build_index, KMeans};
use crate::storage::{self, ClusterExport};
use crate::ui;

pub fn run(config: &RunConfig) -> Result<()> {
	let start = Instant::now();

	ui::debug(&format!(
		"Starting clustering: mode={}, k={}, metric={}, max_iterations={}, lowercase={}",
		config.mode, config.clusters, config.metric, config.max_iterations, config.lowercase
	));

	let documents = load_documents(config)?;

	if documents.is_empty() {
		ui::warn("No entries found, nothing to cluster");
		return Ok(());
	}

	config.check_corpus_size(documents.len())?;

	let corpus = build_index(&documents, config.lowercase);
	let vocabulary: usize = corpus.values().map(|v| v.len()).sum();
	ui::success(&format!("Indexed {} entries", corpus.len()));
	ui::debug(&format!(
		"Average of {:.1} distinct terms per entry",
		vocabulary as f32 / corpus.len() as f32
	));

	let empty = corpus.values().filter(|v| v.is_empty()).count();
	if empty > 0 {
		ui::debug(&format!("{} entries have no terms left after filtering", empty));
	}

	ui::info(&format!(
		"Clustering into {} topics using {} distance",
		config.clusters, config.metric
	));

	let clustering = KMeans::new(config.clusters, config.metric)
		.with_max_iterations(config.max_iterations)
		.with_seed(config.seed)
		.run(&corpus)
		.context("Clustering aborted")?;

	if clustering.converged {
		ui::success(&format!("Converged after {} iterations", clustering.iterations));
	} else {
		ui::warn(&format!(
			"Stopped after {} iterations without converging",
			clustering.iterations
		));
	}

	if clustering.empty_buckets() > 0 {
		ui::debug(&format!("{} topics ended up empty", clustering.empty_buckets()));
	}

	let timestamp = chrono::Local::now().format("%Y-%m-%d T-%H-%M-%S").to_string();

	storage::write_html(&config.report, &clustering, &documents, &timestamp)?;
	ui::success(&format!("Saved report to {}", ui::path_link(&config.report, 60)));

	if let Some(export_path) = &config.export {
		let export = ClusterExport::new(&clustering, &documents, config.metric, &timestamp);
		storage::export_json(&export, export_path)?;
	}

	print_clusters(&clustering, &documents, config.preview);

	if config.open_report {
		ui::info(&format!("Opening: {}", config.report.display()));
		if let Err(e) = open::that(&config.report) {
			ui::warn(&format!("Failed to open: {}", e));
		}
	}

	eprintln!(
		"\n{}",
		format!("Completed in {:.1}s", start.elapsed().as_secs_f32()).dimmed()
	);

	Ok(())
}

fn load_documents(config: &RunConfig) -> Result<BTreeMap<String, Document>> {
	match &config.source {
		Source::Documents(path) => {
			ui::info(&format!("Loading entries from {}", ui::path_link(path, 40)));
			storage::load_documents_json(path)
		}
		Source::FeedList(path) => {
			ui::info(&format!(
				"Reading {} feed list {}",
				config.mode,
				ui::path_link(path, 40)
			));

			let load = storage::load_feeds(path).context("Could not get valid contents")?;

			for (entry, reason) in &load.skipped {
				ui::warn(&format!("Skipped {}: {}", entry, reason));
			}

			ui::success(&format!(
				"Parsed {} articles from {} sources",
				load.articles_parsed, load.feeds_parsed
			));

			if load.documents.len() < load.articles_parsed {
				ui::debug(&format!(
					"{} duplicate entries merged",
					load.articles_parsed - load.documents.len()
				));
			}

			Ok(load.documents)
		}
	}
}

fn print_clusters(clustering: &Clustering, documents: &BTreeMap<String, Document>, preview: usize) {
	ui::header("─── Topics ───");

	for (index, (bucket, centroid)) in clustering.buckets.iter().zip(&clustering.centroids).enumerate() {
		let terms: Vec<&str> = centroid
			.top_terms(CENTROID_TERMS)
			.into_iter()
			.map(|(term, _)| term)
			.collect();

		eprintln!(
			"\n{} {} ({} entries)",
			"Topic".bright_white(),
			(index + 1).to_string().bright_cyan(),
			bucket.len()
		);

		if !terms.is_empty() {
			eprintln!("  {}: {}", "Terms".dimmed(), terms.join(", ").yellow());
		}

		for (i, id) in bucket.iter().take(preview).enumerate() {
			let title = documents
				.get(id)
				.map(|d| d.title.as_str())
				.filter(|t| !t.is_empty())
				.unwrap_or(id);
			eprintln!(
				"  {} {}",
				format!("[{}]", i + 1).dimmed(),
				ui::url_link(id, &ui::truncate_middle(title, 70))
			);
		}

		if bucket.len() > preview {
			eprintln!(
				"  {}",
				format!("... and {} more", bucket.len() - preview).dimmed()
			);
		}
	}

	let sizes: Vec<usize> = clustering.buckets.iter().map(Vec::len).collect();
	ui::debug(&format!("Topic sizes: {:?}", sizes));
}
