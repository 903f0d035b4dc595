//! Application configuration and constants

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::cli::ClusterArgs;
use crate::processing::distance::Metric;

// === Clustering ===
pub const DEFAULT_CLUSTERS: usize = 10;
pub const MIN_CLUSTERS: usize = 2;
pub const MAX_CLUSTERS: usize = 100;
pub const DEFAULT_MAX_ITERATIONS: usize = 25;

/// Centroid terms whose averaged weight falls below this are dropped
pub const CENTROID_PRUNE_THRESHOLD: f64 = 0.001;
/// Distances closer to zero than this are treated as exactly zero
pub const DISTANCE_SNAP_EPSILON: f64 = 1e-8;
/// Pearson denominators below this count as zero variance
pub const PEARSON_MIN_DENOMINATOR: f64 = 1e-9;

// === Indexing ===
pub const MIN_TOKEN_LEN: usize = 3;

// === Feeds ===
pub const TEST_FEED_LIST: &str = "test_feed_list.txt";
pub const LIVE_FEED_LIST: &str = "live_feed_list.txt";
pub const FEED_LIST_ENV: &str = "FEEDCLUSTER_FEED_LIST";
pub const FEED_EXTENSIONS: &[&str] = &["xml", "rss", "atom"];

// === Output ===
pub const REPORT_FILE: &str = "readnews.html";
pub const REPORT_TITLE: &str = "FeedInformant";
pub const DEFAULT_PREVIEW: usize = 5;
pub const CENTROID_TERMS: usize = 8;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
	#[error("unknown distance metric '{0}' (expected manhattan, euclidean, cosine, pearson or tanimoto)")]
	InvalidMetric(String),

	#[error("cannot build {k} clusters from {documents} documents")]
	TooFewDocuments { k: usize, documents: usize },
}

/// Which feed list a run reads from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
	/// Previously saved feeds
	#[default]
	Test,
	/// Feeds listed for live use
	Live,
}

impl Mode {
	pub fn feed_list_name(self) -> &'static str {
		match self {
			Mode::Test => TEST_FEED_LIST,
			Mode::Live => LIVE_FEED_LIST,
		}
	}
}

impl std::fmt::Display for Mode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Mode::Test => write!(f, "test"),
			Mode::Live => write!(f, "live"),
		}
	}
}

/// Where a run takes its documents from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
	/// A feed list file naming local feed files or directories
	FeedList(PathBuf),
	/// A JSON map of id → [title, body]
	Documents(PathBuf),
}

/// Everything a clustering run needs, resolved up front
#[derive(Debug, Clone)]
pub struct RunConfig {
	pub mode: Mode,
	pub source: Source,
	pub clusters: usize,
	pub metric: Metric,
	pub max_iterations: usize,
	pub seed: Option<u64>,
	pub lowercase: bool,
	pub report: PathBuf,
	pub export: Option<PathBuf>,
	pub open_report: bool,
	pub preview: usize,
}

impl Default for RunConfig {
	fn default() -> Self {
		Self {
			mode: Mode::Test,
			source: Source::FeedList(PathBuf::from(TEST_FEED_LIST)),
			clusters: DEFAULT_CLUSTERS,
			metric: Metric::default(),
			max_iterations: DEFAULT_MAX_ITERATIONS,
			seed: None,
			lowercase: false,
			report: PathBuf::from(REPORT_FILE),
			export: None,
			open_report: false,
			preview: DEFAULT_PREVIEW,
		}
	}
}

impl RunConfig {
	/// Resolve command-line options into a run configuration
	pub fn from_args(args: ClusterArgs) -> Self {
		let mode = if args.live { Mode::Live } else { Mode::Test };
		let source = match args.documents {
			Some(path) => Source::Documents(path),
			None => Source::FeedList(resolve_feed_list(args.feeds.as_deref(), mode)),
		};

		Self {
			mode,
			source,
			clusters: normalize_clusters(args.clusters),
			metric: args.metric,
			max_iterations: usize::try_from(args.max_iterations).unwrap_or(usize::MAX),
			seed: args.seed,
			lowercase: args.lowercase,
			report: args.output,
			export: args.export,
			open_report: args.open,
			preview: args.preview,
		}
	}

	/// Reject a cluster count the corpus cannot support
	pub fn check_corpus_size(&self, documents: usize) -> Result<(), ConfigError> {
		if self.clusters > documents {
			return Err(ConfigError::TooFewDocuments { k: self.clusters, documents });
		}
		Ok(())
	}
}

/// Out-of-range cluster counts fall back to the default
pub fn normalize_clusters(requested: usize) -> usize {
	if (MIN_CLUSTERS..=MAX_CLUSTERS).contains(&requested) {
		requested
	} else {
		crate::ui::warn(&format!(
			"Cluster count {} outside {}..={}, using {}",
			requested, MIN_CLUSTERS, MAX_CLUSTERS, DEFAULT_CLUSTERS
		));
		DEFAULT_CLUSTERS
	}
}

/// Feed list path: explicit path, then FEEDCLUSTER_FEED_LIST, then `<mode>_feed_list.txt`
pub fn resolve_feed_list(explicit: Option<&Path>, mode: Mode) -> PathBuf {
	if let Some(path) = explicit {
		crate::ui::debug(&format!("Using feed list: {}", path.display()));
		return path.to_path_buf();
	}

	if let Ok(env_path) = std::env::var(FEED_LIST_ENV) {
		if !env_path.trim().is_empty() {
			crate::ui::debug(&format!("Using {}: {}", FEED_LIST_ENV, env_path));
			return PathBuf::from(env_path);
		}
	}

	PathBuf::from(mode.feed_list_name())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cluster_count_outside_range_uses_default() {
		assert_eq!(normalize_clusters(2), 2);
		assert_eq!(normalize_clusters(100), 100);
		assert_eq!(normalize_clusters(1), DEFAULT_CLUSTERS);
		assert_eq!(normalize_clusters(0), DEFAULT_CLUSTERS);
		assert_eq!(normalize_clusters(101), DEFAULT_CLUSTERS);
	}

	#[test]
	fn explicit_feed_list_wins() {
		let path = resolve_feed_list(Some(Path::new("mine.txt")), Mode::Live);
		assert_eq!(path, PathBuf::from("mine.txt"));
	}

	#[test]
	fn mode_selects_list_name() {
		assert_eq!(Mode::Test.feed_list_name(), "test_feed_list.txt");
		assert_eq!(Mode::Live.feed_list_name(), "live_feed_list.txt");
	}

	#[test]
	fn arguments_resolve_into_config() {
		use clap::Parser;

		let cli = crate::cli::Cli::try_parse_from([
			"feedcluster", "cluster", "-c", "500", "-d", "cosine", "--documents", "docs.json", "--seed", "3",
		])
		.unwrap();
		let crate::cli::Command::Cluster(args) = cli.command else {
			panic!("expected cluster command");
		};

		let config = RunConfig::from_args(args);
		assert_eq!(config.clusters, DEFAULT_CLUSTERS);
		assert_eq!(config.metric, Metric::Cosine);
		assert_eq!(config.source, Source::Documents(PathBuf::from("docs.json")));
		assert_eq!(config.seed, Some(3));
		assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
		assert_eq!(config.mode, Mode::Test);
	}

	#[test]
	fn corpus_must_hold_k_documents() {
		let config = RunConfig { clusters: 4, ..RunConfig::default() };
		assert!(config.check_corpus_size(4).is_ok());
		assert_eq!(
			config.check_corpus_size(3),
			Err(ConfigError::TooFewDocuments { k: 4, documents: 3 })
		);
	}
}
