use clap::builder::styling::{AnsiColor, Style, Styles};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{ConfigError, DEFAULT_CLUSTERS, DEFAULT_MAX_ITERATIONS, DEFAULT_PREVIEW, REPORT_FILE};
use crate::processing::Metric;

fn styles() -> Styles {
	Styles::styled()
		.header(Style::new().bold().fg_color(Some(AnsiColor::Blue.into())))
		.usage(Style::new().bold().fg_color(Some(AnsiColor::Blue.into())))
		.literal(Style::new().fg_color(Some(AnsiColor::Blue.into())))
		.placeholder(Style::new().fg_color(Some(AnsiColor::Yellow.into())))
		.valid(Style::new().fg_color(Some(AnsiColor::Blue.into())))
		.invalid(Style::new().fg_color(Some(AnsiColor::Red.into())))
}

fn parse_metric(name: &str) -> Result<Metric, ConfigError> {
	name.parse()
}

#[derive(Parser, Debug)]
#[command(
	name = "feedcluster",
	author,
	version,
	about = "Topic clustering of syndicated feed entries",
	styles = styles(),
	disable_help_subcommand = true,
	after_help = format!(
		"{title}
  {bin} {cluster}  {cluster_args}            {cluster_desc}
  {bin} {cluster}  {live_args}         {live_desc}
  {bin} {cluster}  {docs_args}  {docs_desc}
  {bin} {terms}    {terms_args}    {terms_desc}
  {bin} {help}     {help_args}                  {help_desc}",
		title = "Examples:".bright_blue().bold(),
		bin = "feedcluster".bright_blue(),
		cluster = "cluster".yellow(),
		cluster_args = "-c 8",
		cluster_desc = "Cluster saved test feeds into 8 topics".dimmed(),
		live_args = "-l -d cosine",
		live_desc = "Use the live feed list with cosine distance".dimmed(),
		docs_args = "--documents docs.json --export -",
		docs_desc = "Cluster a JSON corpus, print JSON".dimmed(),
		terms = "terms".yellow(),
		terms_args = "\"Rust 1.80 released\"",
		terms_desc = "Show the indexed terms of a text".dimmed(),
		help = "help".yellow(),
		help_args = "cluster",
		help_desc = "Show help for cluster".dimmed(),
	),
)]
pub struct Cli {
	/// Enable verbose debug output
	#[arg(short = 'v', long = "verbose", global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Group feed entries into topics and write an HTML report
	Cluster(ClusterArgs),

	/// Show the term vector the indexer builds for a text
	Terms {
		/// Text to index (reads stdin when omitted)
		#[arg(value_name = "TEXT")]
		text: Option<String>,

		/// Lower-case the text before indexing
		#[arg(long = "lowercase")]
		lowercase: bool,

		/// Number of terms to show
		#[arg(short = 'n', long = "limit", default_value_t = 20)]
		limit: usize,
	},

	/// Show help for a subcommand
	Help {
		/// Subcommand name
		subcommand: Option<String>,
	},
}

/// Options of the `cluster` command
#[derive(Args, Debug)]
pub struct ClusterArgs {
	/// Use the live feed list instead of saved test feeds
	#[arg(short = 'l', short_alias = 'L', long = "live")]
	pub live: bool,

	/// Distance metric: manhattan, euclidean, cosine, pearson or tanimoto
	#[arg(short = 'd', long = "dist", value_name = "METRIC", value_parser = parse_metric, default_value_t = Metric::Tanimoto)]
	pub metric: Metric,

	/// Number of topics, 2 to 100 (out-of-range values fall back to 10)
	#[arg(short = 'c', long = "cat", default_value_t = DEFAULT_CLUSTERS)]
	pub clusters: usize,

	/// Maximum k-means iterations
	#[arg(long = "max-iter", default_value_t = DEFAULT_MAX_ITERATIONS as u64, value_parser = clap::value_parser!(u64).range(1..))]
	pub max_iterations: u64,

	/// Seed for reproducible centroid sampling
	#[arg(long = "seed")]
	pub seed: Option<u64>,

	/// Lower-case entry text before indexing
	#[arg(long = "lowercase")]
	pub lowercase: bool,

	/// Feed list file (overrides --live and FEEDCLUSTER_FEED_LIST)
	#[arg(long = "feeds", value_name = "FILE", conflicts_with = "documents")]
	pub feeds: Option<PathBuf>,

	/// JSON file mapping id to [title, body], used instead of feeds
	#[arg(long = "documents", value_name = "FILE")]
	pub documents: Option<PathBuf>,

	/// HTML report path
	#[arg(short = 'o', long = "output", default_value = REPORT_FILE)]
	pub output: PathBuf,

	/// Export clusters as JSON (use - for stdout)
	#[arg(long = "export", value_name = "FILE")]
	pub export: Option<PathBuf>,

	/// Open the report in the default browser
	#[arg(long = "open")]
	pub open: bool,

	/// Entries shown per topic in the terminal
	#[arg(short = 'n', long = "preview", default_value_t = DEFAULT_PREVIEW)]
	pub preview: usize,
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;

	#[test]
	fn cli_definition_is_consistent() {
		Cli::command().debug_assert();
	}

	#[test]
	fn cluster_defaults() {
		let cli = Cli::try_parse_from(["feedcluster", "cluster"]).unwrap();
		match cli.command {
			Command::Cluster(args) => {
				let ClusterArgs { live, metric, clusters, max_iterations, seed, output, .. } = args;
				assert!(!live);
				assert_eq!(metric, Metric::Tanimoto);
				assert_eq!(clusters, 10);
				assert_eq!(max_iterations, 25);
				assert_eq!(seed, None);
				assert_eq!(output, PathBuf::from("readnews.html"));
			}
			other => panic!("unexpected command {other:?}"),
		}
	}

	#[test]
	fn cluster_flags_parse() {
		let cli = Cli::try_parse_from(["feedcluster", "-v", "cluster", "-L", "-d", "pearson", "-c", "4", "--seed", "9"]).unwrap();
		assert!(cli.verbose);
		match cli.command {
			Command::Cluster(ClusterArgs { live, metric, clusters, seed, .. }) => {
				assert!(live);
				assert_eq!(metric, Metric::Pearson);
				assert_eq!(clusters, 4);
				assert_eq!(seed, Some(9));
			}
			other => panic!("unexpected command {other:?}"),
		}
	}

	#[test]
	fn unknown_metric_is_rejected() {
		let err = Cli::try_parse_from(["feedcluster", "cluster", "-d", "hamming"]).unwrap_err();
		assert!(err.to_string().contains("unknown distance metric 'hamming'"), "{err}");
		assert!(Cli::try_parse_from(["feedcluster", "cluster", "--max-iter", "0"]).is_err());
	}
}
