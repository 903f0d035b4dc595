//! feedcluster - topic clustering of feed entries
//!
//! Reads saved RSS/Atom feeds (or a JSON corpus), groups the entries into
//! topics and writes an HTML report.

use anyhow::Result;
use clap::{CommandFactory, Parser};

use feedcluster::cli::{Cli, Command};
use feedcluster::config::RunConfig;
use feedcluster::{commands, ui};

fn main() {
	let cli = Cli::parse();

	ui::Log::set_verbose(cli.verbose);

	if let Err(e) = run(cli.command) {
		ui::error(&format!("{:#}", e));
		std::process::exit(1);
	}
}

fn run(command: Command) -> Result<()> {
	match command {
		Command::Cluster(args) => {
			ui::print_logo();
			let config = RunConfig::from_args(args);
			commands::cluster::run(&config)
		}
		Command::Terms { text, lowercase, limit } => {
			commands::terms::run(text.as_deref(), lowercase, limit)
		}
		Command::Help { subcommand } => {
			let mut cmd = Cli::command();
			if let Some(sub) = subcommand {
				if let Some(sub_cmd) = cmd.find_subcommand_mut(&sub) {
					sub_cmd.print_help()?;
				} else {
					ui::warn(&format!("Unknown subcommand: {}", sub));
					cmd.print_help()?;
				}
			} else {
				cmd.print_help()?;
			}
			Ok(())
		}
	}
}
