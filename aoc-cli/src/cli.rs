//! CLI argument parsing using clap

use aoc_runner::RunOptions;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Advent of Code solver runner
#[derive(Parser, Debug)]
#[command(
    name = "aoc",
    about = "Check Advent of Code solvers on the puzzle examples and submit their answers",
    version
)]
pub struct Args {
    /// Log debug details (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Year and day of a puzzle
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct Puzzle {
    /// Puzzle year
    #[arg(value_parser = clap::value_parser!(u16).range(2015..))]
    pub year: u16,

    /// Puzzle day
    #[arg(value_parser = clap::value_parser!(u8).range(1..=25))]
    pub day: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the registered solver: examples, checks of solved parts, then submission
    Run {
        #[command(flatten)]
        puzzle: Puzzle,

        /// Only run this part
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=2))]
        part: Option<u8>,

        /// Only run the examples
        #[arg(long)]
        tests_only: bool,

        /// Skip the examples and go straight to the real input
        #[arg(long, conflicts_with = "tests_only")]
        skip_tests: bool,

        /// Submit without asking for confirmation
        #[arg(short = 'y', long)]
        yes: bool,

        /// Refetch the puzzle page first
        #[arg(long)]
        refresh: bool,

        /// JSON file with example records that replace the built-in ones
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// JSON file with extra examples to check
        #[arg(long)]
        extra_tests: Option<PathBuf>,
    },

    /// Print the examples found in a puzzle as JSON
    Examples {
        #[command(flatten)]
        puzzle: Puzzle,

        /// JSON file with example records that replace the built-in ones
        #[arg(long)]
        overrides: Option<PathBuf>,
    },

    /// List the elements a CSS selector matches, with their indexes
    Index {
        #[command(flatten)]
        puzzle: Puzzle,

        /// CSS selector to index
        #[arg(default_value = "code")]
        selector: String,
    },

    /// Refetch a cached puzzle page and/or input
    Refresh {
        #[command(flatten)]
        puzzle: Puzzle,

        /// Leave the puzzle page alone
        #[arg(long)]
        no_puzzle: bool,

        /// Refetch the input too
        #[arg(long)]
        input: bool,
    },

    /// Print the cache location
    Cache,

    /// List the registered solvers
    List,
}

impl Command {
    /// Run options for the `run` subcommand
    pub fn run_options(&self) -> Option<RunOptions> {
        match *self {
            Command::Run {
                part,
                tests_only,
                skip_tests,
                yes,
                refresh,
                ..
            } => Some(RunOptions {
                tests_only,
                skip_tests,
                only_part: part,
                force_submit: yes,
                force_refresh: refresh,
            }),
            _ => None,
        }
    }
}
