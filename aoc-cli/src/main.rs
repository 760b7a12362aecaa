//! AOC CLI - check Advent of Code solvers on the puzzle examples and submit answers

mod cli;
mod config;
mod error;
mod output;

// Import aoc-solutions to link the solver plugins
use aoc_solutions as _;

use aoc_examples::{Example, ExampleDatabase, ExampleExtractor, ExampleRecord, Markup, accepted_answers};
use aoc_runner::site::puzzle_key;
use aoc_runner::{CacheError, Config, FileCache, PuzzleSite, Runner, find_solver, registered};
use clap::Parser;
use cli::{Args, Command, Puzzle};
use error::CliError;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<(), CliError> {
    let config = Config::from_env()?;
    let cache = config.cache();
    debug!(cache = %cache.root().display(), "Using cache");
    let options = args.command.run_options().unwrap_or_default();

    match args.command {
        Command::Run {
            puzzle,
            overrides,
            extra_tests,
            ..
        } => {
            let plugin = find_solver(puzzle.year, puzzle.day).ok_or(CliError::NoSolver {
                year: puzzle.year,
                day: puzzle.day,
            })?;
            let overrides: Vec<ExampleRecord> = config::load_json_list(overrides.as_deref())?;
            let extra_tests: Vec<Example> = config::load_json_list(extra_tests.as_deref())?;

            let session = config::session(&config)?;
            let client = config.client()?;
            let site = PuzzleSite::new(&client, &cache, session.as_str());
            let extractor = ExampleExtractor::new(ExampleDatabase::builtin()?);
            let runner = Runner::new(&site, &extractor)
                .with_overrides(overrides)
                .with_extra_tests(extra_tests);

            let report = runner.run(puzzle.year, puzzle.day, plugin.solver, &options)?;
            println!();
            println!("{}", output::format_summary(&report));
        }
        Command::Examples { puzzle, overrides } => {
            let overrides: Vec<ExampleRecord> = config::load_json_list(overrides.as_deref())?;
            let html = puzzle_page(&config, &cache, puzzle)?;
            let markup = Markup::parse(&html);
            let extractor = ExampleExtractor::new(ExampleDatabase::builtin()?);
            let examples = extractor.get_examples(
                puzzle.year,
                puzzle.day,
                accepted_answers(&markup).is_empty(),
                &markup,
                &overrides,
                &[],
            )?;
            println!("{}", serde_json::to_string_pretty(&examples)?);
        }
        Command::Index { puzzle, selector } => {
            let html = puzzle_page(&config, &cache, puzzle)?;
            let markup = Markup::parse(&html);
            let texts: Vec<String> = markup
                .select(&selector)?
                .iter()
                .map(|node| node.text_with_breaks())
                .collect();
            println!("{}", output::format_index(texts.iter().map(String::as_str)));
        }
        Command::Refresh {
            puzzle,
            no_puzzle,
            input,
        } => {
            let session = config::session(&config)?;
            let client = config.client()?;
            let site = PuzzleSite::new(&client, &cache, session.as_str());
            if !no_puzzle {
                site.get_puzzle(puzzle.year, puzzle.day, true)?;
                println!("Refreshed puzzle for {} day {}", puzzle.year, puzzle.day);
            }
            if input {
                site.get_input(puzzle.year, puzzle.day, true)?;
                println!("Refreshed input for {} day {}", puzzle.year, puzzle.day);
            }
        }
        Command::Cache => println!("{}", cache.root().display()),
        Command::List => println!("{}", output::format_solvers(&registered())),
    }
    Ok(())
}

/// Cached puzzle page; the session is only needed when it must be fetched
fn puzzle_page(config: &Config, cache: &FileCache, puzzle: Puzzle) -> Result<String, CliError> {
    match cache.read(&puzzle_key(puzzle.year, puzzle.day)) {
        Ok(html) => return Ok(html),
        Err(CacheError::NotCached(_)) => {}
        Err(e) => return Err(e.into()),
    }
    let session = config::session(config)?;
    let client = config.client()?;
    let site = PuzzleSite::new(&client, cache, session.as_str());
    Ok(site.get_puzzle(puzzle.year, puzzle.day, false)?)
}
