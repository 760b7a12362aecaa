//! Advent of Code puzzle solutions with automatic registration
//!
//! This crate contains actual puzzle solutions organized by year. Each
//! solution submits a [`aoc_runner::SolverPlugin`], so linking this crate is
//! enough for the runner to find it.

#[cfg(feature = "my-solutions")]
pub mod my_solutions;
