//! Output formatting for the subcommands

use aoc_runner::report::format_duration;
use aoc_runner::{RunReport, SolverPlugin};
use chrono::TimeDelta;
use itertools::Itertools;

/// Summary printed after `run`
pub fn format_summary(report: &RunReport) -> String {
    let passed = report.checks.iter().filter(|c| c.passed()).count();
    let failed = report.checks.len() - passed;
    let solve_time: TimeDelta = report
        .checks
        .iter()
        .map(|c| c.elapsed)
        .chain(report.submission.iter().map(|s| s.elapsed))
        .sum();

    format!(
        "--- Summary ---\nChecks: {} passed, {} failed\nTotal solve time: {}",
        passed,
        failed,
        format_duration(solve_time)
    )
}

/// Element texts with their indexes; multi-line texts continue indented
pub fn format_index<'a>(texts: impl IntoIterator<Item = &'a str>) -> String {
    texts
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            let mut lines = text.split('\n');
            let first = lines.next().unwrap_or_default();
            let mut entry = format!("{:>3}: {}", index, first);
            for line in lines {
                entry.push_str("\n     ");
                entry.push_str(line);
            }
            entry
        })
        .join("\n")
}

/// Registered solvers, one line per year
pub fn format_solvers(plugins: &[&SolverPlugin]) -> String {
    if plugins.is_empty() {
        return "No solvers registered.".to_string();
    }
    plugins
        .iter()
        .chunk_by(|plugin| plugin.year)
        .into_iter()
        .map(|(year, days)| format!("{}: {}", year, days.map(|p| p.day).join(", ")))
        .join("\n")
}
