use anyhow::{Context, anyhow};
use aoc_runner::{AdditionalInfo, SolveError, SolverPlugin};

inventory::submit! {
    SolverPlugin { year: 2025, day: 1, solver: &solve, tags: &["khangp0000"] }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct DialCounts {
    zero_counts: u32,
    pass_zero_counts: u32,
}

fn solve(
    inputs: &[String],
    part: u8,
    _test: bool,
    _info: Option<&AdditionalInfo>,
) -> Result<String, SolveError> {
    let rotations = parse(inputs).map_err(|e| SolveError::SolveFailed(e.into()))?;
    let counts = turn_dial(&rotations);
    match part {
        1 => Ok(counts.zero_counts.to_string()),
        2 => Ok(counts.pass_zero_counts.to_string()),
        _ => Err(SolveError::PartNotImplemented(part)),
    }
}

fn parse(inputs: &[String]) -> anyhow::Result<Vec<i32>> {
    inputs
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(line_idx, line)| {
            let negative = match line.as_bytes().first() {
                Some(b'L') => true,
                Some(b'R') => false,
                _ => return Err(anyhow!("(line {}) first character need to be 'L' or 'R'", line_idx + 1)),
            };
            let value: i32 = line[1..]
                .parse()
                .with_context(|| format!("(line {})", line_idx + 1))?;
            if value < 0 {
                return Err(anyhow!("(line {}) rotate value must be non negative", line_idx + 1));
            }
            Ok(if negative { -value } else { value })
        })
        .collect()
}

fn turn_dial(rotations: &[i32]) -> DialCounts {
    let mut dial = 50i32;
    let mut counts = DialCounts::default();
    for rotation in rotations {
        let old = dial;
        dial += rotation;
        if dial <= 0 && old != 0 {
            counts.pass_zero_counts += 1;
        }
        counts.pass_zero_counts += (dial / 100).unsigned_abs();
        dial = dial.rem_euclid(100);
        if dial == 0 {
            counts.zero_counts += 1;
        }
    }
    counts
}
