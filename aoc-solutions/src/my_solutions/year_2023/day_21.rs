use anyhow::{Context, anyhow, bail};
use aoc_runner::{AdditionalInfo, SolveError, SolverPlugin};
use std::collections::{HashSet, VecDeque};

inventory::submit! {
    SolverPlugin { year: 2023, day: 21, solver: &solve, tags: &["bfs", "additional-info"] }
}

const PART1_STEPS: u64 = 64;
const PART2_STEPS: u64 = 26_501_365;

fn solve(
    inputs: &[String],
    part: u8,
    test: bool,
    info: Option<&AdditionalInfo>,
) -> Result<String, SolveError> {
    let failed = |e: anyhow::Error| SolveError::SolveFailed(e.into());
    let garden = Garden::parse(inputs).map_err(failed)?;
    let steps = match info.and_then(|info| info.get("steps")) {
        Some(steps) => steps
            .trim()
            .parse::<u64>()
            .with_context(|| format!("steps {:?}", steps))
            .map_err(failed)?,
        None if part == 1 => PART1_STEPS,
        None => PART2_STEPS,
    };
    match part {
        1 => Ok(garden.reachable(steps, false).to_string()),
        2 if test => Ok(garden.reachable(steps, true).to_string()),
        2 => garden.reachable_by_growth(steps).map(|n| n.to_string()).map_err(failed),
        _ => Err(SolveError::PartNotImplemented(part)),
    }
}

struct Garden {
    rocks: HashSet<(i64, i64)>,
    size: i64,
    start: (i64, i64),
}

impl Garden {
    fn parse(inputs: &[String]) -> anyhow::Result<Self> {
        let rows: Vec<&str> = inputs.iter().map(|l| l.trim()).filter(|l| !l.is_empty()).collect();
        let size = rows.len() as i64;
        let mut rocks = HashSet::new();
        let mut start = None;
        for (r, row) in rows.iter().enumerate() {
            if row.len() as i64 != size {
                bail!("row {} is not {} wide", r + 1, size);
            }
            for (c, cell) in row.chars().enumerate() {
                match cell {
                    '#' => {
                        rocks.insert((r as i64, c as i64));
                    }
                    'S' => start = Some((r as i64, c as i64)),
                    '.' => {}
                    other => bail!("unexpected {:?} at row {}", other, r + 1),
                }
            }
        }
        let start = start.ok_or_else(|| anyhow!("no starting position"))?;
        Ok(Self { rocks, size, start })
    }

    fn is_rock(&self, (r, c): (i64, i64)) -> bool {
        self.rocks
            .contains(&(r.rem_euclid(self.size), c.rem_euclid(self.size)))
    }

    fn in_bounds(&self, (r, c): (i64, i64)) -> bool {
        (0..self.size).contains(&r) && (0..self.size).contains(&c)
    }

    /// Plots reachable in exactly `steps`; `tiled` repeats the map forever
    fn reachable(&self, steps: u64, tiled: bool) -> u64 {
        let mut seen = HashSet::from([self.start]);
        let mut queue = VecDeque::from([(self.start, 0u64)]);
        let mut count = 0;
        while let Some((plot, distance)) = queue.pop_front() {
            if distance % 2 == steps % 2 {
                count += 1;
            }
            if distance == steps {
                continue;
            }
            let (r, c) = plot;
            for next in [(r - 1, c), (r + 1, c), (r, c - 1), (r, c + 1)] {
                if (tiled || self.in_bounds(next)) && !self.is_rock(next) && seen.insert(next) {
                    queue.push_back((next, distance + 1));
                }
            }
        }
        count
    }

    /// Quadratic growth over whole map widths, valid when the start row and
    /// column are clear
    fn reachable_by_growth(&self, steps: u64) -> anyhow::Result<u64> {
        let size = self.size as u64;
        let rem = steps % size;
        if steps <= rem + 2 * size {
            return Ok(self.reachable(steps, true));
        }
        let a0 = self.reachable(rem, true) as i128;
        let a1 = self.reachable(rem + size, true) as i128;
        let a2 = self.reachable(rem + 2 * size, true) as i128;
        let k = ((steps - rem) / size) as i128;
        let total = a0 + k * (a1 - a0) + k * (k - 1) / 2 * (a2 - 2 * a1 + a0);
        u64::try_from(total).context("plot count out of range")
    }
}
