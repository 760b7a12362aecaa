//! Per-day solving statistics, stored as `stats/{year}.json`

use crate::cache::FileCache;
use crate::error::CacheError;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStats {
    pub day: u8,
    #[serde(default)]
    pub part1_started: Option<DateTime<Utc>>,
    #[serde(default)]
    pub part1_finished: Option<DateTime<Utc>>,
    #[serde(default)]
    pub part2_started: Option<DateTime<Utc>>,
    #[serde(default)]
    pub part2_finished: Option<DateTime<Utc>>,
    #[serde(default)]
    pub part1_avoided_attempts: u32,
    #[serde(default)]
    pub part2_avoided_attempts: u32,
    #[serde(default)]
    pub part1_incorrect_attempts: u32,
    #[serde(default)]
    pub part2_incorrect_attempts: u32,
    #[serde(default)]
    pub part1_solved_elsewhere: bool,
    #[serde(default)]
    pub part2_solved_elsewhere: bool,
}

impl DayStats {
    pub fn new(day: u8) -> Self {
        Self {
            day,
            ..Self::default()
        }
    }

    /// Time spent on a part, from its first run to its accepted answer.
    /// Part 2 counts from part 1's finish when its own start is missing.
    pub fn elapsed(&self, part: u8) -> Option<TimeDelta> {
        let (start, end) = match part {
            1 => (self.part1_started?, self.part1_finished?),
            _ => (
                self.part2_started.or(self.part1_finished)?,
                self.part2_finished?,
            ),
        };
        Some(end - start)
    }

    fn finished_mut(&mut self, part: u8) -> &mut Option<DateTime<Utc>> {
        if part == 1 {
            &mut self.part1_finished
        } else {
            &mut self.part2_finished
        }
    }
}

/// Read-modify-write access to the yearly statistics files
pub struct StatsBook<'a> {
    cache: &'a FileCache,
}

impl<'a> StatsBook<'a> {
    pub fn new(cache: &'a FileCache) -> Self {
        Self { cache }
    }

    fn key(year: u16) -> String {
        format!("stats/{}.json", year)
    }

    pub fn load(&self, year: u16) -> Result<Vec<DayStats>, CacheError> {
        Ok(self.cache.read_json(&Self::key(year))?.unwrap_or_default())
    }

    pub fn get(&self, year: u16, day: u8) -> Result<DayStats, CacheError> {
        Ok(self
            .load(year)?
            .into_iter()
            .find(|stats| stats.day == day)
            .unwrap_or_else(|| DayStats::new(day)))
    }

    fn update(
        &self,
        year: u16,
        day: u8,
        change: impl FnOnce(&mut DayStats),
    ) -> Result<DayStats, CacheError> {
        let mut all = self.load(year)?;
        let index = match all.iter().position(|stats| stats.day == day) {
            Some(index) => index,
            None => {
                all.push(DayStats::new(day));
                all.len() - 1
            }
        };
        change(&mut all[index]);
        let updated = all[index].clone();
        all.sort_by_key(|stats| stats.day);
        self.cache.write_json(&Self::key(year), &all)?;
        Ok(updated)
    }

    /// Stamp the first time part 1 was worked on
    pub fn start_part1(&self, year: u16, day: u8, now: DateTime<Utc>) -> Result<DayStats, CacheError> {
        self.update(year, day, |stats| {
            stats.part1_started.get_or_insert(now);
        })
    }

    /// Stamp the first run after part 1 was accepted
    pub fn start_part2(&self, year: u16, day: u8, now: DateTime<Utc>) -> Result<DayStats, CacheError> {
        self.update(year, day, |stats| {
            stats.part2_started.get_or_insert(now);
        })
    }

    pub fn finish(&self, year: u16, day: u8, part: u8, now: DateTime<Utc>) -> Result<DayStats, CacheError> {
        self.update(year, day, |stats| {
            stats.finished_mut(part).get_or_insert(now);
        })
    }

    /// A submission the local checks stopped
    pub fn avoided_attempt(&self, year: u16, day: u8, part: u8) -> Result<DayStats, CacheError> {
        self.update(year, day, |stats| match part {
            1 => stats.part1_avoided_attempts += 1,
            _ => stats.part2_avoided_attempts += 1,
        })
    }

    pub fn incorrect_attempt(&self, year: u16, day: u8, part: u8) -> Result<DayStats, CacheError> {
        self.update(year, day, |stats| match part {
            1 => stats.part1_incorrect_attempts += 1,
            _ => stats.part2_incorrect_attempts += 1,
        })
    }

    /// The part was solved outside this tool
    pub fn solved_elsewhere(&self, year: u16, day: u8, part: u8, now: DateTime<Utc>) -> Result<DayStats, CacheError> {
        self.update(year, day, |stats| {
            match part {
                1 => stats.part1_solved_elsewhere = true,
                _ => stats.part2_solved_elsewhere = true,
            }
            stats.finished_mut(part).get_or_insert(now);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 12, 10, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_start_is_stamped_once() {
        let temp = TempDir::new().unwrap();
        let cache = FileCache::new(temp.path());
        let book = StatsBook::new(&cache);

        book.start_part1(2023, 10, at(5, 0)).unwrap();
        let stats = book.start_part1(2023, 10, at(6, 0)).unwrap();
        assert_eq!(stats.part1_started, Some(at(5, 0)));
    }

    #[test]
    fn test_elapsed_per_part() {
        let temp = TempDir::new().unwrap();
        let cache = FileCache::new(temp.path());
        let book = StatsBook::new(&cache);

        book.start_part1(2023, 10, at(5, 0)).unwrap();
        book.finish(2023, 10, 1, at(5, 20)).unwrap();
        let stats = book.finish(2023, 10, 2, at(6, 0)).unwrap();

        assert_eq!(stats.elapsed(1), Some(TimeDelta::minutes(20)));
        assert_eq!(stats.elapsed(2), Some(TimeDelta::minutes(40)));
        assert_eq!(DayStats::new(1).elapsed(1), None);
    }

    #[test]
    fn test_part2_counts_from_its_own_start() {
        let temp = TempDir::new().unwrap();
        let cache = FileCache::new(temp.path());
        let book = StatsBook::new(&cache);

        book.start_part1(2023, 10, at(5, 0)).unwrap();
        book.finish(2023, 10, 1, at(5, 20)).unwrap();
        book.start_part2(2023, 10, at(18, 0)).unwrap();
        book.start_part2(2023, 10, at(19, 0)).unwrap();
        let stats = book.finish(2023, 10, 2, at(18, 45)).unwrap();

        assert_eq!(stats.part2_started, Some(at(18, 0)));
        assert_eq!(stats.elapsed(2), Some(TimeDelta::minutes(45)));
        let text = cache.read("stats/2023.json").unwrap();
        assert!(text.contains("\"part2Started\""));
    }

    #[test]
    fn test_counters_persist_sorted_by_day() {
        let temp = TempDir::new().unwrap();
        let cache = FileCache::new(temp.path());
        let book = StatsBook::new(&cache);

        book.incorrect_attempt(2022, 9, 1).unwrap();
        book.avoided_attempt(2022, 3, 2).unwrap();
        book.avoided_attempt(2022, 3, 2).unwrap();
        book.solved_elsewhere(2022, 3, 1, at(1, 0)).unwrap();

        let all = book.load(2022).unwrap();
        assert_eq!(all.iter().map(|s| s.day).collect::<Vec<_>>(), vec![3, 9]);
        assert_eq!(all[0].part2_avoided_attempts, 2);
        assert!(all[0].part1_solved_elsewhere);
        assert_eq!(all[0].part1_finished, Some(at(1, 0)));
        assert_eq!(all[1].part1_incorrect_attempts, 1);
        assert_eq!(book.get(2022, 25).unwrap(), DayStats::new(25));
    }

    #[test]
    fn test_camel_case_file_format() {
        let temp = TempDir::new().unwrap();
        let cache = FileCache::new(temp.path());
        StatsBook::new(&cache).avoided_attempt(2021, 1, 1).unwrap();

        let text = cache.read("stats/2021.json").unwrap();
        assert!(text.contains("\"part1AvoidedAttempts\": 1"));
    }
}
