//! Puzzle pages and inputs, fetched once and served from the cache

use crate::cache::FileCache;
use crate::error::{CacheError, SiteError};
use aoc_examples::trim_trailing_blank;
use aoc_http_client::{AocClient, AocError, SubmissionResult};
use tracing::debug;

pub fn puzzle_key(year: u16, day: u8) -> String {
    format!("puzzles/{}/{}.html", year, day)
}

pub fn input_key(year: u16, day: u8) -> String {
    format!("inputs/{}/{}", year, day)
}

/// The site as seen through the cache
pub struct PuzzleSite<'a> {
    client: &'a AocClient,
    cache: &'a FileCache,
    session: &'a str,
}

impl<'a> PuzzleSite<'a> {
    pub fn new(client: &'a AocClient, cache: &'a FileCache, session: &'a str) -> Self {
        Self {
            client,
            cache,
            session,
        }
    }

    pub fn cache(&self) -> &'a FileCache {
        self.cache
    }

    /// Puzzle page HTML; `force_refresh` skips the cached copy
    pub fn get_puzzle(&self, year: u16, day: u8, force_refresh: bool) -> Result<String, SiteError> {
        let key = puzzle_key(year, day);
        self.cached_or_fetch(&key, force_refresh, || {
            self.client.get_puzzle(year, day, self.session)
        })
    }

    /// Input lines without trailing blank lines
    pub fn get_input(&self, year: u16, day: u8, force_refresh: bool) -> Result<Vec<String>, SiteError> {
        let key = input_key(year, day);
        let text = self.cached_or_fetch(&key, force_refresh, || {
            let raw = self.client.get_input(year, day, self.session)?;
            let mut lines: Vec<String> = raw.split('\n').map(str::to_string).collect();
            trim_trailing_blank(&mut lines);
            Ok(lines.join("\n"))
        })?;
        Ok(text.split('\n').map(str::to_string).collect())
    }

    pub fn post_answer(
        &self,
        year: u16,
        day: u8,
        part: u8,
        answer: &str,
    ) -> Result<SubmissionResult, SiteError> {
        Ok(self.client.post_answer(year, day, part, answer, self.session)?)
    }

    fn cached_or_fetch<F>(&self, key: &str, force_refresh: bool, fetch: F) -> Result<String, SiteError>
    where
        F: FnOnce() -> Result<String, AocError>,
    {
        if !force_refresh {
            match self.cache.read(key) {
                Ok(text) => return Ok(text),
                Err(CacheError::NotCached(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }
        debug!(key, force_refresh, "Fetching from site");
        let text = fetch()?;
        self.cache.write(key, &text)?;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn client_for(server: &mockito::Server) -> AocClient {
        AocClient::builder()
            .base_url(server.url())
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_puzzle_fetched_once() {
        let mut server = mockito::Server::new();
        let page = server
            .mock("GET", "/2023/day/1")
            .with_status(200)
            .with_body("<main><article>Trebuchet</article></main>")
            .expect(1)
            .create();

        let temp = TempDir::new().unwrap();
        let cache = FileCache::new(temp.path());
        let client = client_for(&server);
        let site = PuzzleSite::new(&client, &cache, "abc");

        let first = site.get_puzzle(2023, 1, false).unwrap();
        let second = site.get_puzzle(2023, 1, false).unwrap();
        assert_eq!(first, second);
        assert!(cache.read("puzzles/2023/1.html").unwrap().contains("Trebuchet"));
        page.assert();
    }

    #[test]
    fn test_force_refresh_refetches() {
        let mut server = mockito::Server::new();
        let page = server
            .mock("GET", "/2023/day/2")
            .with_status(200)
            .with_body("fresh")
            .expect(1)
            .create();

        let temp = TempDir::new().unwrap();
        let cache = FileCache::new(temp.path());
        cache.write(&puzzle_key(2023, 2), "stale").unwrap();
        let client = client_for(&server);
        let site = PuzzleSite::new(&client, &cache, "abc");

        assert_eq!(site.get_puzzle(2023, 2, true).unwrap(), "fresh");
        assert_eq!(cache.read(&puzzle_key(2023, 2)).unwrap(), "fresh");
        page.assert();
    }

    #[test]
    fn test_input_trailing_blank_lines_trimmed() {
        let mut server = mockito::Server::new();
        let input = server
            .mock("GET", "/2022/day/1/input")
            .with_status(200)
            .with_body("1000\n2000\n\n4000\n\n")
            .expect(1)
            .create();

        let temp = TempDir::new().unwrap();
        let cache = FileCache::new(temp.path());
        let client = client_for(&server);
        let site = PuzzleSite::new(&client, &cache, "abc");

        let lines = site.get_input(2022, 1, false).unwrap();
        assert_eq!(lines, vec!["1000", "2000", "", "4000"]);
        assert_eq!(cache.read("inputs/2022/1").unwrap(), "1000\n2000\n\n4000");
        assert_eq!(site.get_input(2022, 1, false).unwrap(), lines);
        input.assert();
    }

    #[test]
    fn test_expired_session_is_not_cached() {
        let mut server = mockito::Server::new();
        let _redirect = server
            .mock("GET", "/2022/day/3/input")
            .with_status(302)
            .with_header("location", "/2022/day/3")
            .create();

        let temp = TempDir::new().unwrap();
        let cache = FileCache::new(temp.path());
        let client = client_for(&server);
        let site = PuzzleSite::new(&client, &cache, "abc");

        assert!(matches!(
            site.get_input(2022, 3, false),
            Err(SiteError::Http(AocError::SessionExpired))
        ));
        assert!(matches!(cache.read("inputs/2022/3"), Err(CacheError::NotCached(_))));
    }
}
