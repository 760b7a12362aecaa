//! Fetch a puzzle page and its input with a session from the environment
//!
//! ```text
//! AOC_SESSION_COOKIE=... cargo run -p aoc-http-client --example basic_usage -- 2023 1
//! ```

use aoc_http_client::AocClient;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let session = std::env::var("AOC_SESSION_COOKIE")?;
    let mut args = std::env::args().skip(1);
    let year: u16 = args.next().unwrap_or_else(|| "2023".into()).parse()?;
    let day: u8 = args.next().unwrap_or_else(|| "1".into()).parse()?;

    let client = AocClient::builder()
        .client_builder(
            reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(30))
                .use_rustls_tls(),
        )
        .build()?;

    let puzzle = client.get_puzzle(year, day, &session)?;
    println!("Puzzle page: {} bytes", puzzle.len());

    let input = client.get_input(year, day, &session)?;
    println!("Input: {} lines", input.lines().count());
    Ok(())
}
