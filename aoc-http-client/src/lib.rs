//! AOC HTTP client library
//!
//! Blocking transport to the Advent of Code website: puzzle pages, personal
//! inputs and answer submission, with the submission reply classified into a
//! [`SubmissionResult`].
//!
//! # Features
//!
//! - Redirects are never followed; an expired session surfaces as
//!   [`AocError::SessionExpired`]
//! - Secure TLS using rustls, with optional extra root certificates
//! - Session cookie kept out of logs and zeroized after use
//!
//! # Example
//!
//! ```no_run
//! use aoc_http_client::{AocClient, SubmissionResult};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AocClient::new()?;
//! let session = "your_session_cookie_here";
//!
//! let input = client.get_input(2024, 1, session)?;
//! let result = client.post_answer(2024, 1, 1, "42", session)?;
//! if let SubmissionResult::Throttled { wait_time } = result {
//!     println!("Throttled: {:?}", wait_time);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod parser;

pub use client::{AnswerHint, AocClient, AocClientBuilder, PageResponse, SubmissionResult};
pub use error::AocError;
pub use parser::parse_wait_duration;
pub use reqwest::Method;
