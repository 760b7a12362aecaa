//! HTML response parsing utilities

use crate::client::{AnswerHint, SubmissionResult};
use crate::error::AocError;
use regex::Regex;
use scraper::{Html, Selector};
use std::cell::OnceCell;
use std::time::Duration;

/// Parser for AOC HTML responses with cached regex patterns and selectors
#[derive(Clone, Debug)]
pub(crate) struct ResponseParser {
    throttle_regex: OnceCell<Regex>,
    hint_regex: OnceCell<Regex>,
    cooldown_regex: OnceCell<Regex>,
    main_selector: OnceCell<Selector>,
    article_selector: OnceCell<Selector>,
    success_selector: OnceCell<Selector>,
}

impl ResponseParser {
    /// Create a new parser with uninitialized caches
    pub fn new() -> Self {
        Self {
            throttle_regex: OnceCell::new(),
            hint_regex: OnceCell::new(),
            cooldown_regex: OnceCell::new(),
            main_selector: OnceCell::new(),
            article_selector: OnceCell::new(),
            success_selector: OnceCell::new(),
        }
    }

    fn throttle_regex(&self) -> &Regex {
        self.throttle_regex
            .get_or_init(|| Regex::new(r"You have (.+?) left to wait").unwrap())
    }

    fn hint_regex(&self) -> &Regex {
        self.hint_regex
            .get_or_init(|| Regex::new(r"answer is too (low|high)").unwrap())
    }

    fn cooldown_regex(&self) -> &Regex {
        self.cooldown_regex
            .get_or_init(|| Regex::new(r"[Pp]lease wait (.+?) before trying again").unwrap())
    }

    fn main_selector(&self) -> &Selector {
        self.main_selector
            .get_or_init(|| Selector::parse("main").unwrap())
    }

    fn article_selector(&self) -> &Selector {
        self.article_selector
            .get_or_init(|| Selector::parse("main article").unwrap())
    }

    fn success_selector(&self) -> &Selector {
        self.success_selector
            .get_or_init(|| Selector::parse("span.day-success").unwrap())
    }

    /// Extract text content from the main element of an HTML document
    pub fn extract_main_text(&self, html: &str) -> Result<String, AocError> {
        let document = Html::parse_document(html);
        Self::main_text(&document, self.main_selector())
    }

    fn main_text(document: &Html, selector: &Selector) -> Result<String, AocError> {
        let main_element = document
            .select(selector)
            .next()
            .ok_or(AocError::HtmlParse)?;

        Ok(main_element.text().collect::<String>())
    }

    /// Extract throttle duration from response text
    fn extract_throttle_duration(&self, text: &str) -> Option<Duration> {
        let captures = self.throttle_regex().captures(text)?;
        parse_wait_duration(captures.get(1)?.as_str())
    }

    /// Parse submission response and determine the result
    pub fn parse_submission_response(&self, html: &str) -> Result<SubmissionResult, AocError> {
        let document = Html::parse_document(html);
        let text = Self::main_text(&document, self.main_selector())?;
        let message = document
            .select(self.article_selector())
            .next()
            .map(|article| article.text().collect::<String>())
            .unwrap_or_else(|| text.clone())
            .trim()
            .to_string();

        if document.select(self.success_selector()).next().is_some()
            || text.contains("That's the right answer")
        {
            return Ok(SubmissionResult::Correct { message });
        }

        if text.contains("gave an answer too recently") {
            let wait_time = self.extract_throttle_duration(&text);
            return Ok(SubmissionResult::Throttled { wait_time });
        }

        if text.contains("solving the right level") {
            return Ok(SubmissionResult::WrongLevel { message });
        }

        let hint = self
            .hint_regex()
            .captures(&text)
            .and_then(|c| c.get(1))
            .map(|m| match m.as_str() {
                "low" => AnswerHint::TooLow,
                _ => AnswerHint::TooHigh,
            });
        let cooldown = self
            .cooldown_regex()
            .captures(&text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());

        Ok(SubmissionResult::Incorrect {
            hint,
            cooldown,
            message,
        })
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a server-stated wait such as `"30s"`, `"1m 30s"`, `"5 minutes"`
/// or `"one minute"`
pub fn parse_wait_duration(text: &str) -> Option<Duration> {
    let text = text.trim();
    if let Ok(duration) = humantime::parse_duration(text) {
        return Some(duration);
    }

    let mut total = 0u64;
    let mut amount: Option<u64> = None;
    let mut matched = false;
    for token in text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        let token = token.to_ascii_lowercase();
        if let Some(n) = number_word(&token).or_else(|| token.parse().ok()) {
            amount = Some(n);
        } else if let Some(unit) = unit_seconds(&token) {
            if let Some(n) = amount.take() {
                total += n * unit;
                matched = true;
            }
        } else {
            let split = token
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(token.len());
            let compact = token[..split]
                .parse::<u64>()
                .ok()
                .zip(unit_seconds(&token[split..]));
            if let Some((n, unit)) = compact {
                total += n * unit;
                matched = true;
            }
        }
    }
    matched.then(|| Duration::from_secs(total))
}

fn number_word(token: &str) -> Option<u64> {
    Some(match token {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        _ => return None,
    })
}

fn unit_seconds(token: &str) -> Option<u64> {
    Some(match token {
        "d" | "day" | "days" => 86_400,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3_600,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "s" | "sec" | "secs" | "second" | "seconds" => 1,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn page(text: &str) -> String {
        format!(r#"<html><body><main><article><p>{text}</p></article></main></body></html>"#)
    }

    #[test]
    fn test_malformed_html() {
        let parser = ResponseParser::new();
        let html = r#"<html><body><main>Unclosed tag"#;
        // scraper is lenient and will still parse this
        assert!(parser.extract_main_text(html).is_ok());
    }

    #[test]
    fn test_missing_main_is_an_error() {
        let parser = ResponseParser::new();
        let result = parser.parse_submission_response("<html><body><div>x</div></body></html>");
        assert!(matches!(result, Err(AocError::HtmlParse)));
    }

    #[test]
    fn test_correct_via_day_success_marker() {
        let parser = ResponseParser::new();
        let html = r#"<html><body><main><article><p>Nice. <span class="day-success">one gold star</span></p></article></main></body></html>"#;
        assert!(matches!(
            parser.parse_submission_response(html).unwrap(),
            SubmissionResult::Correct { .. }
        ));
    }

    #[test]
    fn test_throttled_without_duration() {
        let parser = ResponseParser::new();
        let html = page("You gave an answer too recently.");
        assert_eq!(
            parser.parse_submission_response(&html).unwrap(),
            SubmissionResult::Throttled { wait_time: None }
        );
    }

    #[test]
    fn test_invalid_duration_string() {
        let parser = ResponseParser::new();
        let html = page("You gave an answer too recently. You have invalid duration left to wait.");
        assert_eq!(
            parser.parse_submission_response(&html).unwrap(),
            SubmissionResult::Throttled { wait_time: None }
        );
    }

    #[test]
    fn test_wrong_level() {
        let parser = ResponseParser::new();
        let html = page("You don't seem to be solving the right level.  Did you already complete it?");
        match parser.parse_submission_response(&html).unwrap() {
            SubmissionResult::WrongLevel { message } => {
                assert!(message.starts_with("You don't seem"));
            }
            other => panic!("Expected WrongLevel, got {other:?}"),
        }
    }

    #[test]
    fn test_incorrect_with_hint_and_cooldown() {
        let parser = ResponseParser::new();
        let html = page(
            "That's not the right answer; your answer is too high.  If you're stuck, \
             make sure you're using the full input data. Please wait one minute before trying again.",
        );
        match parser.parse_submission_response(&html).unwrap() {
            SubmissionResult::Incorrect {
                hint,
                cooldown,
                message,
            } => {
                assert_eq!(hint, Some(AnswerHint::TooHigh));
                assert_eq!(cooldown.as_deref(), Some("one minute"));
                assert!(message.starts_with("That's not the right answer"));
            }
            other => panic!("Expected Incorrect, got {other:?}"),
        }
    }

    #[test]
    fn test_incorrect_without_hint() {
        let parser = ResponseParser::new();
        let html = page("That's not the right answer. Please wait 5 minutes before trying again.");
        assert_eq!(
            parser.parse_submission_response(&html).unwrap(),
            SubmissionResult::Incorrect {
                hint: None,
                cooldown: Some("5 minutes".into()),
                message: "That's not the right answer. Please wait 5 minutes before trying again."
                    .into(),
            }
        );
    }

    #[test]
    fn test_parse_wait_duration_forms() {
        assert_eq!(parse_wait_duration("30s"), Some(Duration::from_secs(30)));
        assert_eq!(parse_wait_duration("1m 30s"), Some(Duration::from_secs(90)));
        assert_eq!(parse_wait_duration("one minute"), Some(Duration::from_secs(60)));
        assert_eq!(parse_wait_duration("5 minutes"), Some(Duration::from_secs(300)));
        assert_eq!(
            parse_wait_duration("1 hour, 2 minutes and 3 seconds"),
            Some(Duration::from_secs(3723))
        );
        assert_eq!(parse_wait_duration("a while"), None);
    }

    // **Feature: aoc-http-client, Property 9: HTML main element extraction**
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn prop_html_main_element_extraction(
            text_content in "[a-zA-Z0-9 .,!?\\n]{1,200}",
            has_nested_tags in prop::bool::ANY,
        ) {
            let html = if has_nested_tags {
                format!(
                    r#"<html><body><main><p>{}</p><div><span>nested</span></div></main></body></html>"#,
                    text_content
                )
            } else {
                format!(r#"<html><body><main>{}</main></body></html>"#, text_content)
            };

            let parser = ResponseParser::new();
            let extracted = parser.extract_main_text(&html);
            prop_assert!(extracted.is_ok());
            let extracted = extracted.unwrap();

            prop_assert!(extracted.contains(text_content.trim()));
            prop_assert!(!extracted.contains('<') && !extracted.contains('>'));
            if has_nested_tags {
                prop_assert!(extracted.contains("nested"));
            }
        }
    }

    // **Feature: aoc-http-client, Property 5: Incorrect answer detection**
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn prop_unrecognized_text_is_incorrect(
            prefix in "[a-zA-Z0-9 .,!?]{0,100}",
            suffix in "[a-zA-Z0-9 .,!?]{0,100}",
        ) {
            let html = page(&format!("{prefix} That's not the right answer. {suffix}"));
            let result = ResponseParser::new().parse_submission_response(&html);
            prop_assert!(
                matches!(result, Ok(SubmissionResult::Incorrect { .. })),
                "expected Incorrect, got {:?}",
                result
            );
        }
    }

    // **Feature: aoc-http-client, Property 7: Throttling detection**
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn prop_throttle_duration_extraction(
            minutes in 0u64..60u64,
            seconds in 0u64..60u64,
            prefix in "[a-zA-Z0-9 .,!?]{0,50}",
        ) {
            prop_assume!(minutes > 0 || seconds > 0);

            let duration_str = match (minutes, seconds) {
                (0, s) => format!("{s}s"),
                (m, 0) => format!("{m}m"),
                (m, s) => format!("{m}m {s}s"),
            };
            let html = page(&format!(
                "{prefix} You gave an answer too recently; you have to wait after submitting an \
                 answer before trying again.  You have {duration_str} left to wait."
            ));

            match ResponseParser::new().parse_submission_response(&html).unwrap() {
                SubmissionResult::Throttled { wait_time } => {
                    prop_assert_eq!(wait_time, Some(Duration::from_secs(minutes * 60 + seconds)));
                }
                other => prop_assert!(false, "Expected Throttled result, got {:?}", other),
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn prop_spelled_out_waits(
            count in 1u64..=10,
            unit in prop::sample::select(vec![("second", 1u64), ("minute", 60), ("hour", 3600)]),
        ) {
            let words = ["one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten"];
            let plural = if count == 1 { "" } else { "s" };
            let text = format!("{} {}{}", words[(count - 1) as usize], unit.0, plural);
            prop_assert_eq!(parse_wait_duration(&text), Some(Duration::from_secs(count * unit.1)));
        }
    }
}
