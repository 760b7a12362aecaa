//! AOC HTTP client implementation

use crate::error::AocError;
use crate::parser::ResponseParser;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use std::time::Duration;
use tracing::{debug, info};
use zeroize::Zeroize;

const DEFAULT_BASE_URL: &str = "https://adventofcode.com";
const USER_AGENT: &str = concat!("aoc-http-client/", env!("CARGO_PKG_VERSION"));
const INPUTS_DIFFER: &str = "Puzzle inputs differ by user";

/// Direction given by the site for a wrong numeric answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerHint {
    TooLow,
    TooHigh,
}

/// Result of an answer submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    /// Answer was correct
    Correct { message: String },
    /// The part was already solved, e.g. directly on the website
    WrongLevel { message: String },
    /// Submission was throttled
    Throttled {
        /// Optional wait time before next submission
        wait_time: Option<Duration>,
    },
    /// Answer was rejected
    Incorrect {
        hint: Option<AnswerHint>,
        /// Cooldown as the server phrased it, e.g. `"one minute"`
        cooldown: Option<String>,
        message: String,
    },
}

/// Raw response of [`AocClient::fetch_page`]
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// The main AOC HTTP client
///
/// Redirects are never followed: the site answers a missing or expired
/// session with a redirect, which [`AocClient::get_puzzle`],
/// [`AocClient::get_input`] and [`AocClient::post_answer`] report as
/// [`AocError::SessionExpired`].
///
/// # Example
///
/// ```no_run
/// use aoc_http_client::AocClient;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = AocClient::new()?;
/// let session = "your_session_cookie";
///
/// let input = client.get_input(2024, 1, session)?;
/// println!("Input: {}", input);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct AocClient {
    client: reqwest::blocking::Client,
    base_url: reqwest::Url,
    parser: ResponseParser,
}

impl AocClient {
    /// Create a new AOC client with rustls-tls configuration and no redirect policy
    ///
    /// # Errors
    ///
    /// Returns `AocError::ClientInit` if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self, AocError> {
        Self::builder().build()
    }

    /// Create a builder for configuring the AOC client
    pub fn builder() -> AocClientBuilder {
        AocClientBuilder::new()
    }

    /// Create a secure cookie header value from a session string
    ///
    /// Accepts the bare cookie value or `session=<value>`. The header is
    /// marked sensitive and the temporary string is zeroized.
    fn create_cookie_header(session: &str) -> Result<HeaderValue, AocError> {
        let value = session.trim();
        let value = value.strip_prefix("session=").unwrap_or(value);
        let mut cookie_string = format!("session={}", value);
        let header_value = HeaderValue::from_bytes(cookie_string.as_bytes())
            .map_err(|_| AocError::ClientInit("Invalid session cookie format".to_string()));
        cookie_string.zeroize();

        let mut sensitive_header = header_value?;
        sensitive_header.set_sensitive(true);
        Ok(sensitive_header)
    }

    /// Send one request and return status, headers and body untouched
    ///
    /// `segments` are URL path segments below the base URL. A redirect is
    /// returned as-is; interpreting it is up to the caller.
    pub fn fetch_page(
        &self,
        method: Method,
        segments: &[&str],
        session: &str,
        form: Option<&[(&str, &str)]>,
    ) -> Result<PageResponse, AocError> {
        let cookie_header = Self::create_cookie_header(session)?;

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AocError::ClientInit("Cannot modify base URL path".to_string()))?
            .clear()
            .extend(segments);

        debug!(%method, %url, "Sending request");
        let mut request = self
            .client
            .request(method, url)
            .header(COOKIE, cookie_header);
        if let Some(form) = form {
            request = request.form(form);
        }

        let response = request.send().map_err(AocError::from_transport)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().map_err(|_| AocError::Encoding)?;

        Ok(PageResponse {
            status,
            headers,
            body,
        })
    }

    /// Like [`AocClient::fetch_page`], but only a successful page is `Ok`
    fn fetch_success(
        &self,
        method: Method,
        segments: &[&str],
        session: &str,
        form: Option<&[(&str, &str)]>,
    ) -> Result<String, AocError> {
        let page = self.fetch_page(method, segments, session, form)?;

        if page.status.is_redirection() || page.body.contains(INPUTS_DIFFER) {
            return Err(AocError::SessionExpired);
        }
        if !page.status.is_success() {
            return Err(AocError::InvalidStatus {
                status: page.status,
            });
        }
        Ok(page.body)
    }

    /// Fetch the puzzle description page (HTML)
    pub fn get_puzzle(&self, year: u16, day: u8, session: &str) -> Result<String, AocError> {
        info!(year, day, "Fetching puzzle");
        let (year, day) = (year.to_string(), day.to_string());
        self.fetch_success(Method::GET, &[year.as_str(), "day", day.as_str()], session, None)
    }

    /// Fetch puzzle input for a specific year and day
    ///
    /// # Errors
    ///
    /// * `AocError::SessionExpired` - Redirect, or the site asks to log in
    /// * `AocError::Request` - Network error
    /// * `AocError::InvalidStatus` - HTTP error (e.g., 404 if puzzle not available)
    /// * `AocError::Encoding` - Response is not valid UTF-8
    pub fn get_input(&self, year: u16, day: u8, session: &str) -> Result<String, AocError> {
        info!(year, day, "Fetching input");
        let (year, day) = (year.to_string(), day.to_string());
        self.fetch_success(
            Method::GET,
            &[year.as_str(), "day", day.as_str(), "input"],
            session,
            None,
        )
    }

    /// Post an answer for a puzzle part and classify the reply
    ///
    /// # Example
    ///
    /// ```no_run
    /// use aoc_http_client::{AocClient, SubmissionResult};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = AocClient::new()?;
    /// match client.post_answer(2024, 1, 1, "42", "your_session_cookie")? {
    ///     SubmissionResult::Correct { .. } => println!("Correct!"),
    ///     SubmissionResult::Incorrect { hint, .. } => println!("Wrong ({:?})", hint),
    ///     SubmissionResult::WrongLevel { message } => println!("{}", message),
    ///     SubmissionResult::Throttled { wait_time } => println!("Wait: {:?}", wait_time),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn post_answer(
        &self,
        year: u16,
        day: u8,
        part: u8,
        answer: &str,
        session: &str,
    ) -> Result<SubmissionResult, AocError> {
        info!(year, day, part, answer, "Submitting answer");
        let (year_s, day_s, level) = (year.to_string(), day.to_string(), part.to_string());
        let form = [("level", level.as_str()), ("answer", answer)];
        let html = self.fetch_success(
            Method::POST,
            &[year_s.as_str(), "day", day_s.as_str(), "answer"],
            session,
            Some(form.as_slice()),
        )?;
        self.parser.parse_submission_response(&html)
    }
}

/// Builder for configuring an AOC HTTP client
///
/// # Example
///
/// ```no_run
/// use aoc_http_client::AocClient;
/// use std::time::Duration;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = AocClient::builder()
///     .base_url("http://localhost:1234")?
///     .client_builder(
///         reqwest::blocking::Client::builder()
///             .timeout(Duration::from_secs(10))
///     )
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AocClientBuilder {
    base_url: Option<reqwest::Url>,
    client_builder: Option<reqwest::blocking::ClientBuilder>,
    root_certificates: Vec<reqwest::Certificate>,
}

impl AocClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            base_url: None,
            client_builder: None,
            root_certificates: Vec::new(),
        }
    }

    /// Set a custom base URL for the client
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn base_url(mut self, url: impl reqwest::IntoUrl) -> Result<Self, AocError> {
        self.base_url = Some(url.into_url()?);
        Ok(self)
    }

    /// Set a custom HTTP client builder
    ///
    /// The redirect policy and user agent are always overridden.
    pub fn client_builder(mut self, builder: reqwest::blocking::ClientBuilder) -> Self {
        self.client_builder = Some(builder);
        self
    }

    /// Trust the root certificate(s) in a PEM bundle
    pub fn ca_certificate(mut self, pem: &str) -> Result<Self, AocError> {
        let certificates = reqwest::Certificate::from_pem_bundle(pem.as_bytes())
            .map_err(|e| AocError::InvalidCertificate(e.to_string()))?;
        if certificates.is_empty() {
            return Err(AocError::InvalidCertificate(
                "no certificate found in PEM text".to_string(),
            ));
        }
        self.root_certificates.extend(certificates);
        Ok(self)
    }

    /// Build the AOC client with the configured settings
    pub fn build(self) -> Result<AocClient, AocError> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => reqwest::Url::parse(DEFAULT_BASE_URL)
                .map_err(|e| AocError::ClientInit(e.to_string()))?,
        };

        let builder = self
            .client_builder
            .unwrap_or_else(|| reqwest::blocking::Client::builder().use_rustls_tls());
        let builder = self
            .root_certificates
            .into_iter()
            .fold(builder, |builder, cert| builder.add_root_certificate(cert));

        let client = builder
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AocError::ClientInit(e.to_string()))?;

        Ok(AocClient {
            client,
            base_url,
            parser: ResponseParser::new(),
        })
    }
}

impl Default for AocClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn client_for(server: &mockito::Server) -> AocClient {
        AocClient::builder()
            .base_url(server.url())
            .unwrap()
            .build()
            .unwrap()
    }

    // **Feature: aoc-http-client, Property 11: Base URL configuration**
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn prop_base_url_configuration(
            scheme in prop::sample::select(vec!["http", "https"]),
            host in "[a-z]{3,10}",
            port in 1000u16..10000u16,
        ) {
            let base_url = format!("{}://{}:{}", scheme, host, port);
            let client = AocClient::builder()
                .base_url(&base_url)
                .unwrap()
                .build()
                .unwrap();

            prop_assert_eq!(client.base_url.scheme(), scheme);
            prop_assert_eq!(client.base_url.host_str(), Some(host.as_str()));
            prop_assert_eq!(client.base_url.port(), Some(port));
        }
    }

    #[test]
    fn test_default_base_url() {
        let client = AocClient::builder().build().unwrap();
        assert_eq!(client.base_url.as_str(), "https://adventofcode.com/");
    }

    // **Feature: aoc-http-client, Property 13: Custom ClientBuilder configuration**
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn prop_custom_client_builder_configuration(timeout_secs in 1u64..120u64) {
            let custom_builder = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .use_rustls_tls();

            let result = AocClient::builder().client_builder(custom_builder).build();
            prop_assert!(result.is_ok());
        }
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(AocClient::builder().base_url("not a valid url").is_err());
    }

    #[test]
    fn test_invalid_certificate() {
        let result = AocClient::builder().ca_certificate("not a certificate");
        assert!(matches!(result, Err(AocError::InvalidCertificate(_))));
    }

    // **Feature: aoc-http-client, Property 14: Redirect policy enforcement**
    #[test]
    fn test_redirect_means_expired_session() {
        let mut server = mockito::Server::new();

        let base_mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("<html><body>Home page</body></html>")
            .expect(0)
            .create();
        let puzzle_mock = server
            .mock("GET", "/2023/day/1")
            .with_status(302)
            .with_header("location", "/")
            .expect(1)
            .create();

        let result = client_for(&server).get_puzzle(2023, 1, "expired");
        assert!(matches!(result, Err(AocError::SessionExpired)));

        base_mock.assert();
        puzzle_mock.assert();
    }

    #[test]
    fn test_fetch_page_returns_redirect_untouched() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/2023/day/1")
            .with_status(303)
            .with_header("location", "/")
            .expect(1)
            .create();

        let page = client_for(&server)
            .fetch_page(Method::GET, &["2023", "day", "1"], "abc", None)
            .unwrap();
        assert_eq!(page.status.as_u16(), 303);
        assert_eq!(page.headers.get("location").unwrap(), "/");
        mock.assert();
    }

    #[test]
    fn test_inputs_differ_message_means_expired_session() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/2022/day/3/input")
            .with_status(400)
            .with_body("Puzzle inputs differ by user.  Please log in to get your puzzle input.\n")
            .expect(1)
            .create();

        let result = client_for(&server).get_input(2022, 3, "abc");
        assert!(matches!(result, Err(AocError::SessionExpired)));
        mock.assert();
    }

    #[test]
    fn test_cookie_prefix_is_not_doubled() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/2022/day/3/input")
            .match_header("cookie", "session=abc123")
            .match_header("user-agent", USER_AGENT)
            .with_status(200)
            .with_body("1\n2\n")
            .expect(2)
            .create();

        let client = client_for(&server);
        assert_eq!(client.get_input(2022, 3, "abc123").unwrap(), "1\n2\n");
        assert_eq!(client.get_input(2022, 3, "session=abc123").unwrap(), "1\n2\n");
        mock.assert();
    }

    // **Feature: aoc-http-client, Property 3: Input URL construction**
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn prop_input_url_construction(
            year in 2015u16..2030u16,
            day in 1u8..=25u8,
            session in "[a-f0-9]{32,128}",
        ) {
            let mut server = mockito::Server::new();
            let expected_path = format!("/{}/day/{}/input", year, day);
            let mock = server.mock("GET", expected_path.as_str())
                .with_status(200)
                .with_body("test input data")
                .expect(1)
                .create();

            let result = client_for(&server).get_input(year, day, &session);

            mock.assert();
            prop_assert_eq!(result.unwrap(), "test input data");
        }
    }

    // **Feature: aoc-http-client, Property 4: Submission request construction**
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn prop_submission_request_construction(
            year in 2015u16..2030u16,
            day in 1u8..=25u8,
            part in 1u8..=2u8,
            answer in "[0-9]{1,10}",
            session in "[a-f0-9]{32,128}",
        ) {
            let mut server = mockito::Server::new();
            let expected_path = format!("/{}/day/{}/answer", year, day);
            let mock = server.mock("POST", expected_path.as_str())
                .match_body(mockito::Matcher::AllOf(vec![
                    mockito::Matcher::UrlEncoded("level".into(), part.to_string()),
                    mockito::Matcher::UrlEncoded("answer".into(), answer.clone()),
                ]))
                .with_status(200)
                .with_body(r#"<html><body><main><article><p>That's the right answer!</p></article></main></body></html>"#)
                .expect(1)
                .create();

            let result = client_for(&server).post_answer(year, day, part, &answer, &session);

            mock.assert();
            prop_assert_eq!(
                result.unwrap(),
                SubmissionResult::Correct { message: "That's the right answer!".into() }
            );
        }
    }

    // **Feature: aoc-http-client, Property 10: Non-success status error handling**
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn prop_non_success_status_error_handling(
            year in 2015u16..2030u16,
            day in 1u8..=25u8,
            status_code in prop::sample::select(vec![400, 401, 403, 404, 429, 500, 502, 503, 504]),
        ) {
            let mut server = mockito::Server::new();
            let expected_path = format!("/{}/day/{}/input", year, day);
            let mock = server.mock("GET", expected_path.as_str())
                .with_status(status_code)
                .with_body("Error response")
                .expect(1)
                .create();

            let result = client_for(&server).get_input(year, day, "abc");

            match result {
                Err(AocError::InvalidStatus { status }) => {
                    prop_assert_eq!(status.as_u16(), status_code as u16);
                }
                other => prop_assert!(false, "Expected AocError::InvalidStatus, got {:?}", other),
            }
            mock.assert();
        }
    }
}
