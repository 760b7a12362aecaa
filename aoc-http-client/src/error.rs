//! Error types for the AOC HTTP client

use thiserror::Error;

/// Errors that can occur when using the AOC HTTP client
#[derive(Error, Debug)]
pub enum AocError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// TLS handshake failed on certificate verification
    #[error(
        "HTTP request failed: {0}\n\n\
         This happens on networks that inspect encrypted traffic with a self-signed\n\
         certificate (common on corporate networks), but could also indicate a\n\
         man-in-the-middle attack. To trust an extra root certificate, set\n\
         CERTIFICATE=\"<PEM text>\" or CERTIFICATE_FILE=<path>. If one is already set\n\
         and you are not on such a network, try removing it."
    )]
    Certificate(#[source] reqwest::Error),

    /// Redirected to the login page, or told to log in for the input
    #[error(
        "Session cookie is missing or expired. Log in to Advent of Code, copy the \
         value of the `session` cookie and set it as AOC_SESSION_COOKIE"
    )]
    SessionExpired,

    /// Invalid HTTP status code received
    #[error("Invalid HTTP status: {status}")]
    InvalidStatus {
        /// The status code that was received
        status: reqwest::StatusCode,
    },

    /// Failed to decode response as UTF-8
    #[error("Failed to decode response as UTF-8")]
    Encoding,

    /// Failed to parse HTML response
    #[error("Failed to parse HTML response")]
    HtmlParse,

    /// A custom root certificate is not valid PEM
    #[error("Invalid CA certificate: {0}")]
    InvalidCertificate(String),

    /// Client initialization failed
    #[error("Client initialization failed: {0}")]
    ClientInit(String),
}

impl AocError {
    /// Classify a transport failure, singling out certificate problems
    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        let mut current: Option<&dyn std::error::Error> = Some(&error);
        let mut certificate = false;
        while let Some(e) = current {
            if e.to_string().to_ascii_lowercase().contains("certificate") {
                certificate = true;
                break;
            }
            current = e.source();
        }

        if certificate {
            AocError::Certificate(error)
        } else {
            AocError::Request(error)
        }
    }
}
