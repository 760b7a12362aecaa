//! Settings read once at start-up and passed to every component

use crate::cache::FileCache;
use aoc_http_client::{AocClient, AocError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use zeroize::Zeroizing;

pub const SESSION_VAR: &str = "AOC_SESSION_COOKIE";
pub const CERTIFICATE_VAR: &str = "CERTIFICATE";
pub const CERTIFICATE_FILE_VAR: &str = "CERTIFICATE_FILE";
pub const CACHE_DIR_VAR: &str = "AOC_CACHE_DIR";
pub const LEADERBOARD_VAR: &str = "AOC_LEADERBOARD_ID";
pub const MEMBER_VAR: &str = "AOC_MEMBER_ID";
pub const BASE_URL_VAR: &str = "AOC_BASE_URL";

const CACHE_DIR_NAME: &str = "AoC-Copilot";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    CertificateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("No cache directory: set {CACHE_DIR_VAR}")]
    NoCacheDir,
    #[error(transparent)]
    Client(#[from] AocError),
}

/// Resolved runtime configuration
pub struct Config {
    /// Session cookie value (zeroized on drop)
    pub session: Option<Zeroizing<String>>,
    /// Extra root certificate in PEM form
    pub ca_cert: Option<String>,
    pub cache_dir: PathBuf,
    pub leaderboard_id: Option<String>,
    pub member_id: Option<String>,
    pub base_url: Option<String>,
}

impl Config {
    /// Build from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let ca_cert = match (var(CERTIFICATE_VAR), var(CERTIFICATE_FILE_VAR)) {
            (Some(pem), _) => Some(pem),
            (None, Some(file)) => {
                let path = expand_tilde(Path::new(&file));
                let pem = fs::read_to_string(&path)
                    .map_err(|source| ConfigError::CertificateFile { path, source })?;
                Some(pem)
            }
            (None, None) => None,
        };

        let cache_dir = match var(CACHE_DIR_VAR) {
            Some(dir) => expand_tilde(Path::new(&dir)),
            None => dirs::config_dir()
                .ok_or(ConfigError::NoCacheDir)?
                .join(CACHE_DIR_NAME),
        };

        Ok(Config {
            session: var(SESSION_VAR).map(Zeroizing::new),
            ca_cert,
            cache_dir,
            leaderboard_id: var(LEADERBOARD_VAR),
            member_id: var(MEMBER_VAR),
            base_url: var(BASE_URL_VAR),
        })
    }

    pub fn cache(&self) -> FileCache {
        FileCache::new(&self.cache_dir)
    }

    /// HTTP client honouring the base URL and extra certificate
    pub fn client(&self) -> Result<AocClient, ConfigError> {
        let mut builder = AocClient::builder();
        if let Some(url) = &self.base_url {
            builder = builder.base_url(url.as_str())?;
        }
        if let Some(pem) = &self.ca_cert {
            builder = builder.ca_certificate(pem)?;
        }
        Ok(builder.build()?)
    }
}

/// Switches for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Only check examples, never touch the real input
    pub tests_only: bool,
    /// Go straight to the real input
    pub skip_tests: bool,
    /// Restrict the run to one part
    pub only_part: Option<u8>,
    /// Submit without asking for confirmation
    pub force_submit: bool,
    /// Refetch the puzzle page even when cached
    pub force_refresh: bool,
}

impl RunOptions {
    pub fn wants(&self, part: u8) -> bool {
        self.only_part.is_none_or(|only| only == part)
    }
}

/// Expand ~ to home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str()
        && (path_str.starts_with("~/") || path_str == "~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path_str.trim_start_matches('~').trim_start_matches('/'));
    }
    path.to_path_buf()
}
