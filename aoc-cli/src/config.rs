//! Configuration and session resolution

use crate::error::CliError;
use aoc_runner::Config;
use aoc_runner::config::SESSION_VAR;
use std::fs;
use std::path::Path;
use zeroize::Zeroizing;

/// Session cookie from the configuration, prompting when it is missing
pub fn session(config: &Config) -> Result<Zeroizing<String>, CliError> {
    match &config.session {
        Some(session) => Ok(session.clone()),
        None => prompt_session(&format!(
            "{} is not set. Log in to adventofcode.com and copy the value of the `session` cookie.",
            SESSION_VAR
        )),
    }
}

/// Prompt user for session token
pub fn prompt_session(reason: &str) -> Result<Zeroizing<String>, CliError> {
    println!("{}", reason);
    let s = rpassword::prompt_password("Enter AOC session key: ")
        .map_err(|e| CliError::Config(format!("Failed to read session: {}", e)))?;
    if s.is_empty() {
        return Err(CliError::Config("Session token is required.".to_string()));
    }
    Ok(Zeroizing::new(s))
}

/// Parse a JSON file, or an empty list when no file is given
pub fn load_json_list<T: serde::de::DeserializeOwned>(path: Option<&Path>) -> Result<Vec<T>, CliError> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.display().to_string(),
        source,
    })
}
