use std::str::FromStr;

use thiserror::Error;

/// An environment variable required by the application is not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// An environment variable is set but its value could not be parsed.
#[derive(Debug, Error)]
#[error("Invalid value for environment variable {name}: {value:?}")]
pub struct InvalidEnvVarError {
    pub name: String,
    pub value: String,
}

/// Reads an environment variable, returning a structured error if it's missing.
///
/// Empty values are treated as missing so that a blank line in a `.env` file
/// does not silently produce an empty API key.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(MissingEnvVarError(name.to_string())),
    }
}

/// Reads an optional environment variable and parses it.
///
/// Returns `Ok(None)` when the variable is unset or blank.
pub fn parse_env_var<T: FromStr>(name: &str) -> Result<Option<T>, InvalidEnvVarError> {
    let Ok(value) = get_env_var(name) else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| InvalidEnvVarError {
            name: name.to_string(),
            value,
        })
}
