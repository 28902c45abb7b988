//! Environment configuration.
//!
//! The client itself never reads the environment; callers build a
//! [`ClientConfig`] here (or by hand) and pass it in.

use std::env;
use std::time::Duration;

use crate::auth::Credentials;
use crate::client::{ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT};
use crate::error::{Result, ZaptecError};

pub const USERNAME_VAR: &str = "ZAPTEC_USERNAME";
pub const PASSWORD_VAR: &str = "ZAPTEC_PASSWORD";
pub const INSTALLATION_ID_VAR: &str = "ZAPTEC_INSTALLATION_ID";
pub const API_URL_VAR: &str = "ZAPTEC_API_URL";
pub const TIMEOUT_VAR: &str = "ZAPTEC_TIMEOUT_SECS";
pub const SSL_VERIFY_VAR: &str = "ZAPTEC_SSL_VERIFY";

/// Load a [`ClientConfig`] from the environment.
///
/// - `ZAPTEC_USERNAME`, `ZAPTEC_PASSWORD`, `ZAPTEC_INSTALLATION_ID` (required)
/// - `ZAPTEC_API_URL` (optional, defaults to `https://api.zaptec.com`)
/// - `ZAPTEC_TIMEOUT_SECS` (optional, defaults to 30)
/// - `ZAPTEC_SSL_VERIFY` (optional, `false` disables certificate checks)
///
/// # Errors
///
/// Returns [`ZaptecError::ConfigMissing`] if a required variable is unset
/// or empty, or the timeout is not a number.
pub fn from_env() -> Result<ClientConfig> {
    from_lookup(|key| env::var(key).ok())
}

/// Same as [`from_env`], reading variables through `lookup`.
pub fn from_lookup<F>(lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |key: &str| {
        lookup(key).ok_or_else(|| {
            ZaptecError::ConfigMissing(format!("{key} environment variable not set"))
        })
    };

    let credentials = Credentials::new(
        required(USERNAME_VAR)?,
        required(PASSWORD_VAR)?,
        required(INSTALLATION_ID_VAR)?,
    )?;

    let timeout = match lookup(TIMEOUT_VAR) {
        Some(secs) => Duration::from_secs(secs.trim().parse().map_err(|_| {
            ZaptecError::ConfigMissing(format!("{TIMEOUT_VAR} must be a number of seconds"))
        })?),
        None => DEFAULT_TIMEOUT,
    };

    let accept_invalid_certs = lookup(SSL_VERIFY_VAR)
        .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no"));

    let mut config = ClientConfig::new(credentials)
        .with_base_url(lookup(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string()))
        .with_timeout(timeout);
    config.accept_invalid_certs = accept_invalid_certs;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        (USERNAME_VAR, "user"),
        (PASSWORD_VAR, "pass"),
        (INSTALLATION_ID_VAR, "inst-1"),
    ];

    #[test]
    fn test_defaults() {
        let config = from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(!config.accept_invalid_certs);
        assert_eq!(config.credentials.installation_id(), "inst-1");
    }

    #[test]
    fn test_missing_password() {
        let err = from_lookup(lookup(&REQUIRED[..1])).unwrap_err();
        assert!(err.to_string().contains(PASSWORD_VAR));
    }

    #[test]
    fn test_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.push((API_URL_VAR, "http://localhost:8080"));
        vars.push((TIMEOUT_VAR, "5"));
        vars.push((SSL_VERIFY_VAR, "false"));

        let config = from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.accept_invalid_certs);
    }

    #[test]
    fn test_bad_timeout() {
        let mut vars = REQUIRED.to_vec();
        vars.push((TIMEOUT_VAR, "soon"));
        assert!(matches!(
            from_lookup(lookup(&vars)),
            Err(ZaptecError::ConfigMissing(_))
        ));
    }
}
