//! Relay configuration.
//!
//! Read from the environment after loading `.env` (if present).
//!
//! | Variable                     | Default         |
//! |------------------------------|-----------------|
//! | `DROPLOAD_PORT`              | `5000`          |
//! | `DROPLOAD_STATIC_DIR`        | `frontend/dist` |
//! | `DROPLOAD_DEFAULT_SERVICE`   | `imgur`         |
//! | `DROPLOAD_MAX_UPLOAD_BYTES`  | 50 MiB          |
//! | `IMGUR_CLIENT_ID`            | unset           |
//! | `CATBOX_USERHASH`            | unset           |

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};
use crate::hosts::Service;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_STATIC_DIR: &str = "frontend/dist";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    /// Built frontend served for every non-API path
    pub static_dir: PathBuf,
    /// Service used when a request carries no `service` field
    pub default_service: Service,
    pub max_upload_bytes: usize,
    pub imgur_client_id: Option<String>,
    pub catbox_userhash: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            default_service: Service::Imgur,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            imgur_client_id: None,
            catbox_userhash: None,
        }
    }
}

impl Config {
    /// Load `.env` and read the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Ok(Self {
            port: parse_or(get("DROPLOAD_PORT"), "DROPLOAD_PORT", defaults.port)?,
            static_dir: get("DROPLOAD_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            default_service: parse_or(
                get("DROPLOAD_DEFAULT_SERVICE"),
                "DROPLOAD_DEFAULT_SERVICE",
                defaults.default_service,
            )?,
            max_upload_bytes: parse_or(
                get("DROPLOAD_MAX_UPLOAD_BYTES"),
                "DROPLOAD_MAX_UPLOAD_BYTES",
                defaults.max_upload_bytes,
            )?,
            imgur_client_id: get("IMGUR_CLIENT_ID"),
            catbox_userhash: get("CATBOX_USERHASH"),
        })
    }
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> ConfigResult<T> {
    match value {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_reads_all_values() {
        let config = Config::from_lookup(lookup(&[
            ("DROPLOAD_PORT", "8080"),
            ("DROPLOAD_STATIC_DIR", "/srv/dropload"),
            ("DROPLOAD_DEFAULT_SERVICE", "Catbox"),
            ("DROPLOAD_MAX_UPLOAD_BYTES", "1024"),
            ("IMGUR_CLIENT_ID", "abc123"),
            ("CATBOX_USERHASH", " "),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.static_dir, PathBuf::from("/srv/dropload"));
        assert_eq!(config.default_service, Service::Catbox);
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.imgur_client_id.as_deref(), Some("abc123"));
        assert_eq!(config.catbox_userhash, None);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = Config::from_lookup(lookup(&[("DROPLOAD_PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("DROPLOAD_PORT"));
    }

    #[test]
    fn test_invalid_service_is_rejected() {
        assert!(Config::from_lookup(lookup(&[("DROPLOAD_DEFAULT_SERVICE", "dropbox")])).is_err());
    }
}
