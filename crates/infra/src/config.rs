//! Process configuration, read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StocktagConfig {
    /// Postgres connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub bind: SocketAddr,
    /// Upper bound on every single store call.
    pub store_timeout: Duration,
    pub db_max_connections: u32,
    /// CUPS queue for QR labels. `None` disables printing.
    pub printer: Option<String>,
}

impl Default for StocktagConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            store_timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            printer: None,
        }
    }
}

impl StocktagConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL");
        if database_url.is_none() {
            warn!("DATABASE_URL not set; using the in-memory store (data is lost on exit)");
        }

        let bind: SocketAddr = parse("STOCKTAG_BIND", get("STOCKTAG_BIND"), Some(Self::default().bind))?;

        let timeout_ms: u64 = parse(
            "STOCKTAG_STORE_TIMEOUT_MS",
            get("STOCKTAG_STORE_TIMEOUT_MS"),
            Some(DEFAULT_STORE_TIMEOUT_MS),
        )?;
        if timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                var: "STOCKTAG_STORE_TIMEOUT_MS",
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        let db_max_connections: u32 = parse(
            "STOCKTAG_DB_MAX_CONNECTIONS",
            get("STOCKTAG_DB_MAX_CONNECTIONS"),
            Some(DEFAULT_DB_MAX_CONNECTIONS),
        )?;
        if db_max_connections == 0 {
            return Err(ConfigError::Invalid {
                var: "STOCKTAG_DB_MAX_CONNECTIONS",
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        let printer = get("STOCKTAG_PRINTER");
        if printer.is_none() {
            warn!("STOCKTAG_PRINTER not set; label printing is disabled");
        }

        Ok(Self {
            database_url,
            bind,
            store_timeout: Duration::from_millis(timeout_ms),
            db_max_connections,
            printer,
        })
    }
}

fn parse<T>(var: &'static str, raw: Option<String>, default: Option<T>) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
        None => default.ok_or_else(|| ConfigError::Invalid {
            var,
            value: String::new(),
            reason: "required".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<StocktagConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StocktagConfig::from_lookup(|var| map.get(var).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(config(&[]).unwrap(), StocktagConfig::default());
    }

    #[test]
    fn values_are_read_and_trimmed() {
        let cfg = config(&[
            ("DATABASE_URL", " postgres://localhost/stocktag "),
            ("STOCKTAG_BIND", "127.0.0.1:9000"),
            ("STOCKTAG_STORE_TIMEOUT_MS", "250"),
            ("STOCKTAG_PRINTER", "zebra"),
        ])
        .unwrap();
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/stocktag"));
        assert_eq!(cfg.bind.port(), 9000);
        assert_eq!(cfg.store_timeout, Duration::from_millis(250));
        assert_eq!(cfg.printer.as_deref(), Some("zebra"));
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = config(&[("STOCKTAG_STORE_TIMEOUT_MS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "STOCKTAG_STORE_TIMEOUT_MS", .. }));

        let err = config(&[("STOCKTAG_BIND", "not-an-addr")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "STOCKTAG_BIND", .. }));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(config(&[("STOCKTAG_STORE_TIMEOUT_MS", "0")]).is_err());
    }

    #[test]
    fn blank_printer_disables_printing() {
        assert_eq!(config(&[("STOCKTAG_PRINTER", "  ")]).unwrap().printer, None);
    }
}
