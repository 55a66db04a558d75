//! Process configuration read from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `BIND_ADDR` | `0.0.0.0:8080` |
//! | `USE_PERSISTENT_STORES` | `false` (in-memory store) |
//! | `DATABASE_URL` | required when `USE_PERSISTENT_STORES=true` |
//! | `CORS_ALLOWED_ORIGINS` | `http://localhost:8080,http://localhost:8081,http://localhost:8082` |
//! | `LOG_FORMAT` | `json` |

use std::net::SocketAddr;

use anyhow::{Context, bail};

use catalog_observability::LogFormat;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:8080,http://localhost:8081,http://localhost:8082";

/// Which catalog store backs the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    InMemory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
    pub cors_allowed_origins: Vec<String>,
    pub log_format: LogFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            store: StoreBackend::InMemory,
            cors_allowed_origins: split_origins(DEFAULT_CORS_ORIGINS),
            log_format: LogFormat::Json,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key/value source; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:8080")?;

        let use_persistent = match lookup("USE_PERSISTENT_STORES") {
            Some(v) => v
                .trim()
                .parse::<bool>()
                .context("USE_PERSISTENT_STORES must be 'true' or 'false'")?,
            None => false,
        };

        let store = if use_persistent {
            let database_url = lookup("DATABASE_URL")
                .filter(|v| !v.trim().is_empty())
                .context("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")?;
            StoreBackend::Postgres { database_url }
        } else {
            StoreBackend::InMemory
        };

        let cors_allowed_origins = split_origins(
            &lookup("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string()),
        );
        if cors_allowed_origins.is_empty() {
            bail!("CORS_ALLOWED_ORIGINS must list at least one origin");
        }

        let log_format = match lookup("LOG_FORMAT") {
            Some(v) => v.parse::<LogFormat>()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            store,
            cors_allowed_origins,
            log_format,
        })
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<ApiConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_in_memory_on_port_8080() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg, ApiConfig::default());
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.cors_allowed_origins.len(), 3);
    }

    #[test]
    fn persistent_store_requires_database_url() {
        assert!(config(&[("USE_PERSISTENT_STORES", "true")]).is_err());

        let cfg = config(&[
            ("USE_PERSISTENT_STORES", "true"),
            ("DATABASE_URL", "postgres://localhost/catalog"),
        ])
        .unwrap();
        assert_eq!(
            cfg.store,
            StoreBackend::Postgres {
                database_url: "postgres://localhost/catalog".to_string()
            }
        );
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        let cfg = config(&[("CORS_ALLOWED_ORIGINS", "http://a.test , http://b.test,")]).unwrap();
        assert_eq!(cfg.cors_allowed_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(config(&[("BIND_ADDR", "not-an-addr")]).is_err());
        assert!(config(&[("USE_PERSISTENT_STORES", "maybe")]).is_err());
        assert!(config(&[("LOG_FORMAT", "xml")]).is_err());
        assert!(config(&[("CORS_ALLOWED_ORIGINS", " , ")]).is_err());
    }

    #[test]
    fn pretty_logs_can_be_selected() {
        let cfg = config(&[("LOG_FORMAT", "pretty")]).unwrap();
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }
}
