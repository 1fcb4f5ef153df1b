/// 환경 변수 기반 설정
// region:    --- Imports
use std::net::SocketAddr;
use thiserror::Error;

// endregion: --- Imports

// region:    --- Config
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a socket address, got {value:?}")]
    InvalidAddr { name: &'static str, value: String },
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("{name} must be true or false, got {value:?}")]
    InvalidFlag { name: &'static str, value: String },
}

/// 제품 담당자가 결정해야 하는 동작들
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// 종료된 경매에 대한 입찰 거절
    pub reject_bids_when_closed: bool,
    /// 이미 종료된 경매를 다시 종료하면 오류
    pub reject_reclose: bool,
    /// 빈 댓글 거절
    pub reject_empty_comments: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            reject_bids_when_closed: true,
            reject_reclose: false,
            reject_empty_comments: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// 없으면 메모리 저장소 사용
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub reset_database: bool,
    pub policy: Policy,
}

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let bind_value = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_value
            .parse()
            .map_err(|_| ConfigError::InvalidAddr {
                name: "BIND_ADDR",
                value: bind_value.clone(),
            })?;

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(value) => value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidNumber {
                    name: "DB_MAX_CONNECTIONS",
                    value,
                })?,
        };

        let defaults = Policy::default();
        let policy = Policy {
            reject_bids_when_closed: flag(
                &lookup,
                "REJECT_BIDS_WHEN_CLOSED",
                defaults.reject_bids_when_closed,
            )?,
            reject_reclose: flag(&lookup, "REJECT_RECLOSE", defaults.reject_reclose)?,
            reject_empty_comments: flag(
                &lookup,
                "REJECT_EMPTY_COMMENTS",
                defaults.reject_empty_comments,
            )?,
        };

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            reset_database: flag(&lookup, "RESET_DATABASE", false)?,
            policy,
        })
    }
}

fn flag<F>(lookup: &F, name: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidFlag { name, value }),
        },
    }
}
// endregion: --- Config

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_env() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.max_connections, 5);
        assert!(!config.reset_database);
        assert_eq!(config.policy, Policy::default());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/auctions"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("RESET_DATABASE", "yes"),
            ("REJECT_RECLOSE", "true"),
            ("REJECT_BIDS_WHEN_CLOSED", "0"),
        ])
        .unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/auctions")
        );
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.max_connections, 12);
        assert!(config.reset_database);
        assert!(config.policy.reject_reclose);
        assert!(!config.policy.reject_bids_when_closed);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            config_from(&[("BIND_ADDR", "nowhere")]),
            Err(ConfigError::InvalidAddr { .. })
        ));
        assert!(matches!(
            config_from(&[("DB_MAX_CONNECTIONS", "0")]),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            config_from(&[("REJECT_EMPTY_COMMENTS", "maybe")]),
            Err(ConfigError::InvalidFlag { .. })
        ));
    }
}
// endregion: --- Tests
