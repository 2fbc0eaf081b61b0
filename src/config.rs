use std::{env, str::FromStr, time::Duration};

use log::warn;

use crate::quiz::session::DEFAULT_TIME_LIMIT_SECS;

pub const DEFAULT_ADDR: &str = "127.0.0.1:9001";
/// Store results in memory instead of a database file.
pub const IN_MEMORY_DB: &str = ":memory:";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub addr: String,
    pub log_dir: String,
    pub database_path: String,
    /// Directory `startQuizFromPack` looks up pack names in.
    pub pack_dir: String,
    pub time_limit_secs: u32,
    pub tick_interval: Duration,
    pub idle_timeout: Duration,
    pub token_secret: String,
    pub token_ttl_hours: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: DEFAULT_ADDR.to_string(),
            log_dir: "log".to_string(),
            database_path: "quiz_results.db".to_string(),
            pack_dir: "packs".to_string(),
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            tick_interval: Duration::from_secs(1),
            idle_timeout: Duration::from_secs(30),
            token_secret: "secret".to_string(),
            token_ttl_hours: 24,
        }
    }
}

impl ServerConfig {
    /// Reads `QUIZ_*` environment variables; the first CLI argument, if any,
    /// overrides the listen address.
    pub fn from_env() -> ServerConfig {
        let mut config = ServerConfig::from_lookup(|key| env::var(key).ok());
        if let Some(addr) = env::args().nth(1) {
            config.addr = addr;
        }
        config
    }

    pub fn from_lookup<F>(lookup: F) -> ServerConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();

        ServerConfig {
            addr: lookup("QUIZ_ADDR").unwrap_or(defaults.addr),
            log_dir: lookup("QUIZ_LOG_DIR").unwrap_or(defaults.log_dir),
            database_path: lookup("QUIZ_DB_PATH").unwrap_or(defaults.database_path),
            pack_dir: lookup("QUIZ_PACK_DIR").unwrap_or(defaults.pack_dir),
            time_limit_secs: parse_positive_or(
                &lookup,
                "QUIZ_TIME_LIMIT_SECS",
                defaults.time_limit_secs,
            ),
            tick_interval: defaults.tick_interval,
            idle_timeout: Duration::from_secs(parse_or(
                &lookup,
                "QUIZ_IDLE_TIMEOUT_SECS",
                defaults.idle_timeout.as_secs(),
            )),
            token_secret: lookup("QUIZ_TOKEN_SECRET").unwrap_or(defaults.token_secret),
            token_ttl_hours: parse_or(&lookup, "QUIZ_TOKEN_TTL_HOURS", defaults.token_ttl_hours),
        }
    }

    pub fn uses_in_memory_store(&self) -> bool {
        self.database_path == IN_MEMORY_DB
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring {}={:?}, using {}", key, raw, default);
                default
            }
        },
        None => default,
    }
}

fn parse_positive_or<F>(lookup: &F, key: &str, default: u32) -> u32
where
    F: Fn(&str) -> Option<String>,
{
    match parse_or(lookup, key, default) {
        0 => {
            warn!("Ignoring {}=0, using {}", key, default);
            default
        }
        value => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config.addr, DEFAULT_ADDR);
        assert_eq!(config.time_limit_secs, 600);
        assert_eq!(config.idle_timeout, Duration::from_secs(30));
        assert!(!config.uses_in_memory_store());
        assert_eq!(config.pack_dir, "packs");
    }

    #[test]
    fn reads_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("QUIZ_ADDR", "0.0.0.0:8080"),
            ("QUIZ_DB_PATH", ":memory:"),
            ("QUIZ_TIME_LIMIT_SECS", "120"),
            ("QUIZ_TOKEN_SECRET", "hunter2"),
            ("QUIZ_PACK_DIR", "/srv/quiz/packs"),
        ]));
        assert_eq!(config.addr, "0.0.0.0:8080");
        assert!(config.uses_in_memory_store());
        assert_eq!(config.time_limit_secs, 120);
        assert_eq!(config.token_secret, "hunter2");
        assert_eq!(config.pack_dir, "/srv/quiz/packs");
    }

    #[test]
    fn bad_numbers_fall_back_to_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("QUIZ_TIME_LIMIT_SECS", "ten minutes"),
            ("QUIZ_IDLE_TIMEOUT_SECS", "-5"),
        ]));
        assert_eq!(config.time_limit_secs, 600);
        assert_eq!(config.idle_timeout, Duration::from_secs(30));
    }

    #[test]
    fn zero_time_limit_falls_back_to_default() {
        let config = ServerConfig::from_lookup(lookup_from(&[("QUIZ_TIME_LIMIT_SECS", "0")]));
        assert_eq!(config.time_limit_secs, DEFAULT_TIME_LIMIT_SECS);
    }
}
