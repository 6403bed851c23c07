use crate::village::fixture::DEFAULT_COUNT;
use log::warn;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://desamatrix.db?mode=rwc";
pub const DEFAULT_SEED: u64 = 2024;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub log_dir: PathBuf,
    pub seed: u64,
    pub seed_count: usize,
    pub seed_on_empty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            log_dir: PathBuf::from("logs"),
            seed: DEFAULT_SEED,
            seed_count: DEFAULT_COUNT,
            seed_on_empty: true,
        }
    }
}

impl AppConfig {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            log_dir: get("DESAMATRIX_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            seed: parse_or(get("DESAMATRIX_SEED"), "DESAMATRIX_SEED", defaults.seed),
            seed_count: parse_or(
                get("DESAMATRIX_SEED_COUNT"),
                "DESAMATRIX_SEED_COUNT",
                defaults.seed_count,
            ),
            seed_on_empty: get("DESAMATRIX_SEED_ON_EMPTY")
                .map(|v| parse_flag(&v, "DESAMATRIX_SEED_ON_EMPTY", defaults.seed_on_empty))
                .unwrap_or(defaults.seed_on_empty),
        }
    }
}

fn parse_or<T: FromStr + Copy>(raw: Option<String>, key: &str, default: T) -> T {
    match raw {
        Some(v) => v.parse::<T>().unwrap_or_else(|_| {
            warn!("ignoring invalid {}={}", key, v);
            default
        }),
        None => default,
    }
}

pub fn parse_flag(raw: &str, key: &str, default: bool) -> bool {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            warn!("ignoring invalid {}={}", key, raw);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config_from(&[]), AppConfig::default());
    }

    #[test]
    fn values_are_read_and_trimmed() {
        let cfg = config_from(&[
            ("DATABASE_URL", " sqlite://other.db "),
            ("DESAMATRIX_SEED", "99"),
            ("DESAMATRIX_SEED_COUNT", "40"),
            ("DESAMATRIX_SEED_ON_EMPTY", "off"),
            ("DESAMATRIX_LOG_DIR", "/tmp/dm-logs"),
        ]);
        assert_eq!(cfg.database_url, "sqlite://other.db");
        assert_eq!(cfg.seed, 99);
        assert_eq!(cfg.seed_count, 40);
        assert!(!cfg.seed_on_empty);
        assert_eq!(cfg.log_dir, PathBuf::from("/tmp/dm-logs"));
    }

    #[test]
    fn invalid_values_fall_back() {
        let cfg = config_from(&[
            ("DESAMATRIX_SEED", "-3"),
            ("DESAMATRIX_SEED_COUNT", "many"),
            ("DESAMATRIX_SEED_ON_EMPTY", "maybe"),
        ]);
        assert_eq!(cfg.seed, DEFAULT_SEED);
        assert_eq!(cfg.seed_count, DEFAULT_COUNT);
        assert!(cfg.seed_on_empty);
    }
}
