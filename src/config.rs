// src/config.rs
//! Runtime configuration: TOML file with env-var path override and built-in
//! defaults, plus Reddit credentials from the environment.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::aggregate::Granularity;

pub const DEFAULT_CONFIG_PATH: &str = "config/tracker.toml";
pub const ENV_CONFIG_PATH: &str = "TRACKER_CONFIG_PATH";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    pub granularity: Granularity,
    pub lookback_days: u32,
    pub min_upvotes: i64,
    pub provider_timeout_secs: u64,
    pub cache_ttl_secs: u64,
    /// Keep only Reddit posts whose text contains the term.
    pub reddit_keyword_filter: bool,
    /// The news-like source historically skipped this filter; off by default.
    pub hn_keyword_filter: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            granularity: Granularity::Day,
            lookback_days: 7,
            min_upvotes: 0,
            provider_timeout_secs: 10,
            cache_ttl_secs: 300,
            reddit_keyword_filter: true,
            hn_keyword_filter: false,
        }
    }
}

pub fn load_from(path: &Path) -> Result<TrackerConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading tracker config from {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

/// Load config using env var + fallbacks:
/// 1) $TRACKER_CONFIG_PATH
/// 2) config/tracker.toml
/// 3) built-in defaults
pub fn load_default() -> Result<TrackerConfig> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_from(&pb);
        }
        return Err(anyhow!("TRACKER_CONFIG_PATH points to non-existent path"));
    }
    let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
    if default_p.exists() {
        return load_from(&default_p);
    }
    Ok(TrackerConfig::default())
}

/// Reddit OAuth credentials, supplied out-of-band via environment variables
/// (`.env` is loaded at startup in dev).
#[derive(Debug, Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

impl RedditCredentials {
    pub fn from_env() -> Result<Self> {
        fn var(name: &'static str) -> Result<String> {
            std::env::var(name).with_context(|| format!("{name} is not set"))
        }
        Ok(Self {
            client_id: var("REDDIT_CLIENT_ID")?,
            client_secret: var("REDDIT_CLIENT_SECRET")?,
            username: var("REDDIT_USERNAME")?,
            password: var("REDDIT_PASSWORD")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: TrackerConfig =
            toml::from_str(r#"granularity = "hour""#).expect("valid partial config");
        assert_eq!(cfg.granularity, Granularity::Hour);
        assert_eq!(cfg.lookback_days, 7);
        assert_eq!(cfg.min_upvotes, 0);
        assert!(cfg.reddit_keyword_filter);
        assert!(!cfg.hn_keyword_filter);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<TrackerConfig>("granularityy = \"hour\"").is_err());
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        // Isolate CWD in a temp dir so a real config/ in the repo can't
        // interfere.
        let old = env::current_dir().expect("cwd");
        let tmp = tempfile::tempdir().expect("tempdir");
        env::set_current_dir(tmp.path()).expect("chdir");

        env::remove_var(ENV_CONFIG_PATH);

        // No files in the temp CWD -> built-in defaults.
        let cfg = load_default().expect("defaults");
        assert_eq!(cfg.lookback_days, 7);

        // Env var takes precedence.
        let p = tmp.path().join("tracker.toml");
        fs::write(&p, "lookback_days = 3").expect("write config");
        env::set_var(ENV_CONFIG_PATH, p.display().to_string());
        let cfg2 = load_default().expect("env config");
        assert_eq!(cfg2.lookback_days, 3);

        // Env var pointing nowhere is an error, not a silent fallback.
        env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml"));
        assert!(load_default().is_err());
        env::remove_var(ENV_CONFIG_PATH);

        env::set_current_dir(&old).expect("restore cwd");
    }
}
