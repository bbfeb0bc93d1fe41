// Configuration module for nexus
// Reads from environment variables with sensible defaults

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Entity cache time-to-live in seconds (NEXUS_CACHE_TTL_SECS)
    pub cache_ttl_secs: u64,

    /// Nodes returned for a request without targets (NEXUS_DEFAULT_NODE_CAP)
    pub default_node_cap: usize,

    /// Root that code fetches must stay under (NEXUS_AUTHORIZED_ROOT)
    pub authorized_root: Option<PathBuf>,

    /// Requests slower than this are logged (NEXUS_SLOW_REQUEST_MS)
    pub slow_request_ms: u64,

    /// Honour .gitignore and friends while scanning (NEXUS_RESPECT_IGNORE)
    pub respect_ignore: bool,

    /// Worker threads answering JSONL requests in `serve` (NEXUS_RPC_WORKERS)
    pub rpc_workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 30,
            default_node_cap: 20,
            authorized_root: None,
            slow_request_ms: 1000,
            respect_ignore: false,
            rpc_workers: 4,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        parse_into(&lookup, "NEXUS_CACHE_TTL_SECS", &mut config.cache_ttl_secs);
        parse_into(&lookup, "NEXUS_DEFAULT_NODE_CAP", &mut config.default_node_cap);
        parse_into(&lookup, "NEXUS_SLOW_REQUEST_MS", &mut config.slow_request_ms);
        parse_into(&lookup, "NEXUS_RESPECT_IGNORE", &mut config.respect_ignore);
        parse_into(&lookup, "NEXUS_RPC_WORKERS", &mut config.rpc_workers);
        config.rpc_workers = config.rpc_workers.max(1);

        if let Some(val) = lookup("NEXUS_AUTHORIZED_ROOT") {
            let trimmed = val.trim();
            if !trimmed.is_empty() {
                config.authorized_root = Some(PathBuf::from(trimmed));
            }
        }

        config
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Authorized root for code fetches; the working directory when unset.
    pub fn fetch_root(&self) -> PathBuf {
        match &self.authorized_root {
            Some(root) => root.clone(),
            None => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

fn parse_into<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut T)
where
    T: FromStr + std::fmt::Display,
{
    let Some(val) = lookup(key) else {
        return;
    };
    match val.trim().parse() {
        Ok(parsed) => *slot = parsed,
        Err(_) => warn!("invalid {key} value: {val}, using default: {slot}"),
    }
}
