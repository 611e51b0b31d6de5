// src/config/analyzer.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};

pub const ENV_CONFIG_PATH: &str = "ANALYZER_CONFIG_PATH";
pub const ENV_API_KEY: &str = "FACT_CHECK_API_KEY";
pub const ENV_JITTER: &str = "ANALYZER_JITTER";
pub const DEFAULT_CONFIG_PATH: &str = "config/analyzer.toml";

const MAX_JITTER: f64 = 50.0;
const MAX_CLAIMS_CAP: usize = 10;

fn default_jitter() -> f64 {
    5.0
}
fn default_history_capacity() -> usize {
    10
}
fn default_api_key() -> String {
    "ENV".to_string()
}
fn default_endpoint() -> String {
    "https://factchecktools.googleapis.com/v1alpha1/claims:search".to_string()
}
fn default_language() -> String {
    "en".to_string()
}
fn default_max_claims() -> usize {
    5
}
fn default_cache_ttl() -> i64 {
    crate::analyze::cache::DEFAULT_TTL_SECS
}
fn default_timeout() -> u64 {
    10
}
fn default_connect_timeout() -> u64 {
    4
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Jitter band half-width in score points.
    #[serde(default = "default_jitter")]
    pub jitter_amplitude: f64,
    #[serde(default)]
    pub simulated_latency_ms: u64,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// `None` keeps history in memory only.
    #[serde(default)]
    pub history_path: Option<PathBuf>,
    #[serde(default)]
    pub fact_check: FactCheckConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheckConfig {
    /// "ENV" means: read from FACT_CHECK_API_KEY.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_language")]
    pub language_code: String,
    #[serde(default = "default_max_claims")]
    pub max_claims: usize,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: i64,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            jitter_amplitude: default_jitter(),
            simulated_latency_ms: 0,
            history_capacity: default_history_capacity(),
            history_path: None,
            fact_check: FactCheckConfig::default(),
        }
    }
}

impl Default for FactCheckConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            endpoint: default_endpoint(),
            language_code: default_language(),
            max_claims: default_max_claims(),
            cache_ttl_secs: default_cache_ttl(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl AnalyzerConfig {
    /// Parse a TOML file, then apply env overrides and sanitize.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading analyzer config from {}", path.display()))?;
        let cfg: AnalyzerConfig = toml::from_str(&data)
            .with_context(|| format!("parsing analyzer config {}", path.display()))?;
        Ok(cfg.finalize())
    }

    /// Load using env var + fallbacks:
    /// 1) $ANALYZER_CONFIG_PATH (must exist)
    /// 2) config/analyzer.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from_file(&pb);
            }
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from_file(&default_p);
        }
        Ok(Self::default().finalize())
    }

    /// Resolve env references and clamp values into their valid ranges.
    pub fn finalize(mut self) -> Self {
        // Missing key is a documented degraded mode, not an error.
        let key = self.fact_check.api_key.trim();
        if key.is_empty() || key.eq_ignore_ascii_case("env") {
            self.fact_check.api_key = env::var(ENV_API_KEY)
                .map(|v| v.trim().to_string())
                .unwrap_or_default();
        }

        if let Some(j) = env::var(ENV_JITTER)
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok())
        {
            self.jitter_amplitude = j;
        }

        if !self.jitter_amplitude.is_finite() {
            self.jitter_amplitude = default_jitter();
        }
        self.jitter_amplitude = self.jitter_amplitude.abs().min(MAX_JITTER);
        self.history_capacity = self.history_capacity.max(1);
        self.fact_check.max_claims = self.fact_check.max_claims.clamp(1, MAX_CLAIMS_CAP);
        self.fact_check.cache_ttl_secs = self.fact_check.cache_ttl_secs.max(0);
        self
    }
}
