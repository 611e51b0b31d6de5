// src/logging.rs
//! Dev-only log gate and the anonymized text id used in every log line.

/// Env flag that turns on compact dev logging.
pub const ENV_DEV_LOG: &str = "ANALYZER_DEV_LOG";

/// On when `ANALYZER_DEV_LOG=1` in a debug build or a local/dev Shuttle environment.
pub fn dev_logging_enabled() -> bool {
    let dev_flag = std::env::var(ENV_DEV_LOG)
        .ok()
        .is_some_and(|v| v.trim() == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    dev_flag && is_dev_env
}

/// Log-safe id for an analyzed text: 12 hex chars of its SHA-256.
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    Sha256::digest(text.as_bytes())[..6]
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
