// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const ENV_PATH: &str = "SENTINEL_CONFIG_PATH";

fn default_history_capacity() -> usize {
    2000
}
fn default_rolling_window_hours() -> u64 {
    48
}
fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

/// Service-level knobs. The classifier/aggregator thresholds are fixed by
/// contract and deliberately not configurable here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default = "default_rolling_window_hours")]
    pub rolling_window_hours: u64,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            rolling_window_hours: default_rolling_window_hours(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl ServiceConfig {
    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        parse_config(&content, ext.as_str()).map(Self::sanitized)
    }

    /// Load using env var + fallbacks:
    /// 1) $SENTINEL_CONFIG_PATH
    /// 2) config/sentinel.toml
    /// 3) config/sentinel.json
    /// No file at all → defaults, not an error.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            } else {
                return Err(anyhow!("SENTINEL_CONFIG_PATH points to non-existent path"));
            }
        }
        let toml_p = PathBuf::from("config/sentinel.toml");
        if toml_p.exists() {
            return Self::load_from(&toml_p);
        }
        let json_p = PathBuf::from("config/sentinel.json");
        if json_p.exists() {
            return Self::load_from(&json_p);
        }
        Ok(Self::default())
    }

    /// Clamp pathological values back to defaults.
    fn sanitized(mut self) -> Self {
        if self.history_capacity == 0 {
            self.history_capacity = default_history_capacity();
        }
        if self.rolling_window_hours == 0 {
            self.rolling_window_hours = default_rolling_window_hours();
        }
        if self.bind_addr.trim().is_empty() {
            self.bind_addr = default_bind_addr();
        }
        self
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<ServiceConfig> {
    // Try TOML first if hinted or the content looks like toml.
    let try_toml = hint_ext == "toml" || s.contains('=');
    if try_toml {
        if let Ok(v) = toml::from_str::<ServiceConfig>(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = serde_json::from_str::<ServiceConfig>(s) {
        return Ok(v);
    }
    // Fallback: also try TOML if not attempted
    if !try_toml {
        if let Ok(v) = toml::from_str::<ServiceConfig>(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported config format"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_and_json_both_parse() {
        let toml_cfg = parse_config("history_capacity = 10\nbind_addr = \"127.0.0.1:9000\"", "toml")
            .unwrap();
        assert_eq!(toml_cfg.history_capacity, 10);
        assert_eq!(toml_cfg.bind_addr, "127.0.0.1:9000");
        // unset fields take serde defaults
        assert_eq!(toml_cfg.rolling_window_hours, 48);

        let json_cfg = parse_config(r#"{"rolling_window_hours": 6}"#, "json").unwrap();
        assert_eq!(json_cfg.rolling_window_hours, 6);
        assert_eq!(json_cfg.history_capacity, 2000);
    }

    #[test]
    fn zero_values_are_sanitized_back_to_defaults() {
        let cfg = ServiceConfig {
            history_capacity: 0,
            rolling_window_hours: 0,
            bind_addr: "  ".into(),
        }
        .sanitized();
        assert_eq!(cfg.history_capacity, 2000);
        assert_eq!(cfg.rolling_window_hours, 48);
        assert_eq!(cfg.bind_addr, "0.0.0.0:8000");
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        // Isolate CWD in a temp dir so a real config/ in the repo does not
        // interfere.
        let old = std::env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        std::env::set_current_dir(tmp.path()).unwrap();

        std::env::remove_var(ENV_PATH);

        // No files in the temp CWD → defaults
        let cfg = ServiceConfig::load_default().unwrap();
        assert_eq!(cfg.history_capacity, 2000);

        // Env takes precedence
        let p_json = tmp.path().join("sentinel.json");
        fs::write(&p_json, r#"{"history_capacity": 7}"#).unwrap();
        std::env::set_var(ENV_PATH, p_json.display().to_string());
        let cfg2 = ServiceConfig::load_default().unwrap();
        assert_eq!(cfg2.history_capacity, 7);
        std::env::remove_var(ENV_PATH);

        // Restore CWD
        std::env::set_current_dir(&old).unwrap();
    }
}
