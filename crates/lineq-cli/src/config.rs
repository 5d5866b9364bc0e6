//! Configuration loading from TOML files.
//!
//! Lookup order:
//! 1. `--config` flag / `$LINEQ_CONFIG` environment variable
//! 2. `~/.config/lineq/config.toml`
//! 3. Built-in defaults (everything is optional)
//!
//! The hint credential may also come from `$OPENAI_API_KEY`; the config
//! file wins when both are set. A missing credential just disables hints.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use lineq_hint::HintConfig;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub hint: HintConfig,
}

/// Load config from disk. Returns defaults if no config file exists.
pub fn load_config(path_override: Option<&Path>) -> Result<Config> {
    let path = path_override.map(Path::to_path_buf).or_else(config_path);

    let mut config = match &path {
        Some(p) if p.exists() => {
            let content =
                std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            toml::from_str(&content).with_context(|| format!("parsing {}", p.display()))?
        }
        _ => Config::default(),
    };

    if config.hint.api_key.is_none() {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.hint.api_key = Some(key);
        }
    }

    Ok(config)
}

/// Resolve the config file path.
fn config_path() -> Option<PathBuf> {
    // 1. Environment variable
    if let Ok(p) = std::env::var("LINEQ_CONFIG") {
        return Some(PathBuf::from(p));
    }

    // 2. ~/.config/lineq/config.toml
    if let Some(home) = dirs_home() {
        let p = home.join(".config").join("lineq").join("config.toml");
        return Some(p);
    }

    None
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

/// Show the active config path (for `lineq config`).
pub fn show_config_path(path_override: Option<&Path>) -> String {
    match path_override.map(Path::to_path_buf).or_else(config_path) {
        Some(p) if p.exists() => format!("{} (loaded)", p.display()),
        Some(p) => format!("{} (not found, using defaults)", p.display()),
        None => "no config path resolved (using defaults)".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.hint.api_key.is_none());
        assert_eq!(config.hint.model, "gpt-4o-mini");
        assert_eq!(config.hint.max_tokens, 500);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
[hint]
model = "gpt-4o"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.hint.model, "gpt-4o");
        // Other fields should be defaults
        assert_eq!(config.hint.temperature, 0.7);
        assert_eq!(config.hint.timeout_secs, 30);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[hint]
api_key = "sk-test"
model = "gpt-4o"
endpoint = "http://localhost:8080/v1/chat/completions"
temperature = 0.4
max_tokens = 300
timeout_secs = 10
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.hint.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.hint.endpoint, "http://localhost:8080/v1/chat/completions");
        assert_eq!(config.hint.max_tokens, 300);
    }

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(lineq_hint::HintClient::from_config(&config.hint).is_none());
    }
}
