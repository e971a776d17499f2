//! Per-user settings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::parser::parse_toml_str;

/// Environment variables checked, in order, for a GitHub token.
pub const TOKEN_ENV_VARS: [&str; 2] = ["DEFT_GITHUB_TOKEN", "GITHUB_TOKEN"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Token sent to the GitHub API; raises the tag-listing rate limit
    pub github_token: Option<String>,
    /// User-Agent header for every request
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            github_token: None,
            user_agent: format!("deft/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Settings {
    /// Load settings from the user config file and the environment.
    pub fn load() -> Result<Self> {
        let settings = match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        Ok(settings.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// `<config dir>/deft/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("deft").join("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        let settings = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse settings: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        parse_toml_str(content)
    }

    /// Apply token overrides from `lookup` (normally the process environment).
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(token) = TOKEN_ENV_VARS
            .iter()
            .filter_map(|key| lookup(key))
            .find(|token| !token.is_empty())
        {
            self.github_token = Some(token);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings.github_token, None);
        assert!(settings.user_agent.starts_with("deft/"));
    }

    #[test]
    fn test_parse_settings() {
        let settings =
            Settings::from_toml_str("github_token = \"abc\"\nuser_agent = \"custom\"").unwrap();
        assert_eq!(settings.github_token.as_deref(), Some("abc"));
        assert_eq!(settings.user_agent, "custom");
    }

    #[test]
    fn test_env_override_precedence() {
        let env: HashMap<&str, &str> =
            HashMap::from([("DEFT_GITHUB_TOKEN", "deft"), ("GITHUB_TOKEN", "github")]);
        let settings =
            Settings::default().with_env_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(settings.github_token.as_deref(), Some("deft"));
    }

    #[test]
    fn test_env_override_skips_empty() {
        let env: HashMap<&str, &str> =
            HashMap::from([("DEFT_GITHUB_TOKEN", ""), ("GITHUB_TOKEN", "github")]);
        let settings =
            Settings::default().with_env_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(settings.github_token.as_deref(), Some("github"));
    }

    #[test]
    fn test_no_env_keeps_file_token() {
        let settings = Settings::from_toml_str("github_token = \"file\"")
            .unwrap()
            .with_env_overrides(|_| None);
        assert_eq!(settings.github_token.as_deref(), Some("file"));
    }
}
