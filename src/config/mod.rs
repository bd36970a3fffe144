use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::resolver::DEFAULT_API_VERSION;

/// Top-level configuration from `.mgscope.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Graph API version passed to the permission lookup.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Extra cmdlet names to exclude from analysis, on top of the built-in
    /// authentication module set.
    #[serde(default)]
    pub exclude: HashSet<String>,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            exclude: HashSet::new(),
        }
    }
}

impl Config {
    /// Load config from a TOML file. Returns default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Generate a starter config file.
    pub fn starter_toml() -> &'static str {
        r#"# mgscope configuration

# Graph API version used for permission lookups ("v1.0" or "beta").
api_version = "v1.0"

# Cmdlet names to exclude from analysis, in addition to the
# Microsoft.Graph.Authentication module cmdlets.
# exclude = ["Get-MgUser"]
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let config = Config::load(Path::new("/nonexistent/.mgscope.toml")).unwrap();
        assert_eq!(config.api_version, "v1.0");
        assert!(config.exclude.is_empty());
    }

    #[test]
    fn loads_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"api_version = \"beta\"\nexclude = [\"Get-MgUser\"]\n")
            .unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api_version, "beta");
        assert!(config.exclude.contains("Get-MgUser"));
    }

    #[test]
    fn starter_toml_parses() {
        let config: Config = toml::from_str(Config::starter_toml()).unwrap();
        assert_eq!(config.api_version, "v1.0");
    }
}
