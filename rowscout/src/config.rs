//! Optional TOML configuration.
//!
//! ```toml
//! [compiler]
//! primary_alias = "base"
//! normalizer = "public.unaccent"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use rowscout_sql::{CompilerOptions, DEFAULT_NORMALIZER, DEFAULT_PRIMARY_ALIAS, QueryCompiler};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub compiler: CompilerConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    pub primary_alias: String,
    pub normalizer: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            primary_alias: DEFAULT_PRIMARY_ALIAS.to_string(),
            normalizer: DEFAULT_NORMALIZER.to_string(),
        }
    }
}

impl Config {
    /// Read the config file, or use defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Build a compiler from the `[compiler]` table.
    pub fn compiler(&self) -> Result<QueryCompiler> {
        let options = CompilerOptions::default()
            .primary_alias(&self.compiler.primary_alias)
            .normalizer(&self.compiler.normalizer);
        QueryCompiler::with_options(options).context("Invalid [compiler] settings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.compiler.primary_alias, "main");
        assert_eq!(config.compiler.normalizer, "unaccent");
        assert!(config.compiler().is_ok());
    }

    #[test]
    fn test_partial_table() {
        let config = Config::from_toml("[compiler]\nprimary_alias = \"base\"\n").unwrap();
        assert_eq!(config.compiler.primary_alias, "base");
        assert_eq!(config.compiler.normalizer, "unaccent");

        let compiler = config.compiler().unwrap();
        assert_eq!(compiler.options().primary_alias, "base");
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::from_toml("[compiler]\ndialect = \"mysql\"\n").is_err());
    }

    #[test]
    fn test_invalid_alias_rejected() {
        let config = Config::from_toml("[compiler]\nprimary_alias = \"j0\"\n").unwrap();
        let err = config.compiler().unwrap_err();
        assert!(format!("{err:#}").contains("primary_alias"));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/rowscout.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
