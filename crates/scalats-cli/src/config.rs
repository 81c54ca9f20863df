use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// On-disk configuration, merged under command-line flags.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub ignored: Vec<String>,
    pub pedantic: Option<bool>,
    pub stdlib: Option<PathBuf>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_config() {
        let config: Config =
            serde_json::from_str(r#"{ "ignored": ["lodash"], "pedantic": true }"#).unwrap();
        assert_eq!(config.ignored, vec!["lodash"]);
        assert_eq!(config.pedantic, Some(true));
        assert_eq!(config.stdlib, None);
    }
}
