//! Configuration file loading.
//!
//! Supports YAML, TOML, and JSON with format detection by file extension.
//! Overrides (CLI flags, environment) are applied by the caller after
//! loading; the loader itself only reads and parses.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::ConfigError;

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// YAML format (.yaml, .yml)
    #[default]
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

impl ConfigFormat {
    /// Detects the format from a file extension.
    ///
    /// Returns `None` if the extension is not recognized.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "yaml" | "yml" => Some(Self::Yaml),
                "toml" => Some(Self::Toml),
                "json" => Some(Self::Json),
                _ => None,
            })
    }

    /// Returns the canonical file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Loads a configuration file, detecting the format from its extension.
pub fn load_config<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        format: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("<none>")
            .to_string(),
    })?;

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    parse_config(&content, format)
}

/// Parses configuration content in the given format.
pub fn parse_config<T: DeserializeOwned>(
    content: &str,
    format: ConfigFormat,
) -> Result<T, ConfigError> {
    match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            format: format.to_string(),
            reason: e.to_string(),
        }),
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| ConfigError::Parse {
            format: format.to_string(),
            reason: e.to_string(),
        }),
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            format: format.to_string(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, PartialEq, Deserialize)]
    struct TestConfig {
        endpoint: String,
        #[serde(default)]
        retries: u32,
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("feed.yaml")),
            Some(ConfigFormat::Yaml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("feed.yml")),
            Some(ConfigFormat::Yaml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("feed.toml")),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("feed.json")),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_path(Path::new("feed.ini")), None);
        assert_eq!(ConfigFormat::from_path(Path::new("feed")), None);
    }

    #[test]
    fn test_parse_yaml() {
        let config: TestConfig =
            parse_config("endpoint: ws://localhost:4000\nretries: 5\n", ConfigFormat::Yaml)
                .unwrap();
        assert_eq!(config.endpoint, "ws://localhost:4000");
        assert_eq!(config.retries, 5);
    }

    #[test]
    fn test_parse_toml() {
        let config: TestConfig =
            parse_config("endpoint = \"ws://localhost:4000\"\n", ConfigFormat::Toml).unwrap();
        assert_eq!(config.retries, 0);
    }

    #[test]
    fn test_parse_json() {
        let config: TestConfig = parse_config(
            r#"{"endpoint": "ws://localhost:4000", "retries": 2}"#,
            ConfigFormat::Json,
        )
        .unwrap();
        assert_eq!(config.retries, 2);
    }

    #[test]
    fn test_parse_error_names_format() {
        let result: Result<TestConfig, _> = parse_config("{not yaml: [", ConfigFormat::Json);
        match result {
            Err(ConfigError::Parse { format, .. }) => assert_eq!(format, "json"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        writeln!(file, "endpoint: ws://feed.example:4000").unwrap();

        let config: TestConfig = load_config(file.path()).unwrap();
        assert_eq!(config.endpoint, "ws://feed.example:4000");
    }

    #[test]
    fn test_load_unsupported_extension() {
        let result: Result<TestConfig, _> = load_config("feed.ini");
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedFormat { .. })
        ));
    }
}
