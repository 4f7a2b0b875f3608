//! Converter configuration from pdfxml.toml

use crate::extraction::DEFAULT_MAX_INPUT_BYTES;
use crate::xml_exporter::XmlLayout;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "pdfxml.toml";

/// Main converter configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Input handling
    pub input: InputConfig,

    /// Output handling
    pub output: OutputConfig,
}

/// Input settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Largest input file accepted, in bytes
    pub max_bytes: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output document format
    pub format: OutputFormat,

    /// Whitespace layout of XML output
    pub layout: XmlLayout,

    /// Directory results are written to; next to each input when unset
    pub directory: Option<PathBuf>,
}

/// Output document format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Structured XML document
    #[default]
    Xml,
    /// The same document model as JSON
    Json,
}

impl OutputFormat {
    /// File extension for this format
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xml => "xml",
            OutputFormat::Json => "json",
        }
    }
}

impl ConverterConfig {
    /// Load configuration from a TOML file
    ///
    /// # Parameters
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(ConverterConfig)` - Successfully loaded configuration
    /// * `Err(ConfigError)` - Error reading or parsing the configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(&path).map_err(ConfigError::IoError)?;

        let config: ConverterConfig = toml::from_str(&content).map_err(ConfigError::ParseError)?;

        Ok(config)
    }

    /// Load configuration if the file exists, otherwise use defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            log::debug!(
                "No configuration at {}, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::SerializeError)?;

        fs::write(&path, content).map_err(ConfigError::IoError)?;

        Ok(())
    }
}

/// Errors that can occur when loading or saving configuration
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum ConfigError {
    /// IO error when reading or writing file
    IoError(std::io::Error),

    /// Error parsing TOML
    ParseError(toml::de::Error),

    /// Error serializing to TOML
    SerializeError(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "TOML parse error: {}", e),
            ConfigError::SerializeError(e) => write!(f, "TOML serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConverterConfig::default();
        assert_eq!(config.input.max_bytes, 10 * 1024 * 1024);
        assert_eq!(config.output.format, OutputFormat::Xml);
        assert_eq!(config.output.layout, XmlLayout::Compact);
        assert_eq!(config.output.directory, None);
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_content = r#"
[output]
layout = "indented"
directory = "converted"
"#;

        let config: ConverterConfig = toml::from_str(toml_content).unwrap();

        assert_eq!(config.output.layout, XmlLayout::Indented);
        assert_eq!(config.output.format, OutputFormat::Xml);
        assert_eq!(config.output.directory, Some(PathBuf::from("converted")));
        assert_eq!(config.input.max_bytes, DEFAULT_MAX_INPUT_BYTES);
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let config = ConverterConfig {
            input: InputConfig { max_bytes: 4096 },
            output: OutputConfig {
                format: OutputFormat::Json,
                layout: XmlLayout::Indented,
                directory: Some(PathBuf::from("out")),
            },
        };
        config.save(&path).unwrap();

        assert_eq!(ConverterConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConverterConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ConverterConfig::default());
    }

    #[test]
    fn test_invalid_layout_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[output]\nlayout = \"fancy\"\n").unwrap();

        let err = ConverterConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
        assert!(err.to_string().starts_with("TOML parse error"));
    }
}
