//! Numeric knobs of the analysis engine and their settings-document loader.
use crate::Utils::config_parser::{DocumentError, DocumentMap, Value, parse_document_with_template};
use crate::Utils::logger::level_from_str;
use crate::intervals::interval::Interval;
use log::info;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// points with |y| above this are dropped from sampled runs
    pub max_y: f64,
    /// range bounds beyond +-range_ceiling are reported as infinite
    pub range_ceiling: f64,
    pub display_step: f64,
    pub extrema_step: f64,
    pub validation_step: f64,
    /// successive far-field values closer than this count as a horizontal asymptote
    pub asymptote_epsilon: f64,
    pub loglevel: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            max_y: 5.5,
            range_ceiling: 5.0,
            display_step: 0.1,
            extrema_step: 0.01,
            validation_step: 0.1,
            asymptote_epsilon: 1e-3,
            loglevel: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Document(DocumentError),
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "could not read settings: {}", e),
            ConfigError::Document(e) => write!(f, "{}", e),
            ConfigError::InvalidValue {
                section,
                key,
                message,
            } => write!(f, "invalid value of {}.{}: {}", section, key, message),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<DocumentError> for ConfigError {
    fn from(e: DocumentError) -> Self {
        ConfigError::Document(e)
    }
}

fn template() -> HashMap<String, Vec<String>> {
    let sections: [(&str, &[&str]); 4] = [
        ("sampling", &["max_y", "display_step", "extrema_step"]),
        ("analysis", &["range_ceiling", "asymptote_epsilon"]),
        ("validation", &["validation_step"]),
        ("logging", &["loglevel"]),
    ];
    sections
        .iter()
        .map(|(title, keys)| {
            (
                title.to_string(),
                keys.iter().map(|k| k.to_string()).collect(),
            )
        })
        .collect()
}

fn invalid(section: &str, key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        message: message.to_string(),
    }
}

fn single_value<'a>(
    document: &'a DocumentMap,
    section: &str,
    key: &str,
) -> Result<Option<&'a Value>, ConfigError> {
    match document.get(section).and_then(|s| s.get(key)) {
        Some(Some(values)) => match values.as_slice() {
            [value] => Ok(Some(value)),
            _ => Err(invalid(section, key, "expected exactly one value")),
        },
        _ => Ok(None),
    }
}

/// overwrites `target` with a positive float if the document has one
fn read_positive(
    document: &DocumentMap,
    section: &str,
    key: &str,
    target: &mut f64,
) -> Result<(), ConfigError> {
    if let Some(value) = single_value(document, section, key)? {
        let number = value
            .as_float()
            .ok_or_else(|| invalid(section, key, "expected a number"))?;
        if !(number.is_finite() && number > 0.0) {
            return Err(invalid(section, key, "must be a positive number"));
        }
        *target = number;
    }
    Ok(())
}

impl AnalysisConfig {
    /// Reads a settings document; keys that are absent keep their defaults.
    pub fn from_document(input: &str) -> Result<AnalysisConfig, ConfigError> {
        let document = parse_document_with_template(input, &template())?;
        let mut config = AnalysisConfig::default();
        read_positive(&document, "sampling", "max_y", &mut config.max_y)?;
        read_positive(&document, "sampling", "display_step", &mut config.display_step)?;
        read_positive(&document, "sampling", "extrema_step", &mut config.extrema_step)?;
        read_positive(&document, "analysis", "range_ceiling", &mut config.range_ceiling)?;
        read_positive(&document, "analysis", "asymptote_epsilon", &mut config.asymptote_epsilon)?;
        read_positive(&document, "validation", "validation_step", &mut config.validation_step)?;
        if let Some(value) = single_value(&document, "logging", "loglevel")? {
            let level = value.to_string();
            level_from_str(Some(&level)).map_err(|m| invalid("logging", "loglevel", &m))?;
            config.loglevel = Some(level);
        }
        config.check()?;
        info!("analysis settings loaded: {:?}", config);
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<AnalysisConfig, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        AnalysisConfig::from_document(&content)
    }

    /// Grid steps live on the hundredths lattice, so nothing finer than 0.01 is accepted.
    pub fn check(&self) -> Result<(), ConfigError> {
        for (key, step) in [
            ("display_step", self.display_step),
            ("extrema_step", self.extrema_step),
        ] {
            if step < 0.01 {
                return Err(invalid("sampling", key, "steps below 0.01 are not supported"));
            }
        }
        if self.validation_step < 0.01 {
            return Err(invalid(
                "validation",
                "validation_step",
                "steps below 0.01 are not supported",
            ));
        }
        Ok(())
    }

    /// the default y window `[-range_ceiling, range_ceiling]` used for range questions
    pub fn range_window(&self) -> Interval {
        Interval {
            lower: -self.range_ceiling,
            lower_inclusive: true,
            upper: self.range_ceiling,
            upper_inclusive: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.max_y, 5.5);
        assert_eq!(config.extrema_step, 0.01);
        assert_eq!(config.range_window().to_string(), "[-5.0, 5.0]");
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_from_document_overrides_some_keys() {
        let config = AnalysisConfig::from_document(
            "sampling\n max_y: 4\n display_step: 0.05\nlogging\n loglevel: debug",
        )
        .unwrap();
        assert_eq!(config.max_y, 4.0);
        assert_eq!(config.display_step, 0.05);
        assert_eq!(config.extrema_step, 0.01);
        assert_eq!(config.loglevel.as_deref(), Some("debug"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            AnalysisConfig::from_document("sampling max_y: -1"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            AnalysisConfig::from_document("sampling extrema_step: 0.001"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            AnalysisConfig::from_document("logging loglevel: loud"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            AnalysisConfig::from_document("sampling max_y: 1, 2"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            AnalysisConfig::from_document("sampling"),
            Err(ConfigError::Document(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# tutor settings").unwrap();
        writeln!(file, "analysis").unwrap();
        writeln!(file, "  asymptote_epsilon: 0.0001").unwrap();
        writeln!(file, "validation").unwrap();
        writeln!(file, "  validation_step: 0.05").unwrap();
        let config = AnalysisConfig::from_file(file.path()).unwrap();
        assert_eq!(config.asymptote_epsilon, 1e-4);
        assert_eq!(config.validation_step, 0.05);
        assert!(matches!(
            AnalysisConfig::from_file("/definitely/not/here.txt"),
            Err(ConfigError::Io(_))
        ));
    }
}
