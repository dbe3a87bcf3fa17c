//! Configuration loading and parsing

use anyhow::{Context, Result};
use imu_log_decoder::DecoderConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub decoder: DecoderConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    /// Raw IMU/GPS log
    pub log: Option<PathBuf>,
    /// File holding the time zero shared with the other ride logs
    pub time_zero_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory the channel CSVs are written to
    pub dir: Option<PathBuf>,
    /// Where to write the summary as JSON
    pub summary_json: Option<PathBuf>,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

/// Read a time zero value from a file
///
/// The first line that is neither blank nor a `#` comment must hold the value.
pub fn read_time_zero(path: &Path) -> Result<f64> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read time zero file: {:?}", path))?;

    let line = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .with_context(|| format!("Time zero file is empty: {:?}", path))?;

    line.parse::<f64>()
        .with_context(|| format!("Invalid time zero {:?} in {:?}", line, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use imu_log_decoder::VelocityLabels;
    use std::io::Write;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [input]
            log = "temp/imu.csv"
            time_zero_file = "temp/time_zero.txt"

            [output]
            dir = "Processed_Data"

            [decoder]
            velocity_labels = "north_east"
            split_concatenated = true
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.log, Some(PathBuf::from("temp/imu.csv")));
        assert_eq!(config.output.dir, Some(PathBuf::from("Processed_Data")));
        assert_eq!(config.output.summary_json, None);
        assert_eq!(config.decoder.velocity_labels, VelocityLabels::NorthEast);
        assert!(config.decoder.split_concatenated);
        assert!(!config.decoder.skip_blank_lines);
    }

    #[test]
    fn test_empty_config() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.input.log.is_none());
        assert_eq!(config.decoder, DecoderConfig::default());
    }

    #[test]
    fn test_read_time_zero() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# shared reference").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  1523.75  ").unwrap();
        file.flush().unwrap();

        assert_eq!(read_time_zero(file.path()).unwrap(), 1523.75);
    }

    #[test]
    fn test_read_time_zero_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "yesterday").unwrap();
        file.flush().unwrap();
        assert!(read_time_zero(file.path()).is_err());

        let empty = tempfile::NamedTempFile::new().unwrap();
        assert!(read_time_zero(empty.path()).is_err());
    }
}
