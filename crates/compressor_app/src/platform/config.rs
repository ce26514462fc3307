use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use compressor_engine::{AtomicFileWriter, UploadSettings};
use compressor_logging::{compressor_info, compressor_warn};
use serde::{Deserialize, Serialize};

use crate::cli::Args;

/// Settings read from `compressor.ron`; command-line flags win over them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub server_url: String,
    pub output_dir: PathBuf,
    /// Level to pick instead of the form's default.
    pub default_level: Option<String>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let settings = UploadSettings::default();
        Self {
            server_url: settings.server_url,
            output_dir: PathBuf::from("."),
            default_level: None,
            connect_timeout_secs: settings.connect_timeout.as_secs(),
            request_timeout_secs: settings.request_timeout.as_secs(),
        }
    }
}

impl AppConfig {
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(server) = &args.server {
            self.server_url = server.clone();
        }
        if let Some(dir) = &args.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(level) = &args.level {
            self.default_level = Some(level.clone());
        }
    }

    pub fn upload_settings(&self) -> UploadSettings {
        UploadSettings {
            server_url: self.server_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..UploadSettings::default()
        }
    }
}

pub(crate) fn load_config(path: &Path) -> AppConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return AppConfig::default();
        }
        Err(err) => {
            compressor_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => {
            compressor_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            compressor_warn!("Failed to parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}

pub(crate) fn save_config(path: &Path, config: &AppConfig) -> anyhow::Result<PathBuf> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("config path {:?} has no file name", path))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content =
        ron::ser::to_string_pretty(config, pretty).context("failed to serialize config")?;

    let writer = AtomicFileWriter::new(dir);
    writer
        .write(file_name, content.as_bytes())
        .with_context(|| format!("failed to write config to {:?}", path))
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        assert_eq!(
            load_config(&temp.path().join("compressor.ron")),
            AppConfig::default()
        );
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("compressor.ron");
        fs::write(&path, "(server_url: 42").unwrap();
        assert_eq!(load_config(&path), AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("compressor.ron");
        fs::write(&path, r#"(server_url: "http://pdf.local:8080", default_level: Some("high"))"#)
            .unwrap();

        let config = load_config(&path);
        assert_eq!(config.server_url, "http://pdf.local:8080");
        assert_eq!(config.default_level.as_deref(), Some("high"));
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.request_timeout_secs, 600);
    }

    #[test]
    fn saved_config_loads_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("compressor.ron");
        let config = AppConfig {
            server_url: "http://10.0.0.2:5000".to_string(),
            output_dir: PathBuf::from("out"),
            default_level: Some("low".to_string()),
            connect_timeout_secs: 3,
            request_timeout_secs: 90,
        };

        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path), config);
    }

    #[test]
    fn flags_override_file_values() {
        let args = Args::try_parse_from([
            "compressor_app",
            "--server",
            "http://other:5000",
            "--output-dir",
            "downloads",
        ])
        .unwrap();
        let mut config = AppConfig {
            default_level: Some("medium".to_string()),
            ..AppConfig::default()
        };
        config.apply_args(&args);

        assert_eq!(config.server_url, "http://other:5000");
        assert_eq!(config.output_dir, PathBuf::from("downloads"));
        assert_eq!(config.default_level.as_deref(), Some("medium"));

        let settings = config.upload_settings();
        assert_eq!(settings.server_url, "http://other:5000");
        assert_eq!(settings.compress_path, "/compress");
    }
}
