//! Configuration management for roslist.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::GenerateError;
use crate::feed::AddressFamily;

/// Main configuration structure. Everything the pipelines consume comes in
/// through here; nothing is baked into the core logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target country code as it appears in the feed (e.g. "CN").
    pub country: String,

    /// Address-list name the generated script installs into.
    pub list_name: String,

    /// Registry whose records qualify, lowercase as in the feed.
    pub registry: String,

    /// Delegation feed URL.
    pub delegation_url: String,

    /// Request timeout in seconds, applied to both family pipelines.
    pub timeout_secs: u64,

    /// Manual IPv4 ranges merged into the generated list.
    pub custom_ipv4_ranges: Vec<String>,

    /// Collapse adjacent/overlapping ranges before rendering.
    pub collapse: bool,

    /// Output path for the IPv4 script.
    pub ipv4_output: PathBuf,

    /// Output path for the IPv6 script.
    pub ipv6_output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            country: "CN".to_string(),
            list_name: "CN".to_string(),
            registry: "apnic".to_string(),
            delegation_url: "https://ftp.apnic.net/apnic/stats/apnic/delegated-apnic-latest"
                .to_string(),
            timeout_secs: 30,
            custom_ipv4_ranges: vec![
                "10.10.10.0/24".to_string(),
                "192.168.1.0/24".to_string(),
            ],
            collapse: true,
            ipv4_output: PathBuf::from("china-ipv4.rsc"),
            ipv6_output: PathBuf::from("china-ipv6.rsc"),
        }
    }
}

/// List names end up inside `list="..."` in the script; keep them to
/// characters that cannot break out of the quoting.
fn is_safe_list_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GenerateError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GenerateError::Config(format!("failed to read config file {}: {}", path.display(), e))
        })?;
        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            GenerateError::Config(format!(
                "failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file does not
    /// exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, GenerateError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            info!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), GenerateError> {
        if self.country.len() != 2 || !self.country.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(GenerateError::Config(format!(
                "Invalid country code {:?}. Use two uppercase ASCII letters, e.g. \"CN\"",
                self.country
            )));
        }

        if !is_safe_list_name(&self.list_name) {
            return Err(GenerateError::Config(format!(
                "Invalid list name {:?}. Use ASCII letters, digits, '-', '_' or '.'",
                self.list_name
            )));
        }

        if self.registry.is_empty() || !self.registry.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(GenerateError::Config(format!(
                "Invalid registry {:?}. Use the lowercase registry token from the feed",
                self.registry
            )));
        }

        if !self.delegation_url.starts_with("https://") {
            return Err(GenerateError::Config(format!(
                "Delegation URL must use HTTPS: {}",
                self.delegation_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(GenerateError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        for range in &self.custom_ipv4_ranges {
            if range.parse::<Ipv4Net>().is_err() {
                return Err(GenerateError::Config(format!(
                    "Invalid custom IPv4 range {:?}",
                    range
                )));
            }
        }

        Ok(())
    }

    /// Save configuration to a YAML file atomically.
    ///
    /// Uses tempfile + rename to prevent corruption on crash.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), GenerateError> {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let path = path.as_ref();
        let content = serde_yaml::to_string(self)
            .map_err(|e| GenerateError::Config(format!("failed to serialize config: {}", e)))?;

        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(parent).map_err(|e| {
            GenerateError::Io(format!("failed to create temporary config file: {}", e))
        })?;
        temp.write_all(content.as_bytes())
            .map_err(|e| GenerateError::Io(format!("failed to write config: {}", e)))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| GenerateError::Io(format!("failed to flush config: {}", e)))?;
        temp.persist(path).map_err(|e| {
            GenerateError::Io(format!("failed to persist config {}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// The configured custom ranges as canonical networks (host bits
    /// masked).
    pub fn custom_v4_nets(&self) -> Result<Vec<Ipv4Net>, GenerateError> {
        self.custom_ipv4_ranges
            .iter()
            .map(|range| {
                range
                    .parse::<Ipv4Net>()
                    .map(|net| net.trunc())
                    .map_err(|_| {
                        GenerateError::Config(format!("Invalid custom IPv4 range {:?}", range))
                    })
            })
            .collect()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Data-source label for script headers (e.g. "APNIC").
    pub fn source_label(&self) -> String {
        self.registry.to_uppercase()
    }

    pub fn output_for(&self, family: AddressFamily) -> &Path {
        match family {
            AddressFamily::V4 => &self.ipv4_output,
            AddressFamily::V6 => &self.ipv6_output,
        }
    }
}
