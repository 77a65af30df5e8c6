use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_SERVER_ADDRESS: &str = "http://127.0.0.1:5000";

/// Mode of a newly created configuration file.
#[cfg(unix)]
const CONFIG_FILE_MODE: u32 = 0o660;

/// Settings persisted between runs. Missing keys fall back to [`Config::default`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "ServerAddress", alias = "ServerAdress")]
    pub server_address: String,
    #[serde(rename = "JWT")]
    pub token: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            token: String::new(),
        }
    }
}

impl Config {
    /// Read the configuration at `path`. A missing file is not an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = match fs::read(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No configuration at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display()))?,
        };
        tracing::debug!("Loaded configuration from {}", path.display());
        serde_json::from_slice(&contents)
            .with_context(|| format!("Failed to parse configuration {}", path.display()))
    }

    /// Write the configuration to `path` as JSON indented by four spaces. A
    /// newly created file gets mode 0660 on unix.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut ser)
            .context("Failed to serialize configuration")?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        std::os::unix::fs::OpenOptionsExt::mode(&mut options, CONFIG_FILE_MODE);
        options
            .open(path)
            .and_then(|mut file| file.write_all(&out))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!("Saved configuration to {}", path.display());
        Ok(())
    }
}
