use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_REFERENCE_FILE: &str = "extra_context.txt";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub reference: ReferenceConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReferenceConfig {
    pub path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
        }
    }
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_REFERENCE_FILE),
        }
    }
}

impl Settings {
    /// Loads `~/.pitstop/config.toml` (or defaults) and applies environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path_static()?;
        let mut settings = Self::load_from(&config_path)?;
        settings.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let settings: Settings = toml::from_str(&content)
                .with_context(|| format!("Invalid config file {}", path.display()))?;
            Ok(settings)
        } else {
            // Return default settings if config doesn't exist
            Ok(Self::default())
        }
    }

    /// Environment values win over the config file.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.upstream.api_key = Some(key);
        }

        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a number between 0 and 65535, got {port:?}"))?;
        }

        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            self.upstream.base_url = base_url;
        }

        if let Some(model) = lookup("OPENAI_MODEL") {
            self.upstream.model = model;
        }

        if let Some(path) = lookup("PITSTOP_REFERENCE") {
            self.reference.path = PathBuf::from(path);
        }

        Ok(())
    }

    pub fn get_config_path(&self) -> Result<PathBuf> {
        Self::get_config_path_static()
    }

    /// API key with everything but the last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        match self.upstream.api_key.as_deref() {
            None => "(not set)".to_string(),
            Some(key) => {
                let chars: Vec<char> = key.chars().collect();
                if chars.len() <= 4 {
                    "****".to_string()
                } else {
                    let tail: String = chars[chars.len() - 4..].iter().collect();
                    format!("****{tail}")
                }
            }
        }
    }

    pub(crate) fn get_config_path_static() -> Result<PathBuf> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;

        Ok(home_dir.join(".pitstop").join("config.toml"))
    }
}
