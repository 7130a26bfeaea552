use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const URL_ENV: &str = "QAZA_URL";
pub const ANON_KEY_ENV: &str = "QAZA_ANON_KEY";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// SQLite file in the data directory.
    #[default]
    Local,
    /// Hosted backend reached over HTTP.
    Remote,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Local => "local",
            BackendKind::Remote => "remote",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
}

impl BackendConfig {
    /// Url and anon key for the remote backend, or an error naming what's missing.
    pub fn remote_credentials(&self) -> Result<(&str, &str)> {
        if self.url.is_empty() {
            bail!("No backend url configured. Run `qaza setup --url ...` or set {}", URL_ENV);
        }
        if self.anon_key.is_empty() {
            bail!("No anon key configured. Run `qaza setup --anon-key ...` or set {}", ANON_KEY_ENV);
        }
        Ok((self.url.as_str(), self.anon_key.as_str()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "qaza")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("qaza.db"))
    }

    pub fn session_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("session.json"))
    }

    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env(
            std::env::var(URL_ENV).ok(),
            std::env::var(ANON_KEY_ENV).ok(),
        );
        Ok(config)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    /// Environment values win over the file. Setting a url implies the remote backend.
    pub fn apply_env(&mut self, url: Option<String>, anon_key: Option<String>) {
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            self.backend.url = url;
            self.backend.kind = BackendKind::Remote;
        }
        if let Some(key) = anon_key.filter(|k| !k.is_empty()) {
            self.backend.anon_key = key;
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
