use crate::error::{BazaarError, ConfigError, Result};
use bazaar_catalog::CatalogConfig;
use serde::Deserialize;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

fn default_bind() -> String {
    "0.0.0.0:9000".into()
}

fn default_workers() -> usize {
    4
}

fn default_database() -> PathBuf {
    PathBuf::from("../db/mercari.sqlite3")
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("images")
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("items.json")
}

fn default_max_image_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_front_url() -> String {
    "http://localhost:3000".into()
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    #[serde(default = "default_bind")]
    pub(crate) bind: String,
    #[serde(default = "default_workers")]
    pub(crate) workers: usize,

    #[serde(default = "default_database")]
    pub(crate) database: PathBuf,
    #[serde(default = "default_images_dir")]
    pub(crate) images_dir: PathBuf,
    #[serde(default = "default_snapshot_path")]
    pub(crate) snapshot_path: PathBuf,

    /// Largest accepted part of an add-item form, in bytes
    #[serde(default = "default_max_image_bytes")]
    pub(crate) max_image_bytes: usize,

    /// Origin allowed to make cross-origin requests
    #[serde(default = "default_front_url")]
    pub(crate) front_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            workers: default_workers(),
            database: default_database(),
            images_dir: default_images_dir(),
            snapshot_path: default_snapshot_path(),
            max_image_bytes: default_max_image_bytes(),
            front_url: default_front_url(),
        }
    }
}

impl Config {
    pub(crate) fn load(settings_file: &Path) -> Result<Config> {
        let contents = read_to_string(settings_file).map_err(|e| ConfigError::ReadFile {
            path: settings_file.display().to_string(),
            source: e,
        })?;
        Self::parse(&contents)
    }

    fn parse(contents: &str) -> Result<Config> {
        toml::from_str(contents).map_err(|e| BazaarError::from(ConfigError::from(e)))
    }

    pub(crate) fn catalog(&self) -> CatalogConfig {
        CatalogConfig {
            database: self.database.clone(),
            images: self.images_dir.clone(),
            snapshot: self.snapshot_path.clone(),
        }
    }

    fn apply_overrides(mut self, front_url: Option<String>) -> Result<Config> {
        if let Some(front_url) = front_url.filter(|url| !url.is_empty()) {
            self.front_url = front_url;
        }

        if self.workers == 0 {
            return Err(ConfigError::Invalid {
                reason: "workers must be greater than 0".to_string(),
            }
            .into());
        }
        if self.max_image_bytes == 0 {
            return Err(ConfigError::Invalid {
                reason: "max_image_bytes must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(self)
    }
}

pub(crate) fn load() -> Result<Config> {
    let settings = match std::env::var("CONFIG_FILE") {
        Err(_) => {
            if Path::new("settings.toml").exists() {
                Config::load(Path::new("settings.toml"))?
            } else {
                Config::default()
            }
        }
        Ok(settings_file) => Config::load(Path::new(&settings_file))?,
    };

    settings.apply_overrides(std::env::var("FRONT_URL").ok())
}
