use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "FLAT_MATCHER_DATA_DIR";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PathsConfig {
    pub listings_csv: PathBuf,
    pub export_dir: PathBuf,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RankingConfig {
    pub limit: usize,
    pub min_score: u8,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UiConfig {
    pub currency_symbol: String,
    pub color: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub paths: PathsConfig,
    pub ranking: RankingConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub settings: Settings,
    pub base_dir: PathBuf,
}

impl AppConfig {
    /// Loads `settings.json` from the platform data directory, or from
    /// `$FLAT_MATCHER_DATA_DIR` when set.
    pub fn load() -> Result<Self> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => project_dirs()?.data_dir().to_path_buf(),
        };
        Self::load_from(&base_dir)
    }

    pub fn load_from(base_dir: &Path) -> Result<Self> {
        fs::create_dir_all(base_dir)
            .with_context(|| format!("Failed to create {}", base_dir.display()))?;
        let settings_path = base_dir.join("settings.json");
        let settings: Settings = load_or_write(&settings_path, default_settings(base_dir))?;
        Ok(AppConfig {
            settings,
            base_dir: base_dir.to_path_buf(),
        })
    }

    pub fn settings_path(&self) -> PathBuf {
        self.base_dir.join("settings.json")
    }
}

fn load_or_write<T>(path: &Path, default: T) -> Result<T>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    if !path.exists() {
        let data = serde_json::to_string_pretty(&default)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)?;
        tracing::info!(path = %path.display(), "wrote default settings");
        return Ok(default);
    }
    let bytes =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str(&bytes)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(value)
}

/// Reads a JSON file the user points at, e.g. a saved preference set.
pub fn read_json<T>(path: &Path) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let bytes =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&bytes).with_context(|| format!("Failed to parse {}", path.display()))
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "example", "flat_matcher")
        .context("Unable to determine platform data directory")
}

fn default_settings(base_dir: &Path) -> Settings {
    Settings {
        paths: PathsConfig {
            listings_csv: base_dir.join("data").join("listings.csv"),
            export_dir: base_dir.join("exports"),
        },
        ranking: RankingConfig {
            limit: 10,
            min_score: 0,
        },
        ui: UiConfig {
            currency_symbol: "$".into(),
            color: true,
        },
        logging: LoggingConfig {
            level: "warn".into(),
        },
    }
}
