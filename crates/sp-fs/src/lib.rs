//! Filesystem-backed catalog definitions and configuration for SearchPlus.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use sp_core::{
    Command, CommandCatalog, CoreError, CoreResult, FieldDefaults, SectionTemplate, SettingValue,
};

/// Directory name used under the platform config directory.
pub const APP_DIR_NAME: &str = "searchplus";

/// Environment variable that points at an alternative config file.
pub const CONFIG_ENV: &str = "SEARCHPLUS_CONFIG";

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Application configuration.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Breadcrumb depth shown on home-grid tiles.
    pub grid_depth: usize,
    /// YAML catalog to load instead of the built-in one.
    pub catalog: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            grid_depth: 2,
            catalog: None,
        }
    }
}

/// Resolve the config file path: `$SEARCHPLUS_CONFIG`, then the platform
/// config directory.
pub fn config_path() -> CoreResult<PathBuf> {
    if let Ok(value) = std::env::var(CONFIG_ENV) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    if let Some(dir) = dirs::config_dir() {
        return Ok(dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
    }
    Err(CoreError::Storage(
        "unable to determine config directory".into(),
    ))
}

/// Read the config from [`config_path`]. A missing file yields the defaults.
pub fn load_config() -> CoreResult<Config> {
    load_config_from(&config_path()?)
}

/// Read a config file. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> CoreResult<Config> {
    if !path.exists() {
        debug!("no config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    let contents = fs::read_to_string(path).map_err(|err| CoreError::Storage(err.to_string()))?;
    let config = serde_yaml::from_str(&contents)
        .map_err(|err| CoreError::Storage(format!("{}: {err}", path.display())))?;
    debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Write the config to [`config_path`].
pub fn save_config(config: &Config) -> CoreResult<()> {
    save_config_to(&config_path()?, config)
}

/// Write a config file as YAML, creating missing parent directories.
pub fn save_config_to(path: &Path, config: &Config) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| CoreError::Storage(err.to_string()))?;
    }
    let contents =
        serde_yaml::to_string(config).map_err(|err| CoreError::Storage(err.to_string()))?;
    fs::write(path, contents).map_err(|err| CoreError::Storage(err.to_string()))?;
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    commands: Vec<CommandRecord>,
}

/// One command as written in a catalog file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CommandRecord {
    name: String,
    #[serde(default)]
    path: Vec<String>,
    #[serde(default)]
    keywords: Option<Vec<String>>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default = "default_suggested")]
    suggested: bool,
    #[serde(default)]
    defaults: BTreeMap<String, SettingValue>,
    /// Fields that reset to the value seen when the screen was last opened.
    #[serde(default)]
    saved: BTreeMap<String, SettingValue>,
    #[serde(default)]
    sections: Vec<SectionTemplate>,
}

fn default_suggested() -> bool {
    true
}

impl CommandRecord {
    fn into_command(self) -> CoreResult<Command> {
        let behavior = self
            .defaults
            .into_iter()
            .fold(FieldDefaults::new(), |behavior, (field, value)| behavior.field(field, value));
        let behavior = self
            .saved
            .into_iter()
            .fold(behavior, |behavior, (field, initial)| behavior.saved_field(field, initial));
        let behavior = self
            .sections
            .into_iter()
            .fold(behavior, FieldDefaults::section);

        let mut builder = Command::builder(self.name)
            .path(self.path)
            .synonyms(self.synonyms)
            .suggested(self.suggested)
            .behavior(behavior);
        if let Some(keywords) = self.keywords {
            builder = builder.keywords(keywords);
        }
        builder.build()
    }
}

/// Build a catalog from YAML text.
pub fn parse_catalog(contents: &str) -> CoreResult<CommandCatalog> {
    let file: CatalogFile =
        serde_yaml::from_str(contents).map_err(|err| CoreError::Storage(err.to_string()))?;
    let commands = file
        .commands
        .into_iter()
        .map(CommandRecord::into_command)
        .collect::<CoreResult<Vec<_>>>()?;
    CommandCatalog::new(commands)
}

/// Build a catalog from a YAML file.
pub fn load_catalog(path: &Path) -> CoreResult<CommandCatalog> {
    let contents = fs::read_to_string(path)
        .map_err(|err| CoreError::Storage(format!("{}: {err}", path.display())))?;
    let catalog = parse_catalog(&contents)?;
    debug!("loaded {} commands from {}", catalog.len(), path.display());
    Ok(catalog)
}
