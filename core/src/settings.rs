use std::{
    io::{Read, Write},
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use std::fs::File;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{error::SettingsError, utilities::path_to_string};

const CONFIG_DIR: &str = "quickpage";
#[cfg(debug_assertions)]
const BASE_CONFIG_FILE: &str = "settings_debug.toml";
#[cfg(not(debug_assertions))]
const BASE_CONFIG_FILE: &str = "settings.toml";

pub const DEFAULT_TEMPLATE_FOLDER: &str = "/";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_template_folder")]
    pub template_folder_path: String,
}

fn default_template_folder() -> String {
    DEFAULT_TEMPLATE_FOLDER.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            template_folder_path: default_template_folder(),
        }
    }
}

/// Where the settings record is kept between runs.
/// Missing fields in what's stored are filled with their defaults.
pub trait SettingsPersistence: Send + Sync {
    fn load_data(&self) -> Result<Option<Settings>, SettingsError>;
    fn save_data(&self, settings: &Settings) -> Result<(), SettingsError>;
}

/// Settings stored as a toml file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TomlSettingsFile {
    path: PathBuf,
}

impl TomlSettingsFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The settings file in the user's config directory
    pub fn default_location() -> Result<Self, SettingsError> {
        let config = dirs::config_dir().ok_or(SettingsError::ConfigDirNotFound)?;
        Ok(Self::new(config.join(CONFIG_DIR).join(BASE_CONFIG_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsPersistence for TomlSettingsFile {
    fn load_data(&self) -> Result<Option<Settings>, SettingsError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let mut settings_file = File::open(&self.path)?;
        let mut toml = String::new();
        settings_file.read_to_string(&mut toml)?;

        let settings = toml::from_str(toml.as_ref())?;
        Ok(Some(settings))
    }

    fn save_data(&self, settings: &Settings) -> Result<(), SettingsError> {
        debug!("Saving settings to {}", path_to_string(&self.path));
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&self.path)?;
        let toml = toml::to_string(settings)?;
        file.write_all(toml.as_bytes())?;
        Ok(())
    }
}

/// Shared access to the loaded settings, every change is saved right away.
#[derive(Clone)]
pub struct SettingsHandle {
    settings: Arc<RwLock<Settings>>,
    persistence: Arc<dyn SettingsPersistence>,
}

impl SettingsHandle {
    /// Loads the stored settings over the defaults, the defaults
    /// are saved when nothing was stored yet
    pub fn load(persistence: Arc<dyn SettingsPersistence>) -> Result<Self, SettingsError> {
        let settings = match persistence.load_data()? {
            Some(settings) => settings,
            None => {
                let default_settings = Settings::default();
                persistence.save_data(&default_settings)?;
                default_settings
            }
        };
        Ok(Self {
            settings: Arc::new(RwLock::new(settings)),
            persistence,
        })
    }

    pub fn get(&self) -> Settings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn template_folder_path(&self) -> String {
        self.get().template_folder_path
    }

    pub fn set_template_folder_path<S: Into<String>>(&self, path: S) -> Result<(), SettingsError> {
        let snapshot = {
            let mut settings = self
                .settings
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            settings.template_folder_path = path.into();
            settings.clone()
        };
        self.persistence.save_data(&snapshot)
    }
}

impl std::fmt::Debug for SettingsHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsHandle")
            .field("settings", &self.get())
            .finish_non_exhaustive()
    }
}
