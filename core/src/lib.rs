pub mod command;
pub mod creator;
pub mod error;
pub mod nfs;
pub mod notice;
pub mod settings;
pub mod utilities;
pub mod vault;

use std::{path::Path, sync::Arc};

use command::{CommandAction, CommandRegistry, create_page_command};
use creator::PageCreator;
use error::{SettingsError, VaultError};
use log::info;
use notice::Notifier;
use settings::{SettingsHandle, SettingsPersistence};
use thiserror::Error;
use vault::{FsVault, Vault};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Error opening the vault: {0}")]
    Vault(#[from] VaultError),
    #[error("Error loading the settings: {0}")]
    Settings(#[from] SettingsError),
}

/// A loaded instance: the vault, its settings and the registered commands
pub struct QuickPage {
    vault: Arc<dyn Vault>,
    settings: SettingsHandle,
    commands: CommandRegistry,
}

impl QuickPage {
    /// Opens the vault at `workspace_path` and loads the settings
    pub fn load<P: AsRef<Path>>(
        workspace_path: P,
        persistence: Arc<dyn SettingsPersistence>,
    ) -> Result<Self, LoadError> {
        let vault = Arc::new(FsVault::new(workspace_path)?);
        Self::with_vault(vault, persistence)
    }

    pub fn with_vault(
        vault: Arc<dyn Vault>,
        persistence: Arc<dyn SettingsPersistence>,
    ) -> Result<Self, LoadError> {
        let settings = SettingsHandle::load(persistence)?;
        let mut commands = CommandRegistry::new();
        commands.register(create_page_command());
        info!(
            "Loaded, template folder `{}`",
            settings.template_folder_path()
        );
        Ok(Self {
            vault,
            settings,
            commands,
        })
    }

    pub fn vault(&self) -> Arc<dyn Vault> {
        self.vault.clone()
    }

    pub fn settings(&self) -> &SettingsHandle {
        &self.settings
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// A fresh dialog for the create page command
    pub fn page_creator(&self, notifier: Arc<dyn Notifier>) -> PageCreator {
        PageCreator::new(self.vault.clone(), &self.settings, notifier)
    }

    /// Runs the command `id`, returning the dialog it opens
    pub fn run_command(&self, id: &str, notifier: Arc<dyn Notifier>) -> Option<PageCreator> {
        match self.commands.action_for(id)? {
            CommandAction::CreatePage => Some(self.page_creator(notifier)),
        }
    }
}
