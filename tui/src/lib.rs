//! Terminal front end for quick page creation.
//!
//! The interactive screens live in [`app`], [`headless`] runs the same
//! workflow straight from the command line.

pub mod app;
pub mod cli;
pub mod headless;
pub mod logging;

use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};
use quickpage_core::{QuickPage, settings::TomlSettingsFile};
use tracing::info;

use cli::Cli;

/// The settings file the command line points to
pub fn settings_file(cli: &Cli) -> Result<TomlSettingsFile> {
    match &cli.config {
        Some(path) => Ok(TomlSettingsFile::new(path)),
        None => Ok(TomlSettingsFile::default_location()?),
    }
}

/// Opens the vault the command line points to, with the settings in `settings_file`
pub fn load(cli: &Cli, settings_file: TomlSettingsFile) -> Result<QuickPage> {
    let workspace = match &cli.workspace {
        Some(workspace) => workspace.to_owned(),
        None => std::env::current_dir().wrap_err("Can't read the current directory")?,
    };
    info!("Settings file: {}", settings_file.path().display());
    let quick_page = QuickPage::load(&workspace, Arc::new(settings_file))
        .wrap_err_with(|| format!("Can't load the vault at {}", workspace.display()))?;
    Ok(quick_page)
}
