use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "quickpage",
    version,
    about = "Create pages in a notes vault, blank or from a template"
)]
pub struct Cli {
    /// Vault directory, the current directory when not set
    #[arg(short, long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Settings file, defaults to the user's config directory
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output, can be repeated
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Open the create page dialog (default)
    New,
    /// Open the settings panel
    Settings,
    /// Create a page without opening the dialog
    Create {
        /// Folder to create the page in, `/` for the vault root
        #[arg(short, long)]
        folder: Option<String>,
        /// Template name or path, a blank page when not set
        #[arg(short, long)]
        template: Option<String>,
        /// Page name, `NewPage` when empty
        #[arg(short, long, default_value = "")]
        name: String,
    },
    /// List the folders in the vault
    Folders,
    /// List the templates found in the template folder
    Templates,
    /// Show or change the settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the current settings
    Show,
    /// Set the folder templates are taken from
    SetTemplateFolder { path: String },
}
