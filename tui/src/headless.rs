use std::{path::Path, sync::Arc};

use color_eyre::eyre::{Result, WrapErr, eyre};
use quickpage_core::{
    QuickPage,
    command::CREATE_PAGE_COMMAND_ID,
    creator::{ContentSource, PageCreator},
    nfs::VaultPath,
    notice::Notifier,
};
use tracing::{debug, warn};

use crate::cli::{Commands, ConfigAction};

/// Prints the notices, for runs without the terminal UI
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn notify(&self, message: &str) {
        println!("{}", message);
    }
}

pub async fn run(quick_page: &QuickPage, settings_path: &Path, command: Commands) -> Result<()> {
    debug!("Running {:?}", command);
    match command {
        Commands::Create {
            folder,
            template,
            name,
        } => {
            create(quick_page, folder.as_deref(), template.as_deref(), &name).await?;
            Ok(())
        }
        Commands::Folders => {
            let creator = open_creator(quick_page)?;
            for folder in creator.list_folders() {
                println!("{}", folder);
            }
            Ok(())
        }
        Commands::Templates => {
            let creator = open_creator(quick_page)?;
            for choice in creator.templates() {
                match choice.source {
                    ContentSource::Blank => println!("{}", choice.label),
                    ContentSource::Template(template) => {
                        println!("{}\t{}", choice.label, template.path)
                    }
                }
            }
            Ok(())
        }
        Commands::Config { action } => {
            let settings = quick_page.settings();
            if let ConfigAction::SetTemplateFolder { path } = action {
                settings.set_template_folder_path(path)?;
            }
            println!("Settings file: {}", settings_path.display());
            println!("Template folder: {}", settings.template_folder_path());
            Ok(())
        }
        Commands::New | Commands::Settings => Err(eyre!("{:?} runs in the terminal UI", command)),
    }
}

fn open_creator(quick_page: &QuickPage) -> Result<PageCreator> {
    quick_page
        .run_command(CREATE_PAGE_COMMAND_ID, Arc::new(StdoutNotifier))
        .ok_or_else(|| eyre!("Command `{}` is not available", CREATE_PAGE_COMMAND_ID))
}

/// Runs the create page dialog with the choices from the command line
pub async fn create(
    quick_page: &QuickPage,
    folder: Option<&str>,
    template: Option<&str>,
    name: &str,
) -> Result<VaultPath> {
    let mut creator = open_creator(quick_page)?;

    if let Some(folder) = folder {
        let folder_path = VaultPath::new(folder);
        let selected = creator.list_folders().find(|f| f.path == folder_path);
        if selected.is_none() {
            warn!("Folder `{}` not found in the vault", folder);
        }
        creator.select_folder(selected);
    }

    if let Some(template) = template {
        let source = creator
            .templates()
            .into_iter()
            .find(|choice| match &choice.source {
                ContentSource::Blank => false,
                ContentSource::Template(file) => {
                    choice.label == template || file.path == VaultPath::new(template)
                }
            })
            .map(|choice| choice.source)
            .ok_or_else(|| {
                eyre!(
                    "Template `{}` not found in `{}`",
                    template,
                    quick_page.settings().template_folder_path()
                )
            })?;
        creator.select_source(source);
    }

    creator.set_file_name(name);
    let path = creator.submit().await.wrap_err("No page was created")?;
    Ok(path)
}
