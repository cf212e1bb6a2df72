//! The page creation dialog, independent of how it is drawn.
//!
//! A [`PageCreator`] is built each time the create page command runs. It
//! lists the folders and templates offered by the vault, keeps the choices
//! made so far in a [`DraftPage`] and, on submit, writes the new file.

use std::{fmt::Display, sync::Arc};

use log::{debug, error, info};

use crate::{
    error::{ValidationError, VaultError},
    nfs::VaultPath,
    notice::Notifier,
    settings::SettingsHandle,
    vault::Vault,
};

pub const DEFAULT_FILE_NAME: &str = "NewPage";
pub const BLANK_PAGE_LABEL: &str = "Blank Page";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FolderRef {
    pub path: VaultPath,
}

impl Display for FolderRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateFileRef {
    pub path: VaultPath,
}

impl TemplateFileRef {
    pub fn basename(&self) -> String {
        self.path.get_clean_name()
    }
}

/// What the new page starts with
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ContentSource {
    #[default]
    Blank,
    Template(TemplateFileRef),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateChoice {
    pub label: String,
    pub source: ContentSource,
}

impl TemplateChoice {
    pub fn blank() -> Self {
        Self {
            label: BLANK_PAGE_LABEL.to_string(),
            source: ContentSource::Blank,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Open,
    Submitting,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftPage {
    pub folder: Option<FolderRef>,
    pub source: ContentSource,
    pub file_name: String,
}

impl Default for DraftPage {
    fn default() -> Self {
        Self {
            folder: None,
            source: ContentSource::Blank,
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

/// Trims the name, an empty result becomes [`DEFAULT_FILE_NAME`]
pub fn normalize_file_name<S: AsRef<str>>(raw: S) -> String {
    let trimmed = raw.as_ref().trim();
    if trimmed.is_empty() {
        DEFAULT_FILE_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn target_path(folder: &FolderRef, file_name: &str) -> VaultPath {
    folder.path.note(file_name)
}

pub async fn resolve_content(
    vault: &dyn Vault,
    source: &ContentSource,
) -> Result<String, VaultError> {
    match source {
        ContentSource::Blank => Ok(String::new()),
        ContentSource::Template(template) => vault.read(&template.path).await,
    }
}

/// Every folder the vault has loaded, in the vault's order
pub fn list_folders(vault: &dyn Vault) -> impl Iterator<Item = FolderRef> {
    vault
        .entries()
        .into_iter()
        .filter(|entry| entry.is_directory())
        .map(|entry| FolderRef { path: entry.path })
}

/// Looks up the folder at `path`, `None` when the path is empty
/// or there's no folder there
pub fn resolve_template_folder(vault: &dyn Vault, path: &str) -> Option<FolderRef> {
    if path.trim().is_empty() {
        return None;
    }
    let vault_path = VaultPath::new(path);
    match vault.entry(&vault_path) {
        Some(entry) if entry.is_directory() => Some(FolderRef { path: entry.path }),
        _ => {
            debug!("Template folder {} not found", path);
            None
        }
    }
}

/// The blank choice followed by the notes directly inside `folder`
pub fn list_templates(vault: &dyn Vault, folder: Option<&FolderRef>) -> Vec<TemplateChoice> {
    let mut choices = vec![TemplateChoice::blank()];
    if let Some(folder) = folder {
        choices.extend(
            vault
                .children(&folder.path)
                .into_iter()
                .filter(|entry| entry.is_note())
                .map(|entry| {
                    let template = TemplateFileRef { path: entry.path };
                    TemplateChoice {
                        label: template.basename(),
                        source: ContentSource::Template(template),
                    }
                }),
        );
    }
    choices
}

/// Resolves the content and creates the page, returning its path
pub async fn create_page(
    vault: &dyn Vault,
    folder: Option<&FolderRef>,
    source: &ContentSource,
    file_name: &str,
) -> Result<VaultPath, ValidationError> {
    let folder = folder.ok_or(ValidationError::NoFolderSelected)?;
    let content = resolve_content(vault, source)
        .await
        .map_err(ValidationError::TemplateReadFailed)?;
    let path = target_path(folder, file_name);
    vault
        .create(&path, &content)
        .await
        .map_err(ValidationError::CreateFailed)?;
    Ok(path)
}

pub struct PageCreator {
    vault: Arc<dyn Vault>,
    notifier: Arc<dyn Notifier>,
    template_folder: Option<FolderRef>,
    draft: DraftPage,
    state: DialogState,
}

impl PageCreator {
    pub fn new(
        vault: Arc<dyn Vault>,
        settings: &SettingsHandle,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let template_folder =
            resolve_template_folder(vault.as_ref(), &settings.template_folder_path());
        debug!("[Creator] Opening, template folder: {:?}", template_folder);
        Self {
            vault,
            notifier,
            template_folder,
            draft: DraftPage::default(),
            state: DialogState::Open,
        }
    }

    pub fn list_folders(&self) -> impl Iterator<Item = FolderRef> {
        list_folders(self.vault.as_ref())
    }

    pub fn resolve_template_folder(&self, path: &str) -> Option<FolderRef> {
        resolve_template_folder(self.vault.as_ref(), path)
    }

    pub fn template_folder(&self) -> Option<&FolderRef> {
        self.template_folder.as_ref()
    }

    pub fn list_templates(&self, folder: Option<&FolderRef>) -> Vec<TemplateChoice> {
        list_templates(self.vault.as_ref(), folder)
    }

    /// Templates from the configured folder
    pub fn templates(&self) -> Vec<TemplateChoice> {
        self.list_templates(self.template_folder.as_ref())
    }

    pub fn select_folder(&mut self, folder: Option<FolderRef>) {
        self.draft.folder = folder;
    }

    pub fn select_source(&mut self, source: ContentSource) {
        self.draft.source = source;
    }

    pub fn set_file_name<S: AsRef<str>>(&mut self, raw: S) -> &str {
        self.draft.file_name = normalize_file_name(raw);
        &self.draft.file_name
    }

    pub fn draft(&self) -> &DraftPage {
        &self.draft
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DialogState::Open
    }

    /// Dismisses the dialog, dropping the draft
    pub fn close(&mut self) {
        debug!("[Creator] Closing");
        self.state = DialogState::Closed;
    }

    /// Creates the page from the draft.
    ///
    /// Without a folder the user is told so and the dialog stays open. Any
    /// failure from the vault closes the dialog like a success does.
    pub async fn submit(&mut self) -> Result<VaultPath, ValidationError> {
        if self.state != DialogState::Open {
            return Err(ValidationError::AlreadySubmitted);
        }
        if self.draft.folder.is_none() {
            let error = ValidationError::NoFolderSelected;
            self.notifier.notify(&error.to_string());
            return Err(error);
        }

        self.state = DialogState::Submitting;
        let result = create_page(
            self.vault.as_ref(),
            self.draft.folder.as_ref(),
            &self.draft.source,
            &self.draft.file_name,
        )
        .await;
        self.state = DialogState::Closed;

        match &result {
            Ok(path) => {
                info!("Page created at {}", path);
                self.notifier.notify(&format!("Page created: {}", path));
            }
            Err(e) => {
                error!("Error creating the page: {}", e);
                self.notifier.notify(&e.to_string());
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::{
        path::Path,
        sync::{Arc, Mutex},
    };

    use crate::{
        error::ValidationError,
        nfs::VaultPath,
        notice::Notifier,
        settings::{Settings, SettingsHandle, tests::MemorySettings},
        vault::{FsVault, Vault},
    };

    use super::{
        ContentSource, DialogState, FolderRef, PageCreator, TemplateFileRef, normalize_file_name,
    };

    #[derive(Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    fn workspace() -> tempfile::TempDir {
        let workspace = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(workspace.path().join("Notes")).unwrap();
        std::fs::create_dir_all(workspace.path().join("Templates")).unwrap();
        std::fs::write(workspace.path().join("Templates/Daily.md"), "# Daily\n").unwrap();
        std::fs::write(workspace.path().join("Templates/Weekly.md"), "# Weekly\n").unwrap();
        std::fs::write(workspace.path().join("Templates/logo.png"), "").unwrap();
        workspace
    }

    fn creator(workspace: &Path, template_folder: &str) -> (PageCreator, Arc<RecordingNotifier>) {
        let vault: Arc<dyn Vault> = Arc::new(FsVault::new(workspace).unwrap());
        let stored = Settings {
            template_folder_path: template_folder.to_string(),
        };
        let settings = SettingsHandle::load(Arc::new(MemorySettings::with(stored))).unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        (
            PageCreator::new(vault, &settings, notifier.clone()),
            notifier,
        )
    }

    fn folder(path: &str) -> FolderRef {
        FolderRef {
            path: VaultPath::new(path),
        }
    }

    #[test]
    fn empty_names_become_the_default() {
        assert_eq!("NewPage", normalize_file_name(""));
        assert_eq!("NewPage", normalize_file_name("   \t\n"));
        assert_eq!("my page", normalize_file_name("  my page  "));
        assert_eq!("a/b", normalize_file_name("a/b"));
    }

    #[test]
    fn name_is_normalized_on_every_edit() {
        let workspace = workspace();
        let (mut creator, _) = creator(workspace.path(), "");

        assert_eq!("NewPage", creator.draft().file_name);
        assert_eq!("draft", creator.set_file_name(" draft"));
        assert_eq!("NewPage", creator.set_file_name(" "));
        assert_eq!("NewPage", creator.draft().file_name);
    }

    #[test]
    fn lists_only_folders() {
        let workspace = workspace();
        let (creator, _) = creator(workspace.path(), "");

        let folders: Vec<String> = creator.list_folders().map(|f| f.to_string()).collect();

        assert_eq!(vec!["/", "Notes", "Templates"], folders);
    }

    #[test]
    fn missing_template_folder_offers_only_blank() {
        let workspace = workspace();
        let (creator, _) = creator(workspace.path(), "");

        assert_eq!(None, creator.resolve_template_folder(""));
        assert_eq!(None, creator.resolve_template_folder("Nope"));
        assert_eq!(None, creator.resolve_template_folder("Templates/Daily.md"));

        let templates = creator.list_templates(None);
        assert_eq!(1, templates.len());
        assert_eq!("Blank Page", templates[0].label);
        assert_eq!(ContentSource::Blank, templates[0].source);
        assert_eq!(templates, creator.templates());
    }

    #[test]
    fn templates_are_the_notes_in_the_folder() {
        let workspace = workspace();
        let (creator, _) = creator(workspace.path(), "Templates");

        assert_eq!(Some(&folder("Templates")), creator.template_folder());
        let labels: Vec<String> = creator.templates().into_iter().map(|t| t.label).collect();
        assert_eq!(vec!["Blank Page", "Daily", "Weekly"], labels);
    }

    #[tokio::test]
    async fn blank_page_with_default_name() {
        let workspace = workspace();
        let (mut creator, notifier) = creator(workspace.path(), "");

        creator.select_folder(Some(folder("Notes")));
        creator.set_file_name("");
        let path = creator.submit().await.unwrap();

        assert_eq!("Notes/NewPage.md", path.to_string());
        let text = std::fs::read_to_string(workspace.path().join("Notes/NewPage.md")).unwrap();
        assert_eq!("", text);
        assert_eq!(vec!["Page created: Notes/NewPage.md"], notifier.messages());
        assert_eq!(DialogState::Closed, creator.state());
    }

    #[tokio::test]
    async fn page_from_template() {
        let workspace = workspace();
        let (mut creator, _) = creator(workspace.path(), "Templates");

        let daily = creator
            .templates()
            .into_iter()
            .find(|t| t.label == "Daily")
            .unwrap();
        creator.select_folder(Some(folder("Notes")));
        creator.select_source(daily.source);
        creator.set_file_name("  my page  ");
        let path = creator.submit().await.unwrap();

        assert_eq!("Notes/my page.md", path.to_string());
        let text = std::fs::read_to_string(workspace.path().join("Notes/my page.md")).unwrap();
        assert_eq!("# Daily\n", text);
    }

    #[tokio::test]
    async fn blank_ignores_the_previous_template() {
        let workspace = workspace();
        let (mut creator, _) = creator(workspace.path(), "Templates");

        creator.select_folder(Some(folder("Notes")));
        creator.select_source(ContentSource::Template(TemplateFileRef {
            path: VaultPath::new("Templates/Daily.md"),
        }));
        creator.select_source(ContentSource::Blank);
        creator.submit().await.unwrap();

        let text = std::fs::read_to_string(workspace.path().join("Notes/NewPage.md")).unwrap();
        assert_eq!("", text);
    }

    #[tokio::test]
    async fn no_folder_keeps_the_dialog_open() {
        let workspace = workspace();
        let (mut creator, notifier) = creator(workspace.path(), "");

        let result = creator.submit().await;

        assert!(matches!(result, Err(ValidationError::NoFolderSelected)));
        assert_eq!(vec!["Please select a folder."], notifier.messages());
        assert_eq!(DialogState::Open, creator.state());
        assert!(!workspace.path().join("NewPage.md").exists());
        assert!(!workspace.path().join("Notes/NewPage.md").exists());

        // the user can still fix it
        creator.select_folder(Some(folder("Notes")));
        assert!(creator.submit().await.is_ok());
    }

    #[tokio::test]
    async fn existing_file_fails_and_closes() {
        let workspace = workspace();
        std::fs::write(workspace.path().join("Notes/NewPage.md"), "keep me").unwrap();
        let (mut creator, notifier) = creator(workspace.path(), "");

        creator.select_folder(Some(folder("Notes")));
        let result = creator.submit().await;

        assert!(matches!(result, Err(ValidationError::CreateFailed(_))));
        assert_eq!(DialogState::Closed, creator.state());
        assert_eq!(1, notifier.messages().len());
        let text = std::fs::read_to_string(workspace.path().join("Notes/NewPage.md")).unwrap();
        assert_eq!("keep me", text);
    }

    #[tokio::test]
    async fn missing_template_fails_and_closes() {
        let workspace = workspace();
        let (mut creator, notifier) = creator(workspace.path(), "Templates");

        creator.select_folder(Some(folder("Notes")));
        creator.select_source(ContentSource::Template(TemplateFileRef {
            path: VaultPath::new("Templates/Gone.md"),
        }));
        let result = creator.submit().await;

        assert!(matches!(result, Err(ValidationError::TemplateReadFailed(_))));
        assert_eq!(DialogState::Closed, creator.state());
        assert_eq!(1, notifier.messages().len());
        assert!(!workspace.path().join("Notes/NewPage.md").exists());
    }

    #[tokio::test]
    async fn slash_in_the_name_nests_the_page() {
        let workspace = workspace();
        std::fs::create_dir_all(workspace.path().join("Notes/2024")).unwrap();
        let (mut creator, notifier) = creator(workspace.path(), "");

        creator.select_folder(Some(folder("Notes")));
        creator.set_file_name(" 2024/jan ");
        let path = creator.submit().await.unwrap();

        assert_eq!("Notes/2024/jan.md", path.to_string());
        assert!(workspace.path().join("Notes/2024/jan.md").exists());
        assert_eq!(vec!["Page created: Notes/2024/jan.md"], notifier.messages());
    }

    #[tokio::test]
    async fn slash_into_a_missing_folder_fails() {
        let workspace = workspace();
        let (mut creator, _) = creator(workspace.path(), "");

        creator.select_folder(Some(folder("Notes")));
        creator.set_file_name("2025/jan");
        let result = creator.submit().await;

        assert!(matches!(result, Err(ValidationError::CreateFailed(_))));
        assert_eq!(DialogState::Closed, creator.state());
        assert!(!workspace.path().join("Notes/2025").exists());
    }

    #[tokio::test]
    async fn submits_only_once() {
        let workspace = workspace();
        let (mut creator, _) = creator(workspace.path(), "");

        creator.select_folder(Some(folder("Notes")));
        creator.submit().await.unwrap();
        creator.set_file_name("Other");
        let second = creator.submit().await;

        assert!(matches!(second, Err(ValidationError::AlreadySubmitted)));
        assert!(!workspace.path().join("Notes/Other.md").exists());
    }

    #[tokio::test]
    async fn root_folder_has_no_prefix() {
        let workspace = workspace();
        let (mut creator, notifier) = creator(workspace.path(), "");

        creator.select_folder(Some(folder("/")));
        let path = creator.submit().await.unwrap();

        assert_eq!("NewPage.md", path.to_string());
        assert!(workspace.path().join("NewPage.md").exists());
        assert_eq!(vec!["Page created: NewPage.md"], notifier.messages());
    }

    #[tokio::test]
    async fn created_page_reads_back_the_same() {
        let workspace = workspace();
        let (mut creator, _) = creator(workspace.path(), "Templates");
        let vault = FsVault::new(workspace.path()).unwrap();

        creator.select_folder(Some(folder("Notes")));
        creator.select_source(ContentSource::Template(TemplateFileRef {
            path: VaultPath::new("Templates/Weekly.md"),
        }));
        let path = creator.submit().await.unwrap();

        assert!(vault.entry(&path).is_some_and(|e| e.is_note()));
        assert_eq!("# Weekly\n", vault.read(&path).await.unwrap());
    }
}
