// Contains the structs to support the vault file tree
use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use ignore::WalkBuilder;
use log::{debug, warn};
use tokio::io::AsyncWriteExt;

use super::error::FSError;
use super::utilities::path_to_string;

pub const PATH_SEPARATOR: char = '/';
pub const NOTE_EXTENSION: &str = "md";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VaultEntry {
    pub path: VaultPath,
    pub data: EntryData,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryData {
    Note,
    Directory,
    Attachment,
}

impl VaultEntry {
    pub fn new<P: AsRef<Path>>(workspace_path: P, path: VaultPath) -> Result<Self, FSError> {
        let os_path = path.to_pathbuf(&workspace_path)?;
        if !os_path.exists() {
            return Err(FSError::VaultPathNotFound { path });
        }

        let data = if os_path.is_dir() {
            EntryData::Directory
        } else if path.is_note() {
            EntryData::Note
        } else {
            EntryData::Attachment
        };

        Ok(VaultEntry { path, data })
    }

    pub fn from_path<P: AsRef<Path>, F: AsRef<Path>>(
        workspace_path: P,
        full_path: F,
    ) -> Result<Self, FSError> {
        let vault_path = VaultPath::from_path(&workspace_path, &full_path)?;
        Self::new(&workspace_path, vault_path)
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.data, EntryData::Directory)
    }

    pub fn is_note(&self) -> bool {
        matches!(self.data, EntryData::Note)
    }
}

impl Display for VaultEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.data {
            EntryData::Note => write!(f, "[NOT] {}", self.path),
            EntryData::Directory => write!(f, "[DIR] {}", self.path),
            EntryData::Attachment => write!(f, "[ATT] {}", self.path),
        }
    }
}

/// Loads a note from disk, if the file doesn't exist, returns a FSError::VaultPathNotFound
pub(crate) async fn load_note<P: AsRef<Path>>(
    workspace_path: P,
    path: &VaultPath,
) -> Result<String, FSError> {
    let os_path = path.to_pathbuf(&workspace_path)?;
    match tokio::fs::read(&os_path).await {
        Ok(file) => {
            let text = String::from_utf8(file)?;
            Ok(text)
        }
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Err(FSError::VaultPathNotFound {
                path: path.to_owned(),
            }),
            _ => Err(FSError::ReadFileError(e)),
        },
    }
}

/// Writes a new file, never overwriting an existing one.
/// The parent folder must already exist.
pub(crate) async fn create_note<P: AsRef<Path>, S: AsRef<str>>(
    workspace_path: P,
    path: &VaultPath,
    text: S,
) -> Result<(), FSError> {
    if path.is_root() {
        return Err(FSError::InvalidPath {
            path: path.to_string(),
            message: "Can't create a file at the vault root path".to_string(),
        });
    }
    let (parent, _name) = path.get_parent_path();
    let parent_path = parent.to_pathbuf(&workspace_path)?;
    if !parent_path.is_dir() {
        return Err(FSError::FolderNotFound { path: parent });
    }

    let full_path = path.to_pathbuf(&workspace_path)?;
    let mut file = match tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&full_path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(FSError::AlreadyExists {
                path: path.to_owned(),
            });
        }
        Err(e) => return Err(FSError::ReadFileError(e)),
    };
    file.write_all(text.as_ref().as_bytes()).await?;
    file.flush().await?;
    debug!("Created {}", path_to_string(&full_path));

    Ok(())
}

/// Lists every entry under the workspace, the root first and then
/// a depth first walk sorted by file name. Hidden entries are skipped.
pub(crate) fn list_entries<P: AsRef<Path>>(workspace_path: P) -> Vec<VaultEntry> {
    walk(workspace_path, &VaultPath::root(), None)
}

/// Lists the entries directly under `path`, without the folder itself.
pub(crate) fn list_children<P: AsRef<Path>>(
    workspace_path: P,
    path: &VaultPath,
) -> Vec<VaultEntry> {
    walk(workspace_path, path, Some(1))
        .into_iter()
        .filter(|entry| !entry.path.eq(path))
        .collect()
}

fn walk<P: AsRef<Path>>(
    workspace_path: P,
    path: &VaultPath,
    depth: Option<usize>,
) -> Vec<VaultEntry> {
    let workspace_path = workspace_path.as_ref();
    let start = match path.to_pathbuf(workspace_path) {
        Ok(start) => start,
        Err(e) => {
            warn!("Can't walk {}: {}", path, e);
            return vec![];
        }
    };

    let walker = WalkBuilder::new(start)
        .standard_filters(false)
        .max_depth(depth)
        .filter_entry(filter_files)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut entries = vec![];
    for result in walker {
        match result {
            Ok(dir_entry) => match VaultEntry::from_path(workspace_path, dir_entry.path()) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping {}: {}", path_to_string(dir_entry.path()), e),
            },
            Err(e) => warn!("Error walking the vault: {}", e),
        }
    }
    entries
}

fn filter_files(entry: &ignore::DirEntry) -> bool {
    entry.depth() == 0 || !entry.file_name().to_string_lossy().starts_with('.')
}

/// A slash delimited path relative to the vault root.
/// No character is escaped or replaced, the root is displayed as `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VaultPath {
    slices: Vec<String>,
}

impl VaultPath {
    pub fn new<S: AsRef<str>>(path: S) -> Self {
        let slices = path
            .as_ref()
            .split(PATH_SEPARATOR)
            // `//` are treated as `/`
            .filter(|p| !p.is_empty())
            .map(|p| p.to_string())
            .collect();
        Self { slices }
    }

    pub fn root() -> Self {
        Self { slices: vec![] }
    }

    pub fn is_root(&self) -> bool {
        self.slices.is_empty()
    }

    /// Path of the note named `name` inside this path. The extension is
    /// always appended, and any separator in `name` creates more levels.
    pub fn note(&self, name: &str) -> VaultPath {
        self.append(&VaultPath::new(format!("{}.{}", name, NOTE_EXTENSION)))
    }

    pub fn append(&self, path: &VaultPath) -> VaultPath {
        let mut slices = self.slices.clone();
        slices.extend(path.slices.iter().cloned());
        VaultPath { slices }
    }

    pub fn get_parent_path(&self) -> (VaultPath, String) {
        let mut slices = self.slices.clone();
        let current = slices.pop().unwrap_or_default();
        (VaultPath { slices }, current)
    }

    /// Returns the last part of the path, the file name for a note
    pub fn get_name(&self) -> String {
        self.slices.last().cloned().unwrap_or_default()
    }

    /// File name without the extension
    pub fn get_clean_name(&self) -> String {
        let name = self.get_name();
        match name.rsplit_once('.') {
            Some((stem, _ext)) if !stem.is_empty() => stem.to_string(),
            _ => name,
        }
    }

    pub fn extension(&self) -> Option<&str> {
        let name = self.slices.last()?;
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => Some(ext),
            _ => None,
        }
    }

    pub fn is_note(&self) -> bool {
        self.extension().is_some_and(|ext| ext == NOTE_EXTENSION)
    }

    /// Maps the path to the OS, refusing slices that would step
    /// out of the workspace
    pub(crate) fn to_pathbuf<P: AsRef<Path>>(&self, workspace_path: P) -> Result<PathBuf, FSError> {
        let mut path = workspace_path.as_ref().to_path_buf();
        for slice in &self.slices {
            if slice == "." || slice == ".." || is_os_separator(slice) {
                return Err(FSError::InvalidPath {
                    path: self.to_string(),
                    message: format!("`{}` is not allowed in a vault path", slice),
                });
            }
            path = path.join(slice);
        }
        Ok(path)
    }

    pub fn from_path<P: AsRef<Path>, F: AsRef<Path>>(
        workspace_path: P,
        full_path: F,
    ) -> Result<Self, FSError> {
        let relative = full_path
            .as_ref()
            .strip_prefix(&workspace_path)
            .map_err(|_e| FSError::InvalidPath {
                path: path_to_string(&full_path),
                message: format!(
                    "The path provided is not a path belonging to the workspace: {}",
                    path_to_string(&workspace_path)
                ),
            })?;
        let slices = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy().to_string())
            .collect();
        Ok(VaultPath { slices })
    }
}

// `\` is a plain character in a file name outside Windows
#[cfg(windows)]
fn is_os_separator(slice: &str) -> bool {
    slice.contains('\\')
}

#[cfg(not(windows))]
fn is_os_separator(_slice: &str) -> bool {
    false
}

impl Display for VaultPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            write!(f, "{}", PATH_SEPARATOR)
        } else {
            write!(f, "{}", self.slices.join(&PATH_SEPARATOR.to_string()))
        }
    }
}
