use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, info};

use crate::{
    error::VaultError,
    nfs::{self, VaultEntry, VaultPath},
    utilities::path_to_string,
};

/// What the page creation needs from the place notes live in.
///
/// Enumeration and lookups work on the tree as currently loaded, and never fail:
/// anything that can't be read is left out. Reading and creating files go
/// through the file system and may suspend.
#[async_trait]
pub trait Vault: Send + Sync {
    /// Every entry in the vault, folders and files
    fn entries(&self) -> Vec<VaultEntry>;

    fn entry(&self, path: &VaultPath) -> Option<VaultEntry>;

    /// Entries directly inside the folder at `path`
    fn children(&self, path: &VaultPath) -> Vec<VaultEntry>;

    async fn read(&self, path: &VaultPath) -> Result<String, VaultError>;

    /// Creates a new file with `text`, failing if something already exists at `path`
    async fn create(&self, path: &VaultPath, text: &str) -> Result<VaultEntry, VaultError>;
}

/// A vault backed by a directory on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsVault {
    workspace_path: PathBuf,
}

impl FsVault {
    pub fn new<P: AsRef<Path>>(workspace_path: P) -> Result<Self, VaultError> {
        let path = workspace_path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(VaultError::PathNotFound {
                path: path_to_string(path),
            });
        }
        if !path.is_dir() {
            return Err(VaultError::PathIsNotDirectory {
                path: path_to_string(path),
            });
        };
        info!("Opening vault at {}", path_to_string(&path));
        Ok(Self {
            workspace_path: path,
        })
    }
}

#[async_trait]
impl Vault for FsVault {
    fn entries(&self) -> Vec<VaultEntry> {
        let start = std::time::Instant::now();
        let entries = nfs::list_entries(&self.workspace_path);
        debug!(
            "> {} entries listed in {} milliseconds",
            entries.len(),
            start.elapsed().as_millis()
        );
        entries
    }

    fn entry(&self, path: &VaultPath) -> Option<VaultEntry> {
        VaultEntry::new(&self.workspace_path, path.to_owned()).ok()
    }

    fn children(&self, path: &VaultPath) -> Vec<VaultEntry> {
        nfs::list_children(&self.workspace_path, path)
    }

    async fn read(&self, path: &VaultPath) -> Result<String, VaultError> {
        let text = nfs::load_note(&self.workspace_path, path).await?;
        Ok(text)
    }

    async fn create(&self, path: &VaultPath, text: &str) -> Result<VaultEntry, VaultError> {
        nfs::create_note(&self.workspace_path, path, text).await?;
        let entry = VaultEntry::new(&self.workspace_path, path.to_owned())?;
        Ok(entry)
    }
}
