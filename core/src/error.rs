use thiserror::Error;

use crate::nfs::VaultPath;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Path {path:?} doesn't exist")]
    PathNotFound { path: String },
    #[error("Path {path:?} is not a directory")]
    PathIsNotDirectory { path: String },
    #[error("File System Error: {0}")]
    FSError(#[from] FSError),
}

#[derive(Error, Debug)]
pub enum FSError {
    #[error("No note found at {path}")]
    VaultPathNotFound { path: VaultPath },
    #[error("A file already exists at {path}")]
    AlreadyExists { path: VaultPath },
    #[error("Folder {path} doesn't exist")]
    FolderNotFound { path: VaultPath },
    #[error("Invalid path {path:?}: {message}")]
    InvalidPath { path: String, message: String },
    #[error("IO Error: {0}")]
    ReadFileError(#[from] std::io::Error),
    #[error("Decoding Error: {0}")]
    EncodingError(#[from] std::string::FromUtf8Error),
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Config directory not found")]
    ConfigDirNotFound,
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error reading settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Error writing settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Reasons a page submission doesn't end with a new file.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Please select a folder.")]
    NoFolderSelected,
    #[error("The page was already submitted")]
    AlreadySubmitted,
    #[error("Couldn't read the template: {0}")]
    TemplateReadFailed(#[source] VaultError),
    #[error("Couldn't create the page: {0}")]
    CreateFailed(#[source] VaultError),
}
