use serde::{Deserialize, Serialize};

use crate::models::git_status::GitStatus;

/// A node in a directory listing. Serialized with a `type` tag of
/// `"file"` or `"folder"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entry {
    File {
        name: String,
        path: String,
        git_status: Option<GitStatus>,
    },
    Folder {
        name: String,
        path: String,
        children: Children,
    },
}

/// Lazy listings only mark a folder as expandable; eager walks embed the
/// subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Children {
    Expandable(bool),
    Nested(Vec<Entry>),
}

impl Entry {
    pub fn file(name: String, path: String, git_status: Option<GitStatus>) -> Self {
        Self::File {
            name,
            path,
            git_status,
        }
    }

    pub fn lazy_folder(name: String, path: String) -> Self {
        Self::Folder {
            name,
            path,
            children: Children::Expandable(true),
        }
    }

    #[cfg(test)]
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Folder { name, .. } => name,
        }
    }

    #[cfg(test)]
    pub fn path(&self) -> &str {
        match self {
            Self::File { path, .. } | Self::Folder { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    pub name: String,
    pub path: String,
}
