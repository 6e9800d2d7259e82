use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Canonical absolute path to the git status of that file.
pub type StatusMap = HashMap<PathBuf, GitStatus>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitStatus {
    Modified,
    Added,
    Deleted,
    Renamed,
    Copied,
    Conflicted,
    /// Porcelain code with no dedicated variant, passed through verbatim.
    Other(String),
}

const UNMERGED_CODES: &[&str] = &["DD", "AU", "UD", "UA", "DU", "AA", "UU"];

impl GitStatus {
    /// Classifies a two-character `XY` porcelain code.
    pub fn from_porcelain_code(code: &str) -> Self {
        if code == "??" {
            return Self::Added;
        }
        if UNMERGED_CODES.contains(&code) {
            return Self::Conflicted;
        }

        let has = |c: char| code.contains(c);
        if has('D') {
            Self::Deleted
        } else if has('R') {
            Self::Renamed
        } else if has('C') {
            Self::Copied
        } else if has('A') {
            Self::Added
        } else if has('M') || has('T') {
            Self::Modified
        } else {
            Self::Other(code.trim().to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Modified => "modified",
            Self::Added => "added",
            Self::Deleted => "deleted",
            Self::Renamed => "renamed",
            Self::Copied => "copied",
            Self::Conflicted => "conflicted",
            Self::Other(code) => code,
        }
    }
}

impl std::fmt::Display for GitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for GitStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "modified" => Self::Modified,
            "added" => Self::Added,
            "deleted" => Self::Deleted,
            "renamed" => Self::Renamed,
            "copied" => Self::Copied,
            "conflicted" => Self::Conflicted,
            other => Self::Other(other.to_string()),
        })
    }
}

impl Serialize for GitStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for GitStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_else(|never| match never {}))
    }
}
