use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub enum FileType {
    #[default]
    #[serde(rename = "file")]
    Document,
    #[serde(rename = "folder")]
    Folder,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Which listing a file currently belongs to. The bin is the soft-delete
/// holding area files pass through before permanent deletion.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum FileLocation {
    Drive,
    Bin,
}

impl FileLocation {
    pub fn is_bin(&self) -> bool {
        *self == FileLocation::Bin
    }
}

impl FromStr for FileLocation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drive" => Ok(FileLocation::Drive),
            "bin" => Ok(FileLocation::Bin),
            _ => Err(()),
        }
    }
}

impl fmt::Display for FileLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FileLocation::Drive => write!(f, "drive"),
            FileLocation::Bin => write!(f, "bin"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct FileItem {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type", default)]
    pub file_type: FileType,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_bin: bool,
}

impl FileItem {
    pub fn is_document(&self) -> bool {
        self.file_type == FileType::Document
    }

    pub fn is_folder(&self) -> bool {
        self.file_type == FileType::Folder
    }

    pub fn location(&self) -> FileLocation {
        if self.is_bin { FileLocation::Bin } else { FileLocation::Drive }
    }
}
