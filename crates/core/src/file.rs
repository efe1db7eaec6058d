//! File domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a file record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// A directory node; never carries content.
    Folder,
    /// A regular file.
    File,
    /// An image file.
    Image,
}

impl FileKind {
    /// Parse from string.
    pub fn parse(s: &str) -> crate::Result<Self> {
        match s {
            "folder" => Ok(Self::Folder),
            "file" => Ok(Self::File),
            "image" => Ok(Self::Image),
            _ => Err(crate::Error::InvalidFileKind(s.to_string())),
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::File => "file",
            Self::Image => "image",
        }
    }

    /// Whether records of this kind carry a blob reference.
    pub fn has_content(&self) -> bool {
        !matches!(self, Self::Folder)
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!(FileKind::parse("folder").unwrap(), FileKind::Folder);
        assert_eq!(FileKind::parse("file").unwrap(), FileKind::File);
        assert_eq!(FileKind::parse("image").unwrap(), FileKind::Image);
        assert!(FileKind::parse("spreadsheet").is_err());
        assert!(FileKind::parse("").is_err());
        assert!(FileKind::parse("Folder").is_err());
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in [FileKind::Folder, FileKind::File, FileKind::Image] {
            assert_eq!(FileKind::parse(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn test_kind_content() {
        assert!(!FileKind::Folder.has_content());
        assert!(FileKind::File.has_content());
        assert!(FileKind::Image.has_content());
    }

    #[test]
    fn test_kind_serde_lowercase() {
        assert_eq!(serde_json::to_string(&FileKind::Image).unwrap(), "\"image\"");
        let kind: FileKind = serde_json::from_str("\"folder\"").unwrap();
        assert_eq!(kind, FileKind::Folder);
    }
}
