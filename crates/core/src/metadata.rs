use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileCategory {
    Image,
    Video,
    Document,
    Unsupported,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DateSource {
    Metadata,
    FilenameHeuristic,
}

/// A discovered file. Built once during discovery and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    /// Extension without the leading dot, as found on disk.
    pub extension: String,
    pub category: FileCategory,
}

impl FileEntry {
    pub fn new(path: PathBuf, category: FileCategory) -> Self {
        let extension = path
            .extension()
            .map(|v| v.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            path,
            extension,
            category,
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|v| v.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn stem(&self) -> String {
        file_stem(&self.path)
    }

    pub fn extension_with_dot(&self) -> String {
        if self.extension.is_empty() {
            String::new()
        } else {
            format!(".{}", self.extension)
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateCandidate {
    pub timestamp: DateTime<Local>,
    pub source: DateSource,
}

impl DateCandidate {
    pub fn from_metadata(timestamp: DateTime<Local>) -> Self {
        Self {
            timestamp,
            source: DateSource::Metadata,
        }
    }

    pub fn from_filename(timestamp: DateTime<Local>) -> Self {
        Self {
            timestamp,
            source: DateSource::FilenameHeuristic,
        }
    }
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{FileCategory, FileEntry};
    use std::path::PathBuf;

    #[test]
    fn entry_splits_stem_and_extension() {
        let entry = FileEntry::new(
            PathBuf::from("/photos/IMG_230405_100000.JPG"),
            FileCategory::Image,
        );
        assert_eq!(entry.stem(), "IMG_230405_100000");
        assert_eq!(entry.extension, "JPG");
        assert_eq!(entry.extension_with_dot(), ".JPG");
        assert_eq!(entry.file_name(), "IMG_230405_100000.JPG");
    }

    #[test]
    fn entry_without_extension_has_empty_suffix() {
        let entry = FileEntry::new(PathBuf::from("/photos/README"), FileCategory::Unsupported);
        assert_eq!(entry.extension, "");
        assert_eq!(entry.extension_with_dot(), "");
    }
}
