use crate::config::ResolutionConfig;
use crate::metadata::{FileCategory, FileEntry};
use anyhow::{Context, Result};
use std::path::Path;
use walkdir::WalkDir;

/// Lists the files under `root` that belong to a supported category, sorted
/// by path. Only the top level is read unless `include_subfolders` is set.
pub fn discover_files(root: &Path, config: &ResolutionConfig) -> Result<Vec<FileEntry>> {
    if !root.is_dir() {
        anyhow::bail!("directory does not exist: {}", root.display());
    }

    let max_depth = if config.include_subfolders {
        usize::MAX
    } else {
        1
    };

    let mut out = Vec::new();
    for entry in WalkDir::new(root).max_depth(max_depth).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        let category = config.categorize(&path);
        if category == FileCategory::Unsupported {
            continue;
        }
        out.push(FileEntry::new(path, category));
    }

    out.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("parent dirs must be creatable");
        }
        File::create(path).expect("file must be creatable");
    }

    fn names(entries: &[FileEntry]) -> Vec<String> {
        entries.iter().map(FileEntry::file_name).collect()
    }

    #[test]
    fn top_level_only_by_default() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("b.JPG"));
        touch(&temp.path().join("a.mp4"));
        touch(&temp.path().join("notes.txt"));
        touch(&temp.path().join("day1/c.jpg"));

        let entries = discover_files(temp.path(), &ResolutionConfig::default()).expect("scan");
        assert_eq!(names(&entries), vec!["a.mp4", "b.JPG"]);
        assert_eq!(entries[0].category, FileCategory::Video);
        assert_eq!(entries[1].category, FileCategory::Image);
    }

    #[test]
    fn recursion_and_documents_are_opt_in() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("a.jpg"));
        touch(&temp.path().join("day1/scan.pdf"));
        touch(&temp.path().join("day1/deeper/c.mov"));

        let mut config = ResolutionConfig::default();
        config.include_subfolders = true;
        let entries = discover_files(temp.path(), &config).expect("scan");
        assert_eq!(names(&entries), vec!["a.jpg", "c.mov"]);

        config.include_text = true;
        let entries = discover_files(temp.path(), &config).expect("scan");
        assert_eq!(names(&entries), vec!["a.jpg", "c.mov", "scan.pdf"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let temp = tempdir().expect("tempdir");
        let err = discover_files(&temp.path().join("nope"), &ResolutionConfig::default())
            .expect_err("must fail");
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn directories_with_media_extensions_are_ignored() {
        let temp = tempdir().expect("tempdir");
        fs::create_dir_all(temp.path().join("album.jpg")).expect("dir");
        let entries = discover_files(temp.path(), &ResolutionConfig::default()).expect("scan");
        assert!(entries.is_empty());
    }
}
