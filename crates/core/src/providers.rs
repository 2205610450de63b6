use crate::exif_reader::read_exif_date;
use crate::metadata::{FileCategory, FileEntry};
use crate::pdf_reader::read_pdf_creation_date;
use crate::video_reader::read_video_date;
use anyhow::Result;
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::path::Path;

/// A backend that knows how to pull an embedded timestamp out of one kind of
/// file. `Ok(None)` means the file simply carries no date.
pub trait DateProvider: Send + Sync {
    fn name(&self) -> &'static str;
    fn read_date(&self, path: &Path) -> Result<Option<DateTime<Local>>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ImageProvider;

impl DateProvider for ImageProvider {
    fn name(&self) -> &'static str {
        "exif"
    }

    fn read_date(&self, path: &Path) -> Result<Option<DateTime<Local>>> {
        read_exif_date(path)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct VideoProvider;

impl DateProvider for VideoProvider {
    fn name(&self) -> &'static str {
        "video"
    }

    fn read_date(&self, path: &Path) -> Result<Option<DateTime<Local>>> {
        read_video_date(path)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentProvider;

impl DateProvider for DocumentProvider {
    fn name(&self) -> &'static str {
        "pdf-info"
    }

    fn read_date(&self, path: &Path) -> Result<Option<DateTime<Local>>> {
        read_pdf_creation_date(path)
    }
}

/// Category → provider lookup. Exactly one provider answers for a file.
pub struct MetadataProviderRegistry {
    providers: HashMap<FileCategory, Box<dyn DateProvider>>,
}

impl MetadataProviderRegistry {
    pub fn empty() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(FileCategory::Image, Box::new(ImageProvider));
        registry.register(FileCategory::Video, Box::new(VideoProvider));
        registry.register(FileCategory::Document, Box::new(DocumentProvider));
        registry
    }

    /// Replaces any provider already installed for `category`.
    pub fn register(&mut self, category: FileCategory, provider: Box<dyn DateProvider>) {
        self.providers.insert(category, provider);
    }

    /// Never fails: read errors are logged and reported as "no date".
    pub fn resolve(&self, entry: &FileEntry) -> Option<DateTime<Local>> {
        let provider = self.providers.get(&entry.category)?;
        match provider.read_date(&entry.path) {
            Ok(Some(date)) => Some(date),
            Ok(None) => {
                log::debug!("{}: no date in {}", provider.name(), entry.path.display());
                None
            }
            Err(err) => {
                log::debug!("{}: {:#}", provider.name(), err);
                None
            }
        }
    }
}

impl Default for MetadataProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::DateProvider;
    use anyhow::{bail, Result};
    use chrono::{DateTime, Local};
    use std::collections::HashMap;
    use std::path::Path;

    /// Answers from a table keyed by file name; unknown names are an error.
    #[derive(Default)]
    pub struct FixedProvider {
        pub dates: HashMap<String, Option<DateTime<Local>>>,
    }

    impl FixedProvider {
        pub fn with(mut self, file_name: &str, date: Option<DateTime<Local>>) -> Self {
            self.dates.insert(file_name.to_string(), date);
            self
        }
    }

    impl DateProvider for FixedProvider {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn read_date(&self, path: &Path) -> Result<Option<DateTime<Local>>> {
            let name = path
                .file_name()
                .map(|v| v.to_string_lossy().to_string())
                .unwrap_or_default();
            match self.dates.get(&name) {
                Some(date) => Ok(*date),
                None => bail!("unreadable: {name}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FixedProvider;
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn sample() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2022, 1, 2, 10, 0, 0)
            .single()
            .expect("unambiguous local time")
    }

    fn entry(name: &str, category: FileCategory) -> FileEntry {
        FileEntry::new(PathBuf::from("/virtual").join(name), category)
    }

    #[test]
    fn dispatches_by_category() {
        let mut registry = MetadataProviderRegistry::empty();
        registry.register(
            FileCategory::Image,
            Box::new(FixedProvider::default().with("a.jpg", Some(sample()))),
        );

        assert_eq!(registry.resolve(&entry("a.jpg", FileCategory::Image)), Some(sample()));
        // same file name, but no provider for the video category
        assert_eq!(registry.resolve(&entry("a.jpg", FileCategory::Video)), None);
    }

    #[test]
    fn provider_errors_become_no_date() {
        let mut registry = MetadataProviderRegistry::empty();
        registry.register(FileCategory::Image, Box::new(FixedProvider::default()));
        assert_eq!(registry.resolve(&entry("corrupt.jpg", FileCategory::Image)), None);
    }

    #[test]
    fn unsupported_category_has_no_provider() {
        let registry = MetadataProviderRegistry::with_defaults();
        assert_eq!(registry.resolve(&entry("x.bin", FileCategory::Unsupported)), None);
    }

    #[test]
    fn default_providers_swallow_unreadable_files() {
        let temp = tempdir().expect("tempdir");
        let registry = MetadataProviderRegistry::with_defaults();
        for (name, category) in [
            ("broken.jpg", FileCategory::Image),
            ("broken.mp4", FileCategory::Video),
            ("broken.pdf", FileCategory::Document),
        ] {
            let path = temp.path().join(name);
            fs::write(&path, b"garbage").expect("write");
            let entry = FileEntry::new(path, category);
            assert_eq!(registry.resolve(&entry), None, "{name}");
        }
    }
}
