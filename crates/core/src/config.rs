use crate::metadata::FileCategory;
use crate::{DEFAULT_DATE_FORMAT, DEFAULT_DCIM_PREFIXES};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "raw", "nef", "bmp", "webp", "svg", "tif", "tiff",
];
const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &["mov", "mp4", "webm", "flv"];
const DEFAULT_DOCUMENT_EXTENSIONS: &[&str] = &["pdf"];

/// Persistent defaults read from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub date_format: String,
    pub image_extensions: Vec<String>,
    pub video_extensions: Vec<String>,
    pub document_extensions: Vec<String>,
    pub dcim_prefixes: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            image_extensions: to_strings(DEFAULT_IMAGE_EXTENSIONS),
            video_extensions: to_strings(DEFAULT_VIDEO_EXTENSIONS),
            document_extensions: to_strings(DEFAULT_DOCUMENT_EXTENSIONS),
            dcim_prefixes: to_strings(DEFAULT_DCIM_PREFIXES),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub config_path: PathBuf,
}

pub fn app_paths() -> Result<AppPaths> {
    let proj = ProjectDirs::from("com", "filedater", "filedater")
        .context("could not determine the standard config directory")?;
    let config_dir = proj.config_dir().to_path_buf();
    Ok(AppPaths {
        config_path: config_dir.join("config.toml"),
        config_dir,
    })
}

pub fn load_config() -> Result<AppConfig> {
    let paths = app_paths()?;
    load_config_from(&paths.config_path)
}

/// A missing file yields the built-in defaults; a present but broken one is an error.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read config file: {}", path.display()))?;
    let config = toml::from_str::<AppConfig>(&raw)
        .with_context(|| format!("could not parse config file: {}", path.display()))?;
    Ok(config)
}

/// Everything a run needs to know, passed by reference to each stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionConfig {
    /// Lower-case extensions (no dot) per category.
    pub extensions: BTreeMap<FileCategory, Vec<String>>,
    /// Upper-case, four characters each.
    pub dcim_prefixes: Vec<String>,
    pub date_format: String,
    pub keep_name: bool,
    pub rename_existing: bool,
    pub include_subfolders: bool,
    pub new_name: Option<String>,
    pub include_text: bool,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

impl ResolutionConfig {
    pub fn from_app_config(app: &AppConfig) -> Self {
        let mut extensions = BTreeMap::new();
        extensions.insert(FileCategory::Image, normalize_extensions(&app.image_extensions));
        extensions.insert(FileCategory::Video, normalize_extensions(&app.video_extensions));
        extensions.insert(
            FileCategory::Document,
            normalize_extensions(&app.document_extensions),
        );

        let dcim_prefixes = app
            .dcim_prefixes
            .iter()
            .map(|p| p.trim().to_uppercase())
            .filter(|p| p.chars().count() == 4)
            .collect();

        Self {
            extensions,
            dcim_prefixes,
            date_format: app.date_format.clone(),
            keep_name: false,
            rename_existing: false,
            include_subfolders: false,
            new_name: None,
            include_text: false,
        }
    }

    pub fn with_new_name(mut self, new_name: Option<String>) -> Self {
        self.new_name = new_name
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        self
    }

    /// Documents are only recognised when `include_text` is set.
    pub fn categorize(&self, path: &Path) -> FileCategory {
        let Some(ext) = path.extension().map(|v| v.to_string_lossy().to_lowercase()) else {
            return FileCategory::Unsupported;
        };

        for (category, list) in &self.extensions {
            if *category == FileCategory::Document && !self.include_text {
                continue;
            }
            if list.iter().any(|candidate| candidate == &ext) {
                return *category;
            }
        }

        FileCategory::Unsupported
    }
}

fn normalize_extensions(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().trim_start_matches('.').to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
