use crate::config::ResolutionConfig;
use crate::date_format::EffectiveDateFormat;
use crate::filename_date::{filename_timestamp, has_iso_date_prefix};
use crate::metadata::{DateCandidate, DateSource, FileCategory, FileEntry};
use crate::providers::MetadataProviderRegistry;
use crate::sanitize::{sanitize_date_part, sanitize_stem};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenameSuggestion {
    pub original_path: PathBuf,
    pub formatted_date: Option<String>,
    pub base_name: Option<String>,
    /// Original extension including the dot, or empty.
    pub extension: String,
    pub date_source: Option<DateSource>,
}

impl RenameSuggestion {
    /// New file stem: date first, then name, joined with `_`.
    pub fn stem(&self) -> String {
        let date = self.formatted_date.as_deref().map(sanitize_date_part);
        let joined = build_stem(date.as_deref(), self.base_name.as_deref()).unwrap_or_default();
        sanitize_stem(&joined)
    }

    pub fn display_name(&self) -> String {
        format!("{}{}", self.stem(), self.extension)
    }

    pub fn directory(&self) -> &Path {
        self.original_path.parent().unwrap_or_else(|| Path::new("."))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RenameStats {
    pub discovered: usize,
    pub skipped_existing: usize,
    pub dated_by_metadata: usize,
    pub dated_by_filename: usize,
    pub dropped: usize,
    pub suggested: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamePlan {
    pub date_format: String,
    pub format_warning: Option<String>,
    pub suggestions: Vec<RenameSuggestion>,
    pub stats: RenameStats,
}

impl RenamePlan {
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }
}

/// Terminal state of one file in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileResolution {
    /// Already starts with an ISO date and `rename_existing` is off.
    Skipped,
    /// Neither a date nor a name to keep.
    Dropped,
    Suggested(RenameSuggestion),
}

/// Joins the parts that are present. `None` when both are missing.
pub fn build_stem(formatted_date: Option<&str>, base_name: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = [formatted_date, base_name].into_iter().flatten().collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("_"))
    }
}

/// Metadata first, filename heuristic second; the first hit wins.
pub fn resolve_date(
    entry: &FileEntry,
    config: &ResolutionConfig,
    registry: &MetadataProviderRegistry,
) -> Option<DateCandidate> {
    if let Some(date) = registry.resolve(entry) {
        return Some(DateCandidate::from_metadata(date));
    }
    filename_timestamp(&entry.stem(), &config.dcim_prefixes).map(DateCandidate::from_filename)
}

pub fn resolve_entry(
    entry: &FileEntry,
    config: &ResolutionConfig,
    registry: &MetadataProviderRegistry,
    format: &EffectiveDateFormat,
) -> FileResolution {
    if !config.rename_existing && has_iso_date_prefix(&entry.file_name()) {
        return FileResolution::Skipped;
    }

    let candidate = resolve_date(entry, config, registry);

    let mut base_name = if config.keep_name || entry.category == FileCategory::Document {
        Some(entry.stem())
    } else {
        None
    };
    if candidate.is_some() {
        if let Some(new_name) = config.new_name.as_ref() {
            base_name = Some(new_name.clone());
        }
    }

    let formatted_date = candidate.map(|c| format.format(&c.timestamp));
    if formatted_date.is_none() && base_name.is_none() {
        return FileResolution::Dropped;
    }

    FileResolution::Suggested(RenameSuggestion {
        original_path: entry.path.clone(),
        formatted_date,
        base_name,
        extension: entry.extension_with_dot(),
        date_source: candidate.map(|c| c.source),
    })
}

/// Runs every entry through the pipeline. Metadata reads happen in parallel;
/// suggestion order follows `entries`.
pub fn generate_plan(
    entries: &[FileEntry],
    config: &ResolutionConfig,
    registry: &MetadataProviderRegistry,
) -> RenamePlan {
    let format = EffectiveDateFormat::resolve(&config.date_format);
    let format_warning = format.rejected.as_ref().map(|err| {
        log::warn!("{err} Falling back to {}", format.pattern);
        err.to_string()
    });

    let resolutions: Vec<FileResolution> = entries
        .par_iter()
        .map(|entry| resolve_entry(entry, config, registry, &format))
        .collect();

    let mut stats = RenameStats {
        discovered: entries.len(),
        ..RenameStats::default()
    };
    let mut suggestions = Vec::new();
    for resolution in resolutions {
        match resolution {
            FileResolution::Skipped => stats.skipped_existing += 1,
            FileResolution::Dropped => stats.dropped += 1,
            FileResolution::Suggested(suggestion) => {
                match suggestion.date_source {
                    Some(DateSource::Metadata) => stats.dated_by_metadata += 1,
                    Some(DateSource::FilenameHeuristic) => stats.dated_by_filename += 1,
                    None => {}
                }
                stats.suggested += 1;
                suggestions.push(suggestion);
            }
        }
    }

    RenamePlan {
        date_format: format.pattern,
        format_warning,
        suggestions,
        stats,
    }
}
