use crate::planner::{RenamePlan, RenameSuggestion};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use thiserror::Error;

pub const MAX_COLLISION_ATTEMPTS: usize = 10_000;

#[derive(Debug, Error)]
pub enum RenameError {
    #[error("{} could not be renamed to {}: {source}", .from.display(), .to.display())]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no free name for {} after {attempts} attempts", .path.display())]
    CollisionExhausted { path: PathBuf, attempts: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenameOperation {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenameFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RenameReport {
    pub attempted: usize,
    pub renamed: Vec<RenameOperation>,
    pub unchanged: usize,
    pub failures: Vec<RenameFailure>,
}

impl RenameReport {
    /// Suggestions attempted minus failures.
    pub fn renamed_count(&self) -> usize {
        self.attempted.saturating_sub(self.failures.len())
    }
}

pub fn present_suggestions<W: Write>(plan: &RenamePlan, out: &mut W) -> io::Result<()> {
    writeln!(out, "RENAMING SUGGESTIONS")?;
    for suggestion in &plan.suggestions {
        let origin = suggestion.original_path.display().to_string();
        writeln!(
            out,
            "{:50} --> ..{}{}",
            origin,
            MAIN_SEPARATOR,
            suggestion.display_name()
        )?;
    }
    Ok(())
}

/// Asks once for the whole batch. Only `y` / `yes` (any case) accept; end of
/// input declines.
pub fn confirm_batch<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<bool> {
    write!(out, "Rename to suggestions? (y/n) ").context("failed to write prompt")?;
    out.flush().context("failed to flush prompt")?;

    let mut answer = String::new();
    let read = input
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    if read == 0 {
        return Ok(false);
    }

    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Shows the plan, asks once, then renames. Declining renames nothing.
pub fn execute_plan<R: BufRead, W: Write>(
    plan: &RenamePlan,
    input: &mut R,
    out: &mut W,
) -> Result<RenameReport> {
    present_suggestions(plan, out).context("failed to print suggestions")?;
    if !confirm_batch(input, out)? {
        return Ok(RenameReport::default());
    }
    Ok(apply_suggestions(&plan.suggestions))
}

/// Renames each suggestion independently; a failure is recorded and the
/// remaining files are still processed.
pub fn apply_suggestions(suggestions: &[RenameSuggestion]) -> RenameReport {
    let mut report = RenameReport::default();

    for suggestion in suggestions {
        report.attempted += 1;
        match apply_one(suggestion) {
            Ok(Some(operation)) => {
                log::info!(
                    "renamed {} -> {}",
                    operation.from.display(),
                    operation.to.display()
                );
                report.renamed.push(operation);
            }
            Ok(None) => report.unchanged += 1,
            Err(err) => {
                log::warn!("{err}");
                report.failures.push(RenameFailure {
                    path: suggestion.original_path.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    report
}

fn apply_one(suggestion: &RenameSuggestion) -> Result<Option<RenameOperation>, RenameError> {
    let from = &suggestion.original_path;
    let target = unique_target_path(
        suggestion.directory(),
        &suggestion.stem(),
        &suggestion.extension,
        from,
    )?;

    if &target == from {
        return Ok(None);
    }

    fs::rename(from, &target).map_err(|source| RenameError::Io {
        from: from.clone(),
        to: target.clone(),
        source,
    })?;

    Ok(Some(RenameOperation {
        from: from.clone(),
        to: target,
    }))
}

/// `dir/stem.ext`, or the first free `dir/stem_N.ext` for N = 1, 2, ...
/// A target equal to `original` counts as free: the file already has that name.
pub fn unique_target_path(
    dir: &Path,
    stem: &str,
    extension: &str,
    original: &Path,
) -> Result<PathBuf, RenameError> {
    find_free_path(dir, stem, extension, original, MAX_COLLISION_ATTEMPTS)
}

fn find_free_path(
    dir: &Path,
    stem: &str,
    extension: &str,
    original: &Path,
    max_attempts: usize,
) -> Result<PathBuf, RenameError> {
    let candidate = dir.join(format!("{stem}{extension}"));
    if is_available(&candidate, original) {
        return Ok(candidate);
    }

    for n in 1..=max_attempts {
        let candidate = dir.join(format!("{stem}_{n}{extension}"));
        if is_available(&candidate, original) {
            return Ok(candidate);
        }
    }

    Err(RenameError::CollisionExhausted {
        path: dir.join(format!("{stem}{extension}")),
        attempts: max_attempts,
    })
}

fn is_available(candidate: &Path, original: &Path) -> bool {
    candidate == original || !candidate.exists()
}
