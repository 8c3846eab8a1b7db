//! Destination names, batch validation and the rename itself.
//!
//! The whole plan is computed and checked for intra-batch collisions before
//! any file is moved. Renames then run one at a time; a failed item is
//! recorded and the batch carries on.

use indicatif::ProgressBar;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::RenameError;
use crate::normalize::title_case;
use crate::scanner::EpisodeFile;

pub fn season_episode_tag(season: u32, number: u32) -> String {
    format!("S{:02}E{:04}", season, number)
}

pub fn final_filename(show: &str, season: u32, number: u32, canonical_title: &str, extension: &str) -> String {
    format!(
        "{} {} {}.{}",
        show,
        season_episode_tag(season, number),
        title_case(canonical_title),
        extension
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRename {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub final_filename: String,
    pub number: u32,
}

#[derive(Debug, Default)]
pub struct RenamePlan {
    pub items: Vec<PlannedRename>,
    /// Items whose destination is already taken by an earlier item.
    pub rejected: Vec<(PlannedRename, RenameError)>,
}

impl RenamePlan {
    pub fn len(&self) -> usize {
        self.items.len() + self.rejected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds one rename per matched file. Unmatched files are not planned.
pub fn plan_renames(files: &[EpisodeFile]) -> RenamePlan {
    let mut plan = RenamePlan::default();
    let mut taken: HashMap<PathBuf, PathBuf> = HashMap::new();

    for file in files {
        let Some(found) = file.matched() else {
            continue;
        };
        let name = final_filename(&file.show, file.season, found.number, &found.canonical_title, &file.extension);
        let item = PlannedRename {
            source: file.path(),
            destination: file.directory.join(&name),
            final_filename: name,
            number: found.number,
        };
        if let Some(first) = taken.get(&item.destination) {
            warn!("{:?} and {:?} both map to {:?}", first, item.source, item.destination);
            let err = RenameError::BatchCollision {
                destination: item.destination.clone(),
                claimed_by: first.clone(),
            };
            plan.rejected.push((item, err));
            continue;
        }
        taken.insert(item.destination.clone(), item.source.clone());
        plan.items.push(item);
    }
    debug!("rename plan: {} items, {} rejected", plan.items.len(), plan.rejected.len());
    plan
}

#[derive(Debug)]
pub enum RenameStatus {
    Renamed,
    DryRun,
    Unchanged,
    Failed(RenameError),
}

impl RenameStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RenameStatus::Renamed => "renamed",
            RenameStatus::DryRun => "dry-run",
            RenameStatus::Unchanged => "unchanged",
            RenameStatus::Failed(_) => "failed",
        }
    }
}

#[derive(Debug)]
pub struct RenameOutcome {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub status: RenameStatus,
}

impl RenameOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, RenameStatus::Failed(_))
    }
}

fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(left), Ok(right)) => left == right,
        _ => a == b,
    }
}

fn map_io_error(item: &PlannedRename, err: std::io::Error) -> RenameError {
    match err.kind() {
        ErrorKind::NotFound => RenameError::SourceMissing { source_path: item.source.clone() },
        ErrorKind::PermissionDenied => RenameError::PermissionDenied {
            source_path: item.source.clone(),
            cause: err,
        },
        _ => RenameError::Filesystem {
            source_path: item.source.clone(),
            destination: item.destination.clone(),
            cause: err,
        },
    }
}

/// Case-only renames go through a temporary name so they also work on
/// case-insensitive volumes.
fn rename_with_case_handling(src: &Path, dst: &Path) -> std::io::Result<()> {
    let src_lower = src.to_string_lossy().to_lowercase();
    let dst_lower = dst.to_string_lossy().to_lowercase();
    if src_lower == dst_lower {
        let mut temp = dst.with_extension("__tmp_case__");
        let mut index = 1;
        while exists(&temp) {
            temp = dst.with_extension(format!("__tmp_case__{}", index));
            index += 1;
        }
        fs::rename(src, &temp)?;
        fs::rename(temp, dst)
    } else {
        fs::rename(src, dst)
    }
}

/// Moves one file, refusing to overwrite anything.
pub fn apply_rename(item: &PlannedRename, dry_run: bool) -> Result<RenameStatus, RenameError> {
    if !exists(&item.source) {
        return Err(RenameError::SourceMissing { source_path: item.source.clone() });
    }
    if item.source == item.destination {
        return Ok(RenameStatus::Unchanged);
    }
    if exists(&item.destination) && !same_path(&item.source, &item.destination) {
        return Err(RenameError::Collision { destination: item.destination.clone() });
    }
    if dry_run {
        return Ok(RenameStatus::DryRun);
    }
    rename_with_case_handling(&item.source, &item.destination).map_err(|e| map_io_error(item, e))?;
    Ok(RenameStatus::Renamed)
}

/// Runs every planned rename in order. Rejected plan items come back as
/// failures without touching the disk.
pub fn execute_plan(plan: RenamePlan, dry_run: bool, pb: &ProgressBar) -> Vec<RenameOutcome> {
    let mut outcomes = Vec::with_capacity(plan.len());

    for item in plan.items {
        let status = match apply_rename(&item, dry_run) {
            Ok(status) => {
                info!("{} {:?} -> {:?}", status.label(), item.source, item.final_filename);
                status
            }
            Err(e) => {
                warn!("rename failed: {}", e.describe());
                RenameStatus::Failed(e)
            }
        };
        pb.inc(1);
        pb.set_message(format!("E{:04} {}", item.number, status.label()));
        outcomes.push(RenameOutcome {
            source: item.source,
            destination: item.destination,
            status,
        });
    }

    for (item, err) in plan.rejected {
        pb.inc(1);
        outcomes.push(RenameOutcome {
            source: item.source,
            destination: item.destination,
            status: RenameStatus::Failed(err),
        });
    }
    outcomes
}
