//! End-of-run listings and the JSONL audit journal.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::catalog::{CanonicalEpisode, Catalog};
use crate::error::CatalogError;
use crate::planner::{RenameOutcome, RenameStatus};
use crate::scanner::EpisodeFile;

#[derive(Debug)]
pub struct RunReport {
    pub catalog_total: usize,
    pub files_total: usize,
    /// Catalog entries no file claimed: episodes still to acquire.
    pub unclaimed: Vec<CanonicalEpisode>,
    /// Files that never reached the threshold: need manual attention.
    pub unmatched_files: Vec<EpisodeFile>,
    pub outcomes: Vec<RenameOutcome>,
    pub skipped_lines: Vec<CatalogError>,
    pub duplicate_numbers: Vec<u32>,
    pub dry_run: bool,
    pub journal_error: Option<String>,
}

impl RunReport {
    pub fn new(catalog: Catalog, files: Vec<EpisodeFile>, outcomes: Vec<RenameOutcome>, dry_run: bool) -> Self {
        let unclaimed = catalog.unclaimed().cloned().collect();
        let files_total = files.len();
        let unmatched_files = files.into_iter().filter(|f| !f.is_claimed()).collect();
        Self {
            catalog_total: catalog.episodes.len(),
            files_total,
            unclaimed,
            unmatched_files,
            outcomes,
            skipped_lines: catalog.skipped,
            duplicate_numbers: catalog.duplicate_numbers,
            dry_run,
            journal_error: None,
        }
    }

    pub fn matched(&self) -> usize {
        self.files_total - self.unmatched_files.len()
    }

    fn count_where(&self, pred: impl Fn(&RenameStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }

    pub fn renamed(&self) -> usize {
        self.count_where(|s| matches!(s, RenameStatus::Renamed))
    }

    pub fn would_rename(&self) -> usize {
        self.count_where(|s| matches!(s, RenameStatus::DryRun))
    }

    pub fn unchanged(&self) -> usize {
        self.count_where(|s| matches!(s, RenameStatus::Unchanged))
    }

    pub fn failed(&self) -> usize {
        self.count_where(|s| matches!(s, RenameStatus::Failed(_)))
    }

    pub fn failures(&self) -> impl Iterator<Item = &RenameOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    pub fn is_complete(&self) -> bool {
        self.unclaimed.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Episodes still missing ({}):", self.unclaimed.len());
        for ep in &self.unclaimed {
            let _ = writeln!(out, "  {} - {}", ep.canonical_title, ep.number);
        }

        let _ = writeln!(out, "Files without a confident match ({}):", self.unmatched_files.len());
        for file in &self.unmatched_files {
            let score = file.best_score.map(|s| s.to_string()).unwrap_or_else(|| "-".into());
            let _ = writeln!(out, "  {}  (key: {:?}, best score {})", file.raw_filename, file.normalized_key, score);
        }

        let failures: Vec<_> = self.failures().collect();
        if !failures.is_empty() {
            let _ = writeln!(out, "Failed renames ({}):", failures.len());
            for o in failures {
                if let RenameStatus::Failed(e) = &o.status {
                    let _ = writeln!(out, "  {}", e.describe());
                }
            }
        }

        if !self.skipped_lines.is_empty() {
            let _ = writeln!(out, "Skipped catalog lines ({}):", self.skipped_lines.len());
            for e in &self.skipped_lines {
                let _ = writeln!(out, "  {e}");
            }
        }

        if !self.duplicate_numbers.is_empty() {
            let nums: Vec<String> = self.duplicate_numbers.iter().map(|n| n.to_string()).collect();
            let _ = writeln!(out, "Duplicate catalog numbers: {}", nums.join(", "));
        }

        if let Some(e) = &self.journal_error {
            let _ = writeln!(out, "Journal not written: {e}");
        }

        let renamed_label = if self.dry_run { "would rename" } else { "renamed" };
        let renamed = if self.dry_run { self.would_rename() } else { self.renamed() };
        let _ = writeln!(
            out,
            "Matched {}/{} files, {} unmatched files, {}/{} episodes unclaimed, {} {}, {} unchanged, {} failed.",
            self.matched(),
            self.files_total,
            self.unmatched_files.len(),
            self.unclaimed.len(),
            self.catalog_total,
            renamed,
            renamed_label,
            self.unchanged(),
            self.failed(),
        );
        out
    }
}

#[derive(Debug, Serialize)]
struct JournalRecord<'a> {
    source: String,
    destination: String,
    status: &'a str,
    error: Option<String>,
    ts: String,
}

/// Appends one JSON line per outcome to `path`.
pub fn append_journal(path: &Path, outcomes: &[RenameOutcome]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("Creating journal folder {:?}", parent))?;
        }
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Opening journal {:?}", path))?;
    let ts = chrono::Utc::now().to_rfc3339();
    for o in outcomes {
        let rec = JournalRecord {
            source: o.source.display().to_string(),
            destination: o.destination.display().to_string(),
            status: o.status.label(),
            error: match &o.status {
                RenameStatus::Failed(e) => Some(e.describe()),
                _ => None,
            },
            ts: ts.clone(),
        };
        writeln!(file, "{}", serde_json::to_string(&rec)?)?;
    }
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_extensions, MalformedLinePolicy};
    use crate::matcher::assign_files;
    use crate::error::RenameError;
    use std::path::PathBuf;

    fn report() -> RunReport {
        let mut catalog = Catalog::from_lines(
            ["1.pilot", "2.the heist", "oops", "2.the heist again"],
            "FIR",
            1,
            &default_extensions(),
            MalformedLinePolicy::Skip,
        )
        .unwrap();
        let mut files = vec![
            EpisodeFile::new("FIR", 1, Path::new("/d"), "pilot.mkv"),
            EpisodeFile::new("FIR", 1, Path::new("/d"), "behind the scenes.mkv"),
        ];
        assign_files(&mut catalog, &mut files, 80);
        let outcomes = vec![RenameOutcome {
            source: PathBuf::from("/d/pilot.mkv"),
            destination: PathBuf::from("/d/FIR S01E0001 Pilot.mkv"),
            status: RenameStatus::Renamed,
        }];
        RunReport::new(catalog, files, outcomes, false)
    }

    #[test]
    fn report_lists_both_sides() {
        let r = report();
        assert_eq!(r.catalog_total, 3);
        assert_eq!(r.files_total, 2);
        assert_eq!(r.matched(), 1);
        assert_eq!(r.unclaimed.iter().map(|e| e.number).collect::<Vec<_>>(), vec![2, 2]);
        assert_eq!(r.unmatched_files[0].raw_filename, "behind the scenes.mkv");
        assert!(!r.is_complete());

        let text = r.render();
        assert!(text.contains("Episodes still missing (2):"));
        assert!(text.contains("  the heist - 2"));
        assert!(text.contains("Files without a confident match (1):"));
        assert!(text.contains("behind the scenes.mkv"));
        assert!(text.contains("Skipped catalog lines (1):"));
        assert!(text.contains("Duplicate catalog numbers: 2"));
        assert!(text.contains("Matched 1/2 files, 1 unmatched files, 2/3 episodes unclaimed, 1 renamed"));
        assert!(!text.contains("Journal not written"));
    }

    #[test]
    fn counts_follow_status_variants() {
        let mut r = report();
        r.outcomes.extend([
            RenameOutcome {
                source: PathBuf::from("/d/x.mkv"),
                destination: PathBuf::from("/d/x.mkv"),
                status: RenameStatus::Unchanged,
            },
            RenameOutcome {
                source: PathBuf::from("/d/y.mkv"),
                destination: PathBuf::from("/d/FIR S01E0002 Y.mkv"),
                status: RenameStatus::Failed(RenameError::SourceMissing {
                    source_path: PathBuf::from("/d/y.mkv"),
                }),
            },
        ]);
        assert_eq!((r.renamed(), r.would_rename(), r.unchanged(), r.failed()), (1, 0, 1, 1));
        assert!(r.render().contains("1 renamed, 1 unchanged, 1 failed."));
    }

    #[test]
    fn journal_failure_is_listed() {
        let mut r = report();
        r.journal_error = Some("Opening journal \"/d\": Is a directory".into());
        assert!(r.render().contains("Journal not written: Opening journal"));
    }

    #[test]
    fn journal_appends_json_lines() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("logs").join("journal.jsonl");
        let outcomes = vec![
            RenameOutcome {
                source: PathBuf::from("/d/a.mkv"),
                destination: PathBuf::from("/d/FIR S01E0001 A.mkv"),
                status: RenameStatus::Renamed,
            },
            RenameOutcome {
                source: PathBuf::from("/d/b.mkv"),
                destination: PathBuf::from("/d/FIR S01E0002 B.mkv"),
                status: RenameStatus::Failed(RenameError::Collision {
                    destination: PathBuf::from("/d/FIR S01E0002 B.mkv"),
                }),
            },
        ];
        append_journal(&path, &outcomes).unwrap();
        append_journal(&path, &outcomes[..1]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = content.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["status"], "renamed");
        assert!(lines[0]["error"].is_null());
        assert_eq!(lines[1]["status"], "failed");
        assert!(lines[1]["error"].as_str().unwrap().contains("already exists"));
        assert!(lines[2]["ts"].is_string());
    }
}
