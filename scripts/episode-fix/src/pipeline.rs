use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use crate::catalog::Catalog;
use crate::config::RunConfig;
use crate::matcher::assign_files;
use crate::planner::{execute_plan, plan_renames};
use crate::report::{append_journal, RunReport};
use crate::scanner::scan_directory;

/// Catalog → scan → assign → plan → rename → report, for one show directory.
///
/// Only an invalid config, an unreadable catalog or directory, or a malformed
/// line under the abort policy end the run early with an error. Once files
/// have moved, a journal that cannot be written is logged and noted on the
/// report instead.
pub fn run(cfg: &RunConfig, show_progress: bool) -> Result<RunReport> {
    cfg.validate()?;

    let mut catalog = Catalog::load(cfg)?;
    let mut files = scan_directory(cfg)?;
    info!(
        "Found {} media files in {:?}, corresponding with {} canonical episodes",
        files.len(),
        cfg.directory,
        catalog.len()
    );

    assign_files(&mut catalog, &mut files, cfg.min_score);
    let plan = plan_renames(&files);

    let pb = if show_progress {
        let pb = ProgressBar::new(plan.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}") {
            pb.set_style(style);
        }
        pb
    } else {
        ProgressBar::hidden()
    };
    let outcomes = execute_plan(plan, cfg.dry_run, &pb);
    pb.finish_with_message("Done");

    let journal_error = cfg.journal.as_ref().and_then(|journal| match append_journal(journal, &outcomes) {
        Ok(()) => None,
        Err(e) => {
            warn!("journal not written: {e:#}");
            Some(format!("{e:#}"))
        }
    });

    let mut report = RunReport::new(catalog, files, outcomes, cfg.dry_run);
    report.journal_error = journal_error;
    Ok(report)
}
