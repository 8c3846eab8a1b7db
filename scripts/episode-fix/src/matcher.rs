//! Greedy file → episode assignment.
//!
//! Files are taken in scan order and each one claims the best still-unclaimed
//! catalog title. A claim is final: a later file that would have scored
//! higher against an already claimed title cannot take it over. Equal scores
//! resolve to the earliest catalog entry.

use log::{debug, info, warn};

use crate::catalog::{CanonicalEpisode, Catalog};
use crate::scanner::{EpisodeFile, EpisodeMatch};
use crate::similarity::similarity_score;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Claimed { index: usize, score: u8 },
    /// Best unclaimed title scored under the threshold. Nothing was claimed.
    BelowThreshold { best_score: u8 },
    NoCandidates,
}

/// Highest scoring unclaimed entry, first one on ties.
pub fn best_unclaimed(catalog: &[CanonicalEpisode], file_key: &str) -> Option<(usize, u8)> {
    let mut best: Option<(usize, u8)> = None;
    for (index, episode) in catalog.iter().enumerate() {
        if episode.is_claimed() {
            continue;
        }
        let score = similarity_score(file_key, &episode.canonical_title);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((index, score));
        }
    }
    best
}

/// Finds the best unclaimed entry for `file_key` and, if it reaches
/// `min_score`, claims it before returning.
pub fn claim_best_match(catalog: &mut [CanonicalEpisode], file_key: &str, min_score: u8) -> MatchOutcome {
    match best_unclaimed(catalog, file_key) {
        None => MatchOutcome::NoCandidates,
        Some((_, score)) if score < min_score => MatchOutcome::BelowThreshold { best_score: score },
        Some((index, score)) => {
            catalog[index].claim(file_key);
            MatchOutcome::Claimed { index, score }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignmentSummary {
    pub matched: usize,
    pub unmatched: usize,
}

/// Runs [`claim_best_match`] for every file in order, recording the result on
/// the file record.
pub fn assign_files(catalog: &mut Catalog, files: &mut [EpisodeFile], min_score: u8) -> AssignmentSummary {
    let mut summary = AssignmentSummary::default();
    for file in files.iter_mut() {
        match claim_best_match(&mut catalog.episodes, &file.normalized_key, min_score) {
            MatchOutcome::Claimed { index, score } => {
                let episode = &catalog.episodes[index];
                debug!(
                    "{:?} -> #{} {:?} (score {})",
                    file.raw_filename, episode.number, episode.canonical_title, score
                );
                file.best_score = Some(score);
                file.assign(EpisodeMatch {
                    number: episode.number,
                    canonical_title: episode.canonical_title.clone(),
                    score,
                });
                summary.matched += 1;
            }
            MatchOutcome::BelowThreshold { best_score } => {
                warn!(
                    "no confident match for {:?} (best score {} < {})",
                    file.raw_filename, best_score, min_score
                );
                file.best_score = Some(best_score);
                summary.unmatched += 1;
            }
            MatchOutcome::NoCandidates => {
                warn!("no unclaimed catalog entry left for {:?}", file.raw_filename);
                summary.unmatched += 1;
            }
        }
    }
    info!(
        "assignment done: {} matched, {} unmatched files, {} unclaimed episodes",
        summary.matched,
        summary.unmatched,
        catalog.unclaimed().count()
    );
    summary
}
