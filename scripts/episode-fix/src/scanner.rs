//! Flat listing of a show directory, restricted to media files.
//!
//! Subdirectories and files whose extension is not in the configured set are
//! left out without comment: they are not part of the show and must never be
//! touched by a rename.

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::RunConfig;
use crate::normalize::normalize;

/// Canonical episode a file was assigned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeMatch {
    pub number: u32,
    pub canonical_title: String,
    pub score: u8,
}

/// A media file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeFile {
    pub show: String,
    pub season: u32,
    pub raw_filename: String,
    /// Normalized stem, the string compared against catalog titles.
    pub normalized_key: String,
    pub extension: String,
    pub directory: PathBuf,
    /// Highest score seen against any unclaimed title, kept for reporting.
    pub best_score: Option<u8>,
    source: PathBuf,
    matched: Option<EpisodeMatch>,
}

impl EpisodeFile {
    pub fn new(show: &str, season: u32, directory: &Path, raw_filename: &str) -> Self {
        let path = Path::new(raw_filename);
        let stem = path.file_stem().and_then(OsStr::to_str).unwrap_or(raw_filename);
        let extension = path
            .extension()
            .and_then(OsStr::to_str)
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        Self {
            show: show.to_string(),
            season,
            raw_filename: raw_filename.to_string(),
            normalized_key: normalize(stem),
            extension,
            directory: directory.to_path_buf(),
            best_score: None,
            source: directory.join(raw_filename),
            matched: None,
        }
    }

    /// Names that are not valid UTF-8 keep their real path here while
    /// `raw_filename` holds the lossy form.
    pub(crate) fn with_source(mut self, source: PathBuf) -> Self {
        self.source = source;
        self
    }

    pub fn path(&self) -> PathBuf {
        self.source.clone()
    }

    pub fn is_claimed(&self) -> bool {
        self.matched.is_some()
    }

    pub fn matched(&self) -> Option<&EpisodeMatch> {
        self.matched.as_ref()
    }

    pub(crate) fn assign(&mut self, found: EpisodeMatch) {
        self.matched = Some(found);
    }
}

/// Lists media files directly inside `cfg.directory`, sorted by name.
pub fn scan_directory(cfg: &RunConfig) -> Result<Vec<EpisodeFile>> {
    let dir = &cfg.directory;
    if !dir.is_dir() {
        return Err(anyhow!("Show directory not found: {:?}", dir));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => {
                return Err(e).with_context(|| format!("Listing show directory {:?}", dir));
            }
            Err(e) => {
                warn!("cannot inspect entry in {:?}: {e}", dir);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        let ext = Path::new(name.as_ref()).extension().and_then(OsStr::to_str).unwrap_or("");
        if !cfg.is_media_extension(ext) {
            debug!("ignoring non-media file {name}");
            continue;
        }
        if entry.file_name().to_str().is_none() {
            warn!("file name {:?} is not valid UTF-8, matching on {name:?}", entry.file_name());
        }
        files.push(EpisodeFile::new(&cfg.show, cfg.season, dir, &name).with_source(entry.path().to_path_buf()));
    }
    debug!("scanned {:?}: {} media files", dir, files.len());
    Ok(files)
}
