use anyhow::{anyhow, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DEFAULT_MIN_SCORE: u8 = 80;
pub const DEFAULT_SEASON: u32 = 1;
pub const DEFAULT_EXTENSIONS: &[&str] = &["mkv", "mp4"];

/// What to do with a catalog line that has no usable index or title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MalformedLinePolicy {
    #[default]
    Skip,
    Abort,
}

/// Everything one reconciliation run needs, fixed for the whole batch.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub catalog_path: PathBuf,
    pub directory: PathBuf,
    pub show: String,
    pub season: u32,
    pub min_score: u8,
    pub extensions: Vec<String>,
    pub on_malformed: MalformedLinePolicy,
    pub dry_run: bool,
    pub journal: Option<PathBuf>,
}

impl RunConfig {
    pub fn new(catalog_path: impl Into<PathBuf>, directory: impl Into<PathBuf>, show: impl Into<String>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            directory: directory.into(),
            show: show.into(),
            season: DEFAULT_SEASON,
            min_score: DEFAULT_MIN_SCORE,
            extensions: default_extensions(),
            on_malformed: MalformedLinePolicy::default(),
            dry_run: false,
            journal: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let show = self.show.trim();
        if show.is_empty() {
            return Err(anyhow!("Show identifier must not be empty"));
        }
        if show.contains(['/', '\\']) {
            return Err(anyhow!("Show identifier {:?} must not contain a path separator", self.show));
        }
        if self.season == 0 {
            return Err(anyhow!("Season must be a positive integer"));
        }
        if self.min_score > 100 {
            return Err(anyhow!("Minimum score {} is outside 0..=100", self.min_score));
        }
        if self.extensions.is_empty() {
            return Err(anyhow!("At least one media extension is required"));
        }
        Ok(())
    }

    pub fn is_media_extension(&self, ext: &str) -> bool {
        let ext = ext.trim().to_ascii_lowercase();
        self.extensions.iter().any(|e| *e == ext)
    }
}

pub fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

/// Comma-separated extension list; blank input yields the default set.
pub fn parse_exts(exts: &str) -> Vec<String> {
    let parsed: Vec<String> = exts
        .split(',')
        .map(|s| s.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    if parsed.is_empty() {
        default_extensions()
    } else {
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_exts_normalises_entries() {
        assert_eq!(parse_exts(" .MKV, mp4 ,,avi"), vec!["mkv", "mp4", "avi"]);
        assert_eq!(parse_exts(""), vec!["mkv", "mp4"]);
        assert_eq!(parse_exts(" , "), vec!["mkv", "mp4"]);
    }

    #[test]
    fn media_extension_check_is_case_insensitive() {
        let cfg = RunConfig::new("list.txt", ".", "FIR");
        assert!(cfg.is_media_extension("MKV"));
        assert!(cfg.is_media_extension("mp4"));
        assert!(!cfg.is_media_extension("srt"));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let ok = RunConfig::new("list.txt", ".", "FIR");
        assert!(ok.validate().is_ok());

        let mut cfg = ok.clone();
        cfg.show = "  ".into();
        assert!(cfg.validate().is_err());

        let mut cfg = ok.clone();
        cfg.show = "FIR/extra".into();
        assert!(cfg.validate().is_err());

        let mut cfg = ok.clone();
        cfg.season = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = ok;
        cfg.min_score = 101;
        assert!(cfg.validate().is_err());
    }
}
