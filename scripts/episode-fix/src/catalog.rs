//! Canonical episode list: one `<index>.<title>[.<ext>]` record per line.

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use std::collections::HashSet;
use std::fs;

use crate::config::{MalformedLinePolicy, RunConfig};
use crate::error::CatalogError;
use crate::normalize::normalize;

/// One authoritative episode. Only the claim state changes after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalEpisode {
    pub show: String,
    pub season: u32,
    pub number: u32,
    pub canonical_title: String,
    pub extension: String,
    pub line_no: usize,
    claimed: bool,
    claimed_by: Option<String>,
}

impl CanonicalEpisode {
    pub fn new(show: &str, season: u32, number: u32, title: &str, extension: &str, line_no: usize) -> Self {
        Self {
            show: show.to_string(),
            season,
            number,
            canonical_title: normalize(title),
            extension: extension.to_ascii_lowercase(),
            line_no,
            claimed: false,
            claimed_by: None,
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    /// Normalized key of the file that claimed this episode.
    pub fn claimed_by(&self) -> Option<&str> {
        self.claimed_by.as_deref()
    }

    /// Marks the episode as taken. Returns `false` if it already was.
    pub(crate) fn claim(&mut self, file_key: &str) -> bool {
        if self.claimed {
            return false;
        }
        self.claimed = true;
        self.claimed_by = Some(file_key.to_string());
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsedLine {
    number: u32,
    title: String,
    extension: String,
}

fn parse_line(raw: &str, line_no: usize, extensions: &[String]) -> Result<Option<ParsedLine>, CatalogError> {
    let line = raw.trim_start_matches('\u{feff}').trim();
    if line.is_empty() {
        return Ok(None);
    }

    let malformed_index = || CatalogError::MalformedIndex { line_no, line: line.to_string() };
    let missing_title = || CatalogError::MissingTitle { line_no, line: line.to_string() };

    let (index, rest) = match line.split_once('.') {
        Some(parts) => parts,
        None => {
            return Err(if line.parse::<u32>().is_ok() { missing_title() } else { malformed_index() });
        }
    };
    let number = match index.trim().parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => return Err(malformed_index()),
    };

    let rest = rest.trim();
    let (title, extension) = match rest.rsplit_once('.') {
        Some((head, tail)) if extensions.iter().any(|e| e.eq_ignore_ascii_case(tail.trim())) => {
            (head.trim(), tail.trim().to_ascii_lowercase())
        }
        _ => (rest, String::new()),
    };
    if normalize(title).is_empty() {
        return Err(missing_title());
    }

    Ok(Some(ParsedLine {
        number,
        title: title.to_string(),
        extension,
    }))
}

/// Parsed catalog, in file order.
#[derive(Debug, Default)]
pub struct Catalog {
    pub episodes: Vec<CanonicalEpisode>,
    /// Lines left out under [`MalformedLinePolicy::Skip`].
    pub skipped: Vec<CatalogError>,
    /// Episode numbers that appear on more than one line. Every copy is kept
    /// and stays matchable.
    pub duplicate_numbers: Vec<u32>,
}

impl Catalog {
    pub fn from_lines<I, S>(
        lines: I,
        show: &str,
        season: u32,
        extensions: &[String],
        policy: MalformedLinePolicy,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Catalog::default();
        let mut seen = HashSet::new();

        for (idx, line) in lines.into_iter().enumerate() {
            let line_no = idx + 1;
            match parse_line(line.as_ref(), line_no, extensions) {
                Ok(Some(parsed)) => {
                    if !seen.insert(parsed.number) {
                        warn!(
                            "catalog line {}: episode number {} already used, keeping both entries",
                            line_no, parsed.number
                        );
                        if !catalog.duplicate_numbers.contains(&parsed.number) {
                            catalog.duplicate_numbers.push(parsed.number);
                        }
                    }
                    catalog.episodes.push(CanonicalEpisode::new(
                        show,
                        season,
                        parsed.number,
                        &parsed.title,
                        &parsed.extension,
                        line_no,
                    ));
                }
                Ok(None) => {}
                Err(e) => match policy {
                    MalformedLinePolicy::Skip => {
                        warn!("skipping catalog {e}");
                        catalog.skipped.push(e);
                    }
                    MalformedLinePolicy::Abort => {
                        return Err(anyhow!(e).context("Malformed catalog line"));
                    }
                },
            }
        }

        debug!(
            "catalog parsed: {} episodes, {} skipped lines, {} duplicate numbers",
            catalog.episodes.len(),
            catalog.skipped.len(),
            catalog.duplicate_numbers.len()
        );
        Ok(catalog)
    }

    pub fn load(cfg: &RunConfig) -> Result<Self> {
        let text = fs::read_to_string(&cfg.catalog_path)
            .with_context(|| format!("Reading catalog {:?}", cfg.catalog_path))?;
        Self::from_lines(text.lines(), &cfg.show, cfg.season, &cfg.extensions, cfg.on_malformed)
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn unclaimed(&self) -> impl Iterator<Item = &CanonicalEpisode> {
        self.episodes.iter().filter(|e| !e.is_claimed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_extensions;

    fn parse(lines: &[&str]) -> Catalog {
        Catalog::from_lines(lines, "FIR", 1, &default_extensions(), MalformedLinePolicy::Skip).unwrap()
    }

    #[test]
    fn parses_index_and_title() {
        let catalog = parse(&["3.the one with the robbery"]);
        assert_eq!(catalog.len(), 1);
        let ep = &catalog.episodes[0];
        assert_eq!(ep.show, "FIR");
        assert_eq!(ep.season, 1);
        assert_eq!(ep.number, 3);
        assert_eq!(ep.canonical_title, "the one with the robbery");
        assert_eq!(ep.extension, "");
        assert!(!ep.is_claimed());
    }

    #[test]
    fn splits_known_extension_only() {
        let catalog = parse(&["12. Mr. Smith Goes - To Town.MKV", "13.Dr. Who.Returns"]);
        assert_eq!(catalog.episodes[0].number, 12);
        assert_eq!(catalog.episodes[0].canonical_title, "mr smith goes to town");
        assert_eq!(catalog.episodes[0].extension, "mkv");
        assert_eq!(catalog.episodes[1].canonical_title, "dr whoreturns");
        assert_eq!(catalog.episodes[1].extension, "");
    }

    #[test]
    fn blank_lines_are_ignored_and_order_kept() {
        let catalog = parse(&["", "2.second", "   ", "1.first"]);
        let numbers: Vec<u32> = catalog.episodes.iter().map(|e| e.number).collect();
        assert_eq!(numbers, vec![2, 1]);
        assert_eq!(catalog.episodes[0].line_no, 2);
        assert!(catalog.skipped.is_empty());
    }

    #[test]
    fn line_without_index_is_skipped() {
        let catalog = parse(&["the pilot episode", "1.pilot"]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.skipped.len(), 1);
        assert!(matches!(catalog.skipped[0], CatalogError::MalformedIndex { line_no: 1, .. }));
    }

    #[test]
    fn zero_or_negative_index_is_malformed() {
        let catalog = parse(&["0.zero", "-1.minus", "x1.letters"]);
        assert!(catalog.is_empty());
        assert_eq!(catalog.skipped.len(), 3);
    }

    #[test]
    fn missing_title_is_reported() {
        let catalog = parse(&["4", "5.", "6. -- !!", "7..mkv"]);
        assert!(catalog.is_empty());
        assert!(catalog
            .skipped
            .iter()
            .all(|e| matches!(e, CatalogError::MissingTitle { .. })));
        assert_eq!(catalog.skipped.iter().map(|e| e.line_no()).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn abort_policy_stops_on_first_bad_line() {
        let result = Catalog::from_lines(
            ["1.ok", "broken line"],
            "FIR",
            1,
            &default_extensions(),
            MalformedLinePolicy::Abort,
        );
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_numbers_are_kept_and_flagged() {
        let catalog = parse(&["1.first take", "1.second take", "2.other", "1.third take"]);
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.duplicate_numbers, vec![1]);
    }

    #[test]
    fn claim_happens_once() {
        let mut ep = CanonicalEpisode::new("FIR", 1, 1, "Pilot", "", 1);
        assert!(ep.claim("01 pilot"));
        assert!(!ep.claim("pilot"));
        assert_eq!(ep.claimed_by(), Some("01 pilot"));
    }
}
