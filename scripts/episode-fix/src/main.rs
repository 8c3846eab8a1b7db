use anyhow::Result;
use clap::{ArgAction, Parser};
use log::debug;
use std::path::PathBuf;

use episode_fix::config::{parse_exts, DEFAULT_MIN_SCORE, DEFAULT_SEASON};
use episode_fix::logging::init_logging;
use episode_fix::{MalformedLinePolicy, RunConfig};

#[derive(Parser, Debug)]
#[command(
    name = "episode-fix",
    version,
    about = "Match loosely named episode files against a canonical list and rename them"
)]
struct Cli {
    /// Canonical episode list, one `<index>.<title>[.<ext>]` per line
    #[arg(long)]
    catalog: PathBuf,

    /// Directory holding the show's media files (not searched recursively)
    #[arg(long)]
    dir: PathBuf,

    /// Show identifier used as the file name prefix
    #[arg(long)]
    show: String,

    /// Season number for every catalog entry
    #[arg(long, default_value_t = DEFAULT_SEASON)]
    season: u32,

    /// Minimum similarity (0-100) to accept a match
    #[arg(long, default_value_t = DEFAULT_MIN_SCORE)]
    min_score: u8,

    /// Media extensions to consider (comma separated)
    #[arg(long, default_value = "mkv,mp4")]
    exts: String,

    /// What to do with catalog lines lacking an index or title
    #[arg(long, value_enum, default_value_t = MalformedLinePolicy::Skip)]
    on_malformed: MalformedLinePolicy,

    /// Report what would be renamed without touching any file
    #[arg(long, action = ArgAction::SetTrue)]
    dry_run: bool,

    /// Append one JSON line per rename outcome to this file
    #[arg(long)]
    journal: Option<PathBuf>,

    /// Debug logs to logs/episode-fix.log
    #[arg(long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Explicit log file path (enables file logging)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, action = ArgAction::SetTrue)]
    quiet: bool,
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        let mut cfg = RunConfig::new(&self.catalog, &self.dir, self.show.trim());
        cfg.season = self.season;
        cfg.min_score = self.min_score;
        cfg.extensions = parse_exts(&self.exts);
        cfg.on_malformed = self.on_malformed;
        cfg.dry_run = self.dry_run;
        cfg.journal = self.journal.clone();
        cfg
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = init_logging(cli.debug, cli.log_file.as_deref()) {
        println!("[debug] logs → {:?}", path);
    }

    let cfg = cli.run_config();
    debug!("config: {:?}", cfg);
    println!(
        "Running episode-fix {}on {:?}",
        if cfg.dry_run { "(dry-run) " } else { "" },
        cfg.directory
    );

    let report = episode_fix::run(&cfg, !cli.quiet)?;
    for o in &report.outcomes {
        println!("{:<9} {:?} -> {:?}", o.status.label(), o.source, o.destination);
    }
    print!("{}", report.render());
    if report.is_complete() {
        println!("Every canonical episode has a file.");
    }
    Ok(())
}
