use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_LOG_FILE: &str = "logs/episode-fix.log";

/// File logging at debug level when `debug` or `log_file` is set, otherwise
/// `env_logger` on stderr (default filter `info`, `RUST_LOG` overrides).
///
/// Returns the log file path when file logging is active.
pub fn init_logging(debug: bool, log_file: Option<&Path>) -> Option<PathBuf> {
    if debug || log_file.is_some() {
        let log_path = log_file
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
        if let Some(parent) = log_path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match fs::File::create(&log_path) {
            Ok(file) => {
                let cfg = ConfigBuilder::new()
                    .set_time_format_rfc3339()
                    .set_target_level(LevelFilter::Off)
                    .build();
                if let Err(e) = WriteLogger::init(LevelFilter::Debug, cfg, file) {
                    eprintln!("[warn] file logger init failed: {e}");
                    return None;
                }
                return Some(log_path);
            }
            Err(e) => {
                eprintln!("[warn] cannot create log file {:?}: {e}", log_path);
            }
        }
    }
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
    None
}
