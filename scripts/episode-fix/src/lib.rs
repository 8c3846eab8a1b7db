//! Reconciles a canonical episode list with the loosely named media files of
//! a show directory and renames matched files to
//! `<show> S<SS>E<NNNN> <Title>.<ext>`.

pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod normalize;
pub mod pipeline;
pub mod planner;
pub mod report;
pub mod scanner;
pub mod similarity;

pub use catalog::{CanonicalEpisode, Catalog};
pub use config::{MalformedLinePolicy, RunConfig};
pub use error::{CatalogError, RenameError};
pub use pipeline::run;
pub use report::RunReport;
pub use scanner::{EpisodeFile, EpisodeMatch};
