//! ftorg - sort files into folders named after their extension
//!
//! This library walks a directory tree, decides for every file whether it
//! stays where it is or moves into a sibling folder named after its extension
//! token (`photo.jpg` goes to `JPG/photo.jpg`), and applies those decisions,
//! optionally as a dry run. Include/exclude rules come from the command line
//! and a TOML configuration file.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod file_organizer;
pub mod filters;
pub mod logging;
pub mod output;
pub mod walker;

pub use classifier::{Classifier, Decision, MovePlan, SkipReason};
pub use config::{ConfigError, FileConfig, RunConfig};
pub use file_organizer::{
    ActionOutcome, FileOrganizer, OrganizeError, OrganizeOptions, RunSummary, organize,
};
pub use filters::FilterSet;
pub use output::{ConsoleReporter, RecordingReporter, Reporter};
pub use walker::{DirListing, FileEntry, Walker};

pub use cli::{Command, run_cli};
