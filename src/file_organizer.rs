//! File organization engine: applies placement decisions to the filesystem.
//!
//! [`FileOrganizer`] executes one [`Decision`] at a time, creating extension
//! folders and moving files, or only reporting what it would do in dry-run
//! mode. [`organize`] drives a whole run: it walks the tree, classifies every
//! file, executes the decisions and hands each outcome to a [`Reporter`].
use crate::classifier::{Classifier, Decision, MovePlan, SkipReason};
use crate::filters::FilterSet;
use crate::output::Reporter;
use crate::walker::Walker;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during file organization operations.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The root directory is missing or is not a directory.
    #[error("Invalid base path {}: {source}", path.display())]
    InvalidBasePath { path: PathBuf, source: io::Error },

    /// A directory could not be listed during the walk.
    #[error("Failed to read directory {}: {source}", path.display())]
    DirectoryReadFailed { path: PathBuf, source: io::Error },

    /// Failed to create an extension directory.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    /// Failed to move a file into its extension directory.
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

impl OrganizeError {
    /// The path the error is about.
    pub fn path(&self) -> &Path {
        match self {
            Self::InvalidBasePath { path, .. }
            | Self::DirectoryReadFailed { path, .. }
            | Self::DirectoryCreationFailed { path, .. } => path,
            Self::FileMoveFailure { from, .. } => from,
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// What actually happened (or would happen, in dry-run mode) for one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    DirectoryCreated(PathBuf),
    DirectoryExists(PathBuf),
    FileMoved { from: PathBuf, to: PathBuf },
    /// The destination already exists; the source was left in place.
    DestinationExists { source: PathBuf, destination: PathBuf },
    Skipped { file: PathBuf, reason: SkipReason },
    Failed { path: PathBuf, reason: String },
}

impl ActionOutcome {
    fn failed(error: OrganizeError) -> Self {
        ActionOutcome::Failed {
            path: error.path().to_path_buf(),
            reason: error.to_string(),
        }
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectoryCreated(path) => write!(f, "Creating directory: {}", path.display()),
            Self::DirectoryExists(path) => write!(f, "Using existing directory: {}", path.display()),
            Self::FileMoved { from, to } => {
                write!(f, "Moving file: {} to {}", from.display(), to.display())
            }
            Self::DestinationExists {
                source,
                destination,
            } => write!(
                f,
                "Destination already exists, leaving {} in place: {}",
                source.display(),
                destination.display()
            ),
            Self::Skipped { file, reason } => {
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| file.display().to_string());
                match reason {
                    SkipReason::AlreadyCorrect => {
                        write!(f, "Skipping file already in the correct folder: {}", name)
                    }
                    SkipReason::Excluded => write!(f, "Excluding file: {}", name),
                    SkipReason::NotIncluded => {
                        write!(f, "Skipping file not in include list: {}", name)
                    }
                }
            }
            Self::Failed { reason, .. } => f.write_str(reason),
        }
    }
}

/// Options that shape a run, independent of the filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrganizeOptions {
    /// Descend into subdirectories. When false only the root's files are handled.
    pub recursive: bool,
    /// Report every action without touching the filesystem.
    pub dry_run: bool,
}

impl Default for OrganizeOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            dry_run: false,
        }
    }
}

/// Tally of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_seen: usize,
    pub moved: usize,
    /// Moved file counts keyed by extension folder name.
    pub moved_by_folder: HashMap<String, usize>,
    pub directories_created: usize,
    pub already_correct: usize,
    pub excluded: usize,
    pub not_included: usize,
    pub destination_conflicts: usize,
    pub failures: usize,
}

impl RunSummary {
    /// Folds one outcome into the tally.
    pub fn record(&mut self, outcome: &ActionOutcome) {
        match outcome {
            ActionOutcome::DirectoryCreated(_) => self.directories_created += 1,
            ActionOutcome::DirectoryExists(_) => {}
            ActionOutcome::FileMoved { to, .. } => {
                self.moved += 1;
                let folder = to
                    .parent()
                    .and_then(Path::file_name)
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                *self.moved_by_folder.entry(folder).or_insert(0) += 1;
            }
            ActionOutcome::DestinationExists { .. } => self.destination_conflicts += 1,
            ActionOutcome::Skipped { reason, .. } => match reason {
                SkipReason::AlreadyCorrect => self.already_correct += 1,
                SkipReason::Excluded => self.excluded += 1,
                SkipReason::NotIncluded => self.not_included += 1,
            },
            ActionOutcome::Failed { .. } => self.failures += 1,
        }
    }

    pub fn skipped(&self) -> usize {
        self.already_correct + self.excluded + self.not_included + self.destination_conflicts
    }
}

/// Executes placement decisions, for real or as a dry run.
#[derive(Debug, Clone, Default)]
pub struct FileOrganizer {
    dry_run: bool,
    /// Folders a dry run has reported as created so far.
    planned_folders: HashSet<PathBuf>,
}

impl FileOrganizer {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            planned_folders: HashSet::new(),
        }
    }

    /// Applies `decision` for `file` and returns what was done, in order.
    ///
    /// Skip decisions never touch the filesystem. A move creates the target
    /// folder when missing and then moves the file, unless the destination
    /// already exists, in which case the file stays where it is. Filesystem
    /// errors become [`ActionOutcome::Failed`] instead of aborting the caller.
    ///
    /// In dry-run mode a folder reported as created counts as existing for
    /// the rest of the run, so the outcomes match those of a real run.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ftorg::classifier::Classifier;
    /// use ftorg::file_organizer::FileOrganizer;
    /// use ftorg::FilterSet;
    /// use std::path::Path;
    ///
    /// let filters = FilterSet::default();
    /// let decision = Classifier::new(&filters).classify(Path::new("/data"), "report.pdf");
    /// let mut executor = FileOrganizer::new(true);
    /// for outcome in executor.execute(Path::new("/data/report.pdf"), &decision) {
    ///     println!("{}", outcome);
    /// }
    /// ```
    pub fn execute(&mut self, file: &Path, decision: &Decision) -> Vec<ActionOutcome> {
        match decision {
            Decision::Skip(reason) => vec![ActionOutcome::Skipped {
                file: file.to_path_buf(),
                reason: *reason,
            }],
            Decision::Move(plan) => self.execute_move(plan),
        }
    }

    fn execute_move(&mut self, plan: &MovePlan) -> Vec<ActionOutcome> {
        let mut outcomes = Vec::with_capacity(2);

        if plan.target_folder.exists() || self.planned_folders.contains(&plan.target_folder) {
            outcomes.push(ActionOutcome::DirectoryExists(plan.target_folder.clone()));
        } else {
            if !self.dry_run {
                if let Err(e) = fs::create_dir_all(&plan.target_folder) {
                    outcomes.push(ActionOutcome::failed(
                        OrganizeError::DirectoryCreationFailed {
                            path: plan.target_folder.clone(),
                            source: e,
                        },
                    ));
                    return outcomes;
                }
            } else {
                self.planned_folders.insert(plan.target_folder.clone());
            }
            outcomes.push(ActionOutcome::DirectoryCreated(plan.target_folder.clone()));
        }

        if plan.destination.exists() {
            outcomes.push(ActionOutcome::DestinationExists {
                source: plan.source.clone(),
                destination: plan.destination.clone(),
            });
            return outcomes;
        }

        if !self.dry_run {
            if let Err(e) = move_file(&plan.source, &plan.destination) {
                outcomes.push(ActionOutcome::failed(OrganizeError::FileMoveFailure {
                    from: plan.source.clone(),
                    to: plan.destination.clone(),
                    source: e,
                }));
                return outcomes;
            }
        }
        outcomes.push(ActionOutcome::FileMoved {
            from: plan.source.clone(),
            to: plan.destination.clone(),
        });
        outcomes
    }
}

/// Renames `from` to `to`, copying and removing when the rename crosses devices.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            tracing::warn!(error = %e, "Rename crosses devices, falling back to copy+remove");
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        result => result,
    }
}

/// Organizes the tree under `root` and returns the run tally.
///
/// Only an unusable root is an error. Everything that goes wrong further down
/// (unreadable folders, failed moves) is reported as an outcome and the run
/// carries on with the next file.
pub fn organize(
    root: &Path,
    filters: &FilterSet,
    options: OrganizeOptions,
    reporter: &mut dyn Reporter,
) -> OrganizeResult<RunSummary> {
    let metadata = fs::metadata(root).map_err(|e| OrganizeError::InvalidBasePath {
        path: root.to_path_buf(),
        source: e,
    })?;
    if !metadata.is_dir() {
        return Err(OrganizeError::InvalidBasePath {
            path: root.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        });
    }

    let classifier = Classifier::new(filters);
    let mut executor = FileOrganizer::new(options.dry_run);
    let mut summary = RunSummary::default();
    // Files already moved this run may show up again in a later listing.
    let mut placed: HashSet<PathBuf> = HashSet::new();

    for listing in Walker::new(root, filters, options.recursive) {
        let listing = match listing {
            Ok(listing) => listing,
            Err(e) => {
                let outcome = ActionOutcome::failed(e);
                reporter.outcome(&outcome);
                summary.record(&outcome);
                continue;
            }
        };
        reporter.directory(&listing.path);

        for file in &listing.files {
            if placed.contains(&file.path) {
                continue;
            }
            summary.files_seen += 1;
            let decision = classifier.classify(&listing.path, &file.file_name);
            reporter.decision(&file.path, &decision);

            for outcome in executor.execute(&file.path, &decision) {
                if let ActionOutcome::FileMoved { to, .. } = &outcome {
                    placed.insert(to.clone());
                }
                reporter.outcome(&outcome);
                summary.record(&outcome);
            }
        }
    }

    Ok(summary)
}
