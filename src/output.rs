//! Output formatting and run reporting.
//!
//! [`OutputFormatter`] centralizes styled console output. The [`Reporter`]
//! trait is how the organize engine publishes what it decides and does;
//! [`ConsoleReporter`] writes every event to the run log through `tracing`
//! and echoes it to the console in verbose mode, while [`RecordingReporter`]
//! simply keeps everything in memory.

use crate::classifier::Decision;
use crate::file_organizer::{ActionOutcome, RunSummary};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Receives the stream of events produced by an organize run.
pub trait Reporter {
    /// A directory is about to be processed.
    fn directory(&mut self, _path: &Path) {}

    /// A file has been classified.
    fn decision(&mut self, _file: &Path, _decision: &Decision) {}

    /// An action was performed, simulated, skipped or failed.
    fn outcome(&mut self, outcome: &ActionOutcome);
}

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - A spinner for long walks
/// - Summary tables with statistics
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ftorg::output::OutputFormatter;
    /// OutputFormatter::success("Files organized successfully.");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a spinner for walks whose size is not known up front.
    ///
    /// ```no_run
    /// use ftorg::output::OutputFormatter;
    /// let spinner = OutputFormatter::create_spinner();
    /// spinner.set_message("scanning");
    /// spinner.finish_and_clear();
    /// ```
    pub fn create_spinner() -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    /// Prints a table of moved files per extension folder.
    ///
    /// ```no_run
    /// use ftorg::output::OutputFormatter;
    /// use std::collections::HashMap;
    ///
    /// let mut counts = HashMap::new();
    /// counts.insert("PDF".to_string(), 15);
    /// counts.insert("JPG".to_string(), 8);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(folder_counts: &HashMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let mut folders: Vec<_> = folder_counts.iter().collect();
        folders.sort_by_key(|&(name, _)| name);

        let max_folder_len = folders
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max(6); // "Folder"

        println!(
            "{:<width$} | {}",
            "Folder".bold(),
            "Files".bold(),
            width = max_folder_len
        );
        println!("{}", "-".repeat(max_folder_len + 10));

        for (folder, count) in &folders {
            println!(
                "{:<width$} | {} {}",
                folder,
                count.to_string().green(),
                plural(**count),
                width = max_folder_len
            );
        }

        println!("{}", "-".repeat(max_folder_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files),
            width = max_folder_len
        );
    }

    /// Prints the table plus skip and failure counts of a finished run.
    pub fn run_summary(summary: &RunSummary, dry_run: bool) {
        if summary.moved > 0 {
            Self::summary_table(&summary.moved_by_folder, summary.moved);
        }
        let verb = if dry_run { "would be moved" } else { "moved" };
        Self::plain(&format!(
            "{} of {} {} {}, {} skipped",
            summary.moved,
            summary.files_seen,
            plural(summary.files_seen),
            verb,
            summary.skipped()
        ));
        if summary.destination_conflicts > 0 {
            Self::warning(&format!(
                "{} {} left in place because the destination already exists",
                summary.destination_conflicts,
                plural(summary.destination_conflicts)
            ));
        }
        if summary.failures > 0 {
            Self::warning(&format!(
                "{} {} failed, see the log for details",
                summary.failures,
                if summary.failures == 1 { "action" } else { "actions" }
            ));
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

/// Logs every event and echoes it to the console when verbose.
pub struct ConsoleReporter {
    verbose: bool,
    dry_run: bool,
    spinner: Option<ProgressBar>,
}

impl ConsoleReporter {
    /// A spinner is shown only in quiet mode, where it is the sole progress signal.
    pub fn new(verbose: bool, dry_run: bool) -> Self {
        let spinner = if verbose {
            None
        } else {
            Some(OutputFormatter::create_spinner())
        };
        Self {
            verbose,
            dry_run,
            spinner,
        }
    }

    /// Clears the spinner. Call once the run is over.
    pub fn finish(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn echo(&self, outcome: &ActionOutcome) {
        let message = outcome.to_string();
        match outcome {
            ActionOutcome::Failed { .. } => self.print(|| OutputFormatter::error(&message)),
            ActionOutcome::DestinationExists { .. } if self.verbose => {
                OutputFormatter::warning(&message)
            }
            ActionOutcome::DirectoryCreated(_) | ActionOutcome::FileMoved { .. }
                if self.verbose && self.dry_run =>
            {
                OutputFormatter::dry_run_notice(&message)
            }
            _ if self.verbose => OutputFormatter::plain(&message),
            _ => {}
        }
    }

    fn print(&self, f: impl FnOnce()) {
        match &self.spinner {
            Some(spinner) => spinner.suspend(f),
            None => f(),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn directory(&mut self, path: &Path) {
        tracing::debug!("Scanning directory: {}", path.display());
        if let Some(spinner) = &self.spinner {
            spinner.set_message(path.display().to_string());
        }
    }

    fn outcome(&mut self, outcome: &ActionOutcome) {
        match outcome {
            ActionOutcome::Failed { .. } => tracing::error!("{}", outcome),
            ActionOutcome::DestinationExists { .. } => tracing::warn!("{}", outcome),
            ActionOutcome::DirectoryExists(_) => tracing::debug!("{}", outcome),
            _ => tracing::info!("{}", outcome),
        }
        self.echo(outcome);
    }
}

impl Drop for ConsoleReporter {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Keeps every event in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub directories: Vec<PathBuf>,
    pub decisions: Vec<(PathBuf, Decision)>,
    pub outcomes: Vec<ActionOutcome>,
}

impl Reporter for RecordingReporter {
    fn directory(&mut self, path: &Path) {
        self.directories.push(path.to_path_buf());
    }

    fn decision(&mut self, file: &Path, decision: &Decision) {
        self.decisions.push((file.to_path_buf(), decision.clone()));
    }

    fn outcome(&mut self, outcome: &ActionOutcome) {
        self.outcomes.push(outcome.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::SkipReason;

    #[test]
    fn test_recording_reporter_keeps_order() {
        let mut reporter = RecordingReporter::default();
        reporter.directory(Path::new("/r"));
        reporter.decision(Path::new("/r/a.txt"), &Decision::Skip(SkipReason::Excluded));
        reporter.outcome(&ActionOutcome::Skipped {
            file: PathBuf::from("/r/a.txt"),
            reason: SkipReason::Excluded,
        });

        assert_eq!(reporter.directories, vec![PathBuf::from("/r")]);
        assert_eq!(reporter.decisions.len(), 1);
        assert_eq!(reporter.outcomes.len(), 1);
    }

    #[test]
    fn test_verbose_console_reporter_has_no_spinner() {
        let mut reporter = ConsoleReporter::new(true, false);
        assert!(reporter.spinner.is_none());
        reporter.finish();
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1), "file");
        assert_eq!(plural(0), "files");
        assert_eq!(plural(2), "files");
    }
}
