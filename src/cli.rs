//! Command-line interface module for ftorg.
//!
//! This module handles all CLI-related functionality including:
//! - Recognizing the `-flag` and `/flag` argument styles
//! - Turning the raw argument list into a structured [`Invocation`]
//! - Resolving the run configuration and driving the organizer
//!
//! Raw arguments go through a small state machine that knows which flags
//! take one value and which consume the rest of the list. Its output is a
//! normalized `--long=value` argument list that clap validates and types.

use crate::config::{FileConfig, RunConfig, default_config_path};
use crate::file_organizer::{OrganizeError, OrganizeOptions, RunSummary, organize};
use crate::output::{ConsoleReporter, OutputFormatter};
use clap::Parser;
use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Usage text printed for `-h` and when no arguments are given.
pub const USAGE: &str = "
Usage: ftorg [options]

Options:
  -path /path        Directory to organize (required)
  -ex   /ex          Exclude the listed file types, e.g. -ex jpg png (takes the rest of the arguments)
  -i    /i           Include only the listed file types, e.g. -i docx pdf (takes the rest of the arguments)
  -r    /r           Recursion on or off (default on)
  -v    /v           Verbose mode, print every decision
  -d    /d           Dry run, show what would be done without making changes
  -c    /c           Use a custom config file (default config.toml next to the executable)
  -h /h -help /help  Display this help message
";

/// Message printed and logged after a completed run.
pub const SUCCESS_MESSAGE: &str = "Files organized successfully.";

/// Errors that stop a run.
#[derive(Debug, Error)]
pub enum CliError {
    /// A flag that needs a value was the last argument.
    #[error("{flag} requires a value: {what} not specified")]
    MissingValue { flag: String, what: &'static str },

    #[error("No path specified. Use -path or /path to specify the directory.")]
    MissingPath,

    /// The normalized arguments were rejected by the parser.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Organize(#[from] OrganizeError),
}

impl CliError {
    /// Usage errors happen before anything touches the filesystem.
    pub fn is_usage_error(&self) -> bool {
        !matches!(self, CliError::Organize(_))
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        if self.is_usage_error() { 2 } else { 1 }
    }
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print usage and exit successfully.
    Help,
    /// Organize a directory.
    Organize(Invocation),
}

/// Structured form of the organize arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub path: PathBuf,
    pub exclude: Vec<String>,
    pub include: Vec<String>,
    pub recursive: bool,
    pub verbose: bool,
    pub dry_run: bool,
    pub config_path: Option<PathBuf>,
}

/// Normalized arguments, validated and typed by clap.
#[derive(Parser, Debug)]
#[command(name = "ftorg", no_binary_name = true, disable_help_flag = true)]
#[command(args_override_self = true)]
struct Cli {
    #[arg(long)]
    path: Option<PathBuf>,

    #[arg(long = "exclude", num_args = 1, allow_hyphen_values = true)]
    exclude: Vec<String>,

    #[arg(long = "include", num_args = 1, allow_hyphen_values = true)]
    include: Vec<String>,

    #[arg(long, action = clap::ArgAction::Set, value_parser = parse_switch, default_value = "on")]
    recursive: bool,

    #[arg(long)]
    verbose: bool,

    #[arg(long = "dry-run")]
    dry_run: bool,

    #[arg(long)]
    config: Option<PathBuf>,
}

/// Anything other than `on` (any case) turns the switch off.
fn parse_switch(value: &str) -> Result<bool, String> {
    Ok(value.trim().eq_ignore_ascii_case("on"))
}

/// How a recognized flag uses the arguments after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arity {
    Switch,
    Value(&'static str),
    Rest,
}

/// Maps a raw flag in either prefix style to its long name and arity.
fn lookup_flag(raw: &str) -> Option<(&'static str, Arity)> {
    let name = raw.strip_prefix('-').or_else(|| raw.strip_prefix('/'))?;
    let flag = match name {
        "path" => ("path", Arity::Value("Path")),
        "ex" => ("exclude", Arity::Rest),
        "i" => ("include", Arity::Rest),
        "r" => ("recursive", Arity::Value("Recursion setting")),
        "v" => ("verbose", Arity::Switch),
        "d" => ("dry-run", Arity::Switch),
        "c" => ("config", Arity::Value("Config file")),
        _ => return None,
    };
    Some(flag)
}

fn is_help_flag(arg: &str) -> bool {
    matches!(arg, "-h" | "/h" | "-help" | "/help")
}

/// Rewrites raw arguments into `--long[=value]` form.
///
/// Values taken by a flag are never looked at as flags themselves, and a
/// rest-consuming flag ends the scan. Unknown tokens are dropped with a
/// warning in the log. Values are passed through as raw OS strings, so paths
/// that are not valid UTF-8 survive.
fn normalize<S: AsRef<OsStr>>(args: &[S]) -> Result<Vec<OsString>, CliError> {
    let mut normalized = Vec::new();
    let mut rest = args.iter().map(AsRef::as_ref);

    while let Some(arg) = rest.next() {
        let Some((long, arity)) = arg.to_str().and_then(lookup_flag) else {
            tracing::warn!("Ignoring unrecognized argument: {}", arg.to_string_lossy());
            continue;
        };

        match arity {
            Arity::Switch => normalized.push(OsString::from(format!("--{}", long))),
            Arity::Value(what) => {
                let value = rest.next().ok_or_else(|| CliError::MissingValue {
                    flag: arg.to_string_lossy().to_string(),
                    what,
                })?;
                normalized.push(long_option(long, value));
            }
            Arity::Rest => {
                let values: Vec<&OsStr> = rest.by_ref().collect();
                if values.is_empty() {
                    return Err(CliError::MissingValue {
                        flag: arg.to_string_lossy().to_string(),
                        what: "File types",
                    });
                }
                normalized.extend(values.into_iter().map(|v| long_option(long, v)));
            }
        }
    }

    Ok(normalized)
}

fn long_option(long: &str, value: &OsStr) -> OsString {
    let mut option = OsString::from(format!("--{}=", long));
    option.push(value);
    option
}

/// Parses raw command-line arguments (without the program name).
///
/// # Examples
///
/// ```
/// use ftorg::cli::{parse_args, Command};
///
/// let args: Vec<String> = ["/path", "photos", "-d", "-ex", "tmp", "bak"]
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
///
/// match parse_args(&args).unwrap() {
///     Command::Organize(invocation) => {
///         assert!(invocation.dry_run);
///         assert_eq!(invocation.exclude, vec!["TMP", "BAK"]);
///     }
///     Command::Help => unreachable!(),
/// }
/// ```
pub fn parse_args<S: AsRef<OsStr>>(args: &[S]) -> Result<Command, CliError> {
    let wants_help = args
        .iter()
        .any(|arg| arg.as_ref().to_str().is_some_and(is_help_flag));
    if args.is_empty() || wants_help {
        return Ok(Command::Help);
    }

    let normalized = normalize(args)?;
    let cli =
        Cli::try_parse_from(normalized).map_err(|e| CliError::InvalidArguments(e.to_string()))?;
    let path = cli.path.ok_or(CliError::MissingPath)?;

    Ok(Command::Organize(Invocation {
        path: normalize_path(&path),
        exclude: uppercase_all(cli.exclude),
        include: uppercase_all(cli.include),
        recursive: cli.recursive,
        verbose: cli.verbose,
        dry_run: cli.dry_run,
        config_path: cli.config,
    }))
}

fn uppercase_all(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_uppercase())
        .collect()
}

/// Lexically removes `.` segments and redundant separators.
fn normalize_path(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Parses arguments and runs the resulting command.
///
/// Returns `Ok(None)` when only help was printed.
pub fn run_cli<S: AsRef<OsStr>>(args: &[S]) -> Result<Option<RunSummary>, CliError> {
    match parse_args(args)? {
        Command::Help => {
            OutputFormatter::plain(USAGE);
            Ok(None)
        }
        Command::Organize(invocation) => {
            let config_path = invocation
                .config_path
                .clone()
                .unwrap_or_else(default_config_path);
            let file_config = FileConfig::load(&config_path);
            let run_config = resolve(&invocation, &file_config);
            run_organize(&run_config).map(Some)
        }
    }
}

/// Builds the run configuration from parsed arguments and the config file.
pub fn resolve(invocation: &Invocation, file_config: &FileConfig) -> RunConfig {
    RunConfig::resolve(
        invocation.path.clone(),
        &invocation.exclude,
        &invocation.include,
        file_config,
        OrganizeOptions {
            recursive: invocation.recursive,
            dry_run: invocation.dry_run,
        },
        invocation.verbose,
    )
}

/// Organizes the configured directory, printing progress and a summary.
pub fn run_organize(config: &RunConfig) -> Result<RunSummary, CliError> {
    let started = chrono::Local::now();
    let dry_run = config.options.dry_run;

    tracing::info!(
        "Run started {} on {} (recursive: {}, dry run: {})",
        started.format("%Y-%m-%d %H:%M:%S"),
        config.root.display(),
        config.options.recursive,
        dry_run
    );
    if dry_run {
        OutputFormatter::dry_run_notice(&format!(
            "Analyzing contents of: {}",
            config.root.display()
        ));
    } else {
        OutputFormatter::info(&format!("Organizing contents of: {}", config.root.display()));
    }

    let mut reporter = ConsoleReporter::new(config.verbose, dry_run);
    let result = organize(&config.root, &config.filters, config.options, &mut reporter);
    reporter.finish();
    let summary = result?;

    OutputFormatter::run_summary(&summary, dry_run);
    if dry_run {
        OutputFormatter::dry_run_notice("No files were modified.");
    }
    OutputFormatter::success(SUCCESS_MESSAGE);
    tracing::info!(
        "{} {} moved, {} skipped, {} failed",
        SUCCESS_MESSAGE,
        summary.moved,
        summary.skipped(),
        summary.failures
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn organize_invocation(raw: &[&str]) -> Invocation {
        match parse_args(&args(raw)).expect("parse failed") {
            Command::Organize(invocation) => invocation,
            Command::Help => panic!("expected organize command"),
        }
    }

    #[test]
    fn test_no_args_prints_help() {
        assert_eq!(
            parse_args::<String>(&[]).expect("parse failed"),
            Command::Help
        );
    }

    #[test]
    fn test_help_anywhere_wins() {
        for flag in ["-h", "/h", "-help", "/help"] {
            let parsed = parse_args(&args(&["-path", "x", "-ex", "jpg", flag]));
            assert_eq!(parsed.expect("parse failed"), Command::Help);
        }
    }

    #[test]
    fn test_both_prefix_styles() {
        let dash = organize_invocation(&["-path", "data", "-v", "-d", "-r", "off", "-c", "a.toml"]);
        let slash = organize_invocation(&["/path", "data", "/v", "/d", "/r", "off", "/c", "a.toml"]);

        assert_eq!(dash, slash);
        assert_eq!(dash.path, PathBuf::from("data"));
        assert!(dash.verbose);
        assert!(dash.dry_run);
        assert!(!dash.recursive);
        assert_eq!(dash.config_path, Some(PathBuf::from("a.toml")));
    }

    #[test]
    fn test_defaults() {
        let invocation = organize_invocation(&["-path", "data"]);
        assert!(invocation.recursive);
        assert!(!invocation.verbose);
        assert!(!invocation.dry_run);
        assert!(invocation.exclude.is_empty());
        assert!(invocation.include.is_empty());
        assert_eq!(invocation.config_path, None);
    }

    #[test]
    fn test_recursion_switch_values() {
        assert!(organize_invocation(&["-path", "d", "-r", "ON"]).recursive);
        assert!(!organize_invocation(&["-path", "d", "-r", "no"]).recursive);
    }

    #[test]
    fn test_exclude_consumes_rest() {
        let invocation = organize_invocation(&["-path", "d", "-ex", "jpg", " png", "-v"]);
        assert_eq!(invocation.exclude, vec!["JPG", "PNG", "-V"]);
        assert!(!invocation.verbose);
    }

    #[test]
    fn test_include_consumes_rest() {
        let invocation = organize_invocation(&["/path", "d", "/i", "docx", "pdf"]);
        assert_eq!(invocation.include, vec!["DOCX", "PDF"]);
        assert!(invocation.exclude.is_empty());
    }

    #[test]
    fn test_value_is_not_read_as_flag() {
        let invocation = organize_invocation(&["-path", "-v"]);
        assert_eq!(invocation.path, PathBuf::from("-v"));
        assert!(!invocation.verbose);
    }

    #[test]
    fn test_missing_values() {
        for raw in [
            &["-v", "-path"][..],
            &["-path", "d", "-r"][..],
            &["-path", "d", "/c"][..],
            &["-path", "d", "-ex"][..],
            &["-path", "d", "/i"][..],
        ] {
            let err = parse_args(&args(raw)).expect_err("should fail");
            assert!(matches!(err, CliError::MissingValue { .. }), "{:?}", raw);
            assert_eq!(err.exit_code(), 2);
        }
    }

    #[test]
    fn test_missing_path() {
        let err = parse_args(&args(&["-v", "-d"])).expect_err("should fail");
        assert!(matches!(err, CliError::MissingPath));
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_unknown_tokens_are_ignored() {
        let invocation = organize_invocation(&["stray", "-path", "d", "--bogus"]);
        assert_eq!(invocation.path, PathBuf::from("d"));
    }

    #[test]
    fn test_repeated_path_last_wins() {
        let invocation = organize_invocation(&["-path", "first", "-path", "second"]);
        assert_eq!(invocation.path, PathBuf::from("second"));
    }

    #[test]
    fn test_path_is_normalized() {
        let invocation = organize_invocation(&["-path", "./data/./photos"]);
        assert_eq!(invocation.path, PathBuf::from("data/photos"));
        assert_eq!(organize_invocation(&["-path", "."]).path, PathBuf::from("."));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_is_kept() {
        use std::os::unix::ffi::OsStrExt;

        let path = OsStr::from_bytes(b"/tmp/x\xff");
        let raw = [OsStr::new("-d"), OsStr::new("-path"), path];
        match parse_args(&raw).expect("parse failed") {
            Command::Organize(invocation) => {
                assert_eq!(invocation.path, PathBuf::from(path));
                assert!(invocation.dry_run);
            }
            Command::Help => panic!("expected organize command"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_stray_token_is_ignored() {
        use std::os::unix::ffi::OsStrExt;

        let stray = OsStr::from_bytes(b"-\xff");
        let raw = [stray, OsStr::new("-path"), OsStr::new("d")];
        match parse_args(&raw).expect("parse failed") {
            Command::Organize(invocation) => assert_eq!(invocation.path, PathBuf::from("d")),
            Command::Help => panic!("expected organize command"),
        }
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let err = parse_args(&args(&["-path", ""])).expect_err("should fail");
        assert!(matches!(err, CliError::InvalidArguments(_)));
    }
}
