use ftorg::cli::run_cli;
use ftorg::logging;
use ftorg::output::OutputFormatter;
use std::env;
use std::ffi::OsString;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<OsString> = env::args_os().skip(1).collect();

    let log_path = logging::default_log_path();
    let debug = env::var_os("FTORG_DEBUG").is_some();
    if let Err(e) = logging::init(&log_path, debug) {
        OutputFormatter::warning(&format!(
            "Could not open log file {}: {}",
            log_path.display(),
            e
        ));
    }

    match run_cli(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            tracing::error!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
