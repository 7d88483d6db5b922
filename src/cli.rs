//!
//! This module is the entry point for the `tested` demonstration binary. It
//! links the demonstration groups, selects a subset from the arguments, runs
//! or lists it, and maps the result to a process exit code.

pub mod args;
pub mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::{
    demo,
    errors::TestedError,
    report::{ReporterConfig, StdoutReporter},
    storage::Storage,
    subset::Subset,
};

pub use args::TestedArgs;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "TESTED_LOG";

/// Process exit codes. Usage errors are reported by clap with code 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetCode {
    Ok = 0,
    TestsFailed = 1,
    FailedToStart = 3,
}

impl RetCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() -> RetCode {
    let args = TestedArgs::parse();
    init_logging();

    let mut storage = Storage::instance();
    demo::link_all(&mut storage);
    execute(&storage, &args)
}

/// Runs (or lists) the subset of `storage` selected by `args`.
pub fn execute(storage: &Storage, args: &TestedArgs) -> RetCode {
    let config = args.reporter_config();
    let subset = select(storage, args);

    if args.list {
        return list(&subset);
    }

    output::print_banner(&describe(args));
    let mut reporter = StdoutReporter::stdout(&config);
    match subset.run(Some(&mut reporter)) {
        Ok(stats) => {
            output::print_summary(&stats, &config);
            if stats.is_failed() {
                RetCode::TestsFailed
            } else {
                RetCode::Ok
            }
        }
        Err(error) => report_error(error, &config),
    }
}

/// Installs a stderr `tracing` subscriber filtered by [`LOG_ENV`].
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn select<'r>(storage: &'r Storage, args: &TestedArgs) -> Subset<'r> {
    let all = storage.get_all();
    match (&args.group, &args.case, args.ordinal) {
        (Some(group), Some(case), _) => all.by_case_name(group, case),
        (Some(group), None, Some(ordinal)) => all.by_case_ordinal(group, ordinal),
        (Some(group), None, None) => all.by_group_name(group),
        (None, _, _) => all,
    }
}

fn describe(args: &TestedArgs) -> String {
    match (&args.group, &args.case, args.ordinal) {
        (Some(group), Some(case), _) => format!("case '{}' of group '{}'", case, group),
        (Some(group), None, Some(ordinal)) => format!("case #{} of group '{}'", ordinal, group),
        (Some(group), None, None) => format!("group '{}'", group),
        (None, _, _) => "all registered tests".to_string(),
    }
}

fn list(subset: &Subset<'_>) -> RetCode {
    let mut exporter = output::ListExporter::default();
    match subset.export(&mut exporter) {
        Ok(()) => RetCode::Ok,
        Err(error) => report_error(error, &ReporterConfig { use_colors: false }),
    }
}

fn report_error(error: TestedError, config: &ReporterConfig) -> RetCode {
    match error {
        TestedError::Discovery(_) => {
            output::print_error(error);
            RetCode::FailedToStart
        }
        TestedError::ProcessCorrupted { stats, .. } => {
            output::print_summary(&stats, config);
            output::print_error(error);
            RetCode::TestsFailed
        }
    }
}
