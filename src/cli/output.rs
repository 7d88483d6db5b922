//! Handles all user-facing output for the CLI.
//!
//! Run progress is printed by the reporter; this module prints what comes
//! before and after it: the banner, the totals, case listings and errors.

use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

use crate::errors::TestedError;
use crate::report::ReporterConfig;
use crate::subset::{ExportStopped, ExportedCase, Exporter, RunInfo};

const DOUBLE_RULE: &str = "=======================================================================";

// ============================================================================
// LISTING - exporter printing one line per case
// ============================================================================

/// Prints each exported case as `group/name #ordinal`.
#[derive(Debug, Default)]
pub struct ListExporter {
    pub groups: usize,
    pub cases: usize,
}

impl Exporter for ListExporter {
    fn on_group(&mut self, name: &str) -> Result<(), ExportStopped> {
        self.groups += 1;
        println!("{} [group]", name);
        Ok(())
    }

    fn on_case(&mut self, case: &ExportedCase) -> Result<(), ExportStopped> {
        self.cases += 1;
        match case.description {
            Some(description) => println!(
                "  {}/{} #{:02} - {}",
                case.group, case.name, case.ordinal, description
            ),
            None => println!("  {}/{} #{:02}", case.group, case.name, case.ordinal),
        }
        Ok(())
    }

    fn on_done(&mut self) {
        println!("\n{} cases in {} groups", self.cases, self.groups);
    }
}

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

pub fn print_banner(selection: &str) {
    println!("RunTest: run {}\n", selection);
}

/// Prints the totals of a (possibly interrupted) run.
pub fn print_summary(stats: &RunInfo, config: &ReporterConfig) {
    let mut stdout = StandardStream::stdout(config.color_choice());
    println!("\n{}", DOUBLE_RULE);
    println!("Test run completed:");
    print_count(&mut stdout, "Passed : ", stats.passed, Color::Green);
    print_count(&mut stdout, "Skipped: ", stats.skipped, Color::Yellow);
    print_count(&mut stdout, "Failed : ", stats.failed, Color::Red);
}

/// Renders an error through miette on stderr.
pub fn print_error(error: TestedError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn print_count(stdout: &mut StandardStream, label: &str, count: usize, color: Color) {
    print!("   {}", label);
    if count > 0 {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)));
    }
    println!("{}", count);
    let _ = stdout.reset();
}
