//!
//! Default textual progress reporter.
//!
//! Pure presentation: a group header, a start line per case and a done line
//! carrying the outcome. The only state kept between calls is the most recently
//! started case, so the done line can repeat its ordinal and name.

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::runtime::{Observer, Outcome, StartedCase};

const RULE: &str = "-----------------------------------------------------------------------";

/// Presentation settings for the console reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReporterConfig {
    pub use_colors: bool,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl ReporterConfig {
    pub fn color_choice(&self) -> ColorChoice {
        if self.use_colors {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        }
    }
}

/// Writes run progress to any [`WriteColor`] sink.
pub struct Reporter<W> {
    out: W,
    current: Option<StartedCase>,
}

pub type StdoutReporter = Reporter<StandardStream>;

impl Reporter<StandardStream> {
    pub fn stdout(config: &ReporterConfig) -> Self {
        Self::new(StandardStream::stdout(config.color_choice()))
    }
}

impl<W: WriteColor> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, current: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn outcome_color(outcome: Outcome) -> Color {
        match outcome {
            Outcome::Passed => Color::Green,
            Outcome::Failed => Color::Red,
            Outcome::Skipped => Color::Yellow,
        }
    }
}

// Write errors are ignored: an observer must not fail the run.
impl<W: WriteColor> Observer for Reporter<W> {
    fn on_group_start(&mut self, name: &str, _cases: usize) {
        let _ = self.out.set_color(ColorSpec::new().set_bold(true));
        let _ = writeln!(self.out, "\n{} [group]", name);
        let _ = self.out.reset();
        let _ = writeln!(self.out, "{}\n", RULE);
    }

    fn on_case_start(&mut self, case: &StartedCase) {
        self.current = Some(*case);
        let _ = writeln!(self.out, "{:02}:{}...", case.ordinal, case.name);
    }

    fn on_case_done(&mut self, outcome: Outcome, message: Option<&str>) {
        if let Some(message) = message.filter(|m| !m.is_empty()) {
            match outcome {
                Outcome::Failed => {
                    let _ = writeln!(self.out, "Case failed: {}", message);
                }
                Outcome::Skipped => {
                    let _ = writeln!(self.out, "Case skipped: {}", message);
                }
                Outcome::Passed => {}
            }
        }

        let (ordinal, name) = self.current.map_or((0, "?"), |case| (case.ordinal, case.name));
        let _ = write!(self.out, "{:02}:{} ", ordinal, name);
        let _ = self
            .out
            .set_color(ColorSpec::new().set_fg(Some(Self::outcome_color(outcome))).set_bold(true));
        let _ = write!(self.out, "{}", outcome.as_str());
        let _ = self.out.reset();
        let _ = writeln!(self.out);
    }
}
