//!
//! Case dispatch.
//!
//! The dispatcher is the runtime a case body talks to during a real run.
//! Its announce answers `Filtered` for names the active filters exclude and
//! otherwise reports the case start to the [`Observer`] and lets the body run.
//!
//! Outcome handling is a containment boundary: assertion failures, skips,
//! unexpected signals and panics are recorded and the run moves on. Only
//! [`Signal::ProcessCorrupted`] escapes, annotated with where it came from.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::case::{CaseResult, Ordinal, Runtime};
use crate::errors::TestedError;
use crate::filter::Filter;
use crate::signal::Signal;
use crate::storage::{CaseNode, GroupNode};
use crate::subset::RunInfo;

const UNKNOWN_ERROR: &str = "unknown error";
const UNNAMED: &str = "<unnamed>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Passed,
    Failed,
    Skipped,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Passed => "PASSED",
            Outcome::Failed => "FAILED",
            Outcome::Skipped => "SKIPPED",
        }
    }
}

/// Identity of a case as it announced itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartedCase {
    pub name: &'static str,
    pub description: Option<&'static str>,
    pub ordinal: Ordinal,
}

/// Receives progress of a run. Every method may be called any number of
/// times, including zero, and must not fail.
pub trait Observer {
    fn on_group_start(&mut self, name: &str, cases: usize);
    fn on_case_start(&mut self, case: &StartedCase);
    fn on_case_done(&mut self, outcome: Outcome, message: Option<&str>);
}

// ============================================================================
// DISPATCHER
// ============================================================================

pub(crate) struct Dispatcher<'o, 'f> {
    observer: &'o mut dyn Observer,
    filters: &'f [Filter],
    group: Option<(&'static str, &'static str)>,
    ordinal: Ordinal,
    started: Option<StartedCase>,
    stats: RunInfo,
}

impl Runtime for Dispatcher<'_, '_> {
    fn start(&mut self, name: &'static str, description: Option<&'static str>) -> CaseResult {
        if !self.filters.iter().all(|f| f.matches_name(name)) {
            return Err(Signal::Filtered);
        }
        let case = StartedCase {
            name,
            description,
            ordinal: self.ordinal,
        };
        self.started = Some(case);
        self.observer.on_case_start(&case);
        Ok(())
    }
}

impl<'o, 'f> Dispatcher<'o, 'f> {
    pub(crate) fn new(observer: &'o mut dyn Observer, filters: &'f [Filter]) -> Self {
        Self {
            observer,
            filters,
            group: None,
            ordinal: 0,
            started: None,
            stats: RunInfo::default(),
        }
    }

    pub(crate) fn start_group(&mut self, group: &GroupNode, cases: usize) {
        self.group = Some((group.name, group.file));
        self.observer.on_group_start(group.name, cases);
    }

    /// Executes one case and folds its outcome into the statistics.
    ///
    /// Returns an error only for a process-corrupted case.
    pub(crate) fn run_one_case(&mut self, node: &CaseNode) -> Result<(), TestedError> {
        self.ordinal = node.ordinal;
        self.started = None;
        let case = node.case;

        let result = panic::catch_unwind(AssertUnwindSafe(|| case(&mut *self)));
        tracing::trace!(ordinal = node.ordinal, ?result, "case returned");

        match result {
            Ok(Ok(())) => self.finish(Outcome::Passed, None),
            Ok(Err(Signal::Skipped)) => self.finish(Outcome::Skipped, None),
            Ok(Err(Signal::Filtered)) => {}
            Ok(Err(Signal::Failed(message))) => {
                self.finish(Outcome::Failed, Some(message.as_str()))
            }
            Ok(Err(Signal::ProcessCorrupted(message))) => {
                let (group, file) = self.group.unwrap_or(("", ""));
                let case = self.started.map_or(UNNAMED, |case| case.name);
                tracing::debug!(
                    group,
                    ordinal = node.ordinal,
                    case,
                    "process corrupted; aborting run"
                );
                return Err(TestedError::ProcessCorrupted {
                    group,
                    file,
                    ordinal: node.ordinal,
                    case,
                    message,
                    stats: self.stats,
                });
            }
            Ok(Err(_)) => self.finish(Outcome::Failed, Some(UNKNOWN_ERROR)),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                self.finish(Outcome::Failed, Some(message.unwrap_or(UNKNOWN_ERROR)));
            }
        }
        Ok(())
    }

    pub(crate) fn into_stats(self) -> RunInfo {
        self.stats
    }

    fn finish(&mut self, outcome: Outcome, message: Option<&str>) {
        // Keep start/done balanced for bodies that bailed out before announcing.
        if self.started.is_none() {
            let case = StartedCase {
                name: UNNAMED,
                description: None,
                ordinal: self.ordinal,
            };
            self.started = Some(case);
            self.observer.on_case_start(&case);
        }
        self.observer.on_case_done(outcome, message);
        match outcome {
            Outcome::Passed => self.stats.passed += 1,
            Outcome::Skipped => self.stats.skipped += 1,
            Outcome::Failed => self.stats.failed += 1,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> Option<&str> {
    if let Some(text) = payload.downcast_ref::<&'static str>() {
        return Some(*text);
    }
    payload.downcast_ref::<String>().map(String::as_str)
}
