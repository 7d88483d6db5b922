//!
//! The user-facing selection of tests.
//!
//! A [`Subset`] pairs a registry view with the filters narrowing it. It can
//! [`run`](Subset::run) the selected cases or [`export`](Subset::export) them
//! without running any assertion.
//!
//! ```rust
//! use tested::{Filter, Storage};
//!
//! let storage = Storage::new();
//! let math = storage.get_all().by_group_name("math");
//! let addition = math.narrow(Filter::by_case_name("math", "Addition"));
//! assert_eq!(addition.filters().len(), 2);
//! ```

use thiserror::Error;

use crate::case::{CaseFn, Ordinal};
use crate::collector::{self, Probe};
use crate::errors::{DiscoveryFailure, TestedError};
use crate::filter::Filter;
use crate::report::StdoutReporter;
use crate::runtime::{Dispatcher, Observer};
use crate::signal::Message;
use crate::storage::{GroupNode, Storage};
use crate::walk::{Event, Walk};

const BECAME_STUB: &str = "case became a stub after discovery";

/// Totals of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RunInfo {
    pub passed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunInfo {
    pub fn is_failed(&self) -> bool {
        self.failed != 0
    }

    pub fn is_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn total(&self) -> usize {
        self.passed + self.skipped + self.failed
    }
}

// ============================================================================
// EXPORT CONTRACT
// ============================================================================

/// Returned by an [`Exporter`] to stop the traversal early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("export stopped")]
pub struct ExportStopped;

/// A case as reported by [`Subset::export`].
#[derive(Debug, Clone, Copy)]
pub struct ExportedCase {
    pub group: &'static str,
    pub name: &'static str,
    pub description: Option<&'static str>,
    pub ordinal: Ordinal,
    pub case: CaseFn,
}

/// Receives the cases of a subset without running them.
pub trait Exporter {
    fn on_group(&mut self, name: &str) -> Result<(), ExportStopped>;
    fn on_case(&mut self, case: &ExportedCase) -> Result<(), ExportStopped>;
    /// Called once after a complete traversal; skipped when stopped early.
    fn on_done(&mut self);
}

// ============================================================================
// SUBSET
// ============================================================================

#[derive(Debug, Clone)]
pub struct Subset<'r> {
    storage: &'r Storage,
    filters: Vec<Filter>,
}

impl<'r> Subset<'r> {
    pub(crate) fn new(storage: &'r Storage) -> Self {
        Self {
            storage,
            filters: Vec::new(),
        }
    }

    /// A copy of this subset further restricted by `filter`.
    ///
    /// Earlier filters stay in force, so the result never selects more than
    /// `self` does.
    pub fn narrow(&self, filter: Filter) -> Subset<'r> {
        let mut filters = self.filters.clone();
        if filter != Filter::None {
            filters.push(filter);
        }
        Subset {
            storage: self.storage,
            filters,
        }
    }

    pub fn by_group_name(&self, group: &str) -> Subset<'r> {
        self.narrow(Filter::by_group(group))
    }

    pub fn by_case_name(&self, group: &str, case: &str) -> Subset<'r> {
        self.narrow(Filter::by_case_name(group, case))
    }

    pub fn by_case_ordinal(&self, group: &str, ordinal: Ordinal) -> Subset<'r> {
        self.narrow(Filter::by_case_ordinal(group, ordinal))
    }

    pub fn by_address(&self, address: &str) -> Subset<'r> {
        self.narrow(Filter::by_address(address))
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn storage(&self) -> &'r Storage {
        self.storage
    }

    /// Lazy event stream over the selected groups and cases.
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(self.storage, &self.filters)
    }

    /// Runs every selected case.
    ///
    /// A recorded discovery failure is returned without running anything.
    /// With no observer, progress goes to a [`StdoutReporter`].
    pub fn run(&self, observer: Option<&mut dyn Observer>) -> Result<RunInfo, TestedError> {
        if let Some(failure) = self.storage.failure() {
            return Err(TestedError::Discovery(failure.clone()));
        }

        let mut fallback;
        let observer: &mut dyn Observer = match observer {
            Some(observer) => observer,
            None => {
                fallback = StdoutReporter::stdout(&Default::default());
                &mut fallback
            }
        };

        let mut dispatcher = Dispatcher::new(observer, &self.filters);
        let mut walk = self.walk();
        let mut started = false;
        loop {
            match walk.advance() {
                Event::GroupStart { group, cases } => {
                    let cases = self.runnable_cases(group, cases);
                    started = cases > 0;
                    if started {
                        tracing::debug!(group = group.name, cases, "starting group");
                        dispatcher.start_group(group, cases);
                    }
                }
                Event::Case(case) if started => dispatcher.run_one_case(case)?,
                Event::Case(_) => {}
                Event::Done => break,
            }
        }

        let stats = dispatcher.into_stats();
        tracing::debug!(?stats, "run finished");
        Ok(stats)
    }

    /// Reports every selected case to `exporter` without running it.
    ///
    /// Each case is probed again to learn its announced name. Anything other
    /// than an announce (or a filtered name) is a discovery failure for that
    /// case and ends the export.
    pub fn export(&self, exporter: &mut dyn Exporter) -> Result<(), TestedError> {
        if let Some(failure) = self.storage.failure() {
            return Err(TestedError::Discovery(failure.clone()));
        }

        let mut walk = self.walk();
        let mut current: Option<&GroupNode> = None;
        let mut announced = false;
        loop {
            let node = match walk.advance() {
                Event::GroupStart { group, .. } => {
                    current = Some(group);
                    announced = false;
                    continue;
                }
                Event::Case(node) => node,
                Event::Done => break,
            };
            let Some(group) = current else { continue };

            let probed = collector::probe(node.case, node.ordinal, &self.filters);
            let (name, description) = match probed {
                Probe::Real { name, description } => (name, description),
                Probe::Filtered => continue,
                Probe::Stub => {
                    return Err(export_failure(group, node.ordinal, BECAME_STUB));
                }
                Probe::Malformed(message) => {
                    return Err(export_failure(group, node.ordinal, &message));
                }
            };

            if !announced {
                announced = true;
                if exporter.on_group(group.name).is_err() {
                    tracing::debug!(group = group.name, "export stopped by exporter");
                    return Ok(());
                }
            }
            let exported = ExportedCase {
                group: group.name,
                name,
                description,
                ordinal: node.ordinal,
                case: node.case,
            };
            if exporter.on_case(&exported).is_err() {
                tracing::debug!(group = group.name, case = name, "export stopped by exporter");
                return Ok(());
            }
        }

        exporter.on_done();
        Ok(())
    }

    /// How many of `group`'s ordinal-matching cases survive the name filters.
    ///
    /// Only probes when a name filter is active; otherwise `walked` is exact.
    /// Cases that misbehave under the probe still count, since the run reports
    /// them.
    fn runnable_cases(&self, group: &GroupNode, walked: usize) -> usize {
        if !self.filters.iter().any(Filter::constrains_name) {
            return walked;
        }
        self.storage
            .cases_of(group)
            .filter(|case| self.filters.iter().all(|f| f.matches_ordinal(case.ordinal)))
            .filter(|case| {
                collector::probe(case.case, case.ordinal, &self.filters) != Probe::Filtered
            })
            .count()
    }
}

fn export_failure(group: &GroupNode, ordinal: Ordinal, message: &str) -> TestedError {
    TestedError::Discovery(DiscoveryFailure {
        group: group.name,
        file: group.file,
        ordinal,
        message: Message::new(message),
    })
}
