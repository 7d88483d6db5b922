//!
//! Errors surfaced to the caller of a run or an export.
//!
//! Only two conditions ever escape the framework: a registry whose discovery
//! failed, and a case that declared the process corrupted. Assertion failures,
//! skips and filtered cases are bookkeeping and end up in [`RunInfo`].

use miette::Diagnostic;
use thiserror::Error;

use crate::case::{Message, Ordinal};
use crate::subset::RunInfo;

/// A slot that broke the announce protocol, annotated with where it lives.
///
/// Recorded once per registry: the first failure wins and shadows every later
/// run until it is cleared.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{message} (group '{group}' in {file}, case #{ordinal})")]
#[diagnostic(
    code(tested::discovery::failed),
    help("a case body must call `start_case` before doing anything else")
)]
pub struct DiscoveryFailure {
    pub group: &'static str,
    pub file: &'static str,
    pub ordinal: Ordinal,
    pub message: Message,
}

#[derive(Debug, Error, Diagnostic)]
pub enum TestedError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Discovery(#[from] DiscoveryFailure),

    #[error("process corrupted in case #{ordinal} '{case}' of group '{group}' ({file}): {message}")]
    #[diagnostic(
        code(tested::run::process_corrupted),
        help("the run was aborted; cases after this one were not executed")
    )]
    ProcessCorrupted {
        group: &'static str,
        file: &'static str,
        ordinal: Ordinal,
        case: &'static str,
        message: Message,
        /// Statistics gathered before the run was aborted.
        stats: RunInfo,
    },
}

impl TestedError {
    /// Partial statistics, when the error interrupted a run that had started.
    pub fn partial_stats(&self) -> Option<RunInfo> {
        match self {
            TestedError::ProcessCorrupted { stats, .. } => Some(*stats),
            TestedError::Discovery(_) => None,
        }
    }
}
