pub use crate::case::{CaseFn, CaseResult, Ordinal, Runtime};
pub use crate::errors::{DiscoveryFailure, TestedError};
pub use crate::filter::Filter;
pub use crate::report::{Reporter, ReporterConfig, StdoutReporter};
pub use crate::runtime::{Observer, Outcome, StartedCase};
pub use crate::signal::{Message, Signal};
pub use crate::storage::{Group, Storage};
pub use crate::subset::{ExportStopped, ExportedCase, Exporter, RunInfo, Subset};

pub mod case;
pub mod cli;
pub mod collector;
pub mod demo;
pub mod errors;
pub mod filter;
pub mod report;
pub mod runtime;
pub mod signal;
pub mod storage;
pub mod subset;
pub mod walk;
