//! Shared helpers for the integration tests: a recording observer and a
//! recording exporter.

#![allow(dead_code)]

use tested::{ExportStopped, ExportedCase, Exporter, Observer, Outcome, StartedCase};

/// Remembers every observer call as a short line of text.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<String>,
    /// The `cases` argument of each group start.
    pub group_sizes: Vec<usize>,
}

impl Recorder {
    /// Names of the cases that started, in order.
    pub fn started(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| e.strip_prefix("start "))
            .map(str::to_owned)
            .collect()
    }
}

impl Observer for Recorder {
    fn on_group_start(&mut self, name: &str, cases: usize) {
        self.events.push(format!("group {name}"));
        self.group_sizes.push(cases);
    }

    fn on_case_start(&mut self, case: &StartedCase) {
        self.events.push(format!("start {}", case.name));
    }

    fn on_case_done(&mut self, outcome: Outcome, message: Option<&str>) {
        match message {
            Some(message) => self.events.push(format!("done {} {}", outcome.as_str(), message)),
            None => self.events.push(format!("done {}", outcome.as_str())),
        }
    }
}

/// Collects `group/name#ordinal` lines; can stop after `limit` cases.
#[derive(Debug, Default)]
pub struct Listing {
    pub lines: Vec<String>,
    pub limit: Option<usize>,
    pub done: bool,
}

impl Exporter for Listing {
    fn on_group(&mut self, name: &str) -> Result<(), ExportStopped> {
        self.lines.push(format!("[{name}]"));
        Ok(())
    }

    fn on_case(&mut self, case: &ExportedCase) -> Result<(), ExportStopped> {
        let cases = self.lines.iter().filter(|l| !l.starts_with('[')).count();
        if self.limit.is_some_and(|limit| cases >= limit) {
            return Err(ExportStopped);
        }
        self.lines.push(format!("{}/{}#{}", case.group, case.name, case.ordinal));
        Ok(())
    }

    fn on_done(&mut self) {
        self.done = true;
    }
}
