//!
//! Lazy traversal of a filtered selection.
//!
//! [`Walk`] produces a flat event stream: one [`Event::GroupStart`] per visited
//! group, that group's [`Event::Case`] events, and finally [`Event::Done`].
//! Group filters are applied before any case of a group is looked at. A group
//! is only started if at least one of its cases survives the ordinal filter, so
//! observers never see empty groups.

use crate::filter::Filter;
use crate::storage::{CaseId, CaseNode, GroupId, GroupNode, Storage};

#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    /// A group is about to be visited; `cases` is how many of its cases
    /// passed the slot-level filters.
    GroupStart { group: &'a GroupNode, cases: usize },
    Case(&'a CaseNode),
    Done,
}

#[derive(Debug, Clone)]
pub struct Walk<'a> {
    storage: &'a Storage,
    filters: &'a [Filter],
    next_group: Option<GroupId>,
    cursor: Option<CaseId>,
    done: bool,
}

impl<'a> Walk<'a> {
    pub fn new(storage: &'a Storage, filters: &'a [Filter]) -> Self {
        Self {
            storage,
            filters,
            next_group: storage.head(),
            cursor: None,
            done: false,
        }
    }

    /// Rewinds to the first group.
    pub fn restart(&mut self) {
        self.next_group = self.storage.head();
        self.cursor = None;
        self.done = false;
    }

    /// Produces the next event. Once `Done` is returned, every later call
    /// returns `Done` again.
    pub fn advance(&mut self) -> Event<'a> {
        loop {
            if let Some(id) = self.cursor {
                let case = self.storage.case(id);
                self.cursor = case.next;
                if self.case_matches(case) {
                    return Event::Case(case);
                }
                continue;
            }

            if self.done {
                return Event::Done;
            }
            let Some(id) = self.next_group else {
                self.done = true;
                return Event::Done;
            };

            let group = self.storage.group(id);
            self.next_group = group.next;
            if !self.group_matches(group) {
                continue;
            }
            let cases = self
                .storage
                .cases_of(group)
                .filter(|case| self.case_matches(case))
                .count();
            if cases == 0 {
                continue;
            }
            self.cursor = group.head;
            return Event::GroupStart { group, cases };
        }
    }

    fn group_matches(&self, group: &GroupNode) -> bool {
        self.filters.iter().all(|f| f.matches_group(group.name))
    }

    fn case_matches(&self, case: &CaseNode) -> bool {
        self.filters.iter().all(|f| f.matches_ordinal(case.ordinal))
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Event::Done => None,
            event => Some(event),
        }
    }
}
