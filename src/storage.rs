//!
//! The registry of discovered groups.
//!
//! Groups and cases live in two arenas owned by [`Storage`]; links between them
//! are indices, so nothing is ever copied out or freed. A group is added once,
//! by [`Group::register`], and stays for as long as the storage does.
//!
//! ## Lifecycle
//! The process-wide registry returned by [`Storage::instance`] is created on
//! first access and never torn down. Every test module exposes an init entry
//! point that registers its group into it; runs happen afterwards.
//!
//! ## Sticky failure
//! The first discovery failure is kept and every later one is dropped. While a
//! failure is recorded, [`crate::Subset::run`] reports it instead of running
//! anything.

use std::sync::{Mutex, MutexGuard, PoisonError};

use lazy_static::lazy_static;

use crate::case::{CaseFn, Ordinal};
use crate::collector;
use crate::errors::DiscoveryFailure;
use crate::signal::{Message, Signal};
use crate::subset::Subset;

pub type GroupId = usize;
pub type CaseId = usize;

/// One discovered case.
#[derive(Debug, Clone, Copy)]
pub struct CaseNode {
    pub ordinal: Ordinal,
    pub case: CaseFn,
    pub next: Option<CaseId>,
}

/// A named group of cases declared by one module.
#[derive(Debug, Clone)]
pub struct GroupNode {
    pub name: &'static str,
    /// Source identifier of the declaring module, for diagnostics.
    pub file: &'static str,
    pub head: Option<CaseId>,
    pub next: Option<GroupId>,
}

lazy_static! {
    static ref INSTANCE: Mutex<Storage> = Mutex::new(Storage::new());
}

#[derive(Debug, Default)]
pub struct Storage {
    groups: Vec<GroupNode>,
    cases: Vec<CaseNode>,
    head: Option<GroupId>,
    tail: Option<GroupId>,
    failure: Option<DiscoveryFailure>,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    ///
    /// The guard must not be requested again from inside a case body while a
    /// run holds it; the lock is not reentrant.
    pub fn instance() -> MutexGuard<'static, Storage> {
        INSTANCE.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A view over every registered group, with no filter applied.
    pub fn get_all(&self) -> Subset<'_> {
        Subset::new(self)
    }

    /// Appends a fully discovered group after the current tail.
    pub fn add_group(&mut self, group: GroupNode) -> GroupId {
        self.groups.push(group);
        let id = self.groups.len() - 1;

        match self.tail {
            None => self.head = Some(id),
            Some(cached) => {
                let end = self.last_from(cached);
                self.groups[end].next = Some(id);
            }
        }
        self.tail = Some(self.last_from(id));
        id
    }

    /// Walks forward from `id` to the true end of the group sequence.
    fn last_from(&self, mut id: GroupId) -> GroupId {
        while let Some(next) = self.groups[id].next {
            id = next;
        }
        id
    }

    /// Records a discovery failure unless one is already recorded.
    ///
    /// First failure wins. Later failures are logged and dropped.
    pub fn add_collection_failure(&mut self, failure: DiscoveryFailure) {
        if let Some(existing) = &self.failure {
            tracing::warn!(
                group = failure.group,
                file = failure.file,
                ordinal = failure.ordinal,
                kept = existing.group,
                "dropping discovery failure; an earlier one is already recorded"
            );
            return;
        }
        tracing::debug!(
            group = failure.group,
            ordinal = failure.ordinal,
            "recording discovery failure"
        );
        self.failure = Some(failure);
    }

    pub fn failure(&self) -> Option<&DiscoveryFailure> {
        self.failure.as_ref()
    }

    /// Removes the sticky failure, making the registry runnable again.
    pub fn clear_failure(&mut self) -> Option<DiscoveryFailure> {
        self.failure.take()
    }

    pub fn head(&self) -> Option<GroupId> {
        self.head
    }

    pub fn group(&self, id: GroupId) -> &GroupNode {
        &self.groups[id]
    }

    pub fn case(&self, id: CaseId) -> &CaseNode {
        &self.cases[id]
    }

    /// Groups in registration order.
    pub fn groups(&self) -> impl Iterator<Item = &GroupNode> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let id = cursor?;
            let group = &self.groups[id];
            cursor = group.next;
            Some(group)
        })
    }

    /// Cases of `group` in declaration order.
    pub fn cases_of<'s>(&'s self, group: &GroupNode) -> impl Iterator<Item = &'s CaseNode> + 's {
        let mut cursor = group.head;
        std::iter::from_fn(move || {
            let id = cursor?;
            let case = &self.cases[id];
            cursor = case.next;
            Some(case)
        })
    }

    pub fn find_group(&self, name: &str, file: &str) -> Option<GroupId> {
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let group = &self.groups[id];
            if group.name == name && group.file == file {
                return Some(id);
            }
            cursor = group.next;
        }
        None
    }
}

// ============================================================================
// GROUP - registration entry point used by test modules
// ============================================================================

/// Registers test groups into a [`Storage`].
pub struct Group;

impl Group {
    /// Discovers the cases in `slots` and adds them as group `name`.
    ///
    /// Registering the same name and file twice is a no-op returning the
    /// existing group. A discovery failure is recorded on the storage instead
    /// of adding the group, and `None` is returned.
    pub fn register(
        name: &'static str,
        file: &'static str,
        slots: &[CaseFn],
        storage: &mut Storage,
    ) -> Option<GroupId> {
        if let Some(existing) = storage.find_group(name, file) {
            tracing::debug!(group = name, file, "group already registered");
            return Some(existing);
        }

        match collector::collect(slots, &mut storage.cases) {
            Ok(head) => {
                let id = storage.add_group(GroupNode {
                    name,
                    file,
                    head,
                    next: None,
                });
                let cases = storage.cases_of(storage.group(id)).count();
                tracing::debug!(group = name, file, cases, "registered group");
                Some(id)
            }
            Err(Signal::CollectionFailed { ordinal, message }) => {
                storage.add_collection_failure(DiscoveryFailure {
                    group: name,
                    file,
                    ordinal,
                    message,
                });
                None
            }
            Err(other) => {
                storage.add_collection_failure(DiscoveryFailure {
                    group: name,
                    file,
                    ordinal: -1,
                    message: Message::new(&format!(
                        "unexpected signal during discovery: {}",
                        other
                    )),
                });
                None
            }
        }
    }

    /// [`Group::register`] against the process-wide registry.
    pub fn register_global(
        name: &'static str,
        file: &'static str,
        slots: &[CaseFn],
    ) -> Option<GroupId> {
        Self::register(name, file, slots, &mut Storage::instance())
    }
}
