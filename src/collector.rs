//!
//! Case discovery.
//!
//! A module declares its cases as an ordered slice of [`CaseFn`]; the slice
//! index is the ordinal. Discovery probes every slot with a runtime whose only
//! job is to answer the announce call with [`Signal::Real`], so the body stops
//! before running any assertion.
//!
//! The walk goes from the last slot down to the first and *prepends* each real
//! case, which leaves the linked sequence in declaration order. Callers rely on
//! cases running in the order they were written.

use std::panic::{self, AssertUnwindSafe};

use crate::case::{CaseFn, CaseResult, Ordinal, Runtime, MAX_SLOTS};
use crate::filter::Filter;
use crate::signal::Signal;
use crate::storage::{CaseId, CaseNode};

const NOT_ANNOUNCED: &str = "case body does not announce before doing anything else";
const ANNOUNCED_TWICE: &str = "case announced more than once";
const SWALLOWED: &str = "case body kept running after announcing itself";
const PANICKED: &str = "case body panicked before announcing";
const FILTERED_DURING_DISCOVERY: &str = "case reported itself filtered while no filter was active";

// ============================================================================
// PROBE - run a body just far enough to learn what it is
// ============================================================================

/// What a single probe of a slot found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// The slot announced itself.
    Real {
        name: &'static str,
        description: Option<&'static str>,
    },
    /// The slot holds the default body.
    Stub,
    /// The slot announced a name rejected by the filters it was probed with.
    Filtered,
    /// The slot broke the announce protocol.
    Malformed(String),
}

/// Runtime used while probing. Answers the first announce with `Real`.
struct ProbeRuntime<'f> {
    ordinal: Ordinal,
    filters: &'f [Filter],
    announced: Option<(&'static str, Option<&'static str>)>,
    rejected: bool,
}

impl Runtime for ProbeRuntime<'_> {
    fn start(&mut self, name: &'static str, description: Option<&'static str>) -> CaseResult {
        if self.announced.is_some() {
            return Err(Signal::collection_failed(self.ordinal, ANNOUNCED_TWICE));
        }
        self.announced = Some((name, description));
        if !self.filters.iter().all(|f| f.matches_name(name)) {
            self.rejected = true;
            return Err(Signal::Filtered);
        }
        Err(Signal::Real)
    }
}

/// Probes one slot. With an empty filter list this is the discovery probe;
/// export passes its subset's filters so excluded names come back `Filtered`.
pub fn probe(case: CaseFn, ordinal: Ordinal, filters: &[Filter]) -> Probe {
    let mut runtime = ProbeRuntime {
        ordinal,
        filters,
        announced: None,
        rejected: false,
    };
    let result = panic::catch_unwind(AssertUnwindSafe(|| case(&mut runtime)));

    match (result, runtime.announced) {
        (Ok(Err(Signal::Real)), Some((name, description))) => Probe::Real { name, description },
        // Only a name this probe rejected counts; a body inventing `Filtered` is malformed.
        (Ok(Err(Signal::Filtered)), Some(_)) if runtime.rejected => Probe::Filtered,
        (Ok(Err(Signal::Stub)), None) => Probe::Stub,
        (Ok(Err(Signal::CollectionFailed { message, .. })), _) => {
            Probe::Malformed(message.as_str().to_owned())
        }
        (Ok(Ok(())), None) => Probe::Malformed(NOT_ANNOUNCED.to_owned()),
        (Ok(_), Some(_)) => Probe::Malformed(SWALLOWED.to_owned()),
        (Ok(Err(signal)), None) => Probe::Malformed(format!(
            "{} (case returned `{}` first)",
            NOT_ANNOUNCED,
            signal.name()
        )),
        (Err(_), None) => Probe::Malformed(PANICKED.to_owned()),
        (Err(_), Some(_)) => Probe::Malformed(SWALLOWED.to_owned()),
    }
}

// ============================================================================
// COLLECT - link the real slots of one module
// ============================================================================

/// Discovers the real cases among `slots` and links them into `arena`.
///
/// Returns the head of the module's sequence (`None` when every slot is a
/// stub). On failure every node this call pushed is rolled back and the error
/// is a [`Signal::CollectionFailed`] naming the offending ordinal.
pub(crate) fn collect(
    slots: &[CaseFn],
    arena: &mut Vec<CaseNode>,
) -> Result<Option<CaseId>, Signal> {
    let mark = arena.len();
    match collect_from(slots, arena) {
        Ok(head) => Ok(head),
        Err(signal) => {
            arena.truncate(mark);
            Err(signal)
        }
    }
}

fn collect_from(slots: &[CaseFn], arena: &mut Vec<CaseNode>) -> Result<Option<CaseId>, Signal> {
    if slots.len() > MAX_SLOTS {
        return Err(Signal::collection_failed(
            Ordinal::MAX,
            format!(
                "module declares {} case slots; at most {} are supported",
                slots.len(),
                MAX_SLOTS
            ),
        ));
    }

    let mut tail: Option<CaseId> = None;
    for (index, &case) in slots.iter().enumerate().rev() {
        // Bounded by the MAX_SLOTS check above.
        let ordinal = index as Ordinal;
        match probe(case, ordinal, &[]) {
            Probe::Stub => {}
            Probe::Real { name, .. } => {
                tracing::trace!(ordinal, name, "discovered case");
                arena.push(CaseNode {
                    ordinal,
                    case,
                    next: tail,
                });
                tail = Some(arena.len() - 1);
            }
            Probe::Filtered => {
                return Err(Signal::collection_failed(ordinal, FILTERED_DURING_DISCOVERY));
            }
            Probe::Malformed(message) => {
                return Err(Signal::collection_failed(ordinal, message));
            }
        }
    }
    Ok(tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{self, stub};

    fn first(rt: &mut dyn Runtime) -> CaseResult {
        rt.start_case("first")?;
        case::fail("must not run during discovery")
    }

    fn second(rt: &mut dyn Runtime) -> CaseResult {
        rt.start_case("second")?;
        Ok(())
    }

    fn third(rt: &mut dyn Runtime) -> CaseResult {
        rt.start_case("third")?;
        case::skip()
    }

    fn silent(_: &mut dyn Runtime) -> CaseResult {
        Ok(())
    }

    fn fails_first(_: &mut dyn Runtime) -> CaseResult {
        case::fail("too early")
    }

    fn swallows(rt: &mut dyn Runtime) -> CaseResult {
        let _ = rt.start_case("swallows");
        Ok(())
    }

    fn announces_twice(rt: &mut dyn Runtime) -> CaseResult {
        let _ = rt.start_case("once");
        rt.start_case("twice")
    }

    fn claims_filtered(rt: &mut dyn Runtime) -> CaseResult {
        let _ = rt.start_case("claims_filtered");
        Err(Signal::Filtered)
    }

    fn ordinals(arena: &[CaseNode], head: Option<CaseId>) -> Vec<Ordinal> {
        let mut out = Vec::new();
        let mut cursor = head;
        while let Some(id) = cursor {
            out.push(arena[id].ordinal);
            cursor = arena[id].next;
        }
        out
    }

    #[test]
    fn probe_classifies_slots() {
        assert_eq!(
            probe(first, 0, &[]),
            Probe::Real {
                name: "first",
                description: None
            }
        );
        assert_eq!(probe(stub, 1, &[]), Probe::Stub);
        assert_eq!(
            probe(silent, 2, &[]),
            Probe::Malformed(NOT_ANNOUNCED.to_owned())
        );
        assert!(matches!(probe(fails_first, 3, &[]), Probe::Malformed(_)));
        assert_eq!(probe(swallows, 4, &[]), Probe::Malformed(SWALLOWED.to_owned()));
        assert_eq!(
            probe(announces_twice, 5, &[]),
            Probe::Malformed(ANNOUNCED_TWICE.to_owned())
        );
    }

    #[test]
    fn probe_honors_name_filters() {
        let filters = [Filter::by_case_name("g", "second")];
        assert_eq!(probe(first, 0, &filters), Probe::Filtered);
        assert!(matches!(probe(second, 1, &filters), Probe::Real { .. }));
    }

    #[test]
    fn collected_cases_follow_declaration_order() {
        let slots: [CaseFn; 6] = [stub, first, stub, second, stub, third];
        let mut arena = Vec::new();
        let head = collect(&slots, &mut arena).unwrap();
        assert_eq!(ordinals(&arena, head), vec![1, 3, 5]);
    }

    #[test]
    fn stubs_contribute_nothing() {
        let slots: [CaseFn; 5] = [first, stub, stub, stub, second];
        let mut arena = Vec::new();
        let head = collect(&slots, &mut arena).unwrap();
        assert_eq!(arena.len(), 2);
        assert_eq!(ordinals(&arena, head), vec![0, 4]);
    }

    #[test]
    fn all_stubs_yield_an_empty_sequence() {
        let slots: [CaseFn; 3] = [stub, stub, stub];
        let mut arena = Vec::new();
        assert_eq!(collect(&slots, &mut arena).unwrap(), None);
        assert!(arena.is_empty());
    }

    #[test]
    fn malformed_slot_aborts_and_rolls_back() {
        let slots: [CaseFn; 4] = [first, silent, stub, second];
        let mut arena = Vec::new();
        let err = collect(&slots, &mut arena).unwrap_err();
        match err {
            Signal::CollectionFailed { ordinal, message } => {
                assert_eq!(ordinal, 1);
                assert_eq!(message.as_str(), NOT_ANNOUNCED);
            }
            other => panic!("unexpected signal {other:?}"),
        }
        assert!(arena.is_empty());
    }

    #[test]
    fn self_reported_filtered_is_a_collection_failure() {
        assert_eq!(
            probe(claims_filtered, 0, &[]),
            Probe::Malformed(SWALLOWED.to_owned())
        );

        let slots: [CaseFn; 3] = [first, claims_filtered, second];
        let mut arena = Vec::new();
        let err = collect(&slots, &mut arena).unwrap_err();
        assert!(matches!(err, Signal::CollectionFailed { ordinal: 1, .. }));
        assert!(arena.is_empty());
    }

    #[test]
    fn too_many_slots_is_a_collection_failure() {
        let slots: Vec<CaseFn> = vec![stub as CaseFn; MAX_SLOTS + 1];
        let mut arena = Vec::new();
        let err = collect(&slots, &mut arena).unwrap_err();
        assert!(matches!(err, Signal::CollectionFailed { ordinal: 127, .. }));
    }
}
