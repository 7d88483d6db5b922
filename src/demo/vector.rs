// Test group for Vec.

use crate::case::{self, CaseFn, CaseResult, Runtime};
use crate::storage::{Group, Storage};

fn empty_by_default(rt: &mut dyn Runtime) -> CaseResult {
    rt.start_case("EmptyByDefault")?;

    let vec: Vec<i32> = Vec::new();
    case::is(vec.is_empty(), "Vector must be empty by default")
}

fn add_element(rt: &mut dyn Runtime) -> CaseResult {
    rt.start_case("AddElement")?;

    let vec = vec![1];
    case::is(vec.len() == 1, "")?;
    case::fail_if(vec.is_empty(), "")?;
    case::eq(vec[0], 1, "")
}

fn reserve_keeps_length(rt: &mut dyn Runtime) -> CaseResult {
    rt.start_case("ReserveKeepsLength")?;

    let mut vec: Vec<i32> = Vec::new();
    vec.reserve(16);
    case::not(vec.capacity() < 16, "reserve must grow capacity")?;
    case::eq(vec.len(), 0usize, "reserve must not change length")
}

const CASES: &[CaseFn] = &[empty_by_default, add_element, reserve_keeps_length];

pub fn link_vector_tests(storage: &mut Storage) {
    Group::register("vector", file!(), CASES, storage);
}
