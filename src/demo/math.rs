// Test group for some basic math operations.

use crate::case::{self, CaseFn, CaseResult, Runtime};
use crate::storage::{Group, Storage};

fn addition(rt: &mut dyn Runtime) -> CaseResult {
    rt.start_case("Addition")?;
    case::fail_if(2 + 2 != 4, "Addition does not work")
}

fn multiplication(rt: &mut dyn Runtime) -> CaseResult {
    rt.start_case("Multiplication")?;
    case::fail_if(2 * 2 != 4, "Multiplication does not work")
}

fn division(rt: &mut dyn Runtime) -> CaseResult {
    rt.start("Division", Some("integer division truncates toward zero"))?;
    case::eq(7 / 2, 3, "")?;
    case::eq(-7 / 2, -3, "")
}

const CASES: &[CaseFn] = &[addition, case::stub, multiplication, division];

pub fn link_math_tests(storage: &mut Storage) {
    Group::register("math", file!(), CASES, storage);
}
