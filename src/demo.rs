//!
//! Demonstration groups linked into the `tested` binary.
//!
//! Each module keeps its cases private and exposes a single `link_*` entry
//! point that registers its group. Calling an entry point twice is harmless.

pub mod math;
pub mod vector;

use crate::storage::Storage;

/// Registers every demonstration group into `storage`.
pub fn link_all(storage: &mut Storage) {
    math::link_math_tests(storage);
    vector::link_vector_tests(storage);
}
