//! Test fixtures and helpers shared by unit tests, integration tests and
//! benchmarks.

mod data;

pub use data::{reference_dataset, synthetic_classification, REFERENCE_ATTRIBUTES};

use crate::data::{Dataset, SelectorId};

/// Number of rows holding every id of `ids`, by scanning the dataset.
pub fn brute_force_support(dataset: &Dataset, ids: &[SelectorId]) -> u32 {
    dataset
        .rows()
        .filter(|row| ids.iter().all(|id| row.binary_search(id).is_ok()))
        .count() as u32
}
