//! Input data model.
//!
//! Rows arrive pre-encoded as selector ids. A [`SelectorTable`] describes the
//! vocabulary (predictor selectors first, then class selectors) and a
//! [`Dataset`] holds validated rows, each an ascending id array ending in its
//! class selector. [`ExampleRef`] is the borrowed form used at query time.

mod dataset;
mod example;
mod selector;

pub use dataset::{Dataset, DatasetError};
pub use example::ExampleRef;
pub use selector::{Selector, SelectorId, SelectorRole, SelectorTable};
