//! High-level model wrapper.
//!
//! - [`LordModel`]: rule-set classifier with training, prediction and
//!   introspection
//! - [`LordConfig`]: training configuration built with a validating builder
//! - [`ModelEvaluation`]: confusion matrix and per-class scores
//!
//! # Example
//!
//! ```
//! use lord::model::{LordConfig, LordModel};
//! use lord::testing::reference_dataset;
//!
//! let data = reference_dataset();
//! let model = LordModel::train(&data, LordConfig::default()).unwrap();
//!
//! let class = model.predict(&[1, 3, 9, 10]);
//! assert_eq!(class, 13);
//!
//! for rule in model.rule_list() {
//!     println!("{rule}");
//! }
//! ```

mod config;
mod eval;
mod lord;

pub use config::{ConfigError, LordConfig};
pub use eval::{ClassScores, EvalError, ModelEvaluation};
pub use lord::{LordModel, Prediction};
