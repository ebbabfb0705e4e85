//! Shared benchmark helpers.

pub mod criterion_config;
