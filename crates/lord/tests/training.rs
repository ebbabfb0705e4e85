//! Integration tests grouped by training subsystem.

#[path = "training/end_to_end.rs"]
mod end_to_end;

#[path = "training/options.rs"]
mod options;
