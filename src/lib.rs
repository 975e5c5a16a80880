//! treejack: decision tree coverage explorer
//!
//! Parses branch conditions, derives default inputs and single-variable
//! variations for probing which branches are reachable, and builds render
//! models that highlight the path a simulation took.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
