//! Command-line interface for jobimport.

mod commands;
pub mod icons;

pub use commands::{is_verbose, run};
