//! Detection table output and progress reporting.

pub mod progress;
mod table;

pub use table::{Detection, TableWriter, write_table};
