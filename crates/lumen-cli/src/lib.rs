//! Library side of the `lumen-range` command-line tool.

pub mod logging;
pub mod report;
