//! Best/worst-case light output for chains of attenuating components.
//!
//! [`RangeEngine`] turns a project snapshot plus the component catalog into
//! per-node, per-chain and system-wide tolerance intervals.

pub mod engine;
pub mod summary;

pub use engine::RangeEngine;
pub use summary::{ChainSummary, SystemSummary, TargetStatus};
