//! Data model for chain light-output estimation: tolerance intervals, chains,
//! nodes and the project document.

pub mod chain;
pub mod error;
pub mod ids;
pub mod interval;
pub mod lenient;
pub mod node;
pub mod project;

pub use chain::{Chain, ChainPatch};
pub use error::{ModelError, Result};
pub use ids::{ChainId, NodeId};
pub use interval::Interval;
pub use node::{ConfigValue, LIGHT_SOURCE_KIND, NewNode, Node, NodeConfig, NodePatch};
pub use project::{ProjectSnapshot, Selection, UiPatch, UiSettings, Viewport, ViewportPatch};
