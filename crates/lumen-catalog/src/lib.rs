//! Component catalog: per-kind modifiers, tolerance factor tables and the
//! registry of computed rules.

pub mod catalog;
pub mod embedded;
pub mod entry;
pub mod error;
pub mod rules;
pub mod storage;

pub use catalog::{Catalog, load_default_catalog};
pub use entry::{CatalogEntry, FactorValue, Modifier, ModifierInput};
pub use error::{CatalogError, CatalogFormat, Result};
pub use rules::{ABSORPTION_PER_MM, LIGHT_PIPE_KIND, RuleFn, RuleRegistry, light_pipe_absorption};
pub use storage::{CatalogStorage, FileCatalogStorage, load_catalog, save_catalog, write_atomic};
