//! Catalog data compiled into the binary with `include_str!()`.

/// Default component catalog (TOML).
pub const DEFAULT_CATALOG: &str = include_str!("../data/catalog.toml");
