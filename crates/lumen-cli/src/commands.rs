use std::path::Path;

use anyhow::{Context, Result};
use lumen_catalog::{Catalog, RuleRegistry, load_catalog, load_default_catalog, save_catalog};
use lumen_store::{DomainStore, load_project};
use tracing::{info, info_span};

use crate::cli::SummaryArgs;
use lumen_cli::report::{CatalogRow, SummaryReport, catalog_rows};

/// The catalog named on the command line, or the built-in one.
pub fn load_active_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => {
            load_catalog(path).with_context(|| format!("load catalog {}", path.display()))
        }
        None => load_default_catalog().context("load built-in catalog"),
    }
}

pub fn run_summary(args: &SummaryArgs, catalog: Catalog) -> Result<SummaryReport> {
    let span = info_span!("summary", project = %args.project.display());
    let _guard = span.enter();

    let doc = load_project(&args.project)
        .with_context(|| format!("load project {}", args.project.display()))?;
    let mut store = DomainStore::with_catalog(catalog);
    store.load_project(doc);

    let rules = RuleRegistry::builtin();
    let mut report = SummaryReport::from_state(store.state(), store.catalog(), &rules);
    if let Some(target) = args.target {
        report = report.with_target(target);
    }
    info!(
        chains = report.summary.chains.len(),
        total_source_lumens = report.summary.total_source_lumens,
        "summary computed"
    );
    Ok(report)
}

pub fn run_catalog(catalog: &Catalog) -> Vec<CatalogRow> {
    catalog_rows(catalog)
}

pub fn run_export_catalog(catalog: &Catalog, path: &Path) -> Result<()> {
    save_catalog(catalog, path).with_context(|| format!("write catalog {}", path.display()))
}
