//! Range propagation.
//!
//! Every function here is a pure, total computation over a snapshot of the
//! project plus the catalog and rule registry. Missing or malformed catalog
//! data degrades to the neutral multiplier; nothing here fails.

use std::collections::BTreeMap;

use lumen_catalog::{Catalog, CatalogEntry, RuleRegistry};
use lumen_model::{Chain, ChainId, Interval, Node};
use tracing::{trace, warn};

use crate::summary::{ChainSummary, SystemSummary};

/// Computes efficiency and lumen ranges against one catalog and rule set.
#[derive(Debug, Clone, Copy)]
pub struct RangeEngine<'a> {
    catalog: &'a Catalog,
    rules: &'a RuleRegistry,
}

impl<'a> RangeEngine<'a> {
    pub fn new(catalog: &'a Catalog, rules: &'a RuleRegistry) -> Self {
        Self { catalog, rules }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Effective multiplier of a single node.
    ///
    /// Light sources are the reference emitter and always yield `[1, 1]`.
    /// Components multiply the factor of every selected modifier value, then
    /// the kind's computed rule, if one is registered.
    pub fn node_effective_range(&self, node: &Node) -> Interval {
        if node.is_light_source() {
            return Interval::ONE;
        }

        let mut range = Interval::ONE;
        for (key, value) in node.config.iter().filter(|(_, v)| !v.is_null()) {
            range *= self.catalog.factor_for(&node.kind, key, value);
        }

        if let Some(rule) = self.rules.rule_for(&node.kind) {
            let fallback;
            let entry = match self.catalog.entry(&node.kind) {
                Some(entry) => entry,
                None => {
                    fallback = CatalogEntry::default();
                    &fallback
                }
            };
            match rule(&node.config, entry, &node.kind) {
                Some(extra) if extra.is_well_formed() => range *= extra,
                Some(extra) => warn!(
                    node = %node.id,
                    kind = %node.kind,
                    min = extra.min,
                    max = extra.max,
                    "ignoring malformed rule result"
                ),
                None => {}
            }
        }

        trace!(node = %node.id, kind = %node.kind, %range, "node range");
        range
    }

    /// Compounded multiplier of the enabled components of `chain_id`.
    ///
    /// A chain without contributing components is perfectly efficient.
    pub fn chain_effective_range<'n, I>(&self, nodes: I, chain_id: &ChainId) -> Interval
    where
        I: IntoIterator<Item = &'n Node>,
    {
        nodes
            .into_iter()
            .filter(|node| node.is_active_component_of(chain_id))
            .map(|node| self.node_effective_range(node))
            .product()
    }

    /// Source lumens carried through the chain's efficiency range.
    pub fn chain_final_lumens_range<'n, I>(&self, nodes: I, chain: &Chain) -> Interval
    where
        I: IntoIterator<Item = &'n Node>,
    {
        self.chain_effective_range(nodes, &chain.id)
            .scale(chain.source_lumens())
    }

    pub fn chain_summary<'n, I>(&self, nodes: I, chain: &Chain) -> ChainSummary
    where
        I: IntoIterator<Item = &'n Node>,
    {
        let efficiency = self.chain_effective_range(nodes, &chain.id);
        summarize(chain, efficiency)
    }

    /// Lumen-weighted aggregate over all chains.
    ///
    /// Efficiency is `total final lumens / total source lumens`, not the mean
    /// of per-chain efficiencies. With no source lumens at all the efficiency
    /// is `[0, 0]`.
    pub fn system_summary<'n, 'c, N, C>(&self, nodes: N, chains: C) -> SystemSummary
    where
        N: IntoIterator<Item = &'n Node>,
        C: IntoIterator<Item = &'c Chain>,
    {
        let mut per_chain: BTreeMap<&ChainId, Interval> = BTreeMap::new();
        for node in nodes {
            if node.is_light_source() || node.disabled {
                continue;
            }
            let range = self.node_effective_range(node);
            *per_chain.entry(&node.chain_id).or_insert(Interval::ONE) *= range;
        }

        let mut summaries = Vec::new();
        let mut total_source = 0.0;
        let mut total_min = 0.0;
        let mut total_max = 0.0;
        for chain in chains {
            let efficiency = per_chain
                .get(&chain.id)
                .copied()
                .unwrap_or(Interval::ONE);
            let summary = summarize(chain, efficiency);
            total_source += summary.source_lumens;
            total_min += summary.final_lumens.min;
            total_max += summary.final_lumens.max;
            summaries.push(summary);
        }

        let system_efficiency = if total_source > 0.0 {
            Interval {
                min: total_min / total_source,
                max: total_max / total_source,
            }
        } else {
            Interval::ZERO
        };

        SystemSummary {
            chains: summaries,
            total_source_lumens: total_source,
            total_lumens: Interval {
                min: total_min,
                max: total_max,
            },
            system_efficiency,
        }
    }
}

fn summarize(chain: &Chain, efficiency: Interval) -> ChainSummary {
    let source_lumens = chain.source_lumens();
    ChainSummary {
        chain_id: chain.id.clone(),
        label: chain.label.clone(),
        source_lumens,
        efficiency,
        final_lumens: efficiency.scale(source_lumens),
    }
}
