//! Live project state.
//!
//! Collections are persistent vectors so cloning the state for a history
//! entry shares everything that did not change.

use std::collections::BTreeSet;

use im::Vector;
use lumen_model::{Chain, ChainId, Node, NodeId, ProjectSnapshot, Selection, UiSettings, Viewport};

/// Read-only view of everything the store owns.
///
/// Callers only ever see `&ProjectState`; every change goes through the
/// store's actions so history and notifications stay consistent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectState {
    pub(crate) chains: Vector<Chain>,
    pub(crate) nodes: Vector<Node>,
    pub(crate) selection: Selection,
    pub(crate) viewport: Viewport,
    pub(crate) ui: UiSettings,
}

impl ProjectState {
    pub fn chains(&self) -> &Vector<Chain> {
        &self.chains
    }

    pub fn nodes(&self) -> &Vector<Node> {
        &self.nodes
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn ui(&self) -> &UiSettings {
        &self.ui
    }

    pub fn chain(&self, id: &ChainId) -> Option<&Chain> {
        self.chains.iter().find(|chain| &chain.id == id)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    pub fn has_chain(&self, id: &ChainId) -> bool {
        self.chain(id).is_some()
    }

    pub fn has_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// The enabled light source anchoring `chain_id`, if any.
    pub fn light_source_of(&self, chain_id: &ChainId) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|node| &node.chain_id == chain_id && node.is_light_source() && !node.disabled)
    }

    /// Non-light-source members of `chain_id` in display order.
    ///
    /// Disabled components are included so they keep their slot. Nodes
    /// without an explicit order sort last, in insertion order.
    pub fn components_of(&self, chain_id: &ChainId) -> Vec<&Node> {
        let mut components: Vec<&Node> = self
            .nodes
            .iter()
            .filter(|node| &node.chain_id == chain_id && !node.is_light_source())
            .collect();
        components.sort_by_key(|node| node.order.unwrap_or(u32::MAX));
        components
    }

    /// Order value that appends after every component of `chain_id`.
    pub(crate) fn next_order(&self, chain_id: &ChainId) -> u32 {
        self.nodes
            .iter()
            .filter(|node| &node.chain_id == chain_id && !node.is_light_source())
            .filter_map(|node| node.order)
            .max()
            .map_or(0, |last| last.saturating_add(1))
    }

    pub(crate) fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| &node.id == id)
    }

    pub(crate) fn chain_mut(&mut self, id: &ChainId) -> Option<&mut Chain> {
        self.chains.iter_mut().find(|chain| &chain.id == id)
    }

    /// Drop every node matched by `remove`, pruning them from the selection.
    ///
    /// Returns the removed ids.
    pub(crate) fn remove_nodes_where(&mut self, remove: impl Fn(&Node) -> bool) -> Vec<NodeId> {
        let removed: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|node| remove(node))
            .map(|node| node.id.clone())
            .collect();
        if removed.is_empty() {
            return removed;
        }
        self.nodes.retain(|node| !remove(node));
        for id in &removed {
            self.selection.remove(id);
        }
        removed
    }

    /// Whether `id` names a chain or is referenced by any node.
    pub(crate) fn chain_id_in_use(&self, id: &ChainId) -> bool {
        self.has_chain(id) || self.nodes.iter().any(|node| &node.chain_id == id)
    }

    /// Chain ids referenced by nodes but missing from `chains`.
    pub fn dangling_chain_ids(&self) -> BTreeSet<&ChainId> {
        self.nodes
            .iter()
            .map(|node| &node.chain_id)
            .filter(|id| !self.has_chain(id))
            .collect()
    }
}

impl From<ProjectSnapshot> for ProjectState {
    fn from(doc: ProjectSnapshot) -> Self {
        Self {
            chains: doc.chains.into_iter().collect(),
            nodes: doc.nodes.into_iter().collect(),
            selection: doc.selection,
            viewport: doc.viewport,
            ui: doc.ui,
        }
    }
}

impl From<&ProjectState> for ProjectSnapshot {
    fn from(state: &ProjectState) -> Self {
        Self {
            chains: state.chains.iter().cloned().collect(),
            nodes: state.nodes.iter().cloned().collect(),
            selection: state.selection.clone(),
            viewport: state.viewport.clone(),
            ui: state.ui.clone(),
        }
    }
}
