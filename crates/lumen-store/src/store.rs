//! The authoritative project store.
//!
//! All mutation flows through named actions on [`DomainStore`]. Each action
//! that actually changes something records the previous state for undo and
//! notifies subscribers; actions on unknown ids, or that would break a chain
//! invariant, are logged and ignored.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use lumen_catalog::Catalog;
use lumen_model::{
    Chain, ChainId, ChainPatch, NewNode, Node, NodeId, NodePatch, ProjectSnapshot, Selection,
    UiPatch, ViewportPatch, LIGHT_SOURCE_KIND,
};
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::history::History;
use crate::state::ProjectState;

/// Handle returned by [`DomainStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&ProjectState)>;

/// What happens to a chain when its light source is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Remove the chain and every node in it.
    #[default]
    DeleteChain,
    /// Keep the chain; disable the light source and all of its components.
    StashChain,
    /// Keep the chain and a disabled light source; delete the components.
    StashLightSource,
}

#[derive(Debug, Default)]
struct Batch {
    depth: u32,
    /// A pre-batch snapshot has already been recorded.
    recorded: bool,
    /// Something changed and subscribers have not been told yet.
    pending: bool,
}

pub struct DomainStore {
    state: Arc<ProjectState>,
    history: History,
    batch: Batch,
    catalog: Arc<Catalog>,
    listeners: BTreeMap<SubscriptionId, Listener>,
    next_subscription: u64,
    next_chain_seq: u64,
    next_node_seq: u64,
    config: StoreConfig,
}

impl fmt::Debug for DomainStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainStore")
            .field("chains", &self.state.chains.len())
            .field("nodes", &self.state.nodes.len())
            .field("history", &self.history)
            .field("batch_depth", &self.batch.depth)
            .field("listeners", &self.listeners.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for DomainStore {
    fn default() -> Self {
        Self::new(Catalog::default(), StoreConfig::default())
    }
}

impl DomainStore {
    pub fn new(catalog: Catalog, config: StoreConfig) -> Self {
        Self {
            state: Arc::new(ProjectState::default()),
            history: History::new(config.history_depth),
            batch: Batch::default(),
            catalog: Arc::new(catalog),
            listeners: BTreeMap::new(),
            next_subscription: 0,
            next_chain_seq: 0,
            next_node_seq: 0,
            config,
        }
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        Self::new(catalog, StoreConfig::default())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn state(&self) -> &ProjectState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Shared handle to the current catalog.
    pub fn catalog_handle(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    // ====================================================================
    // Chains
    // ====================================================================

    /// Create an empty chain labelled "Group N".
    pub fn add_chain(&mut self) -> ChainId {
        let id = self.mint_chain_id();
        let created = id.clone();
        self.commit("add_chain", move |state| {
            let label = format!("Group {}", state.chains.len() + 1);
            state.chains.push_back(Chain::new(created, label));
            Some(())
        });
        id
    }

    pub fn update_chain(&mut self, id: &ChainId, patch: &ChainPatch) {
        let applied = self.commit("update_chain", |state| {
            let chain = state.chain_mut(id)?;
            patch.apply(chain).then_some(())
        });
        if applied.is_none() && !self.state.has_chain(id) {
            warn!(chain = %id, "update_chain: unknown chain");
        }
    }

    // ====================================================================
    // Nodes
    // ====================================================================

    /// Insert a node into an existing chain.
    ///
    /// Components without an explicit order are appended after their
    /// siblings. Returns `None` when the chain does not exist or the chain
    /// already has an enabled light source and this is another one.
    pub fn add_node(&mut self, new_node: NewNode) -> Option<NodeId> {
        if !self.state.has_chain(&new_node.chain_id) {
            warn!(chain = %new_node.chain_id, kind = %new_node.kind, "add_node: unknown chain");
            return None;
        }
        let is_light_source = new_node.kind == LIGHT_SOURCE_KIND;
        if is_light_source
            && !new_node.disabled
            && self.state.light_source_of(&new_node.chain_id).is_some()
        {
            warn!(chain = %new_node.chain_id, "add_node: chain already has a light source");
            return None;
        }

        let id = match new_node.id {
            Some(id) if !self.state.has_node(&id) => id,
            _ => self.mint_node_id(),
        };
        let inserted = id.clone();
        self.commit("add_node", move |state| {
            let order = match new_node.order {
                Some(order) => Some(order),
                None if is_light_source => None,
                None => Some(state.next_order(&new_node.chain_id)),
            };
            state.nodes.push_back(Node {
                id: inserted,
                chain_id: new_node.chain_id,
                kind: new_node.kind,
                label: new_node.label,
                config: new_node.config,
                disabled: new_node.disabled,
                order,
                extra: BTreeMap::new(),
            });
            Some(())
        });
        Some(id)
    }

    /// Shallow-merge `patch` into a node.
    ///
    /// Changing a node into or out of a light source is refused; delete and
    /// re-add it instead.
    pub fn update_node(&mut self, id: &NodeId, patch: &NodePatch) {
        let Some(node) = self.state.node(id) else {
            warn!(node = %id, "update_node: unknown node");
            return;
        };
        if let Some(kind) = &patch.kind {
            if (kind == LIGHT_SOURCE_KIND) != node.is_light_source() {
                warn!(node = %id, from = %node.kind, to = %kind, "update_node: light source kind change refused");
                return;
            }
        }
        self.commit("update_node", |state| {
            let node = state.node_mut(id)?;
            patch.apply(node).then_some(())
        });
    }

    /// Stash or restore a node.
    ///
    /// Re-enabling a light source in a chain that already has an enabled one
    /// is refused.
    pub fn set_node_disabled(&mut self, id: &NodeId, disabled: bool) {
        let Some(node) = self.state.node(id) else {
            warn!(node = %id, "set_node_disabled: unknown node");
            return;
        };
        if !disabled && node.disabled && node.is_light_source() {
            if let Some(active) = self.state.light_source_of(&node.chain_id) {
                warn!(node = %id, active = %active.id, "set_node_disabled: chain already has a light source");
                return;
            }
        }
        self.commit("set_node_disabled", |state| {
            let node = state.node_mut(id)?;
            if node.disabled == disabled {
                return None;
            }
            node.disabled = disabled;
            Some(())
        });
    }

    /// Delete a node.
    ///
    /// Removing a light source removes its chain and every node of that
    /// chain. Removed ids are pruned from the selection.
    pub fn remove_node(&mut self, id: &NodeId) {
        let Some(node) = self.state.node(id) else {
            debug!(node = %id, "remove_node: unknown node");
            return;
        };
        let cascade = node.is_light_source().then(|| node.chain_id.clone());
        self.commit("remove_node", |state| {
            match &cascade {
                Some(chain_id) => {
                    state.chains.retain(|chain| &chain.id != chain_id);
                    let removed = state.remove_nodes_where(|node| &node.chain_id == chain_id);
                    debug!(chain = %chain_id, removed = removed.len(), "removed chain with its light source");
                }
                None => {
                    state.remove_nodes_where(|node| &node.id == id);
                }
            }
            Some(())
        });
    }

    /// Reassign a component to another chain, appending it at the end.
    pub fn move_node_to_chain(&mut self, id: &NodeId, chain_id: &ChainId) {
        let Some(node) = self.state.node(id) else {
            warn!(node = %id, "move_node_to_chain: unknown node");
            return;
        };
        if node.is_light_source() {
            warn!(node = %id, "move_node_to_chain: light sources stay with their chain");
            return;
        }
        if !self.state.has_chain(chain_id) {
            warn!(node = %id, chain = %chain_id, "move_node_to_chain: unknown chain");
            return;
        }
        if &node.chain_id == chain_id {
            return;
        }
        self.commit("move_node_to_chain", |state| {
            let order = state.next_order(chain_id);
            let node = state.node_mut(id)?;
            node.chain_id = chain_id.clone();
            node.order = Some(order);
            Some(())
        });
    }

    /// Move a component to `index` within `chain_id` and renumber the chain.
    ///
    /// The index is clamped to the component count. A node from another
    /// chain is moved into `chain_id` first, in the same undo step.
    pub fn reorder_node_in_chain(&mut self, id: &NodeId, chain_id: &ChainId, index: usize) {
        let Some(node) = self.state.node(id) else {
            warn!(node = %id, "reorder_node_in_chain: unknown node");
            return;
        };
        if node.is_light_source() {
            warn!(node = %id, "reorder_node_in_chain: light sources are unordered");
            return;
        }
        if !self.state.has_chain(chain_id) {
            warn!(node = %id, chain = %chain_id, "reorder_node_in_chain: unknown chain");
            return;
        }
        self.commit("reorder_node_in_chain", |state| {
            let mut changed = false;
            if let Some(node) = state.node_mut(id) {
                if &node.chain_id != chain_id {
                    node.chain_id = chain_id.clone();
                    changed = true;
                }
            }

            let mut sequence: Vec<NodeId> = state
                .components_of(chain_id)
                .into_iter()
                .map(|node| node.id.clone())
                .filter(|other| other != id)
                .collect();
            sequence.insert(index.min(sequence.len()), id.clone());

            for (position, node_id) in sequence.iter().enumerate() {
                let order = u32::try_from(position).unwrap_or(u32::MAX);
                if let Some(node) = state.node_mut(node_id) {
                    if node.order != Some(order) {
                        node.order = Some(order);
                        changed = true;
                    }
                }
            }
            changed.then_some(())
        });
    }

    // ====================================================================
    // Light sources
    // ====================================================================

    /// New chain anchored by a fresh light source, as one undo step.
    pub fn add_light_source(&mut self) -> Option<(ChainId, NodeId)> {
        self.begin_batch();
        let chain_id = self.add_chain();
        let node_id = self.add_node(NewNode::light_source(chain_id.clone()));
        self.end_batch();
        node_id.map(|node_id| (chain_id, node_id))
    }

    /// Delete a light source according to `policy`, as one undo step.
    pub fn delete_light_source(&mut self, id: &NodeId, policy: DeletePolicy) {
        let Some(node) = self.state.node(id) else {
            warn!(node = %id, "delete_light_source: unknown node");
            return;
        };
        if !node.is_light_source() {
            warn!(node = %id, kind = %node.kind, "delete_light_source: not a light source");
            return;
        }
        let chain_id = node.chain_id.clone();
        debug!(node = %id, chain = %chain_id, ?policy, "delete_light_source");

        self.begin_batch();
        match policy {
            DeletePolicy::DeleteChain => self.remove_node(id),
            DeletePolicy::StashChain => {
                let members: Vec<NodeId> = self
                    .state
                    .nodes
                    .iter()
                    .filter(|node| node.chain_id == chain_id)
                    .map(|node| node.id.clone())
                    .collect();
                for member in &members {
                    self.set_node_disabled(member, true);
                }
            }
            DeletePolicy::StashLightSource => {
                self.set_node_disabled(id, true);
                let components: Vec<NodeId> = self
                    .state
                    .components_of(&chain_id)
                    .into_iter()
                    .map(|node| node.id.clone())
                    .collect();
                for component in &components {
                    self.remove_node(component);
                }
            }
        }
        self.end_batch();
    }

    // ====================================================================
    // Selection and UI
    // ====================================================================

    /// Replace the selection with `id`, or clear it.
    pub fn select_single(&mut self, id: Option<&NodeId>) {
        if let Some(id) = id {
            if !self.state.has_node(id) {
                warn!(node = %id, "select_single: unknown node");
                return;
            }
        }
        let selection = id.cloned().map_or_else(Selection::default, Selection::single);
        self.commit("select_single", move |state| {
            if state.selection == selection {
                return None;
            }
            state.selection = selection;
            Some(())
        });
    }

    pub fn set_ui(&mut self, patch: &UiPatch) {
        self.commit("set_ui", |state| patch.apply(&mut state.ui).then_some(()));
    }

    pub fn set_viewport(&mut self, patch: &ViewportPatch) {
        self.commit("set_viewport", |state| {
            patch.apply(&mut state.viewport).then_some(())
        });
    }

    /// Clear chains, nodes and selection and reset the viewport. UI settings
    /// are kept. Undoable.
    pub fn reset(&mut self) {
        self.commit("reset", |state| {
            let cleared = ProjectState {
                ui: state.ui.clone(),
                ..ProjectState::default()
            };
            if *state == cleared {
                return None;
            }
            *state = cleared;
            Some(())
        });
    }

    // ====================================================================
    // Catalog
    // ====================================================================

    /// Swap the shared catalog. Not recorded in history; node configs are
    /// left as they are.
    pub fn set_catalog(&mut self, catalog: Catalog) {
        info!(kinds = catalog.len(), "catalog replaced");
        self.catalog = Arc::new(catalog);
        self.changed();
    }

    // ====================================================================
    // Batching
    // ====================================================================

    /// Open a batch. Batches nest; only the outermost one commits.
    pub fn begin_batch(&mut self) {
        self.batch.depth += 1;
        debug!(depth = self.batch.depth, "begin_batch");
    }

    /// Close a batch. Closing the outermost batch notifies subscribers once
    /// if anything changed inside it.
    pub fn end_batch(&mut self) {
        if self.batch.depth == 0 {
            warn!("end_batch without matching begin_batch");
            return;
        }
        self.batch.depth -= 1;
        debug!(depth = self.batch.depth, "end_batch");
        if self.batch.depth == 0 {
            self.batch.recorded = false;
            if std::mem::take(&mut self.batch.pending) {
                self.notify();
            }
        }
    }

    pub fn in_batch(&self) -> bool {
        self.batch.depth > 0
    }

    // ====================================================================
    // History
    // ====================================================================

    /// Restore the state before the most recent step. No-op on an empty
    /// history or inside a batch.
    pub fn undo(&mut self) -> bool {
        if self.in_batch() {
            warn!("undo ignored inside a batch");
            return false;
        }
        let current = Arc::clone(&self.state);
        let Some(previous) = self.history.undo(current) else {
            return false;
        };
        self.state = previous;
        debug!(undo = self.history.undo_depth(), redo = self.history.redo_depth(), "undo");
        self.notify();
        true
    }

    /// Re-apply the most recently undone step. No-op when nothing was undone
    /// or inside a batch.
    pub fn redo(&mut self) -> bool {
        if self.in_batch() {
            warn!("redo ignored inside a batch");
            return false;
        }
        let current = Arc::clone(&self.state);
        let Some(next) = self.history.redo(current) else {
            return false;
        };
        self.state = next;
        debug!(undo = self.history.undo_depth(), redo = self.history.redo_depth(), "redo");
        self.notify();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.undo_depth() > 0
    }

    pub fn can_redo(&self) -> bool {
        self.history.redo_depth() > 0
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.batch.recorded = false;
    }

    // ====================================================================
    // Documents
    // ====================================================================

    /// Independent copy of the whole state.
    pub fn export_project(&self) -> ProjectSnapshot {
        ProjectSnapshot::from(self.state.as_ref())
    }

    /// Replace the whole state and clear history.
    ///
    /// A chain can hold only one enabled light source; extra ones in the
    /// document are loaded disabled. Nodes pointing at missing chains are
    /// kept and reported.
    pub fn load_project(&mut self, doc: ProjectSnapshot) {
        let mut state = ProjectState::from(doc);

        let mut anchored: Vec<ChainId> = Vec::new();
        for node in state.nodes.iter_mut() {
            if !node.is_light_source() || node.disabled {
                continue;
            }
            if anchored.contains(&node.chain_id) {
                warn!(node = %node.id, chain = %node.chain_id, "extra light source loaded disabled");
                node.disabled = true;
            } else {
                anchored.push(node.chain_id.clone());
            }
        }
        for chain_id in state.dangling_chain_ids() {
            warn!(chain = %chain_id, "project references unknown chain");
        }

        info!(
            chains = state.chains.len(),
            nodes = state.nodes.len(),
            "project loaded"
        );
        self.state = Arc::new(state);
        self.history.clear();
        self.batch.recorded = false;
        self.changed();
    }

    // ====================================================================
    // Subscribers
    // ====================================================================

    /// Call `listener` after every committed change.
    pub fn subscribe(&mut self, listener: impl FnMut(&ProjectState) + 'static) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.listeners.insert(id, Box::new(listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    // ====================================================================
    // Internals
    // ====================================================================

    /// Apply `mutate` to a copy of the state.
    ///
    /// `None` from the closure means nothing changed: the copy is discarded
    /// and neither history nor subscribers see anything.
    fn commit<T>(
        &mut self,
        action: &'static str,
        mutate: impl FnOnce(&mut ProjectState) -> Option<T>,
    ) -> Option<T> {
        let mut next = ProjectState::clone(&self.state);
        let output = mutate(&mut next)?;
        if next == *self.state {
            return None;
        }

        if !self.batch.recorded {
            self.history.record(Arc::clone(&self.state));
            self.batch.recorded = self.in_batch();
        }
        self.state = Arc::new(next);
        debug!(action, undo = self.history.undo_depth(), "committed");
        self.changed();
        Some(output)
    }

    fn changed(&mut self) {
        if self.in_batch() {
            self.batch.pending = true;
        } else {
            self.notify();
        }
    }

    fn notify(&mut self) {
        let state: &ProjectState = &self.state;
        for listener in self.listeners.values_mut() {
            listener(state);
        }
    }

    fn mint_chain_id(&mut self) -> ChainId {
        loop {
            self.next_chain_seq += 1;
            let id = ChainId::from_sequence(self.next_chain_seq);
            // Orphaned nodes from a loaded document must not be adopted.
            if !self.state.chain_id_in_use(&id) {
                return id;
            }
        }
    }

    fn mint_node_id(&mut self) -> NodeId {
        loop {
            self.next_node_seq += 1;
            let id = NodeId::from_sequence(self.next_node_seq);
            if !self.state.has_node(&id) {
                return id;
            }
        }
    }
}

