use lumen_catalog::Catalog;
use lumen_model::{ChainPatch, NewNode, NodeId};
use lumen_store::{DeletePolicy, DomainStore, StoreConfig};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    AddLightSource,
    AddComponent(usize),
    SetLeds(usize, u32),
    Disable(usize, bool),
    Remove(usize),
    Move(usize, usize),
    Reorder(usize, usize, usize),
    Select(usize),
    DeleteLightSource(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::AddLightSource),
        (0..4usize).prop_map(Op::AddComponent),
        (0..4usize, 0..50u32).prop_map(|(c, n)| Op::SetLeds(c, n)),
        (0..12usize, any::<bool>()).prop_map(|(n, d)| Op::Disable(n, d)),
        (0..12usize).prop_map(Op::Remove),
        (0..12usize, 0..4usize).prop_map(|(n, c)| Op::Move(n, c)),
        (0..12usize, 0..4usize, 0..6usize).prop_map(|(n, c, i)| Op::Reorder(n, c, i)),
        (0..12usize).prop_map(Op::Select),
        (0..12usize).prop_map(Op::DeleteLightSource),
    ]
}

fn node_at(store: &DomainStore, index: usize) -> Option<NodeId> {
    let nodes = store.state().nodes();
    if nodes.is_empty() {
        return None;
    }
    nodes.get(index % nodes.len()).map(|node| node.id.clone())
}

fn apply(store: &mut DomainStore, op: &Op) {
    let chains: Vec<_> = store.state().chains().iter().map(|c| c.id.clone()).collect();
    let chain_at = |i: usize| (!chains.is_empty()).then(|| chains[i % chains.len()].clone());
    match *op {
        Op::AddLightSource => {
            store.add_light_source();
        }
        Op::AddComponent(c) => {
            if let Some(chain) = chain_at(c) {
                store.add_node(NewNode::new(chain, "LightPipe").config("type", "Single"));
            }
        }
        Op::SetLeds(c, n) => {
            if let Some(chain) = chain_at(c) {
                store.update_chain(&chain, &ChainPatch::default().led_count(f64::from(n)));
            }
        }
        Op::Disable(n, disabled) => {
            if let Some(id) = node_at(store, n) {
                store.set_node_disabled(&id, disabled);
            }
        }
        Op::Remove(n) => {
            if let Some(id) = node_at(store, n) {
                store.remove_node(&id);
            }
        }
        Op::Move(n, c) => {
            if let (Some(id), Some(chain)) = (node_at(store, n), chain_at(c)) {
                store.move_node_to_chain(&id, &chain);
            }
        }
        Op::Reorder(n, c, i) => {
            if let (Some(id), Some(chain)) = (node_at(store, n), chain_at(c)) {
                store.reorder_node_in_chain(&id, &chain, i);
            }
        }
        Op::Select(n) => {
            let id = node_at(store, n);
            store.select_single(id.as_ref());
        }
        Op::DeleteLightSource(n) => {
            if let Some(id) = node_at(store, n) {
                store.delete_light_source(&id, DeletePolicy::StashLightSource);
            }
        }
    }
}

fn check_invariants(store: &DomainStore) -> Result<(), TestCaseError> {
    let state = store.state();
    prop_assert!(state.dangling_chain_ids().is_empty());
    for chain in state.chains() {
        let enabled_sources = state
            .nodes()
            .iter()
            .filter(|n| n.chain_id == chain.id && n.is_light_source() && !n.disabled)
            .count();
        prop_assert!(enabled_sources <= 1);
    }
    for id in &state.selection().ids {
        prop_assert!(state.has_node(id));
    }
    Ok(())
}

proptest! {
    #[test]
    fn batch_collapses_to_one_step(
        setup in proptest::collection::vec(op(), 0..10),
        batched in proptest::collection::vec(op(), 1..10),
    ) {
        let mut store = DomainStore::new(Catalog::new(), StoreConfig::unlimited());
        for op in &setup {
            apply(&mut store, op);
        }
        let depth = store.undo_depth();
        let before = store.export_project();

        store.begin_batch();
        for op in &batched {
            apply(&mut store, op);
        }
        store.end_batch();
        check_invariants(&store)?;

        if store.export_project() == before {
            prop_assert!(store.undo_depth() <= depth + 1);
        } else {
            prop_assert_eq!(store.undo_depth(), depth + 1);
            prop_assert!(store.undo());
            prop_assert_eq!(store.export_project(), before);
        }
    }

    #[test]
    fn undo_then_redo_is_identity(ops in proptest::collection::vec(op(), 1..20)) {
        let mut store = DomainStore::new(Catalog::new(), StoreConfig::unlimited());
        for op in &ops {
            apply(&mut store, op);
            check_invariants(&store)?;
        }

        let latest = store.export_project();
        if store.undo() {
            prop_assert!(store.redo());
        }
        prop_assert_eq!(store.export_project(), latest);
    }
}
