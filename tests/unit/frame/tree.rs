use super::*;
use crate::frame::model::LayerKind;

fn rec(ptr: u64, parent: u64) -> LayerRecord {
    LayerRecord::new(LayerKind::Container, ptr, parent)
}

fn ptrs(nodes: &[LayerTreeNode]) -> Vec<u64> {
    nodes.iter().map(|n| n.value.ptr).collect()
}

#[test]
fn single_root_with_ordered_children() {
    let roots = build_layer_tree(vec![rec(1, 0), rec(2, 1), rec(3, 1)]);
    assert_eq!(ptrs(&roots), vec![1]);
    assert_eq!(ptrs(&roots[0].children), vec![2, 3]);
}

#[test]
fn orphan_is_neither_root_nor_error() {
    let roots = build_layer_tree(vec![rec(2, 99)]);
    assert!(roots.is_empty());
}

#[test]
fn children_before_parent_are_still_attached() {
    let roots = build_layer_tree(vec![rec(4, 2), rec(3, 1), rec(2, 1), rec(1, 0)]);
    assert_eq!(ptrs(&roots), vec![1]);
    assert_eq!(ptrs(&roots[0].children), vec![3, 2]);
    assert_eq!(ptrs(&roots[0].children[1].children), vec![4]);
}

#[test]
fn multiple_roots_form_a_forest() {
    let roots = build_layer_tree(vec![rec(1, 0), rec(10, 0), rec(11, 10), rec(2, 1)]);
    assert_eq!(ptrs(&roots), vec![1, 10]);
    assert_eq!(ptrs(&roots[0].children), vec![2]);
    assert_eq!(ptrs(&roots[1].children), vec![11]);
}

#[test]
fn full_64_bit_addresses_are_distinct() {
    let hi = 0x0000_7f00_0000_0001;
    let lo = 0x0000_0000_0000_0001;
    let roots = build_layer_tree(vec![rec(hi, 0), rec(5, hi), rec(6, lo)]);
    assert_eq!(ptrs(&roots), vec![hi]);
    assert_eq!(ptrs(&roots[0].children), vec![5]);
}

#[test]
fn self_parented_cycle_terminates() {
    let roots = build_layer_tree(vec![rec(1, 0), rec(2, 2), rec(3, 1)]);
    assert_eq!(ptrs(&roots), vec![1]);
    assert_eq!(roots[0].subtree_len(), 2);
}

#[test]
fn empty_input_is_empty_forest() {
    assert!(build_layer_tree(Vec::new()).is_empty());
}

fn depth(node: &LayerTreeNode) -> usize {
    let mut depth = 1;
    let mut cursor = node;
    while let Some(child) = cursor.children.first() {
        depth += 1;
        cursor = child;
    }
    depth
}

#[test]
fn deep_chain_is_cut_at_the_depth_limit() {
    let n = 12_000u64;
    let mut records = vec![rec(1, 0)];
    records.extend((2..=n).map(|ptr| rec(ptr, ptr - 1)));

    let roots = build_layer_tree(records);
    assert_eq!(ptrs(&roots), vec![1]);
    assert_eq!(depth(&roots[0]), MAX_LAYER_DEPTH);
    assert_eq!(roots[0].subtree_len(), MAX_LAYER_DEPTH);
    assert!(roots[0].find(MAX_LAYER_DEPTH as u64).is_some());
    assert!(roots[0].find(MAX_LAYER_DEPTH as u64 + 1).is_none());
}

#[test]
fn deep_chain_listed_leaf_first_is_cut_too() {
    let n = 12_000u64;
    let mut records: Vec<LayerRecord> = (2..=n).rev().map(|ptr| rec(ptr, ptr - 1)).collect();
    records.push(rec(1, 0));

    let roots = build_layer_tree(records);
    assert_eq!(depth(&roots[0]), MAX_LAYER_DEPTH);
}

#[test]
fn siblings_below_the_limit_are_kept() {
    let cap = MAX_LAYER_DEPTH as u64;
    let mut records = vec![rec(1, 0)];
    records.extend((2..=cap).map(|ptr| rec(ptr, ptr - 1)));
    records.push(rec(10_000, 1));

    let roots = build_layer_tree(records);
    assert_eq!(ptrs(&roots[0].children), vec![2, 10_000]);
    assert_eq!(roots[0].subtree_len(), MAX_LAYER_DEPTH + 1);
}
