use std::collections::HashMap;

use crate::{
    foundation::core::hex16,
    frame::model::{LayerRecord, LayerTreeNode},
};

/// Deepest layer kept by [`build_layer_tree`], counting a root as depth 1.
///
/// Archived frames nest two JSON levels per layer and must stay under `serde_json`'s recursion
/// limit of 128 to import again.
pub const MAX_LAYER_DEPTH: usize = 48;

/// Rebuild the layer forest from a flat, parent-linked record list.
///
/// Records are grouped by `parent_ptr` first and attached by own `ptr` second, so a child may
/// appear before its parent in `records`. Siblings keep their relative input order. A record
/// whose parent is absent from the list is dropped (neither root nor error). Subtrees below
/// [`MAX_LAYER_DEPTH`] are dropped with a warning.
#[tracing::instrument(skip(records), fields(records = records.len()))]
pub fn build_layer_tree(records: Vec<LayerRecord>) -> Vec<LayerTreeNode> {
    let mut slots = Vec::<Option<LayerRecord>>::with_capacity(records.len());
    let mut roots = Vec::<usize>::new();
    let mut by_parent = HashMap::<u64, Vec<usize>>::new();

    for record in records {
        let idx = slots.len();
        if record.is_root() {
            roots.push(idx);
        } else {
            by_parent.entry(record.parent_ptr).or_default().push(idx);
        }
        slots.push(Some(record));
    }

    // Groups are removed as they are attached: a record is placed at most once, even when
    // addresses repeat or form a cycle.
    let mut children_of = vec![Vec::<usize>::new(); slots.len()];
    let mut preorder = Vec::<usize>::with_capacity(slots.len());
    let mut too_deep = Vec::<u64>::new();
    let mut work: Vec<(usize, usize)> = roots.iter().rev().map(|&idx| (idx, 1)).collect();

    while let Some((idx, depth)) = work.pop() {
        preorder.push(idx);
        let Some(ptr) = slots[idx].as_ref().map(|r| r.ptr) else {
            continue;
        };
        let Some(children) = by_parent.remove(&ptr) else {
            continue;
        };
        if depth >= MAX_LAYER_DEPTH {
            too_deep.extend(children.iter().filter_map(|&c| slots[c].as_ref().map(|r| r.ptr)));
            continue;
        }
        work.extend(children.iter().rev().map(|&c| (c, depth + 1)));
        children_of[idx] = children;
    }

    if !too_deep.is_empty() {
        let mut dropped = 0usize;
        let mut pending = too_deep;
        while let Some(ptr) = pending.pop() {
            dropped += 1;
            if let Some(children) = by_parent.remove(&ptr) {
                pending.extend(children.iter().filter_map(|&c| slots[c].as_ref().map(|r| r.ptr)));
            }
        }
        tracing::warn!(
            max_depth = MAX_LAYER_DEPTH,
            dropped,
            "dropping layers nested below the depth limit"
        );
    }

    for (parent_ptr, orphans) in &by_parent {
        for &orphan in orphans {
            if let Some(record) = &slots[orphan] {
                tracing::debug!(
                    ptr = %hex16(record.ptr),
                    parent_ptr = %hex16(*parent_ptr),
                    "dropping layer whose parent is not in this dump"
                );
            }
        }
    }

    // Children precede their parent in reverse preorder, so every subtree is complete when its
    // parent is assembled.
    let mut built = Vec::<Option<LayerTreeNode>>::new();
    built.resize_with(slots.len(), || None);
    for &idx in preorder.iter().rev() {
        let Some(record) = slots[idx].take() else {
            continue;
        };
        let mut node = LayerTreeNode::new(record);
        node.children = children_of[idx]
            .iter()
            .filter_map(|&c| built[c].take())
            .collect();
        built[idx] = Some(node);
    }

    roots.iter().filter_map(|&idx| built[idx].take()).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/frame/tree.rs"]
mod tests;
