//! Deterministic ordering for editor file trees.

use std::cmp::Ordering;

use super::model::Node;

/// Folders before files, then byte-wise by name, then by id.
///
/// The id tiebreak keeps siblings with equal names in a stable order.
pub fn tree_order(a: &Node, b: &Node) -> Ordering {
    b.is_folder()
        .cmp(&a.is_folder())
        .then_with(|| a.name.as_bytes().cmp(b.name.as_bytes()))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort nodes in place using [`tree_order`].
pub fn sort_tree(nodes: &mut [Node]) {
    nodes.sort_by(tree_order);
}
