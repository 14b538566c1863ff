//! File and folder node entities.

pub mod model;
pub mod order;

pub use model::{CreateNode, Node, NodeKind, extension_of};
pub use order::{sort_tree, tree_order};
