//! Transform System
//!
//! World-matrix propagation over the node arena, decoupled from [`Scene`] so
//! it only borrows the node storage.
//!
//! For every node `N` with parent `P`: `world(N) = world(P) · local(N)`, and
//! the root's world matrix equals its local matrix. Traversal uses an explicit
//! stack so deep hierarchies cannot overflow the call stack.
//!
//! [`Scene`]: crate::scene::Scene

use slotmap::SlotMap;

use crate::math::Matrix4f;
use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// Recomputes world matrices for the subtree rooted at `root`, treating
/// `root` as having no parent.
pub fn update_hierarchy(nodes: &mut SlotMap<NodeHandle, Node>, root: NodeHandle) {
    update_from(nodes, root, Matrix4f::identity());
}

/// Recomputes world matrices for the subtree rooted at `handle`, starting
/// from its parent's current world matrix.
pub fn update_subtree(nodes: &mut SlotMap<NodeHandle, Node>, handle: NodeHandle) {
    let Some(node) = nodes.get(handle) else {
        return;
    };
    let parent_world = node
        .parent
        .and_then(|p| nodes.get(p))
        .map_or_else(Matrix4f::identity, |p| *p.world_matrix());

    update_from(nodes, handle, parent_world);
}

fn update_from(nodes: &mut SlotMap<NodeHandle, Node>, start: NodeHandle, parent_world: Matrix4f) {
    let mut stack: Vec<(NodeHandle, Matrix4f)> = Vec::with_capacity(64);
    stack.push((start, parent_world));

    while let Some((handle, parent_world)) = stack.pop() {
        let Some(node) = nodes.get_mut(handle) else {
            continue;
        };

        node.transform.refresh_world(&parent_world);
        let world = *node.transform.world_matrix();

        // Reverse so children pop in order.
        for &child in node.children.iter().rev() {
            stack.push((child, world));
        }
    }
}

/// Handles of the subtree rooted at `root` in pre-order (parent before
/// children, siblings in insertion order).
#[must_use]
pub fn pre_order(nodes: &SlotMap<NodeHandle, Node>, root: NodeHandle) -> Vec<NodeHandle> {
    let mut order = Vec::new();
    let mut stack = vec![root];

    while let Some(handle) = stack.pop() {
        let Some(node) = nodes.get(handle) else {
            continue;
        };
        order.push(handle);
        stack.extend(node.children.iter().rev().copied());
    }

    order
}

/// Whether `ancestor` is `node` itself or one of its ancestors.
#[must_use]
pub fn is_ancestor_or_self(nodes: &SlotMap<NodeHandle, Node>, ancestor: NodeHandle, node: NodeHandle) -> bool {
    let mut current = Some(node);
    while let Some(handle) = current {
        if handle == ancestor {
            return true;
        }
        current = nodes.get(handle).and_then(|n| n.parent);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector3f;

    #[test]
    fn test_hierarchy_update() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();

        let mut parent = Node::new("parent");
        parent.transform.position = Vector3f::new(1.0, 0.0, 0.0);
        let parent_handle = nodes.insert(parent);

        let mut child = Node::new("child");
        child.transform.position = Vector3f::new(0.0, 1.0, 0.0);
        child.parent = Some(parent_handle);
        let child_handle = nodes.insert(child);

        nodes[parent_handle].children.push(child_handle);

        update_hierarchy(&mut nodes, parent_handle);

        let child_world_pos = nodes[child_handle].transform.world_position();
        assert!((child_world_pos.x - 1.0).abs() < 1e-5);
        assert!((child_world_pos.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn pre_order_visits_parent_before_children() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();
        let a = nodes.insert(Node::new("a"));
        let b = nodes.insert(Node::new("b"));
        let c = nodes.insert(Node::new("c"));
        let d = nodes.insert(Node::new("d"));
        nodes[a].children = vec![b, d];
        nodes[b].children = vec![c];

        assert_eq!(pre_order(&nodes, a), vec![a, b, c, d]);
    }
}
