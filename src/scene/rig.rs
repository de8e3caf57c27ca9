use std::sync::atomic::{AtomicU64, Ordering};

use glam::{Affine3A, Quat, Vec3};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::scene::BoneHandle;
use crate::scene::node::BoneNode;
use crate::scene::transform::Transform;

/// Arena-owned node hierarchy.
///
/// A rig owns every node it contains. Other structures (bone maps, clone
/// correspondences, synchronizer slots) only ever hold [`BoneHandle`]s, so
/// removing a subtree turns those handles into lookups that miss instead of
/// dangling references.
///
/// Handles are only unique within one rig, so every rig (clones included)
/// also carries a process-unique [`id`](Rig::id).
#[derive(Debug)]
pub struct Rig {
    id: u64,
    nodes: SlotMap<BoneHandle, BoneNode>,
    root_nodes: Vec<BoneHandle>,
}

fn next_rig_id() -> u64 {
    static NEXT_ID: AtomicU64 = AtomicU64::new(1);
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

impl Default for Rig {
    fn default() -> Self {
        Self {
            id: next_rig_id(),
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
        }
    }
}

impl Clone for Rig {
    fn clone(&self) -> Self {
        Self {
            id: next_rig_id(),
            nodes: self.nodes.clone(),
            root_nodes: self.root_nodes.clone(),
        }
    }
}

impl Rig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, handle: BoneHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    /// Root nodes in insertion order.
    #[inline]
    #[must_use]
    pub fn roots(&self) -> &[BoneHandle] {
        &self.root_nodes
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Adds a node as a new root.
    pub fn add_node(&mut self, node: BoneNode) -> BoneHandle {
        let handle = self.nodes.insert(BoneNode {
            parent: None,
            children: Vec::new(),
            ..node
        });
        self.root_nodes.push(handle);
        handle
    }

    /// Creates an identity-transform root node.
    pub fn create_node(&mut self, name: &str) -> BoneHandle {
        self.add_node(BoneNode::new(name))
    }

    /// Adds a node as the last child of `parent`.
    ///
    /// Falls back to adding a root when `parent` is not part of this rig.
    pub fn add_to_parent(&mut self, node: BoneNode, parent: BoneHandle) -> BoneHandle {
        if !self.nodes.contains_key(parent) {
            log::warn!("Parent node {parent:?} not found, adding '{}' as a root", node.name);
            return self.add_node(node);
        }

        let handle = self.nodes.insert(BoneNode {
            parent: Some(parent),
            children: Vec::new(),
            ..node
        });
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(handle);
        }
        handle
    }

    /// Creates a child node with the given local transform.
    pub fn create_child(&mut self, parent: BoneHandle, name: &str, transform: Transform) -> BoneHandle {
        self.add_to_parent(BoneNode::new(name).with_transform(transform), parent)
    }

    /// Re-parents `child` under `parent`, keeping its local transform.
    ///
    /// Refuses to attach a node to itself or to one of its own descendants.
    pub fn attach(&mut self, child: BoneHandle, parent: BoneHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            log::error!("Node not found during attach!");
            return;
        }
        if self.is_ancestor_of(child, parent) {
            log::warn!("Cannot attach node {child:?} below its own descendant {parent:?}");
            return;
        }

        // 1. Detach from old
        self.detach_link(child);

        // 2. Attach to new
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Removes a node and its whole subtree.
    pub fn remove_node(&mut self, handle: BoneHandle) {
        if !self.nodes.contains_key(handle) {
            return;
        }

        self.detach_link(handle);

        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
        }
    }

    fn detach_link(&mut self, handle: BoneHandle) {
        let old_parent = self.nodes.get(handle).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p)
                && let Some(i) = n.children.iter().position(|&x| x == handle)
            {
                n.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == handle) {
            self.root_nodes.remove(i);
        }
        if let Some(n) = self.nodes.get_mut(handle) {
            n.parent = None;
        }
    }

    fn is_ancestor_of(&self, ancestor: BoneHandle, handle: BoneHandle) -> bool {
        let mut current = self.parent(handle);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: BoneHandle) -> Option<&BoneNode> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: BoneHandle) -> Option<&mut BoneNode> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    #[must_use]
    pub fn name(&self, handle: BoneHandle) -> Option<&str> {
        self.nodes.get(handle).map(|n| n.name.as_str())
    }

    #[inline]
    #[must_use]
    pub fn parent(&self, handle: BoneHandle) -> Option<BoneHandle> {
        self.nodes.get(handle).and_then(|n| n.parent)
    }

    #[inline]
    #[must_use]
    pub fn children(&self, handle: BoneHandle) -> &[BoneHandle] {
        self.nodes.get(handle).map_or(&[], |n| n.children.as_slice())
    }

    #[inline]
    #[must_use]
    pub fn transform(&self, handle: BoneHandle) -> Option<&Transform> {
        self.nodes.get(handle).map(|n| &n.transform)
    }

    #[inline]
    pub fn transform_mut(&mut self, handle: BoneHandle) -> Option<&mut Transform> {
        self.nodes.get_mut(handle).map(|n| &mut n.transform)
    }

    /// Hierarchical pre-order traversal of the subtree rooted at `root`.
    ///
    /// Children are visited in their stored order, so the result is stable for an
    /// unchanged hierarchy.
    #[must_use]
    pub fn traverse(&self, root: BoneHandle) -> Vec<BoneHandle> {
        let mut order = Vec::with_capacity(self.nodes.len());
        if !self.nodes.contains_key(root) {
            return order;
        }

        let mut stack: Vec<BoneHandle> = Vec::with_capacity(64);
        stack.push(root);
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            order.push(handle);
            // Reverse push keeps the stored child order on pop
            stack.extend(node.children.iter().rev().copied());
        }
        order
    }

    /// First node in pre-order whose name equals `name`.
    #[must_use]
    pub fn find_by_name(&self, root: BoneHandle, name: &str) -> Option<BoneHandle> {
        self.traverse(root)
            .into_iter()
            .find(|&h| self.name(h) == Some(name))
    }

    /// Name → handle index over a subtree. Duplicate names keep the first node in
    /// pre-order.
    #[must_use]
    pub fn name_index(&self, root: BoneHandle) -> FxHashMap<&str, BoneHandle> {
        let mut index = FxHashMap::default();
        for handle in self.traverse(root) {
            if let Some(name) = self.name(handle) {
                index.entry(name).or_insert(handle);
            }
        }
        index
    }

    // ========================================================================
    // World space
    // ========================================================================

    /// World matrix of a node, composed from its ancestors' local transforms.
    ///
    /// Returns identity for a handle that is not in this rig.
    #[must_use]
    pub fn world_matrix(&self, handle: BoneHandle) -> Affine3A {
        let Some(node) = self.nodes.get(handle) else {
            return Affine3A::IDENTITY;
        };

        let mut world = node.transform.local_matrix();
        let mut current = node.parent;
        while let Some(p) = current {
            let Some(parent) = self.nodes.get(p) else {
                break;
            };
            world = parent.transform.local_matrix() * world;
            current = parent.parent;
        }
        world
    }

    #[inline]
    #[must_use]
    pub fn world_position(&self, handle: BoneHandle) -> Vec3 {
        self.world_matrix(handle).translation.into()
    }

    /// World rotation as the product of the ancestors' local rotations.
    #[must_use]
    pub fn world_rotation(&self, handle: BoneHandle) -> Quat {
        let Some(node) = self.nodes.get(handle) else {
            return Quat::IDENTITY;
        };

        let mut rotation = node.transform.rotation;
        let mut current = node.parent;
        while let Some(p) = current {
            let Some(parent) = self.nodes.get(p) else {
                break;
            };
            rotation = parent.transform.rotation * rotation;
            current = parent.parent;
        }
        rotation.normalize()
    }

    /// Moves a node so that its world position becomes `position`.
    pub fn set_world_position(&mut self, handle: BoneHandle, position: Vec3) {
        let parent_world = self
            .parent(handle)
            .map_or(Affine3A::IDENTITY, |p| self.world_matrix(p));
        let local = parent_world.inverse().transform_point3(position);
        if let Some(node) = self.nodes.get_mut(handle) {
            node.transform.position = local;
        }
    }

    /// Rotates a node so that its world rotation becomes `rotation`.
    pub fn set_world_rotation(&mut self, handle: BoneHandle, rotation: Quat) {
        let parent_rotation = self
            .parent(handle)
            .map_or(Quat::IDENTITY, |p| self.world_rotation(p));
        let local = (parent_rotation.inverse() * rotation).normalize();
        if let Some(node) = self.nodes.get_mut(handle) {
            node.transform.rotation = local;
        }
    }
}
