// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat scene tree storage.
//!
//! Nodes are stored by id with a parent link and an ordered child list.
//! The root always exists. Nodes without a parent other than the root are
//! *unparented*: they arrive from remote creates before the update that
//! places them and are invisible until adopted.

use std::collections::{HashMap, HashSet, VecDeque};

use tableau_core::NodeId;
use tableau_core::props::{Props, declares_layout};

use crate::error::SyncError;
use crate::node::{DataNode, SceneNode};

#[derive(Clone, Debug, PartialEq)]
struct Entry {
    props: Props,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Entry {
    fn new(props: Props, parent: Option<NodeId>) -> Self {
        Self {
            props,
            parent,
            children: Vec::new(),
        }
    }
}

/// The in-memory scene tree.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneTree {
    root: NodeId,
    nodes: HashMap<NodeId, Entry>,
}

impl SceneTree {
    /// Creates a tree holding only the root.
    #[must_use]
    pub fn new(root: NodeId, props: Props) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(root.clone(), Entry::new(props, None));
        Self { root, nodes }
    }

    /// Rebuilds a tree from its flat form.
    ///
    /// Nodes are reached from `root` through child id lists. Child ids with
    /// no matching node are skipped, as are repeated references and nodes
    /// unreachable from the root.
    pub fn from_data_nodes(
        root: &NodeId,
        nodes: impl IntoIterator<Item = DataNode>,
    ) -> Result<Self, SyncError> {
        let mut by_id: HashMap<NodeId, DataNode> =
            nodes.into_iter().map(|n| (n.id.clone(), n)).collect();
        let root_node = by_id
            .remove(root)
            .ok_or_else(|| SyncError::UnknownNode(root.clone()))?;
        let mut tree = Self::new(root.clone(), root_node.props);
        let mut queue = VecDeque::from([(root.clone(), root_node.child_ids)]);
        while let Some((parent, child_ids)) = queue.pop_front() {
            for child in child_ids {
                let Some(node) = by_id.remove(&child) else {
                    log::trace!("skipping missing child {child} of {parent}");
                    continue;
                };
                tree.nodes
                    .insert(child.clone(), Entry::new(node.props, Some(parent.clone())));
                if let Some(entry) = tree.nodes.get_mut(&parent) {
                    entry.children.push(child.clone());
                }
                queue.push_back((child, node.child_ids));
            }
        }
        Ok(tree)
    }

    /// Root id.
    #[must_use]
    pub fn root(&self) -> &NodeId {
        &self.root
    }

    /// Number of stored nodes, unparented ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns `true` if a node has the id.
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// The node's props.
    #[must_use]
    pub fn props(&self, id: &NodeId) -> Option<&Props> {
        self.nodes.get(id).map(|e| &e.props)
    }

    /// The node's parent.
    #[must_use]
    pub fn parent(&self, id: &NodeId) -> Option<&NodeId> {
        self.nodes.get(id).and_then(|e| e.parent.as_ref())
    }

    /// The node's children in document order; empty for unknown ids.
    #[must_use]
    pub fn children(&self, id: &NodeId) -> &[NodeId] {
        self.nodes.get(id).map_or(&[], |e| &e.children)
    }

    /// Position of the node among its siblings.
    #[must_use]
    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| c == id)
    }

    /// Returns `true` if `ancestor` is a strict ancestor of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let mut current = self.parent(node);
        // Bounded walk: a malformed parent chain must not loop forever.
        for _ in 0..self.nodes.len() {
            match current {
                Some(p) if p == ancestor => return true,
                Some(p) => current = self.parent(p),
                None => return false,
            }
        }
        false
    }

    /// Returns `true` if the node is a layout container: the root, or any
    /// node whose props select a layout.
    #[must_use]
    pub fn is_container(&self, id: &NodeId) -> bool {
        *id == self.root || self.props(id).is_some_and(declares_layout)
    }

    /// Nearest container strictly above the node.
    #[must_use]
    pub fn container_of(&self, id: &NodeId) -> Option<&NodeId> {
        let mut current = self.parent(id);
        for _ in 0..self.nodes.len() {
            let p = current?;
            if self.is_container(p) {
                return Some(p);
            }
            current = self.parent(p);
        }
        None
    }

    /// The direct child of the node's enclosing container that holds it:
    /// the node itself, or the outermost plain group node between the two.
    #[must_use]
    pub fn hosting_slot(&self, id: &NodeId) -> Option<&NodeId> {
        let (mut current, _) = self.nodes.get_key_value(id)?;
        for _ in 0..self.nodes.len() {
            let parent = self.parent(current)?;
            if self.is_container(parent) {
                return Some(current);
            }
            current = parent;
        }
        None
    }

    /// Every container reachable from the root with its enclosing
    /// container, parents before children.
    #[must_use]
    pub fn containers(&self) -> Vec<(NodeId, Option<NodeId>)> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root.clone(), None::<NodeId>)];
        while let Some((id, enclosing)) = stack.pop() {
            let enclosing = if self.is_container(&id) {
                out.push((id.clone(), enclosing));
                Some(id.clone())
            } else {
                enclosing
            };
            for child in self.children(&id).iter().rev() {
                stack.push((child.clone(), enclosing.clone()));
            }
        }
        out
    }

    /// The node and all its descendants in pre-order.
    #[must_use]
    pub fn descendants(&self, id: &NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![id.clone()];
        while let Some(next) = stack.pop() {
            stack.extend(self.children(&next).iter().rev().cloned());
            out.push(next);
        }
        out
    }

    /// Creates a node under `parent` at `index` (clamped; `None` appends).
    pub fn insert(
        &mut self,
        id: NodeId,
        props: Props,
        parent: &NodeId,
        index: Option<usize>,
    ) -> Result<(), SyncError> {
        if self.contains(&id) {
            return Err(SyncError::DuplicateNode(id));
        }
        let siblings = &mut self.entry_mut(parent)?.children;
        let at = index.map_or(siblings.len(), |i| i.min(siblings.len()));
        siblings.insert(at, id.clone());
        self.nodes.insert(id, Entry::new(props, Some(parent.clone())));
        Ok(())
    }

    /// Shallow-merges `patch` into the node's props; `null` values delete
    /// keys. Returns `true` if anything changed.
    pub fn update(&mut self, id: &NodeId, patch: &Props) -> Result<bool, SyncError> {
        Ok(merge_props(&mut self.entry_mut(id)?.props, patch))
    }

    /// Replaces the node's props wholesale. Returns `true` if they differ.
    pub fn replace_props(&mut self, id: &NodeId, props: Props) -> Result<bool, SyncError> {
        let entry = self.entry_mut(id)?;
        let changed = entry.props != props;
        entry.props = props;
        Ok(changed)
    }

    /// Stores a node with no parent.
    pub fn insert_unparented(&mut self, id: NodeId, props: Props) -> Result<(), SyncError> {
        if self.contains(&id) {
            return Err(SyncError::DuplicateNode(id));
        }
        self.nodes.insert(id, Entry::new(props, None));
        Ok(())
    }

    /// Deletes the node and its subtree, returning the deleted ids in
    /// pre-order.
    pub fn remove(&mut self, id: &NodeId) -> Result<Vec<NodeId>, SyncError> {
        if *id == self.root {
            return Err(SyncError::RootImmutable);
        }
        if !self.contains(id) {
            return Err(SyncError::UnknownNode(id.clone()));
        }
        self.detach(id);
        let subtree = self.descendants(id);
        for node in &subtree {
            self.nodes.remove(node);
        }
        Ok(subtree)
    }

    /// Moves the node under `parent` at `index` (clamped; `None` appends),
    /// returning its previous parent.
    pub fn move_node(
        &mut self,
        id: &NodeId,
        parent: &NodeId,
        index: Option<usize>,
    ) -> Result<Option<NodeId>, SyncError> {
        if *id == self.root {
            return Err(SyncError::RootImmutable);
        }
        if !self.contains(id) {
            return Err(SyncError::UnknownNode(id.clone()));
        }
        if !self.contains(parent) {
            return Err(SyncError::UnknownNode(parent.clone()));
        }
        if id == parent || self.is_ancestor(id, parent) {
            return Err(SyncError::Cycle {
                node: id.clone(),
                parent: parent.clone(),
            });
        }
        let previous = self.detach(id);
        let siblings = &mut self.entry_mut(parent)?.children;
        let at = index.map_or(siblings.len(), |i| i.min(siblings.len()));
        siblings.insert(at, id.clone());
        self.entry_mut(id)?.parent = Some(parent.clone());
        Ok(previous)
    }

    /// Exchanges the positions of two nodes, possibly under different
    /// parents. Returns the parents of `a` and `b` before the swap.
    pub fn swap(&mut self, a: &NodeId, b: &NodeId) -> Result<(NodeId, NodeId), SyncError> {
        if *a == self.root || *b == self.root {
            return Err(SyncError::RootImmutable);
        }
        let (pa, ia) = self.slot(a)?;
        let (pb, ib) = self.slot(b)?;
        if a == b {
            return Ok((pa, pb));
        }
        if self.is_ancestor(a, b) || self.is_ancestor(b, a) {
            return Err(SyncError::Cycle {
                node: a.clone(),
                parent: b.clone(),
            });
        }
        if pa == pb {
            self.entry_mut(&pa)?.children.swap(ia, ib);
        } else {
            self.entry_mut(&pa)?.children[ia] = b.clone();
            self.entry_mut(&pb)?.children[ib] = a.clone();
            self.entry_mut(a)?.parent = Some(pb.clone());
            self.entry_mut(b)?.parent = Some(pa.clone());
        }
        Ok((pa, pb))
    }

    /// Replaces the child order of `parent`. `ids` must be a permutation of
    /// the current children.
    pub fn reorder(&mut self, parent: &NodeId, ids: &[NodeId]) -> Result<(), SyncError> {
        let entry = self.entry_mut(parent)?;
        let mut wanted = ids.to_vec();
        let mut current = entry.children.clone();
        wanted.sort();
        current.sort();
        if wanted != current {
            return Err(SyncError::InvalidReorder(parent.clone()));
        }
        entry.children = ids.to_vec();
        Ok(())
    }

    /// Replaces the child list of `parent` with the known ids of `ids`.
    ///
    /// Listed nodes are taken from their previous parents; dropped children
    /// become unparented. Ids that are unknown, repeated, the root, or would
    /// create a cycle are skipped. Returns the previous parents that lost a
    /// child, excluding `parent` itself.
    pub fn set_children(
        &mut self,
        parent: &NodeId,
        ids: &[NodeId],
    ) -> Result<Vec<NodeId>, SyncError> {
        if !self.contains(parent) {
            return Err(SyncError::UnknownNode(parent.clone()));
        }
        let mut wanted: Vec<NodeId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !self.contains(id)
                || *id == self.root
                || id == parent
                || wanted.contains(id)
                || self.is_ancestor(id, parent)
            {
                log::trace!("skipping child {id} of {parent}");
                continue;
            }
            wanted.push(id.clone());
        }

        let previous = core::mem::take(&mut self.entry_mut(parent)?.children);
        for old in previous.iter().filter(|c| !wanted.contains(c)) {
            self.entry_mut(old)?.parent = None;
        }
        let mut robbed = Vec::new();
        for id in &wanted {
            let old_parent = self.entry_mut(id)?.parent.replace(parent.clone());
            if let Some(old_parent) = old_parent.filter(|p| p != parent) {
                self.entry_mut(&old_parent)?.children.retain(|c| c != id);
                if !robbed.contains(&old_parent) {
                    robbed.push(old_parent);
                }
            }
        }
        self.entry_mut(parent)?.children = wanted;
        Ok(robbed)
    }

    /// Materializes the subtree rooted at `id`.
    #[must_use]
    pub fn scene_node(&self, id: &NodeId) -> Option<SceneNode> {
        let entry = self.nodes.get(id)?;
        Some(SceneNode {
            id: id.clone(),
            props: entry.props.clone(),
            children: entry
                .children
                .iter()
                .filter_map(|c| self.scene_node(c))
                .collect(),
        })
    }

    /// The flat form of every node reachable from the root, in pre-order.
    #[must_use]
    pub fn to_data_nodes(&self) -> Vec<DataNode> {
        self.descendants(&self.root)
            .into_iter()
            .filter_map(|id| {
                let entry = self.nodes.get(&id)?;
                Some(DataNode {
                    props: entry.props.clone(),
                    child_ids: entry.children.clone(),
                    id,
                })
            })
            .collect()
    }

    fn entry_mut(&mut self, id: &NodeId) -> Result<&mut Entry, SyncError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| SyncError::UnknownNode(id.clone()))
    }

    fn slot(&self, id: &NodeId) -> Result<(NodeId, usize), SyncError> {
        let parent = self
            .parent(id)
            .ok_or_else(|| SyncError::UnknownNode(id.clone()))?;
        let index = self
            .index_of(id)
            .ok_or_else(|| SyncError::UnknownNode(id.clone()))?;
        Ok((parent.clone(), index))
    }

    fn detach(&mut self, id: &NodeId) -> Option<NodeId> {
        let parent = self.nodes.get_mut(id)?.parent.take()?;
        if let Some(entry) = self.nodes.get_mut(&parent) {
            entry.children.retain(|c| c != id);
        }
        Some(parent)
    }
}

/// Shallow-merges `patch` into `props`; `null` values delete keys. Returns
/// `true` if anything changed.
pub fn merge_props(props: &mut Props, patch: &Props) -> bool {
    let mut changed = false;
    for (key, value) in patch {
        if value.is_null() {
            changed |= props.remove(key).is_some();
        } else if props.get(key) != Some(value) {
            props.insert(key.clone(), value.clone());
            changed = true;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn props(value: Value) -> Props {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn ids(list: &[&str]) -> Vec<NodeId> {
        list.iter().map(|s| NodeId::from(*s)).collect()
    }

    /// `root > [row > [a, b], c]`
    fn sample() -> SceneTree {
        let mut tree = SceneTree::new("root".into(), Props::new());
        let root = NodeId::from("root");
        let row = NodeId::from("row");
        tree.insert(row.clone(), props(json!({ "layout": "Row" })), &root, None)
            .unwrap();
        tree.insert("a".into(), Props::new(), &row, None).unwrap();
        tree.insert("b".into(), Props::new(), &row, None).unwrap();
        tree.insert("c".into(), Props::new(), &root, None).unwrap();
        tree
    }

    #[test]
    fn insert_respects_index_and_rejects_duplicates() {
        let mut tree = sample();
        let row = NodeId::from("row");
        tree.insert("z".into(), Props::new(), &row, Some(0)).unwrap();
        tree.insert("y".into(), Props::new(), &row, Some(99)).unwrap();
        assert_eq!(tree.children(&row), ids(&["z", "a", "b", "y"]));
        assert_eq!(
            tree.insert("a".into(), Props::new(), &row, None),
            Err(SyncError::DuplicateNode("a".into()))
        );
        assert_eq!(
            tree.insert("q".into(), Props::new(), &"ghost".into(), None),
            Err(SyncError::UnknownNode("ghost".into()))
        );
    }

    #[test]
    fn update_merges_and_deletes_with_null() {
        let mut tree = sample();
        let a = NodeId::from("a");
        assert!(tree.update(&a, &props(json!({ "opacity": 0.5, "label": "x" }))).unwrap());
        assert!(!tree.update(&a, &props(json!({ "opacity": 0.5 }))).unwrap());
        assert!(tree.update(&a, &props(json!({ "label": null }))).unwrap());
        assert_eq!(tree.props(&a), Some(&props(json!({ "opacity": 0.5 }))));
    }

    #[test]
    fn remove_deletes_subtree() {
        let mut tree = sample();
        let removed = tree.remove(&"row".into()).unwrap();
        assert_eq!(removed, ids(&["row", "a", "b"]));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.children(&"root".into()), ids(&["c"]));
        assert_eq!(tree.remove(&"root".into()), Err(SyncError::RootImmutable));
    }

    #[test]
    fn move_rejects_cycles() {
        let mut tree = sample();
        let prev = tree.move_node(&"c".into(), &"row".into(), Some(1)).unwrap();
        assert_eq!(prev, Some("root".into()));
        assert_eq!(tree.children(&"row".into()), ids(&["a", "c", "b"]));
        assert!(matches!(
            tree.move_node(&"row".into(), &"a".into(), None),
            Err(SyncError::Cycle { .. })
        ));
        assert!(matches!(
            tree.move_node(&"row".into(), &"row".into(), None),
            Err(SyncError::Cycle { .. })
        ));
    }

    #[test]
    fn swap_within_and_across_parents() {
        let mut tree = sample();
        tree.swap(&"a".into(), &"b".into()).unwrap();
        assert_eq!(tree.children(&"row".into()), ids(&["b", "a"]));

        let (pa, pb) = tree.swap(&"a".into(), &"c".into()).unwrap();
        assert_eq!((pa.as_str(), pb.as_str()), ("row", "root"));
        assert_eq!(tree.children(&"row".into()), ids(&["b", "c"]));
        assert_eq!(tree.children(&"root".into()), ids(&["row", "a"]));
        assert_eq!(tree.parent(&"a".into()), Some(&"root".into()));

        assert!(matches!(
            tree.swap(&"row".into(), &"b".into()),
            Err(SyncError::Cycle { .. })
        ));
    }

    #[test]
    fn reorder_requires_permutation() {
        let mut tree = sample();
        let row = NodeId::from("row");
        tree.reorder(&row, &ids(&["b", "a"])).unwrap();
        assert_eq!(tree.children(&row), ids(&["b", "a"]));
        assert_eq!(
            tree.reorder(&row, &ids(&["b", "b"])),
            Err(SyncError::InvalidReorder(row.clone()))
        );
        assert_eq!(
            tree.reorder(&row, &ids(&["a"])),
            Err(SyncError::InvalidReorder(row))
        );
    }

    #[test]
    fn set_children_adopts_and_orphans() {
        let mut tree = sample();
        tree.insert_unparented("fresh".into(), Props::new()).unwrap();
        let robbed = tree
            .set_children(&"row".into(), &ids(&["fresh", "c", "ghost", "a"]))
            .unwrap();
        assert_eq!(robbed, ids(&["root"]));
        assert_eq!(tree.children(&"row".into()), ids(&["fresh", "c", "a"]));
        assert_eq!(tree.parent(&"b".into()), None);
        assert_eq!(tree.children(&"root".into()), ids(&["row"]));
    }

    #[test]
    fn containers_are_listed_parents_first() {
        let mut tree = sample();
        let group = NodeId::from("group");
        tree.insert(group.clone(), Props::new(), &"row".into(), None).unwrap();
        tree.insert("grid".into(), props(json!({ "layout": "Grid" })), &group, None)
            .unwrap();
        assert_eq!(
            tree.containers(),
            [
                (NodeId::from("root"), None),
                (NodeId::from("row"), Some(NodeId::from("root"))),
                (NodeId::from("grid"), Some(NodeId::from("row"))),
            ]
        );
        assert_eq!(tree.container_of(&"grid".into()), Some(&"row".into()));
        assert_eq!(tree.hosting_slot(&"grid".into()), Some(&group));
        assert_eq!(tree.hosting_slot(&"row".into()), Some(&"row".into()));
        assert_eq!(tree.hosting_slot(&"root".into()), None);
    }

    #[test]
    fn data_nodes_roundtrip_skips_missing_children() {
        let tree = sample();
        let mut nodes = tree.to_data_nodes();
        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes[0].id, NodeId::from("root"));
        assert_eq!(SceneTree::from_data_nodes(&"root".into(), nodes.clone()).unwrap(), tree);

        nodes[0].child_ids.push("missing".into());
        let rebuilt = SceneTree::from_data_nodes(&"root".into(), nodes).unwrap();
        assert_eq!(rebuilt.children(&"root".into()), ids(&["row", "c"]));
        assert_eq!(
            SceneTree::from_data_nodes(&"nope".into(), Vec::new()),
            Err(SyncError::UnknownNode("nope".into()))
        );
    }

    #[test]
    fn scene_node_materializes_subtree() {
        let tree = sample();
        let row = tree.scene_node(&"row".into()).unwrap();
        assert!(row.declares_layout());
        assert_eq!(row.children.len(), 2);
        assert_eq!(tree.scene_node(&"root".into()).unwrap().len(), 5);
    }
}
