// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node views of the scene tree.

use serde::{Deserialize, Serialize};
use tableau_core::NodeId;
use tableau_core::props::{Props, declares_layout};

/// A materialized subtree: a node with its props and owned children.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    /// Node id.
    pub id: NodeId,
    /// Raw prop bag.
    pub props: Props,
    /// Children in document order.
    pub children: Vec<Self>,
}

impl SceneNode {
    /// Returns `true` if the node's props select a layout algorithm.
    #[must_use]
    pub fn declares_layout(&self) -> bool {
        declares_layout(&self.props)
    }

    /// Number of nodes in the subtree, including this one.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(Self::len).sum::<usize>()
    }

    /// Always `false`: a subtree contains at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Finds a node in the subtree by id.
    #[must_use]
    pub fn find(&self, id: &NodeId) -> Option<&Self> {
        if self.id == *id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }
}

/// The flat, serializable form of a node: children are referenced by id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataNode {
    /// Node id.
    pub id: NodeId,
    /// Raw prop bag.
    #[serde(default)]
    pub props: Props,
    /// Child ids in document order.
    #[serde(default)]
    pub child_ids: Vec<NodeId>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn leaf(id: &str) -> SceneNode {
        SceneNode {
            id: id.into(),
            props: Props::new(),
            children: Vec::new(),
        }
    }

    #[test]
    fn find_and_len() {
        let mut root = leaf("root");
        let mut row = leaf("row");
        row.children.push(leaf("cam"));
        root.children.push(row);
        root.children.push(leaf("logo"));
        assert_eq!(root.len(), 4);
        assert_eq!(root.find(&"cam".into()).map(|n| n.len()), Some(1));
        assert!(root.find(&"nope".into()).is_none());
    }

    #[test]
    fn data_node_wire_names() {
        let node = DataNode {
            id: "row".into(),
            props: Props::new(),
            child_ids: vec!["a".into()],
        };
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value, json!({ "id": "row", "props": {}, "childIds": ["a"] }));
        let back: DataNode = serde_json::from_value(json!({ "id": "x" })).unwrap();
        assert!(back.child_ids.is_empty());
    }
}
