// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural changes recorded by the scene tree.

use tableau_core::NodeId;

/// One applied change to the scene tree.
///
/// Changes accumulate in the project until the renderer drains them and
/// notifies the affected containers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeChange {
    /// A node was created under `parent`.
    Inserted {
        /// The new node.
        id: NodeId,
        /// Its parent.
        parent: NodeId,
    },
    /// A node's props changed.
    Updated {
        /// The node.
        id: NodeId,
    },
    /// A subtree was deleted.
    Removed {
        /// Root of the deleted subtree.
        id: NodeId,
        /// Its parent before deletion, `None` for unparented nodes.
        parent: Option<NodeId>,
        /// Every deleted id, `id` first.
        subtree: Vec<NodeId>,
    },
    /// A node changed parent.
    Moved {
        /// The node.
        id: NodeId,
        /// Previous parent.
        from: Option<NodeId>,
        /// New parent.
        to: NodeId,
    },
    /// Two nodes exchanged places.
    Swapped {
        /// First node.
        a: NodeId,
        /// Second node.
        b: NodeId,
        /// Parent of `a` before the swap.
        a_parent: NodeId,
        /// Parent of `b` before the swap.
        b_parent: NodeId,
    },
    /// A node's child list was reordered or replaced.
    ChildrenChanged {
        /// The parent.
        parent: NodeId,
    },
}

impl TreeChange {
    /// Nodes whose child lists this change touched.
    #[must_use]
    pub fn affected_parents(&self) -> Vec<&NodeId> {
        match self {
            Self::Inserted { parent, .. } | Self::ChildrenChanged { parent } => vec![parent],
            Self::Updated { .. } => Vec::new(),
            Self::Removed { parent, .. } => parent.iter().collect(),
            Self::Moved { from, to, .. } => from.iter().chain([to]).collect(),
            Self::Swapped {
                a_parent, b_parent, ..
            } => {
                if a_parent == b_parent {
                    vec![a_parent]
                } else {
                    vec![a_parent, b_parent]
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affected_parents_cover_both_sides() {
        let moved = TreeChange::Moved {
            id: "cam".into(),
            from: Some("left".into()),
            to: "right".into(),
        };
        assert_eq!(
            moved.affected_parents(),
            [&NodeId::from("left"), &NodeId::from("right")]
        );

        let swapped = TreeChange::Swapped {
            a: "a".into(),
            b: "b".into(),
            a_parent: "row".into(),
            b_parent: "row".into(),
        };
        assert_eq!(swapped.affected_parents(), [&NodeId::from("row")]);
        assert!(TreeChange::Updated { id: "a".into() }.affected_parents().is_empty());
    }
}
