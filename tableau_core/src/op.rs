// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Queued container mutations.
//!
//! Every change that can affect a container's layout is recorded as an
//! [`Op`] and held until the next tick. At flush time the ops for each
//! container are folded into a [`ContainerOps`] summary. An insert and a
//! remove of the same child in one flush cancel each other in either order:
//! the child is treated as moved within the frame, not destroyed and
//! recreated, so it plays neither an entry nor an exit.

use crate::id::NodeId;

/// One queued container mutation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    /// The container's own size changed.
    SizeChanged {
        /// Affected container.
        container: NodeId,
    },
    /// The container's props changed.
    AttributesChanged {
        /// Affected container.
        container: NodeId,
    },
    /// A child joined the container.
    ChildInserted {
        /// Affected container.
        container: NodeId,
        /// The new child.
        child: NodeId,
    },
    /// A child left the container. Its exit transition starts on flush.
    ChildRemoved {
        /// Affected container.
        container: NodeId,
        /// The departing child.
        child: NodeId,
    },
    /// A departed child finished its exit and was detached.
    ChildRemoveFinished {
        /// Affected container.
        container: NodeId,
        /// The detached child.
        child: NodeId,
    },
    /// A child's props changed.
    ChildAttributesChanged {
        /// Affected container.
        container: NodeId,
        /// The changed child.
        child: NodeId,
    },
}

impl Op {
    /// The container the op applies to.
    #[must_use]
    pub fn container(&self) -> &NodeId {
        match self {
            Self::SizeChanged { container }
            | Self::AttributesChanged { container }
            | Self::ChildInserted { container, .. }
            | Self::ChildRemoved { container, .. }
            | Self::ChildRemoveFinished { container, .. }
            | Self::ChildAttributesChanged { container, .. } => container,
        }
    }

    /// The child the op applies to, if any.
    #[must_use]
    pub fn child(&self) -> Option<&NodeId> {
        match self {
            Self::SizeChanged { .. } | Self::AttributesChanged { .. } => None,
            Self::ChildInserted { child, .. }
            | Self::ChildRemoved { child, .. }
            | Self::ChildRemoveFinished { child, .. }
            | Self::ChildAttributesChanged { child, .. } => Some(child),
        }
    }
}

/// The net effect of one flush on one container.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContainerOps {
    /// Children that entered, in queue order.
    pub inserted: Vec<NodeId>,
    /// Children that left, in queue order.
    pub removed: Vec<NodeId>,
    /// Children whose exit completed.
    pub remove_finished: Vec<NodeId>,
    /// Children whose props changed.
    pub child_attributes_changed: Vec<NodeId>,
    /// Children whose insert and remove cancelled out.
    pub cancelled: Vec<NodeId>,
    /// The container was resized.
    pub resized: bool,
    /// The container's props changed.
    pub attributes_changed: bool,
}

impl ContainerOps {
    /// Folds one op into the summary.
    pub fn push(&mut self, op: &Op) {
        match op {
            Op::SizeChanged { .. } => self.resized = true,
            Op::AttributesChanged { .. } => self.attributes_changed = true,
            Op::ChildInserted { child, .. } => {
                if take(&mut self.removed, child) {
                    log::trace!("insert of {child} cancels a queued remove");
                    push_unique(&mut self.cancelled, child);
                } else {
                    push_unique(&mut self.inserted, child);
                }
            }
            Op::ChildRemoved { child, .. } => {
                if take(&mut self.inserted, child) {
                    log::trace!("remove of {child} cancels a queued insert");
                    push_unique(&mut self.cancelled, child);
                } else {
                    push_unique(&mut self.removed, child);
                }
            }
            Op::ChildRemoveFinished { child, .. } => push_unique(&mut self.remove_finished, child),
            Op::ChildAttributesChanged { child, .. } => {
                push_unique(&mut self.child_attributes_changed, child);
            }
        }
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn take(list: &mut Vec<NodeId>, id: &NodeId) -> bool {
    match list.iter().position(|x| x == id) {
        Some(i) => {
            list.remove(i);
            true
        }
        None => false,
    }
}

fn push_unique(list: &mut Vec<NodeId>, id: &NodeId) {
    if !list.contains(id) {
        list.push(id.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inserted(child: &str) -> Op {
        Op::ChildInserted {
            container: "stage".into(),
            child: child.into(),
        }
    }

    fn removed(child: &str) -> Op {
        Op::ChildRemoved {
            container: "stage".into(),
            child: child.into(),
        }
    }

    fn fold(ops: &[Op]) -> ContainerOps {
        let mut summary = ContainerOps::default();
        for op in ops {
            summary.push(op);
        }
        summary
    }

    #[test]
    fn insert_then_remove_cancels() {
        let summary = fold(&[inserted("x"), removed("x")]);
        assert!(summary.inserted.is_empty());
        assert!(summary.removed.is_empty());
        assert_eq!(summary.cancelled, [NodeId::from("x")]);
    }

    #[test]
    fn remove_then_insert_cancels() {
        let summary = fold(&[removed("x"), inserted("x"), inserted("y")]);
        assert!(summary.removed.is_empty());
        assert_eq!(summary.inserted, [NodeId::from("y")]);
        assert_eq!(summary.cancelled, [NodeId::from("x")]);
    }

    #[test]
    fn duplicates_collapse() {
        let summary = fold(&[
            inserted("a"),
            inserted("a"),
            Op::SizeChanged {
                container: "stage".into(),
            },
            Op::SizeChanged {
                container: "stage".into(),
            },
        ]);
        assert_eq!(summary.inserted, [NodeId::from("a")]);
        assert!(summary.resized);
        assert!(!summary.attributes_changed);
        assert!(!summary.is_empty());
    }

    #[test]
    fn accessors() {
        let op = removed("x");
        assert_eq!(op.container().as_str(), "stage");
        assert_eq!(op.child().map(NodeId::as_str), Some("x"));
        assert_eq!(
            Op::AttributesChanged {
                container: "stage".into()
            }
            .child(),
            None
        );
    }
}
