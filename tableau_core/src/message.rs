// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-to-engine notifications.

use kurbo::Size;

use crate::id::NodeId;
use crate::props::Props;

/// A child as reported by the host: its id and raw prop bag.
#[derive(Clone, Debug, PartialEq)]
pub struct HostChild {
    /// Child id.
    pub id: NodeId,
    /// Child props, decoded by the engine.
    pub props: Props,
}

impl HostChild {
    /// Creates a child entry.
    #[must_use]
    pub fn new(id: impl Into<NodeId>, props: Props) -> Self {
        Self {
            id: id.into(),
            props,
        }
    }

    /// A child with an empty prop bag.
    #[must_use]
    pub fn bare(id: impl Into<NodeId>) -> Self {
        Self::new(id, Props::new())
    }
}

/// Something changed on the hosting surface.
///
/// Messages are applied immediately to the engine's container state and
/// queue [`Op`](crate::op::Op)s for the next tick.
#[derive(Clone, Debug, PartialEq)]
pub enum HostMessage {
    /// A layout container was mounted.
    ContainerAttached {
        /// Container id.
        id: NodeId,
        /// Enclosing container, `None` for the topmost one.
        parent: Option<NodeId>,
        /// Child of `parent` whose slot the container fills when plain group
        /// nodes sit between the two; `None` if it is a direct child.
        slot: Option<NodeId>,
        /// Container props.
        props: Props,
        /// Children in document order.
        children: Vec<HostChild>,
        /// Measured size, if already known.
        size: Option<Size>,
    },
    /// A layout container was unmounted.
    ContainerDetached {
        /// Container id.
        id: NodeId,
    },
    /// A container's child list changed.
    ChildrenChanged {
        /// Container id.
        container: NodeId,
        /// New children in document order.
        children: Vec<HostChild>,
    },
    /// A container's own props changed.
    AttributesChanged {
        /// Container id.
        container: NodeId,
        /// New props.
        props: Props,
    },
    /// One child's props changed.
    ChildAttributesChanged {
        /// Container id.
        container: NodeId,
        /// Child id.
        child: NodeId,
        /// New child props.
        props: Props,
    },
    /// A container was resized.
    Resized {
        /// Container id.
        container: NodeId,
        /// New size.
        size: Size,
    },
    /// A child's exit animation finished.
    TransitionEnded {
        /// Container id.
        container: NodeId,
        /// Child id.
        child: NodeId,
    },
}

impl HostMessage {
    /// The container the message is about.
    #[must_use]
    pub fn container(&self) -> &NodeId {
        match self {
            Self::ContainerAttached { id, .. } | Self::ContainerDetached { id } => id,
            Self::ChildrenChanged { container, .. }
            | Self::AttributesChanged { container, .. }
            | Self::ChildAttributesChanged { container, .. }
            | Self::Resized { container, .. }
            | Self::TransitionEnded { container, .. } => container,
        }
    }
}
