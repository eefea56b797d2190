// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag and drop on top of the scene tree.
//!
//! Interaction code only mutates the tree through [`RenderMethods`], so every
//! edit goes through the project's optimistic sync path.

use kurbo::{Point, Vec2};
use tableau_core::NodeId;
use tableau_core::context::RenderContext;

use crate::error::SyncError;
use crate::project::CompositorProject;
use crate::store::RemoteLayerStore;

/// The mutations available to interaction code.
pub trait RenderMethods {
    /// Deletes a node and its subtree.
    fn remove(&mut self, id: &NodeId) -> Result<(), SyncError>;

    /// Reorders siblings; `ids` must be a permutation of the children of
    /// the first id's parent.
    fn reorder(&mut self, ids: &[NodeId]) -> Result<(), SyncError>;

    /// Exchanges the places of two nodes.
    fn swap(&mut self, a: &NodeId, b: &NodeId) -> Result<(), SyncError>;

    /// Appends a node to a new parent.
    fn move_to(&mut self, id: &NodeId, parent: &NodeId) -> Result<(), SyncError>;
}

impl<S: RemoteLayerStore> RenderMethods for CompositorProject<S> {
    fn remove(&mut self, id: &NodeId) -> Result<(), SyncError> {
        Self::remove(self, id)
    }

    fn reorder(&mut self, ids: &[NodeId]) -> Result<(), SyncError> {
        let Some(first) = ids.first() else {
            return Ok(());
        };
        let parent = self
            .tree()
            .parent(first)
            .cloned()
            .ok_or_else(|| SyncError::UnknownNode(first.clone()))?;
        Self::reorder(self, &parent, ids)
    }

    fn swap(&mut self, a: &NodeId, b: &NodeId) -> Result<(), SyncError> {
        Self::swap(self, a, b)
    }

    fn move_to(&mut self, id: &NodeId, parent: &NodeId) -> Result<(), SyncError> {
        self.move_node(id, parent, None)
    }
}

/// Where a dragged node was released.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropTarget {
    /// On another node: the two exchange places.
    Swap(NodeId),
    /// On a container: the node is appended to it.
    Into(NodeId),
    /// Between siblings: the new sibling order.
    Reorder(Vec<NodeId>),
}

/// One drag gesture.
///
/// While a session is open the context's drag flag defers every tick, so
/// layout does not fight the drag preview. Dropping always clears the flag.
#[derive(Clone, Debug)]
#[must_use = "layout stays deferred until the session is dropped"]
pub struct DragSession {
    node: NodeId,
    grab: Point,
}

impl DragSession {
    /// Starts dragging `node` from `pointer` (viewport coordinates).
    pub fn start(ctx: &mut RenderContext, node: NodeId, pointer: Point) -> Self {
        ctx.set_dragging(true);
        Self {
            node,
            grab: ctx.to_canvas(pointer),
        }
    }

    /// The dragged node.
    #[must_use]
    pub fn node(&self) -> &NodeId {
        &self.node
    }

    /// Preview translation in canvas units for the pointer at `pointer`.
    #[must_use]
    pub fn offset(&self, ctx: &RenderContext, pointer: Point) -> Vec2 {
        ctx.to_canvas(pointer) - self.grab
    }

    /// Ends the gesture.
    ///
    /// Without a target the dragged node is deleted. The drag flag is
    /// cleared before the mutation, whether or not it succeeds.
    pub fn drop(
        self,
        ctx: &mut RenderContext,
        methods: &mut dyn RenderMethods,
        target: Option<DropTarget>,
    ) -> Result<(), SyncError> {
        ctx.set_dragging(false);
        match target {
            None => methods.remove(&self.node),
            Some(DropTarget::Swap(other)) if other == self.node => Ok(()),
            Some(DropTarget::Swap(other)) => methods.swap(&self.node, &other),
            Some(DropTarget::Into(parent)) => methods.move_to(&self.node, &parent),
            Some(DropTarget::Reorder(ids)) => methods.reorder(&ids),
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Size;
    use tableau_core::props::Props;

    use super::*;
    use crate::error::RemoteError;
    use crate::store::MemoryLayerStore;

    fn project() -> CompositorProject<MemoryLayerStore> {
        CompositorProject::new("show", MemoryLayerStore::new())
    }

    #[test]
    fn release_without_target_deletes_node() {
        let mut p = project();
        let cam = p.insert(Props::new(), None, None).unwrap();
        let mut ctx = RenderContext::default();
        let drag = DragSession::start(&mut ctx, cam.clone(), Point::ZERO);
        assert!(ctx.is_dragging());
        drag.drop(&mut ctx, &mut p, None).unwrap();
        assert!(!ctx.is_dragging());
        assert!(!p.tree().contains(&cam));
    }

    #[test]
    fn failed_drop_still_clears_flag() {
        let mut p = project();
        let cam = p.insert(Props::new(), None, None).unwrap();
        p.store_mut()
            .reject_with(RemoteError::Transport("offline".to_owned()));
        let mut ctx = RenderContext::default();
        let drag = DragSession::start(&mut ctx, cam, Point::ZERO);
        assert!(drag.drop(&mut ctx, &mut p, None).is_err());
        assert!(!ctx.is_dragging());
    }

    #[test]
    fn drop_targets_map_to_render_methods() {
        let mut p = project();
        let a = p.insert(Props::new(), None, None).unwrap();
        let b = p.insert(Props::new(), None, None).unwrap();
        let root = p.root().clone();
        let mut ctx = RenderContext::default();

        let drag = DragSession::start(&mut ctx, a.clone(), Point::ZERO);
        drag.drop(&mut ctx, &mut p, Some(DropTarget::Swap(b.clone())))
            .unwrap();
        assert_eq!(p.tree().children(&root), [b.clone(), a.clone()]);

        let drag = DragSession::start(&mut ctx, a.clone(), Point::ZERO);
        let order = vec![a.clone(), b.clone()];
        drag.drop(&mut ctx, &mut p, Some(DropTarget::Reorder(order)))
            .unwrap();
        assert_eq!(p.tree().children(&root), [a.clone(), b.clone()]);

        let drag = DragSession::start(&mut ctx, a.clone(), Point::ZERO);
        drag.drop(&mut ctx, &mut p, Some(DropTarget::Into(b.clone())))
            .unwrap();
        assert_eq!(p.tree().parent(&a), Some(&b));
    }

    #[test]
    fn offset_is_in_canvas_units() {
        let mut ctx = RenderContext::default();
        ctx.resize(Size::new(960.0, 540.0));
        let drag = DragSession::start(&mut ctx, "cam".into(), Point::new(10.0, 10.0));
        assert_eq!(drag.offset(&ctx, Point::new(20.0, 15.0)), Vec2::new(20.0, 10.0));
        drag.drop(&mut ctx, &mut project(), Some(DropTarget::Swap("cam".into())))
            .unwrap();
    }
}
