// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runtime state bound to one layout container.

use kurbo::{Point, Size};

use crate::error::{LayoutError, PropsError};
use crate::id::NodeId;
use crate::layout::{self, ChildSpec, LayoutResult};
use crate::message::HostChild;
use crate::props::{ChildProps, LayoutProps, Props};

/// How a new child list differs from the previous one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChildDiff {
    /// Ids that are new, in document order.
    pub inserted: Vec<NodeId>,
    /// Ids that are gone, in their old order.
    pub removed: Vec<NodeId>,
    /// Ids present in both whose props changed.
    pub changed: Vec<NodeId>,
}

impl ChildDiff {
    /// Returns `true` if the lists are equivalent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// One layout container: its props, its current children and its place in
/// the container hierarchy.
///
/// Containers are owned by the [`Engine`](crate::engine::Engine). Geometry of
/// the visible children lives in the engine's presence store, not here.
#[derive(Clone, Debug)]
pub struct LayoutContainer {
    id: NodeId,
    parent: Option<NodeId>,
    slot: Option<NodeId>,
    depth: usize,
    props: Result<LayoutProps, PropsError>,
    children: Vec<ChildSpec>,
    size: Option<Size>,
    origin: Point,
    rendered: bool,
    is_updating: bool,
}

impl LayoutContainer {
    /// Creates an unsized container with no children and the `Free` layout.
    #[must_use]
    pub fn new(id: NodeId, parent: Option<NodeId>, depth: usize) -> Self {
        Self {
            id,
            parent,
            slot: None,
            depth,
            props: Ok(LayoutProps::default()),
            children: Vec::new(),
            size: None,
            origin: Point::ZERO,
            rendered: false,
            is_updating: false,
        }
    }

    /// Container id.
    #[must_use]
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Enclosing container.
    #[must_use]
    pub fn parent(&self) -> Option<&NodeId> {
        self.parent.as_ref()
    }

    /// The group node hosting the container inside its parent, if any.
    #[must_use]
    pub fn slot(&self) -> Option<&NodeId> {
        self.slot.as_ref()
    }

    /// The child of the parent container whose layout slot this container
    /// fills: the group node hosting it, else the container itself.
    #[must_use]
    pub fn hosting_slot(&self) -> &NodeId {
        self.slot.as_ref().unwrap_or(&self.id)
    }

    /// Nesting depth; the topmost container is at depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Decoded props, or the error that made the last update invalid.
    pub fn props(&self) -> Result<&LayoutProps, &PropsError> {
        self.props.as_ref()
    }

    /// Current children in document order.
    #[must_use]
    pub fn children(&self) -> &[ChildSpec] {
        &self.children
    }

    /// Returns `true` if `child` is currently a child.
    #[must_use]
    pub fn contains(&self, child: &NodeId) -> bool {
        self.children.iter().any(|c| c.id == *child)
    }

    /// Current size, if known.
    #[must_use]
    pub fn size(&self) -> Option<Size> {
        self.size
    }

    /// Top-left corner inside the enclosing container.
    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Returns `true` once the container has completed a layout.
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    /// Returns `true` from the layout that created entering children until
    /// the next tick sends their second animation phase.
    #[must_use]
    pub fn is_updating(&self) -> bool {
        self.is_updating
    }

    /// Decodes and stores new props. Invalid props are kept as the error
    /// so the next layout fails with it.
    pub fn set_props(&mut self, props: &Props) -> Result<(), PropsError> {
        self.props = LayoutProps::from_props(props);
        self.props.as_ref().map(|_| ()).map_err(Clone::clone)
    }

    /// Replaces the child list and reports what changed.
    pub fn set_children(&mut self, children: &[HostChild]) -> ChildDiff {
        let next: Vec<ChildSpec> = children.iter().map(decode_child).collect();
        let mut diff = ChildDiff::default();
        for old in &self.children {
            match next.iter().find(|c| c.id == old.id) {
                None => diff.removed.push(old.id.clone()),
                Some(new) if new.props != old.props => diff.changed.push(old.id.clone()),
                Some(_) => {}
            }
        }
        for new in &next {
            if !self.contains(&new.id) && !diff.inserted.contains(&new.id) {
                diff.inserted.push(new.id.clone());
            }
        }
        self.children = next;
        diff
    }

    /// Replaces one child's props. Returns `false` if `child` is not a child.
    pub fn set_child_props(&mut self, child: &NodeId, props: &Props) -> bool {
        let Some(spec) = self.children.iter_mut().find(|c| c.id == *child) else {
            return false;
        };
        spec.props = decode_child_props(child, props);
        true
    }

    /// Sets the size, returning `true` if it changed.
    pub fn set_size(&mut self, size: Size) -> bool {
        let changed = self.size != Some(size);
        self.size = Some(size);
        changed
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>, depth: usize) {
        self.parent = parent;
        self.depth = depth;
    }

    pub(crate) fn set_slot(&mut self, slot: Option<NodeId>) {
        self.slot = slot;
    }

    pub(crate) fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub(crate) fn mark_rendered(&mut self) {
        self.rendered = true;
    }

    pub(crate) fn set_updating(&mut self, updating: bool) {
        self.is_updating = updating;
    }

    /// Runs the container's layout algorithm at its current size.
    pub fn compute_layout(&self) -> Result<(LayoutResult, Size), LayoutError> {
        let props = self.props.as_ref().map_err(|e| LayoutError::InvalidProps(e.clone()))?;
        let size = self
            .size
            .ok_or_else(|| LayoutError::NotMounted(self.id.clone()))?;
        if !(size.width > 0.0 && size.height > 0.0) {
            return Err(LayoutError::ZeroSized(self.id.clone()));
        }
        Ok((layout::layout(props, &self.children, size), size))
    }
}

fn decode_child(child: &HostChild) -> ChildSpec {
    ChildSpec {
        id: child.id.clone(),
        props: decode_child_props(&child.id, &child.props),
    }
}

fn decode_child_props(id: &NodeId, props: &Props) -> ChildProps {
    ChildProps::from_props(props).unwrap_or_else(|err| {
        log::warn!("ignoring geometry props of {id}: {err}");
        ChildProps::default()
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn child(id: &str) -> HostChild {
        HostChild::bare(id)
    }

    fn props(value: serde_json::Value) -> Props {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn child_diff() {
        let mut c = LayoutContainer::new("stage".into(), None, 0);
        let diff = c.set_children(&[child("a"), child("b")]);
        assert_eq!(diff.inserted, [NodeId::from("a"), NodeId::from("b")]);
        assert!(diff.removed.is_empty());

        let moved = HostChild::new("b", props(json!({ "opacity": 0.5 })));
        let diff = c.set_children(&[moved, child("c")]);
        assert_eq!(diff.inserted, [NodeId::from("c")]);
        assert_eq!(diff.removed, [NodeId::from("a")]);
        assert_eq!(diff.changed, [NodeId::from("b")]);
        assert_eq!(c.children()[0].props.opacity, Some(0.5));
    }

    #[test]
    fn invalid_child_props_fall_back_to_defaults() {
        let mut c = LayoutContainer::new("stage".into(), None, 0);
        c.set_children(&[HostChild::new("a", props(json!({ "opacity": 4.0 })))]);
        assert_eq!(c.children()[0].props, ChildProps::default());
    }

    #[test]
    fn layout_requires_size_and_valid_props() {
        let mut c = LayoutContainer::new("stage".into(), None, 0);
        assert_eq!(
            c.compute_layout().map(|_| ()),
            Err(LayoutError::NotMounted("stage".into()))
        );
        c.set_size(Size::new(0.0, 100.0));
        assert_eq!(
            c.compute_layout().map(|_| ()),
            Err(LayoutError::ZeroSized("stage".into()))
        );
        c.set_size(Size::new(100.0, 100.0));
        assert!(c.set_props(&props(json!({ "layout": "Spiral" }))).is_err());
        assert!(matches!(c.compute_layout(), Err(LayoutError::InvalidProps(_))));
        c.set_props(&props(json!({ "layout": "Row" }))).unwrap();
        assert!(matches!(c.compute_layout(), Ok((LayoutResult::Template(_), _))));
    }

    #[test]
    fn hosting_slot_defaults_to_self() {
        let mut c = LayoutContainer::new("grid".into(), Some("stage".into()), 1);
        assert_eq!(c.hosting_slot().as_str(), "grid");
        c.set_slot(Some("group".into()));
        assert_eq!(c.hosting_slot().as_str(), "group");
        assert_eq!(c.slot(), Some(&NodeId::from("group")));
    }

    #[test]
    fn set_size_reports_changes() {
        let mut c = LayoutContainer::new("stage".into(), None, 0);
        assert!(c.set_size(Size::new(10.0, 10.0)));
        assert!(!c.set_size(Size::new(10.0, 10.0)));
    }
}
