// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Computed per-child geometry.
//!
//! [`ChildPosition`] is the output of a layout pass for one child: where it
//! sits inside its container, how large it is, and how it enters and leaves.
//! Positions are relative to the container's top-left corner. Values are
//! recomputed on every layout pass and never persisted.

use kurbo::{Point, Rect, Size};

use crate::id::NodeId;
use crate::transition::Transition;

/// Stacking order for children in their settled state.
pub const SETTLED_Z_INDEX: i32 = 1;

/// Stacking order for the showcased child.
pub const SHOWCASE_Z_INDEX: i32 = 2;

/// Stacking order for exiting children, behind their settled siblings.
pub const EXIT_Z_INDEX: i32 = 0;

/// Geometry and transition metadata for one child of a container.
#[derive(Clone, Debug, PartialEq)]
pub struct ChildPosition {
    /// Top-left corner relative to the container.
    pub position: Point,
    /// Settled size.
    pub size: Size,
    /// Settled opacity in `[0, 1]`.
    pub opacity: f64,
    /// Corner radius in canvas pixels.
    pub border_radius: f64,
    /// Stacking order among siblings.
    pub z_index: i32,
    /// Pose the child enters from.
    pub entry_transition: Transition,
    /// Pose the child exits to.
    pub exit_transition: Transition,
    /// Last known position relative to the topmost container, used to keep
    /// a child visually in place when it moves to another container.
    pub root_offset: Option<Point>,
}

impl ChildPosition {
    /// Creates an opaque, settled child position with no transitions.
    #[must_use]
    pub fn new(position: Point, size: Size) -> Self {
        Self {
            position,
            size,
            opacity: 1.0,
            border_radius: 0.0,
            z_index: SETTLED_Z_INDEX,
            entry_transition: Transition::NONE,
            exit_transition: Transition::NONE,
            root_offset: None,
        }
    }

    /// A position covering the whole container.
    #[must_use]
    pub fn full_bleed(container: Size) -> Self {
        Self::new(Point::ZERO, container)
    }

    /// Returns the child's rectangle in container coordinates.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Sets the entry and exit transitions.
    #[must_use]
    pub fn with_transitions(mut self, entry: Transition, exit: Transition) -> Self {
        self.entry_transition = entry;
        self.exit_transition = exit;
        self
    }
}

/// Insertion-ordered mapping from child id to [`ChildPosition`].
///
/// Layout algorithms emit children in document order and the order is kept
/// so that presenters stack equal z-index siblings the same way every pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChildPositionIndex {
    entries: Vec<(NodeId, ChildPosition)>,
}

impl ChildPositionIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty index with room for `capacity` children.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Inserts or replaces the position for `id`.
    ///
    /// Replacing keeps the child's original slot in the ordering.
    pub fn insert(&mut self, id: NodeId, position: ChildPosition) {
        match self.entries.iter_mut().find(|(k, _)| *k == id) {
            Some((_, existing)) => *existing = position,
            None => self.entries.push((id, position)),
        }
    }

    /// Returns the position for `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ChildPosition> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == id)
            .map(|(_, p)| p)
    }

    /// Returns a mutable reference to the position for `id`.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut ChildPosition> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k.as_str() == id)
            .map(|(_, p)| p)
    }

    /// Returns whether `id` has a position.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Number of children with a position.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no child has a position.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(id, position)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &ChildPosition)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Iterates mutably over positions in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&NodeId, &mut ChildPosition)> {
        self.entries.iter_mut().map(|(k, v)| (&*k, v))
    }

    /// Iterates over child ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.entries.iter().map(|(k, _)| k)
    }
}

impl FromIterator<(NodeId, ChildPosition)> for ChildPositionIndex {
    fn from_iter<T: IntoIterator<Item = (NodeId, ChildPosition)>>(iter: T) -> Self {
        let mut index = Self::new();
        for (id, position) in iter {
            index.insert(id, position);
        }
        index
    }
}

/// Forces `showcase` to cover the full container.
///
/// The showcased child gets the full container rectangle and
/// [`SHOWCASE_Z_INDEX`]; every other child is reset to [`SETTLED_Z_INDEX`].
/// A showcase id that names no child in the index leaves positions
/// untouched apart from the z-index reset.
pub fn apply_showcase(index: &mut ChildPositionIndex, showcase: Option<&NodeId>, container: Size) {
    let Some(showcase) = showcase else {
        return;
    };
    for (id, position) in index.iter_mut() {
        if id == showcase {
            position.position = Point::ZERO;
            position.size = container;
            position.z_index = SHOWCASE_Z_INDEX;
        } else {
            position.z_index = SETTLED_Z_INDEX;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> ChildPositionIndex {
        [
            (
                NodeId::from("a"),
                ChildPosition::new(Point::new(10.0, 10.0), Size::new(100.0, 50.0)),
            ),
            (
                NodeId::from("b"),
                ChildPosition::new(Point::new(120.0, 10.0), Size::new(100.0, 50.0)),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut index = sample_index();
        index.insert(
            NodeId::from("a"),
            ChildPosition::new(Point::new(1.0, 2.0), Size::new(3.0, 4.0)),
        );
        assert_eq!(index.len(), 2);
        let ids: Vec<_> = index.ids().map(NodeId::as_str).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(index.get("a").unwrap().position, Point::new(1.0, 2.0));
    }

    #[test]
    fn showcase_fills_container() {
        let mut index = sample_index();
        let container = Size::new(1920.0, 1080.0);
        apply_showcase(&mut index, Some(&NodeId::from("b")), container);

        let b = index.get("b").unwrap();
        assert_eq!(b.rect(), Rect::new(0.0, 0.0, 1920.0, 1080.0));
        assert_eq!(b.z_index, SHOWCASE_Z_INDEX);
        assert_eq!(index.get("a").unwrap().z_index, SETTLED_Z_INDEX);
        assert_eq!(index.get("a").unwrap().position, Point::new(10.0, 10.0));
    }

    #[test]
    fn showcase_of_missing_child_is_ignored() {
        let mut index = sample_index();
        let before = index.clone();
        apply_showcase(&mut index, Some(&NodeId::from("zzz")), Size::new(10.0, 10.0));
        assert_eq!(index, before);
    }
}
