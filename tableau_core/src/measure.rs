// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Template measurement.
//!
//! [`MeasurementArena`] owns one offscreen box tree (a [`taffy::TaffyTree`])
//! shared by every container. Each container acquires a [`MeasureHandle`]:
//! a wrapper box sized exactly to the container, under which the
//! container's template is mounted on every pass. The wrapper survives
//! between passes; only the subtree below it is replaced.
//!
//! After the box engine resolves the tree, every tagged box is read back and
//! expressed relative to the wrapper's top-left corner.

use std::collections::HashMap;

use kurbo::{Point, Size};
use taffy::geometry::{Rect, Size as BoxSize};
use taffy::style::{
    AlignItems, AvailableSpace, Dimension, Display, FlexDirection, JustifyContent,
    LengthPercentage, Style,
};

use crate::error::LayoutError;
use crate::geometry::{ChildPosition, ChildPositionIndex, apply_showcase};
use crate::id::NodeId;
use crate::layout::{BoxStyle, Direction, Extent, LayoutResult, Template, TemplateNode};
use crate::props::{Align, Justify};

/// A container's wrapper box in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeasureHandle(taffy::NodeId);

/// Offscreen box tree shared by all containers.
pub struct MeasurementArena {
    tree: taffy::TaffyTree<()>,
    handles: HashMap<NodeId, MeasureHandle>,
}

impl core::fmt::Debug for MeasurementArena {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MeasurementArena")
            .field("handles", &self.handles.len())
            .field("nodes", &self.tree.total_node_count())
            .finish_non_exhaustive()
    }
}

impl Default for MeasurementArena {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasurementArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: taffy::TaffyTree::new(),
            handles: HashMap::new(),
        }
    }

    /// Returns the handle for `container`, creating its wrapper box if
    /// needed.
    pub fn acquire(&mut self, container: &NodeId) -> Result<MeasureHandle, LayoutError> {
        if let Some(handle) = self.handles.get(container) {
            return Ok(*handle);
        }
        let node = self.tree.new_leaf(Style::default())?;
        let handle = MeasureHandle(node);
        self.handles.insert(container.clone(), handle);
        Ok(handle)
    }

    /// Frees `container`'s wrapper and everything mounted under it.
    ///
    /// Returns `false` if the container held no handle.
    pub fn release(&mut self, container: &NodeId) -> bool {
        let Some(MeasureHandle(node)) = self.handles.remove(container) else {
            return false;
        };
        if let Err(err) = self.remove_subtree(node) {
            log::warn!("releasing measurement handle for {container}: {err}");
        }
        true
    }

    /// Number of live handles.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    /// Number of boxes in the arena, wrappers included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.tree.total_node_count()
    }

    /// Mounts `template` under `container`'s wrapper, resolves it at `size`
    /// and reads back every tagged child.
    ///
    /// Positions are relative to the container's top-left corner. Opacity is
    /// the tag's override, else fully opaque. Tagged boxes whose layout
    /// cannot be read are skipped.
    pub fn extract_geometry(
        &mut self,
        template: &Template,
        container: &NodeId,
        size: Size,
    ) -> Result<ChildPositionIndex, LayoutError> {
        if !(size.width > 0.0 && size.height > 0.0) {
            return Err(LayoutError::ZeroSized(container.clone()));
        }
        let MeasureHandle(wrapper) = self.acquire(container)?;

        for old in self.tree.children(wrapper)? {
            self.remove_subtree(old)?;
        }

        self.tree.set_style(
            wrapper,
            Style {
                display: Display::Flex,
                size: BoxSize {
                    width: Dimension::length(px(size.width)),
                    height: Dimension::length(px(size.height)),
                },
                ..Style::default()
            },
        )?;

        let mut root_style = template.root.style;
        root_style.width = Extent::Px(size.width);
        root_style.height = Extent::Px(size.height);
        root_style.shrink = 0.0;
        let root = self.build(&template.root, root_style)?;
        self.tree.set_children(wrapper, &[root])?;

        self.tree.compute_layout(
            wrapper,
            BoxSize {
                width: AvailableSpace::Definite(px(size.width)),
                height: AvailableSpace::Definite(px(size.height)),
            },
        )?;

        let mut index = ChildPositionIndex::new();
        self.collect(&template.root, root, Point::ZERO, &mut index);
        Ok(index)
    }

    /// Turns a layout result into final geometry for `container`.
    ///
    /// Templates are measured; direct positions pass through. The showcase
    /// override is applied to both.
    pub fn resolve(
        &mut self,
        result: LayoutResult,
        container: &NodeId,
        size: Size,
        showcase: Option<&NodeId>,
    ) -> Result<ChildPositionIndex, LayoutError> {
        let mut index = match result {
            LayoutResult::Positions(index) => index,
            LayoutResult::Template(template) => self.extract_geometry(&template, container, size)?,
        };
        apply_showcase(&mut index, showcase, size);
        Ok(index)
    }

    fn build(&mut self, node: &TemplateNode, style: BoxStyle) -> Result<taffy::NodeId, LayoutError> {
        let style = to_taffy(&style);
        if node.children.is_empty() {
            return Ok(self.tree.new_leaf(style)?);
        }
        let mut kids = Vec::with_capacity(node.children.len());
        for child in &node.children {
            kids.push(self.build(child, child.style)?);
        }
        Ok(self.tree.new_with_children(style, &kids)?)
    }

    fn collect(
        &self,
        node: &TemplateNode,
        id: taffy::NodeId,
        parent_origin: Point,
        out: &mut ChildPositionIndex,
    ) {
        let Ok(layout) = self.tree.layout(id) else {
            return;
        };
        let origin = parent_origin
            + kurbo::Vec2::new(f64::from(layout.location.x), f64::from(layout.location.y));

        if let Some(tag) = &node.tag {
            let mut cp = ChildPosition::new(
                origin,
                Size::new(f64::from(layout.size.width), f64::from(layout.size.height)),
            )
            .with_transitions(tag.entry, tag.exit);
            if let Some(opacity) = tag.opacity {
                cp.opacity = opacity;
            }
            out.insert(tag.child.clone(), cp);
        }

        for (i, child) in node.children.iter().enumerate() {
            if let Ok(child_id) = self.tree.child_at_index(id, i) {
                self.collect(child, child_id, origin, out);
            }
        }
    }

    fn remove_subtree(&mut self, node: taffy::NodeId) -> Result<(), LayoutError> {
        for child in self.tree.children(node)? {
            self.remove_subtree(child)?;
        }
        self.tree.remove(node)?;
        Ok(())
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "canvas coordinates are well inside f32 range"
)]
fn px(v: f64) -> f32 {
    v as f32
}

fn dimension(extent: Extent) -> Dimension {
    match extent {
        Extent::Auto => Dimension::auto(),
        Extent::Px(v) => Dimension::length(px(v)),
        Extent::Fraction(f) => Dimension::percent(px(f)),
    }
}

fn to_taffy(style: &BoxStyle) -> Style {
    let gap = LengthPercentage::length(px(style.gap));
    Style {
        display: Display::Flex,
        flex_direction: match style.direction {
            Direction::Row => FlexDirection::Row,
            Direction::Column => FlexDirection::Column,
        },
        justify_content: Some(match style.justify {
            Justify::Start => JustifyContent::FlexStart,
            Justify::Center => JustifyContent::Center,
            Justify::End => JustifyContent::FlexEnd,
            Justify::SpaceBetween => JustifyContent::SpaceBetween,
            Justify::SpaceAround => JustifyContent::SpaceAround,
            Justify::SpaceEvenly => JustifyContent::SpaceEvenly,
        }),
        align_items: Some(match style.align {
            Align::Start => AlignItems::FlexStart,
            Align::Center => AlignItems::Center,
            Align::End => AlignItems::FlexEnd,
            Align::Stretch => AlignItems::Stretch,
        }),
        size: BoxSize {
            width: dimension(style.width),
            height: dimension(style.height),
        },
        flex_basis: dimension(style.basis),
        padding: Rect {
            left: LengthPercentage::length(px(style.padding.left)),
            right: LengthPercentage::length(px(style.padding.right)),
            top: LengthPercentage::length(px(style.padding.top)),
            bottom: LengthPercentage::length(px(style.padding.bottom)),
        },
        gap: BoxSize {
            width: gap,
            height: gap,
        },
        flex_grow: px(style.grow),
        flex_shrink: px(style.shrink),
        ..Style::default()
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect as KRect;

    use super::*;
    use crate::geometry::{SETTLED_Z_INDEX, SHOWCASE_Z_INDEX};
    use crate::layout::{ChildSpec, layout};
    use crate::props::{GridProps, LayoutKind, LayoutProps, LinearProps, MarginProps};

    const CANVAS: Size = Size::new(1920.0, 1080.0);

    fn kids(n: usize) -> Vec<ChildSpec> {
        (0..n).map(|i| ChildSpec::new(format!("c{i}"))).collect()
    }

    fn measure(kind: LayoutKind, n: usize, size: Size) -> ChildPositionIndex {
        let mut arena = MeasurementArena::new();
        let props = LayoutProps {
            kind,
            showcase: None,
        };
        let container = NodeId::from("stage");
        arena
            .resolve(layout(&props, &kids(n), size), &container, size, None)
            .unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn row_items_are_centered() {
        let props = LinearProps {
            margin: MarginProps::uniform(0.0),
            ..LinearProps::default()
        };
        let index = measure(LayoutKind::Row(props), 2, Size::new(1600.0, 900.0));
        assert_eq!(index.len(), 2);
        let a = index.get("c0").unwrap();
        let b = index.get("c1").unwrap();
        assert!(close(a.size.width, 800.0), "{a:?}");
        assert!(close(a.size.height, 450.0), "{a:?}");
        assert!(close(a.position.x, 0.0) && close(a.position.y, 225.0), "{a:?}");
        assert!(close(b.position.x, 800.0), "{b:?}");
        assert_eq!(a.z_index, SETTLED_Z_INDEX);
        assert_eq!(a.opacity, 1.0);
    }

    #[test]
    fn cover_column_items_fill_width() {
        let props = LinearProps {
            cover: true,
            ..LinearProps::default()
        };
        let index = measure(LayoutKind::Column(props), 3, Size::new(600.0, 900.0));
        for (_, cp) in index.iter() {
            assert!(close(cp.size.width, 600.0), "{cp:?}");
            assert!(close(cp.size.height, 300.0), "{cp:?}");
            assert!(close(cp.position.x, 0.0));
        }
        assert!(close(index.get("c2").unwrap().position.y, 600.0));
    }

    #[test]
    fn grid_rows_are_stacked() {
        let index = measure(LayoutKind::Grid(GridProps::default()), 5, CANVAS);
        assert_eq!(index.len(), 5);
        let top = index.get("c0").unwrap().position.y;
        let bottom = index.get("c3").unwrap().position.y;
        assert!(top < 540.0 && bottom >= 540.0, "top {top}, bottom {bottom}");
        assert!(close(index.get("c1").unwrap().position.y, top));
        assert!(close(index.get("c4").unwrap().position.y, bottom));
    }

    #[test]
    fn showcase_overrides_measured_geometry() {
        let mut arena = MeasurementArena::new();
        let props = LayoutProps {
            kind: LayoutKind::Grid(GridProps::default()),
            showcase: Some(NodeId::from("c1")),
        };
        let container = NodeId::from("stage");
        let index = arena
            .resolve(
                layout(&props, &kids(4), CANVAS),
                &container,
                CANVAS,
                props.showcase.as_ref(),
            )
            .unwrap();
        let c1 = index.get("c1").unwrap();
        assert_eq!(c1.rect(), KRect::new(0.0, 0.0, 1920.0, 1080.0));
        assert_eq!(c1.z_index, SHOWCASE_Z_INDEX);
        for id in ["c0", "c2", "c3"] {
            assert_eq!(index.get(id).unwrap().z_index, SETTLED_Z_INDEX);
        }
    }

    #[test]
    fn measuring_twice_reuses_the_wrapper() {
        let mut arena = MeasurementArena::new();
        let container = NodeId::from("stage");
        let props = LayoutProps {
            kind: LayoutKind::Row(LinearProps::default()),
            showcase: None,
        };
        let LayoutResult::Template(template) = layout(&props, &kids(3), CANVAS) else {
            panic!("row emits a template");
        };
        let first = arena.extract_geometry(&template, &container, CANVAS).unwrap();
        let nodes = arena.node_count();
        let second = arena.extract_geometry(&template, &container, CANVAS).unwrap();
        assert_eq!(first, second);
        assert_eq!(arena.node_count(), nodes, "old subtree must be freed");
        assert_eq!(arena.handle_count(), 1);

        assert!(arena.release(&container));
        assert_eq!(arena.node_count(), 0);
        assert!(!arena.release(&container));
    }

    #[test]
    fn zero_size_is_an_error() {
        let mut arena = MeasurementArena::new();
        let template = Template::new(TemplateNode::group(BoxStyle::default(), Vec::new()));
        let container = NodeId::from("stage");
        assert_eq!(
            arena.extract_geometry(&template, &container, Size::ZERO),
            Err(LayoutError::ZeroSized(container))
        );
    }
}
