// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural templates.
//!
//! A [`Template`] is a tree of flex boxes that describes a layout without
//! computing it. Boxes tagged with a [`TemplateTag`] stand for one child of
//! the container; the measurement pass reads their rectangles back after the
//! box engine has resolved the tree.

use crate::id::NodeId;
use crate::props::{Align, Justify};
use crate::transition::Transition;

/// Main axis of a box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Children flow left to right.
    #[default]
    Row,
    /// Children flow top to bottom.
    Column,
}

/// A box dimension.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Extent {
    /// Sized by the box engine.
    #[default]
    Auto,
    /// Fixed size in canvas pixels.
    Px(f64),
    /// Fraction of the parent's content box, `1.0` being all of it.
    Fraction(f64),
}

/// Per-side insets.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Edges {
    /// Top inset.
    pub top: f64,
    /// Right inset.
    pub right: f64,
    /// Bottom inset.
    pub bottom: f64,
    /// Left inset.
    pub left: f64,
}

/// Flex style of one template box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxStyle {
    /// Main axis.
    pub direction: Direction,
    /// Main-axis distribution of children.
    pub justify: Justify,
    /// Cross-axis placement of children.
    pub align: Align,
    /// Width.
    pub width: Extent,
    /// Height.
    pub height: Extent,
    /// Initial main size before growing or shrinking.
    pub basis: Extent,
    /// Inner padding.
    pub padding: Edges,
    /// Gap between children along the main axis.
    pub gap: f64,
    /// Share of free space this box takes.
    pub grow: f64,
    /// Share of overflow this box gives up.
    pub shrink: f64,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            direction: Direction::Row,
            justify: Justify::Start,
            align: Align::Stretch,
            width: Extent::Auto,
            height: Extent::Auto,
            basis: Extent::Auto,
            padding: Edges::default(),
            gap: 0.0,
            grow: 0.0,
            shrink: 1.0,
        }
    }
}

impl BoxStyle {
    /// A fixed-size box.
    #[must_use]
    pub fn fixed(width: f64, height: f64) -> Self {
        Self {
            width: Extent::Px(width),
            height: Extent::Px(height),
            shrink: 0.0,
            ..Self::default()
        }
    }
}

/// Marks a template box as the slot for one child.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateTag {
    /// The child occupying this box.
    pub child: NodeId,
    /// Entry transition for the child.
    pub entry: Transition,
    /// Exit transition for the child.
    pub exit: Transition,
    /// Opacity override. The child is opaque when unset.
    pub opacity: Option<f64>,
}

/// One box in a template.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateNode {
    /// Flex style.
    pub style: BoxStyle,
    /// Child slot marker.
    pub tag: Option<TemplateTag>,
    /// Nested boxes in document order.
    pub children: Vec<TemplateNode>,
}

impl TemplateNode {
    /// A structural box.
    #[must_use]
    pub fn group(style: BoxStyle, children: Vec<Self>) -> Self {
        Self {
            style,
            tag: None,
            children,
        }
    }

    /// A leaf box standing for one child.
    #[must_use]
    pub fn slot(style: BoxStyle, tag: TemplateTag) -> Self {
        Self {
            style,
            tag: Some(tag),
            children: Vec::new(),
        }
    }

    /// Visits every tagged box in document order.
    pub fn for_each_tag(&self, f: &mut impl FnMut(&TemplateTag)) {
        if let Some(tag) = &self.tag {
            f(tag);
        }
        for child in &self.children {
            child.for_each_tag(f);
        }
    }
}

/// A declarative layout waiting to be measured.
///
/// The root box is sized to the container by the measurement pass; its own
/// width and height are overridden.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    /// Outermost box.
    pub root: TemplateNode,
}

impl Template {
    /// Wraps a root box.
    #[must_use]
    pub fn new(root: TemplateNode) -> Self {
        Self { root }
    }

    /// Returns the ids of all tagged children in document order.
    #[must_use]
    pub fn tagged_children(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.root.for_each_tag(&mut |tag| ids.push(tag.child.clone()));
        ids
    }
}
