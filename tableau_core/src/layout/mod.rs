// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout algorithms.
//!
//! Every algorithm is a pure function of `(props, children, size)`. `Free`
//! and `Layered` compute geometry directly and return
//! [`LayoutResult::Positions`]; the flex-based algorithms describe their
//! arrangement as a [`Template`] that the
//! [measurement arena](crate::measure::MeasurementArena) resolves.
//!
//! Each algorithm also declares the default entry and exit transition for
//! every child it places. Measured layouts slide children up from below with
//! a staggered delay and push them off the bottom of the container when they
//! leave; direct layouts fade.

mod free;
mod grid;
mod layered;
mod linear;
mod presentation;
pub mod template;

use kurbo::{Size, Vec2};

use crate::geometry::ChildPositionIndex;
use crate::id::NodeId;
use crate::props::{ChildProps, LayoutKind, LayoutProps};
use crate::time::Duration;
use crate::transition::{TimingCurve, Transition, TransitionOffset};

pub use grid::{grid_rows, row_lengths};
pub use template::{BoxStyle, Direction, Edges, Extent, Template, TemplateNode, TemplateTag};

/// Delay before the first child of a measured layout starts entering.
pub const ENTRY_BASE_DELAY: Duration = Duration::from_millis(400);

/// Extra entry delay per child index.
pub const ENTRY_STAGGER: Duration = Duration::from_millis(100);

/// Scale a measured-layout child enters from.
pub const ENTRY_SCALE: f64 = 0.8;

/// A child as seen by a layout algorithm.
#[derive(Clone, Debug, PartialEq)]
pub struct ChildSpec {
    /// Child id.
    pub id: NodeId,
    /// Geometry props, read by `Free`.
    pub props: ChildProps,
}

impl ChildSpec {
    /// A child with no geometry props.
    #[must_use]
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            props: ChildProps::default(),
        }
    }
}

/// Output of a layout algorithm.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutResult {
    /// Geometry computed directly.
    Positions(ChildPositionIndex),
    /// A box tree that must be measured.
    Template(Template),
}

/// Runs the algorithm selected by `props`.
#[must_use]
pub fn layout(props: &LayoutProps, children: &[ChildSpec], size: Size) -> LayoutResult {
    match &props.kind {
        LayoutKind::Free => LayoutResult::Positions(free::layout(children, size)),
        LayoutKind::Layered => LayoutResult::Positions(layered::layout(children, size)),
        LayoutKind::Row(p) => LayoutResult::Template(Template::new(linear::row(p, children, size, 0))),
        LayoutKind::Column(p) => {
            LayoutResult::Template(Template::new(linear::column(p, children, size, 0)))
        }
        LayoutKind::Grid(p) => LayoutResult::Template(Template::new(grid::layout(p, children, size, 0))),
        LayoutKind::Presentation(p) => {
            LayoutResult::Template(Template::new(presentation::layout(p, children, size)))
        }
    }
}

/// Entry transition for the `index`th child of a measured layout.
#[must_use]
pub fn staggered_entry(index: usize) -> Transition {
    let steps = u64::try_from(index).unwrap_or(u64::MAX);
    let delay = Duration(
        ENTRY_BASE_DELAY
            .micros()
            .saturating_add(ENTRY_STAGGER.micros().saturating_mul(steps)),
    );
    Transition {
        delay: Some(delay),
        offset: Some(TransitionOffset::SelfRelative(Vec2::new(0.0, 1.0))),
        scale: Some(Vec2::new(ENTRY_SCALE, ENTRY_SCALE)),
        opacity: Some(0.0),
        timing_curve: None,
    }
}

/// Exit transition for measured layouts: off the bottom of the container.
#[must_use]
pub fn slide_out() -> Transition {
    Transition {
        offset: Some(TransitionOffset::ContainerRelative(Vec2::new(0.0, 1.0))),
        opacity: Some(0.0),
        timing_curve: Some(TimingCurve::Exit),
        ..Transition::NONE
    }
}

fn tag(child: &ChildSpec, index: usize) -> TemplateTag {
    TemplateTag {
        child: child.id.clone(),
        entry: staggered_entry(index),
        exit: slide_out(),
        opacity: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::{GridProps, LinearProps, PresentationProps};

    fn children(n: usize) -> Vec<ChildSpec> {
        (0..n).map(|i| ChildSpec::new(format!("c{i}"))).collect()
    }

    fn all_kinds() -> Vec<LayoutKind> {
        vec![
            LayoutKind::Free,
            LayoutKind::Layered,
            LayoutKind::Row(LinearProps::default()),
            LayoutKind::Column(LinearProps::default()),
            LayoutKind::Grid(GridProps::default()),
            LayoutKind::Presentation(PresentationProps::default()),
        ]
    }

    fn produced_ids(result: &LayoutResult) -> Vec<NodeId> {
        match result {
            LayoutResult::Positions(index) => index.ids().cloned().collect(),
            LayoutResult::Template(t) => t.tagged_children(),
        }
    }

    #[test]
    fn every_child_is_placed_exactly_once() {
        let size = Size::new(1920.0, 1080.0);
        for kind in all_kinds() {
            for n in [0, 1, 2, 5, 8, 11] {
                let kids = children(n);
                let props = LayoutProps {
                    kind: kind.clone(),
                    showcase: None,
                };
                let mut ids = produced_ids(&layout(&props, &kids, size));
                ids.sort();
                let mut expected: Vec<_> = kids.iter().map(|c| c.id.clone()).collect();
                expected.sort();
                assert_eq!(ids, expected, "{} with {n} children", kind.name());
            }
        }
    }

    #[test]
    fn layouts_are_idempotent() {
        let size = Size::new(1280.0, 720.0);
        let kids = children(6);
        for kind in all_kinds() {
            let props = LayoutProps {
                kind,
                showcase: None,
            };
            assert_eq!(layout(&props, &kids, size), layout(&props, &kids, size));
        }
    }

    #[test]
    fn entry_delay_staggers() {
        assert_eq!(staggered_entry(0).delay, Some(Duration::from_millis(400)));
        assert_eq!(staggered_entry(3).delay, Some(Duration::from_millis(700)));
        assert_eq!(slide_out().timing_curve, Some(TimingCurve::Exit));
    }
}
