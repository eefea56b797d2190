// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `Row` and `Column`: children packed along one axis at a fixed aspect
//! ratio.

use kurbo::Size;

use super::template::{BoxStyle, Direction, Edges, Extent, TemplateNode};
use super::{ChildSpec, tag};
use crate::props::{Align, LinearProps, MarginProps, Margins};

/// Upper bound on the default margin.
pub(super) const MAX_DEFAULT_MARGIN: f64 = 12.0;

/// The margin used for unset sides: a sixth of the cross extent, capped.
pub(super) fn default_margin(cross: f64) -> f64 {
    (cross / 6.0).min(MAX_DEFAULT_MARGIN).max(0.0)
}

fn margins(props: &LinearProps, cross: f64) -> Margins {
    if props.cover {
        MarginProps::ZERO.resolve(0.0)
    } else {
        props.margin.resolve(default_margin(cross))
    }
}

/// Item size for a row of `n` children.
pub(super) fn row_item_size(props: &LinearProps, n: usize, size: Size) -> Size {
    let m = margins(props, size.height);
    let inner_w = (size.width - m.left - m.right).max(0.0);
    let inner_h = (size.height - m.top - m.bottom).max(0.0);
    let aspect = props.dimensions.ratio();
    let mut slot = main_slot(inner_w, m.between, n);
    if let Some(fraction) = props.max_item_fraction {
        slot = slot.min(inner_w * fraction);
    }
    let h = inner_h.min(slot / aspect);
    Size::new(h * aspect, h)
}

/// Item size for a column of `n` children.
pub(super) fn column_item_size(props: &LinearProps, n: usize, size: Size) -> Size {
    let m = margins(props, size.width);
    let inner_w = (size.width - m.left - m.right).max(0.0);
    let inner_h = (size.height - m.top - m.bottom).max(0.0);
    let aspect = props.dimensions.ratio();
    let mut slot = main_slot(inner_h, m.between, n);
    if let Some(fraction) = props.max_item_fraction {
        slot = slot.min(inner_h * fraction);
    }
    let w = inner_w.min(slot * aspect);
    Size::new(w, w / aspect)
}

fn main_slot(inner: f64, between: f64, n: usize) -> f64 {
    if n == 0 {
        return inner;
    }
    let gaps = between * (n - 1) as f64;
    ((inner - gaps) / n as f64).max(0.0)
}

/// Builds a `Row` box of exactly `size` holding `children`.
///
/// `stagger_start` is the entry index of the first child, so that nested
/// rows continue the stagger sequence of the rows above them.
pub(super) fn row(
    props: &LinearProps,
    children: &[ChildSpec],
    size: Size,
    stagger_start: usize,
) -> TemplateNode {
    build(props, children, size, stagger_start, Direction::Row)
}

/// Builds a `Column` box of exactly `size` holding `children`.
pub(super) fn column(
    props: &LinearProps,
    children: &[ChildSpec],
    size: Size,
    stagger_start: usize,
) -> TemplateNode {
    build(props, children, size, stagger_start, Direction::Column)
}

fn build(
    props: &LinearProps,
    children: &[ChildSpec],
    size: Size,
    stagger_start: usize,
    direction: Direction,
) -> TemplateNode {
    let cross = match direction {
        Direction::Row => size.height,
        Direction::Column => size.width,
    };
    let m = margins(props, cross);

    let item_style = if props.cover {
        let (width, height) = match direction {
            Direction::Row => (Extent::Auto, Extent::Fraction(1.0)),
            Direction::Column => (Extent::Fraction(1.0), Extent::Auto),
        };
        BoxStyle {
            width,
            height,
            basis: Extent::Px(0.0),
            grow: 1.0,
            shrink: 1.0,
            ..BoxStyle::default()
        }
    } else {
        let item = match direction {
            Direction::Row => row_item_size(props, children.len(), size),
            Direction::Column => column_item_size(props, children.len(), size),
        };
        BoxStyle::fixed(item.width, item.height)
    };

    let slots = children
        .iter()
        .enumerate()
        .map(|(i, child)| TemplateNode::slot(item_style, tag(child, stagger_start + i)))
        .collect();

    TemplateNode::group(
        BoxStyle {
            direction,
            justify: props.justify,
            align: if props.cover { Align::Stretch } else { props.align },
            width: Extent::Px(size.width),
            height: Extent::Px(size.height),
            padding: Edges {
                top: m.top,
                right: m.right,
                bottom: m.bottom,
                left: m.left,
            },
            gap: m.between,
            shrink: 0.0,
            ..BoxStyle::default()
        },
        slots,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ChildSpec;
    use crate::props::AspectRatio;

    fn kids(n: usize) -> Vec<ChildSpec> {
        (0..n).map(|i| ChildSpec::new(format!("c{i}"))).collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn default_margin_is_capped() {
        assert!(close(default_margin(1080.0), 12.0));
        assert!(close(default_margin(60.0), 10.0));
    }

    #[test]
    fn wide_row_is_height_bound() {
        // Two 16:9 items in a very wide strip: height limits.
        let props = LinearProps::default();
        let item = row_item_size(&props, 2, Size::new(4000.0, 224.0));
        assert!(close(item.height, 200.0));
        assert!(close(item.width, 200.0 * 16.0 / 9.0));
    }

    #[test]
    fn narrow_row_is_width_bound() {
        let props = LinearProps {
            margin: MarginProps::uniform(0.0),
            dimensions: AspectRatio { x: 1.0, y: 1.0 },
            ..LinearProps::default()
        };
        let item = row_item_size(&props, 4, Size::new(400.0, 1000.0));
        assert!(close(item.width, 100.0));
        assert!(close(item.height, 100.0));
    }

    #[test]
    fn max_item_fraction_caps_slot() {
        let props = LinearProps {
            margin: MarginProps::uniform(0.0),
            dimensions: AspectRatio { x: 1.0, y: 1.0 },
            max_item_fraction: Some(0.25),
            ..LinearProps::default()
        };
        let item = row_item_size(&props, 2, Size::new(400.0, 1000.0));
        assert!(close(item.width, 100.0));
    }

    #[test]
    fn column_derives_height_from_width() {
        let props = LinearProps {
            margin: MarginProps::uniform(0.0),
            ..LinearProps::default()
        };
        let item = column_item_size(&props, 3, Size::new(320.0, 1080.0));
        assert!(close(item.width, 320.0));
        assert!(close(item.height, 180.0));
    }

    #[test]
    fn cover_column_fills_width_without_margin() {
        let props = LinearProps {
            cover: true,
            margin: MarginProps::uniform(20.0),
            ..LinearProps::default()
        };
        let node = column(&props, &kids(3), Size::new(640.0, 480.0), 0);
        assert_eq!(node.style.padding, Edges::default());
        assert_eq!(node.style.gap, 0.0);
        for slot in &node.children {
            assert_eq!(slot.style.width, Extent::Fraction(1.0));
            assert_eq!(slot.style.grow, 1.0);
        }
    }

    #[test]
    fn stagger_continues_from_start() {
        let node = row(&LinearProps::default(), &kids(2), Size::new(800.0, 200.0), 3);
        let delays: Vec<_> = node
            .children
            .iter()
            .map(|s| s.tag.as_ref().unwrap().entry.delay.unwrap().as_millis())
            .collect();
        assert_eq!(delays, [700, 800]);
    }
}
