// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `Presentation`: one featured child plus a bar of the others.

use kurbo::Size;

use super::template::{BoxStyle, Direction, Extent, TemplateNode};
use super::{ChildSpec, grid, linear, tag};
use crate::props::{BarPosition, GridProps, LinearProps, PresentationProps};

pub(super) fn layout(props: &PresentationProps, children: &[ChildSpec], size: Size) -> TemplateNode {
    let featured = props
        .presentation_id
        .as_ref()
        .and_then(|id| children.iter().position(|c| &c.id == id))
        .unwrap_or(0);

    if children.len() < 2 {
        return grid::layout(&grid_props(props), children, size, 0);
    }

    let bar_children: Vec<ChildSpec> = children
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != featured)
        .map(|(_, c)| c.clone())
        .collect();

    let (direction, bar_size) = match props.bar_position {
        BarPosition::Side => (
            Direction::Row,
            Size::new(size.width * props.bar_width, size.height),
        ),
        BarPosition::Bottom => (
            Direction::Column,
            Size::new(size.width, size.height * props.bar_width),
        ),
    };

    let bar = if props.use_grid {
        grid::layout(&grid_props(props), &bar_children, bar_size, 1)
    } else {
        let linear = LinearProps {
            margin: props.margin,
            dimensions: props.dimensions,
            cover: props.cover,
            ..LinearProps::default()
        };
        match props.bar_position {
            BarPosition::Side => linear::column(&linear, &bar_children, bar_size, 1),
            BarPosition::Bottom => linear::row(&linear, &bar_children, bar_size, 1),
        }
    };

    let featured_style = BoxStyle {
        width: match direction {
            Direction::Row => Extent::Auto,
            Direction::Column => Extent::Fraction(1.0),
        },
        height: match direction {
            Direction::Row => Extent::Fraction(1.0),
            Direction::Column => Extent::Auto,
        },
        basis: Extent::Px(0.0),
        grow: 1.0,
        ..BoxStyle::default()
    };

    TemplateNode::group(
        BoxStyle {
            direction,
            width: Extent::Px(size.width),
            height: Extent::Px(size.height),
            shrink: 0.0,
            ..BoxStyle::default()
        },
        vec![
            TemplateNode::slot(featured_style, tag(&children[featured], 0)),
            bar,
        ],
    )
}

fn grid_props(props: &PresentationProps) -> GridProps {
    GridProps {
        margin: props.margin,
        dimensions: props.dimensions,
        cover: props.cover,
        ..GridProps::default()
    }
}
