// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `Grid`: children split into balanced rows.
//!
//! Up to eight children use hand-tuned row arrangements that differ between
//! wide and tall containers. Larger counts are chunked into rows of
//! `round(sqrt(n))`.

use kurbo::Size;

use super::template::{BoxStyle, Direction, Extent, TemplateNode};
use super::{ChildSpec, linear};
use crate::props::{GridProps, Justify};

const WIDE: [&[usize]; 9] = [
    &[],
    &[1],
    &[2],
    &[3],
    &[2, 2],
    &[3, 2],
    &[3, 3],
    &[4, 3],
    &[4, 4],
];

const TALL: [&[usize]; 9] = [
    &[],
    &[1],
    &[1, 1],
    &[1, 1, 1],
    &[2, 2],
    &[2, 2, 1],
    &[2, 2, 2],
    &[2, 2, 2, 1],
    &[2, 2, 2, 2],
];

/// Row lengths for `n` children in a container of `size`.
///
/// A container is tall when its height exceeds its width.
#[must_use]
pub fn row_lengths(n: usize, size: Size) -> Vec<usize> {
    let table = if size.height > size.width { &TALL } else { &WIDE };
    if let Some(rows) = table.get(n) {
        return rows.to_vec();
    }
    let per_row = chunk_len(n);
    let mut rows = vec![per_row; n / per_row];
    if n % per_row != 0 {
        rows.push(n % per_row);
    }
    rows
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "sqrt of a child count is a small positive integer"
)]
fn chunk_len(n: usize) -> usize {
    let len = (n as f64).sqrt().round() as usize;
    len.max(1)
}

/// Splits `children` into rows following [`row_lengths`].
#[must_use]
pub fn grid_rows<T>(children: &[T], size: Size) -> Vec<&[T]> {
    let mut rest = children;
    let mut rows = Vec::new();
    for len in row_lengths(children.len(), size) {
        let (row, tail) = rest.split_at(len.min(rest.len()));
        rows.push(row);
        rest = tail;
    }
    rows
}

/// Builds a grid box of exactly `size`, one [`linear::row`] per row.
pub(super) fn layout(
    props: &GridProps,
    children: &[ChildSpec],
    size: Size,
    stagger_start: usize,
) -> TemplateNode {
    let rows = grid_rows(children, size);
    let longest = rows.iter().map(|r| r.len()).max().unwrap_or(1).max(1);
    let row_props = props.row(Some(1.0 / longest as f64));
    let row_size = Size::new(size.width, size.height / rows.len().max(1) as f64);

    let mut index = stagger_start;
    let row_nodes = rows
        .into_iter()
        .map(|row| {
            let node = linear::row(&row_props, row, row_size, index);
            index += row.len();
            node
        })
        .collect();

    TemplateNode::group(
        BoxStyle {
            direction: Direction::Column,
            justify: Justify::Center,
            width: Extent::Px(size.width),
            height: Extent::Px(size.height),
            shrink: 0.0,
            ..BoxStyle::default()
        },
        row_nodes,
    )
}
