// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pass-through layout: children carry their own geometry.

use kurbo::{Point, Size};

use super::ChildSpec;
use crate::geometry::{ChildPosition, ChildPositionIndex};
use crate::transition::Transition;

/// Places each child at its `position`/`size`/`opacity` props, defaulting to
/// a full-bleed opaque box at the origin.
pub(super) fn layout(children: &[ChildSpec], size: Size) -> ChildPositionIndex {
    let mut index = ChildPositionIndex::with_capacity(children.len());
    for child in children {
        let mut cp = ChildPosition::new(
            child.props.position.unwrap_or(Point::ZERO),
            child.props.size.unwrap_or(size),
        )
        .with_transitions(Transition::fade(), Transition::fade());
        if let Some(opacity) = child.props.opacity {
            cp.opacity = opacity;
        }
        index.insert(child.id.clone(), cp);
    }
    index
}
