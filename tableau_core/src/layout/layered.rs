// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Every child covers the whole container.

use kurbo::Size;

use super::ChildSpec;
use crate::geometry::{ChildPosition, ChildPositionIndex};
use crate::transition::Transition;

pub(super) fn layout(children: &[ChildSpec], size: Size) -> ChildPositionIndex {
    children
        .iter()
        .map(|child| {
            (
                child.id.clone(),
                ChildPosition::full_bleed(size).with_transitions(Transition::fade(), Transition::fade()),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;
    use crate::geometry::SETTLED_Z_INDEX;

    #[test]
    fn children_overlap_in_document_order() {
        let size = Size::new(800.0, 600.0);
        let index = layout(&[ChildSpec::new("a"), ChildSpec::new("b")], size);
        let ids: Vec<_> = index.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        for (_, cp) in index.iter() {
            assert_eq!(cp.rect(), Rect::new(0.0, 0.0, 800.0, 600.0));
            assert_eq!(cp.z_index, SETTLED_Z_INDEX);
        }
    }
}
