// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sibling traversal.

use super::id::{INVALID, PresenceId};
use super::store::PresenceStore;

/// Iterates the presences of one container in sibling order, from either
/// end.
///
/// Created by [`PresenceStore::siblings`]. Exiting presences are included;
/// they keep their slot in the order until their exit finishes.
#[derive(Debug)]
pub struct Siblings<'a> {
    store: &'a PresenceStore,
    front: u32,
    back: u32,
}

impl<'a> Siblings<'a> {
    pub(crate) fn new(store: &'a PresenceStore, (first, last): (u32, u32)) -> Self {
        Self {
            store,
            front: first,
            back: last,
        }
    }

    fn handle(&self, idx: u32) -> PresenceId {
        PresenceId {
            idx,
            generation: self.store.generation[idx as usize],
        }
    }

    fn finish(&mut self) {
        self.front = INVALID;
        self.back = INVALID;
    }
}

impl Iterator for Siblings<'_> {
    type Item = PresenceId;

    fn next(&mut self) -> Option<PresenceId> {
        if self.front == INVALID {
            return None;
        }
        let idx = self.front;
        if idx == self.back {
            self.finish();
        } else {
            self.front = self.store.next_sibling[idx as usize];
        }
        Some(self.handle(idx))
    }
}

impl DoubleEndedIterator for Siblings<'_> {
    fn next_back(&mut self) -> Option<PresenceId> {
        if self.back == INVALID {
            return None;
        }
        let idx = self.back;
        if idx == self.front {
            self.finish();
        } else {
            self.back = self.store.prev_sibling[idx as usize];
        }
        Some(self.handle(idx))
    }
}
