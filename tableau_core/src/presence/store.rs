// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays presence storage with allocation, sibling order, and
//! per-presence animation state.

use std::collections::HashMap;

use crate::geometry::ChildPosition;
use crate::id::NodeId;
use crate::pose::{Pose, PoseUpdate};
use crate::time::HostTime;

use super::id::{INVALID, PresenceId, PresenceState};
use super::traverse::Siblings;

/// Struct-of-arrays storage for every visible child element.
///
/// A presence is one child as shown inside one container. The same scene
/// node can have two presences at once: an exiting one in its old container
/// and an entering one in its new container, or an exiting and an entering
/// one in the same container when it is removed and re-added.
///
/// Presences are addressed by [`PresenceId`] handles. Destroyed presences
/// are recycled via a free list, and generation counters prevent stale
/// handle access.
#[derive(Debug, Default)]
pub struct PresenceStore {
    // -- Identity --
    pub(crate) child: Vec<NodeId>,
    pub(crate) container: Vec<NodeId>,
    pub(crate) state: Vec<PresenceState>,

    // -- Sibling order --
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,
    pub(crate) linked: Vec<bool>,
    heads: HashMap<NodeId, (u32, u32)>,

    // -- Animation --
    pub(crate) target: Vec<Option<ChildPosition>>,
    pub(crate) sent: Vec<Option<Pose>>,
    pub(crate) pending: Vec<Option<PoseUpdate>>,
    pub(crate) exit_deadline: Vec<Option<HostTime>>,
    pub(crate) settle_deadline: Vec<Option<HostTime>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) alive: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,
}

impl PresenceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Allocation API --

    /// Creates an unlinked, entering presence of `child` in `container`.
    pub fn create(&mut self, container: &NodeId, child: &NodeId) -> PresenceId {
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.generation[i] += 1;
            self.child[i] = child.clone();
            self.container[i] = container.clone();
            self.state[i] = PresenceState::Entering;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.linked[i] = false;
            self.target[i] = None;
            self.sent[i] = None;
            self.pending[i] = None;
            self.exit_deadline[i] = None;
            self.settle_deadline[i] = None;
            self.alive[i] = true;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.child.push(child.clone());
            self.container.push(container.clone());
            self.state.push(PresenceState::Entering);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.linked.push(false);
            self.target.push(None);
            self.sent.push(None);
            self.pending.push(None);
            self.exit_deadline.push(None);
            self.settle_deadline.push(None);
            self.generation.push(0);
            self.alive.push(true);
            idx
        };
        PresenceId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a presence, unlinking it first if needed.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy(&mut self, id: PresenceId) {
        self.validate(id);
        if self.linked[id.idx as usize] {
            self.unlink(id);
        }
        let i = id.idx as usize;
        self.generation[i] += 1;
        self.alive[i] = false;
        self.target[i] = None;
        self.sent[i] = None;
        self.pending[i] = None;
        self.free_list.push(id.idx);
    }

    /// Returns whether the handle refers to a live presence.
    #[must_use]
    pub fn is_alive(&self, id: PresenceId) -> bool {
        id.idx < self.len
            && self.generation[id.idx as usize] == id.generation
            && self.alive[id.idx as usize]
    }

    /// Iterates over every live presence, in slot order.
    pub fn live(&self) -> impl Iterator<Item = PresenceId> + '_ {
        (0..self.len)
            .filter(|&idx| self.alive[idx as usize])
            .map(|idx| PresenceId {
                idx,
                generation: self.generation[idx as usize],
            })
    }

    // -- Sibling API --

    /// Links `id` after `after` in its container's sibling order, or at the
    /// front when `after` is `None`.
    ///
    /// # Panics
    ///
    /// Panics if a handle is stale, `id` is already linked, or `after` is
    /// not linked into the same container.
    pub fn insert_after(&mut self, id: PresenceId, after: Option<PresenceId>) {
        self.validate(id);
        let c = id.idx;
        assert!(!self.linked[c as usize], "presence already linked");
        let container = self.container[c as usize].clone();
        let (first, last) = self.heads.get(&container).copied().unwrap_or((INVALID, INVALID));

        match after {
            None => {
                self.prev_sibling[c as usize] = INVALID;
                self.next_sibling[c as usize] = first;
                if first != INVALID {
                    self.prev_sibling[first as usize] = c;
                }
                let last = if last == INVALID { c } else { last };
                self.heads.insert(container, (c, last));
            }
            Some(after) => {
                self.validate(after);
                let a = after.idx;
                assert!(
                    self.linked[a as usize] && self.container[a as usize] == container,
                    "anchor is not a sibling"
                );
                let next = self.next_sibling[a as usize];
                self.prev_sibling[c as usize] = a;
                self.next_sibling[c as usize] = next;
                self.next_sibling[a as usize] = c;
                if next != INVALID {
                    self.prev_sibling[next as usize] = c;
                }
                let last = if last == a { c } else { last };
                self.heads.insert(container, (first, last));
            }
        }
        self.linked[c as usize] = true;
    }

    /// Links `id` as the last sibling in its container.
    pub fn append(&mut self, id: PresenceId) {
        self.validate(id);
        let last = self
            .heads
            .get(&self.container[id.idx as usize])
            .map(|&(_, last)| last)
            .filter(|&last| last != INVALID)
            .map(|idx| PresenceId {
                idx,
                generation: self.generation[idx as usize],
            });
        self.insert_after(id, last);
    }

    /// Removes `id` from its container's sibling order, joining its
    /// neighbours.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the presence is not linked.
    pub fn unlink(&mut self, id: PresenceId) {
        self.validate(id);
        let idx = id.idx;
        assert!(self.linked[idx as usize], "presence is not linked");
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];
        let container = &self.container[idx as usize];
        let (mut first, mut last) = self.heads.get(container).copied().unwrap_or((INVALID, INVALID));

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            first = next;
        }
        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        } else {
            last = prev;
        }

        if first == INVALID {
            self.heads.remove(container);
        } else {
            self.heads.insert(container.clone(), (first, last));
        }

        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
        self.linked[idx as usize] = false;
    }

    /// Returns whether `id` is in its container's sibling order.
    #[must_use]
    pub fn is_linked(&self, id: PresenceId) -> bool {
        self.validate(id);
        self.linked[id.idx as usize]
    }

    /// Iterates over `container`'s presences in sibling order.
    #[must_use]
    pub fn siblings(&self, container: &NodeId) -> Siblings<'_> {
        Siblings::new(
            self,
            self.heads.get(container).copied().unwrap_or((INVALID, INVALID)),
        )
    }

    /// Finds the entering or settled presence of `child` in `container`.
    #[must_use]
    pub fn find_active(&self, container: &NodeId, child: &NodeId) -> Option<PresenceId> {
        self.siblings(container).find(|&id| {
            self.state[id.idx as usize].is_active() && self.child[id.idx as usize] == *child
        })
    }

    /// Finds an exiting presence of `child` in `container`.
    #[must_use]
    pub fn find_exiting(&self, container: &NodeId, child: &NodeId) -> Option<PresenceId> {
        self.siblings(container).find(|&id| {
            self.state[id.idx as usize] == PresenceState::Exiting
                && self.child[id.idx as usize] == *child
        })
    }

    /// Finds the detached presence of `child` in `container`.
    #[must_use]
    pub fn find_detached(&self, container: &NodeId, child: &NodeId) -> Option<PresenceId> {
        self.live().find(|&id| {
            let i = id.idx as usize;
            self.state[i] == PresenceState::Detached
                && self.container[i] == *container
                && self.child[i] == *child
        })
    }

    // -- Property access --

    /// The child shown by the presence.
    #[must_use]
    pub fn child(&self, id: PresenceId) -> &NodeId {
        self.validate(id);
        &self.child[id.idx as usize]
    }

    /// The container the presence is shown in.
    #[must_use]
    pub fn container(&self, id: PresenceId) -> &NodeId {
        self.validate(id);
        &self.container[id.idx as usize]
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self, id: PresenceId) -> PresenceState {
        self.validate(id);
        self.state[id.idx as usize]
    }

    /// Sets the lifecycle state, returning the previous one.
    pub fn set_state(&mut self, id: PresenceId, state: PresenceState) -> PresenceState {
        self.validate(id);
        core::mem::replace(&mut self.state[id.idx as usize], state)
    }

    /// Last layout position computed for the presence.
    #[must_use]
    pub fn target(&self, id: PresenceId) -> Option<&ChildPosition> {
        self.validate(id);
        self.target[id.idx as usize].as_ref()
    }

    /// Records a freshly computed layout position.
    pub fn set_target(&mut self, id: PresenceId, target: ChildPosition) {
        self.validate(id);
        self.target[id.idx as usize] = Some(target);
    }

    /// Updates the cached root offset on the current target.
    pub fn set_root_offset(&mut self, id: PresenceId, offset: kurbo::Point) {
        self.validate(id);
        if let Some(target) = &mut self.target[id.idx as usize] {
            target.root_offset = Some(offset);
        }
    }

    /// Last pose handed to the presenter.
    #[must_use]
    pub fn sent(&self, id: PresenceId) -> Option<&Pose> {
        self.validate(id);
        self.sent[id.idx as usize].as_ref()
    }

    /// Records the pose handed to the presenter.
    pub fn set_sent(&mut self, id: PresenceId, pose: Pose) {
        self.validate(id);
        self.sent[id.idx as usize] = Some(pose);
    }

    /// Schedules an update to send on the next tick.
    pub fn set_pending(&mut self, id: PresenceId, update: PoseUpdate) {
        self.validate(id);
        self.pending[id.idx as usize] = Some(update);
    }

    /// Takes the update scheduled for this tick, if any.
    pub fn take_pending(&mut self, id: PresenceId) -> Option<PoseUpdate> {
        self.validate(id);
        self.pending[id.idx as usize].take()
    }

    /// Returns whether an update is scheduled.
    #[must_use]
    pub fn has_pending(&self, id: PresenceId) -> bool {
        self.validate(id);
        self.pending[id.idx as usize].is_some()
    }

    /// Time after which an unfinished exit is forced to complete.
    #[must_use]
    pub fn exit_deadline(&self, id: PresenceId) -> Option<HostTime> {
        self.validate(id);
        self.exit_deadline[id.idx as usize]
    }

    /// Sets or clears the exit deadline.
    pub fn set_exit_deadline(&mut self, id: PresenceId, deadline: Option<HostTime>) {
        self.validate(id);
        self.exit_deadline[id.idx as usize] = deadline;
    }

    /// Time at which the current animation settles.
    #[must_use]
    pub fn settle_deadline(&self, id: PresenceId) -> Option<HostTime> {
        self.validate(id);
        self.settle_deadline[id.idx as usize]
    }

    /// Sets or clears the settle deadline.
    pub fn set_settle_deadline(&mut self, id: PresenceId, deadline: Option<HostTime>) {
        self.validate(id);
        self.settle_deadline[id.idx as usize] = deadline;
    }

    // -- Internal helpers --

    fn validate(&self, id: PresenceId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale PresenceId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(store: &PresenceStore, container: &str) -> Vec<String> {
        store
            .siblings(&NodeId::from(container))
            .map(|id| store.child(id).to_string())
            .collect()
    }

    #[test]
    fn create_and_destroy() {
        let mut store = PresenceStore::new();
        let id = store.create(&"stage".into(), &"cam".into());
        assert!(store.is_alive(id));
        assert_eq!(store.state(id), PresenceState::Entering);
        store.destroy(id);
        assert!(!store.is_alive(id));
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut store = PresenceStore::new();
        let a = store.create(&"stage".into(), &"a".into());
        store.destroy(a);
        let b = store.create(&"stage".into(), &"b".into());
        assert!(!store.is_alive(a));
        assert!(store.is_alive(b));
        assert_eq!(a.index(), b.index());
        assert_ne!(a.generation(), b.generation());
    }

    #[test]
    #[should_panic(expected = "stale PresenceId")]
    fn stale_handle_panics() {
        let mut store = PresenceStore::new();
        let a = store.create(&"stage".into(), &"a".into());
        store.destroy(a);
        let _ = store.state(a);
    }

    #[test]
    fn sibling_order_and_relinking() {
        let mut store = PresenceStore::new();
        let stage = NodeId::from("stage");
        let a = store.create(&stage, &"a".into());
        let b = store.create(&stage, &"b".into());
        let c = store.create(&stage, &"c".into());
        store.append(a);
        store.append(c);
        store.insert_after(b, Some(a));
        assert_eq!(ids(&store, "stage"), ["a", "b", "c"]);

        let back: Vec<_> = store.siblings(&stage).rev().collect();
        assert_eq!(back, [c, b, a]);

        store.unlink(b);
        assert_eq!(ids(&store, "stage"), ["a", "c"]);
        store.unlink(a);
        store.unlink(c);
        assert!(ids(&store, "stage").is_empty());

        store.insert_after(b, None);
        store.insert_after(a, None);
        assert_eq!(ids(&store, "stage"), ["a", "b"]);
    }

    #[test]
    fn destroy_relinks_neighbours() {
        let mut store = PresenceStore::new();
        let stage = NodeId::from("stage");
        let kids: Vec<_> = ["a", "b", "c"]
            .into_iter()
            .map(|k| {
                let id = store.create(&stage, &k.into());
                store.append(id);
                id
            })
            .collect();
        store.destroy(kids[1]);
        assert_eq!(ids(&store, "stage"), ["a", "c"]);
        assert_eq!(store.live().count(), 2);
    }

    #[test]
    fn find_respects_state() {
        let mut store = PresenceStore::new();
        let stage = NodeId::from("stage");
        let cam = NodeId::from("cam");
        let old = store.create(&stage, &cam);
        store.append(old);
        store.set_state(old, PresenceState::Exiting);
        let new = store.create(&stage, &cam);
        store.append(new);

        assert_eq!(store.find_active(&stage, &cam), Some(new));
        assert_eq!(store.find_exiting(&stage, &cam), Some(old));
        assert_eq!(store.find_active(&"other".into(), &cam), None);
    }
}
