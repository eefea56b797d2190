// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame op batching and dirty tracking.
//!
//! The [`Scheduler`] collects [`Op`]s between ticks and tracks which
//! containers need re-layout. Once per tick, [`Scheduler::flush`] folds the
//! queued ops into one [`ContainerOps`] per container and drains the dirty
//! channels into a [`FlushPlan`].
//!
//! # Usage
//!
//! ```rust,ignore
//! scheduler.register(&stage, None);
//! scheduler.register(&sidebar, Some(&stage));
//! scheduler.queue_op(Op::ChildInserted { container: stage.clone(), child });
//! scheduler.mark_resized(&stage); // sidebar is dirtied too
//! let plan = scheduler.flush();
//! ```

use std::collections::{BTreeMap, HashMap};

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use crate::dirty;
use crate::id::NodeId;
use crate::op::{ContainerOps, Op};

/// The work for one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlushPlan {
    /// Folded ops, keyed by container.
    pub ops: BTreeMap<NodeId, ContainerOps>,
    /// Containers needing re-layout, parents before nested containers.
    pub dirty: Vec<NodeId>,
}

impl FlushPlan {
    /// Total number of cancelled insert/remove pairs.
    #[must_use]
    pub fn cancelled(&self) -> usize {
        self.ops.values().map(|o| o.cancelled.len()).sum()
    }

    /// Returns `true` if there is nothing to do.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty() && self.dirty.is_empty()
    }
}

/// Op queue plus container dirty tracking.
#[derive(Debug)]
pub struct Scheduler {
    queue: Vec<Op>,
    dirty: DirtyTracker<u32>,
    slots: HashMap<NodeId, u32>,
    ids: Vec<Option<NodeId>>,
    parents: Vec<Option<u32>>,
    free_list: Vec<u32>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            slots: HashMap::new(),
            ids: Vec::new(),
            parents: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Starts tracking `container`, nested inside `parent` if given.
    ///
    /// Registering an already tracked container only updates its parent.
    pub fn register(&mut self, container: &NodeId, parent: Option<&NodeId>) {
        let slot = match self.slots.get(container) {
            Some(&slot) => slot,
            None => {
                let slot = if let Some(slot) = self.free_list.pop() {
                    self.ids[slot as usize] = Some(container.clone());
                    self.parents[slot as usize] = None;
                    slot
                } else {
                    let slot = u32::try_from(self.ids.len()).unwrap_or(u32::MAX);
                    self.ids.push(Some(container.clone()));
                    self.parents.push(None);
                    slot
                };
                self.slots.insert(container.clone(), slot);
                slot
            }
        };
        self.set_parent_slot(slot, parent.and_then(|p| self.slots.get(p).copied()));
        self.dirty.mark(slot, dirty::LAYOUT);
    }

    /// Stops tracking `container`. Queued ops for it are dropped at flush.
    pub fn unregister(&mut self, container: &NodeId) {
        let Some(slot) = self.slots.remove(container) else {
            return;
        };
        self.dirty.remove_key(slot);
        self.ids[slot as usize] = None;
        self.parents[slot as usize] = None;
        for parent in &mut self.parents {
            if *parent == Some(slot) {
                *parent = None;
            }
        }
        self.free_list.push(slot);
    }

    /// Returns whether `container` is tracked.
    #[must_use]
    pub fn is_registered(&self, container: &NodeId) -> bool {
        self.slots.contains_key(container)
    }

    /// Queues an op for the next flush and marks its container.
    pub fn queue_op(&mut self, op: Op) {
        if let Some(&slot) = self.slots.get(op.container()) {
            self.dirty.mark(slot, dirty::LAYOUT);
        }
        self.queue.push(op);
    }

    /// Number of ops waiting for the next flush.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Marks `container` for re-layout without an op.
    pub fn mark_layout(&mut self, container: &NodeId) {
        if let Some(&slot) = self.slots.get(container) {
            self.dirty.mark(slot, dirty::LAYOUT);
        }
    }

    /// Marks `container` and every container nested in it for re-layout.
    pub fn mark_resized(&mut self, container: &NodeId) {
        if let Some(&slot) = self.slots.get(container) {
            self.dirty.mark_with(slot, dirty::GEOMETRY, &EagerPolicy);
        }
    }

    /// Folds queued ops and drains dirty containers.
    pub fn flush(&mut self) -> FlushPlan {
        let mut ops: BTreeMap<NodeId, ContainerOps> = BTreeMap::new();
        for op in self.queue.drain(..) {
            if !self.slots.contains_key(op.container()) {
                log::trace!("dropping {op:?} for a detached container");
                continue;
            }
            ops.entry(op.container().clone()).or_default().push(&op);
        }

        let resized: Vec<u32> = self
            .dirty
            .drain(dirty::GEOMETRY)
            .affected()
            .deterministic()
            .run()
            .collect();
        let marked: Vec<u32> = self
            .dirty
            .drain(dirty::LAYOUT)
            .deterministic()
            .run()
            .collect();

        let mut dirty = Vec::with_capacity(resized.len() + marked.len());
        for slot in resized.into_iter().chain(marked) {
            if let Some(Some(id)) = self.ids.get(slot as usize) {
                if !dirty.contains(id) {
                    dirty.push(id.clone());
                }
            }
        }

        FlushPlan { ops, dirty }
    }

    fn set_parent_slot(&mut self, slot: u32, parent: Option<u32>) {
        let old = self.parents[slot as usize];
        if old == parent {
            return;
        }
        if let Some(old) = old {
            self.dirty.remove_dependency(slot, old, dirty::GEOMETRY);
        }
        if let Some(p) = parent {
            let _ = self.dirty.add_dependency(slot, p, dirty::GEOMETRY);
        }
        self.parents[slot as usize] = parent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn register_marks_for_first_layout() {
        let mut scheduler = Scheduler::new();
        scheduler.register(&id("stage"), None);
        let plan = scheduler.flush();
        assert_eq!(plan.dirty, [id("stage")]);
        assert!(scheduler.flush().is_empty());
    }

    #[test]
    fn ops_are_grouped_per_container() {
        let mut scheduler = Scheduler::new();
        scheduler.register(&id("a"), None);
        scheduler.register(&id("b"), None);
        let _ = scheduler.flush();

        scheduler.queue_op(Op::ChildInserted {
            container: id("a"),
            child: id("x"),
        });
        scheduler.queue_op(Op::ChildRemoved {
            container: id("b"),
            child: id("y"),
        });
        assert_eq!(scheduler.pending(), 2);

        let plan = scheduler.flush();
        assert_eq!(plan.ops[&id("a")].inserted, [id("x")]);
        assert_eq!(plan.ops[&id("b")].removed, [id("y")]);
        assert_eq!(plan.dirty.len(), 2);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn resize_propagates_to_nested_containers() {
        let mut scheduler = Scheduler::new();
        scheduler.register(&id("stage"), None);
        scheduler.register(&id("sidebar"), Some(&id("stage")));
        scheduler.register(&id("other"), None);
        let _ = scheduler.flush();

        scheduler.mark_resized(&id("stage"));
        let plan = scheduler.flush();
        assert_eq!(plan.dirty, [id("stage"), id("sidebar")]);
    }

    #[test]
    fn ops_for_unregistered_containers_are_dropped() {
        let mut scheduler = Scheduler::new();
        scheduler.register(&id("a"), None);
        let _ = scheduler.flush();
        scheduler.queue_op(Op::SizeChanged { container: id("a") });
        scheduler.unregister(&id("a"));
        let plan = scheduler.flush();
        assert!(plan.is_empty(), "{plan:?}");
    }

    #[test]
    fn slots_are_reused() {
        let mut scheduler = Scheduler::new();
        scheduler.register(&id("a"), None);
        scheduler.unregister(&id("a"));
        scheduler.register(&id("b"), None);
        assert!(scheduler.is_registered(&id("b")));
        assert!(!scheduler.is_registered(&id("a")));
        assert_eq!(scheduler.flush().dirty, [id("b")]);
    }
}
