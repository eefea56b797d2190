// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout and transition engine.
//!
//! An [`Engine`] owns every layout container of one render, the op queue,
//! the measurement arena and the presence of every visible child. Hosts feed
//! it [`HostMessage`]s as their surface changes and call [`Engine::tick`]
//! once per animation frame.
//!
//! # Tick pipeline
//!
//! ```text
//!   tick(now)
//!     │  dragging? ──► Deferred (ops stay queued)
//!     ▼
//!   orphaned children of detached containers ──► Presenter::detach
//!     ▼
//!   second phases ──► Presenter::apply (entering children start moving)
//!     ▼
//!   completions ──► exit timeouts, TransitionEnded, settle deadlines
//!     ▼
//!   Scheduler::flush ──► moves, exits, remove-finished unlinks
//!     ▼
//!   re-layout dirty containers, parents first ──► Presenter::apply
//! ```
//!
//! Each container is laid out independently. A failing container is logged
//! and reported in the [`TickReport`] while the remaining containers still
//! run.
//!
//! Entering children are placed over two frames: the layout that creates
//! them snaps them to their entry pose, and the next tick sends the
//! animation to their slot before anything is laid out again.

use std::collections::{BTreeSet, HashMap, HashSet};

use kurbo::{Point, Size, Vec2};

use crate::backend::Presenter;
use crate::config::EngineConfig;
use crate::container::LayoutContainer;
use crate::context::RenderContext;
use crate::error::LayoutError;
use crate::geometry::{ChildPosition, EXIT_Z_INDEX};
use crate::id::NodeId;
use crate::measure::MeasurementArena;
use crate::message::{HostChild, HostMessage};
use crate::op::Op;
use crate::pose::{Pose, PoseUpdate};
use crate::presence::{PresenceId, PresenceState, PresenceStore};
use crate::props::Props;
use crate::scheduler::{FlushPlan, Scheduler};
use crate::time::{Duration, HostTime};
use crate::timing::{FrameTick, TickOutcome, TickReport};
use crate::trace::{
    ContainerFailureEvent, ContainerLayoutEvent, FlushEvent, TickBeginEvent, TickEndEvent,
    Tracer, TransitionEvent,
};
use crate::transition::TimingCurve;

/// Layout containers, op queue and child transitions for one render.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    containers: HashMap<NodeId, LayoutContainer>,
    scheduler: Scheduler,
    arena: MeasurementArena,
    presences: PresenceStore,
    root_offsets: HashMap<NodeId, Point>,
    ended: Vec<(NodeId, NodeId)>,
    orphaned: Vec<(NodeId, NodeId)>,
    frame_index: u64,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Children arriving from another container in this flush, with the root
/// offset to re-anchor them at.
type Arrivals = HashMap<NodeId, Point>;

impl Engine {
    /// Creates an engine with no containers.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            containers: HashMap::new(),
            scheduler: Scheduler::new(),
            arena: MeasurementArena::new(),
            presences: PresenceStore::new(),
            root_offsets: HashMap::new(),
            ended: Vec::new(),
            orphaned: Vec::new(),
            frame_index: 0,
        }
    }

    /// Timing configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Looks up a container.
    #[must_use]
    pub fn container(&self, id: &NodeId) -> Option<&LayoutContainer> {
        self.containers.get(id)
    }

    /// Iterates over every container, in no particular order.
    pub fn containers(&self) -> impl Iterator<Item = &LayoutContainer> {
        self.containers.values()
    }

    /// Every visible child, including exiting ones.
    #[must_use]
    pub fn presences(&self) -> &PresenceStore {
        &self.presences
    }

    /// The shared measurement arena.
    #[must_use]
    pub fn arena(&self) -> &MeasurementArena {
        &self.arena
    }

    /// Number of ops waiting for the next tick.
    #[must_use]
    pub fn pending_ops(&self) -> usize {
        self.scheduler.pending()
    }

    /// Last settled position of `child` relative to the topmost container.
    #[must_use]
    pub fn root_offset(&self, child: &NodeId) -> Option<Point> {
        self.root_offsets.get(child).copied()
    }

    /// Offset of `container`'s top-left corner from the topmost container.
    #[must_use]
    pub fn global_offset(&self, container: &NodeId) -> Vec2 {
        let mut offset = Vec2::ZERO;
        let mut current = self.containers.get(container);
        // Bounded walk; parent links come from the host.
        for _ in 0..=self.containers.len() {
            let Some(c) = current else {
                break;
            };
            offset += c.origin().to_vec2();
            current = c.parent().and_then(|p| self.containers.get(p));
        }
        offset
    }

    /// Current layout position of `child` in `container`, if it is entering
    /// or settled there.
    #[must_use]
    pub fn position(&self, container: &NodeId, child: &NodeId) -> Option<&ChildPosition> {
        let p = self.presences.find_active(container, child)?;
        self.presences.target(p)
    }

    // -- Host messages --

    /// Applies a host notification. Layout happens on the next tick.
    pub fn handle(&mut self, msg: HostMessage) {
        match msg {
            HostMessage::ContainerAttached {
                id,
                parent,
                slot,
                props,
                children,
                size,
            } => self.attach(id, parent, slot, &props, &children, size),
            HostMessage::ContainerDetached { id } => self.detach(&id),
            HostMessage::ChildrenChanged {
                container,
                children,
            } => {
                let Some(c) = self.containers.get_mut(&container) else {
                    log::debug!("children changed on unknown container {container}");
                    return;
                };
                let diff = c.set_children(&children);
                for child in diff.removed {
                    self.scheduler.queue_op(Op::ChildRemoved {
                        container: container.clone(),
                        child,
                    });
                }
                for child in diff.inserted {
                    self.scheduler.queue_op(Op::ChildInserted {
                        container: container.clone(),
                        child,
                    });
                }
                for child in diff.changed {
                    self.scheduler.queue_op(Op::ChildAttributesChanged {
                        container: container.clone(),
                        child,
                    });
                }
            }
            HostMessage::AttributesChanged { container, props } => {
                let Some(c) = self.containers.get_mut(&container) else {
                    log::debug!("attributes changed on unknown container {container}");
                    return;
                };
                if let Err(err) = c.set_props(&props) {
                    log::warn!("container {container} has invalid props: {err}");
                }
                if c.props().is_ok_and(|p| !p.kind.needs_measurement()) {
                    self.arena.release(&container);
                }
                self.scheduler.queue_op(Op::AttributesChanged { container });
            }
            HostMessage::ChildAttributesChanged {
                container,
                child,
                props,
            } => {
                let found = self
                    .containers
                    .get_mut(&container)
                    .is_some_and(|c| c.set_child_props(&child, &props));
                if found {
                    self.scheduler
                        .queue_op(Op::ChildAttributesChanged { container, child });
                }
            }
            HostMessage::Resized { container, size } => {
                let Some(c) = self.containers.get_mut(&container) else {
                    return;
                };
                if c.set_size(size) {
                    self.scheduler.mark_resized(&container);
                    self.scheduler.queue_op(Op::SizeChanged { container });
                }
            }
            HostMessage::TransitionEnded { container, child } => {
                self.ended.push((container, child));
            }
        }
    }

    fn attach(
        &mut self,
        id: NodeId,
        parent: Option<NodeId>,
        slot: Option<NodeId>,
        props: &Props,
        children: &[HostChild],
        size: Option<Size>,
    ) {
        let depth = parent
            .as_ref()
            .and_then(|p| self.containers.get(p))
            .map_or(0, |p| p.depth() + 1);
        let mut container = self
            .containers
            .remove(&id)
            .unwrap_or_else(|| LayoutContainer::new(id.clone(), parent.clone(), depth));
        container.set_parent(parent.clone(), depth);
        container.set_slot(slot);
        if let Err(err) = container.set_props(props) {
            log::warn!("container {id} has invalid props: {err}");
        }

        // A nested container starts at the slot already laid out for it.
        let placed = parent
            .as_ref()
            .and_then(|p| self.position(p, container.hosting_slot()))
            .map(|cp| (cp.position, cp.size));
        if let Some((origin, slot_size)) = placed {
            container.set_origin(origin);
            container.set_size(slot_size);
        }
        if let Some(size) = size {
            container.set_size(size);
        }

        self.scheduler.register(&id, parent.as_ref());
        let diff = container.set_children(children);
        for child in diff.removed {
            self.scheduler.queue_op(Op::ChildRemoved {
                container: id.clone(),
                child,
            });
        }
        for child in diff.inserted {
            self.scheduler.queue_op(Op::ChildInserted {
                container: id.clone(),
                child,
            });
        }
        self.containers.insert(id, container);
    }

    fn detach(&mut self, id: &NodeId) {
        if self.containers.remove(id).is_none() {
            return;
        }
        // Children already on the host are detached on the next tick.
        let presences: Vec<PresenceId> = self.presences.siblings(id).collect();
        for p in presences {
            if self.presences.sent(p).is_some() {
                self.orphaned
                    .push((id.clone(), self.presences.child(p).clone()));
            }
            self.presences.destroy(p);
        }
        self.arena.release(id);
        self.scheduler.unregister(id);
        for c in self.containers.values_mut() {
            if c.parent() == Some(id) {
                c.set_parent(None, 0);
            }
        }
    }

    /// Detaches every child element and container, releasing all measurement
    /// handles.
    pub fn detach_all(&mut self, presenter: &mut dyn Presenter) {
        for (container, child) in core::mem::take(&mut self.orphaned) {
            presenter.detach(&container, &child);
        }
        let live: Vec<PresenceId> = self.presences.live().collect();
        for p in live {
            if self.presences.sent(p).is_some() {
                presenter.detach(self.presences.container(p), self.presences.child(p));
            }
        }
        let ids: Vec<NodeId> = self.containers.keys().cloned().collect();
        for id in ids {
            self.detach(&id);
        }
        self.orphaned.clear();
        self.ended.clear();
    }

    // -- Tick --

    /// Runs one animation frame without tracing.
    pub fn tick(
        &mut self,
        ctx: &RenderContext,
        presenter: &mut dyn Presenter,
        now: HostTime,
    ) -> TickOutcome {
        self.tick_traced(ctx, presenter, now, &mut Tracer::none())
    }

    /// Runs one animation frame.
    pub fn tick_traced(
        &mut self,
        ctx: &RenderContext,
        presenter: &mut dyn Presenter,
        now: HostTime,
        tracer: &mut Tracer<'_>,
    ) -> TickOutcome {
        self.frame_index += 1;
        let tick = FrameTick {
            now,
            frame_index: self.frame_index,
        };

        if ctx.is_dragging() {
            log::trace!("tick {} deferred by drag", tick.frame_index);
            tracer.tick_begin(&TickBeginEvent {
                deferred: true,
                ..TickBeginEvent::from(&tick)
            });
            return TickOutcome::Deferred(tick);
        }
        tracer.tick_begin(&TickBeginEvent::from(&tick));

        let mut report = TickReport::default();
        for (container, child) in core::mem::take(&mut self.orphaned) {
            presenter.detach(&container, &child);
        }
        self.resolve_second_phases(presenter, now);
        self.complete_transitions(now, tracer);

        let plan = self.scheduler.flush();
        report.cancelled = plan.cancelled();
        let (departed, arrivals) = self.find_moves(&plan);

        for (container, ops) in &plan.ops {
            for child in &ops.removed {
                if departed.contains(&(container.clone(), child.clone())) {
                    self.detach_silently(container, child, presenter, tracer);
                } else if self.start_exit(container, child, now, presenter, tracer) {
                    report.removed += 1;
                }
            }
        }
        for (container, ops) in &plan.ops {
            for child in &ops.remove_finished {
                if let Some(p) = self.presences.find_detached(container, child) {
                    presenter.detach(container, child);
                    self.presences.destroy(p);
                    report.remove_finished += 1;
                }
            }
        }

        let work: BTreeSet<(usize, NodeId)> = plan
            .dirty
            .iter()
            .chain(plan.ops.keys())
            .filter_map(|id| self.containers.get(id).map(|c| (c.depth(), id.clone())))
            .collect();
        self.relayout(work, &arrivals, now, presenter, &mut report, tracer);
        tracer.flush(&FlushEvent::new(tick.frame_index, &report));

        tracer.tick_end(&TickEndEvent {
            frame_index: tick.frame_index,
            now,
            laid_out: report.laid_out.len(),
            failures: report.failures.len(),
        });
        TickOutcome::Ran(tick, report)
    }

    /// Sends the animation that follows every entry snap.
    fn resolve_second_phases(&mut self, presenter: &mut dyn Presenter, now: HostTime) {
        let due: Vec<PresenceId> = self
            .presences
            .live()
            .filter(|&p| self.presences.has_pending(p))
            .collect();
        for p in due {
            let Some(update) = self.presences.take_pending(p) else {
                continue;
            };
            presenter.apply(self.presences.container(p), self.presences.child(p), &update);
            self.presences.set_sent(p, update.pose);
            self.presences
                .set_settle_deadline(p, Some(now.saturating_add(update.total())));
        }
        for c in self.containers.values_mut() {
            c.set_updating(false);
        }
    }

    fn complete_transitions(&mut self, now: HostTime, tracer: &mut Tracer<'_>) {
        for (container, child) in core::mem::take(&mut self.ended) {
            if let Some(p) = self.presences.find_exiting(&container, &child) {
                self.finish_exit(p, tracer);
            } else if let Some(p) = self.presences.find_active(&container, &child)
                && self.presences.settle_deadline(p).is_some()
            {
                self.settle(p, tracer);
            }
        }

        let live: Vec<PresenceId> = self.presences.live().collect();
        for p in live {
            match self.presences.state(p) {
                PresenceState::Exiting
                    if self.presences.exit_deadline(p).is_some_and(|d| now >= d) =>
                {
                    log::debug!(
                        "exit of {} from {} timed out",
                        self.presences.child(p),
                        self.presences.container(p)
                    );
                    self.finish_exit(p, tracer);
                }
                PresenceState::Entering | PresenceState::Settled
                    if self.presences.settle_deadline(p).is_some_and(|d| now >= d) =>
                {
                    self.settle(p, tracer);
                }
                _ => {}
            }
        }
    }

    /// Marks an exiting presence detached and queues its remove-finished op.
    /// Does nothing for a presence that is not exiting, so each exit
    /// finishes once.
    fn finish_exit(&mut self, p: PresenceId, tracer: &mut Tracer<'_>) {
        if self.presences.state(p) != PresenceState::Exiting {
            return;
        }
        self.set_state(p, PresenceState::Detached, tracer);
        self.presences.set_exit_deadline(p, None);
        self.scheduler.queue_op(Op::ChildRemoveFinished {
            container: self.presences.container(p).clone(),
            child: self.presences.child(p).clone(),
        });
    }

    fn settle(&mut self, p: PresenceId, tracer: &mut Tracer<'_>) {
        self.presences.set_settle_deadline(p, None);
        if self.presences.state(p) == PresenceState::Entering {
            self.set_state(p, PresenceState::Settled, tracer);
        }
        let Some(target) = self.presences.target(p) else {
            return;
        };
        let offset = target.position + self.global_offset(self.presences.container(p));
        self.presences.set_root_offset(p, offset);
        self.root_offsets
            .insert(self.presences.child(p).clone(), offset);
    }

    /// Pairs removals and insertions of the same child in different
    /// containers.
    fn find_moves(&self, plan: &FlushPlan) -> (HashSet<(NodeId, NodeId)>, Arrivals) {
        let mut departures: HashMap<&NodeId, &NodeId> = HashMap::new();
        for (container, ops) in &plan.ops {
            for child in &ops.removed {
                departures.insert(child, container);
            }
        }

        let mut departed = HashSet::new();
        let mut arrivals = Arrivals::new();
        for (container, ops) in &plan.ops {
            for child in &ops.inserted {
                let Some(&from) = departures.get(child) else {
                    continue;
                };
                if from == container {
                    continue;
                }
                log::trace!("{child} moves from {from} to {container}");
                if let Some(anchor) = self.anchor(from, child) {
                    arrivals.insert(child.clone(), anchor);
                }
                departed.insert((from.clone(), child.clone()));
            }
        }
        (departed, arrivals)
    }

    /// Where `child` currently is relative to the topmost container.
    fn anchor(&self, container: &NodeId, child: &NodeId) -> Option<Point> {
        self.root_offsets.get(child).copied().or_else(|| {
            self.position(container, child)
                .map(|cp| cp.position + self.global_offset(container))
        })
    }

    fn detach_silently(
        &mut self,
        container: &NodeId,
        child: &NodeId,
        presenter: &mut dyn Presenter,
        tracer: &mut Tracer<'_>,
    ) {
        let Some(p) = self.presences.find_active(container, child) else {
            return;
        };
        if self.presences.sent(p).is_some() {
            presenter.detach(container, child);
        }
        self.set_state(p, PresenceState::Detached, tracer);
        self.presences.destroy(p);
    }

    /// Plays `child`'s exit transition. Returns `false` if it was not
    /// visible.
    fn start_exit(
        &mut self,
        container: &NodeId,
        child: &NodeId,
        now: HostTime,
        presenter: &mut dyn Presenter,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        let Some(p) = self.presences.find_active(container, child) else {
            return false;
        };
        let Some(target) = self.presences.target(p).cloned() else {
            self.presences.destroy(p);
            return false;
        };
        let bounds = self
            .containers
            .get(container)
            .and_then(LayoutContainer::size)
            .unwrap_or(target.size);
        let exit = target.exit_transition;
        let mut pose = Pose::with_transition(&target, &exit, bounds);
        pose.z_index = EXIT_Z_INDEX;
        let update = PoseUpdate::animate(
            pose,
            self.config.settle_duration,
            exit.delay_or_zero(),
            exit.curve_or(TimingCurve::Exit),
        );

        let _ = self.presences.take_pending(p);
        presenter.apply(container, child, &update);
        self.presences.set_sent(p, pose);
        self.presences.set_settle_deadline(p, None);
        let deadline = now.saturating_add(update.total().saturating_add(self.config.exit_timeout_slack));
        self.presences.set_exit_deadline(p, Some(deadline));
        self.set_state(p, PresenceState::Exiting, tracer);
        true
    }

    fn relayout(
        &mut self,
        mut work: BTreeSet<(usize, NodeId)>,
        arrivals: &Arrivals,
        now: HostTime,
        presenter: &mut dyn Presenter,
        report: &mut TickReport,
        tracer: &mut Tracer<'_>,
    ) {
        while let Some((_, id)) = work.pop_first() {
            match self.layout_container(&id, arrivals, now, presenter, report, tracer) {
                Ok(nested) => {
                    for n in nested {
                        if let Some(c) = self.containers.get(&n) {
                            work.insert((c.depth(), n));
                        }
                    }
                    report.laid_out.push(id);
                }
                Err(err) => {
                    log::warn!("layout of container {id} failed: {err}");
                    tracer.container_failure(&ContainerFailureEvent {
                        frame_index: self.frame_index,
                        container: &id,
                        error: &err,
                    });
                    report.failures.push((id, err));
                }
            }
        }
    }

    /// Lays out one container and moves its children. Returns the nested
    /// containers whose size changed.
    fn layout_container(
        &mut self,
        id: &NodeId,
        arrivals: &Arrivals,
        now: HostTime,
        presenter: &mut dyn Presenter,
        report: &mut TickReport,
        tracer: &mut Tracer<'_>,
    ) -> Result<Vec<NodeId>, LayoutError> {
        let container = self
            .containers
            .get(id)
            .ok_or_else(|| LayoutError::UnknownContainer(id.clone()))?;
        let (result, size) = container.compute_layout()?;
        let measured = container.props().is_ok_and(|p| p.kind.needs_measurement());
        let showcase = container.props().ok().and_then(|p| p.showcase.clone());
        let first_render = !container.is_rendered();
        let index = self.arena.resolve(result, id, size, showcase.as_ref())?;
        let global = self.global_offset(id);

        let mut nested = Vec::new();
        let mut entering = false;
        let mut prev: Option<PresenceId> = None;
        for (child, target) in index.iter() {
            let p = if let Some(p) = self.presences.find_active(id, child) {
                self.presences.unlink(p);
                self.presences.insert_after(p, prev);
                self.retarget(p, target, now, presenter);
                p
            } else {
                entering = true;
                let p = self.presences.create(id, child);
                self.presences.insert_after(p, prev);
                let arrival = arrivals.get(child).map(|&anchor| anchor - global);
                if arrival.is_some() {
                    report.moved += 1;
                } else {
                    report.inserted += 1;
                }
                self.enter(p, target, size, first_render, arrival, presenter, tracer);
                p
            };
            prev = Some(p);
        }

        // Nested containers fill the slot hosting them, which is either the
        // container itself or a plain group node above it.
        let hosted: Vec<(NodeId, Point, Size)> = self
            .containers
            .values()
            .filter(|c| c.parent() == Some(id))
            .filter_map(|c| {
                let slot = index.get(c.hosting_slot().as_str())?;
                Some((c.id().clone(), slot.position, slot.size))
            })
            .collect();
        for (n, origin, slot_size) in hosted {
            if let Some(c) = self.containers.get_mut(&n) {
                c.set_origin(origin);
                if c.set_size(slot_size) {
                    nested.push(n);
                }
            }
        }

        if let Some(c) = self.containers.get_mut(id) {
            c.mark_rendered();
            if entering {
                c.set_updating(true);
            }
        }
        tracer.container_layout(&ContainerLayoutEvent {
            frame_index: self.frame_index,
            container: id,
            children: index.len(),
            measured,
        });
        Ok(nested)
    }

    /// Snaps a new presence to its starting pose and queues the animation to
    /// its layout position for the next tick.
    fn enter(
        &mut self,
        p: PresenceId,
        target: &ChildPosition,
        bounds: Size,
        first_render: bool,
        arrival: Option<Point>,
        presenter: &mut dyn Presenter,
        tracer: &mut Tracer<'_>,
    ) {
        let settled = Pose::settled(target);
        let entry = target.entry_transition;
        let (start, update) = match arrival {
            Some(at) => (
                settled.at(at),
                PoseUpdate::animate(
                    settled,
                    self.config.settle_duration,
                    Duration::ZERO,
                    TimingCurve::Ease,
                ),
            ),
            None if first_render => (
                Pose::with_transition(target, &entry, bounds),
                PoseUpdate::animate(
                    settled,
                    self.config.first_render_duration,
                    Duration::ZERO,
                    entry.curve_or(TimingCurve::Ease),
                ),
            ),
            None => (
                Pose::with_transition(target, &entry, bounds),
                PoseUpdate::animate(
                    settled,
                    self.config.settle_duration,
                    entry.delay_or_zero(),
                    entry.curve_or(TimingCurve::Ease),
                ),
            ),
        };

        presenter.apply(
            self.presences.container(p),
            self.presences.child(p),
            &PoseUpdate::snap(start),
        );
        self.presences.set_sent(p, start);
        let mut target = target.clone();
        target.root_offset = self.root_offsets.get(self.presences.child(p)).copied();
        self.presences.set_target(p, target);
        self.presences.set_pending(p, update);

        tracer.transition(&TransitionEvent {
            frame_index: self.frame_index,
            container: self.presences.container(p),
            child: self.presences.child(p),
            from: None,
            to: PresenceState::Entering,
        });
    }

    /// Moves an existing presence to a new layout position.
    fn retarget(
        &mut self,
        p: PresenceId,
        target: &ChildPosition,
        now: HostTime,
        presenter: &mut dyn Presenter,
    ) {
        let mut target = target.clone();
        target.root_offset = self.presences.target(p).and_then(|t| t.root_offset);
        let pose = Pose::settled(&target);
        self.presences.set_target(p, target);

        if let Some(mut update) = self.presences.take_pending(p) {
            update.pose = pose;
            self.presences.set_pending(p, update);
            return;
        }
        if self.presences.sent(p) == Some(&pose) {
            return;
        }
        let update = PoseUpdate::animate(
            pose,
            self.config.settle_duration,
            Duration::ZERO,
            TimingCurve::Ease,
        );
        presenter.apply(self.presences.container(p), self.presences.child(p), &update);
        self.presences.set_sent(p, pose);
        self.presences
            .set_settle_deadline(p, Some(now.saturating_add(update.total())));
    }

    fn set_state(&mut self, p: PresenceId, to: PresenceState, tracer: &mut Tracer<'_>) {
        let from = self.presences.set_state(p, to);
        tracer.transition(&TransitionEvent {
            frame_index: self.frame_index,
            container: self.presences.container(p),
            child: self.presences.child(p),
            from: Some(from),
            to,
        });
    }
}
