// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binding a project's scene tree to a layout engine.
//!
//! [`render_project`] mounts every container of the tree on a fresh
//! [`Engine`]. Afterwards, [`RenderHandle::sync`] turns the project's pending
//! [`TreeChange`]s into host messages for the containers they affect, and the
//! host drives [`RenderHandle::tick`] from its frame callback.

use std::collections::HashSet;

use kurbo::Size;
use tableau_core::NodeId;
use tableau_core::backend::Presenter;
use tableau_core::config::EngineConfig;
use tableau_core::context::RenderContext;
use tableau_core::engine::Engine;
use tableau_core::message::{HostChild, HostMessage};
use tableau_core::time::HostTime;
use tableau_core::timing::TickOutcome;
use tableau_core::trace::Tracer;

use crate::change::TreeChange;
use crate::project::CompositorProject;
use crate::store::RemoteLayerStore;
use crate::tree::SceneTree;

/// A live rendering of one project.
///
/// Owns the engine and the [`RenderContext`] for as long as the project is
/// shown. Dropping the handle without [`dispose`](Self::dispose) leaves the
/// host's elements in place.
#[derive(Debug)]
pub struct RenderHandle {
    engine: Engine,
    ctx: RenderContext,
}

/// Mounts `project` with the standard timing configuration.
///
/// Pending changes are discarded: the initial mount covers them.
pub fn render_project<S: RemoteLayerStore>(
    project: &mut CompositorProject<S>,
    ctx: RenderContext,
) -> RenderHandle {
    render_project_with(project, ctx, EngineConfig::default())
}

/// Mounts `project` with an explicit timing configuration.
pub fn render_project_with<S: RemoteLayerStore>(
    project: &mut CompositorProject<S>,
    ctx: RenderContext,
    config: EngineConfig,
) -> RenderHandle {
    project.drain_changes();
    let mut handle = RenderHandle {
        engine: Engine::new(config),
        ctx,
    };
    let tree = project.tree();
    for (id, parent) in tree.containers() {
        let msg = handle.attach_message(tree, id, parent);
        handle.engine.handle(msg);
    }
    handle
}

impl RenderHandle {
    /// The layout engine.
    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Scale and drag state.
    #[must_use]
    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    /// Scale and drag state, mutably.
    pub fn context_mut(&mut self) -> &mut RenderContext {
        &mut self.ctx
    }

    /// Refits the canvas into a new viewport.
    pub fn resize(&mut self, viewport: Size) {
        self.ctx.resize(viewport);
    }

    /// Forwards a host notification, e.g. a finished exit transition.
    pub fn handle(&mut self, msg: HostMessage) {
        self.engine.handle(msg);
    }

    /// Drains the project's changes and notifies every affected container.
    ///
    /// Containers that left the tree or stopped selecting a layout are
    /// detached; new or reparented ones are attached. For moves and swaps
    /// both the old and the new parent receive their child list. Returns the
    /// number of messages sent to the engine.
    pub fn sync<S: RemoteLayerStore>(&mut self, project: &mut CompositorProject<S>) -> usize {
        let changes = project.drain_changes();
        if changes.is_empty() {
            return 0;
        }
        let tree = project.tree();
        let wanted = tree.containers();

        let mut messages = Vec::new();
        let wanted_ids: HashSet<&NodeId> = wanted.iter().map(|(id, _)| id).collect();
        let mut gone: Vec<NodeId> = self
            .engine
            .containers()
            .map(|c| c.id().clone())
            .filter(|id| !wanted_ids.contains(id))
            .collect();
        gone.sort();
        messages.extend(
            gone.into_iter()
                .map(|id| HostMessage::ContainerDetached { id }),
        );

        let mut touched: HashSet<&NodeId> = HashSet::new();
        let mut updated: HashSet<&NodeId> = HashSet::new();
        for change in &changes {
            touched.extend(change.affected_parents());
            if let TreeChange::Updated { id } = change {
                updated.insert(id);
                touched.extend(tree.parent(id));
            }
        }

        for (id, parent) in &wanted {
            let Some(container) = self.engine.container(id) else {
                messages.push(self.attach_message(tree, id.clone(), parent.clone()));
                continue;
            };
            let slot = tree.hosting_slot(id).filter(|s| *s != id);
            if container.parent() != parent.as_ref() || container.slot() != slot {
                messages.push(self.attach_message(tree, id.clone(), parent.clone()));
                continue;
            }
            if updated.contains(id) {
                messages.push(HostMessage::AttributesChanged {
                    container: id.clone(),
                    props: tree.props(id).cloned().unwrap_or_default(),
                });
            }
            if touched.contains(id) {
                messages.push(HostMessage::ChildrenChanged {
                    container: id.clone(),
                    children: host_children(tree, id),
                });
            }
        }

        let sent = messages.len();
        log::trace!("sync sent {sent} messages for {} changes", changes.len());
        for msg in messages {
            self.engine.handle(msg);
        }
        sent
    }

    /// Runs one frame.
    pub fn tick(&mut self, presenter: &mut dyn Presenter, now: HostTime) -> TickOutcome {
        self.engine.tick(&self.ctx, presenter, now)
    }

    /// Runs one frame, reporting to `tracer`.
    pub fn tick_traced(
        &mut self,
        presenter: &mut dyn Presenter,
        now: HostTime,
        tracer: &mut Tracer<'_>,
    ) -> TickOutcome {
        self.engine.tick_traced(&self.ctx, presenter, now, tracer)
    }

    /// Detaches every child from the host and releases every container.
    pub fn dispose(mut self, presenter: &mut dyn Presenter) {
        self.ctx.set_dragging(false);
        self.engine.detach_all(presenter);
    }

    fn attach_message(&self, tree: &SceneTree, id: NodeId, parent: Option<NodeId>) -> HostMessage {
        // Nested containers take their size from the slot in their parent.
        let size = (id == *tree.root()).then(|| self.ctx.canvas());
        let slot = tree.hosting_slot(&id).filter(|s| **s != id).cloned();
        HostMessage::ContainerAttached {
            props: tree.props(&id).cloned().unwrap_or_default(),
            children: host_children(tree, &id),
            id,
            parent,
            slot,
            size,
        }
    }
}

fn host_children(tree: &SceneTree, id: &NodeId) -> Vec<HostChild> {
    tree.children(id)
        .iter()
        .map(|c| HostChild::new(c.clone(), tree.props(c).cloned().unwrap_or_default()))
        .collect()
}
