// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Optimistic scene tree mutations backed by a remote layer store.
//!
//! Every mutation is validated, applied to the local [`SceneTree`] at once,
//! recorded as [`TreeChange`]s for the renderer, and then sent to the store
//! tagged with this client's connection id. Events the store pushes back
//! are merged with [`CompositorProject::apply_remote`]; events carrying our
//! own connection id are echoes of writes already applied and are dropped.

use tableau_core::NodeId;
use tableau_core::props::{ChildProps, LayoutProps, Props, declares_layout};
use tableau_core::trace::{EchoDroppedEvent, Tracer};
use uuid::Uuid;

use crate::change::TreeChange;
use crate::error::SyncError;
use crate::store::RemoteLayerStore;
use crate::tree::{SceneTree, merge_props};
use crate::wire::{Layer, LayerAction, LayerEvent, RequestMetadata};

/// What happens to an optimistic change the store rejects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RejectionPolicy {
    /// The local change stays; the caller gets the error.
    #[default]
    KeepLocal,
    /// The tree is restored to its state before the mutation and the
    /// mutation's pending changes are discarded.
    Revert,
}

/// Result of merging an inbound event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteOutcome {
    /// The event echoes one of our own writes and was dropped.
    Echo,
    /// The event belongs to another layout and was dropped.
    ForeignLayout,
    /// The event was merged.
    Applied {
        /// Changes the event caused, also queued for the renderer.
        changes: Vec<TreeChange>,
    },
}

/// A scene tree bound to one layout in a remote layer store.
pub struct CompositorProject<S> {
    tree: SceneTree,
    store: S,
    layout_id: String,
    connection_id: String,
    policy: RejectionPolicy,
    changes: Vec<TreeChange>,
}

impl<S> core::fmt::Debug for CompositorProject<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CompositorProject")
            .field("layout_id", &self.layout_id)
            .field("connection_id", &self.connection_id)
            .field("policy", &self.policy)
            .field("nodes", &self.tree.len())
            .field("pending_changes", &self.changes.len())
            .finish_non_exhaustive()
    }
}

impl<S: RemoteLayerStore> CompositorProject<S> {
    /// Creates a project with an empty root and a fresh connection id.
    #[must_use]
    pub fn new(layout_id: impl Into<String>, store: S) -> Self {
        Self::with_tree(layout_id, SceneTree::new(fresh_id(), Props::new()), store)
    }

    /// Creates a project over an existing tree, e.g. one loaded with
    /// [`SceneTree::from_data_nodes`].
    #[must_use]
    pub fn with_tree(layout_id: impl Into<String>, tree: SceneTree, store: S) -> Self {
        Self {
            tree,
            store,
            layout_id: layout_id.into(),
            connection_id: Uuid::new_v4().to_string(),
            policy: RejectionPolicy::default(),
            changes: Vec::new(),
        }
    }

    /// Replaces the connection id.
    #[must_use]
    pub fn with_connection_id(mut self, connection_id: impl Into<String>) -> Self {
        self.connection_id = connection_id.into();
        self
    }

    /// Replaces the rejection policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RejectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The local tree.
    #[must_use]
    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    /// Root id.
    #[must_use]
    pub fn root(&self) -> &NodeId {
        self.tree.root()
    }

    /// Layout this project edits.
    #[must_use]
    pub fn layout_id(&self) -> &str {
        &self.layout_id
    }

    /// This client's connection id.
    #[must_use]
    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    /// Current rejection policy.
    #[must_use]
    pub fn policy(&self) -> RejectionPolicy {
        self.policy
    }

    /// Sets the rejection policy.
    pub fn set_policy(&mut self, policy: RejectionPolicy) {
        self.policy = policy;
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The backing store, mutably.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Changes not yet drained by the renderer.
    #[must_use]
    pub fn pending_changes(&self) -> &[TreeChange] {
        &self.changes
    }

    /// Takes the pending changes.
    pub fn drain_changes(&mut self) -> Vec<TreeChange> {
        core::mem::take(&mut self.changes)
    }

    /// Creates a node under `parent` (the root if `None`) at `index`
    /// (clamped; `None` appends) and returns its generated id.
    pub fn insert(
        &mut self,
        props: Props,
        parent: Option<&NodeId>,
        index: Option<usize>,
    ) -> Result<NodeId, SyncError> {
        validate(&props)?;
        let parent = parent.unwrap_or(self.tree.root()).clone();
        let id = fresh_id();
        let checkpoint = self.checkpoint();
        self.tree.insert(id.clone(), props, &parent, index)?;
        self.changes.push(TreeChange::Inserted {
            id: id.clone(),
            parent: parent.clone(),
        });
        let actions = vec![
            LayerAction::CreateLayer {
                layer: self.layer(&id),
            },
            LayerAction::UpdateLayer {
                layer: self.layer(&parent),
            },
        ];
        self.send(actions, checkpoint)?;
        Ok(id)
    }

    /// Shallow-merges `patch` into the node's props; `null` deletes a key.
    pub fn update(&mut self, id: &NodeId, patch: &Props) -> Result<(), SyncError> {
        let mut merged = self
            .tree
            .props(id)
            .cloned()
            .ok_or_else(|| SyncError::UnknownNode(id.clone()))?;
        if !merge_props(&mut merged, patch) {
            return Ok(());
        }
        validate(&merged)?;
        let checkpoint = self.checkpoint();
        self.tree.replace_props(id, merged)?;
        self.changes.push(TreeChange::Updated { id: id.clone() });
        let actions = vec![LayerAction::UpdateLayer {
            layer: self.layer(id),
        }];
        self.send(actions, checkpoint)
    }

    /// Deletes the node and its subtree.
    pub fn remove(&mut self, id: &NodeId) -> Result<(), SyncError> {
        let checkpoint = self.checkpoint();
        let parent = self.tree.parent(id).cloned();
        let subtree = self.tree.remove(id)?;
        let mut actions: Vec<LayerAction> = subtree
            .iter()
            .map(|layer_id| LayerAction::DeleteLayer {
                layer_id: layer_id.clone(),
            })
            .collect();
        if let Some(parent) = &parent {
            actions.push(LayerAction::UpdateLayer {
                layer: self.layer(parent),
            });
        }
        self.changes.push(TreeChange::Removed {
            id: id.clone(),
            parent,
            subtree,
        });
        self.send(actions, checkpoint)
    }

    /// Moves the node under `parent` at `index` (clamped; `None` appends).
    ///
    /// Both the old and the new parent are written.
    pub fn move_node(
        &mut self,
        id: &NodeId,
        parent: &NodeId,
        index: Option<usize>,
    ) -> Result<(), SyncError> {
        let checkpoint = self.checkpoint();
        let previous = self.tree.move_node(id, parent, index)?;
        let mut actions = Vec::with_capacity(2);
        if let Some(previous) = previous.as_ref().filter(|p| *p != parent) {
            actions.push(LayerAction::UpdateLayer {
                layer: self.layer(previous),
            });
        }
        actions.push(LayerAction::UpdateLayer {
            layer: self.layer(parent),
        });
        self.changes.push(if previous.as_ref() == Some(parent) {
            TreeChange::ChildrenChanged {
                parent: parent.clone(),
            }
        } else {
            TreeChange::Moved {
                id: id.clone(),
                from: previous,
                to: parent.clone(),
            }
        });
        self.send(actions, checkpoint)
    }

    /// Exchanges the places of two nodes, possibly under different parents.
    pub fn swap(&mut self, a: &NodeId, b: &NodeId) -> Result<(), SyncError> {
        if a == b {
            return Ok(());
        }
        let checkpoint = self.checkpoint();
        let (a_parent, b_parent) = self.tree.swap(a, b)?;
        let mut actions = vec![LayerAction::UpdateLayer {
            layer: self.layer(&a_parent),
        }];
        if a_parent != b_parent {
            actions.push(LayerAction::UpdateLayer {
                layer: self.layer(&b_parent),
            });
        }
        self.changes.push(TreeChange::Swapped {
            a: a.clone(),
            b: b.clone(),
            a_parent,
            b_parent,
        });
        self.send(actions, checkpoint)
    }

    /// Reorders the children of `parent`; `ids` must be a permutation of
    /// them.
    pub fn reorder(&mut self, parent: &NodeId, ids: &[NodeId]) -> Result<(), SyncError> {
        let checkpoint = self.checkpoint();
        self.tree.reorder(parent, ids)?;
        self.changes.push(TreeChange::ChildrenChanged {
            parent: parent.clone(),
        });
        let actions = vec![LayerAction::UpdateLayer {
            layer: self.layer(parent),
        }];
        self.send(actions, checkpoint)
    }

    /// Merges an inbound store event.
    pub fn apply_remote(&mut self, event: &LayerEvent) -> RemoteOutcome {
        self.apply_remote_traced(event, &mut Tracer::none())
    }

    /// Like [`apply_remote`](Self::apply_remote), reporting dropped echoes
    /// to `tracer`.
    pub fn apply_remote_traced(
        &mut self,
        event: &LayerEvent,
        tracer: &mut Tracer<'_>,
    ) -> RemoteOutcome {
        if let Some(connection_id) = event
            .connection_id()
            .filter(|c| *c == self.connection_id)
        {
            log::debug!(
                "dropping echo of {} on layout {}",
                event.sub_type.as_str(),
                event.layout_id
            );
            tracer.echo_dropped(&EchoDroppedEvent {
                layout_id: &event.layout_id,
                connection_id,
                sub_type: event.sub_type.as_str(),
            });
            return RemoteOutcome::Echo;
        }
        if event.layout_id != self.layout_id {
            log::debug!(
                "dropping {} for foreign layout {}",
                event.sub_type.as_str(),
                event.layout_id
            );
            return RemoteOutcome::ForeignLayout;
        }
        let mark = self.changes.len();
        let mut dropped = Vec::new();
        for action in &event.actions {
            self.merge_action(action, &mut dropped);
        }
        self.prune(dropped);
        RemoteOutcome::Applied {
            changes: self.changes[mark..].to_vec(),
        }
    }

    /// Applies one action, collecting children its child list dropped.
    fn merge_action(&mut self, action: &LayerAction, dropped: &mut Vec<NodeId>) {
        match action {
            LayerAction::CreateLayer { layer } | LayerAction::UpdateLayer { layer } => {
                let Some(id) = &layer.id else {
                    log::debug!("ignoring remote layer without an id");
                    return;
                };
                if let Err(err) = validate(&layer.data) {
                    log::warn!("remote layer {id} has invalid props: {err}");
                }
                if self.tree.contains(id) {
                    if let Ok(true) = self.tree.replace_props(id, layer.data.clone()) {
                        self.changes.push(TreeChange::Updated { id: id.clone() });
                    }
                } else if self
                    .tree
                    .insert_unparented(id.clone(), layer.data.clone())
                    .is_err()
                {
                    return;
                }
                let before = self.tree.children(id).to_vec();
                let Ok(robbed) = self.tree.set_children(id, &layer.children) else {
                    return;
                };
                if self.tree.children(id) != before.as_slice() {
                    self.changes
                        .push(TreeChange::ChildrenChanged { parent: id.clone() });
                }
                dropped.extend(
                    before
                        .into_iter()
                        .filter(|c| self.tree.parent(c).is_none()),
                );
                self.changes.extend(
                    robbed
                        .into_iter()
                        .map(|parent| TreeChange::ChildrenChanged { parent }),
                );
            }
            LayerAction::DeleteLayer { layer_id } => {
                let parent = self.tree.parent(layer_id).cloned();
                match self.tree.remove(layer_id) {
                    Ok(subtree) => self.changes.push(TreeChange::Removed {
                        id: layer_id.clone(),
                        parent,
                        subtree,
                    }),
                    Err(err) => log::debug!("ignoring remote delete of {layer_id}: {err}"),
                }
            }
        }
    }

    /// Deletes the subtrees of dropped children no later action of the
    /// same event adopted.
    fn prune(&mut self, dropped: Vec<NodeId>) {
        for id in dropped {
            if !self.tree.contains(&id) || self.tree.parent(&id).is_some() {
                continue;
            }
            if let Ok(subtree) = self.tree.remove(&id) {
                log::debug!(
                    "pruning {id} and {} descendants dropped by remote update",
                    subtree.len() - 1
                );
                self.changes.push(TreeChange::Removed {
                    id,
                    parent: None,
                    subtree,
                });
            }
        }
    }

    fn metadata(&self) -> RequestMetadata {
        RequestMetadata {
            connection_id: self.connection_id.clone(),
            layout_id: self.layout_id.clone(),
        }
    }

    fn layer(&self, id: &NodeId) -> Layer {
        Layer::new(
            id.clone(),
            self.tree.props(id).cloned().unwrap_or_default(),
            self.tree.children(id).to_vec(),
        )
    }

    fn checkpoint(&self) -> Option<(SceneTree, usize)> {
        (self.policy == RejectionPolicy::Revert).then(|| (self.tree.clone(), self.changes.len()))
    }

    fn send(
        &mut self,
        actions: Vec<LayerAction>,
        checkpoint: Option<(SceneTree, usize)>,
    ) -> Result<(), SyncError> {
        let metadata = self.metadata();
        let layout_id = self.layout_id.as_str();
        let result = match actions.as_slice() {
            [LayerAction::CreateLayer { layer }] => {
                self.store.create_layer(layout_id, layer, &metadata)
            }
            [LayerAction::UpdateLayer { layer }] => {
                self.store.update_layer(layout_id, layer, &metadata)
            }
            [LayerAction::DeleteLayer { layer_id }] => {
                self.store.delete_layer(layout_id, layer_id, &metadata)
            }
            actions => self.store.batch(layout_id, actions, &metadata),
        };
        if let Err(err) = result {
            if let Some((tree, mark)) = checkpoint {
                log::debug!("reverting rejected change on layout {}: {err}", self.layout_id);
                self.tree = tree;
                self.changes.truncate(mark);
            }
            return Err(err.into());
        }
        Ok(())
    }
}

fn fresh_id() -> NodeId {
    NodeId::new(Uuid::new_v4().to_string())
}

/// Checks that a prop bag decodes: as a container if it selects a layout,
/// and always as a child.
pub fn validate(props: &Props) -> Result<(), SyncError> {
    if declares_layout(props) {
        LayoutProps::from_props(props)?;
    }
    ChildProps::from_props(props)?;
    Ok(())
}
