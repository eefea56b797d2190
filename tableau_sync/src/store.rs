// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The remote layer store contract and an in-memory implementation.

use std::collections::BTreeMap;

use tableau_core::NodeId;

use crate::error::RemoteError;
use crate::wire::{Layer, LayerAction, LayerEvent, RequestMetadata};

/// Authoritative persistence for the scene tree.
///
/// Every request carries the issuing connection's [`RequestMetadata`]; the
/// store echoes it on the events it broadcasts so the issuer can recognize
/// its own writes.
pub trait RemoteLayerStore {
    /// Creates a layer.
    fn create_layer(
        &mut self,
        layout_id: &str,
        layer: &Layer,
        metadata: &RequestMetadata,
    ) -> Result<(), RemoteError>;

    /// Replaces a layer's data and children.
    fn update_layer(
        &mut self,
        layout_id: &str,
        layer: &Layer,
        metadata: &RequestMetadata,
    ) -> Result<(), RemoteError>;

    /// Deletes a layer.
    fn delete_layer(
        &mut self,
        layout_id: &str,
        id: &NodeId,
        metadata: &RequestMetadata,
    ) -> Result<(), RemoteError>;

    /// Applies several actions as one request.
    fn batch(
        &mut self,
        layout_id: &str,
        actions: &[LayerAction],
        metadata: &RequestMetadata,
    ) -> Result<(), RemoteError>;
}

/// One request accepted by a [`MemoryLayerStore`].
#[derive(Clone, Debug, PartialEq)]
pub struct StoreRequest {
    /// Target layout.
    pub layout_id: String,
    /// The request's actions; a single entry unless `batched`.
    pub actions: Vec<LayerAction>,
    /// Whether the request was a batch.
    pub batched: bool,
    /// Issuer metadata.
    pub metadata: RequestMetadata,
}

impl StoreRequest {
    /// The event the store broadcasts for this request.
    #[must_use]
    pub fn to_event(&self) -> LayerEvent {
        let metadata = Some(self.metadata.clone());
        match self.actions.as_slice() {
            [action] if !self.batched => {
                LayerEvent::single(self.layout_id.clone(), action.clone(), metadata)
            }
            actions => LayerEvent::batch(self.layout_id.clone(), actions.to_vec(), metadata),
        }
    }
}

/// A [`RemoteLayerStore`] that keeps layers in memory and records every
/// accepted request.
///
/// Can be switched into rejecting mode to exercise failure paths.
#[derive(Clone, Debug, Default)]
pub struct MemoryLayerStore {
    layers: BTreeMap<NodeId, Layer>,
    requests: Vec<StoreRequest>,
    rejection: Option<RemoteError>,
}

impl MemoryLayerStore {
    /// Creates an empty, accepting store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following request fail with `error`.
    pub fn reject_with(&mut self, error: RemoteError) {
        self.rejection = Some(error);
    }

    /// Accepts requests again.
    pub fn accept(&mut self) {
        self.rejection = None;
    }

    /// Accepted requests in arrival order.
    #[must_use]
    pub fn requests(&self) -> &[StoreRequest] {
        &self.requests
    }

    /// Takes the recorded requests.
    pub fn take_requests(&mut self) -> Vec<StoreRequest> {
        core::mem::take(&mut self.requests)
    }

    /// Broadcast events for the recorded requests.
    #[must_use]
    pub fn events(&self) -> Vec<LayerEvent> {
        self.requests.iter().map(StoreRequest::to_event).collect()
    }

    /// A stored layer.
    #[must_use]
    pub fn layer(&self, id: &NodeId) -> Option<&Layer> {
        self.layers.get(id)
    }

    /// Number of stored layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if no layer is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    fn accept_request(
        &mut self,
        layout_id: &str,
        actions: Vec<LayerAction>,
        batched: bool,
        metadata: &RequestMetadata,
    ) -> Result<(), RemoteError> {
        if let Some(err) = &self.rejection {
            return Err(err.clone());
        }
        for action in &actions {
            match action {
                LayerAction::CreateLayer { layer } | LayerAction::UpdateLayer { layer } => {
                    if let Some(id) = &layer.id {
                        self.layers.insert(id.clone(), layer.clone());
                    }
                }
                LayerAction::DeleteLayer { layer_id } => {
                    self.layers.remove(layer_id);
                }
            }
        }
        self.requests.push(StoreRequest {
            layout_id: layout_id.to_owned(),
            actions,
            batched,
            metadata: metadata.clone(),
        });
        Ok(())
    }
}

impl RemoteLayerStore for MemoryLayerStore {
    fn create_layer(
        &mut self,
        layout_id: &str,
        layer: &Layer,
        metadata: &RequestMetadata,
    ) -> Result<(), RemoteError> {
        let action = LayerAction::CreateLayer {
            layer: layer.clone(),
        };
        self.accept_request(layout_id, vec![action], false, metadata)
    }

    fn update_layer(
        &mut self,
        layout_id: &str,
        layer: &Layer,
        metadata: &RequestMetadata,
    ) -> Result<(), RemoteError> {
        let action = LayerAction::UpdateLayer {
            layer: layer.clone(),
        };
        self.accept_request(layout_id, vec![action], false, metadata)
    }

    fn delete_layer(
        &mut self,
        layout_id: &str,
        id: &NodeId,
        metadata: &RequestMetadata,
    ) -> Result<(), RemoteError> {
        let action = LayerAction::DeleteLayer {
            layer_id: id.clone(),
        };
        self.accept_request(layout_id, vec![action], false, metadata)
    }

    fn batch(
        &mut self,
        layout_id: &str,
        actions: &[LayerAction],
        metadata: &RequestMetadata,
    ) -> Result<(), RemoteError> {
        self.accept_request(layout_id, actions.to_vec(), true, metadata)
    }
}
