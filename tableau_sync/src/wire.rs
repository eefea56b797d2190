// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Remote layer store schema.
//!
//! Field names follow the store's JSON: `requestMetadata`, `connectionId`,
//! `layoutId`, and `EVENT_SUB_TYPE_*` event sub-types.

use serde::{Deserialize, Serialize};
use tableau_core::NodeId;
use tableau_core::props::Props;

/// Channel that carries layer events.
pub const LAYER_CHANNEL: &str = "layer";

/// Layer type sent for scene nodes.
pub const DEFAULT_LAYER_TYPE: &str = "layer";

fn default_layer_type() -> String {
    DEFAULT_LAYER_TYPE.to_owned()
}

fn default_channel() -> String {
    LAYER_CHANNEL.to_owned()
}

/// Identifies the writer of a request; echoed back on the resulting events.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMetadata {
    /// The issuing client connection.
    pub connection_id: String,
    /// The layout the request targets.
    pub layout_id: String,
}

/// The store's representation of one scene node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Node id. Always set for layers this crate sends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
    /// Layer type.
    #[serde(rename = "type", default = "default_layer_type")]
    pub layer_type: String,
    /// The node's props.
    #[serde(default)]
    pub data: Props,
    /// Child ids in document order.
    #[serde(default)]
    pub children: Vec<NodeId>,
}

impl Layer {
    /// A layer of the default type.
    #[must_use]
    pub fn new(id: NodeId, data: Props, children: Vec<NodeId>) -> Self {
        Self {
            id: Some(id),
            layer_type: default_layer_type(),
            data,
            children,
        }
    }
}

/// One write against the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum LayerAction {
    /// Create a layer.
    CreateLayer {
        /// The new layer.
        layer: Layer,
    },
    /// Replace a layer's data and children.
    UpdateLayer {
        /// The updated layer.
        layer: Layer,
    },
    /// Delete a layer.
    #[serde(rename_all = "camelCase")]
    DeleteLayer {
        /// The deleted layer's id.
        layer_id: NodeId,
    },
}

impl LayerAction {
    /// The event sub-type the store reports for this action.
    #[must_use]
    pub fn sub_type(&self) -> EventSubType {
        match self {
            Self::CreateLayer { .. } => EventSubType::Create,
            Self::UpdateLayer { .. } => EventSubType::Update,
            Self::DeleteLayer { .. } => EventSubType::Delete,
        }
    }
}

/// Kind of an inbound layer event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventSubType {
    /// A layer was created.
    #[serde(rename = "EVENT_SUB_TYPE_CREATE")]
    Create,
    /// A layer was updated.
    #[serde(rename = "EVENT_SUB_TYPE_UPDATE")]
    Update,
    /// A layer was deleted.
    #[serde(rename = "EVENT_SUB_TYPE_DELETE")]
    Delete,
    /// Several actions were applied together.
    #[serde(rename = "EVENT_SUB_TYPE_BATCH")]
    Batch,
}

impl EventSubType {
    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "EVENT_SUB_TYPE_CREATE",
            Self::Update => "EVENT_SUB_TYPE_UPDATE",
            Self::Delete => "EVENT_SUB_TYPE_DELETE",
            Self::Batch => "EVENT_SUB_TYPE_BATCH",
        }
    }
}

/// An event pushed by the store on the [`LAYER_CHANNEL`].
///
/// Single-action events carry exactly one action; batch events carry all of
/// the batch's actions in order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerEvent {
    /// Channel name.
    #[serde(default = "default_channel")]
    pub channel: String,
    /// Event kind.
    pub sub_type: EventSubType,
    /// Layout the event belongs to.
    pub layout_id: String,
    /// Metadata of the request that caused the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_metadata: Option<RequestMetadata>,
    /// Applied actions.
    #[serde(default)]
    pub actions: Vec<LayerAction>,
}

impl LayerEvent {
    /// An event for one action.
    #[must_use]
    pub fn single(
        layout_id: impl Into<String>,
        action: LayerAction,
        request_metadata: Option<RequestMetadata>,
    ) -> Self {
        Self {
            channel: default_channel(),
            sub_type: action.sub_type(),
            layout_id: layout_id.into(),
            request_metadata,
            actions: vec![action],
        }
    }

    /// An event for a batch of actions.
    #[must_use]
    pub fn batch(
        layout_id: impl Into<String>,
        actions: Vec<LayerAction>,
        request_metadata: Option<RequestMetadata>,
    ) -> Self {
        Self {
            channel: default_channel(),
            sub_type: EventSubType::Batch,
            layout_id: layout_id.into(),
            request_metadata,
            actions,
        }
    }

    /// Connection that issued the request, if known.
    #[must_use]
    pub fn connection_id(&self) -> Option<&str> {
        self.request_metadata
            .as_ref()
            .map(|m| m.connection_id.as_str())
    }
}
