// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use tableau_core::{NodeId, PropsError};
use thiserror::Error;

/// The remote layer store refused or failed a request.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The store answered and rejected the request.
    #[error("rejected by layer store: {0}")]
    Rejected(String),
    /// The request never reached the store.
    #[error("layer store unreachable: {0}")]
    Transport(String),
}

/// A tree mutation failed.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SyncError {
    /// No node has the id.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    /// A node with the id already exists.
    #[error("node {0} already exists")]
    DuplicateNode(NodeId),
    /// The mutation would make a node its own ancestor.
    #[error("cannot place {node} under {parent}: would create a cycle")]
    Cycle {
        /// The node being placed.
        node: NodeId,
        /// The requested parent.
        parent: NodeId,
    },
    /// The root cannot be removed, moved or swapped.
    #[error("the root node cannot be removed or moved")]
    RootImmutable,
    /// The id list is not a permutation of the parent's children.
    #[error("invalid reorder of the children of {0}")]
    InvalidReorder(NodeId),
    /// The node's props failed validation.
    #[error(transparent)]
    InvalidProps(#[from] PropsError),
    /// The optimistic change could not be persisted.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}
