// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use thiserror::Error;

use crate::id::NodeId;

/// A prop bag failed validation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PropsError {
    /// A prop has the wrong JSON type.
    #[error("prop `{key}` must be {expected}")]
    WrongType {
        /// Dotted path of the offending prop.
        key: String,
        /// Human-readable description of the accepted type.
        expected: &'static str,
    },
    /// A structured prop could not be decoded.
    #[error("prop `{key}` is malformed: {message}")]
    Malformed {
        /// Dotted path of the offending prop.
        key: String,
        /// Decoder message.
        message: String,
    },
    /// A numeric prop is outside its accepted range.
    #[error("prop `{key}` is out of range: {value}")]
    OutOfRange {
        /// Dotted path of the offending prop.
        key: String,
        /// The rejected value.
        value: f64,
    },
    /// The `layout` prop names no known algorithm.
    #[error("unknown layout `{0}`")]
    UnknownLayout(String),
}

/// Laying out one container failed.
///
/// Layout errors are contained to the container that raised them: the engine
/// logs them and moves on to the next container in the same tick.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LayoutError {
    /// No container is bound to the id.
    #[error("unknown container {0}")]
    UnknownContainer(NodeId),
    /// The container has no size yet.
    #[error("container {0} is not mounted")]
    NotMounted(NodeId),
    /// The container has a zero or negative extent.
    #[error("container {0} has zero size")]
    ZeroSized(NodeId),
    /// The box layout engine rejected the template.
    #[error("measurement failed: {0}")]
    Measurement(String),
    /// The container's props failed validation.
    #[error(transparent)]
    InvalidProps(#[from] PropsError),
}

impl From<taffy::TaffyError> for LayoutError {
    fn from(err: taffy::TaffyError) -> Self {
        Self::Measurement(err.to_string())
    }
}
