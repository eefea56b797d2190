// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visible child elements and their lifecycle.

mod id;
mod store;
mod traverse;

pub use id::{INVALID, PresenceId, PresenceState};
pub use store::PresenceStore;
pub use traverse::Siblings;
