// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine timing configuration.

use crate::time::Duration;

/// Durations the engine uses when it animates children.
///
/// Per-child entry delays are not configured here; they come from the
/// transition each layout algorithm declares (see
/// [`ENTRY_BASE_DELAY`](crate::layout::ENTRY_BASE_DELAY)).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Length of entry, settle and exit animations.
    pub settle_duration: Duration,
    /// Length of the entry animation on a container's very first layout.
    pub first_render_duration: Duration,
    /// Extra time after an exit's delay and duration before it is forced to
    /// complete.
    pub exit_timeout_slack: Duration,
}

impl EngineConfig {
    /// The standard broadcast timings.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            settle_duration: Duration::from_millis(300),
            first_render_duration: Duration::ZERO,
            exit_timeout_slack: Duration::from_millis(600),
        }
    }

    /// No animation at all. Exits still wait for their slack.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            settle_duration: Duration::ZERO,
            first_render_duration: Duration::ZERO,
            exit_timeout_slack: Duration::from_millis(600),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_timings() {
        let config = EngineConfig::default();
        assert_eq!(config.settle_duration.as_millis(), 300);
        assert!(config.first_render_duration.is_zero());
        assert_eq!(config.exit_timeout_slack.as_millis(), 600);
    }

    #[test]
    fn instant_keeps_exit_slack() {
        let config = EngineConfig::instant();
        assert!(config.settle_duration.is_zero());
        assert_eq!(config.exit_timeout_slack, EngineConfig::standard().exit_timeout_slack);
    }
}
