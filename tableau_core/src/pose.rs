// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visual poses sent to presenters.
//!
//! A [`Pose`] is everything a presenter needs to place one child element:
//! position, size, opacity, scale, corner radius and stacking order. The
//! engine never interpolates poses itself; it hands presenters a target pose
//! plus a [`PoseUpdate`] timing envelope and lets the platform animate.
//! [`Pose::sample`] exists for hosts that animate on the CPU.

use kurbo::{Point, Size, Vec2};

use crate::geometry::ChildPosition;
use crate::time::Duration;
use crate::transition::{TimingCurve, Transition};

/// The visual state of one child element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Top-left corner in container coordinates.
    pub position: Point,
    /// Layout size, before scale is applied.
    pub size: Size,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Scale around the element's center.
    pub scale: Vec2,
    /// Corner radius.
    pub border_radius: f64,
    /// Stacking order.
    pub z_index: i32,
}

impl Pose {
    /// Identity scale.
    pub const UNIT_SCALE: Vec2 = Vec2::new(1.0, 1.0);

    /// The settled pose for a computed child position.
    #[must_use]
    pub fn settled(cp: &ChildPosition) -> Self {
        Self {
            position: cp.position,
            size: cp.size,
            opacity: cp.opacity,
            scale: Self::UNIT_SCALE,
            border_radius: cp.border_radius,
            z_index: cp.z_index,
        }
    }

    /// The settled pose with `transition` applied on top.
    ///
    /// Used both for the starting pose of an entry and the final pose of an
    /// exit. Offsets are added to the settled position; scale and opacity
    /// replace the settled values when present.
    #[must_use]
    pub fn with_transition(cp: &ChildPosition, transition: &Transition, container: Size) -> Self {
        let mut pose = Self::settled(cp);
        if let Some(offset) = transition.offset {
            pose.position += offset.resolve(cp.size, container);
        }
        if let Some(scale) = transition.scale {
            pose.scale = scale;
        }
        if let Some(opacity) = transition.opacity {
            pose.opacity = opacity;
        }
        pose
    }

    /// Returns the pose moved so its top-left corner sits at `position`.
    #[must_use]
    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Linear interpolation between two poses.
    ///
    /// Stacking order jumps to `to` immediately so that an element moving
    /// behind its siblings does so for the whole animation.
    #[must_use]
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self {
            position: self.position.lerp(to.position, t),
            size: Size::new(
                mix(self.size.width, to.size.width),
                mix(self.size.height, to.size.height),
            ),
            opacity: mix(self.opacity, to.opacity),
            scale: self.scale.lerp(to.scale, t),
            border_radius: mix(self.border_radius, to.border_radius),
            z_index: to.z_index,
        }
    }

    /// Samples an animation from `from` to `to` at linear `progress`, shaped
    /// by `curve`.
    #[must_use]
    pub fn sample(from: &Self, to: &Self, progress: f64, curve: TimingCurve) -> Self {
        from.lerp(to, curve.ease(progress))
    }
}

/// A target pose plus the timing a presenter should use to reach it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoseUpdate {
    /// Pose at the end of the animation.
    pub pose: Pose,
    /// Animation length. Zero means snap.
    pub duration: Duration,
    /// Time to wait before starting.
    pub delay: Duration,
    /// Easing curve.
    pub curve: TimingCurve,
}

impl PoseUpdate {
    /// An instant jump to `pose`.
    #[must_use]
    pub const fn snap(pose: Pose) -> Self {
        Self {
            pose,
            duration: Duration::ZERO,
            delay: Duration::ZERO,
            curve: TimingCurve::Linear,
        }
    }

    /// An animated move to `pose`.
    #[must_use]
    pub const fn animate(pose: Pose, duration: Duration, delay: Duration, curve: TimingCurve) -> Self {
        Self {
            pose,
            duration,
            delay,
            curve,
        }
    }

    /// Returns `true` if the presenter should jump rather than animate.
    #[must_use]
    pub const fn is_snap(&self) -> bool {
        self.duration.is_zero() && self.delay.is_zero()
    }

    /// Delay plus duration.
    #[must_use]
    pub const fn total(&self) -> Duration {
        self.delay.saturating_add(self.duration)
    }
}
