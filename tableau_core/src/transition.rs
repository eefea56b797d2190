// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entry and exit transition descriptions.
//!
//! A [`Transition`] describes the pose a child animates *from* when it enters
//! a container, or *to* when it leaves. Every field is optional; an absent
//! field leaves the corresponding property at its settled value. Layout
//! algorithms declare transitions as static defaults per child (for example a
//! staggered entry delay), they are not authored per node.

use kurbo::{Size, Vec2};

use crate::time::Duration;

/// Easing curve applied to a pose animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TimingCurve {
    /// Constant speed.
    Linear,
    /// Decelerating curve used for entries and settles.
    #[default]
    Ease,
    /// Accelerating cubic.
    EaseIn,
    /// Decelerating cubic.
    EaseOut,
    /// Cubic that accelerates then decelerates.
    EaseInOut,
    /// Curve reserved for exits: accelerates away so the child clears the
    /// frame quickly.
    Exit,
}

impl TimingCurve {
    /// Parses a curve name as used in prop bags (`"linear"`, `"ease"`,
    /// `"ease-in"`, `"ease-out"`, `"ease-in-out"`, `"exit"`).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "linear" => Self::Linear,
            "ease" => Self::Ease,
            "ease-in" => Self::EaseIn,
            "ease-out" => Self::EaseOut,
            "ease-in-out" => Self::EaseInOut,
            "exit" => Self::Exit,
            _ => return None,
        })
    }

    /// Maps linear progress `t` in `[0, 1]` to eased progress.
    ///
    /// Inputs outside the unit interval are clamped.
    #[must_use]
    pub fn ease(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Ease | Self::EaseOut => 1.0 - (1.0 - t).powi(3),
            Self::EaseIn | Self::Exit => t * t * t,
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// How far a child is displaced at the start of an entry or the end of an
/// exit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransitionOffset {
    /// Absolute displacement in canvas pixels.
    Pixels(Vec2),
    /// Displacement as a fraction of the child's own size (`(0, 1)` is one
    /// child-height downwards).
    SelfRelative(Vec2),
    /// Displacement as a fraction of the parent container's size (`(0, 1)`
    /// pushes the child a full container-height down, off the frame).
    ContainerRelative(Vec2),
}

impl TransitionOffset {
    /// Resolves the offset to pixels.
    #[must_use]
    pub fn resolve(self, own: Size, container: Size) -> Vec2 {
        match self {
            Self::Pixels(v) => v,
            Self::SelfRelative(f) => Vec2::new(f.x * own.width, f.y * own.height),
            Self::ContainerRelative(f) => {
                Vec2::new(f.x * container.width, f.y * container.height)
            }
        }
    }
}

/// A partial pose used as the start of an entry or the end of an exit.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transition {
    /// Time to wait before the animation starts.
    pub delay: Option<Duration>,
    /// Displacement from the settled position.
    pub offset: Option<TransitionOffset>,
    /// Scale factor relative to the settled size, around the child's center.
    pub scale: Option<Vec2>,
    /// Opacity at the transition's far end.
    pub opacity: Option<f64>,
    /// Easing curve for the animation.
    pub timing_curve: Option<TimingCurve>,
}

impl Transition {
    /// A transition that changes nothing.
    pub const NONE: Self = Self {
        delay: None,
        offset: None,
        scale: None,
        opacity: None,
        timing_curve: None,
    };

    /// Fades between fully transparent and the settled opacity.
    #[must_use]
    pub const fn fade() -> Self {
        Self {
            opacity: Some(0.0),
            ..Self::NONE
        }
    }

    /// Sets the delay.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns the delay, or zero when unset.
    #[must_use]
    pub fn delay_or_zero(&self) -> Duration {
        self.delay.unwrap_or(Duration::ZERO)
    }

    /// Returns the curve, or `fallback` when unset.
    #[must_use]
    pub fn curve_or(&self, fallback: TimingCurve) -> TimingCurve {
        self.timing_curve.unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curves_hit_endpoints() {
        for curve in [
            TimingCurve::Linear,
            TimingCurve::Ease,
            TimingCurve::EaseIn,
            TimingCurve::EaseOut,
            TimingCurve::EaseInOut,
            TimingCurve::Exit,
        ] {
            assert!(curve.ease(0.0).abs() < 1e-9, "{curve:?} at 0");
            assert!((curve.ease(1.0) - 1.0).abs() < 1e-9, "{curve:?} at 1");
        }
        assert!((TimingCurve::EaseInOut.ease(0.5) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn ease_clamps_input() {
        assert_eq!(TimingCurve::Linear.ease(-1.0), 0.0);
        assert_eq!(TimingCurve::Linear.ease(2.0), 1.0);
    }

    #[test]
    fn parse_known_names() {
        assert_eq!(TimingCurve::parse("exit"), Some(TimingCurve::Exit));
        assert_eq!(TimingCurve::parse("ease-in-out"), Some(TimingCurve::EaseInOut));
        assert_eq!(TimingCurve::parse("bounce"), None);
    }

    #[test]
    fn offsets_resolve_against_the_right_size() {
        let own = Size::new(100.0, 50.0);
        let container = Size::new(1000.0, 500.0);
        assert_eq!(
            TransitionOffset::SelfRelative(Vec2::new(0.0, 1.0)).resolve(own, container),
            Vec2::new(0.0, 50.0)
        );
        assert_eq!(
            TransitionOffset::ContainerRelative(Vec2::new(0.0, 1.0)).resolve(own, container),
            Vec2::new(0.0, 500.0)
        );
        assert_eq!(
            TransitionOffset::Pixels(Vec2::new(3.0, 4.0)).resolve(own, container),
            Vec2::new(3.0, 4.0)
        );
    }
}
