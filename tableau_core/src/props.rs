// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed layout and child props.
//!
//! Scene nodes carry untyped JSON prop bags. A node that declares a `layout`
//! prop is a layout container; its bag is decoded here into a
//! [`LayoutProps`] whose [`LayoutKind`] variant holds the per-algorithm
//! settings with their defaults already applied. Decoding is the validation
//! boundary: layout algorithms only ever see well-formed values.
//!
//! The recognised keys are:
//!
//! - `layout`: one of `"Free"`, `"Layered"`, `"Column"`, `"Row"`, `"Grid"`,
//!   `"Presentation"`. Missing or `null` selects `Free`.
//! - `layoutProps`: an object with camelCase fields (`justify`, `align`,
//!   `margin`, `dimensions`, `cover`, `barPosition`, `barWidth`, `useGrid`,
//!   `presentationId`).
//! - `showcase`: id of the child that should fill the container.
//!
//! Children of a `Free` container are positioned by their own `position`,
//! `size` and `opacity` props, decoded into [`ChildProps`].

use kurbo::{Point, Size};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::PropsError;
use crate::id::NodeId;

/// Prop bag type shared with the scene tree.
pub type Props = Map<String, Value>;

/// Key selecting the layout algorithm.
pub const LAYOUT_KEY: &str = "layout";
/// Key holding algorithm settings.
pub const LAYOUT_PROPS_KEY: &str = "layoutProps";
/// Key naming the showcased child.
pub const SHOWCASE_KEY: &str = "showcase";

/// Returns whether a prop bag declares a layout algorithm.
#[must_use]
pub fn declares_layout(props: &Props) -> bool {
    props.contains_key(LAYOUT_KEY)
}

/// Main-axis distribution of children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Justify {
    /// Pack at the start.
    Start,
    /// Pack in the middle.
    #[default]
    Center,
    /// Pack at the end.
    End,
    /// First and last flush with the edges, equal gaps between.
    SpaceBetween,
    /// Equal space around each child.
    SpaceAround,
    /// Equal space between children and edges.
    SpaceEvenly,
}

/// Cross-axis placement of children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Align {
    /// Flush with the start edge.
    Start,
    /// Centered.
    #[default]
    Center,
    /// Flush with the end edge.
    End,
    /// Fill the cross axis.
    Stretch,
}

/// Per-side margins. Unset sides take a default derived from the container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarginProps {
    /// Top margin.
    pub top: Option<f64>,
    /// Right margin.
    pub right: Option<f64>,
    /// Bottom margin.
    pub bottom: Option<f64>,
    /// Left margin.
    pub left: Option<f64>,
    /// Gap between adjacent children.
    pub between: Option<f64>,
}

impl MarginProps {
    /// Zero on every side. Used by `cover` layouts.
    pub const ZERO: Self = Self::uniform(0.0);

    /// The same margin on every side and between children.
    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self {
            top: Some(value),
            right: Some(value),
            bottom: Some(value),
            left: Some(value),
            between: Some(value),
        }
    }

    /// Fills unset sides with `default`.
    #[must_use]
    pub fn resolve(&self, default: f64) -> Margins {
        Margins {
            top: self.top.unwrap_or(default),
            right: self.right.unwrap_or(default),
            bottom: self.bottom.unwrap_or(default),
            left: self.left.unwrap_or(default),
            between: self.between.unwrap_or(default),
        }
    }

    fn validate(&self, key: &str) -> Result<(), PropsError> {
        for (side, value) in [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
            ("between", self.between),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(PropsError::OutOfRange {
                        key: format!("{key}.{side}"),
                        value: v,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Fully resolved margins.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margins {
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
    /// Gap between adjacent children.
    pub between: f64,
}

/// Width-to-height ratio of laid out items, as `x : y`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct AspectRatio {
    /// Width component.
    pub x: f64,
    /// Height component.
    pub y: f64,
}

impl AspectRatio {
    /// 16:9, the default for video tiles.
    pub const WIDESCREEN: Self = Self { x: 16.0, y: 9.0 };

    /// Returns `x / y`.
    #[must_use]
    pub fn ratio(self) -> f64 {
        self.x / self.y
    }

    fn validate(self, key: &str) -> Result<(), PropsError> {
        for (axis, v) in [("x", self.x), ("y", self.y)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(PropsError::OutOfRange {
                    key: format!("{key}.{axis}"),
                    value: v,
                });
            }
        }
        Ok(())
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::WIDESCREEN
    }
}

/// Settings for `Row` and `Column`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LinearProps {
    /// Main-axis distribution.
    pub justify: Justify,
    /// Cross-axis placement.
    pub align: Align,
    /// Margins; unset sides default to `min(cross / 6, 12)`.
    pub margin: MarginProps,
    /// Item aspect ratio.
    pub dimensions: AspectRatio,
    /// Zero margins, items fill the cross axis and share the main axis.
    pub cover: bool,
    /// Upper bound on one item's main extent, as a fraction of the inner
    /// main extent. Set by `Grid` to keep rows balanced.
    pub max_item_fraction: Option<f64>,
}

/// Settings for `Grid`. Forwarded to each row.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GridProps {
    /// Main-axis distribution inside each row.
    pub justify: Justify,
    /// Cross-axis placement inside each row.
    pub align: Align,
    /// Row margins.
    pub margin: MarginProps,
    /// Item aspect ratio.
    pub dimensions: AspectRatio,
    /// Cover mode for each row.
    pub cover: bool,
}

impl GridProps {
    /// Row settings with the given item cap.
    #[must_use]
    pub fn row(&self, max_item_fraction: Option<f64>) -> LinearProps {
        LinearProps {
            justify: self.justify,
            align: self.align,
            margin: self.margin,
            dimensions: self.dimensions,
            cover: self.cover,
            max_item_fraction,
        }
    }
}

/// Where the presentation bar sits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarPosition {
    /// A vertical strip on the right.
    #[default]
    Side,
    /// A horizontal strip along the bottom.
    Bottom,
}

/// Settings for `Presentation`.
#[derive(Clone, Debug, PartialEq)]
pub struct PresentationProps {
    /// Bar placement.
    pub bar_position: BarPosition,
    /// Bar extent as a fraction of the container, in `(0, 1)`.
    pub bar_width: f64,
    /// Lay the bar out as a grid rather than a single row or column.
    pub use_grid: bool,
    /// The featured child. Defaults to the first child.
    pub presentation_id: Option<NodeId>,
    /// Cover mode for the bar.
    pub cover: bool,
    /// Bar margins.
    pub margin: MarginProps,
    /// Bar item aspect ratio.
    pub dimensions: AspectRatio,
}

impl PresentationProps {
    /// Default bar extent.
    pub const DEFAULT_BAR_WIDTH: f64 = 0.2;
}

impl Default for PresentationProps {
    fn default() -> Self {
        Self {
            bar_position: BarPosition::Side,
            bar_width: Self::DEFAULT_BAR_WIDTH,
            use_grid: false,
            presentation_id: None,
            cover: false,
            margin: MarginProps::default(),
            dimensions: AspectRatio::WIDESCREEN,
        }
    }
}

/// Which algorithm a container runs, with its settings.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LayoutKind {
    /// Children position themselves.
    #[default]
    Free,
    /// Every child fills the container, stacked in document order.
    Layered,
    /// Children packed top to bottom.
    Column(LinearProps),
    /// Children packed left to right.
    Row(LinearProps),
    /// Children arranged in balanced rows.
    Grid(GridProps),
    /// One featured child plus a bar of the rest.
    Presentation(PresentationProps),
}

impl LayoutKind {
    /// The name used in prop bags.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Layered => "Layered",
            Self::Column(_) => "Column",
            Self::Row(_) => "Row",
            Self::Grid(_) => "Grid",
            Self::Presentation(_) => "Presentation",
        }
    }

    /// Returns `true` if the algorithm emits a template that needs measuring.
    #[must_use]
    pub fn needs_measurement(&self) -> bool {
        !matches!(self, Self::Free | Self::Layered)
    }
}

/// Decoded container props.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutProps {
    /// Algorithm and settings.
    pub kind: LayoutKind,
    /// Child forced to fill the container.
    pub showcase: Option<NodeId>,
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawLayoutProps {
    justify: Justify,
    align: Align,
    margin: Option<RawMargin>,
    dimensions: Option<AspectRatio>,
    cover: bool,
    bar_position: BarPosition,
    bar_width: Option<f64>,
    use_grid: bool,
    presentation_id: Option<NodeId>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMargin {
    Uniform(f64),
    Sides(MarginProps),
}

impl LayoutProps {
    /// Decodes and validates a container's prop bag.
    pub fn from_props(props: &Props) -> Result<Self, PropsError> {
        let name = match props.get(LAYOUT_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.as_str()),
            Some(_) => {
                return Err(PropsError::WrongType {
                    key: LAYOUT_KEY.into(),
                    expected: "a string",
                });
            }
        };

        let raw = match props.get(LAYOUT_PROPS_KEY) {
            None | Some(Value::Null) => RawLayoutProps::default(),
            Some(v @ Value::Object(_)) => {
                RawLayoutProps::deserialize(v).map_err(|e| PropsError::Malformed {
                    key: LAYOUT_PROPS_KEY.into(),
                    message: e.to_string(),
                })?
            }
            Some(_) => {
                return Err(PropsError::WrongType {
                    key: LAYOUT_PROPS_KEY.into(),
                    expected: "an object",
                });
            }
        };

        let margin = match raw.margin {
            None => MarginProps::default(),
            Some(RawMargin::Uniform(v)) => MarginProps::uniform(v),
            Some(RawMargin::Sides(m)) => m,
        };
        margin.validate("layoutProps.margin")?;
        let dimensions = raw.dimensions.unwrap_or_default();
        dimensions.validate("layoutProps.dimensions")?;

        let linear = LinearProps {
            justify: raw.justify,
            align: raw.align,
            margin,
            dimensions,
            cover: raw.cover,
            max_item_fraction: None,
        };

        let kind = match name {
            None | Some("Free") => LayoutKind::Free,
            Some("Layered") => LayoutKind::Layered,
            Some("Column") => LayoutKind::Column(linear),
            Some("Row") => LayoutKind::Row(linear),
            Some("Grid") => LayoutKind::Grid(GridProps {
                justify: raw.justify,
                align: raw.align,
                margin,
                dimensions,
                cover: raw.cover,
            }),
            Some("Presentation") => {
                let bar_width = raw.bar_width.unwrap_or(PresentationProps::DEFAULT_BAR_WIDTH);
                if !(bar_width > 0.0 && bar_width < 1.0) {
                    return Err(PropsError::OutOfRange {
                        key: "layoutProps.barWidth".into(),
                        value: bar_width,
                    });
                }
                LayoutKind::Presentation(PresentationProps {
                    bar_position: raw.bar_position,
                    bar_width,
                    use_grid: raw.use_grid,
                    presentation_id: raw.presentation_id,
                    cover: raw.cover,
                    margin,
                    dimensions,
                })
            }
            Some(other) => return Err(PropsError::UnknownLayout(other.to_owned())),
        };

        let showcase = match props.get(SHOWCASE_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(NodeId::new(s.as_str())),
            Some(_) => {
                return Err(PropsError::WrongType {
                    key: SHOWCASE_KEY.into(),
                    expected: "a string",
                });
            }
        };

        Ok(Self { kind, showcase })
    }
}

#[derive(Clone, Copy, Deserialize)]
struct Xy {
    x: f64,
    y: f64,
}

/// Per-child props read by the `Free` layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChildProps {
    /// Explicit top-left corner.
    pub position: Option<Point>,
    /// Explicit size.
    pub size: Option<Size>,
    /// Explicit opacity.
    pub opacity: Option<f64>,
}

impl ChildProps {
    /// Decodes the geometry props of a child's prop bag.
    ///
    /// Keys other than `position`, `size` and `opacity` are ignored.
    pub fn from_props(props: &Props) -> Result<Self, PropsError> {
        let xy = |key: &str| -> Result<Option<Xy>, PropsError> {
            match props.get(key) {
                None | Some(Value::Null) => Ok(None),
                Some(v) => Xy::deserialize(v)
                    .map(Some)
                    .map_err(|e| PropsError::Malformed {
                        key: key.into(),
                        message: e.to_string(),
                    }),
            }
        };

        let position = xy("position")?.map(|p| Point::new(p.x, p.y));
        let size = match xy("size")? {
            Some(s) if s.x < 0.0 || s.y < 0.0 => {
                return Err(PropsError::OutOfRange {
                    key: "size".into(),
                    value: s.x.min(s.y),
                });
            }
            other => other.map(|s| Size::new(s.x, s.y)),
        };
        let opacity = match props.get("opacity") {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) if (0.0..=1.0).contains(&v) => Some(v),
                Some(v) => {
                    return Err(PropsError::OutOfRange {
                        key: "opacity".into(),
                        value: v,
                    });
                }
                None => None,
            },
            Some(_) => {
                return Err(PropsError::WrongType {
                    key: "opacity".into(),
                    expected: "a number",
                });
            }
        };

        Ok(Self {
            position,
            size,
            opacity,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn bag(value: Value) -> Props {
        match value {
            Value::Object(map) => map,
            _ => panic!("test props must be an object"),
        }
    }

    #[test]
    fn missing_layout_is_free() {
        let props = LayoutProps::from_props(&Props::new()).unwrap();
        assert_eq!(props.kind, LayoutKind::Free);
        assert_eq!(props.showcase, None);
    }

    #[test]
    fn row_defaults() {
        let props = LayoutProps::from_props(&bag(json!({ "layout": "Row" }))).unwrap();
        let LayoutKind::Row(linear) = props.kind else {
            panic!("expected Row, got {:?}", props.kind);
        };
        assert_eq!(linear.justify, Justify::Center);
        assert_eq!(linear.align, Align::Center);
        assert_eq!(linear.dimensions, AspectRatio::WIDESCREEN);
        assert_eq!(linear.margin, MarginProps::default());
        assert!(!linear.cover);
    }

    #[test]
    fn camel_case_fields_decode() {
        let props = LayoutProps::from_props(&bag(json!({
            "layout": "Presentation",
            "layoutProps": {
                "barPosition": "bottom",
                "barWidth": 0.25,
                "useGrid": true,
                "presentationId": "screen",
                "margin": { "top": 4, "between": 8 },
                "justify": "space-between"
            },
            "showcase": "cam-2"
        })))
        .unwrap();
        let LayoutKind::Presentation(p) = props.kind else {
            panic!("expected Presentation");
        };
        assert_eq!(p.bar_position, BarPosition::Bottom);
        assert_eq!(p.bar_width, 0.25);
        assert!(p.use_grid);
        assert_eq!(p.presentation_id, Some(NodeId::from("screen")));
        assert_eq!(p.margin.top, Some(4.0));
        assert_eq!(p.margin.between, Some(8.0));
        assert_eq!(p.margin.left, None);
        assert_eq!(props.showcase, Some(NodeId::from("cam-2")));
    }

    #[test]
    fn uniform_margin_number() {
        let props = LayoutProps::from_props(&bag(json!({
            "layout": "Column",
            "layoutProps": { "margin": 6 }
        })))
        .unwrap();
        let LayoutKind::Column(linear) = props.kind else {
            panic!("expected Column");
        };
        assert_eq!(linear.margin, MarginProps::uniform(6.0));
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            LayoutProps::from_props(&bag(json!({ "layout": "Mosaic" }))),
            Err(PropsError::UnknownLayout("Mosaic".into()))
        );
        assert!(matches!(
            LayoutProps::from_props(&bag(json!({ "layout": "grid" }))),
            Err(PropsError::UnknownLayout(_))
        ));
        assert!(matches!(
            LayoutProps::from_props(&bag(json!({
                "layout": "Presentation",
                "layoutProps": { "barWidth": 1.5 }
            }))),
            Err(PropsError::OutOfRange { .. })
        ));
        assert!(matches!(
            LayoutProps::from_props(&bag(json!({
                "layout": "Row",
                "layoutProps": { "dimensions": { "x": 0, "y": 9 } }
            }))),
            Err(PropsError::OutOfRange { .. })
        ));
        assert!(matches!(
            LayoutProps::from_props(&bag(json!({ "layout": 3 }))),
            Err(PropsError::WrongType { .. })
        ));
        assert!(matches!(
            LayoutProps::from_props(&bag(json!({
                "layout": "Row",
                "layoutProps": { "justify": "sideways" }
            }))),
            Err(PropsError::Malformed { .. })
        ));
    }

    #[test]
    fn child_props_decode() {
        let child = ChildProps::from_props(&bag(json!({
            "position": { "x": 10, "y": 20 },
            "size": { "x": 300, "y": 200 },
            "opacity": 0.5,
            "name": "ignored"
        })))
        .unwrap();
        assert_eq!(child.position, Some(Point::new(10.0, 20.0)));
        assert_eq!(child.size, Some(Size::new(300.0, 200.0)));
        assert_eq!(child.opacity, Some(0.5));

        assert!(matches!(
            ChildProps::from_props(&bag(json!({ "opacity": 2 }))),
            Err(PropsError::OutOfRange { .. })
        ));
        assert_eq!(
            ChildProps::from_props(&Props::new()).unwrap(),
            ChildProps::default()
        );
    }
}
