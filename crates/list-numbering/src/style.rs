//! Resolved style values handed over by the HTML walker.

use serde::{Deserialize, Serialize};

/// The unit of a CSS length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitMetric {
    /// `px`
    #[serde(rename = "px")]
    Pixel,
    /// `pt`
    #[serde(rename = "pt")]
    Point,
    /// `%`
    #[serde(rename = "%")]
    Percent,
    /// `em`
    #[serde(rename = "em")]
    Em,
    /// `in`
    #[serde(rename = "in")]
    Inch,
    /// `cm`
    #[serde(rename = "cm")]
    Centimeter,
    /// `mm`
    #[serde(rename = "mm")]
    Millimeter,
    /// `auto` or a missing unit.
    #[serde(rename = "auto")]
    Auto,
}

/// A resolved CSS length, e.g. the `margin-left` of a list item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Length {
    /// The numeric value.
    pub value: f32,
    /// The unit of the value.
    pub unit: UnitMetric,
}

impl Length {
    /// Creates a length in pixels.
    pub fn px(value: f32) -> Self {
        Self {
            value,
            unit: UnitMetric::Pixel,
        }
    }

    /// Whether this is a strictly positive length in pixels.
    pub fn is_positive_pixels(&self) -> bool {
        self.unit == UnitMetric::Pixel && self.value > 0.
    }
}
