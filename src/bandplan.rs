//! Named frequency segments drawn as an overlay on the plot.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geom::Rgba;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub name: String,
    /// Key into the [`BandColorTable`].
    pub category: String,
    pub start: f64,
    pub end: f64,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BandPlan {
    pub name: String,
    /// Ordered by start frequency.
    pub bands: Vec<Band>,
}

impl BandPlan {
    /// Bands overlapping `[lower, upper]`.
    pub fn visible(&self, lower: f64, upper: f64) -> impl Iterator<Item = &Band> {
        self.bands.iter().filter(move |band| {
            let below = band.start < lower && band.end < lower;
            let above = band.start > upper && band.end > upper;
            !below && !above
        })
    }
}

/// Where the band plan strip sits on the plot.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BandPlanPosition {
    #[default]
    Bottom,
    Top,
}

/// Edge color and fill color for one band category.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandColor {
    pub edge: Rgba,
    pub fill: Rgba,
}

impl BandColor {
    /// Opaque edges with a translucent fill of the same color.
    pub fn from_color(color: Rgba) -> Self {
        Self {
            edge: color.with_alpha(255),
            fill: color.with_alpha(100),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BandColorTable {
    colors: HashMap<String, BandColor>,
}

impl BandColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: impl Into<String>, color: BandColor) {
        self.colors.insert(category.into(), color);
    }

    pub fn find(&self, category: &str) -> Option<BandColor> {
        self.colors.get(category).copied()
    }
}

impl FromIterator<(String, BandColor)> for BandColorTable {
    fn from_iter<I: IntoIterator<Item = (String, BandColor)>>(iter: I) -> Self {
        Self {
            colors: iter.into_iter().collect(),
        }
    }
}
