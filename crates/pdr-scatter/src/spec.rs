use std::collections::BTreeMap;

use pdr_core::errors::LabError;
use pdr_core::hash::stable_hash_string;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::config::{Scale, StyleOptions};
use crate::style::MarkerStyle;

/// Cleaned, plottable point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X value.
    pub x: f64,
    /// Y value.
    pub y: f64,
}

/// Points and style of one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySeries {
    /// Category label.
    pub category: Category,
    /// Non-empty list of points.
    pub points: Vec<Point>,
    /// Marker style assigned to the category.
    pub style: MarkerStyle,
}

/// Axis description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    /// Attribute (or algorithm) providing the values.
    pub source: String,
    /// Label printed next to the axis.
    pub label: String,
    /// Position of missing values on this axis.
    pub upper: Option<f64>,
}

/// Renderer-ready description of a scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSpec {
    /// Plot title, possibly empty.
    pub title: String,
    /// Shared axis scale.
    pub scale: Scale,
    /// Horizontal axis.
    pub x_axis: AxisSpec,
    /// Vertical axis.
    pub y_axis: AxisSpec,
    /// Series in partition order.
    pub series: Vec<CategorySeries>,
    /// Figure overrides.
    pub style: StyleOptions,
}

impl PlotSpec {
    /// Iterates over categories in partition order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.series.iter().map(|series| &series.category)
    }

    /// Points of `category`, if present.
    pub fn points(&self, category: &Category) -> Option<&[Point]> {
        self.series
            .iter()
            .find(|series| &series.category == category)
            .map(|series| series.points.as_slice())
    }

    /// Category to style, in sorted label order.
    pub fn styles(&self) -> BTreeMap<&Category, &MarkerStyle> {
        self.series
            .iter()
            .map(|series| (&series.category, &series.style))
            .collect()
    }

    /// Total number of points over all categories.
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|series| series.points.len()).sum()
    }

    /// True when a legend is worth drawing.
    pub fn has_multiple_categories(&self) -> bool {
        self.categories().any(Category::is_named)
    }

    /// Bounding box of all points as `(min_x, max_x, min_y, max_y)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let mut bounds = (
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
        );
        for point in self.series.iter().flat_map(|series| series.points.iter()) {
            bounds.0 = bounds.0.min(point.x);
            bounds.1 = bounds.1.max(point.x);
            bounds.2 = bounds.2.min(point.y);
            bounds.3 = bounds.3.max(point.y);
        }
        bounds
    }

    /// Stable hash of the canonical JSON form.
    pub fn fingerprint(&self) -> Result<String, LabError> {
        stable_hash_string(self)
    }
}
