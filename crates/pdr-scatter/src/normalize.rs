//! Scale-aware cleanup of partitioned coordinates.
//!
//! Two passes run in order. On a log scale, counter zeros become missing and
//! non-positive measurements are nudged by [`LOG_EPSILON`]; anything still
//! non-positive aborts the report. Missing components are then replaced by a
//! shared sentinel placed beyond all real data, or the point is dropped when
//! missing values are not shown.

use indexmap::IndexMap;
use pdr_core::errors::{ErrorInfo, LabError};
use pdr_core::record::{Number, NumberKind};

use crate::category::Category;
use crate::config::Scale;
use crate::partition::{CategoryMap, Coordinate};
use crate::spec::Point;

/// Offset added to non-positive measurements on a log axis.
pub const LOG_EPSILON: f64 = 0.00001;

/// Headroom factor for the missing value sentinel on a linear axis.
pub const LINEAR_HEADROOM: f64 = 1.1;

/// Cleaned points plus the sentinel used for missing components.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Non-empty categories in partition order.
    pub categories: IndexMap<Category, Vec<Point>>,
    /// Shared sentinel; `None` when no component had to be imputed.
    pub missing_value: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn pick(&self, coord: &Coordinate) -> Option<Number> {
        match self {
            Axis::X => coord.x,
            Axis::Y => coord.y,
        }
    }
}

/// Runs both passes and rejects an empty result.
pub fn normalize(
    categories: CategoryMap,
    scale: Scale,
    show_missing: bool,
) -> Result<Normalized, LabError> {
    let categories = if scale == Scale::Log {
        handle_non_positive(categories)?
    } else {
        categories
    };
    let missing_value = shared_missing_value(&categories, scale, show_missing);

    let mut cleaned = IndexMap::new();
    for (category, coords) in categories {
        let points: Vec<Point> = coords
            .iter()
            .filter_map(|coord| fill_missing(coord, missing_value))
            .collect();
        if !points.is_empty() {
            cleaned.insert(category, points);
        }
    }
    if cleaned.is_empty() {
        return Err(LabError::Data(
            ErrorInfo::new("scatter.no_points", "plot contains no points")
                .with_context("scale", scale.as_str())
                .with_context("show_missing", show_missing.to_string()),
        ));
    }
    Ok(Normalized {
        categories: cleaned,
        missing_value,
    })
}

/// Prepares coordinates for a logarithmic axis.
///
/// A counter at exactly zero becomes missing. A non-positive measurement is
/// shifted by [`LOG_EPSILON`]. Negative counters are not shifted and abort
/// like any other value that stays non-positive.
pub fn handle_non_positive(categories: CategoryMap) -> Result<CategoryMap, LabError> {
    let mut adjusted = CategoryMap::new();
    for (category, coords) in categories {
        let mut kept = Vec::with_capacity(coords.len());
        for coord in coords {
            let coord = Coordinate::new(nudge(coord.x), nudge(coord.y));
            let x_bad = coord.x.map_or(false, |n| n.is_non_positive());
            let y_bad = coord.y.map_or(false, |n| n.is_non_positive());
            if x_bad || y_bad {
                return Err(LabError::Data(
                    ErrorInfo::new(
                        "scatter.log_non_positive",
                        "logarithmic axes can only show positive values",
                    )
                    .with_context("category", category.to_string())
                    .with_context("x", describe(coord.x))
                    .with_context("y", describe(coord.y))
                    .with_hint("use a symlog or linear scale instead"),
                ));
            }
            kept.push(coord);
        }
        adjusted.insert(category, kept);
    }
    Ok(adjusted)
}

fn nudge(component: Option<Number>) -> Option<Number> {
    match component {
        Some(number) if number.is_counter_zero() => None,
        Some(number) if number.kind == NumberKind::Measured && number.is_non_positive() => {
            Some(Number::measured(number.value + LOG_EPSILON))
        }
        other => other,
    }
}

fn describe(component: Option<Number>) -> String {
    component.map_or_else(|| "missing".to_string(), |n| n.value.to_string())
}

fn axis_missing_value(
    categories: &CategoryMap,
    axis: Axis,
    scale: Scale,
    show_missing: bool,
) -> Option<f64> {
    if !show_missing {
        return None;
    }
    let mut total = 0usize;
    let mut max_value: Option<f64> = None;
    let mut real = 0usize;
    for coord in categories.values().flatten() {
        total += 1;
        if let Some(number) = axis.pick(coord) {
            real += 1;
            max_value = Some(max_value.map_or(number.value, |max| max.max(number.value)));
        }
    }
    if real == total {
        return None;
    }
    let max_value = match max_value {
        Some(value) => value,
        None => return Some(1.0),
    };
    Some(match scale {
        Scale::Linear => max_value * LINEAR_HEADROOM,
        Scale::Log | Scale::Symlog => power_of_ten_above(max_value),
    })
}

/// Combines the per-axis sentinels so missing points on either axis share one
/// off-chart diagonal position.
pub fn shared_missing_value(
    categories: &CategoryMap,
    scale: Scale,
    show_missing: bool,
) -> Option<f64> {
    let x = axis_missing_value(categories, Axis::X, scale, show_missing);
    let y = axis_missing_value(categories, Axis::Y, scale, show_missing);
    match (x, y) {
        (Some(x), Some(y)) => Some(x.max(y)),
        (x, None) => x,
        (None, y) => y,
    }
}

/// Smallest power of ten strictly greater than `value`; 1 for non-positive input.
///
/// A maximum that is already a power of ten maps to the next decade
/// (`1000` gives `10000`). Values too large for the next decade saturate at
/// `f64::MAX`.
pub fn power_of_ten_above(value: f64) -> f64 {
    if value <= 0.0 || !value.is_finite() {
        return 1.0;
    }
    let mut power = 10f64.powf(value.log10().floor() + 1.0);
    if !power.is_finite() {
        return f64::MAX;
    }
    while power / 10.0 > value {
        power /= 10.0;
    }
    while power <= value {
        power *= 10.0;
    }
    if power.is_finite() {
        power
    } else {
        f64::MAX
    }
}

fn fill_missing(coord: &Coordinate, missing_value: Option<f64>) -> Option<Point> {
    let x = coord.x.map(|n| n.value).or(missing_value)?;
    let y = coord.y.map(|n| n.value).or(missing_value)?;
    Some(Point { x, y })
}
