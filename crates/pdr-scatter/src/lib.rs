#![deny(missing_docs)]
#![doc = "Scatter plot reports for benchmarking PDR heuristic revisions."]

pub mod category;
/// Report options, scales and harness settings.
pub mod config;
pub mod normalize;
/// Grouping of runs into per-category coordinate lists.
pub mod partition;
pub mod render;
/// Report orchestration.
pub mod report;
/// Renderer-ready plot description.
pub mod spec;
/// Deterministic category styles.
pub mod style;

pub use category::{
    ByAttribute, ByOutcome, Category, CategorySpec, Classifier, PairClassifier, Uncategorized,
};
pub use config::{
    Attribute, HarnessSettings, OutputFormat, PlotSource, Scale, ScatterOptions, StyleOptions,
};
pub use normalize::{normalize, Normalized, LINEAR_HEADROOM, LOG_EPSILON};
pub use partition::{
    partition_comparison, partition_runs, relative_coordinates, CategoryMap, Coordinate,
};
pub use render::{writer_for, JsonWriter, PgfplotsWriter, PlotWriter, SvgWriter};
pub use report::ScatterPlotReport;
pub use spec::{AxisSpec, CategorySeries, PlotSpec, Point};
pub use style::{MarkerStyle, StylePalette};
