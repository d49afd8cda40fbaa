use std::path::{Path, PathBuf};

use pdr_core::errors::{ErrorInfo, LabError};
use pdr_core::runs::RunSet;

use crate::category::{Classifier, PairClassifier};
use crate::config::{HarnessSettings, OutputFormat, PlotSource, Scale, ScatterOptions, StyleOptions};
use crate::normalize::normalize;
use crate::partition::{partition_comparison, partition_runs, relative_coordinates, CategoryMap};
use crate::render::writer_for;
use crate::spec::{AxisSpec, CategorySeries, PlotSpec};
use crate::style::StylePalette;

enum ReportClassifier {
    Single(Box<dyn Classifier>),
    Pair(Box<dyn PairClassifier>),
}

/// Scatter plot of two attributes, or of one attribute across two algorithms.
///
/// Configuration is validated on construction; data problems surface from
/// [`ScatterPlotReport::build`] and abort the report.
pub struct ScatterPlotReport {
    options: ScatterOptions,
    scale: Scale,
    format: OutputFormat,
    style: StyleOptions,
    classifier: ReportClassifier,
    palette: StylePalette,
    relative: bool,
}

impl std::fmt::Debug for ScatterPlotReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScatterPlotReport")
            .field("source", &self.options.source)
            .field("scale", &self.scale)
            .field("format", &self.format)
            .field("relative", &self.relative)
            .finish_non_exhaustive()
    }
}

impl ScatterPlotReport {
    /// Validates `options` and resolves defaults from `settings`.
    pub fn new(options: ScatterOptions, settings: &HarnessSettings) -> Result<Self, LabError> {
        options.source.validate()?;
        let scale = options.resolve_scale()?;
        let format = options.format.unwrap_or_else(|| settings.default_format());
        let relative = options.relative.unwrap_or(settings.relative);
        let style = options
            .style
            .clone()
            .unwrap_or_else(|| settings.default_style());
        for key in style.extra.keys() {
            tracing::warn!(key = %key, "style option is ignored");
        }
        let classifier = match &options.source {
            PlotSource::Attributes { .. } => ReportClassifier::Single(options.category.classifier()?),
            PlotSource::Comparison { attributes, .. } => {
                ReportClassifier::Pair(options.category.pair_classifier(&attributes[0].name))
            }
        };
        Ok(Self {
            scale,
            format,
            style,
            classifier,
            palette: StylePalette::standard()?,
            relative,
            options,
        })
    }

    /// Replaces the configured classifier of an attribute plot.
    pub fn with_classifier(mut self, classifier: impl Classifier + 'static) -> Result<Self, LabError> {
        match self.options.source {
            PlotSource::Attributes { .. } => {
                self.classifier = ReportClassifier::Single(Box::new(classifier));
                Ok(self)
            }
            PlotSource::Comparison { .. } => Err(classifier_mismatch("comparison")),
        }
    }

    /// Replaces the configured classifier of a comparison plot.
    pub fn with_pair_classifier(
        mut self,
        classifier: impl PairClassifier + 'static,
    ) -> Result<Self, LabError> {
        match self.options.source {
            PlotSource::Comparison { .. } => {
                self.classifier = ReportClassifier::Pair(Box::new(classifier));
                Ok(self)
            }
            PlotSource::Attributes { .. } => Err(classifier_mismatch("attribute")),
        }
    }

    /// Replaces the style palette.
    pub fn with_palette(mut self, palette: StylePalette) -> Self {
        self.palette = palette;
        self
    }

    /// Resolved axis scale.
    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Whether Y is plotted relative to X.
    pub fn is_relative(&self) -> bool {
        self.relative
    }

    /// Resolved output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn partition(&self, runs: &RunSet) -> Result<CategoryMap, LabError> {
        let show_missing = self.options.show_missing;
        match (&self.options.source, &self.classifier) {
            (PlotSource::Attributes { attributes }, ReportClassifier::Single(classifier)) => {
                partition_runs(
                    runs,
                    &attributes[0].name,
                    &attributes[1].name,
                    classifier.as_ref(),
                    show_missing,
                )
            }
            (
                PlotSource::Comparison {
                    attributes,
                    algorithms,
                },
                ReportClassifier::Pair(classifier),
            ) => partition_comparison(
                runs,
                &attributes[0].name,
                &algorithms[0],
                &algorithms[1],
                classifier.as_ref(),
                show_missing,
            ),
            _ => Err(classifier_mismatch("this")),
        }
    }

    fn axis_sources(&self) -> (String, String) {
        match &self.options.source {
            PlotSource::Attributes { attributes } => {
                (attributes[0].name.clone(), attributes[1].name.clone())
            }
            PlotSource::Comparison { algorithms, .. } => {
                (algorithms[0].clone(), algorithms[1].clone())
            }
        }
    }

    /// Reduces `runs` to a plot spec.
    pub fn build(&self, runs: &RunSet) -> Result<PlotSpec, LabError> {
        let runs = runs.filtered(&self.options.filters);
        let mut categories = self.partition(&runs)?;
        if self.relative {
            categories = relative_coordinates(categories, self.options.show_missing);
        }
        let normalized = normalize(categories, self.scale, self.options.show_missing)?;
        let styles = self.palette.assign(normalized.categories.keys());
        let series = normalized
            .categories
            .into_iter()
            .map(|(category, points)| {
                let style = styles[&category].clone();
                CategorySeries {
                    category,
                    points,
                    style,
                }
            })
            .collect();

        let (x_source, mut y_source) = self.axis_sources();
        if self.relative {
            y_source = format!("{y_source} / {x_source}");
        }
        let label = |configured: &Option<String>, source: &str| match configured {
            Some(label) if !label.is_empty() => label.clone(),
            _ => source.to_string(),
        };
        let spec = PlotSpec {
            title: self.options.title.clone().unwrap_or_default(),
            scale: self.scale,
            x_axis: AxisSpec {
                label: label(&self.options.xlabel, &x_source),
                source: x_source,
                upper: normalized.missing_value,
            },
            y_axis: AxisSpec {
                label: label(&self.options.ylabel, &y_source),
                source: y_source,
                upper: normalized.missing_value,
            },
            series,
            style: self.style.clone(),
        };
        tracing::debug!(
            categories = spec.series.len(),
            points = spec.point_count(),
            "built scatter plot spec"
        );
        Ok(spec)
    }

    /// Builds the plot spec and hands it to the writer for the configured format.
    pub fn write(&self, runs: &RunSet, outfile: &Path) -> Result<PathBuf, LabError> {
        let spec = self.build(runs)?;
        writer_for(self.format).write(&spec, outfile)
    }
}

fn classifier_mismatch(kind: &str) -> LabError {
    LabError::Config(
        ErrorInfo::new(
            "scatter.classifier_kind",
            "classifier does not match the plot source",
        )
        .with_context("plot", kind),
    )
}
