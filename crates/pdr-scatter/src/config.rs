use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use pdr_core::errors::{ErrorInfo, LabError};
use serde::{Deserialize, Serialize};

use pdr_core::filters::RunFilter;

use crate::category::CategorySpec;

/// Axis transform shared by both axes of a scatter plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    /// Linear axes.
    Linear,
    /// Logarithmic axes; non-positive values are rejected.
    Log,
    /// Symmetric logarithmic axes.
    Symlog,
}

impl Scale {
    /// Names accepted by [`Scale::from_str`].
    pub const NAMES: [&'static str; 3] = ["linear", "log", "symlog"];

    /// Returns the lowercase name of the scale.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scale::Linear => "linear",
            Scale::Log => "log",
            Scale::Symlog => "symlog",
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scale {
    type Err = LabError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "linear" => Ok(Scale::Linear),
            "log" => Ok(Scale::Log),
            "symlog" => Ok(Scale::Symlog),
            other => Err(LabError::Config(
                ErrorInfo::new("scatter.scale_unknown", "scale is not supported")
                    .with_context("scale", other)
                    .with_context("supported", Scale::NAMES.join(", ")),
            )),
        }
    }
}

/// Output target of a report. The file suffix always matches the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Standalone SVG image.
    #[default]
    Svg,
    /// pgfplots axis for inclusion in LaTeX documents.
    Tex,
    /// Canonical JSON dump of the plot spec.
    Json,
}

impl OutputFormat {
    /// File suffix, without the leading dot.
    pub fn suffix(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Tex => "tex",
            OutputFormat::Json => "json",
        }
    }
}

/// Attribute selected as a coordinate source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AttributeRepr", into = "AttributeRepr")]
pub struct Attribute {
    /// Attribute name in the run records.
    pub name: String,
    /// Preferred scale, used when a report does not set one.
    pub scale: Option<Scale>,
}

impl Attribute {
    /// Attribute without a preferred scale.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scale: None,
        }
    }

    /// Attribute that prefers the given scale.
    pub fn with_scale(name: impl Into<String>, scale: Scale) -> Self {
        Self {
            name: name.into(),
            scale: Some(scale),
        }
    }
}

impl From<&str> for Attribute {
    fn from(name: &str) -> Self {
        Attribute::new(name)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum AttributeRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scale: Option<Scale>,
    },
}

impl From<AttributeRepr> for Attribute {
    fn from(repr: AttributeRepr) -> Self {
        match repr {
            AttributeRepr::Name(name) => Attribute::new(name),
            AttributeRepr::Full { name, scale } => Attribute { name, scale },
        }
    }
}

impl From<Attribute> for AttributeRepr {
    fn from(attribute: Attribute) -> Self {
        match attribute.scale {
            None => AttributeRepr::Name(attribute.name),
            Some(scale) => AttributeRepr::Full {
                name: attribute.name,
                scale: Some(scale),
            },
        }
    }
}

/// Figure overrides forwarded to the writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleOptions {
    /// Figure size in inches.
    #[serde(rename = "figure.figsize", default = "StyleOptions::default_figsize")]
    pub figsize: [f64; 2],
    /// Raster resolution in dots per inch.
    #[serde(rename = "savefig.dpi", default = "StyleOptions::default_dpi")]
    pub dpi: u32,
    /// Keys the writers do not understand; reported and ignored.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl StyleOptions {
    fn default_figsize() -> [f64; 2] {
        [8.0, 8.0]
    }

    fn default_dpi() -> u32 {
        100
    }

    /// Compact figure used when the output ends up in a LaTeX document.
    pub fn compact() -> Self {
        Self {
            figsize: [3.0, 3.0],
            dpi: 200,
            extra: BTreeMap::new(),
        }
    }
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            figsize: Self::default_figsize(),
            dpi: Self::default_dpi(),
            extra: BTreeMap::new(),
        }
    }
}

/// Harness wide switches threaded explicitly into every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HarnessSettings {
    /// Produce LaTeX output by default.
    #[serde(default)]
    pub tex: bool,
    /// Plot the Y value relative to X by default.
    #[serde(default)]
    pub relative: bool,
}

impl HarnessSettings {
    /// Format used when a report does not pick one.
    pub fn default_format(&self) -> OutputFormat {
        if self.tex {
            OutputFormat::Tex
        } else {
            OutputFormat::Svg
        }
    }

    /// Style used when a report does not override it.
    pub fn default_style(&self) -> StyleOptions {
        if self.tex {
            StyleOptions::compact()
        } else {
            StyleOptions::default()
        }
    }
}

/// Where the two coordinates of each point come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PlotSource {
    /// One point per run: two attributes of the same run.
    Attributes {
        /// Exactly two attributes, X first.
        attributes: Vec<Attribute>,
    },
    /// One point per problem: one attribute of two algorithms.
    Comparison {
        /// Exactly one attribute.
        attributes: Vec<Attribute>,
        /// Exactly two algorithms, X first.
        algorithms: Vec<String>,
    },
}

impl PlotSource {
    /// Attribute report over `x` and `y`.
    pub fn attributes(x: impl Into<Attribute>, y: impl Into<Attribute>) -> Self {
        PlotSource::Attributes {
            attributes: vec![x.into(), y.into()],
        }
    }

    /// Comparison report of `attribute` between two algorithms.
    pub fn comparison(
        attribute: impl Into<Attribute>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        PlotSource::Comparison {
            attributes: vec![attribute.into()],
            algorithms: vec![first.into(), second.into()],
        }
    }

    /// Checks attribute and algorithm counts.
    pub fn validate(&self) -> Result<(), LabError> {
        let (attributes, expected) = match self {
            PlotSource::Attributes { attributes } => (attributes, 2),
            PlotSource::Comparison {
                attributes,
                algorithms,
            } => {
                if algorithms.len() != 2 {
                    return Err(LabError::Config(
                        ErrorInfo::new(
                            "scatter.algorithm_count",
                            "comparison plots need exactly two algorithms",
                        )
                        .with_context("found", algorithms.len().to_string()),
                    ));
                }
                (attributes, 1)
            }
        };
        if attributes.len() != expected {
            return Err(LabError::Config(
                ErrorInfo::new(
                    "scatter.attribute_count",
                    "scatter plot received the wrong number of attributes",
                )
                .with_context("expected", expected.to_string())
                .with_context("found", attributes.len().to_string()),
            ));
        }
        Ok(())
    }

    /// First configured attribute; its declared scale is the fallback scale.
    pub fn primary_attribute(&self) -> Option<&Attribute> {
        match self {
            PlotSource::Attributes { attributes } | PlotSource::Comparison { attributes, .. } => {
                attributes.first()
            }
        }
    }
}

/// Options recognised by a scatter plot report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterOptions {
    /// Coordinate source.
    pub source: PlotSource,
    /// Impute missing values instead of dropping the point.
    #[serde(default = "ScatterOptions::default_show_missing")]
    pub show_missing: bool,
    /// Classifier selection.
    #[serde(default)]
    pub category: CategorySpec,
    /// Axis scale; defaults to the primary attribute's scale, then `log`.
    #[serde(default)]
    pub scale: Option<String>,
    /// Deprecated per-axis scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xscale: Option<String>,
    /// Deprecated per-axis scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yscale: Option<String>,
    /// Plot title.
    #[serde(default)]
    pub title: Option<String>,
    /// X axis label; defaults to the attribute or algorithm name.
    #[serde(default)]
    pub xlabel: Option<String>,
    /// Y axis label; defaults to the attribute or algorithm name.
    #[serde(default)]
    pub ylabel: Option<String>,
    /// Output format; defaults from [`HarnessSettings`].
    #[serde(default)]
    pub format: Option<OutputFormat>,
    /// Figure overrides; defaults from [`HarnessSettings`].
    #[serde(default)]
    pub style: Option<StyleOptions>,
    /// Filters applied to every run before plotting.
    #[serde(default)]
    pub filters: Vec<RunFilter>,
    /// Plot `y / x` on the Y axis; defaults from [`HarnessSettings`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative: Option<bool>,
}

impl ScatterOptions {
    fn default_show_missing() -> bool {
        true
    }

    /// Options with every default applied.
    pub fn new(source: PlotSource) -> Self {
        Self {
            source,
            show_missing: Self::default_show_missing(),
            category: CategorySpec::default(),
            scale: None,
            xscale: None,
            yscale: None,
            title: None,
            xlabel: None,
            ylabel: None,
            format: None,
            style: None,
            filters: Vec::new(),
            relative: None,
        }
    }

    /// Resolves the shared axis scale.
    ///
    /// `xscale`/`yscale` are still honoured but logged as deprecated; when
    /// they disagree the report would need asymmetric axes, which is rejected.
    pub fn resolve_scale(&self) -> Result<Scale, LabError> {
        if self.xscale.is_some() || self.yscale.is_some() {
            tracing::warn!("use the \"scale\" option instead of \"xscale\" and \"yscale\"");
        }
        if let (Some(x), Some(y)) = (&self.xscale, &self.yscale) {
            if x != y {
                return Err(LabError::Config(
                    ErrorInfo::new(
                        "scatter.scale_mismatch",
                        "both axes of a scatter plot must share one scale",
                    )
                    .with_context("xscale", x.clone())
                    .with_context("yscale", y.clone()),
                ));
            }
        }
        let requested = self
            .scale
            .as_ref()
            .or(self.xscale.as_ref())
            .or(self.yscale.as_ref());
        match requested {
            Some(name) => name.parse(),
            None => Ok(self
                .source
                .primary_attribute()
                .and_then(|attribute| attribute.scale)
                .unwrap_or(Scale::Log)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_scale_is_a_config_error() {
        let err = "loglog".parse::<Scale>().unwrap_err();
        assert!(err.is_config());
        assert_eq!(err.info().code, "scatter.scale_unknown");
    }

    #[test]
    fn scale_falls_back_to_attribute_then_log() {
        let options = ScatterOptions::new(PlotSource::attributes("layer_size", "total_time"));
        assert_eq!(options.resolve_scale().unwrap(), Scale::Log);

        let options = ScatterOptions::new(PlotSource::attributes(
            Attribute::with_scale("pattern_size", Scale::Linear),
            "layer_seed_time",
        ));
        assert_eq!(options.resolve_scale().unwrap(), Scale::Linear);
    }

    #[test]
    fn deprecated_axis_scales_are_folded() {
        let mut options = ScatterOptions::new(PlotSource::attributes("x", "y"));
        options.xscale = Some("symlog".into());
        assert_eq!(options.resolve_scale().unwrap(), Scale::Symlog);

        options.yscale = Some("linear".into());
        let err = options.resolve_scale().unwrap_err();
        assert_eq!(err.info().code, "scatter.scale_mismatch");
    }

    #[test]
    fn attribute_counts_are_checked() {
        let source = PlotSource::Attributes {
            attributes: vec![Attribute::new("total_time")],
        };
        assert_eq!(
            source.validate().unwrap_err().info().code,
            "scatter.attribute_count"
        );
        let source = PlotSource::Comparison {
            attributes: vec![Attribute::new("total_time")],
            algorithms: vec!["a".into()],
        };
        assert_eq!(
            source.validate().unwrap_err().info().code,
            "scatter.algorithm_count"
        );
    }

    #[test]
    fn tex_settings_select_compact_figures() {
        let settings = HarnessSettings {
            tex: true,
            ..HarnessSettings::default()
        };
        assert_eq!(settings.default_format(), OutputFormat::Tex);
        assert_eq!(settings.default_style().figsize, [3.0, 3.0]);
        assert_eq!(settings.default_style().dpi, 200);
        assert_eq!(HarnessSettings::default().default_style().figsize, [8.0, 8.0]);
    }
}
