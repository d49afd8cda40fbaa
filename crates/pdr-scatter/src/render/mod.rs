//! Writers turning a [`PlotSpec`] into a file.

use std::fs;
use std::path::{Path, PathBuf};

use pdr_core::errors::{ErrorInfo, LabError};

use crate::config::{OutputFormat, Scale};
use crate::spec::PlotSpec;

mod json;
mod pgfplots;
mod svg;

pub use json::JsonWriter;
pub use pgfplots::PgfplotsWriter;
pub use svg::SvgWriter;

/// Hex values of the `C0`..`C9` color cycle.
pub(crate) const COLOR_CYCLE: [&str; 10] = [
    "1f77b4", "ff7f0e", "2ca02c", "d62728", "9467bd", "8c564b", "e377c2", "7f7f7f", "bcbd22",
    "17becf",
];

pub(crate) fn color_hex(name: &str) -> &'static str {
    name.strip_prefix('C')
        .and_then(|idx| idx.parse::<usize>().ok())
        .and_then(|idx| COLOR_CYCLE.get(idx))
        .copied()
        .unwrap_or(COLOR_CYCLE[0])
}

/// Maps a data value onto the unit interval of an axis.
pub(crate) fn project(value: f64, min: f64, max: f64, scale: Scale) -> f64 {
    let transform = |v: f64| match scale {
        Scale::Linear => v,
        Scale::Log => v.log10(),
        Scale::Symlog => v.signum() * (1.0 + v.abs()).log10(),
    };
    let (lo, hi) = (transform(min), transform(max));
    if hi - lo <= f64::EPSILON {
        return 0.5;
    }
    (transform(value) - lo) / (hi - lo)
}

/// Renderer collaborator receiving finished plot specs.
pub trait PlotWriter {
    /// Format produced by the writer.
    fn format(&self) -> OutputFormat;

    /// Serializes `spec` into the writer's format.
    fn render(&self, spec: &PlotSpec) -> Result<Vec<u8>, LabError>;

    /// Writes `spec` next to `outfile`, appending the format suffix when it
    /// is missing, and returns the final path.
    fn write(&self, spec: &PlotSpec, outfile: &Path) -> Result<PathBuf, LabError> {
        let path = with_suffix(outfile, self.format());
        let bytes = self.render(spec)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| {
                LabError::Render(
                    ErrorInfo::new("render.output_dir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        fs::write(&path, bytes).map_err(|err| {
            LabError::Render(
                ErrorInfo::new("render.write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        tracing::info!(path = %path.display(), points = spec.point_count(), "wrote scatter plot");
        Ok(path)
    }
}

/// Appends `.<suffix>` unless the path already ends with it.
pub fn with_suffix(outfile: &Path, format: OutputFormat) -> PathBuf {
    let suffix = format!(".{}", format.suffix());
    let raw = outfile.as_os_str().to_string_lossy();
    if raw.ends_with(&suffix) {
        outfile.to_path_buf()
    } else {
        PathBuf::from(format!("{raw}{suffix}"))
    }
}

/// Writer for `format`.
pub fn writer_for(format: OutputFormat) -> Box<dyn PlotWriter> {
    match format {
        OutputFormat::Svg => Box::new(SvgWriter),
        OutputFormat::Tex => Box::new(PgfplotsWriter),
        OutputFormat::Json => Box::new(JsonWriter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_is_appended_once() {
        let path = with_suffix(Path::new("eval/time-vs-memory"), OutputFormat::Tex);
        assert_eq!(path, PathBuf::from("eval/time-vs-memory.tex"));
        assert_eq!(with_suffix(&path, OutputFormat::Tex), path);
        assert_eq!(
            with_suffix(Path::new("plot.png"), OutputFormat::Svg),
            PathBuf::from("plot.png.svg")
        );
    }

    #[test]
    fn projection_respects_scale() {
        assert_eq!(project(10.0, 1.0, 100.0, Scale::Log), 0.5);
        assert_eq!(project(50.0, 0.0, 100.0, Scale::Linear), 0.5);
        assert_eq!(project(3.0, 3.0, 3.0, Scale::Linear), 0.5);
    }

    #[test]
    fn unknown_colors_fall_back_to_first_entry() {
        assert_eq!(color_hex("C3"), "d62728");
        assert_eq!(color_hex("red"), "1f77b4");
    }
}
