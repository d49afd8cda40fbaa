use pdr_core::errors::LabError;
use pdr_core::serde::to_canonical_json_bytes;

use super::PlotWriter;
use crate::config::OutputFormat;
use crate::spec::PlotSpec;

/// Dumps the plot spec as canonical JSON for external renderers.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter;

impl PlotWriter for JsonWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn render(&self, spec: &PlotSpec) -> Result<Vec<u8>, LabError> {
        to_canonical_json_bytes(spec)
    }
}
