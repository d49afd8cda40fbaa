#![deny(missing_docs)]
#![doc = "Run records, errors and serde helpers shared by the PDR experiment harness."]

pub mod errors;
/// Run transformations applied before reports are built.
pub mod filters;
/// Canonical hashing helpers.
pub mod hash;
pub mod record;
/// Run collections grouped by problem instance.
pub mod runs;
/// Canonical JSON and YAML serde helpers.
pub mod serde;

pub use errors::{ErrorInfo, LabError};
pub use filters::{apply_filters, RunFilter};
pub use hash::stable_hash_string;
pub use record::{AttributeValue, Number, NumberKind, RunRecord};
pub use runs::{ProblemKey, RunSet};
