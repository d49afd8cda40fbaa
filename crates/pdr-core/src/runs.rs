use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, LabError};
use crate::filters::{apply_filters, RunFilter};
use crate::record::RunRecord;
use crate::serde::from_json_slice;

/// Identifies the planning task a run was executed on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProblemKey {
    /// Benchmark domain name.
    pub domain: String,
    /// Problem file name within the domain.
    pub problem: String,
}

impl ProblemKey {
    fn of(run: &RunRecord) -> Self {
        Self {
            domain: run.text("domain").unwrap_or_default().to_string(),
            problem: run.text("problem").unwrap_or_default().to_string(),
        }
    }
}

/// Collection of run records keyed by run identifier.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunSet {
    runs: BTreeMap<String, RunRecord>,
}

impl RunSet {
    /// Creates a run set from identifier/record pairs.
    pub fn from_runs<I, S>(runs: I) -> Self
    where
        I: IntoIterator<Item = (S, RunRecord)>,
        S: Into<String>,
    {
        Self {
            runs: runs.into_iter().map(|(id, run)| (id.into(), run)).collect(),
        }
    }

    /// Parses a properties payload: a JSON object mapping run ids to attributes.
    pub fn from_properties_slice(data: &[u8]) -> Result<Self, LabError> {
        from_json_slice(data)
    }

    /// Loads a properties file from disk.
    pub fn load(path: &Path) -> Result<Self, LabError> {
        let bytes = fs::read(path).map_err(|err| {
            LabError::Serde(
                ErrorInfo::new("runs.properties_read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let runs = Self::from_properties_slice(&bytes)?;
        tracing::debug!(runs = runs.len(), path = %path.display(), "loaded properties");
        Ok(runs)
    }

    /// Number of runs in the set.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Returns true when the set holds no runs.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Iterates over runs in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RunRecord)> {
        self.runs.iter().map(|(id, run)| (id.as_str(), run))
    }

    /// Returns a new set containing the runs accepted by all filters.
    pub fn filtered(&self, filters: &[RunFilter]) -> Self {
        if filters.is_empty() {
            return self.clone();
        }
        let runs = self
            .runs
            .iter()
            .filter_map(|(id, run)| apply_filters(filters, run.clone()).map(|run| (id.clone(), run)))
            .collect();
        Self { runs }
    }

    /// Groups runs by problem instance, in first-seen order.
    pub fn problem_runs(&self) -> IndexMap<ProblemKey, Vec<&RunRecord>> {
        let mut groups: IndexMap<ProblemKey, Vec<&RunRecord>> = IndexMap::new();
        for run in self.runs.values() {
            groups.entry(ProblemKey::of(run)).or_default().push(run);
        }
        groups
    }

    /// Sorted list of algorithm names present in the set.
    pub fn algorithms(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .runs
            .values()
            .filter_map(|run| run.text("algorithm").map(str::to_string))
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
