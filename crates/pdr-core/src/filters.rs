use serde::{Deserialize, Serialize};

use crate::record::{AttributeValue, Number, RunRecord};

/// Minimum number of evaluations before a rate is considered meaningful.
const MIN_EVALUATIONS_FOR_RATE: f64 = 100.0;

/// Transformation or predicate applied to every run before a report sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RunFilter {
    /// Treats non-positive values of the attribute as missing.
    ZeroToMissing {
        /// Attribute to clear.
        attribute: String,
    },
    /// Derives `evaluations_per_time` from `evaluations` and `search_time`.
    EvaluationsPerTime,
    /// Keeps only runs whose `algorithm` attribute is listed.
    Algorithms {
        /// Accepted algorithm names.
        names: Vec<String>,
    },
}

impl RunFilter {
    /// Applies the filter. Returns `None` when the run is rejected.
    pub fn apply(&self, mut run: RunRecord) -> Option<RunRecord> {
        match self {
            RunFilter::ZeroToMissing { attribute } => {
                let non_positive = match run.get(attribute) {
                    AttributeValue::Number(number) => number.is_non_positive(),
                    _ => false,
                };
                if non_positive {
                    run.insert(attribute.clone(), AttributeValue::Missing);
                }
                Some(run)
            }
            RunFilter::EvaluationsPerTime => {
                if let Some(rate) = evaluations_per_time(&run) {
                    run.insert("evaluations_per_time", AttributeValue::Number(rate));
                }
                Some(run)
            }
            RunFilter::Algorithms { names } => {
                let keep = run
                    .text("algorithm")
                    .map(|algorithm| names.iter().any(|name| name == algorithm))
                    .unwrap_or(false);
                keep.then_some(run)
            }
        }
    }
}

fn evaluations_per_time(run: &RunRecord) -> Option<Number> {
    let evaluations = match run.get("evaluations") {
        AttributeValue::Number(number) => number.value,
        _ => return None,
    };
    let time = match run.get("search_time") {
        AttributeValue::Number(number) => number.value,
        _ => return None,
    };
    if evaluations >= MIN_EVALUATIONS_FOR_RATE && time != 0.0 {
        Some(Number::measured(evaluations / time))
    } else {
        None
    }
}

/// Applies filters in order, short-circuiting on the first rejection.
pub fn apply_filters(filters: &[RunFilter], run: RunRecord) -> Option<RunRecord> {
    filters
        .iter()
        .try_fold(run, |run, filter| filter.apply(run))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_to_missing_clears_non_positive_values() {
        let filter = RunFilter::ZeroToMissing {
            attribute: "obligation_insertions".into(),
        };
        let run = RunRecord::new().with("obligation_insertions", 0i64);
        let run = filter.apply(run).unwrap();
        assert!(run.get("obligation_insertions").is_missing());

        let run = RunRecord::new().with("obligation_insertions", 12i64);
        let run = filter.apply(run).unwrap();
        assert!(run.has("obligation_insertions"));
    }

    #[test]
    fn evaluations_per_time_requires_enough_evaluations() {
        let run = RunRecord::new()
            .with("evaluations", 400i64)
            .with("search_time", 2.0);
        let run = RunFilter::EvaluationsPerTime.apply(run).unwrap();
        assert_eq!(
            run.get("evaluations_per_time"),
            &AttributeValue::Number(Number::measured(200.0))
        );

        let run = RunRecord::new()
            .with("evaluations", 99i64)
            .with("search_time", 2.0);
        let run = RunFilter::EvaluationsPerTime.apply(run).unwrap();
        assert!(!run.has("evaluations_per_time"));
    }

    #[test]
    fn algorithm_filter_rejects_other_runs() {
        let filters = vec![RunFilter::Algorithms {
            names: vec!["latest:01-pdr-noop".into()],
        }];
        let kept = RunRecord::new().with("algorithm", "latest:01-pdr-noop");
        let dropped = RunRecord::new().with("algorithm", "latest:08-pdr-cegar");
        assert!(apply_filters(&filters, kept).is_some());
        assert!(apply_filters(&filters, dropped).is_none());
    }
}
