use indexmap::IndexMap;
use pdr_core::errors::LabError;
use pdr_core::record::{Number, RunRecord};
use pdr_core::runs::RunSet;

use crate::category::{Category, Classifier, PairClassifier};

/// Raw coordinate pair before normalization; `None` marks a missing value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// X component.
    pub x: Option<Number>,
    /// Y component.
    pub y: Option<Number>,
}

impl Coordinate {
    /// Builds a coordinate from its two components.
    pub fn new(x: Option<Number>, y: Option<Number>) -> Self {
        Self { x, y }
    }

    /// Returns true when at least one component is missing.
    pub fn has_missing(&self) -> bool {
        self.x.is_none() || self.y.is_none()
    }
}

/// Category to coordinate list, in first-seen category order.
pub type CategoryMap = IndexMap<Category, Vec<Coordinate>>;

fn push(categories: &mut CategoryMap, category: Category, coord: Coordinate, show_missing: bool) {
    if show_missing || !coord.has_missing() {
        categories.entry(category).or_default().push(coord);
    }
}

/// Partitions runs into categories, one point per run.
///
/// Runs are visited problem by problem. With `show_missing` unset, points
/// with a missing component are dropped and do not create their category.
pub fn partition_runs(
    runs: &RunSet,
    x_attribute: &str,
    y_attribute: &str,
    classifier: &dyn Classifier,
    show_missing: bool,
) -> Result<CategoryMap, LabError> {
    let mut categories = CategoryMap::new();
    for group in runs.problem_runs().values() {
        for run in group {
            let category = classifier.classify(run)?;
            let coord = Coordinate::new(
                run.get(x_attribute).to_scalar(x_attribute)?,
                run.get(y_attribute).to_scalar(y_attribute)?,
            );
            push(&mut categories, category, coord, show_missing);
        }
    }
    tracing::debug!(categories = categories.len(), "partitioned runs");
    Ok(categories)
}

/// Partitions problems into categories, one point per problem comparing
/// `attribute` between the `first` (X) and `second` (Y) algorithm.
///
/// A problem without a run of one algorithm contributes a missing component.
pub fn partition_comparison(
    runs: &RunSet,
    attribute: &str,
    first: &str,
    second: &str,
    classifier: &dyn PairClassifier,
    show_missing: bool,
) -> Result<CategoryMap, LabError> {
    let absent = RunRecord::new();
    let mut categories = CategoryMap::new();
    for group in runs.problem_runs().values() {
        let find = |algorithm: &str| {
            group
                .iter()
                .copied()
                .find(|run| run.text("algorithm") == Some(algorithm))
        };
        let (run_a, run_b) = match (find(first), find(second)) {
            (None, None) => continue,
            (a, b) => (a.unwrap_or(&absent), b.unwrap_or(&absent)),
        };
        let category = classifier.classify_pair(run_a, run_b)?;
        let coord = Coordinate::new(
            run_a.get(attribute).to_scalar(attribute)?,
            run_b.get(attribute).to_scalar(attribute)?,
        );
        push(&mut categories, category, coord, show_missing);
    }
    tracing::debug!(categories = categories.len(), "partitioned problem pairs");
    Ok(categories)
}

/// Replaces the Y component of every coordinate by its ratio to X.
///
/// The ratio is missing when either side is missing or X is zero. With
/// `show_missing` unset, coordinates whose ratio became missing are dropped
/// and categories left empty disappear.
pub fn relative_coordinates(categories: CategoryMap, show_missing: bool) -> CategoryMap {
    let mut relative = CategoryMap::new();
    for (category, coords) in categories {
        for coord in coords {
            let ratio = match (coord.x, coord.y) {
                (Some(x), Some(y)) if x.value != 0.0 => Some(Number::measured(y.value / x.value)),
                _ => None,
            };
            push(&mut relative, category.clone(), Coordinate::new(coord.x, ratio), show_missing);
        }
    }
    relative
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{ByAttribute, Uncategorized};

    fn run(domain: &str, problem: &str, algorithm: &str, time: Option<f64>) -> RunRecord {
        let mut record = RunRecord::new()
            .with("domain", domain)
            .with("problem", problem)
            .with("algorithm", algorithm)
            .with("layer_size", pdr_core::AttributeValue::Sequence(vec![
                Number::counter(2),
                Number::counter(3),
            ]));
        if let Some(time) = time {
            record.insert("total_time", time);
        }
        record
    }

    #[test]
    fn relative_coordinates_divide_by_x() {
        let mut map = CategoryMap::new();
        map.insert(
            Category::uncategorized(),
            vec![
                Coordinate::new(Some(Number::measured(4.0)), Some(Number::measured(2.0))),
                Coordinate::new(Some(Number::counter(0)), Some(Number::measured(3.0))),
                Coordinate::new(None, Some(Number::measured(1.0))),
            ],
        );
        let shown = relative_coordinates(map.clone(), true);
        let coords = &shown[&Category::uncategorized()];
        assert_eq!(coords[0].y, Some(Number::measured(0.5)));
        assert_eq!(coords[1].y, None);
        assert_eq!(coords[2].y, None);

        let hidden = relative_coordinates(map, false);
        assert_eq!(hidden[&Category::uncategorized()].len(), 1);
    }

    #[test]
    fn sequences_are_summed_and_missing_kept() {
        let runs = RunSet::from_runs([
            ("a", run("blocks", "p1", "noop", Some(1.0))),
            ("b", run("blocks", "p2", "noop", None)),
        ]);
        let map = partition_runs(&runs, "layer_size", "total_time", &Uncategorized, true).unwrap();
        let coords = &map[&Category::uncategorized()];
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[0].x, Some(Number::counter(5)));
        assert!(coords[1].has_missing());
    }

    #[test]
    fn dropped_points_do_not_create_categories() {
        let runs = RunSet::from_runs([
            ("a", run("blocks", "p1", "noop", Some(1.0))),
            ("b", run("gripper", "p1", "noop", None)),
        ]);
        let map = partition_runs(
            &runs,
            "layer_size",
            "total_time",
            &ByAttribute::new("domain"),
            false,
        )
        .unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key(&Category::named("blocks")));
    }

    #[test]
    fn comparisons_pair_runs_by_problem() {
        let runs = RunSet::from_runs([
            ("1", run("blocks", "p1", "noop", Some(2.0))),
            ("2", run("blocks", "p1", "cegar", Some(1.0))),
            ("3", run("blocks", "p2", "noop", Some(3.0))),
        ]);
        let map =
            partition_comparison(&runs, "total_time", "noop", "cegar", &Uncategorized, true)
                .unwrap();
        let coords = &map[&Category::uncategorized()];
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[0].x.map(|n| n.value), Some(2.0));
        assert_eq!(coords[0].y.map(|n| n.value), Some(1.0));
        assert_eq!(coords[1].y, None);
    }
}
