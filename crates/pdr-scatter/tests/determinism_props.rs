use std::collections::BTreeSet;

use pdr_core::{RunRecord, RunSet};
use pdr_scatter::{
    Category, CategorySpec, HarnessSettings, PlotSource, ScatterOptions, ScatterPlotReport,
    StylePalette,
};
use proptest::prelude::*;

fn build_runs(rows: &[(u8, i64, Option<f64>)]) -> RunSet {
    RunSet::from_runs(rows.iter().enumerate().map(|(idx, (domain, layer, time))| {
        let mut record = RunRecord::new()
            .with("domain", format!("domain-{domain}").as_str())
            .with("problem", format!("p{idx}.pddl").as_str())
            .with("layer_size", *layer);
        if let Some(time) = time {
            record.insert("total_time", *time);
        }
        (format!("run-{idx:04}"), record)
    }))
}

proptest! {
    #[test]
    fn identical_inputs_give_identical_specs(
        rows in prop::collection::vec((0u8..6, 1i64..10_000, prop::option::of(0.001f64..500.0)), 1..40),
        show_missing in any::<bool>(),
    ) {
        let runs = build_runs(&rows);
        let mut options = ScatterOptions::new(PlotSource::attributes("layer_size", "total_time"));
        options.category = CategorySpec::Domain;
        options.show_missing = show_missing;
        let report = ScatterPlotReport::new(options, &HarnessSettings::default()).unwrap();
        let first = report.build(&runs);
        let second = report.build(&runs);
        match (first, second) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
                prop_assert_eq!(a, b);
            }
            (Err(a), Err(b)) => prop_assert_eq!(a, b),
            _ => prop_assert!(false, "outcomes differ"),
        }
    }

    #[test]
    fn styles_are_unique_up_to_palette_size(labels in prop::collection::btree_set("[a-z]{1,8}", 1..90)) {
        let palette = StylePalette::standard().unwrap();
        let categories: Vec<Category> = labels.iter().map(|label| Category::named(label.as_str())).collect();
        let styles = palette.assign(&categories);
        let distinct: BTreeSet<_> = styles
            .values()
            .map(|style| (style.shape, style.color.clone()))
            .collect();
        prop_assert_eq!(distinct.len(), categories.len());

        let mut reversed = categories.clone();
        reversed.reverse();
        prop_assert_eq!(palette.assign(&reversed), styles);
    }
}
