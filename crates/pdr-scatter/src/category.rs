//! Category labels and the classifiers that compute them.

use std::fmt;

use pdr_core::errors::{ErrorInfo, LabError};
use pdr_core::record::{AttributeValue, RunRecord};
use serde::{Deserialize, Serialize};

/// Label partitioning the points of a plot. `None` is the implicit single
/// category used when no classifier is configured.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Category(Option<String>);

impl Category {
    /// The implicit category.
    pub fn uncategorized() -> Self {
        Self(None)
    }

    /// A named category.
    pub fn named(label: impl Into<String>) -> Self {
        Self(Some(label.into()))
    }

    /// Returns the label, if any.
    pub fn label(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Returns true for a named category.
    pub fn is_named(&self) -> bool {
        self.0.is_some()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or("None"))
    }
}

/// Assigns a category to a single run.
pub trait Classifier {
    /// Computes the category of `run`.
    fn classify(&self, run: &RunRecord) -> Result<Category, LabError>;
}

impl<F> Classifier for F
where
    F: Fn(&RunRecord) -> Result<Category, LabError>,
{
    fn classify(&self, run: &RunRecord) -> Result<Category, LabError> {
        self(run)
    }
}

/// Assigns a category to a pair of runs of the same problem.
pub trait PairClassifier {
    /// Computes the category of the pair.
    fn classify_pair(&self, first: &RunRecord, second: &RunRecord)
        -> Result<Category, LabError>;
}

impl<F> PairClassifier for F
where
    F: Fn(&RunRecord, &RunRecord) -> Result<Category, LabError>,
{
    fn classify_pair(&self, first: &RunRecord, second: &RunRecord) -> Result<Category, LabError> {
        self(first, second)
    }
}

/// Puts every point in the implicit category.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uncategorized;

impl Classifier for Uncategorized {
    fn classify(&self, _run: &RunRecord) -> Result<Category, LabError> {
        Ok(Category::uncategorized())
    }
}

impl PairClassifier for Uncategorized {
    fn classify_pair(&self, _first: &RunRecord, _second: &RunRecord) -> Result<Category, LabError> {
        Ok(Category::uncategorized())
    }
}

/// Uses the value of one attribute as the label.
#[derive(Debug, Clone)]
pub struct ByAttribute {
    name: String,
}

impl ByAttribute {
    /// Classifier reading `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn label_of(&self, run: &RunRecord) -> Option<String> {
        match run.get(&self.name) {
            AttributeValue::Missing => None,
            AttributeValue::Text(text) => Some(text.clone()),
            AttributeValue::Number(number) => Some(number.value.to_string()),
            AttributeValue::Sequence(values) => Some(format!("{} values", values.len())),
        }
    }

    fn missing_key(&self) -> LabError {
        LabError::Data(
            ErrorInfo::new(
                "classify.missing_key",
                "run lacks the attribute required for classification",
            )
            .with_context("attribute", self.name.clone()),
        )
    }
}

impl Classifier for ByAttribute {
    fn classify(&self, run: &RunRecord) -> Result<Category, LabError> {
        self.label_of(run)
            .map(Category::named)
            .ok_or_else(|| self.missing_key())
    }
}

impl PairClassifier for ByAttribute {
    // A comparison may lack one of its runs; the other still names the problem.
    fn classify_pair(&self, first: &RunRecord, second: &RunRecord) -> Result<Category, LabError> {
        self.label_of(first)
            .or_else(|| self.label_of(second))
            .map(Category::named)
            .ok_or_else(|| self.missing_key())
    }
}

/// Labels a comparison by which algorithm achieved the smaller value.
#[derive(Debug, Clone)]
pub struct ByOutcome {
    attribute: String,
}

impl ByOutcome {
    /// Label for problems where the first algorithm is smaller.
    pub const FIRST_BETTER: &'static str = "first better";
    /// Label for problems where the second algorithm is smaller.
    pub const SECOND_BETTER: &'static str = "second better";
    /// Label for ties.
    pub const EQUAL: &'static str = "equal";
    /// Label for problems where neither value is known.
    pub const UNSOLVED: &'static str = "unsolved";

    /// Classifier comparing `attribute`.
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
        }
    }
}

impl PairClassifier for ByOutcome {
    fn classify_pair(&self, first: &RunRecord, second: &RunRecord) -> Result<Category, LabError> {
        let a = first.get(&self.attribute).to_scalar(&self.attribute)?;
        let b = second.get(&self.attribute).to_scalar(&self.attribute)?;
        let label = match (a, b) {
            (None, None) => Self::UNSOLVED,
            (Some(_), None) => Self::FIRST_BETTER,
            (None, Some(_)) => Self::SECOND_BETTER,
            (Some(a), Some(b)) if a.value < b.value => Self::FIRST_BETTER,
            (Some(a), Some(b)) if a.value > b.value => Self::SECOND_BETTER,
            _ => Self::EQUAL,
        };
        Ok(Category::named(label))
    }
}

/// Serializable classifier selection for configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "by", rename_all = "kebab-case")]
pub enum CategorySpec {
    /// Single implicit category.
    #[default]
    None,
    /// Benchmark domain.
    Domain,
    /// Algorithm name.
    Algorithm,
    /// Arbitrary attribute.
    Attribute {
        /// Attribute name.
        name: String,
    },
    /// Comparison outcome on the plotted attribute; comparison plots only.
    Outcome,
}

impl CategorySpec {
    /// Builds a single-run classifier.
    pub fn classifier(&self) -> Result<Box<dyn Classifier>, LabError> {
        match self.attribute_name() {
            Some(name) => Ok(Box::new(ByAttribute::new(name))),
            None if *self == CategorySpec::None => Ok(Box::new(Uncategorized)),
            None => Err(LabError::Config(
                ErrorInfo::new(
                    "scatter.category_unsupported",
                    "outcome categories need a comparison plot",
                )
                .with_hint("use `by: domain` or `by: algorithm` for attribute plots"),
            )),
        }
    }

    /// Builds a pair classifier for comparisons of `attribute`.
    pub fn pair_classifier(&self, attribute: &str) -> Box<dyn PairClassifier> {
        match self.attribute_name() {
            Some(name) => Box::new(ByAttribute::new(name)),
            None if *self == CategorySpec::Outcome => Box::new(ByOutcome::new(attribute)),
            None => Box::new(Uncategorized),
        }
    }

    fn attribute_name(&self) -> Option<&str> {
        match self {
            CategorySpec::Domain => Some("domain"),
            CategorySpec::Algorithm => Some("algorithm"),
            CategorySpec::Attribute { name } => Some(name),
            CategorySpec::None | CategorySpec::Outcome => None,
        }
    }
}
