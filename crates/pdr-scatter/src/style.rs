use std::collections::BTreeMap;

use pdr_core::errors::{ErrorInfo, LabError};
use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Marker shapes, in matplotlib notation.
pub const SHAPES: [char; 9] = ['x', '+', 'o', 's', '^', 'v', '<', '>', 'D'];

/// Color cycle names, in matplotlib notation.
pub const COLORS: [&str; 10] = ["C0", "C1", "C2", "C3", "C4", "C5", "C6", "C7", "C8", "C9"];

/// Visual style of one category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerStyle {
    /// Marker shape.
    pub shape: char,
    /// Color cycle entry.
    pub color: String,
}

/// Fixed cycle of distinct (shape, color) pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylePalette {
    styles: Vec<MarkerStyle>,
}

impl StylePalette {
    /// Pairs shapes and colors cyclically.
    ///
    /// The counts must be coprime for the cycle to visit every combination
    /// once before repeating.
    pub fn new(shapes: &[char], colors: &[&str]) -> Result<Self, LabError> {
        if shapes.is_empty() || colors.is_empty() || gcd(shapes.len(), colors.len()) != 1 {
            return Err(LabError::Config(
                ErrorInfo::new(
                    "scatter.styles_not_coprime",
                    "the number of shapes and the number of colors must be coprime",
                )
                .with_context("shapes", shapes.len().to_string())
                .with_context("colors", colors.len().to_string()),
            ));
        }
        let count = shapes.len() * colors.len();
        let styles = (0..count)
            .map(|idx| MarkerStyle {
                shape: shapes[idx % shapes.len()],
                color: colors[idx % colors.len()].to_string(),
            })
            .collect();
        Ok(Self { styles })
    }

    /// Palette of [`SHAPES`] and [`COLORS`] (90 combinations).
    pub fn standard() -> Result<Self, LabError> {
        Self::new(&SHAPES, &COLORS)
    }

    /// Number of distinct styles before the cycle repeats.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Always false; construction rejects empty palettes.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Assigns styles in sorted label order, independent of input order.
    pub fn assign<'a, I>(&self, categories: I) -> BTreeMap<Category, MarkerStyle>
    where
        I: IntoIterator<Item = &'a Category>,
    {
        let mut sorted: Vec<&Category> = categories.into_iter().collect();
        sorted.sort();
        sorted.dedup();
        sorted
            .into_iter()
            .enumerate()
            .map(|(idx, category)| (category.clone(), self.styles[idx % self.styles.len()].clone()))
            .collect()
    }
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_palette_has_ninety_styles() {
        let palette = StylePalette::standard().unwrap();
        assert_eq!(palette.len(), 90);
    }

    #[test]
    fn non_coprime_palettes_are_rejected() {
        let err = StylePalette::new(&['x', 'o'], &["C0", "C1", "C2", "C3"]).unwrap_err();
        assert!(err.is_config());
        assert_eq!(err.info().code, "scatter.styles_not_coprime");
    }

    #[test]
    fn assignment_ignores_input_order() {
        let palette = StylePalette::standard().unwrap();
        let a = [Category::named("slow"), Category::named("fast")];
        let b = [Category::named("fast"), Category::named("slow")];
        let first = palette.assign(&a);
        assert_eq!(first, palette.assign(&b));
        assert_eq!(first[&Category::named("fast")].shape, 'x');
        assert_eq!(first[&Category::named("slow")].color, "C1");
    }

    #[test]
    fn styles_cycle_past_the_palette() {
        let palette = StylePalette::new(&['x'], &["C0", "C1"]).unwrap();
        let labels: Vec<Category> = ["a", "b", "c"].iter().map(|l| Category::named(*l)).collect();
        let styles = palette.assign(&labels);
        assert_eq!(styles[&labels[0]], styles[&labels[2]]);
    }
}
