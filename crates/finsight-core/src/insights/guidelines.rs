//! Guideline tables - target share of total spend per category

use crate::models::Category;

/// Guideline share of total spend, in percent
pub const GUIDELINE_PERCENTAGES: &[(Category, f64)] = &[
    (Category::Food, 15.0),
    (Category::Utilities, 10.0),
    (Category::Transport, 10.0),
    (Category::Healthcare, 5.0),
    (Category::Entertainment, 5.0),
    (Category::Shopping, 10.0),
    (Category::Other, 5.0),
];

/// Used for any category missing from the table
pub const DEFAULT_GUIDELINE_PERCENTAGE: f64 = 5.0;

/// Guideline share of total spend for a category, in percent
pub fn guideline_percentage(category: Category) -> f64 {
    GUIDELINE_PERCENTAGES
        .iter()
        .find(|(cat, _)| *cat == category)
        .map(|(_, pct)| *pct)
        .unwrap_or(DEFAULT_GUIDELINE_PERCENTAGE)
}

/// Guideline share of total spend for a category, as a fraction
pub fn guideline_fraction(category: Category) -> f64 {
    guideline_percentage(category) / 100.0
}
