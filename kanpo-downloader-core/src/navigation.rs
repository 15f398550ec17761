//! Year and month pickers.

use crate::listing::GroupedListing;

/// Selectable years, newest first, from `current_year` down to `first_year`.
pub fn available_years(current_year: i32, first_year: i32) -> Vec<i32> {
    (first_year..=current_year).rev().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthAvailability {
    pub month: u32,
    pub has_files: bool,
}

/// All twelve months of `year`, each flagged by whether any date has files.
pub fn month_availability(grouped: &GroupedListing, year: i32) -> Vec<MonthAvailability> {
    (1..=12)
        .map(|month| {
            let prefix = format!("{year}{month:02}");
            MonthAvailability {
                month,
                has_files: grouped.keys().any(|date| date.starts_with(&prefix)),
            }
        })
        .collect()
}
