//! Generic predicate filters over a [`Catalog`].
//!
//! Two entry points, both narrowing the catalog criterion by criterion:
//!
//! - [`apply_range_filter`]: `min <= value <= max`, inclusive on both ends
//!   (slider semantics).
//! - [`apply_equality_filter`]: `value == expected`.
//!
//! The recommender does not go through the range filter: bucket ranges are
//! half-open and must stay that way.

use crate::catalog::{column_kind, Catalog, ColumnKind, Track, Value};
use crate::error::{MoodError, Result};
use log::{debug, trace};

/// `(column, (min_inclusive, max_inclusive))`
pub type RangeCriterion<'a> = (&'a str, (f64, f64));

/// `(column, expected value)`
pub type EqualityCriterion<'a> = (&'a str, Value);

/// Keeps the rows whose numeric columns all lie within their inclusive
/// ranges.
///
/// With no criteria the catalog is returned unchanged.
///
/// # Errors
///
/// - [`MoodError::InvalidArgument`] for an empty column name, a non-finite
///   bound, or a text column
/// - [`MoodError::MissingColumn`] if a column does not exist
///
/// # Examples
///
/// ```
/// use moodmatch::catalog::{Catalog, Track};
/// use moodmatch::frame_filter::apply_range_filter;
///
/// let catalog = Catalog::default();
/// let filtered = apply_range_filter(&catalog, &[("danceability", (0.5, 0.75))])?;
/// assert!(filtered.is_empty());
/// # Ok::<(), moodmatch::MoodError>(())
/// ```
pub fn apply_range_filter(catalog: &Catalog, criteria: &[RangeCriterion<'_>]) -> Result<Catalog> {
    if criteria.is_empty() {
        return Ok(catalog.clone());
    }
    for &(column, (min, max)) in criteria {
        validate_column_name(column)?;
        if !min.is_finite() || !max.is_finite() {
            return Err(MoodError::InvalidArgument(format!(
                "bounds for `{column}` must be finite numbers, got ({min}, {max})"
            )));
        }
    }

    let mut result = catalog.clone();
    for &(column, (min, max)) in criteria {
        if column_kind(column)? != ColumnKind::Number {
            return Err(MoodError::InvalidArgument(format!(
                "`{column}` is not a numeric column"
            )));
        }
        result = narrow(&result, |track| {
            track
                .number(column)
                .is_some_and(|value| min <= value && value <= max)
        });
        trace!("Range {column} in [{min}, {max}] leaves {} rows", result.len());
    }

    debug!("Range filter kept {} of {} rows", result.len(), catalog.len());
    Ok(result)
}

/// Keeps the rows whose columns all equal the given values exactly.
///
/// With no criteria the catalog is returned unchanged.
///
/// # Errors
///
/// - [`MoodError::InvalidArgument`] for an empty column name or a value
///   whose kind does not match the column
/// - [`MoodError::MissingColumn`] if a column does not exist
pub fn apply_equality_filter(catalog: &Catalog, criteria: &[EqualityCriterion<'_>]) -> Result<Catalog> {
    if criteria.is_empty() {
        return Ok(catalog.clone());
    }
    for (column, _) in criteria {
        validate_column_name(column)?;
    }

    let mut result = catalog.clone();
    for (column, expected) in criteria {
        if column_kind(column)? != expected.kind() {
            return Err(MoodError::InvalidArgument(format!(
                "`{expected}` cannot be compared with column `{column}`"
            )));
        }
        result = narrow(&result, |track| {
            track.value(column).is_ok_and(|value| value == *expected)
        });
        trace!("Equality {column} == {expected} leaves {} rows", result.len());
    }

    debug!("Equality filter kept {} of {} rows", result.len(), catalog.len());
    Ok(result)
}

fn validate_column_name(column: &str) -> Result<()> {
    if column.trim().is_empty() {
        return Err(MoodError::InvalidArgument(
            "column name must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[inline]
fn narrow(catalog: &Catalog, keep: impl Fn(&Track) -> bool) -> Catalog {
    catalog.retain_cloned(keep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::{ids, track};

    fn catalog() -> Catalog {
        let mut jazz = track("c", 0.75, 0.1, 0.9, 0.0);
        jazz.genre = Some("jazz".into());
        Catalog::new(vec![
            track("a", 0.2, 0.5, 0.5, 0.5),
            track("b", 0.5, 0.9, 0.1, 0.8),
            jazz,
            track("d", 0.76, 0.3, 0.4, 0.2),
        ])
    }

    #[test]
    fn test_range_is_inclusive_on_both_ends() {
        let filtered = apply_range_filter(&catalog(), &[("danceability", (0.5, 0.75))]).unwrap();
        assert_eq!(ids(&filtered), vec!["b", "c"]);
    }

    #[test]
    fn test_range_criteria_are_anded() {
        let filtered = apply_range_filter(
            &catalog(),
            &[("danceability", (0.0, 1.0)), ("energy", (0.4, 1.0)), ("valence", (0.0, 0.5))],
        )
        .unwrap();
        assert_eq!(ids(&filtered), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_empty_criteria_return_catalog_unchanged() {
        let source = catalog();
        assert_eq!(apply_range_filter(&source, &[]).unwrap(), source);
        assert_eq!(apply_equality_filter(&source, &[]).unwrap(), source);
    }

    #[test]
    fn test_range_rejects_malformed_criteria() {
        let source = catalog();
        assert!(matches!(
            apply_range_filter(&source, &[("", (0.0, 1.0))]),
            Err(MoodError::InvalidArgument(_))
        ));
        assert!(matches!(
            apply_range_filter(&source, &[("energy", (f64::NAN, 1.0))]),
            Err(MoodError::InvalidArgument(_))
        ));
        assert!(matches!(
            apply_range_filter(&source, &[("name", (0.0, 1.0))]),
            Err(MoodError::InvalidArgument(_))
        ));
        assert!(matches!(
            apply_range_filter(&source, &[("tempo", (0.0, 1.0))]),
            Err(MoodError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_equality_filter() {
        let source = catalog();
        let jazz = apply_equality_filter(&source, &[("genre", Value::from("jazz"))]).unwrap();
        assert_eq!(ids(&jazz), vec!["c"]);

        let exact = apply_equality_filter(
            &source,
            &[("danceability", Value::Number(0.5)), ("id", Value::from("b"))],
        )
        .unwrap();
        assert_eq!(ids(&exact), vec!["b"]);

        let none = apply_equality_filter(&source, &[("id", Value::from("zzz"))]).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_equality_rejects_malformed_criteria() {
        let source = catalog();
        assert!(matches!(
            apply_equality_filter(&source, &[("energy", Value::from("loud"))]),
            Err(MoodError::InvalidArgument(_))
        ));
        assert!(matches!(
            apply_equality_filter(&source, &[("label", Value::from("x"))]),
            Err(MoodError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_filters_do_not_mutate_input() {
        let source = catalog();
        let before = source.clone();
        let _ = apply_range_filter(&source, &[("energy", (0.0, 0.2))]).unwrap();
        assert_eq!(source, before);
    }
}
