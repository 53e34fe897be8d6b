//! Drill-down bucket resolution and traversal.
//!
//! A click on a rendered bucket arrives either as a chart-library row
//! index or as the clicked payload's period start. Resolution is exact
//! (no nearest-match), all-zero buckets never open a detail view, and
//! traversal clamps at both ends without wrapping.

use chrono::{DateTime, Utc};

use crate::model::ChartRow;

/// How the consumer identified the clicked bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketRef {
    Index(usize),
    PeriodStart(DateTime<Utc>),
}

/// A resolved bucket: the row plus its position in the sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedBucket<'a> {
    pub index: usize,
    pub row: &'a ChartRow,
}

/// Resolve a clicked bucket to a row.
///
/// Exact index when in range, else exact period-start match, else
/// `None`. A bucket whose every counter is zero also resolves to `None`
/// -- there is nothing meaningful to show.
pub fn resolve_clicked_row<'a>(
    rows: &'a [ChartRow],
    clicked: &BucketRef,
) -> Option<SelectedBucket<'a>> {
    let index = match *clicked {
        BucketRef::Index(i) => (i < rows.len()).then_some(i)?,
        BucketRef::PeriodStart(t) => rows.iter().position(|r| r.period_start == t)?,
    };
    let row = &rows[index];
    if row.is_all_zero() {
        return None;
    }
    Some(SelectedBucket { index, row })
}

/// Step from `current` by `delta`, clamped to `[0, rows.len() - 1]`.
///
/// Never wraps; `None` only when there are no rows at all.
pub fn navigate(rows: &[ChartRow], current: usize, delta: isize) -> Option<SelectedBucket<'_>> {
    if rows.is_empty() {
        return None;
    }
    let index = current.saturating_add_signed(delta).min(rows.len() - 1);
    Some(SelectedBucket {
        index,
        row: &rows[index],
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    use super::*;

    fn row(h: u32, gb: f64) -> ChartRow {
        let mut usage_gb = IndexMap::new();
        let mut uplink_bytes = IndexMap::new();
        let mut downlink_bytes = IndexMap::new();
        usage_gb.insert("NodeA".to_owned(), gb);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::as_conversions
        )]
        let bytes = (gb * 1_073_741_824.0) as u64;
        uplink_bytes.insert("NodeA".to_owned(), bytes);
        downlink_bytes.insert("NodeA".to_owned(), 0);
        ChartRow {
            period_start: Utc.with_ymd_and_hms(2024, 1, 1, h, 0, 0).unwrap(),
            time_label: format!("{h:02}:00"),
            usage_gb,
            uplink_bytes,
            downlink_bytes,
        }
    }

    fn rows() -> Vec<ChartRow> {
        vec![row(0, 1.0), row(1, 0.0), row(2, 2.5)]
    }

    #[test]
    fn resolves_by_exact_index() {
        let rows = rows();
        let hit = resolve_clicked_row(&rows, &BucketRef::Index(2)).unwrap();
        assert_eq!(hit.index, 2);
        assert_eq!(hit.row.time_label, "02:00");
    }

    #[test]
    fn resolves_by_exact_period_start() {
        let rows = rows();
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let hit = resolve_clicked_row(&rows, &BucketRef::PeriodStart(t)).unwrap();
        assert_eq!(hit.index, 0);
    }

    #[test]
    fn out_of_range_index_does_not_resolve() {
        let rows = rows();
        assert!(resolve_clicked_row(&rows, &BucketRef::Index(3)).is_none());
    }

    #[test]
    fn unmatched_period_start_does_not_resolve() {
        let rows = rows();
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 7, 0, 0).unwrap();
        assert!(resolve_clicked_row(&rows, &BucketRef::PeriodStart(t)).is_none());
    }

    #[test]
    fn all_zero_bucket_does_not_open() {
        // Scenario: click lands on a bucket with zero usage everywhere.
        let rows = rows();
        assert!(resolve_clicked_row(&rows, &BucketRef::Index(1)).is_none());
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let rows = rows();
        assert_eq!(navigate(&rows, 0, -1).unwrap().index, 0);
        assert_eq!(navigate(&rows, 2, 1).unwrap().index, 2);
        assert_eq!(navigate(&rows, 0, 100).unwrap().index, 2);
    }

    #[test]
    fn navigation_steps_between_buckets() {
        let rows = rows();
        assert_eq!(navigate(&rows, 0, 2).unwrap().index, 2);
        assert_eq!(navigate(&rows, 2, -1).unwrap().index, 1);
    }

    #[test]
    fn navigation_over_empty_rows_is_none() {
        assert!(navigate(&[], 0, 1).is_none());
    }
}
