//! Period resolution: selection -> concrete query window + granularity.
//!
//! One policy table decides bucket width for every call site. Spans
//! past 30 days stay at day buckets; the tick-density calculator thins
//! labels instead of the resolver inventing week or month granularities.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::error::CoreError;
use crate::model::{Granularity, QueryRange, RangeSelection, Shortcut};

/// Spans at or below this use minute buckets (enough points for a
/// sparkline on the shortest shortcuts).
const MINUTE_SPAN_CEILING_HOURS: i64 = 2;

/// Spans at or below this use hour buckets.
const HOUR_SPAN_CEILING_HOURS: i64 = 48;

/// Bucket width for a query span. Monotone: wider spans never get
/// finer buckets.
pub fn granularity_for_span(span: Duration) -> Granularity {
    if span <= Duration::hours(MINUTE_SPAN_CEILING_HOURS) {
        Granularity::Minute
    } else if span <= Duration::hours(HOUR_SPAN_CEILING_HOURS) {
        Granularity::Hour
    } else {
        Granularity::Day
    }
}

impl Shortcut {
    /// Bucket width implied by this shortcut.
    pub fn granularity_hint(self) -> Granularity {
        self.duration().map_or(Granularity::Day, granularity_for_span)
    }
}

/// Resolve a range selection against an explicit `now`.
///
/// Shortcuts reach back by their duration from `now` (`all` leaves the
/// start unbounded). Custom ranges keep their endpoints, except that a
/// `to` falling on today extends to end-of-day so the still-open bucket
/// does not vanish between re-queries; any other future end is clamped
/// to `now`. A custom range with `from` after `to` is rejected and no
/// query must be issued.
pub fn resolve_range(
    selection: &RangeSelection,
    now: DateTime<Utc>,
) -> Result<QueryRange, CoreError> {
    match *selection {
        RangeSelection::Shortcut(shortcut) => Ok(QueryRange {
            start: shortcut.duration().map(|d| now - d),
            end: now,
            granularity: shortcut.granularity_hint(),
        }),
        RangeSelection::Custom { from, to } => {
            if from > to {
                return Err(CoreError::InvalidRange { from, to });
            }
            let end = if to.date_naive() == now.date_naive() {
                end_of_day(now)
            } else if to > now {
                now
            } else {
                to
            };
            Ok(QueryRange {
                start: Some(from),
                end,
                granularity: granularity_for_span(to - from),
            })
        }
    }
}

/// Last representable second of `instant`'s UTC day.
fn end_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    let end = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    instant.date_naive().and_time(end).and_utc()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn shortcut_24h_resolves_to_hour_buckets() {
        // Scenario: "24h" at 2024-01-02T10:00:00Z.
        let now = at(2024, 1, 2, 10, 0);
        let range = resolve_range(&RangeSelection::Shortcut(Shortcut::OneDay), now).unwrap();

        assert_eq!(range.start, Some(at(2024, 1, 1, 10, 0)));
        assert_eq!(range.end, now);
        assert_eq!(range.granularity, Granularity::Hour);
    }

    #[test]
    fn shortest_shortcut_uses_minute_buckets() {
        let now = at(2024, 6, 1, 12, 0);
        let range = resolve_range(&RangeSelection::Shortcut(Shortcut::OneHour), now).unwrap();
        assert_eq!(range.granularity, Granularity::Minute);
    }

    #[test]
    fn all_shortcut_has_no_lower_bound() {
        let now = at(2024, 6, 1, 12, 0);
        let range = resolve_range(&RangeSelection::Shortcut(Shortcut::All), now).unwrap();
        assert_eq!(range.start, None);
        assert_eq!(range.granularity, Granularity::Day);
    }

    #[test]
    fn granularity_policy_is_monotone_in_span() {
        assert_eq!(granularity_for_span(Duration::minutes(30)), Granularity::Minute);
        assert_eq!(granularity_for_span(Duration::hours(2)), Granularity::Minute);
        assert_eq!(granularity_for_span(Duration::hours(6)), Granularity::Hour);
        assert_eq!(granularity_for_span(Duration::hours(48)), Granularity::Hour);
        assert_eq!(granularity_for_span(Duration::days(14)), Granularity::Day);
        // Past 30 days the resolver stays at day buckets.
        assert_eq!(granularity_for_span(Duration::days(90)), Granularity::Day);
    }

    #[test]
    fn custom_range_keeps_past_endpoints() {
        let now = at(2024, 3, 15, 9, 0);
        let from = at(2024, 3, 1, 0, 0);
        let to = at(2024, 3, 10, 0, 0);
        let range = resolve_range(&RangeSelection::Custom { from, to }, now).unwrap();

        assert_eq!(range.start, Some(from));
        assert_eq!(range.end, to);
        assert_eq!(range.granularity, Granularity::Day);
    }

    #[test]
    fn custom_to_today_extends_to_end_of_day() {
        let now = at(2024, 3, 15, 9, 30);
        let from = at(2024, 3, 10, 0, 0);
        let to = at(2024, 3, 15, 0, 0);
        let range = resolve_range(&RangeSelection::Custom { from, to }, now).unwrap();

        assert_eq!(
            range.end,
            Utc.with_ymd_and_hms(2024, 3, 15, 23, 59, 59).unwrap()
        );
    }

    #[test]
    fn custom_future_end_beyond_today_clamps_to_now() {
        let now = at(2024, 3, 15, 9, 0);
        let from = at(2024, 3, 1, 0, 0);
        let to = at(2024, 4, 1, 0, 0);
        let range = resolve_range(&RangeSelection::Custom { from, to }, now).unwrap();
        assert_eq!(range.end, now);
    }

    #[test]
    fn inverted_custom_range_is_rejected() {
        let now = at(2024, 3, 15, 9, 0);
        let from = at(2024, 3, 10, 0, 0);
        let to = at(2024, 3, 5, 0, 0);
        let result = resolve_range(&RangeSelection::Custom { from, to }, now);
        assert!(matches!(result, Err(CoreError::InvalidRange { .. })));
    }

    #[test]
    fn short_custom_span_gets_minute_buckets() {
        let now = at(2024, 3, 15, 9, 0);
        let from = at(2024, 3, 15, 7, 0);
        let to = at(2024, 3, 15, 8, 30);
        let range = resolve_range(&RangeSelection::Custom { from, to }, now).unwrap();
        assert_eq!(range.granularity, Granularity::Minute);
    }
}
