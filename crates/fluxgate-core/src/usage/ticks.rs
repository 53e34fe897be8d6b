//! Axis tick thinning.
//!
//! Keeps the number of visible axis labels within a small fixed bound
//! regardless of bucket count: label `i` is drawn iff
//! `i % (stride + 1) == 0`, so a stride of 0 shows every tick.

use chrono::Duration;

use crate::model::RangeSelection;

/// Rendering width class, passed explicitly by the caller (no ambient
/// window reads).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportClass {
    Narrow,
    Wide,
}

/// Visible-label targets per viewport class.
const TARGET_WIDE: usize = 8;
const TARGET_NARROW: usize = 6;

/// Coarser targets once a custom span outgrows a week / a month, where
/// day buckets would otherwise flood the axis.
const TARGET_LONG_CUSTOM: usize = 6;
const TARGET_VERY_LONG_CUSTOM: usize = 5;

/// Pick the label stride for `row_count` buckets.
///
/// Returns 0 ("show every tick") whenever the row count already fits
/// the target. Grows roughly proportionally with the row count so the
/// visible label count stays bounded.
pub fn tick_stride(
    row_count: usize,
    viewport: ViewportClass,
    selection: &RangeSelection,
) -> usize {
    if row_count == 0 {
        return 0;
    }

    let mut target = match viewport {
        ViewportClass::Wide => TARGET_WIDE,
        ViewportClass::Narrow => TARGET_NARROW,
    };

    if let RangeSelection::Custom { from, to } = selection {
        let span = *to - *from;
        if span > Duration::days(30) {
            target = target.min(TARGET_VERY_LONG_CUSTOM);
        } else if span > Duration::days(7) {
            target = target.min(TARGET_LONG_CUSTOM);
        }
    }

    if row_count <= target {
        return 0;
    }
    (row_count - 1) / target
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use crate::model::Shortcut;

    use super::*;

    fn shortcut(s: Shortcut) -> RangeSelection {
        RangeSelection::Shortcut(s)
    }

    fn custom(days: i64) -> RangeSelection {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        RangeSelection::Custom {
            from,
            to: from + Duration::days(days),
        }
    }

    /// Labels drawn for a given stride.
    fn visible(row_count: usize, stride: usize) -> usize {
        (0..row_count).filter(|i| i % (stride + 1) == 0).count()
    }

    #[test]
    fn few_rows_show_every_tick() {
        assert_eq!(
            tick_stride(6, ViewportClass::Narrow, &shortcut(Shortcut::OneHour)),
            0
        );
        assert_eq!(
            tick_stride(8, ViewportClass::Wide, &shortcut(Shortcut::OneDay)),
            0
        );
    }

    #[test]
    fn empty_rows_show_every_tick() {
        assert_eq!(
            tick_stride(0, ViewportClass::Wide, &shortcut(Shortcut::OneDay)),
            0
        );
    }

    #[test]
    fn visible_labels_stay_within_target() {
        for row_count in [9, 24, 60, 168, 720] {
            let stride = tick_stride(row_count, ViewportClass::Wide, &shortcut(Shortcut::OneDay));
            assert!(
                visible(row_count, stride) <= TARGET_WIDE,
                "row_count={row_count} stride={stride}"
            );
        }
    }

    #[test]
    fn narrow_viewport_thins_harder_than_wide() {
        let narrow = tick_stride(60, ViewportClass::Narrow, &shortcut(Shortcut::OneHour));
        let wide = tick_stride(60, ViewportClass::Wide, &shortcut(Shortcut::OneHour));
        assert!(narrow >= wide);
    }

    #[test]
    fn long_custom_spans_use_coarser_targets() {
        let week_plus = tick_stride(20, ViewportClass::Wide, &custom(14));
        assert!(visible(20, week_plus) <= TARGET_LONG_CUSTOM);

        let month_plus = tick_stride(90, ViewportClass::Wide, &custom(90));
        assert!(visible(90, month_plus) <= TARGET_VERY_LONG_CUSTOM);
    }

    #[test]
    fn stride_grows_with_row_count() {
        let selection = shortcut(Shortcut::OneMonth);
        let small = tick_stride(30, ViewportClass::Wide, &selection);
        let large = tick_stride(300, ViewportClass::Wide, &selection);
        assert!(large > small);
    }
}
