//! Bucket label rendering.
//!
//! Labels are locale- and timezone-aware; any localized-formatting
//! failure falls back to an ISO-8601 rendering rather than propagating.
//! The most recent, still-accumulating day bucket is labeled with the
//! current wall-clock time instead of midnight so it reads as "live".

use std::fmt::Write;

use chrono::{DateTime, FixedOffset, Locale, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::model::Granularity;

/// Supported label locales.
///
/// `Latin` renders en-US month names; `Farsi` renders fa-IR names.
/// Anything the formatter cannot produce falls back to ISO-8601.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LabelLocale {
    #[default]
    Latin,
    Farsi,
}

impl LabelLocale {
    fn chrono_locale(self) -> Locale {
        match self {
            Self::Latin => Locale::en_US,
            Self::Farsi => Locale::fa_IR,
        }
    }
}

/// Everything label rendering needs besides the bucket itself.
///
/// `now` is captured by the caller once per interaction; the formatter
/// never reads ambient clocks.
#[derive(Debug, Clone, Copy)]
pub struct LabelContext {
    pub locale: LabelLocale,
    pub utc_offset: FixedOffset,
    pub now: DateTime<Utc>,
}

impl LabelContext {
    pub fn new(locale: LabelLocale, utc_offset: FixedOffset, now: DateTime<Utc>) -> Self {
        Self {
            locale,
            utc_offset,
            now,
        }
    }
}

/// True when the bucket starting at `period_start` is still
/// accumulating at `now` (its end lies in the future).
pub fn is_open_bucket(
    period_start: DateTime<Utc>,
    granularity: Granularity,
    now: DateTime<Utc>,
) -> bool {
    period_start + granularity.bucket_width() > now
}

/// Render a human label for a bucket's start instant.
///
/// Minute and hour buckets render a short local time; day buckets
/// render a date, with the open bucket substituting the current
/// wall-clock time for midnight.
pub fn format_label(
    period_start: DateTime<Utc>,
    granularity: Granularity,
    ctx: &LabelContext,
    is_open: bool,
) -> String {
    let local = period_start.with_timezone(&ctx.utc_offset);
    match granularity {
        Granularity::Minute | Granularity::Hour => localized(local, "%H:%M", ctx.locale),
        Granularity::Day => {
            if is_open {
                let now_local = ctx.now.with_timezone(&ctx.utc_offset);
                format!(
                    "{} {}",
                    localized(local, "%e %b", ctx.locale).trim(),
                    localized(now_local, "%H:%M", ctx.locale)
                )
            } else {
                localized(local, "%e %b", ctx.locale).trim().to_owned()
            }
        }
    }
}

/// Locale-aware formatting with an ISO-8601 fallback.
///
/// `DelayedFormat` reports unsupported conversions as a `fmt` error at
/// write time; that error is caught here and never escapes.
fn localized(dt: DateTime<FixedOffset>, fmt: &str, locale: LabelLocale) -> String {
    let mut out = String::new();
    match write!(out, "{}", dt.format_localized(fmt, locale.chrono_locale())) {
        Ok(()) => out,
        Err(_) => dt.format("%Y-%m-%dT%H:%M").to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn ctx_at(now: DateTime<Utc>) -> LabelContext {
        LabelContext::new(LabelLocale::Latin, FixedOffset::east_opt(0).unwrap(), now)
    }

    #[test]
    fn hour_bucket_renders_short_time() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
        let label = format_label(start, Granularity::Hour, &ctx_at(now), false);
        assert_eq!(label, "09:00");
    }

    #[test]
    fn minute_bucket_respects_utc_offset() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap();
        let mut ctx = ctx_at(now);
        ctx.utc_offset = FixedOffset::east_opt(3 * 3600 + 1800).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 15, 0).unwrap();
        let label = format_label(start, Granularity::Minute, &ctx, false);
        assert_eq!(label, "12:45");
    }

    #[test]
    fn closed_day_bucket_renders_date_only() {
        let now = Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let label = format_label(start, Granularity::Day, &ctx_at(now), false);
        assert_eq!(label, "2 Jan");
    }

    #[test]
    fn open_day_bucket_appends_wall_clock_time() {
        let now = Utc.with_ymd_and_hms(2024, 1, 5, 14, 32, 0).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        let label = format_label(start, Granularity::Day, &ctx_at(now), true);
        assert_eq!(label, "5 Jan 14:32");
    }

    #[test]
    fn farsi_locale_formats_without_crashing() {
        let now = Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap();
        let mut ctx = ctx_at(now);
        ctx.locale = LabelLocale::Farsi;
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let label = format_label(start, Granularity::Day, &ctx, false);
        assert!(!label.is_empty());
    }

    #[test]
    fn open_bucket_detection_uses_bucket_width() {
        let now = Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap();
        let today = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        let yesterday = Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap();

        assert!(is_open_bucket(today, Granularity::Day, now));
        assert!(!is_open_bucket(yesterday, Granularity::Day, now));

        let this_hour = Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap();
        assert!(is_open_bucket(this_hour, Granularity::Hour, now));
    }
}
