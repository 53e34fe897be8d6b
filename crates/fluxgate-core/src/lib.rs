//! Usage aggregation and charting pipeline for the fluxgate panel.
//!
//! This crate owns the domain model and the transformations between a
//! raw panel usage response and chart-ready data:
//!
//! - **[`resolve_range`]** -- maps a shortcut or custom time-range
//!   selection to a concrete query window and bucket granularity.
//! - **[`normalize`]** -- merges possibly-misaligned per-entity series
//!   into a dense, gap-filled, strictly-ordered row sequence; routes
//!   aggregate-only responses through [`distribute`], the even-split
//!   fallback.
//! - **[`format_label`]** / **[`tick_stride`]** -- axis presentation:
//!   locale-aware bucket labels and label thinning that keeps an axis
//!   readable at any bucket count.
//! - **[`resolve_clicked_row`]** / **[`navigate`]** -- drill-down
//!   resolution and clamped prev/next traversal for the detail modal.
//! - **[`convert`]** -- the API boundary where the aggregate-vs-
//!   breakdown decision is made exactly once, producing the tagged
//!   [`StatsSeries`].
//!
//! Everything is synchronous and side-effect free; fetching and
//! rendering belong to `fluxgate-api` and the binaries.

pub mod convert;
pub mod error;
pub mod model;
pub mod usage;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use usage::BYTES_PER_GB;
pub use usage::distribute::distribute;
pub use usage::drilldown::{BucketRef, SelectedBucket, navigate, resolve_clicked_row};
pub use usage::labels::{LabelContext, LabelLocale, format_label, is_open_bucket};
pub use usage::normalize::{normalize, total_usage_gb};
pub use usage::palette::{Rgb, series_color};
pub use usage::range::{granularity_for_span, resolve_range};
pub use usage::ticks::{ViewportClass, tick_stride};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    ChartRow, Entity, Granularity, QueryRange, RangeSelection, Shortcut, StatsSeries, Traffic,
    UsagePoint,
};
