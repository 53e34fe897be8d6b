//! Canonical domain model for the usage pipeline.

pub mod entity;
pub mod usage;

pub use entity::Entity;
pub use usage::{
    ChartRow, Granularity, QueryRange, RangeSelection, Shortcut, StatsSeries, Traffic, UsagePoint,
};
