//! Aggregate fallback: even split of an undivided series.
//!
//! Invoked only when the backend returned the sentinel series with no
//! per-entity breakdown. Usage is split evenly across known entities --
//! a presentation approximation, not a measurement: the backend could
//! not say which entity produced the traffic, so an even split beats
//! omitting the bars entirely. Downstream consumers must never treat
//! these per-entity values as attributable (billing, quotas).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::model::{ChartRow, Entity, Traffic, UsagePoint};
use crate::usage::BYTES_PER_GB;

/// Split each aggregate bucket evenly across the known entities.
///
/// The divisor clamps to 1, so with no entities the aggregate is
/// attributed to no named series and rows carry empty maps (the caller
/// renders a single undivided series in that case). Summing the
/// per-entity GB shares for one bucket reproduces the aggregate byte
/// value within floating-point tolerance.
///
/// Rows come back sorted and deduplicated; `time_label` is attached by
/// the normalizer afterwards.
#[allow(clippy::cast_precision_loss)]
pub fn distribute(aggregate_points: &[UsagePoint], entities: &[Entity]) -> Vec<ChartRow> {
    let mut merged: BTreeMap<DateTime<Utc>, Traffic> = BTreeMap::new();
    for point in aggregate_points {
        merged
            .entry(point.period_start)
            .and_modify(|t| *t = t.merge(point.traffic))
            .or_insert(point.traffic);
    }

    let divisor = entities.len().max(1) as u64;

    merged
        .into_iter()
        .map(|(period_start, traffic)| {
            let share_gb = traffic.total_bytes() as f64 / divisor as f64 / BYTES_PER_GB;
            let share_up = traffic.uplink_bytes() / divisor;
            let share_down = traffic.downlink_bytes() / divisor;

            let mut usage_gb = IndexMap::with_capacity(entities.len());
            let mut uplink_bytes = IndexMap::with_capacity(entities.len());
            let mut downlink_bytes = IndexMap::with_capacity(entities.len());
            for entity in entities {
                usage_gb.insert(entity.name.clone(), share_gb);
                uplink_bytes.insert(entity.name.clone(), share_up);
                downlink_bytes.insert(entity.name.clone(), share_down);
            }

            ChartRow {
                period_start,
                time_label: String::new(),
                usage_gb,
                uplink_bytes,
                downlink_bytes,
            }
        })
        .collect()
}
