//! Stats normalization: sparse per-entity series -> dense chart rows.
//!
//! The output matrix is rectangular: every row carries a value for
//! every known entity, with explicit zeros where the backend had no
//! sample. Stacked-bar rendering must never see a missing series for a
//! present time column.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::debug;

use crate::model::{ChartRow, Entity, QueryRange, StatsSeries, Traffic, UsagePoint};
use crate::usage::BYTES_PER_GB;
use crate::usage::distribute::distribute;
use crate::usage::labels::{LabelContext, format_label, is_open_bucket};

/// Normalize a usage response into ordered, gap-filled chart rows.
///
/// Per-entity responses are aligned on the union of their period
/// starts with exact-match lookup (the backend aligns buckets; there is
/// no interpolation). Aggregate responses go through the even-split
/// distributor. Either way every row gets its `time_label` attached
/// here, and an entirely empty response yields no rows. Pure: safe to
/// call repeatedly with the same inputs.
pub fn normalize(
    range: &QueryRange,
    stats: &StatsSeries,
    entities: &[Entity],
    labels: &LabelContext,
) -> Vec<ChartRow> {
    let mut rows = match stats {
        StatsSeries::PerEntity(map) => normalize_breakdown(map, entities),
        StatsSeries::Aggregate(points) => distribute(points, entities),
    };

    for row in &mut rows {
        let open = is_open_bucket(row.period_start, range.granularity, labels.now);
        row.time_label = format_label(row.period_start, range.granularity, labels, open);
    }
    rows
}

/// Sum of every entity's usage across all rows, in GB.
pub fn total_usage_gb(rows: &[ChartRow]) -> f64 {
    rows.iter().map(ChartRow::total_gb).sum()
}

/// Dense-matrix construction for the per-entity response shape.
#[allow(clippy::cast_precision_loss)]
fn normalize_breakdown(
    map: &IndexMap<String, Vec<UsagePoint>>,
    entities: &[Entity],
) -> Vec<ChartRow> {
    let known: HashSet<&str> = entities.iter().map(|e| e.key.as_str()).collect();

    // Merge each entity's samples by period (duplicates sum), and
    // collect the union of period starts across every sequence.
    let mut merged: HashMap<&str, BTreeMap<DateTime<Utc>, Traffic>> = HashMap::new();
    let mut periods: BTreeSet<DateTime<Utc>> = BTreeSet::new();

    for (key, points) in map {
        for point in points {
            periods.insert(point.period_start);
        }
        if !known.contains(key.as_str()) {
            if !points.is_empty() {
                debug!(entity = %key, samples = points.len(), "skipping samples for unknown entity");
            }
            continue;
        }
        let per_entity = merged.entry(key.as_str()).or_default();
        for point in points {
            per_entity
                .entry(point.period_start)
                .and_modify(|t| *t = t.merge(point.traffic))
                .or_insert(point.traffic);
        }
    }

    periods
        .into_iter()
        .map(|period_start| {
            let mut usage_gb = IndexMap::with_capacity(entities.len());
            let mut uplink_bytes = IndexMap::with_capacity(entities.len());
            let mut downlink_bytes = IndexMap::with_capacity(entities.len());

            for entity in entities {
                let sample = merged
                    .get(entity.key.as_str())
                    .and_then(|per| per.get(&period_start));
                match sample {
                    Some(traffic) => {
                        usage_gb.insert(
                            entity.name.clone(),
                            traffic.total_bytes() as f64 / BYTES_PER_GB,
                        );
                        uplink_bytes.insert(entity.name.clone(), traffic.uplink_bytes());
                        downlink_bytes.insert(entity.name.clone(), traffic.downlink_bytes());
                    }
                    None => {
                        usage_gb.insert(entity.name.clone(), 0.0);
                        uplink_bytes.insert(entity.name.clone(), 0);
                        downlink_bytes.insert(entity.name.clone(), 0);
                    }
                }
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
