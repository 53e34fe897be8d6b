// ── API-to-domain conversions ──
//
// Bridges raw `fluxgate_api` responses into canonical domain types.
// The aggregate-vs-breakdown decision is made exactly once, here:
// consumers downstream only ever see the tagged `StatsSeries`.

use fluxgate_api::{AGGREGATE_KEY, AdminRecord, NodeRecord, RawUsagePoint, RawUsageResponse};
use indexmap::IndexMap;
use tracing::debug;

use crate::model::{Entity, StatsSeries, Traffic, UsagePoint};

// ── Samples ─────────────────────────────────────────────────────────

/// Convert one raw sample, or drop it when it carries no counters.
///
/// Directional counters win over `total` when both appear; a sample
/// with neither is meaningless and is skipped.
fn convert_point(raw: &RawUsagePoint) -> Option<UsagePoint> {
    let traffic = match (raw.uplink, raw.downlink, raw.total) {
        (None, None, None) => {
            debug!(period_start = %raw.period_start, "dropping sample without counters");
            return None;
        }
        (None, None, Some(total)) => Traffic::Total(total),
        (uplink, downlink, _) => Traffic::UpDown {
            uplink: uplink.unwrap_or(0),
            downlink: downlink.unwrap_or(0),
        },
    };
    Some(UsagePoint {
        period_start: raw.period_start,
        traffic,
    })
}

fn convert_points(raw: &[RawUsagePoint]) -> Vec<UsagePoint> {
    raw.iter().filter_map(convert_point).collect()
}

// ── Response shape ──────────────────────────────────────────────────

/// Decide the response shape and convert samples.
///
/// Breakdown is present iff at least one non-sentinel key carries a
/// non-empty sequence; otherwise the sentinel series (possibly empty or
/// absent) becomes the aggregate. Per-entity keys are sorted numerically
/// so the tagged map is deterministic regardless of backend hash order.
impl From<&RawUsageResponse> for StatsSeries {
    fn from(raw: &RawUsageResponse) -> Self {
        let has_breakdown = raw
            .usages
            .iter()
            .any(|(key, points)| key != AGGREGATE_KEY && !points.is_empty());

        if has_breakdown {
            let mut keys: Vec<&String> = raw
                .usages
                .keys()
                .filter(|key| key.as_str() != AGGREGATE_KEY)
                .collect();
            keys.sort_by(|a, b| match (a.parse::<i64>(), b.parse::<i64>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => a.cmp(b),
            });

            let mut map = IndexMap::with_capacity(keys.len());
            for key in keys {
                let points = raw
                    .usages
                    .get(key)
                    .map_or_else(Vec::new, |p| convert_points(p));
                map.insert(key.clone(), points);
            }
            Self::PerEntity(map)
        } else {
            let points = raw
                .usages
                .get(AGGREGATE_KEY)
                .map_or_else(Vec::new, |p| convert_points(p));
            Self::Aggregate(points)
        }
    }
}

// ── Entities ────────────────────────────────────────────────────────

/// Build the known-entity list from panel nodes, preserving panel order.
pub fn entities_from_nodes(nodes: &[NodeRecord]) -> Vec<Entity> {
    nodes
        .iter()
        .enumerate()
        .map(|(i, n)| Entity::new(n.id.to_string(), n.name.clone(), i))
        .collect()
}

/// Build the known-entity list from panel admins, preserving panel order.
pub fn entities_from_admins(admins: &[AdminRecord]) -> Vec<Entity> {
    admins
        .iter()
        .enumerate()
        .map(|(i, a)| Entity::new(a.id.to_string(), a.username.clone(), i))
        .collect()
}
