// ── Wire types ──
//
// Serde models for the panel's management API. Field names follow the
// backend's JSON; optional counters stay optional here -- shape
// decisions (up/down vs. total, breakdown vs. aggregate) are made by
// `fluxgate-core::convert`, not in this crate.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One raw usage sample for one entity and one period.
///
/// The backend emits either an `uplink`/`downlink` pair or a single
/// `total`, depending on what the metrics store recorded for that
/// period. Samples within one entity's list are not guaranteed sorted
/// or unique by `period_start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUsagePoint {
    pub period_start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uplink: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downlink: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// Raw usage response: entity id string -> unordered samples.
///
/// Carries either per-entity series (numeric id keys) or a single
/// aggregate series under the reserved `"-1"` key when the backend
/// cannot break usage down by entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUsageResponse {
    #[serde(default)]
    pub usages: HashMap<String, Vec<RawUsagePoint>>,
}

/// Which entity dimension a usage query is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageScope {
    Nodes,
    Admins,
}

impl UsageScope {
    /// Path segment under `/api/usage/`.
    pub(crate) fn path_segment(self) -> &'static str {
        match self {
            Self::Nodes => "nodes",
            Self::Admins => "admins",
        }
    }
}

/// A proxy node as returned by `GET /api/nodes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// An admin account as returned by `GET /api/admins`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRecord {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub is_sudo: bool,
}
