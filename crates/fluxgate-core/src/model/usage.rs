// ── Usage pipeline types ──
//
// Range selection, resolved query windows, traffic samples, and the
// dense chart rows the pipeline produces. The response shape is a
// tagged union decided once at the API boundary (see `convert`); no
// consumer re-inspects raw key sets.

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

// ── Granularity ─────────────────────────────────────────────────────

/// Bucket width for a resolved query range.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Granularity {
    Minute,
    Hour,
    Day,
}

impl Granularity {
    /// The width of one bucket at this granularity.
    pub fn bucket_width(self) -> Duration {
        match self {
            Self::Minute => Duration::minutes(1),
            Self::Hour => Duration::hours(1),
            Self::Day => Duration::days(1),
        }
    }
}

// ── Shortcuts & selections ──────────────────────────────────────────

/// A named relative time range with an implied duration.
///
/// `All` has no lower bound and is surfaced to the fetch layer as an
/// omitted start filter.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum Shortcut {
    #[serde(rename = "1h")]
    #[strum(serialize = "1h")]
    OneHour,
    #[serde(rename = "6h")]
    #[strum(serialize = "6h")]
    SixHours,
    #[serde(rename = "24h")]
    #[strum(serialize = "24h")]
    OneDay,
    #[serde(rename = "3d")]
    #[strum(serialize = "3d")]
    ThreeDays,
    #[serde(rename = "1w")]
    #[strum(serialize = "1w")]
    OneWeek,
    #[serde(rename = "2w")]
    #[strum(serialize = "2w")]
    TwoWeeks,
    #[serde(rename = "1m")]
    #[strum(serialize = "1m")]
    OneMonth,
    #[serde(rename = "all")]
    #[strum(serialize = "all")]
    All,
}

impl Shortcut {
    /// How far back this shortcut reaches; `None` for `All`.
    pub fn duration(self) -> Option<Duration> {
        match self {
            Self::OneHour => Some(Duration::hours(1)),
            Self::SixHours => Some(Duration::hours(6)),
            Self::OneDay => Some(Duration::hours(24)),
            Self::ThreeDays => Some(Duration::days(3)),
            Self::OneWeek => Some(Duration::days(7)),
            Self::TwoWeeks => Some(Duration::days(14)),
            Self::OneMonth => Some(Duration::days(30)),
            Self::All => None,
        }
    }
}

/// The user's time-range choice: a shortcut or an explicit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeSelection {
    Shortcut(Shortcut),
    Custom {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
}

/// A resolved query window handed to the fetch layer.
///
/// `start = None` means "no lower bound" (the `all` shortcut).
/// Recomputed on every selection change; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRange {
    pub start: Option<DateTime<Utc>>,
    pub end: DateTime<Utc>,
    pub granularity: Granularity,
}

// ── Samples ─────────────────────────────────────────────────────────

/// Byte counters for one sample, in the two shapes the backend emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Traffic {
    /// Directional counters.
    UpDown { uplink: u64, downlink: u64 },
    /// A single undirected total.
    Total(u64),
}

impl Traffic {
    pub fn total_bytes(self) -> u64 {
        match self {
            Self::UpDown { uplink, downlink } => uplink + downlink,
            Self::Total(total) => total,
        }
    }

    /// Uplink bytes; zero when the sample carried only a total.
    pub fn uplink_bytes(self) -> u64 {
        match self {
            Self::UpDown { uplink, .. } => uplink,
            Self::Total(_) => 0,
        }
    }

    /// Downlink bytes; zero when the sample carried only a total.
    pub fn downlink_bytes(self) -> u64 {
        match self {
            Self::UpDown { downlink, .. } => downlink,
            Self::Total(_) => 0,
        }
    }

    /// Merge two counters for the same bucket.
    ///
    /// Directional pairs add per direction; once a total-only sample is
    /// involved the direction split is unknowable, so the merge degrades
    /// to a total.
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (
                Self::UpDown { uplink, downlink },
                Self::UpDown {
                    uplink: u2,
                    downlink: d2,
                },
            ) => Self::UpDown {
                uplink: uplink + u2,
                downlink: downlink + d2,
            },
            (a, b) => Self::Total(a.total_bytes() + b.total_bytes()),
        }
    }
}

/// One sample: bucket-aligned start instant plus its counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsagePoint {
    pub period_start: DateTime<Utc>,
    pub traffic: Traffic,
}

/// A usage response with its shape decided once, at the API boundary.
///
/// `PerEntity` maps entity key -> unordered samples (sentinel key
/// excluded); `Aggregate` is the single undivided series the backend
/// returns when it cannot attribute traffic to entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatsSeries {
    PerEntity(IndexMap<String, Vec<UsagePoint>>),
    Aggregate(Vec<UsagePoint>),
}

impl StatsSeries {
    /// An empty response (normalizes to no rows).
    pub fn empty() -> Self {
        Self::Aggregate(Vec::new())
    }

    /// True when no sequence contains any sample.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::PerEntity(map) => map.values().all(Vec::is_empty),
            Self::Aggregate(points) => points.is_empty(),
        }
    }
}

// ── Output rows ─────────────────────────────────────────────────────

/// One dense, labeled bucket of the chart matrix.
///
/// Invariant: within one `Vec<ChartRow>`, every row carries exactly the
/// same entity-name key set (the known-entity list at normalization
/// time), rows ascend strictly by `period_start`, and missing samples
/// are explicit zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    pub period_start: DateTime<Utc>,
    pub time_label: String,
    pub usage_gb: IndexMap<String, f64>,
    pub uplink_bytes: IndexMap<String, u64>,
    pub downlink_bytes: IndexMap<String, u64>,
}

impl ChartRow {
    /// Total usage across all entities in this bucket, in GB.
    pub fn total_gb(&self) -> f64 {
        self.usage_gb.values().sum()
    }

    /// True when every counter in this bucket is zero.
    pub fn is_all_zero(&self) -> bool {
        self.usage_gb.values().all(|gb| *gb == 0.0)
            && self.uplink_bytes.values().all(|b| *b == 0)
            && self.downlink_bytes.values().all(|b| *b == 0)
    }
}
