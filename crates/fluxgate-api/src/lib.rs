//! Async client for the fluxgate panel's management API.
//!
//! This crate owns the transport layer of the workspace: it fetches
//! entity lists (nodes, admins) and raw per-period usage counters from
//! the panel backend and hands them to `fluxgate-core` untouched. It
//! deliberately knows nothing about bucketing, normalization, or
//! charting -- raw responses cross the crate boundary exactly as the
//! backend shaped them, sentinel keys and all.
//!
//! - **[`PanelClient`]** -- thin wrapper around `reqwest::Client` with
//!   bearer-token auth, panel URL construction, and typed error
//!   mapping.
//! - **Wire types** ([`types`]) -- serde models for entity records and
//!   the usage response map (keyed by entity id string, with the
//!   reserved `"-1"` aggregate sentinel).
//! - **[`ApiError`]** -- transport/auth/decode taxonomy consumed by
//!   `fluxgate-core` and the binaries.

pub mod client;
pub mod error;
pub mod types;

pub use client::PanelClient;
pub use error::ApiError;
pub use types::{AdminRecord, NodeRecord, RawUsagePoint, RawUsageResponse, UsageScope};

/// Reserved usage-response key meaning "no per-entity breakdown".
///
/// When the panel cannot attribute traffic to individual entities it
/// returns a single series under this key instead of one series per
/// entity id.
pub const AGGREGATE_KEY: &str = "-1";
