//! The usage pipeline: resolve -> normalize -> label -> present.
//!
//! Every function here is a synchronous, pure transformation over
//! already-fetched data; the async fetch boundary lives in
//! `fluxgate-api` and the binaries. Callers pass `now` and viewport
//! class explicitly, so the whole pipeline is trivially testable and
//! safe to re-run.

pub mod distribute;
pub mod drilldown;
pub mod labels;
pub mod normalize;
pub mod palette;
pub mod range;
pub mod ticks;

/// Bytes per GB as charted: 1024^3.
pub const BYTES_PER_GB: f64 = 1_073_741_824.0;
