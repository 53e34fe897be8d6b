//! Human-readable traffic formatting helpers.

/// Format a GB value with precision scaled to its magnitude
/// (e.g., "0.42 GB", "12.3 GB", "215 GB").
pub fn fmt_gb(gb: f64) -> String {
    if gb >= 100.0 {
        format!("{gb:.0} GB")
    } else if gb >= 10.0 {
        format!("{gb:.1} GB")
    } else {
        format!("{gb:.2} GB")
    }
}

/// Format bytes into a compact human-readable string (e.g., "245M", "1.2G").
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn fmt_bytes_short(bytes: u64) -> String {
    if bytes >= 1_000_000_000 {
        format!("{:.1}G", bytes as f64 / 1_000_000_000.0)
    } else if bytes >= 1_000_000 {
        format!("{}M", bytes / 1_000_000)
    } else if bytes >= 1_000 {
        format!("{}K", bytes / 1_000)
    } else {
        format!("{bytes}B")
    }
}

/// Format an uplink/downlink byte pair as "245M up / 52M down".
pub fn fmt_up_down(uplink: u64, downlink: u64) -> String {
    format!(
        "{} up / {} down",
        fmt_bytes_short(uplink),
        fmt_bytes_short(downlink)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gb_precision_scales_with_magnitude() {
        assert_eq!(fmt_gb(0.4167), "0.42 GB");
        assert_eq!(fmt_gb(12.34), "12.3 GB");
        assert_eq!(fmt_gb(215.7), "216 GB");
    }

    #[test]
    fn bytes_short_uses_compact_units() {
        assert_eq!(fmt_bytes_short(999), "999B");
        assert_eq!(fmt_bytes_short(245_000_000), "245M");
        assert_eq!(fmt_bytes_short(1_200_000_000), "1.2G");
    }
}
