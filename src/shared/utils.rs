//! Utility functions and helpers

/// Round to a number of decimal places.
///
/// Goes through the decimal rendering, which rounds the exact binary value,
/// so `151.2095` (stored just below the half) becomes `151.209`.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let places = decimals.max(0) as usize;
    format!("{:.*}", places, value).parse().unwrap_or(value)
}

/// Render a coordinate the way earlier deployments wrote snapshot keys:
/// shortest round-trip form, but whole numbers keep a trailing `.0`.
pub fn format_coord(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Current Unix time in milliseconds
pub fn timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Shorten a body for logging: head and tail kept, middle replaced by a byte count
pub fn truncate_body(body: &[u8], head: usize, tail: usize) -> String {
    if body.len() > head + tail + 16 {
        format!(
            "{}...<{} bytes>...{}",
            String::from_utf8_lossy(&body[..head]),
            body.len() - head - tail,
            String::from_utf8_lossy(&body[body.len() - tail..])
        )
    } else {
        String::from_utf8_lossy(body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(-33.86549, 3), -33.865);
        assert_eq!(round_to(151.2096, 3), 151.21);
    }

    #[test]
    fn test_round_to_half_uses_exact_binary_value() {
        assert_eq!(round_to(151.2095, 3), 151.209);
        assert_eq!(round_to(-33.8685, 3), -33.868);
        assert_eq!(round_to(0.1235, 3), 0.123);
    }

    #[test]
    fn test_format_coord() {
        assert_eq!(format_coord(-33.865), "-33.865");
        assert_eq!(format_coord(151.0), "151.0");
        assert_eq!(format_coord(151.21), "151.21");
    }

    #[test]
    fn test_truncate_body_short() {
        assert_eq!(truncate_body(b"{\"a\": 1}", 100, 100), "{\"a\": 1}");
    }

    #[test]
    fn test_truncate_body_long() {
        let body = vec![b'x'; 300];
        let out = truncate_body(&body, 100, 100);
        assert!(out.contains("...<100 bytes>..."));
        assert_eq!(out.len(), 200 + "...<100 bytes>...".len());
    }
}
