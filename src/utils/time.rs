use chrono::{DateTime, Duration, Utc};

pub fn time_now() -> String {
    Utc::now().to_rfc3339()
}

pub fn time_now_plus_hours(hours: i64) -> String {
    (Utc::now() + Duration::hours(hours)).to_rfc3339()
}

/// Stored timestamps are RFC 3339 strings; anything unparseable reads as
/// absent rather than failing the request.
pub fn parse_rfc3339(val: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(val)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_now() {
        let now = time_now();
        assert!(parse_rfc3339(&now).is_some());
    }

    #[test]
    fn garbage_reads_as_none() {
        assert!(parse_rfc3339("not a timestamp").is_none());
    }
}
