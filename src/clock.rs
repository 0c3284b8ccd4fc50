use chrono::{DateTime, FixedOffset, Utc};

/// Source of the current time for handlers and the poller.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// IST, UTC+05:30.
const DISPLAY_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;
const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Render a stored UTC instant as IST wall-clock time, `DD/MM/YYYY HH:MM:SS`.
pub fn display_time(ts: DateTime<Utc>) -> String {
    FixedOffset::east_opt(DISPLAY_OFFSET_SECS).map_or_else(
        || ts.format(DISPLAY_FORMAT).to_string(),
        |ist| ts.with_timezone(&ist).format(DISPLAY_FORMAT).to_string(),
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn display_offset_is_a_valid_fixed_offset() {
        let ist = FixedOffset::east_opt(DISPLAY_OFFSET_SECS).unwrap();
        assert_eq!(ist.local_minus_utc(), 19_800);
    }

    #[test]
    fn display_shifts_to_ist() {
        let ts = Utc.with_ymd_and_hms(2026, 10, 19, 6, 30, 0).unwrap();
        assert_eq!(display_time(ts), "19/10/2026 12:00:00");
    }

    #[test]
    fn display_rolls_over_date() {
        let ts = Utc.with_ymd_and_hms(2026, 12, 31, 20, 15, 9).unwrap();
        assert_eq!(display_time(ts), "01/01/2027 01:45:09");
    }

    #[test]
    fn display_drops_sub_second_precision() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
            + chrono::Duration::milliseconds(999);
        assert_eq!(display_time(ts), "02/01/2026 08:34:05");
    }
}
