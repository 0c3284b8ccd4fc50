use chrono::{DateTime, Duration, Months, Utc};

/// Trailing window selected by the `range` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeSelector {
    #[default]
    Day,
    Week,
    Month,
    Quarter,
}

impl RangeSelector {
    /// Unknown or absent tokens select the one-day window.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("7d") => Self::Week,
            Some("1m") => Self::Month,
            Some("3m") => Self::Quarter,
            _ => Self::Day,
        }
    }

    /// Oldest timestamp still inside the window ending at `now`.
    ///
    /// Month windows are calendar months, clamped to the last day of a
    /// shorter month (31 Mar minus one month is 28/29 Feb).
    pub fn lower_bound(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Day => now - Duration::days(1),
            Self::Week => now - Duration::days(7),
            Self::Month => sub_months(now, 1),
            Self::Quarter => sub_months(now, 3),
        }
    }
}

fn sub_months(now: DateTime<Utc>, n: u32) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(n))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn recognised_tokens() {
        assert_eq!(RangeSelector::from_param(Some("7d")), RangeSelector::Week);
        assert_eq!(RangeSelector::from_param(Some("1m")), RangeSelector::Month);
        assert_eq!(RangeSelector::from_param(Some("3m")), RangeSelector::Quarter);
    }

    #[test]
    fn unknown_or_missing_falls_back_to_day() {
        for raw in [None, Some(""), Some("1d"), Some("7D"), Some("1y"), Some("7d; DROP TABLE")] {
            assert_eq!(RangeSelector::from_param(raw), RangeSelector::Day, "{raw:?}");
        }
    }

    #[test]
    fn day_and_week_bounds() {
        let now = at(2026, 10, 19, 12);
        assert_eq!(RangeSelector::Day.lower_bound(now), at(2026, 10, 18, 12));
        assert_eq!(RangeSelector::Week.lower_bound(now), at(2026, 10, 12, 12));
    }

    #[test]
    fn month_bounds_are_calendar_months() {
        let now = at(2026, 10, 19, 12);
        assert_eq!(RangeSelector::Month.lower_bound(now), at(2026, 9, 19, 12));
        assert_eq!(RangeSelector::Quarter.lower_bound(now), at(2026, 7, 19, 12));
    }

    #[test]
    fn month_bound_clamps_to_shorter_month() {
        let now = at(2026, 3, 31, 8);
        assert_eq!(RangeSelector::Month.lower_bound(now), at(2026, 2, 28, 8));
    }
}
