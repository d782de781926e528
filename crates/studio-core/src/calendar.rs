//! Maps simulation weeks onto calendar dates for display.

use chrono::{Days, NaiveDate};

/// Default first day of week 1.
pub fn default_season_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(1975, 1, 6).unwrap_or(NaiveDate::MIN)
}

/// Calendar date of the first day of `week` (1-based).
pub fn week_start(season_start: NaiveDate, week: u32) -> NaiveDate {
    let offset = u64::from(week.saturating_sub(1)) * 7;
    season_start
        .checked_add_days(Days::new(offset))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_one_is_season_start() {
        let start = default_season_start();
        assert_eq!(week_start(start, 1), start);
        assert_eq!(week_start(start, 0), start);
        assert_eq!(
            week_start(start, 3),
            NaiveDate::from_ymd_opt(1975, 1, 20).unwrap()
        );
    }
}
