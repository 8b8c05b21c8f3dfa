//! Eligible game dates for a slip
//!
//! A slip accepts picks on games from its deadline's calendar day through
//! `window_days` days later, inclusive. Dates are taken in the deadline's
//! time zone so a 7pm Eastern deadline doesn't roll over to the next UTC day.

use crate::types::Game;
use chrono::{DateTime, Days, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// Inclusive calendar-date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered, both ends included
    pub fn days(&self) -> u32 {
        let span = (self.end - self.start).num_days();
        u32::try_from(span + 1).unwrap_or(0)
    }

    /// Every date in the window, in order
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Dates eligible for picks on a slip closing at `deadline`.
///
/// A `window_days` that runs past the last date chrono can represent is
/// clamped to `NaiveDate::MAX`; such a window covers fewer than
/// `window_days + 1` days.
pub fn eligible_window<Tz: TimeZone>(deadline: &DateTime<Tz>, window_days: u32) -> DateWindow {
    let start = deadline.date_naive();
    let end = start
        .checked_add_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDate::MAX);
    DateWindow { start, end }
}

/// Games whose local start date falls in the slip's window
pub fn filter_eligible_games<'a, Tz: TimeZone>(
    games: &'a [Game],
    deadline: &DateTime<Tz>,
    window_days: u32,
) -> Vec<&'a Game> {
    let window = eligible_window(deadline, window_days);
    let tz = deadline.timezone();
    games
        .iter()
        .filter(|game| window.contains(game.commence_time.with_timezone(&tz).date_naive()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn make_game(id: &str, commence: DateTime<Utc>) -> Game {
        Game {
            id: id.to_string(),
            league: "NFL".to_string(),
            home_team: "KC".to_string(),
            away_team: "BUF".to_string(),
            commence_time: commence,
        }
    }

    #[test]
    fn test_window_length_is_days_plus_one() {
        let deadline = Utc.with_ymd_and_hms(2026, 10, 19, 17, 0, 0).unwrap();
        for days in [0, 1, 6, 13] {
            let window = eligible_window(&deadline, days);
            assert_eq!(window.start, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
            assert_eq!(window.days(), days + 1);
            assert_eq!(window.dates().count() as u32, days + 1);
        }
    }

    #[test]
    fn test_window_crosses_month_end() {
        let deadline = Utc.with_ymd_and_hms(2026, 10, 29, 12, 0, 0).unwrap();
        let window = eligible_window(&deadline, 6);
        assert_eq!(window.end, NaiveDate::from_ymd_opt(2026, 11, 4).unwrap());
    }

    #[test]
    fn test_window_uses_deadline_time_zone() {
        let eastern = FixedOffset::west_opt(4 * 3600).unwrap();
        // 2026-10-19 21:00 Eastern is already the 20th in UTC
        let deadline = eastern.with_ymd_and_hms(2026, 10, 19, 21, 0, 0).unwrap();
        let window = eligible_window(&deadline, 0);
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());

        let utc_window = eligible_window(&deadline.with_timezone(&Utc), 0);
        assert_eq!(utc_window.start, NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
    }

    #[test]
    fn test_filter_eligible_games() {
        let deadline = Utc.with_ymd_and_hms(2026, 10, 19, 17, 0, 0).unwrap();
        let games = vec![
            make_game("yesterday", Utc.with_ymd_and_hms(2026, 10, 18, 20, 0, 0).unwrap()),
            make_game("same-day", Utc.with_ymd_and_hms(2026, 10, 19, 1, 0, 0).unwrap()),
            make_game("last-day", Utc.with_ymd_and_hms(2026, 10, 21, 23, 59, 0).unwrap()),
            make_game("too-late", Utc.with_ymd_and_hms(2026, 10, 22, 0, 0, 0).unwrap()),
        ];

        let eligible: Vec<&str> = filter_eligible_games(&games, &deadline, 2)
            .into_iter()
            .map(|g| g.id.as_str())
            .collect();
        assert_eq!(eligible, vec!["same-day", "last-day"]);
    }

    #[test]
    fn test_window_clamps_at_last_date() {
        let deadline = NaiveDate::MAX.and_hms_opt(0, 0, 0).unwrap().and_utc() - chrono::Duration::days(2);
        let window = eligible_window(&deadline, 10);
        assert_eq!(window.end, NaiveDate::MAX);
        assert_eq!(window.days(), 3);
        assert!(window.contains(NaiveDate::MAX));
    }

    #[test]
    fn test_filter_empty_list() {
        let deadline = Utc.with_ymd_and_hms(2026, 10, 19, 17, 0, 0).unwrap();
        assert!(filter_eligible_games(&[], &deadline, 6).is_empty());
    }
}
