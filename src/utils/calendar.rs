use chrono::{Datelike, NaiveDate, Weekday};

/// Counts Monday..Friday dates in `[start, end]`. Holidays are not excluded.
pub fn count_working_days(start: NaiveDate, end: NaiveDate) -> i64 {
    if start > end {
        return 0;
    }

    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as i64
}

/// Closed-interval test: a period ending on the day another starts overlaps it.
pub fn intervals_overlap(s1: NaiveDate, e1: NaiveDate, s2: NaiveDate, e2: NaiveDate) -> bool {
    s1 <= e2 && e1 >= s2
}
