//! 时间工具函数 — 业务时区窗口计算
//!
//! Achievement timeframes are anchored in the business timezone; all
//! conversions happen here so the repository layer only ever sees `i64`
//! Unix millis.

use chrono::{DateTime, Datelike, NaiveDate};
use chrono_tz::Tz;

pub const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// 日期 00:00:00 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_hms_opt(0, 0, 0).unwrap();
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

fn local_date(now_millis: i64, tz: Tz) -> NaiveDate {
    DateTime::from_timestamp_millis(now_millis)
        .unwrap_or_else(chrono::Utc::now)
        .with_timezone(&tz)
        .date_naive()
}

/// 当天本地零点 (since local midnight)
pub fn local_day_start(now_millis: i64, tz: Tz) -> i64 {
    day_start_millis(local_date(now_millis, tz), tz)
}

/// 滚动窗口起点 (rolling N days, plain arithmetic)
pub fn rolling_days_start(now_millis: i64, days: i64) -> i64 {
    now_millis - days * DAY_MILLIS
}

/// 当月一号本地零点 (since first of month)
pub fn local_month_start(now_millis: i64, tz: Tz) -> i64 {
    let date = local_date(now_millis, tz);
    day_start_millis(date.with_day(1).unwrap(), tz)
}

/// 当年一月一号本地零点 (since Jan 1)
pub fn local_year_start(now_millis: i64, tz: Tz) -> i64 {
    let date = local_date(now_millis, tz);
    day_start_millis(NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap(), tz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::UTC;

    // 2026-03-15 12:30:00 UTC
    const NOW: i64 = 1_773_577_800_000;

    #[test]
    fn day_start_is_local_midnight() {
        let start = local_day_start(NOW, UTC);
        assert_eq!(start % DAY_MILLIS, 0);
        assert!(NOW - start < DAY_MILLIS);
        assert!(start <= NOW);
    }

    #[test]
    fn rolling_week_is_seven_days_back() {
        assert_eq!(rolling_days_start(NOW, 7), NOW - 7 * DAY_MILLIS);
    }

    #[test]
    fn month_start_is_first_of_month() {
        let start = local_month_start(NOW, UTC);
        let date = DateTime::from_timestamp_millis(start).unwrap().date_naive();
        assert_eq!(date.day(), 1);
        assert_eq!(date.month(), 3);
    }

    #[test]
    fn year_start_is_january_first() {
        let start = local_year_start(NOW, UTC);
        let date = DateTime::from_timestamp_millis(start).unwrap().date_naive();
        assert_eq!((date.month(), date.day()), (1, 1));
        assert_eq!(date.year(), 2026);
    }

    #[test]
    fn timezone_shifts_day_boundary() {
        // 2026-03-15 00:30 UTC is still 2026-03-14 in New York
        let just_after_utc_midnight = NOW - 12 * 60 * 60 * 1000;
        let ny = chrono_tz::America::New_York;
        let utc_start = local_day_start(just_after_utc_midnight, UTC);
        let ny_start = local_day_start(just_after_utc_midnight, ny);
        assert!(ny_start < utc_start);
    }
}
