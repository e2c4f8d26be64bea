use crate::models::GlobalStatsRecord;
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime};

/// Advances the streak for a full completion on `today`. Returns `true` when
/// the record changed, `false` when today was already recorded (idempotent
/// re-completion). This is the only place the streak is ever incremented;
/// submission re-persists the record but never calls back in here.
pub fn advance_streak(stats: &mut GlobalStatsRecord, today: NaiveDate) -> bool {
    let last_completed = stats
        .last_completed_date
        .as_deref()
        .and_then(|raw| raw.parse::<NaiveDate>().ok());

    match last_completed {
        Some(date) if date == today => return false,
        Some(date) if date == today - Duration::days(1) => {
            stats.current_streak_days += 1;
        }
        _ => stats.current_streak_days = 1,
    }

    stats.last_completed_date = Some(today.to_string());
    true
}

/// Whole seconds until the next local midnight. Pure; the page script ticks
/// the displayed countdown from this value.
pub fn seconds_until_next_day(now: DateTime<Local>) -> i64 {
    let next_midnight = (now.date_naive() + Duration::days(1)).and_time(NaiveTime::MIN);
    (next_midnight - now.naive_local()).num_seconds().max(0)
}
