//! Cron utility functions for calculating next scheduled times
//!
//! The `cron` crate expects a leading seconds field. Container users write
//! classic 5-field expressions (`0 3 * * *`), so those get `0` seconds prepended.

use chrono::{DateTime, Local, TimeZone, Utc};
use cron::Schedule;
use std::str::FromStr;

use crate::errors::{AppError, AppResult};
use crate::utils::time::GuideTimezone;

/// Prepend a seconds field to classic 5-field expressions
pub fn normalize_cron_expression(expression: &str) -> String {
    let fields: Vec<&str> = expression.split_whitespace().collect();
    if fields.len() == 5 {
        format!("0 {}", fields.join(" "))
    } else {
        fields.join(" ")
    }
}

/// Parse a 5-, 6- or 7-field cron expression
pub fn parse_schedule(expression: &str) -> AppResult<Schedule> {
    let normalized = normalize_cron_expression(expression);
    Schedule::from_str(&normalized).map_err(|e| {
        AppError::configuration(format!("Invalid cron expression '{expression}': {e}"))
    })
}

/// Next time the schedule fires strictly after `after`.
///
/// Cron fields are wall-clock times in `timezone`, like a crontab on the host.
pub fn next_run_after(
    schedule: &Schedule,
    after: DateTime<Utc>,
    timezone: &GuideTimezone,
) -> Option<DateTime<Utc>> {
    match timezone {
        GuideTimezone::Local => next_in_zone(schedule, &after.with_timezone(&Local)),
        GuideTimezone::Named(tz) => next_in_zone(schedule, &after.with_timezone(tz)),
    }
}

fn next_in_zone<Z: TimeZone>(schedule: &Schedule, after: &DateTime<Z>) -> Option<DateTime<Utc>> {
    schedule.after(after).next().map(|next| next.with_timezone(&Utc))
}
