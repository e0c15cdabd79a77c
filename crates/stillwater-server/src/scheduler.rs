use std::time::Duration;

use chrono::{NaiveTime, Timelike};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{error, info};

use stillwater_api::notifications::dispatch;
use stillwater_api::state::AppState;

/// Time left until the start of the next wall-clock minute.
fn until_next_minute(now: NaiveTime) -> Duration {
    let into_minute = Duration::new(now.second() as u64, now.nanosecond() % 1_000_000_000);
    Duration::from_secs(60).saturating_sub(into_minute)
}

/// In-process stand-in for an external cron hitting `/send-notifications`.
///
/// Ticks at the top of every minute and runs the dispatcher; unscheduled
/// minutes are no-ops. Missed ticks are skipped rather than replayed.
pub async fn run_scheduler_loop(state: AppState) {
    let start = Instant::now() + until_next_minute(state.local_time());
    let mut interval = tokio::time::interval_at(start, Duration::from_secs(60));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        let now = state.local_time();
        match dispatch(&state, now).await {
            Ok(summary) => {
                if summary.notification_type.is_some() {
                    info!(
                        "Scheduler: {} ({} users, {}/{} pushes)",
                        summary.message,
                        summary.users_notified,
                        summary.push_succeeded,
                        summary.push_attempted
                    );
                }
            }
            Err(e) => {
                error!("Scheduler dispatch error: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleeps_to_the_minute_boundary() {
        let t = NaiveTime::from_hms_milli_opt(6, 59, 45, 500).unwrap();
        assert_eq!(until_next_minute(t), Duration::from_millis(14_500));

        let on_boundary = NaiveTime::from_hms_opt(7, 0, 0).unwrap();
        assert_eq!(until_next_minute(on_boundary), Duration::from_secs(60));
    }

    #[test]
    fn leap_second_does_not_underflow() {
        let leap = NaiveTime::from_hms_milli_opt(23, 59, 59, 1_500).unwrap();
        assert_eq!(until_next_minute(leap), Duration::from_millis(500));
    }
}
