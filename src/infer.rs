// src/infer.rs
//! Marks events done once their expected duration has passed.
//!
//! Schedule times are local to a fixed UTC offset. Events with a "TBD" time
//! are never inferred, and nothing here ever clears `done`.

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};

use crate::config::TournamentConfig;
use crate::config::consts::SCHEDULE_UTC_OFFSET_HOURS;
use crate::model::ScheduledEvent;

/// The fixed offset schedule times are written in.
pub fn schedule_offset() -> Option<FixedOffset> {
    FixedOffset::east_opt(SCHEDULE_UTC_OFFSET_HOURS * 3600)
}

/// Scheduled start of `ev`, or `None` for a TBD time.
pub fn start_of(ev: &ScheduledEvent) -> Option<DateTime<FixedOffset>> {
    let time = ev.time.time()?;
    ev.date.and_time(time).and_local_timezone(schedule_offset()?).single()
}

/// Has more than the expected duration passed since the start?
pub fn is_elapsed(ev: &ScheduledEvent, now: DateTime<Utc>, cfg: &TournamentConfig) -> bool {
    let Some(start) = start_of(ev) else {
        return false;
    };
    let duration = TimeDelta::minutes(i64::from(cfg.duration_for(&ev.tags)));
    now.signed_duration_since(start) > duration
}

/// Mark every elapsed, not-yet-done event. Returns the ids that flipped.
pub fn mark_elapsed(events: &mut [ScheduledEvent], now: DateTime<Utc>, cfg: &TournamentConfig) -> Vec<String> {
    let mut flipped = Vec::new();
    for ev in events.iter_mut().filter(|e| !e.is_done()) {
        if is_elapsed(ev, now, cfg) {
            ev.mark_done();
            log::info!("Auto-marked done: {}", ev.title);
            flipped.push(ev.id.clone());
        }
    }
    flipped
}
