// src/projection.rs
//! Pace-based projection of the tracked team's final medal counts.
//!
//! Current pace (`actual / fraction completed`) is blended with a prior
//! expectation; the pace weight grows with the fraction completed and is
//! capped, so an early streak never fully overrides the prior.

use crate::config::tournament::TrackedTeam;
use crate::model::{Bounds, Projection};

/// Pace weight per unit of completion, and its ceiling.
const PACE_SLOPE: f64 = 1.5;
const PACE_CAP: f64 = 0.9;

const LOW_FACTOR: f64 = 0.8;
const HIGH_FACTOR: f64 = 1.2;

pub fn pace_weight(fraction: f64) -> f64 {
    (PACE_SLOPE * fraction).min(PACE_CAP)
}

/// Bounds for one metric. `mid` never drops below what is already won.
pub fn blend(actual: u32, fraction: f64, prior: f64) -> Bounds {
    let pace = f64::from(actual) / fraction;
    let w = pace_weight(fraction);
    let mid = (w * pace + (1.0 - w) * prior).round().max(f64::from(actual)) as u32;
    let low = ((LOW_FACTOR * f64::from(mid)).round() as u32).max(actual);
    let high = (HIGH_FACTOR * f64::from(mid)).round() as u32;
    Bounds { low, mid, high }
}

/// Projection from the tracked team's current counts, or `None` before any
/// event has finished.
pub fn project(gold: u32, total: u32, completed: u32, events_total: u32, team: &TrackedTeam) -> Option<Projection> {
    if completed == 0 || events_total == 0 {
        return None;
    }
    let fraction = (f64::from(completed) / f64::from(events_total)).min(1.0);
    Some(Projection {
        gold: blend(gold, fraction, team.prior_gold),
        total: blend(total, fraction, team.prior_total),
    })
}
