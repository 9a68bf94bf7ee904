// src/specs/mod.rs
//! # Page-reading "specs"
//!
//! Each spec knows how to read one kind of page and nothing else. They are
//! pure functions: markup or plain text in, a structured match or `None` out.
//! No fetching, no persistence, no writing to events.
//!
//! ## What lives here
//! - `medal_table` – ranked standings from the sortable medal table, plus the
//!   "events completed" counter on the same page.
//! - `completion` – the tense gate: does the prose say the event is still to come?
//! - `medalist` – gold medalist surname + country code, three strategies in order.
//! - `score` – two-team fixture scores, scoped to the final section when needed.
//! - `recap` – one lead-paragraph sentence describing the outcome.
//! - `schedule` – external free-text schedule → per-day entries, and lining
//!   those entries up with tracked events.
//!
//! ## Conventions
//! - Case-insensitive tag detection via `core::html`; regexes only over
//!   bounded windows or plain text.
//! - Misses are normal. Return `None` (or an empty table) and let the caller
//!   log and retry on the next run.
//! - Tournament specifics (countries, keywords, page names) come from a
//!   `TournamentConfig` passed in, never from globals.
//!
//! ```text
//! runner → scrape::* → core::net fetch → specs::<page>::parse(…)
//!                                       ↘ Option<match>
//!                      ScheduledEvent::record_outcome (outside of specs)
//! ```
pub mod completion;
pub mod medal_table;
pub mod medalist;
pub mod recap;
pub mod schedule;
pub mod score;
