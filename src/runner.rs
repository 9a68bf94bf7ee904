// src/runner.rs
//! One update run over the tracker record.
//!
//! Order matters: standings first (they feed the projection), then schedule
//! times, then completion (which needs the corrected times), then results for
//! whatever is now done, then the projection. No step can fail the run;
//! each miss is logged and the previous value stays.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::TournamentConfig;
use crate::core::Fetcher;
use crate::fallback::{self, FallbackClient, FallbackReply};
use crate::model::{Projection, TrackerData};
use crate::progress::Progress;
use crate::specs::{medal_table, schedule};
use crate::{infer, projection, scrape};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StandingsSource {
    Page,
    Fallback,
}

/// What a run changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunReport {
    pub standings: Option<StandingsSource>,
    pub countries: usize,
    pub events_completed: Option<u32>,
    pub times_changed: usize,
    pub marked_done: Vec<String>,
    pub results: Vec<String>,
    pub projection: Option<Projection>,
}

pub struct Runner<'a> {
    cfg: &'a TournamentConfig,
    fetcher: Arc<dyn Fetcher>,
    fallback: Option<FallbackClient>,
}

impl<'a> Runner<'a> {
    pub fn new(cfg: &'a TournamentConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { cfg, fetcher, fallback: None }
    }

    pub fn with_fallback(mut self, fallback: Option<FallbackClient>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn run(
        &self,
        data: &mut TrackerData,
        now: DateTime<Utc>,
        mut progress: Option<&mut dyn Progress>,
    ) -> RunReport {
        let cfg = self.cfg;
        let idx = cfg.index();
        let mut report = RunReport::default();
        let events_total = *data.events_total.get_or_insert(cfg.events_total);

        // Standings
        say(&mut progress, "Fetching medal table…");
        let mut reply: Option<FallbackReply> = None;
        let page = self.fetcher.fetch(&cfg.medal_table_url());
        let rows = page
            .as_deref()
            .map(|doc| medal_table::parse_doc(doc, cfg, &idx))
            .unwrap_or_default();
        // counter lives outside the table
        report.events_completed = page
            .as_deref()
            .and_then(|doc| medal_table::parse_events_completed(doc, events_total));

        if !rows.is_empty() {
            report.standings = Some(StandingsSource::Page);
            report.countries = rows.len();
            data.medal_table = rows;
        } else if let Some(client) = &self.fallback {
            say(&mut progress, "Medal table page gave nothing; trying fallback…");
            reply = client.request(cfg);
            if let Some(r) = &reply {
                let rows = fallback::to_standings(r, cfg);
                if !rows.is_empty() {
                    report.standings = Some(StandingsSource::Fallback);
                    report.countries = rows.len();
                    data.medal_table = rows;
                }
                report.events_completed = report.events_completed.or(r.events_completed);
            }
        } else {
            log::warn!("Medal table scrape failed and no fallback is configured");
        }

        if let Some(n) = report.events_completed {
            data.events_completed = n;
        }
        if let Some(team) = data.team(&cfg.tracked.code) {
            say(
                &mut progress,
                &format!("{} {}: {}G {}S {}B = {}", team.flag, team.code, team.gold, team.silver, team.bronze, team.total),
            );
        }

        // Schedule times
        if let Some(url) = &cfg.schedule_url {
            say(&mut progress, "Checking schedule times…");
            match self.fetcher.fetch(url) {
                Some(doc) => {
                    let days = schedule::parse(&doc, cfg);
                    report.times_changed = schedule::reconcile(&mut data.schedule, &days, cfg);
                }
                None => log::warn!("Schedule page unavailable; times unchanged"),
            }
        }

        // Completion
        report.marked_done = infer::mark_elapsed(&mut data.schedule, now, cfg);

        // Results
        if let Some(r) = &reply {
            report.results.extend(fallback::apply_results(&mut data.schedule, r));
        }
        let urls = scrape::result_urls(&data.schedule, cfg);
        if !urls.is_empty() {
            say(&mut progress, &format!("Checking {} result page(s)…", urls.len()));
            let pages = scrape::fetch_all(&self.fetcher, &urls, progress.as_deref_mut());
            report.results.extend(scrape::collect_results(
                &mut data.schedule,
                &pages,
                cfg,
                &idx,
                progress.as_deref_mut(),
            ));
        }

        // Projection
        let (gold, total) = data.team(&cfg.tracked.code).map(|t| (t.gold, t.total)).unwrap_or((0, 0));
        report.projection = projection::project(gold, total, data.events_completed, events_total, &cfg.tracked);
        if report.projection.is_some() {
            data.projection = report.projection;
        }

        data.last_updated = Some(now.format("%Y-%m-%dT%H:%M:%S+00:00").to_string());
        report
    }
}

fn say(progress: &mut Option<&mut dyn Progress>, msg: &str) {
    log::info!("{msg}");
    if let Some(p) = progress.as_deref_mut() {
        p.log(msg);
    }
}
