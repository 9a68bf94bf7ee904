// src/scrape.rs
//! Fetching pages and turning them into event outcomes.
//!
//! Pages are fetched up front through a small worker pool; everything that
//! writes to events runs afterwards on the calling thread.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use crate::config::consts::{JITTER_MS, REQUEST_PAUSE_MS, WORKERS};
use crate::config::{CountryIndex, Fixture, TournamentConfig};
use crate::core::Fetcher;
use crate::core::html::plain_text;
use crate::model::ScheduledEvent;
use crate::progress::Progress;
use crate::specs::completion::{self, Verdict};
use crate::specs::medalist::{self, EventPage};
use crate::specs::{recap, score};

/// Fetch every distinct URL once. Failed fetches are simply absent from
/// the returned map.
pub fn fetch_all(
    fetcher: &Arc<dyn Fetcher>,
    urls: &[String],
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> HashMap<String, String> {
    let mut seen = HashSet::new();
    let unique: Vec<String> = urls.iter().filter(|u| seen.insert(u.as_str())).cloned().collect();
    let mut pages = HashMap::new();
    if unique.is_empty() {
        return pages;
    }

    if let Some(p) = progress.as_deref_mut() {
        p.begin(unique.len());
    }

    let urls_arc = Arc::new(unique);
    let counter = Arc::new(AtomicUsize::new(0));
    let (res_tx, res_rx) = mpsc::channel::<(String, Option<String>)>();

    let workers = WORKERS.min(urls_arc.len()).max(1);

    for _ in 0..workers {
        let urls = Arc::clone(&urls_arc);
        let idx = Arc::clone(&counter);
        let fetcher = Arc::clone(fetcher);
        let tx = res_tx.clone();

        thread::spawn(move || {
            loop {
                let i = idx.fetch_add(1, Ordering::Relaxed);
                if i >= urls.len() {
                    break;
                }
                let url = &urls[i];
                let page = fetcher.fetch(url);
                if tx.send((url.clone(), page)).is_err() {
                    break;
                }
                let jitter = (i as u64) % JITTER_MS;
                thread::sleep(Duration::from_millis(REQUEST_PAUSE_MS + jitter)); // be polite
            }
        });
    }
    drop(res_tx); // main thread is sole receiver now

    for _ in 0..urls_arc.len() {
        match res_rx.recv() {
            Ok((url, Some(page))) => {
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(&url);
                }
                pages.insert(url, page);
            }
            Ok((url, None)) => {
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(&url);
                }
            }
            Err(_) => break, // workers ended early; bail gracefully
        }
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    pages
}

/// Where an event's outcome can be read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResultSource<'a> {
    /// Individual medal event: gold medalist.
    Medal { url: String },
    /// Two-team fixture: score against `fixture.opponent`.
    Fixture { url: String, fixture: &'a Fixture },
}

impl ResultSource<'_> {
    pub fn url(&self) -> &str {
        match self {
            ResultSource::Medal { url } | ResultSource::Fixture { url, .. } => url,
        }
    }
}

pub fn source_for<'a>(event_id: &str, cfg: &'a TournamentConfig) -> Option<ResultSource<'a>> {
    if let Some(slug) = cfg.event_pages.get(event_id) {
        return Some(ResultSource::Medal { url: cfg.page_url(slug) });
    }
    cfg.fixtures
        .get(event_id)
        .map(|fixture| ResultSource::Fixture { url: cfg.page_url(&fixture.page), fixture })
}

/// Done events that still lack a result.
pub fn awaiting_result(events: &[ScheduledEvent]) -> impl Iterator<Item = &ScheduledEvent> {
    events.iter().filter(|e| e.is_done() && !e.has_result())
}

/// Pages needed to look for outstanding results.
pub fn result_urls(events: &[ScheduledEvent], cfg: &TournamentConfig) -> Vec<String> {
    awaiting_result(events)
        .filter_map(|e| source_for(&e.id, cfg))
        .map(|s| s!(s.url()))
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventOutcome {
    pub result: Option<String>,
    pub desc: Option<String>,
}

/// Read one event page. `None` when the page still talks about the event
/// in the future tense.
pub fn read_outcome(page: &str, source: &ResultSource<'_>, cfg: &TournamentConfig, idx: &CountryIndex) -> Option<EventOutcome> {
    let text = plain_text(page);
    if completion::classify(&text) == Verdict::Upcoming {
        return None;
    }

    let outcome = match source {
        ResultSource::Medal { .. } => {
            let winner = medalist::extract(&EventPage { markup: page, text: &text }, idx);
            EventOutcome {
                desc: recap::extract(page, winner.as_ref().map(|w| w.name.as_str())),
                result: winner.map(|w| w.result_tag()),
            }
        }
        ResultSource::Fixture { fixture, .. } => {
            // recap only alongside a score
            let team = &cfg.tracked.name;
            match score::extract(&text, team, &fixture.opponent) {
                Some(score) => EventOutcome {
                    result: Some(score.result_string(&cfg.tracked.code)),
                    desc: recap::for_fixture(page, team, &fixture.opponent),
                },
                None => EventOutcome::default(),
            }
        }
    };
    Some(outcome)
}

/// Write outcomes for every done, result-less event whose page was fetched.
/// Returns the ids that received a result.
pub fn collect_results(
    events: &mut [ScheduledEvent],
    pages: &HashMap<String, String>,
    cfg: &TournamentConfig,
    idx: &CountryIndex,
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> Vec<String> {
    let mut updated = Vec::new();

    for ev in events.iter_mut().filter(|e| e.is_done() && !e.has_result()) {
        let Some(source) = source_for(&ev.id, cfg) else { continue };
        let Some(page) = pages.get(source.url()) else {
            log::debug!("{}: page not fetched", ev.id);
            continue;
        };

        let Some(outcome) = read_outcome(page, &source, cfg, idx) else {
            log::info!("{}: page still describes a future event", ev.id);
            if let Some(p) = progress.as_deref_mut() {
                p.item_failed(&ev.title);
            }
            continue;
        };

        match outcome.result {
            Some(result) => {
                log::info!("{}: {result}", ev.id);
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(&format!("{} → {result}", ev.title));
                }
                if ev.record_outcome(result, outcome.desc) {
                    updated.push(ev.id.clone());
                }
            }
            None => {
                log::info!("{}: no result found yet", ev.id);
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(&ev.title);
                }
                ev.record_desc(outcome.desc);
            }
        }
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::model::EventTime;

    struct MapFetcher(HashMap<String, String>);

    impl Fetcher for MapFetcher {
        fn fetch(&self, url: &str) -> Option<String> {
            self.0.get(url).cloned()
        }
    }

    fn done(id: &str) -> ScheduledEvent {
        let mut ev = ScheduledEvent::new(id, id, NaiveDate::from_ymd_opt(2026, 2, 12).unwrap(), EventTime::Tbd);
        ev.mark_done();
        ev
    }

    #[test]
    fn fetch_all_dedupes_and_drops_failures() {
        let map = HashMap::from([(s!("a"), s!("page a")), (s!("b"), s!("page b"))]);
        let fetcher: Arc<dyn Fetcher> = Arc::new(MapFetcher(map));
        let urls = vec![s!("a"), s!("b"), s!("a"), s!("missing")];
        let pages = fetch_all(&fetcher, &urls, None);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages["b"], "page b");
    }

    #[test]
    fn sources_from_config() {
        let cfg = TournamentConfig::default();
        assert!(matches!(source_for("alp-w-dh", &cfg), Some(ResultSource::Medal { .. })));
        match source_for("hoc-w-fin", &cfg) {
            Some(ResultSource::Fixture { fixture, url }) => {
                assert_eq!(fixture.opponent, "Finland");
                assert!(url.starts_with("https://en.wikipedia.org/wiki/Ice_hockey_at_the_2026"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(source_for("xc-m-50", &cfg), None);
    }

    #[test]
    fn urls_only_for_done_events_without_result() {
        let cfg = TournamentConfig::default();
        let mut with_result = done("alp-m-dh");
        with_result.record_outcome(s!("🥇 X"), None);
        let pending = ScheduledEvent::new("alp-w-sl", "", NaiveDate::from_ymd_opt(2026, 2, 18).unwrap(), EventTime::Tbd);
        let events = vec![done("alp-w-dh"), with_result, pending, done("xc-m-50")];
        let urls = result_urls(&events, &cfg);
        assert_eq!(urls, vec![cfg.page_url(&cfg.event_pages["alp-w-dh"])]);
    }

    #[test]
    fn fixture_without_score_gets_no_recap() {
        let cfg = TournamentConfig::default();
        let idx = cfg.index();
        let url = cfg.page_url(&cfg.fixtures["hoc-w-fin"].page);
        let page = "<p>Canada defeated Sweden 4–1 in the opening game of the women's tournament on Thursday.</p>";
        let pages = HashMap::from([(url, s!(page))]);

        let mut events = vec![done("hoc-w-fin"), done("hoc-w-sui")];
        assert!(collect_results(&mut events, &pages, &cfg, &idx, None).is_empty());
        assert!(events.iter().all(|e| e.result().is_none() && e.desc().is_none()));
    }

    #[test]
    fn fixture_recap_is_about_that_game() {
        let cfg = TournamentConfig::default();
        let idx = cfg.index();
        let url = cfg.page_url(&cfg.fixtures["hoc-w-fin"].page);
        let page = "<p>Canada defeated Sweden 4–1 in the opening game of the women's tournament on Thursday.</p>\
            <p>The United States beat Finland on Saturday in front of a full house at Santa Giulia.</p>\
            <p>United States 5–1 (1–0, 3–1, 1–0) Finland</p>";
        let pages = HashMap::from([(url, s!(page))]);

        let mut events = vec![done("hoc-w-fin")];
        assert_eq!(collect_results(&mut events, &pages, &cfg, &idx, None), vec!["hoc-w-fin"]);
        assert_eq!(events[0].result(), Some("USA wins 5-1"));
        assert!(events[0].desc().is_some_and(|d| d.starts_with("The United States beat Finland")));
    }

    #[test]
    fn gate_blocks_and_results_are_written_once() {
        let cfg = TournamentConfig::default();
        let idx = cfg.index();
        let medal_url = cfg.page_url(&cfg.event_pages["alp-w-dh"]);
        let hockey_url = cfg.page_url(&cfg.fixtures["hoc-w-fin"].page);
        let pages = HashMap::from([
            (medal_url, s!("<p>Breezy Johnson of the United States won the gold medal in the downhill at Cortina.</p>")),
            (hockey_url, s!("<p>The game will be held on Friday.</p>")),
        ]);

        let mut events = vec![done("alp-w-dh"), done("hoc-w-fin")];
        let updated = collect_results(&mut events, &pages, &cfg, &idx, None);
        assert_eq!(updated, vec!["alp-w-dh"]);
        assert_eq!(events[0].result(), Some("🥇 JOHNSON (USA)"));
        assert!(events[0].desc().is_some());
        assert_eq!(events[1].result(), None);
        assert_eq!(events[1].desc(), None);

        // second pass changes nothing
        let again = collect_results(&mut events, &pages, &cfg, &idx, None);
        assert!(again.is_empty());
        assert_eq!(events[0].result(), Some("🥇 JOHNSON (USA)"));
    }
}
