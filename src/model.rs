// src/model.rs
//! Records the tracker keeps between runs.
//!
//! Optional fields are `Option`s, never empty strings: "already has a result"
//! is what keeps repeated runs from overwriting anything.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// One row of the standings table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryMedalRecord {
    #[serde(rename = "country")]
    pub name: String,
    pub code: String,
    pub flag: String,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
    pub total: u32,
    #[serde(default)]
    pub rank: u32,
}

/// Start time of an event. Text that isn't a clock time (a note, a
/// different time zone) is kept verbatim and treated like `Tbd`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum EventTime {
    #[default]
    Tbd,
    At(NaiveTime),
    Other(String),
}

impl EventTime {
    const TBD: &'static str = "TBD";

    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            EventTime::At(t) => Some(*t),
            EventTime::Tbd | EventTime::Other(_) => None,
        }
    }

    /// Parse "5:30 AM" / "11:05 pm". Empty or "TBD" is `Tbd`; anything
    /// else is kept as written.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(Self::TBD) {
            return EventTime::Tbd;
        }
        match NaiveTime::parse_from_str(&s.to_ascii_uppercase(), "%I:%M %p") {
            Ok(t) => EventTime::At(t),
            Err(_) => EventTime::Other(s!(s)),
        }
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::Tbd => f.write_str(Self::TBD),
            // "5:30 AM", no leading zero on the hour
            EventTime::At(t) => write!(f, "{}", t.format("%-I:%M %p")),
            EventTime::Other(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for EventTime {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        ser.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EventTime {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(de)?;
        Ok(EventTime::parse(&raw))
    }
}

/// A scheduled event. `done` only ever goes from false to true, and
/// `result`/`desc` are written at most once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: EventTime,
    #[serde(default)]
    done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    desc: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Fields this crate doesn't use, kept for the page renderer.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScheduledEvent {
    pub fn new(id: &str, title: &str, date: NaiveDate, time: EventTime) -> Self {
        Self {
            id: s!(id),
            title: s!(title),
            date,
            time,
            done: false,
            result: None,
            desc: None,
            tags: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| s!(*t)).collect();
        self
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn mark_done(&mut self) {
        self.done = true;
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }

    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }

    /// Record an outcome. Returns false (and changes nothing) when the event
    /// already has a result. A description is only filled in if absent.
    pub fn record_outcome(&mut self, result: String, desc: Option<String>) -> bool {
        if self.result.is_some() {
            return false;
        }
        self.result = Some(result);
        self.record_desc(desc);
        true
    }

    /// Fill in the description if there is none yet.
    pub fn record_desc(&mut self, desc: Option<String>) -> bool {
        match (&self.desc, desc) {
            (None, Some(d)) => {
                self.desc = Some(d);
                true
            }
            _ => false,
        }
    }
}

/// Low/mid/high bounds for one metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Bounds {
    pub low: u32,
    pub mid: u32,
    pub high: u32,
}

/// Projected final gold and total counts for the tracked team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "ProjectionRecord", into = "ProjectionRecord")]
pub struct Projection {
    pub gold: Bounds,
    pub total: Bounds,
}

/// Flat on-disk shape of a [`Projection`].
#[derive(Clone, Copy, Serialize, Deserialize)]
struct ProjectionRecord {
    projected_gold_low: u32,
    projected_gold_mid: u32,
    projected_gold_high: u32,
    projected_total_low: u32,
    projected_total_mid: u32,
    projected_total_high: u32,
}

impl From<ProjectionRecord> for Projection {
    fn from(r: ProjectionRecord) -> Self {
        Projection {
            gold: Bounds { low: r.projected_gold_low, mid: r.projected_gold_mid, high: r.projected_gold_high },
            total: Bounds { low: r.projected_total_low, mid: r.projected_total_mid, high: r.projected_total_high },
        }
    }
}

impl From<Projection> for ProjectionRecord {
    fn from(p: Projection) -> Self {
        ProjectionRecord {
            projected_gold_low: p.gold.low,
            projected_gold_mid: p.gold.mid,
            projected_gold_high: p.gold.high,
            projected_total_low: p.total.low,
            projected_total_mid: p.total.mid,
            projected_total_high: p.total.high,
        }
    }
}

/// Everything persisted between runs.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackerData {
    #[serde(default)]
    pub medal_table: Vec<CountryMedalRecord>,
    #[serde(default)]
    pub schedule: Vec<ScheduledEvent>,
    #[serde(default, rename = "usa_projection", alias = "projection", skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
    #[serde(default)]
    pub events_completed: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_total: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Other top-level fields (athletes, …) are carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TrackerData {
    pub fn team(&self, code: &str) -> Option<&CountryMedalRecord> {
        self.medal_table.iter().find(|m| m.code == code)
    }
}
