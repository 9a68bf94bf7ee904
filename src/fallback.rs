// src/fallback.rs
//! Fallback standings source: a language-model request with web search.
//!
//! Only used when the medal table page yields nothing and an API key is set.
//! The reply is asked to be bare JSON, but fences and surrounding prose are
//! tolerated. Any failure is logged and comes back as `None`.

use std::env;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::TournamentConfig;
use crate::config::consts::{FALLBACK_API_KEY_ENV, FALLBACK_TIMEOUT_SECS, FALLBACK_URL, USER_AGENT};
use crate::error::Result;
use crate::model::{CountryMedalRecord, ScheduledEvent};
use crate::specs::medal_table::rank_standings;

const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 2000;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct FallbackReply {
    #[serde(default)]
    pub events_completed: Option<u32>,
    #[serde(default)]
    pub medal_table: Vec<ReplyStanding>,
    #[serde(default)]
    pub new_results: Vec<ReplyResult>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ReplyStanding {
    #[serde(default)]
    pub country: Option<String>,
    pub code: String,
    #[serde(default)]
    pub gold: u32,
    #[serde(default)]
    pub silver: u32,
    #[serde(default)]
    pub bronze: u32,
    #[serde(default)]
    pub total: u32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ReplyResult {
    pub event_id_hint: String,
    pub result: String,
}

pub struct FallbackClient {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
}

impl FallbackClient {
    /// `Ok(None)` when no API key is configured.
    pub fn from_env(cfg: &TournamentConfig) -> Result<Option<Self>> {
        let Ok(api_key) = env::var(FALLBACK_API_KEY_ENV) else {
            return Ok(None);
        };
        if api_key.trim().is_empty() {
            return Ok(None);
        }
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(FALLBACK_TIMEOUT_SECS))
            .build()?;
        Ok(Some(Self { client, api_key, model: cfg.fallback_model.clone() }))
    }

    pub fn request(&self, cfg: &TournamentConfig) -> Option<FallbackReply> {
        log::info!("Asking fallback service ({}) for standings", self.model);
        let resp = self
            .client
            .post(FALLBACK_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request_body(&self.model, cfg))
            .send();

        let body: Value = match resp.and_then(|r| r.error_for_status()).and_then(|r| r.json()) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Fallback request failed: {e}");
                return None;
            }
        };

        let reply = parse_reply(&reply_text(&body));
        if reply.is_none() {
            log::warn!("Could not parse fallback reply as JSON");
        }
        reply
    }
}

pub fn prompt(cfg: &TournamentConfig) -> String {
    format!(
        r#"Search for the current {name} medal table and any results from today.

Return ONLY valid JSON with this exact structure (no markdown, no explanation):
{{
  "events_completed": <number>,
  "medal_table": [
    {{"country": "Norway", "code": "NOR", "gold": 0, "silver": 0, "bronze": 0, "total": 0}},
    ...
  ],
  "new_results": [
    {{"event_id_hint": "schedule id like alp-w-sl", "result": "short result like {tag} SHIFFRIN (USA)"}}
  ]
}}

Include ALL countries that have won at least one medal. Sort by gold medals descending."#,
        name = cfg.name,
        tag = crate::config::consts::GOLD_TAG,
    )
}

pub fn request_body(model: &str, cfg: &TournamentConfig) -> Value {
    json!({
        "model": model,
        "max_tokens": MAX_TOKENS,
        "tools": [{"type": "web_search_20250305", "name": "web_search"}],
        "messages": [{"role": "user", "content": prompt(cfg)}],
    })
}

/// Concatenated text blocks of a messages-API response.
pub fn reply_text(response: &Value) -> String {
    response["content"]
        .as_array()
        .map(|blocks| {
            blocks
                .iter()
                .filter(|b| b["type"] == "text")
                .filter_map(|b| b["text"].as_str())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

/// Strip code fences and parse; failing that, parse the outermost
/// `{ … }` span.
pub fn parse_reply(text: &str) -> Option<FallbackReply> {
    let clean = text.replace("```json", "").replace("```", "");
    let clean = clean.trim();
    if let Ok(reply) = serde_json::from_str(clean) {
        return Some(reply);
    }
    let start = clean.find('{')?;
    let end = clean.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&clean[start..=end]).ok()
}

/// Reply rows as standings: names and flags from configuration, ranked
/// like the parsed table. Unknown codes keep the reply's name.
pub fn to_standings(reply: &FallbackReply, cfg: &TournamentConfig) -> Vec<CountryMedalRecord> {
    let mut rows: Vec<CountryMedalRecord> = reply
        .medal_table
        .iter()
        .filter(|r| !r.code.trim().is_empty())
        .map(|r| {
            let code = r.code.trim().to_uppercase();
            let name = cfg
                .country(&code)
                .map(|c| c.name.clone())
                .or_else(|| r.country.clone())
                .unwrap_or_else(|| code.clone());
            CountryMedalRecord {
                name,
                flag: cfg.flag(&code),
                code,
                gold: r.gold,
                silver: r.silver,
                bronze: r.bronze,
                total: r.total,
                rank: 0,
            }
        })
        .collect();
    rank_standings(&mut rows);
    rows
}

/// Apply `new_results` whose hint is exactly the id of a done event
/// without a result. Returns the ids written.
pub fn apply_results(events: &mut [ScheduledEvent], reply: &FallbackReply) -> Vec<String> {
    let mut written = Vec::new();
    for r in &reply.new_results {
        let hint = r.event_id_hint.trim();
        let Some(ev) = events.iter_mut().find(|e| e.id == hint) else { continue };
        if ev.is_done() && ev.record_outcome(s!(r.result.trim()), None) {
            log::info!("{}: {} (fallback)", ev.id, r.result);
            written.push(ev.id.clone());
        }
    }
    written
}
