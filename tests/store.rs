// tests/store.rs
use std::fs;

use medal_watch::model::TrackerData;
use medal_watch::{Error, store};

const RAW: &str = r#"{
  "medal_table": [
    {"country": "Norway", "code": "NOR", "flag": "🇳🇴", "gold": 5, "silver": 3, "bronze": 2, "total": 10, "rank": 1}
  ],
  "schedule": [
    {"id": "alp-w-dh", "title": "Women's downhill", "date": "2026-02-08", "time": "5:30 AM",
     "done": true, "result": "🥇 JOHNSON (USA)", "tags": ["medal"], "venue": "Cortina"},
    {"id": "cer-open", "title": "Opening ceremony", "date": "2026-02-06", "time": "12:00 PM ET"}
  ],
  "usa_projection": {"projected_gold_low": 8, "projected_gold_mid": 10, "projected_gold_high": 12,
                     "projected_total_low": 24, "projected_total_mid": 30, "projected_total_high": 36},
  "events_completed": 12,
  "athletes": [{"name": "Mikaela Shiffrin"}]
}"#;

#[test]
fn save_then_load_keeps_unknown_fields() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in.json");
    fs::write(&src, RAW).unwrap();

    let data = store::load(&src).unwrap();
    assert_eq!(data.schedule[0].result(), Some("🥇 JOHNSON (USA)"));
    assert_eq!(data.schedule[0].extra["venue"], "Cortina");
    assert_eq!(data.extra["athletes"][0]["name"], "Mikaela Shiffrin");

    let out = dir.path().join("site").join("data.json");
    store::save(&out, &data).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("🥇 JOHNSON"), "glyphs are written as-is");
    assert!(text.contains("\"usa_projection\""), "page builder reads this key");
    assert!(!text.contains("\"projection\""));
    assert!(text.ends_with('\n'));
    assert!(text.contains("\"12:00 PM ET\""));
    assert!(!dir.path().join("site").join("data.json.tmp").exists());

    let again: TrackerData = store::load(&out).unwrap();
    assert_eq!(again, data);
}

#[test]
fn missing_and_broken_files_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    assert!(matches!(store::load(&missing), Err(Error::Io { .. })));

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{ not json").unwrap();
    assert!(matches!(store::load(&broken), Err(Error::Json { .. })));
}
