// src/config/consts.rs

// Net config
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; medal_watch/0.3)";
pub const FETCH_TIMEOUT_SECS: u64 = 15;
pub const FALLBACK_TIMEOUT_SECS: u64 = 30;
pub const FALLBACK_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const FALLBACK_URL: &str = "https://api.anthropic.com/v1/messages";

// Local files
pub const DEFAULT_DATA_FILE: &str = "data.json";
pub const DEFAULT_LOG_FILE: &str = ".store/debug.log";

// Concurrency
pub const WORKERS: usize = 4;
pub const REQUEST_PAUSE_MS: u64 = 75; // be polite
pub const JITTER_MS: u64 = 50; // extra 0..50 ms

// Schedule times are published in US Eastern (standard) time
pub const SCHEDULE_UTC_OFFSET_HOURS: i32 = -5;
pub const DEFAULT_DURATION_MIN: u32 = 90;

// Medalist search windows (bytes of raw markup)
pub const GOLD_LINK_WINDOW: usize = 600;
pub const SILVER_MARKER_WINDOW: usize = 1500;
pub const RANK_LINK_WINDOW: usize = 800;
pub const COUNTRY_CODE_WINDOW: usize = 500;
pub const MAX_GOLD_MARKERS: usize = 25;

// Recap
pub const RECAP_PARAGRAPHS: usize = 5;
pub const RECAP_MIN_PARAGRAPH: usize = 40;
pub const RECAP_COMMA_MIN: usize = 20;
pub const RECAP_MAX_LEN: usize = 70;
pub const RECAP_CUT_AT: usize = 67;

// Schedule lines longer than this are never sport/subsection headers
pub const SCHEDULE_HEADER_MAX: usize = 40;

// Result tags
pub const GOLD_TAG: &str = "\u{1f947}";
pub const UNKNOWN_FLAG: &str = "\u{1f3f3}\u{fe0f}";
