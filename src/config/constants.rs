/// Hard cap on an ingestion request body
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024; // 10 MB

pub const BIND_ADDRESS: &str = "0.0.0.0:3000";

pub const DEFAULT_AVATAR: &str = "https://cdn.discordapp.com/embed/avatars/0.png";

/// Same layout as the pl-PL locale: "18.10.2026, 14:05:03"
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

pub const SESSION_TTL_SECS: u64 = 8 * 60 * 60; // 8 hours

pub const MAX_SESSION_TTL_SECS: u64 = 366 * 24 * 60 * 60;

pub const SESSION_COOKIE: &str = "transcripts_session";

/// Number of leading characters of a transcript id shown on the page
pub const SHORT_ID_LEN: usize = 6;

/// First path segments owned by other routes, never valid transcript ids
pub const RESERVED_PATH_SEGMENTS: &[&str] = &["admin", "api"];
