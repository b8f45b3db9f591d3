use super::constants::*;

pub(crate) fn bind_address() -> String {
    BIND_ADDRESS.to_string()
}

pub(crate) fn max_body_bytes() -> usize {
    MAX_BODY_BYTES
}

pub(crate) fn log_level() -> Option<String> {
    Some("info".to_string())
}

pub(crate) fn default_avatar() -> String {
    DEFAULT_AVATAR.to_string()
}

pub(crate) fn timestamp_format() -> String {
    TIMESTAMP_FORMAT.to_string()
}

pub(crate) fn session_ttl_secs() -> u64 {
    SESSION_TTL_SECS
}

pub(crate) fn default_true() -> bool {
    true
}
