use chrono::NaiveDateTime;

/// Current local wall-clock time, the backend's timestamp format
pub fn now_local() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Truncate to at most `max` characters (not bytes).
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
