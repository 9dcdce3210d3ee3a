// src/app/utils.rs
use chrono::{Local, NaiveDate};

/// Lowercase, drop apostrophes, `&` → "and", collapse everything else to single spaces.
pub(crate) fn normalize_title(s: &str) -> String {
    let mut normalized = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\'' | '’' | '‘' | '`' => {}
            '&' => normalized.push_str(" and "),
            ch if ch.is_alphanumeric() => {
                for lower in ch.to_lowercase() {
                    normalized.push(lower);
                }
            }
            _ => normalized.push(' '),
        }
    }

    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut to at most `max_chars` characters, ending in "…" when shortened.
pub(crate) fn truncate_chars(s: &str, max_chars: usize) -> String {
    let s = s.trim();
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let cut: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

/// Navbar month tag, e.g. "April_2025".
pub(crate) fn month_label(date: NaiveDate) -> String {
    date.format("%B_%Y").to_string()
}

pub(crate) fn current_month_label() -> String {
    month_label(Local::now().date_naive())
}
