//! Small helpers shared by the scrapers and sensors.
//!
//! - Swedish and English calendar names used to build upstream URLs
//! - Translation of calendar API terms into Swedish
//! - Character-safe truncation for sensor states and log previews

use chrono::{Datelike, NaiveDate};

/// Maximum length of a sensor state string accepted by the host.
pub const STATE_MAX_LEN: usize = 255;

/// Maximum length of the `*_preview` attributes.
pub const PREVIEW_MAX_LEN: usize = 500;

/// ASCII weekday slugs used in katolskakyrkan.se URLs, Monday first.
pub const SWEDISH_WEEKDAYS: [&str; 7] = [
    "mandag", "tisdag", "onsdag", "torsdag", "fredag", "lordag", "sondag",
];

/// Month slugs used in katolskakyrkan.se URLs.
pub const SWEDISH_MONTHS: [&str; 12] = [
    "januari", "februari", "mars", "april", "maj", "juni", "juli", "augusti", "september",
    "oktober", "november", "december",
];

/// Month names used in the martyrology URLs and day headings.
pub const ENGLISH_MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

pub fn swedish_weekday(date: NaiveDate) -> &'static str {
    SWEDISH_WEEKDAYS[date.weekday().num_days_from_monday() as usize]
}

pub fn swedish_month(date: NaiveDate) -> &'static str {
    SWEDISH_MONTHS[date.month0() as usize]
}

pub fn english_month(date: NaiveDate) -> &'static str {
    ENGLISH_MONTHS[date.month0() as usize]
}

/// English ordinal for a day of month: `1st`, `2nd`, `11th`, `23rd`.
pub fn ordinal(n: u32) -> String {
    if (11..=13).contains(&(n % 100)) {
        return format!("{n}th");
    }
    let suffix = match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Translate a calendar API term (colour, season, rank) into Swedish.
///
/// Unknown terms are returned unchanged so new API vocabulary still shows up.
pub fn translate(term: &str) -> String {
    let swedish = match term.to_lowercase().as_str() {
        "white" => "vit",
        "red" => "röd",
        "violet" => "lila",
        "green" => "grön",
        "rose" => "rosa",
        "gold" => "guld",
        "ordinary" => "under året",
        "advent" => "advent",
        "christmas" => "jul",
        "lent" => "fastan",
        "easter" => "påsk",
        "memorial" => "minnesdag",
        "optional memorial" => "frivillig minnesdag",
        "feast" => "fest",
        "solemnity" => "högtid",
        "commemoration" => "minne",
        "feria" | "ferial" => "vardag",
        "sunday" => "söndag",
        "primary liturgical days" => "främsta liturgiska dag",
        _ => return term.to_string(),
    };
    swedish.to_string()
}

/// Capitalize the first character of a string.
///
/// ```ignore
/// assert_eq!(upcase("fastan"), "Fastan");
/// assert_eq!(upcase(""), "");
/// ```
pub fn upcase(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Truncate text to at most `max_len` characters, ending in `...` when cut.
///
/// Counts characters, not bytes, so Swedish letters are never split.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Truncate a string for logging purposes.
///
/// Long strings keep their first `max` characters and get a
/// `"…(+N bytes)"` suffix.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}
