//! Minimal HTML-to-text conversion.
//!
//! The upstream pages are small and hand-edited, so the scrapers locate
//! sections with literal markers and only need this module to turn a slice
//! of markup into readable text. Block-level closers become line breaks,
//! every other tag is dropped, and common entities are decoded.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static SCRIPT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());
static STYLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap());
static BR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static PARAGRAPH_END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</(?:p|h[1-6])\s*>").unwrap());
static DIV_END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</div\s*>").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});").unwrap());
static INLINE_WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{00A0}]+").unwrap());
static BLANK_LINES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Convert an HTML fragment to plain text.
///
/// Paragraphs and headings are separated by a blank line, `<br>` and
/// `</div>` by a single newline. Runs of spaces collapse to one, each line
/// is trimmed, and the result is trimmed.
pub fn clean_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let text = SCRIPT_RE.replace_all(html, "");
    let text = STYLE_RE.replace_all(&text, "");
    let text = BR_RE.replace_all(&text, "\n");
    let text = PARAGRAPH_END_RE.replace_all(&text, "\n\n");
    let text = DIV_END_RE.replace_all(&text, "\n");
    let text = TAG_RE.replace_all(&text, "");
    let text = decode_entities(&text);
    let text = INLINE_WS_RE.replace_all(&text, " ");

    let lines = text.lines().map(str::trim).collect::<Vec<_>>().join("\n");
    BLANK_LINES_RE.replace_all(&lines, "\n\n").trim().to_string()
}

/// Decode named and numeric character references.
///
/// Unknown named entities are left as-is.
pub fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            decode_entity(name).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_entity(name: &str) -> Option<String> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    let c = match name {
        "nbsp" => ' ',
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "auml" => 'ä',
        "aring" => 'å',
        "ouml" => 'ö',
        "Auml" => 'Ä',
        "Aring" => 'Å',
        "Ouml" => 'Ö',
        "eacute" => 'é',
        "Eacute" => 'É',
        "uuml" => 'ü',
        "ndash" => '–',
        "mdash" => '—',
        "hellip" => '…',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        "laquo" => '«',
        "raquo" => '»',
        _ => return None,
    };
    Some(c.to_string())
}

/// Collapse every whitespace run (newlines included) to a single space.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
