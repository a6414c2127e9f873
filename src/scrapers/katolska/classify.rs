//! Marker scan and page-format classification for readings pages.
//!
//! A readings page is a flat run of paragraphs. Section headings look like
//! `<p><strong>Läsning</strong> Apg 2:14, 22-33</p>`, lectionary notes like
//! `<p><em>Ur Lektionarium 2022</em></p>`, and a short gospel alternative is
//! introduced by a paragraph starting with `eller`. The scan turns the page
//! into an ordered list of [`Marker`]s; classification and extraction both
//! work on that list.

use crate::error::ExtractError;
use crate::html::{decode_entities, normalize_ws};
use crate::models::{Layout, Lectionary, PageFormat};
use once_cell::sync::Lazy;
use regex::Regex;

static HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<p\b[^>]*>\s*<strong>([^<]+)</strong>([^<]*)</p\s*>").unwrap()
});
static LECTIONARY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<p\b[^>]*>\s*<em>\s*(Ur\s+Lektionarium[^<]*)</em>\s*</p\s*>").unwrap()
});
static ALTERNATIVE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<p\b[^>]*>\s*eller\b").unwrap());
static TERMINAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<(?:div|footer|aside)\b").unwrap());
static MAIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<main\b[^>]*>(.*?)</main\s*>").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// `Första läsningen` (Sundays, solemnities, feasts).
    FirstReading,
    /// `Läsning` (weekdays).
    Reading,
    Psalm,
    /// `Andra läsningen` / `2:a läsningen`.
    SecondReading,
    /// `Halleluja`.
    Acclamation,
    /// `Lovsång` / `Vers före evangeliet`, used instead of Halleluja in Lent.
    LentenAcclamation,
    Gospel,
    /// `Ur Lektionarium ...`; `true` when the note names the 2022 edition.
    Lectionary { is_2022: bool },
    /// Paragraph starting with `eller`: the next heading is an alternative.
    Alternative,
    /// Start of a `div`, `footer` or `aside`.
    Terminal,
}

impl MarkerKind {
    fn from_label(label: &str) -> Option<Self> {
        let label = normalize_ws(&decode_entities(label)).to_lowercase();
        let label = label.trim_end_matches(':');
        let kind = match label {
            "första läsningen" | "1:a läsningen" => MarkerKind::FirstReading,
            "läsning" => MarkerKind::Reading,
            "responsoriepsalm" => MarkerKind::Psalm,
            "andra läsningen" | "2:a läsningen" => MarkerKind::SecondReading,
            "halleluja" => MarkerKind::Acclamation,
            "lovsång" | "vers före evangeliet" => MarkerKind::LentenAcclamation,
            "evangelium" => MarkerKind::Gospel,
            _ => return None,
        };
        Some(kind)
    }
}

/// One marker found in the page, with its byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub start: usize,
    pub end: usize,
    /// Text after the heading label, e.g. the scripture reference.
    pub reference: String,
}

/// The content area of a readings page and its markers in document order.
#[derive(Debug, Clone)]
pub struct ScannedPage<'a> {
    pub content: &'a str,
    pub markers: Vec<Marker>,
}

impl<'a> ScannedPage<'a> {
    /// Scan the `<main>` element, or the whole document when there is none.
    pub fn scan(html: &'a str) -> Self {
        let content = MAIN_RE
            .captures(html)
            .and_then(|c| c.get(1))
            .map_or(html, |m| m.as_str());

        let mut markers = Vec::new();
        for caps in HEADING_RE.captures_iter(content) {
            let Some(kind) = MarkerKind::from_label(&caps[1]) else {
                continue;
            };
            let whole = caps.get_match();
            markers.push(Marker {
                kind,
                start: whole.start(),
                end: whole.end(),
                reference: normalize_ws(&decode_entities(&caps[2])),
            });
        }
        for caps in LECTIONARY_RE.captures_iter(content) {
            let whole = caps.get_match();
            markers.push(Marker {
                kind: MarkerKind::Lectionary {
                    is_2022: caps[1].contains("2022"),
                },
                start: whole.start(),
                end: whole.end(),
                reference: normalize_ws(&caps[1]),
            });
        }
        for m in ALTERNATIVE_RE.find_iter(content) {
            markers.push(Marker {
                kind: MarkerKind::Alternative,
                start: m.start(),
                end: m.end(),
                reference: String::new(),
            });
        }
        for m in TERMINAL_RE.find_iter(content) {
            markers.push(Marker {
                kind: MarkerKind::Terminal,
                start: m.start(),
                end: m.end(),
                reference: String::new(),
            });
        }
        markers.sort_by_key(|m| m.start);

        Self { content, markers }
    }

    pub fn has(&self, kind: MarkerKind) -> bool {
        self.markers.iter().any(|m| m.kind == kind)
    }

    /// Classify the page layout and lectionary edition.
    ///
    /// A `Första läsningen` heading wins over `Läsning`; a page with
    /// neither is not a readings page.
    pub fn classify(&self) -> Result<PageFormat, ExtractError> {
        let layout = if self.has(MarkerKind::FirstReading) {
            Layout::SundayOrSolemnity
        } else if self.has(MarkerKind::Reading) {
            Layout::Weekday
        } else {
            return Err(ExtractError::Classification);
        };

        let lenten = self.has(MarkerKind::LentenAcclamation);

        let (mut new, mut old) = (false, false);
        for m in &self.markers {
            if let MarkerKind::Lectionary { is_2022 } = m.kind {
                if is_2022 {
                    new = true;
                } else {
                    old = true;
                }
            }
        }
        let lectionary = match (old, new) {
            (true, true) => Lectionary::Both,
            (true, false) => Lectionary::V1994,
            _ => Lectionary::V2022,
        };

        Ok(PageFormat {
            layout,
            lenten,
            lectionary,
        })
    }
}

/// Classify raw HTML; see [`ScannedPage::classify`].
pub fn classify(html: &str) -> Result<PageFormat, ExtractError> {
    ScannedPage::scan(html).classify()
}
