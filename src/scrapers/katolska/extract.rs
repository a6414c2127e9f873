//! Section extraction for readings pages.
//!
//! Every section starts right after its heading marker and runs to the
//! nearest following marker in that section's boundary set. The boundary
//! sets encode the page order (reading, psalm, second reading, acclamation,
//! gospel) plus the layout-specific terminals: the Lenten acclamation for the
//! psalm, `eller` and closing containers for the gospel.
//!
//! When a page carries both lectionaries the last heading of each kind is
//! used, since the 2022 texts follow the 1994 ones. That ordering is an
//! observation about the site, not something it promises.

use super::classify::{Marker, MarkerKind, ScannedPage};
use crate::error::{ExtractError, Section};
use crate::html::{clean_html, normalize_ws};
use crate::models::{ExtractedReadings, Layout, Lectionary, PageFormat, Psalm, Reading};
use once_cell::sync::Lazy;
use regex::Regex;

static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<h1\b[^>]*>(.*?)</h1\s*>").unwrap());
static RESPONSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<p\b[^>]*>\s*R\.\s*(.+?)</p\s*>").unwrap());

fn ends_first_reading(kind: MarkerKind) -> bool {
    matches!(
        kind,
        MarkerKind::FirstReading
            | MarkerKind::Reading
            | MarkerKind::Psalm
            | MarkerKind::SecondReading
            | MarkerKind::Acclamation
            | MarkerKind::LentenAcclamation
            | MarkerKind::Gospel
            | MarkerKind::Lectionary { .. }
    )
}

fn ends_second_reading(kind: MarkerKind) -> bool {
    matches!(
        kind,
        MarkerKind::FirstReading
            | MarkerKind::Reading
            | MarkerKind::SecondReading
            | MarkerKind::Acclamation
            | MarkerKind::LentenAcclamation
            | MarkerKind::Gospel
            | MarkerKind::Lectionary { .. }
    )
}

fn ends_gospel(kind: MarkerKind) -> bool {
    matches!(
        kind,
        MarkerKind::Alternative
            | MarkerKind::Gospel
            | MarkerKind::Lectionary { .. }
            | MarkerKind::Terminal
    )
}

/// The psalm runs until the next section; in Lent the acclamation that
/// closes it is `Lovsång` / `Vers före evangeliet` instead of `Halleluja`.
fn psalm_end(format: PageFormat) -> impl Fn(MarkerKind) -> bool {
    let acclamation = if format.lenten {
        MarkerKind::LentenAcclamation
    } else {
        MarkerKind::Acclamation
    };
    move |kind| {
        kind == acclamation
            || matches!(
                kind,
                MarkerKind::Gospel
                    | MarkerKind::Psalm
                    | MarkerKind::FirstReading
                    | MarkerKind::Reading
                    | MarkerKind::SecondReading
            )
    }
}

/// Pick the heading to extract for `kind`.
///
/// Headings introduced by `eller` are alternatives and never picked. With
/// both lectionaries present the last heading wins, otherwise the first.
fn pick(page: &ScannedPage<'_>, kind: MarkerKind, lectionary: Lectionary) -> Option<usize> {
    let mut candidates = page.markers.iter().enumerate().filter(|(i, m)| {
        m.kind == kind && !(*i > 0 && page.markers[i - 1].kind == MarkerKind::Alternative)
    });
    let picked = match lectionary {
        Lectionary::Both => candidates.last(),
        Lectionary::V1994 | Lectionary::V2022 => candidates.next(),
    };
    picked.map(|(i, _)| i)
}

/// Byte range of the body following the heading at `idx`.
fn body_range(page: &ScannedPage<'_>, idx: usize, ends: impl Fn(MarkerKind) -> bool) -> (usize, usize) {
    let start = page.markers[idx].end;
    let end = page.markers[idx + 1..]
        .iter()
        .find(|m| ends(m.kind))
        .map_or(page.content.len(), |m| m.start);
    (start, end)
}

fn reading(
    page: &ScannedPage<'_>,
    kind: MarkerKind,
    lectionary: Lectionary,
    ends: impl Fn(MarkerKind) -> bool,
) -> Option<Reading> {
    let idx = pick(page, kind, lectionary)?;
    let (start, end) = body_range(page, idx, ends);
    let text = clean_html(&page.content[start..end]);
    if text.is_empty() {
        return None;
    }
    Some(Reading {
        reference: page.markers[idx].reference.clone(),
        text,
    })
}

/// Narrow a psalm body to one edition.
///
/// Some feast pages print a single psalm heading followed by both editions,
/// each introduced by its own lectionary note. The text after the 2022 note
/// is used, up to the next note; without a 2022 note, the text before the
/// first note (or after it, when nothing precedes it).
fn psalm_edition(page: &ScannedPage<'_>, start: usize, end: usize) -> (usize, usize) {
    let notes: Vec<&Marker> = page
        .markers
        .iter()
        .filter(|m| m.start >= start && m.start < end)
        .filter(|m| matches!(m.kind, MarkerKind::Lectionary { .. }))
        .collect();
    let until_next = |i: usize| notes.get(i + 1).map_or(end, |n| n.start);

    if let Some(i) = notes
        .iter()
        .position(|m| m.kind == (MarkerKind::Lectionary { is_2022: true }))
    {
        return (notes[i].end, until_next(i));
    }
    match notes.first() {
        Some(first) if clean_html(&page.content[start..first.start]).is_empty() => {
            (first.end, until_next(0))
        }
        Some(first) => (start, first.start),
        None => (start, end),
    }
}

fn psalm(page: &ScannedPage<'_>, format: PageFormat) -> Option<Psalm> {
    let idx = pick(page, MarkerKind::Psalm, format.lectionary)?;
    let (start, end) = body_range(page, idx, psalm_end(format));
    let (start, end) = psalm_edition(page, start, end);

    let content = &page.content[start..end];
    let response = RESPONSE_RE
        .captures(content)
        .map(|c| normalize_ws(&clean_html(&c[1])))
        .unwrap_or_default();

    Some(Psalm {
        reference: page.markers[idx].reference.clone(),
        text: clean_html(content),
        response,
    })
}

/// Extract all reading sections from a readings page.
///
/// Fails with [`ExtractError::Classification`] when the page has no known
/// layout and with [`ExtractError::SectionNotFound`] when the first reading
/// or the gospel is missing. A missing second reading or psalm response is
/// not an error.
pub fn extract_readings(html: &str) -> Result<ExtractedReadings, ExtractError> {
    let title = TITLE_RE
        .captures(html)
        .map(|c| normalize_ws(&clean_html(&c[1])))
        .unwrap_or_default();

    let page = ScannedPage::scan(html);
    let format = page.classify()?;

    let first_kind = match format.layout {
        Layout::SundayOrSolemnity => MarkerKind::FirstReading,
        Layout::Weekday => MarkerKind::Reading,
    };
    let first_reading = reading(&page, first_kind, format.lectionary, ends_first_reading)
        .ok_or(ExtractError::SectionNotFound(Section::FirstReading))?;
    let gospel = reading(&page, MarkerKind::Gospel, format.lectionary, ends_gospel)
        .ok_or(ExtractError::SectionNotFound(Section::Gospel))?;
    let second_reading = reading(
        &page,
        MarkerKind::SecondReading,
        format.lectionary,
        ends_second_reading,
    );
    let psalm = psalm(&page, format);

    Ok(ExtractedReadings {
        title,
        format,
        first_reading,
        psalm,
        second_reading,
        gospel,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEKDAY: &str = include_str!("../../../tests/fixtures/weekday_both_lectionaries.html");
    const SUNDAY: &str = include_str!("../../../tests/fixtures/sunday.html");
    const LENTEN: &str = include_str!("../../../tests/fixtures/lenten_weekday.html");
    const LENTEN_VERS: &str = include_str!("../../../tests/fixtures/lenten_weekday_vers.html");
    const FEAST: &str = include_str!("../../../tests/fixtures/feast_on_weekday.html");
    const NOT_READINGS: &str = include_str!("../../../tests/fixtures/not_a_readings_page.html");

    #[test]
    fn every_layout_yields_first_reading_and_gospel() {
        for html in [WEEKDAY, SUNDAY, LENTEN, LENTEN_VERS, FEAST] {
            let r = extract_readings(html).unwrap();
            assert!(!r.first_reading.text.is_empty());
            assert!(!r.first_reading.reference.is_empty());
            assert!(!r.gospel.text.is_empty());
            assert!(!r.gospel.reference.is_empty());
        }
    }

    #[test]
    fn weekday_prefers_2022_texts() {
        let r = extract_readings(WEEKDAY).unwrap();
        assert_eq!(r.title, "Tisdag den 10 februari 2026");
        assert!(r.first_reading.text.starts_with("Salomo trädde fram"));
        assert!(!r.first_reading.text.contains("Salomo ställde sig"));

        let psalm = r.psalm.unwrap();
        assert_eq!(psalm.reference, "Ps 84:3-5, 10-11");
        assert_eq!(psalm.response, "Hur ljuvlig är din boning, Herre Sebaot.");
        assert!(psalm.text.contains("Min själ trängtar"));
        assert!(!psalm.text.contains("Hur ljuvliga är inte dina boningar"));

        assert!(r.gospel.text.contains("människors stadgar"));
        assert!(!r.gospel.text.contains("Ur Lektionarium"));
    }

    #[test]
    fn weekday_has_no_second_reading() {
        let r = extract_readings(WEEKDAY).unwrap();
        assert!(r.second_reading.is_none());
    }

    #[test]
    fn sunday_sections_and_full_gospel() {
        let r = extract_readings(SUNDAY).unwrap();
        assert_eq!(r.first_reading.reference, "Jes 58:7-10");
        assert!(r.first_reading.text.ends_with("Så lyder Herrens ord."));

        let psalm = r.psalm.unwrap();
        assert_eq!(psalm.response, "Den rättfärdige är ett ljus i mörkret.");
        assert!(!psalm.text.contains("Bröder"));

        let second = r.second_reading.unwrap();
        assert_eq!(second.reference, "1 Kor 2:1-5");
        assert!(second.text.starts_with("Bröder"));
        assert!(!second.text.contains("Halleluja"));

        assert_eq!(r.gospel.reference, "Matt 5:13-16");
        assert!(r.gospel.text.contains("Ni är jordens salt"));
        assert!(!r.gospel.text.contains("kortare"));
        assert!(!r.gospel.text.contains("Katolska kyrkan i Sverige"));
    }

    #[test]
    fn lenten_psalm_stops_at_lovsang() {
        let r = extract_readings(LENTEN).unwrap();
        let psalm = r.psalm.unwrap();
        assert!(psalm.text.contains("Skapa i mig, Gud, ett rent hjärta"));
        assert!(!psalm.text.contains("Vänd om till mig"));
        assert!(!psalm.text.contains("Lovsång"));
        assert!(r.gospel.text.starts_with("Jesus sade till sina lärjungar"));
    }

    #[test]
    fn lenten_psalm_stops_at_verse_before_gospel() {
        let r = extract_readings(LENTEN_VERS).unwrap();
        assert_eq!(r.first_reading.reference, "1 Mos 37:3-4, 12-13a, 17b-28");
        let psalm = r.psalm.unwrap();
        assert_eq!(psalm.reference, "Ps 105:16-21");
        assert_eq!(psalm.response, "Tänk på de under Herren har gjort.");
        assert!(psalm.text.contains("Josef, som såldes till slav."));
        assert!(!psalm.text.contains("Så älskade Gud världen"));
        assert!(!psalm.text.contains("Vers före evangeliet"));
        assert_eq!(r.gospel.reference, "Matt 21:33-43, 45-46");
        assert!(r.gospel.text.starts_with("Jesus sade till översteprästerna"));
        assert!(!r.gospel.text.contains("Katolska kyrkan i Sverige"));
        assert!(r.second_reading.is_none());
    }

    #[test]
    fn feast_on_weekday_uses_last_edition() {
        let r = extract_readings(FEAST).unwrap();
        assert_eq!(r.format.layout, Layout::SundayOrSolemnity);
        assert!(r.first_reading.text.contains("(2022)"));
        assert!(!r.first_reading.text.contains("(1994)"));
        let second = r.second_reading.unwrap();
        assert!(second.text.contains("(2022)"));
        let psalm = r.psalm.unwrap();
        assert!(psalm.text.contains("(2022)"));
        assert!(!psalm.text.contains("(1994)"));
        assert!(r.gospel.text.contains("(2022)"));
    }

    #[test]
    fn psalm_without_response_line() {
        let html = "<main><p><strong>Läsning</strong> Jak 1:1-11</p><p>Jakob hälsar.</p>\
                    <p><strong>Responsoriepsalm</strong> Ps 119</p><p>Lär mig dina stadgar.</p>\
                    <p><strong>Evangelium</strong> Mark 8:11-13</p><p>Fariseerna kom ut.</p></main>";
        let r = extract_readings(html).unwrap();
        let psalm = r.psalm.unwrap();
        assert_eq!(psalm.response, "");
        assert_eq!(psalm.text, "Lär mig dina stadgar.");
    }

    #[test]
    fn missing_psalm_is_not_an_error() {
        let html = "<p><strong>Läsning</strong> Jak 1:1-11</p><p>Jakob hälsar.</p>\
                    <p><strong>Evangelium</strong> Mark 8:11-13</p><p>Fariseerna kom ut.</p>";
        let r = extract_readings(html).unwrap();
        assert!(r.psalm.is_none());
    }

    #[test]
    fn missing_gospel_fails() {
        let html = "<p><strong>Läsning</strong> Jak 1:1-11</p><p>Jakob hälsar.</p>";
        assert_eq!(
            extract_readings(html),
            Err(ExtractError::SectionNotFound(Section::Gospel))
        );
    }

    #[test]
    fn empty_first_reading_fails() {
        let html = "<p><strong>Läsning</strong> Jak 1:1-11</p>\
                    <p><strong>Evangelium</strong> Mark 8:11-13</p><p>Fariseerna kom ut.</p>";
        assert_eq!(
            extract_readings(html),
            Err(ExtractError::SectionNotFound(Section::FirstReading))
        );
    }

    #[test]
    fn unknown_page_fails_classification() {
        assert_eq!(extract_readings(NOT_READINGS), Err(ExtractError::Classification));
    }

    #[test]
    fn extraction_is_deterministic() {
        for html in [WEEKDAY, SUNDAY, LENTEN, LENTEN_VERS, FEAST] {
            assert_eq!(extract_readings(html), extract_readings(html));
        }
    }
}
