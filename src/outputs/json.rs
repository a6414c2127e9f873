//! JSON lines output for sensor states.

use crate::sensors::SensorState;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::io::{self, Write};
use tracing::{info, instrument};

/// One poll's worth of sensor states.
#[derive(Debug, Serialize)]
pub struct Poll<'a> {
    pub date: NaiveDate,
    pub updated: DateTime<Utc>,
    pub sensors: &'a [SensorState],
}

/// Write `states` as a single JSON line and flush.
///
/// Callers hand in a locked stdout; nothing else is written there, so the
/// stream can be consumed line by line.
#[instrument(level = "info", skip_all, fields(%date, count = states.len()))]
pub fn write_states<W: Write>(
    out: &mut W,
    date: NaiveDate,
    updated: DateTime<Utc>,
    states: &[SensorState],
) -> io::Result<()> {
    let poll = Poll {
        date,
        updated,
        sensors: states,
    };
    serde_json::to_writer(&mut *out, &poll)?;
    out.write_all(b"\n")?;
    out.flush()?;
    info!("Wrote sensor states");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn writes_one_line_per_poll() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 13).unwrap();
        let updated = Utc.with_ymd_and_hms(2026, 2, 13, 5, 0, 0).unwrap();
        let states = vec![
            SensorState::new("catholic_se_rosary", "Dagens Rosenkransmysterier", "mdi:rosary", "Smärtorika")
                .attr("rotation", "Standard Weekly"),
        ];

        let mut buf = Vec::new();
        write_states(&mut buf, date, updated, &states).unwrap();
        write_states(&mut buf, date, updated, &states).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed["date"], "2026-02-13");
        assert_eq!(parsed["sensors"][0]["state"], "Smärtorika");
        assert_eq!(parsed["sensors"][0]["attributes"]["rotation"], "Standard Weekly");
    }
}
