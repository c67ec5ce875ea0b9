use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Formats a server timestamp relative to the local clock.
pub fn format_time(raw: Option<&str>) -> String {
    format_time_at(raw, Local::now().naive_local())
}

/// Same day renders `HH:MM`, same year `MM/DD`, anything older `YYYY/MM/DD`.
/// No timezone normalisation: offsets in the input are dropped, not applied.
pub fn format_time_at(raw: Option<&str>, now: NaiveDateTime) -> String {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return String::new();
    };

    let Some(time) = parse_timestamp(raw) else {
        return raw.to_string();
    };

    if time.date() == now.date() {
        time.format("%H:%M").to_string()
    } else if time.year() == now.year() {
        time.format("%m/%d").to_string()
    } else {
        time.format("%Y/%m/%d").to_string()
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
