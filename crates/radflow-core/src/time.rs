/// Canonical-zone ingress adapter.
///
/// Every datetime entering the core passes through here exactly once. The
/// core's temporal type is `DateTime<Utc>`; naive values are promoted using
/// the configured local offset and can never reach the scheduler.
use chrono::{DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Parse a stored timestamp into the canonical zone.
///
/// Accepts RFC 3339 (offset-aware) text, or a naive `YYYY-MM-DD HH:MM:SS`
/// value which is promoted through `offset`. Returns `None` for unparseable
/// input; the snapshot loader substitutes its documented default.
pub fn to_canonical(raw: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(aware) = DateTime::parse_from_rfc3339(raw) {
        return Some(aware.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return promote(naive, offset);
        }
    }

    None
}

/// Anchor a date and a time-of-day to the canonical zone.
pub fn at_local(date: NaiveDate, time: NaiveTime, offset: FixedOffset) -> Option<DateTime<Utc>> {
    promote(date.and_time(time), offset)
}

/// The target date of a run: "today" on the clinic wall clock.
pub fn local_date(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

fn promote(naive: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<Utc>> {
    match offset.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(dt, _) => Some(dt.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}
