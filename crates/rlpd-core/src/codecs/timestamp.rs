// UNIX seconds (big-endian, at most 4 bytes) rendered as ISO-8601 UTC.
//
// A zero timestamp is treated as "unset": it has no rendering, and the
// epoch encodes to the empty byte string. Instants before the epoch have no
// unsigned encoding.
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use super::{be_to_u64, minimal_be};

const MAX_BYTES: usize = 4;

pub fn decode(bytes: &[u8]) -> Option<String> {
    if bytes.len() > MAX_BYTES {
        return None;
    }
    let secs = be_to_u64(bytes);
    if secs == 0 {
        return None;
    }
    let dt = DateTime::<Utc>::from_timestamp(secs as i64, 0)?;
    Some(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

pub fn encode(text: &str) -> Option<Vec<u8>> {
    let secs = parse_seconds(text.trim())?;
    match secs {
        0 => Some(Vec::new()),
        s if s < 0 => None,
        s => Some(minimal_be(s as u64)),
    }
}

// Sub-second precision is dropped by `timestamp()`.
fn parse_seconds(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ndt.and_utc().timestamp());
        }
    }
    let day = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(day.and_hms_opt(0, 0, 0)?.and_utc().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_iso_utc() {
        assert_eq!(
            decode(&[0x5e, 0x0b, 0xe1, 0x00]).as_deref(),
            Some("2020-01-01T00:00:00.000Z")
        );
        assert_eq!(decode(&[0x01]).as_deref(), Some("1970-01-01T00:00:01.000Z"));
        assert_eq!(decode(&[0x01, 0, 0, 0, 0]), None);
        assert_eq!(decode(&[]), None);
        assert_eq!(decode(&[0x00]), None);
    }

    #[test]
    fn encode_accepts_common_date_forms() {
        let want = Some(vec![0x5e, 0x0b, 0xe1, 0x00]);
        assert_eq!(encode("2020-01-01T00:00:00.000Z"), want);
        assert_eq!(encode("2020-01-01T09:00:00+09:00"), want);
        assert_eq!(encode("2020-01-01 00:00:00"), want);
        assert_eq!(encode("2020-01-01"), want);
        assert_eq!(encode("2020-01-01T00:00:00.999Z"), want);
        assert_eq!(encode("yesterday"), None);
        assert_eq!(encode("1969-12-31T23:59:59Z"), None);
    }

    #[test]
    fn epoch_encodes_to_empty_bytes() {
        assert_eq!(encode("1970-01-01T00:00:00Z"), Some(Vec::new()));
        assert_eq!(encode("1970-01-01"), Some(Vec::new()));
        assert_eq!(decode(&[]), None);
    }

    #[test]
    fn reencode_is_minimal() {
        let samples: [&[u8]; 3] = [&[0, 0, 0, 0x2a], &[0, 0x01, 0x00], &[0xff, 0xff, 0xff, 0xff]];
        for b in samples {
            let text = decode(b).unwrap();
            assert_eq!(encode(&text), Some(minimal_be(be_to_u64(b))));
        }
    }
}
