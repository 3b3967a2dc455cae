//! Leaf representations: four independent byte <-> text converters.
//!
//! Every converter is total; `None` is the only failure signal. Decoding
//! must round-trip through the matching encoder, except that the numeric
//! views (unsigned integer, timestamp) always re-emit the minimal
//! big-endian form.
pub mod hex;
pub mod timestamp;
pub mod uint;
pub mod utf8;

use std::fmt;
use std::str::FromStr;

use crate::options::EditorOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Representation {
    #[default]
    Hex,
    Utf8,
    UnsignedInt,
    Timestamp,
}

impl Representation {
    pub const ALL: [Representation; 4] = [
        Representation::Hex,
        Representation::Utf8,
        Representation::UnsignedInt,
        Representation::Timestamp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Representation::Hex => "hex",
            Representation::Utf8 => "utf8",
            Representation::UnsignedInt => "uint",
            Representation::Timestamp => "timestamp",
        }
    }

    fn slot(self) -> usize {
        match self {
            Representation::Hex => 0,
            Representation::Utf8 => 1,
            Representation::UnsignedInt => 2,
            Representation::Timestamp => 3,
        }
    }

    pub fn decode(self, bytes: &[u8], opts: &EditorOptions) -> Option<String> {
        match self {
            Representation::Hex => Some(hex::decode(bytes, opts.hex_group_bytes)),
            Representation::Utf8 => utf8::decode(bytes, opts.reject_control_chars),
            Representation::UnsignedInt => uint::decode(bytes),
            Representation::Timestamp => timestamp::decode(bytes),
        }
    }

    pub fn encode(self, text: &str) -> Option<Vec<u8>> {
        match self {
            Representation::Hex => hex::encode(text),
            Representation::Utf8 => Some(utf8::encode(text)),
            Representation::UnsignedInt => uint::encode(text),
            Representation::Timestamp => timestamp::encode(text),
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Representation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(Representation::Hex),
            "utf8" | "utf-8" | "string" => Ok(Representation::Utf8),
            "uint" | "int" | "number" => Ok(Representation::UnsignedInt),
            "timestamp" | "time" | "date" => Ok(Representation::Timestamp),
            other => Err(format!("unknown representation: {}", other)),
        }
    }
}

/// Cached renderings of one byte string, one per representation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeafViews {
    views: [Option<String>; 4],
}

impl LeafViews {
    /// Recomputes all four views from `bytes` in one pass.
    pub fn compute(bytes: &[u8], opts: &EditorOptions) -> Self {
        Self {
            views: Representation::ALL.map(|r| r.decode(bytes, opts)),
        }
    }

    pub fn get(&self, repr: Representation) -> Option<&str> {
        self.views[repr.slot()].as_deref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Representation, Option<&str>)> + '_ {
        Representation::ALL.into_iter().map(|r| (r, self.get(r)))
    }
}

/// Minimal big-endian bytes of an unsigned value; zero is a single `0x00`.
pub(crate) fn minimal_be(v: u64) -> Vec<u8> {
    let be = v.to_be_bytes();
    let skip = be.iter().take_while(|b| **b == 0).count().min(7);
    be[skip..].to_vec()
}

pub(crate) fn be_to_u64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_cover_all_representations() {
        let views = LeafViews::compute(b"to", &EditorOptions::default());
        assert_eq!(views.get(Representation::Hex), Some("746f"));
        assert_eq!(views.get(Representation::Utf8), Some("to"));
        assert_eq!(views.get(Representation::UnsignedInt), Some("29807"));
        assert_eq!(
            views.get(Representation::Timestamp),
            Some("1970-01-01T08:16:47.000Z")
        );
        assert_eq!(views.iter().count(), 4);
    }

    #[test]
    fn parse_names() {
        assert_eq!("HEX".parse::<Representation>(), Ok(Representation::Hex));
        assert_eq!("number".parse::<Representation>(), Ok(Representation::UnsignedInt));
        assert!("base64".parse::<Representation>().is_err());
    }

    #[test]
    fn minimal_be_strips_leading_zeros() {
        assert_eq!(minimal_be(0), vec![0]);
        assert_eq!(minimal_be(0x0102), vec![1, 2]);
        assert_eq!(be_to_u64(&[0, 0, 1, 2]), 0x0102);
    }
}
