//! Item values and their wire payloads.

pub const TYPE_NUMBER: u16 = 0x0300;
pub const TYPE_NUMBER_RANGE: u16 = 0x0301;
pub const TYPE_TIME: u16 = 0x0400;
pub const TYPE_TIME_RANGE: u16 = 0x0401;
pub const TYPE_TEXT: u16 = 0x0500;
pub const TYPE_TEXT_LIST: u16 = 0x0501;

/// An item value to be written into a synthetic buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemValue {
    Text(Vec<u8>),
    TextList(Vec<Vec<u8>>),
    Number(f64),
    NumberList(Vec<f64>),
    NumberRange {
        list: Vec<f64>,
        ranges: Vec<(f64, f64)>,
    },
    Time([u32; 2]),
    TimeList(Vec<[u32; 2]>),
    /// A zero-length item: written with value length 0 and no type tag.
    Empty,
    /// A type tag followed by arbitrary bytes.
    Raw { type_code: u16, bytes: Vec<u8> },
}

impl ItemValue {
    pub fn text(s: &str) -> ItemValue {
        ItemValue::Text(s.as_bytes().to_vec())
    }

    pub fn text_list(entries: &[&str]) -> ItemValue {
        ItemValue::TextList(entries.iter().map(|s| s.as_bytes().to_vec()).collect())
    }

    /// Wire type code, `None` for [`ItemValue::Empty`].
    pub fn type_code(&self) -> Option<u16> {
        match self {
            ItemValue::Text(_) => Some(TYPE_TEXT),
            ItemValue::TextList(_) => Some(TYPE_TEXT_LIST),
            ItemValue::Number(_) => Some(TYPE_NUMBER),
            ItemValue::NumberList(_) | ItemValue::NumberRange { .. } => Some(TYPE_NUMBER_RANGE),
            ItemValue::Time(_) => Some(TYPE_TIME),
            ItemValue::TimeList(_) => Some(TYPE_TIME_RANGE),
            ItemValue::Empty => None,
            ItemValue::Raw { type_code, .. } => Some(*type_code),
        }
    }

    /// Encodes the value bytes that follow the type tag.
    pub fn encode_payload(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            ItemValue::Text(bytes) => out.extend_from_slice(bytes),
            ItemValue::TextList(entries) => {
                put_u16(&mut out, entries.len() as u16);
                for entry in entries {
                    put_u16(&mut out, entry.len() as u16);
                }
                for entry in entries {
                    out.extend_from_slice(entry);
                }
            }
            ItemValue::Number(n) => out.extend_from_slice(&n.to_le_bytes()),
            ItemValue::NumberList(list) => {
                put_u16(&mut out, list.len() as u16);
                put_u16(&mut out, 0);
                for n in list {
                    out.extend_from_slice(&n.to_le_bytes());
                }
            }
            ItemValue::NumberRange { list, ranges } => {
                put_u16(&mut out, list.len() as u16);
                put_u16(&mut out, ranges.len() as u16);
                for n in list {
                    out.extend_from_slice(&n.to_le_bytes());
                }
                for (lower, upper) in ranges {
                    out.extend_from_slice(&lower.to_le_bytes());
                    out.extend_from_slice(&upper.to_le_bytes());
                }
            }
            ItemValue::Time(innards) => put_timedate(&mut out, *innards),
            ItemValue::TimeList(list) => {
                put_u16(&mut out, list.len() as u16);
                put_u16(&mut out, 0);
                for innards in list {
                    put_timedate(&mut out, *innards);
                }
            }
            ItemValue::Empty => {}
            ItemValue::Raw { bytes, .. } => out.extend_from_slice(bytes),
        }
        out
    }

    /// On-wire value length: type tag plus payload, or 0 for an empty item.
    pub fn wire_len(&self) -> usize {
        match self {
            ItemValue::Empty => 0,
            _ => 2 + self.encode_payload().len(),
        }
    }

    /// Encodes the type tag followed by the payload (nothing for an empty item).
    pub fn encode_item(&self) -> Vec<u8> {
        let mut out = Vec::new();
        if let Some(type_code) = self.type_code() {
            put_u16(&mut out, type_code);
            out.extend_from_slice(&self.encode_payload());
        }
        out
    }

    /// A random non-empty value of a random data type.
    pub fn random() -> ItemValue {
        match fastrand::u8(0..6) {
            0 => ItemValue::Text(random_text()),
            1 => ItemValue::TextList((0..fastrand::usize(0..5)).map(|_| random_text()).collect()),
            2 => ItemValue::Number(fastrand::f64() * 1000.0),
            3 => ItemValue::NumberList(
                (0..fastrand::usize(1..6))
                    .map(|_| fastrand::f64() * 1000.0)
                    .collect(),
            ),
            4 => ItemValue::Time(random_timedate()),
            _ => ItemValue::TimeList(
                (0..fastrand::usize(1..4))
                    .map(|_| random_timedate())
                    .collect(),
            ),
        }
    }
}

/// Packs a GMT calendar date and time of day into date/time innards.
pub fn timedate(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    hundredths: u32,
) -> [u32; 2] {
    let time = ((hour * 60 + minute) * 60 + second) * 100 + hundredths;
    [time, julian_day(year, month, day)]
}

/// Julian day number of a proleptic Gregorian calendar date.
pub fn julian_day(year: i32, month: u32, day: u32) -> u32 {
    let a = (14 - month as i32) / 12;
    let y = year + 4800 - a;
    let m = month as i32 + 12 * a - 3;
    let jdn = day as i32 + (153 * m + 2) / 5 + 365 * y + y / 4 - y / 100 + y / 400 - 32045;
    jdn as u32
}

pub(crate) fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub(crate) fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_timedate(out: &mut Vec<u8>, innards: [u32; 2]) {
    put_u32(out, innards[0]);
    put_u32(out, innards[1]);
}

fn random_text() -> Vec<u8> {
    (0..fastrand::usize(0..24))
        .map(|_| fastrand::alphanumeric() as u8)
        .collect()
}

fn random_timedate() -> [u32; 2] {
    timedate(
        fastrand::i32(1990..2040),
        fastrand::u32(1..=12),
        fastrand::u32(1..=28),
        fastrand::u32(0..24),
        fastrand::u32(0..60),
        fastrand::u32(0..60),
        fastrand::u32(0..100),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_julian_day() {
        assert_eq!(julian_day(2000, 1, 1), 2_451_545);
        assert_eq!(julian_day(1970, 1, 1), 2_440_588);
        assert_eq!(julian_day(2024, 3, 15), 2_460_385);
    }

    #[test]
    fn test_item_encoding() {
        let item = ItemValue::text_list(&["ab", "c"]);
        assert_eq!(
            item.encode_item(),
            vec![0x01, 0x05, 2, 0, 2, 0, 1, 0, b'a', b'b', b'c']
        );
        assert_eq!(item.wire_len(), 11);
        assert_eq!(ItemValue::Empty.wire_len(), 0);
        assert!(ItemValue::Empty.encode_item().is_empty());
    }
}
