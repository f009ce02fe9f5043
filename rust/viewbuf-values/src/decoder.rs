//! Decoding of a single type-tagged item value.

use std::sync::Arc;

use viewbuf_bytes::{ByteCursor, ValueReader};
use viewbuf_common::Result;

use crate::{
    data_type::DataType,
    text::{NativeTextDecoder, TextValue, Utf8TextDecoder},
    time::{DateTimeValue, TimeDate, TimeZoneContext},
    value::TypedValue,
};

type DecodeFn = fn(&ValueDecoder, &[u8]) -> Result<TypedValue>;

/// Decode functions, indexed by [`DataType::index`].
const DECODERS: [DecodeFn; DataType::COUNT] = [
    decode_number,
    decode_number_list,
    decode_time,
    decode_time_list,
    decode_text,
    decode_text_list,
];

/// Converts the raw bytes of one item value into a [`TypedValue`].
///
/// Decoding is a pure function of the type code, the value bytes and the decoder
/// configuration, so decoding the same bytes twice always yields equal values.
#[derive(Debug, Clone)]
pub struct ValueDecoder {
    text_decoder: Arc<dyn NativeTextDecoder>,
    time_zone: TimeZoneContext,
    lazy_text: bool,
}

impl ValueDecoder {
    pub fn new(
        text_decoder: Arc<dyn NativeTextDecoder>,
        time_zone: TimeZoneContext,
        lazy_text: bool,
    ) -> ValueDecoder {
        ValueDecoder {
            text_decoder,
            time_zone,
            lazy_text,
        }
    }

    #[inline]
    pub fn time_zone(&self) -> &TimeZoneContext {
        &self.time_zone
    }

    #[inline]
    pub fn lazy_text(&self) -> bool {
        self.lazy_text
    }

    /// Decodes `bytes` (the value without its type tag) according to the wire
    /// `type_code`.
    ///
    /// Unknown type codes produce [`TypedValue::Unrecognized`]; a value whose
    /// declared structure does not fit into `bytes` fails with `CorruptBuffer`.
    pub fn decode(&self, type_code: u16, bytes: &[u8]) -> Result<TypedValue> {
        match DataType::try_from(type_code) {
            Ok(data_type) => self.decode_typed(data_type, bytes),
            Err(e) => {
                log::warn!("skipping item value: {e}");
                Ok(TypedValue::Unrecognized { type_code })
            }
        }
    }

    /// Decodes `bytes` as a value of a known data type.
    ///
    /// Empty bytes decode to [`TypedValue::Absent`], except for text lists, which
    /// decode to an empty list.
    pub fn decode_typed(&self, data_type: DataType, bytes: &[u8]) -> Result<TypedValue> {
        if bytes.is_empty() {
            return Ok(match data_type {
                DataType::TextList => TypedValue::TextList(Vec::new()),
                _ => TypedValue::Absent,
            });
        }
        DECODERS[data_type.index()](self, bytes)
    }

    /// Converts an item name from the native character encoding. Names are
    /// always converted eagerly.
    pub fn decode_name(&self, bytes: &[u8]) -> String {
        self.text_decoder.decode(bytes)
    }

    fn text(&self, bytes: &[u8]) -> TextValue {
        if self.lazy_text {
            TextValue::pending(bytes, Arc::clone(&self.text_decoder))
        } else {
            TextValue::from(self.text_decoder.decode(bytes))
        }
    }
}

impl Default for ValueDecoder {
    fn default() -> Self {
        ValueDecoder::new(Arc::new(Utf8TextDecoder), TimeZoneContext::UTC, false)
    }
}

fn decode_text(decoder: &ValueDecoder, bytes: &[u8]) -> Result<TypedValue> {
    Ok(TypedValue::Text(decoder.text(bytes)))
}

/// Text list layout: `u16` entry count, one `u16` length per entry, then the
/// packed entry bytes.
fn decode_text_list(decoder: &ValueDecoder, bytes: &[u8]) -> Result<TypedValue> {
    let mut cursor = ByteCursor::new(bytes, 0);
    let count = cursor.read::<u16>("text_list.count")? as usize;
    cursor.ensure(count * 2, "text_list.lengths")?;
    let mut lengths = Vec::with_capacity(count);
    for _ in 0..count {
        lengths.push(cursor.read::<u16>("text_list.lengths")? as usize);
    }
    let mut list = Vec::with_capacity(count);
    for len in lengths {
        list.push(decoder.text(cursor.take(len, "text_list.entry")?));
    }
    Ok(TypedValue::TextList(list))
}

fn decode_number(_decoder: &ValueDecoder, bytes: &[u8]) -> Result<TypedValue> {
    Ok(TypedValue::Number(bytes.read_value::<f64>(0, "number")?))
}

fn decode_number_list(_decoder: &ValueDecoder, bytes: &[u8]) -> Result<TypedValue> {
    let list = read_range(bytes, "number_range", 8, |cursor| {
        cursor.read::<f64>("number_range.entry")
    })?;
    Ok(TypedValue::NumberList(list))
}

fn decode_time(decoder: &ValueDecoder, bytes: &[u8]) -> Result<TypedValue> {
    let mut cursor = ByteCursor::new(bytes, 0);
    let raw = TimeDate::read_from(&mut cursor, "time")?;
    Ok(TypedValue::Time(DateTimeValue::new(raw, &decoder.time_zone)))
}

fn decode_time_list(decoder: &ValueDecoder, bytes: &[u8]) -> Result<TypedValue> {
    let list = read_range(bytes, "time_range", TimeDate::SIZE, |cursor| {
        let raw = TimeDate::read_from(cursor, "time_range.entry")?;
        Ok(DateTimeValue::new(raw, &decoder.time_zone))
    })?;
    Ok(TypedValue::TimeList(list))
}

/// Reads a range-encoded list: `u16` list entry count, `u16` range entry count,
/// the list entries, then the range entries as (lower, upper) pairs.
///
/// The result holds the list entries followed by both bounds of every range.
fn read_range<T>(
    bytes: &[u8],
    element: &str,
    entry_size: usize,
    mut read_entry: impl FnMut(&mut ByteCursor<'_>) -> Result<T>,
) -> Result<Vec<T>> {
    let mut cursor = ByteCursor::new(bytes, 0);
    let list_entries = cursor.read::<u16>(element)? as usize;
    let range_entries = cursor.read::<u16>(element)? as usize;
    let total = list_entries + 2 * range_entries;
    cursor.ensure(total * entry_size, element)?;

    let mut values = Vec::with_capacity(total);
    for _ in 0..total {
        values.push(read_entry(&mut cursor)?);
    }
    Ok(values)
}
