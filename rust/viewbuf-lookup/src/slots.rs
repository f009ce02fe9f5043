//! Item slot population shared by value tables and named tables.
//!
//! Both table kinds start with a 4-byte header (`u16` declared total length,
//! `u16` item count) followed by one descriptor per item: a `u16` value length
//! for value tables, a (`u16` name length, `u16` value length) pair for named
//! tables. The item data follows the descriptors: for each item its name bytes
//! (named tables only), then, if the value length is non-zero, a `u16` type tag
//! and `value length - 2` value bytes.

use std::sync::OnceLock;

use viewbuf_bytes::{ByteCursor, ByteRange, LookupBuffer};
use viewbuf_common::{Result, check_data, error::Error};
use viewbuf_values::{DataType, TypedValue, ValueDecoder};

/// Size of the table header.
pub const TABLE_HEADER_SIZE: usize = 4;

/// Size of the type tag that precedes every non-empty item value.
const TYPE_TAG_SIZE: usize = 2;

/// Layout variant of an item table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TableLayout {
    Values,
    Named,
}

impl TableLayout {
    fn descriptor_size(self) -> usize {
        match self {
            TableLayout::Values => 2,
            TableLayout::Named => 4,
        }
    }

    fn element(self) -> &'static str {
        match self {
            TableLayout::Values => "value_table",
            TableLayout::Named => "named_table",
        }
    }
}

/// One item of a table: where its value lives in the lookup buffer, and its
/// decoded value once materialized.
#[derive(Debug)]
pub(crate) struct ItemSlot {
    /// Wire type code; `None` for a zero-length (absent) item.
    type_code: Option<u16>,
    /// Value bytes following the type tag.
    range: ByteRange,
    /// On-wire value length, including the type tag.
    value_len: usize,
    value: OnceLock<TypedValue>,
}

impl ItemSlot {
    fn absent() -> ItemSlot {
        ItemSlot {
            type_code: None,
            range: ByteRange::empty(),
            value_len: 0,
            value: OnceLock::from(TypedValue::Absent),
        }
    }
}

/// The decoded slots of one table, bound to the lookup buffer they refer to.
#[derive(Debug)]
pub(crate) struct SlotTable {
    buffer: LookupBuffer,
    decoder: ValueDecoder,
    total_len: usize,
    slots: Vec<ItemSlot>,
}

/// Result of [`populate_slots`]: the slots, the raw item names (named tables
/// only) and the number of bytes the outer cursor must advance.
pub(crate) struct PopulatedTable {
    pub slots: SlotTable,
    pub names: Vec<String>,
    pub consumed: usize,
}

/// Decodes the table starting at `offset` within `data`, the contents of
/// `buffer`.
///
/// Every declared length is checked against `data` before the bytes it covers
/// are read. When `decode_all_values` is set, each non-empty slot is decoded
/// immediately; otherwise only its byte range is recorded.
pub(crate) fn populate_slots(
    buffer: &LookupBuffer,
    data: &[u8],
    offset: usize,
    layout: TableLayout,
    decoder: &ValueDecoder,
    decode_all_values: bool,
) -> Result<PopulatedTable> {
    let element = layout.element();
    let mut cursor = ByteCursor::new(data, offset);
    cursor.ensure(TABLE_HEADER_SIZE, element)?;
    let total_len = cursor.read::<u16>(element)? as usize;
    let item_count = cursor.read::<u16>(element)? as usize;
    check_data!(total_len, total_len >= TABLE_HEADER_SIZE);
    // The declared table must lie within the buffer.
    cursor.ensure(total_len - TABLE_HEADER_SIZE, element)?;
    cursor.ensure(item_count * layout.descriptor_size(), element)?;

    let mut name_lens = Vec::new();
    let mut value_lens = Vec::with_capacity(item_count);
    for _ in 0..item_count {
        if layout == TableLayout::Named {
            name_lens.push(cursor.read::<u16>("named_table.name_len")? as usize);
        }
        value_lens.push(cursor.read::<u16>("item.value_len")? as usize);
    }

    let mut names = Vec::with_capacity(name_lens.len());
    let mut slots = Vec::with_capacity(item_count);
    for (index, &value_len) in value_lens.iter().enumerate() {
        if let Some(&name_len) = name_lens.get(index) {
            let name = cursor.take(name_len, "named_table.name")?;
            names.push(decoder.decode_name(name));
        }
        if value_len == 0 {
            slots.push(ItemSlot::absent());
            continue;
        }
        check_data!(value_len, value_len >= TYPE_TAG_SIZE);
        let type_code = cursor.read::<u16>("item.type")?;
        let range = cursor.take_range(value_len - TYPE_TAG_SIZE, "item.value")?;
        let slot = ItemSlot {
            type_code: Some(type_code),
            range,
            value_len,
            value: OnceLock::new(),
        };
        if decode_all_values {
            let bytes = &data[range.offset..range.end()];
            let _ = slot.value.set(decoder.decode(type_code, bytes)?);
        }
        slots.push(slot);
    }

    let observed = cursor.position() - offset;
    if observed > total_len {
        return Err(Error::corrupt_buffer(
            element,
            format!("items occupy {observed} bytes, table declares {total_len}"),
        ));
    }
    if observed != total_len {
        log::warn!(
            "{element} at offset {offset} declares {total_len} bytes, items occupy {observed}"
        );
    }
    log::trace!("{element} at offset {offset}: {item_count} items, {total_len} bytes");

    Ok(PopulatedTable {
        slots: SlotTable {
            buffer: buffer.clone(),
            decoder: decoder.clone(),
            total_len,
            slots,
        },
        names,
        consumed: total_len,
    })
}

impl SlotTable {
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn total_len(&self) -> usize {
        self.total_len
    }

    pub fn is_released(&self) -> bool {
        self.buffer.is_released()
    }

    /// Returns the value of slot `index`, decoding it from the lookup buffer on
    /// first access.
    ///
    /// Concurrent first accesses may each decode the value; exactly one result is
    /// published and decoding is deterministic, so all callers observe equal
    /// values.
    pub fn value(&self, index: usize) -> Result<&TypedValue> {
        let slot = self.slot(index)?;
        if let Some(value) = slot.value.get() {
            return Ok(value);
        }
        let type_code = slot.type_code.unwrap_or_default();
        let value = self
            .buffer
            .with_range(slot.range, |bytes| self.decoder.decode(type_code, bytes))??;
        Ok(slot.value.get_or_init(|| value))
    }

    /// Returns `true` if the value of slot `index` is already decoded.
    pub fn is_materialized(&self, index: usize) -> bool {
        self.slots
            .get(index)
            .is_some_and(|slot| slot.value.get().is_some())
    }

    pub fn type_code(&self, index: usize) -> Option<u16> {
        self.slots.get(index).and_then(|slot| slot.type_code)
    }

    pub fn data_type(&self, index: usize) -> Option<DataType> {
        self.type_code(index)
            .and_then(|code| DataType::try_from(code).ok())
    }

    /// On-wire length of every value, including its type tag.
    pub fn value_lengths(&self) -> Vec<usize> {
        self.slots.iter().map(|slot| slot.value_len).collect()
    }

    fn slot(&self, index: usize) -> Result<&ItemSlot> {
        self.slots.get(index).ok_or_else(|| {
            Error::invalid_arg(
                "index",
                format!("item {index} out of range for {} items", self.slots.len()),
            )
        })
    }
}
