use std::sync::Arc;

use viewbuf_bytes::LookupBuffer;
use viewbuf_common::Result;
use viewbuf_values::{DataType, TypedValue};

use crate::{
    options::DecodeOptions,
    slots::{SlotTable, TableLayout, populate_slots},
};

/// An ordered table of type-tagged item values without names, as returned for
/// the column values of an entry.
///
/// Cloning is cheap: clones share the slots and their decoded values.
#[derive(Debug, Clone)]
pub struct ValueTable {
    inner: Arc<SlotTable>,
}

impl ValueTable {
    /// Decodes the value table at `offset` of `buffer`.
    ///
    /// Returns the table and the number of bytes it occupies, which is its
    /// declared total length.
    pub fn decode(
        buffer: &LookupBuffer,
        offset: usize,
        options: &DecodeOptions,
    ) -> Result<(ValueTable, usize)> {
        let data = buffer.read()?;
        Self::decode_from(buffer, &data, offset, options)
    }

    /// Decodes the value table at `offset` of `data`, the already acquired
    /// contents of `buffer`.
    pub(crate) fn decode_from(
        buffer: &LookupBuffer,
        data: &[u8],
        offset: usize,
        options: &DecodeOptions,
    ) -> Result<(ValueTable, usize)> {
        let table = populate_slots(
            buffer,
            data,
            offset,
            TableLayout::Values,
            &options.value_decoder(),
            options.decode_all_values,
        )?;
        let consumed = table.consumed;
        Ok((
            ValueTable {
                inner: Arc::new(table.slots),
            },
            consumed,
        ))
    }

    /// Number of items.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }

    /// Declared total length of the table in bytes, including its header.
    #[inline]
    pub fn total_len(&self) -> usize {
        self.inner.total_len()
    }

    /// Returns the value of item `index`, decoding it on first access.
    ///
    /// Fails with `BufferReleased` if the value was not decoded before the
    /// lookup buffer was released.
    pub fn value(&self, index: usize) -> Result<&TypedValue> {
        self.inner.value(index)
    }

    /// Returns all values in item order.
    pub fn values(&self) -> Result<Vec<&TypedValue>> {
        (0..self.len()).map(|i| self.value(i)).collect()
    }

    /// Returns the data type of item `index`, or `None` for an absent item or an
    /// unrecognized type tag.
    pub fn data_type(&self, index: usize) -> Option<DataType> {
        self.inner.data_type(index)
    }

    /// Raw wire type code of item `index`; `None` for an absent item.
    pub fn type_code(&self, index: usize) -> Option<u16> {
        self.inner.type_code(index)
    }

    /// On-wire length of every value in bytes, including its type tag. Useful to
    /// find the columns that dominate the size of a summary buffer.
    pub fn value_lengths(&self) -> Vec<usize> {
        self.inner.value_lengths()
    }

    pub fn is_materialized(&self, index: usize) -> bool {
        self.inner.is_materialized(index)
    }

    /// Returns `true` if the lookup buffer behind this table was released.
    pub fn is_released(&self) -> bool {
        self.inner.is_released()
    }
}

#[cfg(test)]
mod tests {
    use viewbuf_testkit::{ItemValue, ValueTableBuilder, items};

    use super::*;

    fn decode(bytes: Vec<u8>, options: &DecodeOptions) -> (ValueTable, usize) {
        let buffer = LookupBuffer::from(bytes);
        ValueTable::decode(&buffer, 0, options).unwrap()
    }

    #[test]
    fn test_decode_all_variants() {
        let innards = items::timedate(2020, 2, 29, 23, 59, 59, 99);
        let bytes = ValueTableBuilder::new()
            .item(ItemValue::text("Title"))
            .item(ItemValue::text_list(&["a", "bc"]))
            .item(ItemValue::Number(-1.25))
            .item(ItemValue::NumberList(vec![1.0, 2.0]))
            .item(ItemValue::Time(innards))
            .item(ItemValue::TimeList(vec![innards, innards]))
            .item(ItemValue::Empty)
            .build();
        let len = bytes.len();
        let (table, consumed) = decode(bytes, &DecodeOptions::default());
        assert_eq!(consumed, len);
        assert_eq!(table.total_len(), len);
        assert_eq!(table.len(), 7);

        assert_eq!(table.value(0).unwrap().as_text(), Some("Title"));
        assert_eq!(
            table.value(1).unwrap(),
            &TypedValue::TextList(vec!["a".into(), "bc".into()])
        );
        assert_eq!(table.value(2).unwrap(), &TypedValue::Number(-1.25));
        assert_eq!(
            table.value(3).unwrap(),
            &TypedValue::NumberList(vec![1.0, 2.0])
        );
        assert_eq!(
            table.value(4).unwrap().as_time().unwrap().to_string(),
            "2020-02-29T23:59:59.990+00:00"
        );
        assert_eq!(table.value(5).unwrap().coerce_time_list().unwrap().len(), 2);
        assert!(table.value(6).unwrap().is_absent());

        assert_eq!(table.data_type(3), Some(DataType::NumberRange));
        assert_eq!(table.data_type(6), None);
        assert_eq!(table.value_lengths(), vec![7, 11, 10, 22, 10, 22, 0]);
    }

    #[test]
    fn test_declared_length_wins() {
        let bytes = ValueTableBuilder::new()
            .item(ItemValue::Number(1.0))
            .padding(6)
            .build();
        let (table, consumed) = decode(bytes, &DecodeOptions::default());
        assert_eq!(consumed, 4 + 2 + 10 + 6);
        assert_eq!(table.value(0).unwrap(), &TypedValue::Number(1.0));
    }

    #[test]
    fn test_lazy_slots() {
        let bytes = ValueTableBuilder::new()
            .item(ItemValue::text("later"))
            .item(ItemValue::Empty)
            .build();
        let options = DecodeOptions::default().with_decode_all_values(false);
        let (table, _) = decode(bytes, &options);
        assert!(!table.is_materialized(0));
        assert!(table.is_materialized(1));
        assert_eq!(table.value(0).unwrap().as_text(), Some("later"));
        assert!(table.is_materialized(0));
    }

    #[test]
    fn test_invalid_lengths() {
        // Value length 1 cannot hold the type tag.
        let bytes = vec![7, 0, 1, 0, 1, 0, 0];
        let buffer = LookupBuffer::from(bytes);
        let err = ValueTable::decode(&buffer, 0, &DecodeOptions::default()).unwrap_err();
        assert!(err.is_corrupt_buffer());

        // Declared length exceeds the buffer.
        let mut bytes = ValueTableBuilder::new()
            .item(ItemValue::Number(1.0))
            .build();
        bytes[0] += 1;
        let buffer = LookupBuffer::from(bytes);
        let err = ValueTable::decode(&buffer, 0, &DecodeOptions::default()).unwrap_err();
        assert!(err.is_corrupt_buffer());
    }

    #[test]
    fn test_items_past_declared_length() {
        // The header claims 12 bytes, the item ends at 16 while the buffer
        // carries 8 more.
        let mut bytes = ValueTableBuilder::new()
            .item(ItemValue::Number(1.0))
            .build();
        assert_eq!(bytes.len(), 16);
        bytes[0] = 12;
        bytes.extend_from_slice(&[0; 8]);
        let buffer = LookupBuffer::from(bytes);
        let err = ValueTable::decode(&buffer, 0, &DecodeOptions::default()).unwrap_err();
        assert!(err.is_corrupt_buffer());
    }

    #[test]
    fn test_index_out_of_range() {
        let (table, _) = decode(ValueTableBuilder::new().build(), &DecodeOptions::default());
        assert!(table.is_empty());
        assert!(table.value(0).is_err());
        assert!(table.values().unwrap().is_empty());
    }
}
