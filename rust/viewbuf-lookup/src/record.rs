//! Decoding of a single entry record.

use viewbuf_bytes::{ByteCursor, LookupBuffer};
use viewbuf_common::Result;

use crate::{
    entry::{Entry, TreePosition, Unid},
    mask::{NoteClass, ReadMask},
    named_table::NamedTable,
    options::DecodeOptions,
    value_table::ValueTable,
};

/// Decodes entry records laid out according to a read mask.
///
/// Fields appear in a fixed order and without delimiters; each field selected
/// by the mask contributes its fixed width, or the declared length of its
/// nested table, to the record.
#[derive(Debug, Clone)]
pub struct RecordDecoder {
    mask: ReadMask,
    options: DecodeOptions,
}

impl RecordDecoder {
    pub fn new(mask: ReadMask, options: DecodeOptions) -> RecordDecoder {
        RecordDecoder { mask, options }
    }

    #[inline]
    pub fn mask(&self) -> ReadMask {
        self.mask
    }

    /// Decodes the record at `offset` of `buffer`, returning the entry and the
    /// number of bytes it occupies.
    pub fn decode(&self, buffer: &LookupBuffer, offset: usize) -> Result<(Entry, usize)> {
        let data = buffer.read()?;
        self.decode_from(buffer, &data, offset)
    }

    /// Decodes the record at `offset` of `data`, the already acquired contents
    /// of `buffer`.
    pub(crate) fn decode_from(
        &self,
        buffer: &LookupBuffer,
        data: &[u8],
        offset: usize,
    ) -> Result<(Entry, usize)> {
        let mask = self.mask;
        let mut cursor = ByteCursor::new(data, offset);
        let mut entry = Entry::default();

        if mask.contains(ReadMask::NOTE_ID) {
            entry.note_id = Some(cursor.read::<u32>("entry.note_id")?);
        }
        if mask.contains(ReadMask::NOTE_UNID) {
            cursor.ensure(Unid::SIZE, "entry.unid")?;
            let file = cursor.read::<u64>("entry.unid")?;
            let note = cursor.read::<u64>("entry.unid")?;
            entry.unid = Some(Unid::new(file, note));
        }
        if mask.contains(ReadMask::NOTE_CLASS) {
            let class = cursor.read::<u16>("entry.note_class")?;
            entry.note_class = Some(NoteClass::from_bits_retain(class));
        }
        if mask.contains(ReadMask::INDEX_SIBLINGS) {
            entry.sibling_count = Some(cursor.read::<u32>("entry.siblings")?);
        }
        if mask.contains(ReadMask::INDEX_CHILDREN) {
            entry.child_count = Some(cursor.read::<u32>("entry.children")?);
        }
        if mask.contains(ReadMask::INDEX_DESCENDANTS) {
            entry.descendant_count = Some(cursor.read::<u32>("entry.descendants")?);
        }
        if mask.contains(ReadMask::INDEX_ANY_UNREAD) {
            entry.any_unread = Some(cursor.read::<u16>("entry.any_unread")? == 1);
        }
        if mask.contains(ReadMask::INDENT_LEVELS) {
            entry.indent_levels = Some(cursor.read::<u16>("entry.indent_levels")?);
        }
        if mask.contains(ReadMask::SCORE) {
            entry.score = Some(cursor.read::<u16>("entry.score")?);
        }
        if mask.contains(ReadMask::INDEX_UNREAD) {
            entry.unread = Some(cursor.read::<u16>("entry.unread")? == 1);
        }
        if mask.contains(ReadMask::INDEX_POSITION) {
            entry.position = Some(read_position(&mut cursor)?);
        }
        if mask.contains(ReadMask::SUMMARY_VALUES) {
            let (table, consumed) =
                ValueTable::decode_from(buffer, data, cursor.position(), &self.options)?;
            cursor.skip(consumed, "entry.column_values")?;
            entry.column_values = Some(table);
        }
        if mask.contains(ReadMask::SUMMARY) {
            let (table, consumed) =
                NamedTable::decode_from(buffer, data, cursor.position(), &self.options)?;
            cursor.skip(consumed, "entry.summary")?;
            entry.summary = Some(table);
        }
        entry.single_column_lookup_name = self.options.single_column_lookup_name.clone();

        Ok((entry, cursor.position() - offset))
    }
}

/// Reads a tree position: `u16` depth N, one byte each of minimum and maximum
/// level (skipped), then N + 1 `u32` coordinates. Occupies `4 * (N + 2)` bytes.
fn read_position(cursor: &mut ByteCursor<'_>) -> Result<TreePosition> {
    let depth = cursor.read::<u16>("entry.position.depth")? as usize;
    cursor.skip(2, "entry.position.levels")?;
    cursor.ensure(4 * (depth + 1), "entry.position")?;
    let mut coordinates = Vec::with_capacity(depth + 1);
    for _ in 0..=depth {
        coordinates.push(cursor.read::<u32>("entry.position")?);
    }
    Ok(TreePosition::new(coordinates))
}

#[cfg(test)]
mod tests {
    use viewbuf_testkit::{EntryBuilder, ItemValue, NamedTableBuilder, ValueTableBuilder};

    use super::*;

    fn decode(builder: &EntryBuilder) -> (Entry, usize) {
        let buffer = LookupBuffer::from(builder.build());
        let decoder = RecordDecoder::new(
            ReadMask::from_bits_retain(builder.mask()),
            DecodeOptions::default(),
        );
        decoder.decode(&buffer, 0).unwrap()
    }

    #[test]
    fn test_all_fixed_fields() {
        let builder = EntryBuilder::new()
            .note_id(0x1007)
            .unid([0xAABB, 0xCCDD])
            .note_class(0x0001)
            .siblings(3)
            .children(4)
            .descendants(5)
            .any_unread_raw(2)
            .indent_levels(1)
            .score(77)
            .unread(true);
        let (entry, consumed) = decode(&builder);
        assert_eq!(consumed, 4 + 16 + 2 + 12 + 2 + 2 + 2 + 2);
        assert_eq!(entry.note_id, Some(0x1007));
        assert_eq!(entry.unid, Some(Unid::new(0xAABB, 0xCCDD)));
        assert_eq!(entry.note_class, Some(NoteClass::DOCUMENT));
        assert_eq!(entry.sibling_count, Some(3));
        assert_eq!(entry.child_count, Some(4));
        assert_eq!(entry.descendant_count, Some(5));
        // Only the value 1 means "true".
        assert_eq!(entry.any_unread, Some(false));
        assert_eq!(entry.indent_levels, Some(1));
        assert_eq!(entry.score, Some(77));
        assert_eq!(entry.unread, Some(true));
        assert!(entry.position.is_none());
        assert!(entry.column_values.is_none());
    }

    #[test]
    fn test_position_width() {
        for depth in 0..5u32 {
            let coordinates = (1..=depth + 1).collect::<Vec<_>>();
            let builder = EntryBuilder::new().position(&coordinates).note_id(9);
            let (entry, consumed) = decode(&builder);
            let position = entry.position.unwrap();
            assert_eq!(position.coordinates(), coordinates.as_slice());
            assert_eq!(position.depth(), depth as usize);
            assert_eq!(consumed, 4 + 4 * (depth as usize + 2));
        }
    }

    #[test]
    fn test_both_tables() {
        let builder = EntryBuilder::new()
            .note_id(1)
            .column_values(
                ValueTableBuilder::new()
                    .item(ItemValue::text("col"))
                    .padding(3),
            )
            .summary(NamedTableBuilder::new().item("Subject", ItemValue::text("Hello")));
        let (entry, consumed) = decode(&builder);
        assert_eq!(consumed, builder.build().len());
        assert_eq!(
            entry.column_values.unwrap().value(0).unwrap().as_text(),
            Some("col")
        );
        assert_eq!(
            entry.summary.unwrap().get_as_string("subject", "").unwrap(),
            "Hello"
        );
    }

    #[test]
    fn test_single_column_lookup_name() {
        let buffer = LookupBuffer::from(EntryBuilder::new().note_id(5).build());
        let options = DecodeOptions::default().with_single_column_lookup_name("$Subject");
        let decoder = RecordDecoder::new(ReadMask::NOTE_ID, options);
        let (entry, _) = decoder.decode(&buffer, 0).unwrap();
        assert_eq!(entry.single_column_lookup_name.as_deref(), Some("$Subject"));
    }

    #[test]
    fn test_truncated_record() {
        let bytes = EntryBuilder::new().note_id(1).unid([1, 2]).build();
        let buffer = LookupBuffer::from(&bytes[..bytes.len() - 1]);
        let decoder =
            RecordDecoder::new(ReadMask::NOTE_ID | ReadMask::NOTE_UNID, Default::default());
        assert!(decoder.decode(&buffer, 0).unwrap_err().is_corrupt_buffer());
    }
}
