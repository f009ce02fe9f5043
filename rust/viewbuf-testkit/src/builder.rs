//! Builders for synthetic lookup buffers.

use crate::items::{ItemValue, put_u16, put_u32};

pub const MASK_NOTE_ID: u32 = 0x0001;
pub const MASK_NOTE_UNID: u32 = 0x0002;
pub const MASK_NOTE_CLASS: u32 = 0x0004;
pub const MASK_INDEX_SIBLINGS: u32 = 0x0008;
pub const MASK_INDEX_CHILDREN: u32 = 0x0010;
pub const MASK_INDEX_DESCENDANTS: u32 = 0x0020;
pub const MASK_INDEX_ANY_UNREAD: u32 = 0x0040;
pub const MASK_INDENT_LEVELS: u32 = 0x0080;
pub const MASK_COLLECTION_STATS: u32 = 0x0100;
pub const MASK_SCORE: u32 = 0x0200;
pub const MASK_INDEX_UNREAD: u32 = 0x0400;
pub const MASK_SUMMARY_VALUES: u32 = 0x2000;
pub const MASK_INDEX_POSITION: u32 = 0x4000;
pub const MASK_SUMMARY: u32 = 0x8000;

/// Builds a value table: header, value lengths, then the tagged values.
#[derive(Debug, Clone, Default)]
pub struct ValueTableBuilder {
    items: Vec<ItemValue>,
    padding: usize,
}

impl ValueTableBuilder {
    pub fn new() -> ValueTableBuilder {
        Default::default()
    }

    pub fn item(mut self, value: ItemValue) -> Self {
        self.items.push(value);
        self
    }

    pub fn items(mut self, values: impl IntoIterator<Item = ItemValue>) -> Self {
        self.items.extend(values);
        self
    }

    /// Appends `padding` zero bytes after the last value and includes them in the
    /// declared table length.
    pub fn padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut body = Vec::new();
        for item in &self.items {
            put_u16(&mut body, item.wire_len() as u16);
        }
        for item in &self.items {
            body.extend_from_slice(&item.encode_item());
        }
        body.resize(body.len() + self.padding, 0);
        with_table_header(body, self.items.len())
    }
}

/// Builds a named table: header, (name length, value length) pairs, then each
/// name followed by its tagged value.
#[derive(Debug, Clone, Default)]
pub struct NamedTableBuilder {
    items: Vec<(Vec<u8>, ItemValue)>,
    padding: usize,
}

impl NamedTableBuilder {
    pub fn new() -> NamedTableBuilder {
        Default::default()
    }

    pub fn item(mut self, name: &str, value: ItemValue) -> Self {
        self.items.push((name.as_bytes().to_vec(), value));
        self
    }

    pub fn raw_name_item(mut self, name: &[u8], value: ItemValue) -> Self {
        self.items.push((name.to_vec(), value));
        self
    }

    pub fn padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, item) in &self.items {
            put_u16(&mut body, name.len() as u16);
            put_u16(&mut body, item.wire_len() as u16);
        }
        for (name, item) in &self.items {
            body.extend_from_slice(name);
            body.extend_from_slice(&item.encode_item());
        }
        body.resize(body.len() + self.padding, 0);
        with_table_header(body, self.items.len())
    }
}

fn with_table_header(body: Vec<u8>, count: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 4);
    put_u16(&mut out, (body.len() + 4) as u16);
    put_u16(&mut out, count as u16);
    out.extend_from_slice(&body);
    out
}

/// Builds one entry record. Only the fields that were set are written, in wire
/// order; [`EntryBuilder::mask`] reports the matching read mask bits.
#[derive(Debug, Clone, Default)]
pub struct EntryBuilder {
    note_id: Option<u32>,
    unid: Option<[u64; 2]>,
    note_class: Option<u16>,
    siblings: Option<u32>,
    children: Option<u32>,
    descendants: Option<u32>,
    any_unread: Option<u16>,
    indent_levels: Option<u16>,
    score: Option<u16>,
    unread: Option<u16>,
    position: Option<Vec<u32>>,
    column_values: Option<ValueTableBuilder>,
    summary: Option<NamedTableBuilder>,
}

impl EntryBuilder {
    pub fn new() -> EntryBuilder {
        Default::default()
    }

    pub fn note_id(mut self, id: u32) -> Self {
        self.note_id = Some(id);
        self
    }

    pub fn unid(mut self, unid: [u64; 2]) -> Self {
        self.unid = Some(unid);
        self
    }

    pub fn note_class(mut self, class: u16) -> Self {
        self.note_class = Some(class);
        self
    }

    pub fn siblings(mut self, count: u32) -> Self {
        self.siblings = Some(count);
        self
    }

    pub fn children(mut self, count: u32) -> Self {
        self.children = Some(count);
        self
    }

    pub fn descendants(mut self, count: u32) -> Self {
        self.descendants = Some(count);
        self
    }

    /// Writes the raw any-unread flag word; only `1` means "true" on the wire.
    pub fn any_unread_raw(mut self, raw: u16) -> Self {
        self.any_unread = Some(raw);
        self
    }

    pub fn any_unread(self, any_unread: bool) -> Self {
        self.any_unread_raw(any_unread as u16)
    }

    pub fn indent_levels(mut self, levels: u16) -> Self {
        self.indent_levels = Some(levels);
        self
    }

    pub fn score(mut self, score: u16) -> Self {
        self.score = Some(score);
        self
    }

    pub fn unread(mut self, unread: bool) -> Self {
        self.unread = Some(unread as u16);
        self
    }

    /// Tree position coordinates, from the top level down.
    pub fn position(mut self, coordinates: &[u32]) -> Self {
        assert!(!coordinates.is_empty());
        self.position = Some(coordinates.to_vec());
        self
    }

    pub fn column_values(mut self, table: ValueTableBuilder) -> Self {
        self.column_values = Some(table);
        self
    }

    pub fn summary(mut self, table: NamedTableBuilder) -> Self {
        self.summary = Some(table);
        self
    }

    /// Read mask bits for the fields that were set.
    pub fn mask(&self) -> u32 {
        let mut mask = 0;
        let fields = [
            (self.note_id.is_some(), MASK_NOTE_ID),
            (self.unid.is_some(), MASK_NOTE_UNID),
            (self.note_class.is_some(), MASK_NOTE_CLASS),
            (self.siblings.is_some(), MASK_INDEX_SIBLINGS),
            (self.children.is_some(), MASK_INDEX_CHILDREN),
            (self.descendants.is_some(), MASK_INDEX_DESCENDANTS),
            (self.any_unread.is_some(), MASK_INDEX_ANY_UNREAD),
            (self.indent_levels.is_some(), MASK_INDENT_LEVELS),
            (self.score.is_some(), MASK_SCORE),
            (self.unread.is_some(), MASK_INDEX_UNREAD),
            (self.position.is_some(), MASK_INDEX_POSITION),
            (self.column_values.is_some(), MASK_SUMMARY_VALUES),
            (self.summary.is_some(), MASK_SUMMARY),
        ];
        for (present, bit) in fields {
            if present {
                mask |= bit;
            }
        }
        mask
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        if let Some(id) = self.note_id {
            put_u32(out, id);
        }
        if let Some([low, high]) = self.unid {
            out.extend_from_slice(&low.to_le_bytes());
            out.extend_from_slice(&high.to_le_bytes());
        }
        if let Some(class) = self.note_class {
            put_u16(out, class);
        }
        for count in [self.siblings, self.children, self.descendants]
            .into_iter()
            .flatten()
        {
            put_u32(out, count);
        }
        for word in [self.any_unread, self.indent_levels, self.score, self.unread]
            .into_iter()
            .flatten()
        {
            put_u16(out, word);
        }
        if let Some(coordinates) = &self.position {
            let depth = coordinates.len() - 1;
            put_u16(out, depth as u16);
            // min and max level bytes, not interpreted by the decoder
            out.push(0);
            out.push(depth as u8);
            for &coordinate in coordinates {
                put_u32(out, coordinate);
            }
        }
        if let Some(table) = &self.column_values {
            out.extend_from_slice(&table.build());
        }
        if let Some(table) = &self.summary {
            out.extend_from_slice(&table.build());
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_to(&mut out);
        out
    }
}

/// Builds a complete lookup buffer: the optional collection statistics header
/// followed by the entry records.
#[derive(Debug, Clone, Default)]
pub struct LookupBufferBuilder {
    stats: Option<(u32, u32)>,
    entries: Vec<EntryBuilder>,
}

impl LookupBufferBuilder {
    pub fn new() -> LookupBufferBuilder {
        Default::default()
    }

    pub fn stats(mut self, top_level_entries: u32, last_modified: u32) -> Self {
        self.stats = Some((top_level_entries, last_modified));
        self
    }

    pub fn entry(mut self, entry: EntryBuilder) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn entries(mut self, entries: impl IntoIterator<Item = EntryBuilder>) -> Self {
        self.entries.extend(entries);
        self
    }

    /// Read mask matching the buffer layout. Entries are expected to share the
    /// same set of fields; the mask of the first entry is used.
    pub fn mask(&self) -> u32 {
        let entry_mask = self.entries.first().map_or(0, EntryBuilder::mask);
        if self.stats.is_some() {
            entry_mask | MASK_COLLECTION_STATS
        } else {
            entry_mask
        }
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        if let Some((top_level_entries, last_modified)) = self.stats {
            put_u32(&mut out, top_level_entries);
            put_u32(&mut out, last_modified);
        }
        for entry in &self.entries {
            entry.write_to(&mut out);
        }
        out
    }
}
