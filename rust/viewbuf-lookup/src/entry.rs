//! Decoded entries and their fixed-width field types.

use crate::{mask::NoteClass, named_table::NamedTable, value_table::ValueTable};

/// Entry id bit marking a category entry rather than a document.
pub const CATEGORY_ID_BIT: u32 = 0x8000_0000;

/// Universal id of the note behind an entry: the file part and the note part,
/// each a 64-bit word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Unid {
    pub file: u64,
    pub note: u64,
}

impl Unid {
    pub const SIZE: usize = 16;

    pub const fn new(file: u64, note: u64) -> Unid {
        Unid { file, note }
    }
}

impl std::fmt::Display for Unid {
    /// 32 uppercase hex digits, file part first.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016X}{:016X}", self.file, self.note)
    }
}

/// Position of an entry in the outline of a collection: one coordinate per
/// level, from the top level down, each 1-based.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TreePosition(Vec<u32>);

impl TreePosition {
    pub fn new(coordinates: Vec<u32>) -> TreePosition {
        TreePosition(coordinates)
    }

    pub fn coordinates(&self) -> &[u32] {
        &self.0
    }

    /// Zero-based depth: 0 for top-level entries.
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }
}

impl std::fmt::Display for TreePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, coordinate) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{coordinate}")?;
        }
        Ok(())
    }
}

/// One decoded entry. Only the fields selected by the read mask are populated.
#[derive(Debug, Clone, Default)]
pub struct Entry {
    pub note_id: Option<u32>,
    pub unid: Option<Unid>,
    pub note_class: Option<NoteClass>,
    pub sibling_count: Option<u32>,
    pub child_count: Option<u32>,
    pub descendant_count: Option<u32>,
    pub any_unread: Option<bool>,
    pub indent_levels: Option<u16>,
    /// Full-text relevance score.
    pub score: Option<u16>,
    pub unread: Option<bool>,
    pub position: Option<TreePosition>,
    /// Column values, in column order.
    pub column_values: Option<ValueTable>,
    /// Summary items, by name.
    pub summary: Option<NamedTable>,
    pub single_column_lookup_name: Option<String>,
}

impl Entry {
    /// Returns `true` if the entry id marks a category.
    pub fn is_category(&self) -> bool {
        self.note_id.is_some_and(|id| id & CATEGORY_ID_BIT != 0)
    }

    /// Returns `true` if the entry carries an id that does not mark a category.
    pub fn is_document(&self) -> bool {
        self.note_id.is_some_and(|id| id & CATEGORY_ID_BIT == 0)
    }

    /// On-wire size of each column value in bytes.
    pub fn column_value_sizes(&self) -> Option<Vec<usize>> {
        self.column_values.as_ref().map(ValueTable::value_lengths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unid_display() {
        let unid = Unid::new(0x0123_4567_89ab_cdef, 0x1f);
        assert_eq!(unid.to_string(), "0123456789ABCDEF000000000000001F");
        assert_eq!(unid.to_string().len(), 32);
    }

    #[test]
    fn test_tree_position() {
        let position = TreePosition::new(vec![1, 2, 3]);
        assert_eq!(position.to_string(), "1.2.3");
        assert_eq!(position.depth(), 2);
        assert_eq!(TreePosition::new(vec![4]).depth(), 0);
    }

    #[test]
    fn test_category_flag() {
        let mut entry = Entry::default();
        assert!(!entry.is_category() && !entry.is_document());
        entry.note_id = Some(0x8000_0004);
        assert!(entry.is_category());
        entry.note_id = Some(0x1007);
        assert!(entry.is_document());
    }
}
