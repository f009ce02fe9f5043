//! Flag sets carried alongside a lookup buffer.

use bitflags::bitflags;

bitflags! {
    /// Selects the fields present in each entry of a lookup buffer.
    ///
    /// The fields appear on the wire in the order of the constants below, except
    /// `COLLECTION_STATS`, which is a header written once before the first entry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ReadMask: u32 {
        const NOTE_ID = 0x0000_0001;
        const NOTE_UNID = 0x0000_0002;
        const NOTE_CLASS = 0x0000_0004;
        const INDEX_SIBLINGS = 0x0000_0008;
        const INDEX_CHILDREN = 0x0000_0010;
        const INDEX_DESCENDANTS = 0x0000_0020;
        const INDEX_ANY_UNREAD = 0x0000_0040;
        const INDENT_LEVELS = 0x0000_0080;
        const COLLECTION_STATS = 0x0000_0100;
        const SCORE = 0x0000_0200;
        const INDEX_UNREAD = 0x0000_0400;
        const SUMMARY_VALUES = 0x0000_2000;
        const INDEX_POSITION = 0x0000_4000;
        const SUMMARY = 0x0000_8000;
    }
}

bitflags! {
    /// Status flags reported by the index scan that produced the buffer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SignalFlags: u16 {
        /// The collection design changed since the last scan.
        const DEFN = 0x0001;
        /// The collection index changed since the last scan.
        const INDEX = 0x0002;
        const UNREADLIST = 0x0004;
        /// The scan stopped early; more entries can be read from the returned position.
        const MORE_TO_DO = 0x0020;
        const ANY_CONFLICT = 0x0080;
    }
}

bitflags! {
    /// Class of the note behind an entry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NoteClass: u16 {
        const DOCUMENT = 0x0001;
        const INFO = 0x0002;
        const FORM = 0x0004;
        const VIEW = 0x0008;
        const ICON = 0x0010;
        const DESIGN = 0x0020;
        const ACL = 0x0040;
        const HELP_INDEX = 0x0080;
        const HELP = 0x0100;
        const FILTER = 0x0200;
        const FIELD = 0x0400;
        const REPLFORMULA = 0x0800;
        const PRIVATE = 0x1000;
        const DEFAULT = 0x8000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_bits_are_retained() {
        let mask = ReadMask::from_bits_retain(0x0001_0001);
        assert!(mask.contains(ReadMask::NOTE_ID));
        assert_eq!(mask.bits(), 0x0001_0001);

        let flags = SignalFlags::from_bits_retain(0x0120);
        assert!(flags.contains(SignalFlags::MORE_TO_DO));
        assert!(!flags.contains(SignalFlags::DEFN));
    }
}
