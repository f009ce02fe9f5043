use viewbuf_bytes::ByteCursor;
use viewbuf_common::Result;

/// Aggregate statistics of the scanned collection, written once at the start of
/// the lookup buffer when requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionStats {
    /// Number of top-level entries in the collection.
    pub top_level_entries: u32,
    /// Server-side last modification time of the collection, as written by the
    /// server. Not interpreted.
    pub last_modified: u32,
}

impl CollectionStats {
    pub const fn size() -> usize {
        8
    }

    /// Reads the statistics header at the cursor position and advances past it.
    pub fn read_from(cursor: &mut ByteCursor<'_>) -> Result<CollectionStats> {
        cursor.ensure(Self::size(), "collection_stats")?;
        Ok(CollectionStats {
            top_level_entries: cursor.read::<u32>("collection_stats.top_level_entries")?,
            last_modified: cursor.read::<u32>("collection_stats.last_modified")?,
        })
    }
}
