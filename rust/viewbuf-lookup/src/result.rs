//! Assembly of a complete lookup result from a lookup buffer.

use viewbuf_bytes::{ByteCursor, LookupBuffer};
use viewbuf_common::Result;
use viewbuf_values::TimeDate;

use crate::{
    entry::Entry,
    mask::{ReadMask, SignalFlags},
    options::DecodeOptions,
    record::RecordDecoder,
    stats::CollectionStats,
};

/// Information returned by the index scan next to the buffer, passed through to
/// the [`LookupResult`] unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanInfo {
    /// Number of entries the scan skipped before the first returned entry.
    pub skipped_count: u32,
    pub signal_flags: SignalFlags,
    /// Opaque position token to continue the scan from.
    pub cursor_token: Option<String>,
    /// Modification sequence number of the collection index.
    pub sequence_number: u32,
    /// Cutoff time of a differential scan.
    pub diff_time: Option<TimeDate>,
}

/// The decoded contents of a lookup buffer.
#[derive(Debug, Clone)]
pub struct LookupResult {
    stats: Option<CollectionStats>,
    entries: Vec<Entry>,
    scan: ScanInfo,
}

impl LookupResult {
    pub fn stats(&self) -> Option<&CollectionStats> {
        self.stats.as_ref()
    }

    /// Entries in buffer order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    pub fn skipped_count(&self) -> u32 {
        self.scan.skipped_count
    }

    pub fn returned_count(&self) -> usize {
        self.entries.len()
    }

    pub fn signal_flags(&self) -> SignalFlags {
        self.scan.signal_flags
    }

    /// Returns `true` if the scan stopped before reaching the end of the
    /// requested range.
    pub fn has_more_to_do(&self) -> bool {
        self.scan.signal_flags.contains(SignalFlags::MORE_TO_DO)
    }

    pub fn cursor_token(&self) -> Option<&str> {
        self.scan.cursor_token.as_deref()
    }

    pub fn sequence_number(&self) -> u32 {
        self.scan.sequence_number
    }

    pub fn diff_time(&self) -> Option<TimeDate> {
        self.scan.diff_time
    }

    pub fn scan_info(&self) -> &ScanInfo {
        &self.scan
    }

    /// Ids of the entries that carry one, in entry order.
    pub fn entry_ids(&self) -> Vec<u32> {
        self.entries
            .iter()
            .filter_map(|entry| entry.note_id)
            .collect()
    }
}

/// Decodes a lookup buffer holding `expected_entry_count` records laid out
/// according to `mask`.
///
/// The collection statistics header is read first when the mask selects it,
/// followed by exactly `expected_entry_count` records. Any structural error
/// fails the whole call. The buffer is not released.
pub fn decode_lookup_buffer(
    buffer: &LookupBuffer,
    expected_entry_count: usize,
    mask: ReadMask,
    scan: ScanInfo,
    options: &DecodeOptions,
) -> Result<LookupResult> {
    let data = buffer.read()?;
    let mut cursor = ByteCursor::new(&data, 0);

    let stats = if mask.contains(ReadMask::COLLECTION_STATS) {
        Some(CollectionStats::read_from(&mut cursor)?)
    } else {
        None
    };

    let decoder = RecordDecoder::new(mask, options.clone());
    // The count comes from the caller; records that do not fit fail the read
    // below, so only reserve what the buffer can hold.
    let mut entries = Vec::with_capacity(expected_entry_count.min(cursor.remaining()));
    for index in 0..expected_entry_count {
        let offset = cursor.position();
        let (entry, consumed) = decoder.decode_from(buffer, &data, offset)?;
        log::trace!("entry {index} at offset {offset}: {consumed} bytes");
        cursor.skip(consumed, "entry")?;
        entries.push(entry);
    }

    if cursor.remaining() > 0 {
        log::debug!(
            "{} trailing bytes after {expected_entry_count} entries",
            cursor.remaining()
        );
    }
    log::debug!(
        "decoded lookup buffer: {} bytes, {} entries, mask {:#x}",
        data.len(),
        entries.len(),
        mask.bits()
    );

    Ok(LookupResult {
        stats,
        entries,
        scan,
    })
}
