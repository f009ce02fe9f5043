//! # viewbuf: lookup buffer decoding
//!
//! An index service answers view and collection scans with a single flat
//! buffer: optional collection statistics, then one record per matched entry.
//! Which fields a record holds is selected by a read mask. The column values
//! and summary items of an entry are nested tables of type-tagged values.
//! This crate decodes such buffers into ordered, typed entries.
//!
//! ## Module Organization
//!
//! * [`lookup`] - Entry records, item tables and the complete lookup result
//! * [`values`] - Typed item values, text and date/time conversion
//! * [`common`] - Error and result types shared by all crates
//!
//! ### Support Modules
//!
//! * [`support::bytes`] - The releasable lookup buffer and its little-endian cursor
//!
//! ## Getting Started
//!
//! ```no_run
//! use viewbuf::lookup::{DecodeOptions, ReadMask, ScanInfo, decode_lookup_buffer};
//! use viewbuf::support::bytes::LookupBuffer;
//!
//! # fn run(bytes: Vec<u8>) -> viewbuf::common::Result<()> {
//! let buffer = LookupBuffer::from(bytes);
//! let mask = ReadMask::NOTE_ID | ReadMask::SUMMARY;
//! let options = DecodeOptions::default();
//! let result = decode_lookup_buffer(&buffer, 10, mask, ScanInfo::default(), &options)?;
//! for entry in result.entries() {
//!     if let Some(summary) = &entry.summary {
//!         println!("{:?}: {}", entry.note_id, summary.get_as_string("subject", "")?);
//!     }
//! }
//! buffer.release();
//! # Ok(())
//! # }
//! ```

pub use viewbuf_common as common;
pub use viewbuf_lookup as lookup;
pub use viewbuf_values as values;

pub mod support {
    pub use viewbuf_bytes as bytes;
}
