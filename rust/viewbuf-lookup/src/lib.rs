//! Decoding of lookup buffers: the results of view and collection scans.
//!
//! A lookup buffer starts with optional collection statistics, followed by one
//! record per returned entry. The fields of each record are selected by a
//! [`ReadMask`] and appear in a fixed order without delimiters; the column values
//! and the summary of an entry are nested item tables whose values are decoded
//! by [`viewbuf_values`].
//!
//! ```text
//! [stats] { [id] [unid] [class] ... [position] [value table] [named table] } * N
//! ```
//!
//! Use [`decode_lookup_buffer`] to decode a whole buffer, or [`RecordDecoder`],
//! [`ValueTable`] and [`NamedTable`] to decode its parts.

pub mod entry;
pub mod mask;
pub mod named_table;
pub mod options;
pub mod record;
pub mod result;
pub mod stats;
pub mod value_table;

mod slots;

pub use entry::{Entry, TreePosition, Unid};
pub use mask::{NoteClass, ReadMask, SignalFlags};
pub use named_table::NamedTable;
pub use options::DecodeOptions;
pub use record::RecordDecoder;
pub use result::{LookupResult, ScanInfo, decode_lookup_buffer};
pub use stats::CollectionStats;
pub use value_table::ValueTable;
