//! Test utilities for the viewbuf crates.
//!
//! This crate builds synthetic lookup buffers byte by byte, independently of the
//! decoder crates, so that tests exercise the decoders against an encoding that
//! was not derived from the decoding code itself:
//! - [`items`]: item values and their payload encoding
//! - [`builder`]: value tables, named tables, entries and whole lookup buffers
//!
//! It also installs a log subscriber for test binaries.

use std::sync::Once;

pub mod builder;
pub mod items;

pub use builder::{EntryBuilder, LookupBufferBuilder, NamedTableBuilder, ValueTableBuilder};
pub use items::ItemValue;

static INIT: Once = Once::new();

/// Installs a `tracing` subscriber that also receives `log` records, honoring
/// `RUST_LOG` (default `info`). Safe to call multiple times.
pub fn init_logging_for_tests() {
    INIT.call_once(|| {
        use tracing_subscriber::filter::EnvFilter;
        use tracing_subscriber::fmt;
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_test_writer()
            .try_init();
    });
}
