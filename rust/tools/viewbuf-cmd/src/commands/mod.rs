//! Command implementations for viewbuf-cmd

pub mod decode;
