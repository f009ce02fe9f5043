//! Typed item values carried by lookup buffers, and the decoder that produces them
//! from their tagged wire representation.
//!
//! # Modules
//!
//! - [`data_type`]: the closed set of wire type codes
//! - [`decoder`]: [`ValueDecoder`], which turns a type code and value bytes into a
//!   [`TypedValue`]
//! - [`text`]: text values and the native character set conversion seam
//! - [`time`]: the packed date/time structure and timezone context
//! - [`value`]: [`TypedValue`] and its scalar/list coercions

pub mod data_type;
pub mod decoder;
pub mod text;
pub mod time;
pub mod value;


pub use data_type::DataType;
pub use decoder::ValueDecoder;
pub use text::{Latin1TextDecoder, NativeTextDecoder, TextValue, Utf8TextDecoder};
pub use time::{DateTimeValue, TimeDate, TimeZoneContext};
pub use value::TypedValue;
