use std::sync::Arc;

use viewbuf_values::{NativeTextDecoder, TimeZoneContext, Utf8TextDecoder, ValueDecoder};

/// Controls how a lookup buffer is decoded.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Defer the conversion of text values from the native character encoding
    /// until they are first read.
    pub lazy_text: bool,

    /// Decode every item value while the buffer is decoded. When `false`, values
    /// are decoded on first access and stay tied to the lookup buffer until then.
    pub decode_all_values: bool,

    /// Offset and daylight-saving flag applied to date/time values.
    pub time_zone: TimeZoneContext,

    /// Converts native text bytes (item values and item names) to strings.
    pub text_decoder: Arc<dyn NativeTextDecoder>,

    /// Programmatic name of the lookup column, attached to every entry of a
    /// single-column lookup.
    pub single_column_lookup_name: Option<String>,
}

impl DecodeOptions {
    pub fn with_lazy_text(&self, lazy_text: bool) -> Self {
        let mut options = self.clone();
        options.lazy_text = lazy_text;
        options
    }

    pub fn with_decode_all_values(&self, decode_all_values: bool) -> Self {
        let mut options = self.clone();
        options.decode_all_values = decode_all_values;
        options
    }

    pub fn with_time_zone(&self, time_zone: TimeZoneContext) -> Self {
        let mut options = self.clone();
        options.time_zone = time_zone;
        options
    }

    pub fn with_text_decoder(&self, text_decoder: Arc<dyn NativeTextDecoder>) -> Self {
        let mut options = self.clone();
        options.text_decoder = text_decoder;
        options
    }

    pub fn with_single_column_lookup_name(&self, name: impl Into<String>) -> Self {
        let mut options = self.clone();
        options.single_column_lookup_name = Some(name.into());
        options
    }

    /// Creates the item value decoder configured by these options.
    pub fn value_decoder(&self) -> ValueDecoder {
        ValueDecoder::new(
            Arc::clone(&self.text_decoder),
            self.time_zone,
            self.lazy_text,
        )
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            lazy_text: false,
            decode_all_values: true,
            time_zone: TimeZoneContext::UTC,
            text_decoder: Arc::new(Utf8TextDecoder),
            single_column_lookup_name: None,
        }
    }
}
