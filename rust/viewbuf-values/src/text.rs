//! Text values and the conversion from the buffer's native character encoding.

use std::sync::{Arc, OnceLock};

use serde::{Serialize, Serializer};

/// Converts text bytes in the buffer's native character encoding to a `String`.
///
/// The decoders only ever hand complete values to the implementation: a whole
/// `Text` item, or a single element of a `TextList`.
pub trait NativeTextDecoder: Send + Sync + std::fmt::Debug {
    fn decode(&self, bytes: &[u8]) -> String;
}

/// Decodes text as UTF-8, replacing invalid sequences with U+FFFD.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8TextDecoder;

impl NativeTextDecoder for Utf8TextDecoder {
    fn decode(&self, bytes: &[u8]) -> String {
        String::from_utf8_lossy(trim_nul(bytes)).into_owned()
    }
}

/// Decodes text as ISO-8859-1, mapping every byte to the code point of the same value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Latin1TextDecoder;

impl NativeTextDecoder for Latin1TextDecoder {
    fn decode(&self, bytes: &[u8]) -> String {
        trim_nul(bytes).iter().map(|&b| char::from(b)).collect()
    }
}

fn trim_nul(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |pos| pos + 1);
    &bytes[..end]
}

/// A text value that is either already converted, or holds a private copy of its
/// native bytes and converts them on first access.
///
/// Pending values do not reference the lookup buffer, so they stay readable after
/// the buffer has been released.
#[derive(Clone)]
pub struct TextValue {
    decoded: OnceLock<String>,
    pending: Option<PendingText>,
}

#[derive(Clone)]
struct PendingText {
    raw: Arc<[u8]>,
    decoder: Arc<dyn NativeTextDecoder>,
}

impl TextValue {
    /// Creates a text value whose conversion is deferred until the first read.
    pub fn pending(raw: &[u8], decoder: Arc<dyn NativeTextDecoder>) -> TextValue {
        TextValue {
            decoded: OnceLock::new(),
            pending: Some(PendingText {
                raw: Arc::from(raw),
                decoder,
            }),
        }
    }

    /// Returns the text, converting it first if needed.
    pub fn as_str(&self) -> &str {
        self.decoded.get_or_init(|| match &self.pending {
            Some(pending) => pending.decoder.decode(&pending.raw),
            None => String::new(),
        })
    }

    /// Returns `true` if the text has already been converted.
    pub fn is_decoded(&self) -> bool {
        self.decoded.get().is_some()
    }

    /// The native bytes of a value created with [`TextValue::pending`].
    pub fn raw_bytes(&self) -> Option<&[u8]> {
        self.pending.as_ref().map(|pending| pending.raw.as_ref())
    }

    pub fn into_string(self) -> String {
        self.as_str();
        self.decoded.into_inner().unwrap_or_default()
    }
}

impl From<String> for TextValue {
    fn from(s: String) -> Self {
        TextValue {
            decoded: OnceLock::from(s),
            pending: None,
        }
    }
}

impl From<&str> for TextValue {
    fn from(s: &str) -> Self {
        TextValue::from(s.to_string())
    }
}

impl PartialEq for TextValue {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for TextValue {}

impl PartialEq<str> for TextValue {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for TextValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl std::fmt::Debug for TextValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self.as_str(), f)
    }
}

impl std::fmt::Display for TextValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TextValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
