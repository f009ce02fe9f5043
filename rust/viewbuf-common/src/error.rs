use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Creates a `CorruptBuffer` error for an element whose declared size or count
    /// does not fit into the bytes that are actually available.
    pub fn corrupt_buffer(element: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::CorruptBuffer {
                element: element.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    /// Creates an out-of-bounds `CorruptBuffer` error: `needed` bytes were requested
    /// at `offset`, while the buffer only holds `available` bytes.
    pub fn out_of_bounds(
        element: impl Into<String>,
        offset: usize,
        needed: usize,
        available: usize,
    ) -> Error {
        Error::corrupt_buffer(
            element,
            format!("{needed} bytes at offset {offset} exceed buffer length {available}"),
        )
    }

    pub fn unsupported_type(type_code: u16) -> Error {
        Error(ErrorKind::UnsupportedType { type_code }.into())
    }

    pub fn buffer_released() -> Error {
        Error(ErrorKind::BufferReleased.into())
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    /// Returns `true` if this error reports a malformed or truncated buffer.
    pub fn is_corrupt_buffer(&self) -> bool {
        matches!(self.kind(), ErrorKind::CorruptBuffer { .. })
    }

    /// Returns `true` if this error reports an access to an already released buffer.
    pub fn is_buffer_released(&self) -> bool {
        matches!(self.kind(), ErrorKind::BufferReleased)
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("corrupt lookup buffer at '{element}': {message}")]
    CorruptBuffer { element: String, message: String },

    #[error("unsupported item data type 0x{type_code:04x}")]
    UnsupportedType { type_code: u16 },

    #[error("lookup buffer already released")]
    BufferReleased,

    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}
