//! Byte buffers for the viewbuf decoders: a shared, explicitly releasable lookup
//! buffer and a bounds-checked little-endian cursor over its contents.

use std::{
    ops::Deref,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard},
};

use viewbuf_common::{Result, error::Error};

pub mod reader;

pub use reader::{ByteCursor, LeValue, ValueReader};

/// A range of bytes within a [`LookupBuffer`], expressed as an absolute offset and
/// a length.
///
/// `ByteRange` does not keep the buffer alive and carries no lifetime; it is only
/// meaningful together with the buffer it was produced from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ByteRange {
    pub offset: usize,
    pub len: usize,
}

impl ByteRange {
    #[inline]
    pub const fn new(offset: usize, len: usize) -> ByteRange {
        ByteRange { offset, len }
    }

    #[inline]
    pub const fn empty() -> ByteRange {
        ByteRange { offset: 0, len: 0 }
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// An immutable buffer returned by an index scan, shared between the decoder and
/// any tables it produces, that can be released by its owner at any time.
///
/// Cloning a `LookupBuffer` is cheap and yields a handle to the same underlying
/// memory and the same release state. Once [`release`](Self::release) is called on
/// any handle, the contents are dropped and every subsequent [`read`](Self::read)
/// fails with a `BufferReleased` error.
///
/// Readers holding a [`BufferReadGuard`] block a concurrent release until the guard
/// is dropped, so a release never invalidates bytes that are being decoded.
#[derive(Clone)]
pub struct LookupBuffer {
    inner: Arc<SharedState>,
}

struct SharedState {
    data: RwLock<Option<Arc<[u8]>>>,
    len: usize,
}

impl LookupBuffer {
    /// Creates a new lookup buffer taking ownership of `data`.
    pub fn new(data: impl Into<Arc<[u8]>>) -> LookupBuffer {
        let data = data.into();
        let len = data.len();
        LookupBuffer {
            inner: Arc::new(SharedState {
                data: RwLock::new(Some(data)),
                len,
            }),
        }
    }

    /// Returns the length of the buffer in bytes, as it was when the buffer was
    /// created. The length stays available after release.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.len == 0
    }

    /// Returns `true` if the buffer contents were released.
    pub fn is_released(&self) -> bool {
        self.inner
            .data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Releases the buffer contents.
    ///
    /// Returns `true` if this call performed the release, `false` if the buffer had
    /// already been released.
    pub fn release(&self) -> bool {
        self.inner
            .data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }

    /// Acquires read access to the buffer contents.
    pub fn read(&self) -> Result<BufferReadGuard<'_>> {
        let guard = self
            .inner
            .data
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() {
            return Err(Error::buffer_released());
        }
        Ok(BufferReadGuard(guard))
    }

    /// Runs `f` over the bytes of `range`.
    ///
    /// Fails with `BufferReleased` if the buffer was released, and with
    /// `CorruptBuffer` if the range does not lie within the buffer.
    pub fn with_range<R>(&self, range: ByteRange, f: impl FnOnce(&[u8]) -> R) -> Result<R> {
        let data = self.read()?;
        let bytes = data.slice(range, "byte_range")?;
        Ok(f(bytes))
    }

    /// Returns `true` if both handles refer to the same underlying buffer.
    pub fn ptr_eq(&self, other: &LookupBuffer) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for LookupBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupBuffer")
            .field("len", &self.len())
            .field("released", &self.is_released())
            .finish()
    }
}

impl From<Vec<u8>> for LookupBuffer {
    fn from(vec: Vec<u8>) -> Self {
        LookupBuffer::new(vec)
    }
}

impl From<&[u8]> for LookupBuffer {
    fn from(s: &[u8]) -> Self {
        LookupBuffer::new(s)
    }
}

impl From<Arc<[u8]>> for LookupBuffer {
    fn from(data: Arc<[u8]>) -> Self {
        LookupBuffer::new(data)
    }
}

/// Read access to the contents of a [`LookupBuffer`] that has not been released.
pub struct BufferReadGuard<'a>(RwLockReadGuard<'a, Option<Arc<[u8]>>>);

impl BufferReadGuard<'_> {
    /// Returns the bytes of `range`, or a `CorruptBuffer` error naming `element`
    /// if the range does not lie within the buffer.
    pub fn slice(&self, range: ByteRange, element: &str) -> Result<&[u8]> {
        let data: &[u8] = self;
        data.get(range.offset..range.end())
            .ok_or_else(|| Error::out_of_bounds(element, range.offset, range.len, data.len()))
    }
}

impl Deref for BufferReadGuard<'_> {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        // The guard is only constructed over a present buffer.
        self.0.as_deref().unwrap_or(&[])
    }
}
