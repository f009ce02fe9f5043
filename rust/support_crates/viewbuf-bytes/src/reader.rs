//! Bounds-checked little-endian reads over byte slices.

use byteorder::{ByteOrder, LE};
use viewbuf_common::{Result, error::Error};

use crate::ByteRange;

/// A fixed-width value that can be read from its little-endian representation.
pub trait LeValue: Sized + Copy {
    /// Size of the encoded value in bytes.
    const SIZE: usize;

    /// Reads the value from the first `SIZE` bytes of `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is shorter than `SIZE`.
    fn read_le(bytes: &[u8]) -> Self;
}

impl LeValue for u16 {
    const SIZE: usize = 2;

    #[inline]
    fn read_le(bytes: &[u8]) -> Self {
        LE::read_u16(bytes)
    }
}

impl LeValue for u32 {
    const SIZE: usize = 4;

    #[inline]
    fn read_le(bytes: &[u8]) -> Self {
        LE::read_u32(bytes)
    }
}

impl LeValue for u64 {
    const SIZE: usize = 8;

    #[inline]
    fn read_le(bytes: &[u8]) -> Self {
        LE::read_u64(bytes)
    }
}

impl LeValue for f64 {
    const SIZE: usize = 8;

    #[inline]
    fn read_le(bytes: &[u8]) -> Self {
        LE::read_f64(bytes)
    }
}

/// Positional reads of little-endian values from anything that exposes a byte slice.
pub trait ValueReader {
    /// Reads a value at `pos`, failing with `CorruptBuffer` (attributed to `element`)
    /// when the value does not fit into the slice.
    fn read_value<T: LeValue>(&self, pos: usize, element: &str) -> Result<T>;
}

impl<S> ValueReader for S
where
    S: AsRef<[u8]> + ?Sized,
{
    #[inline]
    fn read_value<T: LeValue>(&self, pos: usize, element: &str) -> Result<T> {
        let bytes = self.as_ref();
        match pos.checked_add(T::SIZE) {
            Some(end) if end <= bytes.len() => Ok(T::read_le(&bytes[pos..end])),
            _ => Err(Error::out_of_bounds(element, pos, T::SIZE, bytes.len())),
        }
    }
}

/// A forward-only cursor over a byte slice.
///
/// All positions reported by the cursor are absolute offsets into the slice it was
/// created over, so that ranges taken from it can be resolved against the same
/// buffer later on. Every read checks its bounds before touching the data; a read
/// that would run past the end fails with `CorruptBuffer` and leaves the cursor
/// where it was.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8], pos: usize) -> ByteCursor<'a> {
        ByteCursor { data, pos }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes between the cursor and the end of the data.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Reads a value and advances past it.
    #[inline]
    pub fn read<T: LeValue>(&mut self, element: &str) -> Result<T> {
        let value = self.data.read_value::<T>(self.pos, element)?;
        self.pos += T::SIZE;
        Ok(value)
    }

    /// Checks that `len` more bytes are available without consuming them.
    pub fn ensure(&self, len: usize, element: &str) -> Result<()> {
        if len > self.remaining() {
            return Err(Error::out_of_bounds(
                element,
                self.pos,
                len,
                self.data.len(),
            ));
        }
        Ok(())
    }

    /// Returns the next `len` bytes and advances past them.
    pub fn take(&mut self, len: usize, element: &str) -> Result<&'a [u8]> {
        self.ensure(len, element)?;
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Returns the absolute range of the next `len` bytes and advances past them.
    pub fn take_range(&mut self, len: usize, element: &str) -> Result<ByteRange> {
        self.ensure(len, element)?;
        let range = ByteRange::new(self.pos, len);
        self.pos += len;
        Ok(range)
    }

    /// Advances the cursor by `len` bytes.
    pub fn skip(&mut self, len: usize, element: &str) -> Result<()> {
        self.ensure(len, element)?;
        self.pos += len;
        Ok(())
    }
}
