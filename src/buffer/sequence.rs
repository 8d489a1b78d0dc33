use super::pool;
use crate::error::{Error, Result};

//  0         read      write     capacity
//  v         v         v         v
//  ##########**********__________
//
//  #: consumed
//  *: readable
//  _: writable

/// A growable byte sequence with independent read and write cursors.
///
/// Numeric values are encoded little-endian throughout.
#[derive(Debug)]
pub struct SequenceBuffer {
    data: Vec<u8>,
    read_idx: usize,
    write_idx: usize,
    read_mark: usize,
    write_mark: usize,
    pooled: bool,
}

macro_rules! numeric_access {
    ($($ty:ty => $write:ident, $read:ident, $get:ident;)*) => {
        $(
            pub fn $write(&mut self, value: $ty) {
                self.write_bytes(&value.to_le_bytes());
            }

            pub fn $read(&mut self) -> Result<$ty> {
                let mut bytes = [0; std::mem::size_of::<$ty>()];
                self.read_bytes(&mut bytes)?;
                Ok(<$ty>::from_le_bytes(bytes))
            }

            /// Decodes a value at an absolute index without moving the read cursor.
            pub fn $get(&self, index: usize) -> Result<$ty> {
                let mut bytes = [0; std::mem::size_of::<$ty>()];
                let len = bytes.len();
                bytes.copy_from_slice(self.get_slice(index, len)?);
                Ok(<$ty>::from_le_bytes(bytes))
            }
        )*
    };
}

impl SequenceBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            read_idx: 0,
            write_idx: 0,
            read_mark: 0,
            write_mark: 0,
            pooled: false,
        }
    }

    /// Like [`SequenceBuffer::new`], but the storage is taken from and later returned to the
    /// process-wide free list.
    pub fn pooled(capacity: usize) -> Self {
        Self {
            data: pool::acquire(capacity),
            read_idx: 0,
            write_idx: 0,
            read_mark: 0,
            write_mark: 0,
            pooled: true,
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut buf = Self::new(bytes.len());
        buf.write_bytes(bytes);
        buf
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn read_index(&self) -> usize {
        self.read_idx
    }

    pub fn write_index(&self) -> usize {
        self.write_idx
    }

    pub fn readable_bytes(&self) -> usize {
        self.write_idx - self.read_idx
    }

    pub fn writable_bytes(&self) -> usize {
        self.data.len() - self.write_idx
    }

    pub fn is_empty(&self) -> bool {
        self.readable_bytes() == 0
    }

    /// The unread region.
    pub fn readable(&self) -> &[u8] {
        &self.data[self.read_idx..self.write_idx]
    }

    pub fn set_read_index(&mut self, index: usize) -> Result<()> {
        if index > self.write_idx {
            return Err(Error::BufferUnderrun {
                requested: index,
                readable: self.write_idx,
            });
        }

        self.read_idx = index;
        Ok(())
    }

    pub fn set_write_index(&mut self, index: usize) -> Result<()> {
        if index < self.read_idx || index > self.data.len() {
            return Err(Error::BufferUnderrun {
                requested: index,
                readable: self.data.len(),
            });
        }

        self.write_idx = index;
        Ok(())
    }

    pub fn mark_read_index(&mut self) {
        self.read_mark = self.read_idx;
    }

    pub fn reset_read_index(&mut self) {
        self.read_idx = self.read_mark.min(self.write_idx);
    }

    pub fn mark_write_index(&mut self) {
        self.write_mark = self.write_idx;
    }

    pub fn reset_write_index(&mut self) {
        self.write_idx = self.write_mark.clamp(self.read_idx, self.data.len());
    }

    /// Grows the storage so that at least `required` bytes fit in total. The new capacity is the
    /// smallest power of two no less than twice the current capacity and twice `required`.
    fn grow(&mut self, required: usize) {
        if required <= self.data.len() {
            return;
        }

        let new_capacity = (self.data.len() * 2).max(required * 2).next_power_of_two();
        self.data.resize(new_capacity, 0);
    }

    /// Makes room for `size` more bytes, reclaiming consumed space before reallocating.
    pub fn ensure_writable(&mut self, size: usize) {
        if self.writable_bytes() >= size {
            return;
        }

        if self.read_idx >= size {
            self.trim_consumed();
        } else {
            self.grow(self.write_idx + size);
        }
    }

    /// Shifts the unread bytes to the start of the storage.
    pub fn trim_consumed(&mut self) {
        if self.read_idx == 0 {
            return;
        }

        let shift = self.read_idx;
        self.data.copy_within(shift..self.write_idx, 0);
        self.write_idx -= shift;
        self.read_idx = 0;
        self.read_mark = self.read_mark.saturating_sub(shift);
        self.write_mark = self.write_mark.saturating_sub(shift).max(self.read_mark);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }

        self.ensure_writable(bytes.len());

        let end = self.write_idx + bytes.len();
        self.data[self.write_idx..end].copy_from_slice(bytes);
        self.write_idx = end;
    }

    /// Appends the readable region of another buffer without consuming it.
    pub fn write_buffer(&mut self, other: &SequenceBuffer) {
        self.write_bytes(other.readable());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(value as u8);
    }

    fn underrun(&self, requested: usize) -> Error {
        Error::BufferUnderrun {
            requested,
            readable: self.readable_bytes(),
        }
    }

    /// Consumes exactly `dst.len()` bytes.
    pub fn read_bytes(&mut self, dst: &mut [u8]) -> Result<()> {
        let src = self.read_slice(dst.len())?;
        dst.copy_from_slice(src);
        Ok(())
    }

    /// Consumes `len` bytes and returns them as a borrowed slice.
    pub fn read_slice(&mut self, len: usize) -> Result<&[u8]> {
        if len > self.readable_bytes() {
            return Err(self.underrun(len));
        }

        let begin = self.read_idx;
        self.read_idx += len;

        Ok(&self.data[begin..begin + len])
    }

    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.read_slice(len).map(|_| ())
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Borrows `len` bytes at an absolute index inside the written region.
    pub fn get_slice(&self, index: usize, len: usize) -> Result<&[u8]> {
        match index.checked_add(len) {
            Some(end) if end <= self.write_idx => Ok(&self.data[index..end]),
            _ => Err(Error::BufferUnderrun {
                requested: len,
                readable: self.write_idx.saturating_sub(index),
            }),
        }
    }

    numeric_access! {
        u8 => write_u8, read_u8, get_u8;
        i8 => write_i8, read_i8, get_i8;
        u16 => write_u16, read_u16, get_u16;
        i16 => write_i16, read_i16, get_i16;
        u32 => write_u32, read_u32, get_u32;
        i32 => write_i32, read_i32, get_i32;
        u64 => write_u64, read_u64, get_u64;
        i64 => write_i64, read_i64, get_i64;
        f32 => write_f32, read_f32, get_f32;
        f64 => write_f64, read_f64, get_f64;
    }

    /// Copies the unread region into a fresh buffer. Cursors and marks are not carried over.
    pub fn copy(&self) -> Self {
        let mut copy = if self.pooled {
            Self::pooled(self.readable_bytes())
        } else {
            Self::new(self.readable_bytes())
        };
        copy.write_bytes(self.readable());
        copy
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.readable().to_vec()
    }

    /// Empties the buffer, keeping its storage.
    pub fn clear(&mut self) {
        self.read_idx = 0;
        self.write_idx = 0;
        self.read_mark = 0;
        self.write_mark = 0;
    }
}

/// Deep copy: storage, cursors and marks.
impl Clone for SequenceBuffer {
    fn clone(&self) -> Self {
        let mut data = if self.pooled {
            pool::acquire(self.data.len())
        } else {
            vec![0; self.data.len()]
        };
        data[..self.data.len()].copy_from_slice(&self.data);

        Self {
            data,
            read_idx: self.read_idx,
            write_idx: self.write_idx,
            read_mark: self.read_mark,
            write_mark: self.write_mark,
            pooled: self.pooled,
        }
    }
}

impl Drop for SequenceBuffer {
    fn drop(&mut self) {
        if self.pooled {
            pool::release(std::mem::take(&mut self.data));
        }
    }
}

impl PartialEq for SequenceBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.readable() == other.readable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn little_endian_encoding() {
        let mut buf = SequenceBuffer::new(4);
        buf.write_u32(0x0403_0201);
        buf.write_u16(0x0605);

        assert_eq!(buf.readable(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(buf.get_u16(4), Ok(0x0605));
        assert_eq!(buf.read_u32(), Ok(0x0403_0201));
        assert_eq!(buf.read_u16(), Ok(0x0605));
        assert!(buf.is_empty());
    }

    #[test]
    fn growth_rounds_to_power_of_two() {
        let mut buf = SequenceBuffer::new(3);
        buf.write_bytes(&[0; 4]);
        assert_eq!(buf.capacity(), 8);

        let mut buf = SequenceBuffer::new(4);
        buf.write_bytes(&[0; 20]);
        assert_eq!(buf.capacity(), 64);

        let mut buf = SequenceBuffer::new(0);
        buf.write_u8(1);
        assert_eq!(buf.capacity(), 2);
    }

    #[test]
    fn consumed_space_is_reclaimed_before_growing() {
        let mut buf = SequenceBuffer::new(8);
        buf.write_bytes(&[1, 2, 3, 4, 5, 6, 7, 8]);
        buf.skip(6).unwrap();

        buf.write_bytes(&[9, 10, 11]);

        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.read_index(), 0);
        assert_eq!(buf.readable(), &[7, 8, 9, 10, 11]);
    }

    #[test]
    fn reads_past_write_cursor_fail() {
        let mut buf = SequenceBuffer::from_slice(&[1, 2, 3]);

        assert_eq!(
            buf.read_u32(),
            Err(Error::BufferUnderrun {
                requested: 4,
                readable: 3
            })
        );
        // A failed read consumes nothing
        assert_eq!(buf.readable_bytes(), 3);
        assert!(buf.get_u32(0).is_err());
        assert!(buf.set_read_index(4).is_err());
        assert!(buf.set_write_index(100).is_err());
    }

    #[test]
    fn marks() {
        let mut buf = SequenceBuffer::from_slice(&[1, 2, 3, 4]);

        buf.mark_read_index();
        assert_eq!(buf.read_u16(), Ok(0x0201));
        buf.reset_read_index();
        assert_eq!(buf.read_u8(), Ok(1));

        buf.mark_write_index();
        buf.write_u8(5);
        assert_eq!(buf.readable(), &[2, 3, 4, 5]);
        buf.reset_write_index();
        assert_eq!(buf.readable(), &[2, 3, 4]);
    }

    #[test]
    fn copy_is_shallow_clone_is_deep() {
        let mut buf = SequenceBuffer::new(16);
        buf.write_bytes(&[1, 2, 3, 4]);
        buf.skip(1).unwrap();
        buf.mark_read_index();

        let copy = buf.copy();
        assert_eq!(copy.read_index(), 0);
        assert_eq!(copy.readable(), &[2, 3, 4]);
        assert_eq!(copy.capacity(), 3);

        let mut clone = buf.clone();
        assert_eq!(clone.read_index(), 1);
        assert_eq!(clone.capacity(), 16);
        clone.set_read_index(0).unwrap();
        assert_eq!(clone.readable(), &[1, 2, 3, 4]);

        // The clone owns its storage
        clone.write_u8(5);
        assert_eq!(buf.readable(), &[2, 3, 4]);
    }

    #[test]
    fn pooled_buffers_behave_like_plain_ones() {
        let mut buf = SequenceBuffer::pooled(32);
        assert!(buf.capacity() >= 32);
        assert!(buf.is_empty());

        buf.write_f64(1.5);
        buf.write_bool(true);
        assert_eq!(buf.read_f64(), Ok(1.5));
        assert_eq!(buf.read_bool(), Ok(true));
    }
}
