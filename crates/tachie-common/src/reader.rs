//! Binary reader for bounds-checked parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads
//! zerocopy structs and raw byte runs from a byte slice and reports an error
//! instead of panicking when a read would pass the end of the buffer.

use zerocopy::FromBytes;

use crate::{Error, Result};

/// A binary reader over a borrowed byte slice.
///
/// # Example
///
/// ```
/// use tachie_common::BinaryReader;
///
/// let data = [0xC8, 0x00, 0x2C, 0x01];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_bytes(2).unwrap(), &[0xC8, 0x00]);
/// assert_eq!(reader.remaining(), 2);
/// assert!(reader.read_bytes(3).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Create a new reader starting at a specific position.
    #[inline]
    pub const fn new_at(data: &'a [u8], position: usize) -> Self {
        Self { data, position }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.position > self.data.len() || self.remaining() < count {
            return Err(Error::UnexpectedEof {
                offset: self.position,
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a fixed-size, NUL-padded name field.
    ///
    /// Bytes are taken as raw character codes up to the first zero byte.
    /// Control characters are dropped.
    pub fn read_name_in_buffer(&mut self, buffer_size: usize) -> Result<String> {
        let bytes = self.read_bytes(buffer_size)?;
        Ok(bytes
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| b as char)
            .filter(|c| !c.is_control())
            .collect())
    }

    /// Read a struct using zerocopy.
    ///
    /// The struct must implement `FromBytes` from the zerocopy crate.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let offset = self.position;
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            offset,
            needed: size,
            available: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zerocopy::little_endian::U16;

    #[test]
    fn test_read_struct_and_bytes() {
        let data = [
            0x2C, 0x01, // U16: 300
            0xAA, 0xBB,
        ];
        let mut reader = BinaryReader::new(&data);

        let value: U16 = reader.read_struct().unwrap();
        assert_eq!(value.get(), 300);
        assert_eq!(reader.position(), 2);
        assert_eq!(reader.read_bytes(2).unwrap(), &[0xAA, 0xBB]);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_name_stops_at_nul() {
        let mut data = [0u8; 20];
        data[..6].copy_from_slice(b"EV_A02");
        data[7] = b'X'; // garbage after the terminator
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_name_in_buffer(20).unwrap(), "EV_A02");
        assert_eq!(reader.position(), 20);
    }

    #[test]
    fn test_read_name_drops_control_bytes() {
        let data = [b'A', 0x07, b'B', 0x1F, b'C', 0];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_name_in_buffer(6).unwrap(), "ABC");
    }

    #[test]
    fn test_read_name_without_terminator() {
        let data = *b"ABCD";
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_name_in_buffer(4).unwrap(), "ABCD");
    }

    #[test]
    fn test_eof_error_reports_offset() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = BinaryReader::new_at(&data, 2);

        match reader.read_bytes(2) {
            Err(Error::UnexpectedEof {
                offset,
                needed,
                available,
            }) => {
                assert_eq!(offset, 2);
                assert_eq!(needed, 2);
                assert_eq!(available, 1);
            }
            other => panic!("expected EOF error, got {:?}", other),
        }
    }

    #[test]
    fn test_start_past_end_is_empty() {
        let data = [0u8; 4];
        let mut reader = BinaryReader::new_at(&data, 10);

        assert!(reader.is_empty());
        assert_eq!(reader.remaining(), 0);
        assert!(reader.read_bytes(0).is_err());
        assert!(reader.read_bytes(1).is_err());
    }
}
