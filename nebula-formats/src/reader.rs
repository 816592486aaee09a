//! Forward-only byte cursor shared by both decoders

use std::io::{Cursor, Read};

use serde::Serialize;

use crate::error::{DecodeError, DecodeResult};
use crate::fourcc::FourCC;

/// Byte order of multi-byte fields in a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    Little,
    Big,
}

/// Sequential reader over a borrowed byte slice
///
/// Every read either consumes exactly the requested bytes or fails with
/// [`DecodeError::TruncatedInput`] without advancing.
pub struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
    order: ByteOrder,
}

macro_rules! read_number {
    ($name:ident, $ty:ty) => {
        pub fn $name(&mut self) -> DecodeResult<$ty> {
            let buf: [u8; size_of::<$ty>()] = self.read_array()?;
            Ok(match self.order {
                ByteOrder::Little => <$ty>::from_le_bytes(buf),
                ByteOrder::Big => <$ty>::from_be_bytes(buf),
            })
        }
    };
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8], order: ByteOrder) -> Self {
        Self {
            cursor: Cursor::new(data),
            order,
        }
    }

    /// Little-endian reader (NVX2 files are always little-endian)
    pub fn little_endian(data: &'a [u8]) -> Self {
        Self::new(data, ByteOrder::Little)
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    pub fn set_order(&mut self, order: ByteOrder) {
        self.order = order;
    }

    /// Current offset from the start of the data
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.position())
    }

    /// Fail early if fewer than `needed` bytes remain
    pub fn ensure(&self, needed: usize) -> DecodeResult<()> {
        if self.remaining() < needed {
            return Err(self.truncated(needed));
        }
        Ok(())
    }

    fn truncated(&self, needed: usize) -> DecodeError {
        DecodeError::TruncatedInput {
            offset: self.position(),
            needed,
            available: self.remaining(),
        }
    }

    pub fn read_array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        self.ensure(N)?;
        let mut buf = [0u8; N];
        self.cursor
            .read_exact(&mut buf)
            .map_err(|_| self.truncated(N))?;
        Ok(buf)
    }

    /// Borrow the next `len` bytes and advance past them
    pub fn read_bytes(&mut self, len: usize) -> DecodeResult<&'a [u8]> {
        self.ensure(len)?;
        let start = self.position();
        let data: &'a [u8] = *self.cursor.get_ref();
        self.cursor.set_position((start + len) as u64);
        Ok(&data[start..start + len])
    }

    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Single byte, non-zero is true
    pub fn read_bool(&mut self) -> DecodeResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    read_number!(read_u16, u16);
    read_number!(read_i16, i16);
    read_number!(read_u32, u32);
    read_number!(read_i32, i32);
    read_number!(read_f32, f32);

    /// Signed 32-bit count that must not be negative
    pub fn read_count(&mut self, field: &'static str) -> DecodeResult<usize> {
        let value = self.read_i32()?;
        usize::try_from(value).map_err(|_| DecodeError::NegativeCount { field, value })
    }

    pub fn read_f32x2(&mut self) -> DecodeResult<[f32; 2]> {
        Ok([self.read_f32()?, self.read_f32()?])
    }

    pub fn read_f32x4(&mut self) -> DecodeResult<[f32; 4]> {
        Ok([
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
        ])
    }

    /// Length-prefixed string: u16 length followed by that many bytes
    pub fn read_string(&mut self) -> DecodeResult<String> {
        let len = self.read_u16()? as usize;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Four-character code stored as a u32 in the reader's byte order
    ///
    /// Big-endian files therefore store their tags byte-reversed.
    pub fn read_fourcc(&mut self) -> DecodeResult<FourCC> {
        Ok(FourCC::from_u32_le(self.read_u32()?))
    }
}
