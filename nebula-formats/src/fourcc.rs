//! Four-character codes

use core::fmt;

use serde::{Serialize, Serializer};

/// A four-character code naming a record type or magic signature
///
/// Stored in reading order, so `FourCC::new(*b"MATE")` displays as `MATE`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// Create a code from its four bytes in reading order
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Build a code from a `u32` whose little-endian bytes are the characters
    pub const fn from_u32_le(value: u32) -> Self {
        Self(value.to_le_bytes())
    }

    /// Build a code from a `u32` whose big-endian bytes are the characters
    pub const fn from_u32_be(value: u32) -> Self {
        Self(value.to_be_bytes())
    }

    /// Raw bytes in reading order
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02X}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC({})", self)
    }
}

impl Serialize for FourCC {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_printable() {
        assert_eq!(FourCC::new(*b">MDL").to_string(), ">MDL");
        assert_eq!(FourCC::new(*b"EOF_").to_string(), "EOF_");
    }

    #[test]
    fn test_display_escapes_binary() {
        assert_eq!(
            FourCC::new([b'A', 0, b'B', 0xFF]).to_string(),
            "A\\x00B\\xFF"
        );
    }

    #[test]
    fn test_from_u32_orders() {
        let value = u32::from_le_bytes(*b"NEB3");
        assert_eq!(FourCC::from_u32_le(value), FourCC::new(*b"NEB3"));
        assert_eq!(FourCC::from_u32_be(value), FourCC::new(*b"3BEN"));
    }
}
