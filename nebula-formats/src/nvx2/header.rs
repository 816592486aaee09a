//! NVX2 header and group table
//!
//! # Layout
//! ```text
//! 0x00: magic "NVX2"
//! 0x04: group_count i32
//! 0x08: vertex_count i32
//! 0x0C: vertex_width i32 (in 4-byte words)
//! 0x10: triangle_count i32
//! 0x14: edge_count i32
//! 0x18: vertex_components u32 (component mask)
//! 0x1C: group table (group_count * 24 bytes)
//! ```

use serde::Serialize;

use crate::NVX2_MAGIC;
use crate::error::{DecodeError, DecodeResult};
use crate::fourcc::FourCC;
use crate::reader::ByteReader;

/// NVX2 file header (28 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Nvx2Header {
    pub magic: FourCC,
    pub group_count: usize,
    pub vertex_count: usize,
    /// Vertex record width in 4-byte words
    pub vertex_width: usize,
    pub triangle_count: usize,
    pub edge_count: usize,
    pub vertex_components: u32,
}

impl Nvx2Header {
    pub const SIZE: usize = 28;

    /// Vertex record width in bytes
    pub fn vertex_width_bytes(&self) -> usize {
        self.vertex_width * 4
    }
}

/// Contiguous slice of the global buffers making up one mesh object (24 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Nvx2Group {
    pub vertex_first: usize,
    pub vertex_count: usize,
    pub triangle_first: usize,
    pub triangle_count: usize,
    pub edge_first: usize,
    pub edge_count: usize,
}

impl Nvx2Group {
    pub const SIZE: usize = 24;

    pub fn vertex_range(&self) -> core::ops::Range<usize> {
        self.vertex_first..self.vertex_first + self.vertex_count
    }

    pub fn triangle_range(&self) -> core::ops::Range<usize> {
        self.triangle_first..self.triangle_first + self.triangle_count
    }
}

/// Read and validate the header
pub fn read_header(reader: &mut ByteReader<'_>) -> DecodeResult<Nvx2Header> {
    reader.ensure(Nvx2Header::SIZE)?;

    let magic = FourCC::new(reader.read_array()?);
    if magic != NVX2_MAGIC {
        return Err(DecodeError::BadMagic {
            found: magic,
            expected: NVX2_MAGIC,
        });
    }

    Ok(Nvx2Header {
        magic,
        group_count: reader.read_count("group count")?,
        vertex_count: reader.read_count("vertex count")?,
        vertex_width: reader.read_count("vertex width")?,
        triangle_count: reader.read_count("triangle count")?,
        edge_count: reader.read_count("edge count")?,
        vertex_components: reader.read_u32()?,
    })
}

/// Read `count` group records
pub fn read_groups(reader: &mut ByteReader<'_>, count: usize) -> DecodeResult<Vec<Nvx2Group>> {
    if count == 0 {
        return Err(DecodeError::EmptyGroupTable);
    }
    reader.ensure(count.saturating_mul(Nvx2Group::SIZE))?;

    let mut groups = Vec::with_capacity(count);
    for _ in 0..count {
        groups.push(Nvx2Group {
            vertex_first: reader.read_count("group vertex_first")?,
            vertex_count: reader.read_count("group vertex_count")?,
            triangle_first: reader.read_count("group triangle_first")?,
            triangle_count: reader.read_count("group triangle_count")?,
            edge_first: reader.read_count("group edge_first")?,
            edge_count: reader.read_count("group edge_count")?,
        });
    }
    Ok(groups)
}
