//! Vertex record layout and raw vertex decoding

use crate::error::{DecodeError, DecodeResult};
use crate::reader::ByteReader;

use super::components::{ComponentDescriptor, ElementFormat, FormatVersion, present_components};

/// Ordered list of the components making up one vertex record
#[derive(Debug, Clone, PartialEq)]
pub struct VertexLayout {
    pub version: FormatVersion,
    pub components: Vec<&'static ComponentDescriptor>,
}

impl VertexLayout {
    /// Record size in bytes
    pub fn byte_size(&self) -> usize {
        self.components.iter().map(|c| c.size()).sum()
    }

    /// Elements per record across all components
    pub fn element_count(&self) -> usize {
        self.components.iter().map(|c| c.count).sum()
    }

    /// Concatenated layout string, e.g. `3f2h4B`
    pub fn layout_string(&self) -> String {
        self.components.iter().map(|c| c.layout()).collect()
    }
}

/// Build the record layout for a component mask
pub fn build_vertex_layout(components: u32, version: FormatVersion) -> DecodeResult<VertexLayout> {
    let layout = VertexLayout {
        version,
        components: present_components(components, version).collect(),
    };
    if layout.components.is_empty() {
        return Err(DecodeError::EmptyLayout { components });
    }
    Ok(layout)
}

/// Decoded vertex records, one flat run of elements per vertex
///
/// Integer elements are widened to `f32` exactly (i16 and u8 fit), no scaling
/// is applied at this stage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawVertices {
    pub stride: usize,
    pub values: Vec<f32>,
}

impl RawVertices {
    pub fn len(&self) -> usize {
        if self.stride == 0 {
            0
        } else {
            self.values.len() / self.stride
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements of vertex `index`
    pub fn record(&self, index: usize) -> &[f32] {
        &self.values[index * self.stride..(index + 1) * self.stride]
    }

    pub fn records(&self) -> impl Iterator<Item = &[f32]> {
        self.values.chunks_exact(self.stride.max(1))
    }
}

/// Decode `count` vertex records
///
/// The layout size is checked against the header's record width before any
/// vertex bytes are consumed.
pub fn decode_vertices(
    reader: &mut ByteReader<'_>,
    count: usize,
    layout: &VertexLayout,
    vertex_width_bytes: usize,
) -> DecodeResult<RawVertices> {
    let computed = layout.byte_size();
    if computed != vertex_width_bytes {
        return Err(DecodeError::LayoutSizeMismatch {
            computed,
            expected: vertex_width_bytes,
        });
    }
    reader.ensure(count.saturating_mul(computed))?;

    let stride = layout.element_count();
    let mut values = Vec::with_capacity(count * stride);
    for _ in 0..count {
        for component in &layout.components {
            for _ in 0..component.count {
                let value = match component.format {
                    ElementFormat::F32 => reader.read_f32()?,
                    ElementFormat::I16 => reader.read_i16()? as f32,
                    ElementFormat::U8 => reader.read_u8()? as f32,
                };
                values.push(value);
            }
        }
    }

    Ok(RawVertices { stride, values })
}
