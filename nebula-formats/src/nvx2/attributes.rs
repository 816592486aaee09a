//! Attribute extraction, triangles and per-group slicing

use serde::Serialize;

use crate::error::{DecodeError, DecodeResult};
use crate::options::Nvx2Options;
use crate::reader::ByteReader;

use super::components::{Attribute, ElementFormat};
use super::header::Nvx2Group;
use super::layout::{RawVertices, VertexLayout};

/// Fixed-point UV scale (16-bit)
pub const UV_FIXED_POINT_SCALE: f32 = 8191.0;
/// Normalized byte scale
pub const UNORM8_SCALE: f32 = 255.0;

/// Convert a fixed-point short into a float
#[inline]
pub fn fixed_point_to_f32(value: f32) -> f32 {
    value / UV_FIXED_POINT_SCALE
}

/// Convert a normalized byte into a float
#[inline]
pub fn unorm8_to_f32(value: f32) -> f32 {
    value / UNORM8_SCALE
}

/// Semantic vertex attributes, index-aligned with the global vertex buffer
///
/// Arrays are empty when the component is absent or disabled by the options.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AttributeSet {
    pub positions: Vec<[f32; 3]>,
    pub uvs: [Vec<[f32; 2]>; 4],
    pub colors: Vec<[f32; 4]>,
    pub weights: Vec<[f32; 4]>,
    /// Joint indices as stored; byte-encoded indices keep their raw value
    pub joint_indices: Vec<[f32; 4]>,
}

fn take<const N: usize>(record: &[f32], offset: usize, f: impl Fn(f32) -> f32) -> [f32; N] {
    core::array::from_fn(|i| f(record[offset + i]))
}

/// Split raw records into semantic attributes
///
/// Walks the layout once, tracking each component's offset inside the record.
/// Normal, tangent and binormal components are skipped but still advance the
/// offset by their width.
pub fn split_attributes(
    raw: &RawVertices,
    layout: &VertexLayout,
    options: &Nvx2Options,
) -> AttributeSet {
    let mut attrs = AttributeSet::default();
    let mut position4 = None;
    let mut offset = 0;

    for component in &layout.components {
        let o = offset;
        offset += component.count;

        let fixed = component.format == ElementFormat::I16;
        let byte = component.format == ElementFormat::U8;

        match component.attribute {
            Attribute::Position => {
                attrs.positions = raw.records().map(|r| take(r, o, |v| v)).collect();
            }
            Attribute::Position4 => position4 = Some(o),
            Attribute::Uv(layer) if options.create_uvs => {
                attrs.uvs[layer as usize] = raw
                    .records()
                    .map(|r| {
                        if fixed {
                            [fixed_point_to_f32(r[o]), 1.0 - fixed_point_to_f32(r[o + 1])]
                        } else {
                            [r[o], r[o + 1]]
                        }
                    })
                    .collect();
            }
            Attribute::Color if options.create_colors => {
                attrs.colors = raw
                    .records()
                    .map(|r| take(r, o, |v| if byte { unorm8_to_f32(v) } else { v }))
                    .collect();
            }
            Attribute::Weights if options.create_weights => {
                attrs.weights = raw
                    .records()
                    .map(|r| take(r, o, |v| if byte { unorm8_to_f32(v) } else { v }))
                    .collect();
            }
            Attribute::JointIndices if options.create_weights => {
                attrs.joint_indices = raw.records().map(|r| take(r, o, |v| v)).collect();
            }
            _ => {}
        }
    }

    if attrs.positions.is_empty()
        && let Some(o) = position4
    {
        attrs.positions = raw.records().map(|r| take(r, o, |v| v)).collect();
    }

    attrs
}

/// Read `count` triangles (3 x u16 each)
pub fn decode_triangles(reader: &mut ByteReader<'_>, count: usize) -> DecodeResult<Vec<[u16; 3]>> {
    reader.ensure(count.saturating_mul(6))?;
    let mut triangles = Vec::with_capacity(count);
    for _ in 0..count {
        triangles.push([reader.read_u16()?, reader.read_u16()?, reader.read_u16()?]);
    }
    Ok(triangles)
}

/// Geometry of one group with group-local vertex indices
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GroupMesh {
    /// Position in the file's group table
    pub index: usize,
    pub group: Nvx2Group,
    pub attributes: AttributeSet,
    pub triangles: Vec<[u16; 3]>,
}

impl GroupMesh {
    pub fn vertex_count(&self) -> usize {
        self.group.vertex_count
    }
}

fn slice_attr<T: Clone>(values: &[T], range: core::ops::Range<usize>) -> Vec<T> {
    if values.is_empty() {
        Vec::new()
    } else {
        values[range].to_vec()
    }
}

/// Cut one group out of the global buffers
///
/// Face indices are re-based by `vertex_first`; every face must land inside
/// the group's vertex range.
pub fn slice_group(
    index: usize,
    attrs: &AttributeSet,
    vertex_total: usize,
    faces: &[[u16; 3]],
    group: &Nvx2Group,
) -> DecodeResult<GroupMesh> {
    let out_of_range = |reason: String| DecodeError::GroupOutOfRange {
        group: index,
        reason,
    };

    let vertex_end = group.vertex_first.checked_add(group.vertex_count);
    if vertex_end.is_none_or(|end| end > vertex_total) {
        return Err(out_of_range(format!(
            "vertices {}+{} exceed vertex count {}",
            group.vertex_first, group.vertex_count, vertex_total
        )));
    }
    let triangle_end = group.triangle_first.checked_add(group.triangle_count);
    if triangle_end.is_none_or(|end| end > faces.len()) {
        return Err(out_of_range(format!(
            "triangles {}+{} exceed triangle count {}",
            group.triangle_first,
            group.triangle_count,
            faces.len()
        )));
    }
    let vertices = group.vertex_range();
    let triangles = group.triangle_range();

    let mut local = Vec::with_capacity(group.triangle_count);
    for face in &faces[triangles] {
        let mut rebased = [0u16; 3];
        for (slot, &v) in rebased.iter_mut().zip(face) {
            let v = v as usize;
            if !vertices.contains(&v) {
                return Err(out_of_range(format!(
                    "face references vertex {} outside {}..{}",
                    v, vertices.start, vertices.end
                )));
            }
            *slot = (v - group.vertex_first) as u16;
        }
        local.push(rebased);
    }

    Ok(GroupMesh {
        index,
        group: *group,
        attributes: AttributeSet {
            positions: slice_attr(&attrs.positions, vertices.clone()),
            uvs: core::array::from_fn(|i| slice_attr(&attrs.uvs[i], vertices.clone())),
            colors: slice_attr(&attrs.colors, vertices.clone()),
            weights: slice_attr(&attrs.weights, vertices.clone()),
            joint_indices: slice_attr(&attrs.joint_indices, vertices),
        },
        triangles: local,
    })
}
