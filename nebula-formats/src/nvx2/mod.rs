//! NVX2 mesh decoder
//!
//! An NVX2 file holds one flat vertex buffer and one triangle buffer shared by
//! all of its groups:
//!
//! ```text
//! header (28 bytes)
//! group table (group_count * 24 bytes)
//! vertex buffer (vertex_count * vertex_width * 4 bytes)
//! triangle buffer (triangle_count * 6 bytes)
//! edge buffer (not decoded)
//! ```
//!
//! The vertex record layout is described only by a component bitmask whose
//! meaning depends on the engine generation the file was packed for, see
//! [`components`].

pub mod attributes;
pub mod components;
pub mod header;
pub mod layout;


pub use attributes::{
    AttributeSet, GroupMesh, decode_triangles, fixed_point_to_f32, slice_group, split_attributes,
    unorm8_to_f32,
};
pub use components::{
    Attribute, CURRENT_COMPONENTS, ComponentDescriptor, ElementFormat, FormatVersion,
    LEGACY_COMPONENTS, resolve_format_version, vertex_size,
};
pub use header::{Nvx2Group, Nvx2Header, read_groups, read_header};
pub use layout::{RawVertices, VertexLayout, build_vertex_layout, decode_vertices};

use serde::Serialize;

use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::DecodeResult;
use crate::options::Nvx2Options;
use crate::reader::ByteReader;

/// Decoded NVX2 file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nvx2Mesh {
    pub header: Nvx2Header,
    /// Version the vertex buffer was decoded with
    pub version: FormatVersion,
    /// One mesh per group, in file order
    pub groups: Vec<GroupMesh>,
}

impl Nvx2Mesh {
    pub fn total_vertices(&self) -> usize {
        self.groups.iter().map(GroupMesh::vertex_count).sum()
    }

    pub fn total_triangles(&self) -> usize {
        self.groups.iter().map(|g| g.triangles.len()).sum()
    }
}

/// Decode an NVX2 file, logging diagnostics through `tracing`
pub fn decode_nvx2(data: &[u8], options: &Nvx2Options) -> DecodeResult<Nvx2Mesh> {
    decode_nvx2_with(data, options, &mut TracingSink)
}

/// Decode an NVX2 file, reporting diagnostics to `sink`
pub fn decode_nvx2_with(
    data: &[u8],
    options: &Nvx2Options,
    sink: &mut impl DiagnosticSink,
) -> DecodeResult<Nvx2Mesh> {
    decode(data, options, sink).map_err(|e| sink.fail(e))
}

fn decode(
    data: &[u8],
    options: &Nvx2Options,
    sink: &mut impl DiagnosticSink,
) -> DecodeResult<Nvx2Mesh> {
    let mut reader = ByteReader::little_endian(data);

    let header = read_header(&mut reader)?;
    tracing::debug!(
        "nvx2 header: {} groups, {} vertices ({} words), {} triangles, components 0x{:08X}",
        header.group_count,
        header.vertex_count,
        header.vertex_width,
        header.triangle_count,
        header.vertex_components
    );

    let groups = read_groups(&mut reader, header.group_count)?;

    let version = resolve_format_version(
        options.version,
        header.vertex_components,
        header.vertex_width_bytes(),
        sink,
    );

    let unknown = components::unknown_bits(header.vertex_components, version);
    if unknown != 0 {
        sink.warning(format!(
            "Ignoring vertex component bits 0x{:08X} unknown to nvx2 version {}",
            unknown,
            version.number()
        ));
    }

    let layout = build_vertex_layout(header.vertex_components, version)?;
    tracing::debug!("vertex layout: {}", layout.layout_string());

    let raw = decode_vertices(
        &mut reader,
        header.vertex_count,
        &layout,
        header.vertex_width_bytes(),
    )?;
    let attrs = split_attributes(&raw, &layout, options);

    let faces = decode_triangles(&mut reader, header.triangle_count)?;

    let vertex_count = raw.len();
    let groups = groups
        .iter()
        .enumerate()
        .map(|(i, group)| slice_group(i, &attrs, vertex_count, &faces, group))
        .collect::<DecodeResult<Vec<_>>>()?;

    Ok(Nvx2Mesh {
        header,
        version,
        groups,
    })
}
