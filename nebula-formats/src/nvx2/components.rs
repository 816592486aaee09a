//! Vertex component registries
//!
//! Each NVX2 format version assigns its own meaning to the bits of the header's
//! component mask. The tables below list the components of each version in
//! canonical order (ascending bit), which is also the order the fields appear
//! inside one vertex record.

use serde::Serialize;

use crate::diagnostics::DiagnosticSink;
use crate::options::FormatVersionHint;

/// NVX2 format version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatVersion {
    /// Nebula 2 files
    Legacy,
    /// Nebula 3 files
    Current,
}

impl FormatVersion {
    /// Auto-detect preference order
    pub const CANDIDATES: [FormatVersion; 2] = [FormatVersion::Current, FormatVersion::Legacy];

    /// Engine generation number
    pub fn number(self) -> u32 {
        match self {
            FormatVersion::Legacy => 2,
            FormatVersion::Current => 3,
        }
    }

    pub fn components(self) -> &'static [ComponentDescriptor] {
        match self {
            FormatVersion::Legacy => LEGACY_COMPONENTS,
            FormatVersion::Current => CURRENT_COMPONENTS,
        }
    }
}

/// On-disk encoding of one element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementFormat {
    /// 32-bit float
    F32,
    /// 16-bit signed fixed point
    I16,
    /// 8-bit unsigned
    U8,
}

impl ElementFormat {
    pub const fn size(self) -> usize {
        match self {
            ElementFormat::F32 => 4,
            ElementFormat::I16 => 2,
            ElementFormat::U8 => 1,
        }
    }

    /// Struct-style layout code ('f', 'h', 'B')
    pub const fn code(self) -> char {
        match self {
            ElementFormat::F32 => 'f',
            ElementFormat::I16 => 'h',
            ElementFormat::U8 => 'B',
        }
    }
}

/// Attribute a component feeds into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Position,
    /// Homogeneous position (legacy only), used when `Position` is absent
    Position4,
    Normal,
    /// UV layer 0..=3
    Uv(u8),
    Color,
    Tangent,
    Binormal,
    Weights,
    JointIndices,
}

impl Attribute {
    /// Whether decoded values are kept
    ///
    /// Normals, tangents and binormals only advance the record offset.
    pub fn is_retained(self) -> bool {
        !matches!(
            self,
            Attribute::Normal | Attribute::Tangent | Attribute::Binormal
        )
    }
}

/// One entry of a component registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentDescriptor {
    pub name: &'static str,
    pub bit: u32,
    pub attribute: Attribute,
    pub format: ElementFormat,
    /// Elements per vertex
    pub count: usize,
}

impl ComponentDescriptor {
    const fn new(
        name: &'static str,
        bit: u32,
        attribute: Attribute,
        format: ElementFormat,
        count: usize,
    ) -> Self {
        Self {
            name,
            bit,
            attribute,
            format,
            count,
        }
    }

    /// Byte width inside a vertex record
    pub const fn size(&self) -> usize {
        self.format.size() * self.count
    }

    /// Element layout string, e.g. `3f` or `4B`
    pub fn layout(&self) -> String {
        format!("{}{}", self.count, self.format.code())
    }

    pub fn is_set(&self, components: u32) -> bool {
        components & self.bit != 0
    }
}

use Attribute::*;
use ElementFormat::*;

/// Nebula 3 component mask
pub const CURRENT_COMPONENTS: &[ComponentDescriptor] = &[
    ComponentDescriptor::new("Coord", 1 << 0, Position, F32, 3),
    ComponentDescriptor::new("Normal", 1 << 1, Normal, F32, 3),
    ComponentDescriptor::new("NormalUB4N", 1 << 2, Normal, U8, 4),
    ComponentDescriptor::new("Uv0", 1 << 3, Uv(0), F32, 2),
    ComponentDescriptor::new("Uv0S2", 1 << 4, Uv(0), I16, 2),
    ComponentDescriptor::new("Uv1", 1 << 5, Uv(1), F32, 2),
    ComponentDescriptor::new("Uv1S2", 1 << 6, Uv(1), I16, 2),
    ComponentDescriptor::new("Uv2", 1 << 7, Uv(2), F32, 2),
    ComponentDescriptor::new("Uv2S2", 1 << 8, Uv(2), I16, 2),
    ComponentDescriptor::new("Uv3", 1 << 9, Uv(3), F32, 2),
    ComponentDescriptor::new("Uv3S2", 1 << 10, Uv(3), I16, 2),
    ComponentDescriptor::new("Color", 1 << 11, Color, F32, 4),
    ComponentDescriptor::new("ColorUB4N", 1 << 12, Color, U8, 4),
    ComponentDescriptor::new("Tangent", 1 << 13, Tangent, F32, 3),
    ComponentDescriptor::new("TangentUB4N", 1 << 14, Tangent, U8, 4),
    ComponentDescriptor::new("Binormal", 1 << 15, Binormal, F32, 3),
    ComponentDescriptor::new("BinormalUB4N", 1 << 16, Binormal, U8, 4),
    ComponentDescriptor::new("Weights", 1 << 17, Weights, F32, 4),
    ComponentDescriptor::new("WeightsUB4N", 1 << 18, Weights, U8, 4),
    ComponentDescriptor::new("JIndices", 1 << 19, JointIndices, F32, 4),
    ComponentDescriptor::new("JIndicesUB4", 1 << 20, JointIndices, U8, 4),
];

/// Nebula 2 component mask
pub const LEGACY_COMPONENTS: &[ComponentDescriptor] = &[
    ComponentDescriptor::new("Coord", 1 << 0, Position, F32, 3),
    ComponentDescriptor::new("Normal", 1 << 1, Normal, F32, 3),
    ComponentDescriptor::new("Uv0", 1 << 2, Uv(0), F32, 2),
    ComponentDescriptor::new("Uv1", 1 << 3, Uv(1), F32, 2),
    ComponentDescriptor::new("Uv2", 1 << 4, Uv(2), F32, 2),
    ComponentDescriptor::new("Uv3", 1 << 5, Uv(3), F32, 2),
    ComponentDescriptor::new("Color", 1 << 6, Color, F32, 4),
    ComponentDescriptor::new("Tangent", 1 << 7, Tangent, F32, 3),
    ComponentDescriptor::new("Binormal", 1 << 8, Binormal, F32, 3),
    ComponentDescriptor::new("Weights", 1 << 9, Weights, F32, 4),
    ComponentDescriptor::new("JIndices", 1 << 10, JointIndices, F32, 4),
    ComponentDescriptor::new("Coord4", 1 << 11, Position4, F32, 4),
];

/// Components of `version` whose bit is set, in canonical order
pub fn present_components(
    components: u32,
    version: FormatVersion,
) -> impl Iterator<Item = &'static ComponentDescriptor> {
    version
        .components()
        .iter()
        .filter(move |c| c.is_set(components))
}

/// Per-vertex byte size the mask implies under `version`
pub fn vertex_size(components: u32, version: FormatVersion) -> usize {
    present_components(components, version)
        .map(ComponentDescriptor::size)
        .sum()
}

/// Mask bits with no meaning under `version`
pub fn unknown_bits(components: u32, version: FormatVersion) -> u32 {
    let known = version.components().iter().fold(0, |acc, c| acc | c.bit);
    components & !known
}

/// Resolve the format version to decode with
///
/// A forced hint is returned as is. For `Auto`, the first candidate (current
/// before legacy) whose vertex size equals `vertex_width_bytes` wins; if none
/// match, falls back to current with a warning.
pub fn resolve_format_version(
    requested: FormatVersionHint,
    components: u32,
    vertex_width_bytes: usize,
    sink: &mut impl DiagnosticSink,
) -> FormatVersion {
    if let Some(version) = requested.forced() {
        return version;
    }

    let detected = FormatVersion::CANDIDATES
        .into_iter()
        .find(|&v| vertex_size(components, v) == vertex_width_bytes);

    match detected {
        Some(version) => {
            sink.info(format!("Detected nvx2 version: {}", version.number()));
            version
        }
        None => {
            sink.warning(format!(
                "Could not detect nvx2 version (components 0x{:08X}, width {} bytes), assuming {}",
                components,
                vertex_width_bytes,
                FormatVersion::Current.number()
            ));
            FormatVersion::Current
        }
    }
}
