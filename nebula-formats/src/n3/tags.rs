//! N3 tag registry
//!
//! Structure tags drive the node tree; every other tag is a data tag owned by
//! one handler category. [`TAG_REGISTRY`] lists each data tag with its
//! category and payload shape.

use core::fmt;

use serde::Serialize;

use crate::fourcc::FourCC;

// =============================================================================
// Structure tags
// =============================================================================

/// Start of model: model type fourcc + name
pub const MODEL_OPEN: FourCC = FourCC::new(*b">MDL");
/// End of model
pub const MODEL_CLOSE: FourCC = FourCC::new(*b"<MDL");
/// Start of node: node type fourcc + name
pub const NODE_OPEN: FourCC = FourCC::new(*b">MND");
/// End of node
pub const NODE_CLOSE: FourCC = FourCC::new(*b"<MND");
/// End of file (only present in some versions)
pub const END_OF_FILE: FourCC = FourCC::new(*b"EOF_");

// =============================================================================
// Data tags
// =============================================================================

/// Character tags
pub mod character {
    use crate::fourcc::FourCC;

    pub const ANIMATION: FourCC = FourCC::new(*b"ANIM");
    pub const NUM_JOINTS: FourCC = FourCC::new(*b"NJNT");
    pub const JOINT: FourCC = FourCC::new(*b"JONT");
    pub const NUM_JOINT_MASKS: FourCC = FourCC::new(*b"NJMS");
    pub const JOINT_MASK: FourCC = FourCC::new(*b"JOMS");
    pub const VARIATION: FourCC = FourCC::new(*b"VART");
    pub const NUM_SKIN_LISTS: FourCC = FourCC::new(*b"NSKL");
    pub const SKIN_LIST: FourCC = FourCC::new(*b"SKNL");
}

/// Character skin tags
pub mod skin {
    use crate::fourcc::FourCC;

    pub const NUM_FRAGMENTS: FourCC = FourCC::new(*b"NSKF");
    pub const FRAGMENT: FourCC = FourCC::new(*b"SFRG");
}

/// State (material/shader) tags
pub mod state {
    use crate::fourcc::FourCC;

    /// Deprecated material string
    pub const MATERIAL_STRING: FourCC = FourCC::new(*b"MNMT");
    pub const MATERIAL: FourCC = FourCC::new(*b"MATE");
    pub const TEXTURE: FourCC = FourCC::new(*b"STXT");
    pub const INT: FourCC = FourCC::new(*b"SINT");
    pub const FLOAT: FourCC = FourCC::new(*b"SFLT");
    pub const BOOL: FourCC = FourCC::new(*b"SBOO");
    pub const VEC2: FourCC = FourCC::new(*b"SFV2");
    pub const VEC4: FourCC = FourCC::new(*b"SFV4");
    pub const VEC4_ALT: FourCC = FourCC::new(*b"SVEC");
    pub const UV_STRETCH: FourCC = FourCC::new(*b"STUS");
    pub const SPEC_INTENSITY: FourCC = FourCC::new(*b"SSPI");
}

/// Transform tags
pub mod transform {
    use crate::fourcc::FourCC;

    pub const POSITION: FourCC = FourCC::new(*b"POSI");
    pub const ROTATION: FourCC = FourCC::new(*b"ROTN");
    pub const SCALE: FourCC = FourCC::new(*b"SCAL");
    pub const ROTATE_PIVOT: FourCC = FourCC::new(*b"RPIV");
    pub const SCALE_PIVOT: FourCC = FourCC::new(*b"SPIV");
    pub const VIEW_IN_SPACE: FourCC = FourCC::new(*b"SVSP");
    pub const LOCKED_TO_VIEWER: FourCC = FourCC::new(*b"SLKV");
    pub const MIN_DISTANCE: FourCC = FourCC::new(*b"SMID");
    pub const MAX_DISTANCE: FourCC = FourCC::new(*b"SMAD");
}

/// Shape tags
pub mod shape {
    use crate::fourcc::FourCC;

    pub const MESH: FourCC = FourCC::new(*b"MESH");
    pub const PRIMITIVE_GROUP: FourCC = FourCC::new(*b"PGRI");
}

/// Generic model node data tags
pub mod data {
    use crate::fourcc::FourCC;

    pub const BOUNDING_BOX: FourCC = FourCC::new(*b"LBOX");
    /// Deprecated model node type
    pub const MODEL_NODE_TYPE: FourCC = FourCC::new(*b"MNTP");
    pub const STRING_ATTRIBUTE: FourCC = FourCC::new(*b"SSTA");
}

/// Tags seen in shipped files without a known owner
pub mod misc {
    use crate::fourcc::FourCC;

    pub const CASH: FourCC = FourCC::new(*b"CASH");
    pub const SHADER: FourCC = FourCC::new(*b"SHDR");
}

// =============================================================================
// Registry
// =============================================================================

/// Handler categories, in dispatch priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerCategory {
    Character,
    CharacterSkin,
    State,
    Transform,
    Shape,
    Data,
    Misc,
}

impl HandlerCategory {
    pub const PRIORITY: [HandlerCategory; 7] = [
        HandlerCategory::Character,
        HandlerCategory::CharacterSkin,
        HandlerCategory::State,
        HandlerCategory::Transform,
        HandlerCategory::Shape,
        HandlerCategory::Data,
        HandlerCategory::Misc,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HandlerCategory::Character => "character",
            HandlerCategory::CharacterSkin => "character_skin",
            HandlerCategory::State => "state",
            HandlerCategory::Transform => "transform",
            HandlerCategory::Shape => "shape",
            HandlerCategory::Data => "data",
            HandlerCategory::Misc => "misc",
        }
    }
}

impl fmt::Display for HandlerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload layout following a data tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadShape {
    Bool,
    Int,
    Float,
    String,
    Vec4,
    /// Two strings (key, value)
    StringPair,
    /// Name + int
    NamedInt,
    /// Name + float
    NamedFloat,
    /// Name + bool byte
    NamedBool,
    /// Name + 2 floats
    NamedVec2,
    /// Name + 4 floats
    NamedVec4,
    /// Index + 4 floats
    IndexedVec4,
    /// 2 ints + 3 x 4 floats + name
    Joint,
    /// Name + int count + count floats
    JointMask,
    /// Name + int count + count strings (+ byte + string in version 2)
    SkinList,
    /// Group index + int count + count ints
    SkinFragment,
    /// Center and extents, 4 floats each
    BoundingBox,
}

impl PayloadShape {
    pub fn describe(self) -> &'static str {
        match self {
            PayloadShape::Bool => "u8 bool",
            PayloadShape::Int => "i32",
            PayloadShape::Float => "f32",
            PayloadShape::String => "string",
            PayloadShape::Vec4 => "4 x f32",
            PayloadShape::StringPair => "string, string",
            PayloadShape::NamedInt => "string, i32",
            PayloadShape::NamedFloat => "string, f32",
            PayloadShape::NamedBool => "string, u8 bool",
            PayloadShape::NamedVec2 => "string, 2 x f32",
            PayloadShape::NamedVec4 => "string, 4 x f32",
            PayloadShape::IndexedVec4 => "i32, 4 x f32",
            PayloadShape::Joint => "i32, i32, 3 x (4 x f32), string",
            PayloadShape::JointMask => "string, i32 n, n x f32",
            PayloadShape::SkinList => "string, i32 n, n x string [, u8, string]",
            PayloadShape::SkinFragment => "i32, i32 n, n x i32",
            PayloadShape::BoundingBox => "4 x f32, 4 x f32",
        }
    }
}

/// Registry entry for one data tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TagSpec {
    pub tag: FourCC,
    pub category: HandlerCategory,
    pub payload: PayloadShape,
    pub description: &'static str,
}

const fn spec(
    tag: FourCC,
    category: HandlerCategory,
    payload: PayloadShape,
    description: &'static str,
) -> TagSpec {
    TagSpec {
        tag,
        category,
        payload,
        description,
    }
}

/// Every data tag understood by the handlers
#[rustfmt::skip]
pub const TAG_REGISTRY: &[TagSpec] = {
    use HandlerCategory as C;
    use PayloadShape as P;
    &[
        spec(character::ANIMATION, C::Character, P::String, "animation resource"),
        spec(character::NUM_JOINTS, C::Character, P::Int, "joint count"),
        spec(character::JOINT, C::Character, P::Joint, "skeleton joint"),
        spec(character::NUM_JOINT_MASKS, C::Character, P::Int, "joint mask count"),
        spec(character::JOINT_MASK, C::Character, P::JointMask, "joint mask"),
        spec(character::VARIATION, C::Character, P::String, "variation resource"),
        spec(character::NUM_SKIN_LISTS, C::Character, P::Int, "skin list count"),
        spec(character::SKIN_LIST, C::Character, P::SkinList, "skin list"),
        spec(skin::NUM_FRAGMENTS, C::CharacterSkin, P::Int, "skin fragment count"),
        spec(skin::FRAGMENT, C::CharacterSkin, P::SkinFragment, "skin fragment"),
        spec(state::MATERIAL_STRING, C::State, P::String, "material string (deprecated)"),
        spec(state::MATERIAL, C::State, P::String, "material name"),
        spec(state::TEXTURE, C::State, P::StringPair, "shader texture"),
        spec(state::INT, C::State, P::NamedInt, "shader int"),
        spec(state::FLOAT, C::State, P::NamedFloat, "shader float"),
        spec(state::BOOL, C::State, P::NamedBool, "shader bool"),
        spec(state::VEC2, C::State, P::NamedVec2, "shader vector2"),
        spec(state::VEC4, C::State, P::NamedVec4, "shader vector4"),
        spec(state::VEC4_ALT, C::State, P::NamedVec4, "shader vector4"),
        spec(state::UV_STRETCH, C::State, P::IndexedVec4, "indexed UV stretch"),
        spec(state::SPEC_INTENSITY, C::State, P::IndexedVec4, "indexed specular intensity"),
        spec(transform::POSITION, C::Transform, P::Vec4, "position"),
        spec(transform::ROTATION, C::Transform, P::Vec4, "rotation"),
        spec(transform::SCALE, C::Transform, P::Vec4, "scale"),
        spec(transform::ROTATE_PIVOT, C::Transform, P::Vec4, "rotate pivot"),
        spec(transform::SCALE_PIVOT, C::Transform, P::Vec4, "scale pivot"),
        spec(transform::VIEW_IN_SPACE, C::Transform, P::Bool, "view in space"),
        spec(transform::LOCKED_TO_VIEWER, C::Transform, P::Bool, "locked to viewer"),
        spec(transform::MIN_DISTANCE, C::Transform, P::Float, "min distance"),
        spec(transform::MAX_DISTANCE, C::Transform, P::Float, "max distance"),
        spec(shape::MESH, C::Shape, P::String, "mesh resource"),
        spec(shape::PRIMITIVE_GROUP, C::Shape, P::Int, "primitive group index"),
        spec(data::BOUNDING_BOX, C::Data, P::BoundingBox, "local bounding box"),
        spec(data::MODEL_NODE_TYPE, C::Data, P::String, "model node type (deprecated)"),
        spec(data::STRING_ATTRIBUTE, C::Data, P::StringPair, "string attribute"),
        spec(misc::CASH, C::Misc, P::Bool, "unclassified flag"),
        spec(misc::SHADER, C::Misc, P::String, "shader name"),
    ]
};

/// Registry entry for `tag`, if it is a known data tag
pub fn lookup(tag: FourCC) -> Option<&'static TagSpec> {
    TAG_REGISTRY.iter().find(|s| s.tag == tag)
}

/// Whether `tag` drives the node tree rather than carrying node data
pub fn is_structure_tag(tag: FourCC) -> bool {
    [MODEL_OPEN, MODEL_CLOSE, NODE_OPEN, NODE_CLOSE, END_OF_FILE].contains(&tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_tags_unique() {
        for (i, a) in TAG_REGISTRY.iter().enumerate() {
            for b in &TAG_REGISTRY[i + 1..] {
                assert_ne!(a.tag, b.tag, "duplicate registry entry");
            }
            assert!(!is_structure_tag(a.tag));
        }
    }

    #[test]
    fn test_registry_grouped_by_priority() {
        let ranks: Vec<usize> = TAG_REGISTRY
            .iter()
            .map(|s| {
                HandlerCategory::PRIORITY
                    .iter()
                    .position(|&c| c == s.category)
                    .unwrap()
            })
            .collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_lookup() {
        let entry = lookup(FourCC::new(*b"MATE")).unwrap();
        assert_eq!(entry.category, HandlerCategory::State);
        assert_eq!(entry.payload, PayloadShape::String);
        assert!(lookup(FourCC::new(*b"XXXX")).is_none());
        assert!(lookup(NODE_OPEN).is_none());
    }
}
