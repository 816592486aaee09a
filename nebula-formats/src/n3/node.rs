//! N3 model and node types
//!
//! Nodes live in one flat list in creation (depth-first) order. Tree links
//! are indices into that list: a node owns its `children` indices and keeps
//! its `parent` index for traversal only.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::fourcc::FourCC;
use crate::reader::ByteOrder;

/// Decoded N3 file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct N3Model {
    /// File version from the header
    pub version: u32,
    /// Byte order detected from the magic
    pub byte_order: ByteOrder,
    /// Model type code from the model-open tag
    pub model_type: Option<FourCC>,
    /// Model name from the model-open tag
    pub name: String,
    /// Every node in creation order
    pub nodes: Vec<Node>,
}

impl N3Model {
    /// Indices of the nodes without a parent
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(i, _)| i)
    }

    /// First node with the given name
    pub fn find(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Number of ancestors of node `index`
    pub fn depth(&self, index: usize) -> usize {
        let mut depth = 0;
        let mut current = self.nodes.get(index).and_then(|n| n.parent);
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes.get(parent).and_then(|n| n.parent);
        }
        depth
    }
}

/// One model node
///
/// Tags from any handler category may land on any node, so every category
/// has its own field group regardless of `node_type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub name: String,
    pub node_type: FourCC,
    /// Index of the parent in [`N3Model::nodes`]
    pub parent: Option<usize>,
    /// Indices of the children in [`N3Model::nodes`], in creation order
    pub children: Vec<usize>,
    pub transform: TransformData,
    pub state: StateData,
    pub shape: ShapeData,
    pub character: CharacterData,
    pub skin: SkinData,
    pub data: NodeData,
    pub misc: MiscData,
}

impl Node {
    pub fn new(name: impl Into<String>, node_type: FourCC, parent: Option<usize>) -> Self {
        Self {
            name: name.into(),
            node_type,
            parent,
            children: Vec::new(),
            transform: TransformData::default(),
            state: StateData::default(),
            shape: ShapeData::default(),
            character: CharacterData::default(),
            skin: SkinData::default(),
            data: NodeData::default(),
            misc: MiscData::default(),
        }
    }

    pub fn material_name(&self) -> Option<&str> {
        self.state.material_name.as_deref()
    }

    pub fn mesh_resource(&self) -> Option<&str> {
        self.shape.mesh.as_deref()
    }

    pub fn has_joints(&self) -> bool {
        !self.character.joints.is_empty()
    }
}

/// Transform tags
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformData {
    pub position: [f32; 4],
    pub rotation: [f32; 4],
    pub scale: [f32; 4],
    pub rotate_pivot: Option<[f32; 4]>,
    pub scale_pivot: Option<[f32; 4]>,
    pub view_in_space: bool,
    pub locked_to_viewer: bool,
    /// -1.0 when unset
    pub min_distance: f32,
    /// -1.0 when unset
    pub max_distance: f32,
}

impl Default for TransformData {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0, 1.0],
            rotation: [0.0; 4],
            scale: [1.0; 4],
            rotate_pivot: None,
            scale_pivot: None,
            view_in_space: false,
            locked_to_viewer: false,
            min_distance: -1.0,
            max_distance: -1.0,
        }
    }
}

/// Shader parameter value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ShaderParam {
    Int(i32),
    Float(f32),
    Bool(bool),
    Vec2([f32; 2]),
    Vec4([f32; 4]),
}

/// Material and shader tags
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StateData {
    /// Deprecated material string
    pub material_string: Option<String>,
    pub material_name: Option<String>,
    /// Texture slot name to resource path
    pub textures: BTreeMap<String, String>,
    /// Parameter name to value
    pub params: BTreeMap<String, ShaderParam>,
}

/// Shape tags
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ShapeData {
    /// Mesh resource id, e.g. `msh:characters/foo.nvx2`
    pub mesh: Option<String>,
    pub primitive_group: Option<i32>,
}

/// Skeleton joint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Joint {
    pub index: i32,
    /// Parent joint index, -1 for the root
    pub parent: i32,
    pub translation: [f32; 4],
    pub rotation: [f32; 4],
    pub scale: [f32; 4],
    pub name: String,
}

/// Per-joint weights of a named mask
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JointMask {
    pub name: String,
    pub weights: Vec<f32>,
}

/// Named list of skin resources
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkinList {
    pub name: String,
    pub skins: Vec<String>,
    /// Trailing string present in version 2 files
    pub extra: Option<String>,
}

/// Character tags
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CharacterData {
    pub animation: Option<String>,
    pub variation: Option<String>,
    pub num_joints: Option<i32>,
    pub joints: Vec<Joint>,
    pub num_joint_masks: Option<i32>,
    pub joint_masks: Vec<JointMask>,
    pub num_skin_lists: Option<i32>,
    pub skin_lists: Vec<SkinList>,
}

/// Character skin tags
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SkinData {
    pub num_fragments: Option<i32>,
    /// Primitive group index to the joint palette used by that group
    pub fragments: BTreeMap<i32, Vec<i32>>,
}

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub center: [f32; 4],
    pub extents: [f32; 4],
}

/// Generic model node tags
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NodeData {
    pub bounding_box: Option<BoundingBox>,
    /// Deprecated node type string
    pub model_node_type: Option<String>,
    pub attributes: BTreeMap<String, String>,
}

/// Tags with no known owner
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MiscData {
    pub cash: Option<bool>,
    pub shader: Option<String>,
}
