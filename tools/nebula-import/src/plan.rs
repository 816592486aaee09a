//! Scene build plans
//!
//! A plan lists the objects a scene builder would create from decoded files:
//! mesh objects with their UV layers and vertex groups, parent empties,
//! armatures, materials and N3 mesh references. Building the plan never
//! touches a scene; it is what `nebula-import` reports.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use nebula_formats::n3::Node;
use nebula_formats::{GroupMesh, N3Model, Nvx2Mesh};
use serde::Serialize;

use crate::config::SceneConfig;
use crate::resource;

/// Everything planned for one imported file
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ScenePlan {
    pub empties: Vec<String>,
    pub objects: Vec<MeshObject>,
    pub armatures: Vec<Armature>,
    pub materials: Vec<Material>,
    pub mesh_refs: Vec<MeshReference>,
}

/// One mesh object (one NVX2 group)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshObject {
    pub name: String,
    pub parent: Option<String>,
    /// Index of the group in its NVX2 file
    pub group: usize,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub uv_layers: Vec<String>,
    pub color_layer: Option<String>,
    pub vertex_groups: Vec<VertexGroup>,
    pub material: Option<String>,
}

/// Named set of weighted vertices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VertexGroup {
    pub name: String,
    /// Number of vertices assigned to the group
    pub vertices: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Armature {
    pub name: String,
    /// Node the joints came from
    pub node: String,
    pub bones: Vec<Bone>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bone {
    pub name: String,
    pub parent: Option<String>,
    pub head: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    pub name: String,
    /// Texture slot to resource id
    pub textures: BTreeMap<String, String>,
    /// Nodes using the material
    pub users: Vec<String>,
}

/// A shape node's mesh resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshReference {
    pub node: String,
    pub resource: String,
    pub primitive_group: Option<i32>,
    pub path: Option<PathBuf>,
    pub status: MeshRefStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MeshRefStatus {
    /// Mesh import disabled
    Skipped,
    /// No resource root, or the file does not exist under it
    Unresolved,
    Imported { objects: usize },
    Failed { error: String },
}

// =============================================================================
// NVX2
// =============================================================================

/// Vertex group name for a joint index
///
/// Integral indices print without a fraction (`nvx2_3`). The Blender importer
/// formatted the float with Python's `str`, giving `nvx2_3.0`, so scenes built
/// by it use different group names for the same mesh.
pub fn vertex_group_name(joint_index: f32) -> String {
    format!("nvx2_{}", joint_index)
}

/// Vertex groups of one group mesh, in first-use order
pub fn vertex_groups(group: &GroupMesh) -> Vec<VertexGroup> {
    let attrs = &group.attributes;
    let mut groups: Vec<VertexGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    // Weights and indices both have to be present
    for (_, joints) in attrs.weights.iter().zip(&attrs.joint_indices) {
        // A vertex counts once per group even if two slots name the same joint
        let mut seen: Vec<usize> = Vec::with_capacity(4);
        for &joint in joints {
            let name = vertex_group_name(joint);
            let slot = *index.entry(name.clone()).or_insert_with(|| {
                groups.push(VertexGroup { name, vertices: 0 });
                groups.len() - 1
            });
            if !seen.contains(&slot) {
                seen.push(slot);
                groups[slot].vertices += 1;
            }
        }
    }
    groups
}

fn mesh_object(name: String, parent: Option<String>, group: &GroupMesh) -> MeshObject {
    let attrs = &group.attributes;
    MeshObject {
        name,
        parent,
        group: group.index,
        vertex_count: group.vertex_count(),
        triangle_count: group.triangles.len(),
        uv_layers: attrs
            .uvs
            .iter()
            .enumerate()
            .filter(|(_, layer)| !layer.is_empty())
            .map(|(i, _)| format!("nvx2_uv{i}"))
            .collect(),
        color_layer: (!attrs.colors.is_empty()).then(|| "nvx2_colors".to_string()),
        vertex_groups: vertex_groups(group),
        material: None,
    }
}

/// Plan a standalone NVX2 file
pub fn plan_nvx2(name: &str, mesh: &Nvx2Mesh, scene: &SceneConfig) -> ScenePlan {
    let mut plan = ScenePlan::default();
    let parent = scene.create_parent_empty.then(|| name.to_string());
    if let Some(empty) = &parent {
        plan.empties.push(empty.clone());
    }
    plan.objects = mesh
        .groups
        .iter()
        .map(|g| {
            let object_name = format!("{}_{}", name, g.index);
            mesh_object(object_name, parent.clone(), g)
        })
        .collect();
    plan
}

// =============================================================================
// N3
// =============================================================================

/// Materials of one plan
///
/// With reuse on, nodes naming the same material share one entry. Otherwise
/// every node gets its own.
#[derive(Debug)]
pub struct MaterialCache {
    reuse: bool,
    materials: Vec<Material>,
    by_name: HashMap<String, usize>,
}

impl MaterialCache {
    pub fn new(reuse: bool) -> Self {
        Self {
            reuse,
            materials: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Material for `node`, reusing an earlier one with the same name if allowed
    pub fn use_for(&mut self, name: &str, node: &Node) -> &Material {
        let existing = if self.reuse {
            self.by_name.get(name).copied()
        } else {
            None
        };
        let index = match existing {
            Some(index) => index,
            None => {
                self.materials.push(Material {
                    name: name.to_string(),
                    textures: node.state.textures.clone(),
                    users: Vec::new(),
                });
                let index = self.materials.len() - 1;
                if self.reuse {
                    self.by_name.insert(name.to_string(), index);
                }
                index
            }
        };
        let material = &mut self.materials[index];
        material.users.push(node.name.clone());
        material
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn into_materials(self) -> Vec<Material> {
        self.materials
    }
}

fn armature(node: &Node) -> Armature {
    let joints = &node.character.joints;
    let name_of = |index: i32| {
        joints
            .iter()
            .find(|j| j.index == index)
            .map(|j| j.name.clone())
    };
    Armature {
        name: format!("{}_armature", node.name),
        node: node.name.clone(),
        bones: joints
            .iter()
            .map(|j| Bone {
                name: j.name.clone(),
                parent: name_of(j.parent),
                head: [j.translation[0], j.translation[1], j.translation[2]],
            })
            .collect(),
    }
}

/// Plan an N3 model
///
/// `load_mesh` decodes the NVX2 file behind a resolved mesh reference; each
/// distinct path is loaded once.
pub fn plan_n3<F>(model: &N3Model, scene: &SceneConfig, mut load_mesh: F) -> ScenePlan
where
    F: FnMut(&Path) -> anyhow::Result<Nvx2Mesh>,
{
    let mut plan = ScenePlan::default();
    let mut materials = MaterialCache::new(scene.reuse_materials);
    let mut meshes: HashMap<PathBuf, Result<Nvx2Mesh, String>> = HashMap::new();

    if scene.create_armatures {
        plan.armatures = model
            .nodes
            .iter()
            .filter(|n| n.has_joints())
            .map(armature)
            .collect();
    }

    for node in &model.nodes {
        let material = match node.material_name() {
            Some(name) if scene.create_materials => {
                Some(materials.use_for(name, node).name.clone())
            }
            _ => None,
        };

        let Some(resource) = node.mesh_resource() else {
            continue;
        };
        let mut reference = MeshReference {
            node: node.name.clone(),
            resource: resource.to_string(),
            primitive_group: node.shape.primitive_group,
            path: None,
            status: MeshRefStatus::Skipped,
        };

        if scene.import_meshes {
            reference.status = MeshRefStatus::Unresolved;
            if let Some(path) = resource::find_mesh(scene.resource_root.as_deref(), resource) {
                let decoded = meshes
                    .entry(path.clone())
                    .or_insert_with(|| load_mesh(&path).map_err(|e| format!("{:#}", e)));
                reference.status = match decoded {
                    Ok(mesh) => {
                        let before = plan.objects.len();
                        for group in selected_groups(mesh, node.shape.primitive_group) {
                            let mut object = mesh_object(
                                format!("{}_{}", node.name, group.index),
                                Some(node.name.clone()),
                                group,
                            );
                            object.material = material.clone();
                            plan.objects.push(object);
                        }
                        MeshRefStatus::Imported {
                            objects: plan.objects.len() - before,
                        }
                    }
                    Err(error) => {
                        tracing::warn!(
                            "Mesh {} for node '{}' failed: {}",
                            resource,
                            node.name,
                            error
                        );
                        MeshRefStatus::Failed {
                            error: error.clone(),
                        }
                    }
                };
                reference.path = Some(path);
            } else {
                tracing::debug!("Mesh {} for node '{}' not found", resource, node.name);
            }
        }
        plan.mesh_refs.push(reference);
    }

    plan.materials = materials.into_materials();
    plan
}

/// The group a shape node draws, or every group if it names none that exists
fn selected_groups(
    mesh: &Nvx2Mesh,
    primitive_group: Option<i32>,
) -> impl Iterator<Item = &GroupMesh> {
    let selected = primitive_group
        .and_then(|g| usize::try_from(g).ok())
        .filter(|&g| g < mesh.groups.len());
    mesh.groups
        .iter()
        .filter(move |g| selected.is_none_or(|s| s == g.index))
}
