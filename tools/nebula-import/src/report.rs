//! Import reports
//!
//! One [`FileReport`] per input file, gathered into a [`BatchReport`]. Reports
//! print as plain text or serialize to JSON for `--json`.

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use nebula_formats::{ByteOrder, Diagnostic, FormatVersion, N3Model, Nvx2Mesh, Severity};
use serde::Serialize;

use crate::import::FileKind;
use crate::plan::{MeshRefStatus, ScenePlan};

/// Short description of a decoded file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FileSummary {
    Mesh {
        version: FormatVersion,
        groups: usize,
        vertices: usize,
        triangles: usize,
    },
    Model {
        version: u32,
        byte_order: ByteOrder,
        name: String,
        nodes: usize,
    },
}

impl FileSummary {
    pub fn of_mesh(mesh: &Nvx2Mesh) -> Self {
        FileSummary::Mesh {
            version: mesh.version,
            groups: mesh.groups.len(),
            vertices: mesh.total_vertices(),
            triangles: mesh.total_triangles(),
        }
    }

    pub fn of_model(model: &N3Model) -> Self {
        FileSummary::Model {
            version: model.version,
            byte_order: model.byte_order,
            name: model.name.clone(),
            nodes: model.nodes.len(),
        }
    }
}

impl fmt::Display for FileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSummary::Mesh {
                version,
                groups,
                vertices,
                triangles,
            } => write!(
                f,
                "nvx2 v{}, {} groups, {} vertices, {} triangles",
                version.number(),
                groups,
                vertices,
                triangles
            ),
            FileSummary::Model {
                version,
                byte_order,
                name,
                nodes,
            } => write!(
                f,
                "n3 v{} ({:?} endian), model '{}', {} nodes",
                version, byte_order, name, nodes
            ),
        }
    }
}

/// Full decoded data, kept only when asked for
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Decoded {
    Mesh(Nvx2Mesh),
    Model(N3Model),
}

/// Result of importing one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub kind: Option<FileKind>,
    /// Every diagnostic reported while decoding, in order
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<FileSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<ScenePlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded: Option<Decoded>,
    /// Why the file failed, if it did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: None,
            diagnostics: Vec::new(),
            summary: None,
            plan: None,
            decoded: None,
            error: None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.error, &self.summary) {
            (Some(error), _) => writeln!(f, "{}: FAILED: {}", self.path.display(), error)?,
            (None, Some(summary)) => writeln!(f, "{}: {}", self.path.display(), summary)?,
            (None, None) => writeln!(f, "{}: ok", self.path.display())?,
        }

        for diagnostic in &self.diagnostics {
            // The failure line already carries the error
            if diagnostic.severity == Severity::Error && self.error.is_some() {
                continue;
            }
            writeln!(f, "  {}: {}", diagnostic.severity, diagnostic.message)?;
        }

        let Some(plan) = &self.plan else {
            return Ok(());
        };
        for empty in &plan.empties {
            writeln!(f, "  empty {}", empty)?;
        }
        for object in &plan.objects {
            write!(
                f,
                "  object {} ({} vertices, {} triangles",
                object.name, object.vertex_count, object.triangle_count
            )?;
            if !object.vertex_groups.is_empty() {
                write!(f, ", {} vertex groups", object.vertex_groups.len())?;
            }
            if let Some(material) = &object.material {
                write!(f, ", material {}", material)?;
            }
            writeln!(f, ")")?;
        }
        for armature in &plan.armatures {
            writeln!(
                f,
                "  armature {} ({} bones)",
                armature.name,
                armature.bones.len()
            )?;
        }
        for material in &plan.materials {
            writeln!(
                f,
                "  material {} ({} textures, {} users)",
                material.name,
                material.textures.len(),
                material.users.len()
            )?;
        }
        for reference in &plan.mesh_refs {
            let state = match &reference.status {
                MeshRefStatus::Skipped => "skipped".to_string(),
                MeshRefStatus::Unresolved => "unresolved".to_string(),
                MeshRefStatus::Imported { objects } => format!("{} objects", objects),
                MeshRefStatus::Failed { error } => format!("failed: {}", error),
            };
            writeln!(
                f,
                "  mesh {} -> {} ({})",
                reference.node, reference.resource, state
            )?;
        }
        Ok(())
    }
}

/// Reports for every file of one invocation
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.files.iter().filter(|f| f.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.files.len() - self.succeeded()
    }

    /// True when there were files and none of them imported
    pub fn all_failed(&self) -> bool {
        !self.files.is_empty() && self.succeeded() == 0
    }

    /// Drop the decoded payloads, keeping summaries and plans
    pub fn strip_decoded(&mut self) {
        for file in &mut self.files {
            file.decoded = None;
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize import report")
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for file in &self.files {
            write!(f, "{}", file)?;
        }
        write!(
            f,
            "{} files: {} imported, {} failed",
            self.files.len(),
            self.succeeded(),
            self.failed()
        )
    }
}
