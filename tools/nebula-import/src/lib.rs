//! nebula-import library
//!
//! Reads Nebula NVX2 meshes and N3 models from disk, decodes them with
//! `nebula-formats` and reports what a scene builder would create from them.

pub mod config;
pub mod import;
pub mod plan;
pub mod report;
pub mod resource;

pub use config::{ImportConfig, SceneConfig};
pub use import::{FileKind, ReportSink, import_batch, import_file, load_nvx2};
pub use plan::{ScenePlan, plan_n3, plan_nvx2};
pub use report::{BatchReport, FileReport, FileSummary};
