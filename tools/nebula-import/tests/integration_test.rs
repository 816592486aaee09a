//! Integration tests for nebula-import
//!
//! Tests the full pipeline: write fixture files -> import -> verify report

mod fixtures;

use std::path::Path;
use std::process::{Command, Output};

use nebula_import::plan::MeshRefStatus;
use nebula_import::{FileKind, FileSummary, ImportConfig, import_batch, import_file};
use tempfile::tempdir;

fn nebula_import(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nebula-import"))
        .args(args)
        .output()
        .expect("Failed to run nebula-import")
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_import_triangle_mesh() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = fixtures::write(dir.path(), "tri.nvx2", &fixtures::triangle_nvx2());

    let report = import_file(&path, None, &ImportConfig::default());
    assert!(report.succeeded(), "import failed: {:?}", report.error);
    assert_eq!(report.kind, Some(FileKind::Nvx2));
    assert!(matches!(
        report.summary,
        Some(FileSummary::Mesh {
            groups: 1,
            vertices: 3,
            triangles: 1,
            ..
        })
    ));
    assert_eq!(report.diagnostics[0].message, "Detected nvx2 version: 3");

    let plan = report.plan.unwrap();
    assert_eq!(plan.empties, vec!["tri"]);
    assert_eq!(plan.objects[0].name, "tri_0");
}

#[test]
fn test_import_skinned_mesh_vertex_groups() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = fixtures::write(dir.path(), "skinned.nvx2", &fixtures::skinned_nvx2());

    let report = import_file(&path, None, &ImportConfig::default());
    let plan = report.plan.expect("plan");
    assert_eq!(plan.objects.len(), 2);

    let groups: Vec<_> = plan.objects[0]
        .vertex_groups
        .iter()
        .map(|g| (g.name.as_str(), g.vertices))
        .collect();
    assert_eq!(groups, [("nvx2_0", 3), ("nvx2_1", 1)]);
}

#[test]
fn test_model_follows_mesh_reference() {
    let dir = tempdir().expect("Failed to create temp dir");
    let root = dir.path().join("export");
    fixtures::write(&root, "meshes/hero.nvx2", &fixtures::skinned_nvx2());
    let model = fixtures::write(&root, "models/hero.n3", &fixtures::hero_n3());

    let mut config = ImportConfig::default();
    config.scene.resource_root = Some(root.clone());
    let report = import_file(&model, None, &config);
    assert!(report.succeeded(), "import failed: {:?}", report.error);

    let plan = report.plan.unwrap();
    assert_eq!(plan.armatures.len(), 1);
    assert_eq!(plan.armatures[0].bones[1].parent.as_deref(), Some("root"));
    assert_eq!(plan.materials.len(), 1);
    assert_eq!(plan.materials[0].textures["DiffMap0"], "tex:hero_diff");

    // PGRI 1 selects the second group only
    assert_eq!(
        plan.mesh_refs[0].status,
        MeshRefStatus::Imported { objects: 1 }
    );
    assert_eq!(plan.objects[0].name, "body_1");
    assert_eq!(plan.objects[0].material.as_deref(), Some("skin"));

    // Mesh diagnostics are tagged with the mesh name
    assert!(
        report
            .diagnostics
            .iter()
            .any(|d| d.message == "hero: Detected nvx2 version: 3")
    );
}

#[test]
fn test_model_without_resource_root() {
    let dir = tempdir().expect("Failed to create temp dir");
    let model = fixtures::write(dir.path(), "hero.n3", &fixtures::hero_n3());

    let report = import_file(&model, None, &ImportConfig::default());
    let plan = report.plan.unwrap();
    assert_eq!(plan.mesh_refs[0].status, MeshRefStatus::Unresolved);
    assert!(plan.objects.is_empty());
}

#[test]
fn test_batch_continues_after_failure() {
    let dir = tempdir().expect("Failed to create temp dir");
    let bad = fixtures::write(dir.path(), "bad.nvx2", b"not a mesh at all, just text....");
    let good = fixtures::write(dir.path(), "tri.nvx2", &fixtures::triangle_nvx2());

    let batch = import_batch(&[bad, good], None, &ImportConfig::default());
    assert_eq!(batch.failed(), 1);
    assert_eq!(batch.succeeded(), 1);
    assert!(!batch.all_failed());
    assert!(batch.files[1].succeeded());
}

#[test]
fn test_cli_mesh_command() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = fixtures::write(dir.path(), "tri.nvx2", &fixtures::triangle_nvx2());

    let output = nebula_import(&["mesh", path_str(&path)]);
    assert!(output.status.success(), "nebula-import mesh command failed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let summary = "nvx2 v3, 1 groups, 3 vertices, 1 triangles";
    assert!(stdout.contains(summary));
    assert!(stdout.contains("1 files: 1 imported, 0 failed"));
}

#[test]
fn test_cli_json_report() {
    let dir = tempdir().expect("Failed to create temp dir");
    let root = dir.path().join("export");
    fixtures::write(&root, "meshes/hero.nvx2", &fixtures::skinned_nvx2());
    let model = fixtures::write(dir.path(), "hero.n3", &fixtures::hero_n3());

    let output = nebula_import(&[
        "--json",
        "model",
        path_str(&model),
        "--resource-root",
        path_str(&root),
    ]);
    assert!(
        output.status.success(),
        "nebula-import model command failed"
    );

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let file = &json["files"][0];
    assert_eq!(file["kind"], "n3");
    assert_eq!(file["summary"]["kind"], "model");
    assert_eq!(file["summary"]["nodes"], 2);
    assert_eq!(file["plan"]["mesh_refs"][0]["status"]["state"], "imported");
    assert!(file.get("decoded").is_none());
}

#[test]
fn test_cli_dump_includes_decoded() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = fixtures::write(dir.path(), "tri.nvx2", &fixtures::triangle_nvx2());

    let output = nebula_import(&["import", "--json", "--dump", path_str(&path)]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let decoded = &json["files"][0]["decoded"];
    assert_eq!(decoded["version"], "current");
    assert_eq!(
        decoded["groups"][0]["triangles"][0],
        serde_json::json!([0, 1, 2])
    );
}

#[test]
fn test_cli_fails_when_every_file_fails() {
    let dir = tempdir().expect("Failed to create temp dir");
    let missing = dir.path().join("missing.nvx2");
    let bad = fixtures::write(dir.path(), "bad.n3", b"XXXX");

    let output = nebula_import(&["import", path_str(&missing), path_str(&bad)]);
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2 files: 0 imported, 2 failed"));
}

#[test]
fn test_cli_partial_failure_succeeds() {
    let dir = tempdir().expect("Failed to create temp dir");
    let missing = dir.path().join("missing.nvx2");
    let good = fixtures::write(dir.path(), "tri.nvx2", &fixtures::triangle_nvx2());

    let status = Command::new(env!("CARGO_BIN_EXE_nebula-import"))
        .args(["import", path_str(&missing), path_str(&good)])
        .status()
        .expect("Failed to run nebula-import");
    assert!(status.success(), "one good file should be enough");
}

#[test]
fn test_cli_config_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = fixtures::write(dir.path(), "tri.nvx2", &fixtures::triangle_nvx2());
    let config = fixtures::write(
        dir.path(),
        "nebula-import.toml",
        b"[nvx2]\nversion = \"legacy\"\n[scene]\ncreate_parent_empty = false\n",
    );

    let output = nebula_import(&[
        "--config",
        path_str(&config),
        "--json",
        "mesh",
        path_str(&path),
    ]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let file = &json["files"][0];
    // Coord alone is the same size under both registries
    assert_eq!(file["summary"]["version"], "legacy");
    assert_eq!(file["plan"]["empties"], serde_json::json!([]));
}

#[test]
fn test_cli_tags() {
    let output = nebula_import(&["tags"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().any(|l| l.starts_with("MATE")));
    assert!(stdout.lines().any(|l| l.starts_with("JONT")));
}
