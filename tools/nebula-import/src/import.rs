//! File import pipeline
//!
//! Reads each file, picks its decoder, collects diagnostics and builds the
//! scene plan. Files in a batch are independent: a failed file is recorded in
//! its report and the batch moves on.

use std::path::Path;

use anyhow::{Context, Result};
use nebula_formats::{
    Diagnostic, DiagnosticSink, N3_MAGIC, NVX2_MAGIC, Nvx2Mesh, TracingSink, decode_n3_with,
    decode_nvx2_with,
};
use serde::Serialize;

use crate::config::ImportConfig;
use crate::plan;
use crate::report::{BatchReport, Decoded, FileReport, FileSummary};

/// Which decoder a file goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Nvx2,
    N3,
}

impl FileKind {
    /// Detect by extension (`.nvx2`, `.n3`)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())?;
        match ext.as_str() {
            "nvx2" => Some(FileKind::Nvx2),
            "n3" => Some(FileKind::N3),
            _ => None,
        }
    }

    /// Detect by magic, in either byte order for N3
    pub fn sniff(data: &[u8]) -> Option<Self> {
        let magic: [u8; 4] = data.get(..4)?.try_into().ok()?;
        let mut reversed = magic;
        reversed.reverse();
        if magic == *NVX2_MAGIC.as_bytes() {
            Some(FileKind::Nvx2)
        } else if magic == *N3_MAGIC.as_bytes() || reversed == *N3_MAGIC.as_bytes() {
            Some(FileKind::N3)
        } else {
            None
        }
    }
}

/// Keeps diagnostics for the report and forwards them to `tracing`
#[derive(Debug, Default)]
pub struct ReportSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink for ReportSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        TracingSink.report(diagnostic.clone());
        self.diagnostics.push(diagnostic);
    }
}

/// Decode one NVX2 file from disk
///
/// Diagnostics go to `sink`, each prefixed with the file name so that meshes
/// loaded on behalf of an N3 model stay distinguishable.
pub fn load_nvx2(
    path: &Path,
    config: &ImportConfig,
    sink: &mut impl DiagnosticSink,
) -> Result<Nvx2Mesh> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read mesh: {:?}", path))?;
    let mut events: Vec<Diagnostic> = Vec::new();
    let result = decode_nvx2_with(&data, &config.nvx2, &mut events);

    let name = file_stem(path);
    for event in events {
        sink.report(Diagnostic::new(
            event.severity,
            format!("{}: {}", name, event.message),
        ));
    }
    result.with_context(|| format!("Failed to decode mesh: {:?}", path))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed".to_string())
}

/// Import one file
///
/// `kind` forces a decoder; otherwise the extension decides, then the magic.
pub fn import_file(path: &Path, kind: Option<FileKind>, config: &ImportConfig) -> FileReport {
    let mut report = FileReport::new(path);
    let mut sink = ReportSink::default();

    if let Err(e) = run(path, kind, config, &mut report, &mut sink) {
        report.error = Some(format!("{:#}", e));
    }
    report.diagnostics = sink.diagnostics;
    report
}

fn run(
    path: &Path,
    kind: Option<FileKind>,
    config: &ImportConfig,
    report: &mut FileReport,
    sink: &mut ReportSink,
) -> Result<()> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let kind = kind
        .or_else(|| FileKind::from_path(path))
        .or_else(|| FileKind::sniff(&data))
        .with_context(|| format!("Unknown file type: {:?}", path))?;
    report.kind = Some(kind);

    let name = file_stem(path);
    tracing::debug!("Importing {:?} as {:?}", path, kind);

    match kind {
        FileKind::Nvx2 => {
            let mesh = decode_nvx2_with(&data, &config.nvx2, &mut *sink)?;
            report.summary = Some(FileSummary::of_mesh(&mesh));
            report.plan = Some(plan::plan_nvx2(&name, &mesh, &config.scene));
            report.decoded = Some(Decoded::Mesh(mesh));
        }
        FileKind::N3 => {
            let model = decode_n3_with(&data, &config.n3, &mut *sink)?;
            report.summary = Some(FileSummary::of_model(&model));
            report.plan = Some(plan::plan_n3(&model, &config.scene, |mesh_path| {
                load_nvx2(mesh_path, config, &mut *sink)
            }));
            report.decoded = Some(Decoded::Model(model));
        }
    }
    Ok(())
}

/// Import every file, one after another
pub fn import_batch<P: AsRef<Path>>(
    paths: &[P],
    kind: Option<FileKind>,
    config: &ImportConfig,
) -> BatchReport {
    let files = paths
        .iter()
        .map(|path| import_file(path.as_ref(), kind, config))
        .collect();
    BatchReport { files }
}
