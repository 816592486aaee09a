//! nebula-import - Nebula asset import tool
//!
//! Decodes NVX2 meshes and N3 models and prints what a scene builder would
//! create from them.
//!
//! # Usage
//!
//! ```bash
//! # Decode meshes, forcing the Nebula 2 layout
//! nebula-import mesh body.nvx2 head.nvx2 --nvx2-version legacy
//!
//! # Decode a model and follow its mesh references
//! nebula-import model hero.n3 --resource-root export
//!
//! # Mixed batch, JSON report
//! nebula-import --json import export/models/*.n3 export/meshes/*.nvx2
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use nebula_formats::FormatVersionHint;
use nebula_formats::n3::TAG_REGISTRY;

use nebula_import::{FileKind, ImportConfig, import_batch};

#[derive(Parser)]
#[command(name = "nebula-import")]
#[command(about = "Nebula NVX2/N3 asset import tool")]
#[command(version)]
struct Cli {
    /// Import configuration (nebula-import.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Include the full decoded data in the JSON report
    #[arg(long, global = true)]
    dump: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode NVX2 mesh files
    Mesh {
        /// Input .nvx2 files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        mesh: MeshArgs,
    },

    /// Decode N3 model files
    Model {
        /// Input .n3 files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        model: ModelArgs,

        #[command(flatten)]
        mesh: MeshArgs,
    },

    /// Decode files of either kind (by extension, then by magic)
    Import {
        /// Input files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        model: ModelArgs,

        #[command(flatten)]
        mesh: MeshArgs,
    },

    /// List the N3 tags the model decoder understands
    Tags,
}

#[derive(Args)]
struct MeshArgs {
    /// NVX2 layout: auto, legacy (Nebula 2) or current (Nebula 3)
    #[arg(long, value_name = "VERSION")]
    nvx2_version: Option<FormatVersionHint>,

    /// Skip UV layers
    #[arg(long)]
    no_uvs: bool,

    /// Skip bone weights and joint indices
    #[arg(long)]
    no_weights: bool,

    /// Decode vertex colors
    #[arg(long)]
    colors: bool,

    /// Do not parent each file's objects under an empty
    #[arg(long)]
    no_parent_empty: bool,
}

#[derive(Args)]
struct ModelArgs {
    /// Fail on N3 versions other than 1 and 2
    #[arg(long)]
    strict_version: bool,

    /// Directory that resource ids (msh:...) resolve against
    #[arg(short, long)]
    resource_root: Option<PathBuf>,

    /// Do not build armatures from joints
    #[arg(long)]
    no_armatures: bool,

    /// Do not build materials
    #[arg(long)]
    no_materials: bool,

    /// Share materials between nodes that name the same material
    #[arg(long)]
    reuse_materials: bool,

    /// Do not follow mesh references
    #[arg(long)]
    no_meshes: bool,
}

impl MeshArgs {
    fn apply(&self, config: &mut ImportConfig) {
        if let Some(version) = self.nvx2_version {
            config.nvx2.version = version;
        }
        if self.no_uvs {
            config.nvx2.create_uvs = false;
        }
        if self.no_weights {
            config.nvx2.create_weights = false;
        }
        if self.colors {
            config.nvx2.create_colors = true;
        }
        if self.no_parent_empty {
            config.scene.create_parent_empty = false;
        }
    }
}

impl ModelArgs {
    fn apply(&self, config: &mut ImportConfig) {
        if self.strict_version {
            config.n3.ignore_version = false;
        }
        if let Some(root) = &self.resource_root {
            config.scene.resource_root = Some(root.clone());
        }
        if self.no_armatures {
            config.scene.create_armatures = false;
        }
        if self.no_materials {
            config.scene.create_materials = false;
        }
        if self.reuse_materials {
            config.scene.reuse_materials = true;
        }
        if self.no_meshes {
            config.scene.import_meshes = false;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (stderr, stdout carries the report)
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let mut config = ImportConfig::load_or_default(cli.config.as_deref())?;

    let (files, kind) = match &cli.command {
        Commands::Mesh { files, mesh } => {
            mesh.apply(&mut config);
            (files, Some(FileKind::Nvx2))
        }
        Commands::Model { files, model, mesh } => {
            model.apply(&mut config);
            mesh.apply(&mut config);
            (files, Some(FileKind::N3))
        }
        Commands::Import { files, model, mesh } => {
            model.apply(&mut config);
            mesh.apply(&mut config);
            (files, None)
        }
        Commands::Tags => {
            print_tags();
            return Ok(());
        }
    };

    run_batch(files, kind, &config, cli.json, cli.dump)
}

fn run_batch(
    files: &[PathBuf],
    kind: Option<FileKind>,
    config: &ImportConfig,
    json: bool,
    dump: bool,
) -> Result<()> {
    if let Some(root) = &config.scene.resource_root
        && !root.is_dir()
    {
        tracing::warn!("Resource root {:?} is not a directory", root);
    }

    let mut report = import_batch(files, kind, config);
    if !dump {
        report.strip_decoded();
    }

    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report);
    }

    if report.all_failed() {
        anyhow::bail!("All {} files failed to import", report.files.len());
    }
    if report.failed() > 0 {
        tracing::warn!(
            "{} of {} files failed to import",
            report.failed(),
            report.files.len()
        );
    }
    Ok(())
}

fn print_tags() {
    println!(
        "{:<6} {:<16} {:<24} Description",
        "Tag", "Handler", "Payload"
    );
    for spec in TAG_REGISTRY {
        println!(
            "{:<6} {:<16} {:<24} {}",
            spec.tag.to_string(),
            spec.category.to_string(),
            spec.payload.describe(),
            spec.description
        );
    }
    tracing::debug!("{} tags", TAG_REGISTRY.len());
}
