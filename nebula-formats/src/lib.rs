//! Nebula-formats: decoders for Nebula engine NVX2 meshes and N3 models
//!
//! This crate turns the raw bytes of two legacy Nebula asset formats into
//! plain Rust values. It performs no file I/O and builds no scene objects;
//! callers supply bytes and receive structured data plus a stream of
//! diagnostics.
//!
//! # Key Features
//!
//! - **NVX2**: bitmask-driven vertex layout decoding for both the Nebula 2
//!   (legacy) and Nebula 3 (current) component registries, with version
//!   auto-detection from the header's vertex width
//! - **N3**: tag-stream model parsing with byte order detected from the magic
//! - **Never panics on hostile input**: every read is bounds-checked and every
//!   count is validated before allocation
//!
//! # Usage
//!
//! ```ignore
//! use nebula_formats::{N3Options, Nvx2Options, decode_n3, decode_nvx2};
//!
//! let mesh = decode_nvx2(&std::fs::read("body.nvx2")?, &Nvx2Options::default())?;
//! for group in &mesh.groups {
//!     println!("group {}: {} vertices", group.index, group.vertex_count());
//! }
//!
//! let model = decode_n3(&std::fs::read("body.n3")?, &N3Options::default())?;
//! for node in &model.nodes {
//!     println!("{} ({})", node.name, node.node_type);
//! }
//! ```
//!
//! # Diagnostics
//!
//! Non-fatal findings (detected NVX2 version, version fallback, tolerated N3
//! version) go to a [`DiagnosticSink`]. The plain `decode_*` functions forward
//! them to `tracing`; the `decode_*_with` variants take any sink, e.g. a
//! `Vec<Diagnostic>`.

pub mod diagnostics;
mod error;
pub mod fourcc;
pub mod n3;
pub mod nvx2;
pub mod options;
pub mod reader;

pub use diagnostics::{Diagnostic, DiagnosticSink, Severity, TracingSink};
pub use error::{DecodeError, DecodeResult};
pub use fourcc::FourCC;
pub use n3::{N3Model, Node, decode_n3, decode_n3_with};
pub use nvx2::{FormatVersion, GroupMesh, Nvx2Mesh, decode_nvx2, decode_nvx2_with};
pub use options::{FormatVersionHint, N3Options, Nvx2Options};
pub use reader::{ByteOrder, ByteReader};

// =============================================================================
// Constants
// =============================================================================

/// NVX2 file magic
pub const NVX2_MAGIC: FourCC = FourCC::new(*b"NVX2");

/// N3 file magic as it reads in a little-endian file
pub const N3_MAGIC: FourCC = FourCC::new(*b"NEB3");

/// N3 file versions with a known layout
pub const SUPPORTED_N3_VERSIONS: [u32; 2] = [1, 2];
