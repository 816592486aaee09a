//! N3 model decoder
//!
//! An N3 file is a flat stream of four-character tags. Node-open and
//! node-close tags nest to form the node tree; every other tag carries a
//! payload for the innermost open node and is routed to the first handler
//! category that claims it (see [`handlers`]). An unrecognized tag aborts the
//! parse, there is no skip mechanism.
//!
//! The byte order is not stored anywhere explicitly. It follows from how the
//! magic reads, and then applies to every multi-byte field in the file.

pub mod handlers;
pub mod node;
pub mod parser;
pub mod tags;


pub use handlers::{HANDLERS, Outcome, TagContext, TagHandler, dispatch};
pub use node::{
    BoundingBox, CharacterData, Joint, JointMask, MiscData, N3Model, Node, NodeData, ShaderParam,
    ShapeData, SkinData, SkinList, StateData, TransformData,
};
pub use parser::{N3Parser, ParseState, detect_byte_order};
pub use tags::{HandlerCategory, PayloadShape, TAG_REGISTRY, TagSpec};

use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::DecodeResult;
use crate::options::N3Options;

/// Decode an N3 file, logging diagnostics through `tracing`
pub fn decode_n3(data: &[u8], options: &N3Options) -> DecodeResult<N3Model> {
    decode_n3_with(data, options, &mut TracingSink)
}

/// Decode an N3 file, reporting diagnostics to `sink`
pub fn decode_n3_with(
    data: &[u8],
    options: &N3Options,
    sink: &mut impl DiagnosticSink,
) -> DecodeResult<N3Model> {
    N3Parser::new(data, options, sink).parse()
}
