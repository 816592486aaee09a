//! N3 stream parser
//!
//! ```text
//! magic "NEB3" (byte-reversed in big-endian files)
//! version u32
//! tag stream:
//!   >MDL type name   model open
//!   >MND type name   node open, descends
//!   ....  payload    data tag for the open node
//!   <MND             node close, ascends
//!   <MDL | EOF_      end of model
//! ```

use crate::diagnostics::DiagnosticSink;
use crate::error::{DecodeError, DecodeResult};
use crate::fourcc::FourCC;
use crate::options::N3Options;
use crate::reader::{ByteOrder, ByteReader};
use crate::{N3_MAGIC, SUPPORTED_N3_VERSIONS};

use super::handlers::{TagContext, dispatch};
use super::node::{N3Model, Node};
use super::tags;

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Header not read yet
    AwaitingModelStart,
    /// Reading tags
    InModel,
    /// Terminator reached
    Done,
    /// A decode error stopped the parse
    Failed,
}

/// Detect the byte order from the magic bytes
pub fn detect_byte_order(magic: [u8; 4]) -> DecodeResult<ByteOrder> {
    let mut reversed = magic;
    reversed.reverse();
    if magic == N3_MAGIC.0 {
        Ok(ByteOrder::Little)
    } else if reversed == N3_MAGIC.0 {
        Ok(ByteOrder::Big)
    } else {
        Err(DecodeError::BadMagic {
            found: FourCC::new(magic),
            expected: N3_MAGIC,
        })
    }
}

/// Single-pass parser over one N3 byte stream
pub struct N3Parser<'a, S: DiagnosticSink> {
    reader: ByteReader<'a>,
    options: N3Options,
    sink: S,
    state: ParseState,
    version: u32,
    model_type: Option<FourCC>,
    model_name: String,
    nodes: Vec<Node>,
    /// Indices of the currently open nodes, innermost last
    open: Vec<usize>,
}

impl<'a, S: DiagnosticSink> N3Parser<'a, S> {
    pub fn new(data: &'a [u8], options: &N3Options, sink: S) -> Self {
        Self {
            reader: ByteReader::little_endian(data),
            options: *options,
            sink,
            state: ParseState::AwaitingModelStart,
            version: 0,
            model_type: None,
            model_name: String::new(),
            nodes: Vec::new(),
            open: Vec::new(),
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Advance by one header or tag record
    ///
    /// Once the state is [`ParseState::Done`] or [`ParseState::Failed`] this
    /// is a no-op. Errors are reported to the sink before being returned.
    pub fn step(&mut self) -> DecodeResult<ParseState> {
        let result = match self.state {
            ParseState::AwaitingModelStart => self.read_header(),
            ParseState::InModel => self.read_tag(),
            ParseState::Done | ParseState::Failed => return Ok(self.state),
        };
        if let Err(e) = result {
            self.state = ParseState::Failed;
            return Err(self.sink.fail(e));
        }
        Ok(self.state)
    }

    /// Run the parse to completion
    pub fn parse(mut self) -> DecodeResult<N3Model> {
        while self.step()? != ParseState::Done {}
        Ok(self.into_model())
    }

    fn read_header(&mut self) -> DecodeResult<()> {
        self.reader.ensure(8)?;
        let order = detect_byte_order(self.reader.read_array()?)?;
        self.reader.set_order(order);

        let version = self.reader.read_u32()?;
        tracing::debug!("n3 header: version {}, {:?} endian", version, order);
        if !SUPPORTED_N3_VERSIONS.contains(&version) {
            if !self.options.ignore_version {
                return Err(DecodeError::UnsupportedVersion(version));
            }
            let message = format!("Unsupported n3 version {version}, continuing");
            self.sink.warning(message);
        }

        self.version = version;
        self.state = ParseState::InModel;
        Ok(())
    }

    fn read_tag(&mut self) -> DecodeResult<()> {
        let offset = self.reader.position();
        let tag = self.reader.read_fourcc()?;

        match tag {
            tags::MODEL_OPEN => {
                self.model_type = Some(self.reader.read_fourcc()?);
                self.model_name = self.reader.read_string()?;
                tracing::debug!("model '{}' ({:?})", self.model_name, self.model_type);
            }
            tags::MODEL_CLOSE | tags::END_OF_FILE => {
                if !self.open.is_empty() {
                    let open = self.open.len();
                    let message = format!("{open} node(s) still open at end of model");
                    self.sink.warning(message);
                }
                self.open.clear();
                self.state = ParseState::Done;
            }
            tags::NODE_OPEN => {
                let node_type = self.reader.read_fourcc()?;
                let name = self.reader.read_string()?;
                let parent = self.open.last().copied();
                let index = self.nodes.len();
                tracing::debug!(
                    "node {} '{}' ({}) parent {:?}",
                    index,
                    name,
                    node_type,
                    parent
                );

                if let Some(parent) = parent {
                    self.nodes[parent].children.push(index);
                }
                self.nodes.push(Node::new(name, node_type, parent));
                self.open.push(index);
            }
            tags::NODE_CLOSE => {
                let closed = self
                    .open
                    .pop()
                    .ok_or(DecodeError::UnbalancedNodeClose { offset })?;
                tracing::trace!("end node {}", closed);
            }
            _ => {
                let Some(&current) = self.open.last() else {
                    return Err(DecodeError::UnknownTag { tag, offset });
                };
                let ctx = TagContext {
                    version: self.version,
                };
                match dispatch(tag, &mut self.reader, ctx, &mut self.nodes[current])? {
                    Some(category) => tracing::trace!("{} handled by {}", tag, category),
                    None => return Err(DecodeError::UnknownTag { tag, offset }),
                }
            }
        }
        Ok(())
    }

    fn into_model(self) -> N3Model {
        N3Model {
            version: self.version,
            byte_order: self.reader.order(),
            model_type: self.model_type,
            name: self.model_name,
            nodes: self.nodes,
        }
    }
}
