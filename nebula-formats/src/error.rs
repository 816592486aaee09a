//! Decode error types

use crate::fourcc::FourCC;

/// Result alias used by every decoder in this crate
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Fatal decode failures
///
/// Every variant aborts the decode of the current file. The only soft
/// conditions (NVX2 version auto-detect fallback, tolerated N3 versions) are
/// reported as diagnostics instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// Fewer bytes remain than a fixed-size read requires
    #[error("unexpected end of input at offset {offset} (needed {needed} bytes, {available} available)")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Header signature is not the expected tag
    #[error("invalid magic {found} (expected {expected})")]
    BadMagic { found: FourCC, expected: FourCC },

    /// NVX2 group table is empty
    #[error("file does not contain any groups")]
    EmptyGroupTable,

    /// No decodable vertex component bit is set
    #[error("empty vertex format (component mask 0x{components:08X})")]
    EmptyLayout { components: u32 },

    /// Computed vertex size disagrees with the header's vertex width
    #[error("invalid vertex format size {computed}, expected {expected}")]
    LayoutSizeMismatch { computed: usize, expected: usize },

    /// N3 file version outside the supported set
    #[error("unsupported version {0}")]
    UnsupportedVersion(u32),

    /// N3 tag not recognized by any handler (or no node is open)
    #[error("unknown tag '{tag}' at offset {offset}")]
    UnknownTag { tag: FourCC, offset: usize },

    /// N3 node-close tag without a matching node-open tag
    #[error("node close at offset {offset} without an open node")]
    UnbalancedNodeClose { offset: usize },

    /// NVX2 group range does not fit the global buffers
    #[error("group {group} is out of range: {reason}")]
    GroupOutOfRange { group: usize, reason: String },

    /// Signed count field holds a negative value
    #[error("negative {field}: {value}")]
    NegativeCount { field: &'static str, value: i32 },
}
