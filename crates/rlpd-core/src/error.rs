use thiserror::Error;

use crate::tree::NodeId;

/// Wire-level failures from the RLP reader/writer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RlpError {
    #[error("unexpected end of input at {0:#x}")]
    UnexpectedEof(usize),
    #[error("non-canonical length prefix at {0:#x}")]
    NonCanonicalLength(usize),
    #[error("single byte below 0x80 must not carry a string prefix (at {0:#x})")]
    NonCanonicalSingleByte(usize),
    #[error("list item overruns its parent list at {0:#x}")]
    ListOverrun(usize),
    #[error("{0} trailing byte(s) after the top-level item")]
    TrailingBytes(usize),
    #[error("payload of {0} bytes is too long to encode")]
    TooLong(usize),
    #[error("list nesting too deep at {0:#x}")]
    TooDeep(usize),
    #[error("input is not valid hex")]
    InvalidHex,
}

/// Structural edit misuse. These never mutate the tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("node {0:?} has no parent list")]
    NoParent(NodeId),
    #[error("node {0:?} is not a list")]
    NotAList(NodeId),
    #[error("node {0:?} is not a leaf")]
    NotALeaf(NodeId),
    #[error("index {index} out of bounds for list of {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("node {0:?} is already nested too deep")]
    TooDeep(NodeId),
    #[error("no tree is loaded")]
    NoTree,
    #[error("operation requires {0} mode")]
    WrongMode(&'static str),
}
