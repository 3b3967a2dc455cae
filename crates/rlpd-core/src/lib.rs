//! rlpd-core: editable RLP value trees
//!
//! This crate focuses on a small, well-factored surface:
//! - RLP wire reader/writer (`rlp`, `rlp_write`)
//! - Four leaf representations: hex, UTF-8, unsigned integer, timestamp
//! - Arena tree of editable nodes with upward validity propagation
//! - Root controller driving the Encoded <-> Decoded mode switch
//!
pub mod codecs;
pub mod controller;
pub mod error;
pub mod node;
pub mod options;
pub mod rlp;
pub mod rlp_write;
pub mod tree;
pub mod value;

pub use codecs::{LeafViews, Representation};
pub use controller::{Control, Mode, RootController};
pub use error::{EditError, RlpError};
pub use node::{LeafState, ListState, Node, NodeKind};
pub use options::EditorOptions;
pub use rlp::{decode, decode_wire_text, normalize_wire_text};
pub use rlp_write::{encode, encode_wire_text};
pub use tree::{ChildRequest, NodeId, Notification, Tree};
pub use value::Value;
