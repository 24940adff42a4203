//! # huffkey
//!
//! Reversible Huffman packing of text, keyed by a persisted byte-frequency
//! table. This is not encryption: the key file only carries the counts the
//! decoder needs to rebuild the same tree.
//!
//! ## Quick Start
//!
//! ```no_run
//! use huffkey::HuffmanCodec;
//! use std::path::Path;
//!
//! let codec = HuffmanCodec::default();
//! let key = Path::new("message.key");
//!
//! let encoded = codec.encode(b"hello world", key)?;
//! let decoded = codec.decode(&encoded, key)?;
//! assert_eq!(decoded, b"hello world");
//! # Ok::<(), huffkey::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod framer;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod path_table;

// Internal modules - not part of public API
mod bit_vec;
mod queue;

// Re-export main types for convenience
pub use bit_vec::{BitVec, Bits};
pub use config::{CodecConfig, KeyByteOrder};
pub use error::{Direction, Error, KeyFileError, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::{Encoded, HuffmanCodec};
pub use hufftree::{HuffNode, HuffmanTree, TreeCursor};
pub use path_table::PathTable;
