//! Error types for the huffkey codec.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Direction of a single cursor step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Bit 0 walks left, bit 1 walks right.
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Direction::Right
        } else {
            Direction::Left
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => f.write_str("left"),
            Direction::Right => f.write_str("right"),
        }
    }
}

/// Errors that can occur while encoding or decoding.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input text had no bytes, or the key file lists no present symbol.
    #[error("cannot build a tree from empty input")]
    EmptyInput,

    /// `extract_min` was called on an empty queue.
    #[error("extract from empty queue")]
    EmptyQueue,

    /// The cursor was asked to follow a child that does not exist.
    #[error("cannot walk {direction} at depth {depth}: no such child")]
    InvalidTraversal { direction: Direction, depth: usize },

    /// Key file missing, unreadable, truncated or inconsistent.
    #[error("key file: {0}")]
    KeyFile(#[from] KeyFileError),

    /// A frame carried no sentinel bit.
    #[error("invalid frame {value:#04x} at offset {offset}: missing sentinel bit")]
    InvalidFrame { offset: usize, value: u8 },

    /// Encoded text was not a sequence of hex pairs.
    #[error("malformed encoded text: {0}")]
    Hex(#[from] hex::FromHexError),

    /// A symbol of the text has no path in the table it is encoded with.
    #[error("symbol {0:#04x} has no path")]
    MissingPath(u8),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Errors tied to the persisted frequency table.
#[derive(Debug, thiserror::Error)]
pub enum KeyFileError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("truncated: {bytes} of 2048 bytes")]
    Truncated { bytes: usize },

    #[error("symbol weights overflow a 64-bit total")]
    WeightOverflow,

    #[error("read failed: {0}")]
    Read(#[source] io::Error),

    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}

impl Error {
    /// Returns true if the failure came from the key file.
    #[inline]
    pub fn is_key_file(&self) -> bool {
        matches!(self, Error::KeyFile(_))
    }
}
