//! Sentinel framing of Huffman paths.
//!
//! Every frame is one byte: a sentinel `1` followed by up to seven payload
//! bits, most significant first. Full frames therefore always have their top
//! bit set, and the final frame may be shorter. The decoder finds the
//! sentinel as the highest set bit, which tells it how many payload bits
//! follow without any length field. Frame boundaries ignore symbol
//! boundaries: a path may start in one frame and end in the next.

use crate::bit_vec::BitVec;
use crate::error::{Direction, Error, Result};
use crate::hufftree::{HuffmanTree, TreeCursor};
use crate::path_table::PathTable;

/// Payload bits carried by a full frame.
pub const PAYLOAD_BITS: u32 = 7;

/// Frame emitted when the payload ends exactly on a frame boundary.
pub const SENTINEL_ONLY: u8 = 0x01;

/// Number of payload bits in `frame`, `None` when it has no sentinel.
pub fn payload_len(frame: u8) -> Option<u32> {
    if frame == 0 {
        None
    } else {
        Some(PAYLOAD_BITS - frame.leading_zeros())
    }
}

#[derive(Debug, Default)]
pub struct FrameEncoder {
    frames: Vec<u8>,
    // sentinel plus the payload pushed so far; empty when `pending_len` is 0
    pending: u8,
    pending_len: u32,
    payload_bits: u64,
}

impl FrameEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames `text` with the paths of `table`.
    pub fn encode(table: &PathTable, text: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = FrameEncoder::new();
        for &byte in text {
            let path = table.get(byte).ok_or(Error::MissingPath(byte))?;
            encoder.push_path(path);
        }
        Ok(encoder.finish())
    }

    pub fn push_bit(&mut self, bit: bool) {
        if self.pending_len == 0 {
            self.pending = 1;
            self.pending_len = 1;
        }
        self.pending = (self.pending << 1) | bit as u8;
        self.pending_len += 1;
        self.payload_bits += 1;

        if self.pending_len == 8 {
            self.frames.push(self.pending);
            self.pending = 0;
            self.pending_len = 0;
        }
    }

    /// Appends a symbol's path. The empty path of a single-symbol tree is
    /// written as one `0` bit so each occurrence stays countable.
    pub fn push_path(&mut self, path: &BitVec) {
        if path.is_empty() {
            self.push_bit(false);
            return;
        }
        for bit in path {
            self.push_bit(bit);
        }
    }

    pub fn payload_bits(&self) -> u64 {
        self.payload_bits
    }

    pub fn finish(mut self) -> Vec<u8> {
        if self.pending_len > 0 {
            self.frames.push(self.pending);
        } else if self.payload_bits > 0 {
            self.frames.push(SENTINEL_ONLY);
        }
        tracing::debug!(
            "framed {} payload bits into {} frames",
            self.payload_bits,
            self.frames.len()
        );
        self.frames
    }
}

/// Rebuilds the text by walking a tree with the payload of each frame.
#[derive(Debug)]
pub struct FrameDecoder<'a> {
    cursor: TreeCursor<'a>,
    degenerate: bool,
    offset: usize,
    output: Vec<u8>,
}

impl<'a> FrameDecoder<'a> {
    pub fn new(tree: &'a HuffmanTree) -> Self {
        FrameDecoder {
            cursor: tree.cursor(),
            degenerate: tree.is_degenerate(),
            offset: 0,
            output: Vec::new(),
        }
    }

    pub fn decode(tree: &HuffmanTree, frames: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = FrameDecoder::new(tree);
        for &frame in frames {
            decoder.push_frame(frame)?;
        }
        Ok(decoder.finish())
    }

    pub fn push_frame(&mut self, frame: u8) -> Result<()> {
        let offset = self.offset;
        let len = payload_len(frame).ok_or(Error::InvalidFrame {
            offset,
            value: frame,
        })?;

        for shift in (0..len).rev() {
            self.push_bit((frame >> shift) & 1 == 1)?;
        }
        self.offset += 1;
        Ok(())
    }

    fn push_bit(&mut self, bit: bool) -> Result<()> {
        let direction = Direction::from_bit(bit);

        // a leaf root has no children; each `0` stands for one occurrence
        if self.degenerate {
            if direction == Direction::Right {
                return Err(Error::InvalidTraversal {
                    direction,
                    depth: 0,
                });
            }
            self.output.extend(self.cursor.current_symbol());
            return Ok(());
        }

        self.cursor.walk(direction)?;
        if let Some(symbol) = self.cursor.current_symbol() {
            self.output.push(symbol);
            self.cursor.back_to_root();
        }
        Ok(())
    }

    pub fn finish(self) -> Vec<u8> {
        if !self.cursor.is_at_root() {
            tracing::warn!(
                "input ended {} bits into a path, partial symbol dropped",
                self.cursor.depth()
            );
        }
        tracing::debug!(
            "decoded {} frames into {} bytes",
            self.offset,
            self.output.len()
        );
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;

    fn encode(text: &[u8]) -> (HuffmanTree, Vec<u8>) {
        let tree = HuffmanTree::from_bytes(text).unwrap();
        let frames = FrameEncoder::encode(&PathTable::from_tree(&tree), text).unwrap();
        (tree, frames)
    }

    #[test]
    fn test_payload_len() {
        assert_eq!(payload_len(0x00), None);
        assert_eq!(payload_len(0x01), Some(0));
        assert_eq!(payload_len(0x02), Some(1));
        assert_eq!(payload_len(0x74), Some(6));
        assert_eq!(payload_len(0x80), Some(7));
        assert_eq!(payload_len(0xff), Some(7));
    }

    #[test]
    fn test_single_short_frame() {
        // paths: a=1 b=01 c=00, payload 1 1 01 00
        let (tree, frames) = encode(b"aabc");
        assert_eq!(frames, vec![0b111_0100]);
        assert_eq!(FrameDecoder::decode(&tree, &frames).unwrap(), b"aabc");
    }

    #[test]
    fn test_full_frame_then_short() {
        // a=1 b=0, eight payload bits
        let (tree, frames) = encode(b"aaaaaaab");
        assert_eq!(frames, vec![0xff, 0x02]);
        assert_eq!(FrameDecoder::decode(&tree, &frames).unwrap(), b"aaaaaaab");
    }

    #[test]
    fn test_exact_multiple_of_seven_adds_sentinel_frame() {
        let (tree, frames) = encode(b"aaaaaab");
        assert_eq!(frames, vec![0xfe, SENTINEL_ONLY]);
        assert_eq!(FrameDecoder::decode(&tree, &frames).unwrap(), b"aaaaaab");
    }

    #[test]
    fn test_single_symbol() {
        let (tree, frames) = encode(b"aaaa");
        assert_eq!(frames, vec![0b1_0000]);
        assert_eq!(FrameDecoder::decode(&tree, &frames).unwrap(), b"aaaa");

        let (tree, frames) = encode(b"zzzzzzz");
        assert_eq!(frames, vec![0x80, SENTINEL_ONLY]);
        assert_eq!(FrameDecoder::decode(&tree, &frames).unwrap(), b"zzzzzzz");
    }

    #[test]
    fn test_single_symbol_rejects_right() {
        let tree = HuffmanTree::from_bytes(b"aaaa").unwrap();
        assert!(matches!(
            FrameDecoder::decode(&tree, &[0b11]),
            Err(Error::InvalidTraversal {
                direction: Direction::Right,
                ..
            })
        ));
    }

    #[test]
    fn test_paths_cross_frame_boundaries() {
        let text = b"it was the best of times, it was the worst of times";
        let (tree, frames) = encode(text);
        let paths = PathTable::from_tree(&tree);
        let total: usize = text.iter().map(|&b| paths.get(b).unwrap().len()).sum();

        // either a short trailing frame or a sentinel-only one
        let full = total / 7;
        assert_eq!(frames.len(), full + 1);
        assert!(frames[..full].iter().all(|&f| f & 0x80 != 0));
        assert_eq!(FrameDecoder::decode(&tree, &frames).unwrap(), text);
    }

    #[test]
    fn test_every_payload_remainder() {
        // prefixes of the text cover all seven trailing-frame lengths
        let text = b"abcdefghijklmnopqrstuvwxyz0123456789";
        let tree = HuffmanTree::from_bytes(text).unwrap();
        let paths = PathTable::from_tree(&tree);
        let mut remainders = std::collections::BTreeSet::new();

        for end in 1..=text.len() {
            let mut encoder = FrameEncoder::new();
            for &byte in &text[..end] {
                encoder.push_path(paths.get(byte).unwrap());
            }
            remainders.insert(encoder.payload_bits() % 7);
            let frames = encoder.finish();
            assert_eq!(FrameDecoder::decode(&tree, &frames).unwrap(), &text[..end]);
        }
        assert_eq!(remainders.len(), 7);
    }

    #[test]
    fn test_missing_sentinel() {
        let (tree, mut frames) = encode(b"hello world");
        frames.insert(1, 0x00);
        match FrameDecoder::decode(&tree, &frames) {
            Err(Error::InvalidFrame { offset, value }) => {
                assert_eq!(offset, 1);
                assert_eq!(value, 0);
            }
            other => panic!("expected invalid frame, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_path() {
        let tree = HuffmanTree::from_bytes(b"abc").unwrap();
        let paths = PathTable::from_tree(&tree);
        assert!(matches!(
            FrameEncoder::encode(&paths, b"abd"),
            Err(Error::MissingPath(b'd'))
        ));
    }

    #[test]
    fn test_truncated_stream_drops_partial_symbol() {
        let mut table = FrequencyTable::new();
        table.set(b'a', 1);
        table.set(b'b', 1);
        table.set(b'c', 2);
        let tree = HuffmanTree::from_table(&table).unwrap();
        // c=1 then the first bit of b=00
        assert_eq!(FrameDecoder::decode(&tree, &[0b110]).unwrap(), b"c");
    }

    #[test]
    fn test_sentinel_only_frames_are_empty() {
        let (tree, frames) = encode(b"ab");
        let mut padded = vec![SENTINEL_ONLY];
        padded.extend_from_slice(&frames);
        padded.push(SENTINEL_ONLY);
        assert_eq!(FrameDecoder::decode(&tree, &padded).unwrap(), b"ab");
    }
}
