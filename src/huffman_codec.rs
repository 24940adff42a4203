use std::io::{Read, Write};
use std::path::Path;

use crate::config::CodecConfig;
use crate::error::{Error, KeyFileError, Result};
use crate::framer::{FrameDecoder, FrameEncoder};
use crate::frequency::FrequencyTable;
use crate::hufftree::HuffmanTree;
use crate::path_table::PathTable;

/// Frames of an encoded text together with the table needed to decode them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub table: FrequencyTable,
    pub frames: Vec<u8>,
}

impl Encoded {
    pub fn to_hex(&self) -> String {
        to_hex(&self.frames)
    }
}

/// Formats frames as lowercase hex pairs.
pub fn to_hex(frames: &[u8]) -> String {
    hex::encode(frames)
}

/// Parses hex pairs back into frames. Surrounding whitespace is ignored.
pub fn from_hex(encoded: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(encoded.trim())?)
}

#[derive(Debug, Clone, Default)]
pub struct HuffmanCodec {
    config: CodecConfig,
}

impl HuffmanCodec {
    pub fn new(config: CodecConfig) -> Self {
        HuffmanCodec { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn encode_frames(&self, text: &[u8]) -> Result<Encoded> {
        let table = FrequencyTable::count(text);
        if table.is_empty() {
            return Err(Error::EmptyInput);
        }
        let frames = frame(&table, text)?;
        Ok(Encoded { table, frames })
    }

    pub fn decode_frames(&self, frames: &[u8], table: &FrequencyTable) -> Result<Vec<u8>> {
        let tree = HuffmanTree::from_table(table)?;
        FrameDecoder::decode(&tree, frames)
    }

    /// Encodes `text`, writing its frequency table to `key`.
    ///
    /// The table is written before any framing happens; on error the key
    /// sink may hold a complete table but no encoded text is returned.
    pub fn encode_with_key<W: Write>(&self, text: &[u8], key: &mut W) -> Result<String> {
        let table = FrequencyTable::count(text);
        if table.is_empty() {
            return Err(Error::EmptyInput);
        }
        table
            .persist(key, self.config.byte_order)
            .map_err(KeyFileError::Write)?;
        Ok(to_hex(&frame(&table, text)?))
    }

    pub fn decode_with_key<R: Read>(&self, encoded: &str, key: &mut R) -> Result<Vec<u8>> {
        let frames = from_hex(encoded)?;
        let table = FrequencyTable::load(key, self.config.byte_order)?;
        self.decode_frames(&frames, &table)
    }

    /// Encodes `text` and persists its frequency table at `key_path`.
    pub fn encode(&self, text: &[u8], key_path: &Path) -> Result<String> {
        let table = FrequencyTable::count(text);
        if table.is_empty() {
            return Err(Error::EmptyInput);
        }
        table.write_to_path(key_path, self.config.byte_order)?;

        let encoded = to_hex(&frame(&table, text)?);
        tracing::debug!(
            "encoded {} bytes ({} distinct) into {} hex digits, key {}",
            text.len(),
            table.distinct(),
            encoded.len(),
            key_path.display()
        );
        Ok(encoded)
    }

    /// Decodes `encoded` with the frequency table stored at `key_path`.
    pub fn decode(&self, encoded: &str, key_path: &Path) -> Result<Vec<u8>> {
        let frames = from_hex(encoded)?;
        let table = FrequencyTable::read_from_path(key_path, self.config.byte_order)?;
        self.decode_frames(&frames, &table)
    }
}

fn frame(table: &FrequencyTable, text: &[u8]) -> Result<Vec<u8>> {
    let tree = HuffmanTree::from_table(table)?;
    let paths = PathTable::from_tree(&tree);
    FrameEncoder::encode(&paths, text)
}
