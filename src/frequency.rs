use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use crate::config::KeyByteOrder;
use crate::error::KeyFileError;

/// Number of symbols tracked by a table.
pub const SYMBOLS: usize = 256;

/// Size in bytes of a persisted table.
pub const KEY_FILE_LEN: usize = SYMBOLS * 8;

/// Occurrence count of every byte value in a text.
///
/// This is the only state shared between encoder and decoder: the tree is
/// rebuilt from it on both sides, so the decode-side table must be identical
/// to the one written at encode time.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; SYMBOLS],
}

impl FrequencyTable {
    pub fn new() -> Self {
        FrequencyTable { counts: [0; SYMBOLS] }
    }

    pub fn count(text: &[u8]) -> Self {
        let mut table = FrequencyTable::new();
        for &byte in text {
            table.counts[byte as usize] += 1;
        }
        table
    }

    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    pub fn set(&mut self, symbol: u8, weight: u64) {
        self.counts[symbol as usize] = weight;
    }

    pub fn counts(&self) -> &[u64; SYMBOLS] {
        &self.counts
    }

    /// Present symbols with their weights, in ascending symbol order.
    pub fn present(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &weight)| weight > 0)
            .map(|(symbol, &weight)| (symbol as u8, weight))
    }

    pub fn distinct(&self) -> usize {
        self.present().count()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&weight| weight == 0)
    }

    /// Sum of all counts, `None` if it does not fit in a `u64`.
    pub fn total(&self) -> Option<u64> {
        self.counts
            .iter()
            .try_fold(0u64, |acc, &weight| acc.checked_add(weight))
    }

    /// Writes all 256 counts in index order, with no header.
    pub fn persist<W: Write>(&self, writer: &mut W, order: KeyByteOrder) -> io::Result<()> {
        let mut bytes = Vec::with_capacity(KEY_FILE_LEN);
        for &weight in &self.counts {
            bytes.extend_from_slice(&order.to_bytes(weight));
        }
        writer.write_all(&bytes)
    }

    /// Reads exactly 256 counts; anything after them is left unread.
    pub fn load<R: Read>(reader: &mut R, order: KeyByteOrder) -> Result<Self, KeyFileError> {
        let mut bytes = Vec::with_capacity(KEY_FILE_LEN);
        reader
            .take(KEY_FILE_LEN as u64)
            .read_to_end(&mut bytes)
            .map_err(KeyFileError::Read)?;

        if bytes.len() < KEY_FILE_LEN {
            return Err(KeyFileError::Truncated { bytes: bytes.len() });
        }

        let mut table = FrequencyTable::new();
        for (slot, chunk) in table.counts.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            *slot = order.from_bytes(word);
        }
        Ok(table)
    }

    pub fn write_to_path(&self, path: &Path, order: KeyByteOrder) -> Result<(), KeyFileError> {
        let with_path = |source| KeyFileError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(with_path)?;
        let mut writer = BufWriter::new(file);
        self.persist(&mut writer, order).map_err(with_path)?;
        writer.flush().map_err(with_path)?;
        tracing::debug!("wrote key file {}", path.display());
        Ok(())
    }

    pub fn read_from_path(path: &Path, order: KeyByteOrder) -> Result<Self, KeyFileError> {
        let mut file = File::open(path).map_err(|source| KeyFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::load(&mut file, order)?;
        tracing::debug!(
            "loaded key file {}: {} distinct symbols",
            path.display(),
            table.distinct()
        );
        Ok(table)
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // only present symbols, 256 mostly-zero slots are unreadable
        f.debug_map().entries(self.present()).finish()
    }
}
