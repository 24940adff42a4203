use std::fmt;
use std::str::FromStr;

/// Environment variable consulted by [`CodecConfig::from_env`].
pub const BYTE_ORDER_ENV: &str = "HUFFKEY_BYTE_ORDER";

/// Byte order of the 64-bit counts stored in a key file.
///
/// `Native` matches the reference tool, which dumps the counts straight from
/// memory. Key files written with `Native` are only portable between hosts of
/// the same endianness; pick `Little` or `Big` to exchange them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyByteOrder {
    #[default]
    Native,
    Little,
    Big,
}

impl KeyByteOrder {
    pub fn to_bytes(self, value: u64) -> [u8; 8] {
        match self {
            KeyByteOrder::Native => value.to_ne_bytes(),
            KeyByteOrder::Little => value.to_le_bytes(),
            KeyByteOrder::Big => value.to_be_bytes(),
        }
    }

    pub fn from_bytes(self, bytes: [u8; 8]) -> u64 {
        match self {
            KeyByteOrder::Native => u64::from_ne_bytes(bytes),
            KeyByteOrder::Little => u64::from_le_bytes(bytes),
            KeyByteOrder::Big => u64::from_be_bytes(bytes),
        }
    }
}

impl fmt::Display for KeyByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyByteOrder::Native => f.write_str("native"),
            KeyByteOrder::Little => f.write_str("little"),
            KeyByteOrder::Big => f.write_str("big"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown byte order {0:?}, expected native, little or big")]
pub struct ParseByteOrderError(String);

impl FromStr for KeyByteOrder {
    type Err = ParseByteOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" | "ne" => Ok(KeyByteOrder::Native),
            "little" | "le" => Ok(KeyByteOrder::Little),
            "big" | "be" => Ok(KeyByteOrder::Big),
            _ => Err(ParseByteOrderError(s.to_string())),
        }
    }
}

/// Configuration for [`HuffmanCodec`](crate::HuffmanCodec).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodecConfig {
    /// Byte order used to persist and load key files.
    pub byte_order: KeyByteOrder,
}

impl CodecConfig {
    pub fn with_byte_order(mut self, byte_order: KeyByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Builds a config from `HUFFKEY_BYTE_ORDER`, falling back to defaults
    /// when the variable is unset.
    pub fn from_env() -> Result<Self, ParseByteOrderError> {
        let mut config = CodecConfig::default();
        if let Ok(value) = std::env::var(BYTE_ORDER_ENV) {
            config.byte_order = value.parse()?;
        }
        Ok(config)
    }
}
