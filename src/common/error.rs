use thiserror::Error;

use super::metadata::{ECLevel, Version};

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum QRError {
    #[error("Capacity exceeded: Version {version} at level {ec_level} holds {capacity} bytes, requested {requested}")]
    CapacityExceeded { version: Version, ec_level: ECLevel, capacity: usize, requested: usize },

    #[error("Incomplete symbol: Unset module at ({x}, {y})")]
    IncompleteSymbol { x: usize, y: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("Invalid version: {0}")]
    InvalidVersion(u8),

    #[error("Invalid masking pattern: {0}")]
    InvalidMaskPattern(u8),

    #[error("Invalid error correction level: {0:?}")]
    InvalidECLevel(String),
}

pub type QRResult<T> = Result<T, QRError>;
