//! # qrbyte
//!
//! A byte-mode QR code encoder. Data goes through version selection, bit stream
//! construction, Reed-Solomon error correction, interleaving, zig-zag placement and
//! penalty-based mask selection, and comes out as a fully populated module matrix
//! that renders to a 1-bit image.
//!
//! ## Quick Start
//!
//! ```rust
//! use qrbyte::{encode, ECLevel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = encode("HELLO", Some(ECLevel::M))?;
//! assert_eq!(*qr.version(), 1);
//!
//! let img = qr.to_image()?; // one pixel per module
//! assert_eq!(img.dimensions(), (21, 21));
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrbyte::{ECLevel, MaskPattern, QRBuilder, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new(b"Hello, World!")
//!     .version(Version::new(2)?)      // Smallest fitting version if not provided
//!     .ec_level(ECLevel::Q)           // Defaults to ECLevel::M
//!     .mask(MaskPattern::new(3)?)     // Lowest penalty mask if not provided
//!     .build()?;
//!
//! let img = qr.render(4)?; // 4 pixels per module plus the quiet zone
//! assert_eq!(img.dimensions(), (132, 132));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub mod common;

pub use builder::{QRBuilder, QR};
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::matrix::{Module, ModuleMatrix};
pub use common::metadata::{ECLevel, Version};

/// Encodes `text` as bytes at `ec_level`, or at level M when none is given.
pub fn encode(text: &str, ec_level: Option<ECLevel>) -> QRResult<QR> {
    QRBuilder::new(text.as_bytes()).ec_level(ec_level.unwrap_or_default()).build()
}

#[cfg(test)]
mod encode_tests {
    use super::{encode, ECLevel, QRError};

    #[test]
    fn test_encode_defaults_to_medium() {
        let qr = encode("HELLO", None).unwrap();
        assert_eq!(qr.ec_level(), ECLevel::M);
        assert_eq!(qr, encode("HELLO", Some(ECLevel::M)).unwrap());
    }

    #[test]
    fn test_encode_utf8() {
        // 12 bytes exceed the 7 byte capacity of version 1 at level H
        let qr = encode("Grüße 🌎", Some(ECLevel::H)).unwrap();
        assert_eq!(*qr.version(), 2);
        assert_eq!(qr.matrix().first_unset(), None);
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode("", None).map(|_| ()), Err(QRError::InvalidInput("Empty data")));
    }
}
