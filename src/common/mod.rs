pub mod bit_utils;
pub mod codec;
pub mod ec;
pub mod error;
pub mod iter;
pub mod mask;
pub mod matrix;
pub mod metadata;

pub use bit_utils::BitStream;
pub use error::*;
pub use mask::MaskPattern;
pub use matrix::{Module, ModuleMatrix};
pub use metadata::{ECLevel, Version};
