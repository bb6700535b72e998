use std::cmp::min;

use log::debug;

use super::bit_utils::BitStream;
use super::error::{QRError, QRResult};
use super::metadata::{ECLevel, Version};

// Version selection
//------------------------------------------------------------------------------

/// Smallest version whose byte capacity at `ec_level` holds `data_len` bytes.
pub fn find_version(data_len: usize, ec_level: ECLevel) -> QRResult<Version> {
    Version::all().find(|v| v.capacity(ec_level) >= data_len).ok_or(
        QRError::CapacityExceeded {
            version: Version::MAX,
            ec_level,
            capacity: Version::MAX.capacity(ec_level),
            requested: data_len,
        },
    )
}


// Payload builder
//------------------------------------------------------------------------------

/// Finds the smallest version for `data` and builds its data codewords.
pub fn encode(data: &[u8], ec_level: ECLevel) -> QRResult<(BitStream, Version)> {
    let version = find_version(data.len(), ec_level)?;
    debug!("Selected version {version} for {} bytes at level {ec_level}", data.len());
    let encoded = encode_with_version(data, ec_level, version)?;
    Ok((encoded, version))
}

/// Builds the data codewords for `data` in a symbol of the given version: byte mode
/// header, payload, terminator, bit alignment and pad codewords.
pub fn encode_with_version(
    data: &[u8],
    ec_level: ECLevel,
    version: Version,
) -> QRResult<BitStream> {
    let capacity = version.capacity(ec_level);
    if data.len() > capacity {
        return Err(QRError::CapacityExceeded {
            version,
            ec_level,
            capacity,
            requested: data.len(),
        });
    }

    let bit_capacity = version.data_codewords(ec_level) << 3;
    let mut bs = BitStream::new(bit_capacity);
    push_header(&mut bs, version, data.len());
    for &b in data {
        bs.push_bits(b, 8);
    }
    push_terminator(&mut bs);
    pad_remaining_capacity(&mut bs);

    debug_assert_eq!(bs.len(), bit_capacity, "Encoded data must fill the data codewords");
    Ok(bs)
}

fn push_header(bs: &mut BitStream, version: Version, char_count: usize) {
    bs.push_bits(BYTE_MODE_INDICATOR, 4);
    let char_count_bit_len = version.char_count_bit_len();
    debug_assert!(char_count < (1 << char_count_bit_len), "Char count exceeds bit length");
    bs.push_bits(char_count as u16, char_count_bit_len);
}

fn push_terminator(bs: &mut BitStream) {
    let term_len = min(4, bs.capacity() - bs.len());
    bs.push_zeros(term_len);
}

fn pad_remaining_capacity(bs: &mut BitStream) {
    let offset = bs.len() & 7;
    if offset > 0 {
        bs.push_zeros(8 - offset);
    }

    let remain_byte_capacity = (bs.capacity() - bs.len()) >> 3;
    PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
        bs.push_bits(pc, 8);
    });
}


// Global constants
//------------------------------------------------------------------------------

static BYTE_MODE_INDICATOR: u8 = 0b0100;

static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];
