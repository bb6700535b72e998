use std::ops::Deref;

use crate::common::{
    bit_utils::BitStream,
    ec::ecc,
    metadata::{ECLevel, Version},
};

// Error correction blocks
//------------------------------------------------------------------------------

/// Splits the data codewords into the version's blocks and computes the error
/// correction codewords of each.
pub fn compute_ecc(data: &[u8], version: Version, ec_level: ECLevel) -> (Vec<&[u8]>, Vec<Vec<u8>>) {
    let data_blocks = blockify(data, version, ec_level);

    let ecc_size_per_block = version.ecc_per_block(ec_level);
    let ecc_blocks = data_blocks.iter().map(|b| ecc(b, ecc_size_per_block)).collect::<Vec<_>>();

    (data_blocks, ecc_blocks)
}

pub fn blockify(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<&[u8]> {
    let (block1_size, block1_count, block2_size, block2_count) =
        version.data_codewords_per_block(ec_level);

    let total_blocks = block1_count + block2_count;
    let total_block1_size = block1_size * block1_count;
    let total_size = total_block1_size + block2_size * block2_count;

    debug_assert!(
        total_size == data.len(),
        "Data len doesn't match total size of blocks: Data len {}, Total block size {}",
        data.len(),
        total_size
    );

    let mut data_blocks = Vec::with_capacity(total_blocks);
    data_blocks.extend(data[..total_block1_size].chunks(block1_size));
    if block2_size > 0 {
        data_blocks.extend(data[total_block1_size..].chunks(block2_size));
    }
    data_blocks
}

/// Takes one codeword from each block per round until every block is exhausted.
pub fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
    let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
    let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
    let mut res = Vec::with_capacity(total_size);
    for i in 0..max_block_size {
        for b in blocks {
            if i < b.len() {
                res.push(b[i]);
            }
        }
    }
    res
}

/// Final bit sequence for the encoding region: interleaved data codewords, then
/// interleaved error correction codewords, then the version's remainder bits.
pub fn build_payload(data: &[u8], version: Version, ec_level: ECLevel) -> BitStream {
    let total_codewords = version.total_codewords(ec_level);
    let remainder_bits = version.remainder_bits();

    let (data_blocks, ecc_blocks) = compute_ecc(data, version, ec_level);

    let mut payload = BitStream::new((total_codewords << 3) + remainder_bits);
    payload.extend(&interleave(&data_blocks));
    payload.extend(&interleave(&ecc_blocks));
    payload.push_zeros(remainder_bits);

    debug_assert_eq!(payload.len(), payload.capacity(), "Payload must fill the encoding region");
    payload
}
