use std::fmt::Display;
use std::mem;

use num_traits::PrimInt;

// Bit stream
//------------------------------------------------------------------------------

/// MSB-first bit buffer with a fixed bit capacity and a read cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitStream {
    data: Vec<u8>,
    // Bit length
    len: usize,
    // Max bit capacity
    capacity: usize,
    // Pointer to take bits
    cursor: usize,
}

impl BitStream {
    pub fn new(capacity: usize) -> Self {
        Self { data: vec![0; (capacity + 7) >> 3], len: 0, capacity, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..(self.len + 7) >> 3]
    }
}

// Push bits for bit stream
//------------------------------------------------------------------------------

impl BitStream {
    pub fn push_bits<T>(&mut self, bits: T, size: usize)
    where
        T: PrimInt + Display,
    {
        let max_bits = mem::size_of::<T>() * 8;
        debug_assert!(
            size >= max_bits - bits.leading_zeros() as usize,
            "Bit count shouldn't exceed bit length: Length {size}, Bits {bits}"
        );
        debug_assert!(
            self.len + size <= self.capacity,
            "Insufficient capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + size
        );

        match size {
            0 => (),
            1..=8 => {
                let bits = bits.to_u8().unwrap_or(0);
                let offset = self.len & 7;
                let pos = self.len >> 3;

                if offset + size <= 8 {
                    self.data[pos] |= bits << (8 - size - offset);
                } else {
                    self.data[pos] |= bits >> (size + offset - 8);
                    self.data[pos + 1] = bits << (16 - size - offset);
                }

                self.len += size;
            }
            9..=16 => {
                let bits = bits.to_u16().unwrap_or(0);
                self.push_bits((bits >> 8) as u8, size - 8);
                self.push_bits((bits & 0xFF) as u8, 8);
            }
            _ => panic!("Bits from only u8 and u16 can be pushed"),
        }
    }

    /// Pushes `n` zero bits.
    pub fn push_zeros(&mut self, n: usize) {
        debug_assert!(
            self.len + n <= self.capacity,
            "Insufficient capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + n
        );
        self.len += n;
    }

    pub fn extend(&mut self, arr: &[u8]) {
        debug_assert!(
            (self.len & 7) == 0,
            "Bit offset must be zero to extend from another array: Bit offset {}",
            self.len & 7
        );
        let pos = self.len >> 3;
        let arr_bits = arr.len() << 3;
        debug_assert!(
            self.len + arr_bits <= self.capacity,
            "Extension shouldn't overflow capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + arr_bits
        );
        self.data[pos..pos + arr.len()].copy_from_slice(arr);
        self.len += arr_bits;
    }
}

#[cfg(test)]
mod bit_stream_push_tests {

    use super::BitStream;

    #[test]
    fn test_len() {
        let bit_capacity = 152;
        let mut bs = BitStream::new(bit_capacity);
        assert_eq!(bs.len(), 0);
        bs.push_bits(0, 0);
        assert_eq!(bs.len(), 0);
        bs.push_bits(0b1000, 4);
        assert_eq!(bs.len(), 4);
        bs.push_bits(0b1000, 8);
        assert_eq!(bs.len(), 12);
        bs.push_bits(0b1000, 4);
        assert_eq!(bs.len(), 16);
        bs.push_bits(0b1111111, 7);
        assert_eq!(bs.len(), 23);
        bs.push_bits(0b111111111111u16, 12);
        assert_eq!(bs.len(), 35);
        bs.push_bits(0b111111111111u16, 16);
        assert_eq!(bs.len(), 51);
        bs.push_zeros(5);
        assert_eq!(bs.len(), 56);
    }

    #[test]
    #[should_panic]
    fn test_invalid_len() {
        let bit_capacity = 152;
        let mut bs = BitStream::new(bit_capacity);
        bs.push_bits(256u16, 17);
    }

    #[test]
    fn test_push_bits() {
        let exp_vec = [210, 52, 141, 35, 72, 210, 183, 42, 7, 219, 91, 14, 253, 68, 120, 193];
        let src = u128::from_be_bytes(exp_vec);
        let mut out = BitStream::new(152);
        let mut pos = 0;
        for n in [0, 1, 2, 3, 4, 5, 6, 7, 8, 4, 8, 9, 11, 15, 16, 5, 16] {
            let bits = if n == 0 { 0 } else { (src << pos >> (128 - n)) as u16 };
            out.push_bits(bits, n);
            pos += n;
            let out_off = out.len() & 7;
            let len = out.len() >> 3;
            assert_eq!(out.data[..len], exp_vec[..len], "n {n}");
            if out_off > 0 {
                assert_eq!(out.data[len] >> (8 - out_off), exp_vec[len] >> (8 - out_off));
            }
        }
    }

    #[test]
    fn test_extend() {
        let mut bs = BitStream::new(24);
        bs.push_bits(0xABu8, 8);
        bs.extend(&[0xCD, 0xEF]);
        assert_eq!(bs.data(), [0xAB, 0xCD, 0xEF]);
    }

    #[test]
    fn test_push_zeros_keeps_earlier_bits() {
        let mut bs = BitStream::new(16);
        bs.push_bits(0b101u8, 3);
        bs.push_zeros(7);
        bs.push_bits(0b11u8, 2);
        assert_eq!(bs.len(), 12);
        assert_eq!(bs.data(), [0b1010_0000, 0b0011_0000]);
    }

    #[test]
    #[should_panic]
    fn test_push_bits_capacity_overflow() {
        let bit_capacity = 152;
        let capacity = (bit_capacity + 7) >> 3;
        let mut bs = BitStream::new(bit_capacity);
        for _ in 0..capacity {
            bs.push_bits(1u8, 8);
        }
        bs.push_bits(1u8, 1)
    }
}

// Read bits from bit stream
//------------------------------------------------------------------------------

impl BitStream {
    pub fn take(&mut self) -> Option<bool> {
        if self.cursor == self.len {
            return None;
        }

        let offset = self.cursor & 7;
        let pos = self.cursor >> 3;
        let bit = (self.data[pos] << offset) >> 7;

        self.cursor += 1;

        Some(bit != 0)
    }
}


// Iterator for bit stream
//------------------------------------------------------------------------------

impl Iterator for BitStream {
    type Item = bool;
    fn next(&mut self) -> Option<Self::Item> {
        self.take()
    }
}
