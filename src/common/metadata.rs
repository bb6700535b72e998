use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

use super::error::{QRError, QRResult};
use super::mask::MaskPattern;

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct Version(u8);

impl Version {
    pub const MIN: Version = Version(1);
    pub const MAX: Version = Version(40);

    pub fn new(version: u8) -> QRResult<Self> {
        match version {
            1..=40 => Ok(Self(version)),
            _ => Err(QRError::InvalidVersion(version)),
        }
    }

    pub fn all() -> impl Iterator<Item = Version> {
        (1..=40).map(Version)
    }

    pub const fn width(self) -> usize {
        self.0 as usize * 4 + 17
    }

    fn index(self) -> usize {
        self.0 as usize - 1
    }

    // Maximum payload bytes in byte mode
    pub fn capacity(self, ec_level: ECLevel) -> usize {
        CAPACITIES[self.index()][ec_level as usize]
    }

    pub fn ecc_per_block(self, ec_level: ECLevel) -> usize {
        BLOCK_INFOS[self.index()][ec_level as usize].0
    }

    // (Group 1 block size, group 1 block count, group 2 block size, group 2 block count)
    pub fn data_codewords_per_block(self, ec_level: ECLevel) -> (usize, usize, usize, usize) {
        let (_, count1, size1, count2, size2) = BLOCK_INFOS[self.index()][ec_level as usize];
        (size1, count1, size2, count2)
    }

    pub fn data_codewords(self, ec_level: ECLevel) -> usize {
        let (size1, count1, size2, count2) = self.data_codewords_per_block(ec_level);
        size1 * count1 + size2 * count2
    }

    pub fn total_codewords(self, ec_level: ECLevel) -> usize {
        let (_, count1, _, count2) = self.data_codewords_per_block(ec_level);
        self.data_codewords(ec_level) + (count1 + count2) * self.ecc_per_block(ec_level)
    }

    pub fn remainder_bits(self) -> usize {
        REMAINDER_BITS[self.index()]
    }

    pub fn alignment_pattern(self) -> &'static [usize] {
        ALIGNMENT_PATTERN_POSITIONS[self.index()]
    }

    pub fn char_count_bit_len(self) -> usize {
        if self.0 <= 9 {
            8
        } else {
            16
        }
    }

    /// 18-bit version information, only carried by version 7 and above.
    pub fn info(self) -> Option<u32> {
        let i = (self.0 as usize).checked_sub(7)?;
        VERSION_INFOS.get(i).copied()
    }
}

impl Deref for Version {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}


// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash, Default)]
pub enum ECLevel {
    L = 0,
    #[default]
    M = 1,
    Q = 2,
    H = 3,
}

impl Display for ECLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        };
        f.write_str(s)
    }
}

impl FromStr for ECLevel {
    type Err = QRError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "Q" => Ok(Self::Q),
            "H" => Ok(Self::H),
            _ => Err(QRError::InvalidECLevel(s.to_string())),
        }
    }
}

#[cfg(test)]
mod ec_level_tests {
    use test_case::test_case;

    use super::ECLevel;
    use crate::common::error::QRError;

    #[test_case("L", ECLevel::L)]
    #[test_case("m", ECLevel::M)]
    #[test_case(" q ", ECLevel::Q)]
    #[test_case("H", ECLevel::H)]
    fn test_parse(s: &str, exp: ECLevel) {
        assert_eq!(s.parse::<ECLevel>(), Ok(exp));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!("X".parse::<ECLevel>(), Err(QRError::InvalidECLevel("X".to_string())));
    }

    #[test]
    fn test_display_round_trip() {
        for ecl in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
            assert_eq!(ecl.to_string().parse::<ECLevel>(), Ok(ecl));
        }
    }

    #[test]
    fn test_default_is_medium() {
        assert_eq!(ECLevel::default(), ECLevel::M);
    }
}

// Format information
//------------------------------------------------------------------------------

pub fn format_info_qr(ec_level: ECLevel, mask_pattern: MaskPattern) -> u32 {
    let format_data = ((ec_level as usize) ^ 1) << 3 | (*mask_pattern as usize);
    FORMAT_INFOS_QR[format_data]
}


// Global constants
//------------------------------------------------------------------------------

pub static FORMAT_INFO_BIT_LEN: usize = 15;

pub static VERSION_INFO_BIT_LEN: usize = 18;

#[rustfmt::skip]
static CAPACITIES: [[usize; 4]; 40] = [
    [  17,   14,   11,    7], [  32,   26,   20,   14], [  53,   42,   32,   24], [  78,   62,   46,   34],
    [ 106,   84,   60,   44], [ 134,  106,   74,   58], [ 154,  122,   86,   64], [ 192,  152,  108,   84],
    [ 230,  180,  130,   98], [ 271,  213,  151,  119], [ 321,  251,  177,  137], [ 367,  287,  203,  155],
    [ 425,  331,  241,  177], [ 458,  362,  258,  194], [ 520,  412,  292,  220], [ 586,  450,  322,  250],
    [ 644,  504,  364,  280], [ 718,  560,  394,  310], [ 792,  624,  442,  338], [ 858,  666,  482,  382],
    [ 929,  711,  509,  403], [1003,  779,  565,  439], [1091,  857,  611,  461], [1171,  911,  661,  511],
    [1273,  997,  715,  535], [1367, 1059,  751,  593], [1465, 1125,  805,  625], [1528, 1190,  868,  658],
    [1628, 1264,  908,  698], [1732, 1370,  982,  742], [1840, 1452, 1030,  790], [1952, 1538, 1112,  842],
    [2068, 1628, 1168,  898], [2188, 1722, 1228,  958], [2303, 1809, 1283,  983], [2431, 1911, 1351, 1051],
    [2563, 1989, 1423, 1093], [2699, 2099, 1499, 1139], [2809, 2213, 1579, 1219], [2953, 2331, 1663, 1273],
];

// (ecc per block, group 1 blocks, group 1 block size, group 2 blocks, group 2 block size)
#[rustfmt::skip]
static BLOCK_INFOS: [[(usize, usize, usize, usize, usize); 4]; 40] = [
    [(  7,   1,  19,   0,   0), ( 10,   1,  16,   0,   0), ( 13,   1,  13,   0,   0), ( 17,   1,   9,   0,   0)], // 1
    [( 10,   1,  34,   0,   0), ( 16,   1,  28,   0,   0), ( 22,   1,  22,   0,   0), ( 28,   1,  16,   0,   0)], // 2
    [( 15,   1,  55,   0,   0), ( 26,   1,  44,   0,   0), ( 18,   2,  17,   0,   0), ( 22,   2,  13,   0,   0)], // 3
    [( 20,   1,  80,   0,   0), ( 18,   2,  32,   0,   0), ( 26,   2,  24,   0,   0), ( 16,   4,   9,   0,   0)], // 4
    [( 26,   1, 108,   0,   0), ( 24,   2,  43,   0,   0), ( 18,   2,  15,   2,  16), ( 22,   2,  11,   2,  12)], // 5
    [( 18,   2,  68,   0,   0), ( 16,   4,  27,   0,   0), ( 24,   4,  19,   0,   0), ( 28,   4,  15,   0,   0)], // 6
    [( 20,   2,  78,   0,   0), ( 18,   4,  31,   0,   0), ( 18,   2,  14,   4,  15), ( 26,   4,  13,   1,  14)], // 7
    [( 24,   2,  97,   0,   0), ( 22,   2,  38,   2,  39), ( 22,   4,  18,   2,  19), ( 26,   4,  14,   2,  15)], // 8
    [( 30,   2, 116,   0,   0), ( 22,   3,  36,   2,  37), ( 20,   4,  16,   4,  17), ( 24,   4,  12,   4,  13)], // 9
    [( 18,   2,  68,   2,  69), ( 26,   4,  43,   1,  44), ( 24,   6,  19,   2,  20), ( 28,   6,  15,   2,  16)], // 10
    [( 20,   4,  81,   0,   0), ( 30,   1,  50,   4,  51), ( 28,   4,  22,   4,  23), ( 24,   3,  12,   8,  13)], // 11
    [( 24,   2,  92,   2,  93), ( 22,   6,  36,   2,  37), ( 26,   4,  20,   6,  21), ( 28,   7,  14,   4,  15)], // 12
    [( 26,   4, 107,   0,   0), ( 22,   8,  37,   1,  38), ( 24,   8,  20,   4,  21), ( 22,  12,  11,   4,  12)], // 13
    [( 30,   3, 115,   1, 116), ( 24,   4,  40,   5,  41), ( 20,  11,  16,   5,  17), ( 24,  11,  12,   5,  13)], // 14
    [( 22,   5,  87,   1,  88), ( 24,   5,  41,   5,  42), ( 30,   5,  24,   7,  25), ( 24,  11,  12,   7,  13)], // 15
    [( 24,   5,  98,   1,  99), ( 28,   7,  45,   3,  46), ( 24,  15,  19,   2,  20), ( 30,   3,  15,  13,  16)], // 16
    [( 28,   1, 107,   5, 108), ( 28,  10,  46,   1,  47), ( 28,   1,  22,  15,  23), ( 28,   2,  14,  17,  15)], // 17
    [( 30,   5, 120,   1, 121), ( 26,   9,  43,   4,  44), ( 28,  17,  22,   1,  23), ( 28,   2,  14,  19,  15)], // 18
    [( 28,   3, 113,   4, 114), ( 26,   3,  44,  11,  45), ( 26,  17,  21,   4,  22), ( 26,   9,  13,  16,  14)], // 19
    [( 28,   3, 107,   5, 108), ( 26,   3,  41,  13,  42), ( 30,  15,  24,   5,  25), ( 28,  15,  15,  10,  16)], // 20
    [( 28,   4, 116,   4, 117), ( 26,  17,  42,   0,   0), ( 28,  17,  22,   6,  23), ( 30,  19,  16,   6,  17)], // 21
    [( 28,   2, 111,   7, 112), ( 28,  17,  46,   0,   0), ( 30,   7,  24,  16,  25), ( 24,  34,  13,   0,   0)], // 22
    [( 30,   4, 121,   5, 122), ( 28,   4,  47,  14,  48), ( 30,  11,  24,  14,  25), ( 30,  16,  15,  14,  16)], // 23
    [( 30,   6, 117,   4, 118), ( 28,   6,  45,  14,  46), ( 30,  11,  24,  16,  25), ( 30,  30,  16,   2,  17)], // 24
    [( 26,   8, 106,   4, 107), ( 28,   8,  47,  13,  48), ( 30,   7,  24,  22,  25), ( 30,  22,  15,  13,  16)], // 25
    [( 28,  10, 114,   2, 115), ( 28,  19,  46,   4,  47), ( 28,  28,  22,   6,  23), ( 30,  33,  16,   4,  17)], // 26
    [( 30,   8, 122,   4, 123), ( 28,  22,  45,   3,  46), ( 30,   8,  23,  26,  24), ( 30,  12,  15,  28,  16)], // 27
    [( 30,   3, 117,  10, 118), ( 28,   3,  45,  23,  46), ( 30,   4,  24,  31,  25), ( 30,  11,  15,  31,  16)], // 28
    [( 30,   7, 116,   7, 117), ( 28,  21,  45,   7,  46), ( 30,   1,  23,  37,  24), ( 30,  19,  15,  26,  16)], // 29
    [( 30,   5, 115,  10, 116), ( 28,  19,  47,  10,  48), ( 30,  15,  24,  25,  25), ( 30,  23,  15,  25,  16)], // 30
    [( 30,  13, 115,   3, 116), ( 28,   2,  46,  29,  47), ( 30,  42,  24,   1,  25), ( 30,  23,  15,  28,  16)], // 31
    [( 30,  17, 115,   0,   0), ( 28,  10,  46,  23,  47), ( 30,  10,  24,  35,  25), ( 30,  19,  15,  35,  16)], // 32
    [( 30,  17, 115,   1, 116), ( 28,  14,  46,  21,  47), ( 30,  29,  24,  19,  25), ( 30,  11,  15,  46,  16)], // 33
    [( 30,  13, 115,   6, 116), ( 28,  14,  46,  23,  47), ( 30,  44,  24,   7,  25), ( 30,  59,  16,   1,  17)], // 34
    [( 30,  12, 121,   7, 122), ( 28,  12,  47,  26,  48), ( 30,  39,  24,  14,  25), ( 30,  22,  15,  41,  16)], // 35
    [( 30,   6, 121,  14, 122), ( 28,   6,  47,  34,  48), ( 30,  46,  24,  10,  25), ( 30,   2,  15,  64,  16)], // 36
    [( 30,  17, 122,   4, 123), ( 28,  29,  46,  14,  47), ( 30,  49,  24,  10,  25), ( 30,  24,  15,  46,  16)], // 37
    [( 30,   4, 122,  18, 123), ( 28,  13,  46,  32,  47), ( 30,  48,  24,  14,  25), ( 30,  42,  15,  32,  16)], // 38
    [( 30,  20, 117,   4, 118), ( 28,  40,  47,   7,  48), ( 30,  43,  24,  22,  25), ( 30,  10,  15,  67,  16)], // 39
    [( 30,  19, 118,   6, 119), ( 28,  18,  47,  31,  48), ( 30,  34,  24,  34,  25), ( 30,  20,  15,  61,  16)], // 40
];

#[rustfmt::skip]
static REMAINDER_BITS: [usize; 40] = [
    0, 7, 7, 7, 7, 7, 0, 0, 0, 0, 0, 0, 0, 3, 3, 3, 3, 3, 3, 3,
    4, 4, 4, 4, 4, 4, 4, 3, 3, 3, 3, 3, 3, 3, 0, 0, 0, 0, 0, 0,
];

#[rustfmt::skip]
static ALIGNMENT_PATTERN_POSITIONS: [&[usize]; 40] = [
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];

#[rustfmt::skip]
static FORMAT_INFOS_QR: [u32; 32] = [
    0x5412, 0x5125, 0x5e7c, 0x5b4b,
    0x45f9, 0x40ce, 0x4f97, 0x4aa0,
    0x77c4, 0x72f3, 0x7daa, 0x789d,
    0x662f, 0x6318, 0x6c41, 0x6976,
    0x1689, 0x13be, 0x1ce7, 0x19d0,
    0x0762, 0x0255, 0x0d0c, 0x083b,
    0x355f, 0x3068, 0x3f31, 0x3a06,
    0x24b4, 0x2183, 0x2eda, 0x2bed,
];

#[rustfmt::skip]
static VERSION_INFOS: [u32; 34] = [
    0x07c94, 0x085bc, 0x09a99, 0x0a4d3,
    0x0bbf6, 0x0c762, 0x0d847, 0x0e60d,
    0x0f928, 0x10b78, 0x1145d, 0x12a17,
    0x13532, 0x149a6, 0x15683, 0x168c9,
    0x177ec, 0x18ec4, 0x191e1, 0x1afab,
    0x1b08e, 0x1cc1a, 0x1d33f, 0x1ed75,
    0x1f250, 0x209d5, 0x216f0, 0x228ba,
    0x2379f, 0x24b0b, 0x2542e, 0x26a64,
    0x27541, 0x28c69,
];
