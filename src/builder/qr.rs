use image::{GrayImage, Luma};

use crate::common::{
    bit_utils::BitStream,
    error::{QRError, QRResult},
    iter::ZigZag,
    mask::MaskPattern,
    matrix::{Module, ModuleMatrix},
    metadata::{format_info_qr, ECLevel, Version, FORMAT_INFO_BIT_LEN, VERSION_INFO_BIT_LEN},
};

/// A QR symbol: version, error correction level, mask and the module matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QR {
    matrix: ModuleMatrix,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self { matrix: ModuleMatrix::new(w, w), ver, ecl, mask: None }
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.matrix.width()
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn matrix(&self) -> &ModuleMatrix {
        &self.matrix
    }

    pub fn metadata(&self) -> String {
        match self.mask {
            Some(m) => {
                format!("{{ Version: {}, Ec level: {}, Mask: {} }}", self.ver, self.ecl, *m)
            }
            None => format!("{{ Version: {}, Ec level: {}, Mask: None }}", self.ver, self.ecl),
        }
    }

    pub fn count_dark_modules(&self) -> usize {
        self.matrix.count(Module::Black)
    }

    // Resolves negative coordinates from the bottom or right edge
    fn set(&mut self, x: i16, y: i16, module: Module) {
        let w = self.width() as i16;
        debug_assert!(-w <= x && x < w, "x out of range: {x}");
        debug_assert!(-w <= y && y < w, "y out of range: {y}");

        let x = if x < 0 { x + w } else { x };
        let y = if y < 0 { y + w } else { y };
        self.matrix.set(x as usize, y as usize, module);
    }
}


// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    // The pattern carries its separator, so it is anchored one module outside the symbol
    fn draw_finder_patterns(&mut self) {
        let finder = concentric_pattern(FINDER_PATTERN_SIZE, &[2, 4]);
        let far = self.width() as i32 - 8;
        self.matrix.apply_pattern(-1, -1, &finder);
        self.matrix.apply_pattern(far, -1, &finder);
        self.matrix.apply_pattern(-1, far, &finder);
    }
}

// Square of rings around the center module. Rings at a listed distance are white.
fn concentric_pattern(size: usize, white_rings: &[usize]) -> ModuleMatrix {
    let c = size / 2;
    ModuleMatrix::from_fn(size, size, |x, y| {
        let ring = x.abs_diff(c).max(y.abs_diff(c));
        Module::from(!white_rings.contains(&ring))
    })
}

#[cfg(test)]
mod finder_pattern_tests {
    use super::QR;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_finder_pattern_qr() {
        let mut qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        qr.draw_finder_patterns();
        assert_eq!(
            qr.matrix().to_string(),
            "\
             #######.?????.#######\n\
             #.....#.?????.#.....#\n\
             #.###.#.?????.#.###.#\n\
             #.###.#.?????.#.###.#\n\
             #.###.#.?????.#.###.#\n\
             #.....#.?????.#.....#\n\
             #######.?????.#######\n\
             ........?????........\n\
             ?????????????????????\n\
             ?????????????????????\n\
             ?????????????????????\n\
             ?????????????????????\n\
             ?????????????????????\n\
             ........?????????????\n\
             #######.?????????????\n\
             #.....#.?????????????\n\
             #.###.#.?????????????\n\
             #.###.#.?????????????\n\
             #.###.#.?????????????\n\
             #.....#.?????????????\n\
             #######.?????????????\n"
        );
    }
}

// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_patterns(&mut self) {
        let w = self.width();
        for i in 8..w - 8 {
            let module = Module::from(i & 1 == 0);
            self.matrix.set(i, VERT_TIMING_POS, module);
            self.matrix.set(VERT_TIMING_POS, i, module);
        }
    }
}


// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let alignment = concentric_pattern(ALIGNMENT_PATTERN_SIZE, &[1]);
        let edge = self.width() - 12;
        let poses = self.ver.alignment_pattern();
        for &cy in poses {
            for &cx in poses {
                let (x, y) = (cx - 2, cy - 2);
                // Overlaps one of the finder patterns
                if (x <= 7 && y <= 7) || (x <= 7 && y >= edge) || (y <= 7 && x >= edge) {
                    continue;
                }
                self.matrix.apply_pattern(x as i32, y as i32, &alignment);
            }
        }
    }
}

#[cfg(test)]
mod alignment_pattern_tests {
    use test_case::test_case;

    use super::QR;
    use crate::common::matrix::Module;
    use crate::common::metadata::{ECLevel, Version};

    #[test_case(1, 0)]
    #[test_case(2, 1)]
    #[test_case(6, 1)]
    #[test_case(7, 6)]
    #[test_case(14, 13)]
    #[test_case(40, 46)]
    fn test_alignment_pattern_count(version: u8, exp: usize) {
        let mut qr = QR::new(Version::new(version).unwrap(), ECLevel::L);
        qr.draw_alignment_patterns();
        // Each pattern has 17 black modules
        assert_eq!(qr.matrix().count(Module::Black), exp * 17);
    }

    #[test]
    fn test_alignment_pattern_7() {
        let mut qr = QR::new(Version::new(7).unwrap(), ECLevel::L);
        qr.draw_finder_patterns();
        qr.draw_alignment_patterns();
        let s = qr.matrix().to_string();
        let rows = s.lines().collect::<Vec<_>>();
        assert_eq!(&rows[20][..13], "????#####????");
        assert_eq!(&rows[22][..13], "????#.#.#????");
        assert_eq!(&rows[38][36..], "#.#.#????");
        assert_eq!(&rows[6][18..27], "??#.#.#??");
        assert_eq!(&rows[38][..8], "#######.");
    }
}

// Reserved areas
//------------------------------------------------------------------------------

impl QR {
    fn draw_dark_module(&mut self) {
        self.set(8, -8, Module::Black);
    }

    fn reserve_format_area(&mut self) {
        for &(x, y) in FORMAT_INFO_COORDS_QR_MAIN.iter().chain(FORMAT_INFO_COORDS_QR_SIDE.iter()) {
            self.set(x, y, Module::White);
        }
    }

    fn reserve_version_area(&mut self) {
        if *self.ver < 7 {
            return;
        }
        for (x, y) in self.version_info_coords() {
            self.matrix.set(x, y, Module::White);
            self.matrix.set(y, x, Module::White);
        }
    }

    // Bottom left block, most significant bit first; the top right block is its transpose
    fn version_info_coords(&self) -> impl Iterator<Item = (usize, usize)> {
        let w = self.width();
        (0..VERSION_INFO_BIT_LEN).map(move |i| (5 - i / 3, w - 9 - i % 3))
    }
}

// All function patterns
//------------------------------------------------------------------------------

impl QR {
    /// Draws everything but the payload: finder, alignment and timing patterns, the
    /// dark module, and white placeholders for format and version info.
    pub(crate) fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_alignment_patterns();
        self.draw_timing_patterns();
        self.draw_dark_module();
        self.reserve_format_area();
        self.reserve_version_area();
    }
}


// Encoding region
//------------------------------------------------------------------------------

impl QR {
    /// Places the payload over the unset modules in zig-zag order. Modules already
    /// set are skipped without consuming a bit.
    pub(crate) fn draw_payload(&mut self, mut payload: BitStream) {
        for (x, y) in ZigZag::new(self.ver) {
            if self.matrix[(x, y)].is_set() {
                continue;
            }
            match payload.next() {
                Some(bit) => self.matrix.set(x, y, Module::from(bit)),
                None => break,
            }
        }
        debug_assert!(payload.next().is_none(), "Payload exceeds the encoding region");
    }

    /// XORs a full size mask layer onto the symbol and records its pattern.
    pub(crate) fn apply_mask(&mut self, pattern: MaskPattern, layer: &ModuleMatrix) {
        debug_assert_eq!(layer.dimensions(), self.matrix.dimensions(), "Mask layer size mismatch");
        self.matrix.apply_mask(0, 0, layer);
        self.mask = Some(pattern);
    }

    /// Adopts a matrix that was already masked with `pattern`.
    pub(crate) fn commit_mask(&mut self, pattern: MaskPattern, masked: &ModuleMatrix) {
        debug_assert_eq!(masked.dimensions(), self.matrix.dimensions(), "Masked matrix mismatch");
        self.matrix.overwrite(masked);
        self.mask = Some(pattern);
    }
}


// Format & version info
//------------------------------------------------------------------------------

impl QR {
    /// Writes both copies of the format info for the symbol's level and `mask`.
    pub(crate) fn draw_format_info(&mut self, mask: MaskPattern) {
        let format_info = format_info_qr(self.ecl, mask);
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, &FORMAT_INFO_COORDS_QR_MAIN);
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, &FORMAT_INFO_COORDS_QR_SIDE);
    }

    pub(crate) fn draw_version_info(&mut self) {
        let Some(ver_info) = self.ver.info() else {
            return;
        };
        let coords = self.version_info_coords().collect::<Vec<_>>();
        let mut mask = 1 << (VERSION_INFO_BIT_LEN - 1);
        for (x, y) in coords {
            let module = Module::from(ver_info & mask != 0);
            self.matrix.set(x, y, module);
            self.matrix.set(y, x, module);
            mask >>= 1;
        }
    }

    fn draw_number(&mut self, number: u32, bit_len: usize, coords: &[(i16, i16)]) {
        let mut mask = 1 << (bit_len - 1);
        for &(x, y) in coords {
            self.set(x, y, Module::from(number & mask != 0));
            mask >>= 1;
        }
    }
}


// Render
//------------------------------------------------------------------------------

impl QR {
    /// Exact size 1-bit raster, one pixel per module.
    pub fn to_image(&self) -> QRResult<GrayImage> {
        self.matrix.to_image()
    }

    /// Raster with `module_sz` pixels per module and a white quiet zone.
    pub fn render(&self, module_sz: u32) -> QRResult<GrayImage> {
        self.ensure_complete()?;

        let qz_sz = QUIET_ZONE_SIZE as u32 * module_sz;
        let qr_sz = self.width() as u32 * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        Ok(GrayImage::from_fn(total_sz, total_sz, |j, i| {
            if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                return Luma([255]);
            }
            let x = ((j - qz_sz) / module_sz) as usize;
            let y = ((i - qz_sz) / module_sz) as usize;
            Luma([self.matrix[(x, y)].select(0, 255)])
        }))
    }

    /// Text rendering for terminals with a dark background: light modules and the
    /// quiet zone are full blocks.
    pub fn to_str(&self, module_sz: usize) -> QRResult<String> {
        self.ensure_complete()?;

        let qz_sz = QUIET_ZONE_SIZE * module_sz;
        let qr_sz = self.width() * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = String::with_capacity(total_sz * (total_sz + 1) * 3);
        for i in 0..total_sz {
            for j in 0..total_sz {
                if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                    canvas.push('█');
                    continue;
                }
                let x = (j - qz_sz) / module_sz;
                let y = (i - qz_sz) / module_sz;
                canvas.push(self.matrix[(x, y)].select(' ', '█'));
            }
            canvas.push('\n');
        }

        Ok(canvas)
    }

    fn ensure_complete(&self) -> QRResult<()> {
        match self.matrix.first_unset() {
            Some((x, y)) => Err(QRError::IncompleteSymbol { x, y }),
            None => Ok(()),
        }
    }
}


// Global constants
//------------------------------------------------------------------------------

static VERT_TIMING_POS: usize = 6;

static QUIET_ZONE_SIZE: usize = 4;

// Includes the white separator ring
static FINDER_PATTERN_SIZE: usize = 9;

static ALIGNMENT_PATTERN_SIZE: usize = 5;

// (x, y), most significant bit first
static FORMAT_INFO_COORDS_QR_MAIN: [(i16, i16); 15] = [
    (0, 8),
    (1, 8),
    (2, 8),
    (3, 8),
    (4, 8),
    (5, 8),
    (7, 8),
    (8, 8),
    (8, 7),
    (8, 5),
    (8, 4),
    (8, 3),
    (8, 2),
    (8, 1),
    (8, 0),
];

static FORMAT_INFO_COORDS_QR_SIDE: [(i16, i16); 15] = [
    (8, -1),
    (8, -2),
    (8, -3),
    (8, -4),
    (8, -5),
    (8, -6),
    (8, -7),
    (-8, 8),
    (-7, 8),
    (-6, 8),
    (-5, 8),
    (-4, 8),
    (-3, 8),
    (-2, 8),
    (-1, 8),
];
