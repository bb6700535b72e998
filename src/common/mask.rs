use std::fmt::{Display, Formatter};
use std::ops::Deref;

use log::trace;
use rayon::prelude::*;

use super::error::{QRError, QRResult};
use super::matrix::{Module, ModuleMatrix};

// Mask pattern
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> QRResult<Self> {
        if pattern >= 8 {
            return Err(QRError::InvalidMaskPattern(pattern));
        }
        Ok(Self(pattern))
    }

    /// All 8 patterns in canonical order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..8).map(Self)
    }

    /// Smallest tile which, repeated from the top left corner, reproduces the mask.
    /// Black modules are the ones to flip.
    pub fn generator(self) -> ModuleMatrix {
        let (w, h) = MASK_GENERATOR_SIZES[self.0 as usize];
        ModuleMatrix::from_fn(w, h, |x, y| Module::from(self.flips(x, y)))
    }

    fn flips(self, x: usize, y: usize) -> bool {
        match self.0 {
            0 => (x + y) & 1 == 0,
            1 => y & 1 == 0,
            2 => x % 3 == 0,
            3 => (x + y) % 3 == 0,
            4 => ((y >> 1) + (x / 3)) & 1 == 0,
            5 => (x * y) & 1 == 0 && (x * y) % 3 == 0,
            6 => (((x * y) & 1) + ((x * y) % 3)) & 1 == 0,
            _ => (((x + y) & 1) + ((x * y) % 3)) & 1 == 0,
        }
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for MaskPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Mask layers
//------------------------------------------------------------------------------

/// Builds the full size mask for `pattern` over the unset region of `base`. Modules
/// set in `base` stay unset in the layer so masking never touches them.
pub fn mask_layer(base: &ModuleMatrix, pattern: MaskPattern) -> ModuleMatrix {
    let mut layer = base.extract_unset();
    layer.apply_mask_repeated(&pattern.generator());
    layer
}

pub fn mask_layers(base: &ModuleMatrix) -> [(MaskPattern, ModuleMatrix); 8] {
    std::array::from_fn(|i| {
        let pattern = MaskPattern(i as u8);
        (pattern, mask_layer(base, pattern))
    })
}

/// Scores every candidate against `matrix` and returns the winning pattern, the
/// masked matrix and its penalty. Ties go to the lowest pattern index regardless of
/// the order of `candidates`.
pub fn select_mask(
    matrix: &ModuleMatrix,
    candidates: &[(MaskPattern, ModuleMatrix); 8],
) -> (MaskPattern, ModuleMatrix, u32) {
    let scores = candidates
        .as_slice()
        .par_iter()
        .map(|(pattern, layer)| {
            let mut masked = matrix.clone();
            masked.apply_mask(0, 0, layer);
            let score = masked.penalty_score();
            trace!("Mask {} scored {score}", **pattern);
            score
        })
        .collect::<Vec<_>>();

    let best = (1..candidates.len()).fold(0, |best, i| {
        if (scores[i], candidates[i].0) < (scores[best], candidates[best].0) {
            i
        } else {
            best
        }
    });

    let (pattern, layer) = &candidates[best];
    let mut masked = matrix.clone();
    masked.apply_mask(0, 0, layer);
    (*pattern, masked, scores[best])
}

#[cfg(test)]
mod mask_tests {
    use rand::seq::SliceRandom;
    use rand::Rng;

    use super::{mask_layer, mask_layers, select_mask, MaskPattern};
    use crate::common::error::QRError;
    use crate::common::matrix::{Module, ModuleMatrix};

    mod mask_functions {
        pub fn checkerboard(x: usize, y: usize) -> bool {
            (x + y) & 1 == 0
        }

        pub fn horizontal_lines(_: usize, y: usize) -> bool {
            y & 1 == 0
        }

        pub fn vertical_lines(x: usize, _: usize) -> bool {
            x % 3 == 0
        }

        pub fn diagonal_lines(x: usize, y: usize) -> bool {
            (x + y) % 3 == 0
        }

        pub fn large_checkerboard(x: usize, y: usize) -> bool {
            ((y >> 1) + (x / 3)) & 1 == 0
        }

        pub fn fields(x: usize, y: usize) -> bool {
            ((x * y) & 1) + ((x * y) % 3) == 0
        }

        pub fn diamonds(x: usize, y: usize) -> bool {
            (((x * y) & 1) + ((x * y) % 3)) & 1 == 0
        }

        pub fn meadow(x: usize, y: usize) -> bool {
            (((x + y) & 1) + ((x * y) % 3)) & 1 == 0
        }
    }

    fn random_matrix(w: usize) -> ModuleMatrix {
        let mut rng = rand::rng();
        let mut m = ModuleMatrix::new(w, w);
        for y in 0..w {
            for x in 0..w {
                m.set(x, y, Module::from(rng.random::<bool>()));
            }
        }
        m
    }

    #[test]
    fn test_new_invalid() {
        assert_eq!(*MaskPattern::new(7).unwrap(), 7);
        assert_eq!(MaskPattern::new(8), Err(QRError::InvalidMaskPattern(8)));
    }

    #[test]
    fn test_generators_match_mask_functions() {
        let funcs: [fn(usize, usize) -> bool; 8] = [
            mask_functions::checkerboard,
            mask_functions::horizontal_lines,
            mask_functions::vertical_lines,
            mask_functions::diagonal_lines,
            mask_functions::large_checkerboard,
            mask_functions::fields,
            mask_functions::diamonds,
            mask_functions::meadow,
        ];
        let base = ModuleMatrix::new(45, 45);
        for (pattern, func) in MaskPattern::all().zip(funcs) {
            let layer = mask_layer(&base, pattern);
            for y in 0..45 {
                for x in 0..45 {
                    let exp = Module::from(func(x, y));
                    assert_eq!(layer[(x, y)], exp, "Mask {} at ({x}, {y})", *pattern);
                }
            }
        }
    }

    #[test]
    fn test_mask_layer_skips_set_modules() {
        let base = ModuleMatrix::from_str_list(&["b  ", "   ", "  w"]).unwrap();
        let layer = mask_layer(&base, MaskPattern::new(0).unwrap());
        assert_eq!(layer.to_string(), "?.#\n.#.\n#.?\n");
    }

    #[test]
    fn test_mask_layers_order() {
        let layers = mask_layers(&ModuleMatrix::new(6, 6));
        for (i, (pattern, _)) in layers.iter().enumerate() {
            assert_eq!(**pattern as usize, i);
        }
    }

    #[test]
    fn test_selection_is_order_independent() {
        let mut rng = rand::rng();
        for _ in 0..5 {
            let matrix = random_matrix(25);
            let mut candidates = mask_layers(&ModuleMatrix::new(25, 25));
            let (exp_pattern, exp_matrix, exp_score) = select_mask(&matrix, &candidates);

            candidates.shuffle(&mut rng);
            let (pattern, masked, score) = select_mask(&matrix, &candidates);
            assert_eq!(pattern, exp_pattern);
            assert_eq!(masked, exp_matrix);
            assert_eq!(score, exp_score);
        }
    }

    #[test]
    fn test_selection_is_minimal() {
        let matrix = random_matrix(21);
        let candidates = mask_layers(&ModuleMatrix::new(21, 21));
        let (pattern, masked, score) = select_mask(&matrix, &candidates);
        assert_eq!(masked.penalty_score(), score);
        for (p, layer) in candidates.iter() {
            let mut m = matrix.clone();
            m.apply_mask(0, 0, layer);
            let s = m.penalty_score();
            assert!(s > score || (s == score && *p >= pattern), "Mask {} beats {}", **p, *pattern);
        }
    }

    #[test]
    fn test_tie_goes_to_lowest_index() {
        let matrix = random_matrix(9);
        // Empty layers flip nothing, so every candidate scores the same
        let candidates = std::array::from_fn(|i| {
            (MaskPattern::new(7 - i as u8).unwrap(), ModuleMatrix::new(9, 9))
        });
        let (pattern, masked, score) = select_mask(&matrix, &candidates);
        assert_eq!(*pattern, 0);
        assert_eq!(masked, matrix);
        assert_eq!(score, matrix.penalty_score());
    }
}

// Penalty scoring
//------------------------------------------------------------------------------

impl ModuleMatrix {
    /// Sum of the four penalty rules. Unset modules never match anything, so only
    /// drawn modules contribute.
    pub fn penalty_score(&self) -> u32 {
        let adj_pen = self.adjacent_penalty();
        let blk_pen = self.block_penalty();
        let fp_pen = self.finder_penalty();
        let bal_pen = self.balance_penalty();
        adj_pen + blk_pen + fp_pen + bal_pen
    }

    fn lines(&self) -> impl Iterator<Item = Vec<Module>> + '_ {
        let rows = (0..self.height()).map(|y| self.row(y).to_vec());
        let cols = (0..self.width()).map(|x| self.column(x).collect());
        rows.chain(cols)
    }

    fn adjacent_penalty(&self) -> u32 {
        self.lines().map(|line| run_penalty(&line)).sum()
    }

    fn block_penalty(&self) -> u32 {
        let (w, h) = self.dimensions();
        let mut pen = 0;
        for y in 0..h.saturating_sub(1) {
            for x in 0..w.saturating_sub(1) {
                let clr = self[(x, y)];
                if clr.is_set()
                    && clr == self[(x + 1, y)]
                    && clr == self[(x, y + 1)]
                    && clr == self[(x + 1, y + 1)]
                {
                    pen += 3;
                }
            }
        }
        pen
    }

    fn finder_penalty(&self) -> u32 {
        let mut pen = 0;
        for line in self.lines() {
            for window in line.windows(FINDER_LIKE.len()) {
                if window == FINDER_LIKE {
                    pen += 40;
                }
                if window.iter().eq(FINDER_LIKE.iter().rev()) {
                    pen += 40;
                }
            }
        }
        pen
    }

    fn balance_penalty(&self) -> u32 {
        let (w, h) = self.dimensions();
        let total = w * h;
        if total == 0 {
            return 0;
        }
        let pct = (self.count(Module::Black) * 100 / total) as i32;
        let lo = pct - pct % 5;
        let hi = lo + 5;
        let dev = (lo - 50).abs().min((hi - 50).abs());
        (dev / 5 * 10) as u32
    }
}

fn run_penalty(line: &[Module]) -> u32 {
    let mut pen = 0;
    let mut last = Module::Unset;
    let mut len = 0;
    for &m in line {
        if m.is_set() && m == last {
            len += 1;
        } else {
            last = m;
            len = 1;
        }
        if !m.is_set() {
            continue;
        }
        match len {
            5 => pen += 3,
            6.. => pen += 1,
            _ => (),
        }
    }
    pen
}

#[cfg(test)]
mod penalty_tests {
    use test_case::test_case;

    use super::{run_penalty, FINDER_LIKE};
    use crate::common::matrix::{Module, ModuleMatrix};

    fn line(s: &str) -> Vec<Module> {
        ModuleMatrix::from_str_list(&[s]).unwrap().row(0).to_vec()
    }

    #[test_case("bbbb", 0)]
    #[test_case("bbbbb", 3)]
    #[test_case("wwwwww", 4)]
    #[test_case("bbbbbbbw", 5)]
    #[test_case("bbbbbwwwww", 6)]
    #[test_case("bbb bbb", 0)]
    #[test_case("     ", 0)]
    fn test_run_penalty(inp: &str, exp: u32) {
        assert_eq!(run_penalty(&line(inp)), exp);
    }

    #[test]
    fn test_adjacent_penalty_rows_and_columns() {
        let m = ModuleMatrix::from_str_list(&["bbbbbbb"]).unwrap();
        assert_eq!(m.adjacent_penalty(), 5);
        let m = ModuleMatrix::from_str_list(&["b", "b", "b", "b", "b", "w"]).unwrap();
        assert_eq!(m.adjacent_penalty(), 3);
    }

    #[test_case(&["bb", "bb"], 3)]
    #[test_case(&["bbb", "bbb", "bbb"], 12)]
    #[test_case(&["bw", "wb"], 0)]
    #[test_case(&["ww ", "www"], 3)]
    #[test_case(&["  ", "  "], 0)]
    fn test_block_penalty(inp: &[&str], exp: u32) {
        assert_eq!(ModuleMatrix::from_str_list(inp).unwrap().block_penalty(), exp);
    }

    fn single_row(row: &str) -> ModuleMatrix {
        let blank = " ".repeat(11);
        let mut rows = vec![blank.as_str(); 11];
        rows[5] = row;
        ModuleMatrix::from_str_list(&rows).unwrap()
    }

    #[test]
    fn test_finder_penalty() {
        let m = single_row("bwbbbwbwwww");
        assert_eq!(m.finder_penalty(), 40);
    }

    #[test]
    fn test_finder_penalty_mirrored() {
        let m = single_row("wwwwbwbbbwb");
        assert_eq!(m.finder_penalty(), 40);
    }

    #[test]
    fn test_finder_penalty_vertical() {
        let rows = FINDER_LIKE
            .iter()
            .map(|m| if *m == Module::Black { "   b   " } else { "   w   " })
            .collect::<Vec<_>>();
        let m = ModuleMatrix::from_str_list(&rows).unwrap();
        assert_eq!(m.finder_penalty(), 40);
    }

    #[test]
    fn test_finder_penalty_needs_full_sequence() {
        let m = single_row("bwbbbwbwww ");
        assert_eq!(m.finder_penalty(), 0);
    }

    #[test]
    fn test_penalty_score_of_single_sequence() {
        // Runs of 3 and 4 and no blocks, 5 of 121 dark modules cost 90 for balance
        let m = single_row("bwbbbwbwwww");
        assert_eq!(m.penalty_score(), 130);
    }

    #[test_case(50, 0)]
    #[test_case(43, 10)]
    #[test_case(57, 10)]
    #[test_case(100, 100)]
    #[test_case(0, 90)]
    #[test_case(38, 20)]
    fn test_balance_penalty(dark: usize, exp: u32) {
        let mut m = ModuleMatrix::from_str_list(&["wwwwwwwwww"; 10]).unwrap();
        for i in 0..dark {
            m.set(i % 10, i / 10, Module::Black);
        }
        assert_eq!(m.balance_penalty(), exp);
    }
}

// Global constants
//------------------------------------------------------------------------------

// (width, height) of each mask's repeating tile
static MASK_GENERATOR_SIZES: [(usize, usize); 8] =
    [(2, 2), (1, 2), (3, 1), (3, 3), (6, 4), (6, 6), (6, 6), (6, 6)];

static FINDER_LIKE: [Module; 11] = [
    Module::Black,
    Module::White,
    Module::Black,
    Module::Black,
    Module::Black,
    Module::White,
    Module::Black,
    Module::White,
    Module::White,
    Module::White,
    Module::White,
];
