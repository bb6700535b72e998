use std::fmt::{Display, Formatter};
use std::ops::{Index, IndexMut, Not};

use image::{GrayImage, Luma};

use super::error::{QRError, QRResult};

// Module
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default, Hash)]
pub enum Module {
    Black,
    White,
    #[default]
    Unset,
}

impl Module {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'b' => Some(Self::Black),
            'w' => Some(Self::White),
            ' ' => Some(Self::Unset),
            _ => None,
        }
    }

    pub fn is_set(self) -> bool {
        self != Self::Unset
    }

    pub fn select<T>(self, black: T, white: T) -> T {
        match self {
            Self::Black => black,
            _ => white,
        }
    }
}

impl From<bool> for Module {
    fn from(bit: bool) -> Self {
        if bit {
            Self::Black
        } else {
            Self::White
        }
    }
}

impl Not for Module {
    type Output = Self;
    fn not(self) -> Self::Output {
        debug_assert!(self.is_set(), "Cannot flip unset module");
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
            Self::Unset => Self::Unset,
        }
    }
}

// Module matrix
//------------------------------------------------------------------------------

/// Row-major grid of [`Module`]s addressed by `(x, y)`, with `(0, 0)` at the top left.
///
/// Symbols are always square, but the same type also holds the small rectangular
/// patterns that get stamped or tiled onto a symbol.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ModuleMatrix {
    grid: Vec<Module>,
    w: usize,
    h: usize,
}

impl ModuleMatrix {
    pub fn new(w: usize, h: usize) -> Self {
        Self { grid: vec![Module::Unset; w * h], w, h }
    }

    /// Builds a `w` x `h` matrix with `f(x, y)` for every module.
    pub fn from_fn(w: usize, h: usize, f: impl Fn(usize, usize) -> Module) -> Self {
        let grid = (0..h).flat_map(|y| (0..w).map(move |x| (x, y))).map(|(x, y)| f(x, y)).collect();
        Self { grid, w, h }
    }

    /// Builds a matrix from rows of `b` (black), `w` (white) and ` ` (unset).
    pub fn from_str_list(rows: &[&str]) -> QRResult<Self> {
        let h = rows.len();
        let w = rows.first().map_or(0, |r| r.chars().count());
        if w == 0 {
            return Err(QRError::InvalidInput("Pattern must have at least one module"));
        }
        let mut grid = Vec::with_capacity(w * h);
        for row in rows {
            if row.chars().count() != w {
                return Err(QRError::InvalidInput("Pattern rows must have equal length"));
            }
            for c in row.chars() {
                let module =
                    Module::from_char(c).ok_or(QRError::InvalidInput("Unexpected module character"))?;
                grid.push(module);
            }
        }
        Ok(Self { grid, w, h })
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    pub fn set(&mut self, x: usize, y: usize, module: Module) {
        self[(x, y)] = module;
    }

    pub fn row(&self, y: usize) -> &[Module] {
        &self.grid[y * self.w..(y + 1) * self.w]
    }

    pub fn column(&self, x: usize) -> impl Iterator<Item = Module> + '_ {
        self.grid.iter().skip(x).step_by(self.w.max(1)).copied()
    }

    pub fn modules(&self) -> &[Module] {
        &self.grid
    }

    pub fn count(&self, module: Module) -> usize {
        self.grid.iter().filter(|&&m| m == module).count()
    }

    pub fn first_unset(&self) -> Option<(usize, usize)> {
        self.grid.iter().position(|m| !m.is_set()).map(|i| (i % self.w, i / self.w))
    }

    /// Replaces the contents and dimensions of `self` with those of `other`.
    pub fn overwrite(&mut self, other: &ModuleMatrix) {
        self.clone_from(other);
    }

    // Maps pattern coordinates anchored at (x, y) to in-bounds matrix coordinates
    fn overlay<'a>(
        &self,
        x: i32,
        y: i32,
        pattern: &'a ModuleMatrix,
    ) -> impl Iterator<Item = (usize, usize, Module)> + 'a {
        let (w, h) = (self.w as i32, self.h as i32);
        (0..pattern.h).flat_map(move |dy| {
            (0..pattern.w).filter_map(move |dx| {
                let m = pattern.grid[dy * pattern.w + dx];
                let (rx, ry) = (x + dx as i32, y + dy as i32);
                if m.is_set() && (0..w).contains(&rx) && (0..h).contains(&ry) {
                    Some((rx as usize, ry as usize, m))
                } else {
                    None
                }
            })
        })
    }

    /// Stamps the set modules of `pattern` with its top left corner at `(x, y)`.
    /// Parts falling outside the matrix are dropped.
    pub fn apply_pattern(&mut self, x: i32, y: i32, pattern: &ModuleMatrix) {
        let cells = self.overlay(x, y, pattern).collect::<Vec<_>>();
        for (rx, ry, m) in cells {
            self[(rx, ry)] = m;
        }
    }

    /// XORs `mask` onto the matrix at `(x, y)`. A module flips only when it is set
    /// and the mask module over it is black.
    pub fn apply_mask(&mut self, x: i32, y: i32, mask: &ModuleMatrix) {
        let cells = self.overlay(x, y, mask).collect::<Vec<_>>();
        for (rx, ry, m) in cells {
            let cur = self[(rx, ry)];
            if m == Module::Black && cur.is_set() {
                self[(rx, ry)] = !cur;
            }
        }
    }

    /// Tiles `mask` from the top left corner across the whole matrix. An empty mask
    /// leaves the matrix untouched.
    pub fn apply_mask_repeated(&mut self, mask: &ModuleMatrix) {
        if mask.w == 0 || mask.h == 0 {
            return;
        }
        for y in (0..self.h).step_by(mask.h) {
            for x in (0..self.w).step_by(mask.w) {
                self.apply_mask(x as i32, y as i32, mask);
            }
        }
    }

    /// Inverse of the set region: unset modules become white, set modules become unset.
    pub fn extract_unset(&self) -> ModuleMatrix {
        let grid = self
            .grid
            .iter()
            .map(|m| if m.is_set() { Module::Unset } else { Module::White })
            .collect();
        Self { grid, w: self.w, h: self.h }
    }

    /// Rasterises to a 1-bit image of the exact matrix size: black modules are 0 and
    /// white modules are 255.
    pub fn to_image(&self) -> QRResult<GrayImage> {
        if let Some((x, y)) = self.first_unset() {
            return Err(QRError::IncompleteSymbol { x, y });
        }
        Ok(GrayImage::from_fn(self.w as u32, self.h as u32, |x, y| {
            Luma([self[(x as usize, y as usize)].select(0, 255)])
        }))
    }
}

impl Index<(usize, usize)> for ModuleMatrix {
    type Output = Module;
    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        assert!(x < self.w && y < self.h, "Out of bounds: ({x}, {y}) in {}x{}", self.w, self.h);
        &self.grid[y * self.w + x]
    }
}

impl IndexMut<(usize, usize)> for ModuleMatrix {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        assert!(x < self.w && y < self.h, "Out of bounds: ({x}, {y}) in {}x{}", self.w, self.h);
        &mut self.grid[y * self.w + x]
    }
}

impl Display for ModuleMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.h {
            let row = self
                .row(y)
                .iter()
                .map(|m| match m {
                    Module::Black => '#',
                    Module::White => '.',
                    Module::Unset => '?',
                })
                .collect::<String>();
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
