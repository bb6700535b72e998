use super::metadata::Version;

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

/// Visits every module of a symbol in data placement order: two-module-wide
/// columns from the right edge, alternating upwards and downwards, right module
/// before left module, skipping the vertical timing column.
pub struct ZigZag {
    // Right column of the current column pair
    x: usize,
    y: usize,
    width: usize,
    upward: bool,
    left: bool,
    done: bool,
}

impl ZigZag {
    pub fn new(version: Version) -> Self {
        let w = version.width();
        Self { x: w - 1, y: w - 1, width: w, upward: true, left: false, done: false }
    }

    fn next_column_pair(&mut self) {
        if self.x < 2 {
            self.done = true;
            return;
        }
        self.x -= 2;
        if self.x == VERT_TIMING_COL {
            self.x -= 1;
        }
        self.upward = !self.upward;
    }
}

impl Iterator for ZigZag {
    type Item = (usize, usize);
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let res = if self.left { (self.x - 1, self.y) } else { (self.x, self.y) };

        if !self.left {
            self.left = true;
            return Some(res);
        }

        self.left = false;
        match (self.upward, self.y) {
            (true, 0) => self.next_column_pair(),
            (true, _) => self.y -= 1,
            (false, y) if y == self.width - 1 => self.next_column_pair(),
            (false, _) => self.y += 1,
        }
        Some(res)
    }
}


// Global constants
//------------------------------------------------------------------------------

static VERT_TIMING_COL: usize = 6;
