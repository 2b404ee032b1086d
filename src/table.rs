use std::ops::Index;

/// A constant 2d lookup table.
///
/// For indexing operations on this table, `(x, y)` selects column `x` of row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table<T, const WIDTH: usize, const HEIGHT: usize>([[T; WIDTH]; HEIGHT]);

impl<T, const WIDTH: usize, const HEIGHT: usize> Table<T, WIDTH, HEIGHT> {
    pub const fn new(rows: [[T; WIDTH]; HEIGHT]) -> Self {
        Table(rows)
    }
}

impl<T, const WIDTH: usize, const HEIGHT: usize> Index<(usize, usize)> for Table<T, WIDTH, HEIGHT> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.0[y][x]
    }
}
