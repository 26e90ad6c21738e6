//! Unfolding: develop the mesh around a walker state onto a flat grid.
//!
//! Cell `(dx, dy)` holds the state reached by walking `|dx|` steps east or
//! west and then `|dy|` steps south or north, all in the walker's frame.
//! Paths only cross installed edges; a cell whose path runs into a wall is
//! empty. On closed meshes every cell is filled and cells repeat once the
//! limits exceed the mesh's period.

use crate::direction::unit;
use crate::mesh::Mesh;
use crate::walker::{WalkState, Walker};

/// Step limits per direction, all inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    pub east: usize,
    pub west: usize,
    pub south: usize,
    pub north: usize,
}

impl Limits {
    /// Same reach in every direction.
    pub fn square(radius: usize) -> Self {
        Self {
            east: radius,
            west: radius,
            south: radius,
            north: radius,
        }
    }
    #[inline]
    pub fn width(&self) -> usize {
        self.west + 1 + self.east
    }
    #[inline]
    pub fn height(&self) -> usize {
        self.north + 1 + self.south
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::square(2)
    }
}

/// Grid of walker states, row-major from the north-west corner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unfolding<const M: usize> {
    limits: Limits,
    cells: Vec<Option<WalkState<M>>>,
}

impl<const M: usize> Unfolding<M> {
    #[inline]
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// State at offset `(dx, dy)` from the origin, `None` if outside the
    /// limits or behind a wall.
    pub fn get(&self, dx: isize, dy: isize) -> Option<&WalkState<M>> {
        let col = dx.checked_add(self.limits.west as isize)?;
        let row = dy.checked_add(self.limits.north as isize)?;
        if col < 0 || row < 0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.limits.width() || row >= self.limits.height() {
            return None;
        }
        self.cells[row * self.limits.width() + col].as_ref()
    }

    /// Rows from north to south.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<WalkState<M>>]> + '_ {
        self.cells.chunks(self.limits.width())
    }

    /// Vertex ids per row, `None` for empty cells.
    pub fn vertex_rows(&self) -> Vec<Vec<Option<usize>>> {
        self.rows()
            .map(|row| row.iter().map(|c| c.map(|s| s.vertex().0)).collect())
            .collect()
    }

    /// Filled cells as `(dx, dy, state)`.
    pub fn iter(&self) -> impl Iterator<Item = (isize, isize, &WalkState<M>)> + '_ {
        let w = self.limits.width();
        let (west, north) = (self.limits.west as isize, self.limits.north as isize);
        self.cells.iter().enumerate().filter_map(move |(i, c)| {
            let state = c.as_ref()?;
            Some(((i % w) as isize - west, (i / w) as isize - north, state))
        })
    }
}

/// Unfold `mesh` around `origin` (pre: `M >= 3`, origin vertex in range).
pub fn unfold<const M: usize>(mesh: &Mesh<M>, origin: WalkState<M>, limits: Limits) -> Unfolding<M> {
    assert!(M >= 3, "unfold needs two geometric axes (dimension {M})");
    let (east, west) = (unit::<M>(0, false), unit::<M>(0, true));
    let (south, north) = (unit::<M>(1, false), unit::<M>(1, true));
    let (w, h) = (limits.width(), limits.height());
    let mut cells = vec![None; w * h];

    let mut walker = Walker::from_state(origin, mesh);
    for (col, dx) in (-(limits.west as isize)..=limits.east as isize).enumerate() {
        walker.restore(origin);
        let dir = if dx < 0 { &west } else { &east };
        if !(0..dx.unsigned_abs()).all(|_| walker.attempt(dir)) {
            continue;
        }
        let centre = walker.state();
        cells[limits.north * w + col] = Some(centre);
        for (dir, reach, sign) in [(&south, limits.south, 1isize), (&north, limits.north, -1)] {
            walker.restore(centre);
            for step in 1..=reach {
                if !walker.attempt(dir) {
                    break;
                }
                let row = (limits.north as isize + sign * step as isize) as usize;
                cells[row * w + col] = Some(walker.state());
            }
        }
    }
    tracing::debug!(
        width = w,
        height = h,
        filled = cells.iter().filter(|c| c.is_some()).count(),
        "unfolded"
    );
    Unfolding { limits, cells }
}
