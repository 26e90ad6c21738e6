//! Concrete layouts: cube surface, flat torus, Möbius ring, bounded grid and
//! the 3-torus.
//!
//! Square meshes use [`Group::dihedral_square`]; relation ids below refer to
//! its ordering (0 identity, 1 flip x, 2 flip y, ...).

use crate::error::LayoutError;
use crate::group::Group;
use crate::mesh::{build_in, BuildCfg, LayoutEntry, Mesh};

/// Twelve cube edges over six faces.
///
/// Face 0 is the starting face; 1..=4 surround it (east, south, north, west
/// of face 0 in its own frame) and 5 is the far face. The four seams that
/// reach across the far side carry a flip.
pub const CUBE_LAYOUT: [(usize, usize, usize, usize); 12] = [
    (0, 1, 0, 2),
    (0, 2, 2, 0),
    (0, 3, 3, 0),
    (0, 4, 1, 0),
    (1, 2, 0, 0),
    (1, 3, 2, 0),
    (1, 5, 3, 0),
    (2, 4, 2, 0),
    (2, 5, 0, 2),
    (3, 4, 0, 0),
    (3, 5, 1, 2),
    (4, 5, 2, 1),
];

pub fn cube_layout() -> Vec<LayoutEntry> {
    CUBE_LAYOUT.iter().map(|&e| e.into()).collect()
}

/// Closed six-face cube surface.
pub fn cube() -> Result<Mesh<3>, LayoutError> {
    build_in(
        6,
        &Group::dihedral_square(),
        &cube_layout(),
        BuildCfg::default(),
    )
}

/// `w × h` torus: vertex `y·w + x`, east and south edges wrap around.
pub fn torus_layout(w: usize, h: usize) -> Vec<LayoutEntry> {
    let mut out = Vec::with_capacity(2 * w * h);
    for y in 0..h {
        for x in 0..w {
            let v = y * w + x;
            out.push(LayoutEntry::new(v, y * w + (x + 1) % w, 0, 0));
            out.push(LayoutEntry::new(v, ((y + 1) % h) * w + x, 2, 0));
        }
    }
    out
}

pub fn torus(w: usize, h: usize) -> Result<Mesh<3>, LayoutError> {
    build_in(
        w * h,
        &Group::dihedral_square(),
        &torus_layout(w, h),
        BuildCfg::default(),
    )
}

/// `w × h` grid without wrap-around; the border slots stay walls.
pub fn grid_layout(w: usize, h: usize) -> Vec<LayoutEntry> {
    let mut out = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let v = y * w + x;
            if x + 1 < w {
                out.push(LayoutEntry::new(v, v + 1, 0, 0));
            }
            if y + 1 < h {
                out.push(LayoutEntry::new(v, v + w, 2, 0));
            }
        }
    }
    out
}

pub fn grid(w: usize, h: usize) -> Result<Mesh<3>, LayoutError> {
    build_in(
        w * h,
        &Group::dihedral_square(),
        &grid_layout(w, h),
        BuildCfg::default(),
    )
}

/// Ring of `w` cells whose closing seam flips the transverse axis. Walking
/// east `w` times arrives upside down; `2·w` steps restore the orientation.
pub fn mobius_layout(w: usize) -> Vec<LayoutEntry> {
    (0..w)
        .map(|x| {
            let relation = if x + 1 == w { 2 } else { 0 };
            LayoutEntry::new(x, (x + 1) % w, 0, relation)
        })
        .collect()
}

pub fn mobius(w: usize) -> Result<Mesh<3>, LayoutError> {
    build_in(
        w,
        &Group::dihedral_square(),
        &mobius_layout(w),
        BuildCfg::default(),
    )
}

/// `w × h × d` three-dimensional torus (m = 4), vertex `(z·h + y)·w + x`.
pub fn cubic_torus_layout(w: usize, h: usize, d: usize) -> Vec<LayoutEntry> {
    let id = |x: usize, y: usize, z: usize| (z * h + y) * w + x;
    let mut out = Vec::with_capacity(3 * w * h * d);
    for z in 0..d {
        for y in 0..h {
            for x in 0..w {
                let v = id(x, y, z);
                out.push(LayoutEntry::new(v, id((x + 1) % w, y, z), 0, 0));
                out.push(LayoutEntry::new(v, id(x, (y + 1) % h, z), 2, 0));
                out.push(LayoutEntry::new(v, id(x, y, (z + 1) % d), 4, 0));
            }
        }
    }
    out
}

pub fn cubic_torus(w: usize, h: usize, d: usize) -> Result<Mesh<4>, LayoutError> {
    build_in(
        w * h * d,
        &Group::<4>::signed_permutations(),
        &cubic_torus_layout(w, h, d),
        BuildCfg::default(),
    )
}
