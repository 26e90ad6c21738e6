//! Frames and validated symmetry groups.

use nalgebra::{matrix, SMatrix};
use std::collections::HashMap;

use super::util::{checked_product, determinant, inverse, next_permutation};
use crate::direction::{Dir, Slot};
use crate::error::GroupError;

/// Homogeneous `M×M` integer matrix. The upper-left `(M-1)×(M-1)` block is
/// the linear (symmetry) part, the last column holds a translation.
pub type Frame<const M: usize> = SMatrix<i64, M, M>;

/// Upper bound on the order of groups built by [`Group::generated_by`].
pub const MAX_GENERATED_ORDER: usize = 10_000;

/// True iff the last row of `f` is `(0, …, 0, 1)`.
pub fn is_affine<const M: usize>(f: &Frame<M>) -> bool {
    (0..M).all(|c| f[(M - 1, c)] == i64::from(c + 1 == M))
}

/// `f` with its translation column cleared (homogeneous entry kept).
pub fn linear_part<const M: usize>(f: &Frame<M>) -> Frame<M> {
    let mut out = *f;
    for r in 0..M - 1 {
        out[(r, M - 1)] = 0;
    }
    out
}

/// Translation column of `f` with the homogeneous entry zeroed.
pub fn displacement<const M: usize>(f: &Frame<M>) -> Dir<M> {
    let mut d: Dir<M> = f.column(M - 1).into_owned();
    d[M - 1] = 0;
    d
}

/// `f` with the `slot`'s axis component of the translation column set to the
/// slot's sign, so the matrix reads as "this relation moves along `slot`".
pub fn with_slot_translation<const M: usize>(f: &Frame<M>, slot: Slot) -> Frame<M> {
    let mut out = *f;
    out[(slot.axis(), M - 1)] = slot.sign();
    out
}

/// Ordered, finite matrix group with the identity at index 0.
///
/// Invariants:
/// - `elements[0]` is the identity; every element is affine with `det = ±1`
///   and a signed-permutation linear block.
/// - Closed under products, so inverses are members as well.
#[derive(Clone, Debug)]
pub struct Group<const M: usize> {
    elements: Vec<Frame<M>>,
    inverses: Vec<usize>,
    index: HashMap<Frame<M>, usize>,
}

impl<const M: usize> PartialEq for Group<M> {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}
impl<const M: usize> Eq for Group<M> {}

impl<const M: usize> Group<M> {
    /// Validate `elements` as a group in the given order.
    pub fn new(elements: Vec<Frame<M>>) -> Result<Self, GroupError> {
        if M < 2 {
            return Err(GroupError::DimensionTooSmall(M));
        }
        let Some(first) = elements.first() else {
            return Err(GroupError::Empty);
        };
        if *first != Frame::<M>::identity() {
            return Err(GroupError::IdentityNotFirst);
        }
        for (index, g) in elements.iter().enumerate() {
            check_element(index, g)?;
        }
        let index = index_elements(&elements);
        for (left, a) in elements.iter().enumerate() {
            for (right, b) in elements.iter().enumerate() {
                // An overflowing product cannot be a member either.
                let member = checked_product(a, b).is_some_and(|p| index.contains_key(&p));
                if !member {
                    return Err(GroupError::NotClosed { left, right });
                }
            }
        }
        let mut inverses = Vec::with_capacity(elements.len());
        for (i, g) in elements.iter().enumerate() {
            // Closed and finite, so the inverse is a member.
            let inv = inverse(g)
                .and_then(|inv| index.get(&inv).copied())
                .ok_or(GroupError::NotClosed { left: i, right: i })?;
            inverses.push(inv);
        }
        Ok(Self {
            elements,
            inverses,
            index,
        })
    }

    /// Closure of `generators` under multiplication, identity first and the
    /// rest in breadth-first discovery order.
    pub fn generated_by(generators: &[Frame<M>]) -> Result<Self, GroupError> {
        if M < 2 {
            return Err(GroupError::DimensionTooSmall(M));
        }
        for (index, g) in generators.iter().enumerate() {
            check_element(index, g)?;
        }
        let mut elements = vec![Frame::<M>::identity()];
        let mut seen = index_elements(&elements);
        let too_large = GroupError::TooLarge {
            limit: MAX_GENERATED_ORDER,
        };
        let mut cursor = 0;
        while cursor < elements.len() {
            let current = elements[cursor];
            for g in generators {
                // Overflowing entries only arise in an unbounded group.
                let p = checked_product(&current, g).ok_or_else(|| too_large.clone())?;
                if !seen.contains_key(&p) {
                    if elements.len() == MAX_GENERATED_ORDER {
                        return Err(too_large);
                    }
                    seen.insert(p, elements.len());
                    elements.push(p);
                }
            }
            cursor += 1;
        }
        Self::new(elements)
    }

    /// Hyperoctahedral group: all signed permutation matrices of the `M-1`
    /// geometric axes, in homogeneous form. Identity first; ordered by
    /// permutation (lexicographic), then by sign mask.
    pub fn signed_permutations() -> Self {
        assert!(M >= 2, "signed_permutations: dimension {M} too small");
        let d = M - 1;
        let mut elements = Vec::new();
        let mut perm: Vec<usize> = (0..d).collect();
        loop {
            for mask in 0..(1usize << d) {
                let mut f = Frame::<M>::zeros();
                for (col, &row) in perm.iter().enumerate() {
                    f[(row, col)] = if (mask >> col) & 1 == 1 { -1 } else { 1 };
                }
                f[(d, d)] = 1;
                elements.push(f);
            }
            if !next_permutation(&mut perm) {
                break;
            }
        }
        Self::trusted(elements)
    }

    /// Build from elements known to form a group.
    fn trusted(elements: Vec<Frame<M>>) -> Self {
        let index = index_elements(&elements);
        let inverses = elements
            .iter()
            .map(|g| {
                inverse(g)
                    .and_then(|inv| index.get(&inv).copied())
                    .unwrap_or(0)
            })
            .collect();
        Self {
            elements,
            inverses,
            index,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
    #[inline]
    pub fn elements(&self) -> &[Frame<M>] {
        &self.elements
    }
    #[inline]
    pub fn get(&self, i: usize) -> Option<&Frame<M>> {
        self.elements.get(i)
    }
    #[inline]
    pub fn identity(&self) -> &Frame<M> {
        &self.elements[0]
    }

    /// Index of `f` (exact match, translation included).
    pub fn index_of(&self, f: &Frame<M>) -> Option<usize> {
        self.index.get(f).copied()
    }

    /// Index of the element whose linear part equals that of `f`.
    pub fn linear_index(&self, f: &Frame<M>) -> Option<usize> {
        let lin = linear_part(f);
        self.index.get(&lin).copied().or_else(|| {
            self.elements
                .iter()
                .position(|g| linear_part(g) == lin)
        })
    }

    #[inline]
    pub fn contains_linear(&self, f: &Frame<M>) -> bool {
        self.linear_index(f).is_some()
    }

    /// Index of the inverse of element `i`.
    #[inline]
    pub fn inverse_index(&self, i: usize) -> usize {
        self.inverses[i]
    }

    /// Index of `elements[i] · elements[j]`.
    pub fn compose(&self, i: usize, j: usize) -> Option<usize> {
        let p = self.elements.get(i)? * self.elements.get(j)?;
        self.index_of(&p)
    }
}

impl Group<3> {
    /// The eight symmetries of a square (dihedral group of order 8).
    ///
    /// Element `i` encodes three flags as `negH + 2·negV + 4·swapXY`:
    /// 0 identity, 1 flip x, 2 flip y, 3 half turn, 4 transpose,
    /// 5 quarter turn, 6 inverse quarter turn, 7 anti-transpose.
    pub fn dihedral_square() -> Self {
        let r: Frame<3> = matrix![0, -1, 0; 1, 0, 0; 0, 0, 1];
        let s: Frame<3> = matrix![-1, 0, 0; 0, 1, 0; 0, 0, 1];
        let id = Frame::<3>::identity();
        Self::trusted(vec![
            id,
            s,
            s * r * r,
            r * r,
            s * r,
            r,
            r.transpose(),
            s * r.transpose(),
        ])
    }
}

fn check_element<const M: usize>(index: usize, g: &Frame<M>) -> Result<(), GroupError> {
    if !is_affine(g) {
        return Err(GroupError::NotAffine { index });
    }
    let det = determinant(g).ok_or(GroupError::Overflow { index })?;
    if det.abs() != 1 {
        return Err(GroupError::Singular { index, det });
    }
    if !is_signed_permutation(g) {
        return Err(GroupError::NotSignedPermutation { index });
    }
    Ok(())
}

/// Linear block has exactly one `±1` per row and column, zeros elsewhere.
fn is_signed_permutation<const M: usize>(g: &Frame<M>) -> bool {
    let d = M - 1;
    let unit_count = |entries: &mut dyn Iterator<Item = i64>| {
        let mut units = 0;
        for x in entries {
            match x {
                0 => {}
                1 | -1 => units += 1,
                _ => return false,
            }
        }
        units == 1
    };
    (0..d).all(|r| unit_count(&mut (0..d).map(|c| g[(r, c)])))
        && (0..d).all(|c| unit_count(&mut (0..d).map(|r| g[(r, c)])))
}

fn index_elements<const M: usize>(elements: &[Frame<M>]) -> HashMap<Frame<M>, usize> {
    let mut index = HashMap::with_capacity(elements.len());
    for (i, g) in elements.iter().enumerate() {
        index.entry(*g).or_insert(i);
    }
    index
}
