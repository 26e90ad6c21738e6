//! Exact integer linear algebra for small square matrices.
//!
//! Relation matrices are signed permutations in homogeneous form, so every
//! inverse we need is integral. Determinants use fraction-free (Bareiss)
//! elimination; inverses use the adjugate, which is exact whenever
//! `det = ±1`. No floating point is involved, and every product is
//! overflow-checked so malformed input yields `None` rather than a panic.

use nalgebra::{DMatrix, SMatrix};

/// Determinant of `a` over the integers, `None` if an intermediate value
/// overflows `i64`.
pub fn determinant<const M: usize>(a: &SMatrix<i64, M, M>) -> Option<i64> {
    bareiss_det(DMatrix::from_fn(M, M, |r, c| a[(r, c)]))
}

fn bareiss_det(mut a: DMatrix<i64>) -> Option<i64> {
    let n = a.nrows();
    if n == 0 {
        return Some(1);
    }
    let mut sign = 1;
    let mut prev = 1;
    for k in 0..n - 1 {
        if a[(k, k)] == 0 {
            let Some(p) = (k + 1..n).find(|&r| a[(r, k)] != 0) else {
                return Some(0);
            };
            a.swap_rows(k, p);
            sign = -sign;
        }
        for i in k + 1..n {
            for j in k + 1..n {
                let cross = a[(i, j)]
                    .checked_mul(a[(k, k)])?
                    .checked_sub(a[(i, k)].checked_mul(a[(k, j)])?)?;
                // Division is exact at every Bareiss step.
                a[(i, j)] = cross.checked_div(prev)?;
            }
        }
        prev = a[(k, k)];
    }
    a[(n - 1, n - 1)].checked_mul(sign)
}

/// Classical adjugate: `adj(a)[(r, c)] = (-1)^(r+c) · det(minor(a, c, r))`.
/// `None` on overflow.
pub fn adjugate<const M: usize>(a: &SMatrix<i64, M, M>) -> Option<SMatrix<i64, M, M>> {
    if M == 1 {
        return Some(SMatrix::identity());
    }
    let mut out = SMatrix::<i64, M, M>::zeros();
    for r in 0..M {
        for c in 0..M {
            let minor = DMatrix::from_fn(M - 1, M - 1, |i, j| {
                let row = if i >= c { i + 1 } else { i };
                let col = if j >= r { j + 1 } else { j };
                a[(row, col)]
            });
            let det = bareiss_det(minor)?;
            out[(r, c)] = if (r + c) % 2 == 0 { det } else { det.checked_neg()? };
        }
    }
    Some(out)
}

/// Exact inverse, or `None` unless `det(a) = ±1` (and no overflow occurs).
pub fn inverse<const M: usize>(a: &SMatrix<i64, M, M>) -> Option<SMatrix<i64, M, M>> {
    let adj = adjugate(a)?;
    match determinant(a)? {
        1 => Some(adj),
        -1 => adj.iter().all(|&x| x != i64::MIN).then(|| -adj),
        _ => None,
    }
}

/// `a · b`, or `None` if any entry overflows `i64`.
pub fn checked_product<const M: usize>(
    a: &SMatrix<i64, M, M>,
    b: &SMatrix<i64, M, M>,
) -> Option<SMatrix<i64, M, M>> {
    let mut out = SMatrix::<i64, M, M>::zeros();
    for r in 0..M {
        for c in 0..M {
            let mut acc: i64 = 0;
            for k in 0..M {
                acc = acc.checked_add(a[(r, k)].checked_mul(b[(k, c)])?)?;
            }
            out[(r, c)] = acc;
        }
    }
    Some(out)
}

/// Advance `perm` to the next permutation in lexicographic order.
/// Returns `false` (leaving `perm` sorted ascending) after the last one.
pub(crate) fn next_permutation(perm: &mut [usize]) -> bool {
    let n = perm.len();
    if n < 2 {
        return false;
    }
    let mut i = n - 1;
    while i > 0 && perm[i - 1] >= perm[i] {
        i -= 1;
    }
    if i == 0 {
        perm.reverse();
        return false;
    }
    let mut j = n - 1;
    while perm[j] <= perm[i - 1] {
        j -= 1;
    }
    perm.swap(i - 1, j);
    perm[i..].reverse();
    true
}
