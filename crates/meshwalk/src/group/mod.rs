//! Symmetry groups of homogeneous integer frames.
//!
//! Purpose
//! - Hold the finite group whose elements label mesh edges, with exact
//!   integer inversion (no floating point anywhere).
//! - Provide the two groups callers reach for: the square's dihedral group
//!   and the hyperoctahedral group of any dimension.
//!
//! Conventions
//! - Frames are `M×M` with the geometric axes first and the homogeneous axis
//!   last. Group elements are affine; relations installed in a mesh reuse the
//!   translation column to record their slot.

mod types;
mod util;

pub use types::{
    displacement, is_affine, linear_part, with_slot_translation, Frame, Group,
    MAX_GENERATED_ORDER,
};
pub use util::{adjugate, checked_product, determinant, inverse};
