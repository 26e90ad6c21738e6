//! Configuration errors raised while validating groups and building meshes.
//!
//! Both families are fatal for the call that produced them and are never
//! repaired silently. Invalid direction vectors are not represented here:
//! they are caller bugs and panic (see [`crate::direction::slot_of`]).

use crate::direction::Slot;
use crate::mesh::VertexId;

/// The symmetry group handed to the builder is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum GroupError {
    /// No elements at all.
    #[error("group is empty")]
    Empty,

    /// Homogeneous frames need at least one geometric axis.
    #[error("dimension {0} is too small (need m >= 2)")]
    DimensionTooSmall(usize),

    /// `group[0]` must be the identity.
    #[error("first group element is not the identity")]
    IdentityNotFirst,

    /// The last row of every element must be `(0, …, 0, 1)`.
    #[error("group element {index} is not an affine (homogeneous) matrix")]
    NotAffine { index: usize },

    /// An integer computation on this element overflows `i64`.
    #[error("group element {index} overflows 64-bit integer arithmetic")]
    Overflow { index: usize },

    /// Integer inverse requires `det = ±1`.
    #[error("group element {index} is not invertible over the integers (det = {det})")]
    Singular { index: usize, det: i64 },

    /// The linear block must permute the axes up to sign (entries in
    /// `{-1, 0, 1}`, one nonzero per row and column).
    #[error("group element {index} is not a signed permutation")]
    NotSignedPermutation { index: usize },

    /// The product of two elements is missing from the group.
    #[error("group is not closed: element {left} · element {right} is not a member")]
    NotClosed { left: usize, right: usize },

    /// Generating the closure of a generator set did not terminate in time.
    #[error("generated group exceeds {limit} elements")]
    TooLarge { limit: usize },
}

/// The layout handed to the builder is malformed or inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum LayoutError {
    /// A mesh needs at least one vertex.
    #[error("mesh has no vertices")]
    NoVertices,

    #[error("vertex {vertex:?} out of range (mesh has {count} vertices)")]
    VertexOutOfRange { vertex: VertexId, count: usize },

    #[error("slot {slot} out of range ({count} slots per vertex)")]
    SlotOutOfRange { slot: Slot, count: usize },

    #[error("relation {relation} out of range (group has {count} elements)")]
    RelationOutOfRange { relation: usize, count: usize },

    /// The negated translation column of an installed relation is not a
    /// cardinal direction, so no back slot exists.
    #[error(
        "relation {relation} at {vertex:?} slot {slot} has no cardinal back direction"
    )]
    NonCardinalBack {
        vertex: VertexId,
        slot: Slot,
        relation: usize,
    },

    /// Following the back edge does not lead back through the forward slot.
    /// Happens when the relation's linear part moves the slot's own axis.
    #[error("edge at {vertex:?} slot {slot} is not reciprocated by its back edge")]
    NotReciprocal { vertex: VertexId, slot: Slot },

    /// A linked slot would be reassigned to a different edge.
    #[error(
        "conflicting edge at {vertex:?} slot {slot}: already linked to {existing:?}, requested {requested:?}"
    )]
    Conflict {
        vertex: VertexId,
        slot: Slot,
        existing: VertexId,
        requested: VertexId,
    },
}

/// Any failure of [`crate::mesh::build_mesh`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    #[error("invalid group: {0}")]
    Group(#[from] GroupError),

    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),
}
