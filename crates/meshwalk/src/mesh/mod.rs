//! Mesh construction.
//!
//! Purpose
//! - Turn a vertex count, a symmetry group and a layout of explicit edges into
//!   the neighbour table `V` and relation table `R`.
//!
//! Why this design
//! - Slots start out as walls (self-loop, identity plus the slot's own
//!   translation), so every `(vertex, slot)` is defined before any edge is
//!   installed and the walker never needs a fallback path.
//! - Back edges are derived, never listed: the back slot comes from the
//!   negated translation column of the forward relation and the back relation
//!   is its exact integer inverse.
//! - Per-entry checks reject conflicting or non-reciprocal edges at the
//!   offending entry; [`BuildCfg::verify`] re-checks the finished tables.

mod build;
mod types;

pub use build::{build_in, build_mesh, build_mesh_with, MeshBuilder};
pub use types::{BuildCfg, LayoutEntry, Mesh, VertexId};
