//! Curated API surface for the CLI, benches and probes.
//!
//! Important
//! - A convenience layer over the modules; the modules themselves stay the
//!   source of truth. Names here may change without notice.

// Directions and slots
pub use crate::direction::{
    cardinals, direction_of, is_cardinal, opposite, parse_moves, random_directions, slot_count,
    slot_of, try_slot_of, unit, Cardinal, Dir, ParseCardinalError, Slot,
};
// Exact integer frames and groups
pub use crate::group::{
    adjugate, checked_product, determinant, displacement, inverse, is_affine, linear_part,
    with_slot_translation, Frame, Group,
};
// Construction
pub use crate::error::{GroupError, LayoutError, MeshError};
pub use crate::mesh::{
    build_in, build_mesh, build_mesh_with, BuildCfg, LayoutEntry, Mesh, MeshBuilder, VertexId,
};
// Traversal and views
pub use crate::view::{unfold, Limits, Unfolding};
pub use crate::walker::{WalkState, Walker};
// Ready-made layouts
pub use crate::presets::{
    cube, cube_layout, cubic_torus, cubic_torus_layout, grid, grid_layout, mobius, mobius_layout,
    torus, torus_layout,
};
