//! Orientation-labelled cell meshes and the walkers that traverse them.
//!
//! A mesh is a pair of tables indexed by `(vertex, slot)`: the neighbour
//! reached through that slot and the homogeneous transition matrix that
//! relates the two local frames. Tables are built once from a symmetry group
//! and a layout of edges (back edges are completed automatically) and are
//! read-only afterwards. A [`Walker`] follows the tables while keeping track
//! of its accumulated orientation.
//!
//! Layout
//! - `direction`: cardinal directions ↔ slot indices (weighted-sum bijection).
//! - `group`: exact integer frames, symmetry groups, and group constructors.
//! - `mesh`: layout entries, the builder, and the immutable `Mesh`.
//! - `walker`: the traversal cursor.
//! - `view`: unfolding a neighbourhood of the mesh into a flat grid.
//! - `presets`: concrete layouts (cube, torus, Möbius ring, 3-torus).

pub mod api;
pub mod direction;
pub mod error;
pub mod group;
pub mod mesh;
pub mod presets;
pub mod view;
pub mod walker;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use direction::{slot_of, Cardinal, Dir, Slot};
pub use error::{GroupError, LayoutError, MeshError};
pub use group::{Frame, Group};
pub use mesh::{build_mesh, BuildCfg, LayoutEntry, Mesh, MeshBuilder, VertexId};
pub use walker::{WalkState, Walker};

/// Square-mesh (m = 3) aliases for quick imports in callers.
pub mod prelude {
    pub use crate::direction::{cardinals, direction_of, opposite, slot_of, Cardinal, Slot};
    pub use crate::group::Group;
    pub use crate::mesh::{build_mesh, LayoutEntry, MeshBuilder, VertexId};
    pub use crate::view::{unfold, Limits};
    pub use crate::walker::{WalkState, Walker};

    pub type Frame3 = crate::group::Frame<3>;
    pub type Dir3 = crate::direction::Dir<3>;
    pub type Mesh3 = crate::mesh::Mesh<3>;
}
