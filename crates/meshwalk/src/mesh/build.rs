//! Table construction: defaults, edge installation, back-edge completion.

use super::types::{BuildCfg, LayoutEntry, Mesh, VertexId};
use crate::direction::{slot_count, try_slot_of, Slot};
use crate::error::{LayoutError, MeshError};
use crate::group::{displacement, inverse, with_slot_translation, Frame, Group};

/// Incremental mesh construction over a validated group.
///
/// Each [`install`](MeshBuilder::install) is all-or-nothing: either both the
/// forward and the back edge are written, or the builder is left unchanged
/// and an error is returned.
#[derive(Clone, Debug)]
pub struct MeshBuilder<'g, const M: usize> {
    group: &'g Group<M>,
    mesh: Mesh<M>,
    cfg: BuildCfg,
    installed: usize,
}

impl<'g, const M: usize> MeshBuilder<'g, M> {
    /// `n` vertices with every slot a wall.
    pub fn new(n: usize, group: &'g Group<M>) -> Result<Self, LayoutError> {
        if n == 0 {
            return Err(LayoutError::NoVertices);
        }
        Ok(Self {
            group,
            mesh: Mesh::with_defaults(n),
            cfg: BuildCfg::default(),
            installed: 0,
        })
    }

    pub fn with_cfg(mut self, cfg: BuildCfg) -> Self {
        self.cfg = cfg;
        self
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    /// Install one edge and its mirrored back edge.
    ///
    /// The forward relation is `group[relation]` with the slot's axis
    /// component of the translation column forced to the slot's sign. The
    /// back slot is the slot of the negated translation column, and the back
    /// relation is the exact inverse of the forward one.
    pub fn install(&mut self, entry: LayoutEntry) -> Result<(), LayoutError> {
        let n = self.mesh.vertex_count();
        for vertex in [entry.source, entry.target] {
            if vertex.0 >= n {
                return Err(LayoutError::VertexOutOfRange { vertex, count: n });
            }
        }
        let k = slot_count::<M>();
        if entry.slot.0 >= k {
            return Err(LayoutError::SlotOutOfRange {
                slot: entry.slot,
                count: k,
            });
        }
        let g = self
            .group
            .get(entry.relation)
            .ok_or(LayoutError::RelationOutOfRange {
                relation: entry.relation,
                count: self.group.len(),
            })?;

        let forward = with_slot_translation(g, entry.slot);
        let back = try_slot_of(&-displacement(&forward)).ok_or(LayoutError::NonCardinalBack {
            vertex: entry.source,
            slot: entry.slot,
            relation: entry.relation,
        })?;
        let not_reciprocal = LayoutError::NotReciprocal {
            vertex: entry.target,
            slot: back,
        };
        let backward = inverse(&forward).ok_or(not_reciprocal.clone())?;
        // Walking the back edge must leave through the slot we came in by.
        if try_slot_of(&-displacement(&backward)) != Some(entry.slot) {
            return Err(not_reciprocal);
        }

        self.check_free(entry.source, entry.slot, entry.target, &forward)?;
        self.check_free(entry.target, back, entry.source, &backward)?;
        self.mesh.link(entry.source, entry.slot, entry.target, forward);
        self.mesh.link(entry.target, back, entry.source, backward);
        self.installed += 1;
        tracing::debug!(
            source = entry.source.0,
            target = entry.target.0,
            slot = entry.slot.0,
            back = back.0,
            relation = entry.relation,
            "edge installed"
        );
        Ok(())
    }

    /// Install every entry in order, stopping at the first error.
    pub fn extend<I>(&mut self, entries: I) -> Result<(), LayoutError>
    where
        I: IntoIterator<Item = LayoutEntry>,
    {
        for entry in entries {
            self.install(entry)?;
        }
        Ok(())
    }

    /// Freeze the tables.
    pub fn finish(self) -> Result<Mesh<M>, LayoutError> {
        if self.cfg.verify {
            self.mesh.verify()?;
        }
        tracing::debug!(
            vertices = self.mesh.vertex_count(),
            entries = self.installed,
            closed = self.mesh.is_closed(),
            "mesh built"
        );
        Ok(self.mesh)
    }

    /// A linked slot may only be re-linked to the same target with the same
    /// relation.
    fn check_free(
        &self,
        vertex: VertexId,
        slot: Slot,
        requested: VertexId,
        relation: &Frame<M>,
    ) -> Result<(), LayoutError> {
        if !self.mesh.is_linked(vertex, slot) {
            return Ok(());
        }
        let existing = self.mesh.neighbor(vertex, slot);
        if existing == requested && self.mesh.relation(vertex, slot) == relation {
            return Ok(());
        }
        Err(LayoutError::Conflict {
            vertex,
            slot,
            existing,
            requested,
        })
    }
}

/// Validate `group` and build the mesh for `layout` with default settings.
pub fn build_mesh<const M: usize>(
    n: usize,
    group: &[Frame<M>],
    layout: &[LayoutEntry],
) -> Result<Mesh<M>, MeshError> {
    build_mesh_with(n, group, layout, BuildCfg::default())
}

pub fn build_mesh_with<const M: usize>(
    n: usize,
    group: &[Frame<M>],
    layout: &[LayoutEntry],
    cfg: BuildCfg,
) -> Result<Mesh<M>, MeshError> {
    let group = Group::new(group.to_vec())?;
    Ok(build_in(n, &group, layout, cfg)?)
}

/// Build over an already validated group.
pub fn build_in<const M: usize>(
    n: usize,
    group: &Group<M>,
    layout: &[LayoutEntry],
    cfg: BuildCfg,
) -> Result<Mesh<M>, LayoutError> {
    let mut builder = MeshBuilder::new(n, group)?.with_cfg(cfg);
    builder.extend(layout.iter().copied())?;
    builder.finish()
}
