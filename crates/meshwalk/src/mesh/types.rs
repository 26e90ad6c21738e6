//! Mesh tables and layout entries.

use crate::direction::{slot_count, try_slot_of, Slot};
use crate::error::LayoutError;
use crate::group::{displacement, with_slot_translation, Frame};

/// Vertex identifier in `0..n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);

/// One explicit edge: leaving `source` through `slot` arrives at `target`,
/// with `group[relation]` relating the two frames. The builder installs the
/// mirrored back edge itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayoutEntry {
    pub source: VertexId,
    pub target: VertexId,
    pub slot: Slot,
    pub relation: usize,
}

impl LayoutEntry {
    #[inline]
    pub fn new(source: usize, target: usize, slot: usize, relation: usize) -> Self {
        Self {
            source: VertexId(source),
            target: VertexId(target),
            slot: Slot(slot),
            relation,
        }
    }
}

impl From<(usize, usize, usize, usize)> for LayoutEntry {
    fn from((source, target, slot, relation): (usize, usize, usize, usize)) -> Self {
        Self::new(source, target, slot, relation)
    }
}

/// Builder configuration.
#[derive(Clone, Copy, Debug)]
pub struct BuildCfg {
    /// Re-check reciprocity of every linked slot once the layout is in.
    /// Per-entry checks always run; this is the whole-table pass.
    pub verify: bool,
}

impl Default for BuildCfg {
    fn default() -> Self {
        Self { verify: true }
    }
}

/// Neighbour and relation tables indexed by `(vertex, slot)`.
///
/// Invariants (established by the builder, read-only afterwards):
/// - Unlinked slots are walls: the neighbour is the vertex itself and the
///   relation is the identity carrying only the slot's own translation.
/// - Every linked slot `(i, j) → t` with relation `r` has a linked back slot
///   `j' = slot_of(-displacement(r))` at `t` with `V[t][j'] = i` and
///   `R[t][j'] = r⁻¹`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mesh<const M: usize> {
    pub(crate) neighbors: Vec<Vec<VertexId>>,
    pub(crate) relations: Vec<Vec<Frame<M>>>,
    pub(crate) linked: Vec<Vec<bool>>,
}

impl<const M: usize> Mesh<M> {
    /// `n` isolated vertices: every slot is a wall.
    pub(crate) fn with_defaults(n: usize) -> Self {
        let k = slot_count::<M>();
        let row: Vec<Frame<M>> = (0..k).map(|s| Self::default_relation(Slot(s))).collect();
        Self {
            neighbors: (0..n).map(|i| vec![VertexId(i); k]).collect(),
            relations: vec![row; n],
            linked: vec![vec![false; k]; n],
        }
    }

    /// Relation stored at an unlinked slot.
    pub fn default_relation(slot: Slot) -> Frame<M> {
        with_slot_translation(&Frame::<M>::identity(), slot)
    }

    pub(crate) fn link(&mut self, v: VertexId, s: Slot, target: VertexId, relation: Frame<M>) {
        self.neighbors[v.0][s.0] = target;
        self.relations[v.0][s.0] = relation;
        self.linked[v.0][s.0] = true;
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }
    #[inline]
    pub fn slot_count(&self) -> usize {
        slot_count::<M>()
    }
    #[inline]
    pub fn neighbor(&self, v: VertexId, s: Slot) -> VertexId {
        self.neighbors[v.0][s.0]
    }
    #[inline]
    pub fn relation(&self, v: VertexId, s: Slot) -> &Frame<M> {
        &self.relations[v.0][s.0]
    }
    /// True iff `(v, s)` carries an installed edge (forward or back).
    #[inline]
    pub fn is_linked(&self, v: VertexId, s: Slot) -> bool {
        self.linked[v.0][s.0]
    }
    /// Neighbour table `V`.
    #[inline]
    pub fn neighbors(&self) -> &[Vec<VertexId>] {
        &self.neighbors
    }
    /// Relation table `R`.
    #[inline]
    pub fn relations(&self) -> &[Vec<Frame<M>>] {
        &self.relations
    }

    /// Every slot of every vertex is linked (no walls).
    pub fn is_closed(&self) -> bool {
        self.linked.iter().all(|row| row.iter().all(|&l| l))
    }

    /// Slot at the neighbour that points back along `(v, s)`.
    pub fn back_slot(&self, v: VertexId, s: Slot) -> Option<Slot> {
        try_slot_of(&-displacement(self.relation(v, s)))
    }

    /// Linked slots as `(source, slot, target)`, in table order.
    pub fn linked_edges(&self) -> impl Iterator<Item = (VertexId, Slot, VertexId)> + '_ {
        self.linked.iter().enumerate().flat_map(move |(i, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, &l)| l)
                .map(move |(s, _)| (VertexId(i), Slot(s), self.neighbors[i][s]))
        })
    }

    /// Check the back-edge invariant on every linked slot.
    pub fn verify(&self) -> Result<(), LayoutError> {
        let id = Frame::<M>::identity();
        for i in 0..self.vertex_count() {
            for s in 0..self.slot_count() {
                let (v, slot) = (VertexId(i), Slot(s));
                if !self.is_linked(v, slot) {
                    continue;
                }
                let broken = LayoutError::NotReciprocal { vertex: v, slot };
                let t = self.neighbor(v, slot);
                let back = self.back_slot(v, slot).ok_or(broken.clone())?;
                let reciprocal = self.is_linked(t, back)
                    && self.neighbor(t, back) == v
                    && self.relation(t, back) * self.relation(v, slot) == id;
                if !reciprocal {
                    return Err(broken);
                }
            }
        }
        Ok(())
    }
}
