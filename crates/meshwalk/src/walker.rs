//! Orientation-tracking traversal over a built [`Mesh`].
//!
//! A walker holds a vertex and an orientation. A requested direction is read
//! in the walker's own frame: it is rotated into the vertex's local frame by
//! the orientation, looked up as a slot, and the orientation is then
//! right-multiplied by that slot's relation. The linear block of the
//! orientation is always a group element; its translation column accumulates
//! the displacement walked so far, expressed in the start frame.
//!
//! Walkers borrow the mesh immutably, so any number of them may run on the
//! same mesh from different threads.

use crate::direction::{direction_of, slot_of, Cardinal, Dir, Slot};
use crate::group::{linear_part, Frame};
use crate::mesh::{Mesh, VertexId};

/// Snapshot of a walker: where it stands and how it is turned.
///
/// Only produced by walking (or as a fresh start with identity orientation),
/// so the orientation is always a product of traversed relations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WalkState<const M: usize> {
    vertex: VertexId,
    orientation: Frame<M>,
}

impl<const M: usize> WalkState<M> {
    /// Standing on `vertex` with identity orientation.
    pub fn origin(vertex: VertexId) -> Self {
        Self {
            vertex,
            orientation: Frame::<M>::identity(),
        }
    }
    #[inline]
    pub fn vertex(&self) -> VertexId {
        self.vertex
    }
    #[inline]
    pub fn orientation(&self) -> &Frame<M> {
        &self.orientation
    }
}

/// Traversal cursor over a shared, immutable mesh.
#[derive(Clone, Debug)]
pub struct Walker<'m, const M: usize> {
    mesh: &'m Mesh<M>,
    vertex: VertexId,
    orientation: Frame<M>,
}

impl<'m, const M: usize> Walker<'m, M> {
    /// Start on `start` with identity orientation.
    ///
    /// Pre: `start` is a vertex of `mesh`.
    pub fn new(start: VertexId, mesh: &'m Mesh<M>) -> Self {
        Self::from_state(WalkState::origin(start), mesh)
    }

    /// Resume from a snapshot taken on the same mesh.
    pub fn from_state(state: WalkState<M>, mesh: &'m Mesh<M>) -> Self {
        assert!(
            state.vertex.0 < mesh.vertex_count(),
            "walker: vertex {} out of range (mesh has {} vertices)",
            state.vertex.0,
            mesh.vertex_count()
        );
        Self {
            mesh,
            vertex: state.vertex,
            orientation: state.orientation,
        }
    }

    #[inline]
    pub fn mesh(&self) -> &'m Mesh<M> {
        self.mesh
    }
    #[inline]
    pub fn vertex(&self) -> VertexId {
        self.vertex
    }
    #[inline]
    pub fn orientation(&self) -> &Frame<M> {
        &self.orientation
    }
    #[inline]
    pub fn state(&self) -> WalkState<M> {
        WalkState {
            vertex: self.vertex,
            orientation: self.orientation,
        }
    }

    /// Return to an earlier snapshot.
    pub fn restore(&mut self, state: WalkState<M>) {
        *self = Self::from_state(state, self.mesh);
    }

    /// Slot at the current vertex that `dir` (walker frame) points through.
    ///
    /// Pre: `dir` is a cardinal direction; panics otherwise.
    #[inline]
    pub fn local_slot(&self, dir: &Dir<M>) -> Slot {
        slot_of(&(self.orientation * dir))
    }

    /// Walker-frame direction that leaves the current vertex through `slot`;
    /// the inverse of [`Walker::local_slot`].
    ///
    /// To undo a step taken through slot `s` of vertex `v`, follow
    /// `dir_through(mesh.back_slot(v, s))` from the arrival state. With
    /// permuting relations this generally differs from the negated request.
    pub fn dir_through(&self, slot: Slot) -> Dir<M> {
        // Signed permutation: the transpose is the inverse.
        linear_part(&self.orientation).transpose() * direction_of::<M>(slot)
    }

    /// Step once along `dir` and return the new vertex and orientation.
    ///
    /// Walls are crossed like any other slot: the walker stays on its vertex
    /// and the orientation picks up the wall's translation.
    pub fn to(&mut self, dir: &Dir<M>) -> (VertexId, Frame<M>) {
        let slot = self.local_slot(dir);
        self.cross(slot);
        (self.vertex, self.orientation)
    }

    /// Step along `dir` only if the slot carries an installed edge.
    /// Returns whether the walker moved.
    pub fn attempt(&mut self, dir: &Dir<M>) -> bool {
        let slot = self.local_slot(dir);
        if !self.mesh.is_linked(self.vertex, slot) {
            return false;
        }
        self.cross(slot);
        true
    }

    /// Apply every direction in order; returns the state after each step.
    pub fn walk<I>(&mut self, dirs: I) -> Vec<WalkState<M>>
    where
        I: IntoIterator<Item = Dir<M>>,
    {
        dirs.into_iter()
            .map(|d| {
                self.to(&d);
                self.state()
            })
            .collect()
    }

    fn cross(&mut self, slot: Slot) {
        let from = self.vertex;
        self.vertex = self.mesh.neighbor(from, slot);
        self.orientation = self.orientation * self.mesh.relation(from, slot);
        tracing::trace!(from = from.0, to = self.vertex.0, slot = slot.0, "step");
    }
}

impl<'m> Walker<'m, 3> {
    /// [`Walker::to`] for the four square-mesh directions.
    pub fn go(&mut self, c: Cardinal) -> (VertexId, Frame<3>) {
        self.to(&c.dir())
    }

    /// [`Walker::walk`] over a list of square-mesh directions.
    pub fn go_all(&mut self, moves: &[Cardinal]) -> Vec<WalkState<3>> {
        self.walk(moves.iter().map(|c| c.dir()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::{cardinals, random_directions, Cardinal::*};
    use crate::group::Group;
    use crate::mesh::{build_in, BuildCfg, LayoutEntry};
    use crate::presets;
    use nalgebra::{matrix, vector};
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn visited(states: &[WalkState<3>]) -> Vec<usize> {
        states.iter().map(|s| s.vertex().0).collect()
    }

    #[test]
    fn face_loop_on_cube_closes_to_identity() {
        let cube = presets::cube().unwrap();
        let mut w = Walker::new(VertexId(0), &cube);
        let states = w.go_all(&[East, South, West, North]);
        assert_eq!(visited(&states), vec![1, 5, 2, 0]);
        let o: Vec<Frame<3>> = states.iter().map(|s| *s.orientation()).collect();
        assert_eq!(o[0], matrix![1, 0, 1; 0, -1, 0; 0, 0, 1]);
        assert_eq!(o[1], matrix![1, 0, 1; 0, -1, 1; 0, 0, 1]);
        assert_eq!(o[2], matrix![1, 0, 0; 0, 1, 1; 0, 0, 1]);
        assert_eq!(w.vertex(), VertexId(0));
        assert_eq!(*w.orientation(), Frame::<3>::identity());
    }

    #[test]
    fn other_face_loops_turn_the_walker() {
        let cube = presets::cube().unwrap();
        let half_turn: Frame<3> = matrix![-1, 0, 0; 0, -1, 0; 0, 0, 1];

        let mut w = Walker::new(VertexId(0), &cube);
        assert_eq!(visited(&w.go_all(&[North, West, South, East])), vec![3, 5, 4, 3]);
        assert_eq!(*w.orientation(), half_turn);

        let mut w = Walker::new(VertexId(0), &cube);
        assert_eq!(visited(&w.go_all(&[West, North, East, South])), vec![4, 2, 5, 4]);
        assert_eq!(*w.orientation(), half_turn);
    }

    #[test]
    fn straight_lines_around_the_cube() {
        let cube = presets::cube().unwrap();

        let mut w = Walker::new(VertexId(0), &cube);
        assert_eq!(visited(&w.go_all(&[East; 6])), vec![1, 2, 5, 3, 4, 0]);
        assert_eq!(*w.orientation(), matrix![1, 0, 6; 0, -1, 0; 0, 0, 1]);

        let mut w = Walker::new(VertexId(0), &cube);
        w.go_all(&[East; 3]);
        assert_eq!(w.state().vertex(), VertexId(5));
        assert_eq!(*w.orientation(), matrix![1, 0, 3; 0, 1, 0; 0, 0, 1]);

        let mut w = Walker::new(VertexId(0), &cube);
        assert_eq!(visited(&w.go_all(&[South; 6])), vec![2, 4, 5, 1, 3, 0]);
        assert_eq!(*w.orientation(), matrix![-1, 0, 0; 0, 1, 6; 0, 0, 1]);
    }

    #[test]
    fn mobius_ring_needs_two_laps() {
        let ring = presets::mobius(3).unwrap();
        let mut w = Walker::new(VertexId(0), &ring);
        w.go_all(&[East; 3]);
        assert_eq!(w.vertex(), VertexId(0));
        assert_eq!(*w.orientation(), matrix![1, 0, 3; 0, -1, 0; 0, 0, 1]);
        w.go_all(&[East; 3]);
        assert_eq!(w.vertex(), VertexId(0));
        assert_eq!(*w.orientation(), matrix![1, 0, 6; 0, 1, 0; 0, 0, 1]);
    }

    #[test]
    fn walls_hold_the_walker_in_place() {
        let ring = presets::mobius(3).unwrap();
        let mut w = Walker::new(VertexId(0), &ring);
        w.go_all(&[East; 3]);
        // Upside down, so south in the walker frame is north locally.
        assert!(!w.attempt(&South.dir()));
        assert_eq!(*w.orientation(), matrix![1, 0, 3; 0, -1, 0; 0, 0, 1]);
        assert_eq!(w.go(South).0, VertexId(0));
        assert_eq!(*w.orientation(), matrix![1, 0, 3; 0, -1, 1; 0, 0, 1]);
        assert!(w.attempt(&East.dir()));
        assert_eq!(w.vertex(), VertexId(1));
    }

    #[test]
    fn torus_translations_accumulate() {
        let t = presets::torus(3, 2).unwrap();
        let mut w = Walker::new(VertexId(0), &t);
        w.go_all(&[East, South, West, North]);
        assert_eq!(w.state(), WalkState::origin(VertexId(0)));

        w.go_all(&[East; 3]);
        assert_eq!(w.vertex(), VertexId(0));
        assert_eq!(*w.orientation(), matrix![1, 0, 3; 0, 1, 0; 0, 0, 1]);

        let mut w = Walker::new(VertexId(4), &t);
        w.go_all(&[South, South]);
        assert_eq!(w.vertex(), VertexId(4));
        assert_eq!(*w.orientation(), matrix![1, 0, 0; 0, 1, 2; 0, 0, 1]);
    }

    #[test]
    fn restore_rewinds() {
        let cube = presets::cube().unwrap();
        let mut w = Walker::new(VertexId(0), &cube);
        w.go(East);
        let mark = w.state();
        w.go_all(&[South, South, West]);
        assert_ne!(w.state(), mark);
        w.restore(mark);
        assert_eq!(w.state(), mark);
        assert_eq!(w.go(West).0, VertexId(0));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn start_outside_mesh_panics() {
        let cube = presets::cube().unwrap();
        let _ = Walker::new(VertexId(6), &cube);
    }

    #[test]
    #[should_panic(expected = "not a cardinal direction")]
    fn diagonal_direction_panics() {
        let cube = presets::cube().unwrap();
        let mut w = Walker::new(VertexId(0), &cube);
        w.to(&nalgebra::vector![1, 1, 0]);
    }

    #[test]
    fn walkers_share_a_mesh_across_threads() {
        let cube = presets::cube().unwrap();
        let finals: Vec<WalkState<3>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4u64)
                .map(|seed| {
                    let cube = &cube;
                    scope.spawn(move || {
                        let mut rng = StdRng::seed_from_u64(seed);
                        let mut w = Walker::new(VertexId(0), cube);
                        w.walk(random_directions::<3, _>(&mut rng, 500));
                        w.state()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for (seed, state) in finals.into_iter().enumerate() {
            let mut rng = StdRng::seed_from_u64(seed as u64);
            let mut w = Walker::new(VertexId(0), &cube);
            w.walk(random_directions::<3, _>(&mut rng, 500));
            assert_eq!(w.state(), state);
        }
    }

    #[test]
    fn four_dimensional_round_trip() {
        let t = presets::cubic_torus(2, 2, 2).unwrap();
        let group = Group::<4>::signed_permutations();
        let mut w = Walker::new(VertexId(0), &t);
        for d in cardinals::<4>() {
            let start = w.state();
            w.to(&d);
            w.to(&-d);
            assert_eq!(w.state(), start);
            assert!(group.contains_linear(w.orientation()));
        }
    }

    /// Three vertices in 3-D: 0 --(+z, swap x/y)--> 1 --(+x, swap y/z)--> 2.
    fn twisted_chain() -> Mesh<4> {
        let group = Group::<4>::signed_permutations();
        let swap_xy: Frame<4> = matrix![0, 1, 0, 0; 1, 0, 0, 0; 0, 0, 1, 0; 0, 0, 0, 1];
        let swap_yz: Frame<4> = matrix![1, 0, 0, 0; 0, 0, 1, 0; 0, 1, 0, 0; 0, 0, 0, 1];
        let layout = [
            LayoutEntry::new(0, 1, 4, group.index_of(&swap_xy).unwrap()),
            LayoutEntry::new(1, 2, 0, group.index_of(&swap_yz).unwrap()),
        ];
        build_in(3, &group, &layout, BuildCfg::default()).unwrap()
    }

    /// Undo the step just taken from `before` through its `slot`.
    fn step_back<const M: usize>(w: &mut Walker<'_, M>, before: &WalkState<M>, slot: Slot) {
        let back = w.mesh().back_slot(before.vertex(), slot).unwrap();
        let dir = w.dir_through(back);
        w.to(&dir);
    }

    #[test]
    fn dir_through_inverts_local_slot() {
        let mesh = twisted_chain();
        let mut w = Walker::new(VertexId(0), &mesh);
        w.to(&vector![0, 0, 1, 0]);
        w.to(&vector![0, 1, 0, 0]);
        for d in cardinals::<4>() {
            assert_eq!(w.dir_through(w.local_slot(&d)), d);
        }
    }

    #[test]
    fn permuting_relations_return_through_the_back_slot() {
        let mesh = twisted_chain();
        let mut w = Walker::new(VertexId(0), &mesh);
        let at0 = w.state();

        // +z crosses the swap(x, y) edge; +y is then local +x at vertex 1.
        let slot = w.local_slot(&vector![0, 0, 1, 0]);
        assert_eq!(slot, Slot(4));
        w.to(&vector![0, 0, 1, 0]);
        let at1 = w.state();
        assert_eq!(at1.vertex(), VertexId(1));
        assert_eq!(
            *at1.orientation(),
            matrix![0, 1, 0, 0; 1, 0, 0, 0; 0, 0, 1, 1; 0, 0, 0, 1]
        );
        assert_eq!(w.local_slot(&vector![0, 1, 0, 0]), Slot(0));
        w.to(&vector![0, 1, 0, 0]);
        let at2 = w.state();
        assert_eq!(at2.vertex(), VertexId(2));
        assert_eq!(
            *at2.orientation(),
            matrix![0, 0, 1, 0; 1, 0, 0, 1; 0, 1, 0, 1; 0, 0, 0, 1]
        );

        // Negating the request points at -z locally, a wall at vertex 2.
        assert_eq!(w.local_slot(&vector![0, -1, 0, 0]), Slot(5));
        assert!(!w.attempt(&vector![0, -1, 0, 0]));

        // The way back leaves through slot 1 (-x), which the walker calls -z.
        assert_eq!(mesh.back_slot(VertexId(1), Slot(0)), Some(Slot(1)));
        let back = w.dir_through(Slot(1));
        assert_eq!(back, vector![0, 0, -1, 0]);
        w.to(&back);
        assert_eq!(w.state(), at1);
        step_back(&mut w, &at0, Slot(4));
        assert_eq!(w.state(), at0);
    }

    fn check_linked_returns<const M: usize>(mesh: &Mesh<M>, start: usize, seed: u64, len: usize) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut w = Walker::new(VertexId(start), mesh);
        for d in random_directions::<M, _>(&mut rng, len) {
            let before = w.state();
            let slot = w.local_slot(&d);
            if !w.attempt(&d) {
                continue;
            }
            let after = w.state();
            step_back(&mut w, &before, slot);
            assert_eq!(w.state(), before);
            w.restore(after);
        }
    }

    fn check_walks(mesh: &Mesh<3>, start: usize, seed: u64, len: usize) {
        let group = Group::dihedral_square();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut w = Walker::new(VertexId(start), mesh);
        for d in random_directions::<3, _>(&mut rng, len) {
            let before = w.state();
            w.to(&d);
            let after = w.state();
            // Linear part stays in the group.
            assert!(group.contains_linear(w.orientation()));
            assert!(group.index_of(&linear_part(w.orientation())).is_some());
            // Stepping back along the opposite direction undoes the step.
            w.to(&-d);
            assert_eq!(w.state(), before);
            w.restore(after);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

        #[test]
        fn cube_round_trips_and_closure(start in 0usize..6, seed in any::<u64>(), len in 0usize..40) {
            let cube = presets::cube().unwrap();
            check_walks(&cube, start, seed, len);
        }

        #[test]
        fn back_slot_returns_on_twisted_chain(start in 0usize..3, seed in any::<u64>(), len in 0usize..40) {
            check_linked_returns(&twisted_chain(), start, seed, len);
        }

        #[test]
        fn back_slot_returns_on_cube(start in 0usize..6, seed in any::<u64>()) {
            check_linked_returns(&presets::cube().unwrap(), start, seed, 24);
        }

        #[test]
        fn torus_round_trips_and_closure(w in 1usize..5, h in 1usize..5, seed in any::<u64>()) {
            let t = presets::torus(w, h).unwrap();
            check_walks(&t, (seed as usize) % (w * h), seed, 24);
        }
    }
}
