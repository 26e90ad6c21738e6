//! Cube walk probe.
//!
//! Purpose
//! - Reproducible data point for "how fast does a walker move on the cube, and
//!   how are the final states distributed?"
//!
//! Why this shape
//! - One seeded random walk per start face so runs are comparable across
//!   machines; the tally of final orientations shows how often each of the
//!   eight square symmetries is reached.

use std::collections::BTreeMap;
use std::time::Instant;

use meshwalk::api::{cube, linear_part, random_directions, Group, VertexId, Walker};
use rand::{rngs::StdRng, SeedableRng};

fn main() {
    let mesh = cube().expect("cube layout is consistent");
    let d4 = Group::dihedral_square();
    let steps = 100_000;

    let mut tally: BTreeMap<usize, usize> = BTreeMap::new();
    let start = Instant::now();
    for face in 0..mesh.vertex_count() {
        let mut rng = StdRng::seed_from_u64(face as u64);
        let mut w = Walker::new(VertexId(face), &mesh);
        for (i, d) in random_directions::<3, _>(&mut rng, steps).iter().enumerate() {
            w.to(d);
            if i % 1_000 == 999 {
                let k = d4
                    .index_of(&linear_part(w.orientation()))
                    .expect("orientation stays in the group");
                *tally.entry(k).or_default() += 1;
            }
        }
    }
    let elapsed = start.elapsed().as_secs_f64() * 1e3;

    println!(
        "mesh=cube faces={} steps_per_face={steps}",
        mesh.vertex_count()
    );
    for (k, count) in &tally {
        println!("orientation={k} samples={count}");
    }
    println!("walk_time_ms={elapsed:.3}");
}
