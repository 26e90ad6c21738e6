use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use meshwalk::api::{
    build_in, cube, cubic_torus, grid, mobius, parse_moves, random_directions, torus, unfold,
    BuildCfg, Cardinal, Group, LayoutEntry, Limits, Mesh, Slot, VertexId, WalkState, Walker,
};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;
mod provenance;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Build orientation-labelled meshes and walk them")]
struct Cmd {
    /// Optional run tag; propagated to provenance sidecars and logs
    #[arg(long)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Print (or write as CSV) the neighbour and relation tables
    Table {
        #[command(flatten)]
        mesh: MeshArgs,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Walk a move list or a seeded random walk and trace every step
    Walk {
        #[command(flatten)]
        mesh: MeshArgs,
        #[arg(long, default_value_t = 0)]
        start: usize,
        /// Moves such as "e,s,w,n" or "eswn"
        #[arg(long, conflicts_with = "random")]
        moves: Option<String>,
        /// Number of random moves
        #[arg(long)]
        random: Option<usize>,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Trace CSV; a provenance sidecar is written next to it
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Unfold the neighbourhood of a vertex into a grid of vertex ids
    Unfold {
        #[command(flatten)]
        mesh: MeshArgs,
        #[arg(long, default_value_t = 0)]
        start: usize,
        #[arg(long, default_value_t = 2)]
        radius: usize,
    },
    /// Print a small provenance JSON block with preset summaries
    Report,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    Cube,
    Torus,
    Mobius,
    Grid,
}

#[derive(Args, Debug)]
struct MeshArgs {
    #[arg(long, value_enum, default_value_t = Preset::Cube)]
    mesh: Preset,
    #[arg(long, default_value_t = 4)]
    width: usize,
    #[arg(long, default_value_t = 4)]
    height: usize,
    /// Layout CSV (source,target,slot,relation) over the square group;
    /// overrides --mesh
    #[arg(long)]
    layout: Option<PathBuf>,
    /// Vertex count for --layout (default: largest id + 1)
    #[arg(long)]
    vertices: Option<usize>,
}

impl MeshArgs {
    fn build(&self) -> Result<Mesh<3>> {
        if let Some(path) = &self.layout {
            return load_layout_mesh(path, self.vertices);
        }
        let mesh = match self.mesh {
            Preset::Cube => cube()?,
            Preset::Torus => torus(self.width, self.height)?,
            Preset::Mobius => mobius(self.width)?,
            Preset::Grid => grid(self.width, self.height)?,
        };
        Ok(mesh)
    }

    fn describe(&self) -> serde_json::Value {
        match &self.layout {
            Some(path) => json!({ "layout": path.display().to_string(), "vertices": self.vertices }),
            None => json!({
                "mesh": format!("{:?}", self.mesh).to_lowercase(),
                "width": self.width,
                "height": self.height,
            }),
        }
    }
}

fn load_layout_mesh(path: &Path, vertices: Option<usize>) -> Result<Mesh<3>> {
    let layout = io::read_layout(path)?;
    let n = vertices.unwrap_or_else(|| {
        layout
            .iter()
            .map(|e: &LayoutEntry| e.source.0.max(e.target.0) + 1)
            .max()
            .unwrap_or(1)
    });
    tracing::info!(path = %path.display(), entries = layout.len(), vertices = n, "layout");
    build_in(n, &Group::dihedral_square(), &layout, BuildCfg::default())
        .with_context(|| format!("building mesh from {}", path.display()))
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Table { mesh, out } => table(&mesh, out.as_deref()),
        Action::Walk {
            mesh,
            start,
            moves,
            random,
            seed,
            out,
        } => walk(&mesh, start, moves, random, seed, out.as_deref(), cmd.tag),
        Action::Unfold {
            mesh,
            start,
            radius,
        } => unfold_cmd(&mesh, start, radius),
        Action::Report => report(cmd.tag),
    }
}

fn table(args: &MeshArgs, out: Option<&Path>) -> Result<()> {
    let mesh = args.build()?;
    tracing::info!(
        vertices = mesh.vertex_count(),
        closed = mesh.is_closed(),
        "table"
    );
    if let Some(out) = out {
        return io::write_tables(out, &mesh);
    }
    for i in 0..mesh.vertex_count() {
        for c in Cardinal::ALL {
            let v = VertexId(i);
            let s: Slot = c.slot();
            let marker = if mesh.is_linked(v, s) { "" } else { " (wall)" };
            println!(
                "{i} {c} {}  [{}]{marker}",
                mesh.neighbor(v, s).0,
                io::format_frame(mesh.relation(v, s))
            );
        }
    }
    Ok(())
}

fn walk(
    args: &MeshArgs,
    start: usize,
    moves: Option<String>,
    random: Option<usize>,
    seed: u64,
    out: Option<&Path>,
    tag: Option<String>,
) -> Result<()> {
    let mesh = args.build()?;
    if start >= mesh.vertex_count() {
        bail!(
            "start vertex {start} out of range (mesh has {} vertices)",
            mesh.vertex_count()
        );
    }
    let cardinals: Vec<Cardinal> = match (moves.as_deref(), random) {
        (Some(text), _) => parse_moves(text)?,
        (None, Some(count)) => {
            let mut rng = StdRng::seed_from_u64(seed);
            random_directions::<3, _>(&mut rng, count)
                .iter()
                .map(|d| Cardinal::from_slot(meshwalk::slot_of(d)))
                .collect::<Option<_>>()
                .context("random direction outside the square set")?
        }
        (None, None) => bail!("walk needs --moves or --random"),
    };
    tracing::info!(start, steps = cardinals.len(), seed, tag = ?tag, "walk");

    let mut walker = Walker::new(VertexId(start), &mesh);
    let origin = walker.state();
    let states = walker.go_all(&cardinals);
    let last = states.last().copied().unwrap_or(origin);
    println!(
        "vertex={} orientation=[{}]",
        last.vertex().0,
        io::format_frame(last.orientation())
    );

    if let Some(out) = out {
        let names: Vec<String> = cardinals.iter().map(|c| c.to_string()).collect();
        io::write_trace(out, origin, &names, &states)?;
        let mut payload = provenance::Payload::new(json!({
            "mesh": args.describe(),
            "start": start,
            "moves": moves,
            "random": random,
            "seed": seed,
        }));
        payload.tag = tag;
        payload.trace = Some(provenance::TraceSummary::of(origin, &states));
        let sidecar = provenance::write_sidecar(out, payload)?;
        tracing::info!(out = %out.display(), sidecar = %sidecar.display(), "trace written");
    }
    Ok(())
}

fn unfold_cmd(args: &MeshArgs, start: usize, radius: usize) -> Result<()> {
    let mesh = args.build()?;
    if start >= mesh.vertex_count() {
        bail!(
            "start vertex {start} out of range (mesh has {} vertices)",
            mesh.vertex_count()
        );
    }
    let view = unfold(&mesh, WalkState::origin(VertexId(start)), Limits::square(radius));
    tracing::info!(start, radius, cells = view.iter().count(), "unfold");
    let width = mesh.vertex_count().to_string().len();
    for row in view.vertex_rows() {
        let line: Vec<String> = row
            .iter()
            .map(|c| match c {
                Some(v) => format!("{v:>width$}"),
                None => format!("{:>width$}", "."),
            })
            .collect();
        println!("{}", line.join(" "));
    }
    Ok(())
}

#[derive(Serialize)]
struct MeshSummary {
    name: &'static str,
    dimension: usize,
    vertices: usize,
    linked_slots: usize,
    closed: bool,
}

impl MeshSummary {
    fn of<const M: usize>(name: &'static str, mesh: &Mesh<M>) -> Self {
        Self {
            name,
            dimension: M,
            vertices: mesh.vertex_count(),
            linked_slots: mesh.linked_edges().count(),
            closed: mesh.is_closed(),
        }
    }
}

fn report(tag: Option<String>) -> Result<()> {
    let summaries = vec![
        MeshSummary::of("cube", &cube()?),
        MeshSummary::of("torus_4x4", &torus(4, 4)?),
        MeshSummary::of("mobius_4", &mobius(4)?),
        MeshSummary::of("grid_4x4", &grid(4, 4)?),
        MeshSummary::of("cubic_torus_2x2x2", &cubic_torus(2, 2, 2)?),
    ];
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "version": meshwalk::VERSION,
        "tag": tag,
        "params": {},
        "presets": serde_json::to_value(&summaries)?,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn args(mesh: Preset) -> MeshArgs {
        MeshArgs {
            mesh,
            width: 3,
            height: 2,
            layout: None,
            vertices: None,
        }
    }

    #[test]
    fn presets_build_from_args() {
        assert_eq!(args(Preset::Cube).build().unwrap().vertex_count(), 6);
        assert_eq!(args(Preset::Torus).build().unwrap().vertex_count(), 6);
        assert_eq!(args(Preset::Mobius).build().unwrap().vertex_count(), 3);
        assert!(!args(Preset::Grid).build().unwrap().is_closed());
    }

    #[test]
    fn layout_file_overrides_preset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ring.csv");
        fs::write(&path, "source,target,slot,relation\n0,1,0,0\n1,2,0,0\n2,0,0,2\n").unwrap();
        let mut a = args(Preset::Cube);
        a.layout = Some(path);
        let mesh = a.build().unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh, mobius(3).unwrap());
    }

    #[test]
    fn conflicting_layout_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "source,target,slot,relation\n0,1,0,0\n0,2,0,0\n").unwrap();
        let err = load_layout_mesh(&path, None).unwrap_err();
        assert!(format!("{err:#}").contains("conflicting edge"));
    }

    #[test]
    fn walk_writes_trace_and_sidecar() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("walk.csv");
        walk(
            &args(Preset::Cube),
            0,
            Some("eswn".into()),
            None,
            0,
            Some(out.as_path()),
            Some("t1".into()),
        )
        .unwrap();
        assert!(out.exists());
        let sidecar = dir.path().join("walk.provenance.json");
        let parsed: serde_json::Value =
            serde_json::from_slice(&fs::read(sidecar).unwrap()).unwrap();
        assert_eq!(parsed["tag"], "t1");
        assert_eq!(parsed["params"]["moves"], "eswn");
        // The face loop closes back on the start vertex.
        assert_eq!(parsed["trace"]["steps"], 4);
        assert_eq!(parsed["trace"]["final_vertex"], 0);
        assert_eq!(parsed["trace"]["final_orientation"], "1 0 0;0 1 0;0 0 1");
        assert_eq!(parsed["trace"]["visited"], 4);
    }

    #[test]
    fn walk_rejects_bad_start() {
        let err = walk(&args(Preset::Cube), 9, Some("e".into()), None, 0, None, None).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
