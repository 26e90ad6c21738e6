//! CSV surfaces: layout input, walk traces and table dumps.
//!
//! Layout CSV columns: `source,target,slot,relation` (non-negative integers,
//! header required). Relation ids index the square symmetry group.

use anyhow::{bail, Context, Result};
use meshwalk::api::{Frame, LayoutEntry, Mesh, Slot, VertexId, WalkState};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

const LAYOUT_COLUMNS: [&str; 4] = ["source", "target", "slot", "relation"];

/// Read a layout CSV in row order.
pub fn read_layout(path: &Path) -> Result<Vec<LayoutEntry>> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()
        .and_then(|lf| lf.collect())
        .with_context(|| format!("reading layout {}", path.display()))?;
    let mut columns = Vec::with_capacity(LAYOUT_COLUMNS.len());
    for name in LAYOUT_COLUMNS {
        let raw = df
            .column(name)
            .with_context(|| format!("layout {} lacks column {name:?}", path.display()))?;
        // A float column would truncate silently on the cast below.
        if !raw.dtype().is_integer() {
            bail!(
                "layout {} column {name:?} must hold integers, found {}",
                path.display(),
                raw.dtype()
            );
        }
        let series = raw.cast(&DataType::UInt64)?;
        let values: Vec<usize> = series
            .u64()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| match v {
                Some(v) => Ok(v as usize),
                None => bail!("layout {} row {row}: missing or negative {name}", path.display()),
            })
            .collect::<Result<_>>()?;
        columns.push(values);
    }
    let entries = (0..df.height())
        .map(|i| LayoutEntry::new(columns[0][i], columns[1][i], columns[2][i], columns[3][i]))
        .collect();
    Ok(entries)
}

/// One-line rendering of a frame, rows separated by `;`.
pub fn format_frame<const M: usize>(f: &Frame<M>) -> String {
    f.row_iter()
        .map(|row| {
            row.iter()
                .map(|x| x.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join(";")
}

fn write_csv(out: &Path, df: &mut DataFrame) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let mut file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    CsvWriter::new(&mut file)
        .finish(df)
        .with_context(|| format!("writing {}", out.display()))?;
    Ok(())
}

/// Walk trace: the start state as step 0, then one row per move.
pub fn write_trace(out: &Path, start: WalkState<3>, moves: &[String], states: &[WalkState<3>]) -> Result<()> {
    let all: Vec<&WalkState<3>> = std::iter::once(&start).chain(states).collect();
    let step: Vec<u32> = (0..all.len() as u32).collect();
    let mv: Vec<String> = std::iter::once(String::new())
        .chain(moves.iter().cloned())
        .collect();
    let vertex: Vec<u64> = all.iter().map(|s| s.vertex().0 as u64).collect();
    let dx: Vec<i64> = all.iter().map(|s| s.orientation()[(0, 2)]).collect();
    let dy: Vec<i64> = all.iter().map(|s| s.orientation()[(1, 2)]).collect();
    let orientation: Vec<String> = all.iter().map(|s| format_frame(s.orientation())).collect();
    let mut df = df!(
        "step" => step,
        "move" => mv,
        "vertex" => vertex,
        "dx" => dx,
        "dy" => dy,
        "orientation" => orientation,
    )?;
    write_csv(out, &mut df)
}

/// Neighbour and relation tables, one row per `(vertex, slot)`.
pub fn write_tables<const M: usize>(out: &Path, mesh: &Mesh<M>) -> Result<()> {
    let rows = mesh.vertex_count() * mesh.slot_count();
    let (mut vertex, mut slot, mut neighbor) = (
        Vec::with_capacity(rows),
        Vec::with_capacity(rows),
        Vec::with_capacity(rows),
    );
    let (mut linked, mut relation) = (Vec::with_capacity(rows), Vec::with_capacity(rows));
    for i in 0..mesh.vertex_count() {
        for s in 0..mesh.slot_count() {
            let (v, s) = (VertexId(i), Slot(s));
            vertex.push(i as u64);
            slot.push(s.0 as u32);
            neighbor.push(mesh.neighbor(v, s).0 as u64);
            linked.push(mesh.is_linked(v, s));
            relation.push(format_frame(mesh.relation(v, s)));
        }
    }
    let mut df = df!(
        "vertex" => vertex,
        "slot" => slot,
        "neighbor" => neighbor,
        "linked" => linked,
        "relation" => relation,
    )?;
    write_csv(out, &mut df)
}
