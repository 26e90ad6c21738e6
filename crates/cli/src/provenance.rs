//! Sidecar JSON written next to each walk trace.
//!
//! Records where the trace came from (commit, crate version, callsite, the
//! CLI parameters) and a short summary of where the walk ended, so a trace
//! directory can be scanned without re-reading every CSV.

use anyhow::{Context, Result};
use meshwalk::api::WalkState;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::io::format_frame;

/// Where a walk started, where it stopped and how far it got.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TraceSummary {
    pub steps: usize,
    pub start_vertex: usize,
    pub final_vertex: usize,
    pub final_orientation: String,
    /// Net displacement in the start frame.
    pub displacement: [i64; 2],
    /// Distinct vertices touched, start included.
    pub visited: usize,
}

impl TraceSummary {
    pub fn of(start: WalkState<3>, states: &[WalkState<3>]) -> Self {
        let last = states.last().copied().unwrap_or(start);
        let visited: BTreeSet<usize> = std::iter::once(&start)
            .chain(states)
            .map(|s| s.vertex().0)
            .collect();
        let o = last.orientation();
        Self {
            steps: states.len(),
            start_vertex: start.vertex().0,
            final_vertex: last.vertex().0,
            final_orientation: format_frame(o),
            displacement: [o[(0, 2)], o[(1, 2)]],
            visited: visited.len(),
        }
    }
}

/// Metadata recorded next to a trace.
pub struct Payload {
    pub params: Value,
    pub tag: Option<String>,
    pub trace: Option<TraceSummary>,
}

impl Payload {
    pub fn new(params: Value) -> Self {
        Self {
            params,
            tag: None,
            trace: None,
        }
    }
}

#[derive(Serialize)]
struct Callsite {
    file: &'static str,
    line: u32,
}

#[derive(Serialize)]
struct Sidecar<'a> {
    code_rev: String,
    version: &'static str,
    callsite: Callsite,
    tag: Option<&'a str>,
    params: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<&'a TraceSummary>,
    outputs: Vec<String>,
}

/// Write `<artifact>.provenance.json` and return its path.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let provenance_path = provenance_path(artifact);
    if let Some(parent) = provenance_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }

    let caller = Location::caller();
    let doc = Sidecar {
        code_rev: current_git_rev(),
        version: meshwalk::VERSION,
        callsite: Callsite {
            file: caller.file(),
            line: caller.line(),
        },
        tag: payload.tag.as_deref(),
        params: &payload.params,
        trace: payload.trace.as_ref(),
        outputs: vec![artifact.to_string_lossy().into_owned()],
    };
    fs::write(&provenance_path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", provenance_path.display()))?;
    tracing::debug!(path = %provenance_path.display(), "provenance");
    Ok(provenance_path)
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("trace"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`.
pub fn current_git_rev() -> String {
    if let Some(rev) = option_env!("GIT_COMMIT").filter(|s| !s.is_empty()) {
        return rev.to_string();
    }
    if let Ok(rev) = std::env::var("GIT_COMMIT") {
        if !rev.is_empty() {
            return rev;
        }
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
