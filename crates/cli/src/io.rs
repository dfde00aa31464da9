//! Input parsing and JSON output shapes.

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use subdiv::api::{Dcel, VoronoiDiagram, Winding};
use subdiv::Vec2;

/// `{"vertices": [[x, y], ...], "edges": [[i, j], ...]}`
#[derive(Debug, Deserialize, Serialize)]
pub struct GraphInput {
    pub vertices: Vec<[f64; 2]>,
    pub edges: Vec<[usize; 2]>,
}

impl GraphInput {
    pub fn to_dcel(&self) -> Result<Dcel> {
        let pts: Vec<Vec2<f64>> = self
            .vertices
            .iter()
            .map(|&[x, y]| Vec2::new(x, y))
            .collect();
        let edges: Vec<(usize, usize)> = self.edges.iter().map(|&[a, b]| (a, b)).collect();
        Ok(Dcel::from_graph(&pts, &edges)?)
    }
}

pub fn read_graph(path: &Path) -> Result<GraphInput> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

/// Read the `x` and `y` columns of a CSV file as points.
pub fn read_sites(path: &Path) -> Result<Vec<Vec2<f64>>> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .finish()?
        .select([
            col("x").cast(DataType::Float64),
            col("y").cast(DataType::Float64),
        ])
        .collect()
        .with_context(|| format!("reading x,y columns of {}", path.display()))?;
    let xs = df.column("x")?.f64()?;
    let ys = df.column("y")?.f64()?;
    let mut sites = Vec::with_capacity(df.height());
    for (row, (x, y)) in xs.into_iter().zip(ys.into_iter()).enumerate() {
        match (x, y) {
            (Some(x), Some(y)) => sites.push(Vec2::new(x, y)),
            _ => bail!("row {row} of {} is missing x or y", path.display()),
        }
    }
    Ok(sites)
}

#[derive(Debug, Serialize)]
pub struct FaceSummary {
    pub index: usize,
    pub bounded: bool,
    pub area: f64,
    pub degree: usize,
    pub payload: Option<[f64; 2]>,
}

#[derive(Debug, Serialize)]
pub struct GraphSummary {
    pub vertices: usize,
    pub edges: usize,
    pub faces: Vec<FaceSummary>,
}

pub fn summarize(d: &Dcel) -> Result<GraphSummary> {
    let mut faces = Vec::with_capacity(d.num_faces());
    for (index, f) in d.face_ids().enumerate() {
        faces.push(FaceSummary {
            index,
            bounded: d.winding(f)? == Winding::CounterClockwise,
            area: d.signed_area(f)?,
            degree: d.degree(f)?,
            payload: d.payload(f)?.map(|p| [p.x, p.y]),
        });
    }
    Ok(GraphSummary {
        vertices: d.num_vertices(),
        edges: d.num_edges(),
        faces,
    })
}

#[derive(Debug, Serialize)]
pub struct CellOut {
    pub site: [f64; 2],
    pub polygon: Vec<[f64; 2]>,
    pub area: f64,
}

#[derive(Debug, Serialize)]
pub struct DiagramOut {
    pub frame: [[f64; 2]; 2],
    pub cells: Vec<CellOut>,
}

impl DiagramOut {
    pub fn from_diagram(vd: &VoronoiDiagram) -> Result<Self> {
        let (lo, hi) = vd.frame();
        let mut cells = Vec::new();
        for cell in vd.cells() {
            cells.push(CellOut {
                site: [cell.site.x, cell.site.y],
                polygon: cell.polygon.iter().map(|p| [p.x, p.y]).collect(),
                area: vd.dcel().signed_area(cell.face)?,
            });
        }
        Ok(Self {
            frame: [[lo.x, lo.y], [hi.x, hi.y]],
            cells,
        })
    }
}

/// Frame around `sites`: the bounding box scaled by `margin` about its center.
pub fn frame_for(sites: &[Vec2<f64>], margin: f64) -> Result<(Vec2<f64>, Vec2<f64>)> {
    let Some(first) = sites.first() else {
        bail!("no sites to frame");
    };
    let (mut lo, mut hi) = (*first, *first);
    for p in sites {
        lo = lo.inf(p);
        hi = hi.sup(p);
    }
    let center = (lo + hi) / 2.0;
    // Degenerate spans (one site, collinear sites) still get a unit box.
    let half = ((hi - lo) / 2.0).map(|h| h.max(0.5)) * margin.max(1.0);
    Ok((center - half, center + half))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))
}
