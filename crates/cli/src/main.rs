use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::time::Instant;
use subdiv::api::{sites_from_normalized, VoronoiDiagram, Winding};
use subdiv::Vec2;
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;
mod provenance;

#[derive(Parser)]
#[command(name = "subdiv")]
#[command(about = "Build, query, and refine planar subdivisions")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Build a subdivision from a graph JSON file and print a face summary
    Build {
        #[arg(long)]
        input: PathBuf,
        /// Also write the summary to this path
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the face containing a point
    Locate {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
    },
    /// Build a Voronoi diagram from the x,y columns of a CSV file
    Voronoi {
        #[arg(long)]
        sites: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Frame size relative to the bounding box of the sites
        #[arg(long, default_value_t = 1.2)]
        margin: f64,
        /// Scale each axis into [-1, 1] before inserting
        #[arg(long)]
        normalize: bool,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Build { input, out } => build(input, out),
        Action::Locate { input, x, y } => locate(input, x, y),
        Action::Voronoi {
            sites,
            out,
            margin,
            normalize,
        } => voronoi(sites, out, margin, normalize),
        Action::Report => report(),
    }
}

fn build(input: PathBuf, out: Option<PathBuf>) -> Result<()> {
    let started = Instant::now();
    let graph = io::read_graph(&input)?;
    let d = graph
        .to_dcel()
        .with_context(|| format!("building subdivision from {}", input.display()))?;
    d.validate().context("validating subdivision")?;
    tracing::info!(
        input = %input.display(),
        vertices = d.num_vertices(),
        edges = d.num_edges(),
        faces = d.num_faces(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "build"
    );
    let summary = io::summarize(&d)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    if let Some(out) = out {
        io::write_json(&out, &summary)?;
    }
    Ok(())
}

fn locate(input: PathBuf, x: f64, y: f64) -> Result<()> {
    let d = io::read_graph(&input)?.to_dcel()?;
    let p = Vec2::new(x, y);
    let face = d.locate(p)?.context("empty subdivision")?;
    let index = d.face_ids().position(|f| f == face).unwrap_or_default();
    let bounded = d.winding(face)? == Winding::CounterClockwise;
    tracing::info!(x, y, index, bounded, "locate");
    let obj = json!({
        "face": index,
        "bounded": bounded,
        "area": d.signed_area(face)?,
        "degree": d.degree(face)?,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn voronoi(sites_path: PathBuf, out: PathBuf, margin: f64, normalize: bool) -> Result<()> {
    let started = Instant::now();
    let mut sites = io::read_sites(&sites_path)?;
    if normalize {
        sites = sites_from_normalized(&sites);
    }
    tracing::info!(sites = sites.len(), normalize, margin, "voronoi_input");

    let (lo, hi) = io::frame_for(&sites, margin)?;
    let mut vd = VoronoiDiagram::new(lo, hi)?;
    for (i, &s) in sites.iter().enumerate() {
        vd.insert_site(s)
            .with_context(|| format!("inserting site {i} at ({}, {})", s.x, s.y))?;
    }
    vd.dcel().validate().context("validating diagram")?;
    tracing::info!(
        cells = vd.cells().len(),
        vertices = vd.dcel().num_vertices(),
        edges = vd.dcel().num_edges(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "voronoi_built"
    );

    io::write_json(&out, &io::DiagramOut::from_diagram(&vd)?)?;
    let payload = provenance::Payload::new(json!({
        "margin": margin,
        "normalize": normalize,
        "frame": [[lo.x, lo.y], [hi.x, hi.y]],
        "sites": sites.len(),
    }))
    .with_input(&sites_path);
    let sidecar = provenance::write_sidecar(&out, payload)?;
    tracing::info!(out = %out.display(), sidecar = %sidecar.display(), "wrote");
    Ok(())
}

fn report() -> Result<()> {
    let obj = provenance::block(json!({}), &[], &[]);
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
