//! Build a small Voronoi diagram and print its cells.
//!
//! Usage:
//!   cargo run -p subdiv --example voronoi_sites -- [count] [seed]

use nalgebra::Vector2;
use subdiv::api::{draw_sites, SiteCfg, SiteReplay, VoronoiDiagram};

fn main() {
    let mut args = std::env::args().skip(1);
    let count = args.next().and_then(|s| s.parse().ok()).unwrap_or(9);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(2025);

    let cfg = SiteCfg {
        count,
        ..SiteCfg::default()
    };
    let Some(sites) = draw_sites(cfg, SiteReplay { seed, index: 0 }) else {
        eprintln!("usage: voronoi_sites [count] [seed]");
        return;
    };
    let vd = match VoronoiDiagram::from_sites(
        Vector2::new(-1.0, -1.0),
        Vector2::new(1.0, 1.0),
        &sites,
    ) {
        Ok(vd) => vd,
        Err(e) => {
            eprintln!("insertion failed: {e}");
            return;
        }
    };
    let d = vd.dcel();
    println!(
        "sites={} V={} E={} F={}",
        vd.sites().len(),
        d.num_vertices(),
        d.num_edges(),
        d.num_faces()
    );
    for cell in vd.cells() {
        let area = d.signed_area(cell.face).unwrap_or(f64::NAN);
        println!(
            "site=({:+.3}, {:+.3}) corners={} area={:.4}",
            cell.site.x,
            cell.site.y,
            cell.polygon.len(),
            area
        );
    }
}
