//! IDTP demo: grid a synthetic survey of scattered spot heights
//!
//! Generates 2000 samples of a smooth hill on a 500 x 300 area, with a few
//! sentinel values (-9999) standing in for failed measurements, then:
//!   1. indexes them in a quadtree
//!   2. loads interpolation parameters from JSON
//!   3. grids them at the estimated sample resolution (coarsened 10x)
//!   4. prints grid statistics and an ASCII shaded preview
//!
//! Run:
//!   RUST_LOG=debug cargo run -p spatia-algorithms --example idtp_demo

use spatia_algorithms::interpolation::{
    estimate_resolution, grid_dimensions, idtp, DataTuple, IdtpParams, Quadtree, SpatialIndex,
};
use tracing_subscriber::{fmt, EnvFilter};

const SHADES: &[u8] = b" .:-=+*#%@";

fn hill(x: f64, y: f64) -> f64 {
    let dx = (x - 250.0) / 120.0;
    let dy = (y - 150.0) / 80.0;
    1200.0 + 400.0 * (-(dx * dx + dy * dy)).exp()
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let samples: Vec<DataTuple> = (0..2000)
        .map(|i| {
            let x = ((i * 7919) % 5003) as f64 / 10.006;
            let y = ((i * 104729) % 3001) as f64 / 10.003;
            let value = if i % 97 == 0 { -9999.0 } else { hill(x, y) };
            DataTuple::new(x, y, value)
        })
        .collect();

    let resolution = estimate_resolution(&samples).expect("samples are spread out");
    let index = Quadtree::from_items(samples).expect("non-empty sample set");
    let extent = index.root_bounding_box().expect("non-empty index");
    println!("Samples:    {}", index.len());
    println!("Extent:     {:.1} x {:.1}", extent.width(), extent.height());
    println!("Resolution: {resolution:.4}");

    let params: IdtpParams = serde_json::from_str(
        r#"{
            "power": 2.0,
            "min_data": 4,
            "max_data": 16,
            "no_value": -1.0,
            "radius_x": 10.0,
            "radius_y": 10.0,
            "radius_increase_x": 10.0,
            "radius_increase_y": 10.0,
            "ignore": [{ "min": -9999.0, "max": -9999.0 }],
            "snap_tolerance": 0.01
        }"#,
    )
    .expect("valid parameters");

    let (width, height) = grid_dimensions(&extent, resolution * 10.0).expect("valid grid");
    let (width, height) = (width.min(100), height.min(60));
    let grid = idtp(&index, width, height, params).expect("interpolation");

    let stats = grid.raster.statistics();
    println!("Grid:       {width} x {height}");
    println!("Snapped:    {}", grid.snapped_cells);
    println!("No value:   {}", grid.no_value_cells);
    println!(
        "Range:      {:.1} .. {:.1}",
        stats.min.unwrap_or(f32::NAN),
        stats.max.unwrap_or(f32::NAN)
    );
    println!();

    let (lo, hi) = (stats.min.unwrap_or(0.0), stats.max.unwrap_or(1.0));
    for row in grid.to_rows() {
        let line: String = row
            .iter()
            .map(|&v| {
                let t = ((v - lo) / (hi - lo).max(f32::EPSILON)).clamp(0.0, 1.0);
                SHADES[(t * (SHADES.len() - 1) as f32).round() as usize] as char
            })
            .collect();
        println!("{line}");
    }
}
