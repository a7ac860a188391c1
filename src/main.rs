mod config;
mod mesh_io;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use meshpick_core::Hit;
use meshpick_picking::{resolve_vertex, unproject_in_mesh_explicit, MeshIntersector, VertexPick};
use serde::Serialize;
use tracing::info;

use crate::config::PickConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Pick a point or vertex on a mesh from a screen position", long_about = None)]
struct Args {
    /// Mesh file (.obj or .json)
    #[arg(short, long)]
    mesh: PathBuf,

    /// Camera/viewport/picking config (TOML); defaults to ./meshpick.toml if present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Window x coordinate in pixels
    #[arg(short, long, allow_negative_numbers = true)]
    x: f32,

    /// Window y coordinate in pixels (measured from the bottom unless --top-left)
    #[arg(short, long, allow_negative_numbers = true)]
    y: f32,

    /// Also snap the pick to the nearest mesh vertex
    #[arg(long)]
    vertex: bool,

    /// Treat --y as measured from the top of the viewport
    #[arg(long)]
    top_left: bool,

    /// Include the raw hit list in the output
    #[arg(long)]
    hits: bool,

    /// Write the effective config to this path before picking
    #[arg(long)]
    save_config: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct PickReport {
    /// Bottom-left window position the ray was shot through.
    screen: [f32; 2],
    hit_count: usize,
    point: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vertex: Option<Option<VertexPick>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hits: Option<Vec<Hit>>,
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("Starting meshpick v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => PickConfig::load_from_path(path),
        None => PickConfig::load(),
    };
    if let Some(path) = &args.save_config {
        config
            .save_to_path(path)
            .with_context(|| format!("failed to save config to {}", path.display()))?;
    }

    let mesh = mesh_io::load_mesh(&args.mesh)
        .with_context(|| format!("failed to load mesh {}", args.mesh.display()))?;
    info!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "mesh ready"
    );

    let camera = config
        .camera
        .to_camera()
        .state(config.viewport.to_viewport());
    let mut screen = Vec2::new(args.x, args.y);
    if args.top_left {
        screen = camera.viewport.flip_top_left(screen);
    }

    let intersector = MeshIntersector::with_options(mesh, config.picking.intersect_options());
    let mut hits = Vec::new();
    let pick = unproject_in_mesh_explicit(
        screen,
        &camera.view,
        &camera.proj,
        &camera.viewport,
        &intersector,
        &mut hits,
    );

    let vertex = args.vertex.then(|| {
        config
            .picking
            .vertex_hit
            .select(&hits)
            .and_then(|hit| resolve_vertex(hit, intersector.mesh()))
    });

    let report = PickReport {
        screen: screen.to_array(),
        hit_count: pick.hit_count,
        point: pick.point_as(),
        vertex,
        hits: args.hits.then_some(hits),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
