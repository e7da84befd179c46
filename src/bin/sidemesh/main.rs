//! Sidemesh CLI - convert a gmsh triangle mesh into a solver side file.
//!
//! Usage: sidemesh [OPTIONS] <INPUT> <OUTPUT>
//!
//! Run `sidemesh --help` for available options.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use sidemesh::io;
use sidemesh::mesh::{BoundaryClasses, SideMesh, DEFAULT_TAGS};

#[derive(Parser)]
#[command(name = "sidemesh")]
#[command(author, version, about = "Build DG side connectivity from a gmsh triangle mesh", long_about = None)]
struct Cli {
    /// Input gmsh mesh file
    input: PathBuf,

    /// Output side file
    output: PathBuf,

    /// Boundary tags, in the order their side blocks are written
    #[arg(short, long, value_delimiter = ',', default_values_t = DEFAULT_TAGS)]
    tags: Vec<i64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: could not install logger: {}", e);
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let classes = BoundaryClasses::new(cli.tags)?;

    let start = Instant::now();
    let mesh: SideMesh = io::convert(&cli.input, &cli.output, &classes)?;
    let elapsed = start.elapsed();

    info!(
        elements = mesh.num_elements(),
        sides = mesh.num_sides(),
        boundary = mesh.num_boundary_sides(),
        interior = mesh.num_interior_sides(),
        "converted in {:.2?}",
        elapsed
    );
    println!("Saved: {} ({:.2?})", cli.output.display(), elapsed);

    Ok(())
}
