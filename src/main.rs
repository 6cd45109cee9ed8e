use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;

use wireskin::config::{FileConfig, ShapeConfig};
use wireskin::input::read_wireframe;
use wireskin::mesh::{
    SkinMesh, stl::estimate_stl_size, validate_mesh, write_json, write_mesh_stl, write_obj,
};
use wireskin::skin::SkinBuilder;

/// Generate a closed tube mesh around a wireframe
///
/// Examples:
///   # Skin an OBJ polyline file with 0.1 pole radius
///   wireskin frame.obj --radius 0.1
///
///   # Thicker struts, creased seams, written as OBJ
///   wireskin frame.json --radius 0.2 --width 0.4 --crease 1.0 -o frame_skin.obj
///
///   # Size everything relative to edge length
///   wireskin lattice.obj --radius 0.05 --proportional-scale
///
///   # Use a config file
///   wireskin frame.obj --config my-shape.toml
#[derive(Parser, Debug)]
#[command(name = "wireskin")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input wireframe (.json, or .obj with `v` and `l` records)
    input: PathBuf,

    /// Output mesh path (defaults to {input}_skin.{format})
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format (defaults to the output extension, then stl)
    #[arg(short = 'f', long, value_enum)]
    format: Option<OutputFormat>,

    /// Path to config file (optional, auto-searches wireskin.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Profile width
    #[arg(long)]
    width: Option<f64>,

    /// Profile height (defaults to width)
    #[arg(long)]
    height: Option<f64>,

    /// Distance from a vertex to its profiles along each edge
    #[arg(long)]
    dist: Option<f64>,

    /// Pole length used when inside/outside radius are not given
    #[arg(short = 'r', long)]
    radius: Option<f64>,

    /// Inward pole length
    #[arg(long)]
    inside_radius: Option<f64>,

    /// Outward pole length
    #[arg(long)]
    outside_radius: Option<f64>,

    /// Crease value stamped on cap seams, 0 to 1
    #[arg(long)]
    crease: Option<f64>,

    /// Crease value for tube wall seams (defaults to --crease)
    #[arg(long)]
    connector_crease: Option<f64>,

    /// Offset the whole shell along the cap normals
    #[arg(long, allow_hyphen_values = true)]
    displace: Option<f64>,

    /// Scale poles and profiles by local edge length
    #[arg(long)]
    proportional_scale: bool,

    /// Verbose output (-v info, -vv debug)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Stl,
    Obj,
    Json,
}

impl OutputFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "stl" => Some(Self::Stl),
            "obj" => Some(Self::Obj),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Self::Stl => "stl",
            Self::Obj => "obj",
            Self::Json => "json",
        }
    }
}

impl Args {
    /// Apply command-line shape options on top of the file's `[shape]` table
    fn shape_config(&self, base: ShapeConfig) -> ShapeConfig {
        let mut shape = base;
        if let Some(width) = self.width {
            shape = shape.with_width(width);
        }
        if let Some(height) = self.height {
            shape = shape.with_height(height);
        }
        if let Some(dist) = self.dist {
            shape = shape.with_dist(dist);
        }
        if let Some(radius) = self.radius {
            shape = shape.with_radius(radius);
        }
        if let Some(radius) = self.inside_radius {
            shape = shape.with_inside_radius(radius);
        }
        if let Some(radius) = self.outside_radius {
            shape = shape.with_outside_radius(radius);
        }
        if let Some(crease) = self.crease {
            shape = shape.with_crease(crease);
        }
        if let Some(crease) = self.connector_crease {
            shape = shape.with_connector_crease(crease);
        }
        if let Some(displace) = self.displace {
            shape = shape.with_displace(displace);
        }
        if self.proportional_scale {
            shape = shape.with_proportional_scale(true);
        }
        shape
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = match args.config {
        Some(ref config_path) => {
            if !config_path.exists() {
                bail!("Config file not found: {}", config_path.display());
            }
            Some(FileConfig::from_path(config_path)?)
        }
        None => FileConfig::load(),
    };

    let verbosity = args.verbose.max(u8::from(
        file_config.as_ref().map(|c| c.verbose).unwrap_or(false),
    ));
    init_logging(verbosity);

    let shape = args.shape_config(
        file_config
            .as_ref()
            .and_then(|c| c.shape.clone())
            .unwrap_or_default(),
    );
    let output = args
        .output
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.output.clone()));

    let format = args
        .format
        .or_else(|| output.as_deref().and_then(OutputFormat::from_path))
        .unwrap_or(OutputFormat::Stl);
    let output_path = output.unwrap_or_else(|| default_output(&args.input, format));

    if output_path == args.input {
        bail!(
            "Output path {} would overwrite the input wireframe",
            output_path.display()
        );
    }

    println!("wireskin - Wireframe Skin Generator");
    println!("===================================");
    println!();

    if verbosity > 0 {
        println!("Configuration:");
        println!("  Input: {}", args.input.display());
        println!("  Output: {} ({:?})", output_path.display(), format);
        println!("  Shape: {:?}", shape);
        println!();
    }

    let spinner = create_spinner("Reading wireframe...");
    let start = Instant::now();
    let wireframe = read_wireframe(&args.input)
        .with_context(|| format!("Failed to read wireframe: {}", args.input.display()))?;
    spinner.finish_with_message(format!(
        "Read {} vertices, {} edges [{:.1}s]",
        wireframe.vertex_count(),
        wireframe.edge_count(),
        start.elapsed().as_secs_f32()
    ));

    let isolated = wireframe.degrees().iter().filter(|&&d| d == 0).count();
    if wireframe.edge_count() == 0 {
        println!("  Wireframe has no edges, the output mesh will be empty");
    } else if isolated > 0 {
        println!("  {} isolated vertices produce no geometry", isolated);
    }

    let spinner = create_spinner("Building skin...");
    let start = Instant::now();
    let mut builder = SkinBuilder::new(&wireframe, &shape).context("Invalid skin input")?;
    let mut mesh = SkinMesh::new();
    let report = builder
        .build_into(&mut mesh)
        .context("Failed to build skin")?;
    spinner.finish_with_message(format!(
        "Built {} caps, {} tubes: {} vertices, {} faces [{:.1}s]",
        report.caps,
        report.connectors,
        mesh.vertex_count(),
        mesh.face_count(),
        start.elapsed().as_secs_f32()
    ));

    if !report.warnings.is_empty() {
        println!(
            "  {} degenerate spots handled with fallbacks (use -v for details)",
            report.warnings.len()
        );
    }

    let validation = validate_mesh(&mesh);
    println!("  {}", validation.summary());
    if verbosity > 0 {
        for warning in &validation.warnings {
            println!("    {}", warning);
        }
    }

    let spinner = create_spinner("Writing mesh...");
    let start = Instant::now();
    let written = write_output(&output_path, format, &mesh)?;
    spinner.finish_with_message(format!(
        "Wrote {} [{:.1}s]",
        written,
        start.elapsed().as_secs_f32()
    ));

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );
    println!();
    println!("Output: {}", output_path.display());

    Ok(())
}

fn write_output(path: &Path, format: OutputFormat, mesh: &SkinMesh) -> Result<String> {
    match format {
        OutputFormat::Stl => {
            let triangles = write_mesh_stl(path, mesh).context("Failed to write STL file")?;
            Ok(format!(
                "{} triangles ({:.1} KB)",
                triangles,
                estimate_stl_size(triangles) as f64 / 1024.0
            ))
        }
        OutputFormat::Obj => {
            write_obj(path, mesh).context("Failed to write OBJ file")?;
            Ok(format!("{} faces", mesh.face_count()))
        }
        OutputFormat::Json => {
            write_json(path, mesh).context("Failed to write JSON file")?;
            Ok(format!(
                "{} faces, {} creases",
                mesh.face_count(),
                mesh.creases().count()
            ))
        }
    }
}

fn default_output(input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "wireframe".to_string());
    input.with_file_name(format!("{}_skin.{}", stem, format.extension()))
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
