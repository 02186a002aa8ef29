#![deny(unsafe_code)]
//! CLI binary for noisegraph.
//!
//! Subcommands:
//! - `render`: build a noise map from a recipe and write PNG output
//! - `list`: print available primitives, filters, gradients and projections

mod error;

use std::ops::ControlFlow;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use error::CliError;
use noisegraph_core::{GradientColor, HeightRange, Projection, Quality};
use noisegraph_presets::{FilterKind, PrimitiveKind, Recipe, Stage, TurbulenceSpec};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "noisegraph", about = "Coherent noise map builder and renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProjectionKind {
    Planar,
    Spherical,
    Cylindrical,
}

impl ProjectionKind {
    /// Default bounds for each projection.
    fn with_bounds(self, bounds: Option<&[f64]>, seamless: bool) -> Projection {
        let [a, b, c, d] = match (self, bounds) {
            (_, Some(&[a, b, c, d])) => [a, b, c, d],
            (ProjectionKind::Planar, _) => [2.0, 4.0, 2.0, 4.0],
            (ProjectionKind::Spherical, _) => [-90.0, 90.0, -180.0, 180.0],
            (ProjectionKind::Cylindrical, _) => [-180.0, 180.0, -10.0, 10.0],
        };
        match self {
            ProjectionKind::Planar => Projection::Planar {
                lower_x: a,
                upper_x: b,
                lower_y: c,
                upper_y: d,
                seamless,
            },
            ProjectionKind::Spherical => Projection::spherical(a, b, c, d),
            ProjectionKind::Cylindrical => Projection::cylindrical(a, b, c, d),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Build a noise map and render it to PNG.
    Render {
        /// Recipe JSON file; flags below override its fields.
        #[arg(long)]
        recipe: Option<PathBuf>,

        /// Primitive name (e.g. "improved_perlin").
        #[arg(long)]
        primitive: Option<String>,

        /// Fractal filter name (e.g. "ridged").
        #[arg(short, long)]
        filter: Option<String>,

        /// Interpolation quality (fast, standard, best).
        #[arg(short, long)]
        quality: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        seed: Option<i32>,

        /// Map width in pixels.
        #[arg(short = 'W', long)]
        width: Option<usize>,

        /// Map height in pixels.
        #[arg(short = 'H', long)]
        height: Option<usize>,

        #[arg(long, value_enum)]
        projection: Option<ProjectionKind>,

        /// Four comma separated bounds, in the projection's order.
        #[arg(long, value_delimiter = ',', num_args = 4, allow_hyphen_values = true)]
        bounds: Option<Vec<f64>>,

        /// Disable seamless tiling of planar maps.
        #[arg(long)]
        no_seamless: bool,

        /// Gradient name (grayscale, terrain, ocean, fire, earth, neon).
        #[arg(short, long)]
        gradient: Option<String>,

        /// Enable lighting.
        #[arg(long)]
        light: bool,

        /// Displace the input point with turbulence of this power.
        #[arg(long)]
        turbulence: Option<f64>,

        /// Module parameters as a JSON object, applied last.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,

        /// Also write a tangent-space normal map.
        #[arg(long)]
        normal_map: Option<PathBuf>,

        /// Also write a 16-bit heightmap fitted to the map's range.
        #[arg(long)]
        heightmap: Option<PathBuf>,

        /// Write the effective recipe as JSON.
        #[arg(long)]
        save_recipe: Option<PathBuf>,
    },
    /// List available primitives, filters, gradients and projections.
    List,
}

/// Options of `render` that shape the recipe.
struct RecipeArgs {
    recipe: Option<PathBuf>,
    primitive: Option<String>,
    filter: Option<String>,
    quality: Option<String>,
    seed: Option<i32>,
    width: Option<usize>,
    height: Option<usize>,
    projection: Option<ProjectionKind>,
    bounds: Option<Vec<f64>>,
    no_seamless: bool,
    gradient: Option<String>,
    light: bool,
    turbulence: Option<f64>,
    params: String,
}

fn load_recipe(args: RecipeArgs) -> Result<Recipe, CliError> {
    let mut recipe = match &args.recipe {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
            serde_json::from_str(&text)
                .map_err(|e| CliError::Input(format!("invalid recipe {}: {e}", path.display())))?
        }
        None => Recipe::default(),
    };
    if let Some(name) = &args.primitive {
        recipe.primitive = PrimitiveKind::from_name(name)?;
    }
    if let Some(name) = &args.filter {
        recipe.filter = FilterKind::from_name(name)?;
    }
    if let Some(name) = &args.quality {
        recipe.quality = name
            .parse::<Quality>()
            .map_err(|_| CliError::Input(format!("unknown quality: {name}")))?;
    }
    if let Some(seed) = args.seed {
        recipe.seed = seed;
    }
    if let Some(width) = args.width {
        recipe.width = width;
    }
    if let Some(height) = args.height {
        recipe.height = height;
    }
    if let Some(kind) = args.projection {
        recipe.projection = kind.with_bounds(args.bounds.as_deref(), !args.no_seamless);
    } else if let Some(bounds) = args.bounds.as_deref() {
        recipe.projection = match recipe.projection {
            Projection::Planar { seamless, .. } => {
                ProjectionKind::Planar.with_bounds(Some(bounds), seamless && !args.no_seamless)
            }
            Projection::Spherical { .. } => ProjectionKind::Spherical.with_bounds(Some(bounds), false),
            Projection::Cylindrical { .. } => {
                ProjectionKind::Cylindrical.with_bounds(Some(bounds), false)
            }
        };
    }
    if args.no_seamless {
        if let Projection::Planar { seamless, .. } = &mut recipe.projection {
            *seamless = false;
        }
    }
    if let Some(gradient) = args.gradient {
        recipe.gradient = gradient;
    }
    if args.light {
        recipe.light.enabled = true;
    }
    if let Some(power) = args.turbulence {
        recipe.turbulence = Some(TurbulenceSpec {
            power,
            ..recipe.turbulence.unwrap_or_default()
        });
    }
    let params: serde_json::Value = serde_json::from_str(&args.params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    let recipe = recipe.with_overrides(&params);
    recipe.validate()?;
    Ok(recipe)
}

/// Logs every tenth of the rows of each stage.
fn progress_logger(height: usize) -> impl FnMut(Stage, usize) -> ControlFlow<()> {
    let step = (height / 10).max(1);
    move |stage, row| {
        if (row + 1) % step == 0 || row + 1 == height {
            info!(?stage, percent = (row + 1) * 100 / height, "progress");
        }
        ControlFlow::Continue(())
    }
}

fn list(json: bool) -> Result<(), CliError> {
    let primitives = PrimitiveKind::list_names();
    let filters = FilterKind::list_names();
    let gradients = GradientColor::list_names();
    let projections = ["planar", "spherical", "cylindrical"];
    if json {
        let info = serde_json::json!({
            "primitives": primitives,
            "filters": filters,
            "gradients": gradients,
            "projections": projections,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Primitives:");
        for name in primitives {
            println!("  {name}");
        }
        println!("Filters:");
        for name in filters {
            println!("  {name}");
        }
        println!("Gradients:");
        println!("  {}", gradients.join(", "));
        println!("Projections:");
        println!("  {}", projections.join(", "));
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => list(cli.json)?,
        Command::Render {
            recipe,
            primitive,
            filter,
            quality,
            seed,
            width,
            height,
            projection,
            bounds,
            no_seamless,
            gradient,
            light,
            turbulence,
            params,
            output,
            normal_map,
            heightmap,
            save_recipe,
        } => {
            let recipe = load_recipe(RecipeArgs {
                recipe,
                primitive,
                filter,
                quality,
                seed,
                width,
                height,
                projection,
                bounds,
                no_seamless,
                gradient,
                light,
                turbulence,
                params,
            })?;
            info!(
                primitive = recipe.primitive.name(),
                filter = recipe.filter.name(),
                seed = recipe.seed,
                width = recipe.width,
                height = recipe.height,
                "rendering"
            );

            let rendered =
                noisegraph_presets::render_recipe(&recipe, progress_logger(recipe.height))?;
            noisegraph_presets::snapshot::write_png(&rendered.image, &output)?;

            let wrap = matches!(
                recipe.effective_projection(),
                Projection::Planar { seamless: true, .. }
            );
            if let Some(path) = &normal_map {
                let normals = noisegraph_presets::render_normal_map(
                    &rendered.map,
                    recipe.light.bump_height,
                    wrap,
                )?;
                noisegraph_presets::snapshot::write_png(&normals, path)?;
            }
            if let Some(path) = &heightmap {
                let heights =
                    noisegraph_presets::render_heightmap(&rendered.map, HeightRange::Exact)?;
                noisegraph_presets::snapshot::write_heightmap_png(&heights, path)?;
            }
            if let Some(path) = &save_recipe {
                std::fs::write(path, serde_json::to_string_pretty(&recipe)?)?;
            }

            let (lo, hi) = rendered.map.min_max().unwrap_or((0.0, 0.0));
            if cli.json {
                let info = serde_json::json!({
                    "recipe": recipe,
                    "min": lo,
                    "max": hi,
                    "output": output.display().to_string(),
                    "normal_map": normal_map.map(|p| p.display().to_string()),
                    "heightmap": heightmap.map(|p| p.display().to_string()),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {}/{} ({}x{}, seed {}, range {lo:.3}..{hi:.3}) -> {}",
                    recipe.primitive.name(),
                    recipe.filter.name(),
                    recipe.width,
                    recipe.height,
                    recipe.seed,
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
