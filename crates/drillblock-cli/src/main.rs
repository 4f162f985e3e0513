//! drillblock CLI - generate drill blocks, export meshes and CAD scripts.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use drillblock::{
    export_scene, generate, write_script, AppState, MeshFormat, MeshStore, ScriptTarget, Settings,
};
use tracing::debug;

mod watch;

#[derive(Parser)]
#[command(name = "drillblock")]
#[command(about = "Parametric drill-block generator", long_about = None)]
struct Cli {
    /// TOML settings file (mode, num_holes, batch_list, drill_radius, groove_depth, segments)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the merged mesh of every block
    Export {
        #[command(flatten)]
        params: ParamArgs,
        /// Mesh format
        #[arg(short, long, value_enum, default_value_t = FormatArg::Obj)]
        format: FormatArg,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Write a script that rebuilds the blocks in a CAD tool
    Script {
        #[command(flatten)]
        params: ParamArgs,
        /// Script target
        #[arg(short, long, value_enum, default_value_t = TargetArg::Rhino)]
        target: TargetArg,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Show the configuration and per-block statistics
    Info {
        #[command(flatten)]
        params: ParamArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Read key=value edits from stdin and regenerate after each quiet interval
    Watch {
        #[command(flatten)]
        params: ParamArgs,
    },
}

/// Parameter overrides, applied as text like form input.
#[derive(Args, Default)]
struct ParamArgs {
    /// single or batch
    #[arg(long)]
    mode: Option<String>,
    /// Hole levels in single mode
    #[arg(long)]
    holes: Option<String>,
    /// Comma-separated hole counts in batch mode
    #[arg(long)]
    batch: Option<String>,
    /// Drill radius
    #[arg(long)]
    radius: Option<String>,
    /// Groove depth (0 disables grooves)
    #[arg(long)]
    depth: Option<String>,
    /// Cylinder tessellation
    #[arg(long)]
    segments: Option<String>,
}

impl ParamArgs {
    fn raw_input(self) -> drillblock::RawInput {
        drillblock::RawInput {
            mode: self.mode,
            num_holes: self.holes,
            batch_list: self.batch,
            drill_radius: self.radius,
            groove_depth: self.depth,
            segments: self.segments,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Obj,
    Stl,
}

impl From<FormatArg> for MeshFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Obj => MeshFormat::Obj,
            FormatArg::Stl => MeshFormat::Stl,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TargetArg {
    Rhino,
    Openscad,
}

impl From<TargetArg> for ScriptTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Rhino => ScriptTarget::Rhino,
            TargetArg::Openscad => ScriptTarget::OpenScad,
        }
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            params,
            format,
            out_dir,
        } => {
            let settings = load_settings(cli.config.as_deref(), params)?;
            export_mesh(settings, format.into(), &out_dir)?;
        }
        Commands::Script {
            params,
            target,
            out_dir,
        } => {
            let settings = load_settings(cli.config.as_deref(), params)?;
            let path = write_script(&settings.configuration(), target.into(), &out_dir)?;
            println!("Wrote {}", path.display());
        }
        Commands::Info { params, json } => {
            let settings = load_settings(cli.config.as_deref(), params)?;
            show_info(&settings, json)?;
        }
        Commands::Watch { params } => {
            let settings = load_settings(cli.config.as_deref(), params)?;
            watch::run(settings)?;
        }
    }

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
fn init_logging() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(env_filter)
        .init();
}

/// Settings file (if any) with command-line overrides applied on top.
fn load_settings(path: Option<&Path>, params: ParamArgs) -> Result<Settings> {
    let mut settings = match path {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    settings.apply_input(&params.raw_input());
    debug!(?settings, "effective settings");
    Ok(settings)
}

fn export_mesh(settings: Settings, format: MeshFormat, out_dir: &Path) -> Result<()> {
    let mut state = AppState::new(settings);
    let report = state.regenerate(&mut MeshStore::new());
    let path = export_scene(&state.scene, format, out_dir)?;
    println!(
        "Exported {} block(s), {} triangles to {}",
        report.blocks,
        report.triangles,
        path.display()
    );
    Ok(())
}

fn show_info(settings: &Settings, json: bool) -> Result<()> {
    let config = settings.configuration();
    let stats: Vec<_> = generate(&config).iter().map(|b| b.stats()).collect();

    if json {
        let doc = serde_json::json!({
            "configuration": config,
            "blocks": stats,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("Mode: {:?}", config.mode);
    println!("Drill radius: {}", config.drill_radius);
    println!("Groove depth: {}", config.groove_depth);
    println!("Segments: {}", config.segments);
    println!();
    for s in &stats {
        println!(
            "Block {}: {} hole(s) at x={} | height {} | {} cutters | {} triangles | volume {:.2}",
            s.index, s.hole_count, s.offset_x, s.box_height, s.cutters, s.triangles, s.volume
        );
        if let Some((min, max)) = s.bounding_box {
            println!(
                "  bounds: [{:.2}, {:.2}, {:.2}] - [{:.2}, {:.2}, {:.2}]",
                min[0], min[1], min[2], max[0], max[1], max[2]
            );
        }
    }
    Ok(())
}
