//! BriLux CLI
//!
//! Inspect showcase models, print the page animation plan and simulate
//! scrolling through the landing page.

use anyhow::{Context, Result};
use brilux_animation::{presets, StaggerGroup};
use brilux_site::{rounded_mask_uri, LandingPage, SiteConfig, CONFIG_FILE};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod inspect;
mod simulate;

#[derive(Parser)]
#[command(name = "brilux")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "BriLux landing page tools", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding brilux.toml
    #[arg(short, long, global = true, default_value = ".")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the showcase model and report its geometry and placement
    Inspect {
        /// Model path, overriding the configured one
        model: Option<String>,

        /// Material library for obj models
        #[arg(short, long)]
        material: Option<String>,

        /// Format tag (obj, fbx)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Print the showcase room: lights, floor and camera
    Showcase,

    /// Print the animation plan of the landing page
    Plan,

    /// Print stagger delays
    Stagger {
        /// Number of children
        #[arg(default_value = "6")]
        count: usize,

        /// Delay before the first child, in seconds
        #[arg(long)]
        initial: Option<f32>,

        /// Delay between children, in seconds
        #[arg(long)]
        step: Option<f32>,
    },

    /// Report navbar state and section ratios at a scroll offset
    Scroll {
        /// Scroll offset in pixels
        y: f32,

        #[arg(long, default_value = "1280")]
        width: f32,

        #[arg(long, default_value = "800")]
        height: f32,
    },

    /// Navigate to a section and report where the page settles
    Navigate {
        /// Section id (home, features, products, about, contact, ...)
        section: String,

        #[arg(long, default_value = "1280")]
        width: f32,

        #[arg(long, default_value = "800")]
        height: f32,
    },

    /// Print the rounded SVG mask for an element size
    Mask { width: u32, height: u32 },

    /// Write a default brilux.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Inspect {
            model,
            material,
            format,
        } => cmd_inspect(&cli.dir, model, material, format),
        Commands::Showcase => print_json(&brilux_3d::ShowcaseScene::standard()),
        Commands::Plan => cmd_plan(&cli.dir),
        Commands::Stagger {
            count,
            initial,
            step,
        } => cmd_stagger(count, initial, step),
        Commands::Scroll { y, width, height } => {
            let config = load_config(&cli.dir)?;
            print_json(&simulate::scroll(&config, width, height, y)?)
        }
        Commands::Navigate {
            section,
            width,
            height,
        } => {
            let config = load_config(&cli.dir)?;
            print_json(&simulate::navigate(&config, width, height, &section)?)
        }
        Commands::Mask { width, height } => {
            println!("{}", rounded_mask_uri(width, height));
            Ok(())
        }
        Commands::Init { force } => cmd_init(&cli.dir, force),
    }
}

fn load_config(dir: &std::path::Path) -> Result<SiteConfig> {
    SiteConfig::load_from_dir(dir)
        .with_context(|| format!("failed to load configuration from {}", dir.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_inspect(
    dir: &std::path::Path,
    model: Option<String>,
    material: Option<String>,
    format: Option<String>,
) -> Result<()> {
    let mut settings = load_config(dir)?.showcase;
    if let Some(model) = model {
        settings.model = model;
        // A model given on the command line brings its own material
        settings.material = material;
    } else if material.is_some() {
        settings.material = material;
    }
    if let Some(format) = format {
        settings.format = format;
    }
    if settings.asset_root.is_relative() {
        settings.asset_root = dir.join(&settings.asset_root);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let report = runtime.block_on(inspect::inspect(&settings))?;
    print_json(&report)
}

fn cmd_plan(dir: &std::path::Path) -> Result<()> {
    let config = load_config(dir)?;
    let page = LandingPage::standard().with_trigger_margin(config.animation.trigger_margin);
    info!(nodes = page.node_count(), blocks = page.blocks.len(), "landing page plan");
    print_json(&page)
}

fn cmd_stagger(count: usize, initial: Option<f32>, step: Option<f32>) -> Result<()> {
    let group = match (initial, step) {
        (None, None) => presets::SECTION_STAGGER,
        (initial, step) => {
            let default = presets::SECTION_STAGGER;
            StaggerGroup::from_secs(
                initial.unwrap_or(default.initial_delay().as_secs_f32()),
                step.unwrap_or(default.increment().as_secs_f32()),
            )?
        }
    };

    for line in stagger_lines(group, count) {
        println!("{}", line);
    }
    Ok(())
}

/// One line per child, produced lazily
fn stagger_lines(group: StaggerGroup, count: usize) -> impl Iterator<Item = String> {
    (0..count).map(move |index| {
        format!("{:>3}  {:>6} ms", index, group.delay_for(index).as_millis())
    })
}

fn cmd_init(dir: &std::path::Path, force: bool) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let content = SiteConfig::default().to_toml_string()?;
    fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}
