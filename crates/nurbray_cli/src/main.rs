//! `nurbray` - render one of the built-in demo scenes to an image file.

mod demos;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use nurbray_renderer::{render, render_facetted, render_hierarchy, RenderSettings, ScreenGeometry};

use demos::{Demo, SCENES};

const USAGE: &str = "Usage: nurbray <scene> [--out FILE] [--threads N] [--size WxH] [--fov DEG] \
[--config FILE] [--mesh FILE.obj]";

/// Command line options
#[derive(Debug, Clone, PartialEq)]
struct Options {
    scene: String,
    out: PathBuf,
    threads: usize,
    width: u32,
    height: u32,
    fov: f64,
    config: Option<PathBuf>,
    mesh: Option<PathBuf>,
}

fn parse_args<I>(args: I) -> Result<Options>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut scene = None;
    let mut out = None;
    let mut threads = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    let (mut width, mut height) = (512, 512);
    let mut fov = 30.0;
    let mut config = None;
    let mut mesh = None;

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .with_context(|| format!("{flag} needs a value\n{USAGE}"))
        };
        match arg.as_str() {
            "--out" => out = Some(PathBuf::from(value("--out")?)),
            "--threads" => {
                threads = value("--threads")?
                    .parse()
                    .context("--threads expects a positive integer")?;
            }
            "--size" => {
                let size = value("--size")?;
                let (w, h) = size
                    .split_once('x')
                    .with_context(|| format!("--size expects WxH, got '{size}'"))?;
                width = w.parse().context("Invalid width")?;
                height = h.parse().context("Invalid height")?;
            }
            "--fov" => fov = value("--fov")?.parse().context("--fov expects degrees")?,
            "--config" => config = Some(PathBuf::from(value("--config")?)),
            "--mesh" => mesh = Some(PathBuf::from(value("--mesh")?)),
            flag if flag.starts_with("--") => bail!("Unknown option {flag}\n{USAGE}"),
            name => {
                if scene.replace(name.to_string()).is_some() {
                    bail!("More than one scene given\n{USAGE}");
                }
            }
        }
    }

    let Some(scene) = scene else {
        bail!("No scene given, expected one of: {}\n{USAGE}", SCENES.join(", "));
    };
    if width == 0 || height == 0 {
        bail!("Image size must be positive");
    }
    let out = out.unwrap_or_else(|| PathBuf::from(format!("{scene}.ppm")));

    Ok(Options {
        scene,
        out,
        threads,
        width,
        height,
        fov,
        config,
        mesh,
    })
}

fn load_settings(path: &Path) -> Result<RenderSettings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid settings in {}", path.display()))
}

/// Logger reading its filter from `env`, at `info` when the variable is unset.
fn logger_builder(env: env_logger::Env) -> env_logger::Builder {
    env_logger::Builder::from_env(env.default_filter_or("info"))
}

fn main() -> Result<()> {
    logger_builder(env_logger::Env::default()).init();

    let options = parse_args(std::env::args().skip(1))?;
    let settings = match &options.config {
        Some(path) => load_settings(path)?,
        None => RenderSettings::default(),
    };
    if options.mesh.is_some() && options.scene != "facetted" {
        log::warn!("--mesh is only used by the facetted scene");
    }

    let screen = ScreenGeometry::new(options.width, options.height, options.fov);
    let demo = demos::build(&options.scene, screen, settings, options.mesh.as_deref())?;

    log::info!("Rendering '{}' on {} threads", options.scene, options.threads);
    let image = match &demo {
        Demo::Surfaces(scene) => render(scene, options.threads)?,
        Demo::Facetted(scene) => render_facetted(scene, options.threads)?,
        Demo::Hierarchy(scene) => render_hierarchy(scene, options.threads)?,
    };

    let is_png = options
        .out
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if is_png {
        image.save_png(&options.out)?;
    } else {
        image.write_ppm(&options.out)?;
    }
    log::info!("Wrote {}", options.out.display());

    Ok(())
}
