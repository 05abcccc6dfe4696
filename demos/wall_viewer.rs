//! Tile wall viewer
//!
//! Usage:
//!   wall_viewer [CONFIG.toml]                  open the wall in a window
//!   wall_viewer [CONFIG.toml] --still OUT.png  render one frame on the CPU
//!   wall_viewer [CONFIG.toml] --still OUT.png --gpu
//!                                              render it offscreen on the GPU
//!
//! Without a config file every `*.png`/`*.jpg` in the current directory is used,
//! up to the capacity of the default atlas.

use anyhow::Context;
use std::path::{Path, PathBuf};
use tile_wall::{
    app, atlas, config::ImageEntry, load_config, momentum, ClickSelection, TileWall, Viewport,
    WallConfig,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut config_path: Option<PathBuf> = None;
    let mut still_path: Option<PathBuf> = None;
    let mut gpu_still = false;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--gpu" {
            gpu_still = true;
        } else if arg == "--still" {
            still_path = Some(PathBuf::from(
                args.next().context("--still needs an output path")?,
            ));
        } else {
            config_path = Some(PathBuf::from(arg));
        }
    }

    let config = match &config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => discover_config(Path::new("."))?,
    };

    println!("[OK] {} images in catalog", config.images.len());

    if let Some(out) = still_path {
        let viewport = Viewport {
            width: config.window.width,
            height: config.window.height,
        };
        let view = momentum::init_view_state();
        let frame = if gpu_still {
            app::render_still_gpu(&config, &view, viewport)?
        } else {
            app::render_still(&config, &view, viewport)?
        };
        frame
            .save(&out)
            .with_context(|| format!("writing {}", out.display()))?;
        println!("[OK] Frame written to {}", out.display());
        return Ok(());
    }

    let wall = TileWall::new(config)?;
    wall.run(Box::new(|selection: &ClickSelection| {
        match &selection.link {
            Some(link) => println!("Open {} ({})", selection.image_id, link),
            None => println!("Selected {}", selection.image_id),
        }
    }))?;

    Ok(())
}

/// Default configuration over the images found in `dir`
fn discover_config(dir: &Path) -> anyhow::Result<WallConfig> {
    let mut config = WallConfig::default();
    let capacity = atlas::cell_capacity(&atlas::layout_from_config(&config.atlas));

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("png" | "jpg" | "jpeg")
            )
        })
        .collect();
    paths.sort();
    paths.truncate(capacity);

    anyhow::ensure!(!paths.is_empty(), "no images found in {}", dir.display());

    config.images = paths
        .into_iter()
        .map(|path| ImageEntry {
            path,
            id: None,
            link: None,
        })
        .collect();
    Ok(config)
}
