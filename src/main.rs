use std::process::exit;

use clap::Parser;
use log::{error, info};

use mirrortrace::config::{load_scene_config, SceneConfig};
use mirrortrace::output::{self, save_image, try_send_image_to_tev};

mod cli;
mod logger;

use cli::Args;
use logger::init_logger;

fn main() {
    let args = Args::parse();

    init_logger(args.debug_level.into());

    // Log application startup with version information
    info!("mirrortrace - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    let mut config = match &args.scene {
        Some(path) => {
            info!("Loading scene from {}", path.display());
            load_scene_config(path).unwrap_or_else(|e| {
                error!("Failed to load scene {}: {}", path.display(), e);
                exit(1);
            })
        }
        None => {
            info!("No scene file given, rendering the built-in scene");
            SceneConfig::default()
        }
    };
    if let Some(max_depth) = args.max_depth {
        config.camera.max_depth = max_depth;
    }

    let tracer = config.build_tracer().unwrap_or_else(|e| {
        error!("Invalid scene: {}", e);
        exit(1);
    });
    info!(
        "Image resolution: {}x{}, frame plane z = {}, {} surfaces, max depth {}",
        args.width,
        args.height,
        tracer.frame_z(),
        tracer.scene().len(),
        tracer.max_depth()
    );

    let image = if args.sequential {
        info!("Tracing pixels sequentially...");
        let samples = tracer.render(args.width, args.height);
        let frame = samples.frame();
        output::assemble(samples, frame)
    } else {
        tracer.render_image(args.width, args.height)
    };

    // Send image to TEV if requested
    if args.tev || args.tev_address.is_some() {
        let tev_address = args.tev_address.as_deref().unwrap_or("localhost:14158");
        try_send_image_to_tev(&image, tev_address);
    }

    if let Err(e) = save_image(&image, &args.output) {
        error!("Failed to save {}: {}", args.output.display(), e);
        exit(1);
    }
}
