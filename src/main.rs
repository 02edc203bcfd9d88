use std::path::Path;

use clap::Parser;
use glyphcam::camera::{CameraCapture, FrameSource, PatternSource};
use glyphcam::cli::{self, Args, Command};
use glyphcam::config::Config;
use glyphcam::event_loop;
use glyphcam::presenter::{TerminalGuard, TerminalPresenter};
use glyphcam::transcoder::Transcoder;

/// Send `log` output to a file so it doesn't tear the full-screen display.
fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Open the capture source, take over the terminal and run until quit.
async fn run(args: &Args, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    // Validate everything before touching the camera or terminal
    let settings = config.transcoder_settings()?;
    let fps = config.display_fps()?;
    let char_aspect = config.char_aspect()?;
    let camera_settings = config.camera_settings()?;

    let mut source: Box<dyn FrameSource> = if args.pattern {
        log::info!("Using synthetic test pattern");
        Box::new(PatternSource::new(camera_settings.resolution))
    } else {
        let mut camera = CameraCapture::open(camera_settings)?;
        camera.start()?;
        if let (Some(res), Some(cam_fps)) = (camera.actual_resolution(), camera.actual_fps()) {
            log::info!(
                "Capturing {}x{} @ {} fps, {}x{} glyph cells",
                res.width,
                res.height,
                cam_fps,
                res.width.div_ceil(settings.cell_size),
                res.height.div_ceil(settings.cell_size)
            );
        }
        Box::new(camera)
    };

    let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut guard = TerminalGuard::enter()?;
    let mut presenter =
        TerminalPresenter::new(std::io::stdout(), cols, rows, config.display.mirror)
            .with_char_aspect(char_aspect);
    let mut transcoder = Transcoder::new(settings);

    let result = event_loop::run(&mut transcoder, source.as_mut(), &mut presenter, fps).await;

    // Restore the terminal before any error is printed
    guard.exit()?;
    result?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Some(ref path) = args.log_file {
        if let Err(e) = init_logging(path) {
            eprintln!("Warning: cannot open log file '{}': {}", path.display(), e);
        }
    }

    let mut config = match Config::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    args.apply_to(&mut config);

    let result = match args.command {
        Some(Command::ListCameras) => cli::list_cameras().map_err(|e| e.to_string()),
        Some(Command::Config { ref action }) => {
            cli::handle_config_action(action.clone(), &config, args.config.as_deref())
        }
        None => run(&args, &config).await.map_err(|e| e.to_string()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
