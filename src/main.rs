use anyhow::Context;
use backdrop::config::RenderConfig;
use backdrop::frame::{
    render_frame, CancellationToken, Clock, FixedStepClock, Frame, FrameDriver, Presenter,
    WallClock,
};
use backdrop::present::{save_png, PngSequence, PreviewServer};
use backdrop::scene::{Resolution, SceneState};
use clap::Parser;
use image::ImageBuffer;
use log::{info, warn};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with defaults for the options below
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Frames to present, 0 runs until the process is stopped
    #[arg(short, long)]
    frames: Option<u64>,

    #[arg(long)]
    fps: Option<f64>,

    /// Directory to write the frame sequence into
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Serve the latest frame over HTTP on this address
    #[arg(short, long)]
    serve: Option<SocketAddr>,

    #[arg(short, long)]
    threads: Option<usize>,

    /// Render one frame at this scene time and exit
    #[arg(long)]
    still: Option<f64>,

    #[arg(long, default_value = "out.png")]
    still_out: PathBuf,
}

impl Args {
    fn render_config(&self) -> anyhow::Result<RenderConfig> {
        let mut cfg = match &self.config {
            Some(path) => RenderConfig::load(path)?,
            None => RenderConfig::default(),
        };
        if let Some(width) = self.width {
            cfg.width = width;
        }
        if let Some(height) = self.height {
            cfg.height = height;
        }
        if let Some(frames) = self.frames {
            cfg.frames = frames;
        }
        if let Some(fps) = self.fps {
            cfg.fps = fps;
        }
        if self.out.is_some() {
            cfg.out = self.out.clone();
        }
        if self.serve.is_some() {
            cfg.serve = self.serve;
        }
        if self.threads.is_some() {
            cfg.threads = self.threads;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let args = Args::parse();
    let cfg = args.render_config()?;
    info!("configuration: {:?}", cfg);

    if let Some(threads) = cfg.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("building render thread pool")?;
    }

    let resolution = Resolution::clamped(cfg.width as i64, cfg.height as i64);

    if let Some(time) = args.still {
        let state = SceneState { time, resolution };
        let mut frame: Frame = ImageBuffer::new(resolution.width, resolution.height);
        let start = Instant::now();
        render_frame(&mut frame, &state);
        info!("render took {} s", start.elapsed().as_secs_f32());
        save_png(&frame, &args.still_out)?;
        info!("wrote {}", args.still_out.display());
        return Ok(());
    }

    if cfg.serve.is_some() {
        run(&cfg, resolution, WallClock::start())
    } else {
        // offline sequences advance a fixed step per frame
        run(&cfg, resolution, FixedStepClock::new(cfg.fps))
    }
}

fn run<C: Clock>(cfg: &RenderConfig, resolution: Resolution, clock: C) -> anyhow::Result<()> {
    let mut driver = FrameDriver::new(resolution, clock);
    let mut presenters: Vec<Box<dyn Presenter>> = Vec::new();
    if let Some(dir) = &cfg.out {
        presenters.push(Box::new(PngSequence::create(dir)?));
    }
    let pacing = match cfg.serve {
        Some(addr) => {
            presenters.push(Box::new(PreviewServer::start(addr, driver.resize_handle())?));
            Some(cfg.frame_interval()?)
        }
        None => None,
    };
    if presenters.is_empty() {
        warn!("no --out or --serve given, frames are rendered and discarded");
    }
    if cfg.frames == 0 && cfg.serve.is_none() {
        warn!("running without a frame limit, stop the process to end");
    }

    let cancel = CancellationToken::new();
    let start = Instant::now();
    let frames = driver.run(&mut presenters, &cancel, cfg.frames, pacing);
    info!(
        "presented {} frames in {} s",
        frames,
        start.elapsed().as_secs_f32()
    );
    Ok(())
}
