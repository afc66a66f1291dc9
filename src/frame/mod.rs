use crate::marcher::{frag_coord, render_pixel};
use crate::scene::{Resolution, SceneState};
use image::{ImageBuffer, Rgb};
use log::{debug, error, info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

pub mod clock;

pub use clock::{Clock, FixedStepClock, WallClock};

/// Output surface: linear RGB in [0, 1], rows top-down.
pub type Frame = ImageBuffer<Rgb<f32>, Vec<f32>>;

pub trait Presenter {
    fn present(&mut self, frame: &Frame, state: &SceneState) -> anyhow::Result<()>;
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn present(&mut self, frame: &Frame, state: &SceneState) -> anyhow::Result<()> {
        (**self).present(frame, state)
    }
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn present(&mut self, frame: &Frame, state: &SceneState) -> anyhow::Result<()> {
        (**self).present(frame, state)
    }
}

/// Presents to every member even if an earlier one fails; reports the first failure.
impl<P: Presenter> Presenter for Vec<P> {
    fn present(&mut self, frame: &Frame, state: &SceneState) -> anyhow::Result<()> {
        let mut first_err = None;
        for p in self.iter_mut() {
            if let Err(e) = p.present(frame, state) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Queues viewport size changes from any thread. Only the latest request is kept,
/// and the driver picks it up between frames.
#[derive(Clone, Debug, Default)]
pub struct ResizeHandle(Arc<Mutex<Option<Resolution>>>);

impl ResizeHandle {
    pub fn request(&self, width: i64, height: i64) -> Resolution {
        let resolution = Resolution::clamped(width, height);
        if resolution.width as i64 != width || resolution.height as i64 != height {
            warn!(
                "resize to {}x{} clamped to {}x{}",
                width, height, resolution.width, resolution.height
            );
        }
        // poisoning leaves the slot intact
        let mut pending = self.0.lock().unwrap_or_else(|e| e.into_inner());
        *pending = Some(resolution);
        resolution
    }

    pub(crate) fn take(&self) -> Option<Resolution> {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).take()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DriverState {
    Initializing,
    Running,
    Resizing,
}

/// Renders every pixel of `frame` against one frozen snapshot.
pub fn render_frame(frame: &mut Frame, state: &SceneState) {
    let width = frame.width();
    let height = frame.height();
    debug_assert_eq!(width, state.resolution.width);
    debug_assert_eq!(height, state.resolution.height);
    frame
        .par_chunks_mut(3 * width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, p) in row.chunks_mut(3).enumerate() {
                let color = render_pixel(frag_coord(x as u32, y as u32, height), state);
                p[0] = color.r;
                p[1] = color.g;
                p[2] = color.b;
            }
        });
}

pub struct FrameDriver<C: Clock> {
    clock: C,
    state: SceneState,
    frame: Frame,
    driver_state: DriverState,
    resize: ResizeHandle,
    frames_presented: u64,
}

impl<C: Clock> FrameDriver<C> {
    pub fn new(resolution: Resolution, clock: C) -> Self {
        info!(
            "initializing frame driver at {}x{}",
            resolution.width, resolution.height
        );
        FrameDriver {
            clock,
            state: SceneState::new(resolution),
            frame: ImageBuffer::new(resolution.width, resolution.height),
            driver_state: DriverState::Initializing,
            resize: ResizeHandle::default(),
            frames_presented: 0,
        }
    }

    pub fn resize_handle(&self) -> ResizeHandle {
        self.resize.clone()
    }

    pub fn scene_state(&self) -> SceneState {
        self.state
    }

    pub fn driver_state(&self) -> DriverState {
        self.driver_state
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    fn apply_pending_resize(&mut self) {
        let Some(resolution) = self.resize.take() else {
            return;
        };
        if resolution == self.state.resolution {
            return;
        }
        self.driver_state = DriverState::Resizing;
        info!(
            "resizing {}x{} -> {}x{}",
            self.state.resolution.width,
            self.state.resolution.height,
            resolution.width,
            resolution.height
        );
        self.frame = ImageBuffer::new(resolution.width, resolution.height);
        self.state.resolution = resolution;
    }

    fn advance_clock(&mut self) {
        let elapsed = self.clock.elapsed();
        match SceneState::scaled_time(elapsed) {
            Some(time) => self.state.time = time,
            None => warn!(
                "ignoring non-finite elapsed time {}, keeping t={}",
                elapsed, self.state.time
            ),
        }
    }

    /// One tick: apply a pending resize, advance time, render and present.
    /// A failing presenter is logged and the frame still counts as presented.
    pub fn tick(&mut self, presenter: &mut impl Presenter) -> &Frame {
        self.apply_pending_resize();
        if self.driver_state != DriverState::Running {
            info!("frame driver running");
            self.driver_state = DriverState::Running;
        }
        self.advance_clock();
        let state = self.state;

        let start = Instant::now();
        render_frame(&mut self.frame, &state);
        debug!(
            "frame {} at t={:.3} rendered in {} ms",
            self.frames_presented,
            state.time,
            start.elapsed().as_millis()
        );

        if let Err(e) = presenter.present(&self.frame, &state) {
            error!("presenting frame {} failed: {:#}", self.frames_presented, e);
        }
        self.frames_presented += 1;
        &self.frame
    }

    /// Ticks until `cancel` fires or `max_frames` frames were presented (0 means no limit).
    /// With a `pacing` interval each tick is spread out to at most one per interval.
    pub fn run(
        &mut self,
        presenter: &mut impl Presenter,
        cancel: &CancellationToken,
        max_frames: u64,
        pacing: Option<Duration>,
    ) -> u64 {
        let mut presented = 0;
        while !cancel.is_cancelled() && (max_frames == 0 || presented < max_frames) {
            let tick_start = Instant::now();
            self.tick(presenter);
            presented += 1;
            if let Some(interval) = pacing {
                if let Some(rest) = interval.checked_sub(tick_start.elapsed()) {
                    thread::sleep(rest);
                }
            }
        }
        info!("frame driver stopped after {} frames", presented);
        presented
    }
}
