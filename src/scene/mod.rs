use serde::Serialize;

/// Seconds of wall clock time are scaled by this before they reach the scene.
pub const TIME_SCALE: f64 = 0.5;

/// Largest accepted viewport side, in pixels.
pub const MAX_SIDE: u32 = 16384;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Builds a resolution from host supplied sizes, clamping each axis to `1..=MAX_SIDE`.
    pub fn clamped(width: i64, height: i64) -> Resolution {
        Resolution {
            width: width.clamp(1, MAX_SIDE as i64) as u32,
            height: height.clamp(1, MAX_SIDE as i64) as u32,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Everything a pixel evaluation may read. Frozen for the duration of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SceneState {
    pub time: f64,
    pub resolution: Resolution,
}

impl SceneState {
    pub fn new(resolution: Resolution) -> SceneState {
        SceneState {
            time: 0.,
            resolution,
        }
    }

    /// Scene time for `elapsed` wall clock seconds, or `None` if the value is unusable.
    pub fn scaled_time(elapsed: f64) -> Option<f64> {
        let time = elapsed * TIME_SCALE;
        time.is_finite().then_some(time)
    }
}
