use std::time::Instant;

/// Source of elapsed seconds since the driver started. Read once per frame.
pub trait Clock {
    fn elapsed(&mut self) -> f64;
}

pub struct WallClock {
    start: Instant,
}

impl WallClock {
    pub fn start() -> Self {
        WallClock {
            start: Instant::now(),
        }
    }
}

impl Clock for WallClock {
    fn elapsed(&mut self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Advances by exactly `1 / fps` per read, starting at zero.
pub struct FixedStepClock {
    fps: f64,
    frame: u64,
}

impl FixedStepClock {
    pub fn new(fps: f64) -> Self {
        FixedStepClock { fps, frame: 0 }
    }
}

impl Clock for FixedStepClock {
    fn elapsed(&mut self) -> f64 {
        let t = self.frame as f64 / self.fps;
        self.frame += 1;
        t
    }
}
