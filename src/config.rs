//! Run configuration for the renderer binary.
//!
//! Only the outer surfaces are configurable here: viewport, frame count, pacing,
//! where frames go and how many threads render them. The scene itself is fixed.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MIN_FPS: f64 = 0.01;
const MAX_FPS: f64 = 1000.;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Frames to present before stopping. 0 runs until cancelled.
    pub frames: u64,
    pub fps: f64,
    /// Directory for the PNG sequence.
    pub out: Option<PathBuf>,
    /// Address of the preview server.
    pub serve: Option<SocketAddr>,
    /// Size of the render thread pool, rayon's default when unset.
    pub threads: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: 800,
            height: 600,
            frames: 0,
            fps: 30.,
            out: None,
            serve: None,
            threads: None,
        }
    }
}

impl RenderConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (MIN_FPS..=MAX_FPS).contains(&self.fps),
            "fps must be within {}..={}, got {}",
            MIN_FPS,
            MAX_FPS,
            self.fps
        );
        Ok(())
    }

    /// Time budget of one frame when pacing a live preview.
    pub fn frame_interval(&self) -> anyhow::Result<Duration> {
        self.validate()?;
        Duration::try_from_secs_f64(1. / self.fps).context("frame interval out of range")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: RenderConfig = serde_json::from_str(r#"{ "width": 320, "serve": "127.0.0.1:8080" }"#).unwrap();
        assert_eq!(cfg.width, 320);
        assert_eq!(cfg.height, 600);
        assert_eq!(cfg.serve, Some("127.0.0.1:8080".parse().unwrap()));
        assert_eq!(cfg.out, None);
    }

    #[test]
    fn fps_must_be_finite_and_bounded() {
        for fps in [0., -1., 1e-30, f64::INFINITY, f64::NAN, 1e9] {
            let cfg = RenderConfig {
                fps,
                ..Default::default()
            };
            assert!(cfg.validate().is_err(), "fps {fps} accepted");
            assert!(cfg.frame_interval().is_err());
        }
        let cfg = RenderConfig {
            fps: 50.,
            ..Default::default()
        };
        assert_eq!(cfg.frame_interval().unwrap(), Duration::from_millis(20));
    }

    #[test]
    fn load_reports_path_on_error() {
        let err = RenderConfig::load(Path::new("/nonexistent/backdrop.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/backdrop.json"));
    }
}
