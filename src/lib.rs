pub mod camera;
pub mod config;
pub mod frame;
pub mod marcher;
pub mod math;
pub mod noise;
pub mod present;
pub mod scene;

pub use marcher::{render_pixel, Color};
pub use scene::{Resolution, SceneState};
