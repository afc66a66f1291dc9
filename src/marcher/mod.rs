use crate::camera;
use crate::math::{abs, clamp, dist, smin, sub, v, v2, Ray, V2, V3};
use crate::noise::fbm6;
use crate::scene::SceneState;

pub const MAX_STEPS: u32 = 256;
pub const EPS: f64 = 1e-3;

/// Fraction of the estimated distance taken per step.
const RELAXATION: f64 = 0.5;
const MAX_BRIGHTNESS: f64 = 0.9;

const SCROLL_SPEED: f64 = 5.5;
const PLANE_NOISE_FREQUENCY: f64 = 0.25;
const PLANE_NOISE_AMPLITUDE: f64 = 0.5;
const ENVELOPE_GAIN: f64 = 34.;
const ENVELOPE_EXPONENT: f64 = 2.5;
const ENVELOPE_SCALE: f64 = 0.0000125;

const BLEND: f64 = 5.25;

pub trait Renderable {
    fn sdf(&self, x: &V3, time: f64) -> f64;
}

pub struct Sphere {
    pub center: V3,
    pub radius: f64,
}

/// Ground plane pushed up by noise that grows towards the left and right edges
/// and scrolls towards the camera over time.
pub struct SwingPlane {
    pub base_height: f64,
}

pub struct SmoothUnion<A, B> {
    pub a: A,
    pub b: B,
    pub k: f64,
}

/// The landing scene: one swinging plane melted into one large sphere.
pub type Backdrop = SmoothUnion<SwingPlane, Sphere>;

pub const BACKDROP: Backdrop = SmoothUnion {
    a: SwingPlane { base_height: 0. },
    b: Sphere {
        center: V3 {
            x: 0.,
            y: -15.,
            z: 80.,
        },
        radius: 60.,
    },
    k: BLEND,
};

impl Renderable for Sphere {
    fn sdf(&self, x: &V3, _time: f64) -> f64 {
        abs(&sub(x, &self.center)) - self.radius
    }
}

impl SwingPlane {
    fn deformation(x: &V3) -> f64 {
        let def = fbm6(x.xz() * PLANE_NOISE_FREQUENCY) * PLANE_NOISE_AMPLITUDE;
        let envelope = (x.x.abs() * ENVELOPE_GAIN).powf(ENVELOPE_EXPONENT) * ENVELOPE_SCALE;
        let def = def * envelope;
        if def.is_finite() {
            def
        } else {
            0.
        }
    }
}

impl Renderable for SwingPlane {
    /// Only meaningful above the surface: anything below reports zero.
    fn sdf(&self, x: &V3, time: f64) -> f64 {
        let scrolled = v(x.x, x.y, x.z + time * SCROLL_SPEED);
        let surface = self.base_height + Self::deformation(&scrolled);
        (scrolled.y - surface).max(0.)
    }
}

impl<A: Renderable, B: Renderable> Renderable for SmoothUnion<A, B> {
    fn sdf(&self, x: &V3, time: f64) -> f64 {
        smin(self.a.sdf(x, time), self.b.sdf(x, time), self.k)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarchResult {
    pub position: V3,
    pub steps: u32,
    pub converged: bool,
    /// Distance from the ray origin to `position`. Not used for shading.
    pub travelled: f64,
}

pub fn march(r: &impl Renderable, ray: &Ray, time: f64) -> MarchResult {
    let mut position = ray.origin;
    let mut steps = 0;
    let mut converged = false;
    for _ in 0..MAX_STEPS {
        let d = r.sdf(&position, time);
        if !d.is_finite() {
            steps = MAX_STEPS;
            break;
        }
        if d < EPS {
            converged = true;
            break;
        }
        position = position + (d * RELAXATION) * ray.direction;
        steps += 1;
    }
    MarchResult {
        position,
        steps,
        converged,
        travelled: dist(&ray.origin, &position),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn gray(f: f32) -> Color {
        Color { r: f, g: f, b: f }
    }
}

/// Fog by iteration count: the more steps a ray needed, the brighter the pixel.
pub fn shade(result: &MarchResult) -> Color {
    let f = clamp(result.steps as f64 / MAX_STEPS as f64, 0., 1.) * MAX_BRIGHTNESS;
    Color::gray(f as f32)
}

/// Colour of the fragment at `frag` (bottom-left origin, pixel centres at +0.5).
pub fn render_pixel(frag: V2, state: &SceneState) -> Color {
    let ray = camera::ray_for(frag, state.resolution);
    shade(&march(&BACKDROP, &ray, state.time))
}

/// Fragment coordinate of the centre of image pixel `(x, y)`, rows counted top-down.
pub fn frag_coord(x: u32, y: u32, height: u32) -> V2 {
    v2(x as f64 + 0.5, height as f64 - y as f64 - 0.5)
}
