use crate::math::{normalize, rot, v, v2, Ray, V2};
use crate::scene::Resolution;

/// Downward pitch of the camera, in radians.
pub const TILT: f64 = 0.15;
const EYE_HEIGHT: f64 = 6.;
const EYE_DEPTH: f64 = -1.;

/// Centered coordinates scaled by the viewport height, so the aspect ratio is kept.
pub fn uv(frag: V2, resolution: Resolution) -> V2 {
    let size = v2(resolution.width as f64, resolution.height as f64);
    (frag - size * 0.5) / size.y
}

pub fn ray_for(frag: V2, resolution: Resolution) -> Ray {
    let uv = uv(frag, resolution);
    let origin = v(uv.x, uv.y + EYE_HEIGHT, EYE_DEPTH);
    let d = normalize(&v(uv.x, uv.y, 1.));
    let zy = rot(TILT) * v2(d.z, d.y);
    Ray {
        origin,
        direction: v(d.x, zy.y, zy.x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::abs;

    #[test]
    fn center_ray_is_tilted_forward() {
        let res = Resolution::clamped(800, 600);
        let ray = ray_for(v2(400., 300.), res);
        assert_eq!(ray.origin, v(0., 6., -1.));
        let expected = v(0., -TILT.sin(), TILT.cos());
        assert!(abs(&(ray.direction - expected)) < 1e-12);
    }

    #[test]
    fn directions_are_unit_length() {
        let res = Resolution::clamped(640, 360);
        for (x, y) in [(0.5, 0.5), (639.5, 359.5), (12., 300.), (320., 0.5)] {
            let ray = ray_for(v2(x, y), res);
            assert!((abs(&ray.direction) - 1.).abs() < 1e-12);
        }
    }

    #[test]
    fn uv_keeps_aspect_ratio() {
        let res = Resolution::clamped(200, 100);
        let corner = uv(v2(200., 100.), res);
        assert_eq!(corner, v2(1., 0.5));
    }

    #[test]
    fn single_pixel_viewport() {
        let res = Resolution::clamped(0, 0);
        let ray = ray_for(v2(0.5, 0.5), res);
        assert!(ray.direction.is_finite());
    }
}
