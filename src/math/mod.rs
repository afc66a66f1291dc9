use std::ops;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct V2 {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct V3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: V3,
    pub direction: V3,
}

/// 2x2 matrix stored as columns, so `m * p = p.x * v0 + p.y * v1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct M2 {
    pub v0: V2,
    pub v1: V2,
}

impl M2 {
    /// Column-major constructor: `(a, b)` is the first column, `(c, d)` the second.
    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> M2 {
        M2 {
            v0: V2 { x: a, y: b },
            v1: V2 { x: c, y: d },
        }
    }
}

impl V3 {
    pub fn xz(&self) -> V2 {
        v2(self.x, self.z)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

pub fn v2(x: f64, y: f64) -> V2 {
    V2 { x, y }
}

pub fn v(x: f64, y: f64, z: f64) -> V3 {
    V3 { x, y, z }
}

pub fn sub(x: &V3, y: &V3) -> V3 {
    V3 {
        x: x.x - y.x,
        y: x.y - y.y,
        z: x.z - y.z,
    }
}

pub fn add(x: &V3, y: &V3) -> V3 {
    V3 {
        x: x.x + y.x,
        y: x.y + y.y,
        z: x.z + y.z,
    }
}

pub fn mul(scalar: f64, x: &V3) -> V3 {
    V3 {
        x: x.x * scalar,
        y: x.y * scalar,
        z: x.z * scalar,
    }
}

pub fn dot(x: &V3, y: &V3) -> f64 {
    x.x * y.x + x.y * y.y + x.z * y.z
}

pub fn abs2(x: &V3) -> f64 {
    dot(x, x)
}

pub fn abs(x: &V3) -> f64 {
    abs2(x).sqrt()
}

pub fn dist(x: &V3, y: &V3) -> f64 {
    abs(&sub(x, y))
}

pub fn normalize(x: &V3) -> V3 {
    mul(1. / abs(x), x)
}

pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    x.max(lo).min(hi)
}

pub fn mix(a: f64, b: f64, t: f64) -> f64 {
    a * (1. - t) + b * t
}

/// Polynomial smooth minimum with blend width `k`.
pub fn smin(a: f64, b: f64, k: f64) -> f64 {
    let h = clamp(0.5 + 0.5 * (b - a) / k, 0., 1.);
    mix(b, a, h) - k * h * (1. - h)
}

/// Rotation by `angle`, laid out the way the shader builds `mat2(c, -s, s, c)`.
pub fn rot(angle: f64) -> M2 {
    let (s, c) = angle.sin_cos();
    M2::new(c, -s, s, c)
}

impl ops::Add<V2> for V2 {
    type Output = V2;

    fn add(self, rhs: V2) -> V2 {
        v2(self.x + rhs.x, self.y + rhs.y)
    }
}

impl ops::Sub<V2> for V2 {
    type Output = V2;

    fn sub(self, rhs: V2) -> V2 {
        v2(self.x - rhs.x, self.y - rhs.y)
    }
}

impl ops::Mul<f64> for V2 {
    type Output = V2;

    fn mul(self, rhs: f64) -> V2 {
        v2(self.x * rhs, self.y * rhs)
    }
}

impl ops::Mul<V2> for f64 {
    type Output = V2;

    fn mul(self, rhs: V2) -> V2 {
        rhs * self
    }
}

impl ops::Div<f64> for V2 {
    type Output = V2;

    fn div(self, rhs: f64) -> V2 {
        v2(self.x / rhs, self.y / rhs)
    }
}

impl ops::Mul<V2> for M2 {
    type Output = V2;

    fn mul(self, rhs: V2) -> V2 {
        rhs.x * self.v0 + rhs.y * self.v1
    }
}

impl ops::Add<V3> for V3 {
    type Output = V3;

    fn add(self, rhs: V3) -> V3 {
        add(&self, &rhs)
    }
}

impl ops::Sub<V3> for V3 {
    type Output = V3;

    fn sub(self, rhs: V3) -> V3 {
        sub(&self, &rhs)
    }
}

impl ops::Mul<V3> for f64 {
    type Output = V3;

    fn mul(self, rhs: V3) -> V3 {
        mul(self, &rhs)
    }
}

pub const O: V3 = V3 {
    x: 0.,
    y: 0.,
    z: 0.,
};
