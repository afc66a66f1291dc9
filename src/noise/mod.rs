use crate::math::{M2, V2};

const DOMAIN_WARP: M2 = M2::new(0.8, 0.6, -0.6, 0.8);
const OCTAVE_AMPLITUDES: [f64; 5] = [0.5, 0.25, 0.125, 0.0625, 0.015625];
const OCTAVE_SCALES: [f64; 4] = [2.02, 2.03, 2.01, 2.04];
const AMPLITUDE_SUM: f64 = 0.96875;

pub fn noise(p: V2) -> f64 {
    (1.5 * p.x).sin() * (1.5 * p.y).sin()
}

/// Five octaves of `noise`, rotated and rescaled between octaves, normalized to roughly [0, 1].
pub fn fbm6(p: V2) -> f64 {
    let mut p = p;
    let mut f = 0.;
    for (octave, amplitude) in OCTAVE_AMPLITUDES.iter().enumerate() {
        f += amplitude * (0.5 + 0.5 * noise(p));
        if let Some(scale) = OCTAVE_SCALES.get(octave) {
            p = (DOMAIN_WARP * p) * *scale;
        }
    }
    f / AMPLITUDE_SUM
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::v2;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn noise_is_separable_sine() {
        assert_eq!(noise(v2(0., 3.)), 0.);
        let p = v2(0.3, -1.1);
        assert_eq!(noise(p), (1.5f64 * 0.3).sin() * (1.5f64 * -1.1).sin());
    }

    #[test]
    fn fbm6_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let p = v2(rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0));
            assert_eq!(fbm6(p).to_bits(), fbm6(p).to_bits());
        }
    }

    #[test]
    fn fbm6_stays_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..2000 {
            let p = v2(rng.gen_range(-1e3..1e3), rng.gen_range(-1e3..1e3));
            let f = fbm6(p);
            assert!((0.0..=1.0).contains(&f), "fbm6({p:?}) = {f}");
        }
    }

    #[test]
    fn fbm6_at_origin() {
        // noise is zero on both axes, and the warp keeps the origin fixed
        assert!((fbm6(v2(0., 0.)) - 0.5).abs() < 1e-12);
    }
}
