//! # Noise Field Module
//!
//! Seeded 3-D gradient noise with the fractal helpers terrain, caves, trees and
//! clouds sample from.
//!
//! The permutation table is shuffled with a Lehmer generator so the same seed
//! always produces the same field, on every platform.

use noise::NoiseFn;
use serde::{Deserialize, Serialize};

/// Modulus of the Lehmer (Park–Miller) generator driving the shuffle.
const LEHMER_MODULUS: u64 = 2_147_483_647;
/// Multiplier of the Lehmer generator.
const LEHMER_MULTIPLIER: u64 = 16_807;

/// Parameters of one fractal Brownian motion sum.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FbmParams {
    /// Number of octaves summed. Zero is treated as one.
    pub octaves: u32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
}

impl FbmParams {
    /// Creates a new set of fBm parameters.
    pub const fn new(octaves: u32, lacunarity: f64, persistence: f64) -> Self {
        FbmParams {
            octaves,
            lacunarity,
            persistence,
        }
    }
}

impl Default for FbmParams {
    fn default() -> Self {
        FbmParams::new(4, 2.0, 0.5)
    }
}

/// A seeded gradient noise field.
///
/// # Examples
///
/// ```
/// use voxel_world::NoiseField;
///
/// let field = NoiseField::new(7);
/// let value = field.noise3(0.3, 1.7, 4.2);
/// assert_eq!(value, NoiseField::new(7).noise3(0.3, 1.7, 4.2));
/// assert_eq!(field.noise3(2.0, 5.0, 9.0), 0.0);
/// ```
#[derive(Clone)]
pub struct NoiseField {
    seed: u64,
    /// 256 shuffled entries repeated twice so corner lookups never wrap.
    perm: [u8; 512],
}

impl NoiseField {
    /// Builds the permutation table for `seed`.
    ///
    /// # Arguments
    /// * `seed` - Any value; it is reduced modulo the Lehmer modulus, and a zero
    ///   state is replaced by 1 because the generator would otherwise stay at zero
    pub fn new(seed: u64) -> Self {
        let mut p = [0u8; 256];
        for (i, slot) in p.iter_mut().enumerate() {
            *slot = i as u8;
        }

        let mut state = seed % LEHMER_MODULUS;
        if state == 0 {
            state = 1;
        }
        for i in (1..256usize).rev() {
            state = state * LEHMER_MULTIPLIER % LEHMER_MODULUS;
            let j = (state % (i as u64 + 1)) as usize;
            p.swap(i, j);
        }

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = p[i & 255];
        }

        NoiseField { seed, perm }
    }

    /// The seed this field was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    fn fade(t: f64) -> f64 {
        t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
    }

    #[inline]
    fn lerp(a: f64, b: f64, t: f64) -> f64 {
        a + t * (b - a)
    }

    #[inline]
    fn grad(hash: u8, x: f64, y: f64, z: f64) -> f64 {
        let h = hash & 15;
        let u = if h < 8 { x } else { y };
        let v = if h < 4 {
            y
        } else if h == 12 || h == 14 {
            x
        } else {
            z
        };
        let u = if h & 1 == 0 { u } else { -u };
        let v = if h & 2 == 0 { v } else { -v };
        u + v
    }

    /// Samples the field at a point.
    ///
    /// # Returns
    /// A value in roughly `[-1, 1]`, exactly `0` on every lattice point.
    pub fn noise3(&self, x: f64, y: f64, z: f64) -> f64 {
        let (fx, fy, fz) = (x.floor(), y.floor(), z.floor());
        let xi = (fx as i64 & 255) as usize;
        let yi = (fy as i64 & 255) as usize;
        let zi = (fz as i64 & 255) as usize;
        let (x, y, z) = (x - fx, y - fy, z - fz);
        let (u, v, w) = (Self::fade(x), Self::fade(y), Self::fade(z));

        let p = &self.perm;
        let a = p[xi] as usize + yi;
        let aa = p[a] as usize + zi;
        let ab = p[a + 1] as usize + zi;
        let b = p[xi + 1] as usize + yi;
        let ba = p[b] as usize + zi;
        let bb = p[b + 1] as usize + zi;

        Self::lerp(
            Self::lerp(
                Self::lerp(
                    Self::grad(p[aa], x, y, z),
                    Self::grad(p[ba], x - 1.0, y, z),
                    u,
                ),
                Self::lerp(
                    Self::grad(p[ab], x, y - 1.0, z),
                    Self::grad(p[bb], x - 1.0, y - 1.0, z),
                    u,
                ),
                v,
            ),
            Self::lerp(
                Self::lerp(
                    Self::grad(p[aa + 1], x, y, z - 1.0),
                    Self::grad(p[ba + 1], x - 1.0, y, z - 1.0),
                    u,
                ),
                Self::lerp(
                    Self::grad(p[ab + 1], x, y - 1.0, z - 1.0),
                    Self::grad(p[bb + 1], x - 1.0, y - 1.0, z - 1.0),
                    u,
                ),
                v,
            ),
            w,
        )
    }

    /// Fractal Brownian motion over the `y = 0` plane.
    ///
    /// Octave `i` samples at frequency `lacunarity^i` with amplitude
    /// `persistence^i`; the sum is divided by the total amplitude so the result
    /// keeps the range of a single sample.
    pub fn fbm(&self, x: f64, z: f64, params: FbmParams) -> f64 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut norm = 0.0;

        for _ in 0..params.octaves.max(1) {
            value += NoiseFn::<f64, 2>::get(self, [x * frequency, z * frequency]) * amplitude;
            norm += amplitude;
            amplitude *= params.persistence;
            frequency *= params.lacunarity;
        }

        if norm > 0.0 {
            value / norm
        } else {
            0.0
        }
    }

    /// Noise remapped to `[0, 1]` after scaling the input by `scale`.
    pub fn cave_density(&self, x: f64, y: f64, z: f64, scale: f64) -> f64 {
        (NoiseFn::<f64, 3>::get(self, [x * scale, y * scale, z * scale]) + 1.0) / 2.0
    }
}

impl NoiseFn<f64, 3> for NoiseField {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.noise3(point[0], point[1], point[2])
    }
}

impl NoiseFn<f64, 2> for NoiseField {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.noise3(point[0], 0.0, point[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn permutation_is_a_doubled_shuffle() {
        let field = NoiseField::new(12345);
        let mut seen = [false; 256];
        for &entry in &field.perm[..256] {
            seen[entry as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(&field.perm[..256], &field.perm[256..]);
    }

    #[test]
    fn zero_seed_matches_seed_one() {
        assert_eq!(NoiseField::new(0).perm, NoiseField::new(1).perm);
        assert_eq!(
            NoiseField::new(LEHMER_MODULUS).perm,
            NoiseField::new(1).perm
        );
    }

    #[test]
    fn different_seeds_shuffle_differently() {
        assert_ne!(NoiseField::new(1).perm, NoiseField::new(2).perm);
    }

    #[test]
    fn lattice_points_are_zero() {
        let field = NoiseField::new(99);
        for &(x, y, z) in &[(0.0, 0.0, 0.0), (3.0, -2.0, 7.0), (255.0, 1.0, 300.0)] {
            assert_abs_diff_eq!(field.noise3(x, y, z), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn samples_stay_in_range() {
        let field = NoiseField::new(2024);
        let mut rng = fastrand::Rng::with_seed(5);
        for _ in 0..2000 {
            let (x, y, z) = (
                rng.f64() * 512.0 - 256.0,
                rng.f64() * 64.0,
                rng.f64() * 512.0 - 256.0,
            );
            let n = field.noise3(x, y, z);
            assert!(n.abs() <= 1.1, "{n} out of range");
            let c = field.cave_density(x, y, z, 0.08);
            assert!((-0.05..=1.05).contains(&c));
            let f = field.fbm(x, z, FbmParams::new(5, 2.2, 0.45));
            assert!(f.abs() <= 1.1);
        }
    }

    #[test]
    fn single_octave_fbm_is_plain_noise() {
        let field = NoiseField::new(3);
        let expected = field.noise3(1.25, 0.0, 2.5);
        assert_abs_diff_eq!(
            field.fbm(1.25, 2.5, FbmParams::new(1, 2.0, 0.5)),
            expected,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            field.fbm(1.25, 2.5, FbmParams::new(0, 2.0, 0.5)),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn noise_fn_views_agree_with_noise3() {
        let field = NoiseField::new(8);
        let three: &dyn NoiseFn<f64, 3> = &field;
        let two: &dyn NoiseFn<f64, 2> = &field;
        assert_eq!(three.get([0.5, 1.5, 2.5]), field.noise3(0.5, 1.5, 2.5));
        assert_eq!(two.get([0.5, 2.5]), field.noise3(0.5, 0.0, 2.5));
    }

    #[test]
    fn cave_density_remaps_the_solid_view() {
        let field = NoiseField::new(31);
        for &(x, y, z) in &[(0.3, 4.0, 0.7), (12.25, 9.5, -4.5), (100.1, 2.2, 3.9)] {
            let raw = NoiseFn::<f64, 3>::get(&field, [x * 0.5, y * 0.5, z * 0.5]);
            assert_eq!(field.cave_density(x, y, z, 0.5), (raw + 1.0) / 2.0);
        }
    }
}
