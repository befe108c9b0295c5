//! Cloud layer floating above the world.
//!
//! Clouds are flat puffs laid out on a coarse lattice that extends past the world
//! edges. A fixed-seed noise field decides which lattice points get a puff and how
//! thick it is, so every world shares the same sky. The whole layer drifts along x
//! and jumps back once it has moved far enough.

use cgmath::Point3;
use log::debug;
use noise::NoiseFn;
use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::{
    generation::noise_field::NoiseField, grid::GridDimensions,
};

/// Cloud layer tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudSettings {
    /// Seed of the cloud noise and puff sizes, independent of the world seed.
    pub seed: u64,
    /// The lattice extends this far past every world edge.
    pub margin: i32,
    /// Distance between lattice points.
    pub spacing: i32,
    /// Input scale of the cloud noise.
    pub frequency: f64,
    /// A puff appears where the noise exceeds this.
    pub threshold: f64,
    /// A second, stacked puff appears where the noise exceeds this.
    pub thick_threshold: f64,
    /// Height of the lowest puffs above the build limit.
    pub altitude: f32,
    /// Vertical distance between stacked puffs.
    pub layer_spacing: f32,
    /// Smallest horizontal puff scale; up to one more is added at random.
    pub min_scale: f32,
    /// Drift along x in blocks per second.
    pub drift_speed: f32,
    /// Once the drift passes this, it restarts at the negated value.
    pub drift_wrap: f32,
}

impl Default for CloudSettings {
    fn default() -> Self {
        CloudSettings {
            seed: 42,
            margin: 10,
            spacing: 2,
            frequency: 0.04,
            threshold: 0.15,
            thick_threshold: 0.35,
            altitude: 8.0,
            layer_spacing: 0.5,
            min_scale: 2.0,
            drift_speed: 0.5,
            drift_wrap: 30.0,
        }
    }
}

/// One cloud puff, a flat box before scaling.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CloudPuff {
    /// Center of the puff, without the layer drift.
    pub position: Point3<f32>,
    /// Scale along x.
    pub scale_x: f32,
    /// Scale along z.
    pub scale_z: f32,
}

/// All puffs plus the current drift of the layer.
#[derive(Clone, Debug)]
pub struct CloudLayer {
    settings: CloudSettings,
    puffs: Vec<CloudPuff>,
    drift: f32,
}

impl CloudLayer {
    /// Lays out the clouds over a world of `dimensions`.
    pub fn generate(settings: CloudSettings, dimensions: GridDimensions) -> Self {
        let field = NoiseField::new(settings.seed);
        let mut rng = fastrand::Rng::with_seed(settings.seed);
        let step = settings.spacing.max(1) as usize;
        let base_y = dimensions.height as f32 + settings.altitude;
        let mut puffs = Vec::new();

        for x in (-settings.margin..dimensions.width as i32 + settings.margin).step_by(step) {
            for z in (-settings.margin..dimensions.depth as i32 + settings.margin).step_by(step) {
                let v = NoiseFn::<f64, 2>::get(
                    &field,
                    [x as f64 * settings.frequency, z as f64 * settings.frequency],
                );
                if v <= settings.threshold {
                    continue;
                }
                let thickness = if v > settings.thick_threshold { 2 } else { 1 };
                for t in 0..thickness {
                    puffs.push(CloudPuff {
                        position: Point3::new(
                            x as f32,
                            base_y + t as f32 * settings.layer_spacing,
                            z as f32,
                        ),
                        scale_x: settings.min_scale + rng.f32(),
                        scale_z: settings.min_scale + rng.f32(),
                    });
                }
            }
        }

        debug!("Generated {} cloud puffs", puffs.len());
        CloudLayer {
            settings,
            puffs,
            drift: 0.0,
        }
    }

    /// The puffs, positioned without drift.
    pub fn puffs(&self) -> &[CloudPuff] {
        &self.puffs
    }

    /// Current x offset of the whole layer.
    pub fn drift(&self) -> f32 {
        self.drift
    }

    /// Moves the layer along x, wrapping back once it goes too far.
    pub fn advance(&mut self, dt: f32) {
        self.drift += dt * self.settings.drift_speed;
        if self.drift > self.settings.drift_wrap {
            self.drift = -self.settings.drift_wrap;
        }
    }
}
