//! Sun and sky animation.
//!
//! A single accumulated `day_time` drives everything: the sun orbits the world
//! center in the x/y plane, and both its intensity and the sky color follow the
//! sine of its angle. Nothing else feeds back into the cycle.

use std::f32::consts::TAU;

use cgmath::Point3;
use serde::{Deserialize, Serialize};

/// Day cycle tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayCycleSettings {
    /// Radians of sun angle gained per second. The default gives a ~314 s day.
    pub speed: f32,
    /// Horizontal distance of the sun from the world center.
    pub orbit_radius: f32,
    /// Vertical amplitude of the sun's orbit.
    pub orbit_height: f32,
    /// Height of the orbit's center.
    pub orbit_offset: f32,
    /// Intensity never drops below this.
    pub min_intensity: f32,
    /// Sky color at full brightness, linear RGB.
    pub sky_color: [f32; 3],
    /// The sky never gets darker than this share of `sky_color`.
    pub min_sky_brightness: f32,
}

impl Default for DayCycleSettings {
    fn default() -> Self {
        DayCycleSettings {
            speed: 0.02,
            orbit_radius: 60.0,
            orbit_height: 50.0,
            orbit_offset: 20.0,
            min_intensity: 0.2,
            sky_color: [0.53, 0.81, 0.92],
            min_sky_brightness: 0.15,
        }
    }
}

/// Everything the renderer needs to light a frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SunState {
    /// Accumulated cycle time, already scaled by the cycle speed.
    pub day_time: f32,
    /// `day_time` wrapped to `[0, 2π)`.
    pub angle: f32,
    /// Position of the directional light.
    pub position: Point3<f32>,
    /// Light intensity.
    pub intensity: f32,
    /// Background and fog color, linear RGB.
    pub sky_color: [f32; 3],
}

/// Advances the sun over a world of a given footprint.
#[derive(Clone, Debug)]
pub struct DayCycle {
    settings: DayCycleSettings,
    center_x: f32,
    center_z: f32,
}

impl DayCycle {
    /// Creates a cycle orbiting the center of a `width × depth` world.
    pub fn new(settings: DayCycleSettings, width: usize, depth: usize) -> Self {
        DayCycle {
            settings,
            center_x: width as f32 / 2.0,
            center_z: depth as f32 / 2.0,
        }
    }

    /// The sun at a given accumulated `day_time`.
    pub fn evaluate(&self, day_time: f32) -> SunState {
        let s = &self.settings;
        let angle = day_time.rem_euclid(TAU);
        let (sin, cos) = angle.sin_cos();
        let brightness = ((sin + 1.0) / 2.0).max(s.min_sky_brightness);

        SunState {
            day_time,
            angle,
            position: Point3::new(
                self.center_x + cos * s.orbit_radius,
                sin * s.orbit_height + s.orbit_offset,
                self.center_z,
            ),
            intensity: (sin * 0.8 + 0.5).max(s.min_intensity),
            sky_color: s.sky_color.map(|c| c * brightness),
        }
    }

    /// The sun at the start of the game.
    pub fn dawn(&self) -> SunState {
        self.evaluate(0.0)
    }

    /// Advances `sun` by `dt` seconds.
    pub fn update(&self, sun: &mut SunState, dt: f32) {
        *sun = self.evaluate(sun.day_time + dt * self.settings.speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    fn cycle() -> DayCycle {
        DayCycle::new(DayCycleSettings::default(), 64, 64)
    }

    #[test]
    fn dawn_sits_on_the_horizon_east_of_center() {
        let sun = cycle().dawn();
        assert_abs_diff_eq!(sun.position.x, 92.0);
        assert_abs_diff_eq!(sun.position.y, 20.0);
        assert_abs_diff_eq!(sun.position.z, 32.0);
        assert_abs_diff_eq!(sun.intensity, 0.5);
        assert_abs_diff_eq!(sun.sky_color[0], 0.53 * 0.5);
    }

    #[test]
    fn noon_is_brightest() {
        let sun = cycle().evaluate(FRAC_PI_2);
        assert_abs_diff_eq!(sun.position.y, 70.0, epsilon = 1e-4);
        assert_abs_diff_eq!(sun.intensity, 1.3, epsilon = 1e-5);
        assert_abs_diff_eq!(sun.sky_color[2], 0.92, epsilon = 1e-5);
    }

    #[test]
    fn midnight_is_floored() {
        let sun = cycle().evaluate(3.0 * FRAC_PI_2);
        assert_abs_diff_eq!(sun.intensity, 0.2);
        assert_abs_diff_eq!(sun.sky_color[1], 0.81 * 0.15, epsilon = 1e-6);
    }

    #[test]
    fn update_accumulates_scaled_time_and_wraps_the_angle() {
        let cycle = cycle();
        let mut sun = cycle.dawn();
        cycle.update(&mut sun, 10.0);
        assert_abs_diff_eq!(sun.day_time, 0.2, epsilon = 1e-6);

        let late = cycle.evaluate(TAU + 1.0);
        assert_abs_diff_eq!(late.angle, 1.0, epsilon = 1e-5);
    }
}
