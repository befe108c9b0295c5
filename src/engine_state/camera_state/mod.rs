//! # Camera State
//!
//! The camera is glued to the player's eyes. This module turns a [`PlayerState`]
//! into the pose and view matrix a renderer needs.
//!
//! ## Conventions
//! - Yaw 0 looks down +z, positive yaw turns towards +x
//! - Positive pitch looks up
//! - Y is up; the view matrix is right handed

use cgmath::{Matrix4, Point3, Rad, Vector3};

use super::player::PlayerState;

/// Position and orientation of the first-person camera.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraPose {
    /// The camera's position in world space
    pub position: Point3<f32>,
    /// Horizontal rotation around the Y axis
    pub yaw: Rad<f32>,
    /// Vertical rotation, clamped short of straight up or down
    pub pitch: Rad<f32>,
}

impl CameraPose {
    /// The camera of `player`, placed at the eye point.
    pub fn from_player(player: &PlayerState) -> Self {
        CameraPose {
            position: player.position,
            yaw: Rad(player.yaw),
            pitch: Rad(player.pitch),
        }
    }

    /// Normalized vector pointing where the camera looks.
    pub fn forward(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        Vector3::new(yaw_sin * pitch_cos, pitch_sin, yaw_cos * pitch_cos)
    }

    /// The world-to-view matrix for this pose.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use cgmath::{EuclideanSpace, Transform};

    #[test]
    fn pose_matches_the_player_view() {
        let mut player = PlayerState::at(Point3::new(3.0, 4.0, 5.0));
        player.apply_look(0.7, 0.3);
        let pose = CameraPose::from_player(&player);
        assert_eq!(pose.position, player.position);
        let (a, b) = (pose.forward(), player.forward());
        assert_abs_diff_eq!(a.x, b.x);
        assert_abs_diff_eq!(a.y, b.y);
        assert_abs_diff_eq!(a.z, b.z);
    }

    #[test]
    fn view_matrix_puts_the_target_in_front() {
        let pose = CameraPose {
            position: Point3::new(1.0, 2.0, 3.0),
            yaw: Rad(0.0),
            pitch: Rad(0.0),
        };
        let eye = pose.view_matrix().transform_point(pose.position);
        assert_abs_diff_eq!(eye.to_vec().x, 0.0, epsilon = 1e-5);
        let ahead = pose
            .view_matrix()
            .transform_point(pose.position + pose.forward() * 4.0);
        // Right-handed view space looks down -z.
        assert_abs_diff_eq!(ahead.z, -4.0, epsilon = 1e-5);
    }
}
