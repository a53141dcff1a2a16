use bevy::math::{Mat3, Quat, Vec3};

/// Local axes of an agent. `z` points backwards along the heading, `x` is
/// to the right and `y` is the agent's own up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub x: Vec3,
    pub y: Vec3,
    pub z: Vec3,
}

impl Frame {
    pub const IDENTITY: Self = Self {
        x: Vec3::X,
        y: Vec3::Y,
        z: Vec3::Z,
    };

    /// Builds the frame for a heading, or `None` when the heading is zero or
    /// parallel to `up` and no right axis exists.
    pub fn from_velocity(velocity: Vec3, up: Vec3) -> Option<Self> {
        let z = -velocity.try_normalize()?;
        let x = up.cross(z).try_normalize()?;
        let y = z.cross(x).try_normalize()?;
        Some(Self { x, y, z })
    }

    /// Rotation taking world axes onto this frame.
    pub fn rotation(&self) -> Quat {
        Quat::from_mat3(&Mat3::from_cols(self.x, self.y, self.z))
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_are_orthonormal() {
        let frame = Frame::from_velocity(Vec3::new(0.01, 0.02, -0.03), Vec3::Y).unwrap();
        for axis in [frame.x, frame.y, frame.z] {
            assert!((axis.length() - 1.0).abs() < 1e-5);
        }
        assert!(frame.x.dot(frame.y).abs() < 1e-5);
        assert!(frame.y.dot(frame.z).abs() < 1e-5);
        assert!(frame.z.dot(frame.x).abs() < 1e-5);
    }

    #[test]
    fn z_points_against_heading() {
        let frame = Frame::from_velocity(Vec3::new(0.04, 0.0, 0.0), Vec3::Y).unwrap();
        assert!((frame.z - Vec3::NEG_X).length() < 1e-6);
        assert!((frame.y - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn degenerate_headings_have_no_frame() {
        assert_eq!(Frame::from_velocity(Vec3::ZERO, Vec3::Y), None);
        assert_eq!(Frame::from_velocity(Vec3::new(0.0, 0.03, 0.0), Vec3::Y), None);
    }

    #[test]
    fn rotation_maps_forward_to_heading() {
        let heading = Vec3::new(0.02, -0.01, 0.03);
        let frame = Frame::from_velocity(heading, Vec3::Y).unwrap();
        let forward = frame.rotation() * Vec3::NEG_Z;
        assert!((forward - heading.normalize()).length() < 1e-5);
    }
}
