use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Dimensions of the toroidal box. The box spans `[0, extent]` on each axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxExtent {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl BoxExtent {
    pub fn new(width: f32, height: f32, depth: f32) -> Result<Self, ConfigError> {
        let extent = Self { width, height, depth };
        extent.validate()?;
        Ok(extent)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let axes = [self.width, self.height, self.depth];
        if axes.iter().all(|a| a.is_finite() && *a > 0.0) {
            Ok(())
        } else {
            Err(ConfigError::InvalidExtent(axes))
        }
    }

    pub fn size(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }

    pub fn center(&self) -> Vec3 {
        0.5 * self.size()
    }

    /// Moves a position that left the box by less than one extent back in
    /// through the opposite face, keeping the overshoot.
    pub fn wrap(&self, position: Vec3) -> Vec3 {
        Vec3::new(
            wrap_axis(position.x, self.width),
            wrap_axis(position.y, self.height),
            wrap_axis(position.z, self.depth),
        )
    }
}

#[inline]
fn wrap_axis(value: f32, extent: f32) -> f32 {
    if value > extent {
        value - extent
    } else if value < 0.0 {
        value + extent
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn creature_box() -> BoxExtent {
        BoxExtent::new(9.0, 5.0, 7.0).unwrap()
    }

    #[test]
    fn rejects_flat_or_broken_boxes() {
        assert!(BoxExtent::new(0.0, 5.0, 7.0).is_err());
        assert!(BoxExtent::new(9.0, -1.0, 7.0).is_err());
        assert!(BoxExtent::new(9.0, 5.0, f32::NAN).is_err());
    }

    #[test]
    fn overshoot_reappears_on_far_side() {
        let extent = creature_box();
        let wrapped = extent.wrap(Vec3::new(9.25, -0.5, 7.125));
        assert_eq!(wrapped, Vec3::new(0.25, 4.5, 0.125));
    }

    #[test]
    fn each_axis_wraps_independently() {
        let extent = creature_box();
        let wrapped = extent.wrap(Vec3::new(4.0, 5.5, 3.0));
        assert_eq!(wrapped, Vec3::new(4.0, 0.5, 3.0));
    }

    proptest! {
        #[test]
        fn inside_positions_are_untouched(
            x in 0.0f32..9.0,
            y in 0.0f32..5.0,
            z in 0.0f32..7.0,
        ) {
            let p = Vec3::new(x, y, z);
            prop_assert_eq!(creature_box().wrap(p), p);
        }

        #[test]
        fn one_step_past_a_face_keeps_the_overshoot(eps in 1e-5f32..=0.04) {
            let extent = creature_box();
            let size = extent.size();

            let past = size + Vec3::splat(eps);
            prop_assert_eq!(extent.wrap(past), past - size);

            let before = Vec3::splat(-eps);
            prop_assert_eq!(extent.wrap(before), before + size);
        }
    }
}
