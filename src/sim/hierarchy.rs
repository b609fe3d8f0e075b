//! Parent/child transforms for orbiting bodies

use glam::{Mat4, Vec3};

/// Local transform: spin about Y, then offset, in the parent's frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    /// Rotation about the parent's Y axis that carries the offset (degrees)
    pub orbit_deg: f32,
    /// Distance from the parent along the rotated X axis
    pub offset: f32,
    /// Rotation of the body about its own Y axis (degrees)
    pub spin_deg: f32,
}

impl Transform {
    /// Matrix mapping this body's frame into its parent's frame
    pub fn local(&self) -> Mat4 {
        Mat4::from_rotation_y(self.orbit_deg.to_radians())
            * Mat4::from_translation(Vec3::new(self.offset, 0.0, 0.0))
            * Mat4::from_rotation_y(self.spin_deg.to_radians())
    }

    /// Compose with a parent's world matrix
    pub fn world(&self, parent: &Mat4) -> Mat4 {
        *parent * self.local()
    }
}

/// Origin of a frame in world space
#[inline]
pub fn origin(m: &Mat4) -> Vec3 {
    m.transform_point3(Vec3::ZERO)
}
