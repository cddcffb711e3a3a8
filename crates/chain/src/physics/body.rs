//! Rigid sphere bodies for the position-based solver.

use glam::{Quat, Vec3};

/// Pose of a body after a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

/// A sphere body. Fixed bodies have zero inverse mass and never move.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    pub position: Vec3,
    pub rotation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub radius: f32,
    inv_mass: f32,
    /// Inverse of the isotropic sphere inertia `2/5 * m * r^2`
    inv_inertia: f32,
    previous_position: Vec3,
    previous_rotation: Quat,
}

impl RigidBody {
    /// A movable sphere. `mass` and `radius` must already be positive.
    pub fn dynamic(position: Vec3, mass: f32, radius: f32) -> Self {
        let mut body = Self::fixed(position, radius);
        body.set_mass_properties(mass, radius);
        body
    }

    /// An immovable sphere
    pub fn fixed(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            radius,
            inv_mass: 0.0,
            inv_inertia: 0.0,
            previous_position: position,
            previous_rotation: Quat::IDENTITY,
        }
    }

    pub fn set_mass_properties(&mut self, mass: f32, radius: f32) {
        self.radius = radius;
        self.inv_mass = 1.0 / mass;
        self.inv_inertia = 1.0 / (0.4 * mass * radius * radius);
    }

    pub fn is_fixed(&self) -> bool {
        self.inv_mass == 0.0
    }

    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    pub fn transform(&self) -> BodyTransform {
        BodyTransform {
            position: self.position,
            rotation: self.rotation,
        }
    }

    /// World-space offset of a body-local point from the center
    pub fn world_offset(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }

    pub fn world_point(&self, local: Vec3) -> Vec3 {
        self.position + self.world_offset(local)
    }

    /// Resistance to a positional correction along `normal` applied at `offset`
    pub fn generalized_inverse_mass(&self, offset: Vec3, normal: Vec3) -> f32 {
        if self.is_fixed() {
            return 0.0;
        }
        let arm = offset.cross(normal);
        self.inv_mass + self.inv_inertia * arm.length_squared()
    }

    /// Apply positional impulse `impulse` at `offset`
    pub fn apply_correction(&mut self, impulse: Vec3, offset: Vec3) {
        if self.is_fixed() {
            return;
        }
        self.position += impulse * self.inv_mass;
        let spin = offset.cross(impulse) * self.inv_inertia;
        self.rotation = add_rotation(self.rotation, spin);
    }

    /// Advance velocity and pose by one substep of length `h`
    pub fn integrate(&mut self, h: f32, gravity: Vec3) {
        if self.is_fixed() {
            return;
        }
        self.previous_position = self.position;
        self.linear_velocity += gravity * h;
        self.position += self.linear_velocity * h;

        self.previous_rotation = self.rotation;
        self.rotation = add_rotation(self.rotation, self.angular_velocity * h);
    }

    /// Derive velocities from the pose change over the last substep
    pub fn update_velocities(&mut self, h: f32) {
        if self.is_fixed() {
            return;
        }
        self.linear_velocity = (self.position - self.previous_position) / h;

        let delta = self.rotation * self.previous_rotation.inverse();
        let omega = Vec3::new(delta.x, delta.y, delta.z) * (2.0 / h);
        self.angular_velocity = if delta.w >= 0.0 { omega } else { -omega };
    }

    pub fn apply_damping(&mut self, h: f32, linear: f32, angular: f32) {
        self.linear_velocity *= 1.0 / (1.0 + h * linear);
        self.angular_velocity *= 1.0 / (1.0 + h * angular);
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.rotation.is_finite()
            && self.linear_velocity.is_finite()
            && self.angular_velocity.is_finite()
    }
}

/// First-order rotation update `q + 0.5 * (w, 0) * q`, renormalized
fn add_rotation(rotation: Quat, w: Vec3) -> Quat {
    let spin = Quat::from_xyzw(w.x, w.y, w.z, 0.0) * rotation;
    (rotation + spin * 0.5).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_body_ignores_forces() {
        let mut body = RigidBody::fixed(Vec3::Y, 0.1);
        body.integrate(0.1, Vec3::new(0.0, -9.81, 0.0));
        body.apply_correction(Vec3::X, Vec3::Y);
        assert_eq!(body.position, Vec3::Y);
        assert_eq!(body.generalized_inverse_mass(Vec3::Y, Vec3::X), 0.0);
    }

    #[test]
    fn test_free_fall_velocity() {
        let mut body = RigidBody::dynamic(Vec3::ZERO, 1.0, 0.2);
        let h = 0.01;
        for _ in 0..10 {
            body.integrate(h, Vec3::new(0.0, -10.0, 0.0));
            body.update_velocities(h);
        }
        assert!((body.linear_velocity.y + 1.0).abs() < 1e-4);
        assert!(body.angular_velocity.length() < 1e-6);
    }

    #[test]
    fn test_generalized_inverse_mass() {
        let body = RigidBody::dynamic(Vec3::ZERO, 2.0, 0.5);
        // Central push only sees linear mass
        assert!((body.generalized_inverse_mass(Vec3::Y, Vec3::Y) - 0.5).abs() < 1e-6);
        // Lever arm adds 1 / (0.4 * 2 * 0.25) = 5
        assert!((body.generalized_inverse_mass(Vec3::Y, Vec3::X) - 5.5).abs() < 1e-5);
    }

    #[test]
    fn test_spin_recovered_from_pose() {
        let mut body = RigidBody::dynamic(Vec3::ZERO, 1.0, 0.2);
        body.angular_velocity = Vec3::new(0.0, 2.0, 0.0);
        body.integrate(0.01, Vec3::ZERO);
        body.update_velocities(0.01);
        assert!((body.angular_velocity.y - 2.0).abs() < 1e-2);
    }

    #[test]
    fn test_damping() {
        let mut body = RigidBody::dynamic(Vec3::ZERO, 1.0, 0.2);
        body.linear_velocity = Vec3::X;
        body.apply_damping(0.5, 2.0, 2.0);
        assert!((body.linear_velocity.x - 0.5).abs() < 1e-6);
    }
}
