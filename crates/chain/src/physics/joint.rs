//! Ball-and-socket joints between arena bodies.

use glam::Vec3;

use super::body::RigidBody;

/// Index of a body in the simulator arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyRef(pub usize);

/// Pins a point on body `a` to a point on body `b`; rotation is free.
#[derive(Debug, Clone, PartialEq)]
pub struct BallJoint {
    pub a: BodyRef,
    pub b: BodyRef,
    /// Attachment point in `a`'s local frame
    pub local_a: Vec3,
    /// Attachment point in `b`'s local frame
    pub local_b: Vec3,
}

impl BallJoint {
    pub fn new(a: BodyRef, local_a: Vec3, b: BodyRef, local_b: Vec3) -> Self {
        Self { a, b, local_a, local_b }
    }

    /// Distance between the two attachment points
    pub fn separation(&self, bodies: &[RigidBody]) -> f32 {
        let pa = bodies[self.a.0].world_point(self.local_a);
        let pb = bodies[self.b.0].world_point(self.local_b);
        pa.distance(pb)
    }

    /// Zero-compliance positional solve pulling the attachment points together
    pub fn solve(&self, bodies: &mut [RigidBody]) {
        let (a, b) = (self.a.0, self.b.0);
        if a == b {
            return;
        }

        let offset_a = bodies[a].world_offset(self.local_a);
        let offset_b = bodies[b].world_offset(self.local_b);
        let delta = (bodies[a].position + offset_a) - (bodies[b].position + offset_b);
        let error = delta.length();
        if error < 1e-6 {
            return;
        }
        let normal = delta / error;

        let w = bodies[a].generalized_inverse_mass(offset_a, normal)
            + bodies[b].generalized_inverse_mass(offset_b, normal);
        if w <= 0.0 {
            return;
        }

        let impulse = normal * (-error / w);
        bodies[a].apply_correction(impulse, offset_a);
        bodies[b].apply_correction(-impulse, offset_b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hanging(x: f32) -> Vec<RigidBody> {
        vec![
            RigidBody::fixed(Vec3::new(0.0, 3.0, 0.0), 0.1),
            RigidBody::dynamic(Vec3::new(x, 2.0, 0.0), 1.0, 0.2),
        ]
    }

    #[test]
    fn test_aligned_solve_is_exact() {
        let mut bodies = hanging(0.0);
        let joint = BallJoint::new(
            BodyRef(0),
            Vec3::new(0.0, -0.1, 0.0),
            BodyRef(1),
            Vec3::new(0.0, 0.2, 0.0),
        );
        joint.solve(&mut bodies);
        assert!(joint.separation(&bodies) < 1e-5);
        assert!((bodies[1].position.y - 2.7).abs() < 1e-5);
    }

    #[test]
    fn test_solve_moves_dynamic_body_to_fixed() {
        let mut bodies = hanging(0.05);
        let joint = BallJoint::new(
            BodyRef(0),
            Vec3::new(0.0, -0.1, 0.0),
            BodyRef(1),
            Vec3::new(0.0, 0.2, 0.0),
        );
        let before = joint.separation(&bodies);
        for _ in 0..20 {
            joint.solve(&mut bodies);
        }
        assert!(joint.separation(&bodies) < before * 0.05);
        assert_eq!(bodies[0].position, Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn test_equal_bodies_share_correction() {
        let mut bodies = vec![
            RigidBody::dynamic(Vec3::new(-1.0, 0.0, 0.0), 1.0, 0.2),
            RigidBody::dynamic(Vec3::new(1.0, 0.0, 0.0), 1.0, 0.2),
        ];
        let joint = BallJoint::new(BodyRef(0), Vec3::ZERO, BodyRef(1), Vec3::ZERO);
        joint.solve(&mut bodies);
        assert!(bodies[0].position.distance(Vec3::ZERO) < 1e-5);
        assert!(bodies[1].position.distance(Vec3::ZERO) < 1e-5);
    }
}
