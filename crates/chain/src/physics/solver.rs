//! Substepped position-based rigid body solver.

use glam::Vec3;

use super::body::RigidBody;
use super::joint::BallJoint;

/// Per-tick solver settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverParams {
    pub gravity: Vec3,
    pub substeps: u32,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

/// Advance the arena by `dt`, split into `params.substeps` substeps.
///
/// Each substep integrates, solves every joint once in order, then derives
/// velocities from the pose change and damps them.
pub fn step(bodies: &mut [RigidBody], joints: &[BallJoint], dt: f32, params: &SolverParams) {
    let substeps = params.substeps.max(1);
    let h = dt / substeps as f32;

    for _ in 0..substeps {
        for body in bodies.iter_mut() {
            body.integrate(h, params.gravity);
        }

        for joint in joints {
            joint.solve(bodies);
        }

        for body in bodies.iter_mut().filter(|b| !b.is_fixed()) {
            body.update_velocities(h);
            body.apply_damping(h, params.linear_damping, params.angular_damping);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::joint::BodyRef;

    #[test]
    fn test_pendulum_keeps_length() {
        let mut bodies = vec![
            RigidBody::fixed(Vec3::ZERO, 0.1),
            RigidBody::dynamic(Vec3::new(1.0, 0.0, 0.0), 1.0, 0.1),
        ];
        let joints = vec![BallJoint::new(BodyRef(0), Vec3::ZERO, BodyRef(1), Vec3::new(-1.0, 0.0, 0.0))];
        let params = SolverParams {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            substeps: 8,
            linear_damping: 0.0,
            angular_damping: 0.0,
        };
        for _ in 0..30 {
            step(&mut bodies, &joints, 1.0 / 60.0, &params);
            assert!(joints[0].separation(&bodies) < 0.05);
        }
        assert!(bodies[1].position.y < -0.5);
        assert!(bodies[1].is_finite());
    }
}
