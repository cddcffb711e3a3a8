//! Hanging chain simulation
//!
//! Beads hang between two fixed anchors, each joined to its neighbours by
//! ball-and-socket joints. [`ChainSimulator`] owns the body arena and is
//! rebuilt from scratch whenever the bead count changes; property edits that
//! keep the count update bodies in place.

mod body;
mod joint;
mod solver;

pub use body::{BodyTransform, RigidBody};
pub use joint::{BallJoint, BodyRef};
pub use solver::SolverParams;

use std::f32::consts::PI;

use beadchain_config::PhysicsConfig;
use glam::Vec3;
use tracing::debug;

use crate::catalog::ResolvedBead;
use crate::types::PlacedBead;

/// Rest height of the middle of the chain's starting arc
const START_HEIGHT: f32 = 2.5;

/// Sag of the starting arc below [`START_HEIGHT`]
const START_SAG: f32 = 0.8;

/// Physical properties of one bead body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySpec {
    pub radius: f32,
    /// Kilograms
    pub mass: f32,
}

impl BodySpec {
    /// Clamp to the configured minimums; non-finite values take the minimum.
    pub fn new(radius: f32, mass: f32, config: &PhysicsConfig) -> Self {
        let clamp = |value: f32, min: f32, what: &str| {
            if value.is_finite() && value >= min {
                value
            } else {
                debug!("Clamping bead {} {} to {}", what, value, min);
                min
            }
        };
        Self {
            radius: clamp(radius, config.min_radius, "radius"),
            mass: clamp(mass, config.min_mass, "mass"),
        }
    }

    /// Radius from the shape and scale, mass from the catalog weight in grams
    pub fn for_bead(resolved: &ResolvedBead, placed: &PlacedBead, config: &PhysicsConfig) -> Self {
        Self::new(resolved.radius(placed.scale), resolved.weight_g / 1000.0, config)
    }
}

/// What [`ChainSimulator::sync`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Bead count changed; all bodies were recreated at their start positions
    Rebuilt,
    /// Same count; body properties and joint offsets were updated in place
    Updated,
    Unchanged,
}

/// Shape of the connection between the anchors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChainTopology {
    /// No beads: a straight connector between the anchors
    Static { from: Vec3, to: Vec3 },
    /// Beads joined in series
    Jointed { bodies: usize, joints: usize },
}

/// Arena slot of the left anchor
const LEFT_ANCHOR: BodyRef = BodyRef(0);
/// Arena slot of the right anchor
const RIGHT_ANCHOR: BodyRef = BodyRef(1);
/// First bead body in the arena
const FIRST_BEAD: usize = 2;

/// Rigid body simulation of the hanging chain.
#[derive(Debug, Clone)]
pub struct ChainSimulator {
    config: PhysicsConfig,
    /// Anchors first, then one body per bead in chain order
    bodies: Vec<RigidBody>,
    joints: Vec<BallJoint>,
    specs: Vec<BodySpec>,
}

impl ChainSimulator {
    /// Simulator with no beads
    pub fn new(config: PhysicsConfig) -> Self {
        let mut simulator = Self {
            config,
            bodies: Vec::new(),
            joints: Vec::new(),
            specs: Vec::new(),
        };
        simulator.rebuild(&[]);
        simulator
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn left_anchor(&self) -> Vec3 {
        Vec3::from_array(self.config.left_anchor)
    }

    pub fn right_anchor(&self) -> Vec3 {
        Vec3::from_array(self.config.right_anchor)
    }

    fn anchor_offset(&self) -> Vec3 {
        Vec3::new(0.0, -self.config.anchor_radius, 0.0)
    }

    /// Number of dynamic bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len() - FIRST_BEAD
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn joints(&self) -> &[BallJoint] {
        &self.joints
    }

    /// Bead bodies in chain order
    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies[FIRST_BEAD..]
    }

    pub fn topology(&self) -> ChainTopology {
        if self.specs.is_empty() {
            ChainTopology::Static {
                from: self.left_anchor(),
                to: self.right_anchor(),
            }
        } else {
            ChainTopology::Jointed {
                bodies: self.body_count(),
                joints: self.joint_count(),
            }
        }
    }

    /// Where bead `index` of `count` starts: spread between the anchors on a
    /// shallow arc.
    pub fn start_position(&self, index: usize, count: usize) -> Vec3 {
        let t = index as f32 / count.saturating_sub(1).max(1) as f32;
        let left = self.left_anchor();
        let right = self.right_anchor();
        Vec3::new(
            left.x + (right.x - left.x) * t,
            START_HEIGHT - (t * PI).sin() * START_SAG,
            0.0,
        )
    }

    /// Bring the simulation in line with the current beads.
    pub fn sync(&mut self, specs: &[BodySpec]) -> SyncOutcome {
        if specs.len() != self.specs.len() {
            self.rebuild(specs);
            return SyncOutcome::Rebuilt;
        }
        if specs == self.specs.as_slice() {
            return SyncOutcome::Unchanged;
        }

        for (i, spec) in specs.iter().enumerate() {
            self.bodies[FIRST_BEAD + i].set_mass_properties(spec.mass, spec.radius);
        }
        self.specs = specs.to_vec();
        self.joints = self.build_joints();
        debug!("Updated {} chain bodies in place", specs.len());
        SyncOutcome::Updated
    }

    fn rebuild(&mut self, specs: &[BodySpec]) {
        let count = specs.len();
        let mut bodies = Vec::with_capacity(FIRST_BEAD + count);
        bodies.push(RigidBody::fixed(self.left_anchor(), self.config.anchor_radius));
        bodies.push(RigidBody::fixed(self.right_anchor(), self.config.anchor_radius));
        for (i, spec) in specs.iter().enumerate() {
            bodies.push(RigidBody::dynamic(self.start_position(i, count), spec.mass, spec.radius));
        }

        self.bodies = bodies;
        self.specs = specs.to_vec();
        self.joints = self.build_joints();
        debug!(
            "Rebuilt hanging chain with {} bodies and {} joints",
            self.body_count(),
            self.joint_count()
        );
    }

    /// Joints for the current specs: anchor, beads in series, anchor
    fn build_joints(&self) -> Vec<BallJoint> {
        let count = self.specs.len();
        if count == 0 {
            return Vec::new();
        }

        let top = |i: usize| Vec3::new(0.0, self.specs[i].radius, 0.0);
        let bottom = |i: usize| Vec3::new(0.0, -self.specs[i].radius, 0.0);
        let bead = |i: usize| BodyRef(FIRST_BEAD + i);

        let mut joints = Vec::with_capacity(count + 1);
        joints.push(BallJoint::new(LEFT_ANCHOR, self.anchor_offset(), bead(0), top(0)));
        for i in 1..count {
            joints.push(BallJoint::new(bead(i - 1), bottom(i - 1), bead(i), top(i)));
        }
        joints.push(BallJoint::new(
            bead(count - 1),
            top(count - 1),
            RIGHT_ANCHOR,
            self.anchor_offset(),
        ));
        joints
    }

    fn solver_params(&self) -> SolverParams {
        SolverParams {
            gravity: Vec3::from_array(self.config.gravity),
            substeps: self.config.substeps,
            linear_damping: self.config.linear_damping,
            angular_damping: self.config.angular_damping,
        }
    }

    /// Current bead transforms in chain order
    pub fn transforms(&self) -> Vec<BodyTransform> {
        self.bodies().iter().map(RigidBody::transform).collect()
    }

    /// Advance one tick. A non-positive or non-finite `dt` leaves the state
    /// untouched.
    pub fn step(&mut self, dt: f32) -> Vec<BodyTransform> {
        if !(dt.is_finite() && dt > 0.0) || self.specs.is_empty() {
            return self.transforms();
        }

        let params = self.solver_params();
        solver::step(&mut self.bodies, &self.joints, dt, &params);
        self.transforms()
    }
}
