//! Orbit camera controller
//!
//! Controls:
//! - Left mouse drag: Orbit around target (unless a curve handle is dragged)
//! - Right mouse drag: Pan
//! - Scroll wheel: Dolly (zoom)

use beadchain_ipc::ViewMode;
use bevy::input::mouse::{MouseButton, MouseMotion, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::curve_edit::ControlPointDrag;
use crate::store::{ActiveViewMode, ChainStoreSet};

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Camera orbit controller state
#[derive(Component, Debug, Clone)]
pub struct OrbitCamera {
    /// Point the camera orbits around
    pub target: Vec3,
    /// Distance from target
    pub distance: f32,
    /// Horizontal angle (yaw) in radians
    pub yaw: f32,
    /// Vertical angle (pitch) in radians
    pub pitch: f32,
    /// Orbit sensitivity (radians per pixel)
    pub orbit_sensitivity: f32,
    /// Pan sensitivity (units per pixel, scaled by distance)
    pub pan_sensitivity: f32,
    /// Zoom sensitivity (distance units per scroll line)
    pub zoom_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        // Camera at (0, 2, 8) looking at (0, 2, 0)
        Self {
            target: Vec3::new(0.0, 2.0, 0.0),
            distance: 8.0,
            yaw: 0.0,
            pitch: 0.0,
            orbit_sensitivity: 0.005,
            pan_sensitivity: 0.002,
            zoom_sensitivity: 1.0,
            min_distance: 3.0,
            max_distance: 15.0,
        }
    }
}

impl OrbitCamera {
    /// Starting view for a presentation mode
    pub fn for_view(mode: ViewMode) -> Self {
        match mode {
            ViewMode::Hanging => Self::default(),
            // Look down at the chain lying on the table
            ViewMode::Flat => Self {
                target: Vec3::ZERO,
                pitch: 0.7,
                ..Self::default()
            },
        }
    }

    /// Calculate camera position from orbit parameters
    pub fn calculate_position(&self) -> Vec3 {
        // Pitch is the angle from horizontal, yaw the angle around Y
        let horizontal_distance = self.distance * self.pitch.cos();
        let y = self.distance * self.pitch.sin();
        let x = horizontal_distance * self.yaw.sin();
        let z = horizontal_distance * self.yaw.cos();

        self.target + Vec3::new(x, y, z)
    }

    /// Zoom by `scroll` lines, keeping the distance in range
    pub fn zoom(&mut self, scroll: f32) {
        let zoom_amount = scroll * self.zoom_sensitivity * (self.distance * 0.1);
        self.distance = (self.distance - zoom_amount).clamp(self.min_distance, self.max_distance);
    }
}

/// Plugin for orbit camera controls
pub struct CameraControllerPlugin;

impl Plugin for CameraControllerPlugin {
    fn build(&self, app: &mut App) {
        // Orbit and pan both read MouseMotion, so they must run sequentially
        app.add_systems(
            Update,
            (
                reset_camera_on_view_change,
                // Handle picking decides whether a left drag orbits
                camera_orbit_system
                    .after(reset_camera_on_view_change)
                    .after(ChainStoreSet::Commands),
                camera_pan_system.after(camera_orbit_system),
                camera_zoom_system,
                update_camera_transform
                    .after(camera_orbit_system)
                    .after(camera_pan_system)
                    .after(camera_zoom_system),
            ),
        );
    }
}

/// Reframe the chain when the presentation mode changes
fn reset_camera_on_view_change(
    view: Res<ActiveViewMode>,
    mut camera_query: Query<&mut OrbitCamera, With<MainCamera>>,
) {
    if !view.is_changed() || view.is_added() {
        return;
    }
    for mut orbit in camera_query.iter_mut() {
        *orbit = OrbitCamera::for_view(view.mode);
    }
}

/// Handle orbit (left mouse drag)
fn camera_orbit_system(
    mouse_button: Res<ButtonInput<MouseButton>>,
    drag: Res<ControlPointDrag>,
    mut motion_events: MessageReader<MouseMotion>,
    mut camera_query: Query<&mut OrbitCamera>,
) {
    if !mouse_button.pressed(MouseButton::Left) || drag.is_dragging() {
        motion_events.clear();
        return;
    }

    let mut delta = Vec2::ZERO;
    for event in motion_events.read() {
        delta += event.delta;
    }

    if delta == Vec2::ZERO {
        return;
    }

    for mut orbit in camera_query.iter_mut() {
        orbit.yaw -= delta.x * orbit.orbit_sensitivity;
        orbit.pitch += delta.y * orbit.orbit_sensitivity;

        // Stay above the table and short of straight down
        orbit.pitch = orbit.pitch.clamp(-0.2, 1.5);
    }
}

/// Handle pan (right mouse drag)
fn camera_pan_system(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut motion_events: MessageReader<MouseMotion>,
    mut camera_query: Query<(&mut OrbitCamera, &Transform)>,
) {
    if !mouse_button.pressed(MouseButton::Right) {
        motion_events.clear();
        return;
    }

    let mut delta = Vec2::ZERO;
    for event in motion_events.read() {
        delta += event.delta;
    }

    if delta == Vec2::ZERO {
        return;
    }

    for (mut orbit, transform) in camera_query.iter_mut() {
        let right = transform.rotation * Vec3::X;
        let up = transform.rotation * Vec3::Y;

        // Scale pan by distance so it feels consistent at different zoom levels
        let pan_scale = orbit.pan_sensitivity * orbit.distance;

        // Negative to feel like dragging the scene
        let pan_offset = (-right * delta.x + up * delta.y) * pan_scale;
        orbit.target += pan_offset;
    }
}

/// Handle zoom (scroll wheel)
fn camera_zoom_system(
    mut scroll_events: MessageReader<MouseWheel>,
    mut camera_query: Query<&mut OrbitCamera>,
) {
    let mut scroll_delta = 0.0;
    for event in scroll_events.read() {
        scroll_delta += event.y;
    }

    if scroll_delta == 0.0 {
        return;
    }

    for mut orbit in camera_query.iter_mut() {
        orbit.zoom(scroll_delta);
    }
}

/// Update camera transform from orbit state
fn update_camera_transform(
    mut camera_query: Query<(&OrbitCamera, &mut Transform), With<MainCamera>>,
) {
    for (orbit, mut transform) in camera_query.iter_mut() {
        let position = orbit.calculate_position();
        *transform = Transform::from_translation(position).looking_at(orbit.target, Vec3::Y);
    }
}

/// World-space ray under the cursor, if the cursor is inside the window
pub(crate) fn cursor_ray(
    windows: &Query<&Window, With<PrimaryWindow>>,
    camera_query: &Query<(&Camera, &GlobalTransform), With<MainCamera>>,
) -> Option<Ray3d> {
    let window = windows.single().ok()?;
    let cursor_position = window.cursor_position()?;
    let (camera, camera_transform) = camera_query.single().ok()?;
    camera.viewport_to_world(camera_transform, cursor_position).ok()
}

/// Distance along `ray` to the first hit on a sphere
pub(crate) fn ray_sphere_distance(ray: Ray3d, center: Vec3, radius: f32) -> Option<f32> {
    let direction = *ray.direction;
    let to_center = center - ray.origin;
    let along = to_center.dot(direction);
    let closest_sq = to_center.length_squared() - along * along;
    let radius_sq = radius * radius;
    if closest_sq > radius_sq {
        return None;
    }
    let half_chord = (radius_sq - closest_sq).sqrt();
    let near = along - half_chord;
    let far = along + half_chord;
    if far < 0.0 {
        None
    } else if near >= 0.0 {
        Some(near)
    } else {
        // Origin is inside the sphere
        Some(0.0)
    }
}
