//! Curve editing handles
//!
//! In edit mode (flat view only) each control point is drawn as a handle.
//! Dragging a handle moves the point in the horizontal plane at its current
//! height; the edit is sent as a `MoveControlPoint` command so the store stays
//! the only writer.

use beadchain_ipc::{UiToScene, ViewMode};
use bevy::input::mouse::MouseButton;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::camera::{MainCamera, cursor_ray, ray_sphere_distance};
use crate::commands::UiCommand;
use crate::store::{ActiveViewMode, ChainStoreResource, ChainStoreSet};

pub const HANDLE_RADIUS: f32 = 0.08;
const RING_RADIUS: f32 = 0.11;
/// Drags shorter than this are not sent
const MIN_DRAG_DISTANCE: f32 = 1e-4;

const HANDLE_COLOR: Color = Color::srgb(0.584, 0.882, 0.827);
const HANDLE_HOVER_COLOR: Color = Color::srgb(0.306, 0.804, 0.769);
const HANDLE_DRAG_COLOR: Color = Color::srgb(1.0, 0.42, 0.42);

/// Handle interaction state
#[derive(Resource, Debug, Default)]
pub struct ControlPointDrag {
    /// Handle being dragged
    pub active: Option<usize>,
    /// Handle under the cursor
    pub hovered: Option<usize>,
    /// Height of the plane the dragged point moves in
    pub plane_height: f32,
}

impl ControlPointDrag {
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    fn clear(&mut self) {
        self.active = None;
        self.hovered = None;
    }
}

pub struct CurveEditPlugin;

impl Plugin for CurveEditPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ControlPointDrag>().add_systems(
            Update,
            (
                pick_control_point,
                drag_control_point.after(pick_control_point),
                draw_control_points.after(drag_control_point),
            )
                .before(ChainStoreSet::Commands),
        );
    }
}

/// Closest handle hit by `ray`
pub fn pick_handle(ray: Ray3d, points: &[Vec3], radius: f32) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .filter_map(|(i, &point)| ray_sphere_distance(ray, point, radius).map(|d| (i, d)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Where `ray` crosses the horizontal plane at `height`
pub fn drag_target(ray: Ray3d, height: f32) -> Option<Vec3> {
    let distance = ray.intersect_plane(
        Vec3::new(0.0, height, 0.0),
        InfinitePlane3d::new(Vec3::Y),
    )?;
    let point = ray.get_point(distance);
    Some(Vec3::new(point.x, height, point.z))
}

fn editing(store: &ChainStoreResource, view: &ActiveViewMode) -> bool {
    store.store().is_edit_mode() && view.mode == ViewMode::Flat
}

fn pick_control_point(
    mouse_button: Res<ButtonInput<MouseButton>>,
    store: Res<ChainStoreResource>,
    view: Res<ActiveViewMode>,
    mut drag: ResMut<ControlPointDrag>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
) {
    if !editing(&store, &view) {
        if drag.is_dragging() || drag.hovered.is_some() {
            drag.clear();
        }
        return;
    }

    if mouse_button.just_released(MouseButton::Left) && drag.is_dragging() {
        debug!("Released control point {:?}", drag.active);
        drag.active = None;
    }

    let Some(ray) = cursor_ray(&windows, &camera_query) else {
        drag.hovered = None;
        return;
    };
    let points = store.store().control_points().as_slice();
    drag.hovered = pick_handle(ray, points, HANDLE_RADIUS);

    if mouse_button.just_pressed(MouseButton::Left) {
        if let Some(index) = drag.hovered {
            drag.active = Some(index);
            drag.plane_height = points[index].y;
            debug!("Grabbed control point {}", index);
        }
    }
}

fn drag_control_point(
    mouse_button: Res<ButtonInput<MouseButton>>,
    store: Res<ChainStoreResource>,
    drag: Res<ControlPointDrag>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut commands: MessageWriter<UiCommand>,
) {
    let Some(index) = drag.active else {
        return;
    };
    if !mouse_button.pressed(MouseButton::Left) {
        return;
    }
    let Some(target) =
        cursor_ray(&windows, &camera_query).and_then(|ray| drag_target(ray, drag.plane_height))
    else {
        return;
    };

    let current = store.store().control_points().get(index);
    if current.is_some_and(|p| p.distance(target) < MIN_DRAG_DISTANCE) {
        return;
    }
    commands.write(UiCommand(UiToScene::MoveControlPoint {
        index,
        position: target.to_array(),
    }));
}

fn draw_control_points(
    store: Res<ChainStoreResource>,
    view: Res<ActiveViewMode>,
    drag: Res<ControlPointDrag>,
    mut gizmos: Gizmos,
) {
    if !editing(&store, &view) {
        return;
    }

    for (i, &point) in store.store().control_points().as_slice().iter().enumerate() {
        let dragging = drag.active == Some(i);
        let color = if dragging {
            HANDLE_DRAG_COLOR
        } else if drag.hovered == Some(i) {
            HANDLE_HOVER_COLOR
        } else {
            HANDLE_COLOR
        };
        let ring_color = if dragging {
            HANDLE_DRAG_COLOR.with_alpha(0.5)
        } else {
            Color::WHITE.with_alpha(0.5)
        };
        let isometry = Isometry3d::from_translation(point);
        gizmos.sphere(isometry, HANDLE_RADIUS, color);
        gizmos.circle(isometry, RING_RADIUS, ring_color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_nearest_handle() {
        let points = [
            Vec3::new(0.0, 0.2, -1.0),
            Vec3::new(0.0, 0.2, 1.0),
            Vec3::new(3.0, 0.2, 0.0),
        ];
        let ray = Ray3d::new(Vec3::new(0.0, 0.2, 5.0), Dir3::NEG_Z);
        assert_eq!(pick_handle(ray, &points, HANDLE_RADIUS), Some(1));

        let miss = Ray3d::new(Vec3::new(1.5, 0.2, 5.0), Dir3::NEG_Z);
        assert_eq!(pick_handle(miss, &points, HANDLE_RADIUS), None);
    }

    #[test]
    fn test_drag_keeps_height() {
        let ray = Ray3d::new(Vec3::new(1.0, 5.0, 2.0), Dir3::NEG_Y);
        let target = drag_target(ray, 0.21).unwrap();
        assert!((target - Vec3::new(1.0, 0.21, 2.0)).length() < 1e-5);

        // Parallel to the plane
        let flat = Ray3d::new(Vec3::new(0.0, 5.0, 0.0), Dir3::X);
        assert!(drag_target(flat, 0.21).is_none());
    }
}
