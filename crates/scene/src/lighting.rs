//! Configurable sun and ambient lighting
//!
//! Beads are mostly glossy, so the ambient term stands in for the soft indoor
//! environment they reflect and the sun gives them a highlight.

use bevy::light::GlobalAmbientLight;
use bevy::prelude::*;

/// Scene lighting parameters
#[derive(Debug, Clone, PartialEq)]
pub struct LightingSettings {
    /// Direction toward the light source
    pub sun_direction: [f32; 3],
    /// Sun color as RGB (0.0-1.0)
    pub sun_color: [f32; 3],
    /// Sun illuminance in lux
    pub sun_intensity: f32,
    pub ambient_color: [f32; 3],
    /// Ambient brightness in cd/m^2
    pub ambient_intensity: f32,
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            sun_direction: [0.4, 1.0, 0.6],
            // Warm indoor white
            sun_color: [1.0, 0.97, 0.92],
            sun_intensity: 6000.0,
            ambient_color: [0.95, 0.95, 1.0],
            ambient_intensity: 800.0,
        }
    }
}

impl LightingSettings {
    /// Transform for a directional light shining away from `sun_direction`
    pub fn sun_transform(&self) -> Transform {
        let direction = Vec3::from_array(self.sun_direction).normalize_or(Vec3::Y);
        Transform::default().looking_to(-direction, Vec3::Y)
    }
}

/// Marker component for the sun directional light
#[derive(Component)]
pub struct SunLight;

/// Resource for current lighting settings
#[derive(Resource)]
pub struct SceneLighting {
    pub settings: LightingSettings,
    /// Settings changed and need to be applied
    pub dirty: bool,
}

impl Default for SceneLighting {
    fn default() -> Self {
        Self {
            settings: LightingSettings::default(),
            dirty: true,
        }
    }
}

impl SceneLighting {
    /// Update settings and mark as dirty
    pub fn update(&mut self, settings: LightingSettings) {
        self.settings = settings;
        self.dirty = true;
    }
}

pub struct LightingPlugin;

impl Plugin for LightingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneLighting>()
            .add_systems(Startup, setup_lighting)
            .add_systems(Update, update_lighting);
    }
}

fn rgb(c: [f32; 3]) -> Color {
    Color::srgb(c[0], c[1], c[2])
}

/// Spawn the sun light and ambient light
fn setup_lighting(mut commands: Commands, lighting: Res<SceneLighting>) {
    let settings = &lighting.settings;

    commands.spawn((
        DirectionalLight {
            illuminance: settings.sun_intensity,
            color: rgb(settings.sun_color),
            shadows_enabled: true,
            ..default()
        },
        settings.sun_transform(),
        SunLight,
        Name::new("Sun"),
    ));

    // Ambient light is a resource, not an entity
    commands.insert_resource(GlobalAmbientLight {
        color: rgb(settings.ambient_color),
        brightness: settings.ambient_intensity,
        ..default()
    });

    info!("Scene lighting initialized");
}

/// Apply changed settings
fn update_lighting(
    mut lighting: ResMut<SceneLighting>,
    mut sun_query: Query<(&mut DirectionalLight, &mut Transform), With<SunLight>>,
    ambient_light: Option<ResMut<GlobalAmbientLight>>,
) {
    if !lighting.dirty {
        return;
    }
    let Some(mut ambient_light) = ambient_light else {
        return;
    };

    let settings = &lighting.settings;
    for (mut light, mut transform) in sun_query.iter_mut() {
        light.illuminance = settings.sun_intensity;
        light.color = rgb(settings.sun_color);
        *transform = settings.sun_transform();
    }

    ambient_light.color = rgb(settings.ambient_color);
    ambient_light.brightness = settings.ambient_intensity;

    lighting.dirty = false;
    debug!("Scene lighting updated");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sun_shines_down() {
        let transform = LightingSettings::default().sun_transform();
        // Directional lights shine along their forward axis
        assert!(transform.forward().y < 0.0);
    }

    #[test]
    fn test_update_marks_dirty() {
        let mut lighting = SceneLighting {
            dirty: false,
            ..default()
        };
        lighting.update(LightingSettings {
            sun_intensity: 1.0,
            ..default()
        });
        assert!(lighting.dirty);
        assert_eq!(lighting.settings.sun_intensity, 1.0);
    }
}
