//! Chain skins: how each style renders the same curve.

use std::f32::consts::{FRAC_PI_2, TAU};

use beadchain_config::LayoutConfig;
use beadchain_ipc::ChainStyle;
use glam::{Quat, Vec3};

use super::curve::ChainCurve;

/// Shading for one skin surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinMaterial {
    pub color: &'static str,
    pub metalness: f32,
    pub roughness: f32,
    /// 1.0 is opaque
    pub opacity: f32,
}

impl SkinMaterial {
    const fn opaque(color: &'static str, metalness: f32, roughness: f32) -> Self {
        Self {
            color,
            metalness,
            roughness,
            opacity: 1.0,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// One tube swept along the whole closed curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeLayer {
    pub radius: f32,
    pub radial_segments: usize,
    pub material: SkinMaterial,
}

/// Dimensions of a single oval chain link, in link-local space.
///
/// The oval lies in the local XY plane with its long axis on X.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkShape {
    pub half_length: f32,
    pub half_width: f32,
    pub wire_radius: f32,
    pub wire_segments: usize,
    pub radial_segments: usize,
    pub material: SkinMaterial,
}

impl LinkShape {
    /// Closed loop the link wire follows
    pub fn centerline(&self) -> ChainCurve {
        const OVAL_POINTS: usize = 32;
        let points = (0..OVAL_POINTS)
            .map(|i| {
                let a = i as f32 / OVAL_POINTS as f32 * TAU;
                Vec3::new(a.cos() * self.half_length, a.sin() * self.half_width, 0.0)
            })
            .collect();
        ChainCurve::from_points(points)
    }
}

/// Placement of one link on the curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkInstance {
    /// Arc-length fraction the link sits at (after any offset)
    pub t: f32,
    pub position: Vec3,
    /// Rotation about +Y
    pub yaw: f32,
    /// Every other link is turned a quarter turn to interlock
    pub perpendicular: bool,
}

impl LinkInstance {
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }
}

/// Render description of a chain style over a curve.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainSkin {
    /// Continuous tube layers, innermost first
    Tube { layers: Vec<TubeLayer> },
    /// Discrete rigid links
    Links {
        shape: LinkShape,
        links: Vec<LinkInstance>,
    },
}

const LINK_SHAPE: LinkShape = LinkShape {
    half_length: 0.08,
    half_width: 0.04,
    wire_radius: 0.015,
    wire_segments: 64,
    radial_segments: 8,
    material: SkinMaterial::opaque("#FFD700", 0.95, 0.2),
};

fn tube(radius: f32, radial_segments: usize, material: SkinMaterial) -> TubeLayer {
    TubeLayer {
        radius,
        radial_segments,
        material,
    }
}

/// Yaw that turns local +X onto the in-plane direction of `tangent`
fn yaw_along(tangent: Vec3) -> f32 {
    (-tangent.z).atan2(tangent.x)
}

/// Place `config.link_count` links evenly by distance, at `u = i / count`.
///
/// Odd links are pushed forward by `config.link_offset` and turned a quarter
/// turn so they pass through their neighbours.
pub fn place_links(curve: &ChainCurve, config: &LayoutConfig) -> Vec<LinkInstance> {
    let count = config.link_count;
    (0..count)
        .map(|i| {
            let base = i as f32 / count as f32;
            let perpendicular = i % 2 == 1;
            let t = if perpendicular {
                (base + config.link_offset).rem_euclid(1.0)
            } else {
                base
            };
            // Orientation comes from the unshifted parameter
            let mut yaw = yaw_along(curve.tangent_at_u(base));
            if perpendicular {
                yaw += FRAC_PI_2;
            }
            LinkInstance {
                t,
                position: curve.point_at_u(t),
                yaw,
                perpendicular,
            }
        })
        .collect()
}

/// Skin for `style` along `curve`
pub fn chain_skin(style: ChainStyle, curve: &ChainCurve, config: &LayoutConfig) -> ChainSkin {
    match style {
        ChainStyle::Simple => ChainSkin::Tube {
            layers: vec![tube(0.02, 8, SkinMaterial::opaque("#C0C0C0", 0.9, 0.3))],
        },
        ChainStyle::Braided => ChainSkin::Tube {
            layers: vec![
                tube(0.025, 8, SkinMaterial::opaque("#B8860B", 0.4, 0.6)),
                tube(
                    0.026,
                    3,
                    SkinMaterial {
                        opacity: 0.6,
                        ..SkinMaterial::opaque("#CD7F32", 0.5, 0.5)
                    },
                ),
            ],
        },
        ChainStyle::Rope => ChainSkin::Tube {
            layers: vec![tube(0.025, 12, SkinMaterial::opaque("#8B7355", 0.1, 0.9))],
        },
        ChainStyle::Snake => ChainSkin::Tube {
            layers: vec![tube(0.03, 6, SkinMaterial::opaque("#E5E4E2", 0.95, 0.15))],
        },
        ChainStyle::Link => ChainSkin::Links {
            shape: LINK_SHAPE,
            links: place_links(curve, config),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ControlPoints;

    fn curve() -> ChainCurve {
        ChainCurve::new(&ControlPoints::default())
    }

    #[test]
    fn test_every_style_has_a_skin() {
        let config = LayoutConfig::default();
        for style in ChainStyle::ALL {
            match chain_skin(style, &curve(), &config) {
                ChainSkin::Tube { layers } => {
                    assert_ne!(style, ChainStyle::Link);
                    assert!(!layers.is_empty());
                }
                ChainSkin::Links { links, .. } => {
                    assert_eq!(style, ChainStyle::Link);
                    assert_eq!(links.len(), 20);
                }
            }
        }
    }

    #[test]
    fn test_braided_has_translucent_overlay() {
        let ChainSkin::Tube { layers } = chain_skin(ChainStyle::Braided, &curve(), &LayoutConfig::default()) else {
            panic!("braided should be a tube");
        };
        assert_eq!(layers.len(), 2);
        assert!(!layers[0].material.is_transparent());
        assert_eq!(layers[1].material.opacity, 0.6);
        assert!(layers[1].radius > layers[0].radius);
    }

    #[test]
    fn test_links_alternate() {
        let curve = curve();
        let links = place_links(&curve, &LayoutConfig::default());
        for (i, link) in links.iter().enumerate() {
            let base = i as f32 / 20.0;
            if i % 2 == 0 {
                assert!(!link.perpendicular);
                assert_eq!(link.t, base);
            } else {
                assert!(link.perpendicular);
                assert!((link.t - (base + 0.025)).abs() < 1e-6);
                let even = yaw_along(curve.tangent_at_u(base));
                assert!((link.yaw - even - FRAC_PI_2).abs() < 1e-5);
            }
            assert!(link.position.distance(curve.point_at_u(link.t)) < 1e-6);
        }
    }

    #[test]
    fn test_link_yaw_aligns_with_tangent() {
        let curve = curve();
        let links = place_links(&curve, &LayoutConfig::default());
        let link = links[4];
        let along = link.rotation() * Vec3::X;
        let tangent = curve.tangent_at_u(link.t);
        let flat = Vec3::new(tangent.x, 0.0, tangent.z).normalize();
        assert!(along.dot(flat) > 0.999);
    }

    #[test]
    fn test_link_offset_wraps() {
        let config = LayoutConfig {
            link_count: 2,
            link_offset: 0.6,
            ..Default::default()
        };
        let links = place_links(&curve(), &config);
        assert!((links[1].t - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_link_centerline_is_oval() {
        let oval = LINK_SHAPE.centerline();
        assert!((oval.point_at(0.0).x - 0.08).abs() < 1e-6);
        assert!((oval.point_at(0.25).y - 0.04).abs() < 1e-5);
    }
}
