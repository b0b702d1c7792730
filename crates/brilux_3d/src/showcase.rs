//! Showcase scene
//!
//! The modularity section renders the loaded lamp inside a small lit room:
//! a 4×3×4 box on a 20×20 floor, warm and cool point lights, and an orbit
//! camera whose distance is clamped to 5..20 units.

use crate::scene::SceneAsset;
use brilux_core::{Color, Vec3};
use serde::Serialize;
use smallvec::SmallVec;

/// Shadow map resolution of the room lights
pub const SHADOW_MAP_SIZE: u32 = 1024;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoomBox {
    /// Width, height, depth, centered on the origin
    pub size: Vec3,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Floor {
    /// Side length of the square plane
    pub size: f32,
    /// Height of the plane
    pub elevation: f32,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

/// Sky/ground gradient light
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HemisphereLight {
    pub sky_color: Color,
    pub ground_color: Color,
    pub intensity: f32,
}

/// Point light (omnidirectional)
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
    /// Shadow map size, `None` when the light casts no shadows
    pub shadow_map_size: Option<u32>,
}

impl PointLight {
    pub fn new(color: Color, intensity: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            color,
            intensity,
            shadow_map_size: None,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_shadows(mut self, map_size: u32) -> Self {
        self.shadow_map_size = Some(map_size);
        self
    }

    pub fn casts_shadows(&self) -> bool {
        self.shadow_map_size.is_some()
    }
}

/// Camera orbiting a target at a bounded distance
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrbitCamera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitCamera {
    pub fn distance(&self) -> f32 {
        self.position.sub(self.target).length()
    }

    /// Move along the view ray, clamped to the distance limits
    pub fn set_distance(&mut self, distance: f32) {
        let distance = distance.clamp(self.min_distance, self.max_distance);
        let direction = self.position.sub(self.target).normalize();
        let direction = if direction == Vec3::ZERO {
            Vec3::UP
        } else {
            direction
        };
        self.position = Vec3::new(
            self.target.x + direction.x * distance,
            self.target.y + direction.y * distance,
            self.target.z + direction.z * distance,
        );
    }

    /// Zoom by `delta` units (positive moves away)
    pub fn zoom(&mut self, delta: f32) {
        self.set_distance(self.distance() + delta);
    }
}

/// Transform that sets a model on the showcase floor
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ModelPlacement {
    pub translation: Vec3,
    pub scale: f32,
}

/// Lit room the showcase model is displayed in
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShowcaseScene {
    pub background: Color,
    pub room: RoomBox,
    pub floor: Floor,
    pub ambient: AmbientLight,
    pub hemisphere: HemisphereLight,
    pub point_lights: SmallVec<[PointLight; 4]>,
    pub camera: OrbitCamera,
}

impl ShowcaseScene {
    pub fn standard() -> Self {
        let warm = Color::from_hex(0xff8f00);
        let light = |position, color| {
            PointLight::new(color, 1.0)
                .at(position)
                .with_shadows(SHADOW_MAP_SIZE)
        };

        Self {
            background: Color::from_hex(0xf0f0f0),
            room: RoomBox {
                size: Vec3::new(4.0, 3.0, 4.0),
                color: Color::from_hex(0xe0e0e0),
            },
            floor: Floor {
                size: 20.0,
                elevation: -1.5,
                color: Color::from_hex(0xf0f0f0),
            },
            ambient: AmbientLight {
                color: Color::WHITE,
                intensity: 0.2,
            },
            hemisphere: HemisphereLight {
                sky_color: Color::WHITE,
                ground_color: warm,
                intensity: 0.3,
            },
            point_lights: SmallVec::from_iter([
                light(Vec3::new(4.0, 4.0, 4.0), warm),
                light(Vec3::new(-4.0, 3.0, -4.0), Color::from_hex(0x4fc3f7)),
                light(Vec3::new(0.0, 5.0, 0.0), Color::from_hex(0xf5f5f5)),
            ]),
            camera: OrbitCamera {
                position: Vec3::new(8.0, 8.0, 8.0),
                target: Vec3::ZERO,
                fov: 75.0,
                min_distance: 5.0,
                max_distance: 20.0,
            },
        }
    }

    /// Center a model on the floor, shrinking it to fit the room footprint
    pub fn place_model(&self, scene: &SceneAsset) -> ModelPlacement {
        let Some((min, max)) = scene.bounding_box() else {
            return ModelPlacement {
                translation: Vec3::new(0.0, self.floor.elevation, 0.0),
                scale: 1.0,
            };
        };

        let fit = |room: f32, extent: f32| if extent > room { room / extent } else { 1.0 };
        let scale = fit(self.room.size.x, max.x - min.x).min(fit(self.room.size.z, max.z - min.z));

        let center_x = (min.x + max.x) * 0.5;
        let center_z = (min.z + max.z) * 0.5;
        ModelPlacement {
            translation: Vec3::new(
                -center_x * scale,
                self.floor.elevation - min.y * scale,
                -center_z * scale,
            ),
            scale,
        }
    }
}

impl Default for ShowcaseScene {
    fn default() -> Self {
        Self::standard()
    }
}
