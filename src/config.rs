// Startup configuration for BoxPick-3D

use glam::Vec3;

use crate::math::Camera;
use crate::scene::IdColor;

/// Initial window placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub x: i32,
    pub y: i32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            x: 100,
            y: 100,
            title: "BoxPick-3D".to_string(),
        }
    }
}

/// Everything fixed once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub window: WindowConfig,
    /// Clear color; also the "nothing here" answer of a pick.
    pub background: IdColor,
    pub camera: Camera,
    /// Point light, fixed in world space.
    pub light_position: Vec3,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            background: IdColor::WHITE,
            camera: Camera::new(Vec3::new(6.0, 4.0, 8.0), Vec3::ZERO, Vec3::Y)
                .with_parallel(5.0, 5.0, 0.1, 200.0),
            light_position: Vec3::new(5.0, 5.0, 5.0),
        }
    }
}
