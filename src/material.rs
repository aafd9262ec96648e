use crate::algebra::{vec3_from_array, Vec3};
use serde::Deserialize;

/// Phong coefficients plus the mirror blend factor.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct Material {
    #[serde(deserialize_with = "vec3_from_array")]
    pub ambient: Vec3,
    #[serde(deserialize_with = "vec3_from_array")]
    pub diffuse: Vec3,
    #[serde(deserialize_with = "vec3_from_array")]
    pub specular: Vec3,
    pub shininess: f64,
    /// 0 = purely local shading, 1 = perfect mirror.
    #[serde(default)]
    pub mirror: f64,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            ambient: Vec3::splat(0.1),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::ZERO,
            shininess: 1.0,
            mirror: 0.0,
        }
    }
}
