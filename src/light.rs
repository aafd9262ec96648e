use crate::algebra::{vec3_from_array, Vec3};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Light {
    #[serde(deserialize_with = "vec3_from_array")]
    pub position: Vec3,
    #[serde(deserialize_with = "vec3_from_array")]
    pub color: Vec3,
}
