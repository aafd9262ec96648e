use crate::algebra::{vec3_from_array, Vec3};
use crate::ray::Ray;
use serde::Deserialize;

/// Pinhole camera looking from `eye` at `center`. Pixel `(0, 0)` is the
/// lower-left corner of the image plane.
#[derive(Clone, Debug, Deserialize)]
#[serde(from = "CameraJson")]
pub struct Camera {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fovy: f64,
    pub width: u32,
    pub height: u32,

    x_dir: Vec3,
    y_dir: Vec3,
    lower_left: Vec3,
}

#[derive(Deserialize)]
struct CameraJson {
    #[serde(deserialize_with = "vec3_from_array")]
    eye: Vec3,
    #[serde(deserialize_with = "vec3_from_array")]
    center: Vec3,
    #[serde(deserialize_with = "vec3_from_array")]
    up: Vec3,
    fovy: f64,
    width: u32,
    height: u32,
}

impl From<CameraJson> for Camera {
    fn from(c: CameraJson) -> Self {
        Camera::new(c.eye, c.center, c.up, c.fovy, c.width, c.height)
    }
}

impl Camera {
    pub fn new(eye: Vec3, center: Vec3, up: Vec3, fovy: f64, width: u32, height: u32) -> Camera {
        let view = center - eye;
        let dist = view.norm();
        let view = view.normalize();

        let (w, h) = (width as f64, height as f64);
        let image_height = 2.0 * dist * (0.5 * fovy.to_radians()).tan();
        let image_width = w / h * image_height;

        let x_dir = view.cross(up).normalize() * (image_width / w);
        let y_dir = x_dir.cross(view).normalize() * (image_height / h);
        let lower_left = center - x_dir * (0.5 * w) - y_dir * (0.5 * h);

        Camera { eye, center, up, fovy, width, height, x_dir, y_dir, lower_left }
    }

    pub fn primary_ray(&self, x: u32, y: u32) -> Ray {
        let target = self.lower_left + self.x_dir * x as f64 + self.y_dir * y as f64;
        Ray::new(self.eye, target - self.eye)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::assert_vec_close;

    fn camera() -> Camera {
        Camera::new(Vec3(0.0, 0.0, 5.0), Vec3::ZERO, Vec3(0.0, 1.0, 0.0), 90.0, 100, 50)
    }

    #[test]
    fn center_pixel_looks_at_center() {
        let ray = camera().primary_ray(50, 25);
        assert_vec_close(ray.origin, Vec3(0.0, 0.0, 5.0));
        assert_vec_close(ray.direction, Vec3(0.0, 0.0, -5.0));
    }

    #[test]
    fn image_plane_extent_and_orientation() {
        let c = camera();
        // fovy 90° at distance 5 spans 10 units vertically, 20 horizontally
        assert_vec_close(c.primary_ray(0, 0).at(1.0), Vec3(-10.0, -5.0, 0.0));
        let right = c.primary_ray(99, 25).direction;
        assert!(right.0 > 0.0);
        let top = c.primary_ray(50, 49).direction;
        assert!(top.1 > 0.0);
    }

    #[test]
    fn deserializes_from_json() {
        let c: Camera = serde_json::from_str(
            r#"{"eye": [0, 0, 5], "center": [0, 0, 0], "up": [0, 1, 0], "fovy": 90, "width": 100, "height": 50}"#,
        )
        .unwrap();
        assert_vec_close(c.primary_ray(50, 25).direction, Vec3(0.0, 0.0, -5.0));
    }
}
