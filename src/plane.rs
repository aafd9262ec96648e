use crate::{
    algebra::Vec3,
    material::Material,
    object::Hit,
    ray::Ray,
};

/// Infinite plane through `center`. The normal is the fixed front face and is
/// returned as-is for hits from either side.
#[derive(Clone, Debug)]
pub struct Plane {
    pub center  : Vec3,
    pub normal  : Vec3,
    pub material: Material,
}

impl Plane {
    pub fn new(center: Vec3, normal: Vec3, material: Material) -> Self {
        Plane { center, normal: normal.normalize(), material }
    }

    pub fn hit(&self, ray: &Ray) -> Option<Hit> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < f64::EPSILON {            // ray ‖ plane
            return None;
        }

        let t = self.normal.dot(self.center - ray.origin) / denom;
        if t.is_nan() || t <= 0.0 {               // behind or at the origin
            return None;
        }

        Some(Hit { t, point: ray.at(t), normal: self.normal })
    }
}
