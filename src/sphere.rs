//! src/sphere.rs
//! -------------
//! Sphere with constant radius.

use crate::{
    algebra::Vec3,
    material::Material,
    object::Hit,
    quadratic::solve_quadratic,
    ray::Ray,
};

#[derive(Clone, Copy, Debug)]
pub struct Sphere {
    pub center   : Vec3,
    pub radius   : f64,
    pub material : Material,
}

impl Sphere {
    /// Intersect a ray (o + t·d).
    /// Returns the *closest positive* hit, normal facing the ray.
    pub fn hit(&self, ray: &Ray) -> Option<Hit> {
        let d  = ray.direction;
        let oc = ray.origin - self.center;

        let roots = solve_quadratic(
            d.dot(d),
            2.0 * d.dot(oc),
            oc.dot(oc) - self.radius * self.radius,
        );

        let t = roots
            .as_slice()
            .iter()
            .copied()
            .filter(|&t| t > 0.0)
            .min_by(|a, b| a.total_cmp(b))?;

        let point  = ray.at(t);
        let mut normal = (point - self.center).normalize();
        if d.dot(normal) > 0.0 {
            normal = -normal;
        }
        Some(Hit { t, point, normal })
    }
}
