use crate::{
    algebra::Vec3,
    material::Material,
    object::Hit,
    quadratic::solve_quadratic,
    ray::Ray,
};

/// Open cylinder (no caps) starting at `center` and running `height` along
/// `axis`.
#[derive(Clone, Copy, Debug)]
pub struct Cylinder {
    pub center  : Vec3,
    pub axis    : Vec3,
    pub radius  : f64,
    pub height  : f64,
    pub material: Material,
}

impl Cylinder {
    pub fn new(center: Vec3, radius: f64, axis: Vec3, height: f64, material: Material) -> Self {
        Cylinder { center, axis: axis.normalize(), radius, height, material }
    }

    /// Component of `v` perpendicular to the axis.
    fn radial(&self, v: Vec3) -> Vec3 {
        v - self.axis * v.dot(self.axis)
    }

    pub fn hit(&self, ray: &Ray) -> Option<Hit> {
        let d  = self.radial(ray.direction);
        let oc = self.radial(ray.origin - self.center);

        let roots = solve_quadratic(
            d.dot(d),
            2.0 * d.dot(oc),
            oc.dot(oc) - self.radius * self.radius,
        );

        let (t, point) = roots
            .as_slice()
            .iter()
            .copied()
            .filter(|&t| t > 0.0)
            .map(|t| (t, ray.at(t)))
            .filter(|&(_, p)| {
                let h = (p - self.center).dot(self.axis);
                (0.0..=self.height).contains(&h)
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))?;

        let on_axis = self.center + self.axis * (point - self.center).dot(self.axis);
        let mut normal = (point - on_axis).normalize();
        if ray.direction.dot(normal) > 0.0 {
            normal = -normal;
        }
        Some(Hit { t, point, normal })
    }
}
