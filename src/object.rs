use crate::{
    algebra::Vec3,
    cylinder::Cylinder,
    material::Material,
    mesh::Mesh,
    plane::Plane,
    ray::Ray,
    sphere::Sphere,
};

/// Upper bound used when searching for the closest hit. Any real hit has a
/// smaller `t`.
pub const NO_INTERSECTION: f64 = f64::MAX;

#[derive(Clone, Copy, Debug)]
pub struct Hit {
    pub t: f64,
    pub point: Vec3,
    /// Unit length.
    pub normal: Vec3,
}

#[derive(Clone, Debug)]
pub enum Object {
    Plane(Plane),
    Sphere(Sphere),
    Cylinder(Cylinder),
    Mesh(Mesh),
}

impl Object {
    pub fn hit(&self, ray: &Ray) -> Option<Hit> {
        match self {
            Self::Plane(p) => p.hit(ray),
            Self::Sphere(s) => s.hit(ray),
            Self::Cylinder(c) => c.hit(ray),
            Self::Mesh(m) => m.hit(ray),
        }
    }

    pub fn material(&self) -> &Material {
        match self {
            Self::Plane(p) => &p.material,
            Self::Sphere(s) => &s.material,
            Self::Cylinder(c) => &c.material,
            Self::Mesh(m) => &m.material,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Plane(_) => "plane",
            Self::Sphere(_) => "sphere",
            Self::Cylinder(_) => "cylinder",
            Self::Mesh(_) => "mesh",
        }
    }
}
