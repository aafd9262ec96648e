use crate::algebra::Vec3;
use crate::ray::Ray;

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Inverted box that any point will grow.
    pub fn empty() -> Aabb {
        Aabb {
            min: Vec3::splat(f64::MAX),
            max: Vec3::splat(f64::MIN),
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Aabb {
        let mut aabb = Aabb::empty();
        for p in points {
            aabb.add_point(*p);
        }
        aabb
    }

    /// Update the bounding box with new position
    pub fn add_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Slab test. Zero direction components divide to ±inf, which the interval
    /// logic handles; a 0/0 slab (origin on the slab boundary) is ignored.
    pub fn hit(&self, ray: &Ray) -> bool {
        let mut tmin = f64::NEG_INFINITY;
        let mut tmax = f64::INFINITY;

        for i in 0..3 {
            let mut t0 = (self.min[i] - ray.origin[i]) / ray.direction[i];
            let mut t1 = (self.max[i] - ray.origin[i]) / ray.direction[i];
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if tmin > t1 || t0 > tmax {
                return false;
            }
            tmin = tmin.max(t0);
            tmax = tmax.min(t1);
        }

        // tmin == tmax still counts, flat boxes have zero thickness
        tmax >= tmin && tmax > 0.0
    }
}
