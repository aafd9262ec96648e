use serde::Deserialize;
use std::ops::{Add, AddAssign, Div, Index, Mul, Neg, Sub};

/// Point, direction or RGB color, depending on where it shows up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3(pub f64, pub f64, pub f64);

impl Vec3 {
    pub const ZERO: Vec3 = Vec3(0.0, 0.0, 0.0);
    pub const ONE: Vec3 = Vec3(1.0, 1.0, 1.0);

    pub fn splat(v: f64) -> Self { Self(v, v, v) }

    pub fn scale(self, f: f64) -> Self { Self(self.0*f, self.1*f, self.2*f) }
    /// Component-wise product, mostly for colors.
    pub fn mul(self, v: Self) -> Self { Self(self.0*v.0, self.1*v.1, self.2*v.2) }
    pub fn dot(self, v: Self) -> f64 { self.0*v.0 + self.1*v.1 + self.2*v.2 }
    pub fn cross(self, v: Self) -> Self {
        Self(self.1*v.2-self.2*v.1, self.2*v.0-self.0*v.2, self.0*v.1-self.1*v.0)
    }
    pub fn norm(self) -> f64 { self.dot(self).sqrt() }
    pub fn normalize(self) -> Self { self.scale(1.0/self.norm()) }

    pub fn min(self, v: Self) -> Self { Self(self.0.min(v.0), self.1.min(v.1), self.2.min(v.2)) }
    pub fn max(self, v: Self) -> Self { Self(self.0.max(v.0), self.1.max(v.1), self.2.max(v.2)) }

    pub fn map(self, f: impl Fn(f64) -> f64) -> Self { Self(f(self.0), f(self.1), f(self.2)) }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, v: Vec3) -> Vec3 { Vec3(self.0+v.0, self.1+v.1, self.2+v.2) }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, v: Vec3) { *self = *self + v; }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, v: Vec3) -> Vec3 { Vec3(self.0-v.0, self.1-v.1, self.2-v.2) }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 { Vec3(-self.0, -self.1, -self.2) }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, f: f64) -> Vec3 { self.scale(f) }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;
    fn mul(self, v: Vec3) -> Vec3 { v.scale(self) }
}

impl Div<f64> for Vec3 {
    type Output = Vec3;
    fn div(self, f: f64) -> Vec3 { Vec3(self.0/f, self.1/f, self.2/f) }
}

impl Index<usize> for Vec3 {
    type Output = f64;
    fn index(&self, i: usize) -> &f64 {
        match i {
            0 => &self.0,
            1 => &self.1,
            2 => &self.2,
            _ => panic!("Vec3 index {i} out of range"),
        }
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(a: [f64; 3]) -> Self { Vec3(a[0], a[1], a[2]) }
}

/* Custom helper so Serde turns a JSON array into Vec3 */
pub fn vec3_from_array<'de, D>(d: D) -> Result<Vec3, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let arr = <[f64; 3]>::deserialize(d)?;
    Ok(arr.into())
}

/// Reflect the incoming direction `v` about `n`.
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 { v - n.scale(2.0*v.dot(n)) }

/// Mirror the outgoing direction `l` (pointing away from the surface) about `n`.
pub fn mirror(l: Vec3, n: Vec3) -> Vec3 { n.scale(2.0*n.dot(l)) - l }

#[cfg(test)]
pub(crate) fn assert_vec_close(a: Vec3, b: Vec3) {
    let d = (a - b).norm();
    assert!(d < 1e-9, "expected {b:?}, got {a:?} (distance {d})");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_follows_right_hand_rule() {
        assert_eq!(Vec3(1.0, 0.0, 0.0).cross(Vec3(0.0, 1.0, 0.0)), Vec3(0.0, 0.0, 1.0));
    }

    #[test]
    fn reflect_and_mirror_agree() {
        let n = Vec3(0.0, 1.0, 0.0);
        let d = Vec3(1.0, -1.0, 0.0);
        assert_vec_close(reflect(d, n), Vec3(1.0, 1.0, 0.0));
        // mirror takes the reversed direction and yields the same outgoing ray
        assert_vec_close(mirror(-d, n), Vec3(1.0, 1.0, 0.0));
    }

    #[test]
    fn index_and_componentwise_min_max() {
        let a = Vec3(1.0, 5.0, -2.0);
        let b = Vec3(3.0, 0.0, -4.0);
        assert_eq!(a.min(b), Vec3(1.0, 0.0, -4.0));
        assert_eq!(a.max(b), Vec3(3.0, 5.0, -2.0));
        assert_eq!(a[1], 5.0);
    }

    #[test]
    fn json_array_deserializes() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(deserialize_with = "vec3_from_array")]
            v: Vec3,
        }
        let h: Holder = serde_json::from_str(r#"{"v": [1, 2.5, -3]}"#).unwrap();
        assert_eq!(h.v, Vec3(1.0, 2.5, -3.0));
    }
}
