use crate::algebra::Vec3;
use std::str::FromStr;

/// How unbounded radiance is squeezed into [0, 1] before quantization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToneMap {
    /// Cut every channel at 1.
    #[default]
    Clamp,
    Reinhard,
}

impl ToneMap {
    pub fn apply(self, c: Vec3) -> Vec3 {
        match self {
            ToneMap::Clamp => clamp(c),
            ToneMap::Reinhard => reinhard(c),
        }
    }
}

impl FromStr for ToneMap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clamp" => Ok(ToneMap::Clamp),
            "reinhard" => Ok(ToneMap::Reinhard),
            _ => Err(format!("unknown tone map `{s}` (expected clamp or reinhard)")),
        }
    }
}

pub fn clamp(c: Vec3) -> Vec3 {
    c.map(|x| x.clamp(0.0, 1.0))
}

pub fn reinhard(c: Vec3) -> Vec3 {
    let c = c.max(Vec3::ZERO);
    Vec3(
        c.0 / (1.0 + c.0),
        c.1 / (1.0 + c.1),
        c.2 / (1.0 + c.2),
    )
}

/// Quantize a [0, 1] color to 8 bits per channel.
pub fn to_rgb8(c: Vec3) -> [u8; 3] {
    [
        (c.0*255.0).round() as u8,
        (c.1*255.0).round() as u8,
        (c.2*255.0).round() as u8,
    ]
}
