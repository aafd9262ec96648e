use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use crate::{
    aabb::Aabb,
    algebra::Vec3,
    error::SceneError,
    material::Material,
    object::Hit,
    ray::Ray,
};

const PARALLEL_EPS: f64 = 1e-8;
/// Minimum `t` for a triangle hit, keeps grazing rays off their own surface.
const MIN_T: f64 = 1e-8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DrawMode {
    /// One normal per triangle.
    Flat,
    /// Barycentric interpolation of the vertex normals.
    Phong,
}

impl FromStr for DrawMode {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FLAT" => Ok(DrawMode::Flat),
            "PHONG" => Ok(DrawMode::Phong),
            _ => Err(SceneError::InvalidDrawMode(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

#[derive(Clone, Copy, Debug)]
pub struct Triangle {
    pub i0: usize,
    pub i1: usize,
    pub i2: usize,
    pub normal: Vec3,
}

#[derive(Clone, Debug)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
    pub aabb: Aabb,
    pub draw_mode: DrawMode,
    pub material: Material,
}

impl Mesh {
    /// Build a mesh from raw positions and index triples, computing face and
    /// vertex normals and the bounding box. Indices must be in range.
    pub fn new(
        positions: Vec<Vec3>,
        faces: Vec<[usize; 3]>,
        draw_mode: DrawMode,
        material: Material,
    ) -> Mesh {
        let vertices = positions
            .into_iter()
            .map(|position| Vertex { position, normal: Vec3::ZERO })
            .collect();
        let triangles = faces
            .into_iter()
            .map(|[i0, i1, i2]| Triangle { i0, i1, i2, normal: Vec3::ZERO })
            .collect();

        let mut mesh = Mesh {
            vertices,
            triangles,
            aabb: Aabb::empty(),
            draw_mode,
            material,
        };
        mesh.compute_normals();
        mesh.aabb = Aabb::from_points(mesh.vertices.iter().map(|v| &v.position));
        mesh
    }

    /// Load an OFF file, or a Wavefront OBJ file when the extension says so.
    pub fn load(path: &Path, draw_mode: DrawMode, material: Material) -> Result<Mesh, SceneError> {
        let is_obj = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("obj"));
        let (positions, faces) = if is_obj {
            load_obj(path)?
        } else {
            let text = std::fs::read_to_string(path)
                .map_err(|e| SceneError::mesh(path, e.to_string()))?;
            parse_off(&text).map_err(|reason| SceneError::mesh(path, reason))?
        };

        if let Some(bad) = faces.iter().flatten().find(|&&i| i >= positions.len()) {
            return Err(SceneError::mesh(
                path,
                format!("vertex index {bad} out of range ({} vertices)", positions.len()),
            ));
        }
        Ok(Mesh::new(positions, faces, draw_mode, material))
    }

    fn compute_normals(&mut self) {
        for t in &mut self.triangles {
            let p0 = self.vertices[t.i0].position;
            let p1 = self.vertices[t.i1].position;
            let p2 = self.vertices[t.i2].position;
            t.normal = normalize_or_zero((p1 - p0).cross(p2 - p0));
        }

        for v in &mut self.vertices {
            v.normal = Vec3::ZERO;
        }
        for t in &self.triangles {
            // zero-area triangles have no direction to contribute
            if t.normal == Vec3::ZERO {
                continue;
            }
            let [w0, w1, w2] = angle_weights(
                self.vertices[t.i0].position,
                self.vertices[t.i1].position,
                self.vertices[t.i2].position,
            );
            self.vertices[t.i0].normal += t.normal * w0;
            self.vertices[t.i1].normal += t.normal * w1;
            self.vertices[t.i2].normal += t.normal * w2;
        }
        for v in &mut self.vertices {
            v.normal = normalize_or_zero(v.normal);
        }
    }

    pub fn hit(&self, ray: &Ray) -> Option<Hit> {
        if !self.aabb.hit(ray) {
            return None;
        }

        let (tri, t, beta, gamma) = self
            .triangles
            .iter()
            .filter_map(|tri| {
                self.hit_triangle(tri, ray)
                    .map(|(t, beta, gamma)| (tri, t, beta, gamma))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))?;

        let mut normal = match self.draw_mode {
            DrawMode::Flat => tri.normal,
            DrawMode::Phong => {
                let n0 = self.vertices[tri.i0].normal;
                let n1 = self.vertices[tri.i1].normal;
                let n2 = self.vertices[tri.i2].normal;
                // opposing faces can cancel out the vertex normals
                let n = normalize_or_zero(n0 * (1.0 - beta - gamma) + n1 * beta + n2 * gamma);
                if n == Vec3::ZERO { tri.normal } else { n }
            }
        };
        if ray.direction.dot(normal) > 0.0 {
            normal = -normal;
        }

        Some(Hit { t, point: ray.at(t), normal })
    }

    /// Möller–Trumbore. Returns `(t, beta, gamma)`.
    fn hit_triangle(&self, tri: &Triangle, ray: &Ray) -> Option<(f64, f64, f64)> {
        let p0 = self.vertices[tri.i0].position;
        let p1 = self.vertices[tri.i1].position;
        let p2 = self.vertices[tri.i2].position;

        let edge1 = p1 - p0;
        let edge2 = p2 - p0;
        let h = ray.direction.cross(edge2);
        let a = edge1.dot(h);
        if a.abs() < PARALLEL_EPS {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - p0;
        let beta = f * s.dot(h);
        if !(0.0..=1.0).contains(&beta) {
            return None;
        }

        let q = s.cross(edge1);
        let gamma = f * ray.direction.dot(q);
        if gamma < 0.0 || beta + gamma > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if t < MIN_T {
            return None;
        }
        Some((t, beta, gamma))
    }
}

fn normalize_or_zero(v: Vec3) -> Vec3 {
    let n = v.norm();
    if n > 0.0 { v / n } else { Vec3::ZERO }
}

/// Interior angle of the triangle at each of its corners.
fn angle_weights(p0: Vec3, p1: Vec3, p2: Vec3) -> [f64; 3] {
    let e01 = (p1 - p0).normalize();
    let e12 = (p2 - p1).normalize();
    let e20 = (p0 - p2).normalize();
    let angle = |a: Vec3, b: Vec3| a.dot(b).clamp(-1.0, 1.0).acos();
    [angle(e01, -e20), angle(e12, -e01), angle(e20, -e12)]
}

/// OFF: `OFF`, then `nV nF nE`, then vertex rows, then face rows
/// `n i0 i1 ... i(n-1)`. Polygons are split into triangle fans.
fn parse_off(text: &str) -> Result<(Vec<Vec3>, Vec<[usize; 3]>), String> {
    let mut tokens = OffTokens::new(text);

    if tokens.next("header")? != "OFF" {
        return Err("No OFF file".to_string());
    }
    let n_vertices: usize = tokens.num("header")?;
    let n_faces: usize = tokens.num("header")?;
    let _n_edges: usize = tokens.num("header")?;

    // header counts are untrusted; never reserve more than the file can hold
    let mut positions = Vec::with_capacity(n_vertices.min(tokens.remaining() / 3));
    for _ in 0..n_vertices {
        let x = tokens.num("vertices")?;
        let y = tokens.num("vertices")?;
        let z = tokens.num("vertices")?;
        positions.push(Vec3(x, y, z));
    }

    let mut faces = Vec::with_capacity(n_faces.min(tokens.remaining() / 4));
    for _ in 0..n_faces {
        let n: usize = tokens.num("faces")?;
        if n < 3 {
            return Err(format!("face with {n} vertices"));
        }
        let polygon = (0..n)
            .map(|_| tokens.num("faces"))
            .collect::<Result<Vec<usize>, String>>()?;
        for k in 1..n - 1 {
            faces.push([polygon[0], polygon[k], polygon[k + 1]]);
        }
    }

    Ok((positions, faces))
}

struct OffTokens<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
}

impl<'a> OffTokens<'a> {
    fn new(text: &'a str) -> Self {
        let tokens = text
            .lines()
            .map(|line| line.split('#').next().unwrap_or(""))
            .flat_map(str::split_whitespace)
            .collect();
        OffTokens { tokens, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.tokens.len() - self.pos
    }

    fn next(&mut self, what: &str) -> Result<&'a str, String> {
        let token = self
            .tokens
            .get(self.pos)
            .copied()
            .ok_or_else(|| format!("unexpected end of file while reading {what}"))?;
        self.pos += 1;
        Ok(token)
    }

    fn num<T: FromStr>(&mut self, what: &str) -> Result<T, String> {
        let token = self.next(what)?;
        token.parse().map_err(|_| format!("`{token}` is not a valid number"))
    }
}

fn load_obj(path: &Path) -> Result<(Vec<Vec3>, Vec<[usize; 3]>), SceneError> {
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };
    let (models, _materials) = tobj::load_obj(path, &options)
        .map_err(|e| SceneError::mesh(path, e.to_string()))?;

    let mut positions = Vec::new();
    let mut faces = Vec::new();
    for model in &models {
        let base = positions.len();
        positions.extend(
            model
                .mesh
                .positions
                .chunks_exact(3)
                .map(|p| Vec3(p[0] as f64, p[1] as f64, p[2] as f64)),
        );
        faces.extend(model.mesh.indices.chunks_exact(3).map(|f| {
            [
                base + f[0] as usize,
                base + f[1] as usize,
                base + f[2] as usize,
            ]
        }));
    }
    Ok((positions, faces))
}
