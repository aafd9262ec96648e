use crate::object::Object;
use crate::{
    algebra::{vec3_from_array, Vec3},
    camera::Camera,
    cylinder::Cylinder,
    error::SceneError,
    light::Light,
    material::Material,
    mesh::{DrawMode, Mesh},
    plane::Plane,
    sphere::Sphere,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Everything the renderer needs. Read-only once loaded.
#[derive(Clone, Debug)]
pub struct Scene {
    pub camera: Camera,
    pub objects: Vec<Object>,
    pub lights: Vec<Light>,
    pub background: Vec3,
    pub ambience: Vec3,
    /// Maximum number of mirror bounces.
    pub max_depth: u32,
}

/// Load a scene file. `.json` files use the JSON layout, everything else the
/// keyword format. Relative mesh paths are resolved against the scene's
/// directory.
pub fn load(path: &Path) -> Result<Scene, SceneError> {
    let data = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

    let is_json = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        from_json(&data, base_dir)
    } else {
        parse(&data, base_dir)
    }
}

// ── keyword format ─────────────────────────────────────────────────────────

/// Scene under construction; the camera is mandatory.
#[derive(Default)]
struct SceneBuilder {
    camera: Option<Camera>,
    objects: Vec<Object>,
    lights: Vec<Light>,
    background: Vec3,
    ambience: Vec3,
    max_depth: u32,
}

impl SceneBuilder {
    fn build(self) -> Result<Scene, SceneError> {
        Ok(Scene {
            camera: self.camera.ok_or(SceneError::MissingCamera)?,
            objects: self.objects,
            lights: self.lights,
            background: self.background,
            ambience: self.ambience,
            max_depth: self.max_depth,
        })
    }
}

struct Parser<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
    keyword: &'a str,
    base_dir: &'a Path,
}

impl<'a> Parser<'a> {
    fn word(&mut self, field: &'static str) -> Result<&'a str, SceneError> {
        let token = self.tokens.get(self.pos).copied().ok_or_else(|| SceneError::MissingField {
            keyword: self.keyword.to_string(),
            field,
        })?;
        self.pos += 1;
        Ok(token)
    }

    fn num<T: FromStr>(&mut self, field: &'static str) -> Result<T, SceneError> {
        let token = self.word(field)?;
        token.parse().map_err(|_| SceneError::InvalidNumber {
            keyword: self.keyword.to_string(),
            token: token.to_string(),
        })
    }

    fn vec3(&mut self, field: &'static str) -> Result<Vec3, SceneError> {
        Ok(Vec3(self.num(field)?, self.num(field)?, self.num(field)?))
    }

    fn material(&mut self) -> Result<Material, SceneError> {
        Ok(Material {
            ambient: self.vec3("ambient color")?,
            diffuse: self.vec3("diffuse color")?,
            specular: self.vec3("specular color")?,
            shininess: self.num("shininess")?,
            mirror: self.num("mirror coefficient")?,
        })
    }
}

type EntityParser = fn(&mut Parser, &mut SceneBuilder) -> Result<(), SceneError>;

fn entity_parsers() -> HashMap<&'static str, EntityParser> {
    let mut table: HashMap<&'static str, EntityParser> = HashMap::new();
    table.insert("depth", |p, s| {
        s.max_depth = p.num("depth")?;
        Ok(())
    });
    table.insert("camera", |p, s| {
        let eye = p.vec3("eye")?;
        let center = p.vec3("center")?;
        let up = p.vec3("up vector")?;
        let fovy = p.num("field of view")?;
        let width = p.num("width")?;
        let height = p.num("height")?;
        s.camera = Some(Camera::new(eye, center, up, fovy, width, height));
        Ok(())
    });
    table.insert("background", |p, s| {
        s.background = p.vec3("color")?;
        Ok(())
    });
    table.insert("ambience", |p, s| {
        s.ambience = p.vec3("color")?;
        Ok(())
    });
    table.insert("light", |p, s| {
        let position = p.vec3("position")?;
        let color = p.vec3("color")?;
        s.lights.push(Light { position, color });
        Ok(())
    });
    table.insert("plane", |p, s| {
        let center = p.vec3("center")?;
        let normal = p.vec3("normal")?;
        let material = p.material()?;
        s.objects.push(Object::Plane(Plane::new(center, normal, material)));
        Ok(())
    });
    table.insert("sphere", |p, s| {
        let center = p.vec3("center")?;
        let radius = p.num("radius")?;
        let material = p.material()?;
        s.objects.push(Object::Sphere(Sphere { center, radius, material }));
        Ok(())
    });
    table.insert("cylinder", |p, s| {
        let center = p.vec3("center")?;
        let radius = p.num("radius")?;
        let axis = p.vec3("axis")?;
        let height = p.num("height")?;
        let material = p.material()?;
        s.objects.push(Object::Cylinder(Cylinder::new(center, radius, axis, height, material)));
        Ok(())
    });
    table.insert("mesh", |p, s| {
        let name = p.word("file name")?;
        let file = p.base_dir.join(name);
        let mode: DrawMode = p.word("draw mode")?.parse()?;
        let material = p.material()?;
        s.objects.push(Object::Mesh(Mesh::load(&file, mode, material)?));
        Ok(())
    });
    table
}

/// Parse the keyword format. `#` comments out the rest of a line.
pub fn parse(text: &str, base_dir: &Path) -> Result<Scene, SceneError> {
    let tokens = text
        .lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .flat_map(str::split_whitespace)
        .collect();
    let mut parser = Parser { tokens, pos: 0, keyword: "", base_dir };
    let parsers = entity_parsers();
    let mut scene = SceneBuilder::default();

    while let Some(&token) = parser.tokens.get(parser.pos) {
        parser.pos += 1;
        let entity = parsers
            .get(token)
            .ok_or_else(|| SceneError::UnknownToken(token.to_string()))?;
        parser.keyword = token;
        entity(&mut parser, &mut scene)?;
    }

    scene.build()
}

// ── JSON format ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SceneFile {
    #[serde(default)]
    depth: u32,
    camera: Camera,
    #[serde(default, deserialize_with = "vec3_from_array")]
    background: Vec3,
    #[serde(default, deserialize_with = "vec3_from_array")]
    ambience: Vec3,
    #[serde(default)]
    lights: Vec<Light>,
    #[serde(default)]
    objects: Vec<ObjectJson>,
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum ObjectJson {
    Plane(PlaneDesc),
    Sphere(SphereDesc),
    Cylinder(CylinderDesc),
    Mesh(MeshDesc),
}

#[derive(Deserialize)]
struct PlaneDesc {
    #[serde(deserialize_with = "vec3_from_array")]
    center: Vec3,
    #[serde(deserialize_with = "vec3_from_array")]
    normal: Vec3,
    material: Material,
}

#[derive(Deserialize)]
struct SphereDesc {
    #[serde(deserialize_with = "vec3_from_array")]
    center: Vec3,
    radius: f64,
    material: Material,
}

#[derive(Deserialize)]
struct CylinderDesc {
    #[serde(deserialize_with = "vec3_from_array")]
    center: Vec3,
    radius: f64,
    #[serde(deserialize_with = "vec3_from_array")]
    axis: Vec3,
    height: f64,
    material: Material,
}

#[derive(Deserialize)]
struct MeshDesc {
    #[serde(alias = "obj", alias = "off")]
    file: PathBuf,
    mode: DrawMode,
    material: Material,
}

pub fn from_json(data: &str, base_dir: &Path) -> Result<Scene, SceneError> {
    let file: SceneFile = serde_json::from_str(data)?;

    let objects = file
        .objects
        .into_iter()
        .map(|o| {
            Ok(match o {
                ObjectJson::Plane(p) => Object::Plane(Plane::new(p.center, p.normal, p.material)),
                ObjectJson::Sphere(s) => Object::Sphere(Sphere {
                    center: s.center,
                    radius: s.radius,
                    material: s.material,
                }),
                ObjectJson::Cylinder(c) => {
                    Object::Cylinder(Cylinder::new(c.center, c.radius, c.axis, c.height, c.material))
                }
                ObjectJson::Mesh(m) => {
                    Object::Mesh(Mesh::load(&base_dir.join(&m.file), m.mode, m.material)?)
                }
            })
        })
        .collect::<Result<Vec<_>, SceneError>>()?;

    Ok(Scene {
        camera: file.camera,
        objects,
        lights: file.lights,
        background: file.background,
        ambience: file.ambience,
        max_depth: file.depth,
    })
}
