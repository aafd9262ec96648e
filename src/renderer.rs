use crate::{
    algebra::{mirror, reflect, Vec3},
    material::Material,
    object::{Hit, Object, NO_INTERSECTION},
    ray::Ray,
    scene::Scene,
    tonemap::{to_rgb8, ToneMap},
};
use image::{Rgb, RgbImage};
use indicatif::ProgressBar;
use rayon::prelude::*;

/// Offset along the normal for secondary ray origins, so they don't
/// immediately re-hit the surface they start on.
const SURFACE_OFFSET: f64 = 0.001;

/// Closest hit over all objects. Ties keep the earlier object.
pub fn intersect<'a>(scene: &'a Scene, ray: &Ray) -> Option<(&'a Object, Hit)> {
    let mut closest = None;
    let mut t_min = NO_INTERSECTION;

    for o in &scene.objects {
        if let Some(hit) = o.hit(ray) {
            if hit.t < t_min {
                t_min = hit.t;
                closest = Some((o, hit));
            }
        }
    }

    closest
}

/// Local Phong shading with hard shadows.
/// `view` points from the surface towards the viewer.
pub fn lighting(scene: &Scene, point: Vec3, normal: Vec3, view: Vec3, mat: &Material) -> Vec3 {
    let mut color = mat.ambient.mul(scene.ambience);

    for light in &scene.lights {
        let l = (light.position - point).normalize();

        // Visibility (shadow) test
        let shadow_ray = Ray::new(point + normal * SURFACE_OFFSET, l);
        if intersect(scene, &shadow_ray).is_some() {
            continue;
        }

        let n_dot_l = normal.dot(l);
        if n_dot_l > 0.0 {
            let diffuse = mat.diffuse * n_dot_l;
            let r_dot_v = mirror(l, normal).dot(view).max(0.0);
            let specular = mat.specular * r_dot_v.powf(mat.shininess);
            color += light.color.mul(diffuse + specular);
        }
    }

    color
}

/// Radiance along `ray`, following mirror reflections up to
/// `scene.max_depth` bounces. Not clamped.
pub fn trace(scene: &Scene, ray: &Ray, depth: u32) -> Vec3 {
    if depth > scene.max_depth {
        return Vec3::ZERO;
    }

    let (object, hit) = match intersect(scene, ray) {
        Some(v) => v,
        None => return scene.background,
    };
    let mat = object.material();

    let mut color = lighting(scene, hit.point, hit.normal, -ray.direction, mat);

    if mat.mirror > 0.0 && depth < scene.max_depth {
        let reflected_ray = Ray::new(
            hit.point + hit.normal * SURFACE_OFFSET,
            reflect(ray.direction, hit.normal),
        );
        let reflected = trace(scene, &reflected_ray, depth + 1);
        color = color * (1.0 - mat.mirror) + reflected * mat.mirror;
    }

    color
}

/// Render one column, bottom to top.
fn render_column(scene: &Scene, tone_map: ToneMap, x: u32) -> Vec<[u8; 3]> {
    (0..scene.camera.height)
        .map(|y| {
            let ray = scene.camera.primary_ray(x, y);
            to_rgb8(tone_map.apply(trace(scene, &ray, 0)))
        })
        .collect()
}

/// Render the whole image. Columns are traced in parallel; `progress` ticks
/// once per finished column.
pub fn render(scene: &Scene, tone_map: ToneMap, progress: &ProgressBar) -> RgbImage {
    let width = scene.camera.width;
    let height = scene.camera.height;

    let columns: Vec<Vec<[u8; 3]>> = (0..width)
        .into_par_iter()
        .map(|x| {
            let column = render_column(scene, tone_map, x);
            progress.inc(1);
            column
        })
        .collect();

    let mut img = RgbImage::new(width, height);
    for (x, column) in (0..width).zip(columns) {
        for (y, rgb) in (0..height).zip(column) {
            // camera y points up, image rows go down
            img.put_pixel(x, height - 1 - y, Rgb(rgb));
        }
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{camera::Camera, light::Light, plane::Plane, sphere::Sphere};

    fn matte(color: Vec3) -> Material {
        Material {
            ambient: color * 0.1,
            diffuse: color,
            specular: Vec3::splat(0.5),
            shininess: 10.0,
            mirror: 0.0,
        }
    }

    fn sphere(z: f64, radius: f64, material: Material) -> Object {
        Object::Sphere(Sphere { center: Vec3(0.0, 0.0, z), radius, material })
    }

    fn scene(objects: Vec<Object>, max_depth: u32) -> Scene {
        Scene {
            camera: Camera::new(Vec3(0.0, 0.0, 10.0), Vec3::ZERO, Vec3(0.0, 1.0, 0.0), 45.0, 4, 3),
            objects,
            lights: vec![Light { position: Vec3(0.0, 0.0, 10.0), color: Vec3::ONE }],
            background: Vec3(0.1, 0.2, 0.3),
            ambience: Vec3::splat(0.5),
            max_depth,
        }
    }

    fn down_z() -> Ray {
        Ray::new(Vec3(0.0, 0.0, 10.0), Vec3(0.0, 0.0, -1.0))
    }

    #[test]
    fn nearest_hit_independent_of_order() {
        let near = sphere(2.0, 1.0, matte(Vec3(1.0, 0.0, 0.0)));
        let far = sphere(-2.0, 1.0, matte(Vec3(0.0, 1.0, 0.0)));

        for objects in [vec![near.clone(), far.clone()], vec![far, near]] {
            let s = scene(objects, 0);
            let (o, hit) = intersect(&s, &down_z()).unwrap();
            assert!((hit.t - 7.0).abs() < 1e-12);
            assert_eq!(o.material().diffuse, Vec3(1.0, 0.0, 0.0));
        }
    }

    #[test]
    fn ties_keep_the_first_object() {
        let a = sphere(0.0, 1.0, matte(Vec3(1.0, 0.0, 0.0)));
        let b = sphere(0.0, 1.0, matte(Vec3(0.0, 0.0, 1.0)));
        let s = scene(vec![a, b], 0);
        let (o, _) = intersect(&s, &down_z()).unwrap();
        assert_eq!(o.material().diffuse, Vec3(1.0, 0.0, 0.0));
    }

    #[test]
    fn miss_returns_background() {
        let s = scene(vec![], 3);
        assert!(intersect(&s, &down_z()).is_none());
        assert_eq!(trace(&s, &down_z(), 0), s.background);
    }

    #[test]
    fn head_on_phong() {
        let mat = matte(Vec3(1.0, 0.0, 0.0));
        let s = scene(vec![sphere(0.0, 1.0, mat)], 0);
        let n = Vec3(0.0, 0.0, 1.0);
        let c = lighting(&s, Vec3(0.0, 0.0, 1.0), n, n, &mat);
        // ambient 0.1·0.5, diffuse 1, specular 0.5·1^10
        let expected = Vec3(0.05 + 1.0 + 0.5, 0.5, 0.5);
        assert!((c - expected).norm() < 1e-9, "{c:?}");
    }

    #[test]
    fn facing_away_gets_ambient_only() {
        let mat = matte(Vec3(1.0, 1.0, 1.0));
        let s = scene(vec![], 0);
        let c = lighting(&s, Vec3::ZERO, Vec3(0.0, 0.0, -1.0), Vec3(0.0, 0.0, 1.0), &mat);
        assert_eq!(c, mat.ambient.mul(s.ambience));
    }

    #[test]
    fn occluded_light_leaves_ambient_only() {
        let mat = matte(Vec3(1.0, 1.0, 1.0));
        // blocker between the shaded point and the light
        let s = scene(vec![sphere(5.0, 1.0, mat)], 0);
        let c = lighting(&s, Vec3::ZERO, Vec3(0.0, 0.0, 1.0), Vec3(0.0, 0.0, 1.0), &mat);
        assert_eq!(c, mat.ambient.mul(s.ambience));
    }

    #[test]
    fn lighting_is_pure() {
        let mat = matte(Vec3(0.3, 0.6, 0.9));
        let s = scene(vec![sphere(0.0, 1.0, mat), sphere(4.0, 0.5, mat)], 0);
        let args = (Vec3(0.0, 1.0, 0.0), Vec3(0.0, 1.0, 0.0), Vec3(0.0, 0.6, 0.8));
        let first = lighting(&s, args.0, args.1, args.2, &mat);
        let second = lighting(&s, args.0, args.1, args.2, &mat);
        assert_eq!(first, second);
    }

    fn mirror_scene(max_depth: u32) -> Scene {
        // mirror floor facing a red sphere above it, camera looking down
        let mut mirror_mat = matte(Vec3(0.0, 0.0, 1.0));
        mirror_mat.mirror = 0.5;
        let floor = Object::Plane(Plane::new(Vec3::ZERO, Vec3(0.0, 0.0, 1.0), mirror_mat));
        let mut s = scene(vec![floor, sphere(3.0, 1.0, matte(Vec3(1.0, 0.0, 0.0)))], max_depth);
        s.lights = vec![Light { position: Vec3(5.0, 0.0, 1.0), color: Vec3::ONE }];
        s
    }

    #[test]
    fn zero_depth_has_no_reflection() {
        let s = mirror_scene(0);
        let ray = Ray::new(Vec3(0.5, 0.0, 1.0), Vec3(0.0, 0.0, -1.0));
        let (o, hit) = intersect(&s, &ray).unwrap();
        let local = lighting(&s, hit.point, hit.normal, -ray.direction, o.material());
        assert_eq!(trace(&s, &ray, 0), local);
    }

    #[test]
    fn mirror_blends_reflection() {
        let s = mirror_scene(1);
        let ray = Ray::new(Vec3(0.5, 0.0, 1.0), Vec3(0.0, 0.0, -1.0));
        let (o, hit) = intersect(&s, &ray).unwrap();
        let local = lighting(&s, hit.point, hit.normal, -ray.direction, o.material());

        let bounce = Ray::new(hit.point + hit.normal * SURFACE_OFFSET, Vec3(0.0, 0.0, 1.0));
        let reflected = trace(&s, &bounce, 1);
        let c = trace(&s, &ray, 0);
        assert!((c - (local * 0.5 + reflected * 0.5)).norm() < 1e-12);
        // the reflection sees the red sphere
        assert!(reflected.0 > reflected.2);
    }

    #[test]
    fn beyond_max_depth_is_black() {
        let s = mirror_scene(1);
        assert_eq!(trace(&s, &down_z(), 2), Vec3::ZERO);
    }

    #[test]
    fn render_fills_every_pixel() {
        let mut s = scene(vec![], 0);
        s.background = Vec3(2.0, 0.5, 0.0);
        let img = render(&s, ToneMap::Clamp, &ProgressBar::hidden());
        assert_eq!(img.dimensions(), (4, 3));
        assert!(img.pixels().all(|p| p.0 == [255, 128, 0]));
    }

    #[test]
    fn render_flips_rows() {
        // sphere above the view axis of a one-pixel-wide, 20-row image
        let mat = Material { ambient: Vec3::ONE, ..matte(Vec3::ONE) };
        let mut s = scene(vec![sphere(0.0, 4.0, mat)], 0);
        if let Object::Sphere(sp) = &mut s.objects[0] {
            sp.center = Vec3(0.0, 6.0, 0.0);
        }
        s.camera = Camera::new(Vec3(0.0, 0.0, 10.0), Vec3::ZERO, Vec3(0.0, 1.0, 0.0), 90.0, 1, 20);
        s.background = Vec3::ZERO;

        let img = render(&s, ToneMap::Clamp, &ProgressBar::hidden());
        assert_ne!(img.get_pixel(0, 2).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(0, 17).0, [0, 0, 0]);
    }
}
