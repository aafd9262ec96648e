mod aabb;
mod algebra;
mod camera;
mod cylinder;
mod error;
mod light;
mod material;
mod mesh;
mod object;
mod plane;
mod quadratic;
mod ray;
mod renderer;
mod scene;
mod sphere;
mod tonemap;

use std::env;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

use crate::object::Object;
use crate::scene::Scene;
use crate::tonemap::ToneMap;

const USAGE: &str =
    "usage: raytracer <scene.sce|scene.json> [output.png] [--depth N] [--tonemap clamp|reinhard] [-q|--quiet]";

struct Options {
    scene: PathBuf,
    output: PathBuf,
    depth: Option<u32>,
    tone_map: ToneMap,
    quiet: bool,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut positional = Vec::new();
    let mut depth = None;
    let mut tone_map = ToneMap::default();
    let mut quiet = false;

    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-q" | "--quiet" => quiet = true,
            "--depth" => {
                let v = it.next().ok_or("--depth needs a value")?;
                depth = Some(v.parse().map_err(|_| format!("invalid depth `{v}`"))?);
            }
            "--tonemap" => {
                tone_map = it.next().ok_or("--tonemap needs a value")?.parse()?;
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with('-') => return Err(format!("unknown option `{flag}`\n{USAGE}")),
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let mut positional = positional.into_iter();
    let scene = positional.next().ok_or(USAGE)?;
    let output = positional.next().unwrap_or_else(|| scene.with_extension("png"));
    if positional.next().is_some() {
        return Err(format!("too many arguments\n{USAGE}"));
    }

    Ok(Options { scene, output, depth, tone_map, quiet })
}

fn print_summary(scene: &Scene) {
    let cam = &scene.camera;
    println!("=== CAMERA INFO ===");
    println!(" eye      : {:?}", cam.eye);
    println!(" center   : {:?}", cam.center);
    println!(" up       : {:?}", cam.up);
    println!(" fovy (°) : {:.2}", cam.fovy);
    println!(" size     : {}x{}", cam.width, cam.height);
    println!(" depth    : {}", scene.max_depth);

    println!("\n=== OBJECTS ({}) ===", scene.objects.len());
    for (i, obj) in scene.objects.iter().enumerate() {
        print!(" [{}] {:<8} ", i, obj.kind());
        match obj {
            Object::Plane(p) => {
                println!("center: {:?}, normal: {:?}", p.center, p.normal);
            }
            Object::Sphere(s) => {
                println!("center: {:?}, radius: {:.4}", s.center, s.radius);
            }
            Object::Cylinder(c) => {
                println!("center: {:?}, axis: {:?}, radius: {:.4}, height: {:.4}",
                         c.center, c.axis, c.radius, c.height);
            }
            Object::Mesh(m) => {
                println!("{} vertices, {} triangles, {:?} shading",
                         m.vertices.len(), m.triangles.len(), m.draw_mode);
            }
        }
    }

    println!("\n=== LIGHTS ({}) ===", scene.lights.len());
    for (i, l) in scene.lights.iter().enumerate() {
        println!(" [{}] Light {{ position: {:?}, color: {:?} }}", i, l.position, l.color);
    }
}

fn run(opts: &Options) -> Result<(), Box<dyn Error>> {
    let load_start = Instant::now();
    let mut scene = scene::load(&opts.scene)?;
    if let Some(depth) = opts.depth {
        scene.max_depth = depth;
    }

    let bar = if opts.quiet {
        ProgressBar::hidden()
    } else {
        println!("Loaded {} in {:.2?}\n", opts.scene.display(), load_start.elapsed());
        print_summary(&scene);
        println!();
        let pb = ProgressBar::new(scene.camera.width as u64);
        pb.set_style(ProgressStyle::with_template(
            "{bar:40.cyan/blue} {pos}/{len} columns | {elapsed_precise} | ETA: {eta}",
        )?);
        pb
    };

    let render_start = Instant::now();
    let img = renderer::render(&scene, opts.tone_map, &bar);
    bar.finish_with_message("Rendering complete");

    if let Some(dir) = Path::new(&opts.output).parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    img.save(&opts.output)?;

    if !opts.quiet {
        println!("Rendered in {:.2?}", render_start.elapsed());
        println!("Saved → {}", opts.output.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let opts = match parse_args(&args) {
        Ok(opts) => opts,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
