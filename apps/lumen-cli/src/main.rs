use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::{Vec2, Vec3};
use lumen_common::{MeshHandle, Ray, RayHit, ShaderHandle, Viewport};
use lumen_input::{InputState, Key, MouseButton};
use lumen_render::{CommandRecorder, DEFAULT_SHADER, ResourceRegistry};
use lumen_scene::{
    Camera, CameraSettings, Component, ComponentContext, EntityBuilder, EntityId, EntityManager,
    FrameContext, MeshRenderer, SceneDescription, SceneInspector, Transform,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lumen-cli", about = "Headless driver for lumen scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Step a scene with scripted input and print the last frame
    Run {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "60")]
        frames: u32,
        /// Seconds per frame
        #[arg(long, default_value = "0.016")]
        dt: f32,
        /// JSON scene description; a built-in demo scene is used otherwise
        #[arg(short, long)]
        scene: Option<PathBuf>,
    },
    /// Cast a picking ray from the main camera through a pixel
    Pick {
        #[arg(short)]
        x: f32,
        #[arg(short)]
        y: f32,
        #[arg(long, default_value = "800")]
        width: u32,
        #[arg(long, default_value = "600")]
        height: u32,
        /// JSON scene description; a built-in demo scene is used otherwise
        #[arg(short, long)]
        scene: Option<PathBuf>,
    },
}

/// Spins its owner around the world Y axis.
struct Spin {
    degrees_per_second: f32,
}

impl Component for Spin {
    fn update(&mut self, owner: &mut ComponentContext<'_>, _: &FrameContext<'_>, delta_time: f32) {
        owner
            .transform
            .rotate_around_axis(Vec3::Y, (self.degrees_per_second * delta_time).to_radians());
    }
}

fn demo_scene() -> anyhow::Result<EntityManager> {
    let mut scene = EntityManager::new();

    let camera = Camera::from_settings(CameraSettings {
        pitch: 10.0,
        ..CameraSettings::default()
    });
    let camera = scene.add_entity(
        EntityBuilder::new("camera")
            .with_transform(Transform::from_trs(
                Vec3::new(0.0, 2.0, -10.0),
                Vec3::ZERO,
                Vec3::ONE,
            ))
            .with_component(camera)?,
    );
    scene.set_main_camera(camera)?;

    scene.add_entity(
        EntityBuilder::new("planet")
            .with_component(MeshRenderer::new(MeshHandle(1)))?
            .with_component(Spin {
                degrees_per_second: 45.0,
            })?
            .with_child(
                EntityBuilder::new("moon")
                    .with_transform(Transform::from_trs(
                        Vec3::new(3.0, 0.0, 0.0),
                        Vec3::ZERO,
                        Vec3::splat(0.3),
                    ))
                    .with_component(MeshRenderer::new(MeshHandle(2)))?,
            ),
    );

    scene.add_entity(
        EntityBuilder::new("ground")
            .with_transform(Transform::from_trs(
                Vec3::new(0.0, -1.0, 0.0),
                Vec3::ZERO,
                Vec3::new(4.0, 0.1, 4.0),
            ))
            .with_component(MeshRenderer::new(MeshHandle(3)))?,
    );

    Ok(scene)
}

fn load_scene(path: Option<&Path>) -> anyhow::Result<EntityManager> {
    let Some(path) = path else {
        return demo_scene();
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading scene {}", path.display()))?;
    let description = SceneDescription::from_json(&json)
        .with_context(|| format!("parsing scene {}", path.display()))?;
    let mut scene = EntityManager::new();
    description.instantiate(&mut scene)?;
    tracing::info!(path = %path.display(), entities = scene.len(), "scene loaded");
    Ok(scene)
}

fn resources() -> anyhow::Result<ResourceRegistry> {
    let mut resources = ResourceRegistry::new();
    resources.register_shader(DEFAULT_SHADER, ShaderHandle(1))?;
    Ok(resources)
}

/// Scripted input: fly forward for the first half, then drag-look to the
/// right with the rotate button held.
fn script_input(input: &mut InputState, frame: u32, frames: u32) {
    let looking = frame >= frames / 2;
    input.set_key(Key::W, !looking);
    input.set_mouse_button(MouseButton::Right, looking);
    if looking {
        let step = (frame - frames / 2) as f32;
        input.set_cursor_position(Vec2::new(400.0 + step * 4.0, 300.0));
    }
}

/// Nearest mesh whose bounding sphere the ray hits.
fn pick_mesh(scene: &EntityManager, ray: &Ray) -> Option<(EntityId, RayHit)> {
    scene
        .iter()
        .filter(|entity| entity.has_component::<MeshRenderer>())
        .filter_map(|entity| {
            let transform = entity.transform();
            let radius = transform.local_scale().max_element();
            ray.intersect_sphere(transform.world_translation(), radius)
                .map(|hit| (entity.id(), hit))
        })
        .min_by(|(_, a), (_, b)| a.distance.total_cmp(&b.distance))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("lumen-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", lumen_common::crate_info());
            println!("input: {}", lumen_input::crate_info());
            println!("render: {}", lumen_render::crate_info());
            println!("scene: {}", lumen_scene::crate_info());
        }
        Commands::Run { frames, dt, scene } => {
            let mut scene = load_scene(scene.as_deref())?;
            let resources = resources()?;
            let viewport = Viewport::default();
            let mut input = InputState::new(viewport);
            let mut recorder = CommandRecorder::new();

            println!("Running {frames} frames, dt={dt}");
            for frame in 0..frames {
                script_input(&mut input, frame, frames);
                scene.update(&FrameContext::new(&input, &resources), dt);
                recorder.drain();
                scene.render(&mut recorder);
            }

            println!("{}", SceneInspector::summary(&scene));
            for info in SceneInspector::list_entities(&scene) {
                println!("{info}");
            }
            if let Some(camera) = scene.main_camera().and_then(|id| scene.entity(id)) {
                if let Some(settings) = camera.get_component::<Camera>().map(Camera::settings) {
                    println!(
                        "camera: yaw={:.2} pitch={:.2} eye={:.2}",
                        settings.yaw,
                        settings.pitch,
                        camera.transform().world_translation()
                    );
                }
            }
            print!("{recorder}");
        }
        Commands::Pick {
            x,
            y,
            width,
            height,
            scene,
        } => {
            let mut scene = load_scene(scene.as_deref())?;
            let resources = resources()?;
            let viewport = Viewport::new(width, height);
            let input = InputState::new(viewport);
            // One still frame so world matrices are current.
            scene.update(&FrameContext::new(&input, &resources), 0.0);

            let ray = scene
                .screen_point_to_ray(Vec2::new(x, y), viewport)
                .context("scene has no camera")?;
            println!(
                "ray: origin={:.3} direction={:.3}",
                ray.origin, ray.direction
            );
            match pick_mesh(&scene, &ray) {
                Some((id, hit)) => {
                    let name = scene.entity(id).map_or("?", |e| e.name());
                    println!(
                        "hit: {name} at distance {:.3}, point={:.3}",
                        hit.distance, hit.hit_point
                    );
                }
                None => println!("hit: nothing"),
            }
        }
    }

    Ok(())
}
