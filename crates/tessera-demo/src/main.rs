//! Orbiting camera over a box, a quad field and a few textured quads.
//!
//! Controls: W/S height, A/D orbit, mouse motion orbits and lifts, the
//! wheel zooms, Space toggles a quad field large enough to force implicit flushes,
//! Escape quits.

mod camera;
mod textures;

use std::time::Instant;

use anyhow::Result;

use tessera_engine::coords::{Vec2, Vec3};
use tessera_engine::core::{App, AppControl, FrameCtx};
use tessera_engine::device::GpuInit;
use tessera_engine::input::Key;
use tessera_engine::logging::{init_logging, LoggingConfig};
use tessera_engine::paint::Color;
use tessera_engine::render::batch::{BatchConfig, BatchRenderer, BatchStats, BoxColors, TextureId};
use tessera_engine::render::{RenderCtx, RenderTarget};
use tessera_engine::window::{Runtime, RuntimeConfig};

use camera::OrbitCamera;

const TITLE: &str = "tessera batch demo";
const CLEAR: Color = Color::rgb(0.1, 0.1, 0.1);
const BOX_COLOR: Color = Color::rgb(0.1, 0.2, 0.8);
const GRID_FROM: Color = Color::rgb(0.2, 0.3, 0.9);
const GRID_TO: Color = Color::rgb(0.2, 0.9, 0.3);

/// Side length of the stress field, in quads.
const STRESS_SIDE: u32 = 120;

struct Scene {
    renderer: BatchRenderer,
    checker: TextureId,
    ring: TextureId,
}

impl Scene {
    fn new(rctx: &RenderCtx<'_>) -> Result<Self> {
        let mut renderer = BatchRenderer::with_gpu(rctx, BatchConfig::default())?;

        let gpu = renderer.backend_mut();
        let checker = gpu.create_texture_rgba8(
            "checker",
            64,
            64,
            &textures::checkerboard(64, 8, [230, 230, 230, 255], [40, 40, 40, 255]),
        )?;
        let ring = gpu.create_texture_rgba8("ring", 64, 64, &textures::ring(64, [220, 60, 40]))?;

        Ok(Self { renderer, checker, ring })
    }

    fn draw(&mut self, target: &RenderTarget<'_>, camera: &OrbitCamera, aspect: f32, stress: bool) {
        let r = &mut self.renderer;
        r.backend_mut().set_target(target);
        r.backend_mut().set_camera(camera.view_proj(aspect), camera.eye());

        r.reset_stats();
        r.begin_batch();

        r.draw_box(Vec3::ZERO, Vec3::splat(50.0), BoxColors::debug_palette(BOX_COLOR), Vec3::Z);

        // Solid grid to the right of the box.
        for y in 0..8 {
            for x in 0..8 {
                let color = GRID_FROM.lerp(GRID_TO, (x + y) as f32 / 14.0);
                let pos = Vec2::new(40.0 + x as f32 * 6.0, -25.0 + y as f32 * 6.0);
                r.draw_quad(pos, Vec2::splat(5.0), color);
            }
        }

        // Textured quads to the left; the same texture twice shares one slot.
        r.draw_quad(Vec2::new(-90.0, -25.0), Vec2::splat(22.0), self.checker);
        r.draw_quad(Vec2::new(-90.0, 3.0), Vec2::splat(22.0), self.ring);
        r.draw_quad(Vec2::new(-64.0, -25.0), Vec2::splat(22.0), self.checker);

        // Translucent pane above the grid. Quads share z = 0, so it must not overlap them.
        r.draw_quad(Vec2::new(50.0, 30.0), Vec2::splat(20.0), Color::WHITE.with_alpha(0.35));

        if stress {
            let cell = 400.0 / STRESS_SIDE as f32;
            for y in 0..STRESS_SIDE {
                for x in 0..STRESS_SIDE {
                    let c = Color::rgb(x as f32 / STRESS_SIDE as f32, 0.5, y as f32 / STRESS_SIDE as f32);
                    let pos = Vec2::new(-200.0 + x as f32 * cell, -200.0 + y as f32 * cell);
                    r.draw_quad(pos, Vec2::splat(cell * 0.8), c);
                }
            }
        }

        r.end_batch();
        r.flush();

        r.backend_mut().clear_target();
    }

    fn shutdown(mut self) {
        let gpu = self.renderer.backend_mut();
        for id in [self.checker, self.ring] {
            if !gpu.destroy_texture(id) {
                log::warn!("texture {id:?} was already gone at shutdown");
            }
        }
        self.renderer.shutdown();
    }
}

struct Demo {
    camera: OrbitCamera,
    scene: Option<Scene>,
    stress: bool,

    last_report: Instant,
    last_stats: BatchStats,
}

impl Demo {
    fn new() -> Self {
        Self {
            camera: OrbitCamera::default(),
            scene: None,
            stress: false,
            last_report: Instant::now(),
            last_stats: BatchStats::default(),
        }
    }

    /// Once a second, a stats line for the log and the window title.
    fn report(&mut self, fps: f32) -> Option<String> {
        if self.last_report.elapsed().as_secs_f32() < 1.0 {
            return None;
        }
        self.last_report = Instant::now();

        let s = self.last_stats;
        Some(format!(
            "{fps:.0} fps | {} draw calls, {} quads, {} vertices, {} indices",
            s.draw_count,
            s.quad_count,
            s.vertex_count(),
            s.index_count()
        ))
    }
}

impl App for Demo {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }
        if ctx.input_frame.key_pressed(Key::Space) {
            self.stress = !self.stress;
            log::info!("stress field {}", if self.stress { "on" } else { "off" });
        }

        self.camera.update(ctx.input, ctx.input_frame, ctx.time.dt);

        let camera = self.camera;
        let stress = self.stress;
        let aspect = ctx.window.viewport().aspect();
        let scene = &mut self.scene;
        let mut setup_failed = false;

        let control = ctx.render(CLEAR, |rctx, target| {
            if scene.is_none() {
                match Scene::new(rctx) {
                    Ok(s) => *scene = Some(s),
                    Err(e) => {
                        log::error!("renderer setup failed: {e:#}");
                        setup_failed = true;
                        return;
                    }
                }
            }
            if let Some(scene) = scene.as_mut() {
                scene.draw(target, &camera, aspect, stress);
            }
        });

        if setup_failed {
            return AppControl::Exit;
        }

        if let Some(scene) = &self.scene {
            self.last_stats = scene.renderer.stats();
        }
        if let Some(line) = self.report(ctx.time.fps) {
            log::info!("{line}");
            ctx.window.set_title(&format!("{TITLE} | {line}"));
        }

        control
    }

    fn on_exit(&mut self) {
        if let Some(scene) = self.scene.take() {
            scene.shutdown();
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: TITLE.to_string(),
        width: 960,
        height: 540,
    };

    Runtime::run(config, GpuInit::default(), Demo::new())
}
