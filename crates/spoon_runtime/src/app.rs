//! Demo application: builds a scene and drives the frame loop.

use crate::components::{CameraComponent, MeshHandle, MeshRenderer, Transform, Velocity};
use crate::config::AppConfig;
use crate::renderer::LogRenderer;
use crate::systems::{CameraSystem, MovementSystem, RenderSystem};
use anyhow::{Context, Result};
use glam::Vec3;
use spoon_core::ecs::{Renderer, Signature, SystemHandle, World};
use spoon_core::time::{FrameClock, TICK_DURATION};
use spoon_metrics::FrameTimer;
use std::time::Duration;

/// Frames of history kept for the fps readout.
const FRAME_HISTORY: usize = 120;

pub struct App {
    config: AppConfig,
    world: World,
    renderer: LogRenderer,
    clock: FrameClock,
    timer: FrameTimer,
    cameras: SystemHandle<CameraSystem>,
    render: SystemHandle<RenderSystem>,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let mut world = World::from_config(&config.world)?;

        let transform = world.register_component::<Transform>()?;
        let velocity = world.register_component::<Velocity>()?;
        let mesh = world.register_component::<MeshRenderer>()?;
        let camera = world.register_component::<CameraComponent>()?;

        // Dispatch order: movement, then camera follow, then drawing.
        world.register_system::<MovementSystem>();
        let cameras = world.register_system::<CameraSystem>();
        let render = world.register_system::<RenderSystem>();

        world.set_system_signature::<MovementSystem>(Signature::new().with(transform).with(velocity));
        world.set_system_signature::<CameraSystem>(Signature::new().with(camera));
        world.set_system_signature::<RenderSystem>(Signature::new().with(transform).with(mesh));

        Ok(Self {
            config,
            world,
            renderer: LogRenderer::new(),
            clock: FrameClock::new(),
            timer: FrameTimer::new(FRAME_HISTORY),
            cameras,
            render,
        })
    }

    /// Spawn a camera and a square grid of spinning cubes.
    pub fn populate(&mut self) -> Result<()> {
        let camera = self.world.create_entity()?;
        self.world.add_component(camera, CameraComponent::new(0))?;
        self.world.add_component(
            camera,
            Transform {
                position: Vec3::new(0.0, 6.0, 20.0),
                rotation: Vec3::new(-15.0, -90.0, 0.0),
                scale: Vec3::ONE,
            },
        )?;

        let count = self.config.entities;
        let side = (f64::from(count).sqrt().ceil() as u32).max(1);
        for i in 0..count {
            let (row, col) = (i / side, i % side);
            let position = Vec3::new(
                (col as f32 - side as f32 / 2.0) * 2.0,
                0.0,
                (row as f32 - side as f32 / 2.0) * 2.0,
            );

            let cube = self
                .world
                .create_entity()
                .with_context(|| format!("spawning cube {i} of {count}"))?;
            self.world.add_component(cube, Transform::from_position(position))?;
            self.world.add_component(cube, MeshRenderer::new(MeshHandle::CUBE))?;
            // Every third cube stays still so it never enters the movement system.
            if i % 3 != 0 {
                self.world.add_component(
                    cube,
                    Velocity {
                        linear: Vec3::ZERO,
                        angular: Vec3::new(0.0, 45.0 + i as f32, 0.0),
                    },
                )?;
            }
        }

        tracing::info!(
            entities = self.world.living_count(),
            capacity = self.world.capacity(),
            "scene populated"
        );
        Ok(())
    }

    /// Run the configured number of frames.
    pub fn run(&mut self) {
        let fixed = self.config.fixed_delta();
        let mut elapsed = TICK_DURATION;

        for _ in 0..self.config.frames {
            self.timer.begin();
            let delta_time = self.clock.advance(fixed.unwrap_or(elapsed));
            self.frame(delta_time);
            elapsed = self.timer.end();

            let frame = self.clock.frame_count();
            if self.config.log_every > 0 && frame % self.config.log_every == 0 {
                let (min_ms, max_ms) = self.timer.frame_time_range_ms();
                tracing::info!(
                    frame,
                    fps = format_args!("{:.1}", self.timer.fps()),
                    frame_ms = format_args!("{:.3}", self.timer.frame_time_ms()),
                    min_ms = format_args!("{min_ms:.3}"),
                    max_ms = format_args!("{max_ms:.3}"),
                    draw_calls = self.renderer.draw_calls(),
                    indices = self.renderer.indices(),
                    "frame stats"
                );
            }
        }

        self.log_profile();
    }

    /// One update + render pass.
    pub fn frame(&mut self, delta_time: f32) {
        self.world.update(delta_time);

        let camera = self.cameras.borrow().active_camera();
        self.render.borrow_mut().set_camera(camera);

        self.renderer.clear();
        self.world.render(&mut self.renderer);
        self.renderer.present();
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn renderer(&self) -> &LogRenderer {
        &self.renderer
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    fn log_profile(&self) {
        let total = self.clock().total_time();
        tracing::info!(
            frames = self.clock.frame_count(),
            presented = self.renderer().frames_presented(),
            entities = self.world().living_count(),
            simulated_s = format_args!("{:.3}", total.as_secs_f64()),
            draw_calls = self.renderer.total_draw_calls(),
            "run finished"
        );
        for (system, time) in self.world.profiler().iter() {
            tracing::info!(system, total_ms = format_args!("{:.3}", ms(time)), "system time");
        }
    }
}

fn ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(entities: u32, frames: u64) -> AppConfig {
        AppConfig {
            frames,
            fixed_delta_ms: Some(10),
            entities,
            log_every: 0,
            ..AppConfig::default()
        }
    }

    #[test]
    fn populate_builds_expected_memberships() {
        let mut app = App::new(config(9, 0)).unwrap();
        app.populate().unwrap();

        let world = app.world();
        assert_eq!(world.living_count(), 10);
        assert_eq!(world.system_entities::<RenderSystem>().unwrap().len(), 9);
        assert_eq!(world.system_entities::<CameraSystem>().unwrap().len(), 1);
        // Cubes 0, 3 and 6 have no velocity.
        assert_eq!(world.system_entities::<MovementSystem>().unwrap().len(), 6);
    }

    #[test]
    fn run_draws_every_cube_each_frame() {
        let mut app = App::new(config(9, 5)).unwrap();
        app.populate().unwrap();
        app.run();

        assert_eq!(app.clock().frame_count(), 5);
        assert_eq!(app.clock().total_time(), Duration::from_millis(50));
        assert_eq!(app.renderer().frames_presented(), 5);
        assert_eq!(app.renderer().draw_calls(), 9);
        assert_eq!(app.renderer().total_draw_calls(), 45);
        assert!(app.cameras.borrow().active_camera().is_some());
    }

    #[test]
    fn destroyed_cubes_stop_rendering() {
        let mut app = App::new(config(4, 0)).unwrap();
        app.populate().unwrap();

        let cubes: Vec<_> = app
            .world()
            .system_entities::<RenderSystem>()
            .unwrap()
            .iter()
            .copied()
            .collect();
        app.world.destroy_entity(cubes[0]).unwrap();

        app.frame(0.016);
        assert_eq!(app.renderer().draw_calls(), 3);
    }

    #[test]
    fn scene_larger_than_capacity_fails() {
        let mut config = config(4, 0);
        config.world.capacity = 4;
        let mut app = App::new(config).unwrap();
        assert!(app.populate().is_err());
    }
}
