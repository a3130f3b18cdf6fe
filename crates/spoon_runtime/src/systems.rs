//! Frame systems driving the demo scene.

use crate::components::{Camera, CameraComponent, MeshRenderer, Transform, Velocity};
use glam::Mat4;
use spoon_core::ecs::{RenderContext, Renderer, System, SystemContext};

/// Integrates `Velocity` into `Transform`.
#[derive(Default)]
pub struct MovementSystem;

impl System for MovementSystem {
    fn update(&mut self, mut ctx: SystemContext<'_>, delta_time: f32) {
        for entity in ctx.entities() {
            let Ok(velocity) = ctx.get::<Velocity>(entity).copied() else {
                continue;
            };
            if let Ok(transform) = ctx.get_mut::<Transform>(entity) {
                transform.position += velocity.linear * delta_time;
                transform.rotation += velocity.angular * delta_time;
            }
        }
    }
}

/// Picks the highest-priority active camera and keeps it aligned with its transform.
#[derive(Default)]
pub struct CameraSystem {
    active: Option<Camera>,
}

impl CameraSystem {
    pub fn active_camera(&self) -> Option<Camera> {
        self.active
    }
}

impl System for CameraSystem {
    fn update(&mut self, mut ctx: SystemContext<'_>, _delta_time: f32) {
        let mut best: Option<(i32, Camera)> = None;

        for entity in ctx.entities() {
            let transform = ctx.get::<Transform>(entity).ok().copied();
            let Ok(component) = ctx.get_mut::<CameraComponent>(entity) else {
                continue;
            };
            if !component.is_active {
                continue;
            }
            if let Some(transform) = transform {
                component.camera.position = transform.position;
                component.camera.rotation = transform.rotation;
            }
            if best.map_or(true, |(priority, _)| component.priority > priority) {
                best = Some((component.priority, component.camera));
            }
        }

        // Keep the previous camera if nothing is active this frame.
        if let Some((_, camera)) = best {
            self.active = Some(camera);
        }
    }
}

/// Submits one indexed draw per visible mesh.
#[derive(Default)]
pub struct RenderSystem {
    view_projection: Mat4,
    last_draws: usize,
}

impl RenderSystem {
    pub fn set_camera(&mut self, camera: Option<Camera>) {
        self.view_projection = camera.map_or(Mat4::IDENTITY, |camera| camera.view_projection());
    }

    /// Draws submitted during the most recent render pass.
    pub fn last_draws(&self) -> usize {
        self.last_draws
    }
}

impl System for RenderSystem {
    fn render(&mut self, ctx: RenderContext<'_>, renderer: &mut dyn Renderer) {
        self.last_draws = 0;
        for entity in ctx.entities() {
            let (Ok(transform), Ok(mesh)) = (ctx.get::<Transform>(entity), ctx.get::<MeshRenderer>(entity)) else {
                continue;
            };
            if !mesh.visible {
                continue;
            }
            let mvp = self.view_projection * transform.matrix();
            tracing::trace!(%entity, translation = ?mvp.w_axis, "draw mesh");
            renderer.draw_indexed(mesh.mesh.index_count);
            self.last_draws += 1;
        }
    }
}
