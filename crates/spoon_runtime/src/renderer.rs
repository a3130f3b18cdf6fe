//! Headless renderer that records submitted draws and logs each frame.

use spoon_core::ecs::Renderer;

#[derive(Debug, Default)]
pub struct LogRenderer {
    frame: u64,
    draw_calls: u32,
    indices: u64,
    total_draw_calls: u64,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw calls submitted since the last `clear`.
    pub fn draw_calls(&self) -> u32 {
        self.draw_calls
    }

    pub fn indices(&self) -> u64 {
        self.indices
    }

    pub fn frames_presented(&self) -> u64 {
        self.frame
    }

    pub fn total_draw_calls(&self) -> u64 {
        self.total_draw_calls
    }
}

impl Renderer for LogRenderer {
    fn clear(&mut self) {
        self.draw_calls = 0;
        self.indices = 0;
    }

    fn draw_indexed(&mut self, index_count: u32) {
        self.draw_calls += 1;
        self.indices += u64::from(index_count);
        tracing::trace!(index_count, "draw_indexed");
    }

    fn present(&mut self) {
        self.frame += 1;
        self.total_draw_calls += u64::from(self.draw_calls);
        tracing::debug!(
            frame = self.frame,
            draw_calls = self.draw_calls,
            indices = self.indices,
            "frame presented"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_reset_per_frame() {
        let mut renderer = LogRenderer::new();
        renderer.clear();
        renderer.draw_indexed(36);
        renderer.draw_indexed(6);
        assert_eq!(renderer.draw_calls(), 2);
        assert_eq!(renderer.indices(), 42);
        renderer.present();

        renderer.clear();
        renderer.draw_indexed(36);
        renderer.present();

        assert_eq!(renderer.draw_calls(), 1);
        assert_eq!(renderer.frames_presented(), 2);
        assert_eq!(renderer.total_draw_calls(), 3);
    }
}
