use std::f32::consts::PI;

use kiss3d::camera::Camera;
use kiss3d::renderer::{LineRenderer, Renderer};
use nalgebra::{Point3, Vector3};

const RING_SEGMENTS: usize = 100;

/// Draws the orbit-path rings. Rings are re-submitted every frame, since
/// their centers follow the parent bodies around.
pub struct RingRenderer {
    line_renderer: LineRenderer,
}

impl RingRenderer {
    pub fn new() -> Self {
        RingRenderer {
            line_renderer: LineRenderer::new(),
        }
    }

    pub fn draw_ring(&mut self, center: Point3<f32>, radius: f32) {
        let color = Point3::new(0.13, 0.13, 0.13);
        let point_at = |i: usize| {
            let theta = 2.0 * PI * (i as f32) / (RING_SEGMENTS as f32);
            center + radius * Vector3::new(theta.cos(), theta.sin(), 0.0)
        };

        for i in 0..RING_SEGMENTS {
            self.line_renderer
                .draw_line(point_at(i), point_at(i + 1), color);
        }
    }
}

impl Renderer for RingRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        self.line_renderer.render(pass, camera);
    }
}
