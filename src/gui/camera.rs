use std::f32::consts::PI;

use kiss3d::camera::Camera;
use kiss3d::event::WindowEvent;
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point2, Point3, Vector3};

use crate::math::geometry::Ray;

const MIN_DISTANCE: f32 = 5.0;
const MAX_DISTANCE: f32 = 50.0;
const ZOOM_SENSITIVITY: f32 = 0.01;
// One wheel notch, in legacy wheel-delta units.
const WHEEL_STEP: f32 = 120.0;

// A deliberately rigid camera: it sits on the +z axis looking at the origin,
// and the only degree of freedom is its distance. Scrolling zooms, within
// hard limits, and framebuffer resizes keep the aspect ratio current.
pub struct ZoomableCamera {
    distance: f32,
    width: u32,
    height: u32,
    fovy: f32,
}

impl ZoomableCamera {
    pub fn new(distance: f32) -> Self {
        ZoomableCamera {
            distance: nalgebra::clamp(distance, MIN_DISTANCE, MAX_DISTANCE),
            width: 800,
            height: 600,
            fovy: PI / 3.0,
        }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Zooms in for positive deltas, out for negative ones. The distance
    /// never leaves [MIN_DISTANCE, MAX_DISTANCE], no matter how much input
    /// accumulates.
    pub fn zoom(&mut self, delta: f32) {
        self.distance = nalgebra::clamp(
            self.distance - delta * ZOOM_SENSITIVITY,
            MIN_DISTANCE,
            MAX_DISTANCE,
        );
    }

    /// Records the new viewport size. Degenerate sizes show up while the
    /// window is being minimized; they're ignored so the aspect ratio stays
    /// finite.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(self.aspect(), self.fovy, 0.1, 1000.0)
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection().into_inner()
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.view_transform().to_homogeneous()
    }

    /// The world-space ray from the camera through a point in normalized
    /// device coordinates (x, y in [-1, 1]).
    pub fn ray_through_ndc(&self, ndc: &Point2<f32>) -> Ray {
        let inverse = self.inverse_transformation();
        let near = inverse.transform_point(&Point3::new(ndc.x, ndc.y, -1.0));
        let far = inverse.transform_point(&Point3::new(ndc.x, ndc.y, 1.0));

        let origin: Point3<f64> = nalgebra::convert(near);
        let through: Point3<f64> = nalgebra::convert(far);
        Ray::new(origin, through - origin)
    }
}

impl Camera for ZoomableCamera {
    fn handle_event(&mut self, _canvas: &Canvas, event: &WindowEvent) {
        match *event {
            WindowEvent::Scroll(_, off, _) => {
                self.zoom(off as f32 * WHEEL_STEP);
            }
            WindowEvent::FramebufferSize(w, h) => {
                self.resize(w, h);
            }
            _ => {}
        }
    }

    fn eye(&self) -> Point3<f32> {
        Point3::new(0.0, 0.0, self.distance)
    }

    fn view_transform(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.eye(), &Point3::origin(), &Vector3::y())
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.transformation().try_inverse().unwrap()
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.projection().znear(), self.projection().zfar())
    }

    fn update(&mut self, _canvas: &Canvas) {}

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection_matrix());
        view.upload(&self.view_matrix());
    }
}
