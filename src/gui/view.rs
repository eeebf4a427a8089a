use std::collections::HashMap;

use kiss3d::camera::Camera;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::{PostProcessingEffect, SobelEdgeHighlight};
use kiss3d::renderer::Renderer;
use kiss3d::scene::SceneNode;
use kiss3d::window::Window;
use nalgebra::{Point2, Point3, Translation3, UnitQuaternion, Vector3};

use super::camera::ZoomableCamera;
use super::rings::RingRenderer;
use crate::model::{BodyID, Picker, System};

const CAMERA_START_DISTANCE: f32 = 10.0;
// Matches the original outline's edge strength.
const HIGHLIGHT_EDGE_SHIFT: f32 = 4.0;
// How much a hovered body's color is lifted towards white.
const HIGHLIGHT_BOOST: f32 = 0.35;

pub struct View {
    // Object state
    system: System,
    picker: Picker,
    body_spheres: HashMap<BodyID, SceneNode>,
    original_colors: HashMap<BodyID, Point3<f32>>,
    // Camera and per-frame drawing
    camera: ZoomableCamera,
    rings: RingRenderer,
    highlight: SobelEdgeHighlight,
}

impl View {
    pub fn new(system: System, window: &mut Window) -> Self {
        window.set_background_color(10.0 / 255.0, 10.0 / 255.0, 15.0 / 255.0);

        // Create a sphere per body, and remember the colors of the pickable
        // ones so they can be restored after hover-highlighting.
        let mut body_spheres = HashMap::new();
        let mut original_colors = HashMap::new();
        for body in system.bodies() {
            let mut sphere = window.add_sphere(body.info.radius);
            let color = &body.info.color;
            sphere.set_color(color.x, color.y, color.z);
            body_spheres.insert(body.id, sphere);

            if body.info.pickable {
                original_colors.insert(body.id, body.info.color);
            }
        }

        let picker = Picker::new(&system);
        let mut view = View {
            system,
            picker,
            body_spheres,
            original_colors,
            camera: ZoomableCamera::new(CAMERA_START_DISTANCE),
            rings: RingRenderer::new(),
            highlight: SobelEdgeHighlight::new(HIGHLIGHT_EDGE_SHIFT),
        };
        view.update_scene_objects();
        view
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn selected(&self) -> Option<BodyID> {
        self.picker.selected()
    }

    /// Advances the animation clock and moves the scene nodes to match.
    pub fn update_state_by(&mut self, dt: f64) {
        self.system.advance_by(dt);
        self.update_scene_objects();
    }

    fn update_scene_objects(&mut self) {
        for (id, sphere) in self.body_spheres.iter_mut() {
            let position: Point3<f32> = nalgebra::convert(self.system.position_of(*id));
            sphere.set_local_translation(Translation3::from(position.coords));

            let rotation = self.system.rotation_of(*id) as f32;
            sphere.set_local_rotation(UnitQuaternion::from_axis_angle(
                &Vector3::z_axis(),
                rotation,
            ));
        }
    }

    /// Picks against the current scene with a ray through the given pointer
    /// position (normalized device coordinates).
    pub fn pick_at(&mut self, ndc: &Point2<f32>) {
        let ray = self.camera.ray_through_ndc(ndc);
        match self.picker.pick(&ray, &self.system) {
            Some(id) => {
                self.reset_colors();
                let color = self.original_colors[&id];
                let sphere = self.body_spheres.get_mut(&id).unwrap();
                sphere.set_color(
                    color.x + (1.0 - color.x) * HIGHLIGHT_BOOST,
                    color.y + (1.0 - color.y) * HIGHLIGHT_BOOST,
                    color.z + (1.0 - color.z) * HIGHLIGHT_BOOST,
                );
            }
            None => self.reset_colors(),
        }
    }

    // On a miss this restores every pickable, not just the one that was
    // selected. That's the shipped behavior; see DESIGN.md.
    fn reset_colors(&mut self) {
        for (id, color) in self.original_colors.iter() {
            let sphere = self.body_spheres.get_mut(id).unwrap();
            sphere.set_color(color.x, color.y, color.z);
        }
    }

    /// Submits this frame's orbit rings, one per orbiting body, centered on
    /// its parent's current position.
    pub fn prerender_scene(&mut self) {
        let system = &self.system;
        let bodies: Vec<_> = system.bodies().map(|b| b.id).collect();
        for id in bodies {
            let parent = match system.parent_of(id) {
                Some(parent) => parent,
                None => continue,
            };
            let center: Point3<f32> = nalgebra::convert(system.position_of(parent));
            self.rings
                .draw_ring(center, system.orbit_of(id).radius as f32);
        }
    }

    pub fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        // The highlight effect is only in the chain while something is
        // hovered.
        let effect: Option<&mut dyn PostProcessingEffect> = if self.picker.selected().is_some() {
            Some(&mut self.highlight)
        } else {
            None
        };
        (Some(&mut self.camera), None, Some(&mut self.rings), effect)
    }
}
