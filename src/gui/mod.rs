use kiss3d::camera::Camera;
use kiss3d::event::EventManager;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};

use self::controller::Controller;
use self::view::View;
use crate::model::System;

mod camera;
mod controller;
mod rings;
mod view;

pub use camera::ZoomableCamera;

pub struct Simulation {
    view: View,
    controller: Controller,
    running: bool,
}

impl Simulation {
    pub fn new(system: System, window: &mut Window) -> Self {
        Self {
            view: View::new(system, window),
            controller: Controller::new(),
            running: true,
        }
    }

    /// Ends the render loop on the next tick.
    pub fn stop(&mut self) {
        self.running = false;
    }

    fn process_user_input(&mut self, mut events: EventManager, width: f64, height: f64) {
        for event in events.iter() {
            self.controller
                .process_event(event, &mut self.view, width, height);
        }
    }
}

impl State for Simulation {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        self.view.cameras_and_effect_and_renderer()
    }

    fn step(&mut self, window: &mut Window) {
        if !self.running {
            window.close();
            return;
        }

        let (width, height) = (f64::from(window.width()), f64::from(window.height()));
        self.process_user_input(window.events(), width, height);

        let dt = self.controller.tick();
        self.view.update_state_by(dt);
        self.view.prerender_scene();
    }
}
