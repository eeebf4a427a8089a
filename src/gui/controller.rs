use std::time::Instant;

use kiss3d::event::{Event, WindowEvent};
use nalgebra::Point2;

use super::view::View;

// The per-frame animation constants are interpreted at a 60 Hz reference
// rate, so one tick is 1/60 s of wall-clock time regardless of how fast
// frames actually render.
const TICKS_PER_SECOND: f64 = 60.0;

pub struct Controller {
    last_tick: Instant,
    fps_counter: FpsCounter,
}

struct FpsCounter {
    instant: Instant,
    counter: usize,
    window_size_millis: usize,
}

impl FpsCounter {
    fn new(window_size_millis: usize) -> Self {
        FpsCounter {
            instant: Instant::now(),
            counter: 0,
            window_size_millis,
        }
    }

    // Returns the measured rate each time a measurement window closes.
    fn increment(&mut self) -> Option<f64> {
        self.counter += 1;

        let elapsed = self.instant.elapsed();
        if elapsed.as_millis() > self.window_size_millis as u128 {
            let fps = (1000 * self.counter) as f64 / elapsed.as_millis() as f64;
            self.instant = Instant::now();
            self.counter = 0;
            Some(fps)
        } else {
            None
        }
    }
}

impl Controller {
    pub fn new() -> Self {
        Controller {
            last_tick: Instant::now(),
            fps_counter: FpsCounter::new(1000),
        }
    }

    /// Wall-clock time since the previous call, converted to animation ticks.
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).as_secs_f64();
        self.last_tick = now;

        if let Some(fps) = self.fps_counter.increment() {
            log::debug!("{:.1} fps", fps);
        }

        dt * TICKS_PER_SECOND
    }

    pub fn process_event(&mut self, event: Event, view: &mut View, width: f64, height: f64) {
        // Scroll (zoom) and framebuffer resizes are handled by the camera
        // itself; the pointer is what drives picking.
        if let WindowEvent::CursorPos(x, y, _) = event.value {
            if width <= 0.0 || height <= 0.0 {
                return;
            }
            let ndc = Point2::new(
                ((x / width) * 2.0 - 1.0) as f32,
                (-(y / height) * 2.0 + 1.0) as f32,
            );
            view.pick_at(&ndc);
        }
    }
}
