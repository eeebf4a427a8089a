use std::path::PathBuf;

use clap::Parser;
use kiss3d::light::Light;
use kiss3d::window::Window;

use solar_scene::file;
use solar_scene::gui::Simulation;

#[derive(Debug, Parser)]
struct Args {
    /// Bodies file to load instead of the built-in scene.
    #[arg(long)]
    bodies: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let system = match &args.bodies {
        Some(path) => match file::read_file(path) {
            Ok(system) => system,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => file::builtin_system(),
    };
    log::info!("scene has {} bodies", system.bodies().count());

    let mut window = Window::new("Solar Scene");
    window.set_light(Light::StickToCamera);
    // We can't query the refresh rate, so let's just set it
    window.set_framerate_limit(Some(60));

    let simulation = Simulation::new(system, &mut window);
    window.render_loop(simulation);
}
