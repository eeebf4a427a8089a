mod body;
mod picking;
mod system;

pub use body::{Body, BodyID, BodyInfo, OrbitParams, MOON_TIME_SCALE, PLANET_TIME_SCALE};
pub use picking::Picker;
pub use system::{System, SystemError};
