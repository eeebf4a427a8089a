use nalgebra::Point3;

/// Animation multiplier for the planet tier (applied to orbit and spin rates).
pub const PLANET_TIME_SCALE: f64 = 0.005;
/// Animation multiplier for the moon tier.
pub const MOON_TIME_SCALE: f64 = 0.01;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

// All the immutable info about a body
#[derive(Debug, Clone)]
pub struct BodyInfo {
    pub name: String,
    pub radius: f32,
    pub color: Point3<f32>,
    pub pickable: bool,
}

#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyID,
    pub info: BodyInfo,
}

/// Parameters of a circular orbit around the parent body.
///
/// The orbit angle is a pure function of the shared animation clock:
/// `theta = time * speed * time_scale + offset * pi`. Self-rotation is the
/// only accumulated quantity; it advances by `spin * time_scale` per tick.
#[derive(Debug, Clone, Copy)]
pub struct OrbitParams {
    pub radius: f64,
    pub speed: f64,
    pub spin: f64,
    /// Starting phase, in half-turns.
    pub offset: f64,
    pub time_scale: f64,
}

impl OrbitParams {
    pub fn planet(radius: f64, speed: f64, spin: f64, offset: f64) -> Self {
        OrbitParams {
            radius,
            speed,
            spin,
            offset,
            time_scale: PLANET_TIME_SCALE,
        }
    }

    pub fn moon(radius: f64, speed: f64, spin: f64, offset: f64) -> Self {
        OrbitParams {
            radius,
            speed,
            spin,
            offset,
            time_scale: MOON_TIME_SCALE,
        }
    }

    /// Orbit of a root body: pinned to its parent (the world origin), but
    /// still spinning.
    pub fn fixed(spin: f64) -> Self {
        OrbitParams {
            radius: 0.0,
            speed: 0.0,
            spin,
            offset: 0.0,
            time_scale: PLANET_TIME_SCALE,
        }
    }
}
