use std::f64::consts::PI;

use nalgebra::{Point3, Vector3};
use thiserror::Error;

use super::body::{Body, BodyID, BodyInfo, OrbitParams};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SystemError {
    #[error("body {child:?} references unknown parent {parent:?}")]
    UnknownParent { child: String, parent: BodyID },
    #[error("body {0:?} has a non-finite orbit parameter")]
    NonFiniteParameter(String),
    #[error("body {0:?} has a negative orbit radius")]
    NegativeRadius(String),
}

#[derive(Debug, Clone)]
struct BodyState {
    body: Body,
    parent: Option<BodyID>,
    orbit: OrbitParams,
    position: Point3<f64>,
    rotation: f64,
}

/// The body tree and its animation clock.
///
/// Invariants:
///   - ids are assigned in insertion order, and a body's parent must already
///     be present when the body is added. Index order is therefore a
///     parent-before-child topological order, which `advance_by` relies on.
///   - every position is a pure function of the clock, the parent's position,
///     and the body's own orbit parameters. Only `rotation` accumulates.
#[derive(Debug, Clone)]
pub struct System {
    bodies: Vec<BodyState>,
    time: f64,
}

impl System {
    pub fn new() -> Self {
        System {
            bodies: vec![],
            time: 0.0,
        }
    }

    /// Adds a body fixed at the world origin (orbit radius 0). It still spins.
    pub fn add_root(&mut self, info: BodyInfo, spin: f64) -> Result<BodyID, SystemError> {
        self.insert_new_body(info, OrbitParams::fixed(spin), None)
    }

    pub fn add_body(
        &mut self,
        info: BodyInfo,
        orbit: OrbitParams,
        parent: BodyID,
    ) -> Result<BodyID, SystemError> {
        if parent.0 >= self.bodies.len() {
            return Err(SystemError::UnknownParent {
                child: info.name,
                parent,
            });
        }
        self.insert_new_body(info, orbit, Some(parent))
    }

    fn insert_new_body(
        &mut self,
        info: BodyInfo,
        orbit: OrbitParams,
        parent: Option<BodyID>,
    ) -> Result<BodyID, SystemError> {
        validate_params(&info.name, &orbit)?;

        let id = BodyID(self.bodies.len());
        let parent_position = match parent {
            Some(p) => self.bodies[p.0].position,
            None => Point3::origin(),
        };

        self.bodies.push(BodyState {
            body: Body { id, info },
            parent,
            orbit,
            position: orbit_position(self.time, &parent_position, &orbit),
            rotation: 0.0,
        });
        Ok(id)
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Advances the clock by `dt` ticks and recomputes every body's transform,
    /// parents before children.
    pub fn advance_by(&mut self, dt: f64) {
        self.time += dt;
        let time = self.time;
        for i in 0..self.bodies.len() {
            let parent_position = match self.bodies[i].parent {
                Some(p) => self.bodies[p.0].position,
                None => Point3::origin(),
            };
            let state = &mut self.bodies[i];
            state.position = orbit_position(time, &parent_position, &state.orbit);
            state.rotation += state.orbit.spin * state.orbit.time_scale * dt;
        }
    }

    pub fn advance_to(&mut self, time: f64) {
        self.advance_by(time - self.time);
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.iter().map(|state| &state.body)
    }

    pub fn pickables(&self) -> impl Iterator<Item = &Body> + '_ {
        self.bodies().filter(|body| body.info.pickable)
    }

    pub fn get_body(&self, id: BodyID) -> &Body {
        &self.bodies[id.0].body
    }

    pub fn parent_of(&self, id: BodyID) -> Option<BodyID> {
        self.bodies[id.0].parent
    }

    pub fn orbit_of(&self, id: BodyID) -> OrbitParams {
        self.bodies[id.0].orbit
    }

    pub fn position_of(&self, id: BodyID) -> Point3<f64> {
        self.bodies[id.0].position
    }

    pub fn rotation_of(&self, id: BodyID) -> f64 {
        self.bodies[id.0].rotation
    }
}

fn orbit_position(time: f64, parent: &Point3<f64>, orbit: &OrbitParams) -> Point3<f64> {
    let theta = time * orbit.speed * orbit.time_scale + orbit.offset * PI;
    parent + orbit.radius * Vector3::new(theta.cos(), theta.sin(), 0.0)
}

fn validate_params(name: &str, orbit: &OrbitParams) -> Result<(), SystemError> {
    let fields = [
        orbit.radius,
        orbit.speed,
        orbit.spin,
        orbit.offset,
        orbit.time_scale,
    ];
    if fields.iter().any(|x| !x.is_finite()) {
        return Err(SystemError::NonFiniteParameter(name.to_owned()));
    }
    if orbit.radius < 0.0 {
        return Err(SystemError::NegativeRadius(name.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::body::PLANET_TIME_SCALE;
    use approx::assert_relative_eq;

    fn info(name: &str) -> BodyInfo {
        BodyInfo {
            name: name.to_owned(),
            radius: 1.0,
            color: Point3::new(1.0, 1.0, 1.0),
            pickable: false,
        }
    }

    fn sun_and_planet(orbit: OrbitParams) -> (System, BodyID, BodyID) {
        let mut system = System::new();
        let sun = system.add_root(info("sun"), 0.5).unwrap();
        let planet = system.add_body(info("planet"), orbit, sun).unwrap();
        (system, sun, planet)
    }

    #[test]
    fn test_start_of_orbit() {
        // At t = 0 with no phase offset, a body sits at (radius, 0) from its
        // parent.
        let (system, sun, planet) = sun_and_planet(OrbitParams::planet(5.0, 0.05, 2.0, 0.0));
        let relative = system.position_of(planet) - system.position_of(sun);
        assert_relative_eq!(relative, Vector3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_orbit_stays_circular() {
        let (mut system, sun, planet) = sun_and_planet(OrbitParams::planet(5.0, 0.05, 2.0, 1.25));
        for _ in 0..500 {
            system.advance_by(1.0);
            let relative = system.position_of(planet) - system.position_of(sun);
            assert_relative_eq!(relative.norm(), 5.0, max_relative = 1e-12);
            assert_eq!(relative.z, 0.0);
        }
    }

    #[test]
    fn test_root_stays_put_but_spins() {
        let (mut system, sun, _) = sun_and_planet(OrbitParams::planet(5.0, 0.05, 2.0, 0.0));
        let mut previous_rotation = system.rotation_of(sun);
        for _ in 0..100 {
            system.advance_by(1.0);
            assert_eq!(system.position_of(sun), Point3::origin());
            assert!(system.rotation_of(sun) > previous_rotation);
            previous_rotation = system.rotation_of(sun);
        }
    }

    #[test]
    fn test_moon_follows_planet() {
        // The moon's position must be computed against the planet position of
        // the same tick, not the previous one.
        let (mut system, _, planet) = sun_and_planet(OrbitParams::planet(5.0, 0.05, 2.0, 0.0));
        let moon = system
            .add_body(info("moon"), OrbitParams::moon(1.0, 0.2, 2.0, 0.5), planet)
            .unwrap();

        for _ in 0..300 {
            system.advance_by(1.0);
            let relative = system.position_of(moon) - system.position_of(planet);
            assert_relative_eq!(relative.norm(), 1.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_known_angle() {
        // t = 50, radius 5, speed 0.05, planet tier, offset 2.5 half-turns:
        // theta = 50 * 0.05 * 0.005 + 2.5 pi = 0.0125 + 2.5 pi
        let (mut system, _, planet) = sun_and_planet(OrbitParams::planet(5.0, 0.05, 2.0, 2.5));
        system.advance_to(50.0);

        let theta = 50.0 * 0.05 * PLANET_TIME_SCALE + 2.5 * PI;
        let position = system.position_of(planet);
        assert_relative_eq!(position.x, 5.0 * theta.cos(), max_relative = 1e-12);
        assert_relative_eq!(position.y, 5.0 * theta.sin(), max_relative = 1e-12);
    }

    #[test]
    fn test_rotation_accumulates() {
        let (mut system, _, planet) = sun_and_planet(OrbitParams::planet(5.0, 0.05, 2.0, 0.0));
        let mut previous = 0.0;
        for _ in 0..100 {
            system.advance_by(1.0);
            let rotation = system.rotation_of(planet);
            assert!(rotation > previous);
            previous = rotation;
        }
        assert_relative_eq!(
            previous,
            100.0 * 2.0 * PLANET_TIME_SCALE,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut system = System::new();
        system.add_root(info("sun"), 0.5).unwrap();
        let err = system
            .add_body(
                info("stray"),
                OrbitParams::planet(5.0, 0.05, 2.0, 0.0),
                BodyID(7),
            )
            .unwrap_err();
        assert_eq!(
            err,
            SystemError::UnknownParent {
                child: "stray".to_owned(),
                parent: BodyID(7),
            }
        );
    }

    #[test]
    fn test_bad_params_rejected() {
        let mut system = System::new();
        let sun = system.add_root(info("sun"), 0.5).unwrap();

        let nan = OrbitParams::planet(5.0, f64::NAN, 2.0, 0.0);
        assert_eq!(
            system.add_body(info("p"), nan, sun).unwrap_err(),
            SystemError::NonFiniteParameter("p".to_owned())
        );

        let negative = OrbitParams::planet(-1.0, 0.05, 2.0, 0.0);
        assert_eq!(
            system.add_body(info("p"), negative, sun).unwrap_err(),
            SystemError::NegativeRadius("p".to_owned())
        );
    }
}
