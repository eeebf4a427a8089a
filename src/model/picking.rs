use super::body::BodyID;
use super::system::System;
use crate::math::geometry::{ray_sphere_intersection, Ray};

/// Tracks which pickable body (if any) the pointer ray currently hits.
///
/// Membership of the pickable set is fixed at construction; only the
/// selection changes afterwards.
#[derive(Debug, Clone)]
pub struct Picker {
    pickables: Vec<BodyID>,
    selected: Option<BodyID>,
}

impl Picker {
    pub fn new(system: &System) -> Self {
        Picker {
            pickables: system.pickables().map(|body| body.id).collect(),
            selected: None,
        }
    }

    pub fn selected(&self) -> Option<BodyID> {
        self.selected
    }

    pub fn pickables(&self) -> &[BodyID] {
        &self.pickables
    }

    /// Casts the ray against every pickable's bounding sphere and selects the
    /// nearest hit. A miss is a normal outcome and clears the selection.
    pub fn pick(&mut self, ray: &Ray, system: &System) -> Option<BodyID> {
        let mut nearest: Option<(f64, BodyID)> = None;
        for &id in &self.pickables {
            let center = system.position_of(id);
            let radius = f64::from(system.get_body(id).info.radius);
            if let Some(t) = ray_sphere_intersection(ray, &center, radius) {
                if nearest.map_or(true, |(best, _)| t < best) {
                    nearest = Some((t, id));
                }
            }
        }

        self.selected = nearest.map(|(_, id)| id);
        self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::body::{BodyInfo, OrbitParams};
    use nalgebra::{Point3, Vector3};

    fn pickable_planet(name: &str) -> BodyInfo {
        BodyInfo {
            name: name.to_owned(),
            radius: 0.6,
            color: Point3::new(0.5, 0.2, 1.0),
            pickable: true,
        }
    }

    // Sun at the origin, two pickable planets starting on the +x axis at
    // distances 5 and 7.5.
    fn test_system() -> System {
        let mut system = System::new();
        let sun = system
            .add_root(
                BodyInfo {
                    name: "sun".to_owned(),
                    radius: 2.0,
                    color: Point3::new(1.0, 0.8, 0.2),
                    pickable: false,
                },
                0.5,
            )
            .unwrap();
        system
            .add_body(
                pickable_planet("p1"),
                OrbitParams::planet(5.0, 0.05, 2.5, 0.0),
                sun,
            )
            .unwrap();
        system
            .add_body(
                pickable_planet("p2"),
                OrbitParams::planet(7.5, 0.025, 5.0, 0.0),
                sun,
            )
            .unwrap();
        system
    }

    #[test]
    fn test_pickable_set_excludes_sun() {
        let system = test_system();
        let picker = Picker::new(&system);
        assert_eq!(picker.pickables(), &[BodyID(1), BodyID(2)][..]);
    }

    #[test]
    fn test_single_hit() {
        let system = test_system();
        let mut picker = Picker::new(&system);

        // Straight down the z-axis onto p1 at (5, 0, 0).
        let ray = Ray::new(Point3::new(5.0, 0.0, 10.0), -Vector3::z());
        assert_eq!(picker.pick(&ray, &system), Some(BodyID(1)));
        assert_eq!(picker.selected(), Some(BodyID(1)));
    }

    #[test]
    fn test_nearest_hit_wins() {
        let system = test_system();
        let mut picker = Picker::new(&system);

        // Both planets sit on the +x axis; a ray along it from outside hits
        // p2 (at 7.5) before p1 (at 5).
        let ray = Ray::new(Point3::new(20.0, 0.0, 0.0), -Vector3::x());
        assert_eq!(picker.pick(&ray, &system), Some(BodyID(2)));
    }

    #[test]
    fn test_miss_clears_selection() {
        let system = test_system();
        let mut picker = Picker::new(&system);

        let hit = Ray::new(Point3::new(5.0, 0.0, 10.0), -Vector3::z());
        picker.pick(&hit, &system);
        assert!(picker.selected().is_some());

        let miss = Ray::new(Point3::new(100.0, 100.0, 10.0), -Vector3::z());
        assert_eq!(picker.pick(&miss, &system), None);
        assert_eq!(picker.selected(), None);
    }
}
