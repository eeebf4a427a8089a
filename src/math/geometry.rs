use nalgebra::{Point3, Unit, Vector3};

/// A world-space ray, used for pointer picking.
#[derive(Debug, Clone)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Unit<Vector3<f64>>,
}

impl Ray {
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Ray {
            origin,
            direction: Unit::new_normalize(direction),
        }
    }
}

/// Returns the distance along the ray to its nearest intersection with the
/// sphere, or None if it misses. Intersections behind the ray origin don't
/// count; a ray starting inside the sphere hits the far wall.
pub fn ray_sphere_intersection(ray: &Ray, center: &Point3<f64>, radius: f64) -> Option<f64> {
    let oc = ray.origin - center;
    let b = oc.dot(&ray.direction);
    let c = oc.norm_squared() - radius * radius;

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let t_near = -b - sqrt_d;
    let t_far = -b + sqrt_d;
    if t_near >= 0.0 {
        Some(t_near)
    } else if t_far >= 0.0 {
        Some(t_far)
    } else {
        None
    }
}
