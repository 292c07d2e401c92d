#[derive(Clone, Debug, PartialEq)]
pub enum BoundaryType {
    Transmission,
    Vacuum,
    Reflective,
}

impl Default for BoundaryType {
    fn default() -> Self {
        BoundaryType::Transmission
    }
}

impl BoundaryType {
    /// Parse a boundary type from a string, returning None for invalid strings
    pub fn from_str_option(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "transmission" => Some(BoundaryType::Transmission),
            "vacuum" => Some(BoundaryType::Vacuum),
            "reflective" => Some(BoundaryType::Reflective),
            _ => None,
        }
    }
}

/// A first- or second-order implicit surface f(x, y, z) = 0.
///
/// The primitive set is closed: every variant supports signed evaluation,
/// ray intersection, and an outward normal, which is everything the
/// tracker needs. Axis-aligned planes get their own variants because they
/// dominate slab models and evaluate with a single subtraction.
#[derive(Clone, Debug)]
pub struct Surface {
    pub surface_id: u32,
    pub kind: SurfaceKind,
    pub boundary_type: BoundaryType,
}

#[derive(Clone, Debug)]
pub enum SurfaceKind {
    XPlane { x0: f64 },
    YPlane { y0: f64 },
    ZPlane { z0: f64 },
    Plane { a: f64, b: f64, c: f64, d: f64 },
    Sphere { x0: f64, y0: f64, z0: f64, radius: f64 },
    ZCylinder { x0: f64, y0: f64, radius: f64 },
}

/// Intersections closer than this are treated as "already on the surface"
/// and skipped so a particle sitting on a boundary does not re-hit it.
const INTERSECTION_TOLERANCE: f64 = 1e-10;

impl Surface {
    pub fn new(surface_id: u32, kind: SurfaceKind, boundary_type: BoundaryType) -> Self {
        Surface {
            surface_id,
            kind,
            boundary_type,
        }
    }

    pub fn x_plane(x0: f64, surface_id: u32, boundary_type: Option<BoundaryType>) -> Self {
        Surface {
            surface_id,
            kind: SurfaceKind::XPlane { x0 },
            boundary_type: boundary_type.unwrap_or_default(),
        }
    }

    pub fn y_plane(y0: f64, surface_id: u32, boundary_type: Option<BoundaryType>) -> Self {
        Surface {
            surface_id,
            kind: SurfaceKind::YPlane { y0 },
            boundary_type: boundary_type.unwrap_or_default(),
        }
    }

    pub fn z_plane(z0: f64, surface_id: u32, boundary_type: Option<BoundaryType>) -> Self {
        Surface {
            surface_id,
            kind: SurfaceKind::ZPlane { z0 },
            boundary_type: boundary_type.unwrap_or_default(),
        }
    }

    pub fn plane(
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        surface_id: u32,
        boundary_type: Option<BoundaryType>,
    ) -> Self {
        Surface {
            surface_id,
            kind: SurfaceKind::Plane { a, b, c, d },
            boundary_type: boundary_type.unwrap_or_default(),
        }
    }

    pub fn sphere(
        x0: f64,
        y0: f64,
        z0: f64,
        radius: f64,
        surface_id: u32,
        boundary_type: Option<BoundaryType>,
    ) -> Self {
        Surface {
            surface_id,
            kind: SurfaceKind::Sphere { x0, y0, z0, radius },
            boundary_type: boundary_type.unwrap_or_default(),
        }
    }

    pub fn z_cylinder(
        x0: f64,
        y0: f64,
        radius: f64,
        surface_id: u32,
        boundary_type: Option<BoundaryType>,
    ) -> Self {
        Surface {
            surface_id,
            kind: SurfaceKind::ZCylinder { x0, y0, radius },
            boundary_type: boundary_type.unwrap_or_default(),
        }
    }

    /// Signed evaluation of the implicit function at a point. Positive on
    /// the "above" side of the surface, negative on the "below" side.
    pub fn evaluate(&self, point: [f64; 3]) -> f64 {
        match &self.kind {
            SurfaceKind::XPlane { x0 } => point[0] - x0,
            SurfaceKind::YPlane { y0 } => point[1] - y0,
            SurfaceKind::ZPlane { z0 } => point[2] - z0,
            SurfaceKind::Plane { a, b, c, d } => a * point[0] + b * point[1] + c * point[2] - d,
            SurfaceKind::Sphere { x0, y0, z0, radius } => {
                let dx = point[0] - x0;
                let dy = point[1] - y0;
                let dz = point[2] - z0;
                (dx * dx + dy * dy + dz * dz).sqrt() - radius
            }
            SurfaceKind::ZCylinder { x0, y0, radius } => {
                let dx = point[0] - x0;
                let dy = point[1] - y0;
                (dx * dx + dy * dy).sqrt() - radius
            }
        }
    }

    /// Distance from a point along a direction to the surface.
    /// Returns Some(distance) for the nearest strictly-positive hit, else None.
    pub fn distance_to_surface(&self, point: [f64; 3], direction: [f64; 3]) -> Option<f64> {
        match &self.kind {
            SurfaceKind::XPlane { x0 } => plane_distance(point[0], direction[0], *x0),
            SurfaceKind::YPlane { y0 } => plane_distance(point[1], direction[1], *y0),
            SurfaceKind::ZPlane { z0 } => plane_distance(point[2], direction[2], *z0),
            SurfaceKind::Plane { a, b, c, d } => {
                let denom = a * direction[0] + b * direction[1] + c * direction[2];
                if denom.abs() < 1e-12 {
                    // Parallel, no intersection
                    return None;
                }
                let num = d - (a * point[0] + b * point[1] + c * point[2]);
                let t = num / denom;
                if t > INTERSECTION_TOLERANCE {
                    Some(t)
                } else {
                    None
                }
            }
            SurfaceKind::Sphere { x0, y0, z0, radius } => {
                // Ray-sphere: (p + t*v - c)·(p + t*v - c) = r^2 with |v| = 1
                let oc = [point[0] - x0, point[1] - y0, point[2] - z0];
                let b =
                    2.0 * (oc[0] * direction[0] + oc[1] * direction[1] + oc[2] * direction[2]);
                let c = oc[0] * oc[0] + oc[1] * oc[1] + oc[2] * oc[2] - radius * radius;
                quadratic_distance(1.0, b, c)
            }
            SurfaceKind::ZCylinder { x0, y0, radius } => {
                // Project onto the XY plane and intersect a circle
                let a = direction[0] * direction[0] + direction[1] * direction[1];
                if a < 1e-12 {
                    // Travelling parallel to the cylinder axis
                    return None;
                }
                let ox = point[0] - x0;
                let oy = point[1] - y0;
                let b = 2.0 * (ox * direction[0] + oy * direction[1]);
                let c = ox * ox + oy * oy - radius * radius;
                quadratic_distance(a, b, c)
            }
        }
    }

    /// Outward unit normal at a point assumed to lie on the surface.
    /// "Outward" points toward the positive side of `evaluate`.
    pub fn normal(&self, point: [f64; 3]) -> [f64; 3] {
        match &self.kind {
            SurfaceKind::XPlane { .. } => [1.0, 0.0, 0.0],
            SurfaceKind::YPlane { .. } => [0.0, 1.0, 0.0],
            SurfaceKind::ZPlane { .. } => [0.0, 0.0, 1.0],
            SurfaceKind::Plane { a, b, c, .. } => {
                let mag = (a * a + b * b + c * c).sqrt();
                [a / mag, b / mag, c / mag]
            }
            SurfaceKind::Sphere { x0, y0, z0, .. } => {
                let v = [point[0] - x0, point[1] - y0, point[2] - z0];
                let mag = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
                [v[0] / mag, v[1] / mag, v[2] / mag]
            }
            SurfaceKind::ZCylinder { x0, y0, .. } => {
                let v = [point[0] - x0, point[1] - y0];
                let mag = (v[0] * v[0] + v[1] * v[1]).sqrt();
                [v[0] / mag, v[1] / mag, 0.0]
            }
        }
    }

    /// Specularly reflect a direction at a point on the surface: the
    /// component along the surface normal flips sign, the tangential
    /// components are untouched. Energy group and weight are unchanged.
    pub fn reflect(&self, point: [f64; 3], direction: [f64; 3]) -> [f64; 3] {
        let n = self.normal(point);
        let dot = direction[0] * n[0] + direction[1] * n[1] + direction[2] * n[2];
        [
            direction[0] - 2.0 * dot * n[0],
            direction[1] - 2.0 * dot * n[1],
            direction[2] - 2.0 * dot * n[2],
        ]
    }
}

fn plane_distance(coord: f64, dir: f64, plane: f64) -> Option<f64> {
    if dir.abs() < 1e-12 {
        return None;
    }
    let t = (plane - coord) / dir;
    if t > INTERSECTION_TOLERANCE {
        Some(t)
    } else {
        None
    }
}

/// Smallest strictly positive root of a*t^2 + b*t + c = 0, or None.
fn quadratic_distance(a: f64, b: f64, c: f64) -> Option<f64> {
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);
    if t1 > INTERSECTION_TOLERANCE {
        Some(t1)
    } else if t2 > INTERSECTION_TOLERANCE {
        Some(t2)
    } else {
        None
    }
}
