use crate::error::{GeometryError, Result};

use super::{Point3, Vector3, TOLERANCE};

/// A cartesian plane `a*x + b*y + c*z + d = 0` with unit normal `(a, b, c)`.
///
/// For boundary faces the normal points outward, so `eval(p) > 0` means
/// "outside the zone".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3,
    pub d: f64,
}

impl Plane {
    /// Creates a plane from a unit normal and offset. The normal is
    /// renormalized defensively only at construction from points.
    #[must_use]
    pub fn new(normal: Vector3, d: f64) -> Self {
        Self { normal, d }
    }

    /// Creates the plane through three points, with the normal given by
    /// the right-hand rule on `(p2 - p1) x (p3 - p1)`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the points are collinear.
    pub fn from_points(p1: &Point3, p2: &Point3, p3: &Point3) -> Result<Self> {
        let normal = (p2 - p1).cross(&(p3 - p1));
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(
                GeometryError::Degenerate("three collinear points do not define a plane".into())
                    .into(),
            );
        }
        let normal = normal / len;
        let d = -normal.dot(&p1.coords);
        Ok(Self { normal, d })
    }

    /// Creates a plane with the given normal passing at signed offset
    /// `scalar` along it, i.e. `normal . p = scalar`.
    #[must_use]
    pub fn from_normal_offset(normal: Vector3, scalar: f64) -> Self {
        Self {
            normal,
            d: -scalar,
        }
    }

    /// Signed value of the plane equation at `p`.
    #[must_use]
    pub fn eval(&self, p: &Point3) -> f64 {
        self.normal.dot(&p.coords) + self.d
    }

    /// Strict positive-side test.
    ///
    /// Points exactly on the plane classify as *negative*: the boundary is
    /// exclusive, which decides which result zone owns plane-coincident
    /// geometry after a clip. Cut planes are assumed never to pass exactly
    /// through an existing vertex; there is deliberately no tolerance band
    /// here.
    #[must_use]
    pub fn is_above(&self, p: &Point3) -> bool {
        self.eval(p) > 0.0
    }

    /// Classifies each point with [`Plane::is_above`].
    #[must_use]
    pub fn classify(&self, points: &[Point3]) -> Vec<bool> {
        points.iter().map(|p| self.is_above(p)).collect()
    }

    /// Intersection of the line through `p1` and `p2` with the plane.
    ///
    /// Returns `None` when the line is parallel to the plane (denominator
    /// within [`TOLERANCE`] of zero); callers must treat that as "edge
    /// fully on one side", not as an error.
    #[must_use]
    pub fn line_intersection(&self, p1: &Point3, p2: &Point3) -> Option<Point3> {
        let direction = p2 - p1;
        let denominator = self.normal.dot(&direction);
        if denominator.abs() < TOLERANCE {
            return None;
        }
        let t = -self.eval(p1) / denominator;
        Some(p1 + direction * t)
    }

    /// The plane moved by `delta` against its own normal (inward for an
    /// outward boundary face).
    #[must_use]
    pub fn offset(&self, delta: f64) -> Self {
        Self {
            normal: self.normal,
            d: self.d + delta,
        }
    }

    /// The same plane with the opposite orientation.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            d: -self.d,
        }
    }
}

/// Projects points onto the plane frame `(origin, u, v)`, returning the
/// `(u, v)` coordinates of each point. `u` and `v` must be orthogonal.
///
/// # Errors
///
/// Returns [`GeometryError::Degenerate`] if `u` and `v` are not orthogonal,
/// or [`GeometryError::ZeroVector`] if either has zero length.
pub fn project_onto_basis(
    points: &[Point3],
    origin: &Point3,
    u: &Vector3,
    v: &Vector3,
) -> Result<Vec<(f64, f64)>> {
    let u_len = u.norm();
    let v_len = v.norm();
    if u_len < TOLERANCE || v_len < TOLERANCE {
        return Err(GeometryError::ZeroVector.into());
    }
    let u = u / u_len;
    let v = v / v_len;
    if u.dot(&v).abs() > 1e-6 {
        return Err(GeometryError::Degenerate("projection basis is not orthogonal".into()).into());
    }
    Ok(points
        .iter()
        .map(|p| {
            let rel = p - origin;
            (rel.dot(&u), rel.dot(&v))
        })
        .collect())
}

/// Two unit vectors completing `normal` into an orthonormal basis.
///
/// # Errors
///
/// Returns [`GeometryError::ZeroVector`] for a zero-length normal.
pub fn orthonormal_basis(normal: &Vector3) -> Result<(Vector3, Vector3)> {
    let len = normal.norm();
    if len < TOLERANCE {
        return Err(GeometryError::ZeroVector.into());
    }
    let normal = normal / len;

    // Reference axis furthest from the normal.
    let reference = if normal.dot(&Vector3::x()).abs() > 0.9 {
        Vector3::y()
    } else {
        Vector3::x()
    };

    let u = normal.cross(&reference).normalize();
    let v = normal.cross(&u).normalize();
    Ok((u, v))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn plane_from_points_unit_normal() {
        let plane =
            Plane::from_points(&p(0.0, 0.0, 0.0), &p(10.0, 0.0, 0.0), &p(10.0, 0.0, 4.0)).unwrap();
        assert_relative_eq!(plane.normal.norm(), 1.0, epsilon = 1e-12);
        // All three points satisfy the equation.
        assert!(plane.eval(&p(10.0, 0.0, 4.0)).abs() < 1e-9);
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let result = Plane::from_points(&p(0.0, 0.0, 0.0), &p(1.0, 1.0, 1.0), &p(2.0, 2.0, 2.0));
        assert!(result.is_err());
    }

    #[test]
    fn boundary_points_classify_negative() {
        let plane = Plane::from_points(&p(0.0, 0.0, 0.0), &p(1.0, 0.0, 0.0), &p(0.0, 1.0, 0.0))
            .unwrap();
        assert!(plane.is_above(&p(0.0, 0.0, 1.0)));
        assert!(!plane.is_above(&p(0.0, 0.0, -1.0)));
        // Exactly on the plane: negative side by convention.
        assert!(!plane.is_above(&p(3.0, 7.0, 0.0)));
    }

    #[test]
    fn line_intersection_hits() {
        let plane = Plane::from_normal_offset(Vector3::z(), 5.0);
        let hit = plane
            .line_intersection(&p(0.0, 0.0, 0.0), &p(0.0, 0.0, 10.0))
            .unwrap();
        assert_relative_eq!(hit.z, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn parallel_line_has_no_intersection() {
        let plane = Plane::from_normal_offset(Vector3::z(), 5.0);
        assert!(plane
            .line_intersection(&p(0.0, 0.0, 0.0), &p(1.0, 0.0, 0.0))
            .is_none());
    }

    #[test]
    fn offset_moves_against_normal() {
        let plane = Plane::from_normal_offset(Vector3::x(), 100.0);
        let inner = plane.offset(19.0);
        // x = 81 is on the offset plane.
        assert!(inner.eval(&p(81.0, 0.0, 0.0)).abs() < 1e-12);
    }

    #[test]
    fn basis_is_orthonormal() {
        let (u, v) = orthonormal_basis(&Vector3::new(0.3, -0.4, 0.8)).unwrap();
        assert_relative_eq!(u.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
        assert!(u.dot(&v).abs() < 1e-12);
    }

    #[test]
    fn projection_recovers_plane_coordinates() {
        let pts = vec![p(3.0, 4.0, 0.0)];
        let coords =
            project_onto_basis(&pts, &p(1.0, 1.0, 0.0), &Vector3::x(), &Vector3::y()).unwrap();
        assert_relative_eq!(coords[0].0, 2.0, epsilon = 1e-12);
        assert_relative_eq!(coords[0].1, 3.0, epsilon = 1e-12);
    }
}
