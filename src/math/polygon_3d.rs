use crate::error::GeometryError;

use super::{Point3, Vector3, PLANARITY_TOLERANCE, TOLERANCE};

/// Computes the unit normal of a polygon using Newell's method.
///
/// # Errors
///
/// Returns [`GeometryError::TooFewVertices`] for fewer than 3 points,
/// [`GeometryError::NonFiniteVertex`] if a coordinate is NaN or infinite, and
/// [`GeometryError::Degenerate`] if the points are collinear or coincident.
pub fn newell_normal(points: &[Point3]) -> Result<Vector3, GeometryError> {
    let n = points.len();
    if n < 3 {
        return Err(GeometryError::TooFewVertices(n));
    }
    if let Some(index) = points
        .iter()
        .position(|p| !p.coords.iter().all(|c| c.is_finite()))
    {
        return Err(GeometryError::NonFiniteVertex(index));
    }
    let mut normal = Vector3::new(0.0, 0.0, 0.0);
    for i in 0..n {
        let curr = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (curr.y - next.y) * (curr.z + next.z);
        normal.y += (curr.z - next.z) * (curr.x + next.x);
        normal.z += (curr.x - next.x) * (curr.y + next.y);
    }
    let len = normal.norm();
    // an overflowing sum leaves an infinite length
    if !len.is_finite() || len < TOLERANCE {
        return Err(GeometryError::Degenerate(
            "cannot compute a normal for the vertex loop".into(),
        ));
    }
    Ok(normal / len)
}

/// Validates a vertex loop as a planar polygon and returns its unit normal.
///
/// The reference plane passes through the centroid with the Newell normal;
/// every vertex must lie within [`PLANARITY_TOLERANCE`] of it.
///
/// # Errors
///
/// Returns an error if the loop is too short, degenerate, or not planar.
pub fn planar_normal(points: &[Point3]) -> Result<Vector3, GeometryError> {
    let normal = newell_normal(points)?;

    #[allow(clippy::cast_precision_loss)]
    let count = points.len() as f64;
    let centroid = points
        .iter()
        .fold(Vector3::new(0.0, 0.0, 0.0), |acc, p| acc + p.coords)
        / count;

    for (index, p) in points.iter().enumerate() {
        let distance = (p.coords - centroid).dot(&normal).abs();
        if distance.is_nan() || distance > PLANARITY_TOLERANCE {
            return Err(GeometryError::NonPlanar { index, distance });
        }
    }
    Ok(normal)
}
