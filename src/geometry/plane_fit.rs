//! Least-squares plane fitting for a small set of direction vectors
//!
//! Builds the 3x3 covariance of the points about their centroid and solves for the
//! normal using whichever 2x2 minor has the largest determinant, which keeps the
//! solve well conditioned without an eigen decomposition.

use glam::DVec3;

/// Below this the points are treated as collinear (or coincident)
const MIN_DETERMINANT: f64 = 1e-5;

/// Normal of the best-fit plane through `points` about `centroid`
///
/// The result is not normalized and its sign is arbitrary. Returns `None` when
/// the points do not span a plane.
pub fn fit_plane_normal(points: &[DVec3], centroid: DVec3) -> Option<DVec3> {
    let (mut xx, mut xy, mut xz, mut yy, mut yz, mut zz) = (0.0, 0.0, 0.0, 0.0, 0.0, 0.0);

    for p in points {
        let r = *p - centroid;
        xx += r.x * r.x;
        xy += r.x * r.y;
        xz += r.x * r.z;
        yy += r.y * r.y;
        yz += r.y * r.z;
        zz += r.z * r.z;
    }

    let det_x = yy * zz - yz * yz;
    let det_y = xx * zz - xz * xz;
    let det_z = xx * yy - xy * xy;

    let det_max = det_x.abs().max(det_y.abs()).max(det_z.abs());
    if det_max < MIN_DETERMINANT {
        return None;
    }

    let normal = if det_max == det_x.abs() {
        let a = (xz * yz - xy * zz) / det_x;
        let b = (xy * yz - xz * yy) / det_x;
        DVec3::new(1.0, a, b)
    } else if det_max == det_y.abs() {
        let a = (yz * xz - xy * zz) / det_y;
        let b = (xy * xz - yz * xx) / det_y;
        DVec3::new(a, 1.0, b)
    } else {
        let a = (yz * xy - xz * yy) / det_z;
        let b = (xz * xy - yz * xx) / det_z;
        DVec3::new(a, b, 1.0)
    };

    Some(normal)
}

/// Best-fit plane normal of unit directions, oriented along their average
///
/// `vave` is both the centroid of `directions` and the reference the result is
/// oriented to agree with. When the fit is degenerate `vave` itself is returned.
pub fn least_squares_normal(vave: DVec3, directions: &[DVec3]) -> DVec3 {
    match fit_plane_normal(directions, vave) {
        Some(normal) if vave.dot(normal) < 0.0 => -normal,
        Some(normal) => normal,
        None => vave,
    }
}
