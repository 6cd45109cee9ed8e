use glam::DVec3;
use std::f64::consts::TAU;

/// Mean of a set of vectors, zero for an empty set
pub fn average(vectors: &[DVec3]) -> DVec3 {
    if vectors.is_empty() {
        return DVec3::ZERO;
    }
    vectors.iter().copied().sum::<DVec3>() / vectors.len() as f64
}

/// World axis the vector is least aligned with
///
/// Ties prefer X, then Y, then Z so the choice is deterministic.
pub fn least_aligned_axis(v: DVec3) -> DVec3 {
    let a = v.abs();
    if a.x <= a.y && a.x <= a.z {
        DVec3::X
    } else if a.y <= a.z {
        DVec3::Y
    } else {
        DVec3::Z
    }
}

/// Unit vector perpendicular to `v`
///
/// Returns X for a zero vector.
pub fn perpendicular(v: DVec3) -> DVec3 {
    v.cross(least_aligned_axis(v)).try_normalize().unwrap_or(DVec3::X)
}

/// Polar angle of `v` in the plane spanned by `to_x` and `to_y`, in `[0, 2π)`
pub fn polar_angle(v: DVec3, to_x: DVec3, to_y: DVec3) -> f64 {
    let theta = v.dot(to_y).atan2(v.dot(to_x));
    if theta < 0.0 { theta + TAU } else { theta }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_average() {
        let avg = average(&[DVec3::X, DVec3::Y, DVec3::new(1.0, 1.0, 3.0)]);
        assert!((avg - DVec3::new(2.0 / 3.0, 2.0 / 3.0, 1.0)).length() < 1e-12);
        assert_eq!(average(&[]), DVec3::ZERO);
    }

    #[test]
    fn test_least_aligned_axis_ties() {
        assert_eq!(least_aligned_axis(DVec3::X), DVec3::Y);
        assert_eq!(least_aligned_axis(DVec3::Z), DVec3::X);
        assert_eq!(least_aligned_axis(DVec3::ONE), DVec3::X);
    }

    #[test]
    fn test_perpendicular() {
        for v in [DVec3::X, DVec3::new(0.3, -2.0, 0.7), DVec3::new(0.0, 0.0, -5.0)] {
            let p = perpendicular(v);
            assert!(p.dot(v).abs() < 1e-12);
            assert!((p.length() - 1.0).abs() < 1e-12);
        }
        // A line along X gets a Z normal
        assert!((perpendicular(DVec3::X) - DVec3::Z).length() < 1e-12);
        assert_eq!(perpendicular(DVec3::ZERO), DVec3::X);
    }

    #[test]
    fn test_polar_angle_range() {
        assert!(polar_angle(DVec3::X, DVec3::X, DVec3::Y).abs() < 1e-12);
        assert!((polar_angle(DVec3::Y, DVec3::X, DVec3::Y) - PI / 2.0).abs() < 1e-12);
        assert!((polar_angle(-DVec3::Y, DVec3::X, DVec3::Y) - 3.0 * PI / 2.0).abs() < 1e-12);
        // Out-of-plane component is ignored
        assert!((polar_angle(DVec3::new(-1.0, 0.0, 9.0), DVec3::X, DVec3::Y) - PI).abs() < 1e-12);
    }
}
